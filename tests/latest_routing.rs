//! Latest route backup selection.

use cacheroute::protocol::{McRequest, ReplyResult};
use cacheroute::routing::latest::{make_latest_route_for_host, select_latest};
use cacheroute::routing::{route_handles, DestinationMap, FailoverErrorsSettings, RouteFactory};
use serde_json::json;

mod common;

fn leaf_names(route: &dyn cacheroute::RouteHandle) -> Vec<String> {
    route_handles(route)
        .into_iter()
        .filter(|(depth, _)| *depth == 1)
        .map(|(_, name)| name)
        .collect()
}

#[test]
fn test_count_at_least_len_selects_everything_once() {
    for host_id in [0u64, 1, 42, u64::MAX] {
        let picked = select_latest((0..7).collect::<Vec<u32>>(), 100, host_id);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..7).collect::<Vec<u32>>());
    }
}

#[test]
fn test_zero_count_degenerates_to_null_route() {
    let route = make_latest_route_for_host(
        common::named_targets(3),
        0,
        FailoverErrorsSettings::default(),
        9,
    );
    assert_eq!(route.route_name(), "NullRoute");
    assert_eq!(route.route(&McRequest::get("k")).result, ReplyResult::NotFound);
}

#[test]
fn test_same_host_same_selection() {
    let a = make_latest_route_for_host(common::named_targets(10), 4, FailoverErrorsSettings::default(), 77);
    let b = make_latest_route_for_host(common::named_targets(10), 4, FailoverErrorsSettings::default(), 77);

    let names = leaf_names(a.as_ref());
    assert_eq!(names.len(), 4);
    assert_eq!(names, leaf_names(b.as_ref()));
}

#[test]
fn test_hosts_spread_their_first_backup() {
    let first_picks: std::collections::HashSet<u32> = (0..64u64)
        .map(|host_id| select_latest((0..8).collect::<Vec<u32>>(), 1, host_id)[0])
        .collect();
    // 64 hosts over 8 targets should not all converge on one backup.
    assert!(first_picks.len() > 1);
}

#[test]
fn test_tagging_is_forced_off() {
    let (c0, p0) = common::scripted("c0", ReplyResult::Timeout);
    let (c1, p1) = common::scripted("c1", ReplyResult::Timeout);
    let route = make_latest_route_for_host(vec![c0, c1], 2, FailoverErrorsSettings::default(), 5);

    route.route(&McRequest::get("k"));
    let mut tags = p0.failover_tags();
    tags.extend(p1.failover_tags());
    assert_eq!(tags, vec![false, false]);
}

#[test]
fn test_config_forms() {
    let destinations = DestinationMap::new();
    let factory = RouteFactory::new(&destinations).with_host_id(3);

    let object = factory
        .create(&json!({
            "type": "LatestRoute",
            "failover_count": 2,
            "failover_errors": ["local_error"],
            "children": ["ErrorRoute|a", "ErrorRoute|b", "ErrorRoute|c"]
        }))
        .unwrap();
    assert_eq!(object.children().len(), 2);

    let children: Vec<String> = (0..8).map(|i| format!("ErrorRoute|{}", i)).collect();
    let defaulted = factory
        .create(&json!({ "type": "LatestRoute", "children": children }))
        .unwrap();
    assert_eq!(defaulted.children().len(), 5);
}

#[test]
fn test_non_integer_count_is_rejected() {
    let destinations = DestinationMap::new();
    let err = RouteFactory::new(&destinations)
        .create(&json!({ "type": "LatestRoute", "failover_count": "five", "children": [] }))
        .unwrap_err();
    assert_eq!(err.to_string(), "LatestRoute: failover_count is not an integer");
}
