//! Deterministic "latest N" backup selection.
//!
//! # Algorithm
//! ```text
//! hash = combine(0, host_id)
//! repeat min(failover_count, len) times:
//!     pick  = targets.swap_remove(hash % targets.len())
//!     hash  = combine(hash, i)
//! → FailoverRoute(picked, tagging off)
//! ```
//!
//! # Design Decisions
//! - Seeded by host id: each proxy prefers its own backup order,
//!   and keeps it across tree rebuilds
//! - swap_remove keeps each step O(1)
//! - Hash state is local to the call, nothing global

use serde_json::Value;

use crate::routing::error::{RouteConfigError, RouteResult};
use crate::routing::errors_settings::FailoverErrorsSettings;
use crate::routing::factory::RouteFactory;
use crate::routing::failover::make_failover_route;
use crate::routing::host::{hash_combine, host_id};
use crate::routing::RouteHandlePtr;

/// Backups considered when `failover_count` is not configured.
pub const DEFAULT_FAILOVER_COUNT: usize = 5;

/// Pick `failover_count` items out of `targets` in host-seeded order.
pub fn select_latest<T>(mut targets: Vec<T>, failover_count: usize, host_id: u64) -> Vec<T> {
    let count = failover_count.min(targets.len());
    let mut selected = Vec::with_capacity(count);

    let mut cur_hash = hash_combine(0, host_id);
    for i in 0..count {
        let idx = (cur_hash % targets.len() as u64) as usize;
        selected.push(targets.swap_remove(idx));
        cur_hash = hash_combine(cur_hash, i as u64);
    }
    selected
}

/// Build a failover route over backups chosen for this host.
pub fn make_latest_route(
    targets: Vec<RouteHandlePtr>,
    failover_count: usize,
    failover_errors: FailoverErrorsSettings,
) -> RouteHandlePtr {
    make_latest_route_for_host(targets, failover_count, failover_errors, host_id())
}

/// Same as [`make_latest_route`] with an explicit host id.
pub fn make_latest_route_for_host(
    targets: Vec<RouteHandlePtr>,
    failover_count: usize,
    failover_errors: FailoverErrorsSettings,
    host_id: u64,
) -> RouteHandlePtr {
    let available = targets.len();
    let failovers = select_latest(targets, failover_count, host_id);
    tracing::debug!(
        available,
        selected = failovers.len(),
        host_id,
        "Selected latest route backups"
    );
    make_failover_route(failovers, failover_errors, false)
}

/// Build a latest route from its options object and already built children.
pub fn make_latest_route_from_json(
    json: &Value,
    targets: Vec<RouteHandlePtr>,
    host_id: u64,
) -> RouteResult<RouteHandlePtr> {
    let mut failover_count = DEFAULT_FAILOVER_COUNT;
    let mut failover_errors = FailoverErrorsSettings::default();

    if let Some(obj) = json.as_object() {
        if let Some(j) = obj.get("failover_count") {
            if !(j.is_i64() || j.is_u64()) {
                return Err(RouteConfigError::InvalidField {
                    route: "LatestRoute",
                    field: "failover_count",
                    expected: "an integer",
                });
            }
            let count = j.as_u64().ok_or(RouteConfigError::InvalidField {
                route: "LatestRoute",
                field: "failover_count",
                expected: "a non-negative integer",
            })?;
            failover_count = usize::try_from(count).unwrap_or(usize::MAX);
        }
        if let Some(j) = obj.get("failover_errors") {
            failover_errors = FailoverErrorsSettings::from_json(j)?;
        }
    }

    Ok(make_latest_route_for_host(
        targets,
        failover_count,
        failover_errors,
        host_id,
    ))
}

/// Build a latest route, resolving children through the factory.
pub fn make_latest_route_with_factory(
    factory: &RouteFactory<'_>,
    json: &Value,
) -> RouteResult<RouteHandlePtr> {
    let children = factory.create_children(json)?;
    make_latest_route_from_json(json, children, factory.host_id())
}
