//! Shared route doubles for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cacheroute::protocol::{McReply, McRequest, ReplyResult};
use cacheroute::routing::{RouteHandle, RouteHandlePtr};

/// Observations made by a scripted route.
#[derive(Debug, Default)]
pub struct Probe {
    calls: AtomicUsize,
    failover_tags: Mutex<Vec<bool>>,
}

impl Probe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `failover` flag of every request seen, in order.
    pub fn failover_tags(&self) -> Vec<bool> {
        self.failover_tags.lock().unwrap().clone()
    }
}

/// Route that always answers with the same result and records its calls.
#[derive(Debug)]
pub struct ScriptedRoute {
    name: String,
    result: ReplyResult,
    probe: Arc<Probe>,
}

impl RouteHandle for ScriptedRoute {
    fn route(&self, req: &McRequest) -> McReply {
        self.probe.calls.fetch_add(1, Ordering::SeqCst);
        self.probe.failover_tags.lock().unwrap().push(req.failover);

        let mut reply = McReply::new(self.result);
        reply.value = Some(self.name.clone().into_bytes());
        reply
    }

    fn route_name(&self) -> String {
        self.name.clone()
    }
}

/// Build a scripted route and the probe watching it.
pub fn scripted(name: &str, result: ReplyResult) -> (RouteHandlePtr, Arc<Probe>) {
    let probe = Arc::new(Probe::default());
    let route = Box::new(ScriptedRoute {
        name: name.to_string(),
        result,
        probe: probe.clone(),
    });
    (route, probe)
}

/// Routes named `t0..tn` that all succeed.
#[allow(dead_code)]
pub fn named_targets(n: usize) -> Vec<RouteHandlePtr> {
    (0..n)
        .map(|i| scripted(&format!("t{}", i), ReplyResult::Found).0)
        .collect()
}
