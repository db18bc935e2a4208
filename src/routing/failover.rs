//! Sequential failover across an ordered list of children.
//!
//! # State Machine
//! ```text
//! child[0] → failure? → child[1] → failure? → ... → last reply
//!     │                    │
//!     └── success ─────────┴──→ return reply
//! ```
//!
//! # Design Decisions
//! - Zero children fold to NullRoute, one child is returned as-is
//! - Failure is whatever FailoverErrorsSettings says, per operation category
//! - Tagged attempts get a copy of the request; the first attempt never copies

use serde_json::Value;

use crate::observability::metrics;
use crate::protocol::{McReply, McRequest};
use crate::routing::error::{RouteConfigError, RouteResult};
use crate::routing::errors_settings::FailoverErrorsSettings;
use crate::routing::factory::RouteFactory;
use crate::routing::leaf::make_null_route;
use crate::routing::{RouteHandle, RouteHandlePtr};

/// Tries children in order until one returns a non-failure reply.
#[derive(Debug)]
pub struct FailoverRoute {
    targets: Vec<RouteHandlePtr>,
    failover_errors: FailoverErrorsSettings,
    failover_tagging: bool,
}

impl RouteHandle for FailoverRoute {
    fn route(&self, req: &McRequest) -> McReply {
        let mut reply = self.targets[0].route(req);
        if !self.failover_errors.should_failover(&reply, req.operation) {
            return reply;
        }

        // Only the failure path copies the request, once, and every remaining
        // child shares that copy.
        let tagged;
        let next_req = if self.failover_tagging {
            tagged = req.failover_copy();
            &tagged
        } else {
            req
        };

        for (attempt, target) in self.targets.iter().enumerate().skip(1) {
            tracing::trace!(
                attempt,
                failed_result = %reply.result,
                target = %target.route_name(),
                "Failing over"
            );
            metrics::record_failover_attempt();

            reply = target.route(next_req);
            if !self.failover_errors.should_failover(&reply, req.operation) {
                return reply;
            }
        }

        tracing::debug!(
            targets = self.targets.len(),
            result = %reply.result,
            "All failover targets failed"
        );
        metrics::record_failover_exhausted();
        reply
    }

    fn route_name(&self) -> String {
        "FailoverRoute".to_string()
    }

    fn children(&self) -> &[RouteHandlePtr] {
        &self.targets
    }
}

/// Build a failover route over `targets`.
///
/// No targets gives a NullRoute and a single target is returned unwrapped.
pub fn make_failover_route(
    mut targets: Vec<RouteHandlePtr>,
    failover_errors: FailoverErrorsSettings,
    failover_tagging: bool,
) -> RouteHandlePtr {
    match targets.len() {
        0 => make_null_route(),
        1 => targets.remove(0),
        _ => Box::new(FailoverRoute {
            targets,
            failover_errors,
            failover_tagging,
        }),
    }
}

/// Build a failover route from its options object and already built children.
pub fn make_failover_route_from_json(
    json: &Value,
    children: Vec<RouteHandlePtr>,
) -> RouteResult<RouteHandlePtr> {
    let mut failover_errors = FailoverErrorsSettings::default();
    let mut failover_tagging = false;

    if let Some(obj) = json.as_object() {
        if let Some(j) = obj.get("failover_errors") {
            failover_errors = FailoverErrorsSettings::from_json(j)?;
        }
        if let Some(j) = obj.get("failover_tag") {
            failover_tagging = j.as_bool().ok_or(RouteConfigError::InvalidField {
                route: "FailoverRoute",
                field: "failover_tag",
                expected: "bool",
            })?;
        }
    }

    Ok(make_failover_route(children, failover_errors, failover_tagging))
}

/// Build a failover route, resolving children through the factory.
pub fn make_failover_route_with_factory(
    factory: &RouteFactory<'_>,
    json: &Value,
) -> RouteResult<RouteHandlePtr> {
    let children = factory.create_children(json)?;
    make_failover_route_from_json(json, children)
}
