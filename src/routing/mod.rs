//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at config load):
//!     route JSON
//!     → factory.rs (walk config, resolve destinations)
//!     → failover.rs / latest.rs / leaf.rs (build nodes)
//!     → Freeze as immutable tree of RouteHandles
//!
//! Incoming Request:
//!     → root.route(req)
//!     → composite nodes delegate to owned children
//!     → leaf nodes reply (destination, null, error)
//! ```
//!
//! # Design Decisions
//! - Trees are built once per configuration generation, immutable at runtime
//! - Parents own their children (Box), no shared subtrees
//! - Construction errors are returned, never defaulted
//! - Routing is synchronous on the caller's thread

pub mod destination;
pub mod error;
pub mod errors_settings;
pub mod factory;
pub mod failover;
pub mod host;
pub mod latest;
pub mod leaf;

pub use destination::{Destination, DestinationMap, MemoryDestination};
pub use error::RouteConfigError;
pub use errors_settings::FailoverErrorsSettings;
pub use factory::RouteFactory;
pub use failover::make_failover_route;
pub use latest::make_latest_route;

use crate::protocol::{McReply, McRequest};

/// A node of the routing tree.
pub trait RouteHandle: Send + Sync + std::fmt::Debug {
    /// Route the request and produce a reply.
    fn route(&self, req: &McRequest) -> McReply;

    /// Name used in diagnostics.
    fn route_name(&self) -> String;

    /// Children owned by this node, in routing order.
    fn children(&self) -> &[RouteHandlePtr] {
        &[]
    }
}

/// Owned pointer to a routing node.
pub type RouteHandlePtr = Box<dyn RouteHandle>;

/// Depth-first listing of `(depth, route_name)` for every node under `root`.
pub fn route_handles(root: &dyn RouteHandle) -> Vec<(usize, String)> {
    fn walk(node: &dyn RouteHandle, depth: usize, out: &mut Vec<(usize, String)>) {
        out.push((depth, node.route_name()));
        for child in node.children() {
            walk(child.as_ref(), depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}
