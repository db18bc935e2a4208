//! Leaf routes.

use std::sync::Arc;

use crate::protocol::{McReply, McRequest, ReplyResult};
use crate::routing::destination::Destination;
use crate::routing::{RouteHandle, RouteHandlePtr};

/// Replies with the operation's default reply without contacting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRoute;

impl RouteHandle for NullRoute {
    fn route(&self, req: &McRequest) -> McReply {
        McReply::default_for(req.operation)
    }

    fn route_name(&self) -> String {
        "NullRoute".to_string()
    }
}

/// Build a route that has no destination.
pub fn make_null_route() -> RouteHandlePtr {
    Box::new(NullRoute)
}

/// Replies with a local error carrying a fixed message.
#[derive(Debug, Clone)]
pub struct ErrorRoute {
    message: String,
}

impl ErrorRoute {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl RouteHandle for ErrorRoute {
    fn route(&self, _req: &McRequest) -> McReply {
        McReply::error(ReplyResult::LocalError, self.message.clone())
    }

    fn route_name(&self) -> String {
        "ErrorRoute".to_string()
    }
}

/// Sends the request to a single destination.
#[derive(Debug)]
pub struct DestinationRoute {
    destination: Arc<dyn Destination>,
}

impl DestinationRoute {
    pub fn new(destination: Arc<dyn Destination>) -> Self {
        Self { destination }
    }
}

impl RouteHandle for DestinationRoute {
    fn route(&self, req: &McRequest) -> McReply {
        self.destination.send(req)
    }

    fn route_name(&self) -> String {
        format!("DestinationRoute|{}", self.destination.name())
    }
}
