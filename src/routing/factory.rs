//! Route tree construction from JSON configuration.
//!
//! # Responsibilities
//! - Map route type names to constructors
//! - Resolve destination names against the configured destinations
//! - Hand each constructor the raw fragment for its node
//!
//! # Accepted Forms
//! ```text
//! "NullRoute" | "ErrorRoute" | "ErrorRoute|<message>" | "DestinationRoute|<name>"
//! { "type": "<RouteType>", ...options }
//! [ route, route, ... ]            (children lists only)
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::routing::destination::DestinationMap;
use crate::routing::error::{RouteConfigError, RouteResult};
use crate::routing::failover::make_failover_route_with_factory;
use crate::routing::host;
use crate::routing::latest::make_latest_route_with_factory;
use crate::routing::leaf::{make_null_route, DestinationRoute, ErrorRoute};
use crate::routing::RouteHandlePtr;

/// Builds route trees out of configuration values.
#[derive(Debug)]
pub struct RouteFactory<'a> {
    destinations: &'a DestinationMap,
    host_id: u64,
}

impl<'a> RouteFactory<'a> {
    /// Create a factory resolving leaves against `destinations`.
    pub fn new(destinations: &'a DestinationMap) -> Self {
        Self {
            destinations,
            host_id: host::host_id(),
        }
    }

    /// Pin the host id used to seed backup selection.
    pub fn with_host_id(mut self, host_id: u64) -> Self {
        self.host_id = host_id;
        self
    }

    pub fn host_id(&self) -> u64 {
        self.host_id
    }

    /// Build a single route.
    pub fn create(&self, json: &Value) -> RouteResult<RouteHandlePtr> {
        match json {
            Value::String(s) => self.create_from_string(s),
            Value::Object(obj) => {
                let route_type = obj.get("type").and_then(Value::as_str).ok_or_else(|| {
                    RouteConfigError::Malformed("route object has no string type".to_string())
                })?;
                self.create_typed(route_type, json)
            }
            other => Err(RouteConfigError::Malformed(format!(
                "expected a route string or object, got {}",
                other
            ))),
        }
    }

    /// Build a list of routes. A non-array value builds a single-element list.
    pub fn create_list(&self, json: &Value) -> RouteResult<Vec<RouteHandlePtr>> {
        match json {
            Value::Array(items) => items.iter().map(|item| self.create(item)).collect(),
            other => Ok(vec![self.create(other)?]),
        }
    }

    /// Children of a composite route: the `children` field of an object,
    /// or the value itself when it is a bare list.
    pub fn create_children(&self, json: &Value) -> RouteResult<Vec<RouteHandlePtr>> {
        match json {
            Value::Object(obj) => match obj.get("children") {
                Some(children) => self.create_list(children),
                None => Ok(Vec::new()),
            },
            other => self.create_list(other),
        }
    }

    fn create_from_string(&self, s: &str) -> RouteResult<RouteHandlePtr> {
        let (route_type, arg) = match s.split_once('|') {
            Some((t, a)) => (t, Some(a)),
            None => (s, None),
        };

        match (route_type, arg) {
            ("NullRoute", None) => Ok(make_null_route()),
            ("ErrorRoute", message) => Ok(Box::new(ErrorRoute::new(message.unwrap_or("ErrorRoute")))),
            ("DestinationRoute", Some(name)) => self.destination_route(name),
            _ => Err(RouteConfigError::UnknownRoute(s.to_string())),
        }
    }

    fn create_typed(&self, route_type: &str, json: &Value) -> RouteResult<RouteHandlePtr> {
        match route_type {
            "FailoverRoute" => make_failover_route_with_factory(self, json),
            "LatestRoute" => make_latest_route_with_factory(self, json),
            "NullRoute" => Ok(make_null_route()),
            "ErrorRoute" => {
                let message = match json.get("response") {
                    None => "ErrorRoute",
                    Some(v) => v.as_str().ok_or(RouteConfigError::InvalidField {
                        route: "ErrorRoute",
                        field: "response",
                        expected: "a string",
                    })?,
                };
                Ok(Box::new(ErrorRoute::new(message)))
            }
            "DestinationRoute" => {
                let name = json.get("name").and_then(Value::as_str).ok_or(
                    RouteConfigError::InvalidField {
                        route: "DestinationRoute",
                        field: "name",
                        expected: "a string",
                    },
                )?;
                self.destination_route(name)
            }
            other => Err(RouteConfigError::UnknownRoute(other.to_string())),
        }
    }

    fn destination_route(&self, name: &str) -> RouteResult<RouteHandlePtr> {
        let destination = self
            .destinations
            .get(name)
            .ok_or_else(|| RouteConfigError::UnknownDestination(name.to_string()))?;
        Ok(Box::new(DestinationRoute::new(Arc::clone(destination))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{McRequest, ReplyResult};
    use crate::routing::destination::{Destination, MemoryDestination};
    use crate::routing::route_handles;
    use serde_json::json;

    fn destinations() -> DestinationMap {
        ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let dest: Arc<dyn Destination> = Arc::new(MemoryDestination::new(name));
                (name.to_string(), dest)
            })
            .collect()
    }

    #[test]
    fn test_string_routes() {
        let dests = destinations();
        let factory = RouteFactory::new(&dests);

        assert_eq!(factory.create(&json!("NullRoute")).unwrap().route_name(), "NullRoute");
        let err = factory.create(&json!("ErrorRoute|maintenance")).unwrap();
        assert_eq!(
            err.route(&McRequest::get("k")).message.as_deref(),
            Some("maintenance")
        );
        assert_eq!(
            factory.create(&json!("DestinationRoute|b")).unwrap().route_name(),
            "DestinationRoute|b"
        );
    }

    #[test]
    fn test_nested_tree() {
        let dests = destinations();
        let factory = RouteFactory::new(&dests).with_host_id(11);
        let root = factory
            .create(&json!({
                "type": "FailoverRoute",
                "children": [
                    "DestinationRoute|a",
                    { "type": "LatestRoute", "failover_count": 2, "children": ["DestinationRoute|b", "DestinationRoute|c"] }
                ]
            }))
            .unwrap();

        let names = route_handles(root.as_ref());
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], (0, "FailoverRoute".to_string()));
        assert_eq!(names[1], (1, "DestinationRoute|a".to_string()));
        assert_eq!(names[2], (1, "FailoverRoute".to_string()));
        assert_eq!(root.route(&McRequest::set("k", "v")).result, ReplyResult::Stored);
    }

    #[test]
    fn test_bare_list_children() {
        let dests = destinations();
        let factory = RouteFactory::new(&dests);
        let children = factory
            .create_children(&json!(["DestinationRoute|a", "NullRoute"]))
            .unwrap();
        assert_eq!(children.len(), 2);

        let none = factory.create_children(&json!({ "failover_tag": true })).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let dests = destinations();
        let factory = RouteFactory::new(&dests);

        assert!(matches!(
            factory.create(&json!("DestinationRoute|zzz")),
            Err(RouteConfigError::UnknownDestination(name)) if name == "zzz"
        ));
        assert!(matches!(
            factory.create(&json!({ "type": "ShardRoute" })),
            Err(RouteConfigError::UnknownRoute(_))
        ));
        assert!(matches!(
            factory.create(&json!(42)),
            Err(RouteConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_child_errors_abort_construction() {
        let dests = destinations();
        let factory = RouteFactory::new(&dests);
        let err = factory
            .create(&json!({
                "type": "FailoverRoute",
                "children": ["DestinationRoute|a", { "type": "LatestRoute", "failover_count": true, "children": [] }]
            }))
            .unwrap_err();
        assert_eq!(err.to_string(), "LatestRoute: failover_count is not an integer");
    }
}
