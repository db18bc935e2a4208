//! Route construction errors.

use thiserror::Error;

/// Errors raised while building a routing tree from configuration.
#[derive(Debug, Error)]
pub enum RouteConfigError {
    /// A route option has the wrong JSON type.
    #[error("{route}: {field} is not {expected}")]
    InvalidField {
        route: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// The `failover_errors` fragment could not be parsed.
    #[error("failover_errors: {0}")]
    FailoverErrors(String),

    /// The `type` of a route object is not known.
    #[error("unknown route type: {0}")]
    UnknownRoute(String),

    /// A destination name does not resolve.
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    /// The configuration value is not a route at all.
    #[error("malformed route: {0}")]
    Malformed(String),
}

pub type RouteResult<T> = Result<T, RouteConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = RouteConfigError::InvalidField {
            route: "FailoverRoute",
            field: "failover_tag",
            expected: "bool",
        };
        assert_eq!(err.to_string(), "FailoverRoute: failover_tag is not bool");
    }
}
