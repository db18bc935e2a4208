//! Failover error classification.
//!
//! # Responsibilities
//! - Decide whether a reply means "this destination failed, try the next"
//! - Parse the `failover_errors` configuration fragment
//!
//! # Design Decisions
//! - One bitmask per operation category, a lookup is a shift and a test
//! - Omitted categories keep the default classification
//! - Unknown result names are configuration errors

use serde_json::Value;

use crate::protocol::{McReply, Operation, OperationCategory, ReplyResult};
use crate::routing::error::{RouteConfigError, RouteResult};

/// Set of reply results, one bit per `ReplyResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultMask(u32);

impl ResultMask {
    pub const EMPTY: ResultMask = ResultMask(0);

    /// Results that trigger failover when nothing is configured.
    pub const DEFAULT: ResultMask = ResultMask::from_results(&[
        ReplyResult::Busy,
        ReplyResult::Tko,
        ReplyResult::TryAgain,
        ReplyResult::LocalError,
        ReplyResult::RemoteError,
        ReplyResult::ConnectError,
        ReplyResult::ConnectTimeout,
        ReplyResult::Timeout,
    ]);

    pub const fn from_results(results: &[ReplyResult]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < results.len() {
            bits |= 1 << (results[i] as u8);
            i += 1;
        }
        ResultMask(bits)
    }

    pub fn contains(self, result: ReplyResult) -> bool {
        self.0 & (1 << (result as u8)) != 0
    }

    fn insert(&mut self, result: ReplyResult) {
        self.0 |= 1 << (result as u8);
    }

    /// Parse a JSON array of result names.
    fn from_json(json: &Value) -> RouteResult<Self> {
        let names = json.as_array().ok_or_else(|| {
            RouteConfigError::FailoverErrors("expected an array of result names".to_string())
        })?;

        let mut mask = ResultMask::EMPTY;
        for name in names {
            let name = name.as_str().ok_or_else(|| {
                RouteConfigError::FailoverErrors(format!("{} is not a string", name))
            })?;
            let result = ReplyResult::from_name(name).ok_or_else(|| {
                RouteConfigError::FailoverErrors(format!("unknown result {}", name))
            })?;
            mask.insert(result);
        }
        Ok(mask)
    }
}

/// Per-category classification of failover errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverErrorsSettings {
    gets: ResultMask,
    updates: ResultMask,
    deletes: ResultMask,
}

impl Default for FailoverErrorsSettings {
    fn default() -> Self {
        Self {
            gets: ResultMask::DEFAULT,
            updates: ResultMask::DEFAULT,
            deletes: ResultMask::DEFAULT,
        }
    }
}

impl FailoverErrorsSettings {
    fn uniform(mask: ResultMask) -> Self {
        Self {
            gets: mask,
            updates: mask,
            deletes: mask,
        }
    }

    /// Parse `failover_errors`: either an array of result names, or an object
    /// with optional `gets`, `updates` and `deletes` arrays.
    pub fn from_json(json: &Value) -> RouteResult<Self> {
        match json {
            Value::Array(_) => ResultMask::from_json(json).map(Self::uniform),
            Value::Object(map) => {
                let mut settings = Self::default();
                for (category, value) in map {
                    let mask = ResultMask::from_json(value)?;
                    match category.as_str() {
                        "gets" => settings.gets = mask,
                        "updates" => settings.updates = mask,
                        "deletes" => settings.deletes = mask,
                        other => {
                            return Err(RouteConfigError::FailoverErrors(format!(
                                "unknown operation category {}",
                                other
                            )))
                        }
                    }
                }
                Ok(settings)
            }
            _ => Err(RouteConfigError::FailoverErrors(
                "expected an array or an object".to_string(),
            )),
        }
    }

    /// True if `reply` to an `operation` request should be retried elsewhere.
    pub fn should_failover(&self, reply: &McReply, operation: Operation) -> bool {
        let mask = match operation.category() {
            OperationCategory::Gets => self.gets,
            OperationCategory::Updates => self.updates,
            OperationCategory::Deletes => self.deletes,
        };
        mask.contains(reply.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_classification() {
        let settings = FailoverErrorsSettings::default();
        let timeout = McReply::new(ReplyResult::Timeout);
        let miss = McReply::new(ReplyResult::NotFound);

        assert!(settings.should_failover(&timeout, Operation::Get));
        assert!(settings.should_failover(&timeout, Operation::Set));
        assert!(!settings.should_failover(&miss, Operation::Get));
    }

    #[test]
    fn test_array_applies_to_all_categories() {
        let settings = FailoverErrorsSettings::from_json(&json!(["connect_error"])).unwrap();
        let connect = McReply::new(ReplyResult::ConnectError);
        let timeout = McReply::new(ReplyResult::Timeout);

        assert!(settings.should_failover(&connect, Operation::Get));
        assert!(settings.should_failover(&connect, Operation::Delete));
        assert!(!settings.should_failover(&timeout, Operation::Get));
    }

    #[test]
    fn test_object_overrides_single_category() {
        let settings = FailoverErrorsSettings::from_json(&json!({ "gets": ["tko"] })).unwrap();
        let timeout = McReply::new(ReplyResult::Timeout);

        assert!(!settings.should_failover(&timeout, Operation::Get));
        // Updates keep the default classification.
        assert!(settings.should_failover(&timeout, Operation::Set));
    }

    #[test]
    fn test_rejects_malformed_fragments() {
        assert!(FailoverErrorsSettings::from_json(&json!("timeout")).is_err());
        assert!(FailoverErrorsSettings::from_json(&json!(["not_a_result"])).is_err());
        assert!(FailoverErrorsSettings::from_json(&json!([1, 2])).is_err());
        assert!(FailoverErrorsSettings::from_json(&json!({ "gets": "tko" })).is_err());
        assert!(FailoverErrorsSettings::from_json(&json!({ "arith": ["tko"] })).is_err());
    }
}
