//! Cache requests.

use std::fmt;
use std::str::FromStr;

/// Cache operation carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Set,
    Add,
    Replace,
    Delete,
    Touch,
}

/// Coarse grouping of operations used by failover classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationCategory {
    Gets,
    Updates,
    Deletes,
}

impl Operation {
    /// Which failover category this operation falls under.
    pub fn category(self) -> OperationCategory {
        match self {
            Operation::Get => OperationCategory::Gets,
            Operation::Set | Operation::Add | Operation::Replace | Operation::Touch => {
                OperationCategory::Updates
            }
            Operation::Delete => OperationCategory::Deletes,
        }
    }

    /// Lowercase command name.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Add => "add",
            Operation::Replace => "replace",
            Operation::Delete => "delete",
            Operation::Touch => "touch",
        }
    }

    /// True for operations that carry a value.
    pub fn has_value(self) -> bool {
        matches!(self, Operation::Set | Operation::Add | Operation::Replace)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Operation::Get),
            "set" => Ok(Operation::Set),
            "add" => Ok(Operation::Add),
            "replace" => Ok(Operation::Replace),
            "delete" => Ok(Operation::Delete),
            "touch" => Ok(Operation::Touch),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

/// A single cache request travelling down the routing tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McRequest {
    pub operation: Operation,
    pub key: String,
    pub value: Option<Vec<u8>>,
    /// Expiration time in seconds (0 = never).
    pub exptime: u32,
    /// Set on attempts that follow a failed destination.
    pub failover: bool,
}

impl McRequest {
    /// Create a request without a value.
    pub fn new(operation: Operation, key: impl Into<String>) -> Self {
        Self {
            operation,
            key: key.into(),
            value: None,
            exptime: 0,
            failover: false,
        }
    }

    pub fn get(key: impl Into<String>) -> Self {
        Self::new(Operation::Get, key)
    }

    pub fn set(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(Operation::Set, key).with_value(value)
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self::new(Operation::Delete, key)
    }

    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_exptime(mut self, exptime: u32) -> Self {
        self.exptime = exptime;
        self
    }

    /// Copy of this request marked as a failed-over attempt.
    pub fn failover_copy(&self) -> Self {
        let mut req = self.clone();
        req.failover = true;
        req
    }
}
