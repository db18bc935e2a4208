//! Cache replies.

use std::fmt;

use crate::protocol::request::Operation;

/// Outcome of a cache operation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyResult {
    Found = 0,
    NotFound = 1,
    Stored = 2,
    NotStored = 3,
    Deleted = 4,
    Touched = 5,
    Busy = 6,
    Tko = 7,
    TryAgain = 8,
    LocalError = 9,
    RemoteError = 10,
    ConnectError = 11,
    ConnectTimeout = 12,
    Timeout = 13,
}

impl ReplyResult {
    /// Every result, in discriminant order.
    pub const ALL: [ReplyResult; 14] = [
        ReplyResult::Found,
        ReplyResult::NotFound,
        ReplyResult::Stored,
        ReplyResult::NotStored,
        ReplyResult::Deleted,
        ReplyResult::Touched,
        ReplyResult::Busy,
        ReplyResult::Tko,
        ReplyResult::TryAgain,
        ReplyResult::LocalError,
        ReplyResult::RemoteError,
        ReplyResult::ConnectError,
        ReplyResult::ConnectTimeout,
        ReplyResult::Timeout,
    ];

    /// Configuration name of this result.
    pub fn name(self) -> &'static str {
        match self {
            ReplyResult::Found => "found",
            ReplyResult::NotFound => "notfound",
            ReplyResult::Stored => "stored",
            ReplyResult::NotStored => "notstored",
            ReplyResult::Deleted => "deleted",
            ReplyResult::Touched => "touched",
            ReplyResult::Busy => "busy",
            ReplyResult::Tko => "tko",
            ReplyResult::TryAgain => "try_again",
            ReplyResult::LocalError => "local_error",
            ReplyResult::RemoteError => "remote_error",
            ReplyResult::ConnectError => "connect_error",
            ReplyResult::ConnectTimeout => "connect_timeout",
            ReplyResult::Timeout => "timeout",
        }
    }

    /// Look a result up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }

    /// True for results that signal a transport or server error.
    pub fn is_error(self) -> bool {
        (self as u8) >= (ReplyResult::Busy as u8)
    }
}

impl fmt::Display for ReplyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reply produced by a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McReply {
    pub result: ReplyResult,
    pub value: Option<Vec<u8>>,
    /// Error text for error results.
    pub message: Option<String>,
}

impl McReply {
    pub fn new(result: ReplyResult) -> Self {
        Self {
            result,
            value: None,
            message: None,
        }
    }

    pub fn found(value: impl Into<Vec<u8>>) -> Self {
        Self {
            result: ReplyResult::Found,
            value: Some(value.into()),
            message: None,
        }
    }

    pub fn error(result: ReplyResult, message: impl Into<String>) -> Self {
        Self {
            result,
            value: None,
            message: Some(message.into()),
        }
    }

    /// The reply a destination-less route gives for `operation`.
    pub fn default_for(operation: Operation) -> Self {
        match operation {
            Operation::Get | Operation::Delete | Operation::Touch => {
                Self::new(ReplyResult::NotFound)
            }
            Operation::Set | Operation::Add | Operation::Replace => {
                Self::new(ReplyResult::NotStored)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }
}
