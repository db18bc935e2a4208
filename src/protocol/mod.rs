//! Request and reply model.
//!
//! # Data Flow
//! ```text
//! Client command (op, key, value)
//!     → request.rs (McRequest, Operation)
//!     → routing tree
//!     → reply.rs (McReply, ReplyResult)
//! ```
//!
//! # Design Decisions
//! - Only the fields routing needs are modeled; the wire format lives elsewhere
//! - Results are a closed enum so failover classification is a bitmask test
//! - Every operation has a default (miss) reply used by NullRoute

pub mod reply;
pub mod request;

pub use reply::{McReply, ReplyResult};
pub use request::{McRequest, Operation, OperationCategory};
