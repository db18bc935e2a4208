//! Request-dispatch core of a memcache-style cache proxy.
//!
//! A tree of routing nodes decides which destinations receive each request,
//! in what order, and how failures are absorbed. A codec registry picks the
//! compression codec for each payload, with one codec map per thread.

pub mod compression;
pub mod config;
pub mod generation;
pub mod observability;
pub mod protocol;
pub mod routing;

pub use compression::{CodecManager, CodecMap};
pub use config::schema::ProxyConfig;
pub use generation::{RouterGeneration, RouterState};
pub use protocol::{McReply, McRequest};
pub use routing::{RouteHandle, RouteHandlePtr};
