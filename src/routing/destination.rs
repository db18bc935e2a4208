//! Destinations at the leaves of the routing tree.
//!
//! # Responsibilities
//! - Abstract the transport to a single cache server
//! - Provide an in-process store for local runs and tests
//!
//! # Design Decisions
//! - Destinations are shared (`Arc`) between the leaves that name them
//! - A down destination replies `connect_error` so failover can react
//! - Request counting is lock-free
//! - Expired entries are dropped lazily, when a request finds them

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::protocol::{McReply, McRequest, Operation, ReplyResult};

/// Transport to one cache server.
pub trait Destination: Send + Sync + fmt::Debug {
    /// Destination name as written in configuration.
    fn name(&self) -> &str;

    /// Send a request and wait for its reply.
    fn send(&self, req: &McRequest) -> McReply;
}

/// Destinations by name.
pub type DestinationMap = HashMap<String, Arc<dyn Destination>>;

#[derive(Debug)]
struct StoredValue {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(req: &McRequest) -> Self {
        Self {
            data: req.value.clone().unwrap_or_default(),
            expires_at: expiry(req.exptime),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Relative expiration in seconds; 0 never expires.
fn expiry(exptime: u32) -> Option<Instant> {
    (exptime > 0).then(|| Instant::now() + Duration::from_secs(u64::from(exptime)))
}

/// In-memory cache server.
#[derive(Debug)]
pub struct MemoryDestination {
    name: String,
    store: DashMap<String, StoredValue>,
    down: AtomicBool,
    requests: AtomicUsize,
}

impl MemoryDestination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: DashMap::new(),
            down: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    /// Simulate the server going away (or coming back).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::Relaxed);
    }

    pub fn is_down(&self) -> bool {
        self.down.load(Ordering::Relaxed)
    }

    /// Number of requests received, including those refused while down.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Destination for MemoryDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, req: &McRequest) -> McReply {
        self.requests.fetch_add(1, Ordering::Relaxed);

        if self.is_down() {
            return McReply::error(
                ReplyResult::ConnectError,
                format!("destination {} is down", self.name),
            );
        }

        let now = Instant::now();
        self.store.remove_if(&req.key, |_, stored| stored.is_expired(now));

        match req.operation {
            Operation::Get => match self.store.get(&req.key) {
                Some(v) => McReply::found(v.data.clone()),
                None => McReply::new(ReplyResult::NotFound),
            },
            Operation::Set => {
                self.store.insert(req.key.clone(), StoredValue::new(req));
                McReply::new(ReplyResult::Stored)
            }
            Operation::Add => match self.store.entry(req.key.clone()) {
                Entry::Occupied(_) => McReply::new(ReplyResult::NotStored),
                Entry::Vacant(e) => {
                    e.insert(StoredValue::new(req));
                    McReply::new(ReplyResult::Stored)
                }
            },
            Operation::Replace => match self.store.get_mut(&req.key) {
                Some(mut v) => {
                    *v = StoredValue::new(req);
                    McReply::new(ReplyResult::Stored)
                }
                None => McReply::new(ReplyResult::NotStored),
            },
            Operation::Delete => match self.store.remove(&req.key) {
                Some(_) => McReply::new(ReplyResult::Deleted),
                None => McReply::new(ReplyResult::NotFound),
            },
            Operation::Touch => match self.store.get_mut(&req.key) {
                Some(mut v) => {
                    v.expires_at = expiry(req.exptime);
                    McReply::new(ReplyResult::Touched)
                }
                None => McReply::new(ReplyResult::NotFound),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_destination_operations() {
        let dest = MemoryDestination::new("a");

        assert_eq!(dest.send(&McRequest::get("k")).result, ReplyResult::NotFound);
        assert_eq!(
            dest.send(&McRequest::new(Operation::Replace, "k").with_value("x")).result,
            ReplyResult::NotStored
        );
        assert_eq!(
            dest.send(&McRequest::new(Operation::Add, "k").with_value("1")).result,
            ReplyResult::Stored
        );
        assert_eq!(
            dest.send(&McRequest::new(Operation::Add, "k").with_value("2")).result,
            ReplyResult::NotStored
        );
        assert_eq!(dest.send(&McRequest::get("k")), McReply::found("1"));
        assert_eq!(
            dest.send(&McRequest::new(Operation::Touch, "k")).result,
            ReplyResult::Touched
        );
        assert_eq!(dest.send(&McRequest::delete("k")).result, ReplyResult::Deleted);
        assert_eq!(dest.send(&McRequest::delete("k")).result, ReplyResult::NotFound);
        assert!(dest.is_empty());
        assert_eq!(dest.request_count(), 8);
    }

    #[test]
    fn test_down_destination() {
        let dest = MemoryDestination::new("a");
        dest.set_down(true);

        let reply = dest.send(&McRequest::set("k", "v"));
        assert_eq!(reply.result, ReplyResult::ConnectError);
        assert!(dest.is_empty());

        dest.set_down(false);
        assert_eq!(dest.send(&McRequest::set("k", "v")).result, ReplyResult::Stored);
    }

    #[test]
    fn test_expired_values_are_dropped() {
        let dest = MemoryDestination::new("a");
        dest.send(&McRequest::set("short", "v").with_exptime(1));
        dest.send(&McRequest::set("forever", "v"));
        dest.send(&McRequest::set("touched", "v").with_exptime(1));
        dest.send(&McRequest::new(Operation::Touch, "touched").with_exptime(0));

        std::thread::sleep(Duration::from_millis(1100));

        assert_eq!(dest.send(&McRequest::get("short")).result, ReplyResult::NotFound);
        assert_eq!(dest.send(&McRequest::get("forever")), McReply::found("v"));
        assert_eq!(dest.send(&McRequest::get("touched")), McReply::found("v"));
        assert_eq!(
            dest.send(&McRequest::new(Operation::Add, "short").with_value("w")).result,
            ReplyResult::Stored
        );
    }
}
