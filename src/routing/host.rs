//! Host identity and hash chaining for deterministic target selection.

use std::hash::Hasher;
use std::sync::OnceLock;

use twox_hash::XxHash64;

static HOST_ID: OnceLock<u64> = OnceLock::new();

/// Stable identifier of this host, derived from its hostname once per process.
pub fn host_id() -> u64 {
    *HOST_ID.get_or_init(|| {
        let name = hostname();
        let id = hash_bytes(name.as_bytes());
        tracing::debug!(hostname = %name, host_id = id, "Derived host id");
        id
    })
}

/// Mix `value` into the running hash `seed`.
///
/// XXH64 over little-endian bytes, so chains are identical on every
/// platform and across restarts.
pub fn hash_combine(seed: u64, value: u64) -> u64 {
    let mut hasher = XxHash64::with_seed(seed);
    hasher.write(&value.to_le_bytes());
    hasher.finish()
}

fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

fn hostname() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    if let Ok(name) = std::fs::read_to_string("/etc/hostname") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    "localhost".to_string()
}
