//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from `proxy.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compression::{CodecConfig, CodecOptions, CodecType};

/// Root configuration of the cache router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Host id seeding backup selection. Derived from the hostname if unset.
    pub host_id: Option<u64>,

    /// Inline route tree.
    pub route: Option<serde_json::Value>,

    /// Path to a JSON file holding the route tree.
    pub route_file: Option<PathBuf>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Destinations that leaf routes may name.
    pub destinations: Vec<DestinationConfig>,

    /// Compression codecs, ids must be contiguous.
    pub codecs: Vec<CodecEntry>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// A cache server reachable by name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Name used by `DestinationRoute|<name>`.
    pub name: String,
}

/// One compression codec.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecEntry {
    /// Codec id negotiated on the wire.
    pub id: u32,

    /// Algorithm.
    pub codec_type: CodecType,

    /// Preset dictionary (deflate only).
    #[serde(default)]
    pub dictionary: String,

    /// Level, thresholds, enabled flag.
    #[serde(flatten)]
    pub options: CodecOptions,
}

impl From<&CodecEntry> for CodecConfig {
    fn from(entry: &CodecEntry) -> Self {
        CodecConfig {
            id: entry.id,
            codec_type: entry.codec_type,
            dictionary: entry.dictionary.as_bytes().to_vec(),
            options: entry.options.clone(),
        }
    }
}
