//! Codec registry with one codec map per thread.
//!
//! # Responsibilities
//! - Own the codec configurations of one configuration generation
//! - Derive the contiguous id range once
//! - Hand every thread its own lazily built CodecMap
//!
//! # Design Decisions
//! - ThreadLocal storage is per registry instance, so dropping the registry
//!   drops every thread's map with it
//! - The constructing thread's map is built eagerly to surface bad configs
//! - A failed lazy build yields an empty map (uncompressed fallback)

use std::collections::HashMap;

use thread_local::ThreadLocal;

use crate::compression::codec::CodecConfig;
use crate::compression::codec_map::{CodecIdRange, CodecMap};
use crate::compression::error::CodecError;
use crate::observability::metrics;

/// Owner of codec configurations and of the per-thread codec maps.
#[derive(Debug)]
pub struct CodecManager {
    configs: HashMap<u32, CodecConfig>,
    codec_maps: ThreadLocal<CodecMap>,
    smallest_id: u32,
    size: u32,
}

impl CodecManager {
    /// Take ownership of `configs` (codec id → config).
    pub fn new(configs: HashMap<u32, CodecConfig>) -> Result<Self, CodecError> {
        let (smallest_id, size) = contiguous_range(&configs)?;
        let map = CodecMap::build(&configs, smallest_id, size)?;

        let manager = Self {
            configs,
            codec_maps: ThreadLocal::new(),
            smallest_id,
            size,
        };
        manager.codec_maps.get_or(|| map);

        tracing::info!(smallest_id, size, "Codec registry created");
        Ok(manager)
    }

    /// Build from a list of configs keyed by their own ids.
    pub fn from_configs(configs: impl IntoIterator<Item = CodecConfig>) -> Result<Self, CodecError> {
        Self::new(configs.into_iter().map(|c| (c.id, c)).collect())
    }

    /// The calling thread's codec map, built on first use.
    pub fn codec_map(&self) -> &CodecMap {
        self.codec_maps.get_or(|| self.build_codec_map())
    }

    /// Configured id range.
    pub fn id_range(&self) -> CodecIdRange {
        CodecIdRange::new(self.smallest_id, self.size)
    }

    /// Configuration of a codec.
    pub fn config(&self, id: u32) -> Option<&CodecConfig> {
        self.configs.get(&id)
    }

    fn build_codec_map(&self) -> CodecMap {
        match CodecMap::build(&self.configs, self.smallest_id, self.size) {
            Ok(map) => {
                tracing::debug!(
                    thread = ?std::thread::current().id(),
                    size = map.len(),
                    "Built codec map for thread"
                );
                metrics::record_codec_map_built(map.len());
                map
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build codec map, compression disabled on this thread");
                CodecMap::default()
            }
        }
    }
}

/// Smallest id and count of `configs`, checking the ids leave no gaps.
fn contiguous_range(configs: &HashMap<u32, CodecConfig>) -> Result<(u32, u32), CodecError> {
    if let Some((&key, config)) = configs.iter().find(|(key, config)| **key != config.id) {
        return Err(CodecError::IdMismatch { key, id: config.id });
    }

    let (Some(&smallest), Some(&largest)) = (configs.keys().min(), configs.keys().max()) else {
        return Ok((0, 0));
    };

    let span = u64::from(largest - smallest) + 1;
    if span != configs.len() as u64 {
        return Err(CodecError::NonContiguousIds {
            smallest,
            largest,
            count: configs.len(),
        });
    }

    let size = u32::try_from(span).map_err(|_| CodecError::RangeOverflow {
        first_id: smallest,
        size: u32::MAX,
    })?;
    Ok((smallest, size))
}
