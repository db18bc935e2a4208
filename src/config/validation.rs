//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Destination names unique and non-empty
//! - Codec ids unique and contiguous, options in range
//! - Exactly one route source
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Route tree structure is checked by the factory, not here

use std::collections::HashSet;

use thiserror::Error;

use crate::compression::CodecType;
use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("destination name must not be empty")]
    EmptyDestinationName,

    #[error("duplicate destination: {0}")]
    DuplicateDestination(String),

    #[error("duplicate codec id: {0}")]
    DuplicateCodecId(u32),

    #[error("codec ids must be contiguous, {count} codecs span {smallest}..={largest}")]
    NonContiguousCodecIds {
        smallest: u32,
        largest: u32,
        count: usize,
    },

    #[error("codec {0}: zlib codecs do not support dictionaries")]
    ZlibDictionary(u32),

    #[error("codec {id}: compression_level {level} is out of range 0-9")]
    CompressionLevel { id: u32, level: u32 },

    #[error("codec {id}: min_compression_threshold {min} exceeds max_compression_threshold {max}")]
    CompressionThresholds { id: u32, min: usize, max: usize },

    #[error("no route configured, set route or route_file")]
    MissingRoute,

    #[error("route and route_file are mutually exclusive")]
    ConflictingRoute,
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for dest in &config.destinations {
        if dest.name.is_empty() {
            errors.push(ValidationError::EmptyDestinationName);
        } else if !names.insert(dest.name.as_str()) {
            errors.push(ValidationError::DuplicateDestination(dest.name.clone()));
        }
    }

    let mut ids = HashSet::new();
    for codec in &config.codecs {
        if !ids.insert(codec.id) {
            errors.push(ValidationError::DuplicateCodecId(codec.id));
        }
        if codec.codec_type == CodecType::Zlib && !codec.dictionary.is_empty() {
            errors.push(ValidationError::ZlibDictionary(codec.id));
        }
        if codec.options.compression_level > 9 {
            errors.push(ValidationError::CompressionLevel {
                id: codec.id,
                level: codec.options.compression_level,
            });
        }
        if codec.options.min_compression_threshold > codec.options.max_compression_threshold {
            errors.push(ValidationError::CompressionThresholds {
                id: codec.id,
                min: codec.options.min_compression_threshold,
                max: codec.options.max_compression_threshold,
            });
        }
    }
    if let (Some(&smallest), Some(&largest)) = (ids.iter().min(), ids.iter().max()) {
        if u64::from(largest - smallest) + 1 != ids.len() as u64 {
            errors.push(ValidationError::NonContiguousCodecIds {
                smallest,
                largest,
                count: ids.len(),
            });
        }
    }

    match (&config.route, &config.route_file) {
        (None, None) => errors.push(ValidationError::MissingRoute),
        (Some(_), Some(_)) => errors.push(ValidationError::ConflictingRoute),
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
