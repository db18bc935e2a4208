//! Codec errors.

use thiserror::Error;

use crate::compression::codec::CodecType;

/// Errors raised while building or using compression codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Configured ids leave gaps.
    #[error("codec ids must be contiguous: {count} ids span {smallest}..={largest}")]
    NonContiguousIds {
        smallest: u32,
        largest: u32,
        count: usize,
    },

    /// A config is stored under a key other than its own id.
    #[error("codec config for id {id} is stored under key {key}")]
    IdMismatch { key: u32, id: u32 },

    /// The requested range runs past `u32::MAX`.
    #[error("codec range starting at {first_id} with size {size} overflows")]
    RangeOverflow { first_id: u32, size: u32 },

    /// An id inside the requested range has no config.
    #[error("codec {0} is missing from the configured range")]
    MissingCodec(u32),

    #[error("codec {id}: compression level {level} is out of range 0-9")]
    InvalidLevel { id: u32, level: u32 },

    #[error("codec {id}: {codec_type} codecs do not support dictionaries")]
    DictionaryUnsupported { id: u32, codec_type: CodecType },

    #[error("codec {id}: invalid dictionary: {reason}")]
    Dictionary { id: u32, reason: String },

    #[error("compression failed: {0}")]
    Compress(String),

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("uncompressed length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
