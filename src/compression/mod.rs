//! Compression codec subsystem.
//!
//! # Data Flow
//! ```text
//! CodecConfig (id → type, dictionary, options)
//!     → manager.rs (owns configs, validates the id range once)
//!     → first use on a thread: codec_map.rs builds that thread's CodecMap
//!     → codec.rs instances (stateful, one set per thread)
//!     → get(id) / get_best(range) per payload
//! ```
//!
//! # Design Decisions
//! - Codecs keep scratch state and are not Sync; each thread owns its map
//! - Configuration is shared read-only, maps are never shared
//! - Ids must be contiguous so a map is a dense Vec
//! - A map is fully populated or not built at all

pub mod codec;
pub mod codec_map;
pub mod error;
pub mod manager;

pub use codec::{create_codec, CodecConfig, CodecOptions, CodecType, CompressionCodec};
pub use codec_map::{CodecIdRange, CodecMap};
pub use error::CodecError;
pub use manager::CodecManager;
