//! Compression codecs.
//!
//! # Responsibilities
//! - Describe a codec (type, dictionary, options)
//! - Build codec instances from their description
//! - Compress / uncompress payloads with per-instance scratch state
//!
//! # Design Decisions
//! - Compressor and decompressor streams are reused between calls (RefCell),
//!   which makes codecs Send but not Sync
//! - Dictionaries only apply to raw deflate streams
//! - Uncompress takes the expected length from the wire and checks it

use std::cell::RefCell;
use std::fmt;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};

use crate::compression::error::CodecError;

/// Supported codec algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecType {
    /// Raw deflate stream, optional preset dictionary.
    Deflate,
    /// Deflate with zlib header and checksum.
    Zlib,
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecType::Deflate => f.write_str("deflate"),
            CodecType::Zlib => f.write_str("zlib"),
        }
    }
}

/// Tuning knobs of a codec.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Compression level (0-9).
    pub compression_level: u32,

    /// Payloads smaller than this are sent uncompressed.
    pub min_compression_threshold: usize,

    /// Payloads larger than this are sent uncompressed.
    pub max_compression_threshold: usize,

    /// Disabled codecs can still decompress but are never chosen to compress.
    pub enabled: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            compression_level: 6,
            min_compression_threshold: 0,
            max_compression_threshold: usize::MAX,
            enabled: true,
        }
    }
}

/// Configuration of one codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub id: u32,
    pub codec_type: CodecType,
    pub dictionary: Vec<u8>,
    pub options: CodecOptions,
}

impl CodecConfig {
    pub fn new(id: u32, codec_type: CodecType) -> Self {
        Self {
            id,
            codec_type,
            dictionary: Vec::new(),
            options: CodecOptions::default(),
        }
    }

    pub fn with_dictionary(mut self, dictionary: impl Into<Vec<u8>>) -> Self {
        self.dictionary = dictionary.into();
        self
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }
}

/// A stateful compressor/decompressor. Not safe for concurrent use.
pub trait CompressionCodec: Send + fmt::Debug {
    fn id(&self) -> u32;

    fn codec_type(&self) -> CodecType;

    fn options(&self) -> &CodecOptions;

    /// Compress `data`.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Uncompress `data`, which must expand to exactly `uncompressed_len` bytes.
    fn uncompress(&self, data: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, CodecError>;

    /// Whether a payload of `len` bytes should go through this codec.
    fn should_compress(&self, len: usize) -> bool {
        let options = self.options();
        options.enabled
            && len >= options.min_compression_threshold
            && len <= options.max_compression_threshold
    }
}

/// Build a codec instance from its configuration.
pub fn create_codec(config: &CodecConfig) -> Result<Box<dyn CompressionCodec>, CodecError> {
    Ok(Box::new(FlateCodec::new(config)?))
}

/// Deflate-family codec backed by flate2 streams.
struct FlateCodec {
    id: u32,
    codec_type: CodecType,
    dictionary: Vec<u8>,
    options: CodecOptions,
    compressor: RefCell<Compress>,
    decompressor: RefCell<Decompress>,
}

impl FlateCodec {
    fn new(config: &CodecConfig) -> Result<Self, CodecError> {
        let level = config.options.compression_level;
        if level > 9 {
            return Err(CodecError::InvalidLevel { id: config.id, level });
        }

        let zlib_header = match config.codec_type {
            CodecType::Deflate => false,
            CodecType::Zlib => {
                if !config.dictionary.is_empty() {
                    return Err(CodecError::DictionaryUnsupported {
                        id: config.id,
                        codec_type: config.codec_type,
                    });
                }
                true
            }
        };

        let codec = Self {
            id: config.id,
            codec_type: config.codec_type,
            dictionary: config.dictionary.clone(),
            options: config.options.clone(),
            compressor: RefCell::new(Compress::new(Compression::new(level), zlib_header)),
            decompressor: RefCell::new(Decompress::new(zlib_header)),
        };

        if !codec.dictionary.is_empty() {
            codec
                .compressor
                .borrow_mut()
                .set_dictionary(&codec.dictionary)
                .map_err(|e| CodecError::Dictionary {
                    id: codec.id,
                    reason: e.to_string(),
                })?;
        }

        Ok(codec)
    }

    fn zlib_header(&self) -> bool {
        self.codec_type == CodecType::Zlib
    }
}

impl fmt::Debug for FlateCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlateCodec")
            .field("id", &self.id)
            .field("codec_type", &self.codec_type)
            .field("dictionary_len", &self.dictionary.len())
            .field("options", &self.options)
            .finish()
    }
}

impl CompressionCodec for FlateCodec {
    fn id(&self) -> u32 {
        self.id
    }

    fn codec_type(&self) -> CodecType {
        self.codec_type
    }

    fn options(&self) -> &CodecOptions {
        &self.options
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut compressor = self.compressor.borrow_mut();
        compressor.reset();
        if !self.dictionary.is_empty() {
            compressor
                .set_dictionary(&self.dictionary)
                .map_err(|e| CodecError::Compress(e.to_string()))?;
        }

        let mut out = Vec::with_capacity(data.len() / 2 + 64);
        loop {
            let consumed = compressor.total_in() as usize;
            let status = compressor
                .compress_vec(&data[consumed..], &mut out, FlushCompress::Finish)
                .map_err(|e| CodecError::Compress(e.to_string()))?;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => out.reserve(out.capacity().max(64)),
            }
        }
        Ok(out)
    }

    fn uncompress(&self, data: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, CodecError> {
        let mut decompressor = self.decompressor.borrow_mut();
        decompressor.reset(self.zlib_header());
        if !self.dictionary.is_empty() {
            decompressor
                .set_dictionary(&self.dictionary)
                .map_err(|e| CodecError::Decompress(e.to_string()))?;
        }

        // One spare byte so oversized payloads show up as a length mismatch.
        let limit = uncompressed_len
            .checked_add(1)
            .ok_or(CodecError::LengthMismatch {
                expected: uncompressed_len,
                actual: 0,
            })?;

        // The expected length comes from the wire; grow towards it instead of trusting it.
        let mut out = Vec::with_capacity(limit.min(data.len().saturating_mul(4).saturating_add(64)));
        let status = loop {
            let consumed = decompressor.total_in() as usize;
            let status = decompressor
                .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
                .map_err(|e| CodecError::Decompress(e.to_string()))?;

            if status == Status::StreamEnd || out.len() >= limit || out.len() < out.capacity() {
                break status;
            }
            out.reserve((limit - out.len()).min(out.capacity().max(64)));
        };

        if status != Status::StreamEnd || out.len() != uncompressed_len {
            return Err(CodecError::LengthMismatch {
                expected: uncompressed_len,
                actual: out.len(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Vec<u8> {
        b"cache value with plenty of repetition, repetition, repetition"
            .iter()
            .cycle()
            .take(4096)
            .copied()
            .collect()
    }

    #[test]
    fn test_deflate_compress_uncompress() {
        let codec = create_codec(&CodecConfig::new(1, CodecType::Deflate)).unwrap();
        let data = payload();

        let compressed = codec.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(codec.uncompress(&compressed, data.len()).unwrap(), data);

        // Streams are reset between calls.
        let again = codec.compress(&data).unwrap();
        assert_eq!(again, compressed);
    }

    #[test]
    fn test_dictionary_codec() {
        let dictionary = b"cache value with plenty of repetition".to_vec();
        let codec = create_codec(
            &CodecConfig::new(2, CodecType::Deflate).with_dictionary(dictionary),
        )
        .unwrap();
        let data = payload();

        let compressed = codec.compress(&data).unwrap();
        assert_eq!(codec.uncompress(&compressed, data.len()).unwrap(), data);
    }

    #[test]
    fn test_zlib_rejects_dictionary() {
        let err = create_codec(&CodecConfig::new(3, CodecType::Zlib).with_dictionary("dict"))
            .unwrap_err();
        assert!(matches!(err, CodecError::DictionaryUnsupported { id: 3, .. }));
    }

    #[test]
    fn test_invalid_level() {
        let options = CodecOptions {
            compression_level: 12,
            ..CodecOptions::default()
        };
        let err = create_codec(&CodecConfig::new(4, CodecType::Zlib).with_options(options))
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidLevel { id: 4, level: 12 }));
    }

    #[test]
    fn test_length_mismatch() {
        let codec = create_codec(&CodecConfig::new(5, CodecType::Zlib)).unwrap();
        let data = payload();
        let compressed = codec.compress(&data).unwrap();

        assert!(matches!(
            codec.uncompress(&compressed, data.len() - 1),
            Err(CodecError::LengthMismatch { .. })
        ));
        assert_eq!(codec.uncompress(&compressed, data.len()).unwrap(), data);
    }

    #[test]
    fn test_uncompress_rejects_untrusted_lengths() {
        let codec = create_codec(&CodecConfig::new(6, CodecType::Deflate)).unwrap();
        let compressed = codec.compress(b"hello hello hello").unwrap();

        assert!(matches!(
            codec.uncompress(&compressed, usize::MAX),
            Err(CodecError::LengthMismatch { expected: usize::MAX, .. })
        ));
        assert!(matches!(
            codec.uncompress(&compressed, 1 << 40),
            Err(CodecError::LengthMismatch { actual: 17, .. })
        ));
        assert_eq!(codec.uncompress(&compressed, 17).unwrap(), b"hello hello hello");
    }

    #[test]
    fn test_uncompress_grows_output() {
        let codec = create_codec(&CodecConfig::new(7, CodecType::Zlib)).unwrap();
        let data = vec![b'x'; 1 << 20];
        let compressed = codec.compress(&data).unwrap();
        assert!(compressed.len() * 4 + 64 < data.len());

        assert_eq!(codec.uncompress(&compressed, data.len()).unwrap(), data);
    }

    #[test]
    fn test_compression_thresholds() {
        let options = CodecOptions {
            min_compression_threshold: 100,
            max_compression_threshold: 1000,
            ..CodecOptions::default()
        };
        let codec = create_codec(&CodecConfig::new(6, CodecType::Deflate).with_options(options))
            .unwrap();

        assert!(!codec.should_compress(99));
        assert!(codec.should_compress(100));
        assert!(codec.should_compress(1000));
        assert!(!codec.should_compress(1001));
    }
}
