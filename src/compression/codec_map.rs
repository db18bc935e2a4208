//! Dense map of codecs over a contiguous id range.

use std::collections::HashMap;

use crate::compression::codec::{create_codec, CodecConfig, CompressionCodec};
use crate::compression::error::CodecError;

/// Range of codec ids: `[first_id, first_id + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecIdRange {
    pub first_id: u32,
    pub size: u32,
}

impl CodecIdRange {
    pub fn new(first_id: u32, size: u32) -> Self {
        Self { first_id, size }
    }

    /// Exclusive upper bound, widened so it cannot overflow.
    fn end(&self) -> u64 {
        u64::from(self.first_id) + u64::from(self.size)
    }
}

/// Codec instances indexed by `id - first_id`.
///
/// Immutable once built. Holds stateful codecs, so it stays on the thread
/// that built it.
#[derive(Debug, Default)]
pub struct CodecMap {
    codecs: Vec<Box<dyn CompressionCodec>>,
    first_id: u32,
}

impl CodecMap {
    /// Build codecs for every id in `[smallest_id, smallest_id + size)`.
    ///
    /// Fails if any id is missing from `configs` or does not build.
    pub fn build(
        configs: &HashMap<u32, CodecConfig>,
        smallest_id: u32,
        size: u32,
    ) -> Result<Self, CodecError> {
        if size > 0 && smallest_id.checked_add(size - 1).is_none() {
            return Err(CodecError::RangeOverflow {
                first_id: smallest_id,
                size,
            });
        }

        let codecs = (0..size)
            .map(|offset| {
                let id = smallest_id + offset;
                let config = configs.get(&id).ok_or(CodecError::MissingCodec(id))?;
                create_codec(config)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            codecs,
            first_id: smallest_id,
        })
    }

    /// Codec with the given id, if this map has it.
    pub fn get(&self, id: u32) -> Option<&dyn CompressionCodec> {
        let index = id.checked_sub(self.first_id)?;
        self.codecs.get(index as usize).map(|c| &**c)
    }

    /// Highest-id codec that both this map and `range` contain.
    pub fn get_best(&self, range: CodecIdRange) -> Option<&dyn CompressionCodec> {
        let own = self.id_range();
        let lo = own.first_id.max(range.first_id);
        let hi = own.end().min(range.end());
        if u64::from(lo) >= hi {
            return None;
        }
        self.get((hi - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Ids present in this map.
    pub fn id_range(&self) -> CodecIdRange {
        CodecIdRange {
            first_id: self.first_id,
            size: self.codecs.len() as u32,
        }
    }
}
