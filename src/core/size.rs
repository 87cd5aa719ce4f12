//! In-memory size estimation
//!
//! Records compute their footprint by feeding their fields into a
//! [`SizeEstimate`]. The estimate is approximate and recomputed on every
//! call; nothing is cached.
//!
//! # Example
//!
//! ```rust
//! use tilemeta::core::size::SizeEstimate;
//!
//! let bytes = SizeEstimate::new()
//!     .string(Some("Jane Doe"))
//!     .blob(&[0u8; 128])
//!     .finish();
//! assert_eq!(bytes, 136);
//! ```

use std::collections::BTreeMap;
use std::mem::size_of;

use crate::core::frame::AnimationFrame;
use crate::types::TagValue;

/// Per-entry overhead for integer-keyed tag maps (one IFD entry)
pub const TAG_ENTRY_OVERHEAD: u64 = 12;

/// Per-entry overhead for string-keyed maps
pub const STRING_ENTRY_OVERHEAD: u64 = 16;

/// Fixed header cost per animation frame
pub const FRAME_HEADER_SIZE: u64 = 24;

/// Accumulator for estimated byte sizes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    total: u64,
}

impl SizeEstimate {
    /// Start an empty estimate
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the UTF-8 length of an optional string
    pub fn string(mut self, value: Option<&str>) -> Self {
        if let Some(s) = value {
            self.total += s.len() as u64;
        }
        self
    }

    /// Add the length of a binary blob
    pub fn blob(mut self, data: &[u8]) -> Self {
        self.total += data.len() as u64;
        self
    }

    /// Add `count × element width` for a numeric sequence
    pub fn numbers<T: Copy>(mut self, values: &[T]) -> Self {
        self.total += (values.len() * size_of::<T>()) as u64;
        self
    }

    /// Add a string-keyed map: entry overhead plus key and value lengths
    pub fn string_map(mut self, map: &BTreeMap<String, String>) -> Self {
        for (key, value) in map {
            self.total += STRING_ENTRY_OVERHEAD + key.len() as u64 + value.len() as u64;
        }
        self
    }

    /// Add an integer-keyed tag map: entry overhead plus serialized value size
    pub fn tag_map(mut self, map: &BTreeMap<u16, TagValue>) -> Self {
        for value in map.values() {
            self.total += TAG_ENTRY_OVERHEAD + value.byte_size();
        }
        self
    }

    /// Add a sequence of animation frames: header plus pixel payload each
    pub fn frames(mut self, frames: &[AnimationFrame]) -> Self {
        for frame in frames {
            self.total += FRAME_HEADER_SIZE + frame.pixel_data.len() as u64;
        }
        self
    }

    /// Add a fixed number of bytes
    pub fn fixed(mut self, bytes: u64) -> Self {
        self.total += bytes;
        self
    }

    /// Total estimated bytes
    pub fn finish(self) -> u64 {
        self.total
    }
}
