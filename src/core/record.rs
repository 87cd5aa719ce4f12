//! The contract every format record implements
//!
//! A record knows how to estimate its own footprint and how to clear
//! itself one [`FieldGroup`] at a time. The group granularity is what lets
//! [`LifecycleController::dispose_async`](crate::lifecycle::LifecycleController::dispose_async)
//! yield between groups; synchronous disposal simply clears every group in
//! order.

use std::fmt;

use crate::core::base::MetadataCore;
use crate::core::format::ImageFormat;
use crate::lifecycle::config::LARGE_METADATA_THRESHOLD;

/// Groups of fields cleared together during disposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// ICC color profile
    IccProfile,
    /// Raw EXIF payload, decoded EXIF scalars, custom EXIF tags, thumbnail
    Exif,
    /// XMP payload or XMP tag map
    Xmp,
    /// Remaining maps and sequences (IPTC, custom tags, frames, strips, ...)
    Collections,
    /// Every remaining field, back to the format defaults
    Scalars,
}

impl FieldGroup {
    /// Fixed clearing order
    pub const ORDER: [FieldGroup; 5] = [
        FieldGroup::IccProfile,
        FieldGroup::Exif,
        FieldGroup::Xmp,
        FieldGroup::Collections,
        FieldGroup::Scalars,
    ];

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            FieldGroup::IccProfile => "icc-profile",
            FieldGroup::Exif => "exif",
            FieldGroup::Xmp => "xmp",
            FieldGroup::Collections => "collections",
            FieldGroup::Scalars => "scalars",
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for format-specific metadata records
///
/// Implementations must keep [`estimated_size`](Self::estimated_size)
/// pure and must leave the record equal to its `Default` once every group
/// has been cleared and no frames remain.
pub trait MetadataRecord: Send + Sync {
    /// The format this record describes
    fn format(&self) -> ImageFormat;

    /// Shared descriptive fields
    fn core(&self) -> &MetadataCore;

    /// Shared descriptive fields, mutable
    fn core_mut(&mut self) -> &mut MetadataCore;

    /// Approximate in-memory footprint in bytes
    ///
    /// Recomputed on every call.
    fn estimated_size(&self) -> u64;

    /// Part of [`estimated_size`](Self::estimated_size) that remains after
    /// disposal (directory layout cost and similar)
    fn fixed_overhead(&self) -> u64 {
        0
    }

    /// Clear one group of fields
    fn clear_group(&mut self, group: FieldGroup);

    /// Number of elements in the record's batched sequence (animation frames)
    fn frame_count(&self) -> usize {
        0
    }

    /// Drop up to `max` frames from the end of the batched sequence
    ///
    /// # Returns
    ///
    /// The number of frames dropped
    fn clear_frames(&mut self, _max: usize) -> usize {
        0
    }

    /// Clear every field, in [`FieldGroup::ORDER`]
    fn clear_all(&mut self) {
        for group in FieldGroup::ORDER {
            self.clear_group(group);
        }
    }

    /// Whether the estimate exceeds [`LARGE_METADATA_THRESHOLD`]
    fn has_large_metadata(&self) -> bool {
        self.estimated_size() > LARGE_METADATA_THRESHOLD
    }
}

/// Remove up to `max` trailing elements from `items`
///
/// Frees the allocation once the vector is empty.
pub(crate) fn truncate_tail<T>(items: &mut Vec<T>, max: usize) -> usize {
    let removed = max.min(items.len());
    items.truncate(items.len() - removed);
    if items.is_empty() {
        *items = Vec::new();
    }
    removed
}
