//! # tilemeta
//!
//! A typed in-memory model of image metadata for map-tile pipelines.
//!
//! Every supported format (JPEG, TIFF/GeoTIFF, WebP, PNG/APNG and SVG) has
//! its own record type. All records share three capabilities:
//!
//! - **Size accounting**: [`MetadataRecord::estimated_size`] approximates the
//!   in-memory footprint of the record
//! - **Tiered disposal**: [`LifecycleController`] clears small records at
//!   once and large ones in cooperative batches that can be cancelled
//! - **Validation**: [`Validate::validate`] checks the record against its
//!   format's rules and reports errors and warnings
//!
//! ## Example
//!
//! ```rust
//! use tilemeta::formats::jpeg::{JpegColorMode, JpegMetadata};
//! use tilemeta::{MetadataRecord, Validate};
//!
//! let mut jpeg = JpegMetadata::new(256, 256);
//! jpeg.color_mode = JpegColorMode::Rgb;
//! jpeg.samples_per_pixel = 1;
//!
//! let report = jpeg.validate();
//! assert!(!report.is_valid());
//! assert_eq!(
//!     report.errors(),
//!     vec!["Invalid samples per pixel: 1. Expected 3 for Rgb color mode."]
//! );
//! assert!(!jpeg.has_large_metadata());
//! ```
//!
//! ## Features
//!
//! - `jpeg`, `png`, `svg`, `tiff`, `webp`: individual format records
//! - `full-formats` (default): all of the above
//! - `serde`: `Serialize`/`Deserialize` for records and reports

pub mod core;
pub mod formats;
pub mod lifecycle;
pub mod types;
pub mod validation;

pub use crate::core::{
    AnimationFrame, BlendMethod, Clamped, CompressionLevel, DisposalMethod, ExifFields,
    FieldGroup, ImageFormat, MetaError, MetaResult, MetadataCore, MetadataRecord, Quality,
    ResolutionUnit, SizeEstimate,
};
#[cfg(any(
    feature = "jpeg",
    feature = "png",
    feature = "svg",
    feature = "tiff",
    feature = "webp"
))]
pub use formats::AnyRecord;
pub use lifecycle::{
    CancelToken, DisposalConfig, DisposalOutcome, DisposalTier, LifecycleController,
    LifecycleState,
};
pub use types::TagValue;
pub use validation::{
    validate_record, Issue, Severity, Validate, ValidationOptions, ValidationReport,
};
