//! Metadata core module
//!
//! This module contains the building blocks shared by every format record:
//! the common fields, the record contract, size estimation and the error
//! type.

pub mod base;
pub mod clamped;
pub mod error;
pub mod exif;
pub mod format;
pub mod frame;
pub mod record;
pub mod size;

pub use base::{MetadataCore, ResolutionUnit};
pub use clamped::{Clamped, CompressionLevel, Quality};
pub use error::{MetaError, MetaResult};
pub use exif::ExifFields;
pub use format::ImageFormat;
pub use frame::{AnimationFrame, BlendMethod, DisposalMethod};
pub use record::{FieldGroup, MetadataRecord};
pub use size::SizeEstimate;
