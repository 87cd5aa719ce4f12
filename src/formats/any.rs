//! A closed union over the enabled format records
//!
//! [`AnyRecord`] lets callers hold records of different formats in one
//! collection, or hand any of them to a
//! [`LifecycleController`](crate::lifecycle::LifecycleController), without
//! trait objects.

use crate::core::base::MetadataCore;
use crate::core::error::{MetaError, MetaResult};
use crate::core::format::ImageFormat;
use crate::core::record::{FieldGroup, MetadataRecord};
use crate::validation::{Validate, ValidationOptions, ValidationReport};

/// Any enabled format record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "format", content = "record"))]
pub enum AnyRecord {
    #[cfg(feature = "jpeg")]
    Jpeg(crate::formats::jpeg::JpegMetadata),
    #[cfg(feature = "png")]
    Png(crate::formats::png::PngMetadata),
    #[cfg(feature = "svg")]
    Svg(crate::formats::svg::SvgMetadata),
    #[cfg(feature = "tiff")]
    Tiff(crate::formats::tiff::TiffMetadata),
    #[cfg(feature = "webp")]
    Webp(crate::formats::webp::WebpMetadata),
}

macro_rules! dispatch {
    ($self:expr, $record:ident => $body:expr) => {
        match $self {
            #[cfg(feature = "jpeg")]
            AnyRecord::Jpeg($record) => $body,
            #[cfg(feature = "png")]
            AnyRecord::Png($record) => $body,
            #[cfg(feature = "svg")]
            AnyRecord::Svg($record) => $body,
            #[cfg(feature = "tiff")]
            AnyRecord::Tiff($record) => $body,
            #[cfg(feature = "webp")]
            AnyRecord::Webp($record) => $body,
        }
    };
}

impl AnyRecord {
    /// Create a default record of `format` with the given dimensions
    ///
    /// # Errors
    ///
    /// [`MetaError::Unsupported`] when the format's feature is disabled.
    pub fn new(format: ImageFormat, width: i32, height: i32) -> MetaResult<Self> {
        match format {
            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => Ok(AnyRecord::Jpeg(crate::formats::jpeg::JpegMetadata::new(
                width, height,
            ))),
            #[cfg(feature = "png")]
            ImageFormat::Png => Ok(AnyRecord::Png(crate::formats::png::PngMetadata::new(
                width, height,
            ))),
            #[cfg(feature = "svg")]
            ImageFormat::Svg => Ok(AnyRecord::Svg(crate::formats::svg::SvgMetadata::new(
                width, height,
            ))),
            #[cfg(feature = "tiff")]
            ImageFormat::Tiff => Ok(AnyRecord::Tiff(crate::formats::tiff::TiffMetadata::new(
                width, height,
            ))),
            #[cfg(feature = "webp")]
            ImageFormat::Webp => Ok(AnyRecord::Webp(crate::formats::webp::WebpMetadata::new(
                width, height,
            ))),
            #[allow(unreachable_patterns)]
            other => Err(MetaError::Unsupported(format!(
                "{} support is not enabled",
                other
            ))),
        }
    }

    /// Create a default record for a file extension such as `"tif"`
    ///
    /// # Errors
    ///
    /// [`MetaError::Unsupported`] for unknown extensions or disabled formats.
    pub fn for_extension(extension: &str, width: i32, height: i32) -> MetaResult<Self> {
        let format = ImageFormat::from_extension(extension).ok_or_else(|| {
            MetaError::Unsupported(format!("Unknown image extension: {}", extension))
        })?;
        Self::new(format, width, height)
    }
}

impl MetadataRecord for AnyRecord {
    fn format(&self) -> ImageFormat {
        dispatch!(self, r => r.format())
    }

    fn core(&self) -> &MetadataCore {
        dispatch!(self, r => r.core())
    }

    fn core_mut(&mut self) -> &mut MetadataCore {
        dispatch!(self, r => r.core_mut())
    }

    fn estimated_size(&self) -> u64 {
        dispatch!(self, r => r.estimated_size())
    }

    fn fixed_overhead(&self) -> u64 {
        dispatch!(self, r => r.fixed_overhead())
    }

    fn clear_group(&mut self, group: FieldGroup) {
        dispatch!(self, r => r.clear_group(group))
    }

    fn frame_count(&self) -> usize {
        dispatch!(self, r => r.frame_count())
    }

    fn clear_frames(&mut self, max: usize) -> usize {
        dispatch!(self, r => r.clear_frames(max))
    }
}

impl Validate for AnyRecord {
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        dispatch!(self, r => r.validate_with(options))
    }
}

#[cfg(feature = "jpeg")]
impl From<crate::formats::jpeg::JpegMetadata> for AnyRecord {
    fn from(record: crate::formats::jpeg::JpegMetadata) -> Self {
        AnyRecord::Jpeg(record)
    }
}

#[cfg(feature = "png")]
impl From<crate::formats::png::PngMetadata> for AnyRecord {
    fn from(record: crate::formats::png::PngMetadata) -> Self {
        AnyRecord::Png(record)
    }
}

#[cfg(feature = "svg")]
impl From<crate::formats::svg::SvgMetadata> for AnyRecord {
    fn from(record: crate::formats::svg::SvgMetadata) -> Self {
        AnyRecord::Svg(record)
    }
}

#[cfg(feature = "tiff")]
impl From<crate::formats::tiff::TiffMetadata> for AnyRecord {
    fn from(record: crate::formats::tiff::TiffMetadata) -> Self {
        AnyRecord::Tiff(record)
    }
}

#[cfg(feature = "webp")]
impl From<crate::formats::webp::WebpMetadata> for AnyRecord {
    fn from(record: crate::formats::webp::WebpMetadata) -> Self {
        AnyRecord::Webp(record)
    }
}
