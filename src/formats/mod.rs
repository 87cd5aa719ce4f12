//! Format records
//!
//! Each format record embeds a [`MetadataCore`](crate::core::MetadataCore)
//! and implements [`MetadataRecord`](crate::core::MetadataRecord) and
//! [`Validate`](crate::validation::Validate). Formats are gated by Cargo
//! features of the same name.

#[cfg(any(
    feature = "jpeg",
    feature = "png",
    feature = "svg",
    feature = "tiff",
    feature = "webp"
))]
pub mod any;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;
#[cfg(feature = "svg")]
pub mod svg;
#[cfg(feature = "tiff")]
pub mod tiff;
#[cfg(feature = "webp")]
pub mod webp;

#[cfg(any(
    feature = "jpeg",
    feature = "png",
    feature = "svg",
    feature = "tiff",
    feature = "webp"
))]
pub use any::AnyRecord;
#[cfg(feature = "jpeg")]
pub use jpeg::JpegMetadata;
#[cfg(feature = "png")]
pub use png::PngMetadata;
#[cfg(feature = "svg")]
pub use svg::SvgMetadata;
#[cfg(feature = "tiff")]
pub use tiff::TiffMetadata;
#[cfg(feature = "webp")]
pub use webp::WebpMetadata;
