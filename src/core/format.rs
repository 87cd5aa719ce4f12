//! Image format identifiers
//!
//! [`ImageFormat`] names every format the crate models, independent of
//! which format features are compiled in.

use std::fmt;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageFormat {
    /// JPEG / JFIF
    Jpeg,
    /// PNG and animated PNG
    Png,
    /// Scalable Vector Graphics
    Svg,
    /// Tagged Image File Format (including GeoTIFF)
    Tiff,
    /// WebP (RIFF container)
    Webp,
}

impl ImageFormat {
    /// All known formats, in a stable order
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Svg,
        ImageFormat::Tiff,
        ImageFormat::Webp,
    ];

    /// A static string describing the format (e.g., "JPEG", "TIFF")
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Svg => "SVG",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Webp => "WebP",
        }
    }

    /// File extensions for this format (e.g., `&["jpg", "jpeg"]`)
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::Png => &["png", "apng"],
            ImageFormat::Svg => &["svg"],
            ImageFormat::Tiff => &["tif", "tiff"],
            ImageFormat::Webp => &["webp"],
        }
    }

    /// Find a format by file extension (case-insensitive, leading dot allowed)
    ///
    /// # Returns
    ///
    /// * `Some(ImageFormat)` if a format matches the extension
    /// * `None` otherwise
    pub fn from_extension(extension: &str) -> Option<ImageFormat> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extensions().iter().any(|e| *e == ext))
    }

    /// Maximum width/height in pixels allowed by the format, if bounded
    pub fn max_dimension(&self) -> Option<i64> {
        match self {
            ImageFormat::Jpeg | ImageFormat::Tiff => Some(65_535),
            ImageFormat::Webp => Some(16_383),
            ImageFormat::Png => Some(i32::MAX as i64),
            ImageFormat::Svg => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(".tif"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::from_extension("apng"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_max_dimension() {
        assert_eq!(ImageFormat::Jpeg.max_dimension(), Some(65_535));
        assert_eq!(ImageFormat::Webp.max_dimension(), Some(16_383));
        assert_eq!(ImageFormat::Svg.max_dimension(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ImageFormat::Webp.to_string(), "WebP");
    }
}
