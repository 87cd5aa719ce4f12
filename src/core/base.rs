//! Fields shared by every format record
//!
//! [`MetadataCore`] is embedded by value in each format's record rather
//! than inherited, so every record owns its common fields directly.

use chrono::{DateTime, Utc};

use crate::core::size::SizeEstimate;

/// Unit for horizontal/vertical resolution values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionUnit {
    /// Aspect ratio only, no absolute unit
    None,
    /// Dots per inch
    #[default]
    Inch,
    /// Dots per centimetre
    Centimeter,
}

impl ResolutionUnit {
    /// Convert a resolution value to dots per inch
    ///
    /// Returns `None` for [`ResolutionUnit::None`], which has no absolute
    /// scale.
    pub fn to_dpi(&self, value: f64) -> Option<f64> {
        match self {
            ResolutionUnit::None => None,
            ResolutionUnit::Inch => Some(value),
            ResolutionUnit::Centimeter => Some(value * 2.54),
        }
    }
}

/// Common descriptive fields for an image
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetadataCore {
    /// Width in pixels (signed so invalid values stay representable)
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Author / artist
    pub author: Option<String>,
    /// Image description
    pub description: Option<String>,
    /// Producing software
    pub software: Option<String>,
    /// Copyright notice
    pub copyright: Option<String>,
    /// When the image was created
    pub creation_time: Option<DateTime<Utc>>,
    /// When the image was last modified
    pub modification_time: Option<DateTime<Utc>>,
}

impl MetadataCore {
    /// Create a core with the given dimensions
    pub fn with_dimensions(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Total pixel count, zero when either dimension is not positive
    pub fn pixel_count(&self) -> u64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as u64 * self.height as u64
    }

    /// Estimated bytes held by the string fields
    pub fn estimated_size(&self) -> u64 {
        SizeEstimate::new()
            .string(self.author.as_deref())
            .string(self.description.as_deref())
            .string(self.software.as_deref())
            .string(self.copyright.as_deref())
            .finish()
    }

    /// Reset every field to its default
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_size_counts_strings() {
        let mut core = MetadataCore::with_dimensions(256, 256);
        assert_eq!(core.estimated_size(), 0);
        core.author = Some("OSM".to_string());
        core.software = Some("tiler".to_string());
        assert_eq!(core.estimated_size(), 8);
    }

    #[test]
    fn test_pixel_count() {
        assert_eq!(MetadataCore::with_dimensions(256, 512).pixel_count(), 131_072);
        assert_eq!(MetadataCore::with_dimensions(-1, 512).pixel_count(), 0);
    }

    #[test]
    fn test_resolution_unit_to_dpi() {
        assert_eq!(ResolutionUnit::Inch.to_dpi(300.0), Some(300.0));
        assert_eq!(ResolutionUnit::Centimeter.to_dpi(100.0), Some(254.0));
        assert_eq!(ResolutionUnit::None.to_dpi(72.0), None);
    }

    #[test]
    fn test_clear() {
        let mut core = MetadataCore::with_dimensions(10, 10);
        core.creation_time = Some(Utc::now());
        core.clear();
        assert_eq!(core, MetadataCore::default());
    }
}
