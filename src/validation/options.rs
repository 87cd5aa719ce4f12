//! Thresholds for advisory checks
//!
//! These only decide when a warning is emitted. Hard format limits are
//! fixed and cannot be configured.

/// Pixel count above which a "very high resolution" warning is emitted
pub const DEFAULT_MAX_PIXEL_COUNT: u64 = 100_000_000;

/// DPI above which a "very high resolution" warning is emitted
pub const DEFAULT_HIGH_DPI: f64 = 2400.0;

/// SVG element count above which a complexity warning is emitted
pub const DEFAULT_MAX_SVG_ELEMENTS: usize = 100_000;

/// Options for advisory validation rules
///
/// # Example
///
/// ```rust
/// use tilemeta::validation::ValidationOptions;
///
/// let options = ValidationOptions::default().max_pixel_count(16_777_216);
/// assert_eq!(options.max_pixel_count, 16_777_216);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationOptions {
    /// Warn when `width × height` exceeds this
    pub max_pixel_count: u64,
    /// Warn when horizontal or vertical resolution exceeds this (DPI)
    pub high_dpi: f64,
    /// Warn when an SVG document has more elements than this
    pub max_svg_elements: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_pixel_count: DEFAULT_MAX_PIXEL_COUNT,
            high_dpi: DEFAULT_HIGH_DPI,
            max_svg_elements: DEFAULT_MAX_SVG_ELEMENTS,
        }
    }
}

impl ValidationOptions {
    /// Set the pixel count warning threshold.
    pub fn max_pixel_count(mut self, pixels: u64) -> Self {
        self.max_pixel_count = pixels;
        self
    }

    /// Set the DPI warning threshold.
    pub fn high_dpi(mut self, dpi: f64) -> Self {
        self.high_dpi = dpi;
        self
    }

    /// Set the SVG element count warning threshold.
    pub fn max_svg_elements(mut self, elements: usize) -> Self {
        self.max_svg_elements = elements;
        self
    }
}
