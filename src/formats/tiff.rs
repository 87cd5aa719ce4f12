//! TIFF metadata record
//!
//! This module models the baseline TIFF tags of the primary IFD (0th IFD)
//! plus the GeoTIFF tags map tiles rely on.
//!
//! TIFF Metadata Storage:
//! - Every field is an IFD entry of 12 bytes (tag, type, count, value/offset)
//! - XMP is stored in Tag 700, IPTC in Tag 33723, ICC in Tag 34675
//! - EXIF lives in a sub-IFD referenced by Tag 34665
//! - GeoTIFF uses Tags 33550 (ModelPixelScale), 33922 (ModelTiepoint) and
//!   34735 (GeoKeyDirectory)

use std::collections::BTreeMap;

use smallvec::{smallvec, SmallVec};

use crate::core::base::{MetadataCore, ResolutionUnit};
use crate::core::exif::ExifFields;
use crate::core::format::ImageFormat;
use crate::core::record::{FieldGroup, MetadataRecord};
use crate::core::size::SizeEstimate;
use crate::types::TagValue;
use crate::validation::rules;
use crate::validation::{Validate, ValidationOptions, ValidationReport};

/// Size of an IFD entry in bytes
pub const IFD_ENTRY_SIZE: u64 = 12;

/// Number of baseline entries assumed in every directory
pub const BASELINE_ENTRY_COUNT: u64 = 20;

/// Directory entry count (2 bytes) plus next-IFD offset (4 bytes)
pub const IFD_HEADER_SIZE: u64 = 6;

/// Legal per-sample bit depths
pub const LEGAL_BITS_PER_SAMPLE: [u16; 5] = [1, 4, 8, 16, 32];

/// Tile dimensions must be a multiple of this
pub const TILE_ALIGNMENT: u32 = 16;

/// Uncompressed images above this pixel count draw a warning
pub const LARGE_UNCOMPRESSED_PIXELS: u64 = 4096 * 4096;

/// Standard tags a custom tag must not shadow
const STANDARD_TAGS: &[(u16, &str)] = &[
    (256, "ImageWidth"),
    (257, "ImageLength"),
    (258, "BitsPerSample"),
    (259, "Compression"),
    (262, "PhotometricInterpretation"),
    (273, "StripOffsets"),
    (277, "SamplesPerPixel"),
    (278, "RowsPerStrip"),
    (279, "StripByteCounts"),
    (284, "PlanarConfiguration"),
    (317, "Predictor"),
    (320, "ColorMap"),
    (322, "TileWidth"),
    (323, "TileLength"),
    (700, "XMP"),
    (33550, "ModelPixelScale"),
    (33723, "IPTC"),
    (33922, "ModelTiepoint"),
    (34665, "ExifIFD"),
    (34675, "ICCProfile"),
    (34735, "GeoKeyDirectory"),
];

/// Bits per sample, stored inline for up to four samples
pub type BitsPerSample = SmallVec<[u16; 4]>;

/// Total color depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TiffColorDepth {
    /// Bilevel
    OneBit,
    /// 16 levels / colors
    FourBit,
    /// 256 levels / colors
    EightBit,
    /// 16-bit grayscale
    SixteenBit,
    /// 8-bit RGB
    #[default]
    TwentyFourBit,
    /// 8-bit RGBA or CMYK, or 32-bit float grayscale
    ThirtyTwoBit,
    /// 16-bit RGB
    FortyEightBit,
    /// 16-bit RGBA or CMYK
    SixtyFourBit,
}

impl TiffColorDepth {
    /// Total bits per pixel
    pub fn bits(&self) -> u32 {
        match self {
            TiffColorDepth::OneBit => 1,
            TiffColorDepth::FourBit => 4,
            TiffColorDepth::EightBit => 8,
            TiffColorDepth::SixteenBit => 16,
            TiffColorDepth::TwentyFourBit => 24,
            TiffColorDepth::ThirtyTwoBit => 32,
            TiffColorDepth::FortyEightBit => 48,
            TiffColorDepth::SixtyFourBit => 64,
        }
    }
}

/// Compression scheme (Tag 259)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TiffCompression {
    /// No compression (1)
    None,
    /// CCITT modified Huffman RLE (2)
    CcittRle,
    /// CCITT Group 3 fax (3)
    CcittGroup3,
    /// CCITT Group 4 fax (4)
    CcittGroup4,
    /// LZW (5)
    #[default]
    Lzw,
    /// Old-style JPEG (6), deprecated
    OldJpeg,
    /// JPEG (7)
    Jpeg,
    /// Adobe Deflate (8)
    Deflate,
    /// PackBits (32773)
    PackBits,
}

impl TiffCompression {
    /// Tag value written to the IFD
    pub fn code(&self) -> u16 {
        match self {
            TiffCompression::None => 1,
            TiffCompression::CcittRle => 2,
            TiffCompression::CcittGroup3 => 3,
            TiffCompression::CcittGroup4 => 4,
            TiffCompression::Lzw => 5,
            TiffCompression::OldJpeg => 6,
            TiffCompression::Jpeg => 7,
            TiffCompression::Deflate => 8,
            TiffCompression::PackBits => 32773,
        }
    }

    /// Whether this is one of the CCITT bilevel codecs
    pub fn is_ccitt(&self) -> bool {
        matches!(
            self,
            TiffCompression::CcittRle | TiffCompression::CcittGroup3 | TiffCompression::CcittGroup4
        )
    }
}

/// Photometric interpretation (Tag 262)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Photometric {
    /// 0 is white
    WhiteIsZero,
    /// 0 is black
    BlackIsZero,
    /// RGB
    #[default]
    Rgb,
    /// Indexed through a color map
    Palette,
    /// Transparency mask
    TransparencyMask,
    /// Separated (CMYK)
    Cmyk,
    /// YCbCr
    YCbCr,
    /// CIE L*a*b*
    CieLab,
}

impl Photometric {
    /// Color samples required, not counting alpha
    pub fn base_samples(&self) -> i32 {
        match self {
            Photometric::WhiteIsZero
            | Photometric::BlackIsZero
            | Photometric::Palette
            | Photometric::TransparencyMask => 1,
            Photometric::Rgb | Photometric::YCbCr | Photometric::CieLab => 3,
            Photometric::Cmyk => 4,
        }
    }
}

/// Sample layout (Tag 284)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanarConfiguration {
    /// Samples interleaved per pixel
    #[default]
    Chunky,
    /// One plane per sample
    Planar,
}

/// Differencing predictor (Tag 317)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predictor {
    /// No prediction
    #[default]
    None,
    /// Horizontal differencing
    Horizontal,
    /// Floating point differencing
    FloatingPoint,
}

/// TIFF metadata record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TiffMetadata {
    /// Shared descriptive fields
    pub core: MetadataCore,
    /// Total color depth
    pub color_depth: TiffColorDepth,
    /// Compression scheme
    pub compression: TiffCompression,
    /// Photometric interpretation
    pub photometric: Photometric,
    /// Samples per pixel, including alpha
    pub samples_per_pixel: i32,
    /// One extra (alpha) sample follows the color samples
    pub has_alpha: bool,
    /// Bits for each sample
    pub bits_per_sample: BitsPerSample,
    /// Sample layout
    pub planar_configuration: PlanarConfiguration,
    /// Differencing predictor
    pub predictor: Predictor,
    /// Rows per strip
    pub rows_per_strip: Option<u32>,
    /// Byte offset of each strip
    pub strip_offsets: Vec<u64>,
    /// Byte count of each strip
    pub strip_byte_counts: Vec<u64>,
    /// Tile width, for tiled images
    pub tile_width: Option<u32>,
    /// Tile height, for tiled images
    pub tile_height: Option<u32>,
    /// Horizontal resolution
    pub x_resolution: Option<f64>,
    /// Vertical resolution
    pub y_resolution: Option<f64>,
    /// Unit of the resolution values
    pub resolution_unit: ResolutionUnit,
    /// Palette: all reds, then greens, then blues
    pub color_map: Vec<u16>,
    /// GeoTIFF pixel scale (ScaleX, ScaleY, ScaleZ)
    pub model_pixel_scale: Vec<f64>,
    /// GeoTIFF tiepoints, six values each (I, J, K, X, Y, Z)
    pub model_tiepoint: Vec<f64>,
    /// GeoTIFF key directory
    pub geo_key_directory: Vec<u16>,
    /// Decoded EXIF / GPS scalars
    pub exif: ExifFields,
    /// Tags without a dedicated field, by tag id
    pub custom_tags: BTreeMap<u16, TagValue>,
    /// ICC color profile
    pub icc_profile: Vec<u8>,
    /// Raw EXIF IFD payload
    pub exif_data: Vec<u8>,
    /// XMP packet
    pub xmp_data: Vec<u8>,
    /// IPTC payload
    pub iptc_data: Vec<u8>,
}

impl Default for TiffMetadata {
    fn default() -> Self {
        Self {
            core: MetadataCore::default(),
            color_depth: TiffColorDepth::TwentyFourBit,
            compression: TiffCompression::Lzw,
            photometric: Photometric::Rgb,
            samples_per_pixel: 3,
            has_alpha: false,
            bits_per_sample: smallvec![8, 8, 8],
            planar_configuration: PlanarConfiguration::Chunky,
            predictor: Predictor::None,
            rows_per_strip: None,
            strip_offsets: Vec::new(),
            strip_byte_counts: Vec::new(),
            tile_width: None,
            tile_height: None,
            x_resolution: None,
            y_resolution: None,
            resolution_unit: ResolutionUnit::Inch,
            color_map: Vec::new(),
            model_pixel_scale: Vec::new(),
            model_tiepoint: Vec::new(),
            geo_key_directory: Vec::new(),
            exif: ExifFields::default(),
            custom_tags: BTreeMap::new(),
            icc_profile: Vec::new(),
            exif_data: Vec::new(),
            xmp_data: Vec::new(),
            iptc_data: Vec::new(),
        }
    }
}

impl TiffMetadata {
    /// Create a record with format defaults and the given dimensions
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            core: MetadataCore::with_dimensions(width, height),
            ..Default::default()
        }
    }

    /// Set a uniform sample layout: photometric interpretation, optional
    /// alpha, and the same bit depth for every sample
    ///
    /// Samples per pixel and bits per sample follow from the arguments.
    /// The color depth is updated when the total matches one of the
    /// [`TiffColorDepth`] values.
    pub fn set_layout(&mut self, photometric: Photometric, has_alpha: bool, bits: u16) {
        let samples = photometric.base_samples() + has_alpha as i32;
        self.photometric = photometric;
        self.has_alpha = has_alpha;
        self.samples_per_pixel = samples;
        self.bits_per_sample = SmallVec::from_elem(bits, samples as usize);
        if let Some(depth) = depth_for_bits(samples as u32 * bits as u32) {
            self.color_depth = depth;
        }
    }

    /// Set the GeoTIFF pixel scale and a single tiepoint anchoring raster
    /// origin (0, 0) at model coordinate (`x`, `y`)
    pub fn set_georeference(&mut self, scale_x: f64, scale_y: f64, x: f64, y: f64) {
        self.model_pixel_scale = vec![scale_x, scale_y, 0.0];
        self.model_tiepoint = vec![0.0, 0.0, 0.0, x, y, 0.0];
    }

    /// Whether the image is organised in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.tile_width.is_some() || self.tile_height.is_some()
    }

    fn bits_total(&self) -> u32 {
        self.bits_per_sample.iter().map(|b| *b as u32).sum()
    }

    fn check_ranges(&self, report: &mut ValidationReport) {
        rules::check_dimensions(
            report,
            self.core.width,
            self.core.height,
            ImageFormat::Tiff.max_dimension().unwrap_or(i64::MAX),
        );
        rules::check_resolution(report, "X", self.x_resolution);
        rules::check_resolution(report, "Y", self.y_resolution);
        rules::check_exif_ranges(report, &self.exif);

        if self.rows_per_strip == Some(0) {
            report.error("Invalid rows per strip: 0. Rows per strip must be greater than 0.");
        }
        for (name, title, value) in [
            ("tile width", "Tile width", self.tile_width),
            ("tile height", "Tile height", self.tile_height),
        ] {
            if let Some(v) = value {
                if v == 0 || v % TILE_ALIGNMENT != 0 {
                    report.error(format!(
                        "Invalid {}: {}. {} must be a positive multiple of {}.",
                        name, v, title, TILE_ALIGNMENT
                    ));
                }
            }
        }
    }

    fn check_structure(&self, report: &mut ValidationReport) {
        let expected = self.photometric.base_samples() + self.has_alpha as i32;
        if self.samples_per_pixel != expected {
            let alpha = if self.has_alpha { " with alpha" } else { "" };
            report.error(format!(
                "Invalid samples per pixel: {}. Expected {} for {:?} photometric interpretation{}.",
                self.samples_per_pixel, expected, self.photometric, alpha
            ));
        }

        if self.bits_per_sample.len() as i64 != self.samples_per_pixel as i64 {
            report.error(format!(
                "Invalid bits per sample count: {}. Expected {} entries, one per sample.",
                self.bits_per_sample.len(),
                self.samples_per_pixel
            ));
        }
        for (index, bits) in self.bits_per_sample.iter().enumerate() {
            if !LEGAL_BITS_PER_SAMPLE.contains(bits) {
                report.error(format!(
                    "Invalid bits per sample value: {} at index {}. Allowed values are 1, 4, 8, 16, 32.",
                    bits, index
                ));
            }
        }
        if !self.bits_per_sample.is_empty() && self.bits_total() != self.color_depth.bits() {
            report.error(format!(
                "Bits per sample total {} does not match color depth {:?} ({} bits).",
                self.bits_total(),
                self.color_depth,
                self.color_depth.bits()
            ));
        }

        if self.strip_offsets.len() != self.strip_byte_counts.len() {
            report.error(format!(
                "Strip offsets ({}) and strip byte counts ({}) must have the same length.",
                self.strip_offsets.len(),
                self.strip_byte_counts.len()
            ));
        }
        if self.tile_width.is_some() != self.tile_height.is_some() {
            report.error("Tile width and tile height must be set together.");
        }

        if self.photometric == Photometric::Palette {
            if let Some(bits) = self.bits_per_sample.first() {
                if *bits <= 16 {
                    let expected = 3usize << *bits;
                    if self.color_map.len() != expected {
                        report.error(format!(
                            "Invalid color map size: {}. Expected {} entries for a {}-bit palette.",
                            self.color_map.len(),
                            expected,
                            bits
                        ));
                    }
                }
            }
        }

        self.check_geotiff(report);
    }

    fn check_geotiff(&self, report: &mut ValidationReport) {
        if !self.model_pixel_scale.is_empty() {
            if self.model_pixel_scale.len() != 3 {
                report.error(format!(
                    "Invalid model pixel scale: {} values. Expected 3.",
                    self.model_pixel_scale.len()
                ));
            } else if !self.model_pixel_scale[..2].iter().all(|s| s.is_finite() && *s > 0.0) {
                report.error("Invalid model pixel scale: X and Y scale must be positive.");
            }
        }
        if self.model_tiepoint.len() % 6 != 0 {
            report.error(format!(
                "Invalid model tiepoint: {} values. Expected a multiple of 6.",
                self.model_tiepoint.len()
            ));
        }
        if !self.geo_key_directory.is_empty() {
            let keys = self.geo_key_directory.get(3).copied().unwrap_or(0) as usize;
            let expected = 4 + 4 * keys;
            if self.geo_key_directory.len() < 4 || self.geo_key_directory.len() != expected {
                report.error(format!(
                    "Invalid GeoKey directory: {} values. Expected {} for {} keys.",
                    self.geo_key_directory.len(),
                    expected,
                    keys
                ));
            }
        }
    }

    fn check_coupling(&self, report: &mut ValidationReport) {
        if self.compression.is_ccitt()
            && (self.samples_per_pixel != 1 || self.bits_per_sample.as_slice() != [1u16])
        {
            report.error(format!(
                "{:?} compression requires a bilevel image (1 sample of 1 bit).",
                self.compression
            ));
        }
        if self.compression == TiffCompression::Jpeg
            && self.bits_per_sample.iter().any(|b| *b != 8)
        {
            report.error("JPEG compression requires 8 bits per sample.");
        }
        if self.predictor == Predictor::FloatingPoint
            && self.bits_per_sample.iter().any(|b| *b != 16 && *b != 32)
        {
            report.error("Floating point predictor requires 16 or 32 bits per sample.");
        }
    }

    fn check_advisory(&self, report: &mut ValidationReport, options: &ValidationOptions) {
        if self.predictor != Predictor::None
            && !matches!(
                self.compression,
                TiffCompression::Lzw | TiffCompression::Deflate
            )
        {
            report.warning(format!(
                "Predictor {:?} has no effect without LZW or Deflate compression.",
                self.predictor
            ));
        }
        if self.compression == TiffCompression::OldJpeg {
            report.warning("Old-style JPEG compression (6) is deprecated; use JPEG (7).");
        }
        let pixels = self.core.pixel_count();
        if self.compression == TiffCompression::None && pixels > LARGE_UNCOMPRESSED_PIXELS {
            report.warning(format!(
                "Uncompressed image of {} pixels; consider LZW or Deflate compression.",
                pixels
            ));
        }
        if !self.color_map.is_empty() && self.photometric != Photometric::Palette {
            report.warning(format!(
                "Color map is ignored for {:?} photometric interpretation.",
                self.photometric
            ));
        }
        if !self.model_tiepoint.is_empty() && self.model_pixel_scale.is_empty() {
            report.warning("Model tiepoint is set without a model pixel scale.");
        }
        for tag in self.custom_tags.keys() {
            if let Some((_, name)) = STANDARD_TAGS.iter().find(|(id, _)| id == tag) {
                report.warning(format!(
                    "Custom tag {} shadows the standard {} tag.",
                    tag, name
                ));
            }
        }
        rules::check_exif_advisory(report, &self.exif);
        rules::check_resolution_advisory(
            report,
            pixels,
            self.x_resolution.and_then(|v| self.resolution_unit.to_dpi(v)),
            self.y_resolution.and_then(|v| self.resolution_unit.to_dpi(v)),
            options,
        );
    }
}

fn depth_for_bits(bits: u32) -> Option<TiffColorDepth> {
    match bits {
        1 => Some(TiffColorDepth::OneBit),
        4 => Some(TiffColorDepth::FourBit),
        8 => Some(TiffColorDepth::EightBit),
        16 => Some(TiffColorDepth::SixteenBit),
        24 => Some(TiffColorDepth::TwentyFourBit),
        32 => Some(TiffColorDepth::ThirtyTwoBit),
        48 => Some(TiffColorDepth::FortyEightBit),
        64 => Some(TiffColorDepth::SixtyFourBit),
        _ => None,
    }
}

impl MetadataRecord for TiffMetadata {
    fn format(&self) -> ImageFormat {
        ImageFormat::Tiff
    }

    fn core(&self) -> &MetadataCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MetadataCore {
        &mut self.core
    }

    fn estimated_size(&self) -> u64 {
        SizeEstimate::new()
            .fixed(self.core.estimated_size())
            .fixed(self.exif.estimated_size())
            .blob(&self.icc_profile)
            .blob(&self.exif_data)
            .blob(&self.xmp_data)
            .blob(&self.iptc_data)
            .tag_map(&self.custom_tags)
            .numbers(&self.strip_offsets)
            .numbers(&self.strip_byte_counts)
            .numbers(&self.color_map)
            .numbers(&self.model_pixel_scale)
            .numbers(&self.model_tiepoint)
            .numbers(&self.geo_key_directory)
            .fixed(self.fixed_overhead())
            .finish()
    }

    /// `(20 + custom tag count) × 12 + 6`: the directory layout cost
    fn fixed_overhead(&self) -> u64 {
        (BASELINE_ENTRY_COUNT + self.custom_tags.len() as u64) * IFD_ENTRY_SIZE + IFD_HEADER_SIZE
    }

    fn clear_group(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::IccProfile => self.icc_profile = Vec::new(),
            FieldGroup::Exif => {
                self.exif_data = Vec::new();
                self.exif.clear();
            }
            FieldGroup::Xmp => self.xmp_data = Vec::new(),
            FieldGroup::Collections => {
                self.iptc_data = Vec::new();
                self.custom_tags.clear();
                self.strip_offsets = Vec::new();
                self.strip_byte_counts = Vec::new();
                self.color_map = Vec::new();
                self.model_pixel_scale = Vec::new();
                self.model_tiepoint = Vec::new();
                self.geo_key_directory = Vec::new();
            }
            FieldGroup::Scalars => *self = Self::default(),
        }
    }
}

impl Validate for TiffMetadata {
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_ranges(&mut report);
        self.check_structure(&mut report);
        self.check_coupling(&mut report);
        self.check_advisory(&mut report, options);
        report
    }
}
