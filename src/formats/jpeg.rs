//! JPEG metadata record
//!
//! This module models the descriptive side of a JPEG/JFIF image: frame
//! header parameters, APP1 EXIF, APP2 ICC profile, APP13 IPTC and XMP.
//!
//! JPEG Metadata Storage:
//! - EXIF (and its thumbnail) lives in a single APP1 segment, so the payload
//!   is limited to 65,533 bytes
//! - An ICC profile may be split across up to 255 APP2 segments of 65,519
//!   bytes each
//! - COM segments hold free-form comments, also limited to 65,533 bytes

use std::collections::BTreeMap;

use crate::core::base::{MetadataCore, ResolutionUnit};
use crate::core::clamped::Quality;
use crate::core::exif::ExifFields;
use crate::core::format::ImageFormat;
use crate::core::record::{FieldGroup, MetadataRecord};
use crate::core::size::SizeEstimate;
use crate::types::TagValue;
use crate::validation::rules;
use crate::validation::{Validate, ValidationOptions, ValidationReport};

/// Largest payload that fits in one marker segment
pub const MAX_SEGMENT_PAYLOAD: usize = 65_533;

/// Largest ICC profile that fits in 255 APP2 chunks
pub const MAX_ICC_PROFILE_SIZE: usize = 255 * 65_519;

/// The only bit depth modelled for JPEG
pub const JPEG_BITS_PER_SAMPLE: i32 = 8;

/// JPEG color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JpegColorMode {
    /// Single luminance channel
    Grayscale,
    /// RGB stored without color transform
    Rgb,
    /// Four-channel print color
    Cmyk,
    /// Luma + chroma (JFIF default)
    #[default]
    YCbCr,
}

impl JpegColorMode {
    /// Number of components this color mode requires
    pub fn samples_per_pixel(&self) -> i32 {
        match self {
            JpegColorMode::Grayscale => 1,
            JpegColorMode::Rgb | JpegColorMode::YCbCr => 3,
            JpegColorMode::Cmyk => 4,
        }
    }
}

/// Chroma subsampling scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChromaSubsampling {
    /// 4:4:4, no subsampling
    Yuv444,
    /// 4:2:2, horizontal halving
    Yuv422,
    /// 4:2:0, horizontal and vertical halving
    #[default]
    Yuv420,
    /// 4:1:1, horizontal quartering
    Yuv411,
}

impl ChromaSubsampling {
    /// Whether chroma is stored at reduced resolution
    pub fn is_subsampled(&self) -> bool {
        !matches!(self, ChromaSubsampling::Yuv444)
    }
}

/// Coding process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JpegEncoding {
    /// Baseline sequential DCT
    #[default]
    Baseline,
    /// Progressive DCT
    Progressive,
    /// Lossless (predictive)
    Lossless,
    /// JPEG 2000 wavelet coding
    Jpeg2000,
}

/// JPEG metadata record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JpegMetadata {
    /// Shared descriptive fields
    pub core: MetadataCore,
    /// Color mode
    pub color_mode: JpegColorMode,
    /// Encoder quality
    pub quality: Quality,
    /// Components per pixel; must match `color_mode`
    pub samples_per_pixel: i32,
    /// Bits per component
    pub bits_per_sample: i32,
    /// Chroma subsampling
    pub chroma_subsampling: ChromaSubsampling,
    /// Coding process
    pub encoding: JpegEncoding,
    /// Horizontal resolution
    pub x_resolution: Option<f64>,
    /// Vertical resolution
    pub y_resolution: Option<f64>,
    /// Unit of the resolution values
    pub resolution_unit: ResolutionUnit,
    /// MCUs between restart markers (0 = none)
    pub restart_interval: u16,
    /// The image is expected to carry EXIF data
    pub has_exif: bool,
    /// The image is expected to carry an ICC profile
    pub has_icc_profile: bool,
    /// The image is expected to carry XMP
    pub has_xmp: bool,
    /// Decoded EXIF / GPS scalars
    pub exif: ExifFields,
    /// EXIF tags without a dedicated field, by tag id
    pub custom_exif_tags: BTreeMap<u16, TagValue>,
    /// IPTC datasets by name
    pub iptc_tags: BTreeMap<String, String>,
    /// XMP properties by qualified name
    pub xmp_tags: BTreeMap<String, String>,
    /// ICC color profile
    pub icc_profile: Vec<u8>,
    /// Raw EXIF payload
    pub exif_data: Vec<u8>,
    /// Embedded EXIF thumbnail
    pub thumbnail: Vec<u8>,
    /// COM segment text
    pub comment: Option<String>,
}

impl Default for JpegMetadata {
    fn default() -> Self {
        Self {
            core: MetadataCore::default(),
            color_mode: JpegColorMode::YCbCr,
            quality: Quality::new(75),
            samples_per_pixel: 3,
            bits_per_sample: JPEG_BITS_PER_SAMPLE,
            chroma_subsampling: ChromaSubsampling::Yuv420,
            encoding: JpegEncoding::Baseline,
            x_resolution: None,
            y_resolution: None,
            resolution_unit: ResolutionUnit::Inch,
            restart_interval: 0,
            has_exif: false,
            has_icc_profile: false,
            has_xmp: false,
            exif: ExifFields::default(),
            custom_exif_tags: BTreeMap::new(),
            iptc_tags: BTreeMap::new(),
            xmp_tags: BTreeMap::new(),
            icc_profile: Vec::new(),
            exif_data: Vec::new(),
            thumbnail: Vec::new(),
            comment: None,
        }
    }
}

impl JpegMetadata {
    /// Create a record with format defaults and the given dimensions
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            core: MetadataCore::with_dimensions(width, height),
            ..Default::default()
        }
    }

    /// Set the color mode and the matching samples per pixel
    pub fn set_color_mode(&mut self, mode: JpegColorMode) {
        self.color_mode = mode;
        self.samples_per_pixel = mode.samples_per_pixel();
    }

    /// Set the ICC profile and the matching flag
    pub fn set_icc_profile(&mut self, profile: Vec<u8>) {
        self.has_icc_profile = !profile.is_empty();
        self.icc_profile = profile;
    }

    /// Set the raw EXIF payload and the matching flag
    pub fn set_exif_data(&mut self, data: Vec<u8>) {
        self.has_exif = !data.is_empty();
        self.exif_data = data;
    }

    fn check_ranges(&self, report: &mut ValidationReport) {
        rules::check_dimensions(
            report,
            self.core.width,
            self.core.height,
            ImageFormat::Jpeg.max_dimension().unwrap_or(i64::MAX),
        );
        rules::check_clamped(report, "quality", "Quality", self.quality);
        rules::check_resolution(report, "X", self.x_resolution);
        rules::check_resolution(report, "Y", self.y_resolution);
        rules::check_exif_ranges(report, &self.exif);

        let app1 = self.exif_data.len() + self.thumbnail.len();
        if app1 > MAX_SEGMENT_PAYLOAD {
            report.error(format!(
                "EXIF data too large: {} bytes. APP1 segment payload is limited to {} bytes.",
                app1, MAX_SEGMENT_PAYLOAD
            ));
        }
        if self.icc_profile.len() > MAX_ICC_PROFILE_SIZE {
            report.error(format!(
                "ICC profile too large: {} bytes. Maximum is {} bytes.",
                self.icc_profile.len(),
                MAX_ICC_PROFILE_SIZE
            ));
        }
        if let Some(comment) = &self.comment {
            if comment.len() > MAX_SEGMENT_PAYLOAD {
                report.error(format!(
                    "Comment too large: {} bytes. COM segment payload is limited to {} bytes.",
                    comment.len(),
                    MAX_SEGMENT_PAYLOAD
                ));
            }
        }
    }

    fn check_structure(&self, report: &mut ValidationReport) {
        let expected = self.color_mode.samples_per_pixel();
        if self.samples_per_pixel != expected {
            report.error(format!(
                "Invalid samples per pixel: {}. Expected {} for {:?} color mode.",
                self.samples_per_pixel, expected, self.color_mode
            ));
        }
        if self.bits_per_sample != JPEG_BITS_PER_SAMPLE {
            report.error(format!(
                "Invalid bits per sample: {}. JPEG requires {} bits per sample.",
                self.bits_per_sample, JPEG_BITS_PER_SAMPLE
            ));
        }
    }

    fn check_advisory(&self, report: &mut ValidationReport, options: &ValidationOptions) {
        if self.chroma_subsampling.is_subsampled() {
            match self.color_mode {
                JpegColorMode::Grayscale => report.warning(format!(
                    "Chroma subsampling {:?} has no effect on a grayscale image.",
                    self.chroma_subsampling
                )),
                JpegColorMode::Cmyk => report.warning(format!(
                    "Chroma subsampling {:?} on a CMYK image is unusual.",
                    self.chroma_subsampling
                )),
                _ => {}
            }
            if self.encoding == JpegEncoding::Lossless {
                report.warning(format!(
                    "Lossless encoding with chroma subsampling {:?} discards chroma detail.",
                    self.chroma_subsampling
                ));
            }
        }
        if self.encoding == JpegEncoding::Lossless && self.quality.get() < Quality::MAX {
            report.warning(format!(
                "Quality {} is ignored by lossless encoding.",
                self.quality
            ));
        }
        if self.encoding == JpegEncoding::Jpeg2000 {
            report.warning("JPEG 2000 encoding has limited decoder support.");
        }
        if self.has_exif && self.exif_data.is_empty() {
            report.warning("EXIF flag is set but no EXIF data is present.");
        }
        if self.has_icc_profile && self.icc_profile.is_empty() {
            report.warning("ICC profile flag is set but no ICC profile is present.");
        }
        if self.has_xmp && self.xmp_tags.is_empty() {
            report.warning("XMP flag is set but no XMP data is present.");
        }
        rules::check_exif_advisory(report, &self.exif);
        rules::check_resolution_advisory(
            report,
            self.core.pixel_count(),
            self.x_resolution.and_then(|v| self.resolution_unit.to_dpi(v)),
            self.y_resolution.and_then(|v| self.resolution_unit.to_dpi(v)),
            options,
        );
    }
}

impl MetadataRecord for JpegMetadata {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
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
            .string(self.comment.as_deref())
            .blob(&self.icc_profile)
            .blob(&self.exif_data)
            .blob(&self.thumbnail)
            .tag_map(&self.custom_exif_tags)
            .string_map(&self.iptc_tags)
            .string_map(&self.xmp_tags)
            .finish()
    }

    fn clear_group(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::IccProfile => self.icc_profile = Vec::new(),
            FieldGroup::Exif => {
                self.exif_data = Vec::new();
                self.thumbnail = Vec::new();
                self.custom_exif_tags.clear();
                self.exif.clear();
            }
            FieldGroup::Xmp => self.xmp_tags.clear(),
            FieldGroup::Collections => self.iptc_tags.clear(),
            FieldGroup::Scalars => *self = Self::default(),
        }
    }
}

impl Validate for JpegMetadata {
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_ranges(&mut report);
        self.check_structure(&mut report);
        self.check_advisory(&mut report, options);
        report
    }
}
