//! PNG and APNG metadata record
//!
//! PNG Metadata Storage:
//! - IHDR fixes color type, bit depth and interlace method
//! - PLTE holds up to 256 palette entries, tRNS the transparency
//! - gAMA, sRGB and iCCP describe color; iCCP takes precedence over sRGB
//! - tEXt / iTXt chunks are keyword/value pairs, XMP uses the
//!   `XML:com.adobe.xmp` keyword
//! - eXIf holds a raw EXIF payload
//! - APNG adds acTL (frame count, plays) and one fcTL per frame

use std::collections::BTreeMap;

use crate::core::base::MetadataCore;
use crate::core::format::ImageFormat;
use crate::core::frame::AnimationFrame;
use crate::core::record::{truncate_tail, FieldGroup, MetadataRecord};
use crate::core::size::SizeEstimate;
use crate::validation::rules;
use crate::validation::{Validate, ValidationOptions, ValidationReport};

/// iTXt keyword XMP packets are stored under
pub const XMP_KEYWORD: &str = "XML:com.adobe.xmp";

/// Longest keyword a text chunk may use
pub const MAX_KEYWORD_LEN: usize = 79;

/// Largest palette PLTE can hold
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// IHDR color type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PngColorType {
    /// 0
    Grayscale,
    /// 2
    Rgb,
    /// 3
    Indexed,
    /// 4
    GrayscaleAlpha,
    /// 6
    #[default]
    RgbAlpha,
}

impl PngColorType {
    /// Bit depths IHDR allows for this color type
    pub fn allowed_bit_depths(&self) -> &'static [u8] {
        match self {
            PngColorType::Grayscale => &[1, 2, 4, 8, 16],
            PngColorType::Indexed => &[1, 2, 4, 8],
            PngColorType::Rgb | PngColorType::GrayscaleAlpha | PngColorType::RgbAlpha => &[8, 16],
        }
    }

    /// Whether pixels carry an alpha sample
    pub fn has_alpha(&self) -> bool {
        matches!(self, PngColorType::GrayscaleAlpha | PngColorType::RgbAlpha)
    }

    /// Samples per pixel
    pub fn channels(&self) -> u8 {
        match self {
            PngColorType::Grayscale | PngColorType::Indexed => 1,
            PngColorType::GrayscaleAlpha => 2,
            PngColorType::Rgb => 3,
            PngColorType::RgbAlpha => 4,
        }
    }
}

/// IHDR interlace method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PngInterlace {
    #[default]
    None,
    Adam7,
}

/// sRGB rendering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SrgbIntent {
    Perceptual,
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

/// tRNS contents, shaped by the color type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transparency {
    /// Transparent gray level
    Gray(u16),
    /// Transparent RGB color
    Rgb(u16, u16, u16),
    /// Alpha for the leading palette entries
    Palette(Vec<u8>),
}

impl Transparency {
    fn color_type(&self) -> PngColorType {
        match self {
            Transparency::Gray(_) => PngColorType::Grayscale,
            Transparency::Rgb(..) => PngColorType::Rgb,
            Transparency::Palette(_) => PngColorType::Indexed,
        }
    }
}

/// PNG / APNG metadata record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PngMetadata {
    /// Shared descriptive fields
    pub core: MetadataCore,
    /// IHDR color type
    pub color_type: PngColorType,
    /// Bits per sample or palette index
    pub bit_depth: u8,
    /// IHDR interlace method
    pub interlace: PngInterlace,
    /// gAMA value, e.g. 0.45455
    pub gamma: Option<f64>,
    /// sRGB rendering intent, when the chunk is present
    pub srgb_intent: Option<SrgbIntent>,
    /// PLTE entries as RGB triples
    pub palette: Vec<[u8; 3]>,
    /// tRNS chunk
    pub transparency: Option<Transparency>,
    /// tEXt / iTXt chunks by keyword
    pub text_chunks: BTreeMap<String, String>,
    /// iCCP profile, decompressed
    pub icc_profile: Vec<u8>,
    /// eXIf chunk payload
    pub exif_data: Vec<u8>,
    /// APNG frames, empty for a still image
    pub animation_frames: Vec<AnimationFrame>,
    /// APNG play count, 0 loops forever
    pub num_plays: u32,
}

impl Default for PngMetadata {
    fn default() -> Self {
        Self {
            core: MetadataCore::default(),
            color_type: PngColorType::RgbAlpha,
            bit_depth: 8,
            interlace: PngInterlace::None,
            gamma: None,
            srgb_intent: None,
            palette: Vec::new(),
            transparency: None,
            text_chunks: BTreeMap::new(),
            icc_profile: Vec::new(),
            exif_data: Vec::new(),
            animation_frames: Vec::new(),
            num_plays: 0,
        }
    }
}

impl PngMetadata {
    /// Create a record with format defaults and the given dimensions
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            core: MetadataCore::with_dimensions(width, height),
            ..Default::default()
        }
    }

    /// Whether the record describes an APNG
    pub fn is_animated(&self) -> bool {
        !self.animation_frames.is_empty()
    }

    /// Store an XMP packet as an iTXt chunk
    pub fn set_xmp(&mut self, packet: impl Into<String>) {
        self.text_chunks.insert(XMP_KEYWORD.to_string(), packet.into());
    }

    /// The stored XMP packet, if any
    pub fn xmp(&self) -> Option<&str> {
        self.text_chunks.get(XMP_KEYWORD).map(String::as_str)
    }

    fn palette_limit(&self) -> usize {
        if self.bit_depth >= 8 {
            MAX_PALETTE_ENTRIES
        } else {
            MAX_PALETTE_ENTRIES.min(1 << self.bit_depth)
        }
    }

    fn check_ranges(&self, report: &mut ValidationReport) {
        rules::check_dimensions(
            report,
            self.core.width,
            self.core.height,
            ImageFormat::Png.max_dimension().unwrap_or(i64::MAX),
        );
        if let Some(gamma) = self.gamma {
            if !(gamma.is_finite() && gamma > 0.0) {
                report.error(format!("Invalid gamma: {}. Gamma must be positive.", gamma));
            }
        }
        for keyword in self.text_chunks.keys() {
            if keyword.is_empty() || keyword.len() > MAX_KEYWORD_LEN {
                report.error(format!(
                    "Invalid text chunk keyword: \"{}\". Keywords must be 1 to {} bytes.",
                    keyword, MAX_KEYWORD_LEN
                ));
            }
        }
    }

    fn check_structure(&self, report: &mut ValidationReport) {
        let allowed = self.color_type.allowed_bit_depths();
        if !allowed.contains(&self.bit_depth) {
            let list = allowed
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            report.error(format!(
                "Invalid bit depth {} for {:?} color type. Allowed depths are {}.",
                self.bit_depth, self.color_type, list
            ));
        }

        if self.color_type == PngColorType::Indexed {
            let limit = self.palette_limit();
            if self.palette.is_empty() {
                report.error("Indexed color type requires a palette.");
            } else if self.palette.len() > limit {
                report.error(format!(
                    "Palette has {} entries; at most {} are allowed at bit depth {}.",
                    self.palette.len(),
                    limit,
                    self.bit_depth
                ));
            }
        }
    }

    fn check_coupling(&self, report: &mut ValidationReport) {
        if let Some(transparency) = &self.transparency {
            if self.color_type.has_alpha() {
                report.error(format!(
                    "Transparency chunk is not allowed for {:?} color type.",
                    self.color_type
                ));
            } else if transparency.color_type() != self.color_type {
                report.error(format!(
                    "Transparency for {:?} does not match {:?} color type.",
                    transparency.color_type(),
                    self.color_type
                ));
            } else if let Transparency::Palette(alpha) = transparency {
                if alpha.len() > self.palette.len() {
                    report.error(format!(
                        "Transparency has {} entries but the palette has only {}.",
                        alpha.len(),
                        self.palette.len()
                    ));
                }
            }
        }

        rules::check_frames(
            report,
            &self.animation_frames,
            self.core.width,
            self.core.height,
        );
    }

    fn check_advisory(&self, report: &mut ValidationReport, options: &ValidationOptions) {
        if self.srgb_intent.is_some() && !self.icc_profile.is_empty() {
            report.warning(
                "sRGB chunk is combined with an ICC profile; the ICC profile takes precedence.",
            );
        }
        if !self.palette.is_empty() && self.color_type != PngColorType::Indexed {
            report.warning(format!(
                "Palette is only a suggestion for {:?} color type.",
                self.color_type
            ));
        }
        if self.num_plays > 0 && !self.is_animated() {
            report.warning("Play count is set on a PNG without animation frames.");
        }
        rules::check_resolution_advisory(report, self.core.pixel_count(), None, None, options);
    }
}

impl MetadataRecord for PngMetadata {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn core(&self) -> &MetadataCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MetadataCore {
        &mut self.core
    }

    fn estimated_size(&self) -> u64 {
        let alpha: &[u8] = match &self.transparency {
            Some(Transparency::Palette(alpha)) => alpha,
            _ => &[],
        };
        SizeEstimate::new()
            .fixed(self.core.estimated_size())
            .blob(&self.icc_profile)
            .blob(&self.exif_data)
            .blob(alpha)
            .numbers(&self.palette)
            .string_map(&self.text_chunks)
            .frames(&self.animation_frames)
            .finish()
    }

    fn clear_group(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::IccProfile => self.icc_profile = Vec::new(),
            FieldGroup::Exif => self.exif_data = Vec::new(),
            FieldGroup::Xmp => {
                self.text_chunks.remove(XMP_KEYWORD);
            }
            FieldGroup::Collections => {
                self.text_chunks.clear();
                self.palette = Vec::new();
                self.transparency = None;
                self.animation_frames = Vec::new();
            }
            FieldGroup::Scalars => *self = Self::default(),
        }
    }

    fn frame_count(&self) -> usize {
        self.animation_frames.len()
    }

    fn clear_frames(&mut self, max: usize) -> usize {
        truncate_tail(&mut self.animation_frames, max)
    }
}

impl Validate for PngMetadata {
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_ranges(&mut report);
        self.check_structure(&mut report);
        self.check_coupling(&mut report);
        self.check_advisory(&mut report, options);
        report
    }
}
