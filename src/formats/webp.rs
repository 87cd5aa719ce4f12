//! WebP metadata record
//!
//! WebP Metadata Storage:
//! - Simple files carry a single VP8 bitstream and no metadata
//! - Lossless files carry a single VP8L bitstream
//! - Extended files start with a VP8X chunk whose flags announce ICCP,
//!   ALPH, EXIF, XMP and ANIM/ANMF chunks
//! - ANMF frame offsets are stored divided by two, so they must be even
//! - ANMF frame durations are 24-bit

use crate::core::base::MetadataCore;
use crate::core::clamped::{CompressionLevel, Quality};
use crate::core::exif::ExifFields;
use crate::core::format::ImageFormat;
use crate::core::frame::{AnimationFrame, DisposalMethod};
use crate::core::record::{truncate_tail, FieldGroup, MetadataRecord};
use crate::core::size::SizeEstimate;
use crate::validation::rules;
use crate::validation::{Validate, ValidationOptions, ValidationReport};

/// Largest frame duration an ANMF chunk can hold
pub const MAX_FRAME_DURATION_MS: u32 = 0x00FF_FFFF;

/// WebP container layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WebpFormat {
    /// Lossy VP8 without VP8X
    #[default]
    Simple,
    /// VP8L without VP8X
    Lossless,
    /// VP8X with optional chunks
    Extended,
}

/// Bitstream codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WebpCompression {
    /// Lossy
    #[default]
    Vp8,
    /// Lossless
    Vp8l,
}

impl WebpFormat {
    /// Codec this container layout implies
    pub fn compression(&self) -> WebpCompression {
        match self {
            WebpFormat::Lossless => WebpCompression::Vp8l,
            WebpFormat::Simple | WebpFormat::Extended => WebpCompression::Vp8,
        }
    }
}

/// WebP metadata record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebpMetadata {
    /// Shared descriptive fields
    pub core: MetadataCore,
    /// Container layout
    pub format: WebpFormat,
    /// Bitstream coding; follows `format`
    pub compression: WebpCompression,
    /// Lossy quality factor
    pub quality: Quality,
    /// Encoder effort, 0 (fast) to 9 (slow)
    pub compression_level: CompressionLevel,
    /// 4 with alpha, otherwise 3
    pub samples_per_pixel: i32,
    /// An alpha channel is present
    pub has_alpha: bool,
    /// The ANIM flag is set
    pub is_animated: bool,
    /// The ICCP flag is set
    pub has_icc_profile: bool,
    /// The EXIF flag is set
    pub has_exif: bool,
    /// The XMP flag is set
    pub has_xmp: bool,
    /// ANIM loop count, 0 loops forever
    pub loop_count: u16,
    /// ANIM background color as ARGB
    pub background_color: u32,
    /// Decoded EXIF / GPS scalars
    pub exif: ExifFields,
    /// ICCP chunk payload
    pub icc_profile: Vec<u8>,
    /// EXIF chunk payload
    pub exif_data: Vec<u8>,
    /// XMP chunk payload
    pub xmp_data: Vec<u8>,
    /// ANMF frames in display order
    pub animation_frames: Vec<AnimationFrame>,
}

impl Default for WebpMetadata {
    fn default() -> Self {
        Self {
            core: MetadataCore::default(),
            format: WebpFormat::Simple,
            compression: WebpCompression::Vp8,
            quality: Quality::new(75),
            compression_level: CompressionLevel::new(6),
            samples_per_pixel: 3,
            has_alpha: false,
            is_animated: false,
            has_icc_profile: false,
            has_exif: false,
            has_xmp: false,
            loop_count: 0,
            background_color: 0xFFFF_FFFF,
            exif: ExifFields::default(),
            icc_profile: Vec::new(),
            exif_data: Vec::new(),
            xmp_data: Vec::new(),
            animation_frames: Vec::new(),
        }
    }
}

impl WebpMetadata {
    /// Create a record with format defaults and the given dimensions
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            core: MetadataCore::with_dimensions(width, height),
            ..Default::default()
        }
    }

    /// Switch container layout and the codec it implies
    pub fn set_format(&mut self, format: WebpFormat) {
        self.format = format;
        self.compression = format.compression();
    }

    /// Toggle the alpha channel, keeping samples per pixel in step
    pub fn set_alpha(&mut self, has_alpha: bool) {
        self.has_alpha = has_alpha;
        self.samples_per_pixel = if has_alpha { 4 } else { 3 };
    }

    /// Append a frame and mark the image animated
    pub fn add_frame(&mut self, frame: AnimationFrame) {
        self.animation_frames.push(frame);
        self.is_animated = true;
    }

    pub fn set_icc_profile(&mut self, profile: Vec<u8>) {
        self.has_icc_profile = !profile.is_empty();
        self.icc_profile = profile;
    }

    pub fn set_exif_data(&mut self, data: Vec<u8>) {
        self.has_exif = !data.is_empty();
        self.exif_data = data;
    }

    pub fn set_xmp_data(&mut self, data: Vec<u8>) {
        self.has_xmp = !data.is_empty();
        self.xmp_data = data;
    }

    fn check_ranges(&self, report: &mut ValidationReport) {
        rules::check_dimensions(
            report,
            self.core.width,
            self.core.height,
            ImageFormat::Webp.max_dimension().unwrap_or(i64::MAX),
        );
        rules::check_clamped(report, "quality", "Quality", self.quality);
        rules::check_clamped(
            report,
            "compression level",
            "Compression level",
            self.compression_level,
        );
        rules::check_exif_ranges(report, &self.exif);
        for (index, frame) in self.animation_frames.iter().enumerate() {
            if frame.duration_ms > MAX_FRAME_DURATION_MS {
                report.error(format!(
                    "Animation frame {} duration {} ms exceeds the 24-bit limit of {} ms.",
                    index, frame.duration_ms, MAX_FRAME_DURATION_MS
                ));
            }
        }
    }

    fn check_structure(&self, report: &mut ValidationReport) {
        let expected = if self.has_alpha { 4 } else { 3 };
        if self.samples_per_pixel != expected {
            let alpha = if self.has_alpha { "with" } else { "without" };
            report.error(format!(
                "Invalid samples per pixel: {}. Expected {} for WebP {} alpha.",
                self.samples_per_pixel, expected, alpha
            ));
        }
    }

    fn check_coupling(&self, report: &mut ValidationReport) {
        let expected = self.format.compression();
        if self.compression != expected {
            report.error(format!(
                "WebP format {:?} requires {:?} compression, found {:?}.",
                self.format, expected, self.compression
            ));
        }

        if self.is_animated {
            if self.format != WebpFormat::Extended {
                report.error(format!(
                    "Animated WebP requires Extended format, found {:?}.",
                    self.format
                ));
            }
            if self.animation_frames.is_empty() {
                report.error("Animated WebP requires at least one animation frame.");
            }
        }
        if self.has_alpha && self.format == WebpFormat::Simple {
            report.error("Alpha channel requires Extended or Lossless format.");
        }
        if self.format != WebpFormat::Extended {
            for (chunk, present) in [
                ("ICC profile", self.has_icc_profile || !self.icc_profile.is_empty()),
                ("EXIF", self.has_exif || !self.exif_data.is_empty()),
                ("XMP", self.has_xmp || !self.xmp_data.is_empty()),
            ] {
                if present {
                    report.error(format!("{} metadata requires Extended format.", chunk));
                }
            }
        }

        rules::check_frames(
            report,
            &self.animation_frames,
            self.core.width,
            self.core.height,
        );
        for (index, frame) in self.animation_frames.iter().enumerate() {
            if frame.offset_x % 2 != 0 || frame.offset_y % 2 != 0 {
                report.error(format!(
                    "Animation frame {} offset ({}, {}) must be even.",
                    index, frame.offset_x, frame.offset_y
                ));
            }
            if frame.disposal_method == DisposalMethod::Previous {
                report.error(format!(
                    "Animation frame {} uses Previous disposal, which WebP does not support.",
                    index
                ));
            }
        }
    }

    fn check_advisory(&self, report: &mut ValidationReport, options: &ValidationOptions) {
        if self.has_exif && self.exif_data.is_empty() {
            report.warning("EXIF flag is set but no EXIF data is present.");
        }
        if self.has_icc_profile && self.icc_profile.is_empty() {
            report.warning("ICC profile flag is set but no ICC profile is present.");
        }
        if self.has_xmp && self.xmp_data.is_empty() {
            report.warning("XMP flag is set but no XMP data is present.");
        }
        if !self.is_animated && !self.animation_frames.is_empty() {
            report.warning(format!(
                "{} animation frame(s) present but the animation flag is not set.",
                self.animation_frames.len()
            ));
        }
        rules::check_exif_advisory(report, &self.exif);
        rules::check_resolution_advisory(report, self.core.pixel_count(), None, None, options);
    }
}

impl MetadataRecord for WebpMetadata {
    fn format(&self) -> ImageFormat {
        ImageFormat::Webp
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
            .frames(&self.animation_frames)
            .finish()
    }

    fn clear_group(&mut self, group: FieldGroup) {
        match group {
            FieldGroup::IccProfile => self.icc_profile = Vec::new(),
            FieldGroup::Exif => {
                self.exif_data = Vec::new();
                self.exif.clear();
            }
            FieldGroup::Xmp => self.xmp_data = Vec::new(),
            FieldGroup::Collections => self.animation_frames = Vec::new(),
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

impl Validate for WebpMetadata {
    fn validate_with(&self, options: &ValidationOptions) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.check_ranges(&mut report);
        self.check_structure(&mut report);
        self.check_coupling(&mut report);
        self.check_advisory(&mut report, options);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn animated(frames: usize) -> WebpMetadata {
        let mut webp = WebpMetadata::new(256, 256);
        webp.set_format(WebpFormat::Extended);
        for _ in 0..frames {
            webp.add_frame(AnimationFrame::new(0, 0, 256, 256, 100));
        }
        webp
    }

    #[test]
    fn test_default_record_is_valid() {
        let report = WebpMetadata::new(512, 512).validate();
        assert!(report.is_empty(), "{}", report);
    }

    #[test]
    fn test_format_compression_mismatch() {
        let mut webp = WebpMetadata::new(256, 256);
        webp.format = WebpFormat::Lossless;
        webp.compression = WebpCompression::Vp8;
        let report = webp.validate();
        assert_eq!(
            report.errors(),
            vec!["WebP format Lossless requires Vp8l compression, found Vp8."]
        );

        webp.set_format(WebpFormat::Lossless);
        assert!(webp.validate().is_valid());
    }

    #[test]
    fn test_dimension_limit() {
        let report = WebpMetadata::new(16_384, 100).validate();
        assert_eq!(
            report.errors(),
            vec!["Invalid width: 16384. Maximum width is 16383."]
        );
    }

    #[test]
    fn test_animation_requires_extended_and_frames() {
        let mut webp = WebpMetadata::new(256, 256);
        webp.is_animated = true;
        let report = webp.validate();
        assert_eq!(
            report.errors(),
            vec![
                "Animated WebP requires Extended format, found Simple.",
                "Animated WebP requires at least one animation frame.",
            ]
        );
        assert!(animated(3).validate().is_valid());
    }

    #[test]
    fn test_frame_rules() {
        let mut webp = animated(0);
        webp.add_frame(AnimationFrame::new(200, 0, 100, 100, 0));
        let mut previous = AnimationFrame::new(3, 4, 10, 10, MAX_FRAME_DURATION_MS + 1);
        previous.disposal_method = DisposalMethod::Previous;
        webp.add_frame(previous);

        let report = webp.validate();
        assert_eq!(
            report.errors(),
            vec![
                "Animation frame 1 duration 16777216 ms exceeds the 24-bit limit of 16777215 ms.",
                "Animation frame 0 exceeds canvas bounds: offset (200, 0) with size 100x100 does not fit in 256x256.",
                "Animation frame 1 offset (3, 4) must be even.",
                "Animation frame 1 uses Previous disposal, which WebP does not support.",
            ]
        );
        assert_eq!(report.warnings(), vec!["Animation frame 0 has zero duration."]);
    }

    #[test]
    fn test_alpha_and_metadata_need_extended() {
        let mut webp = WebpMetadata::new(64, 64);
        webp.set_alpha(true);
        webp.set_exif_data(vec![0; 32]);
        let report = webp.validate();
        assert_eq!(
            report.errors(),
            vec![
                "Alpha channel requires Extended or Lossless format.",
                "EXIF metadata requires Extended format.",
            ]
        );

        webp.set_format(WebpFormat::Extended);
        assert!(webp.validate().is_valid());
    }

    #[test]
    fn test_samples_follow_alpha() {
        let mut webp = WebpMetadata::new(64, 64);
        webp.set_format(WebpFormat::Lossless);
        webp.has_alpha = true;
        let report = webp.validate();
        assert_eq!(
            report.errors(),
            vec!["Invalid samples per pixel: 3. Expected 4 for WebP with alpha."]
        );
    }

    #[test]
    fn test_frames_without_animation_flag_warn() {
        let mut webp = animated(2);
        webp.is_animated = false;
        let report = webp.validate();
        assert!(report.is_valid());
        assert_eq!(
            report.warnings(),
            vec!["2 animation frame(s) present but the animation flag is not set."]
        );
    }

    #[test]
    fn test_frames_estimate_and_batched_clear() {
        let mut webp = animated(0);
        for _ in 0..5 {
            webp.add_frame(AnimationFrame::new(0, 0, 16, 16, 40).with_pixel_data(vec![0; 100]));
        }
        assert_eq!(webp.estimated_size(), 5 * (100 + 24));
        assert_eq!(webp.frame_count(), 5);
        assert_eq!(webp.clear_frames(2), 2);
        assert_eq!(webp.clear_frames(10), 3);
        assert_eq!(webp.frame_count(), 0);
    }

    #[test]
    fn test_clear_all_restores_default() {
        let mut webp = animated(4);
        webp.set_icc_profile(vec![1; 1024]);
        webp.clear_all();
        assert_eq!(webp, WebpMetadata::default());
        assert_eq!(webp.estimated_size(), 0);
    }
}
