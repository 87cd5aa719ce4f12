//! End-to-end scenarios across format records
//!
//! Each test builds a record the way a tile pipeline would, then checks the
//! validation report or the disposal result.


use tilemeta::formats::jpeg::{JpegColorMode, JpegMetadata};
use tilemeta::formats::tiff::{Photometric, TiffColorDepth, TiffMetadata};
use tilemeta::formats::webp::{WebpCompression, WebpFormat, WebpMetadata};
use tilemeta::{
    validate_record, CancelToken, DisposalTier, LifecycleController, MetaError, MetadataRecord,
    Validate,
};

mod validation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn jpeg_rgb_with_one_sample_is_single_error() {
        let mut jpeg = JpegMetadata::new(256, 256);
        jpeg.color_mode = JpegColorMode::Rgb;
        jpeg.samples_per_pixel = 1;

        let report = jpeg.validate();
        assert_eq!(
            report.errors(),
            vec!["Invalid samples per pixel: 1. Expected 3 for Rgb color mode."]
        );
        assert!(!report.is_valid());
    }

    #[test]
    fn webp_lossless_with_vp8_is_mismatch() {
        let mut webp = WebpMetadata::new(256, 256);
        webp.format = WebpFormat::Lossless;
        webp.compression = WebpCompression::Vp8;

        let report = webp.validate();
        assert!(!report.is_valid());
        assert!(report
            .errors()
            .iter()
            .any(|e| e.contains("Lossless") && e.contains("Vp8l")));
    }

    #[test]
    fn tiff_rgb_24_bit_is_valid() {
        let mut tiff = TiffMetadata::new(256, 256);
        tiff.bits_per_sample = [8u16, 8, 8].into_iter().collect();
        tiff.samples_per_pixel = 3;
        tiff.color_depth = TiffColorDepth::TwentyFourBit;
        tiff.photometric = Photometric::Rgb;

        let report = tiff.validate();
        assert!(report.is_valid());
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn gps_latitude_out_of_range() {
        let mut jpeg = JpegMetadata::new(256, 256);
        jpeg.exif.set_gps(95.0, 10.0);

        let report = jpeg.validate();
        assert_eq!(
            report.errors(),
            vec!["Invalid GPS latitude: 95. Latitude must be between -90 and 90."]
        );
    }

    #[test]
    fn errors_and_warnings_summary() {
        let mut webp = WebpMetadata::new(0, 64);
        webp.set_format(WebpFormat::Extended);
        webp.has_xmp = true;

        let report = webp.validate();
        assert_eq!(
            report.summary(),
            "Errors (1):\n  - Invalid width: 0. Width must be greater than 0.\n\
             Warnings (1):\n  - XMP flag is set but no XMP data is present."
        );
        assert_eq!(report.to_string(), report.summary());
    }

    #[test]
    fn missing_record_is_contract_error() {
        let result = validate_record::<JpegMetadata>(None);
        assert!(matches!(result, Err(MetaError::MissingRecord)));

        let jpeg = JpegMetadata::new(64, 64);
        let report = validate_record(Some(&jpeg)).unwrap();
        assert_eq!(report.summary(), "No validation issues found.");
    }
}

mod disposal {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn large_icc_profile_is_disposed_in_batches() {
        let mut jpeg = JpegMetadata::new(4096, 4096);
        jpeg.set_icc_profile(vec![0x42; 1_200_000]);
        jpeg.core.author = Some("Survey team".to_string());

        let mut controller = LifecycleController::new(jpeg);
        assert!(controller.has_large_metadata());
        assert!(controller.record().has_large_metadata());

        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert_eq!(outcome.tier, DisposalTier::Batched);
        assert!(outcome.estimated_before > 1_200_000);
        assert!(controller.record().icc_profile.is_empty());
        assert!(controller.estimated_size() < 1000);
        assert_eq!(controller.record(), &JpegMetadata::default());
    }

    #[tokio::test]
    async fn tiff_disposal_leaves_directory_overhead() {
        let mut tiff = TiffMetadata::new(8192, 8192);
        tiff.icc_profile = vec![0; 2_000_000];
        tiff.strip_offsets = vec![0; 8192];
        tiff.strip_byte_counts = vec![0; 8192];

        let mut controller = LifecycleController::new(tiff);
        controller.dispose_async(&CancelToken::new()).await.unwrap();

        let record = controller.record();
        assert_eq!(record.estimated_size(), record.fixed_overhead());
        assert!(record.estimated_size() < 1000);
    }

    #[tokio::test]
    async fn cancelled_animation_disposal_can_resume() {
        let mut webp = WebpMetadata::new(512, 512);
        webp.set_format(WebpFormat::Extended);
        for _ in 0..500 {
            webp.add_frame(
                tilemeta::AnimationFrame::new(0, 0, 512, 512, 40).with_pixel_data(vec![0; 4096]),
            );
        }

        let mut controller = LifecycleController::new(webp);
        assert!(controller.has_large_metadata());

        let token = CancelToken::new();
        token.cancel();
        let err = controller.dispose_async(&token).await.unwrap_err();
        assert!(matches!(err, MetaError::Cancelled { completed_groups: 0 }));
        assert!(!controller.is_disposed());
        assert_eq!(controller.record().animation_frames.len(), 500);

        let outcome = controller.dispose_async(&CancelToken::new()).await.unwrap();
        assert_eq!(outcome.tier, DisposalTier::Batched);
        // four group boundaries plus five frame batches
        assert_eq!(outcome.yields, 9);
        assert!(controller.record().animation_frames.is_empty());
    }

    #[test]
    fn second_dispose_is_noop() {
        let mut controller = LifecycleController::new(JpegMetadata::new(64, 64));
        assert_eq!(controller.dispose().tier, DisposalTier::Immediate);
        assert_eq!(controller.dispose().tier, DisposalTier::AlreadyDisposed);
        assert!(controller.is_disposed());
    }
}
