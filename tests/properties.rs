//! Property-based tests for size accounting, disposal and validation
//!
//! These tests use proptest to check that the record invariants hold for
//! randomly generated metadata.

use proptest::prelude::*;

use std::collections::BTreeMap;

use tilemeta::formats::jpeg::{ChromaSubsampling, JpegColorMode, JpegEncoding, JpegMetadata};
use tilemeta::formats::tiff::TiffMetadata;
use tilemeta::formats::webp::{WebpFormat, WebpMetadata};
use tilemeta::{
    AnimationFrame, AnyRecord, DisposalConfig, LifecycleController, MetadataRecord, TagValue, Validate,
};

/// Strategy for animation frames with small payloads
fn frame() -> impl Strategy<Value = AnimationFrame> {
    (
        -4i32..64,
        -4i32..64,
        -2i32..128,
        -2i32..128,
        0u32..500,
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(x, y, w, h, duration, data)| {
            AnimationFrame::new(x, y, w, h, duration).with_pixel_data(data)
        })
}

/// Strategy for WebP records with arbitrary, possibly invalid, fields
fn webp_record() -> impl Strategy<Value = WebpMetadata> {
    (
        -10i32..20_000,
        -10i32..20_000,
        prop::sample::select(vec![
            WebpFormat::Simple,
            WebpFormat::Lossless,
            WebpFormat::Extended,
        ]),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(any::<u8>(), 0..256),
        prop::collection::vec(frame(), 0..8),
        -50i32..150,
    )
        .prop_map(|(w, h, format, alpha, animated, icc, frames, quality)| {
            let mut webp = WebpMetadata::new(w, h);
            webp.set_format(format);
            webp.set_alpha(alpha);
            webp.is_animated = animated;
            webp.set_icc_profile(icc);
            webp.animation_frames = frames;
            webp.quality.set(quality);
            webp.exif.gps_latitude = Some(quality as f64);
            webp
        })
}

/// Strategy for TIFF records with custom tags
fn tiff_record() -> impl Strategy<Value = TiffMetadata> {
    (
        1i32..70_000,
        prop::collection::btree_map(
            any::<u16>(),
            prop_oneof![
                "[a-z]{0,16}".prop_map(TagValue::Str),
                prop::collection::vec(any::<i32>(), 0..8).prop_map(TagValue::Ints),
                prop::collection::vec(any::<f64>(), 0..4).prop_map(TagValue::Doubles),
                Just(TagValue::Opaque),
            ],
            0..12,
        ),
        prop::collection::vec(any::<u64>(), 0..32),
    )
        .prop_map(|(size, tags, strips)| {
            let mut tiff = TiffMetadata::new(size, size);
            tiff.custom_tags = tags;
            tiff.strip_byte_counts = strips.clone();
            tiff.strip_offsets = strips;
            tiff
        })
}

/// Strategy for JPEG records with arbitrary encoder settings and tag maps
fn jpeg_record() -> impl Strategy<Value = JpegMetadata> {
    (
        -10i32..70_000,
        -10i32..70_000,
        prop::sample::select(vec![
            JpegColorMode::Grayscale,
            JpegColorMode::Rgb,
            JpegColorMode::Cmyk,
            JpegColorMode::YCbCr,
        ]),
        0i32..6,
        prop::sample::select(vec![
            ChromaSubsampling::Yuv444,
            ChromaSubsampling::Yuv422,
            ChromaSubsampling::Yuv420,
            ChromaSubsampling::Yuv411,
        ]),
        prop::sample::select(vec![
            JpegEncoding::Baseline,
            JpegEncoding::Progressive,
            JpegEncoding::Lossless,
            JpegEncoding::Jpeg2000,
        ]),
        -50i32..150,
        prop::collection::btree_map("[a-z]{1,8}", "[a-z ]{0,24}", 0..6),
        prop::collection::btree_map("[a-z]{1,8}", "[a-z ]{0,24}", 0..6),
        any::<bool>(),
    )
        .prop_map(
            |(w, h, mode, samples, subsampling, encoding, quality, iptc, xmp, has_xmp)| {
                let mut jpeg = JpegMetadata::new(w, h);
                jpeg.color_mode = mode;
                jpeg.samples_per_pixel = samples;
                jpeg.chroma_subsampling = subsampling;
                jpeg.encoding = encoding;
                jpeg.quality.set(quality);
                jpeg.iptc_tags = iptc;
                jpeg.xmp_tags = xmp;
                jpeg.has_xmp = has_xmp;
                jpeg
            },
        )
}

/// Strategy covering the JPEG, TIFF and WebP records
fn any_record() -> impl Strategy<Value = AnyRecord> {
    prop_oneof![
        jpeg_record().prop_map(AnyRecord::from),
        tiff_record().prop_map(AnyRecord::from),
        webp_record().prop_map(AnyRecord::from),
    ]
}

/// A key absent from `map`; generated keys hold letters only
fn fresh_key(map: &BTreeMap<String, String>) -> String {
    format!("key{}", map.len())
}

proptest! {
    /// Disposing twice leaves the same state as disposing once.
    #[test]
    fn dispose_is_idempotent(webp in webp_record()) {
        let mut controller = LifecycleController::new(webp);
        controller.dispose();
        let once = controller.record().clone();
        controller.dispose();
        prop_assert_eq!(controller.record(), &once);
        prop_assert_eq!(once, WebpMetadata::default());
    }

    /// Growing a blob never shrinks the estimate, and disposal brings it
    /// down to the fixed overhead.
    #[test]
    fn estimate_is_monotonic(tiff in tiff_record(), extra in 1usize..4096) {
        let before = tiff.estimated_size();
        let mut grown = tiff.clone();
        grown.xmp_data.extend(std::iter::repeat(0u8).take(extra));
        prop_assert_eq!(grown.estimated_size(), before + extra as u64);

        grown.clear_all();
        prop_assert!(grown.estimated_size() <= before);
        prop_assert_eq!(grown.estimated_size(), grown.fixed_overhead());
    }

    /// Setting a string or adding a tag never shrinks the estimate.
    #[test]
    fn estimate_grows_with_strings_and_tags(tiff in tiff_record(), text in "[a-z]{1,32}") {
        let mut tiff = tiff;
        let mut last = tiff.estimated_size();

        tiff.core.author = Some(text.clone());
        prop_assert!(tiff.estimated_size() >= last);
        last = tiff.estimated_size();

        let tag = (0..=u16::MAX).find(|id| !tiff.custom_tags.contains_key(id));
        if let Some(tag) = tag {
            tiff.custom_tags.insert(tag, TagValue::Str(text));
        }
        prop_assert!(tiff.estimated_size() >= last);
    }

    /// Adding IPTC or XMP entries to a JPEG never shrinks the estimate.
    #[test]
    fn jpeg_estimate_grows_with_tag_maps(jpeg in jpeg_record(), value in "[a-z]{1,32}") {
        let mut jpeg = jpeg;
        let mut last = jpeg.estimated_size();

        jpeg.core.author = Some(value.clone());
        prop_assert!(jpeg.estimated_size() >= last);
        last = jpeg.estimated_size();

        let key = fresh_key(&jpeg.iptc_tags);
        jpeg.iptc_tags.insert(key, value.clone());
        prop_assert!(jpeg.estimated_size() > last);
        last = jpeg.estimated_size();

        let key = fresh_key(&jpeg.xmp_tags);
        jpeg.xmp_tags.insert(key, value);
        prop_assert!(jpeg.estimated_size() > last);
    }

    /// The large flag agrees with the threshold comparison.
    #[test]
    fn large_flag_matches_threshold(icc_len in 999_900usize..1_000_100, threshold in 999_950u64..1_000_050) {
        let mut jpeg = JpegMetadata::new(64, 64);
        jpeg.icc_profile = vec![0; icc_len];
        prop_assert_eq!(jpeg.has_large_metadata(), jpeg.estimated_size() > 1_000_000);

        let config = DisposalConfig::default().large_threshold(threshold).very_large_threshold(threshold);
        let controller = LifecycleController::with_config(jpeg, config).unwrap();
        prop_assert_eq!(controller.has_large_metadata(), controller.estimated_size() > threshold);
    }

    /// Validating the same record twice yields the same report.
    #[test]
    fn validation_is_deterministic(record in any_record()) {
        prop_assert_eq!(record.validate(), record.validate());
    }

    /// Validity depends on errors only, and every issue is exactly one of
    /// error or warning.
    #[test]
    fn errors_and_warnings_partition(record in any_record()) {
        let report = record.validate();
        prop_assert_eq!(report.error_count() + report.warning_count(), report.issues().len());
        prop_assert_eq!(report.is_valid(), report.error_count() == 0);
        prop_assert_eq!(report.errors().len(), report.error_count());
    }
}
