use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tilemeta::formats::jpeg::JpegMetadata;
use tilemeta::formats::svg::SvgMetadata;
use tilemeta::formats::tiff::TiffMetadata;
use tilemeta::formats::webp::{WebpFormat, WebpMetadata};
use tilemeta::{AnimationFrame, CancelToken, LifecycleController, MetadataRecord, TagValue, Validate};

const TILE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="256" height="256" viewBox="0 0 256 256">
  <title>Road tile</title>
  <g stroke="black">
    <path d="M0 128 L256 128"/>
    <path d="M128 0 L128 256"/>
    <path d="M0 0 C64 64 192 64 256 0"/>
  </g>
</svg>"#;

fn tiff_with_tags(count: u16) -> TiffMetadata {
    let mut tiff = TiffMetadata::new(4096, 4096);
    for tag in 0..count {
        tiff.custom_tags
            .insert(60000 + tag, TagValue::Ints(vec![tag as i32; 8]));
    }
    tiff.strip_offsets = vec![0; 512];
    tiff.strip_byte_counts = vec![0; 512];
    tiff.set_georeference(0.5, 0.5, 13.5, 52.5);
    tiff
}

fn animated_webp(frames: usize) -> WebpMetadata {
    let mut webp = WebpMetadata::new(512, 512);
    webp.set_format(WebpFormat::Extended);
    for i in 0..frames {
        webp.add_frame(
            AnimationFrame::new((i % 8) as i32 * 2, 0, 256, 256, 40).with_pixel_data(vec![0; 2048]),
        );
    }
    webp
}

fn bench_estimate_jpeg(c: &mut Criterion) {
    let mut jpeg = JpegMetadata::new(4096, 4096);
    jpeg.set_icc_profile(vec![0; 4096]);
    for i in 0..64 {
        jpeg.xmp_tags.insert(format!("dc:key{}", i), "value".to_string());
    }
    c.bench_function("estimate_jpeg", |b| {
        b.iter(|| black_box(&jpeg).estimated_size());
    });
}

fn bench_estimate_tiff(c: &mut Criterion) {
    let tiff = tiff_with_tags(256);
    c.bench_function("estimate_tiff_256_tags", |b| {
        b.iter(|| black_box(&tiff).estimated_size());
    });
}

fn bench_validate_tiff(c: &mut Criterion) {
    let tiff = tiff_with_tags(32);
    c.bench_function("validate_tiff", |b| {
        b.iter(|| black_box(&tiff).validate());
    });
}

fn bench_validate_webp_frames(c: &mut Criterion) {
    let webp = animated_webp(500);
    c.bench_function("validate_webp_500_frames", |b| {
        b.iter(|| black_box(&webp).validate());
    });
}

fn bench_scan_svg(c: &mut Criterion) {
    c.bench_function("scan_svg", |b| {
        b.iter(|| {
            let _svg = SvgMetadata::from_xml(black_box(TILE_SVG)).unwrap();
        });
    });
}

fn bench_dispose_async(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    c.bench_function("dispose_async_500_frames", |b| {
        b.iter(|| {
            let mut controller = LifecycleController::new(animated_webp(500));
            runtime
                .block_on(controller.dispose_async(&CancelToken::new()))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_estimate_jpeg,
    bench_estimate_tiff,
    bench_validate_tiff,
    bench_validate_webp_frames,
    bench_scan_svg,
    bench_dispose_async
);
criterion_main!(benches);
