use criterion::{criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma};
use nalgebra::Vector3;
use vloc::{
    io::map::{Keyframe, KeyframeMap, LocalizationMap},
    matching::{descriptor, DEFAULT_DESCRIPTOR_SIZE},
    pose::Pose,
};

fn frame(k: u32) -> GrayImage {
    GrayImage::from_fn(320, 240, |x, y| {
        Luma([((x * (k % 7 + 1) + y * (k % 11 + 2) + k) % 251) as u8])
    })
}

fn sequence_match_benchmark(c: &mut Criterion) {
    const KEYFRAMES: u32 = 2000;

    let keyframes = (0..KEYFRAMES)
        .map(|k| {
            Keyframe::new(
                k as f64 * 0.25,
                &Pose::from_euler(&Vector3::new(k as f64, 0.0, 0.0), 0.0, 0.0, 0.0),
                descriptor(&frame(k), DEFAULT_DESCRIPTOR_SIZE),
            )
        })
        .collect();
    let map = KeyframeMap::new(DEFAULT_DESCRIPTOR_SIZE, keyframes).unwrap();
    let queries = (1200..1205).map(frame).collect::<Vec<_>>();

    c.bench_function("descriptor", |b| {
        b.iter(|| descriptor(&queries[0], DEFAULT_DESCRIPTOR_SIZE));
    });

    c.bench_function("sequence match single", |b| {
        b.iter(|| map.sequence_matcher().find(&queries[..1], 10).unwrap());
    });

    c.bench_function("sequence match 5 frames", |b| {
        b.iter(|| map.sequence_matcher().find(&queries, 10).unwrap());
    });
}

criterion_group!(benches, sequence_match_benchmark);
criterion_main!(benches);
