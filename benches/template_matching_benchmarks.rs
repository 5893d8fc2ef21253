//! Benchmarks for the template search hot path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eye_tracking::template_matching::{best_match, darkest_point};
use image::{GrayImage, Luma};

/// Textured band so matching has real work to do
fn textured(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([((x.wrapping_mul(31) ^ y.wrapping_mul(17)) % 253) as u8])
    })
}

fn benchmark_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_matching");

    // Band sizes as produced by typical face boxes
    let cases = [(87u32, 66u32), (120, 90), (174, 132)];

    for (width, height) in cases {
        let band = textured(width, height);
        let template = image::imageops::crop_imm(&band, width / 3, height / 3, 24, 24).to_image();

        group.bench_with_input(
            BenchmarkId::new("nssd_24x24", format!("{width}x{height}")),
            &(band, template),
            |b, (band, template)| {
                b.iter(|| black_box(best_match(black_box(band), black_box(template))));
            },
        );
    }

    group.finish();
}

fn benchmark_darkest_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("darkest_point");

    let band = textured(87, 66);
    group.bench_function("band_87x66", |b| {
        b.iter(|| black_box(darkest_point(black_box(&band))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_best_match, benchmark_darkest_point);
criterion_main!(benches);
