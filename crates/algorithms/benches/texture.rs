//! Benchmarks for GLCM texture statistics

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glcmkit_algorithms::texture::{calc_texture, NaPolicy, Statistic, TextureParams};
use glcmkit_core::Raster;

fn create_test_raster(size: usize, n_grey: usize) -> Raster<f64> {
    let mut r = Raster::new(size, size);
    // Varied surface with some structure
    for row in 0..size {
        for col in 0..size {
            let v = ((row * 7 + col * 13) % n_grey + 1) as f64;
            r.set(row, col, v).unwrap();
        }
    }
    r
}

fn bench_all_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("texture/all_statistics");
    group.sample_size(10);
    let params = TextureParams {
        n_grey: 32,
        window: (3, 3),
        shift: (0, 1),
        ..Default::default()
    };
    for size in [64, 128, 256] {
        let raster = create_test_raster(size, 32);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| calc_texture(black_box(&raster), &params).unwrap())
        });
    }
    group.finish();
}

fn bench_grey_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("texture/grey_levels");
    let raster_size = 128;
    for n_grey in [8, 32, 64] {
        let raster = create_test_raster(raster_size, n_grey);
        let params = TextureParams {
            n_grey,
            window: (5, 5),
            shift: (1, 1),
            statistics: vec![Statistic::Contrast, Statistic::Entropy, Statistic::Correlation],
            na_policy: NaPolicy::Any,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(n_grey), &n_grey, |b, _| {
            b.iter(|| calc_texture(black_box(&raster), &params).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_all_statistics, bench_grey_levels);
criterion_main!(benches);
