//! Benchmarks for overlay rendering and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use anomaly::AnomalySet;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lst_common::Raster;
use renderer::{gradient, png, render_overlay, OverlayStyle};
use test_utils::generators::create_lst_grid_with_plume;

fn plume_raster(size: usize) -> Raster {
    let data = create_lst_grid_with_plume(size, size, size / 2, size / 3, 2, 12.0);
    Raster::new(size, size, data).expect("valid raster")
}

fn bench_render_heat(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_heat");

    for size in [20usize, 64, 256] {
        let raster = plume_raster(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &raster, |b, raster| {
            b.iter(|| {
                gradient::render_heat(
                    black_box(raster.data()),
                    raster.width(),
                    raster.height(),
                    25.0,
                    52.0,
                )
            })
        });
    }

    group.finish();
}

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_overlay");

    for size in [20usize, 64] {
        let raster = plume_raster(size);
        let anomalies: AnomalySet = (0..raster.len()).step_by(17).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &raster, |b, raster| {
            b.iter(|| render_overlay(black_box(raster), &anomalies, &OverlayStyle::default()))
        });
    }

    group.finish();
}

fn bench_png(c: &mut Criterion) {
    let raster = plume_raster(64);
    let overlay = render_overlay(&raster, &AnomalySet::empty(), &OverlayStyle::default())
        .expect("overlay renders");
    let (w, h) = (overlay.width() as usize, overlay.height() as usize);

    c.bench_function("png_auto_overlay", |b| {
        b.iter(|| png::create_png_auto(black_box(overlay.image.as_raw()), w, h))
    });
}

criterion_group!(benches, bench_render_heat, bench_overlay, bench_png);
criterion_main!(benches);
