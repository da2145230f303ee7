//! LOD controller and scene layout benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench lod
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench lod -- drawstress

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cubeworks::scene::{cube_grid_transforms, drawstress_transforms, instance_grid};
use cubeworks::{AdaptiveLod, LodConfig};
use glam::Mat4;

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

fn bench_lod_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("lod/update");

    for &(name, dt) in &[("fast", 1.0 / 120.0), ("in_band", 1.0 / 60.0), ("slow", 1.0 / 30.0)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &dt, |b, &dt| {
            let mut lod = AdaptiveLod::new(LodConfig::default()).unwrap();
            b.iter(|| black_box(lod.update(black_box(dt))));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn bench_grid_layout(c: &mut Criterion) {
    c.bench_function("layout/cube_grid", |b| {
        b.iter(|| black_box(cube_grid_transforms(black_box(1.25))))
    });

    c.bench_function("layout/instance_grid", |b| {
        b.iter(|| black_box(instance_grid(black_box(1.25))))
    });
}

fn bench_drawstress_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/drawstress");

    for &dim in &[12u32, 24, 48] {
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, &dim| {
            b.iter(|| {
                drawstress_transforms(black_box(1.25), dim)
                    .fold(Mat4::ZERO, |acc, m| acc + m)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lod_update,
    bench_grid_layout,
    bench_drawstress_layout
);
criterion_main!(benches);
