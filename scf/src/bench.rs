//! Benchmark module for SCF surfaces and shifts.
//! Run with: cargo bench -p scf --features bench --bench surface

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

use crate::cube::CubeDimensions;
use crate::lags::RollLags;
use crate::shift::{ShiftEngine, ShiftMethod, SpatialAxis, roll};
use crate::surface::compute_surface;
use crate::testing::synthetic;

/// Register SCF benchmarks with Criterion.
pub fn benchmarks(c: &mut Criterion) {
    benchmark_surface_sizes(c);
    benchmark_shift_methods(c);
}

/// Surface cost as the lag grid grows, integer lags only.
fn benchmark_surface_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scf_surface");
    group.sample_size(10);

    let dims = CubeDimensions::new(32, 64, 64);
    let cube = synthetic::smooth_cube(dims, 4.0, 1);

    for size in [5, 11, 21] {
        let lags = RollLags::centered(size).unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        for method in [ShiftMethod::Auto, ShiftMethod::Fourier] {
            group.bench_function(
                BenchmarkId::new(format!("{method:?}"), format!("{size}x{size}")),
                |b| b.iter(|| black_box(compute_surface(black_box(&cube), &lags, method))),
            );
        }
    }

    group.finish();
}

/// Single shift along one axis: integer roll against the Fourier path.
fn benchmark_shift_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("scf_shift");

    for side in [64, 128, 256] {
        let dims = CubeDimensions::new(16, side, side);
        let cube = synthetic::random_cube(dims, 2);
        let engine = ShiftEngine::for_cube(&cube);
        let label = format!("{side}x{side}");

        group.throughput(Throughput::Elements(dims.sample_count() as u64));

        group.bench_function(BenchmarkId::new("roll", &label), |b| {
            b.iter(|| black_box(roll(black_box(&cube), 3, SpatialAxis::X)))
        });
        group.bench_function(BenchmarkId::new("fourier", &label), |b| {
            b.iter(|| black_box(engine.fourier_shift(black_box(&cube), 2.5, SpatialAxis::X)))
        });
    }

    group.finish();
}
