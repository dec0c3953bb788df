//! Benchmark for SCF surface computation.

use criterion::{Criterion, criterion_group, criterion_main};

fn benchmarks(c: &mut Criterion) {
    scf::bench::benchmarks(c);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
