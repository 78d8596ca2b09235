//! Benchmarks the batched multi-scalar multiplication against the naive
//! per-point scalar-mul.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ff::Field;
use group::Group;
use rand_core::SeedableRng;
use rand_xorshift::XorShiftRng;

use crypto_accumulators::curve::{Scalar, G1};
use crypto_accumulators::multiexp::{multiscalar_mul, naive_multiscalar_mul};

fn gen_inputs(n: usize) -> (Vec<G1>, Vec<Scalar>) {
    let mut rng = XorShiftRng::from_seed([11u8; 16]);
    let points: Vec<G1> = (0..n).map(|_| G1::random(&mut rng)).collect();
    let scalars: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
    (points, scalars)
}

fn bench_multiscalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiscalar_mul");
    for &size in &[8usize, 64, 512, 4096] {
        group.bench_with_input(BenchmarkId::new("heap_reduction", size), &size, |b, &size| {
            b.iter_batched(
                || gen_inputs(size),
                |(points, scalars)| black_box(multiscalar_mul(points, scalars)),
                criterion::BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("naive", size), &size, |b, &size| {
            b.iter_batched(
                || gen_inputs(size),
                |(points, scalars)| black_box(naive_multiscalar_mul(&points, &scalars)),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_multiscalar);
criterion_main!(benches);
