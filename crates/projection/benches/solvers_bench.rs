//! Criterion benchmarks for the projection-method family.
//! Focus: two-ball lens (QPSolver vs APOP policies) and random halfspace
//! families of size m in {2, 5, 10, 20} (AltP vs Dykstra).
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::{dvector, DVector};
use projection::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn lens() -> Problem {
    let sets: Vec<Box<dyn ConvexSet>> = vec![
        Box::new(Ball::new(dvector![0.0, 0.0], 1.0).unwrap()),
        Box::new(Ball::new(dvector![1.5, 0.0], 1.0).unwrap()),
    ];
    Problem::new(sets, 2, Some(dvector![0.75, 3.0])).unwrap()
}

fn random_halfspaces(m: usize, dim: usize, seed: u64) -> Problem {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sets: Vec<Box<dyn ConvexSet>> = Vec::with_capacity(m);
    for _ in 0..m {
        // random direction, offset so that the origin is always feasible
        let a = DVector::from_fn(dim, |_, _| rng.gen_range(-1.0..1.0));
        let b = rng.gen_range(0.5..1.5);
        sets.push(Box::new(HalfspaceSet::new(a, b).unwrap()));
    }
    let x0 = DVector::from_element(dim, 5.0);
    Problem::new(sets, dim, Some(x0)).unwrap()
}

fn bench_lens(c: &mut Criterion) {
    let mut group = c.benchmark_group("lens");
    let opts = SolveOptions::default();
    group.bench_function("qp", |b| {
        b.iter_batched(
            lens,
            |mut p| QPSolver::default().solve(&mut p, &opts).unwrap(),
            BatchSize::SmallInput,
        )
    });
    for policy in ["exact", "elra", "erandom"] {
        let cfg = ApopCfg {
            policy: OuterPolicy::parse(policy).unwrap(),
            max_halfspaces: (policy != "exact").then_some(8),
            average: false,
            ..ApopCfg::default()
        };
        group.bench_with_input(BenchmarkId::new("apop", policy), &cfg, |b, cfg| {
            b.iter_batched(
                lens,
                |mut p| Apop::new(*cfg).solve(&mut p, &opts).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_halfspaces(c: &mut Criterion) {
    let mut group = c.benchmark_group("halfspaces");
    let opts = SolveOptions {
        max_iters: 500,
        ..SolveOptions::default()
    };
    for &m in &[2usize, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::new("altp", m), &m, |b, &m| {
            b.iter_batched(
                || random_halfspaces(m, 4, 43),
                |mut p| AltP.solve(&mut p, &opts).unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("dykstra", m), &m, |b, &m| {
            b.iter_batched(
                || random_halfspaces(m, 4, 44),
                |mut p| Dykstra.solve(&mut p, &opts).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lens, bench_halfspaces);
criterion_main!(benches);
