//! Solver benchmarks: exhaustive search cost by dice count.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dice_fusion::solver::search::{solution_plan, solve};

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    group.bench_function("4_dice_solvable", |b| {
        b.iter(|| solve(black_box(&[2, 3, 4, 6]), black_box(24)))
    });

    group.bench_function("5_dice_solvable", |b| {
        b.iter(|| solve(black_box(&[1, 3, 4, 5, 6]), black_box(24)))
    });

    group.bench_function("5_dice_unsolvable", |b| {
        // No combination of five ones reaches 26; the search runs the
        // whole space.
        b.iter(|| solve(black_box(&[1, 1, 1, 1, 1]), black_box(26)))
    });

    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    c.bench_function("solution_plan/5_dice", |b| {
        b.iter(|| solution_plan(black_box(&[1, 3, 4, 5, 6]), black_box(24)))
    });
}

criterion_group!(benches, bench_solve, bench_plan);
criterion_main!(benches);
