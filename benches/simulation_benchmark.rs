//! Benchmarks for RaptorRisk simulation performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raptorrisk::core::rng::seeded_rng;
use raptorrisk::correlation::{build_random_correlation, repair_to_positive_definite};
use raptorrisk::portfolio::simulate_correlated_prices;
use raptorrisk::trading::TradingSimulator;

fn bench_simulate_year(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_year");
    let sim = TradingSimulator::new(100_000.0, 0.4, 30, 0.01).unwrap_or_else(|e| panic!("{}", e));

    for sims in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("sequential", sims), sims, |b, &sims| {
            let mut rng = seeded_rng(42);
            b.iter(|| black_box(sim.simulate_year(&mut rng, black_box(3.0), sims)));
        });
        group.bench_with_input(BenchmarkId::new("parallel", sims), sims, |b, &sims| {
            b.iter(|| black_box(sim.simulate_year_par(42, 0.4, black_box(3.0), sims)));
        });
    }

    group.finish();
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair_to_positive_definite");

    for n in [5, 10, 25, 50].iter() {
        group.bench_with_input(BenchmarkId::new("assets", n), n, |b, &n| {
            let mut rng = seeded_rng(7);
            let raw = build_random_correlation(&mut rng, n, -0.9, 0.9)
                .unwrap_or_else(|e| panic!("{}", e));

            b.iter(|| black_box(repair_to_positive_definite(black_box(&raw))));
        });
    }

    group.finish();
}

fn bench_correlated_prices(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_correlated_prices");

    for n in [2, 10, 50].iter() {
        group.bench_with_input(BenchmarkId::new("assets", n), n, |b, &n| {
            let mut rng = seeded_rng(11);
            let raw = build_random_correlation(&mut rng, n, -0.2, 0.8)
                .unwrap_or_else(|e| panic!("{}", e));
            let corr = repair_to_positive_definite(&raw).unwrap_or_else(|e| panic!("{}", e));
            let mean = vec![0.0004; n];
            let vol = vec![0.0126; n];

            b.iter(|| {
                let result = simulate_correlated_prices(&mut rng, n, &corr, &mean, &vol, 1260);
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulate_year, bench_repair, bench_correlated_prices);
criterion_main!(benches);
