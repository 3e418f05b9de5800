use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fftlog::{Plan, PlanConfig};
use std::hint::black_box;

fn logspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let step = (hi / lo).ln() / (n as f64 - 1.0);
    (0..n).map(|i| lo * (step * i as f64).exp()).collect()
}

fn scenario_config(x: &[f64]) -> PlanConfig {
    PlanConfig::builder()
        .grid(x.to_vec())
        .n_extrap_low(1500)
        .n_extrap_high(1500)
        .n_pad(500)
        .build()
        .expect("benchmark config should be valid")
}

fn bench_prepare_vs_evaluate(c: &mut Criterion) {
    let x = logspace(1e-5, 10.0, 1024);
    let f: Vec<f64> = x.iter().map(|k| k.powi(3) * (-k * k / 2.0).exp()).collect();

    let mut group = c.benchmark_group("fftlog_prepare_vs_evaluate");
    for n_ell in [1usize, 8, 32] {
        let ells: Vec<f64> = (0..n_ell).map(|l| l as f64).collect();

        group.bench_with_input(BenchmarkId::new("prepare", n_ell), &ells, |b, ells| {
            b.iter(|| {
                let plan: Plan =
                    Plan::prepared(scenario_config(&x), black_box(ells)).expect("prepare");
                black_box(plan.extended_len())
            })
        });

        let plan: Plan = Plan::prepared(scenario_config(&x), &ells).expect("prepare");
        group.bench_with_input(BenchmarkId::new("evaluate", n_ell), &f, |b, f| {
            b.iter(|| {
                let out = plan.evaluate(black_box(f)).expect("evaluate");
                black_box(out[0][512])
            })
        });

        let mut workspace = plan.workspace();
        let mut buffer = vec![vec![0.0; x.len()]; n_ell];
        group.bench_with_input(BenchmarkId::new("evaluate_into", n_ell), &f, |b, f| {
            b.iter(|| {
                plan.evaluate_into(&mut workspace, &mut buffer, black_box(f))
                    .expect("evaluate_into");
                black_box(buffer[0][512])
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_prepare_vs_evaluate);
criterion_main!(benches);
