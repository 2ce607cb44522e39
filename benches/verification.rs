use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use risk_assess::model::{KinematicModel, TrajectoryInput};
use risk_assess::random::{CosOfSum, RandomVariable, RandomVector, ScaledBeta};
use risk_assess::safety::ExclusionDisk;
use risk_assess::{Config, StochasticVerificationFunction};

fn accelerations(n: usize) -> RandomVector {
    let mut rv = RandomVector::default();
    for _ in 0..n {
        rv.push(ScaledBeta::new(2.0, 3.0, 1.5).unwrap());
    }
    rv
}

fn input(n: usize) -> TrajectoryInput {
    TrajectoryInput {
        x0: 0.0,
        y0: 0.0,
        v0: 1.0,
        thetas: (0..n).map(|j| 0.05 * j as f64).collect(),
    }
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for n in [4usize, 8, 16] {
        group.bench_with_input(BenchmarkId::new("kinematic_disk", n), &n, |b, &n| {
            b.iter(|| {
                let model = KinematicModel::new(n, 0.2);
                let compiled = StochasticVerificationFunction::new(ExclusionDisk::new(2.0, 0.5, 0.3), model)
                    .compile()
                    .unwrap();
                black_box(compiled.artifacts().second_monomials().len())
            });
        });
    }
    group.finish();
}

fn bench_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_prob_bound");
    for n in [4usize, 8, 16] {
        let verification =
            StochasticVerificationFunction::new(ExclusionDisk::new(2.0, 0.5, 0.3), KinematicModel::new(n, 0.2))
                .compile()
                .unwrap()
                .bind(accelerations(n))
                .unwrap();
        let input = input(n);
        group.bench_with_input(BenchmarkId::new("kinematic_disk", n), &n, |b, _| {
            b.iter(|| black_box(verification.compute_prob_bound(&input).unwrap().bound));
        });
    }
    group.finish();
}

fn bench_trig_moments(c: &mut Criterion) {
    let cos = CosOfSum::new(
        0.3,
        vec![
            Box::new(ScaledBeta::new(2.0, 2.0, 0.5).unwrap()),
            Box::new(ScaledBeta::new(1.0, 3.0, 0.25).unwrap()),
        ],
    );
    c.bench_function("cos_of_sum_moments_8", |b| {
        b.iter(|| black_box(cos.moments(black_box(8)).unwrap()))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    let n = 8;
    let verification =
        StochasticVerificationFunction::new(ExclusionDisk::new(2.0, 0.5, 0.3), KinematicModel::new(n, 0.2))
            .config(Config::default().seed(1))
            .compile()
            .unwrap()
            .bind(accelerations(n))
            .unwrap();
    let input = input(n);
    group.bench_function("kinematic_disk_10k", |b| {
        b.iter(|| black_box(verification.monte_carlo_result(&input, 10_000, 0.2).unwrap().probability));
    });
    group.finish();
}

criterion_group!(benches, bench_compile, bench_bound, bench_trig_moments, bench_monte_carlo);
criterion_main!(benches);
