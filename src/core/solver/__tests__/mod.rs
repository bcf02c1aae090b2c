pub mod exact_test;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 표준 정규 난수 (Box–Muller)
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// 정렬된 정규 분포 표본
fn normal_samples(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// 정렬된 로그정규 분포 표본 (μ = 0, σ = 1)
fn lognormal_samples(n: usize, seed: u64) -> Vec<f64> {
    let mut values = normal_samples(n, seed);
    values.iter_mut().for_each(|v| *v = v.exp());
    values
}

/// 부동소수점 허용 오차 안에서 같은 오차인지
fn assert_error_eq(a: f64, b: f64) {
    let tolerance = 1e-9 * a.abs().max(b.abs()) + 1e-12;
    assert!(
        (a - b).abs() <= tolerance,
        "오차 불일치: {a} vs {b} (허용 {tolerance:e})"
    );
}
