//! 통합 테스트 공용 표본 생성기

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 정렬된 로그정규 분포 표본 (μ = 0, σ = 1)
pub fn lognormal_samples(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<f64> = (0..n)
        .map(|_| {
            let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
            let u2: f64 = rng.gen();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            z.exp()
        })
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// 정렬된 균등 분포 표본
pub fn uniform_samples(n: usize, lo: f64, hi: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<f64> = (0..n).map(|_| rng.gen_range(lo..hi)).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// 상대 허용 오차 비교
pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()) + 1e-12
}
