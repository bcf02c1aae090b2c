//! QUIVER 적응형 스칼라 양자화 라이브러리
//!
//! 정렬된 표본과 코드북 크기 s가 주어지면 확률적 반올림(불편 추정) 하에서
//! 기대 제곱 오차의 합이 최소가 되는 양자화 레벨을 계산한다.
//!
//! - [`solve_exact`]: SMAWK 행 최솟값 탐색을 쓰는 O(d·s) DP
//! - [`solve_exact_accelerated`]: rayon 병렬 단조 분할 정복 DP (같은 오차)
//! - [`solve_approximate`]: m개 구간으로 축약한 뒤 푸는 근사 DP
//! - [`quantize`], [`error_metric`]: 코드북 적용과 vNMSE

pub mod core;

pub use crate::core::{
    AcceleratedLevelSolver, ApproximateLevelSolver, BinningPolicy, Bracket, Codebook,
    ExactLevelSolver, LevelSolution, LevelSolver, OutOfRangePolicy, QuantizationResult,
    QuiverError, Result, SampleSet, SolverConfig, StochasticQuantizer,
};

use rand::Rng;

/// 정렬된 표본에 대한 최적 코드북
pub fn solve_exact(samples: &[f64], s: usize) -> Result<Codebook> {
    ExactLevelSolver::default()
        .solve(&SampleSet::new(samples)?, s)
        .map(|solution| solution.codebook)
}

/// 가중 표본에 대한 최적 코드북
pub fn solve_exact_weighted(samples: &[f64], weights: &[f64], s: usize) -> Result<Codebook> {
    ExactLevelSolver::default()
        .solve(&SampleSet::weighted(samples, weights)?, s)
        .map(|solution| solution.codebook)
}

/// `solve_exact`와 같은 오차의 코드북을 더 빠르게 계산
pub fn solve_exact_accelerated(samples: &[f64], s: usize) -> Result<Codebook> {
    AcceleratedLevelSolver::default()
        .solve(&SampleSet::new(samples)?, s)
        .map(|solution| solution.codebook)
}

/// 가중 표본 가속 버전
pub fn solve_exact_accelerated_weighted(
    samples: &[f64],
    weights: &[f64],
    s: usize,
) -> Result<Codebook> {
    AcceleratedLevelSolver::default()
        .solve(&SampleSet::weighted(samples, weights)?, s)
        .map(|solution| solution.codebook)
}

/// m개 구간(`s ≤ m ≤ d`)으로 축약해 푸는 근사 코드북
pub fn solve_approximate(samples: &[f64], s: usize, m: usize) -> Result<Codebook> {
    ApproximateLevelSolver::new(m, SolverConfig::default())
        .solve(&SampleSet::new(samples)?, s)
        .map(|solution| solution.codebook)
}

/// 가중 표본 근사 버전
pub fn solve_approximate_weighted(
    samples: &[f64],
    weights: &[f64],
    s: usize,
    m: usize,
) -> Result<Codebook> {
    ApproximateLevelSolver::new(m, SolverConfig::default())
        .solve(&SampleSet::weighted(samples, weights)?, s)
        .map(|solution| solution.codebook)
}

/// 코드북으로 확률적 양자화. 범위 밖 값은 `OutOfRange` 오류
pub fn quantize<R: Rng + ?Sized>(values: &[f64], codebook: &Codebook, rng: &mut R) -> Result<Vec<f64>> {
    StochasticQuantizer::new(codebook).quantize(values, rng)
}

/// vNMSE: 총 기대 제곱 오차 / ‖values‖²
pub fn error_metric(values: &[f64], codebook: &Codebook) -> Result<f64> {
    crate::core::error_model::vnmse(values, codebook)
}

/// 가중 vNMSE
pub fn error_metric_weighted(values: &[f64], weights: &[f64], codebook: &Codebook) -> Result<f64> {
    crate::core::error_model::vnmse_weighted(values, weights, codebook)
}
