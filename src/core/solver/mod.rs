//! # 레벨 솔버
//!
//! 정렬된 표본과 코드북 크기 s가 주어지면 확률적 반올림 기대 제곱 오차의 합을
//! 최소화하는 레벨을 고른다.
//!
//! s ≥ 2이면 표본 최솟값과 최댓값을 포함하고 나머지 레벨도 표본 값인 최적해가
//! 존재하므로, 솔버는 (중복을 합친) 표본 값 위에서 탐색한다.
//! s = 1이면 단일 레벨은 범위의 중점 `(min + max) / 2`이다.

pub mod accelerated;
pub mod approximate;
mod cost;
mod engine;
pub mod exact;

pub use accelerated::AcceleratedLevelSolver;
pub use approximate::ApproximateLevelSolver;
pub use exact::ExactLevelSolver;

use self::cost::CostModel;
use self::engine::{LevelDp, SplitSearch};
use super::aggregates::{Moments, MomentsAccumulator};
use super::bins::distinct_bins;
use super::codebook::Codebook;
use super::config::SolverConfig;
use super::error::{QuiverError, Result};
use super::error_model::normalize;
use super::samples::SampleSet;
use serde::{Deserialize, Serialize};

/// 솔버 결과: 코드북과 그 코드북의 (가중) 총 기대 제곱 오차
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSolution {
    pub codebook: Codebook,
    pub total_error: f64,
}

impl LevelSolution {
    /// 입력 표본 기준 정규화 오차
    pub fn vnmse(&self, samples: &SampleSet<'_>) -> Result<f64> {
        normalize(self.total_error, samples.squared_norm())
    }
}

/// 코드북 크기 s에 대한 레벨 선택기
///
/// 호출 간 상태가 없는 순수 함수로, 같은 입력에는 항상 같은 결과를 낸다.
pub trait LevelSolver {
    /// 솔버 이름 (로그/리포트용)
    fn name(&self) -> &'static str;

    /// s개 이하의 레벨을 가진 코드북 계산
    fn solve(&self, samples: &SampleSet<'_>, s: usize) -> Result<LevelSolution>;
}

pub(crate) fn check_levels(samples: &SampleSet<'_>, s: usize) -> Result<()> {
    if s < 1 {
        return Err(QuiverError::invalid("codebook size s must be at least 1"));
    }
    if s > samples.len() {
        return Err(QuiverError::invalid(format!(
            "codebook size s={s} exceeds sample count d={}",
            samples.len()
        )));
    }
    Ok(())
}

/// 중복 값을 합친 후보 위의 비용 모델
pub(crate) fn prepare_exact(samples: &SampleSet<'_>, config: &SolverConfig) -> CostModel {
    let anchor = samples.anchor();
    let bins = distinct_bins(samples, anchor, config.parallel_threshold);
    CostModel::new(bins, samples.max(), anchor, config)
}

/// s = 1: 중점 `(min + max) / 2`. 범위 안 어느 값이든 오차 `(v − c)²`가 `((max − min) / 2)²`
/// 이하가 되는 유일한 레벨이다. 총 오차는 `Σw(v − c)²`
pub(crate) fn single_level(samples: &SampleSet<'_>) -> Result<LevelSolution> {
    let mid = samples.min() + (samples.max() - samples.min()) / 2.0;
    let mut acc = MomentsAccumulator::new();
    for (i, &v) in samples.values().iter().enumerate() {
        acc.add(Moments::of(v - mid, samples.weight(i)));
    }
    Ok(LevelSolution {
        codebook: Codebook::new(vec![mid])?,
        total_error: acc.value().second,
    })
}

/// 후보가 s개 이하이면 전부, 아니면 DP로 s개 선택
pub(crate) fn solve_candidates<S: SplitSearch>(
    cost: &CostModel,
    search: &S,
    s: usize,
) -> Result<LevelSolution> {
    let k = cost.len();
    let indices: Vec<usize> = if k <= s {
        (0..k).collect()
    } else {
        LevelDp::new(cost, search).select(s)?
    };
    let levels = indices.iter().map(|&i| cost.candidate(i)).collect();
    Ok(LevelSolution {
        codebook: Codebook::new(levels)?,
        total_error: cost.total_cost(&indices)?,
    })
}

#[cfg(test)]
mod __tests__;
