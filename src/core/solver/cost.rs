//! 후보 레벨 사이 구간 비용의 O(1) 계산

use crate::core::aggregates::{prefix_scan, Moments};
use crate::core::bins::Bin;
use crate::core::config::SolverConfig;
use crate::core::error::{QuiverError, Result};

/// 후보 레벨과 구간 누적 통계량
///
/// 후보 `a < b`를 인접 레벨로 쓸 때의 비용은 구간 `a..b`의 통계량으로
/// `Σ w (c_b − v)(v − c_a)`를 폐형식으로 계산한다.
#[derive(Debug, Clone)]
pub(crate) struct CostModel {
    candidates: Vec<f64>,
    anchor: f64,
    prefix: Vec<Moments>,
    tolerance: f64,
}

impl CostModel {
    /// 구간 목록과 표본 최댓값으로 생성. 최댓값이 마지막 구간 시작보다 크면
    /// 빈 구간을 덧붙여 최댓값도 후보가 되게 한다.
    pub fn new(mut bins: Vec<Bin>, max: f64, anchor: f64, config: &SolverConfig) -> Self {
        if bins.last().map_or(true, |bin| bin.start < max) {
            bins.push(Bin {
                start: max,
                moments: Moments::ZERO,
            });
        }
        let moments: Vec<Moments> = bins.iter().map(|bin| bin.moments).collect();
        let prefix = prefix_scan(&moments, config.parallel_threshold);
        let candidates = bins.into_iter().map(|bin| bin.start).collect();
        Self {
            candidates,
            anchor,
            prefix,
            tolerance: config.instability_tolerance,
        }
    }

    /// 후보 수 k
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidate(&self, i: usize) -> f64 {
        self.candidates[i]
    }

    /// 후보 a, b(a < b)를 인접 레벨로 둘 때 그 사이 표본들의 기대 제곱 오차
    ///
    /// 반올림 잡음 범위의 음수는 0으로, 그보다 큰 음수는 `NumericalInstability`.
    #[inline]
    pub fn segment_cost(&self, a: usize, b: usize) -> Result<f64> {
        debug_assert!(a < b);
        let lo = self.candidates[a] - self.anchor;
        let hi = self.candidates[b] - self.anchor;
        let upper = self.prefix[b];
        let lower = self.prefix[a];
        let cost = (upper - lower).bracket_error(lo, hi);
        if cost >= 0.0 {
            return Ok(cost);
        }
        let tolerance = self.tolerance
            * f64::EPSILON
            * (upper.bracket_magnitude(lo, hi) + lower.bracket_magnitude(lo, hi));
        if -cost <= tolerance {
            Ok(0.0)
        } else {
            Err(QuiverError::NumericalInstability {
                start: a,
                end: b,
                cost,
                tolerance,
            })
        }
    }

    /// 선택된 후보들(오름차순)이 만드는 총 오차
    pub fn total_cost(&self, indices: &[usize]) -> Result<f64> {
        indices
            .windows(2)
            .map(|w| self.segment_cost(w[0], w[1]))
            .sum()
    }
}
