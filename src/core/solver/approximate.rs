//! # 근사 솔버
//!
//! 표본을 m개 구간으로 축약한 뒤 구간 대표값(구간 최소 표본)과 표본 최댓값만을
//! 후보 레벨로 두고 SMAWK DP를 돌린다. 구간은 정확한 충분 통계량을 들고 있으므로
//! 구간 비용은 근사가 아니고, 결과는 축약된 후보 집합 위에서의 최적 코드북이다.
//!
//! - 시간: 축약 O(d + m log d) + DP O(s·m), d와 무관한 주항
//! - 기본 `RangeBisection`은 m + 1개 후보가 m개 후보를 포함하므로 m이 1 늘 때마다
//!   오차가 증가하지 않고, `m = d`이면 정확 솔버와 같은 후보를 얻는다.
//! - `EqualCount`는 m을 두 배로 늘릴 때만 포함관계가 성립하고 `EqualRange`는 보장이 없다.

use super::cost::CostModel;
use super::exact::Smawk;
use super::{check_levels, single_level, solve_candidates, LevelSolution, LevelSolver};
use crate::core::bins::coarsen;
use crate::core::config::SolverConfig;
use crate::core::error::{QuiverError, Result};
use crate::core::samples::SampleSet;
use log::{debug, warn};

/// 구간 축약 기반 근사 솔버
#[derive(Debug, Clone)]
pub struct ApproximateLevelSolver {
    bins: usize,
    config: SolverConfig,
}

impl ApproximateLevelSolver {
    /// m개 구간을 쓰는 근사 솔버
    pub fn new(bins: usize, config: SolverConfig) -> Self {
        Self { bins, config }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl LevelSolver for ApproximateLevelSolver {
    fn name(&self) -> &'static str {
        "approx"
    }

    fn solve(&self, samples: &SampleSet<'_>, s: usize) -> Result<LevelSolution> {
        self.config.validate()?;
        check_levels(samples, s)?;
        let m = self.bins;
        if m < s || m > samples.len() {
            return Err(QuiverError::invalid(format!(
                "bin count m={m} must lie in [s, d] = [{s}, {}]",
                samples.len()
            )));
        }
        if s == 1 {
            return single_level(samples);
        }

        let anchor = samples.anchor();
        let bins = coarsen(
            samples,
            m,
            self.config.binning,
            anchor,
            self.config.parallel_threshold,
        );
        let cost = CostModel::new(bins, samples.max(), anchor, &self.config);
        debug!(
            "approximate solve: d={}, m={}, candidates={}, s={}, policy={:?}",
            samples.len(),
            m,
            cost.len(),
            s,
            self.config.binning
        );
        if cost.len() < s {
            warn!(
                "only {} candidate levels after binning into {} bins; returning fewer than s={} levels",
                cost.len(),
                m,
                s
            );
        }
        solve_candidates(&cost, &Smawk, s)
    }
}
