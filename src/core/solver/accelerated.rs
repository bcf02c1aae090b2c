//! # 가속 솔버
//!
//! 구간 비용 `C(a, b)`는 사각 부등식(Monge)을 만족하므로 각 레이어에서 행 i의
//! 최적 분할점은 i에 대해 비감소이다. 가운데 행의 최적점을 찾고 그 점으로 양쪽
//! 행들의 탐색 범위를 자르는 분할 정복으로 레이어당 O(k log k)에 계산한다.
//! 두 하위 문제는 서로 독립이라 큰 구간은 `rayon::join`으로 병렬 처리한다.

use super::engine::SplitSearch;
use super::{check_levels, prepare_exact, single_level, solve_candidates, LevelSolution, LevelSolver};
use crate::core::config::SolverConfig;
use crate::core::error::Result;
use crate::core::samples::SampleSet;
use log::debug;
use std::ops::Range;

/// 단조 분할점 분할 정복 탐색
#[derive(Debug, Clone, Copy)]
pub(crate) struct MonotoneSearch {
    parallel_threshold: usize,
}

impl MonotoneSearch {
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// `rows`의 최솟값을 `out`에 기록. 최적 분할점은 `[opt_lo, opt_hi]` 안에 있다.
    fn divide<W, V>(
        &self,
        rows: Range<usize>,
        opt_lo: usize,
        opt_hi: usize,
        window: &W,
        value: &V,
        out: &mut [f64],
    ) -> Result<()>
    where
        W: Fn(usize) -> (usize, usize) + Sync,
        V: Fn(usize, usize) -> Result<f64> + Sync,
    {
        if rows.is_empty() {
            return Ok(());
        }
        let mid = rows.start + rows.len() / 2;
        let (from, to) = window(mid);
        let from = from.max(opt_lo);
        let to = to.min(opt_hi);

        let mut best = f64::INFINITY;
        let mut arg = from;
        for k in from..=to {
            let v = value(mid, k)?;
            if v < best {
                best = v;
                arg = k;
            }
        }

        let (left_out, rest) = out.split_at_mut(mid - rows.start);
        let (slot, right_out) = rest.split_at_mut(1);
        slot[0] = best;

        let left_rows = rows.start..mid;
        let right_rows = mid + 1..rows.end;
        if rows.len() >= self.parallel_threshold {
            let (left, right) = rayon::join(
                || self.divide(left_rows, opt_lo, arg, window, value, left_out),
                || self.divide(right_rows, arg, opt_hi, window, value, right_out),
            );
            left?;
            right
        } else {
            self.divide(left_rows, opt_lo, arg, window, value, left_out)?;
            self.divide(right_rows, arg, opt_hi, window, value, right_out)
        }
    }
}

impl SplitSearch for MonotoneSearch {
    fn row_minima<W, V>(&self, rows: Range<usize>, window: &W, value: &V) -> Result<Vec<f64>>
    where
        W: Fn(usize) -> (usize, usize) + Sync,
        V: Fn(usize, usize) -> Result<f64> + Sync,
    {
        let mut out = vec![f64::INFINITY; rows.len()];
        if rows.is_empty() {
            return Ok(out);
        }
        let opt_lo = window(rows.start).0;
        let opt_hi = window(rows.end - 1).1;
        self.divide(rows, opt_lo, opt_hi, window, value, &mut out)?;
        Ok(out)
    }
}

/// 정확 솔버와 같은 오차를 내는 가속 솔버
#[derive(Debug, Clone, Default)]
pub struct AcceleratedLevelSolver {
    config: SolverConfig,
}

impl AcceleratedLevelSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl LevelSolver for AcceleratedLevelSolver {
    fn name(&self) -> &'static str {
        "exact_accelerated"
    }

    fn solve(&self, samples: &SampleSet<'_>, s: usize) -> Result<LevelSolution> {
        self.config.validate()?;
        check_levels(samples, s)?;
        if s == 1 {
            return single_level(samples);
        }

        let cost = prepare_exact(samples, &self.config);
        debug!(
            "accelerated solve: d={}, distinct={}, s={}",
            samples.len(),
            cost.len(),
            s
        );
        solve_candidates(&cost, &MonotoneSearch::new(self.config.parallel_threshold), s)
    }
}
