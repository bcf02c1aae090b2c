//! # 정확 솔버
//!
//! 레이어의 행 최솟값을 SMAWK로 구한다. 구간 비용의 사각 부등식 덕분에 레이어 행렬은
//! 전체 단조(totally monotone)이고, 열을 행 수 이하로 줄이는 REDUCE와 홀수 행 재귀,
//! 짝수 행 보간으로 레이어당 O(k)에 끝난다. 전체는 O(d) 전처리 + O(k·s).
//!
//! 탐색은 순차적이며 가속 솔버와 같은 오차를 낸다.

use super::engine::SplitSearch;
use super::{check_levels, prepare_exact, single_level, solve_candidates, LevelSolution, LevelSolver};
use crate::core::config::SolverConfig;
use crate::core::error::Result;
use crate::core::samples::SampleSet;
use log::debug;
use std::ops::Range;

/// 전체 단조 행렬의 선형 시간 행 최솟값 탐색
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Smawk;

impl Smawk {
    /// `rows`의 최솟값과 그 열을 기록. `cols`는 오름차순
    fn solve<L>(
        &self,
        rows: &[usize],
        cols: &[usize],
        lookup: &L,
        arg: &mut [usize],
        val: &mut [f64],
    ) -> Result<()>
    where
        L: Fn(usize, usize) -> Result<f64>,
    {
        if rows.is_empty() {
            return Ok(());
        }

        // REDUCE: 어떤 행의 최솟값도 될 수 없는 열을 버려 열 수를 행 수 이하로
        let mut kept: Vec<usize> = Vec::with_capacity(rows.len());
        for &c in cols {
            while let Some(&top) = kept.last() {
                let r = rows[kept.len() - 1];
                if lookup(r, top)? <= lookup(r, c)? {
                    break;
                }
                kept.pop();
            }
            if kept.len() < rows.len() {
                kept.push(c);
            }
        }

        let odd: Vec<usize> = rows.iter().skip(1).step_by(2).copied().collect();
        let mut odd_arg = vec![0; odd.len()];
        let mut odd_val = vec![f64::INFINITY; odd.len()];
        self.solve(&odd, &kept, lookup, &mut odd_arg, &mut odd_val)?;
        for (i, (&a, &v)) in odd_arg.iter().zip(&odd_val).enumerate() {
            arg[2 * i + 1] = a;
            val[2 * i + 1] = v;
        }

        // 짝수 행의 최솟값 열은 이웃 홀수 행 최솟값 열 사이에 있다
        let mut k = 0;
        for i in (0..rows.len()).step_by(2) {
            let stop = if i + 1 < rows.len() {
                arg[i + 1]
            } else {
                kept[kept.len() - 1]
            };
            let mut best = f64::INFINITY;
            let mut best_col = kept[k];
            loop {
                let c = kept[k];
                let v = lookup(rows[i], c)?;
                if v < best {
                    best = v;
                    best_col = c;
                }
                if c >= stop || k + 1 == kept.len() {
                    break;
                }
                k += 1;
            }
            arg[i] = best_col;
            val[i] = best;
        }
        Ok(())
    }
}

impl SplitSearch for Smawk {
    fn row_minima<W, V>(&self, rows: Range<usize>, window: &W, value: &V) -> Result<Vec<f64>>
    where
        W: Fn(usize) -> (usize, usize) + Sync,
        V: Fn(usize, usize) -> Result<f64> + Sync,
    {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let from = window(rows.start).0;
        let to = window(rows.end - 1).1;
        let lookup = |r: usize, c: usize| -> Result<f64> {
            let (lo, hi) = window(r);
            if c < lo || c > hi {
                Ok(f64::INFINITY)
            } else {
                value(r, c)
            }
        };

        let rows: Vec<usize> = rows.collect();
        let cols: Vec<usize> = (from..=to).collect();
        let mut arg = vec![0; rows.len()];
        let mut val = vec![f64::INFINITY; rows.len()];
        self.solve(&rows, &cols, &lookup, &mut arg, &mut val)?;
        Ok(val)
    }
}

/// 모든 분할점을 훑는 O(k²) 탐색. 구조 가정이 없어 다른 탐색의 기준으로 쓴다
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FullScan;

#[cfg(test)]
impl SplitSearch for FullScan {
    fn row_minima<W, V>(&self, rows: Range<usize>, window: &W, value: &V) -> Result<Vec<f64>>
    where
        W: Fn(usize) -> (usize, usize) + Sync,
        V: Fn(usize, usize) -> Result<f64> + Sync,
    {
        rows.map(|i| {
            let (from, to) = window(i);
            let mut best = f64::INFINITY;
            for k in from..=to {
                best = best.min(value(i, k)?);
            }
            Ok(best)
        })
        .collect()
    }
}

/// 전역 최적 코드북을 구하는 정확 솔버
#[derive(Debug, Clone, Default)]
pub struct ExactLevelSolver {
    config: SolverConfig,
}

impl ExactLevelSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl LevelSolver for ExactLevelSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, samples: &SampleSet<'_>, s: usize) -> Result<LevelSolution> {
        self.config.validate()?;
        check_levels(samples, s)?;
        if s == 1 {
            return single_level(samples);
        }

        let cost = prepare_exact(samples, &self.config);
        debug!(
            "exact solve: d={}, distinct={}, s={}",
            samples.len(),
            cost.len(),
            s
        );
        solve_candidates(&cost, &Smawk, s)
    }
}
