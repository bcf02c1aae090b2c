//! # 레벨 DP 엔진
//!
//! `E_t(p) = min_{k<p} E_{t−1}(k) + C(k, p)` 전이를 레이어 단위로 굴린다.
//! 레이어는 직전 레이어만 있으면 되므로 메모리는 O(k)이다.
//!
//! 역추적 테이블 대신 가운데 레벨을 직접 찾는다. 왼쪽에서 앞으로 `t_l`개,
//! 오른쪽 끝에서 거꾸로 `t_r`개 레벨 레이어를 계산하고 합이 최소인 지점을 가운데 레벨로
//! 고른 뒤 양쪽 부분 문제를 재귀로 푼다. 재귀 깊이는 log s, 총 작업량은 단순 DP의 약 두 배.

use super::cost::CostModel;
use crate::core::error::Result;
use log::trace;
use std::ops::Range;

/// 한 레이어의 행 최솟값 탐색 전략
///
/// 행 i마다 열 구간 `window(i) = (from, to)` (양끝 포함) 안에서 `value(i, k)`의
/// 최솟값을 구한다. `from`은 모든 행에서 같고 `to`는 i에 대해 비감소이며,
/// 구간 밖 칸은 +∞로 본다. `value`는 사각 부등식을 만족하므로 행렬은 전체 단조이다.
pub(crate) trait SplitSearch: Sync {
    fn row_minima<W, V>(&self, rows: Range<usize>, window: &W, value: &V) -> Result<Vec<f64>>
    where
        W: Fn(usize) -> (usize, usize) + Sync,
        V: Fn(usize, usize) -> Result<f64> + Sync;
}

/// 후보 집합 위의 s-레벨 선택
pub(crate) struct LevelDp<'a, S> {
    cost: &'a CostModel,
    search: &'a S,
}

impl<'a, S: SplitSearch> LevelDp<'a, S> {
    pub fn new(cost: &'a CostModel, search: &'a S) -> Self {
        Self { cost, search }
    }

    /// 첫 후보와 마지막 후보를 포함하는 s개 후보 인덱스 (오름차순)
    ///
    /// `2 ≤ s ≤ k`를 가정한다.
    pub fn select(&self, s: usize) -> Result<Vec<usize>> {
        let last = self.cost.len() - 1;
        let mut chosen = Vec::with_capacity(s);
        chosen.push(0);
        self.place(0, last, s, &mut chosen)?;
        chosen.push(last);
        Ok(chosen)
    }

    /// lo와 hi를 양끝 레벨로 하는 t개 레벨 중 내부 레벨들을 `out`에 오름차순으로 추가
    fn place(&self, lo: usize, hi: usize, t: usize, out: &mut Vec<usize>) -> Result<()> {
        if t <= 2 {
            return Ok(());
        }
        if hi - lo + 1 <= t {
            out.extend(lo + 1..hi);
            return Ok(());
        }

        let left = (t + 1) / 2;
        let right = t - left + 1;
        let n = hi - lo;
        let forward = self.sweep(n, left, |a, b| self.cost.segment_cost(lo + a, lo + b))?;
        // 오른쪽 끝에서 거꾸로 본 같은 문제. 뒤집어도 사각 부등식은 유지된다
        let backward = self.sweep(n, right, |a, b| self.cost.segment_cost(hi - b, hi - a))?;

        let first = lo + left - 1;
        let mut split = first;
        let mut best = f64::INFINITY;
        for p in first..=(hi + 1 - right) {
            let total = forward[p - lo] + backward[hi - p];
            if total < best {
                best = total;
                split = p;
            }
        }
        trace!("levels {t} on [{lo}, {hi}]: split at {split} (cost {best:e})");

        self.place(lo, split, left, out)?;
        out.push(split);
        self.place(split, hi, right, out)
    }

    /// `layer[x]`: 상대 위치 0에서 시작해 x에서 끝나는 t개 레벨의 최소 비용 (t ≥ 2)
    fn sweep<C>(&self, n: usize, t: usize, cost: C) -> Result<Vec<f64>>
    where
        C: Fn(usize, usize) -> Result<f64> + Sync,
    {
        let mut layer = vec![f64::INFINITY; n + 1];
        for x in 1..=n {
            layer[x] = cost(0, x)?;
        }

        for used in 2..t {
            // used개 레이어는 x ≥ used − 1 에서만 유한
            let first = used - 1;
            let prev = &layer;
            let window = |x: usize| (first, x - 1);
            let value = |x: usize, k: usize| -> Result<f64> { Ok(prev[k] + cost(k, x)?) };
            let rows = first + 1..n + 1;
            let minima = self.search.row_minima(rows.clone(), &window, &value)?;

            let mut next = vec![f64::INFINITY; n + 1];
            next[rows.start..].copy_from_slice(&minima);
            layer = next;
        }
        Ok(layer)
    }
}
