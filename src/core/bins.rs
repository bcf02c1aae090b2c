//! # 구간화 (coarsening)
//!
//! 정렬된 표본을 연속 구간으로 묶는다. 구간의 대표값은 구간에서 가장 작은 표본
//! (즉 후보 레벨)이고, 구간은 그 값 이상 다음 구간 대표값 미만의 모든 표본에 대한
//! 충분 통계량을 그대로 들고 있다. 같은 값의 연속 표본은 절대 두 구간으로 나뉘지 않는다.
//!
//! `RangeBisection`의 경계는 m과 무관한 하나의 순서로 뽑히므로 m개 경계는 항상
//! m + 1개 경계의 부분집합이다.

use super::aggregates::{Moments, MomentsAccumulator};
use super::config::BinningPolicy;
use super::samples::SampleSet;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// 연속 표본 구간 `[start, 다음 구간 start)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// 구간의 최소 표본 값 (후보 레벨)
    pub start: f64,
    /// 기준점만큼 평행이동한 구간 통계량
    pub moments: Moments,
}

/// 서로 다른 값마다 하나씩의 구간 (정확 솔버용)
pub fn distinct_bins(samples: &SampleSet<'_>, anchor: f64, parallel_threshold: usize) -> Vec<Bin> {
    let values = samples.values();
    let starts: Vec<usize> = (0..values.len())
        .filter(|&i| i == 0 || values[i] != values[i - 1])
        .collect();
    collect_bins(samples, &starts, anchor, parallel_threshold)
}

/// 최대 `m`개 구간으로 축약 (근사 솔버용)
pub fn coarsen(
    samples: &SampleSet<'_>,
    m: usize,
    policy: BinningPolicy,
    anchor: f64,
    parallel_threshold: usize,
) -> Vec<Bin> {
    let starts = match policy {
        BinningPolicy::RangeBisection => range_bisection_starts(samples.values(), m),
        BinningPolicy::EqualCount => equal_count_starts(samples.values(), m),
        BinningPolicy::EqualRange => equal_range_starts(samples.values(), m),
    };
    collect_bins(samples, &starts, anchor, parallel_threshold)
}

/// 두 경계 사이 값의 틈. 넓을수록 먼저 쪼개고, 폭이 같으면 왼쪽이 먼저
#[derive(Debug, Clone, Copy)]
struct Gap {
    width: f64,
    lo: usize,
    hi: usize,
}

impl Ord for Gap {
    fn cmp(&self, other: &Self) -> Ordering {
        self.width
            .total_cmp(&other.width)
            .then_with(|| other.lo.cmp(&self.lo))
    }
}

impl PartialOrd for Gap {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Gap {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Gap {}

/// 경계 `lo < hi` 사이에 다른 값이 있으면 틈으로 등록
fn push_gap(values: &[f64], lo: usize, hi: usize, heap: &mut BinaryHeap<Gap>) {
    let run_end = lo + values[lo..hi].partition_point(|&v| v <= values[lo]);
    if run_end < hi {
        heap.push(Gap {
            width: values[hi] - values[lo],
            lo,
            hi,
        });
    }
}

/// 틈의 값 중점에 가장 가까운 내부 표본 (같으면 아래쪽), 그 값 연속 구간의 시작
fn split_gap(values: &[f64], gap: Gap) -> usize {
    let run_end = gap.lo + values[gap.lo..gap.hi].partition_point(|&v| v <= values[gap.lo]);
    let target = values[gap.lo] + (values[gap.hi] - values[gap.lo]) / 2.0;
    let q = run_end + values[run_end..gap.hi].partition_point(|&v| v < target);
    let below_is_nearer = q > run_end && target - values[q - 1] <= values[q] - target;
    let pick = if q == gap.hi || below_is_nearer { q - 1 } else { q };
    values.partition_point(|&v| v < values[pick])
}

/// 최솟값과 최댓값에서 시작해 가장 넓은 값의 틈을 반씩 나눈다
///
/// 후보가 값 축 위에 고르게 놓이는 균일 격자에 가깝고, 표본이 없는 틈은 쪼개지 않는다.
/// m이 서로 다른 값의 개수 이상이면 모든 서로 다른 값이 경계가 된다.
fn range_bisection_starts(values: &[f64], m: usize) -> Vec<usize> {
    let max = values[values.len() - 1];
    let top = values.partition_point(|&v| v < max);
    let mut starts = vec![0];
    if m < 2 || top == 0 {
        return starts;
    }
    starts.push(top);

    let mut heap = BinaryHeap::new();
    push_gap(values, 0, top, &mut heap);
    while starts.len() < m {
        let Some(gap) = heap.pop() else {
            break;
        };
        let split = split_gap(values, gap);
        starts.push(split);
        push_gap(values, gap.lo, split, &mut heap);
        push_gap(values, split, gap.hi, &mut heap);
    }
    starts.sort_unstable();
    starts
}

/// `⌊k·d/m⌋` 경계를 같은 값 연속 구간의 시작으로 당긴 뒤 중복 제거
fn equal_count_starts(values: &[f64], m: usize) -> Vec<usize> {
    let d = values.len();
    let mut starts: Vec<usize> = Vec::with_capacity(m);
    for k in 0..m {
        let raw = (k as u128 * d as u128 / m as u128) as usize;
        let snapped = values[..raw].partition_point(|&v| v < values[raw]);
        if starts.last() != Some(&snapped) {
            starts.push(snapped);
        }
    }
    starts
}

/// `[min, max]`를 폭이 같은 m칸으로 나누고 비어 있지 않은 칸의 첫 표본을 시작으로
fn equal_range_starts(values: &[f64], m: usize) -> Vec<usize> {
    let min = values[0];
    let width = (values[values.len() - 1] - min) / m as f64;
    if width <= 0.0 {
        return vec![0];
    }
    let cell = |v: f64| (((v - min) / width) as usize).min(m - 1);

    let mut starts = vec![0];
    let mut current = cell(min);
    for (i, &v) in values.iter().enumerate().skip(1) {
        let c = cell(v);
        if c != current {
            starts.push(i);
            current = c;
        }
    }
    starts
}

fn collect_bins(
    samples: &SampleSet<'_>,
    starts: &[usize],
    anchor: f64,
    parallel_threshold: usize,
) -> Vec<Bin> {
    let values = samples.values();
    let end_of = |i: usize| starts.get(i + 1).copied().unwrap_or(values.len());
    let bin = |i: usize| {
        let mut acc = MomentsAccumulator::new();
        for t in starts[i]..end_of(i) {
            acc.add(Moments::of(values[t] - anchor, samples.weight(t)));
        }
        Bin {
            start: values[starts[i]],
            moments: acc.value(),
        }
    };

    if values.len() >= parallel_threshold {
        (0..starts.len()).into_par_iter().map(bin).collect()
    } else {
        (0..starts.len()).map(bin).collect()
    }
}
