//! # 누적 통계량 (prefix aggregates)
//!
//! 구간 비용을 O(1)에 계산하기 위한 가중치, Σw·x, Σw·x² 누적합.
//! 보정 합(Neumaier)으로 누적하고, 큰 입력은 rayon으로 청크 병렬 스캔한다.
//! 청크 경계는 스레드 수와 무관하게 고정이므로 순차/병렬 결과가 비트 단위로 같다.

use rayon::prelude::*;
use std::ops::{Add, Sub};

/// 병렬 스캔 청크 크기
const SCAN_CHUNK: usize = 1 << 12;

/// 충분 통계량 (w, Σw·x, Σw·x²). x는 기준점만큼 평행이동한 값
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub weight: f64,
    pub first: f64,
    pub second: f64,
}

impl Moments {
    pub const ZERO: Moments = Moments {
        weight: 0.0,
        first: 0.0,
        second: 0.0,
    };

    /// 단일 표본의 통계량
    #[inline]
    pub fn of(shifted: f64, weight: f64) -> Self {
        Self {
            weight,
            first: weight * shifted,
            second: weight * shifted * shifted,
        }
    }

    /// `Σ w (hi − x)(x − lo)` = `−Σwx² + (lo+hi)Σwx − lo·hi·Σw`
    #[inline]
    pub fn bracket_error(&self, lo: f64, hi: f64) -> f64 {
        -self.second + (lo + hi) * self.first - lo * hi * self.weight
    }

    /// `bracket_error` 계산에 들어가는 항들의 절대 크기 합
    #[inline]
    pub fn bracket_magnitude(&self, lo: f64, hi: f64) -> f64 {
        self.second.abs() + ((lo + hi) * self.first).abs() + (lo * hi * self.weight).abs()
    }
}

impl Add for Moments {
    type Output = Moments;

    fn add(self, rhs: Moments) -> Moments {
        Moments {
            weight: self.weight + rhs.weight,
            first: self.first + rhs.first,
            second: self.second + rhs.second,
        }
    }
}

impl Sub for Moments {
    type Output = Moments;

    fn sub(self, rhs: Moments) -> Moments {
        Moments {
            weight: self.weight - rhs.weight,
            first: self.first - rhs.first,
            second: self.second - rhs.second,
        }
    }
}

/// Neumaier 보정 합
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn starting_at(value: f64) -> Self {
        Self {
            sum: value,
            compensation: 0.0,
        }
    }

    #[inline]
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline]
    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// 통계량 보정 누적기
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentsAccumulator {
    weight: CompensatedSum,
    first: CompensatedSum,
    second: CompensatedSum,
}

impl MomentsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: Moments) -> Self {
        Self {
            weight: CompensatedSum::starting_at(start.weight),
            first: CompensatedSum::starting_at(start.first),
            second: CompensatedSum::starting_at(start.second),
        }
    }

    #[inline]
    pub fn add(&mut self, m: Moments) {
        self.weight.add(m.weight);
        self.first.add(m.first);
        self.second.add(m.second);
    }

    #[inline]
    pub fn value(&self) -> Moments {
        Moments {
            weight: self.weight.value(),
            first: self.first.value(),
            second: self.second.value(),
        }
    }
}

/// 배타적 누적합: 결과 길이는 `items.len() + 1`, `prefix[i] = Σ items[..i]`
///
/// `items.len() >= parallel_threshold`이면 청크별 합과 채우기를 병렬로 수행한다.
pub fn prefix_scan(items: &[Moments], parallel_threshold: usize) -> Vec<Moments> {
    let parallel = items.len() >= parallel_threshold;

    let chunk_total = |chunk: &[Moments]| {
        let mut acc = MomentsAccumulator::new();
        chunk.iter().for_each(|m| acc.add(*m));
        acc.value()
    };
    let totals: Vec<Moments> = if parallel {
        items.par_chunks(SCAN_CHUNK).map(chunk_total).collect()
    } else {
        items.chunks(SCAN_CHUNK).map(chunk_total).collect()
    };

    let mut offsets = Vec::with_capacity(totals.len());
    let mut running = MomentsAccumulator::new();
    for total in &totals {
        offsets.push(running.value());
        running.add(*total);
    }

    let fill = |((out, chunk), offset): ((&mut [Moments], &[Moments]), &Moments)| {
        let mut acc = MomentsAccumulator::starting_at(*offset);
        for (slot, m) in out.iter_mut().zip(chunk) {
            acc.add(*m);
            *slot = acc.value();
        }
    };

    let mut prefix = vec![Moments::ZERO; items.len() + 1];
    if parallel {
        prefix[1..]
            .par_chunks_mut(SCAN_CHUNK)
            .zip(items.par_chunks(SCAN_CHUNK))
            .zip(offsets.par_iter())
            .for_each(fill);
    } else {
        prefix[1..]
            .chunks_mut(SCAN_CHUNK)
            .zip(items.chunks(SCAN_CHUNK))
            .zip(offsets.iter())
            .for_each(fill);
    }
    prefix
}
