//! # 확률적 양자화기
//!
//! 고정된 코드북을 값 벡터에 적용한다. 각 값마다 이진 탐색으로 둘러싼 두 레벨을
//! 찾고 독립 균등 난수 하나로 위/아래를 고른다. 호출자가 넘긴 난수원 외에는
//! 공유 가변 상태가 없다.

use super::codebook::{Bracket, Codebook};
use super::config::{OutOfRangePolicy, SolverConfig};
use super::error::{QuiverError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// 병렬 양자화 청크 크기 (청크마다 독립 시드)
const QUANTIZE_CHUNK: usize = 1 << 14;

/// 값 하나의 양자화 결과
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationResult {
    /// 양자화된 값 (코드북 레벨)
    pub value: f64,
    /// 실제 제곱 오차 `(value − 입력)²`
    pub squared_error: f64,
}

/// 코드북 기반 확률적 반올림
#[derive(Debug, Clone, Copy)]
pub struct StochasticQuantizer<'a> {
    codebook: &'a Codebook,
    policy: OutOfRangePolicy,
}

impl<'a> StochasticQuantizer<'a> {
    /// 범위 밖 값을 거부하는 양자화기
    pub fn new(codebook: &'a Codebook) -> Self {
        Self {
            codebook,
            policy: OutOfRangePolicy::Reject,
        }
    }

    /// 구성의 범위 밖 정책을 따르는 양자화기
    pub fn from_config(codebook: &'a Codebook, config: &SolverConfig) -> Self {
        Self::new(codebook).with_policy(config.out_of_range)
    }

    pub fn with_policy(mut self, policy: OutOfRangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn codebook(&self) -> &Codebook {
        self.codebook
    }

    /// 값 하나를 확률적으로 반올림
    pub fn quantize_value<R: Rng + ?Sized>(&self, v: f64, rng: &mut R) -> Result<QuantizationResult> {
        if !v.is_finite() {
            return Err(QuiverError::invalid(format!("cannot quantize non-finite value {v}")));
        }
        let value = match self.codebook.bracket(v) {
            Bracket::Exact(level) => level,
            Bracket::Between { lo, hi } => {
                let p_up = (v - lo) / (hi - lo);
                if rng.gen::<f64>() < p_up {
                    hi
                } else {
                    lo
                }
            }
            Bracket::Below(level) | Bracket::Above(level) => match self.policy {
                OutOfRangePolicy::Clamp => level,
                OutOfRangePolicy::Reject => {
                    return Err(QuiverError::OutOfRange {
                        value: v,
                        min: self.codebook.min(),
                        max: self.codebook.max(),
                    })
                }
            },
        };
        Ok(QuantizationResult {
            value,
            squared_error: (value - v) * (value - v),
        })
    }

    /// 벡터 양자화 (입력 순서 유지)
    pub fn quantize<R: Rng + ?Sized>(&self, values: &[f64], rng: &mut R) -> Result<Vec<f64>> {
        values
            .iter()
            .map(|&v| self.quantize_value(v, rng).map(|r| r.value))
            .collect()
    }

    /// 값별 실제 제곱 오차까지 함께 반환
    pub fn quantize_with_error<R: Rng + ?Sized>(
        &self,
        values: &[f64],
        rng: &mut R,
    ) -> Result<Vec<QuantizationResult>> {
        values.iter().map(|&v| self.quantize_value(v, rng)).collect()
    }

    /// rayon 병렬 양자화. 청크마다 `seed`에서 파생한 독립 StdRng를 쓰므로
    /// 같은 시드는 스레드 수와 무관하게 같은 결과를 낸다.
    pub fn quantize_parallel(&self, values: &[f64], seed: u64) -> Result<Vec<f64>> {
        Ok(self
            .quantize_parallel_with_error(values, seed)?
            .into_iter()
            .map(|r| r.value)
            .collect())
    }

    /// `quantize_parallel`과 같은 난수열로 값별 실제 제곱 오차까지 반환
    pub fn quantize_parallel_with_error(
        &self,
        values: &[f64],
        seed: u64,
    ) -> Result<Vec<QuantizationResult>> {
        let chunks: Vec<Vec<QuantizationResult>> = values
            .par_chunks(QUANTIZE_CHUNK)
            .enumerate()
            .map(|(idx, chunk)| {
                let mut rng = StdRng::seed_from_u64(chunk_seed(seed, idx));
                self.quantize_with_error(chunk, &mut rng)
            })
            .collect::<Result<_>>()?;
        Ok(chunks.concat())
    }
}

fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    seed ^ (chunk as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
