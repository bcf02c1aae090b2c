//! # 솔버 구성 설정
//!
//! 구간화 정책, 병렬화 임계값, 수치 허용 오차, 범위 밖 값 처리 정책

use super::error::{QuiverError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 근사 솔버의 구간화(coarsening) 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningPolicy {
    /// 가장 넓은 값의 틈부터 반씩 나누는 균일 격자형 구간. m을 1씩 늘려도 경계가 보존됨
    RangeBisection,
    /// 표본 개수가 (거의) 같은 구간. 경계는 `⌊k·d/m⌋` 번째 표본
    EqualCount,
    /// 값의 폭이 같은 구간. 비어 있는 구간은 버림
    EqualRange,
}

/// 코드북 범위 밖의 값을 양자화할 때의 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// `OutOfRange` 오류 반환
    Reject,
    /// 가장 가까운 경계 레벨로 결정적 반올림
    Clamp,
}

/// 레벨 솔버 전체 구성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// 근사 솔버 구간화 정책
    pub binning: BinningPolicy,
    /// 이 크기 이상의 누적합/분할점 탐색은 rayon으로 병렬 처리
    pub parallel_threshold: usize,
    /// 음수 구간 비용 허용 배수 (f64::EPSILON × 항 크기 × 이 값)
    pub instability_tolerance: f64,
    /// 양자화기의 범위 밖 값 처리
    pub out_of_range: OutOfRangePolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            binning: BinningPolicy::RangeBisection,
            parallel_threshold: 1 << 15,
            instability_tolerance: 64.0,
            out_of_range: OutOfRangePolicy::Reject,
        }
    }
}

impl SolverConfig {
    /// 기본 구성 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 구간화 정책 설정
    pub fn with_binning(mut self, binning: BinningPolicy) -> Self {
        self.binning = binning;
        self
    }

    /// 병렬화 임계값 설정
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// 수치 불안정 허용 배수 설정
    pub fn with_instability_tolerance(mut self, tolerance: f64) -> Self {
        self.instability_tolerance = tolerance;
        self
    }

    /// 범위 밖 값 정책 설정
    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    /// 구성 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(QuiverError::Config(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        if !self.instability_tolerance.is_finite() || self.instability_tolerance < 0.0 {
            return Err(QuiverError::Config(format!(
                "instability_tolerance must be a finite non-negative number, got {}",
                self.instability_tolerance
            )));
        }
        Ok(())
    }

    /// JSON 문자열에서 구성 로드 (누락된 필드는 기본값)
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// JSON 파일에서 구성 로드
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
