//! # 코드북
//!
//! 엄격히 증가하는 양자화 레벨 목록

use super::error::{QuiverError, Result};
use serde::{Deserialize, Serialize};

/// 값 v를 둘러싼 코드북 레벨
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket {
    /// v가 레벨과 정확히 같음
    Exact(f64),
    /// 인접한 두 레벨 사이 (`lo < v < hi`)
    Between { lo: f64, hi: f64 },
    /// 첫 레벨보다 작음
    Below(f64),
    /// 마지막 레벨보다 큼
    Above(f64),
}

/// 양자화 레벨 집합 (엄격히 증가, 모두 유한)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Codebook {
    levels: Vec<f64>,
}

impl Codebook {
    /// 레벨 목록 검증 후 생성
    pub fn new(levels: Vec<f64>) -> Result<Self> {
        if levels.is_empty() {
            return Err(QuiverError::invalid("codebook must have at least one level"));
        }
        if let Some(i) = levels.iter().position(|l| !l.is_finite()) {
            return Err(QuiverError::invalid(format!(
                "codebook level {i} is not finite ({})",
                levels[i]
            )));
        }
        if let Some(i) = levels.windows(2).position(|w| w[1] <= w[0]) {
            return Err(QuiverError::invalid(format!(
                "codebook levels must be strictly increasing: level {} ({}) >= level {} ({})",
                i,
                levels[i],
                i + 1,
                levels[i + 1]
            )));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// 레벨 수 s
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.levels[0]
    }

    pub fn max(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }

    pub fn contains_range(&self, v: f64) -> bool {
        v >= self.min() && v <= self.max()
    }

    /// 이진 탐색으로 v를 둘러싼 레벨 찾기, O(log s)
    ///
    /// `hi`는 v 이상인 가장 작은 레벨, `lo`는 그 직전 레벨이다.
    pub fn bracket(&self, v: f64) -> Bracket {
        let idx = self.levels.partition_point(|&l| l < v);
        if idx == self.levels.len() {
            return Bracket::Above(self.max());
        }
        let hi = self.levels[idx];
        if hi == v {
            Bracket::Exact(hi)
        } else if idx == 0 {
            Bracket::Below(hi)
        } else {
            Bracket::Between {
                lo: self.levels[idx - 1],
                hi,
            }
        }
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.levels
    }
}

impl TryFrom<Vec<f64>> for Codebook {
    type Error = QuiverError;

    fn try_from(levels: Vec<f64>) -> Result<Self> {
        Codebook::new(levels)
    }
}

impl From<Codebook> for Vec<f64> {
    fn from(codebook: Codebook) -> Vec<f64> {
        codebook.levels
    }
}
