//! # 표본 시퀀스
//!
//! 솔버가 읽기만 하는 정렬된 (선택적으로 가중치가 있는) 입력 벡터

use super::error::{QuiverError, Result};

/// 검증된 정렬 표본 뷰
///
/// 비어 있지 않고, 모든 값이 유한하며, 오름차순(비감소)이다.
/// 가중치가 있으면 길이가 같고 모두 양의 유한수이다.
#[derive(Debug, Clone, Copy)]
pub struct SampleSet<'a> {
    values: &'a [f64],
    weights: Option<&'a [f64]>,
}

impl<'a> SampleSet<'a> {
    /// 가중치 없는 정렬 표본
    pub fn new(values: &'a [f64]) -> Result<Self> {
        validate_sorted(values)?;
        Ok(Self {
            values,
            weights: None,
        })
    }

    /// 표본별 가중치가 있는 정렬 표본
    pub fn weighted(values: &'a [f64], weights: &'a [f64]) -> Result<Self> {
        validate_sorted(values)?;
        if weights.len() != values.len() {
            return Err(QuiverError::invalid(format!(
                "weights length {} does not match samples length {}",
                weights.len(),
                values.len()
            )));
        }
        if let Some(i) = weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(QuiverError::invalid(format!(
                "weight at index {i} must be positive and finite, got {}",
                weights[i]
            )));
        }
        Ok(Self {
            values,
            weights: Some(weights),
        })
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    pub fn weights(&self) -> Option<&'a [f64]> {
        self.weights
    }

    /// i번째 표본의 가중치 (가중치 없으면 1)
    #[inline]
    pub fn weight(&self, i: usize) -> f64 {
        self.weights.map_or(1.0, |w| w[i])
    }

    /// 표본 수 d
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.values[0]
    }

    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// 누적합 기준점. 값을 이만큼 평행이동해 상쇄 오차를 줄임
    ///
    /// `(hi − v)(v − lo)`는 평행이동에 불변이므로 비용에는 영향이 없다.
    pub fn anchor(&self) -> f64 {
        self.values[self.values.len() / 2]
    }

    /// (가중) 제곱 L2 노름
    pub fn squared_norm(&self) -> f64 {
        match self.weights {
            Some(w) => self.values.iter().zip(w).map(|(v, w)| w * v * v).sum(),
            None => self.values.iter().map(|v| v * v).sum(),
        }
    }
}

/// 비어 있지 않고, 유한하며, 비감소인지 확인
pub fn validate_sorted(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(QuiverError::invalid("sample sequence is empty"));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(QuiverError::invalid(format!(
            "sample at index {i} is not finite ({})",
            values[i]
        )));
    }
    if let Some(i) = values.windows(2).position(|w| w[1] < w[0]) {
        return Err(QuiverError::invalid(format!(
            "samples must be sorted ascending: index {} ({}) > index {} ({})",
            i,
            values[i],
            i + 1,
            values[i + 1]
        )));
    }
    Ok(())
}
