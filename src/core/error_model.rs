//! # 오차 모델
//!
//! 확률적 반올림의 기대 제곱 오차.
//! `lo ≤ v ≤ hi`인 값 v는 확률 `(v − lo)/(hi − lo)`로 hi, 나머지로 lo가 되며
//! (`E[Q(v)] = v`), 그 기대 제곱 오차는 `(hi − v)(v − lo)`이다.
//!
//! 코드북 범위 밖의 값은 가장 가까운 경계 레벨로 결정적으로 반올림된다고 보고
//! `(v − 경계)²`를 부과한다. 솔버가 만든 코드북(s ≥ 2)은 표본 최솟값과 최댓값을
//! 포함하므로 표본에 대해서는 이 경우가 생기지 않는다.

use super::codebook::{Bracket, Codebook};
use super::error::{QuiverError, Result};

/// 구간 [lo, hi] 안의 값 하나의 기대 제곱 오차
#[inline]
pub fn interval_error(lo: f64, hi: f64, v: f64) -> f64 {
    (hi - v) * (v - lo)
}

/// 코드북에 대한 값 하나의 오차
pub fn sample_error(codebook: &Codebook, v: f64) -> f64 {
    match codebook.bracket(v) {
        Bracket::Exact(_) => 0.0,
        Bracket::Between { lo, hi } => interval_error(lo, hi, v),
        Bracket::Below(level) | Bracket::Above(level) => (v - level) * (v - level),
    }
}

/// 총 기대 제곱 오차 (입력은 정렬되어 있을 필요 없음)
pub fn total_error(values: &[f64], codebook: &Codebook) -> Result<f64> {
    check_values(values)?;
    Ok(values.iter().map(|&v| sample_error(codebook, v)).sum())
}

/// 가중 총 기대 제곱 오차
pub fn total_error_weighted(values: &[f64], weights: &[f64], codebook: &Codebook) -> Result<f64> {
    check_values(values)?;
    check_weights(values, weights)?;
    Ok(values
        .iter()
        .zip(weights)
        .map(|(&v, &w)| w * sample_error(codebook, v))
        .sum())
}

/// 정규화 오차 vNMSE = 총 오차 / ‖values‖²
pub fn vnmse(values: &[f64], codebook: &Codebook) -> Result<f64> {
    let error = total_error(values, codebook)?;
    let norm: f64 = values.iter().map(|v| v * v).sum();
    normalize(error, norm)
}

/// 가중 vNMSE = Σw·오차 / Σw·v²
pub fn vnmse_weighted(values: &[f64], weights: &[f64], codebook: &Codebook) -> Result<f64> {
    let error = total_error_weighted(values, weights, codebook)?;
    let norm: f64 = values.iter().zip(weights).map(|(v, w)| w * v * v).sum();
    normalize(error, norm)
}

pub(crate) fn normalize(error: f64, squared_norm: f64) -> Result<f64> {
    if squared_norm <= 0.0 {
        return Err(QuiverError::invalid(
            "normalized error is undefined for a zero-norm vector",
        ));
    }
    Ok(error / squared_norm)
}

fn check_values(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(QuiverError::invalid("value vector is empty"));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(QuiverError::invalid(format!(
            "value at index {i} is not finite ({})",
            values[i]
        )));
    }
    Ok(())
}

fn check_weights(values: &[f64], weights: &[f64]) -> Result<()> {
    if weights.len() != values.len() {
        return Err(QuiverError::invalid(format!(
            "weights length {} does not match values length {}",
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
    Ok(())
}
