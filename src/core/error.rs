//! # 오류 타입
//!
//! 레벨 솔버, 오차 모델, 양자화기가 공유하는 오류 분류

use thiserror::Error;

/// 양자화 레벨 계산 중 발생하는 오류
#[derive(Debug, Error)]
pub enum QuiverError {
    /// 빈 입력, 정렬되지 않은 입력, 범위를 벗어난 `s`/`m` 등
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 코드북 범위 밖의 값을 양자화하려 함
    #[error("value {value} is outside the codebook range [{min}, {max}]")]
    OutOfRange {
        /// 입력 값
        value: f64,
        /// 코드북 최솟값
        min: f64,
        /// 코드북 최댓값
        max: f64,
    },

    /// 누적합 상쇄로 허용 오차를 넘는 음수 구간 비용이 나옴
    #[error(
        "numerical instability: segment ({start}, {end}) has cost {cost:e} below -{tolerance:e}"
    )]
    NumericalInstability {
        /// 구간 시작 후보 인덱스
        start: usize,
        /// 구간 끝 후보 인덱스
        end: usize,
        /// 계산된 비용
        cost: f64,
        /// 적용된 허용 오차
        tolerance: f64,
    },

    /// 설정 파싱/검증 실패
    #[error("config error: {0}")]
    Config(String),

    /// 설정 파일 입출력 오류
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuiverError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        QuiverError::InvalidInput(message.into())
    }
}

impl From<serde_json::Error> for QuiverError {
    fn from(err: serde_json::Error) -> Self {
        QuiverError::Config(err.to_string())
    }
}

/// 크레이트 전용 Result 타입
pub type Result<T> = std::result::Result<T, QuiverError>;
