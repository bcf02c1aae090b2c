//! # QUIVER 핵심 라이브러리 모듈
//!
//! 적응형 스칼라 양자화 레벨 계산의 핵심 구성 요소들

pub mod aggregates;
pub mod bins;
pub mod codebook;
pub mod config;
pub mod error;
pub mod error_model;
pub mod quantizer;
pub mod samples;
pub mod solver;

// 주요 타입들 재수출
pub use codebook::{Bracket, Codebook};
pub use config::{BinningPolicy, OutOfRangePolicy, SolverConfig};
pub use error::{QuiverError, Result};
pub use quantizer::{QuantizationResult, StochasticQuantizer};
pub use samples::SampleSet;
pub use solver::{
    AcceleratedLevelSolver, ApproximateLevelSolver, ExactLevelSolver, LevelSolution, LevelSolver,
};

#[cfg(test)]
pub mod __tests__;
