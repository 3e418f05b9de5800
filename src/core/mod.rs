//! Core traits, configuration types, and library-wide result/error structures.

use num_traits::{Float, NumAssign};
use rustfft::FftNum;
use thiserror::Error;

pub mod config;

pub use config::{DerivativeOrder, PlanConfig, PlanConfigBuilder, TransformKind};

/// Errors surfaced by plan construction, preparation and evaluation.
///
/// A failed call writes no output: evaluation stages every row before copying
/// it out. A failed call with the same inputs always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FftLogError {
    /// Invalid grid, bias index, multipole or option.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Unresolved Gamma pole, non-finite samples or a failed FFT.
    #[error("numerical error: {0}")]
    Numerical(String),
    /// Input samples or output buffers do not match the plan.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    Dimension {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl FftLogError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FftLogError>;

/// Floating-point element type a [`crate::Plan`] can run its hot path in.
///
/// Implemented for `f32` and `f64`. Gamma kernels, grids and prefactors are
/// always computed in `f64` and cast once with [`Real::from_f64_lossy`].
pub trait Real: FftNum + Float + NumAssign {
    /// Converts an `f64` constant, yielding NaN if the value is not representable.
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        <Self as num_traits::FromPrimitive>::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T> Real for T where T: FftNum + Float + NumAssign {}
