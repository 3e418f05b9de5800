//! Module `transform::grid`.
//!
//! Validates the log-spaced input grid, extends it by power-law extrapolation and
//! zero padding, and extends sample vectors onto the same layout at evaluation time.
//!
//! Layout of an extended array of length `N`:
//! `[n_pad zeros | n_extrap_low extrapolated | original | n_extrap_high extrapolated | n_pad zeros]`.
//! The abscissae continue the same `Δln x` step through every region; only the
//! function values differ between extrapolation and padding.

use crate::core::{FftLogError, Real, Result};

/// Extended log grid shared by `prepare` and every `evaluate` call of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedGrid {
    samples: Vec<f64>,
    log_step: f64,
    original_len: usize,
    n_extrap_low: usize,
    n_extrap_high: usize,
    n_pad: usize,
}

impl ExtendedGrid {
    /// Validates `x` and builds the extended grid.
    ///
    /// # Errors
    /// [`FftLogError::Configuration`] when `x` has fewer than two samples, contains
    /// non-finite or non-positive values, is not strictly increasing, or its log
    /// spacing deviates from the first step by more than `tolerance` (relative).
    pub fn new(
        x: &[f64],
        n_extrap_low: usize,
        n_extrap_high: usize,
        n_pad: usize,
        tolerance: f64,
    ) -> Result<Self> {
        let log_step = validate_log_grid(x, tolerance)?;

        let low = n_extrap_low + n_pad;
        let high = n_extrap_high + n_pad;
        let len = x.len() + low + high;
        let ln_x0 = x[0].ln();

        let mut samples = Vec::with_capacity(len);
        for i in 0..low {
            samples.push((ln_x0 - (low - i) as f64 * log_step).exp());
        }
        samples.extend_from_slice(x);
        let ln_last = x[x.len() - 1].ln();
        for i in 1..=high {
            samples.push((ln_last + i as f64 * log_step).exp());
        }

        Ok(Self {
            samples,
            log_step,
            original_len: x.len(),
            n_extrap_low,
            n_extrap_high,
            n_pad,
        })
    }

    /// Extended abscissae, smallest first.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Extended length `N`.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Uniform step `Δln x`.
    #[inline]
    pub fn log_step(&self) -> f64 {
        self.log_step
    }

    /// Length of the caller's grid.
    #[inline]
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Index of the first original sample inside the extended array.
    #[inline]
    pub fn offset(&self) -> usize {
        self.n_extrap_low + self.n_pad
    }

    /// The caller's grid, as a view into the extended one.
    #[inline]
    pub fn original(&self) -> &[f64] {
        &self.samples[self.offset()..self.offset() + self.original_len]
    }

    /// Writes `values` (on the original grid) into `out` (extended layout),
    /// continuing both tails as power laws and zero-filling the padding.
    ///
    /// # Errors
    /// [`FftLogError::Dimension`] for length mismatches and
    /// [`FftLogError::Numerical`] for non-finite samples or tails that cannot
    /// be continued as a power law.
    pub fn extend_samples<T: Real>(&self, values: &[T], out: &mut [T]) -> Result<()> {
        if values.len() != self.original_len {
            return Err(FftLogError::Dimension {
                what: "input samples",
                expected: self.original_len,
                actual: values.len(),
            });
        }
        if out.len() != self.len() {
            return Err(FftLogError::Dimension {
                what: "extended sample buffer",
                expected: self.len(),
                actual: out.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FftLogError::numerical("input samples must be finite"));
        }

        let n = self.original_len;
        let (pad_low, rest) = out.split_at_mut(self.n_pad);
        let (extrap_low, rest) = rest.split_at_mut(self.n_extrap_low);
        let (body, rest) = rest.split_at_mut(n);
        let (extrap_high, pad_high) = rest.split_at_mut(self.n_extrap_high);

        pad_low.fill(T::zero());
        pad_high.fill(T::zero());
        body.copy_from_slice(values);

        if !extrap_low.is_empty() {
            let ratio = tail_ratio(values[0], values[1], "low")?;
            let len = extrap_low.len();
            for (i, slot) in extrap_low.iter_mut().enumerate() {
                *slot = values[0] * ratio.powi((len - i) as i32);
            }
        }
        if !extrap_high.is_empty() {
            let ratio = tail_ratio(values[n - 1], values[n - 2], "high")?;
            for (i, slot) in extrap_high.iter_mut().enumerate() {
                *slot = values[n - 1] * ratio.powi(i as i32 + 1);
            }
        }

        if out.iter().any(|v| !v.is_finite()) {
            return Err(FftLogError::numerical(
                "power-law extrapolation overflowed; reduce the extrapolation counts",
            ));
        }
        Ok(())
    }
}

/// Per-step growth factor moving outward from `edge`, whose inner neighbour is `inner`.
fn tail_ratio<T: Real>(edge: T, inner: T, side: &str) -> Result<T> {
    let zero = T::zero();
    if edge == zero {
        return Ok(zero);
    }
    if inner == zero || (edge > zero) != (inner > zero) {
        return Err(FftLogError::numerical(format!(
            "cannot continue the {side} tail as a power law: boundary samples change sign or vanish"
        )));
    }
    Ok(edge / inner)
}

fn validate_log_grid(x: &[f64], tolerance: f64) -> Result<f64> {
    if x.len() < 2 {
        return Err(FftLogError::config(format!(
            "input grid needs at least 2 samples, got {}",
            x.len()
        )));
    }
    if let Some((i, v)) = x.iter().enumerate().find(|(_, v)| !(v.is_finite() && **v > 0.0)) {
        return Err(FftLogError::config(format!(
            "grid sample {i} must be finite and > 0, got {v}"
        )));
    }
    if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
        return Err(FftLogError::config(format!(
            "grid must be strictly increasing (samples {i} and {})",
            i + 1
        )));
    }

    let log_step = (x[1] / x[0]).ln();
    for (i, w) in x.windows(2).enumerate().skip(1) {
        let step = (w[1] / w[0]).ln();
        if (step - log_step).abs() > tolerance * log_step {
            return Err(FftLogError::config(format!(
                "grid is not log-uniform: step {i} has Δln x = {step:.6e}, expected {log_step:.6e}"
            )));
        }
    }
    Ok(log_step)
}
