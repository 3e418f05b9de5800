//! Plan configuration and its builder.

use serde::{Deserialize, Serialize};

use super::{FftLogError, Result};

/// Default bias index used by the FFTLog literature for smooth inputs.
pub const DEFAULT_BIAS: f64 = 1.01;
/// Default fraction of the half spectrum tapered by the coefficient window.
pub const DEFAULT_WINDOW_WIDTH: f64 = 0.25;
/// Default relative tolerance on the log spacing of the input grid.
pub const DEFAULT_LOG_SPACING_TOLERANCE: f64 = 1e-6;

/// Bessel kernel family of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    /// `F(y) = ∫ dx/x f(x) j_ℓ^(n)(xy)`.
    #[default]
    SphericalBessel,
    /// `F(y) = ∫ dx x f(x) J_ℓ(xy)`, evaluated through `j_{ℓ-1/2}`.
    Hankel,
}

impl TransformKind {
    /// Spherical-Bessel order that carries the kernel for a requested multipole.
    #[inline]
    pub fn effective_ell(self, ell: f64) -> f64 {
        match self {
            Self::SphericalBessel => ell,
            Self::Hankel => ell - 0.5,
        }
    }
}

/// Derivative order `n` of the spherical Bessel function in the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeOrder {
    #[default]
    Zero,
    First,
    Second,
}

impl DerivativeOrder {
    /// Numeric order `n`.
    #[inline]
    pub fn as_usize(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::First => 1,
            Self::Second => 2,
        }
    }

    /// Maps `0`, `1`, `2` to an order.
    pub fn from_usize(n: usize) -> Result<Self> {
        match n {
            0 => Ok(Self::Zero),
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(FftLogError::config(format!(
                "derivative order must be 0, 1 or 2, got {other}"
            ))),
        }
    }
}

/// Immutable description of an FFTLog transform.
///
/// Grid validation happens when a [`crate::Plan`] is built from the config;
/// [`PlanConfigBuilder::build`] only checks scalar options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Log-spaced input abscissae `x`.
    pub grid: Vec<f64>,
    /// Power-law extrapolated samples below the grid.
    pub n_extrap_low: usize,
    /// Power-law extrapolated samples above the grid.
    pub n_extrap_high: usize,
    /// Zero-valued samples added at each end after extrapolation.
    pub n_pad: usize,
    /// Bias index `ν`.
    pub bias: f64,
    /// Default derivative order used by [`crate::Plan::prepare`].
    pub order: DerivativeOrder,
    /// Kernel family.
    pub kind: TransformKind,
    /// Fraction of the half spectrum tapered by the window (`0` disables it).
    pub window_width: f64,
    /// Relative tolerance on `Δln x` between consecutive samples.
    pub log_spacing_tolerance: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            grid: Vec::new(),
            n_extrap_low: 0,
            n_extrap_high: 0,
            n_pad: 0,
            bias: DEFAULT_BIAS,
            order: DerivativeOrder::Zero,
            kind: TransformKind::SphericalBessel,
            window_width: DEFAULT_WINDOW_WIDTH,
            log_spacing_tolerance: DEFAULT_LOG_SPACING_TOLERANCE,
        }
    }
}

impl PlanConfig {
    /// Starts a config builder.
    ///
    /// # Examples
    /// ```
    /// use fftlog::{PlanConfig, TransformKind};
    ///
    /// let x: Vec<f64> = (0..64).map(|i| 10f64.powf(-2.0 + i as f64 / 16.0)).collect();
    /// let config = PlanConfig::builder()
    ///     .grid(x)
    ///     .kind(TransformKind::Hankel)
    ///     .n_pad(32)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.extended_len(), 128);
    /// ```
    #[inline]
    pub fn builder() -> PlanConfigBuilder {
        PlanConfigBuilder::default()
    }

    /// Samples added below the original grid (extrapolation plus padding).
    #[inline]
    pub fn low_extension(&self) -> usize {
        self.n_extrap_low + self.n_pad
    }

    /// Samples added above the original grid (extrapolation plus padding).
    #[inline]
    pub fn high_extension(&self) -> usize {
        self.n_extrap_high + self.n_pad
    }

    /// Total length `N` of the extended grid.
    #[inline]
    pub fn extended_len(&self) -> usize {
        self.grid.len() + self.low_extension() + self.high_extension()
    }

    /// Checks scalar options. Grid shape is checked by the grid preprocessor.
    pub fn validate(&self) -> Result<()> {
        if !self.bias.is_finite() {
            return Err(FftLogError::config("bias index must be finite"));
        }
        if !self.window_width.is_finite() || !(0.0..=1.0).contains(&self.window_width) {
            return Err(FftLogError::config(format!(
                "window width must lie in [0, 1], got {}",
                self.window_width
            )));
        }
        if !self.log_spacing_tolerance.is_finite() || self.log_spacing_tolerance <= 0.0 {
            return Err(FftLogError::config(
                "log spacing tolerance must be finite and > 0",
            ));
        }
        if self.kind == TransformKind::Hankel && self.order != DerivativeOrder::Zero {
            return Err(FftLogError::config(
                "hankel transforms support derivative order 0 only",
            ));
        }
        if self.extended_len() % 2 != 0 {
            return Err(FftLogError::config(format!(
                "extended grid length must be even, got {}",
                self.extended_len()
            )));
        }
        Ok(())
    }
}

/// Builder for [`PlanConfig`].
#[derive(Debug, Clone, Default)]
pub struct PlanConfigBuilder {
    grid: Option<Vec<f64>>,
    n_extrap_low: Option<usize>,
    n_extrap_high: Option<usize>,
    n_pad: Option<usize>,
    bias: Option<f64>,
    order: Option<DerivativeOrder>,
    kind: Option<TransformKind>,
    window_width: Option<f64>,
    log_spacing_tolerance: Option<f64>,
}

impl PlanConfigBuilder {
    /// Sets the log-spaced input grid.
    pub fn grid(mut self, grid: impl Into<Vec<f64>>) -> Self {
        self.grid = Some(grid.into());
        self
    }

    /// Sets the number of extrapolated samples below the grid.
    #[inline]
    pub fn n_extrap_low(mut self, n: usize) -> Self {
        self.n_extrap_low = Some(n);
        self
    }

    /// Sets the number of extrapolated samples above the grid.
    #[inline]
    pub fn n_extrap_high(mut self, n: usize) -> Self {
        self.n_extrap_high = Some(n);
        self
    }

    /// Sets the number of zero-padding samples at each end.
    #[inline]
    pub fn n_pad(mut self, n: usize) -> Self {
        self.n_pad = Some(n);
        self
    }

    /// Sets the bias index `ν`.
    #[inline]
    pub fn bias(mut self, bias: f64) -> Self {
        self.bias = Some(bias);
        self
    }

    /// Sets the default derivative order.
    #[inline]
    pub fn order(mut self, order: DerivativeOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Selects spherical-Bessel or Hankel kernels.
    #[inline]
    pub fn kind(mut self, kind: TransformKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Shorthand for `kind(TransformKind::Hankel)` when `hankel` is true.
    #[inline]
    pub fn hankel(self, hankel: bool) -> Self {
        if hankel {
            self.kind(TransformKind::Hankel)
        } else {
            self.kind(TransformKind::SphericalBessel)
        }
    }

    /// Sets the tapered fraction of the half spectrum.
    #[inline]
    pub fn window_width(mut self, width: f64) -> Self {
        self.window_width = Some(width);
        self
    }

    /// Sets the relative tolerance on the log spacing.
    #[inline]
    pub fn log_spacing_tolerance(mut self, tolerance: f64) -> Self {
        self.log_spacing_tolerance = Some(tolerance);
        self
    }

    /// Validates scalar options and builds a [`PlanConfig`].
    ///
    /// # Errors
    /// Returns [`FftLogError::Configuration`] when the grid is missing or a
    /// scalar option is out of range.
    pub fn build(self) -> Result<PlanConfig> {
        let defaults = PlanConfig::default();
        let grid = self
            .grid
            .ok_or_else(|| FftLogError::config("input grid is required"))?;

        let config = PlanConfig {
            grid,
            n_extrap_low: self.n_extrap_low.unwrap_or(defaults.n_extrap_low),
            n_extrap_high: self.n_extrap_high.unwrap_or(defaults.n_extrap_high),
            n_pad: self.n_pad.unwrap_or(defaults.n_pad),
            bias: self.bias.unwrap_or(defaults.bias),
            order: self.order.unwrap_or(defaults.order),
            kind: self.kind.unwrap_or(defaults.kind),
            window_width: self.window_width.unwrap_or(defaults.window_width),
            log_spacing_tolerance: self
                .log_spacing_tolerance
                .unwrap_or(defaults.log_spacing_tolerance),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| (0.1 * i as f64).exp()).collect()
    }

    #[test]
    fn builder_applies_defaults() {
        let config = PlanConfig::builder().grid(grid(16)).build().unwrap();
        assert_eq!(config.bias, DEFAULT_BIAS);
        assert_eq!(config.order, DerivativeOrder::Zero);
        assert_eq!(config.kind, TransformKind::SphericalBessel);
        assert_eq!(config.extended_len(), 16);
    }

    #[test]
    fn builder_requires_grid() {
        let err = PlanConfig::builder().bias(0.5).build().unwrap_err();
        assert!(matches!(err, FftLogError::Configuration(_)));
    }

    #[test]
    fn odd_extended_length_is_rejected() {
        let err = PlanConfig::builder()
            .grid(grid(16))
            .n_extrap_low(3)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("even"));
    }

    #[test]
    fn hankel_rejects_derivative_kernels() {
        let err = PlanConfig::builder()
            .grid(grid(16))
            .hankel(true)
            .order(DerivativeOrder::First)
            .build()
            .unwrap_err();
        assert!(matches!(err, FftLogError::Configuration(_)));
    }

    #[test]
    fn window_width_outside_unit_interval_is_rejected() {
        assert!(
            PlanConfig::builder()
                .grid(grid(16))
                .window_width(1.5)
                .build()
                .is_err()
        );
    }

    #[test]
    fn extension_counts_sum_extrapolation_and_padding() {
        let config = PlanConfig::builder()
            .grid(grid(10))
            .n_extrap_low(4)
            .n_extrap_high(2)
            .n_pad(3)
            .build()
            .unwrap();
        assert_eq!(config.low_extension(), 7);
        assert_eq!(config.high_extension(), 5);
        assert_eq!(config.extended_len(), 22);
    }

    #[test]
    fn order_round_trips_through_usize() {
        for n in 0..3 {
            assert_eq!(DerivativeOrder::from_usize(n).unwrap().as_usize(), n);
        }
        assert!(DerivativeOrder::from_usize(3).is_err());
    }

    #[test]
    fn hankel_shifts_effective_order_by_half() {
        assert_eq!(TransformKind::Hankel.effective_ell(0.0), -0.5);
        assert_eq!(TransformKind::SphericalBessel.effective_ell(2.0), 2.0);
    }
}
