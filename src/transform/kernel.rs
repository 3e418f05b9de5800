//! Module `transform::kernel`.
//!
//! Analytic Mellin kernels of the spherical Bessel function and its first two
//! derivatives, following Fang et al. (2019):
//!
//! ```text
//! g_ℓ(z)     = 2^z            Γ((ℓ+z)/2)   / Γ((3+ℓ-z)/2)
//! g̃_ℓ(1, z) = -2^(z-1)(z-1)   Γ((ℓ+z-1)/2) / Γ((4+ℓ-z)/2)
//! g̃_ℓ(2, z) = 2^(z-2)(z-1)(z-2) Γ((ℓ+z-2)/2) / Γ((5+ℓ-z)/2)
//! ```
//!
//! so that `∫ dt t^(z-1) j_ℓ^(n)(t) = (√π / 4) g̃_ℓ(n, z)`.
//!
//! Numerical considerations: ratios are evaluated as `exp(ln Γ(a) - ln Γ(b))`, which stays
//! finite for the large imaginary parts produced by fine grids. Numerator poles cancelled by
//! the polynomial prefactor (ℓ = 0 with n = 1 or 2, ℓ = 1 with n = 2) are always evaluated
//! through `(z - r) Γ((z - r)/2) = 2 Γ((z - r)/2 + 1)`; every other numerator pole is an error.

use std::f64::consts::{LN_2, PI};

use num_complex::Complex64;

use crate::core::{DerivativeOrder, FftLogError, Result, TransformKind};
use crate::math::gamma::{ln_gamma, pole_index};

/// Open interval `(lower, upper)` of admissible bias indices for a kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasRange {
    pub lower: f64,
    pub upper: f64,
}

impl BiasRange {
    #[inline]
    pub fn contains(&self, bias: f64) -> bool {
        bias > self.lower && bias < self.upper
    }
}

/// Convergence range of `Re(z)` for spherical order `ell` and derivative `order`.
pub fn bias_range(ell: f64, order: DerivativeOrder) -> BiasRange {
    let lower = match order {
        DerivativeOrder::Zero => -ell,
        DerivativeOrder::First if ell == 0.0 => 0.0,
        DerivativeOrder::First => 1.0 - ell,
        DerivativeOrder::Second if ell == 0.0 || ell == 1.0 => -ell,
        DerivativeOrder::Second => 2.0 - ell,
    };
    BiasRange { lower, upper: 2.0 }
}

/// Checks that `bias` lies strictly inside the convergence range of a multipole.
///
/// `ell` is the requested multipole; for Hankel plans the range of `ℓ - 1/2` applies.
pub fn validate_bias(
    bias: f64,
    ell: f64,
    order: DerivativeOrder,
    kind: TransformKind,
) -> Result<()> {
    if !ell.is_finite() || ell < 0.0 {
        return Err(FftLogError::config(format!(
            "multipole must be finite and >= 0, got {ell}"
        )));
    }
    let range = bias_range(kind.effective_ell(ell), order);
    if !range.contains(bias) {
        return Err(FftLogError::config(format!(
            "bias index {bias} outside the convergence range ({}, {}) for ell = {ell}, n = {}",
            range.lower,
            range.upper,
            order.as_usize()
        )));
    }
    Ok(())
}

/// Roots of the polynomial prefactor of `g̃_ℓ(n, z)`.
#[inline]
fn prefactor_roots(order: DerivativeOrder) -> &'static [f64] {
    match order {
        DerivativeOrder::Zero => &[],
        DerivativeOrder::First => &[1.0],
        DerivativeOrder::Second => &[1.0, 2.0],
    }
}

/// Evaluates `g̃_ℓ(n, z)` for spherical order `ell`.
///
/// # Errors
/// [`FftLogError::Numerical`] when `Γ((ℓ+z-n)/2)` sits on a pole that the prefactor
/// does not cancel, or when the result is not finite.
pub fn kernel_at(ell: f64, order: DerivativeOrder, z: Complex64) -> Result<Complex64> {
    let n = order.as_usize() as f64;
    let a = (z + ell - n) * 0.5;
    let b = (-z + 3.0 + ell + n) * 0.5;

    // ℓ = n - r puts the k = 0 pole of Γ(a) exactly on the root r.
    let cancelled = prefactor_roots(order)
        .iter()
        .copied()
        .find(|&root| ell == n - root);

    let mut prefactor = if order == DerivativeOrder::First {
        Complex64::new(-1.0, 0.0)
    } else {
        Complex64::new(1.0, 0.0)
    };
    for &root in prefactor_roots(order) {
        if Some(root) != cancelled {
            prefactor *= z - root;
        }
    }

    let ln_numerator = match cancelled {
        Some(_) => ln_gamma(a + 1.0).map(|v| v + LN_2),
        None => ln_gamma(a),
    }
    .ok_or_else(|| {
        FftLogError::numerical(format!(
            "unresolved Gamma pole for ell = {ell}, n = {}, z = {z}",
            order.as_usize()
        ))
    })?;

    let ln_denominator = match ln_gamma(b) {
        Some(v) => v,
        None if pole_index(b).is_some() => return Ok(Complex64::new(0.0, 0.0)),
        None => {
            return Err(FftLogError::numerical(format!(
                "non-finite Gamma argument {b} for ell = {ell}"
            )));
        }
    };

    let value = prefactor * ((z - n) * LN_2 + ln_numerator - ln_denominator).exp();
    if !(value.re.is_finite() && value.im.is_finite()) {
        return Err(FftLogError::numerical(format!(
            "kernel overflow for ell = {ell}, n = {}, z = {z}",
            order.as_usize()
        )));
    }
    Ok(value)
}

/// Frequencies `η_m = 2πm / (N Δln x)` for `m = 0 ..= N/2`.
pub fn frequencies(len: usize, log_step: f64) -> Vec<f64> {
    let scale = 2.0 * PI / (len as f64 * log_step);
    (0..=len / 2).map(|m| scale * m as f64).collect()
}

/// Kernel table `g̃(ν + iη_m)` over the non-negative frequencies.
///
/// Negative frequencies follow from `g̃(conj z) = conj g̃(z)`.
pub fn kernel_table(
    ell: f64,
    order: DerivativeOrder,
    kind: TransformKind,
    bias: f64,
    etas: &[f64],
) -> Result<Vec<Complex64>> {
    let ell = kind.effective_ell(ell);
    etas.iter()
        .map(|&eta| kernel_at(ell, order, Complex64::new(bias, eta)))
        .collect()
}
