//! Biased, windowed Fourier coefficients `c_m` of the extended input samples.

use num_complex::Complex;

use crate::core::{FftLogError, Real, Result};
use crate::math::fft_core::RealFftPair;

/// Computes `c_m = W_m Σ_q f(x_q) x_q^(-ν) e^(-2πimq/N)` for `m = 0 ..= N/2`.
///
/// `extended` holds the extended samples and is overwritten with the biased
/// sequence. The zero and Nyquist coefficients are forced real so the
/// negative half `c_{-m} = conj(c_m)` is exact when it is rebuilt.
///
/// # Errors
/// [`FftLogError::Dimension`] for mismatched buffers and
/// [`FftLogError::Numerical`] when the biased sequence or its spectrum is not finite.
pub fn biased_coefficients<T: Real>(
    extended: &mut [T],
    bias_weights: &[T],
    window: &[T],
    fft: &RealFftPair<T>,
    coefficients: &mut [Complex<T>],
    scratch: &mut [Complex<T>],
) -> Result<()> {
    if extended.len() != fft.len() || bias_weights.len() != fft.len() {
        return Err(FftLogError::Dimension {
            what: "biased sample buffer",
            expected: fft.len(),
            actual: extended.len().min(bias_weights.len()),
        });
    }
    if coefficients.len() != fft.spectrum_len() || window.len() != fft.spectrum_len() {
        return Err(FftLogError::Dimension {
            what: "coefficient buffer",
            expected: fft.spectrum_len(),
            actual: coefficients.len().min(window.len()),
        });
    }

    for (sample, weight) in extended.iter_mut().zip(bias_weights) {
        *sample *= *weight;
    }
    if extended.iter().any(|v| !v.is_finite()) {
        return Err(FftLogError::numerical(
            "biased samples f(x) x^(-ν) overflow on the extended grid",
        ));
    }
    fft.forward(extended, coefficients, scratch)?;

    for (c, w) in coefficients.iter_mut().zip(window) {
        *c = c.scale(*w);
    }
    enforce_real_edges(coefficients, fft.len());
    if coefficients
        .iter()
        .any(|c| !(c.re.is_finite() && c.im.is_finite()))
    {
        return Err(FftLogError::numerical("Fourier coefficients are not finite"));
    }
    Ok(())
}

/// Zeroes the imaginary part of the bins that must be real for a real signal.
#[inline]
pub fn enforce_real_edges<T: Real>(half: &mut [Complex<T>], len: usize) {
    if let Some(first) = half.first_mut() {
        first.im = T::zero();
    }
    if len % 2 == 0 {
        if let Some(nyquist) = half.get_mut(len / 2) {
            nyquist.im = T::zero();
        }
    }
}
