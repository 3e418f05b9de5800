//! Smoothing window for the Fourier coefficients (McEwen et al. 2016, Eq. C.1).
//!
//! The window is defined on the centred index `x = m + N/2`, `m = -N/2 .. N/2-1`,
//! so tapering both ends damps the highest positive and negative frequencies alike.

use std::f64::consts::PI;

/// Cutoff width `NCut = floor(width * N / 2)` for a tapered fraction of the half spectrum.
#[inline]
pub fn cutoff_for_width(len: usize, width: f64) -> usize {
    ((width * len as f64 / 2.0).floor() as usize).min(len / 2)
}

#[inline]
fn ramp(distance: usize, cutoff: usize) -> f64 {
    let t = distance as f64 / cutoff as f64;
    t - (2.0 * PI * t).sin() / (2.0 * PI)
}

/// Window value at centred index `x` for an array of length `len`.
#[inline]
pub fn window_value(x: usize, len: usize, cutoff: usize) -> f64 {
    if cutoff == 0 {
        return 1.0;
    }
    if x < cutoff {
        ramp(x, cutoff)
    } else if x > len.saturating_sub(cutoff) {
        ramp(len - x, cutoff)
    } else {
        1.0
    }
}

/// Window over the full centred index range `[0, len)`.
pub fn window_weights(len: usize, cutoff: usize) -> Vec<f64> {
    (0..len).map(|x| window_value(x, len, cutoff)).collect()
}

/// Window weights for the non-negative frequencies `m = 0 ..= N/2` of an even length `N`.
///
/// The Nyquist bin `m = N/2` coincides with `m = -N/2`, i.e. centred index 0.
pub fn half_spectrum_weights(len: usize, cutoff: usize) -> Vec<f64> {
    let half = len / 2;
    (0..=half)
        .map(|m| window_value((half + m) % len, len, cutoff))
        .collect()
}
