use std::sync::Arc;

use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::core::{FftLogError, Real, Result};

/// Forward/inverse real FFT pair planned once for a fixed length.
///
/// Both directions are unnormalized: `inverse(forward(x)) = N x`.
#[derive(Clone)]
pub struct RealFftPair<T: Real> {
    len: usize,
    forward: Arc<dyn RealToComplex<T>>,
    inverse: Arc<dyn ComplexToReal<T>>,
}

impl<T: Real> std::fmt::Debug for RealFftPair<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFftPair").field("len", &self.len).finish()
    }
}

impl<T: Real> RealFftPair<T> {
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<T>::new();
        Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Length of the half spectrum, `N/2 + 1`.
    #[inline]
    pub fn spectrum_len(&self) -> usize {
        self.len / 2 + 1
    }

    /// Scratch length that covers both directions.
    #[inline]
    pub fn scratch_len(&self) -> usize {
        self.forward
            .get_scratch_len()
            .max(self.inverse.get_scratch_len())
    }

    /// Allocates a scratch buffer of [`RealFftPair::scratch_len`] elements.
    pub fn make_scratch(&self) -> Vec<Complex<T>> {
        vec![Complex::new(T::zero(), T::zero()); self.scratch_len()]
    }

    /// Real-to-complex transform; `input` is clobbered.
    ///
    /// `scratch` must hold at least [`RealFftPair::scratch_len`] elements.
    pub fn forward(
        &self,
        input: &mut [T],
        spectrum: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<()> {
        let scratch = scratch_slice(scratch, self.forward.get_scratch_len())?;
        self.forward
            .process_with_scratch(input, spectrum, scratch)
            .map_err(|err| FftLogError::numerical(format!("forward real FFT failed: {err}")))
    }

    /// Complex-to-real transform; `spectrum` is clobbered.
    ///
    /// The imaginary parts of the zero and Nyquist bins must already be zero.
    pub fn inverse(
        &self,
        spectrum: &mut [Complex<T>],
        output: &mut [T],
        scratch: &mut [Complex<T>],
    ) -> Result<()> {
        let scratch = scratch_slice(scratch, self.inverse.get_scratch_len())?;
        self.inverse
            .process_with_scratch(spectrum, output, scratch)
            .map_err(|err| FftLogError::numerical(format!("inverse real FFT failed: {err}")))
    }
}

#[inline]
fn scratch_slice<T>(scratch: &mut [T], len: usize) -> Result<&mut [T]> {
    let actual = scratch.len();
    scratch.get_mut(..len).ok_or(FftLogError::Dimension {
        what: "FFT scratch buffer",
        expected: len,
        actual,
    })
}

/// Rebuilds the full length-`n` spectrum of a real signal from its half spectrum.
pub fn mirror_half_spectrum<T: Real>(half: &[Complex<T>], n: usize) -> Vec<Complex<T>> {
    let mut out = vec![Complex::new(T::zero(), T::zero()); n];
    for (k, value) in half.iter().copied().enumerate().take(n) {
        out[k] = value;
    }
    for k in 1..n.div_ceil(2) {
        out[n - k] = half[k].conj();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_of_forward_scales_by_length() {
        let original = vec![0.5, -1.0, 3.0, 2.0, -0.25, 1.5, 0.0, 4.0, 0.75, -2.0];
        let pair = RealFftPair::<f64>::new(original.len());
        let mut input = original.clone();
        let mut spectrum = vec![Complex::new(0.0, 0.0); pair.spectrum_len()];
        let mut scratch = pair.make_scratch();
        pair.forward(&mut input, &mut spectrum, &mut scratch).unwrap();

        let mut output = vec![0.0; original.len()];
        pair.inverse(&mut spectrum, &mut output, &mut scratch).unwrap();
        for (lhs, rhs) in output.iter().zip(original.iter()) {
            assert!((lhs / original.len() as f64 - rhs).abs() < 1e-12);
        }
    }

    #[test]
    fn mirrored_spectrum_matches_direct_dft() {
        let real = [1.0, 2.0, -0.5, 0.25, 3.0, -1.0];
        let n = real.len();
        let pair = RealFftPair::<f64>::new(n);
        let mut input = real.to_vec();
        let mut half = vec![Complex::new(0.0, 0.0); pair.spectrum_len()];
        pair.forward(&mut input, &mut half, &mut pair.make_scratch())
            .unwrap();
        let full = mirror_half_spectrum(&half, n);

        for (k, value) in full.iter().enumerate() {
            let direct = real
                .iter()
                .enumerate()
                .fold(Complex::new(0.0, 0.0), |acc, (q, &x)| {
                    let angle = -2.0 * std::f64::consts::PI * (k * q) as f64 / n as f64;
                    acc + Complex::from_polar(x, angle)
                });
            assert!((value - direct).norm() < 1e-12);
        }
    }

    #[test]
    fn short_scratch_is_a_dimension_error() {
        let mut scratch = [Complex::new(0.0, 0.0); 2];
        let err = scratch_slice(&mut scratch, 3).unwrap_err();
        assert!(matches!(
            err,
            FftLogError::Dimension {
                what: "FFT scratch buffer",
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(scratch_slice(&mut scratch, 1).unwrap().len(), 1);
    }
}
