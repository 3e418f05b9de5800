//! Output assembly: kernel product, inverse real FFT and prefactor scaling.
//!
//! With `h_m = c_m (x_0 y_0)^(-iη_m) g̃(ν + iη_m)`,
//!
//! ```text
//! F(y_p) = (√π / 4) y_p^(-ν) (1/N) Σ_m h_m e^(-2πimp/N)
//! ```
//!
//! The sum is the unnormalized inverse real FFT of `conj(h_m)`, since `h` is
//! Hermitian and the result is real.

use num_complex::{Complex, Complex64};

use crate::core::{FftLogError, Real, Result, TransformKind};
use crate::math::fft_core::RealFftPair;

use super::coefficients::enforce_real_edges;

/// Kernel combined with the grid phase: `g̃(ν + iη_m) · exp(-iη_m ln(x_0 y_0))`.
pub fn phased_kernel<T: Real>(kernel: &[Complex64], etas: &[f64], ln_x0y0: f64) -> Vec<Complex<T>> {
    kernel
        .iter()
        .zip(etas)
        .map(|(g, &eta)| {
            let h = g * Complex64::from_polar(1.0, -eta * ln_x0y0);
            Complex::new(T::from_f64_lossy(h.re), T::from_f64_lossy(h.im))
        })
        .collect()
}

/// Output abscissae `y_p = (ℓ+1) / x_{N-1-p}` on the extended grid.
///
/// `ell` is the spherical order carrying the kernel.
pub fn output_abscissae(extended: &[f64], ell: f64) -> Vec<f64> {
    extended.iter().rev().map(|x| (ell + 1.0) / x).collect()
}

/// `ln(x_0 y_0)` for the output grid of [`output_abscissae`].
#[inline]
pub fn ln_x0y0(len: usize, log_step: f64, ell: f64) -> f64 {
    (ell + 1.0).ln() - (len as f64 - 1.0) * log_step
}

/// Per-point prefactor `(√π/4) y^(-ν) / N`, times `√(2y/π)` for Hankel plans.
pub fn output_scale<T: Real>(y: &[f64], bias: f64, len: usize, kind: TransformKind) -> Vec<T> {
    let base = std::f64::consts::PI.sqrt() / 4.0 / len as f64;
    y.iter()
        .map(|&y| {
            let mut scale = base * y.powf(-bias);
            if kind == TransformKind::Hankel {
                scale *= (2.0 * y / std::f64::consts::PI).sqrt();
            }
            T::from_f64_lossy(scale)
        })
        .collect()
}

/// Buffers for one multipole, reused across evaluations.
///
/// `output` stages the finished row so a caller's buffer is only touched once
/// every multipole of an evaluation has succeeded.
#[derive(Debug, Clone)]
pub struct AssemblyScratch<T: Real> {
    spectrum: Vec<Complex<T>>,
    real: Vec<T>,
    fft_scratch: Vec<Complex<T>>,
    output: Vec<T>,
}

impl<T: Real> AssemblyScratch<T> {
    pub fn new(fft: &RealFftPair<T>, output_len: usize) -> Self {
        let mut scratch = Self {
            spectrum: Vec::new(),
            real: Vec::new(),
            fft_scratch: Vec::new(),
            output: Vec::new(),
        };
        scratch.fit(fft, output_len);
        scratch
    }

    /// Resizes the buffers for `fft` and `output_len`; a no-op once they match.
    pub fn fit(&mut self, fft: &RealFftPair<T>, output_len: usize) {
        let zero = Complex::new(T::zero(), T::zero());
        self.spectrum.resize(fft.spectrum_len(), zero);
        self.real.resize(fft.len(), T::zero());
        self.fft_scratch.resize(fft.scratch_len(), zero);
        self.output.resize(output_len, T::zero());
    }

    /// The last row produced by [`assemble`].
    #[inline]
    pub fn output(&self) -> &[T] {
        &self.output
    }
}

/// Computes `F(y_p)` for the original-length window starting at `offset` into
/// `scratch`; read it back with [`AssemblyScratch::output`].
///
/// # Errors
/// [`FftLogError::Dimension`] for tables or scratch that do not match `fft`, and
/// [`FftLogError::Numerical`] when the row is not finite.
pub fn assemble<T: Real>(
    coefficients: &[Complex<T>],
    kernel: &[Complex<T>],
    scale: &[T],
    offset: usize,
    fft: &RealFftPair<T>,
    scratch: &mut AssemblyScratch<T>,
) -> Result<()> {
    if coefficients.len() != fft.spectrum_len() || kernel.len() != fft.spectrum_len() {
        return Err(FftLogError::Dimension {
            what: "kernel table",
            expected: fft.spectrum_len(),
            actual: kernel.len().min(coefficients.len()),
        });
    }
    if offset + scale.len() > fft.len() || scratch.output.len() != scale.len() {
        return Err(FftLogError::Dimension {
            what: "output row",
            expected: scale.len(),
            actual: scratch.output.len(),
        });
    }
    if scratch.spectrum.len() != fft.spectrum_len() || scratch.real.len() != fft.len() {
        return Err(FftLogError::Dimension {
            what: "assembly scratch",
            expected: fft.len(),
            actual: scratch.real.len(),
        });
    }

    for ((slot, c), g) in scratch.spectrum.iter_mut().zip(coefficients).zip(kernel) {
        *slot = (c * g).conj();
    }
    enforce_real_edges(&mut scratch.spectrum, fft.len());
    fft.inverse(
        &mut scratch.spectrum,
        &mut scratch.real,
        &mut scratch.fft_scratch,
    )?;

    for ((o, r), s) in scratch
        .output
        .iter_mut()
        .zip(&scratch.real[offset..offset + scale.len()])
        .zip(scale)
    {
        *o = *r * *s;
    }
    if scratch.output.iter().any(|v| !v.is_finite()) {
        return Err(FftLogError::numerical("transform produced non-finite output"));
    }
    Ok(())
}
