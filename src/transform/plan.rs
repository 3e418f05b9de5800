//! Two-phase FFTLog plan: cached grid, window and kernel tables, reused by every evaluation.

use num_complex::Complex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{DerivativeOrder, FftLogError, PlanConfig, Real, Result, TransformKind};
use crate::math::fft_core::{RealFftPair, mirror_half_spectrum};

use super::assembly::{
    AssemblyScratch, assemble, ln_x0y0, output_abscissae, output_scale, phased_kernel,
};
use super::coefficients::biased_coefficients;
use super::grid::ExtendedGrid;
use super::kernel::{frequencies, kernel_table, validate_bias};
use super::window::{cutoff_for_width, half_spectrum_weights};

/// Identifies one cached kernel: multipole `ℓ` and derivative order `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultipoleKey {
    pub ell: f64,
    pub order: DerivativeOrder,
}

impl MultipoleKey {
    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        self.ell.to_bits() == other.ell.to_bits() && self.order == other.order
    }
}

#[derive(Debug, Clone)]
struct Multipole<T: Real> {
    key: MultipoleKey,
    kernel: Vec<Complex<T>>,
    scale: Vec<T>,
    output_grid: Vec<f64>,
}

/// Precomputed FFTLog transform over a fixed log grid.
///
/// [`Plan::new`] validates the configuration and builds the extended grid, the
/// coefficient window and the FFT plans. [`Plan::prepare`] adds kernel tables
/// for a set of multipoles; [`Plan::evaluate`] then only runs one forward FFT
/// plus one inverse FFT per multipole.
///
/// # Examples
/// ```
/// use fftlog::{Plan, PlanConfig};
///
/// let x: Vec<f64> = (0..128).map(|i| 1e-3 * (0.08 * i as f64).exp()).collect();
/// let config = PlanConfig::builder().grid(x.clone()).n_pad(64).build()?;
/// let mut plan: Plan = Plan::new(config)?;
/// plan.prepare(&[0.0, 2.0])?;
///
/// let f: Vec<f64> = x.iter().map(|k| k.powi(3) * (-k * k / 2.0).exp()).collect();
/// let out = plan.evaluate(&f)?;
/// assert_eq!(out.len(), 2);
/// assert_eq!(out[1].len(), x.len());
/// # Ok::<(), fftlog::FftLogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Plan<T: Real = f64> {
    config: PlanConfig,
    grid: ExtendedGrid,
    etas: Vec<f64>,
    window: Vec<T>,
    bias_weights: Vec<T>,
    input_weights: Option<Vec<T>>,
    fft: RealFftPair<T>,
    multipoles: Vec<Multipole<T>>,
}

impl<T: Real> Plan<T> {
    /// Builds the multipole-independent state of a plan.
    ///
    /// # Errors
    /// [`FftLogError::Configuration`] for invalid options or a grid that is not
    /// strictly increasing, positive and log-uniform.
    pub fn new(config: PlanConfig) -> Result<Self> {
        config.validate()?;
        let grid = ExtendedGrid::new(
            &config.grid,
            config.n_extrap_low,
            config.n_extrap_high,
            config.n_pad,
            config.log_spacing_tolerance,
        )?;
        let len = grid.len();

        let cutoff = cutoff_for_width(len, config.window_width);
        if cutoff == 0 && config.window_width > 0.0 {
            log::warn!(
                "window width {} tapers no coefficients for N = {len}; window disabled",
                config.window_width
            );
        }
        let window = half_spectrum_weights(len, cutoff)
            .into_iter()
            .map(T::from_f64_lossy)
            .collect();

        let bias_weights = cast_checked(
            grid.samples().iter().map(|x| x.powf(-config.bias)),
            "bias weights x^(-ν) overflow on the extended grid",
        )?;
        let input_weights = match config.kind {
            TransformKind::SphericalBessel => None,
            TransformKind::Hankel => Some(cast_checked(
                grid.original().iter().map(|x| x.powf(2.5)),
                "Hankel weights x^(5/2) overflow on the input grid",
            )?),
        };

        log::debug!(
            "fftlog plan: original_len={}, extended_len={len}, log_step={:.6e}, window_cutoff={cutoff}, kind={:?}",
            grid.original_len(),
            grid.log_step(),
            config.kind
        );

        Ok(Self {
            etas: frequencies(len, grid.log_step()),
            fft: RealFftPair::new(len),
            config,
            grid,
            window,
            bias_weights,
            input_weights,
            multipoles: Vec::new(),
        })
    }

    /// Builds a plan and prepares `ells` at the configured derivative order.
    pub fn prepared(config: PlanConfig, ells: &[f64]) -> Result<Self> {
        let mut plan = Self::new(config)?;
        plan.prepare(ells)?;
        Ok(plan)
    }

    /// Adds kernel tables for `ells` at the configured derivative order.
    pub fn prepare(&mut self, ells: &[f64]) -> Result<()> {
        self.prepare_with_order(ells, self.config.order)
    }

    /// Adds kernel tables for `ells` at derivative order `order`.
    ///
    /// Multipoles already cached are skipped, so repeating a call leaves the plan
    /// unchanged. Either every requested entry is added or none is.
    ///
    /// # Errors
    /// [`FftLogError::Configuration`] when a multipole is negative or the bias lies
    /// outside its convergence range, and [`FftLogError::Numerical`] when a kernel
    /// hits an unresolved Gamma pole.
    pub fn prepare_with_order(&mut self, ells: &[f64], order: DerivativeOrder) -> Result<()> {
        let kind = self.config.kind;
        if kind == TransformKind::Hankel && order != DerivativeOrder::Zero {
            return Err(FftLogError::config(
                "Hankel plans support derivative order 0 only",
            ));
        }
        for &ell in ells {
            validate_bias(self.config.bias, ell, order, kind)?;
        }

        let mut pending: Vec<MultipoleKey> = Vec::new();
        for &ell in ells {
            // Folds -0.0 into 0.0 so the bitwise key comparison is exact.
            let key = MultipoleKey {
                ell: ell + 0.0,
                order,
            };
            let cached = self.multipoles.iter().any(|m| m.key.same_as(&key));
            if !cached && !pending.iter().any(|p| p.same_as(&key)) {
                pending.push(key);
            }
        }
        log::debug!(
            "preparing {} new multipole(s), {} requested, {} cached",
            pending.len(),
            ells.len(),
            self.multipoles.len()
        );
        if pending.is_empty() {
            return Ok(());
        }

        #[cfg(feature = "parallel")]
        let built = pending
            .into_par_iter()
            .map(|key| self.build_multipole(key))
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let built = pending
            .into_iter()
            .map(|key| self.build_multipole(key))
            .collect::<Result<Vec<_>>>()?;

        self.multipoles.extend(built);
        Ok(())
    }

    fn build_multipole(&self, key: MultipoleKey) -> Result<Multipole<T>> {
        let kind = self.config.kind;
        let len = self.grid.len();
        let ell_eff = kind.effective_ell(key.ell);

        let kernel = kernel_table(key.ell, key.order, kind, self.config.bias, &self.etas)?;
        let phase = ln_x0y0(len, self.grid.log_step(), ell_eff);
        let kernel = phased_kernel(&kernel, &self.etas, phase);

        let y = output_abscissae(self.grid.samples(), ell_eff);
        let offset = self.grid.offset();
        let output_grid = y[offset..offset + self.grid.original_len()].to_vec();
        let scale: Vec<T> = output_scale(&output_grid, self.config.bias, len, kind);
        if scale.iter().any(|s| !s.is_finite()) {
            return Err(FftLogError::numerical(format!(
                "output prefactor overflows for ell = {}",
                key.ell
            )));
        }

        Ok(Multipole {
            key,
            kernel,
            scale,
            output_grid,
        })
    }

    /// Transforms `f`, sampled on the configured grid, once per prepared multipole.
    ///
    /// Rows follow the order in which multipoles were prepared.
    pub fn evaluate(&self, f: &[T]) -> Result<Vec<Vec<T>>> {
        let mut workspace = self.workspace();
        let mut out = vec![vec![T::zero(); self.original_len()]; self.multipoles.len()];
        self.evaluate_into(&mut workspace, &mut out, f)?;
        Ok(out)
    }

    /// Buffers sized for this plan, for use with [`Plan::evaluate_into`].
    pub fn workspace(&self) -> Workspace<T> {
        let mut workspace = Workspace::new();
        workspace.fit_coefficients(self);
        workspace.fit_rows(self);
        workspace
    }

    /// Same as [`Plan::evaluate`], writing into caller-owned rows.
    ///
    /// Once `workspace` has been sized for this plan, repeated calls do not
    /// allocate. Every row is computed in `workspace` first; `out` is written
    /// only when all multipoles succeed and is left untouched on error.
    ///
    /// # Errors
    /// [`FftLogError::Dimension`] when `out` does not have one row of the original
    /// grid length per prepared multipole, or `f` has the wrong length, and
    /// [`FftLogError::Numerical`] for non-finite coefficients or output.
    pub fn evaluate_into(
        &self,
        workspace: &mut Workspace<T>,
        out: &mut [Vec<T>],
        f: &[T],
    ) -> Result<()> {
        if out.len() != self.multipoles.len() {
            return Err(FftLogError::Dimension {
                what: "output rows",
                expected: self.multipoles.len(),
                actual: out.len(),
            });
        }
        if let Some(row) = out.iter().find(|row| row.len() != self.original_len()) {
            return Err(FftLogError::Dimension {
                what: "output row",
                expected: self.original_len(),
                actual: row.len(),
            });
        }
        workspace.fit_coefficients(self);
        workspace.fit_rows(self);
        self.fill_coefficients(f, workspace)?;

        let coefficients = &workspace.half;
        let offset = self.grid.offset();
        let run = |(scratch, multipole): (&mut AssemblyScratch<T>, &Multipole<T>)| {
            assemble(
                coefficients,
                &multipole.kernel,
                &multipole.scale,
                offset,
                &self.fft,
                scratch,
            )
        };

        #[cfg(feature = "parallel")]
        workspace
            .rows
            .par_iter_mut()
            .zip(self.multipoles.par_iter())
            .try_for_each(run)?;
        #[cfg(not(feature = "parallel"))]
        workspace
            .rows
            .iter_mut()
            .zip(self.multipoles.iter())
            .try_for_each(run)?;

        for (row, scratch) in out.iter_mut().zip(&workspace.rows) {
            row.copy_from_slice(scratch.output());
        }
        Ok(())
    }

    /// Full length-`N` windowed coefficients `c_m`, `m = 0 .. N-1` in FFT order.
    ///
    /// # Errors
    /// Same input checks as [`Plan::evaluate`]; non-finite coefficients are
    /// [`FftLogError::Numerical`].
    pub fn coefficients(&self, f: &[T]) -> Result<Vec<Complex<T>>> {
        let mut workspace = Workspace::new();
        workspace.fit_coefficients(self);
        self.fill_coefficients(f, &mut workspace)?;
        Ok(mirror_half_spectrum(&workspace.half, self.grid.len()))
    }

    /// Writes the windowed half spectrum of `f` into `workspace.half`.
    fn fill_coefficients(&self, f: &[T], workspace: &mut Workspace<T>) -> Result<()> {
        if f.len() != self.original_len() {
            return Err(FftLogError::Dimension {
                what: "input samples",
                expected: self.original_len(),
                actual: f.len(),
            });
        }
        let Workspace {
            weighted,
            extended,
            half,
            fft_scratch,
            ..
        } = workspace;

        let values: &[T] = match &self.input_weights {
            Some(weights) => {
                for ((slot, v), w) in weighted.iter_mut().zip(f).zip(weights) {
                    *slot = *v * *w;
                }
                weighted.as_slice()
            }
            None => f,
        };
        self.grid.extend_samples(values, extended.as_mut_slice())?;
        biased_coefficients(
            extended.as_mut_slice(),
            &self.bias_weights,
            &self.window,
            &self.fft,
            half.as_mut_slice(),
            fft_scratch.as_mut_slice(),
        )
    }

    /// Output abscissae `y` of the `index`-th prepared multipole.
    pub fn output_grid(&self, index: usize) -> Option<&[f64]> {
        self.multipoles.get(index).map(|m| m.output_grid.as_slice())
    }

    /// Output abscissae of every prepared multipole, in preparation order.
    pub fn output_grids(&self) -> Vec<&[f64]> {
        self.multipoles
            .iter()
            .map(|m| m.output_grid.as_slice())
            .collect()
    }

    /// Prepared `(ℓ, n)` pairs, in preparation order.
    pub fn multipoles(&self) -> Vec<MultipoleKey> {
        self.multipoles.iter().map(|m| m.key).collect()
    }

    pub fn extended_grid(&self) -> &ExtendedGrid {
        &self.grid
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    #[inline]
    pub fn original_len(&self) -> usize {
        self.grid.original_len()
    }

    #[inline]
    pub fn extended_len(&self) -> usize {
        self.grid.len()
    }
}

/// Reusable evaluation buffers for a [`Plan`].
///
/// Buffers grow on first use with a plan and are kept afterwards, so repeated
/// [`Plan::evaluate_into`] calls on the same plan run without allocating. One
/// workspace serves one call at a time.
#[derive(Debug, Clone)]
pub struct Workspace<T: Real> {
    weighted: Vec<T>,
    extended: Vec<T>,
    half: Vec<Complex<T>>,
    fft_scratch: Vec<Complex<T>>,
    rows: Vec<AssemblyScratch<T>>,
}

impl<T: Real> Default for Workspace<T> {
    fn default() -> Self {
        Self {
            weighted: Vec::new(),
            extended: Vec::new(),
            half: Vec::new(),
            fft_scratch: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<T: Real> Workspace<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn fit_coefficients(&mut self, plan: &Plan<T>) {
        let zero = Complex::new(T::zero(), T::zero());
        if plan.input_weights.is_some() {
            self.weighted.resize(plan.original_len(), T::zero());
        }
        self.extended.resize(plan.extended_len(), T::zero());
        self.half.resize(plan.fft.spectrum_len(), zero);
        self.fft_scratch.resize(plan.fft.scratch_len(), zero);
    }

    fn fit_rows(&mut self, plan: &Plan<T>) {
        let count = plan.multipoles.len();
        self.rows.truncate(count);
        while self.rows.len() < count {
            self.rows.push(AssemblyScratch::new(&plan.fft, plan.original_len()));
        }
        for row in &mut self.rows {
            row.fit(&plan.fft, plan.original_len());
        }
    }
}

fn cast_checked<T: Real>(values: impl Iterator<Item = f64>, msg: &str) -> Result<Vec<T>> {
    let out: Vec<T> = values.map(T::from_f64_lossy).collect();
    if out.iter().any(|v| !v.is_finite()) {
        return Err(FftLogError::numerical(msg));
    }
    Ok(out)
}
