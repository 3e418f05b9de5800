//! FFTLog transform pipeline.
//!
//! References:
//! - Hamilton (2000), *Uncorrelated modes of the non-linear power spectrum*, Appendix B.
//! - Fang, Eifler, Krause (2019), *Beyond-Limber calculations using FFTLog*, Sec. 2.
//! - McEwen et al. (2016), *FAST-PT*, Appendix C (coefficient window).
//!
//! Stages, in evaluation order:
//! - [`grid`]: log-grid validation, extrapolation and padding.
//! - [`window`]: smoothing weights for the Fourier coefficients.
//! - [`kernel`]: spherical Bessel Mellin kernels and bias ranges.
//! - [`coefficients`]: biased, windowed forward DFT.
//! - [`assembly`]: kernel product, inverse DFT and rescaling.
//! - [`plan`]: the cached two-phase [`Plan`].

pub mod assembly;
pub mod coefficients;
pub mod grid;
pub mod kernel;
pub mod plan;
pub mod window;

pub use grid::ExtendedGrid;
pub use kernel::{BiasRange, bias_range};
pub use plan::{MultipoleKey, Plan, Workspace};
