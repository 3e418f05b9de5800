//! Numerical building blocks: complex log-Gamma and planned real FFTs.

pub mod fft_core;
pub mod gamma;

pub use fft_core::{RealFftPair, mirror_half_spectrum};
pub use gamma::{POLE_TOLERANCE, gamma_ratio, ln_gamma, pole_index};
