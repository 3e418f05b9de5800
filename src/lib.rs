//! `fftlog` computes integral transforms of log-sampled functions against spherical
//! Bessel functions, their first two derivatives, and cylindrical Bessel functions:
//!
//! ```text
//! F(y) = ∫ dx/x f(x) j_ℓ^(n)(xy)        (spherical, n = 0, 1, 2)
//! F(y) = ∫ dx x f(x) J_ℓ(xy)            (Hankel)
//! ```
//!
//! The input is decomposed into complex power laws with one FFT, each power law is
//! transformed analytically through a ratio of Gamma functions, and the result is
//! summed back with a second FFT. Work is split into a one-time [`Plan`]
//! preparation (grid extension, window, Gamma kernels per multipole) and a cheap,
//! repeatable evaluation.
//!
//! References used across modules include:
//! - Hamilton (2000) for the FFTLog decomposition.
//! - Fang, Eifler, Krause (2019) for derivative kernels.
//! - McEwen et al. (2016) for the coefficient window.
//!
//! Numerical considerations:
//! - The bias index ν must lie inside the convergence strip of every multipole;
//!   this is checked when multipoles are prepared.
//! - Power-law extrapolation and zero padding control ringing and aliasing at
//!   the edges of the output grid. Results near the edges should be discarded.
//! - Gamma ratios are evaluated in log space so fine grids with large
//!   frequencies do not overflow.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered kernel preparation and per-multipole evaluation.
//!
//! # Quick Start
//! Hankel transform of a Gaussian, which maps onto itself:
//! ```rust
//! use fftlog::{Plan, PlanConfig};
//!
//! let x: Vec<f64> = (0..256)
//!     .map(|i| 1e-3 * (i as f64 * (1e5_f64).ln() / 255.0).exp())
//!     .collect();
//! let config = PlanConfig::builder()
//!     .grid(x.clone())
//!     .hankel(true)
//!     .n_extrap_low(256)
//!     .n_extrap_high(256)
//!     .n_pad(128)
//!     .build()?;
//! let mut plan: Plan = Plan::new(config)?;
//! plan.prepare(&[0.0])?;
//!
//! let f: Vec<f64> = x.iter().map(|k| (-k * k / 2.0).exp()).collect();
//! let out = plan.evaluate(&f)?;
//! assert_eq!(out[0].len(), 256);
//! assert!(out[0].iter().all(|v| v.is_finite()));
//! # Ok::<(), fftlog::FftLogError>(())
//! ```
//!
//! Load a configuration with serde:
//! ```rust
//! use fftlog::{DerivativeOrder, PlanConfig};
//!
//! let json = r#"{ "grid": [0.1, 0.2, 0.4, 0.8], "n_pad": 2, "order": "first" }"#;
//! let config: PlanConfig = serde_json::from_str(json).unwrap();
//! assert_eq!(config.order, DerivativeOrder::First);
//! assert_eq!(config.extended_len(), 8);
//! ```

pub mod core;
pub mod math;
pub mod transform;

pub use crate::core::{
    DerivativeOrder, FftLogError, PlanConfig, PlanConfigBuilder, Real, Result, TransformKind,
};
pub use crate::transform::{ExtendedGrid, MultipoleKey, Plan, Workspace};
