//! # Signal Lab - Quantization and Quadrature Fourier Transforms
//!
//! Small numeric toolkit for signal-processing coursework: uniform
//! quantization of sampled signals, and a Fourier transform computed by
//! integrating a time-domain pulse against cosine and sine kernels with
//! adaptive Gauss-Kronrod quadrature.
//!
//! ## Quick Start
//!
//! ```rust
//! use signal_lab::{band, fourier_transform, quantize_uniform, signal, SpectrumMode};
//!
//! // 5 levels between -1 and 1
//! let x = [-0.9, -0.2, 0.1, 0.6, 1.4];
//! let q = quantize_uniform(&x, -1.0, 1.0, 5).unwrap();
//! assert_eq!(q, vec![-1.0, 0.0, 0.0, 0.5, 1.0]);
//!
//! // |X(f)| of a 1 ms rectangular pulse
//! let tau = 1e-3;
//! let f_band = band::linear(0.0, 5000.0, 51).unwrap();
//! let mode: SpectrumMode = "abs".parse().unwrap();
//! let spectrum = fourier_transform(&signal::rectangular, &f_band, tau, 0.0, tau, mode).unwrap();
//!
//! assert!(spectrum.is_complete());
//! assert!((spectrum.values()[0] - tau).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`quantize`] | Uniform quantizer with saturation |
//! | [`transform`] | Spectral integrator over a frequency band |
//! | [`quadrature`] | Adaptive Gauss-Kronrod integration |
//! | [`signal`] | Signal trait and reference pulses |
//! | [`band`] | Frequency band builders |
//!
//! ## Errors
//!
//! Invalid arguments fail before any work is done. Quadrature that does not
//! converge for a frequency is reported in [`Spectrum::failures`] alongside
//! the best available estimate; use [`Spectrum::strict`] for all-or-nothing
//! results.

pub mod band;
pub mod error;
pub mod quadrature;
pub mod quantize;
pub mod signal;
pub mod transform;

// Re-export main types at crate root
pub use band::BandSpacing;
pub use error::{Error, IntegrationFailure, Result};
pub use quadrature::{integrate, QuadConfig, QuadError, Quadrature};
pub use quantize::{quantization_error, quantize_uniform, QuantizerConfig, UniformQuantizer};
pub use signal::Signal;
pub use transform::{
    fourier_transform, integrand, ComplexSpectrum, FourierIntegrator, Projection, Spectrum,
    SpectrumMode, SpectrumPoint, TransformConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Major version number
pub const VERSION_MAJOR: u32 = 0;

/// Minor version number
pub const VERSION_MINOR: u32 = 1;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;
