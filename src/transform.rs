//! Spectral Integrator
//!
//! Fourier transform of a time-domain signal by direct quadrature:
//!
//!   Re X(f) = ∫ x(t, tau) cos(-2 pi f t) dt
//!   Im X(f) = ∫ x(t, tau) sin(-2 pi f t) dt
//!
//! over a finite window `[t1, t2]`, evaluated independently for every
//! frequency of the requested band. Frequencies are spread across the rayon
//! thread pool and collected back in band order.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::error::{Error, IntegrationFailure, Result};
use crate::quadrature::{self, QuadConfig};
use crate::signal::Signal;

//=============================================================================
// Spectrum Mode
//=============================================================================

/// Which form of X(f) a transform reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpectrumMode {
    /// |X(f)|
    #[default]
    Magnitude,
    /// Re X(f)
    Real,
    /// Im X(f)
    Imaginary,
}

impl SpectrumMode {
    /// Short name: `"abs"`, `"Re"` or `"Im"`
    pub fn as_str(&self) -> &'static str {
        match self {
            SpectrumMode::Magnitude => "abs",
            SpectrumMode::Real => "Re",
            SpectrumMode::Imaginary => "Im",
        }
    }

    fn needs_real(self) -> bool {
        matches!(self, SpectrumMode::Magnitude | SpectrumMode::Real)
    }

    fn needs_imaginary(self) -> bool {
        matches!(self, SpectrumMode::Magnitude | SpectrumMode::Imaginary)
    }
}

impl fmt::Display for SpectrumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpectrumMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "abs" | "magnitude" | "mag" => Ok(SpectrumMode::Magnitude),
            "Re" | "re" | "real" => Ok(SpectrumMode::Real),
            "Im" | "im" | "imag" | "imaginary" => Ok(SpectrumMode::Imaginary),
            other => Err(Error::invalid(
                "res_type",
                format!("expected one of \"abs\", \"Re\", \"Im\", got {other:?}"),
            )),
        }
    }
}

//=============================================================================
// Projection Kernels
//=============================================================================

/// The two kernels a signal is projected onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// cos(-2 pi f t)
    Real,
    /// sin(-2 pi f t)
    Imaginary,
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Real => f.write_str("real"),
            Projection::Imaginary => f.write_str("imaginary"),
        }
    }
}

/// Integrand of one projection at time `t`
#[inline]
pub fn integrand<S: Signal + ?Sized>(signal: &S, t: f64, f: f64, tau: f64, projection: Projection) -> f64 {
    let phase = -2.0 * PI * f * t;
    let kernel = match projection {
        Projection::Real => phase.cos(),
        Projection::Imaginary => phase.sin(),
    };
    signal.eval(t, tau) * kernel
}

//=============================================================================
// Transform Configuration
//=============================================================================

/// Configuration for the spectral integrator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformConfig {
    /// Quadrature tolerances used for every projection
    pub quad: QuadConfig,
    /// Evaluate frequencies on the rayon pool
    pub parallel: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            quad: QuadConfig::default(),
            parallel: true,
        }
    }
}

//=============================================================================
// Results
//=============================================================================

/// One evaluated frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    /// Frequency in Hz
    pub frequency: f64,
    /// Value in the spectrum's mode; NaN if no estimate exists
    pub value: f64,
    /// Estimated absolute error of `value`
    pub abs_error: f64,
}

/// A transform result in band order, with any per-frequency failures
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    mode: SpectrumMode,
    points: Vec<SpectrumPoint>,
    failures: Vec<IntegrationFailure>,
}

impl Spectrum {
    /// Mode the values are expressed in
    pub fn mode(&self) -> SpectrumMode {
        self.mode
    }

    /// Number of frequencies
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the band was empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All evaluated points
    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    /// Evaluated frequencies
    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.frequency).collect()
    }

    /// Spectrum values, one per frequency
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Error estimates, one per frequency
    pub fn abs_errors(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.abs_error).collect()
    }

    /// Projections that did not converge, ordered by band index
    pub fn failures(&self) -> &[IntegrationFailure] {
        &self.failures
    }

    /// True if every projection converged
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Values including degraded estimates
    pub fn into_values(self) -> Vec<f64> {
        self.points.into_iter().map(|p| p.value).collect()
    }

    /// Values only if every projection converged, otherwise the first failure
    pub fn strict(mut self) -> Result<Vec<f64>> {
        if self.failures.is_empty() {
            Ok(self.into_values())
        } else {
            Err(Error::Integration(self.failures.swap_remove(0)))
        }
    }
}

/// A complex-valued transform result in band order
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSpectrum {
    frequencies: Vec<f64>,
    values: Vec<Complex64>,
    failures: Vec<IntegrationFailure>,
}

impl ComplexSpectrum {
    /// Evaluated frequencies
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// X(f), one per frequency
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Projections that did not converge
    pub fn failures(&self) -> &[IntegrationFailure] {
        &self.failures
    }

    /// True if every projection converged
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Integrated projection (or best estimate)
#[derive(Debug, Clone, Copy)]
struct Component {
    value: f64,
    abs_error: f64,
}

impl Component {
    const ZERO: Component = Component {
        value: 0.0,
        abs_error: 0.0,
    };
}

/// Both projections of one frequency, and whatever failed while computing them
#[derive(Debug)]
struct Bin {
    frequency: f64,
    re: Component,
    im: Component,
    failures: Vec<IntegrationFailure>,
}

//=============================================================================
// Fourier Integrator
//=============================================================================

/// Quadrature-based Fourier transform over a frequency band
#[derive(Debug, Clone, Default)]
pub struct FourierIntegrator {
    config: TransformConfig,
}

impl FourierIntegrator {
    /// Create an integrator with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an integrator with the given configuration
    pub fn with_config(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform `signal` over `[t1, t2]` at every frequency of `f_band`
    pub fn transform<S: Signal + ?Sized>(
        &self,
        signal: &S,
        f_band: &[f64],
        tau: f64,
        t1: f64,
        t2: f64,
        mode: SpectrumMode,
    ) -> Result<Spectrum> {
        self.validate(f_band, tau, t1, t2)?;
        debug!(
            "fourier transform: {} frequencies, mode {}, window [{}, {}], tau {}",
            f_band.len(),
            mode,
            t1,
            t2,
            tau
        );

        let bins = self.evaluate_band(signal, f_band, tau, t1, t2, mode.needs_real(), mode.needs_imaginary());

        let mut points = Vec::with_capacity(bins.len());
        let mut failures = Vec::new();
        for bin in bins {
            let (value, abs_error) = match mode {
                SpectrumMode::Real => (bin.re.value, bin.re.abs_error),
                SpectrumMode::Imaginary => (bin.im.value, bin.im.abs_error),
                SpectrumMode::Magnitude => (
                    Complex64::new(bin.re.value, bin.im.value).norm(),
                    bin.re.abs_error.hypot(bin.im.abs_error),
                ),
            };
            points.push(SpectrumPoint {
                frequency: bin.frequency,
                value,
                abs_error,
            });
            failures.extend(bin.failures);
        }

        Ok(Spectrum {
            mode,
            points,
            failures,
        })
    }

    /// Transform `signal` and keep the full complex value X(f)
    pub fn transform_complex<S: Signal + ?Sized>(
        &self,
        signal: &S,
        f_band: &[f64],
        tau: f64,
        t1: f64,
        t2: f64,
    ) -> Result<ComplexSpectrum> {
        self.validate(f_band, tau, t1, t2)?;
        debug!(
            "complex fourier transform: {} frequencies, window [{}, {}], tau {}",
            f_band.len(),
            t1,
            t2,
            tau
        );

        let bins = self.evaluate_band(signal, f_band, tau, t1, t2, true, true);

        let mut spectrum = ComplexSpectrum {
            frequencies: Vec::with_capacity(bins.len()),
            values: Vec::with_capacity(bins.len()),
            failures: Vec::new(),
        };
        for bin in bins {
            spectrum.frequencies.push(bin.frequency);
            spectrum.values.push(Complex64::new(bin.re.value, bin.im.value));
            spectrum.failures.extend(bin.failures);
        }
        Ok(spectrum)
    }

    fn validate(&self, f_band: &[f64], tau: f64, t1: f64, t2: f64) -> Result<()> {
        self.config.quad.validate()?;
        if !t1.is_finite() || !t2.is_finite() {
            return Err(Error::invalid(
                "t1/t2",
                format!("integration window must be finite, got [{t1}, {t2}]"),
            ));
        }
        if t1 > t2 {
            return Err(Error::invalid(
                "t1",
                format!("window start {t1} is after window end {t2}"),
            ));
        }
        if !tau.is_finite() {
            return Err(Error::invalid("tau", format!("must be finite, got {tau}")));
        }
        if let Some((index, f)) = f_band.iter().enumerate().find(|(_, f)| !f.is_finite()) {
            return Err(Error::invalid(
                "f_band",
                format!("frequency at index {index} is not finite ({f})"),
            ));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_band<S: Signal + ?Sized>(
        &self,
        signal: &S,
        f_band: &[f64],
        tau: f64,
        t1: f64,
        t2: f64,
        real: bool,
        imaginary: bool,
    ) -> Vec<Bin> {
        let eval = |(index, &frequency): (usize, &f64)| {
            let mut failures = Vec::new();
            let mut project = |projection: Projection| {
                let (component, failure) =
                    self.project(signal, index, frequency, tau, t1, t2, projection);
                failures.extend(failure);
                component
            };
            let re = if real { project(Projection::Real) } else { Component::ZERO };
            let im = if imaginary {
                project(Projection::Imaginary)
            } else {
                Component::ZERO
            };
            Bin {
                frequency,
                re,
                im,
                failures,
            }
        };

        if self.config.parallel {
            f_band.par_iter().enumerate().map(eval).collect()
        } else {
            f_band.iter().enumerate().map(eval).collect()
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn project<S: Signal + ?Sized>(
        &self,
        signal: &S,
        index: usize,
        frequency: f64,
        tau: f64,
        t1: f64,
        t2: f64,
        projection: Projection,
    ) -> (Component, Option<IntegrationFailure>) {
        let kernel = |t: f64| integrand(signal, t, frequency, tau, projection);
        match quadrature::integrate(kernel, t1, t2, &self.config.quad) {
            Ok(q) => {
                trace!(
                    "f = {frequency} Hz {projection}: {} (err {:e}, {} panels)",
                    q.value,
                    q.abs_error,
                    q.subintervals
                );
                (
                    Component {
                        value: q.value,
                        abs_error: q.abs_error,
                    },
                    None,
                )
            }
            Err(source) => {
                warn!("f = {frequency} Hz (index {index}) {projection} projection: {source}");
                let component = Component {
                    value: source.estimate().unwrap_or(f64::NAN),
                    abs_error: source.abs_error().unwrap_or(f64::INFINITY),
                };
                let failure = IntegrationFailure {
                    index,
                    frequency,
                    projection,
                    source,
                };
                (component, Some(failure))
            }
        }
    }
}

/// Transform `signal` with default tolerances
///
/// `mode` selects |X(f)|, Re X(f) or Im X(f); parse it from `"abs"`, `"Re"`
/// or `"Im"` with [`str::parse`].
pub fn fourier_transform<S: Signal + ?Sized>(
    signal: &S,
    f_band: &[f64],
    tau: f64,
    t1: f64,
    t2: f64,
    mode: SpectrumMode,
) -> Result<Spectrum> {
    FourierIntegrator::new().transform(signal, f_band, tau, t1, t2, mode)
}
