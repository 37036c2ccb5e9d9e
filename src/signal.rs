//! Time-Domain Signals
//!
//! A signal is any real function of time `t` and a shape constant `tau`
//! (pulse duration, decay time, width). Closures and plain functions with
//! the signature `fn(f64, f64) -> f64` are signals automatically.
//!
//! The reference pulses below have closed-form Fourier transforms, which
//! makes them convenient for checking the spectral integrator:
//!
//! | Pulse | x(t) | X(f) |
//! |-------|------|------|
//! | Rectangular | 1 on [0, tau] | tau sinc(f tau) e^(-i pi f tau) |
//! | Triangular | 1 - abs(t)/tau on [-tau, tau] | tau sinc^2(f tau) |
//! | Gaussian | exp(-pi (t/tau)^2) | tau exp(-pi (f tau)^2) |
//! | Exponential | exp(-t/tau), t >= 0 | tau / (1 + i 2 pi f tau) |

use std::f64::consts::PI;

//=============================================================================
// Signal Capability
//=============================================================================

/// A real-valued function of time and a shape constant
///
/// Signals are shared across worker threads during a transform, hence `Sync`.
pub trait Signal: Sync {
    /// Evaluate the signal at time `t` with shape constant `tau`
    fn eval(&self, t: f64, tau: f64) -> f64;

    /// Multiply the signal by a constant gain
    fn scaled(self, gain: f64) -> Scaled<Self>
    where
        Self: Sized,
    {
        Scaled { gain, signal: self }
    }

    /// Pointwise sum with another signal
    fn plus<S: Signal>(self, other: S) -> Sum<Self, S>
    where
        Self: Sized,
    {
        Sum { a: self, b: other }
    }
}

impl<F> Signal for F
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    #[inline]
    fn eval(&self, t: f64, tau: f64) -> f64 {
        self(t, tau)
    }
}

/// A signal multiplied by a constant
#[derive(Debug, Clone, Copy)]
pub struct Scaled<S> {
    gain: f64,
    signal: S,
}

impl<S: Signal> Signal for Scaled<S> {
    #[inline]
    fn eval(&self, t: f64, tau: f64) -> f64 {
        self.gain * self.signal.eval(t, tau)
    }
}

/// Pointwise sum of two signals
#[derive(Debug, Clone, Copy)]
pub struct Sum<A, B> {
    a: A,
    b: B,
}

impl<A: Signal, B: Signal> Signal for Sum<A, B> {
    #[inline]
    fn eval(&self, t: f64, tau: f64) -> f64 {
        self.a.eval(t, tau) + self.b.eval(t, tau)
    }
}

//=============================================================================
// Reference Pulses
//=============================================================================

/// Unit rectangular pulse on `[0, tau]`
#[inline]
pub fn rectangular(t: f64, tau: f64) -> f64 {
    if (0.0..=tau).contains(&t) {
        1.0
    } else {
        0.0
    }
}

/// Unit triangular pulse on `[-tau, tau]`, peak 1 at the origin
#[inline]
pub fn triangular(t: f64, tau: f64) -> f64 {
    (1.0 - t.abs() / tau).max(0.0)
}

/// Gaussian pulse `exp(-pi (t/tau)^2)`
#[inline]
pub fn gaussian(t: f64, tau: f64) -> f64 {
    let u = t / tau;
    (-PI * u * u).exp()
}

/// One-sided exponential decay `exp(-t/tau)` for `t >= 0`
#[inline]
pub fn exponential(t: f64, tau: f64) -> f64 {
    if t >= 0.0 {
        (-t / tau).exp()
    } else {
        0.0
    }
}

/// Normalized sinc, `sin(pi x) / (pi x)`
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Gammatone impulse response with `tau` as the envelope decay time
///
///   g(t) = t^(n-1) * exp(-t/tau) * cos(2*pi*f*t),  t >= 0
#[derive(Debug, Clone, Copy)]
pub struct Gammatone {
    /// Filter order n
    pub order: u32,
    /// Carrier frequency f in Hz
    pub center_hz: f64,
}

impl Default for Gammatone {
    fn default() -> Self {
        Self {
            order: 4,
            center_hz: 1000.0,
        }
    }
}

impl Signal for Gammatone {
    fn eval(&self, t: f64, tau: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let envelope = t.powf(f64::from(self.order.saturating_sub(1))) * (-t / tau).exp();
        envelope * (2.0 * PI * self.center_hz * t).cos()
    }
}
