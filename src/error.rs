//! Error types shared across the crate.

use thiserror::Error;

use crate::quadrature::QuadError;
use crate::transform::Projection;

/// Convenience alias used by every fallible entry point.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by quantization and spectral integration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A precondition on the caller's arguments does not hold.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Quadrature did not converge for one frequency of a transform.
    #[error(transparent)]
    Integration(#[from] IntegrationFailure),

    /// Direct quadrature call failed.
    #[error(transparent)]
    Quadrature(#[from] QuadError),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// A per-frequency integration failure, attached to the band index it belongs to
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{projection} projection at f = {frequency} Hz (index {index}) did not converge: {source}")]
pub struct IntegrationFailure {
    /// Position of the frequency in the requested band
    pub index: usize,
    /// The frequency itself
    pub frequency: f64,
    /// Which kernel was being integrated
    pub projection: Projection,
    #[source]
    pub source: QuadError,
}
