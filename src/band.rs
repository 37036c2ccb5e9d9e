//! Frequency Bands
//!
//! Builders for the ordered frequency grids a transform is evaluated on.
//! All builders include both endpoints.

use crate::error::{Error, Result};

//=============================================================================
// Band Spacing
//=============================================================================

/// Spacing of frequencies within a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BandSpacing {
    /// Uniform Hz spacing
    #[default]
    Linear,
    /// Uniform spacing in log2(Hz) (octaves)
    Log,
}

/// Generate `num_points` frequencies between `min_hz` and `max_hz`
pub fn generate(spacing: BandSpacing, num_points: usize, min_hz: f64, max_hz: f64) -> Result<Vec<f64>> {
    match spacing {
        BandSpacing::Linear => linear(min_hz, max_hz, num_points),
        BandSpacing::Log => logarithmic(min_hz, max_hz, num_points),
    }
}

//=============================================================================
// Builders
//=============================================================================

/// Evenly spaced frequencies from `min_hz` to `max_hz` inclusive
///
/// A single point yields `[min_hz]`; zero points yield an empty band.
pub fn linear(min_hz: f64, max_hz: f64, num_points: usize) -> Result<Vec<f64>> {
    check_range(min_hz, max_hz)?;
    Ok(match num_points {
        0 => Vec::new(),
        1 => vec![min_hz],
        n => {
            let step = (max_hz - min_hz) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max_hz } else { min_hz + i as f64 * step })
                .collect()
        }
    })
}

/// Geometrically spaced frequencies from `min_hz` to `max_hz` inclusive
pub fn logarithmic(min_hz: f64, max_hz: f64, num_points: usize) -> Result<Vec<f64>> {
    check_range(min_hz, max_hz)?;
    if min_hz <= 0.0 {
        return Err(Error::invalid(
            "min_hz",
            format!("logarithmic bands need a positive lower edge, got {min_hz}"),
        ));
    }
    let octaves = linear(min_hz.log2(), max_hz.log2(), num_points)?;
    let mut band: Vec<f64> = octaves.into_iter().map(f64::exp2).collect();
    // Pin the endpoints against exp2/log2 drift
    if let Some(first) = band.first_mut() {
        *first = min_hz;
    }
    if num_points > 1 {
        if let Some(last) = band.last_mut() {
            *last = max_hz;
        }
    }
    Ok(band)
}

/// Band symmetric about zero, `-max_hz..=max_hz`
///
/// An odd point count places a sample exactly at DC.
pub fn symmetric(max_hz: f64, num_points: usize) -> Result<Vec<f64>> {
    if max_hz < 0.0 {
        return Err(Error::invalid(
            "max_hz",
            format!("must be non-negative, got {max_hz}"),
        ));
    }
    let mut band = linear(-max_hz, max_hz, num_points)?;
    if num_points % 2 == 1 {
        band[num_points / 2] = 0.0;
    }
    Ok(band)
}

fn check_range(min_hz: f64, max_hz: f64) -> Result<()> {
    if !min_hz.is_finite() || !max_hz.is_finite() {
        return Err(Error::invalid(
            "band",
            format!("edges must be finite, got [{min_hz}, {max_hz}]"),
        ));
    }
    if min_hz > max_hz {
        return Err(Error::invalid(
            "band",
            format!("lower edge {min_hz} exceeds upper edge {max_hz}"),
        ));
    }
    Ok(())
}
