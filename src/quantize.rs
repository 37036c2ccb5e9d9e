//! Uniform Quantization
//!
//! Snaps a real signal onto `levels` evenly spaced values between `min` and
//! `max`, following Müller, *Fundamentals of Music Processing* (2015), §2.2.2.
//!
//! Values outside `[min, max]` saturate at the extreme levels. Rounding to the
//! nearest level breaks ties to the even level index.

use crate::error::{Error, Result};

//=============================================================================
// Quantizer Configuration
//=============================================================================

/// Configuration for a uniform quantizer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizerConfig {
    /// Lowest quantization level
    pub min: f64,
    /// Highest quantization level
    pub max: f64,
    /// Number of levels, including both extremes
    pub levels: usize,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            min: -1.0,
            max: 1.0,
            levels: 5,
        }
    }
}

impl QuantizerConfig {
    /// Check the level layout is non-degenerate
    pub fn validate(&self) -> Result<()> {
        if self.levels < 2 {
            return Err(Error::invalid(
                "quant_level",
                format!("must be at least 2, got {}", self.levels),
            ));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::invalid(
                "quant_min/quant_max",
                format!("must be finite, got [{}, {}]", self.min, self.max),
            ));
        }
        if self.max <= self.min {
            return Err(Error::invalid(
                "quant_max",
                format!("must exceed quant_min ({}), got {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

//=============================================================================
// Uniform Quantizer
//=============================================================================

/// A validated uniform quantizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformQuantizer {
    config: QuantizerConfig,
    /// levels - 1, as f64
    top: f64,
}

impl UniformQuantizer {
    /// Create a quantizer, rejecting degenerate configurations
    pub fn new(config: QuantizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            top: (config.levels - 1) as f64,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &QuantizerConfig {
        &self.config
    }

    /// Number of levels
    pub fn num_levels(&self) -> usize {
        self.config.levels
    }

    /// Distance between adjacent levels
    pub fn step(&self) -> f64 {
        (self.config.max - self.config.min) / self.top
    }

    /// All reconstruction levels in ascending order
    pub fn levels(&self) -> Vec<f64> {
        (0..self.config.levels)
            .map(|k| self.reconstruct(k as f64))
            .collect()
    }

    /// Position of `x` on the level grid, clamped and rounded
    #[inline]
    fn normalized_index(&self, x: f64) -> f64 {
        let n = (x - self.config.min) * self.top / (self.config.max - self.config.min);
        n.clamp(0.0, self.top).round_ties_even()
    }

    #[inline]
    fn reconstruct(&self, n: f64) -> f64 {
        n * (self.config.max - self.config.min) / self.top + self.config.min
    }

    /// Index of the level `x` maps to (0 is `min`)
    ///
    /// NaN maps to level 0.
    #[inline]
    pub fn quantize_index(&self, x: f64) -> usize {
        let n = self.normalized_index(x);
        if n.is_nan() {
            0
        } else {
            n as usize
        }
    }

    /// Quantize a single sample
    ///
    /// NaN passes through unchanged.
    #[inline]
    pub fn quantize(&self, x: f64) -> f64 {
        self.reconstruct(self.normalized_index(x))
    }

    /// Quantize a block of samples into a new vector
    pub fn quantize_slice(&self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.quantize(x)).collect()
    }
}

//=============================================================================
// Free Functions
//=============================================================================

/// Quantize `x` onto `quant_level` uniform levels spanning `[quant_min, quant_max]`
///
/// ```rust
/// use signal_lab::quantize_uniform;
///
/// let q = quantize_uniform(&[-1.0, 0.0, 1.0], -1.0, 1.0, 3).unwrap();
/// assert_eq!(q, vec![-1.0, 0.0, 1.0]);
/// ```
pub fn quantize_uniform(x: &[f64], quant_min: f64, quant_max: f64, quant_level: usize) -> Result<Vec<f64>> {
    let quantizer = UniformQuantizer::new(QuantizerConfig {
        min: quant_min,
        max: quant_max,
        levels: quant_level,
    })?;
    Ok(quantizer.quantize_slice(x))
}

/// Sample-wise quantization error `quantized - original`
pub fn quantization_error(original: &[f64], quantized: &[f64]) -> Result<Vec<f64>> {
    if original.len() != quantized.len() {
        return Err(Error::invalid(
            "quantized",
            format!(
                "length {} does not match original length {}",
                quantized.len(),
                original.len()
            ),
        ));
    }
    Ok(original
        .iter()
        .zip(quantized)
        .map(|(&x, &q)| q - x)
        .collect())
}
