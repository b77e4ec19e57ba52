//! Permittivity model trait and frequency ranges.
//!
//! Every material variant implements [`PermittivityModel`], which maps an
//! angular frequency to a complex relative permittivity. The time convention
//! is $e^{-i\omega t}$, so a passive (lossy or lossless) medium has
//! $\operatorname{Im}\epsilon \ge 0$.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::angular;

/// Errors from material construction and lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("Invalid {material} parameter: {reason}")]
    InvalidParameter {
        material: &'static str,
        reason: String,
    },

    #[error("Material not found: {0}")]
    NotFound(String),

    #[error("Invalid frequency range [{min}, {max}] Hz")]
    InvalidRange { min: f64, max: f64 },
}

/// A closed band of ordinary frequencies (Hz).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min: f64,
    pub max: f64,
}

impl FrequencyRange {
    pub fn new(min: f64, max: f64) -> Result<Self, MaterialError> {
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max < min {
            return Err(MaterialError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &FrequencyRange) -> FrequencyRange {
        FrequencyRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// `n` evenly spaced frequencies from `min` to `max` inclusive
    /// (just `min` when `n < 2` or the range is a single point).
    pub fn samples(&self, n: usize) -> Vec<f64> {
        if n < 2 || self.max == self.min {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (n - 1) as f64;
        (0..n).map(|i| self.min + step * i as f64).collect()
    }
}

/// Provides a frequency-dependent complex relative permittivity.
pub trait PermittivityModel {
    /// Complex relative permittivity at angular frequency `omega` (rad/s).
    fn permittivity(&self, omega: f64) -> Complex64;

    /// Real refractive index $n = \operatorname{Re}\sqrt{\epsilon}$.
    fn refractive_index(&self, omega: f64) -> f64 {
        self.permittivity(omega).sqrt().re
    }

    /// Largest refractive index found on `samples` points of `range`.
    fn max_refractive_index(&self, range: &FrequencyRange, samples: usize) -> f64 {
        range
            .samples(samples)
            .into_iter()
            .map(|f| self.refractive_index(angular(f)))
            .fold(f64::MIN, f64::max)
    }

    /// Smallest $\operatorname{Im}\epsilon$ found on `samples` points of
    /// `range`. Negative values indicate gain.
    fn min_loss(&self, range: &FrequencyRange, samples: usize) -> f64 {
        range
            .samples(samples)
            .into_iter()
            .map(|f| self.permittivity(angular(f)).im)
            .fold(f64::MAX, f64::min)
    }
}
