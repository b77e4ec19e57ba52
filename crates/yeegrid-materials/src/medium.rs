//! Non-dispersive media.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::constants::EPSILON_0;
use crate::model::{MaterialError, PermittivityModel};

/// A medium with constant relative permittivity and conductivity.
///
/// $\epsilon(\omega) = \epsilon_r + i\sigma / (\omega \epsilon_0)$, with
/// $\sigma$ in S/µm. A negative conductivity describes gain; it is accepted
/// here and reported by the passivity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    pub permittivity: f64,
    #[serde(default)]
    pub conductivity: f64,
}

impl Default for Medium {
    fn default() -> Self {
        Self {
            permittivity: 1.0,
            conductivity: 0.0,
        }
    }
}

impl Medium {
    pub fn new(permittivity: f64, conductivity: f64) -> Result<Self, MaterialError> {
        let m = Self {
            permittivity,
            conductivity,
        };
        m.validate()?;
        Ok(m)
    }

    /// Lossless medium with refractive index `n`.
    pub fn from_index(n: f64) -> Result<Self, MaterialError> {
        Self::new(n * n, 0.0)
    }

    pub fn validate(&self) -> Result<(), MaterialError> {
        if !self.permittivity.is_finite() || self.permittivity < 1.0 {
            return Err(MaterialError::InvalidParameter {
                material: "medium",
                reason: format!("permittivity must be >= 1, got {}", self.permittivity),
            });
        }
        if !self.conductivity.is_finite() {
            return Err(MaterialError::InvalidParameter {
                material: "medium",
                reason: "conductivity must be finite".into(),
            });
        }
        Ok(())
    }
}

impl PermittivityModel for Medium {
    fn permittivity(&self, omega: f64) -> Complex64 {
        if self.conductivity == 0.0 {
            return Complex64::new(self.permittivity, 0.0);
        }
        Complex64::new(self.permittivity, self.conductivity / (omega * EPSILON_0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_index_of_lossless_medium() {
        let m = Medium::from_index(2.0).unwrap();
        assert_relative_eq!(m.refractive_index(1.0e15), 2.0, epsilon = 1e-12);
        assert_eq!(m.permittivity(1.0e15).im, 0.0);
    }

    #[test]
    fn test_conductivity_adds_loss() {
        let m = Medium::new(2.25, 1.0e-3).unwrap();
        let omega = 1.2e15;
        let eps = m.permittivity(omega);
        assert_relative_eq!(eps.im, 1.0e-3 / (omega * EPSILON_0), max_relative = 1e-12);
        assert!(eps.im > 0.0);
    }

    #[test]
    fn test_sub_vacuum_permittivity_rejected() {
        assert!(Medium::new(0.5, 0.0).is_err());
    }
}
