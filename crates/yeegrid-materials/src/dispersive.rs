//! Dispersive permittivity models.
//!
//! Coefficients follow the usual FDTD-package conventions: Lorentz, Drude
//! and Debye terms are written in ordinary frequency $\nu = \omega / 2\pi$
//! (Hz), Sellmeier terms in vacuum wavelength (µm), and pole-residue pairs
//! in angular frequency (rad/s).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::constants::C_0;
use crate::model::{MaterialError, PermittivityModel};

const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// Complex-conjugate pole pairs:
/// $\epsilon = \epsilon_\infty - \sum_k \left[\frac{c_k}{i\omega + a_k} + \frac{c_k^*}{i\omega + a_k^*}\right]$.
///
/// A pole with $\operatorname{Re} a_k > 0$ is unstable; passivity also
/// depends on the residues, so it is checked by sampling rather than here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoleResidue {
    pub eps_inf: f64,
    /// `(a, c)` pairs in rad/s.
    pub poles: Vec<(Complex64, Complex64)>,
}

/// $\epsilon = 1 + \sum_k B_k \lambda^2 / (\lambda^2 - C_k)$, $\lambda$ in µm, $C_k$ in µm².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sellmeier {
    /// `(B, C)` pairs.
    pub coeffs: Vec<(f64, f64)>,
}

/// $\epsilon = \epsilon_\infty + \sum_k \Delta\epsilon_k f_k^2 / (f_k^2 - 2i\nu\delta_k - \nu^2)$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lorentz {
    pub eps_inf: f64,
    /// `(Δε, f, δ)` triples, `f` and `δ` in Hz.
    pub coeffs: Vec<(f64, f64, f64)>,
}

/// $\epsilon = \epsilon_\infty - \sum_k f_k^2 / (\nu^2 + i\nu\delta_k)$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drude {
    pub eps_inf: f64,
    /// `(f, δ)` pairs in Hz.
    pub coeffs: Vec<(f64, f64)>,
}

/// $\epsilon = \epsilon_\infty + \sum_k \Delta\epsilon_k / (1 - i\nu\tau_k)$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debye {
    pub eps_inf: f64,
    /// `(Δε, τ)` pairs, `τ` in seconds.
    pub coeffs: Vec<(f64, f64)>,
}

impl PermittivityModel for PoleResidue {
    fn permittivity(&self, omega: f64) -> Complex64 {
        let jw = Complex64::new(0.0, omega);
        self.poles
            .iter()
            .fold(Complex64::from(self.eps_inf), |eps, (a, c)| {
                eps - c / (jw + a) - c.conj() / (jw + a.conj())
            })
    }
}

impl PermittivityModel for Sellmeier {
    fn permittivity(&self, omega: f64) -> Complex64 {
        let lambda = C_0 * TWO_PI / omega;
        let l2 = lambda * lambda;
        let eps = self
            .coeffs
            .iter()
            .fold(1.0, |eps, (b, c)| eps + b * l2 / (l2 - c));
        Complex64::from(eps)
    }
}

impl PermittivityModel for Lorentz {
    fn permittivity(&self, omega: f64) -> Complex64 {
        let nu = omega / TWO_PI;
        self.coeffs
            .iter()
            .fold(Complex64::from(self.eps_inf), |eps, &(de, f, delta)| {
                let denom = Complex64::new(f * f - nu * nu, -2.0 * nu * delta);
                eps + de * f * f / denom
            })
    }
}

impl PermittivityModel for Drude {
    fn permittivity(&self, omega: f64) -> Complex64 {
        let nu = omega / TWO_PI;
        self.coeffs
            .iter()
            .fold(Complex64::from(self.eps_inf), |eps, &(f, delta)| {
                eps - f * f / Complex64::new(nu * nu, nu * delta)
            })
    }
}

impl PermittivityModel for Debye {
    fn permittivity(&self, omega: f64) -> Complex64 {
        let nu = omega / TWO_PI;
        self.coeffs
            .iter()
            .fold(Complex64::from(self.eps_inf), |eps, &(de, tau)| {
                eps + de / Complex64::new(1.0, -nu * tau)
            })
    }
}

pub(crate) fn check_finite(
    material: &'static str,
    values: impl IntoIterator<Item = f64>,
) -> Result<(), MaterialError> {
    if values.into_iter().all(f64::is_finite) {
        Ok(())
    } else {
        Err(MaterialError::InvalidParameter {
            material,
            reason: "coefficients must be finite".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{angular, frequency_hz};
    use approx::assert_relative_eq;

    #[test]
    fn test_silica_sellmeier_at_telecom() {
        let silica = Sellmeier {
            coeffs: vec![
                (0.696_166_3, 0.068_404_3_f64.powi(2)),
                (0.407_942_6, 0.116_241_4_f64.powi(2)),
                (0.897_479_4, 9.896_161_f64.powi(2)),
            ],
        };
        let n = silica.refractive_index(angular(frequency_hz(1.55)));
        assert_relative_eq!(n, 1.444, epsilon = 1e-3);
    }

    #[test]
    fn test_pole_residue_reproduces_debye() {
        let (de, tau) = (3.0, 2.0e-14);
        let debye = Debye {
            eps_inf: 2.0,
            coeffs: vec![(de, tau)],
        };
        // Debye written in ν: de / (1 - iωτ/2π) has a real pole at -2π/τ.
        let a = Complex64::new(-TWO_PI / tau, 0.0);
        let c = Complex64::new(de * TWO_PI / (2.0 * tau), 0.0);
        let poles = PoleResidue {
            eps_inf: 2.0,
            poles: vec![(a, c)],
        };
        for omega in [1.0e13, 3.0e14, 2.0e15] {
            let e1 = debye.permittivity(omega);
            let e2 = poles.permittivity(omega);
            assert_relative_eq!(e1.re, e2.re, max_relative = 1e-10);
            assert_relative_eq!(e1.im, e2.im, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_lorentz_loss_sign_follows_damping() {
        let passive = Lorentz {
            eps_inf: 1.0,
            coeffs: vec![(2.0, 3.0e14, 1.0e13)],
        };
        let active = Lorentz {
            eps_inf: 1.0,
            coeffs: vec![(2.0, 3.0e14, -1.0e13)],
        };
        let omega = angular(2.9e14);
        assert!(passive.permittivity(omega).im > 0.0);
        assert!(active.permittivity(omega).im < 0.0);
    }

    #[test]
    fn test_drude_is_metallic_below_plasma_frequency() {
        let drude = Drude {
            eps_inf: 1.0,
            coeffs: vec![(2.0e15, 1.0e13)],
        };
        let eps = drude.permittivity(angular(3.0e14));
        assert!(eps.re < 0.0);
        assert!(eps.im > 0.0);
    }
}
