//! The closed set of material models.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::dispersive::{check_finite, Debye, Drude, Lorentz, PoleResidue, Sellmeier};
use crate::medium::Medium;
use crate::model::{MaterialError, PermittivityModel};

/// Any supported material. Serialised with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Medium(Medium),
    PoleResidue(PoleResidue),
    Sellmeier(Sellmeier),
    Lorentz(Lorentz),
    Drude(Drude),
    Debye(Debye),
}

impl Default for Material {
    fn default() -> Self {
        Material::vacuum()
    }
}

impl Material {
    pub fn vacuum() -> Self {
        Material::Medium(Medium::default())
    }

    /// Lossless, non-dispersive material with refractive index `n`.
    pub fn from_index(n: f64) -> Result<Self, MaterialError> {
        Medium::from_index(n).map(Material::Medium)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Material::Medium(_) => "medium",
            Material::PoleResidue(_) => "pole-residue",
            Material::Sellmeier(_) => "sellmeier",
            Material::Lorentz(_) => "lorentz",
            Material::Drude(_) => "drude",
            Material::Debye(_) => "debye",
        }
    }

    /// Reject non-finite coefficients and sub-vacuum constant permittivity.
    ///
    /// Gain (negative loss) is *not* rejected here; it is a property of the
    /// evaluated permittivity over a band and is reported by validation.
    pub fn validate(&self) -> Result<(), MaterialError> {
        let kind = self.kind();
        match self {
            Material::Medium(m) => m.validate(),
            Material::PoleResidue(p) => check_finite(
                kind,
                std::iter::once(p.eps_inf)
                    .chain(p.poles.iter().flat_map(|(a, c)| [a.re, a.im, c.re, c.im])),
            ),
            Material::Sellmeier(s) => {
                check_finite(kind, s.coeffs.iter().flat_map(|&(b, c)| [b, c]))
            }
            Material::Lorentz(l) => check_finite(
                kind,
                std::iter::once(l.eps_inf).chain(l.coeffs.iter().flat_map(|&(d, f, g)| [d, f, g])),
            ),
            Material::Drude(d) => check_finite(
                kind,
                std::iter::once(d.eps_inf).chain(d.coeffs.iter().flat_map(|&(f, g)| [f, g])),
            ),
            Material::Debye(d) => check_finite(
                kind,
                std::iter::once(d.eps_inf).chain(d.coeffs.iter().flat_map(|&(e, t)| [e, t])),
            ),
        }
    }
}

impl PermittivityModel for Material {
    fn permittivity(&self, omega: f64) -> Complex64 {
        match self {
            Material::Medium(m) => m.permittivity(omega),
            Material::PoleResidue(m) => m.permittivity(omega),
            Material::Sellmeier(m) => m.permittivity(omega),
            Material::Lorentz(m) => m.permittivity(omega),
            Material::Drude(m) => m.permittivity(omega),
            Material::Debye(m) => m.permittivity(omega),
        }
    }
}
