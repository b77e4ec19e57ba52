//! Named material presets.
//!
//! Fitted models for materials that come up in most photonics layouts:
//!
//! | Identifier | Model | Source |
//! |-----------|-------|--------|
//! | `SiO2` | Sellmeier | I. H. Malitson, *J. Opt. Soc. Am.* **55**, 1205 (1965) |
//! | `Si3N4` | Sellmeier | K. Luke et al., *Opt. Lett.* **40**, 4823 (2015) |
//! | `Si` | Constant index 3.48 | Telecom-band value |
//! | `Au` | Drude | ε∞ = 9.5, ħωp = 8.95 eV, ħγ = 0.069 eV |
//! | `Ag` | Drude | ε∞ = 3.7, ħωp = 9.1 eV, ħγ = 0.018 eV |
//! | `H2O` | Debye | ε∞ = 5.2, Δε = 73.2, τ = 8.27 ps |

use crate::constants::HZ_PER_EV;
use crate::dispersive::{Debye, Drude, Sellmeier};
use crate::material::Material;
use crate::medium::Medium;
use crate::model::MaterialError;

/// Identifier and one-line description of every preset.
pub const PRESETS: &[(&str, &str)] = &[
    ("SiO2", "Fused silica, Sellmeier (Malitson), 0.21-6.7 µm"),
    ("Si3N4", "Stoichiometric silicon nitride, Sellmeier (Luke), 0.31-5.5 µm"),
    ("Si", "Crystalline silicon, constant n = 3.48 (telecom band)"),
    ("Au", "Gold, Drude fit (near-IR)"),
    ("Ag", "Silver, Drude fit (near-IR)"),
    ("H2O", "Water, Debye relaxation (microwave)"),
];

/// Look up a preset by identifier (case-insensitive).
pub fn lookup(name: &str) -> Result<Material, MaterialError> {
    match name.to_ascii_lowercase().as_str() {
        "sio2" => Ok(silica()),
        "si3n4" => Ok(silicon_nitride()),
        "si" => Ok(silicon()),
        "au" => Ok(gold()),
        "ag" => Ok(silver()),
        "h2o" => Ok(water()),
        _ => Err(MaterialError::NotFound(name.to_string())),
    }
}

pub fn silica() -> Material {
    Material::Sellmeier(Sellmeier {
        coeffs: vec![
            (0.696_166_3, 0.068_404_3_f64.powi(2)),
            (0.407_942_6, 0.116_241_4_f64.powi(2)),
            (0.897_479_4, 9.896_161_f64.powi(2)),
        ],
    })
}

pub fn silicon_nitride() -> Material {
    Material::Sellmeier(Sellmeier {
        coeffs: vec![
            (3.0249, 0.135_340_6_f64.powi(2)),
            (40314.0, 1239.842_f64.powi(2)),
        ],
    })
}

pub fn silicon() -> Material {
    Material::Medium(Medium {
        permittivity: 3.48 * 3.48,
        conductivity: 0.0,
    })
}

pub fn gold() -> Material {
    drude(9.5, 8.95, 0.069)
}

pub fn silver() -> Material {
    drude(3.7, 9.1, 0.018)
}

pub fn water() -> Material {
    // τ multiplies the ordinary frequency in the Debye form used here.
    let tau = 2.0 * std::f64::consts::PI * 8.27e-12;
    Material::Debye(Debye {
        eps_inf: 5.2,
        coeffs: vec![(73.2, tau)],
    })
}

fn drude(eps_inf: f64, plasma_ev: f64, damping_ev: f64) -> Material {
    Material::Drude(Drude {
        eps_inf,
        coeffs: vec![(plasma_ev * HZ_PER_EV, damping_ev * HZ_PER_EV)],
    })
}
