//! Boundary conditions on the six faces of the simulation domain.

use serde::{Deserialize, Serialize};
use yeegrid_geometry::Axis;

fn default_layers() -> usize {
    12
}
fn default_sigma_order() -> u32 {
    3
}
fn default_sigma_max() -> f64 {
    1.5
}
fn default_cell_growth() -> f64 {
    1.0
}

/// Perfectly matched layer parameters.
///
/// The conductivity profile grows polynomially (`sigma_order`) from
/// `sigma_min` to `sigma_max` across `num_layers` cells. `cell_growth` is
/// the ratio between consecutive PML cell sizes, starting from the
/// boundary-adjacent interior cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmlParams {
    #[serde(default = "default_layers")]
    pub num_layers: usize,
    #[serde(default = "default_sigma_order")]
    pub sigma_order: u32,
    #[serde(default)]
    pub sigma_min: f64,
    #[serde(default = "default_sigma_max")]
    pub sigma_max: f64,
    #[serde(default = "default_cell_growth")]
    pub cell_growth: f64,
}

impl Default for PmlParams {
    fn default() -> Self {
        Self {
            num_layers: default_layers(),
            sigma_order: default_sigma_order(),
            sigma_min: 0.0,
            sigma_max: default_sigma_max(),
            cell_growth: default_cell_growth(),
        }
    }
}

impl PmlParams {
    pub fn with_layers(num_layers: usize) -> Self {
        Self {
            num_layers,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), String> {
        if !(self.sigma_min.is_finite() && self.sigma_max.is_finite()) {
            return Err(format!(
                "PML conductivity bounds must be finite, got [{}, {}]",
                self.sigma_min, self.sigma_max
            ));
        }
        if self.sigma_min < 0.0 || self.sigma_max < self.sigma_min {
            return Err(format!(
                "PML conductivity must satisfy 0 <= sigma_min <= sigma_max, got [{}, {}]",
                self.sigma_min, self.sigma_max
            ));
        }
        if !self.cell_growth.is_finite() {
            return Err(format!("PML cell_growth must be finite, got {}", self.cell_growth));
        }
        Ok(())
    }
}

/// Condition applied on one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundaryKind {
    Pml(PmlParams),
    Periodic,
    Pec,
    Pmc,
    /// Periodic with a phase shift; `bloch_vec` is in units of 2π / domain size.
    Bloch { bloch_vec: f64 },
}

impl BoundaryKind {
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryKind::Pml(_) => "PML",
            BoundaryKind::Periodic => "periodic",
            BoundaryKind::Pec => "PEC",
            BoundaryKind::Pmc => "PMC",
            BoundaryKind::Bloch { .. } => "Bloch",
        }
    }

    fn is_periodic_like(&self) -> bool {
        matches!(self, BoundaryKind::Periodic | BoundaryKind::Bloch { .. })
    }

    fn check(&self) -> Result<(), String> {
        match self {
            BoundaryKind::Pml(p) => p.check(),
            BoundaryKind::Bloch { bloch_vec } if !bloch_vec.is_finite() => {
                Err(format!("Bloch vector must be finite, got {bloch_vec}"))
            }
            _ => Ok(()),
        }
    }
}

/// The pair of conditions on the minus and plus faces of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub minus: BoundaryKind,
    pub plus: BoundaryKind,
}

impl Boundary {
    pub fn both(kind: BoundaryKind) -> Self {
        Self {
            minus: kind.clone(),
            plus: kind,
        }
    }

    pub fn pml() -> Self {
        Self::both(BoundaryKind::Pml(PmlParams::default()))
    }

    pub fn periodic() -> Self {
        Self::both(BoundaryKind::Periodic)
    }

    pub fn pec() -> Self {
        Self::both(BoundaryKind::Pec)
    }

    /// PML parameters of the minus and plus faces, if absorbing.
    pub fn pml_params(&self) -> (Option<&PmlParams>, Option<&PmlParams>) {
        fn pick(kind: &BoundaryKind) -> Option<&PmlParams> {
            match kind {
                BoundaryKind::Pml(p) => Some(p),
                _ => None,
            }
        }
        (pick(&self.minus), pick(&self.plus))
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        self.minus.check().map_err(|e| format!("minus face: {e}"))?;
        self.plus.check().map_err(|e| format!("plus face: {e}"))
    }

    pub fn has_pml(&self) -> bool {
        matches!(self.minus, BoundaryKind::Pml(_)) || matches!(self.plus, BoundaryKind::Pml(_))
    }

    /// True when both faces are periodic, or both Bloch with the same phase.
    pub fn is_periodic(&self) -> bool {
        match (&self.minus, &self.plus) {
            (BoundaryKind::Periodic, BoundaryKind::Periodic) => true,
            (BoundaryKind::Bloch { bloch_vec: a }, BoundaryKind::Bloch { bloch_vec: b }) => a == b,
            _ => false,
        }
    }

    /// True if exactly one face is periodic-like, or the faces disagree on
    /// the kind of periodicity.
    pub fn is_unpaired(&self) -> bool {
        (self.minus.is_periodic_like() || self.plus.is_periodic_like()) && !self.is_periodic()
    }
}

/// Boundaries on all three axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySpec {
    pub x: Boundary,
    pub y: Boundary,
    pub z: Boundary,
}

impl Default for BoundarySpec {
    fn default() -> Self {
        Self::all_sides(BoundaryKind::Pml(PmlParams::default()))
    }
}

impl BoundarySpec {
    pub fn all_sides(kind: BoundaryKind) -> Self {
        Self {
            x: Boundary::both(kind.clone()),
            y: Boundary::both(kind.clone()),
            z: Boundary::both(kind),
        }
    }

    pub fn axis(&self, axis: Axis) -> &Boundary {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_rules() {
        assert!(Boundary::periodic().is_periodic());
        assert!(!Boundary::periodic().is_unpaired());
        assert!(!Boundary::pml().is_unpaired());

        let half = Boundary {
            minus: BoundaryKind::Periodic,
            plus: BoundaryKind::Pec,
        };
        assert!(half.is_unpaired());

        let mismatched = Boundary {
            minus: BoundaryKind::Bloch { bloch_vec: 0.1 },
            plus: BoundaryKind::Bloch { bloch_vec: 0.2 },
        };
        assert!(mismatched.is_unpaired());
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let mut pml = PmlParams::default();
        pml.sigma_max = f64::INFINITY;
        let b = Boundary {
            minus: BoundaryKind::Pec,
            plus: BoundaryKind::Pml(pml),
        };
        assert!(b.check().unwrap_err().starts_with("plus face"));

        let bloch = Boundary::both(BoundaryKind::Bloch { bloch_vec: f64::NAN });
        assert!(bloch.check().is_err());
        assert!(Boundary::pml().check().is_ok());
    }

    #[test]
    fn test_pml_params_borrow_from_boundary() {
        let b = Boundary {
            minus: BoundaryKind::Pml(PmlParams::with_layers(4)),
            plus: BoundaryKind::Periodic,
        };
        let (minus, plus) = b.pml_params();
        assert_eq!(minus.map(|p| p.num_layers), Some(4));
        assert!(plus.is_none());
    }

    #[test]
    fn test_pml_defaults_fill_missing_toml_fields() {
        let kind: BoundaryKind = serde_json::from_str(r#"{"type":"Pml","num_layers":8}"#).unwrap();
        match kind {
            BoundaryKind::Pml(p) => {
                assert_eq!(p.num_layers, 8);
                assert_eq!(p.sigma_order, 3);
                assert_eq!(p.cell_growth, 1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
