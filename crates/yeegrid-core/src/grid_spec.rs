//! Per-axis meshing policy.

use serde::{Deserialize, Serialize};
use yeegrid_geometry::Axis;

fn default_min_steps() -> f64 {
    10.0
}
fn default_max_scale() -> f64 {
    1.4
}

/// How one axis is discretised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AxisGridSpec {
    /// Equal cells no larger than `dl` (µm).
    Uniform { dl: f64 },
    /// Explicit primal coordinates spanning the domain (µm).
    Custom { coords: Vec<f64> },
    /// Wavelength-adapted non-uniform cells.
    Auto {
        #[serde(default = "default_min_steps")]
        min_steps_per_wavelength: f64,
        /// Largest allowed ratio between neighbouring cell sizes.
        #[serde(default = "default_max_scale")]
        max_scale: f64,
        /// Free-space wavelength (µm) to mesh for; defaults to the highest
        /// source centre frequency.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wavelength: Option<f64>,
    },
}

impl Default for AxisGridSpec {
    fn default() -> Self {
        AxisGridSpec::auto(default_min_steps())
    }
}

impl AxisGridSpec {
    pub fn auto(min_steps_per_wavelength: f64) -> Self {
        AxisGridSpec::Auto {
            min_steps_per_wavelength,
            max_scale: default_max_scale(),
            wavelength: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default)]
    pub x: AxisGridSpec,
    #[serde(default)]
    pub y: AxisGridSpec,
    #[serde(default)]
    pub z: AxisGridSpec,
}

impl GridSpec {
    pub fn all(spec: AxisGridSpec) -> Self {
        Self {
            x: spec.clone(),
            y: spec.clone(),
            z: spec,
        }
    }

    pub fn uniform(dl: f64) -> Self {
        Self::all(AxisGridSpec::Uniform { dl })
    }

    pub fn auto(min_steps_per_wavelength: f64) -> Self {
        Self::all(AxisGridSpec::auto(min_steps_per_wavelength))
    }

    pub fn axis(&self, axis: Axis) -> &AxisGridSpec {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}
