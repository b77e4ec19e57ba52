//! Current sources and their time dependence.

use serde::{Deserialize, Serialize};
use yeegrid_geometry::{Axis, BoundingBox};
use yeegrid_materials::FrequencyRange;

use crate::types::{Direction, Polarization};

/// Number of pulse widths on either side of the centre frequency that make
/// up a source's band of interest.
pub const NUM_FWIDTH: f64 = 4.0;

/// Lower clip of a source band, as a fraction of its centre frequency.
const MIN_BAND_FRACTION: f64 = 1.0e-2;

fn one() -> f64 {
    1.0
}

/// Gaussian-modulated sinusoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianPulse {
    /// Centre frequency (Hz).
    pub freq0: f64,
    /// Standard deviation of the spectrum (Hz).
    pub fwidth: f64,
    #[serde(default = "one")]
    pub amplitude: f64,
    #[serde(default)]
    pub phase: f64,
}

impl GaussianPulse {
    pub fn new(freq0: f64, fwidth: f64) -> Self {
        Self {
            freq0,
            fwidth,
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    /// `freq0 ± NUM_FWIDTH·fwidth`, clipped to stay positive.
    pub fn frequency_range(&self) -> FrequencyRange {
        let lo = (self.freq0 - NUM_FWIDTH * self.fwidth).max(MIN_BAND_FRACTION * self.freq0);
        FrequencyRange {
            min: lo,
            max: self.freq0 + NUM_FWIDTH * self.fwidth,
        }
    }
}

/// What the source injects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceKind {
    /// Uniform current density over the source box.
    UniformCurrent { polarization: Polarization },
    /// Point current; the source box must have zero size.
    PointDipole { polarization: Polarization },
    /// Plane wave injected from a plane normal to `injection_axis`.
    PlaneWave {
        injection_axis: Axis,
        direction: Direction,
        #[serde(default)]
        pol_angle: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub center: [f64; 3],
    pub size: [f64; 3],
    pub time: GaussianPulse,
    pub kind: SourceKind,
}

impl Source {
    pub fn new(center: [f64; 3], size: [f64; 3], time: GaussianPulse, kind: SourceKind) -> Self {
        Self {
            name: None,
            center,
            size,
            time,
            kind,
        }
    }

    pub fn point_dipole(center: [f64; 3], time: GaussianPulse, polarization: Polarization) -> Self {
        Self::new(center, [0.0; 3], time, SourceKind::PointDipole { polarization })
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_center_size(self.center, self.size)
    }

    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(n) => format!("source '{n}'"),
            None => format!("source[{index}]"),
        }
    }

    /// Shape and spectrum checks that do not depend on the rest of the simulation.
    pub(crate) fn check(&self) -> Result<(), String> {
        let t = &self.time;
        if !(t.freq0.is_finite() && t.freq0 > 0.0) {
            return Err(format!("freq0 must be positive, got {}", t.freq0));
        }
        if !(t.fwidth.is_finite() && t.fwidth > 0.0) {
            return Err(format!("fwidth must be positive, got {}", t.fwidth));
        }
        if !(t.amplitude.is_finite() && t.phase.is_finite()) {
            return Err(format!(
                "amplitude and phase must be finite, got {} and {}",
                t.amplitude, t.phase
            ));
        }
        if self.center.iter().chain(&self.size).any(|v| !v.is_finite())
            || self.size.iter().any(|&s| s < 0.0)
        {
            return Err("center and size must be finite with non-negative size".into());
        }
        match &self.kind {
            SourceKind::PointDipole { .. } if self.size != [0.0; 3] => {
                Err("a point dipole must have zero size".into())
            }
            SourceKind::PlaneWave { pol_angle, .. } if !pol_angle.is_finite() => {
                Err(format!("pol_angle must be finite, got {pol_angle}"))
            }
            SourceKind::PlaneWave { injection_axis, .. }
                if self.size[injection_axis.index()] != 0.0 =>
            {
                Err(format!(
                    "a plane wave must have zero size along its injection axis {injection_axis}"
                ))
            }
            _ => Ok(()),
        }
    }
}
