//! Field and flux monitors.

use serde::{Deserialize, Serialize};
use yeegrid_geometry::BoundingBox;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MonitorKind {
    /// Frequency-domain fields inside the monitor box.
    Field { freqs: Vec<f64> },
    /// Power flux through a plane; exactly one size component must be zero.
    Flux { freqs: Vec<f64> },
    /// Time-domain fields, recorded every `interval` time steps.
    FieldTime { interval: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub name: String,
    pub center: [f64; 3],
    pub size: [f64; 3],
    pub kind: MonitorKind,
}

impl Monitor {
    pub fn new(name: impl Into<String>, center: [f64; 3], size: [f64; 3], kind: MonitorKind) -> Self {
        Self {
            name: name.into(),
            center,
            size,
            kind,
        }
    }

    pub fn flux(name: impl Into<String>, center: [f64; 3], size: [f64; 3], freqs: Vec<f64>) -> Self {
        Self::new(name, center, size, MonitorKind::Flux { freqs })
    }

    pub fn field(name: impl Into<String>, center: [f64; 3], size: [f64; 3], freqs: Vec<f64>) -> Self {
        Self::new(name, center, size, MonitorKind::Field { freqs })
    }

    /// The region the monitor records: its box, which for a flux monitor is
    /// the measurement plane.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_center_size(self.center, self.size)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.center.iter().chain(&self.size).any(|v| !v.is_finite())
            || self.size.iter().any(|&s| s < 0.0)
        {
            return Err("center and size must be finite with non-negative size".into());
        }
        match &self.kind {
            MonitorKind::Field { freqs } | MonitorKind::Flux { freqs } => {
                if freqs.is_empty() {
                    return Err("at least one frequency is required".into());
                }
                if let Some(f) = freqs.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
                    return Err(format!("frequencies must be positive, got {f}"));
                }
            }
            MonitorKind::FieldTime { interval } => {
                if *interval == 0 {
                    return Err("interval must be at least one time step".into());
                }
            }
        }
        if let MonitorKind::Flux { .. } = self.kind {
            let zeros = self.size.iter().filter(|&&s| s == 0.0).count();
            if zeros != 1 {
                return Err(format!(
                    "a flux monitor must be planar (one zero size), got size {:?}",
                    self.size
                ));
            }
        }
        Ok(())
    }
}
