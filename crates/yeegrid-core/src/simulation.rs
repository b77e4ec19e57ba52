//! The simulation description: domain, contents, boundaries and grid policy.
//!
//! [`Simulation`] is immutable once built. Construction goes through
//! [`SimulationBuilder`], which performs the checks that do not need a grid.
//! Everything that depends on the generated grid is left to the validator.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yeegrid_geometry::{Axis, BoundingBox};
use yeegrid_materials::{FrequencyRange, Material, MaterialError};

use crate::boundary::BoundarySpec;
use crate::grid_spec::GridSpec;
use crate::monitor::Monitor;
use crate::source::Source;
use crate::structure::{Structure, StructureRegistry};
use crate::types::Symmetry;

/// Courant factor used when none is given.
pub const DEFAULT_COURANT: f64 = 0.99;

fn default_courant() -> f64 {
    DEFAULT_COURANT
}

/// Errors raised while assembling a [`Simulation`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid domain size {size:?}: every component must be positive and finite")]
    InvalidDomain { size: [f64; 3] },

    #[error("Invalid run time {0} s: must be positive and finite")]
    InvalidRunTime(f64),

    #[error("Invalid Courant factor {0}: must be positive and finite")]
    InvalidCourant(f64),

    #[error("Invalid material for {}: {source}", material_owner(.index))]
    Material {
        /// Structure priority, or `None` for the background medium.
        index: Option<usize>,
        source: MaterialError,
    },

    #[error("Invalid boundary along {axis}: {reason}")]
    InvalidBoundary { axis: Axis, reason: String },

    #[error("Invalid source[{index}]: {reason}")]
    InvalidSource { index: usize, reason: String },

    #[error("Invalid monitor[{index}]: {reason}")]
    InvalidMonitor { index: usize, reason: String },
}

fn material_owner(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("structure[{i}]"),
        None => "background medium".into(),
    }
}

/// A complete, immutable simulation description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    center: [f64; 3],
    size: [f64; 3],
    #[serde(default)]
    medium: Material,
    #[serde(default)]
    structures: StructureRegistry,
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    monitors: Vec<Monitor>,
    #[serde(default)]
    boundaries: BoundarySpec,
    #[serde(default)]
    grid_spec: GridSpec,
    run_time: f64,
    #[serde(default = "default_courant")]
    courant: f64,
    #[serde(default)]
    symmetry: [Symmetry; 3],
}

impl Simulation {
    pub fn builder(center: [f64; 3], size: [f64; 3], run_time: f64) -> SimulationBuilder {
        SimulationBuilder::new(center, size, run_time)
    }

    /// A builder seeded with every field of `self`, for making a modified
    /// copy. The copy goes through the full construction checks again.
    pub fn to_builder(&self) -> SimulationBuilder {
        SimulationBuilder { sim: self.clone() }
    }

    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    pub fn size(&self) -> [f64; 3] {
        self.size
    }

    /// The simulation domain as a box.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center_size(self.center, self.size)
    }

    /// Background medium filling space not covered by any structure.
    pub fn medium(&self) -> &Material {
        &self.medium
    }

    pub fn structures(&self) -> &StructureRegistry {
        &self.structures
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn boundaries(&self) -> &BoundarySpec {
        &self.boundaries
    }

    pub fn grid_spec(&self) -> &GridSpec {
        &self.grid_spec
    }

    /// Total simulated time (s).
    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    pub fn courant(&self) -> f64 {
        self.courant
    }

    pub fn symmetry(&self) -> [Symmetry; 3] {
        self.symmetry
    }

    /// Union of every source's band, or `None` without sources.
    pub fn frequency_range(&self) -> Option<FrequencyRange> {
        self.sources
            .iter()
            .map(|s| s.time.frequency_range())
            .reduce(|a, b| a.union(&b))
    }

    /// Highest source centre frequency (Hz); the automatic mesher resolves
    /// the wavelength at this frequency.
    pub fn meshing_frequency(&self) -> Option<f64> {
        self.sources
            .iter()
            .map(|s| s.time.freq0)
            .reduce(f64::max)
    }

    /// Re-run the construction checks. Used on decoded input, which bypasses
    /// the builder.
    pub fn check(&self) -> Result<(), SimulationError> {
        let size_ok = self.size.iter().all(|s| s.is_finite() && *s > 0.0)
            && self.center.iter().all(|c| c.is_finite());
        if !size_ok {
            return Err(SimulationError::InvalidDomain { size: self.size });
        }
        if !(self.run_time.is_finite() && self.run_time > 0.0) {
            return Err(SimulationError::InvalidRunTime(self.run_time));
        }
        if !(self.courant.is_finite() && self.courant > 0.0) {
            return Err(SimulationError::InvalidCourant(self.courant));
        }
        self.medium
            .validate()
            .map_err(|source| SimulationError::Material {
                index: None,
                source,
            })?;
        for (index, s) in self.structures.iter() {
            s.material
                .validate()
                .map_err(|source| SimulationError::Material {
                    index: Some(index),
                    source,
                })?;
        }
        for axis in Axis::ALL {
            self.boundaries
                .axis(axis)
                .check()
                .map_err(|reason| SimulationError::InvalidBoundary { axis, reason })?;
        }
        for (index, s) in self.sources.iter().enumerate() {
            s.check()
                .map_err(|reason| SimulationError::InvalidSource { index, reason })?;
        }
        for (index, m) in self.monitors.iter().enumerate() {
            m.check()
                .map_err(|reason| SimulationError::InvalidMonitor { index, reason })?;
        }
        Ok(())
    }
}

/// Fluent constructor for [`Simulation`].
///
/// ```
/// use yeegrid_core::simulation::Simulation;
/// use yeegrid_core::grid_spec::GridSpec;
///
/// let sim = Simulation::builder([0.0; 3], [4.0, 4.0, 4.0], 1e-13)
///     .grid_spec(GridSpec::uniform(0.1))
///     .build()
///     .unwrap();
/// assert_eq!(sim.courant(), 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    sim: Simulation,
}

impl SimulationBuilder {
    pub fn new(center: [f64; 3], size: [f64; 3], run_time: f64) -> Self {
        Self {
            sim: Simulation {
                center,
                size,
                medium: Material::default(),
                structures: StructureRegistry::default(),
                sources: Vec::new(),
                monitors: Vec::new(),
                boundaries: BoundarySpec::default(),
                grid_spec: GridSpec::default(),
                run_time,
                courant: DEFAULT_COURANT,
                symmetry: [Symmetry::None; 3],
            },
        }
    }

    pub fn medium(mut self, medium: Material) -> Self {
        self.sim.medium = medium;
        self
    }

    /// Append a structure; it takes priority over every structure added before it.
    pub fn structure(mut self, structure: Structure) -> Self {
        self.sim.structures.push(structure);
        self
    }

    pub fn structures(mut self, structures: StructureRegistry) -> Self {
        self.sim.structures = structures;
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sim.sources.push(source);
        self
    }

    pub fn sources(mut self, sources: Vec<Source>) -> Self {
        self.sim.sources = sources;
        self
    }

    pub fn monitor(mut self, monitor: Monitor) -> Self {
        self.sim.monitors.push(monitor);
        self
    }

    pub fn monitors(mut self, monitors: Vec<Monitor>) -> Self {
        self.sim.monitors = monitors;
        self
    }

    pub fn boundaries(mut self, boundaries: BoundarySpec) -> Self {
        self.sim.boundaries = boundaries;
        self
    }

    pub fn grid_spec(mut self, grid_spec: GridSpec) -> Self {
        self.sim.grid_spec = grid_spec;
        self
    }

    pub fn courant(mut self, courant: f64) -> Self {
        self.sim.courant = courant;
        self
    }

    pub fn symmetry(mut self, symmetry: [Symmetry; 3]) -> Self {
        self.sim.symmetry = symmetry;
        self
    }

    pub fn build(self) -> Result<Simulation, SimulationError> {
        self.sim.check()?;
        Ok(self.sim)
    }
}
