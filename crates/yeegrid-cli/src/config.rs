//! TOML configuration deserialisation for preparation jobs.
//!
//! A job file mirrors the simulation description. Sources, monitors,
//! boundaries and grid settings use the same tagged layout as the JSON
//! submission format; materials may also be given by preset name.
//!
//! ```toml
//! [simulation]
//! size = [10.0, 10.0, 10.0]
//! run_time = 1e-13
//!
//! [[structure]]
//! name = "core"
//! material = "Si3N4"
//! geometry = { type = "Box", center = [0.0, 0.0, 0.0], size = [2.0, 2.0, 2.0] }
//!
//! [[source]]
//! center = [0.0, 0.0, 0.0]
//! size = [0.0, 0.0, 0.0]
//! time = { freq0 = 1.93e14, fwidth = 1.9e13 }
//! kind = { type = "PointDipole", polarization = "Ez" }
//! ```

use serde::Deserialize;
use yeegrid_core::boundary::BoundarySpec;
use yeegrid_core::grid_spec::GridSpec;
use yeegrid_core::mesh::MeshSettings;
use yeegrid_core::monitor::Monitor;
use yeegrid_core::source::Source;
use yeegrid_core::types::Symmetry;
use yeegrid_core::validate::ValidationSettings;
use yeegrid_core::PrepareConfig;
use yeegrid_geometry::Geometry;
use yeegrid_materials::Material;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub structure: Vec<StructureConfig>,
    #[serde(default)]
    pub source: Vec<Source>,
    #[serde(default)]
    pub monitor: Vec<Monitor>,
    #[serde(default)]
    pub boundaries: BoundarySpec,
    #[serde(default)]
    pub grid: GridSpec,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Domain and time settings.
#[derive(Debug, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub center: [f64; 3],
    pub size: [f64; 3],
    /// Simulated time in seconds.
    pub run_time: f64,
    #[serde(default = "default_courant")]
    pub courant: f64,
    /// Background medium (default: vacuum).
    #[serde(default)]
    pub medium: Option<MaterialRef>,
    #[serde(default)]
    pub symmetry: [Symmetry; 3],
}

fn default_courant() -> f64 {
    0.99
}

/// A material given by preset name (e.g. "SiO2") or inline as a tagged model.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaterialRef {
    Preset(String),
    Inline(Material),
}

#[derive(Debug, Deserialize)]
pub struct StructureConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub material: MaterialRef,
    pub geometry: Geometry,
}

/// Overrides for the generator and validator limits.
#[derive(Debug, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_cells_per_axis")]
    pub max_cells_per_axis: usize,
    #[serde(default = "default_max_total_cells")]
    pub max_total_cells: u64,
    #[serde(default = "default_min_cells_per_feature")]
    pub min_cells_per_feature: usize,
    #[serde(default = "default_max_time_steps")]
    pub max_time_steps: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_cells_per_axis: default_max_cells_per_axis(),
            max_total_cells: default_max_total_cells(),
            min_cells_per_feature: default_min_cells_per_feature(),
            max_time_steps: default_max_time_steps(),
        }
    }
}

fn default_max_cells_per_axis() -> usize {
    MeshSettings::default().max_cells_per_axis
}
fn default_max_total_cells() -> u64 {
    ValidationSettings::default().max_total_cells
}
fn default_min_cells_per_feature() -> usize {
    ValidationSettings::default().min_cells_per_feature
}
fn default_max_time_steps() -> u64 {
    ValidationSettings::default().max_time_steps
}

impl LimitsConfig {
    pub fn prepare_config(&self) -> PrepareConfig {
        PrepareConfig {
            mesh: MeshSettings {
                max_cells_per_axis: self.max_cells_per_axis,
                ..Default::default()
            },
            validation: ValidationSettings {
                max_total_cells: self.max_total_cells,
                min_cells_per_feature: self.min_cells_per_feature,
                max_time_steps: self.max_time_steps,
                ..Default::default()
            },
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Where `prepare` writes the encoded simulation (default: "simulation.json").
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    "simulation.json".into()
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_job_uses_defaults() {
        let job: JobConfig = toml::from_str(
            r#"
            [simulation]
            size = [4, 4, 4]
            run_time = 1e-13
            "#,
        )
        .unwrap();
        assert_eq!(job.simulation.courant, 0.99);
        assert!(job.structure.is_empty());
        assert_eq!(job.grid, GridSpec::default());
        assert_eq!(job.output.path, "simulation.json");
        assert_eq!(job.limits.max_cells_per_axis, 100_000);
    }

    #[test]
    fn test_preset_and_inline_materials() {
        let job: JobConfig = toml::from_str(
            r#"
            [simulation]
            size = [4.0, 4.0, 4.0]
            run_time = 1e-13
            medium = { type = "Medium", permittivity = 1.77 }

            [[structure]]
            material = "SiO2"
            geometry = { type = "Sphere", center = [0.0, 0.0, 0.0], radius = 0.5 }

            [boundaries.x]
            minus = { type = "Periodic" }
            plus = { type = "Periodic" }

            [boundaries.y]
            minus = { type = "Pml", num_layers = 8 }
            plus = { type = "Pec" }

            [boundaries.z]
            minus = { type = "Pml" }
            plus = { type = "Pml" }

            [grid.z]
            type = "Uniform"
            dl = 0.02
            "#,
        )
        .unwrap();
        assert!(matches!(job.simulation.medium, Some(MaterialRef::Inline(_))));
        assert!(matches!(&job.structure[0].material, MaterialRef::Preset(n) if n == "SiO2"));
        assert!(job.boundaries.x.is_periodic());
        assert!(matches!(job.grid.z, yeegrid_core::grid_spec::AxisGridSpec::Uniform { dl } if dl == 0.02));
    }
}
