//! Job runner: builds the simulation from a job file, prepares it and
//! reports the outcome.

use std::path::Path;

use anyhow::{Context, Result};

use yeegrid_core::structure::Structure;
use yeegrid_core::validate::Diagnostics;
use yeegrid_core::{generate_and_validate_with, PrepareError, Simulation, ValidatedSimulation};
use yeegrid_geometry::Axis;
use yeegrid_materials::{library, Material};

use crate::config::{JobConfig, MaterialRef};

/// Resolve a preset name or pass an inline model through.
fn resolve_material(material: &MaterialRef) -> Result<Material> {
    match material {
        MaterialRef::Preset(name) => library::lookup(name).with_context(|| {
            let known: Vec<&str> = library::PRESETS.iter().map(|(n, _)| *n).collect();
            format!("Valid presets: {}", known.join(", "))
        }),
        MaterialRef::Inline(m) => Ok(m.clone()),
    }
}

/// Assemble the simulation described by a job.
pub fn build_simulation(job: &JobConfig) -> Result<Simulation> {
    let sim = &job.simulation;
    let mut builder = Simulation::builder(sim.center, sim.size, sim.run_time)
        .courant(sim.courant)
        .symmetry(sim.symmetry)
        .boundaries(job.boundaries.clone())
        .grid_spec(job.grid.clone());

    if let Some(medium) = &sim.medium {
        builder = builder.medium(resolve_material(medium).context("Background medium")?);
    }
    for (i, s) in job.structure.iter().enumerate() {
        let material = resolve_material(&s.material)
            .with_context(|| format!("Structure {}", s.name.as_deref().unwrap_or(&i.to_string())))?;
        let mut structure = Structure::new(s.geometry.clone(), material);
        structure.name = s.name.clone();
        builder = builder.structure(structure);
    }
    for source in &job.source {
        builder = builder.source(source.clone());
    }
    for monitor in &job.monitor {
        builder = builder.monitor(monitor.clone());
    }
    Ok(builder.build()?)
}

/// Generate and validate. Rejections are printed in full before failing.
pub fn prepare(job: &JobConfig) -> Result<ValidatedSimulation> {
    let simulation = build_simulation(job)?;
    println!(
        "  {} structure(s), {} source(s), {} monitor(s)",
        simulation.structures().len(),
        simulation.sources().len(),
        simulation.monitors().len()
    );
    let config = job.limits.prepare_config();
    log::debug!("Preparing with {:?}", config);
    match generate_and_validate_with(simulation, &config) {
        Ok(validated) => Ok(validated),
        Err(PrepareError::Rejected(diagnostics)) => {
            print_diagnostics(&diagnostics);
            anyhow::bail!(
                "Simulation rejected with {} error(s)",
                diagnostics.errors().count()
            )
        }
        Err(e) => Err(e.into()),
    }
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for d in diagnostics {
        println!("  {d}");
    }
}

/// Print grid and time-stepping figures for a prepared simulation.
pub fn print_summary(validated: &ValidatedSimulation) {
    let grid = validated.grid();
    println!("Grid:");
    for axis in Axis::ALL {
        let g = grid.axis(axis);
        let periodic = validated.simulation().boundaries().axis(axis).is_periodic();
        println!(
            "  {axis}: {:>6} cells, step {:.4}..{:.4} µm, max ratio {:.3}",
            g.num_cells(),
            g.min_step(),
            g.max_step(),
            g.max_grading(periodic)
        );
    }
    println!("  total: {} cells", grid.total_cells());
    println!(
        "Time step: {:.4e} s ({} steps, CFL limit {:.4e} s)",
        validated.time_step(),
        validated.num_time_steps(),
        grid.cfl_limit()
    );
    if validated.warnings().is_empty() {
        println!("No warnings.");
    } else {
        println!("Warnings:");
        print_diagnostics(validated.warnings());
    }
}

/// Encode and write a prepared simulation.
pub fn write_output(validated: &ValidatedSimulation, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = yeegrid_core::encode(validated)?;
    std::fs::write(path, bytes)?;
    println!("Simulation written to: {}", path.display());
    Ok(())
}

/// Read back an encoded simulation.
pub fn read_encoded(path: &Path) -> Result<ValidatedSimulation> {
    let bytes = std::fs::read(path).with_context(|| format!("Reading {}", path.display()))?;
    let validated = yeegrid_core::decode(&bytes)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(text: &str) -> JobConfig {
        toml::from_str(text).unwrap()
    }

    const SCENARIO: &str = r#"
        [simulation]
        size = [10.0, 10.0, 10.0]
        run_time = 1e-13

        [[structure]]
        name = "box"
        material = { type = "Medium", permittivity = 4.0 }
        geometry = { type = "Box", center = [0.0, 0.0, 0.0], size = [2.0, 2.0, 2.0] }

        [[source]]
        center = [0.0, 0.0, 0.0]
        size = [0.0, 0.0, 0.0]
        time = { freq0 = 2.99792458e14, fwidth = 2.99792458e13 }
        kind = { type = "PointDipole", polarization = "Ez" }

        [[monitor]]
        name = "flux"
        center = [0.0, 0.0, 3.0]
        size = [8.0, 8.0, 0.0]
        kind = { type = "Flux", freqs = [2.99792458e14] }
    "#;

    #[test]
    fn test_scenario_job_prepares_and_round_trips() {
        let validated = prepare(&job(SCENARIO)).unwrap();
        assert_eq!(validated.simulation().structures().len(), 1);

        let dir = std::env::temp_dir().join(format!("yeegrid-cli-{}", std::process::id()));
        let path = dir.join("sim.json");
        write_output(&validated, &path).unwrap();
        let back = read_encoded(&path).unwrap();
        assert_eq!(back, validated);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_preset_is_reported() {
        let text = SCENARIO.replace(
            r#"material = { type = "Medium", permittivity = 4.0 }"#,
            r#"material = "unobtainium""#,
        );
        let err = build_simulation(&job(&text)).unwrap_err();
        assert!(format!("{err:#}").contains("unobtainium"));
    }

    #[test]
    fn test_rejection_fails_the_job() {
        let text = SCENARIO.replace("run_time = 1e-13", "run_time = 1e-13\ncourant = 1.5");
        assert!(prepare(&job(&text)).is_err());
    }
}
