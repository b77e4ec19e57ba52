//! The generate-then-validate entry point.

use serde::Serialize;
use thiserror::Error;

use crate::grid::Grid;
use crate::mesh::{generate_grid, GridError, MeshSettings};
use crate::simulation::Simulation;
use crate::validate::{validate, Diagnostics, ValidationSettings};

/// Settings for both stages of [`generate_and_validate_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareConfig {
    pub mesh: MeshSettings,
    pub validation: ValidationSettings,
}

/// Why a simulation could not be prepared.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// Grid generation failed; validation did not run.
    #[error("Grid generation failed: {0}")]
    Generation(#[from] GridError),

    /// Validation found at least one error. Carries every finding, warnings
    /// included, in check order.
    #[error("Simulation rejected with {} error(s):\n{0}", .0.errors().count())]
    Rejected(Diagnostics),
}

/// A simulation with its grid that passed validation. This is the only
/// input accepted by [`encode`](crate::serialize::encode), and it can only be
/// obtained from [`generate_and_validate_with`] or
/// [`decode`](crate::serialize::decode), both of which run the validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedSimulation {
    simulation: Simulation,
    grid: Grid,
    warnings: Diagnostics,
}

impl ValidatedSimulation {
    /// `warnings` must be the full output of a validation run with no errors.
    pub(crate) fn from_parts(simulation: Simulation, grid: Grid, warnings: Diagnostics) -> Self {
        Self {
            simulation,
            grid,
            warnings,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Non-blocking findings from validation.
    pub fn warnings(&self) -> &Diagnostics {
        &self.warnings
    }

    /// Time step (s) implied by the grid and the Courant factor.
    pub fn time_step(&self) -> f64 {
        self.grid.time_step(self.simulation.courant())
    }

    /// Time steps needed to cover the run time.
    pub fn num_time_steps(&self) -> u64 {
        (self.simulation.run_time() / self.time_step()).ceil() as u64
    }

    pub fn into_parts(self) -> (Simulation, Grid, Diagnostics) {
        (self.simulation, self.grid, self.warnings)
    }
}

/// [`generate_and_validate_with`] using default settings.
pub fn generate_and_validate(simulation: Simulation) -> Result<ValidatedSimulation, PrepareError> {
    generate_and_validate_with(simulation, &PrepareConfig::default())
}

/// Generate the grid for `simulation`, then validate both.
///
/// Generation failures abort immediately. Validation always runs every
/// check; if any error is found, the complete diagnostic set is returned
/// untouched in [`PrepareError::Rejected`].
pub fn generate_and_validate_with(
    simulation: Simulation,
    config: &PrepareConfig,
) -> Result<ValidatedSimulation, PrepareError> {
    let grid = generate_grid(&simulation, &config.mesh)?;
    let diagnostics = validate(&simulation, &grid, &config.validation);

    for warning in diagnostics.warnings() {
        log::warn!("{warning}");
    }
    if diagnostics.has_errors() {
        log::info!(
            "Simulation rejected: {} error(s), {} warning(s)",
            diagnostics.errors().count(),
            diagnostics.warnings().count()
        );
        return Err(PrepareError::Rejected(diagnostics));
    }

    let [nx, ny, nz] = grid.num_cells();
    log::info!(
        "Simulation accepted: {nx} × {ny} × {nz} cells, {} warning(s)",
        diagnostics.len()
    );
    Ok(ValidatedSimulation::from_parts(
        simulation,
        grid,
        diagnostics.into_warnings(),
    ))
}
