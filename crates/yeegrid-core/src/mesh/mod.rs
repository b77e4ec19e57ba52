//! Automatic grid generation.
//!
//! [`generate_grid`] turns a [`Simulation`] into a [`Grid`]. Each axis is
//! meshed independently according to its [`AxisGridSpec`]:
//!
//! - **Uniform**: equal cells no larger than the requested step.
//! - **Custom**: the given coordinates, with end points pinned to the domain.
//! - **Auto**: wavelength-adapted steps per material, snapped to structure
//!   faces and graded so neighbouring cells differ by at most `max_scale`
//!   (see [`auto`]).
//!
//! PML layers are then appended outside the domain on absorbing sides. The
//! number of cells is always known before any coordinate is placed, so an
//! over-fine request fails fast with [`GridError::GridTooFine`].

mod auto;
mod size_field;

use thiserror::Error;
use yeegrid_geometry::{Axis, GeometryError};

use crate::boundary::{Boundary, BoundaryKind};
use crate::grid::{AxisGrid, Grid};
use crate::grid_spec::AxisGridSpec;
use crate::simulation::Simulation;

/// Errors that abort grid generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("Grid too fine along {axis}: {cells} cells exceeds the limit of {limit}")]
    GridTooFine { axis: Axis, cells: u64, limit: usize },

    #[error("Degenerate geometry in structure[{index}]: {source}")]
    DegenerateGeometry { index: usize, source: GeometryError },

    #[error("Cannot mesh {axis} automatically: no source frequency and no wavelength given")]
    MissingWavelength { axis: Axis },

    #[error("Invalid grid specification along {axis}: {reason}")]
    InvalidGridSpec { axis: Axis, reason: String },

    #[error("Could not grade {axis} within a cell ratio of {max_scale} after {passes} passes")]
    GradingUnsatisfiable {
        axis: Axis,
        max_scale: f64,
        passes: usize,
    },
}

/// Limits and tolerances of the mesh generator.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSettings {
    /// Largest number of cells along any axis, PML included.
    pub max_cells_per_axis: usize,
    /// Snap points closer than this fraction of the domain length are merged.
    pub snap_tolerance: f64,
    /// Regeneration attempts allowed to satisfy the grading bound.
    pub max_grading_passes: usize,
    /// Frequencies sampled per material when looking for its largest index.
    pub index_samples: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            max_cells_per_axis: 100_000,
            snap_tolerance: 1.0e-6,
            max_grading_passes: 64,
            index_samples: 33,
        }
    }
}

/// Generate the grid for `sim`.
///
/// With the `parallel` feature the three axes are meshed concurrently; the
/// first failing axis in x, y, z order is reported either way.
pub fn generate_grid(sim: &Simulation, settings: &MeshSettings) -> Result<Grid, GridError> {
    for (index, s) in sim.structures().iter() {
        s.geometry
            .validate()
            .map_err(|source| GridError::DegenerateGeometry { index, source })?;
    }

    #[cfg(feature = "parallel")]
    let (x, (y, z)) = rayon::join(
        || mesh_axis(sim, Axis::X, settings),
        || {
            rayon::join(
                || mesh_axis(sim, Axis::Y, settings),
                || mesh_axis(sim, Axis::Z, settings),
            )
        },
    );
    #[cfg(not(feature = "parallel"))]
    let (x, (y, z)) = (
        mesh_axis(sim, Axis::X, settings),
        (
            mesh_axis(sim, Axis::Y, settings),
            mesh_axis(sim, Axis::Z, settings),
        ),
    );

    Ok(Grid {
        x: x?,
        y: y?,
        z: z?,
    })
}

/// Mesh one axis, PML included.
pub fn mesh_axis(sim: &Simulation, axis: Axis, settings: &MeshSettings) -> Result<AxisGrid, GridError> {
    let (lo, hi) = sim.bounds().span(axis);
    let boundary = sim.boundaries().axis(axis);
    let pml_cells = pml_layers(boundary);

    let (interior, growth_cap) = match sim.grid_spec().axis(axis) {
        AxisGridSpec::Uniform { dl } => (uniform(axis, lo, hi, *dl, pml_cells, settings)?, None),
        AxisGridSpec::Custom { coords } => (custom(axis, lo, hi, coords, pml_cells, settings)?, None),
        AxisGridSpec::Auto {
            min_steps_per_wavelength,
            max_scale,
            wavelength,
        } => {
            let params =
                auto::AutoAxis::new(sim, axis, *min_steps_per_wavelength, *max_scale, *wavelength)?;
            (auto::generate(sim, &params, pml_cells, settings)?, Some(*max_scale))
        }
    };

    let primal = add_pml(axis, interior, boundary, growth_cap)?;
    let grid = AxisGrid::from_primal(primal);
    log::debug!(
        "{axis}: {} cells ({} PML), step {:.4e}..{:.4e} µm",
        grid.num_cells(),
        pml_cells,
        grid.min_step(),
        grid.max_step()
    );
    Ok(grid)
}

pub(crate) fn check_cell_budget(axis: Axis, cells: f64, settings: &MeshSettings) -> Result<(), GridError> {
    if cells > settings.max_cells_per_axis as f64 {
        return Err(GridError::GridTooFine {
            axis,
            cells: cells as u64,
            limit: settings.max_cells_per_axis,
        });
    }
    Ok(())
}

fn pml_layers(boundary: &Boundary) -> usize {
    [&boundary.minus, &boundary.plus]
        .into_iter()
        .map(|side| match side {
            BoundaryKind::Pml(p) => p.num_layers,
            _ => 0,
        })
        .sum()
}

fn uniform(
    axis: Axis,
    lo: f64,
    hi: f64,
    dl: f64,
    pml_cells: usize,
    settings: &MeshSettings,
) -> Result<Vec<f64>, GridError> {
    if !(dl.is_finite() && dl > 0.0) {
        return Err(GridError::InvalidGridSpec {
            axis,
            reason: format!("dl must be positive, got {dl}"),
        });
    }
    let length = hi - lo;
    let n = (length / dl - 1.0e-9).ceil().max(1.0);
    check_cell_budget(axis, n + pml_cells as f64, settings)?;
    let n = n as usize;
    let mut points: Vec<f64> = (0..n).map(|i| lo + length * i as f64 / n as f64).collect();
    points.push(hi);
    Ok(points)
}

fn custom(
    axis: Axis,
    lo: f64,
    hi: f64,
    coords: &[f64],
    pml_cells: usize,
    settings: &MeshSettings,
) -> Result<Vec<f64>, GridError> {
    let invalid = |reason: String| GridError::InvalidGridSpec { axis, reason };
    let (Some(&first), Some(&last)) = (coords.first(), coords.last()) else {
        return Err(invalid("custom coordinates are empty".into()));
    };
    if coords.len() < 2 {
        return Err(invalid("at least two custom coordinates are required".into()));
    }
    check_cell_budget(axis, (coords.len() - 1 + pml_cells) as f64, settings)?;
    if coords.iter().any(|c| !c.is_finite()) || coords.windows(2).any(|w| w[1] <= w[0]) {
        return Err(invalid("custom coordinates must be finite and strictly increasing".into()));
    }
    let tol = settings.snap_tolerance * (hi - lo);
    if (first - lo).abs() > tol || (last - hi).abs() > tol {
        return Err(invalid(format!(
            "custom coordinates span [{first}, {last}] but the domain is [{lo}, {hi}]"
        )));
    }
    let mut points = coords.to_vec();
    let n = points.len();
    points[0] = lo;
    points[n - 1] = hi;
    if points.windows(2).any(|w| w[1] <= w[0]) {
        return Err(invalid("custom cells collapse when pinned to the domain bounds".into()));
    }
    Ok(points)
}

fn add_pml(
    axis: Axis,
    interior: Vec<f64>,
    boundary: &Boundary,
    growth_cap: Option<f64>,
) -> Result<Vec<f64>, GridError> {
    let (minus, plus) = boundary.pml_params();
    let growth = |g: f64| {
        if !(g.is_finite() && g >= 1.0) {
            return Err(GridError::InvalidGridSpec {
                axis,
                reason: format!("PML cell_growth must be at least 1, got {g}"),
            });
        }
        Ok(growth_cap.map_or(g, |cap| g.min(cap)))
    };

    let n = interior.len();
    let mut points = Vec::with_capacity(
        n + minus.map_or(0, |p| p.num_layers) + plus.map_or(0, |p| p.num_layers),
    );
    if let Some(p) = minus {
        let g = growth(p.cell_growth)?;
        let edge = interior[1] - interior[0];
        let mut x = interior[0];
        let mut layers: Vec<f64> = (0..p.num_layers)
            .map(|k| {
                x -= edge * g.powi(k as i32);
                x
            })
            .collect();
        layers.reverse();
        points.extend(layers);
    }
    points.extend_from_slice(&interior);
    if let Some(p) = plus {
        let g = growth(p.cell_growth)?;
        let edge = interior[n - 1] - interior[n - 2];
        let mut x = interior[n - 1];
        points.extend((0..p.num_layers).map(|k| {
            x += edge * g.powi(k as i32);
            x
        }));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{BoundarySpec, PmlParams};
    use crate::grid_spec::GridSpec;
    use approx::assert_relative_eq;

    fn sim(spec: GridSpec, boundaries: BoundarySpec) -> Simulation {
        Simulation::builder([0.0; 3], [2.0, 2.0, 2.0], 1e-13)
            .grid_spec(spec)
            .boundaries(boundaries)
            .build()
            .unwrap()
    }

    #[test]
    fn test_uniform_axis_rounds_up() {
        let s = sim(GridSpec::uniform(0.3), BoundarySpec::all_sides(BoundaryKind::Pec));
        let g = mesh_axis(&s, Axis::X, &MeshSettings::default()).unwrap();
        assert_eq!(g.num_cells(), 7);
        assert_eq!(g.primal[0], -1.0);
        assert_eq!(g.primal[7], 1.0);
        for step in g.steps() {
            assert_relative_eq!(step, 2.0 / 7.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_pml_layers_grow_outward() {
        let pml = BoundaryKind::Pml(PmlParams {
            num_layers: 4,
            cell_growth: 2.0,
            ..Default::default()
        });
        let s = sim(GridSpec::uniform(0.5), BoundarySpec::all_sides(pml));
        let g = mesh_axis(&s, Axis::Y, &MeshSettings::default()).unwrap();
        assert_eq!(g.num_cells(), 4 + 4 + 4);
        let steps = g.steps();
        assert_eq!(&steps[..4], &[4.0, 2.0, 1.0, 0.5]);
        assert_eq!(&steps[8..], &[0.5, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_custom_coords_must_reach_domain() {
        let spec = GridSpec {
            x: AxisGridSpec::Custom {
                coords: vec![-1.0, 0.0, 0.5],
            },
            ..GridSpec::uniform(0.5)
        };
        let s = sim(spec, BoundarySpec::all_sides(BoundaryKind::Pec));
        let err = mesh_axis(&s, Axis::X, &MeshSettings::default()).unwrap_err();
        assert!(matches!(err, GridError::InvalidGridSpec { axis: Axis::X, .. }));
    }

    #[test]
    fn test_too_fine_fails_before_placement() {
        let s = sim(GridSpec::uniform(1e-9), BoundarySpec::default());
        let err = generate_grid(&s, &MeshSettings::default()).unwrap_err();
        match err {
            GridError::GridTooFine { axis, cells, limit } => {
                assert_eq!(axis, Axis::X);
                assert!(cells > 1_000_000_000);
                assert_eq!(limit, 100_000);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_auto_without_sources_needs_wavelength() {
        let s = sim(GridSpec::default(), BoundarySpec::default());
        let err = generate_grid(&s, &MeshSettings::default()).unwrap_err();
        assert_eq!(err, GridError::MissingWavelength { axis: Axis::X });
    }
}
