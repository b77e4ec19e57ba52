//! Wavelength-adapted, graded meshing of one axis.
//!
//! The axis is cut at snap points (domain bounds and every structure face
//! inside the domain). Each interval between snap points gets a target step
//! from the material that owns it; the sizes at the snap points are shared
//! between neighbouring intervals and smoothed so that no interval has to
//! grade faster than `σ = ln(max_scale) / 2` per cell. Snap points whose
//! neighbouring cells still exceed `max_scale` get a smaller edge size and
//! the axis is generated again.

use yeegrid_geometry::Axis;
use yeegrid_materials::constants::C_0;
use yeegrid_materials::{FrequencyRange, Material, PermittivityModel};

use super::size_field::{cells_for, SizeField};
use super::{check_cell_budget, GridError, MeshSettings};
use crate::simulation::Simulation;

/// Parameters of an automatic axis, already checked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AutoAxis {
    pub axis: Axis,
    pub wavelength: f64,
    pub min_steps: f64,
    pub max_scale: f64,
}

impl AutoAxis {
    pub(crate) fn new(
        sim: &Simulation,
        axis: Axis,
        min_steps: f64,
        max_scale: f64,
        wavelength: Option<f64>,
    ) -> Result<Self, GridError> {
        let invalid = |reason: String| GridError::InvalidGridSpec { axis, reason };
        if !(min_steps.is_finite() && min_steps > 0.0) {
            return Err(invalid(format!(
                "min_steps_per_wavelength must be positive, got {min_steps}"
            )));
        }
        if !(max_scale.is_finite() && max_scale > 1.0) {
            return Err(invalid(format!("max_scale must exceed 1, got {max_scale}")));
        }
        let wavelength = match wavelength {
            Some(w) if w.is_finite() && w > 0.0 => w,
            Some(w) => return Err(invalid(format!("wavelength must be positive, got {w}"))),
            None => sim
                .meshing_frequency()
                .map(|f| C_0 / f)
                .ok_or(GridError::MissingWavelength { axis })?,
        };
        Ok(Self {
            axis,
            wavelength,
            min_steps,
            max_scale,
        })
    }
}

/// Snap points and the target step of every interval between them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Profile {
    pub snaps: Vec<f64>,
    pub targets: Vec<f64>,
}

impl Profile {
    pub(crate) fn build(sim: &Simulation, params: &AutoAxis, settings: &MeshSettings) -> Self {
        let domain = sim.bounds();
        let (lo, hi) = domain.span(params.axis);
        let tol = settings.snap_tolerance.max(1.0e-12) * (hi - lo);

        let f0 = C_0 / params.wavelength;
        let band = sim.frequency_range().unwrap_or(FrequencyRange { min: f0, max: f0 });
        let step_for = |m: &Material| {
            let n = m.max_refractive_index(&band, settings.index_samples).max(1.0);
            params.wavelength / (params.min_steps * n)
        };

        let mut faces = Vec::new();
        // (lo, hi, step) in priority order.
        let mut segments = Vec::new();
        for (_, s) in sim.structures().iter() {
            let Some(clipped) = domain.intersection(&s.geometry.bounding_box()) else {
                continue;
            };
            let (a, b) = clipped.span(params.axis);
            faces.push(a);
            faces.push(b);
            if b > a {
                segments.push((a, b, step_for(&s.material)));
            }
        }
        let snaps = merge_snaps(lo, hi, faces, tol);

        let background = step_for(sim.medium());
        let targets = snaps
            .windows(2)
            .map(|w| {
                let mid = 0.5 * (w[0] + w[1]);
                segments
                    .iter()
                    .rev()
                    .find(|(a, b, _)| *a <= mid && mid <= *b)
                    .map_or(background, |(_, _, step)| *step)
            })
            .collect();
        Self { snaps, targets }
    }
}

/// Domain bounds plus the faces strictly inside them, merging faces closer
/// than `tol`. Faces within `tol` of a domain bound collapse onto the bound.
fn merge_snaps(lo: f64, hi: f64, mut faces: Vec<f64>, tol: f64) -> Vec<f64> {
    faces.retain(|&p| p > lo + tol && p < hi - tol);
    faces.sort_by(f64::total_cmp);
    let mut snaps = Vec::with_capacity(faces.len() + 2);
    snaps.push(lo);
    for p in faces {
        if snaps.last().is_some_and(|&last| p - last > tol) {
            snaps.push(p);
        }
    }
    snaps.push(hi);
    snaps
}

/// Largest `σ`-Lipschitz minorant of the edge sizes, as a function of the
/// snap position. On periodic axes the first and last edge are the same
/// physical point and are kept equal.
fn smooth(edges: &mut [f64], lens: &[f64], sigma: f64, periodic: bool) {
    let last = edges.len() - 1;
    for _ in 0..4 {
        for j in 1..=last {
            edges[j] = edges[j].min(edges[j - 1] + sigma * lens[j - 1]);
        }
        for j in (0..last).rev() {
            edges[j] = edges[j].min(edges[j + 1] + sigma * lens[j]);
        }
        if !periodic || edges[0] == edges[last] {
            return;
        }
        let m = edges[0].min(edges[last]);
        edges[0] = m;
        edges[last] = m;
    }
}

/// A snap point whose two neighbouring cells differ by more than allowed.
struct Violation {
    edge: usize,
    left: f64,
    right: f64,
}

fn violations(points: &[f64], snap_at: &[usize], periodic: bool, limit: f64) -> Vec<Violation> {
    let too_steep = |a: f64, b: f64| a.max(b) / a.min(b) > limit;
    let mut out = Vec::new();
    for (edge, &i) in snap_at.iter().enumerate().skip(1).take(snap_at.len() - 2) {
        let left = points[i] - points[i - 1];
        let right = points[i + 1] - points[i];
        if too_steep(left, right) {
            out.push(Violation { edge, left, right });
        }
    }
    let n = points.len();
    if periodic && n > 2 {
        let left = points[n - 1] - points[n - 2];
        let right = points[1] - points[0];
        if too_steep(left, right) {
            out.push(Violation { edge: 0, left, right });
            out.push(Violation {
                edge: snap_at.len() - 1,
                left,
                right,
            });
        }
    }
    out
}

/// Primal boundaries spanning the domain along `params.axis`.
pub(crate) fn generate(
    sim: &Simulation,
    params: &AutoAxis,
    pml_cells: usize,
    settings: &MeshSettings,
) -> Result<Vec<f64>, GridError> {
    let axis = params.axis;
    let periodic = sim.boundaries().axis(axis).is_periodic();
    let Profile { snaps, targets } = Profile::build(sim, params, settings);

    let lens: Vec<f64> = snaps.windows(2).map(|w| w[1] - w[0]).collect();
    let mut edges = vec![f64::INFINITY; snaps.len()];
    for (k, (target, len)) in targets.iter().zip(&lens).enumerate() {
        let cap = target.min(*len);
        edges[k] = edges[k].min(cap);
        edges[k + 1] = edges[k + 1].min(cap);
    }

    let sigma = 0.5 * params.max_scale.ln();
    let limit = params.max_scale * (1.0 + 1.0e-9);
    let shrink = params.max_scale.sqrt();
    let passes = settings.max_grading_passes.max(1);

    for pass in 0..passes {
        smooth(&mut edges, &lens, sigma, periodic);
        let fields: Vec<SizeField> = (0..targets.len())
            .map(|k| SizeField::new(snaps[k], snaps[k + 1], targets[k], edges[k], edges[k + 1], sigma))
            .collect();

        let counts: Vec<f64> = fields.iter().map(|f| cells_for(f.count())).collect();
        check_cell_budget(axis, counts.iter().sum::<f64>() + pml_cells as f64, settings)?;

        let mut points = Vec::with_capacity(counts.iter().sum::<f64>() as usize + 1);
        let mut snap_at = Vec::with_capacity(snaps.len());
        points.push(snaps[0]);
        snap_at.push(0);
        for (k, field) in fields.iter().enumerate() {
            points.extend(field.interior_points(counts[k] as usize));
            points.push(snaps[k + 1]);
            snap_at.push(points.len() - 1);
        }

        let bad = violations(&points, &snap_at, periodic, limit);
        if bad.is_empty() {
            if pass > 0 {
                log::debug!("{axis}: grading settled after {} extra passes", pass);
            }
            return Ok(points);
        }
        for v in bad {
            edges[v.edge] = (edges[v.edge] / shrink).min(v.left).min(v.right);
        }
    }
    Err(GridError::GradingUnsatisfiable {
        axis,
        max_scale: params.max_scale,
        passes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_merge_collapses_faces_onto_domain_bounds() {
        let snaps = merge_snaps(-5.0, 5.0, vec![1.0, -5.0, -1.0, 5.0 - 1e-9, 1.0 + 1e-9], 1e-5);
        assert_eq!(snaps, vec![-5.0, -1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_smoothing_limits_edge_growth() {
        let mut edges = [0.01, 1.0, 1.0];
        smooth(&mut edges, &[1.0, 1.0], 0.1, false);
        for (got, want) in edges.iter().zip([0.01, 0.11, 0.21]) {
            assert_relative_eq!(*got, want, max_relative = 1e-12);
        }

        let mut edges = [0.5, 1.0, 1.0, 0.01];
        smooth(&mut edges, &[1.0, 1.0, 1.0], 0.1, true);
        assert_eq!(edges[0], edges[3]);
        assert_eq!(edges[0], 0.01);
    }
}
