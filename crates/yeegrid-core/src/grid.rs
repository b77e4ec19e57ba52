//! Rectilinear Yee grids.
//!
//! An [`AxisGrid`] stores the primal cell boundaries along one axis and the
//! dual points (cell centres) derived from them. A [`Grid`] is three of them.
//! Grids are produced once by the mesh generator and never mutated.

use serde::{Deserialize, Serialize};
use yeegrid_geometry::Axis;
use yeegrid_materials::constants::C_0;

/// Cell boundaries and centres along one axis (µm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisGrid {
    pub primal: Vec<f64>,
    pub dual: Vec<f64>,
}

impl AxisGrid {
    /// Build from strictly increasing boundaries; the dual points are the
    /// cell midpoints.
    pub fn from_primal(primal: Vec<f64>) -> Self {
        let dual = primal.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        Self { primal, dual }
    }

    pub fn num_cells(&self) -> usize {
        self.primal.len().saturating_sub(1)
    }

    /// Primal cell sizes.
    pub fn steps(&self) -> Vec<f64> {
        self.primal.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Distances between neighbouring dual points, one per primal node.
    ///
    /// Interior nodes use the two adjacent centres. At the ends the missing
    /// neighbour is the periodic image on a periodic axis, otherwise the
    /// adjacent primal cell size is used.
    pub fn dual_steps(&self, periodic: bool) -> Vec<f64> {
        let n = self.num_cells();
        if n == 0 {
            return Vec::new();
        }
        let steps = self.steps();
        let mut out = Vec::with_capacity(n + 1);
        let ends = if periodic {
            let wrap = 0.5 * (steps[0] + steps[n - 1]);
            (wrap, wrap)
        } else {
            (steps[0], steps[n - 1])
        };
        out.push(ends.0);
        out.extend(self.dual.windows(2).map(|w| w[1] - w[0]));
        out.push(ends.1);
        out
    }

    pub fn min_step(&self) -> f64 {
        self.steps().into_iter().fold(f64::INFINITY, f64::min)
    }

    pub fn max_step(&self) -> f64 {
        self.steps().into_iter().fold(0.0, f64::max)
    }

    /// Number of cells whose centre lies in `[lo, hi]`.
    pub fn cells_within(&self, lo: f64, hi: f64) -> usize {
        let start = self.dual.partition_point(|&c| c < lo);
        let end = self.dual.partition_point(|&c| c <= hi);
        end.saturating_sub(start)
    }

    /// Largest ratio between neighbouring cell sizes, including the
    /// wrap-around pair when `periodic`.
    pub fn max_grading(&self, periodic: bool) -> f64 {
        let steps = self.steps();
        let ratio = |a: f64, b: f64| a.max(b) / a.min(b);
        let mut worst = steps
            .windows(2)
            .map(|w| ratio(w[0], w[1]))
            .fold(1.0, f64::max);
        if periodic && steps.len() > 1 {
            worst = worst.max(ratio(steps[0], steps[steps.len() - 1]));
        }
        worst
    }

    /// Structural invariants. On failure returns the offending field (relative
    /// to this axis) and a reason.
    pub(crate) fn check(&self) -> Result<(), (String, String)> {
        if self.primal.len() < 2 {
            return Err((
                "primal".into(),
                format!("needs at least 2 boundaries, found {}", self.primal.len()),
            ));
        }
        for (i, p) in self.primal.iter().enumerate() {
            if !p.is_finite() {
                return Err((format!("primal[{i}]"), format!("non-finite value {p}")));
            }
            if i > 0 && *p <= self.primal[i - 1] {
                return Err((
                    format!("primal[{i}]"),
                    format!("{p} does not exceed previous boundary {}", self.primal[i - 1]),
                ));
            }
        }
        if self.dual.len() != self.num_cells() {
            return Err((
                "dual".into(),
                format!("expected {} centres, found {}", self.num_cells(), self.dual.len()),
            ));
        }
        for (i, d) in self.dual.iter().enumerate() {
            let mid = 0.5 * (self.primal[i] + self.primal[i + 1]);
            if *d != mid {
                return Err((
                    format!("dual[{i}]"),
                    format!("{d} is not the midpoint {mid} of its cell"),
                ));
            }
        }
        Ok(())
    }
}

/// The three axis grids of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub x: AxisGrid,
    pub y: AxisGrid,
    pub z: AxisGrid,
}

impl Grid {
    pub fn axis(&self, axis: Axis) -> &AxisGrid {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn num_cells(&self) -> [usize; 3] {
        [self.x.num_cells(), self.y.num_cells(), self.z.num_cells()]
    }

    pub fn total_cells(&self) -> u64 {
        self.num_cells().iter().map(|&n| n as u64).product()
    }

    /// Smallest primal step along each axis.
    pub fn min_steps(&self) -> [f64; 3] {
        [self.x.min_step(), self.y.min_step(), self.z.min_step()]
    }

    /// Time step from the smallest step on any axis:
    /// `courant · min(Δx, Δy, Δz) / (C_0 √3)` seconds.
    pub fn time_step(&self, courant: f64) -> f64 {
        let dl = self.min_steps().into_iter().fold(f64::INFINITY, f64::min);
        courant * dl / (C_0 * 3f64.sqrt())
    }

    /// Largest stable time step for this grid (the CFL limit).
    pub fn cfl_limit(&self) -> f64 {
        let inv: f64 = self.min_steps().iter().map(|d| 1.0 / (d * d)).sum();
        1.0 / (C_0 * inv.sqrt())
    }

    /// Structural invariants of all three axes; the error carries the field
    /// path, e.g. `y.dual[3]`.
    pub fn check_invariants(&self) -> Result<(), (String, String)> {
        for axis in Axis::ALL {
            self.axis(axis)
                .check()
                .map_err(|(field, reason)| (format!("{axis}.{field}"), reason))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn axis(points: &[f64]) -> AxisGrid {
        AxisGrid::from_primal(points.to_vec())
    }

    #[test]
    fn test_dual_steps_one_sided_and_periodic() {
        let g = axis(&[0.0, 1.0, 3.0, 4.0]);
        assert_eq!(g.dual, vec![0.5, 2.0, 3.5]);
        assert_eq!(g.dual_steps(false), vec![1.0, 1.5, 1.5, 1.0]);
        assert_eq!(g.dual_steps(true), vec![1.0, 1.5, 1.5, 1.0]);

        let g = axis(&[0.0, 1.0, 2.0, 4.0]);
        assert_eq!(g.dual_steps(false), vec![1.0, 1.0, 1.5, 2.0]);
        assert_eq!(g.dual_steps(true), vec![1.5, 1.0, 1.5, 1.5]);
    }

    #[test]
    fn test_cells_within_counts_centres() {
        let g = axis(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(g.cells_within(0.5, 2.5), 3);
        assert_eq!(g.cells_within(0.6, 2.4), 1);
        assert_eq!(g.cells_within(10.0, 20.0), 0);
    }

    #[test]
    fn test_time_step_below_cfl_limit_for_unit_courant() {
        let grid = Grid {
            x: axis(&[0.0, 0.1, 0.2]),
            y: axis(&[0.0, 0.05, 0.1]),
            z: axis(&[0.0, 0.2]),
        };
        assert_eq!(grid.total_cells(), 4);
        assert!(grid.time_step(1.0) <= grid.cfl_limit());
        assert_relative_eq!(grid.time_step(1.0), 0.05 / (C_0 * 3f64.sqrt()), max_relative = 1e-14);
    }

    #[test]
    fn test_invariant_path_names_offending_entry() {
        let mut grid = Grid {
            x: axis(&[0.0, 1.0]),
            y: axis(&[0.0, 1.0, 2.0]),
            z: axis(&[0.0, 1.0]),
        };
        assert!(grid.check_invariants().is_ok());
        grid.y.dual[1] = 7.0;
        let (path, _) = grid.check_invariants().unwrap_err();
        assert_eq!(path, "y.dual[1]");
        grid.y.primal[2] = 0.5;
        let (path, _) = grid.check_invariants().unwrap_err();
        assert_eq!(path, "y.primal[2]");
    }
}
