//! Integration tests for automatic grid generation.
//!
//! Covers the reference scenario (a high-index box in vacuum), structural
//! properties that must hold on every axis (monotonic primal points, dual
//! midpoints, snapped structure faces, bounded grading), priority override
//! in meshing, and the failure modes of the generator.

use approx::assert_relative_eq;
use yeegrid_core::boundary::{Boundary, BoundaryKind, BoundarySpec, PmlParams};
use yeegrid_core::grid::AxisGrid;
use yeegrid_core::grid_spec::{AxisGridSpec, GridSpec};
use yeegrid_core::mesh::{generate_grid, GridError, MeshSettings};
use yeegrid_core::monitor::Monitor;
use yeegrid_core::source::{GaussianPulse, Source};
use yeegrid_core::structure::Structure;
use yeegrid_core::types::Polarization;
use yeegrid_core::{generate_and_validate, Simulation};
use yeegrid_geometry::primitives::Cuboid;
use yeegrid_geometry::{Axis, Geometry};
use yeegrid_materials::constants::C_0;
use yeegrid_materials::{library, Material};

// ─────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────

/// Pulse centred on the free-space wavelength `wavelength_um`.
fn pulse(wavelength_um: f64) -> GaussianPulse {
    let f0 = C_0 / wavelength_um;
    GaussianPulse::new(f0, 0.1 * f0)
}

/// 10 µm vacuum domain holding a 2 µm box of index 2, PML on every side,
/// 10 cells per wavelength at 1 µm.
fn box_scenario() -> Simulation {
    Simulation::builder([0.0; 3], [10.0, 10.0, 10.0], 1e-13)
        .structure(Structure::new(
            Geometry::cuboid([0.0; 3], [2.0, 2.0, 2.0]).unwrap(),
            Material::from_index(2.0).unwrap(),
        ))
        .source(Source::point_dipole([0.0; 3], pulse(1.0), Polarization::Ez))
        .monitor(Monitor::flux("transmission", [0.0, 0.0, 3.0], [8.0, 8.0, 0.0], vec![C_0]))
        .boundaries(BoundarySpec::all_sides(BoundaryKind::Pml(PmlParams::with_layers(12))))
        .grid_spec(GridSpec::auto(10.0))
        .build()
        .unwrap()
}

fn assert_well_formed(g: &AxisGrid) {
    assert!(g.primal.windows(2).all(|w| w[1] > w[0]), "primal not increasing");
    assert_eq!(g.dual.len(), g.num_cells());
    for (i, d) in g.dual.iter().enumerate() {
        assert_eq!(*d, 0.5 * (g.primal[i] + g.primal[i + 1]));
    }
}

fn faces(bb_lo: f64, bb_hi: f64, lo: f64, hi: f64) -> Vec<f64> {
    [bb_lo, bb_hi]
        .into_iter()
        .filter(|&f| f > lo && f < hi)
        .collect()
}

// ─────────────────────────────────────────────────────────────
// Reference scenario
// ─────────────────────────────────────────────────────────────

#[test]
fn test_box_scenario_steps_and_snapping() {
    let validated = generate_and_validate(box_scenario()).unwrap();
    assert!(!validated.warnings().has_errors());
    let grid = validated.grid();

    for axis in Axis::ALL {
        let g = grid.axis(axis);
        assert_well_formed(g);
        assert!(g.primal.contains(&-1.0), "{axis}: -1 not on the grid");
        assert!(g.primal.contains(&1.0), "{axis}: +1 not on the grid");
        assert!(g.primal.contains(&-5.0) && g.primal.contains(&5.0));

        for (c, s) in g.dual.iter().zip(g.steps()) {
            if c.abs() < 1.0 {
                assert_relative_eq!(s, 0.05, max_relative = 1e-9);
            } else if c.abs() > 1.6 && c.abs() < 4.9 {
                assert_relative_eq!(s, 0.1, max_relative = 0.03);
            }
        }
        assert!(g.max_grading(false) <= 1.4 * (1.0 + 1e-9));
    }
}

#[test]
fn test_pml_layers_extend_beyond_domain() {
    let grid = generate_grid(&box_scenario(), &MeshSettings::default()).unwrap();
    for axis in Axis::ALL {
        let g = grid.axis(axis);
        let inside = g.cells_within(-5.0, 5.0);
        assert_eq!(g.num_cells(), inside + 24);
        assert!(g.primal[0] < -5.0 && g.primal[g.num_cells()] > 5.0);
    }
}

// ─────────────────────────────────────────────────────────────
// Properties on a mixed layout
// ─────────────────────────────────────────────────────────────

fn mixed_layout() -> Simulation {
    let boundaries = BoundarySpec {
        x: Boundary::periodic(),
        y: Boundary::pml(),
        z: Boundary::pec(),
    };
    Simulation::builder([0.0; 3], [6.0, 6.0, 6.0], 1e-13)
        .structure(Structure::new(
            Geometry::cuboid([-1.2, 0.0, 0.0], [0.7, 1.0, 1.0]).unwrap(),
            library::silica(),
        ))
        .structure(Structure::new(
            Geometry::cuboid([0.3, 0.4, -0.2], [0.03, 2.0, 2.0]).unwrap(),
            library::silicon(),
        ))
        .structure(Structure::new(
            Geometry::sphere([1.5, 0.5, 0.0], 0.4).unwrap(),
            library::gold(),
        ))
        .structure(Structure::new(
            Geometry::cylinder([0.0, -1.5, 0.5], Axis::Z, 0.25, 1.3).unwrap(),
            library::silicon_nitride(),
        ))
        .source(Source::point_dipole([0.0; 3], pulse(1.55), Polarization::Ey))
        .boundaries(boundaries)
        .grid_spec(GridSpec::auto(15.0))
        .build()
        .unwrap()
}

#[test]
fn test_every_axis_is_monotonic_snapped_and_graded() {
    let sim = mixed_layout();
    let grid = generate_grid(&sim, &MeshSettings::default()).unwrap();
    let domain = sim.bounds();

    for axis in Axis::ALL {
        let g = grid.axis(axis);
        assert_well_formed(g);

        let (lo, hi) = domain.span(axis);
        for (i, s) in sim.structures().iter() {
            let (a, b) = s.geometry.bounding_box().span(axis);
            for f in faces(a, b, lo, hi) {
                assert!(g.primal.contains(&f), "{axis}: face {f} of structure {i} not snapped");
            }
        }

        let periodic = sim.boundaries().axis(axis).is_periodic();
        let worst = g.max_grading(periodic);
        assert!(worst <= 1.4 * (1.0 + 1e-9), "{axis}: grading {worst}");
    }
}

#[test]
fn test_thin_silicon_layer_is_resolved() {
    let grid = generate_grid(&mixed_layout(), &MeshSettings::default()).unwrap();
    let cells = grid.x.cells_within(0.285, 0.315);
    assert!(cells >= 2, "only {cells} cells across the layer");
}

#[test]
fn test_later_structure_sets_the_local_step() {
    // A (n = 3) spans x in [-1, 1]; B (vacuum-like, n = 1) is added later
    // over [0, 1] and must win there.
    let sim = Simulation::builder([0.0; 3], [6.0, 6.0, 6.0], 1e-13)
        .structure(Structure::new(
            Geometry::cuboid([0.0; 3], [2.0, 2.0, 2.0]).unwrap(),
            Material::from_index(3.0).unwrap(),
        ))
        .structure(Structure::new(
            Geometry::cuboid([0.5, 0.0, 0.0], [1.0, 2.0, 2.0]).unwrap(),
            Material::vacuum(),
        ))
        .source(Source::point_dipole([0.0; 3], pulse(1.0), Polarization::Ez))
        .grid_spec(GridSpec::auto(10.0))
        .build()
        .unwrap();
    let grid = generate_grid(&sim, &MeshSettings::default()).unwrap();

    let steps = grid.x.steps();
    let step_near = |x: f64| {
        let i = grid.x.dual.partition_point(|&c| c < x);
        steps[i]
    };
    assert_relative_eq!(step_near(-0.5), 1.0 / 30.0, max_relative = 1e-6);
    assert!(step_near(0.5) > 2.0 * step_near(-0.5));
}

// ─────────────────────────────────────────────────────────────
// Uniform / custom axes and failures
// ─────────────────────────────────────────────────────────────

#[test]
fn test_custom_axis_keeps_given_points() {
    let spec = GridSpec {
        z: AxisGridSpec::Custom {
            coords: vec![-2.0, -0.5, 0.0, 0.25, 2.0],
        },
        ..GridSpec::uniform(0.25)
    };
    let sim = Simulation::builder([0.0; 3], [4.0, 4.0, 4.0], 1e-13)
        .grid_spec(spec)
        .boundaries(BoundarySpec::all_sides(BoundaryKind::Pec))
        .build()
        .unwrap();
    let grid = generate_grid(&sim, &MeshSettings::default()).unwrap();
    assert_eq!(grid.z.primal, vec![-2.0, -0.5, 0.0, 0.25, 2.0]);
    assert_eq!(grid.x.num_cells(), 16);
}

#[test]
fn test_sub_nanometre_wavelength_is_too_fine() {
    let spec = GridSpec::all(AxisGridSpec::Auto {
        min_steps_per_wavelength: 10.0,
        max_scale: 1.4,
        wavelength: Some(1e-4),
    });
    let sim = Simulation::builder([0.0; 3], [10.0, 10.0, 10.0], 1e-13)
        .grid_spec(spec)
        .build()
        .unwrap();
    let err = generate_grid(&sim, &MeshSettings::default()).unwrap_err();
    assert!(matches!(err, GridError::GridTooFine { axis: Axis::X, .. }), "{err}");
}

#[test]
fn test_negative_box_is_degenerate() {
    let bad = Geometry::Box(Cuboid {
        center: [0.0; 3],
        size: [1.0, -1.0, 1.0],
    });
    let sim = Simulation::builder([0.0; 3], [4.0, 4.0, 4.0], 1e-13)
        .structure(Structure::new(Geometry::cuboid([0.0; 3], [1.0; 3]).unwrap(), Material::vacuum()))
        .structure(Structure::new(bad, Material::vacuum()))
        .grid_spec(GridSpec::uniform(0.1))
        .build()
        .unwrap();
    let err = generate_grid(&sim, &MeshSettings::default()).unwrap_err();
    assert!(matches!(err, GridError::DegenerateGeometry { index: 1, .. }), "{err}");
}

#[test]
fn test_max_scale_of_one_is_rejected() {
    let spec = GridSpec::all(AxisGridSpec::Auto {
        min_steps_per_wavelength: 10.0,
        max_scale: 1.0,
        wavelength: Some(1.0),
    });
    let sim = Simulation::builder([0.0; 3], [2.0, 2.0, 2.0], 1e-13)
        .grid_spec(spec)
        .build()
        .unwrap();
    let err = generate_grid(&sim, &MeshSettings::default()).unwrap_err();
    assert!(matches!(err, GridError::InvalidGridSpec { axis: Axis::X, .. }));
}
