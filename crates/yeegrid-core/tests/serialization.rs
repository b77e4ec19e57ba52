//! Integration tests for the submission encoding.

use yeegrid_core::boundary::{Boundary, BoundaryKind, BoundarySpec, PmlParams};
use yeegrid_core::grid_spec::{AxisGridSpec, GridSpec};
use yeegrid_core::monitor::{Monitor, MonitorKind};
use yeegrid_core::source::{GaussianPulse, Source, SourceKind};
use yeegrid_core::structure::Structure;
use yeegrid_core::types::Direction;
use yeegrid_core::validate::{DiagnosticKind, Severity};
use yeegrid_core::{decode, encode, generate_and_validate, DecodeError, Simulation, ValidatedSimulation};
use yeegrid_geometry::{Axis, Geometry, UNBOUNDED};
use yeegrid_materials::constants::C_0;
use yeegrid_materials::library;

fn prepared() -> ValidatedSimulation {
    let f0 = C_0 / 1.31;
    let sim = Simulation::builder([0.1, -0.2, 0.0], [5.0, 3.0, 4.0], 2.5e-13)
        .medium(library::water())
        .structure(
            Structure::new(
                Geometry::cuboid([0.0, 0.0, -1.5], [UNBOUNDED, UNBOUNDED, 1.0]).unwrap(),
                library::silica(),
            )
            .named("substrate"),
        )
        .structure(Structure::new(
            Geometry::polyslab(
                vec![[-0.4, -0.3], [0.5, -0.3], [0.2, 0.4], [-0.3, 0.35]],
                Axis::Z,
                (-1.0, -0.78),
            )
            .unwrap(),
            library::silicon(),
        ))
        .source(Source::new(
            [0.1, -0.2, 1.2],
            [UNBOUNDED, UNBOUNDED, 0.0],
            GaussianPulse {
                amplitude: 2.5,
                phase: 1.1,
                ..GaussianPulse::new(f0, 0.2 * f0)
            },
            SourceKind::PlaneWave {
                injection_axis: Axis::Z,
                direction: Direction::Minus,
                pol_angle: 0.3,
            },
        ))
        .monitor(Monitor::flux("R", [0.1, -0.2, 1.5], [UNBOUNDED, UNBOUNDED, 0.0], vec![f0]))
        .monitor(Monitor::new(
            "movie",
            [0.1, -0.2, 0.0],
            [2.0, 0.0, 2.0],
            MonitorKind::FieldTime { interval: 10 },
        ))
        .boundaries(BoundarySpec {
            x: Boundary::periodic(),
            y: Boundary::both(BoundaryKind::Bloch { bloch_vec: 0.25 }),
            z: Boundary::both(BoundaryKind::Pml(PmlParams {
                sigma_min: 0.1,
                sigma_max: 2.75,
                ..PmlParams::default()
            })),
        })
        .grid_spec(GridSpec {
            z: AxisGridSpec::Auto {
                min_steps_per_wavelength: 12.0,
                max_scale: 1.3,
                wavelength: None,
            },
            ..GridSpec::auto(8.0)
        })
        .build()
        .unwrap();
    generate_and_validate(sim).unwrap()
}

#[test]
fn test_round_trip_is_exact() {
    let v = prepared();
    let bytes = encode(&v).unwrap();
    let back = decode(&bytes).unwrap();
    assert_eq!(back, v);
    assert_eq!(back.grid().z.primal, v.grid().z.primal);
    assert_eq!(encode(&back).unwrap(), bytes);
}

#[test]
fn test_round_trip_keeps_pulse_and_boundary_parameters() {
    let back = decode(&encode(&prepared()).unwrap()).unwrap();
    let sim = back.simulation();
    assert_eq!(sim.sources()[0].time.amplitude, 2.5);
    assert_eq!(sim.sources()[0].time.phase, 1.1);
    assert!(matches!(
        sim.sources()[0].kind,
        SourceKind::PlaneWave { pol_angle, .. } if pol_angle == 0.3
    ));
    assert_eq!(sim.boundaries().y.minus, BoundaryKind::Bloch { bloch_vec: 0.25 });
    match &sim.boundaries().z.plus {
        BoundaryKind::Pml(p) => assert_eq!((p.sigma_min, p.sigma_max), (0.1, 2.75)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_tampered_courant_is_rejected_on_decode() {
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    json["simulation"]["courant"] = 1.5.into();
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    match err {
        DecodeError::Rejected(diagnostics) => {
            assert_eq!(diagnostics.errors().count(), 1);
            assert_eq!(diagnostics.of_kind(DiagnosticKind::Cfl).count(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_stored_warnings_are_recomputed() {
    let v = prepared();
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&v).unwrap()).unwrap();
    json["warnings"] = serde_json::json!([
        { "severity": "Error", "kind": "Naming", "message": "injected" }
    ]);
    let back = decode(&serde_json::to_vec(&json).unwrap()).unwrap();
    assert_eq!(back.warnings(), v.warnings());
    assert!(back.warnings().iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_document_is_tagged_and_versioned() {
    let json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["simulation"]["structures"][0]["geometry"]["type"], "Box");
    assert_eq!(json["simulation"]["sources"][0]["kind"]["type"], "PlaneWave");
    assert_eq!(json["simulation"]["boundaries"]["y"]["minus"]["type"], "Bloch");
}

#[test]
fn test_malformed_input_reports_offset() {
    let err = decode(b"{\"version\": \"0.1.0\", \"simulation\": ").unwrap_err();
    match err {
        DecodeError::Malformed { offset, .. } => assert!(offset >= 34, "offset {offset}"),
        other => panic!("unexpected {other:?}"),
    }

    // The second comma sits at byte 8.
    let err = decode(br#"{"a": 1,, "b": 2}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed { offset: 8, .. }), "{err:?}");
}

#[test]
fn test_version_mismatch() {
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    json["version"] = "99.0.0".into();
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::VersionMismatch {
            found: "99.0.0".into(),
            expected: env!("CARGO_PKG_VERSION").into(),
        }
    );
}

#[test]
fn test_inconsistent_grid_reports_path() {
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    json["grid"]["x"]["dual"][3] = 123.0.into();
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    match err {
        DecodeError::Inconsistent { path, .. } => assert_eq!(path, "grid.x.dual[3]"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_inconsistent_simulation_reports_path() {
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    json["simulation"]["structures"][1]["geometry"]["slab_bounds"] = serde_json::json!([1.0, -1.0]);
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    match err {
        DecodeError::Inconsistent { path, .. } => {
            assert_eq!(path, "simulation.structures[1].geometry")
        }
        other => panic!("unexpected {other:?}"),
    }

    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    json["simulation"]["run_time"] = (-1.0).into();
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    assert!(
        matches!(&err, DecodeError::Inconsistent { path, .. } if path == "simulation.run_time"),
        "{err:?}"
    );
}

#[test]
fn test_grid_must_cover_domain() {
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    let primal: Vec<f64> = serde_json::from_value(json["grid"]["y"]["primal"].clone()).unwrap();
    let trimmed = primal[..primal.len() - 2].to_vec();
    let dual: Vec<f64> = trimmed.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    json["grid"]["y"]["primal"] = serde_json::json!(trimmed);
    json["grid"]["y"]["dual"] = serde_json::json!(dual);
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    match err {
        DecodeError::Inconsistent { path, .. } => assert_eq!(path, "grid.y.primal"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_grid_must_include_every_pml_layer() {
    let mut json: serde_json::Value = serde_json::from_slice(&encode(&prepared()).unwrap()).unwrap();
    let primal: Vec<f64> = serde_json::from_value(json["grid"]["z"]["primal"].clone()).unwrap();
    let trimmed = primal[1..].to_vec();
    let dual: Vec<f64> = trimmed.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    json["grid"]["z"]["primal"] = serde_json::json!(trimmed);
    json["grid"]["z"]["dual"] = serde_json::json!(dual);
    let err = decode(&serde_json::to_vec(&json).unwrap()).unwrap_err();
    match err {
        DecodeError::Inconsistent { path, .. } => assert_eq!(path, "grid.z.primal"),
        other => panic!("unexpected {other:?}"),
    }
}
