//! JSON encoding of validated simulations for submission.
//!
//! The document is an envelope
//!
//! ```text
//! { "version": "<crate version>", "simulation": {...}, "grid": {...}, "warnings": [...] }
//! ```
//!
//! Every polymorphic value is internally tagged with `"type"`. Floats are
//! written in shortest round-trip form and parsed exactly, so
//! `decode(encode(v)) == v` bit for bit. Decoding rejects documents from a
//! different major/minor version, re-checks everything the builder and
//! the mesh generator guarantee (reporting the offending field path), and
//! then runs the validator again. The stored `warnings` are informational;
//! the decoded value carries the warnings of that fresh validation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use yeegrid_geometry::Axis;

use crate::grid::Grid;
use crate::pipeline::ValidatedSimulation;
use crate::simulation::{Simulation, SimulationError};
use crate::validate::{validate, Diagnostics, ValidationSettings};

/// Version written into every document.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Malformed input at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },

    #[error("Unsupported format version {found} (expected {expected})")]
    VersionMismatch { found: String, expected: String },

    #[error("Inconsistent value at {path}: {reason}")]
    Inconsistent { path: String, reason: String },

    /// The document is well formed but does not pass validation.
    #[error("Decoded simulation rejected with {} error(s):\n{0}", .0.errors().count())]
    Rejected(Diagnostics),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: &'a str,
    simulation: &'a Simulation,
    grid: &'a Grid,
    warnings: &'a Diagnostics,
}

#[derive(Deserialize)]
struct Envelope {
    simulation: Simulation,
    grid: Grid,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: String,
}

pub fn encode(validated: &ValidatedSimulation) -> Result<Vec<u8>, EncodeError> {
    let envelope = EnvelopeRef {
        version: FORMAT_VERSION,
        simulation: validated.simulation(),
        grid: validated.grid(),
        warnings: validated.warnings(),
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// [`decode_with`] using default validation settings.
pub fn decode(bytes: &[u8]) -> Result<ValidatedSimulation, DecodeError> {
    decode_with(bytes, &ValidationSettings::default())
}

pub fn decode_with(
    bytes: &[u8],
    settings: &ValidationSettings,
) -> Result<ValidatedSimulation, DecodeError> {
    let probe: VersionProbe = serde_json::from_slice(bytes).map_err(|e| malformed(bytes, &e))?;
    if major_minor(&probe.version) != major_minor(FORMAT_VERSION) {
        return Err(DecodeError::VersionMismatch {
            found: probe.version,
            expected: FORMAT_VERSION.to_string(),
        });
    }

    let envelope: Envelope = serde_json::from_slice(bytes).map_err(|e| malformed(bytes, &e))?;
    let Envelope { simulation, grid } = envelope;

    simulation.check().map_err(simulation_inconsistency)?;
    for (i, s) in simulation.structures().iter() {
        s.geometry.validate().map_err(|e| DecodeError::Inconsistent {
            path: format!("simulation.structures[{i}].geometry"),
            reason: e.to_string(),
        })?;
    }
    grid.check_invariants()
        .map_err(|(path, reason)| DecodeError::Inconsistent {
            path: format!("grid.{path}"),
            reason,
        })?;
    check_coverage(&simulation, &grid)?;

    let diagnostics = validate(&simulation, &grid, settings);
    if diagnostics.has_errors() {
        return Err(DecodeError::Rejected(diagnostics));
    }
    Ok(ValidatedSimulation::from_parts(
        simulation,
        grid,
        diagnostics.into_warnings(),
    ))
}

fn malformed(bytes: &[u8], err: &serde_json::Error) -> DecodeError {
    DecodeError::Malformed {
        offset: byte_offset(bytes, err.line(), err.column()),
        message: err.to_string(),
    }
}

/// Byte offset of a 1-based line/column position reported by serde_json.
fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .nth(line - 2)
            .map_or(bytes.len(), |(i, _)| i + 1)
    };
    (line_start + column.saturating_sub(1)).min(bytes.len())
}

fn major_minor(version: &str) -> (&str, &str) {
    let mut parts = version.split('.');
    (parts.next().unwrap_or(""), parts.next().unwrap_or(""))
}

fn simulation_inconsistency(err: SimulationError) -> DecodeError {
    let path = match &err {
        SimulationError::InvalidDomain { .. } => "simulation.size".to_string(),
        SimulationError::InvalidRunTime(_) => "simulation.run_time".to_string(),
        SimulationError::InvalidCourant(_) => "simulation.courant".to_string(),
        SimulationError::Material { index: None, .. } => "simulation.medium".to_string(),
        SimulationError::Material { index: Some(i), .. } => {
            format!("simulation.structures[{i}].material")
        }
        SimulationError::InvalidBoundary { axis, .. } => format!("simulation.boundaries.{axis}"),
        SimulationError::InvalidSource { index, .. } => format!("simulation.sources[{index}]"),
        SimulationError::InvalidMonitor { index, .. } => format!("simulation.monitors[{index}]"),
    };
    DecodeError::Inconsistent {
        path,
        reason: err.to_string(),
    }
}

/// Along every axis the grid is the domain plus exactly `num_layers` PML
/// cells on each absorbing face: the primal coordinates just inside the PML
/// sit on the domain bounds.
fn check_coverage(sim: &Simulation, grid: &Grid) -> Result<(), DecodeError> {
    let domain = sim.bounds();
    for axis in Axis::ALL {
        let (lo, hi) = domain.span(axis);
        let tol = 1.0e-9 * (hi - lo);
        let primal = &grid.axis(axis).primal;
        let (minus, plus) = sim.boundaries().axis(axis).pml_params();
        let below = minus.map_or(0, |p| p.num_layers);
        let above = plus.map_or(0, |p| p.num_layers);
        let path = format!("grid.{axis}.primal");
        if primal.len() < below + above + 2 {
            return Err(DecodeError::Inconsistent {
                path,
                reason: format!(
                    "{} points cannot hold {below} + {above} PML cells and the domain",
                    primal.len()
                ),
            });
        }
        let (first, last) = (primal[below], primal[primal.len() - 1 - above]);
        if (first - lo).abs() > tol || (last - hi).abs() > tol {
            return Err(DecodeError::Inconsistent {
                path,
                reason: format!(
                    "interior spans [{first}, {last}] but the domain is [{lo}, {hi}]"
                ),
            });
        }
    }
    Ok(())
}
