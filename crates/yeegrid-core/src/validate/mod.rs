//! Pre-submission validation.
//!
//! [`validate`] runs every check against a simulation and its generated grid
//! and returns all findings at once. A finding is a [`Diagnostic`] tagged
//! [`Severity::Error`] (blocks submission) or [`Severity::Warning`] (likely
//! inaccurate but submittable). Checks never stop early; their results are
//! concatenated in the fixed order of [`DiagnosticKind`].

mod checks;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::simulation::Simulation;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Which check produced a diagnostic. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    Cfl,
    DomainContainment,
    GridSize,
    FeatureResolution,
    Symmetry,
    BoundaryConsistency,
    MaterialPassivity,
    Naming,
    RunTime,
}

impl DiagnosticKind {
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::Cfl => "cfl",
            DiagnosticKind::DomainContainment => "domain-containment",
            DiagnosticKind::GridSize => "grid-size",
            DiagnosticKind::FeatureResolution => "feature-resolution",
            DiagnosticKind::Symmetry => "symmetry",
            DiagnosticKind::BoundaryConsistency => "boundary-consistency",
            DiagnosticKind::MaterialPassivity => "material-passivity",
            DiagnosticKind::Naming => "naming",
            DiagnosticKind::RunTime => "run-time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{tag}[{}]: {}", self.kind.name(), self.message)
    }
}

/// An ordered set of findings. Empty means the simulation is accepted as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new(items: Vec<Diagnostic>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| !d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    /// Findings of one kind, in order.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.kind == kind)
    }

    /// Only the warnings, keeping their order.
    pub fn into_warnings(self) -> Diagnostics {
        Self(self.0.into_iter().filter(|d| !d.is_error()).collect())
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Thresholds used by the checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSettings {
    /// Ceiling on `Nx · Ny · Nz`.
    pub max_total_cells: u64,
    /// Cells a structure's smallest extent should span.
    pub min_cells_per_feature: usize,
    /// Allowed offset from the domain centre on symmetric axes, as a
    /// fraction of the domain length.
    pub symmetry_tolerance: f64,
    /// Frequencies sampled across the source band for passivity.
    pub passivity_samples: usize,
    /// Largest tolerated gain (negative `Im ε`).
    pub passivity_tolerance: f64,
    /// Time steps above which the run time is reported as excessive.
    pub max_time_steps: u64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_total_cells: 2_000_000_000,
            min_cells_per_feature: 4,
            symmetry_tolerance: 1.0e-6,
            passivity_samples: 101,
            passivity_tolerance: 1.0e-9,
            max_time_steps: 100_000_000,
        }
    }
}

/// Inputs shared by every check.
pub(crate) struct Context<'a> {
    pub sim: &'a Simulation,
    pub grid: &'a Grid,
    pub settings: &'a ValidationSettings,
}

type Check = fn(&Context<'_>) -> Vec<Diagnostic>;

const CHECKS: &[Check] = &[
    checks::cfl,
    checks::domain_containment,
    checks::grid_size,
    checks::feature_resolution,
    checks::symmetry,
    checks::boundary_consistency,
    checks::material_passivity,
    checks::naming,
    checks::run_time,
];

/// Run every check and return the findings in check order.
pub fn validate(sim: &Simulation, grid: &Grid, settings: &ValidationSettings) -> Diagnostics {
    let ctx = Context {
        sim,
        grid,
        settings,
    };

    #[cfg(feature = "parallel")]
    let found: Vec<Vec<Diagnostic>> = CHECKS.par_iter().map(|check| check(&ctx)).collect();
    #[cfg(not(feature = "parallel"))]
    let found: Vec<Vec<Diagnostic>> = CHECKS.iter().map(|check| check(&ctx)).collect();

    Diagnostics(found.into_iter().flatten().collect())
}
