//! # yeegrid core
//!
//! Automatic grid generation and pre-submission validation for FDTD
//! simulations. A [`Simulation`](simulation::Simulation) describes the
//! domain, its structures, sources, monitors and boundaries; this crate
//! turns it into a non-uniform Yee [`Grid`](grid::Grid), checks the pair
//! for problems that would waste or invalidate a run, and serialises the
//! accepted result for submission.
//!
//! ## Pipeline
//!
//! ```text
//! Simulation ──► mesh::generate_grid ──► validate::validate ──► serialize::encode
//! ```
//!
//! [`generate_and_validate`] runs the first two stages. Generation failures
//! are errors ([`mesh::GridError`]); validation findings are data
//! ([`validate::Diagnostics`]), all of which are returned in one pass.
//!
//! ## Modules
//!
//! - [`simulation`] — The aggregate root and its builder.
//! - [`structure`] — Structures and the priority-ordered registry.
//! - [`source`], [`monitor`], [`types`] — Simulation contents.
//! - [`boundary`], [`grid_spec`] — Boundary conditions and meshing policy.
//! - [`grid`] — Primal/dual axis grids.
//! - [`mesh`] — Automatic, uniform and custom grid generation with PML.
//! - [`validate`] — The diagnostic checks.
//! - [`pipeline`] — [`generate_and_validate`] and [`ValidatedSimulation`].
//! - [`serialize`] — Versioned JSON encoding.

pub mod boundary;
pub mod grid;
pub mod grid_spec;
pub mod mesh;
pub mod monitor;
pub mod pipeline;
pub mod serialize;
pub mod simulation;
pub mod source;
pub mod structure;
pub mod types;
pub mod validate;

pub use pipeline::{
    generate_and_validate, generate_and_validate_with, PrepareConfig, PrepareError,
    ValidatedSimulation,
};
pub use serialize::{decode, decode_with, encode, DecodeError};
pub use simulation::{Simulation, SimulationBuilder, SimulationError};
