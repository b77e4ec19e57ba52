//! # yeegrid materials
//!
//! Material models for the yeegrid workspace. Every variant of
//! [`Material`](material::Material) implements the
//! [`PermittivityModel`](model::PermittivityModel) trait, which maps an
//! angular frequency to a complex relative permittivity.
//!
//! ## Available models
//!
//! | Model | Module | Parameters |
//! |-------|--------|------------|
//! | Constant ε, σ | [`medium`] | permittivity, conductivity |
//! | Pole-residue | [`dispersive`] | ε∞, complex pole pairs |
//! | Sellmeier | [`dispersive`] | (B, C) in µm² |
//! | Lorentz | [`dispersive`] | ε∞, (Δε, f, δ) |
//! | Drude | [`dispersive`] | ε∞, (f, δ) |
//! | Debye | [`dispersive`] | ε∞, (Δε, τ) |
//!
//! Named presets (silica, nitride, silicon, gold, silver, water) live in
//! [`library`].

pub mod constants;
pub mod dispersive;
pub mod library;
pub mod material;
pub mod medium;
pub mod model;

pub use material::Material;
pub use model::{FrequencyRange, MaterialError, PermittivityModel};
