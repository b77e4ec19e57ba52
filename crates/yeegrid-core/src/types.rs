//! Small value types shared across the simulation description.

use serde::{Deserialize, Serialize};

/// Mirror symmetry imposed about the domain centre along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Symmetry {
    #[default]
    None,
    /// Fields are even (PMC-like plane at the centre).
    Even,
    /// Fields are odd (PEC-like plane at the centre).
    Odd,
}

impl Symmetry {
    pub fn is_set(self) -> bool {
        self != Symmetry::None
    }
}

/// Field component driven by a current source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarization {
    Ex,
    Ey,
    Ez,
    Hx,
    Hy,
    Hz,
}

/// Propagation sense along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}
