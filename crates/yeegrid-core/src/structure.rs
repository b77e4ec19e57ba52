//! Structures and the ordered structure registry.
//!
//! A [`Structure`] binds a geometry to a material. The registry is an ordered
//! sequence whose index is the structure's priority: wherever geometries
//! overlap, the later structure wins (painter's algorithm). Queries are pure
//! functions over the immutable sequence.

use serde::{Deserialize, Serialize};
use yeegrid_geometry::Geometry;
use yeegrid_materials::Material;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub geometry: Geometry,
    pub material: Material,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Structure {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name if given, otherwise `structure[index]`.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(n) => format!("structure '{n}'"),
            None => format!("structure[{index}]"),
        }
    }
}

/// Structures in priority order (index 0 is painted first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureRegistry {
    structures: Vec<Structure>,
}

impl StructureRegistry {
    pub fn new(structures: Vec<Structure>) -> Self {
        Self { structures }
    }

    /// Append at the highest priority.
    pub fn push(&mut self, structure: Structure) {
        self.structures.push(structure);
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn get(&self, priority: usize) -> Option<&Structure> {
        self.structures.get(priority)
    }

    /// Structures with their priority, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Structure)> {
        self.structures.iter().enumerate()
    }

    /// Highest-priority structure containing `point`.
    pub fn winner_at(&self, point: &[f64; 3]) -> Option<(usize, &Structure)> {
        self.structures
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.geometry.contains(point))
    }

    /// Material seen at `point`: the last containing structure's material,
    /// or `background` where no structure is present.
    pub fn material_at<'a>(&'a self, point: &[f64; 3], background: &'a Material) -> &'a Material {
        self.winner_at(point)
            .map(|(_, s)| &s.material)
            .unwrap_or(background)
    }
}

impl FromIterator<Structure> for StructureRegistry {
    fn from_iter<I: IntoIterator<Item = Structure>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
