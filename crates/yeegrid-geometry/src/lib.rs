//! # yeegrid geometry
//!
//! Geometry handling for the yeegrid workspace. This crate provides:
//!
//! - **Bounds** ([`bounds`]) — Cartesian axes, axis-aligned bounding boxes and
//!   the [`UNBOUNDED`](bounds::UNBOUNDED) sentinel for infinite extents.
//! - **Primitives** ([`primitives`]) — Boxes, spheres, cylinders, extruded
//!   polygons and groups, each with bounding-box and containment queries.
//! - **Polygons** ([`polygon`]) — Area, containment and self-intersection
//!   tests for polyslab cross-sections.
//! - **Transformations** ([`transform`]) — Axis-aligned scale and translate.

pub mod bounds;
pub mod polygon;
pub mod primitives;
pub mod transform;

pub use bounds::{Axis, BoundingBox, UNBOUNDED};
pub use primitives::{Geometry, GeometryError};
pub use transform::Transform;
