//! Geometric primitives.
//!
//! [`Geometry`] is a closed set of shapes. Each variant reports an
//! axis-aligned [`BoundingBox`] and a point-containment predicate; those two
//! queries are all the mesh generator and the validator need.
//! Lengths are in micrometres.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::{Axis, BoundingBox, UNBOUNDED};
use crate::polygon;

/// Errors raised when a shape has no well-defined volume or extent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Degenerate {shape}: {reason}")]
    Degenerate { shape: &'static str, reason: String },
}

impl GeometryError {
    fn degenerate(shape: &'static str, reason: impl Into<String>) -> Self {
        GeometryError::Degenerate {
            shape,
            reason: reason.into(),
        }
    }
}

/// A shape that can be placed in a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Box(Cuboid),
    Sphere(Sphere),
    Cylinder(Cylinder),
    PolySlab(PolySlab),
    GeometryGroup(GeometryGroup),
}

/// An axis-aligned box. A zero size gives a plane, line or point; a size of
/// [`UNBOUNDED`] extends the box indefinitely along that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub center: [f64; 3],
    pub size: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: [f64; 3],
    pub radius: f64,
}

/// A circular cylinder aligned with one of the Cartesian axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub center: [f64; 3],
    pub axis: Axis,
    pub radius: f64,
    /// Full length along `axis`.
    pub length: f64,
}

/// A planar polygon extruded along `axis` between `slab_bounds`.
///
/// Vertex coordinates live in the plane spanned by [`Axis::planar`], so for
/// `axis = Z` they are `[x, y]` pairs and for `axis = Y` they are `[x, z]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolySlab {
    pub vertices: Vec<[f64; 2]>,
    pub axis: Axis,
    pub slab_bounds: (f64, f64),
}

/// An ordered collection treated as a single shape (union of its members).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryGroup {
    pub geometries: Vec<Geometry>,
}

impl Geometry {
    /// Axis-aligned box with the given centre and size.
    pub fn cuboid(center: [f64; 3], size: [f64; 3]) -> Result<Self, GeometryError> {
        let g = Geometry::Box(Cuboid { center, size });
        g.validate()?;
        Ok(g)
    }

    pub fn sphere(center: [f64; 3], radius: f64) -> Result<Self, GeometryError> {
        let g = Geometry::Sphere(Sphere { center, radius });
        g.validate()?;
        Ok(g)
    }

    pub fn cylinder(
        center: [f64; 3],
        axis: Axis,
        radius: f64,
        length: f64,
    ) -> Result<Self, GeometryError> {
        let g = Geometry::Cylinder(Cylinder {
            center,
            axis,
            radius,
            length,
        });
        g.validate()?;
        Ok(g)
    }

    pub fn polyslab(
        vertices: Vec<[f64; 2]>,
        axis: Axis,
        slab_bounds: (f64, f64),
    ) -> Result<Self, GeometryError> {
        let g = Geometry::PolySlab(PolySlab {
            vertices,
            axis,
            slab_bounds,
        });
        g.validate()?;
        Ok(g)
    }

    pub fn group(geometries: Vec<Geometry>) -> Result<Self, GeometryError> {
        let g = Geometry::GeometryGroup(GeometryGroup { geometries });
        g.validate()?;
        Ok(g)
    }

    /// Short name of the variant, used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Box(_) => "box",
            Geometry::Sphere(_) => "sphere",
            Geometry::Cylinder(_) => "cylinder",
            Geometry::PolySlab(_) => "polyslab",
            Geometry::GeometryGroup(_) => "geometry group",
        }
    }

    /// Check that the shape has a well-defined, finite extent.
    ///
    /// Constructors call this; values obtained through deserialisation are
    /// checked again by the mesh generator.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let shape = self.kind();
        match self {
            Geometry::Box(b) => {
                check_finite(shape, &b.center)?;
                for (i, &s) in b.size.iter().enumerate() {
                    if !s.is_finite() || s < 0.0 {
                        return Err(GeometryError::degenerate(
                            shape,
                            format!("size along {} must be non-negative, got {s}", Axis::ALL[i]),
                        ));
                    }
                }
                Ok(())
            }
            Geometry::Sphere(s) => {
                check_finite(shape, &s.center)?;
                check_positive(shape, "radius", s.radius)
            }
            Geometry::Cylinder(c) => {
                check_finite(shape, &c.center)?;
                check_positive(shape, "radius", c.radius)?;
                if !c.length.is_finite() || c.length < 0.0 {
                    return Err(GeometryError::degenerate(
                        shape,
                        format!("length must be non-negative, got {}", c.length),
                    ));
                }
                Ok(())
            }
            Geometry::PolySlab(p) => {
                if p.vertices.len() < 3 {
                    return Err(GeometryError::degenerate(
                        shape,
                        format!("need at least 3 vertices, got {}", p.vertices.len()),
                    ));
                }
                if p.vertices.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(GeometryError::degenerate(shape, "non-finite vertex"));
                }
                let (lo, hi) = p.slab_bounds;
                if !lo.is_finite() || !hi.is_finite() || hi < lo {
                    return Err(GeometryError::degenerate(
                        shape,
                        format!("slab bounds ({lo}, {hi}) are inverted or non-finite"),
                    ));
                }
                if polygon::signed_area(&p.vertices) == 0.0 {
                    return Err(GeometryError::degenerate(shape, "polygon has zero area"));
                }
                if polygon::is_self_intersecting(&p.vertices) {
                    return Err(GeometryError::degenerate(shape, "polygon is self-intersecting"));
                }
                Ok(())
            }
            Geometry::GeometryGroup(g) => {
                if g.geometries.is_empty() {
                    return Err(GeometryError::degenerate(shape, "group is empty"));
                }
                g.geometries.iter().try_for_each(Geometry::validate)
            }
        }
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Geometry::Box(b) => BoundingBox::from_center_size(b.center, b.size),
            Geometry::Sphere(s) => {
                let d = 2.0 * s.radius;
                BoundingBox::from_center_size(s.center, [d, d, d])
            }
            Geometry::Cylinder(c) => {
                let d = 2.0 * c.radius;
                let mut size = [d, d, d];
                size[c.axis.index()] = c.length;
                BoundingBox::from_center_size(c.center, size)
            }
            Geometry::PolySlab(p) => {
                let (lo2, hi2) = polygon::extent(&p.vertices);
                let (u, v) = p.axis.planar();
                let mut min = [0.0; 3];
                let mut max = [0.0; 3];
                min[u.index()] = lo2[0];
                max[u.index()] = hi2[0];
                min[v.index()] = lo2[1];
                max[v.index()] = hi2[1];
                min[p.axis.index()] = p.slab_bounds.0.max(-UNBOUNDED);
                max[p.axis.index()] = p.slab_bounds.1.min(UNBOUNDED);
                BoundingBox::new(min, max)
            }
            Geometry::GeometryGroup(g) => {
                let mut boxes = g.geometries.iter().map(Geometry::bounding_box);
                match boxes.next() {
                    Some(first) => boxes.fold(first, |acc, b| acc.union(&b)),
                    None => BoundingBox::new([0.0; 3], [0.0; 3]),
                }
            }
        }
    }

    /// Check whether a point lies inside (or on the surface of) this shape.
    pub fn contains(&self, point: &[f64; 3]) -> bool {
        match self {
            Geometry::Box(_) => self.bounding_box().contains_point(point),
            Geometry::Sphere(s) => {
                let dx = point[0] - s.center[0];
                let dy = point[1] - s.center[1];
                let dz = point[2] - s.center[2];
                dx * dx + dy * dy + dz * dz <= s.radius * s.radius
            }
            Geometry::Cylinder(c) => {
                let a = c.axis.index();
                if (point[a] - c.center[a]).abs() > 0.5 * c.length {
                    return false;
                }
                let (u, v) = c.axis.planar();
                let du = point[u.index()] - c.center[u.index()];
                let dv = point[v.index()] - c.center[v.index()];
                du * du + dv * dv <= c.radius * c.radius
            }
            Geometry::PolySlab(p) => {
                let a = p.axis.index();
                if point[a] < p.slab_bounds.0 || point[a] > p.slab_bounds.1 {
                    return false;
                }
                let (u, v) = p.axis.planar();
                polygon::contains(&p.vertices, [point[u.index()], point[v.index()]])
            }
            Geometry::GeometryGroup(g) => g.geometries.iter().any(|geo| geo.contains(point)),
        }
    }
}

fn check_finite(shape: &'static str, center: &[f64; 3]) -> Result<(), GeometryError> {
    if center.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::degenerate(shape, "centre is not finite"))
    }
}

fn check_positive(shape: &'static str, what: &str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::degenerate(
            shape,
            format!("{what} must be positive, got {value}"),
        ))
    }
}
