//! Axis-aligned placement transforms.
//!
//! Shapes in this crate are axis-aligned, so the transforms here are limited
//! to per-axis scaling followed by a translation. They are used to position
//! structures described once and reused at several locations.

use nalgebra::Vector3;

use crate::primitives::{Cuboid, Cylinder, Geometry, GeometryError, GeometryGroup, PolySlab, Sphere};

/// Per-axis scale followed by a translation (µm).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            translation: Vector3::zeros(),
        }
    }
}

impl Transform {
    /// Create a pure translation.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            translation: Vector3::new(dx, dy, dz),
        }
    }

    /// Create a uniform scale about the origin.
    pub fn uniform_scale(factor: f64) -> Self {
        Self::scale(factor, factor, factor)
    }

    /// Create a non-uniform scale about the origin.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            scale: Vector3::new(sx, sy, sz),
            translation: Vector3::zeros(),
        }
    }

    /// Apply this transformation to a 3D point.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        let v = Vector3::new(point[0], point[1], point[2]);
        let result = self.scale.component_mul(&v) + self.translation;
        [result.x, result.y, result.z]
    }

    /// Compose two transforms: self followed by other.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            scale: other.scale.component_mul(&self.scale),
            translation: other.scale.component_mul(&self.translation) + other.translation,
        }
    }

    fn factor(&self, i: usize) -> f64 {
        self.scale[i].abs()
    }
}

impl Geometry {
    /// Copy of this shape moved by `(dx, dy, dz)`.
    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Result<Geometry, GeometryError> {
        self.transformed(&Transform::translation(dx, dy, dz))
    }

    /// Copy of this shape scaled about the origin.
    pub fn scaled(&self, sx: f64, sy: f64, sz: f64) -> Result<Geometry, GeometryError> {
        self.transformed(&Transform::scale(sx, sy, sz))
    }

    /// Apply a placement transform. Fails when the result would leave the
    /// closed set of shapes (e.g. a sphere scaled into an ellipsoid) or
    /// become degenerate.
    pub fn transformed(&self, t: &Transform) -> Result<Geometry, GeometryError> {
        let out = match self {
            Geometry::Box(b) => Geometry::Box(Cuboid {
                center: t.apply(&b.center),
                size: [
                    b.size[0] * t.factor(0),
                    b.size[1] * t.factor(1),
                    b.size[2] * t.factor(2),
                ],
            }),
            Geometry::Sphere(s) => {
                let f = t.factor(0);
                if f != t.factor(1) || f != t.factor(2) {
                    return Err(GeometryError::Degenerate {
                        shape: "sphere",
                        reason: "non-uniform scaling is not representable".into(),
                    });
                }
                Geometry::Sphere(Sphere {
                    center: t.apply(&s.center),
                    radius: s.radius * f,
                })
            }
            Geometry::Cylinder(c) => {
                let (u, v) = c.axis.planar();
                let f = t.factor(u.index());
                if f != t.factor(v.index()) {
                    return Err(GeometryError::Degenerate {
                        shape: "cylinder",
                        reason: "radial scaling must be uniform".into(),
                    });
                }
                Geometry::Cylinder(Cylinder {
                    center: t.apply(&c.center),
                    axis: c.axis,
                    radius: c.radius * f,
                    length: c.length * t.factor(c.axis.index()),
                })
            }
            Geometry::PolySlab(p) => {
                let a = p.axis.index();
                let (u, v) = p.axis.planar();
                let (su, sv) = (t.scale[u.index()], t.scale[v.index()]);
                let (tu, tv) = (t.translation[u.index()], t.translation[v.index()]);
                let vertices = p
                    .vertices
                    .iter()
                    .map(|[x, y]| [x * su + tu, y * sv + tv])
                    .collect();
                let lo = p.slab_bounds.0 * t.scale[a] + t.translation[a];
                let hi = p.slab_bounds.1 * t.scale[a] + t.translation[a];
                Geometry::PolySlab(PolySlab {
                    vertices,
                    axis: p.axis,
                    slab_bounds: (lo.min(hi), lo.max(hi)),
                })
            }
            Geometry::GeometryGroup(g) => Geometry::GeometryGroup(GeometryGroup {
                geometries: g
                    .geometries
                    .iter()
                    .map(|geo| geo.transformed(t))
                    .collect::<Result<_, _>>()?,
            }),
        };
        out.validate()?;
        Ok(out)
    }
}
