//! Planar polygon helpers used by [`PolySlab`](crate::primitives::PolySlab).
//!
//! Vertices are `[u, v]` pairs in the plane normal to the extrusion axis.
//! The polygon is implicitly closed (the last vertex connects to the first).

/// Signed area via the shoelace formula; positive for counter-clockwise order.
pub fn signed_area(vertices: &[[f64; 2]]) -> f64 {
    let n = vertices.len();
    let mut twice = 0.0;
    for i in 0..n {
        let [x0, y0] = vertices[i];
        let [x1, y1] = vertices[(i + 1) % n];
        twice += x0 * y1 - x1 * y0;
    }
    0.5 * twice
}

/// Even-odd ray casting. Points exactly on an edge count as inside.
pub fn contains(vertices: &[[f64; 2]], point: [f64; 2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let [px, py] = point;
    let mut inside = false;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if on_segment(a, b, point) {
            return true;
        }
        if (a[1] > py) != (b[1] > py) {
            let x_cross = a[0] + (py - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if px < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Per-coordinate `(min, max)` of the vertex list.
pub fn extent(vertices: &[[f64; 2]]) -> ([f64; 2], [f64; 2]) {
    let mut lo = [f64::MAX, f64::MAX];
    let mut hi = [f64::MIN, f64::MIN];
    for v in vertices {
        for k in 0..2 {
            lo[k] = lo[k].min(v[k]);
            hi[k] = hi[k].max(v[k]);
        }
    }
    (lo, hi)
}

/// True if any two non-adjacent edges touch or cross, or adjacent edges fold back
/// onto each other.
pub fn is_self_intersecting(vertices: &[[f64; 2]]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a0 = vertices[i];
        let a1 = vertices[(i + 1) % n];
        for j in (i + 1)..n {
            let b0 = vertices[j];
            let b1 = vertices[(j + 1) % n];
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Shared vertex is fine; a collinear overlap is not.
                let shared = if j == i + 1 { a1 } else { a0 };
                let (p, q) = if j == i + 1 { (a0, b1) } else { (a1, b0) };
                if cross(shared, p, q) == 0.0 && dot(shared, p, q) > 0.0 {
                    return true;
                }
                continue;
            }
            if segments_touch(a0, a1, b0, b1) {
                return true;
            }
        }
    }
    false
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn dot(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[0] - o[0]) + (a[1] - o[1]) * (b[1] - o[1])
}

fn on_segment(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    cross(a, b, p) == 0.0
        && p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

fn segments_touch(a0: [f64; 2], a1: [f64; 2], b0: [f64; 2], b1: [f64; 2]) -> bool {
    let d1 = cross(b0, b1, a0);
    let d2 = cross(b0, b1, a1);
    let d3 = cross(a0, a1, b0);
    let d4 = cross(a0, a1, b1);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    on_segment(b0, b1, a0) || on_segment(b0, b1, a1) || on_segment(a0, a1, b0) || on_segment(a0, a1, b1)
}
