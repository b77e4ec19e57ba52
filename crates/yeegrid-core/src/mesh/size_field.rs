//! Graded cell-size field on one interval between snap points.
//!
//! The field is
//!
//! ```text
//! h(x) = min(target, e_a + σ(x − a), e_b + σ(b − x))
//! ```
//!
//! which is piecewise linear. Cell boundaries are placed where the cell
//! count `∫ dx / h` reaches equal shares, so every cell holds the same
//! fraction of the interval's integral. Because `|d ln h / dφ| ≤ σ` along
//! the count coordinate `φ`, neighbouring cells inside one interval differ
//! by at most `e^σ`.

/// Slopes below this fraction of the local size are treated as flat.
const FLAT: f64 = 1.0e-12;

#[derive(Debug, Clone, Copy)]
struct Piece {
    /// Distance of the piece start from the interval start.
    offset: f64,
    len: f64,
    h0: f64,
    slope: f64,
    /// `∫ dx / h` over the piece.
    count: f64,
}

impl Piece {
    fn new(offset: f64, len: f64, h0: f64, h1: f64) -> Self {
        let slope = (h1 - h0) / len;
        let (slope, count) = if (h1 - h0).abs() <= FLAT * h0 {
            (0.0, len / h0)
        } else {
            (slope, (h1 / h0).ln() / slope)
        };
        Self {
            offset,
            len,
            h0,
            slope,
            count,
        }
    }

    /// Distance from the piece start at which the running count reaches `phi`.
    fn locate(&self, phi: f64) -> f64 {
        let dt = if self.slope == 0.0 {
            phi * self.h0
        } else {
            self.h0 * (self.slope * phi).exp_m1() / self.slope
        };
        dt.clamp(0.0, self.len)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SizeField {
    start: f64,
    pieces: Vec<Piece>,
}

impl SizeField {
    /// Field on `[a, b]` with plateau `target`, edge sizes `ea`, `eb` and
    /// ramp slope `sigma > 0`. All sizes must be positive.
    pub(crate) fn new(a: f64, b: f64, target: f64, ea: f64, eb: f64, sigma: f64) -> Self {
        let len = b - a;
        let h = |t: f64| target.min(ea + sigma * t).min(eb + sigma * (len - t));

        let mut cuts = vec![0.0, len];
        let kinks = [
            (target - ea) / sigma,
            len - (target - eb) / sigma,
            (eb + sigma * len - ea) / (2.0 * sigma),
        ];
        cuts.extend(kinks.into_iter().filter(|t| *t > 0.0 && *t < len));
        cuts.sort_by(f64::total_cmp);
        cuts.dedup();

        let pieces = cuts
            .windows(2)
            .filter(|w| w[1] > w[0])
            .map(|w| Piece::new(w[0], w[1] - w[0], h(w[0]), h(w[1])))
            .collect();
        Self { start: a, pieces }
    }

    /// Total `∫ dx / h`: the ideal (fractional) number of cells.
    pub(crate) fn count(&self) -> f64 {
        self.pieces.iter().map(|p| p.count).sum()
    }

    /// The `n − 1` boundaries splitting the interval into `n` cells of equal
    /// count share. The interval end points are not included.
    pub(crate) fn interior_points(&self, n: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(n.saturating_sub(1));
        if self.pieces.is_empty() {
            return out;
        }
        let total = self.count();
        let mut idx = 0;
        let mut before = 0.0;
        for k in 1..n {
            let phi = total * k as f64 / n as f64;
            while idx + 1 < self.pieces.len() && phi > before + self.pieces[idx].count {
                before += self.pieces[idx].count;
                idx += 1;
            }
            let p = &self.pieces[idx];
            out.push(self.start + p.offset + p.locate(phi - before));
        }
        out
    }
}

/// Cells needed for an ideal count, never fewer than one.
pub(crate) fn cells_for(count: f64) -> f64 {
    (count - 1.0e-6).ceil().max(1.0)
}
