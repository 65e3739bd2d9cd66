//! Saturating angular loss between two equal-length branch sequences.
//!
//! Each position contributes its wrapped angular miss, or the fixed `PENALTY`
//! once the miss exceeds the threshold. The total over `n` branches lies in
//! `[0, n]`: outliers count as whole mismatches instead of scaling linearly.

use crate::cfg::PENALTY;
use crate::error::{AlignError, Result};
use crate::geom::{angle_dist, signed_angle_diff};
use crate::vertex::Vertex;

/// Stateless scorer; `threshold` is the per-branch tolerance in radians.
#[derive(Clone, Copy, Debug)]
pub struct Loss {
    pub threshold: f64,
}

impl Loss {
    #[inline]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[inline]
    fn term(&self, a: f64, b: f64) -> f64 {
        let d = angle_dist(a, b);
        if d > self.threshold {
            PENALTY
        } else {
            d.min(PENALTY)
        }
    }

    /// Sum over `i` of the miss between `a[i]` and `b[(i + offset) mod n]`.
    pub fn compute(&self, a: &Vertex, b: &Vertex, offset: usize) -> Result<f64> {
        check_lengths(a, b)?;
        let n = b.len();
        Ok(a
            .iter()
            .enumerate()
            .map(|(i, ba)| self.term(ba.angle, b[(i + offset) % n].angle))
            .sum())
    }

    /// Signed per-branch corrections bringing `smaller[i]` onto `subset[(i + offset) mod n]`.
    ///
    /// Corrections larger than the threshold are reported as 0: those branches were
    /// already charged the full penalty and are left where they are.
    pub fn adjustments(
        &self,
        subset: &Vertex,
        smaller: &Vertex,
        offset: usize,
    ) -> Result<Vec<f64>> {
        check_lengths(subset, smaller)?;
        let n = subset.len();
        Ok(smaller
            .iter()
            .enumerate()
            .map(|(i, bs)| {
                let d = signed_angle_diff(subset[(i + offset) % n].angle, bs.angle);
                if d.abs() <= self.threshold {
                    d
                } else {
                    0.0
                }
            })
            .collect())
    }
}

#[inline]
fn check_lengths(a: &Vertex, b: &Vertex) -> Result<()> {
    if a.len() != b.len() {
        return Err(AlignError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}
