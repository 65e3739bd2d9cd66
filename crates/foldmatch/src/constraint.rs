//! Predicates restricting the admissible angle configurations of a vertex.
//!
//! Indices refer to *sorted* branch positions. Operations that permute the sorted
//! order (rotation) rewrite every index-bearing constraint through one permutation
//! `perm[old] = new`, see `Constraint::remap`.

use std::fmt;

use crate::cfg::{ANGLE_EPS, CONSTRAINT_EPS};
use crate::geom::{angle_dist, normalize_angle};
use crate::vertex::Vertex;

/// Branch `index` must lie on the arc from `min_angle` to `max_angle` (counterclockwise).
///
/// Both bounds are normalized into [0, 2π); when `min_angle > max_angle` the arc crosses 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub index: usize,
    pub min_angle: f64,
    pub max_angle: f64,
}

impl Boundary {
    pub fn new(index: usize, min_angle: f64, max_angle: f64) -> Self {
        Self {
            index,
            min_angle: normalize_angle(min_angle),
            max_angle: normalize_angle(max_angle),
        }
    }

    pub fn apply(&self, vertex: &Vertex) -> bool {
        let Some(branch) = vertex.branches.get(self.index) else {
            return false;
        };
        let a = branch.angle;
        if self.min_angle <= self.max_angle {
            a >= self.min_angle && a <= self.max_angle
        } else {
            a >= self.min_angle || a <= self.max_angle
        }
    }

    fn remap(&self, perm: &[usize], angle: f64) -> Self {
        Self::new(
            remap_index(self.index, perm),
            self.min_angle + angle,
            self.max_angle + angle,
        )
    }
}

/// The wrapped angular distance between two branches must lie in `[min_diff, max_diff]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffAngle {
    pub index1: usize,
    pub index2: usize,
    pub min_diff: f64,
    pub max_diff: f64,
}

impl DiffAngle {
    /// Indices are stored ordered (`index1 <= index2`).
    pub fn new(index1: usize, index2: usize, min_diff: f64, max_diff: f64) -> Self {
        Self {
            index1: index1.min(index2),
            index2: index1.max(index2),
            min_diff,
            max_diff,
        }
    }

    pub fn unbounded(index1: usize, index2: usize) -> Self {
        Self::new(index1, index2, f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn apply(&self, vertex: &Vertex) -> bool {
        let (Some(b1), Some(b2)) = (
            vertex.branches.get(self.index1),
            vertex.branches.get(self.index2),
        ) else {
            return false;
        };
        let diff = angle_dist(b1.angle, b2.angle);
        diff >= self.min_diff - CONSTRAINT_EPS && diff <= self.max_diff + CONSTRAINT_EPS
    }

    fn remap(&self, perm: &[usize]) -> Self {
        Self::new(
            remap_index(self.index1, perm),
            remap_index(self.index2, perm),
            self.min_diff,
            self.max_diff,
        )
    }
}

/// The vertex must map onto itself under reflection about the line at `symmetry_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Symmetry {
    pub symmetry_angle: f64,
}

impl Symmetry {
    pub fn new(symmetry_angle: f64) -> Self {
        Self {
            symmetry_angle: normalize_angle(symmetry_angle),
        }
    }

    pub fn apply(&self, vertex: &Vertex) -> bool {
        vertex
            .symmetrize(self.symmetry_angle)
            .is_angle_compatible(vertex, ANGLE_EPS)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constraint {
    Boundary(Boundary),
    DiffAngle(DiffAngle),
    Symmetry(Symmetry),
}

impl Constraint {
    pub fn apply(&self, vertex: &Vertex) -> bool {
        match self {
            Constraint::Boundary(c) => c.apply(vertex),
            Constraint::DiffAngle(c) => c.apply(vertex),
            Constraint::Symmetry(c) => c.apply(vertex),
        }
    }

    /// Rewrite the constraint after the owning vertex was rigidly rotated by `angle`
    /// and its sorted order permuted by `perm` (`perm[old] = new`).
    pub fn remap(&self, perm: &[usize], angle: f64) -> Constraint {
        match self {
            Constraint::Boundary(c) => Constraint::Boundary(c.remap(perm, angle)),
            Constraint::DiffAngle(c) => Constraint::DiffAngle(c.remap(perm)),
            Constraint::Symmetry(c) => {
                Constraint::Symmetry(Symmetry::new(c.symmetry_angle + angle))
            }
        }
    }
}

impl From<Boundary> for Constraint {
    fn from(c: Boundary) -> Self {
        Constraint::Boundary(c)
    }
}
impl From<DiffAngle> for Constraint {
    fn from(c: DiffAngle) -> Self {
        Constraint::DiffAngle(c)
    }
}
impl From<Symmetry> for Constraint {
    fn from(c: Symmetry) -> Self {
        Constraint::Symmetry(c)
    }
}

// Indices past the permutation are left alone; `apply` rejects them anyway.
#[inline]
fn remap_index(index: usize, perm: &[usize]) -> usize {
    perm.get(index).copied().unwrap_or(index)
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Boundary(c) => write!(
                f,
                "Boundary({}, {:.1}, {:.1})",
                c.index,
                c.min_angle.to_degrees(),
                c.max_angle.to_degrees()
            ),
            Constraint::DiffAngle(c) => write!(
                f,
                "DiffAngle({}, {}, {:.1}, {:.1})",
                c.index1,
                c.index2,
                c.min_diff.to_degrees(),
                c.max_diff.to_degrees()
            ),
            Constraint::Symmetry(c) => {
                write!(f, "Symmetry({:.1})", c.symmetry_angle.to_degrees())
            }
        }
    }
}
