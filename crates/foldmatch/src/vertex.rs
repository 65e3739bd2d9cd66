//! Fold vertex: creases meeting at one point, kept sorted by angle.
//!
//! Invariants
//! - `branches` is sorted by angle ascending after every operation.
//! - Constraint indices refer to sorted positions; any operation that permutes
//!   the order rewrites constraints through `Constraint::remap`.
//! - Transforming operations return new values; callers rebind for in-place use.

use std::fmt;
use std::ops::{Index, Range};

use crate::constraint::Constraint;
use crate::error::{AlignError, Result};
use crate::geom::{angle_dist, Branch, Transformation};

/// Which branches to pick out of a vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    One(usize),
    Many(Vec<usize>),
    Range(Range<usize>),
}

impl From<usize> for Selection {
    fn from(i: usize) -> Self {
        Selection::One(i)
    }
}
impl From<Vec<usize>> for Selection {
    fn from(v: Vec<usize>) -> Self {
        Selection::Many(v)
    }
}
impl From<&[usize]> for Selection {
    fn from(v: &[usize]) -> Self {
        Selection::Many(v.to_vec())
    }
}
impl From<Range<usize>> for Selection {
    fn from(r: Range<usize>) -> Self {
        Selection::Range(r)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub(crate) branches: Vec<Branch>,
    pub constraints: Vec<Constraint>,
    /// Tessellation-compatibility bookkeeping; carried through transforms untouched.
    pub tessellation: Vec<Transformation>,
}

impl Vertex {
    pub fn new(branches: Vec<Branch>) -> Self {
        let mut v = Self {
            branches,
            ..Self::default()
        };
        v.sort();
        v
    }

    /// Unit-length branches at the given angles (radians).
    pub fn from_angles(angles: &[f64]) -> Self {
        Self::new(angles.iter().map(|&a| Branch::unit(a)).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_constraint(mut self, c: impl Into<Constraint>) -> Self {
        self.constraints.push(c.into());
        self
    }

    pub fn with_constraints(mut self, cs: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(cs);
        self
    }

    pub fn with_tessellation(mut self, t: Transformation) -> Self {
        self.tessellation.push(t);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    #[inline]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Branch> {
        self.branches.iter()
    }

    pub fn angles(&self) -> Vec<f64> {
        self.branches.iter().map(|b| b.angle).collect()
    }

    /// Append a branch and restore the sort order.
    pub fn push_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
        self.sort();
    }

    fn sort(&mut self) {
        self.branches.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    }

    /// Rotate every branch by `angle` radians.
    ///
    /// The sorted order shifts cyclically by the number of branches crossing 2π;
    /// every constraint is rewritten through the resulting permutation, and angular
    /// constraint data (symmetry axis, boundary arc) is rotated along.
    pub fn rotate(&self, angle: f64) -> Vertex {
        let moved: Vec<Branch> = self
            .branches
            .iter()
            .map(|b| Branch::new(b.angle + angle, b.length))
            .collect();
        let (branches, perm) = sorted_with_permutation(moved);
        Vertex {
            branches,
            constraints: self
                .constraints
                .iter()
                .map(|c| c.remap(&perm, angle))
                .collect(),
            tessellation: self.tessellation.clone(),
        }
    }

    /// Reflect every branch about the line at `symmetry_angle`: `a ↦ 2s − a`.
    pub fn symmetrize(&self, symmetry_angle: f64) -> Vertex {
        let mut v = Vertex {
            branches: self
                .branches
                .iter()
                .map(|b| Branch::new(2.0 * symmetry_angle - b.angle, b.length))
                .collect(),
            constraints: self.constraints.clone(),
            tessellation: self.tessellation.clone(),
        };
        v.sort();
        v
    }

    /// Add `adjustments[i]` to the branch at sorted position `i`.
    ///
    /// Constraint indices follow their branches through the re-sort; boundary arcs stay put.
    pub fn adjusted(&self, adjustments: &[f64]) -> Result<Vertex> {
        if adjustments.len() != self.len() {
            return Err(AlignError::LengthMismatch {
                left: self.len(),
                right: adjustments.len(),
            });
        }
        let moved: Vec<Branch> = self
            .branches
            .iter()
            .zip(adjustments)
            .map(|(b, &d)| Branch::new(b.angle + d, b.length))
            .collect();
        let (branches, perm) = sorted_with_permutation(moved);
        Ok(Vertex {
            branches,
            constraints: self.constraints.iter().map(|c| c.remap(&perm, 0.0)).collect(),
            tessellation: self.tessellation.clone(),
        })
    }

    /// Same length and, position by position, angles within `eps`.
    ///
    /// A crease rounded to just below 2π sorts last while its twin at 0 sorts first,
    /// so a cyclic shift of one position either way is accepted too.
    pub fn is_angle_compatible(&self, other: &Vertex, eps: f64) -> bool {
        let n = self.len();
        if n != other.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let shifted = |c: usize| {
            self.branches
                .iter()
                .enumerate()
                .all(|(i, a)| angle_dist(a.angle, other.branches[(i + c) % n].angle) < eps)
        };
        shifted(0) || shifted(1) || shifted(n - 1)
    }

    pub fn is_close_to(&self, other: &Vertex, threshold: f64) -> bool {
        self.len() == other.len()
            && self
                .branches
                .iter()
                .zip(&other.branches)
                .all(|(a, b)| a.is_close_to(b, threshold))
    }

    pub fn select(&self, sel: impl Into<Selection>) -> Result<Vec<Branch>> {
        let len = self.len();
        let get = |i: usize| {
            self.branches
                .get(i)
                .copied()
                .ok_or(AlignError::IndexOutOfRange { index: i, len })
        };
        match sel.into() {
            Selection::One(i) => Ok(vec![get(i)?]),
            Selection::Many(ix) => ix.into_iter().map(get).collect(),
            Selection::Range(r) => {
                if r.start >= r.end {
                    return Ok(Vec::new());
                }
                if r.end > len {
                    return Err(AlignError::IndexOutOfRange { index: r.end - 1, len });
                }
                Ok(self.branches[r].to_vec())
            }
        }
    }

    /// New vertex made of the selected branches (re-sorted, no constraints).
    pub fn extract_branches(&self, sel: impl Into<Selection>) -> Result<Vertex> {
        Ok(Vertex::new(self.select(sel)?))
    }

    pub fn check_constraints(&self) -> bool {
        self.constraints.iter().all(|c| c.apply(self))
    }
}

/// Sort branches by angle and report where each input position ended up (`perm[old] = new`).
fn sorted_with_permutation(branches: Vec<Branch>) -> (Vec<Branch>, Vec<usize>) {
    let mut tagged: Vec<(usize, Branch)> = branches.into_iter().enumerate().collect();
    tagged.sort_by(|a, b| a.1.angle.total_cmp(&b.1.angle));
    let mut perm = vec![0; tagged.len()];
    for (new, (old, _)) in tagged.iter().enumerate() {
        perm[*old] = new;
    }
    (tagged.into_iter().map(|(_, b)| b).collect(), perm)
}

impl Index<usize> for Vertex {
    type Output = Branch;
    #[inline]
    fn index(&self, i: usize) -> &Branch {
        &self.branches[i]
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.branches == other.branches
    }
}

impl<'a> IntoIterator for &'a Vertex {
    type Item = &'a Branch;
    type IntoIter = std::slice::Iter<'a, Branch>;
    fn into_iter(self) -> Self::IntoIter {
        self.branches.iter()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let angles: Vec<String> = self
            .branches
            .iter()
            .map(|b| format!("{:.1}", b.angle.to_degrees()))
            .collect();
        write!(f, "Vertex({})", angles.join(","))?;
        if !self.constraints.is_empty() {
            let cs: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
            write!(f, ", constraints: [{}]", cs.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::ANGLE_EPS;
    use crate::constraint::{Boundary, DiffAngle, Symmetry};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn deg(d: f64) -> f64 {
        d.to_radians()
    }

    fn sample() -> Vertex {
        Vertex::from_angles(&[deg(30.0), deg(90.0), deg(150.0), deg(270.0)])
    }

    fn is_sorted(v: &Vertex) -> bool {
        v.branches().windows(2).all(|w| w[0].angle <= w[1].angle)
    }

    #[test]
    fn construction_sorts_and_normalizes() {
        let v = Vertex::from_angles(&[deg(-90.0), deg(30.0), deg(400.0)]);
        assert!(is_sorted(&v));
        assert!((v[0].angle - deg(30.0)).abs() < 1e-12);
        assert!((v[1].angle - deg(40.0)).abs() < 1e-12);
        assert!((v[2].angle - deg(270.0)).abs() < 1e-12);

        let mut acc = Vertex::empty();
        assert!(acc.is_empty());
        acc.push_branch(Branch::unit(2.0));
        acc.push_branch(Branch::unit(1.0));
        assert_eq!(acc.angles(), vec![1.0, 2.0]);
    }

    #[test]
    fn rotate_wraps_and_resorts() {
        let r = sample().rotate(deg(100.0));
        // 270+100 wraps to 10 and moves to the front
        let expected = [10.0, 130.0, 190.0, 250.0];
        for (b, e) in r.iter().zip(expected) {
            assert!((b.angle - deg(e)).abs() < 1e-9);
        }
    }

    #[test]
    fn rotation_closure_randomized_seeded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let angles: Vec<f64> = (0..5).map(|_| rng.gen_range(0.0..2.0 * PI)).collect();
            let v = Vertex::from_angles(&angles);
            let a = rng.gen_range(-7.0..7.0);
            let b = rng.gen_range(-7.0..7.0);
            let two_step = v.rotate(a).rotate(b);
            let one_step = v.rotate(a + b);
            assert!(two_step.is_angle_compatible(&one_step, 1e-9));
        }
    }

    #[test]
    fn rotate_remaps_diff_angle_indices() {
        // DiffAngle on the 90°/270° pair (positions 1 and 3)
        let v = sample().with_constraint(DiffAngle::new(1, 3, PI, PI));
        let r = v.rotate(deg(100.0));
        // 90→190 (pos 2), 270→10 (pos 0)
        assert_eq!(r.constraints, vec![Constraint::DiffAngle(DiffAngle::new(0, 2, PI, PI))]);
        assert!(r.check_constraints());
    }

    #[test]
    fn rotate_preserves_constraint_satisfaction() {
        let v = sample()
            .with_constraint(DiffAngle::new(1, 3, PI, PI))
            .with_constraint(DiffAngle::new(0, 2, 0.0, PI))
            .with_constraint(Symmetry::new(FRAC_PI_2))
            .with_constraint(Boundary::new(0, deg(20.0), deg(40.0)));
        assert!(v.check_constraints());
        for d in (0..360).step_by(17) {
            let r = v.rotate(deg(d as f64));
            assert!(r.check_constraints(), "rotation by {d}° broke {r}");
        }
    }

    #[test]
    fn symmetrize_is_an_involution() {
        let v = Vertex::from_angles(&[0.3, 1.1, 2.9, 4.0, 5.5]);
        for s in [0.0, 0.4, FRAC_PI_2, 3.0] {
            let back = v.symmetrize(s).symmetrize(s);
            assert!(back.is_angle_compatible(&v, ANGLE_EPS));
        }
        let mirrored = sample().symmetrize(FRAC_PI_2);
        assert!(mirrored.is_angle_compatible(&sample(), ANGLE_EPS));
    }

    #[test]
    fn compatibility_survives_wrap_at_zero() {
        // -2e-15 normalizes to just under 2π and sorts last; its mirror image sorts first
        let v = Vertex::from_angles(&[-2e-15, 2.0, 0.5, 1.5]);
        let mirrored = v.symmetrize(1.0);
        assert!(mirrored.is_angle_compatible(&v, ANGLE_EPS));
        assert!(v.is_angle_compatible(&mirrored, ANGLE_EPS));
        assert!(v.clone().with_constraint(Symmetry::new(1.0)).check_constraints());

        let exact = Vertex::from_angles(&[0.0, 0.5, 1.5, 2.0]);
        assert!(exact.is_angle_compatible(&v, ANGLE_EPS));
        assert!(!exact.is_angle_compatible(&v.rotate(0.1), ANGLE_EPS));
        assert!(Vertex::empty().is_angle_compatible(&Vertex::empty(), ANGLE_EPS));
    }

    #[test]
    fn selections_and_errors() {
        let v = sample();
        assert_eq!(v.select(2).unwrap(), vec![v[2]]);
        assert_eq!(v.select(vec![3, 0]).unwrap(), vec![v[3], v[0]]);
        assert_eq!(v.select(1..3).unwrap(), vec![v[1], v[2]]);
        assert_eq!(
            v.select(4),
            Err(AlignError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert!(v.select(2..6).is_err());
        assert!(v.select(vec![0, 7]).is_err());

        let sub = v
            .clone()
            .with_constraint(Symmetry::new(FRAC_PI_2))
            .extract_branches(vec![3, 0])
            .unwrap();
        assert_eq!(sub.len(), 2);
        assert!(sub.constraints.is_empty());
        assert!(is_sorted(&sub));
    }

    #[test]
    fn adjusted_moves_branches_and_checks_length() {
        let v = sample();
        let moved = v.adjusted(&[deg(1.0), 0.0, 0.0, deg(-1.0)]).unwrap();
        assert!((moved[0].angle - deg(31.0)).abs() < 1e-12);
        assert!((moved[3].angle - deg(269.0)).abs() < 1e-12);
        assert!(matches!(
            v.adjusted(&[0.0]),
            Err(AlignError::LengthMismatch { left: 4, right: 1 })
        ));
    }

    #[test]
    fn closeness_uses_threshold() {
        let v = sample();
        let w = v.rotate(deg(2.0));
        assert!(v.is_close_to(&w, deg(5.0)));
        assert!(!v.is_close_to(&w, deg(1.0)));
        assert!(!v.is_close_to(&Vertex::empty(), deg(5.0)));
    }
}
