//! Angle helpers and the `Branch` value type.

use std::f64::consts::{PI, TAU};
use std::fmt;

use nalgebra::Vector2;

use crate::cfg::ANGLE_EPS;

/// Map any finite angle into [0, 2π).
#[inline]
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Shortest signed difference `a − b`, wrapped into [−π, π).
#[inline]
pub fn signed_angle_diff(a: f64, b: f64) -> f64 {
    (a - b + PI).rem_euclid(TAU) - PI
}

/// Shortest unsigned angular distance, in [0, π].
#[inline]
pub fn angle_dist(a: f64, b: f64) -> f64 {
    signed_angle_diff(a, b).abs()
}

/// One crease radiating from a vertex.
///
/// Equality compares angles only (within `ANGLE_EPS`); the length is descriptive.
#[derive(Clone, Copy, Debug)]
pub struct Branch {
    pub angle: f64,
    pub length: f64,
}

impl Branch {
    #[inline]
    pub fn new(angle: f64, length: f64) -> Self {
        Self {
            angle: normalize_angle(angle),
            length,
        }
    }

    /// Unit-length branch.
    #[inline]
    pub fn unit(angle: f64) -> Self {
        Self::new(angle, 1.0)
    }

    /// Add `delta` to the angle and renormalize.
    #[inline]
    pub fn shift(&mut self, delta: f64) {
        self.angle = normalize_angle(self.angle + delta);
    }

    #[inline]
    pub fn is_close_to(&self, other: &Branch, threshold: f64) -> bool {
        angle_dist(self.angle, other.angle) < threshold
    }

    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        Vector2::new(self.angle.cos(), self.angle.sin())
    }

    /// Endpoint of the crease when drawn from the origin.
    #[inline]
    pub fn tip(&self) -> Vector2<f64> {
        self.direction() * self.length
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        angle_dist(self.angle, other.angle) < ANGLE_EPS
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch({:.2}°, {})", self.angle.to_degrees(), self.length)
    }
}
