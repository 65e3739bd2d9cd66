//! Rigid planar maps used to record how a vertex tiles the plane.

use nalgebra::{Matrix2, Rotation2, Vector2};

/// Rotation about the origin by `angle` radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub angle: f64,
}

impl Rotation {
    #[inline]
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        Rotation2::new(self.angle) * p
    }
    #[inline]
    pub fn matrix(&self) -> Matrix2<f64> {
        *Rotation2::new(self.angle).matrix()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    #[inline]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        p + self.vector()
    }
    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        Vector2::new(self.dx, self.dy)
    }
}

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }
    #[inline]
    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.m * p + self.t
    }
}

/// Ordered composition: all rotations in insertion order, then all translations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transformation {
    pub rotations: Vec<Rotation>,
    pub translations: Vec<Translation>,
}

impl Transformation {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn add_rotation(&mut self, rotation: Rotation) {
        self.rotations.push(rotation);
    }

    pub fn add_translation(&mut self, translation: Translation) {
        self.translations.push(translation);
    }

    pub fn apply(&self, p: Vector2<f64>) -> Vector2<f64> {
        let rotated = self.rotations.iter().fold(p, |q, r| r.apply(q));
        self.translations.iter().fold(rotated, |q, t| t.apply(q))
    }

    /// Collapse the sequence into a single affine map.
    pub fn to_affine(&self) -> Affine2 {
        let m = self
            .rotations
            .iter()
            .fold(Matrix2::identity(), |acc, r| r.matrix() * acc);
        let t = self
            .translations
            .iter()
            .fold(Vector2::zeros(), |acc, tr| acc + tr.vector());
        Affine2 { m, t }
    }
}
