//! Planar primitives for fold-vertex analysis.
//!
//! Purpose
//! - Branches (creases) as normalized angles plus a descriptive length.
//! - Rigid planar maps (`Rotation`, `Translation`, composed `Transformation`)
//!   used for tessellation-compatibility bookkeeping.
//!
//! Conventions
//! - Every angle is in radians, normalized into [0, 2π) where stored.
//! - Angular differences are always the wrapped (shortest) distance.
//!
//! Code cross-refs: `vertex::Vertex`, `loss::Loss`

mod transform;
mod types;

pub use transform::{Affine2, Rotation, Transformation, Translation};
pub use types::{angle_dist, normalize_angle, signed_angle_diff, Branch};
