//! Curated internal API (UNSTABLE).
//!
//! Convenience surface for the CLI, benches, and experiments. Breaking changes
//! are allowed and expected.

// Geometry
pub use crate::geom::{
    angle_dist, normalize_angle, signed_angle_diff, Affine2, Branch, Rotation, Transformation,
    Translation,
};
// Vertex model
pub use crate::constraint::{Boundary, Constraint, DiffAngle, Symmetry};
pub use crate::vertex::{Selection, Vertex};
// Scoring and search
pub use crate::align::{align_with_defaults, filled, AlignCfg, Algorithm, Combinations, Output};
pub use crate::loss::Loss;
// Inputs
pub use crate::patterns::{by_name as pattern_by_name, NAMES as PATTERN_NAMES};
pub use crate::sampler::{draw_embedded_pair, draw_vertex, BranchCount, ReplayToken, VertexCfg};
