//! Alignment of origami fold vertices.
//!
//! A fold vertex is the set of creases meeting at one point, stored as angle-sorted
//! branches. The core answers: which rotation and small per-crease adjustments
//! overlay a smaller vertex onto part of a larger one with the least angular mismatch?
//!
//! Layout
//! - `geom`: branches, angle helpers, rigid planar maps.
//! - `constraint`, `vertex`: the vertex model and its predicates.
//! - `loss`, `align`: scoring and the brute-force search.
//! - `patterns`, `sampler`: reference and random inputs.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; the curated
//!   surface lives in `api` and `prelude`.

pub mod align;
pub mod api;
pub mod cfg;
pub mod constraint;
pub mod error;
pub mod geom;
pub mod loss;
pub mod patterns;
pub mod sampler;
pub mod vertex;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{AlignError, Result};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::align::{filled, AlignCfg, Algorithm, Output};
    pub use crate::constraint::{Boundary, Constraint, DiffAngle, Symmetry};
    pub use crate::error::{AlignError, Result};
    pub use crate::geom::{Branch, Rotation, Transformation, Translation};
    pub use crate::loss::Loss;
    pub use crate::vertex::{Selection, Vertex};
}
