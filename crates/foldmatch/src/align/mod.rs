//! Brute-force alignment of two fold vertices.
//!
//! Purpose
//! - Find the rigid rotation and per-branch angle adjustments that overlay the
//!   smaller vertex onto a same-size subset of the larger one with minimum loss.
//!
//! Search
//! - Rotation sweep over integer degrees [0, 360) × lexicographic index subsets
//!   of the larger vertex × cyclic offsets. Each triple is scored by `Loss`.
//! - A bounded, cost-sorted list keeps the N best mutually distinct results.
//!   Replacement requires a strictly lower cost than the current worst entry, so
//!   ties keep the earlier-enumerated candidate and the output is deterministic.
//! - The sweep stops before the next rotation once the best entry costs exactly 0.
//!
//! Dedup policy
//! - Results are duplicates when their materialized vertices are angle-compatible
//!   within `AlignCfg::dedup_eps`. A duplicate only replaces the retained result it
//!   matches, and only with a strictly lower cost.
//!
//! Parallelism
//! - `optimize_pattern_par` scores subsets × offsets of one rotation on the rayon
//!   pool, then merges them in enumeration order; results equal the sequential run.
//!
//! Code cross-refs: `loss::Loss`, `vertex::Vertex::{rotate, extract_branches, adjusted}`

mod combinations;
mod search;
mod types;

pub use combinations::Combinations;
pub use search::{align_with_defaults, Algorithm};
pub use types::{filled, AlignCfg, Output};

#[cfg(test)]
mod tests;
