//! Tolerance defaults for angle comparisons (internal).
//!
//! Policy
//! - Defaults are fixed constants to avoid “tolerance juggling”. The only
//!   user-facing knobs live in `AlignCfg` (threshold, output count, dedup eps).

/// Two branch angles closer than this are considered equal.
pub const ANGLE_EPS: f64 = 1e-6;
/// Slack applied to both bounds of a `DiffAngle` range.
pub(crate) const CONSTRAINT_EPS: f64 = 1e-6;
/// Per-branch loss charged when a branch misses its partner by more than the threshold.
pub const PENALTY: f64 = 1.0;
/// Number of integer-degree rotations scanned by the alignment search.
pub const ROTATION_STEPS: u32 = 360;
