//! Error type shared by the vertex model, the loss, and the alignment search.

use thiserror::Error;

/// Contract violations surfaced by the library.
///
/// None of these are expected during a well-formed search; they indicate a caller
/// passing mismatched inputs or an out-of-range selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    #[error("branch sequences differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("branch index {index} out of range for vertex of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid alignment config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AlignError>;
