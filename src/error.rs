use thiserror::Error;

use crate::field::Grid3;

// Unified error type for spdfil

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("grid shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Grid3, got: Grid3 },
    #[error("bias must be non-negative, got {0}")]
    NegativeBias(f64),
    #[error("incomplete Cholesky failed for every bias below {0}")]
    FactorizationFailure(f64),
}
