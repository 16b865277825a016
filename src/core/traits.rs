//! Core operator traits for spdfil.

use crate::error::FilterError;

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V) -> Result<(), FilterError>;
}

/// A preconditioner M ≈ A⁻¹.
pub trait Preconditioner<V> {
    /// Apply M⁻¹ to r, writing z = M⁻¹ r
    fn apply(&self, r: &V, z: &mut V) -> Result<(), FilterError>;
}
