//! Local symmetric positive-definite filter with a 3-D 19-point stencil.
//!
//! Filter coefficients may differ at every sample; symmetry keeps the
//! storage at ten arrays (see [`Spd19Coeffs`]). Being SPD, the filter can in
//! principle be factored exactly by Cholesky decomposition, but exact
//! factors rarely fit the 19-point footprint, so an incomplete Cholesky
//! decomposition IC(0) confined to the stencil pattern supplies approximate
//! factors L·D·Lᵀ instead. Those factors realize an approximate inverse of
//! the filter, the classic preconditioner to hand a conjugate-gradient
//! solver.
//!
//! IC(0) can break down with non-positive pivots when the filter is not
//! diagonally dominant. Attempts therefore factor s000·(1+b) for a bias
//! b ≥ 0, and the factorization grows b automatically until an attempt
//! succeeds; the stored coefficients are never modified. Filters known to
//! be diagonally dominant should use a zero initial bias.

use std::sync::OnceLock;

use num_traits::{Float, ToPrimitive};

use crate::core::traits::{MatVec, Preconditioner};
use crate::error::FilterError;
use crate::factor::{self, FactorCoeffs};
use crate::field::{Field3, Grid3};
use crate::stencil::Spd19Coeffs;

mod apply;
mod dense;

/// A local SPD 19-point stencil filter over a 3-D grid.
///
/// The coefficient store is owned and read-only; IC(0) factors are computed
/// on first demand and cached for the filter's lifetime. A failed
/// factorization leaves no cached state, so a later call retries cleanly.
pub struct Spd19Filter<T> {
    coeffs: Spd19Coeffs<T>,
    bias: T,
    factors: OnceLock<FactorCoeffs<T>>,
}

impl<T: Float> Spd19Filter<T> {
    /// Filter with the given coefficients. Any approximate inverse (when
    /// required) will be computed with an initial bias of zero.
    pub fn new(coeffs: Spd19Coeffs<T>) -> Self {
        Self { coeffs, bias: T::zero(), factors: OnceLock::new() }
    }

    /// Filter whose IC(0) attempts start from `bias` instead of zero.
    pub fn with_bias(coeffs: Spd19Coeffs<T>, bias: T) -> Result<Self, FilterError> {
        if bias < T::zero() {
            return Err(FilterError::NegativeBias(bias.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(Self { coeffs, bias, factors: OnceLock::new() })
    }

    pub fn coeffs(&self) -> &Spd19Coeffs<T> {
        &self.coeffs
    }

    pub fn grid(&self) -> Grid3 {
        self.coeffs.grid()
    }

    pub fn bias(&self) -> T {
        self.bias
    }

    /// Applies this filter by computing y = A·x.
    pub fn apply(&self, x: &Field3<T>, y: &mut Field3<T>) -> Result<(), FilterError> {
        self.check_field(x)?;
        self.check_field(y)?;
        apply::apply_filter(&self.coeffs, x, y);
        Ok(())
    }

    /// Computes y = L·D·Lᵀ·x from the IC(0) factors: the factored
    /// approximation of this filter, useful for verification.
    pub fn apply_approximate(&self, x: &Field3<T>, y: &mut Field3<T>) -> Result<(), FilterError> {
        self.check_field(x)?;
        self.check_field(y)?;
        let f = self.ensure_factors()?;
        factor::apply_factors(f, x, y);
        Ok(())
    }

    /// Solves (L·D·Lᵀ)·x = b, applying an approximate inverse of this
    /// filter.
    pub fn apply_approximate_inverse(
        &self,
        b: &Field3<T>,
        x: &mut Field3<T>,
    ) -> Result<(), FilterError> {
        self.check_field(b)?;
        self.check_field(x)?;
        let f = self.ensure_factors()?;
        factor::solve_with_factors(f, b, x);
        Ok(())
    }

    /// Makes the IC(0) factors, if not already made.
    fn ensure_factors(&self) -> Result<&FactorCoeffs<T>, FilterError> {
        if let Some(f) = self.factors.get() {
            return Ok(f);
        }
        let f = factor::factor_ic0(&self.coeffs, self.bias)?;
        Ok(self.factors.get_or_init(|| f))
    }

    fn check_field(&self, f: &Field3<T>) -> Result<(), FilterError> {
        let expected = self.grid();
        if f.grid() != expected {
            return Err(FilterError::ShapeMismatch { expected, got: f.grid() });
        }
        Ok(())
    }
}

impl<T: Float> MatVec<Field3<T>> for Spd19Filter<T> {
    fn matvec(&self, x: &Field3<T>, y: &mut Field3<T>) -> Result<(), FilterError> {
        self.apply(x, y)
    }
}

impl<T: Float> Preconditioner<Field3<T>> for Spd19Filter<T> {
    fn apply(&self, r: &Field3<T>, z: &mut Field3<T>) -> Result<(), FilterError> {
        self.apply_approximate_inverse(r, z)
    }
}
