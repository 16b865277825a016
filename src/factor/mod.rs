//! Incomplete Cholesky factorization of SPD stencil filters.
//!
//! The factorization A ≈ L·D·Lᵀ keeps L on the stencil's lower-half
//! footprint (zero fill), so the factors occupy exactly as much storage as
//! the coefficients themselves. IC(0) is not guaranteed to succeed for
//! matrices that are not diagonally dominant; [`factor_ic0`] grows a
//! diagonal bias until an attempt completes with all-positive pivots.

use num_traits::{Float, ToPrimitive};
use tracing::debug;

use crate::error::FilterError;
use crate::field::{Field3, Grid3};
use crate::stencil::Spd19Coeffs;

mod ic0;
mod solve;

pub(crate) use ic0::attempt_ic0;
pub(crate) use solve::{apply_factors, solve_with_factors};

/// IC(0) factor arrays, on the same grid and offset legend as the
/// coefficients they were derived from.
///
/// `d000` holds the *inverse* of the diagonal matrix D. The nine remaining
/// arrays hold the strictly-lower entries of the unit-lower-triangular L,
/// already scaled by d000, so the triangular solves run division-free.
pub(crate) struct FactorCoeffs<T> {
    pub(crate) d000: Field3<T>,
    pub(crate) l00p: Field3<T>,
    pub(crate) l0pm: Field3<T>,
    pub(crate) l0p0: Field3<T>,
    pub(crate) l0pp: Field3<T>,
    pub(crate) lpm0: Field3<T>,
    pub(crate) lp0m: Field3<T>,
    pub(crate) lp00: Field3<T>,
    pub(crate) lp0p: Field3<T>,
    pub(crate) lpp0: Field3<T>,
}

impl<T: Float> FactorCoeffs<T> {
    pub(crate) fn grid(&self) -> Grid3 {
        self.d000.grid()
    }
}

/// Runs IC(0) attempts with a growing diagonal bias until one succeeds.
///
/// The first attempt uses the stored bias; each retry doubles it, with a
/// floor of 0.001 so a zero initial bias still makes progress. Biases of
/// 1000 and beyond are treated as hopeless.
pub(crate) fn factor_ic0<T: Float>(
    s: &Spd19Coeffs<T>,
    bias: T,
) -> Result<FactorCoeffs<T>, FilterError> {
    let bmin = if bias > T::zero() { bias } else { cast(1e-3) };
    let two: T = cast(2.0);
    let limit: T = cast(1000.0);
    let mut b = bias;
    while b < limit {
        let bias_f = b.to_f64().unwrap_or(f64::NAN);
        match attempt_ic0(s, b) {
            Some(f) => {
                debug!(bias = bias_f, "incomplete Cholesky succeeded");
                return Ok(f);
            }
            None => {
                debug!(bias = bias_f, "incomplete Cholesky failed, growing bias");
            }
        }
        b = bmin.max(two * b);
    }
    Err(FilterError::FactorizationFailure(
        limit.to_f64().unwrap_or(f64::NAN),
    ))
}

fn cast<T: Float>(v: f64) -> T {
    T::from(v).unwrap()
}
