//! Coefficients of the local SPD 19-point stencil.
//!
//! At each sample, nineteen neighbors participate: the sample itself, the six
//! axial neighbors, and the twelve edge neighbors lying in the coordinate
//! planes. Suffixes name the (d3, d2, d1) offset with `m` = −1, `0` = 0 and
//! `p` = +1, so `s0pm` multiplies x[i3][i2+1][i1−1]. Because the operator is
//! symmetric, only the ten coefficients with lexicographic offset
//! (d3, d2, d1) ≥ (0, 0, 0) are stored; the rest follow from
//! A(p, p+d) = A(p+d, p). For variable coefficients the symmetry relates
//! *different* samples: the (−d) coefficient at p equals the (+d) coefficient
//! stored at p+(−d).

use num_traits::Float;

use crate::error::FilterError;
use crate::field::{Field3, Grid3};

/// The ten stored coefficient arrays of a 19-point SPD stencil.
///
/// Construction order is `[s000, s00p, s0pm, s0p0, s0pp, spm0, sp0m, sp00,
/// sp0p, spp0]`. All arrays share one grid; the store is read-only for the
/// lifetime of any filter built on it.
pub struct Spd19Coeffs<T> {
    pub(crate) s000: Field3<T>,
    pub(crate) s00p: Field3<T>,
    pub(crate) s0pm: Field3<T>,
    pub(crate) s0p0: Field3<T>,
    pub(crate) s0pp: Field3<T>,
    pub(crate) spm0: Field3<T>,
    pub(crate) sp0m: Field3<T>,
    pub(crate) sp00: Field3<T>,
    pub(crate) sp0p: Field3<T>,
    pub(crate) spp0: Field3<T>,
}

impl<T: Float> Spd19Coeffs<T> {
    /// Wraps ten coefficient arrays, rejecting any shape disagreement.
    pub fn new(s: [Field3<T>; 10]) -> Result<Self, FilterError> {
        let [s000, s00p, s0pm, s0p0, s0pp, spm0, sp0m, sp00, sp0p, spp0] = s;
        let grid = s000.grid();
        for f in [
            &s00p, &s0pm, &s0p0, &s0pp, &spm0, &sp0m, &sp00, &sp0p, &spp0,
        ] {
            if f.grid() != grid {
                return Err(FilterError::ShapeMismatch { expected: grid, got: f.grid() });
            }
        }
        Ok(Self { s000, s00p, s0pm, s0p0, s0pp, spm0, sp0m, sp00, sp0p, spp0 })
    }

    pub fn grid(&self) -> Grid3 {
        self.s000.grid()
    }

    /// The ten arrays in construction order.
    pub fn arrays(&self) -> [&Field3<T>; 10] {
        [
            &self.s000, &self.s00p, &self.s0pm, &self.s0p0, &self.s0pp,
            &self.spm0, &self.sp0m, &self.sp00, &self.sp0p, &self.spp0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_shapes() {
        let g = Grid3::new(3, 3, 3);
        let bad = Grid3::new(3, 3, 2);
        let mut arrays: Vec<Field3<f64>> = (0..10).map(|_| Field3::zeros(g)).collect();
        arrays[4] = Field3::zeros(bad);
        let arrays: [Field3<f64>; 10] = arrays.try_into().unwrap();
        assert!(matches!(
            Spd19Coeffs::new(arrays),
            Err(FilterError::ShapeMismatch { .. })
        ));
    }
}
