//! Dense projection of the stencil operator.
//!
//! Materializes the n×n matrix the filter represents, n = n1·n2·n3. Most
//! entries are zero; the projection exists for visualization of sparsity
//! and for cross-checking the stencil kernels on small grids.

use faer::traits::ComplexField;
use faer::Mat;
use num_traits::Float;

use crate::field::Grid3;

use super::Spd19Filter;

impl<T: Float + ComplexField> Spd19Filter<T> {
    /// The matrix A equivalent to this filter, with every stored
    /// coefficient mirrored so the result is exactly symmetric.
    pub fn to_dense(&self) -> Mat<T> {
        let Grid3 { n1, n2, n3 } = self.grid();
        let s = self.coeffs();
        let n = n1 * n2 * n3;
        let mut a = Mat::zeros(n, n);
        let mut i = 0;
        for i3 in 0..n3 {
            for i2 in 0..n2 {
                for i1 in 0..n1 {
                    let j = i + n1;
                    let k = i + n1 * n2;
                    a[(i, i)] = s.s000[(i3, i2, i1)];
                    if i1 + 1 < n1 {
                        let v = s.s00p[(i3, i2, i1)];
                        a[(i, i + 1)] = v;
                        a[(i + 1, i)] = v;
                    }
                    if i2 + 1 < n2 {
                        if i1 > 0 {
                            let v = s.s0pm[(i3, i2, i1)];
                            a[(i, j - 1)] = v;
                            a[(j - 1, i)] = v;
                        }
                        let v = s.s0p0[(i3, i2, i1)];
                        a[(i, j)] = v;
                        a[(j, i)] = v;
                        if i1 + 1 < n1 {
                            let v = s.s0pp[(i3, i2, i1)];
                            a[(i, j + 1)] = v;
                            a[(j + 1, i)] = v;
                        }
                    }
                    if i3 + 1 < n3 {
                        if i2 > 0 {
                            let v = s.spm0[(i3, i2, i1)];
                            a[(i, k - n1)] = v;
                            a[(k - n1, i)] = v;
                        }
                        if i1 > 0 {
                            let v = s.sp0m[(i3, i2, i1)];
                            a[(i, k - 1)] = v;
                            a[(k - 1, i)] = v;
                        }
                        let v = s.sp00[(i3, i2, i1)];
                        a[(i, k)] = v;
                        a[(k, i)] = v;
                        if i1 + 1 < n1 {
                            let v = s.sp0p[(i3, i2, i1)];
                            a[(i, k + 1)] = v;
                            a[(k + 1, i)] = v;
                        }
                        if i2 + 1 < n2 {
                            let v = s.spp0[(i3, i2, i1)];
                            a[(i, k + n1)] = v;
                            a[(k + n1, i)] = v;
                        }
                    }
                    i += 1;
                }
            }
        }
        a
    }
}
