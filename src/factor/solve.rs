//! Triangular solves over the IC(0) factors.
//!
//! With L unit-lower-triangular (implicitly, the stored off-diagonals are
//! pre-scaled by d000) and d000 holding 1/D, solving (L·D·Lᵀ)·x = b is a
//! forward substitution sweeping ascending lexicographic order followed by a
//! combined diagonal-scale and transpose solve sweeping descending order.
//! Applying L·D·Lᵀ itself runs the two passes the other way around.

use num_traits::Float;

use crate::field::{Field3, Grid3};

use super::FactorCoeffs;

/// Solves (L·D·Lᵀ)·x = b, the approximate inverse of the filter.
pub(crate) fn solve_with_factors<T: Float>(
    f: &FactorCoeffs<T>,
    b: &Field3<T>,
    x: &mut Field3<T>,
) {
    let Grid3 { n1, n2, n3 } = f.grid();
    let s2 = n1;
    let s3 = n1 * n2;

    // Solve L z = b; z accumulates in x, which collects the scatters from
    // every earlier sample before its own right-hand side lands.
    x.zero();
    {
        let b = b.as_slice();
        let x = x.as_mut_slice();
        let l00p = f.l00p.as_slice();
        let l0pm = f.l0pm.as_slice();
        let l0p0 = f.l0p0.as_slice();
        let l0pp = f.l0pp.as_slice();
        let lpm0 = f.lpm0.as_slice();
        let lp0m = f.lp0m.as_slice();
        let lp00 = f.lp00.as_slice();
        let lp0p = f.lp0p.as_slice();
        let lpp0 = f.lpp0.as_slice();
        for i3 in 0..n3 {
            for i2 in 0..n2 {
                if n1 >= 2 && i2 >= 1 && i2 + 1 < n2 && i3 + 1 < n3 {
                    let r = n1 * (i2 + n2 * i3);
                    {
                        let p = r;
                        x[p] = x[p] + b[p];
                        let xi = x[p];
                        x[p + 1] = x[p + 1] - l00p[p] * xi;
                        x[p + s2] = x[p + s2] - l0p0[p] * xi;
                        x[p + s2 + 1] = x[p + s2 + 1] - l0pp[p] * xi;
                        x[p + s3 - s2] = x[p + s3 - s2] - lpm0[p] * xi;
                        x[p + s3] = x[p + s3] - lp00[p] * xi;
                        x[p + s3 + 1] = x[p + s3 + 1] - lp0p[p] * xi;
                        x[p + s3 + s2] = x[p + s3 + s2] - lpp0[p] * xi;
                    }
                    for i1 in 1..n1 - 1 {
                        let p = r + i1;
                        x[p] = x[p] + b[p];
                        let xi = x[p];
                        x[p + 1] = x[p + 1] - l00p[p] * xi;
                        x[p + s2 - 1] = x[p + s2 - 1] - l0pm[p] * xi;
                        x[p + s2] = x[p + s2] - l0p0[p] * xi;
                        x[p + s2 + 1] = x[p + s2 + 1] - l0pp[p] * xi;
                        x[p + s3 - s2] = x[p + s3 - s2] - lpm0[p] * xi;
                        x[p + s3 - 1] = x[p + s3 - 1] - lp0m[p] * xi;
                        x[p + s3] = x[p + s3] - lp00[p] * xi;
                        x[p + s3 + 1] = x[p + s3 + 1] - lp0p[p] * xi;
                        x[p + s3 + s2] = x[p + s3 + s2] - lpp0[p] * xi;
                    }
                    {
                        let p = r + n1 - 1;
                        x[p] = x[p] + b[p];
                        let xi = x[p];
                        x[p + s2 - 1] = x[p + s2 - 1] - l0pm[p] * xi;
                        x[p + s2] = x[p + s2] - l0p0[p] * xi;
                        x[p + s3 - s2] = x[p + s3 - s2] - lpm0[p] * xi;
                        x[p + s3 - 1] = x[p + s3 - 1] - lp0m[p] * xi;
                        x[p + s3] = x[p + s3] - lp00[p] * xi;
                        x[p + s3 + s2] = x[p + s3 + s2] - lpp0[p] * xi;
                    }
                } else {
                    for i1 in 0..n1 {
                        forward_point(f, b, x, i3, i2, i1);
                    }
                }
            }
        }
    }

    // Solve D y = z and Lᵀ x = y in one descending sweep.
    {
        let x = x.as_mut_slice();
        let d000 = f.d000.as_slice();
        let l00p = f.l00p.as_slice();
        let l0pm = f.l0pm.as_slice();
        let l0p0 = f.l0p0.as_slice();
        let l0pp = f.l0pp.as_slice();
        let lpm0 = f.lpm0.as_slice();
        let lp0m = f.lp0m.as_slice();
        let lp00 = f.lp00.as_slice();
        let lp0p = f.lp0p.as_slice();
        let lpp0 = f.lpp0.as_slice();
        for i3 in (0..n3).rev() {
            for i2 in (0..n2).rev() {
                if n1 >= 2 && i2 >= 1 && i2 + 1 < n2 && i3 + 1 < n3 {
                    let r = n1 * (i2 + n2 * i3);
                    {
                        let p = r + n1 - 1;
                        x[p] = d000[p] * x[p]
                            - l0pm[p] * x[p + s2 - 1]
                            - l0p0[p] * x[p + s2]
                            - lpm0[p] * x[p + s3 - s2]
                            - lp0m[p] * x[p + s3 - 1]
                            - lp00[p] * x[p + s3]
                            - lpp0[p] * x[p + s3 + s2];
                    }
                    for i1 in (1..n1 - 1).rev() {
                        let p = r + i1;
                        x[p] = d000[p] * x[p]
                            - l00p[p] * x[p + 1]
                            - l0pm[p] * x[p + s2 - 1]
                            - l0p0[p] * x[p + s2]
                            - l0pp[p] * x[p + s2 + 1]
                            - lpm0[p] * x[p + s3 - s2]
                            - lp0m[p] * x[p + s3 - 1]
                            - lp00[p] * x[p + s3]
                            - lp0p[p] * x[p + s3 + 1]
                            - lpp0[p] * x[p + s3 + s2];
                    }
                    {
                        let p = r;
                        x[p] = d000[p] * x[p]
                            - l00p[p] * x[p + 1]
                            - l0p0[p] * x[p + s2]
                            - l0pp[p] * x[p + s2 + 1]
                            - lpm0[p] * x[p + s3 - s2]
                            - lp00[p] * x[p + s3]
                            - lp0p[p] * x[p + s3 + 1]
                            - lpp0[p] * x[p + s3 + s2];
                    }
                } else {
                    for i1 in (0..n1).rev() {
                        backward_point(f, x, i3, i2, i1);
                    }
                }
            }
        }
    }
}

/// Computes y = L·D·Lᵀ·x, the factored approximation of the filter.
/// For verification, so both passes take the bounds-tested path.
pub(crate) fn apply_factors<T: Float>(f: &FactorCoeffs<T>, x: &Field3<T>, y: &mut Field3<T>) {
    let Grid3 { n1, n2, n3 } = f.grid();
    let s2 = n1;
    let s3 = n1 * n2;
    let xs = x.as_slice();
    let ys = y.as_mut_slice();
    let d000 = f.d000.as_slice();
    let l00p = f.l00p.as_slice();
    let l0pm = f.l0pm.as_slice();
    let l0p0 = f.l0p0.as_slice();
    let l0pp = f.l0pp.as_slice();
    let lpm0 = f.lpm0.as_slice();
    let lp0m = f.lp0m.as_slice();
    let lp00 = f.lp00.as_slice();
    let lp0p = f.lp0p.as_slice();
    let lpp0 = f.lpp0.as_slice();

    // y = Lᵀ x: gather from the forward neighbors.
    for i3 in 0..n3 {
        for i2 in 0..n2 {
            for i1 in 0..n1 {
                let p = i1 + n1 * (i2 + n2 * i3);
                let mut yi = xs[p];
                if i1 + 1 < n1 {
                    yi = yi + xs[p + 1] * l00p[p];
                }
                if i2 + 1 < n2 {
                    if i1 > 0 {
                        yi = yi + xs[p + s2 - 1] * l0pm[p];
                    }
                    yi = yi + xs[p + s2] * l0p0[p];
                    if i1 + 1 < n1 {
                        yi = yi + xs[p + s2 + 1] * l0pp[p];
                    }
                }
                if i3 + 1 < n3 {
                    if i2 > 0 {
                        yi = yi + xs[p + s3 - s2] * lpm0[p];
                    }
                    if i1 > 0 {
                        yi = yi + xs[p + s3 - 1] * lp0m[p];
                    }
                    yi = yi + xs[p + s3] * lp00[p];
                    if i1 + 1 < n1 {
                        yi = yi + xs[p + s3 + 1] * lp0p[p];
                    }
                    if i2 + 1 < n2 {
                        yi = yi + xs[p + s3 + s2] * lpp0[p];
                    }
                }
                ys[p] = yi;
            }
        }
    }

    // y = L·D·y: dividing by d000 multiplies by D, since d000 stores 1/D.
    for i3 in (0..n3).rev() {
        for i2 in (0..n2).rev() {
            for i1 in (0..n1).rev() {
                let p = i1 + n1 * (i2 + n2 * i3);
                ys[p] = ys[p] / d000[p];
                let yi = ys[p];
                if i1 + 1 < n1 {
                    ys[p + 1] = ys[p + 1] + l00p[p] * yi;
                }
                if i2 + 1 < n2 {
                    if i1 > 0 {
                        ys[p + s2 - 1] = ys[p + s2 - 1] + l0pm[p] * yi;
                    }
                    ys[p + s2] = ys[p + s2] + l0p0[p] * yi;
                    if i1 + 1 < n1 {
                        ys[p + s2 + 1] = ys[p + s2 + 1] + l0pp[p] * yi;
                    }
                }
                if i3 + 1 < n3 {
                    if i2 > 0 {
                        ys[p + s3 - s2] = ys[p + s3 - s2] + lpm0[p] * yi;
                    }
                    if i1 > 0 {
                        ys[p + s3 - 1] = ys[p + s3 - 1] + lp0m[p] * yi;
                    }
                    ys[p + s3] = ys[p + s3] + lp00[p] * yi;
                    if i1 + 1 < n1 {
                        ys[p + s3 + 1] = ys[p + s3 + 1] + lp0p[p] * yi;
                    }
                    if i2 + 1 < n2 {
                        ys[p + s3 + s2] = ys[p + s3 + s2] + lpp0[p] * yi;
                    }
                }
            }
        }
    }
}

/// One sample of the forward substitution, testing every offset's bounds.
#[inline]
fn forward_point<T: Float>(
    f: &FactorCoeffs<T>,
    b: &[T],
    x: &mut [T],
    i3: usize,
    i2: usize,
    i1: usize,
) {
    let Grid3 { n1, n2, n3 } = f.grid();
    let s2 = n1;
    let s3 = n1 * n2;
    let p = i1 + n1 * (i2 + n2 * i3);
    x[p] = x[p] + b[p];
    let xi = x[p];
    if i1 + 1 < n1 {
        x[p + 1] = x[p + 1] - f.l00p.as_slice()[p] * xi;
    }
    if i2 + 1 < n2 {
        if i1 > 0 {
            x[p + s2 - 1] = x[p + s2 - 1] - f.l0pm.as_slice()[p] * xi;
        }
        x[p + s2] = x[p + s2] - f.l0p0.as_slice()[p] * xi;
        if i1 + 1 < n1 {
            x[p + s2 + 1] = x[p + s2 + 1] - f.l0pp.as_slice()[p] * xi;
        }
    }
    if i3 + 1 < n3 {
        if i2 > 0 {
            x[p + s3 - s2] = x[p + s3 - s2] - f.lpm0.as_slice()[p] * xi;
        }
        if i1 > 0 {
            x[p + s3 - 1] = x[p + s3 - 1] - f.lp0m.as_slice()[p] * xi;
        }
        x[p + s3] = x[p + s3] - f.lp00.as_slice()[p] * xi;
        if i1 + 1 < n1 {
            x[p + s3 + 1] = x[p + s3 + 1] - f.lp0p.as_slice()[p] * xi;
        }
        if i2 + 1 < n2 {
            x[p + s3 + s2] = x[p + s3 + s2] - f.lpp0.as_slice()[p] * xi;
        }
    }
}

/// One sample of the combined D and Lᵀ pass, testing every offset's bounds.
#[inline]
fn backward_point<T: Float>(f: &FactorCoeffs<T>, x: &mut [T], i3: usize, i2: usize, i1: usize) {
    let Grid3 { n1, n2, n3 } = f.grid();
    let s2 = n1;
    let s3 = n1 * n2;
    let p = i1 + n1 * (i2 + n2 * i3);
    let mut xi = f.d000.as_slice()[p] * x[p];
    if i1 + 1 < n1 {
        xi = xi - f.l00p.as_slice()[p] * x[p + 1];
    }
    if i2 + 1 < n2 {
        if i1 > 0 {
            xi = xi - f.l0pm.as_slice()[p] * x[p + s2 - 1];
        }
        xi = xi - f.l0p0.as_slice()[p] * x[p + s2];
        if i1 + 1 < n1 {
            xi = xi - f.l0pp.as_slice()[p] * x[p + s2 + 1];
        }
    }
    if i3 + 1 < n3 {
        if i2 > 0 {
            xi = xi - f.lpm0.as_slice()[p] * x[p + s3 - s2];
        }
        if i1 > 0 {
            xi = xi - f.lp0m.as_slice()[p] * x[p + s3 - 1];
        }
        xi = xi - f.lp00.as_slice()[p] * x[p + s3];
        if i1 + 1 < n1 {
            xi = xi - f.lp0p.as_slice()[p] * x[p + s3 + 1];
        }
        if i2 + 1 < n2 {
            xi = xi - f.lpp0.as_slice()[p] * x[p + s3 + s2];
        }
    }
    x[p] = xi;
}
