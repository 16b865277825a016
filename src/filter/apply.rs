//! Forward application of the 19-point stencil operator.
//!
//! The symmetric half of the stencil is applied by scattering both ways:
//! each stored coefficient s_d at sample p contributes s_d·x[p+d] to y[p]
//! and s_d·x[p] to y[p+d], so every coefficient is fetched once and the
//! nine unstored mirror offsets never materialize. The grid is traversed in
//! descending lexicographic (i3, i2, i1) order; y[p] is assembled in a local
//! accumulator and stored exactly once, and every scatter lands on a slot
//! that a previous iteration already assigned.

use num_traits::Float;

use crate::field::{Field3, Grid3};
use crate::stencil::Spd19Coeffs;

/// Computes y = A·x.
pub(crate) fn apply_filter<T: Float>(s: &Spd19Coeffs<T>, x: &Field3<T>, y: &mut Field3<T>) {
    let Grid3 { n1, n2, n3 } = s.grid();
    let s2 = n1;
    let s3 = n1 * n2;
    let s000 = s.s000.as_slice();
    let s00p = s.s00p.as_slice();
    let s0pm = s.s0pm.as_slice();
    let s0p0 = s.s0p0.as_slice();
    let s0pp = s.s0pp.as_slice();
    let spm0 = s.spm0.as_slice();
    let sp0m = s.sp0m.as_slice();
    let sp00 = s.sp00.as_slice();
    let sp0p = s.sp0p.as_slice();
    let spp0 = s.spp0.as_slice();
    let x = x.as_slice();
    let y = y.as_mut_slice();
    for i3 in (0..n3).rev() {
        for i2 in (0..n2).rev() {
            if n1 >= 2 && i2 >= 1 && i2 + 1 < n2 && i3 + 1 < n3 {
                // Only the two ends of the i1 run need bounds care.
                let r = n1 * (i2 + n2 * i3);
                {
                    let p = r + n1 - 1;
                    let xp = x[p];
                    let mut yp = s000[p] * xp;
                    let c = s0pm[p];
                    yp = yp + c * x[p + s2 - 1];
                    y[p + s2 - 1] = y[p + s2 - 1] + c * xp;
                    let c = s0p0[p];
                    yp = yp + c * x[p + s2];
                    y[p + s2] = y[p + s2] + c * xp;
                    let c = spm0[p];
                    yp = yp + c * x[p + s3 - s2];
                    y[p + s3 - s2] = y[p + s3 - s2] + c * xp;
                    let c = sp0m[p];
                    yp = yp + c * x[p + s3 - 1];
                    y[p + s3 - 1] = y[p + s3 - 1] + c * xp;
                    let c = sp00[p];
                    yp = yp + c * x[p + s3];
                    y[p + s3] = y[p + s3] + c * xp;
                    let c = spp0[p];
                    yp = yp + c * x[p + s3 + s2];
                    y[p + s3 + s2] = y[p + s3 + s2] + c * xp;
                    y[p] = yp;
                }
                for i1 in (1..n1 - 1).rev() {
                    let p = r + i1;
                    let xp = x[p];
                    let mut yp = s000[p] * xp;
                    let c = s00p[p];
                    yp = yp + c * x[p + 1];
                    y[p + 1] = y[p + 1] + c * xp;
                    let c = s0pm[p];
                    yp = yp + c * x[p + s2 - 1];
                    y[p + s2 - 1] = y[p + s2 - 1] + c * xp;
                    let c = s0p0[p];
                    yp = yp + c * x[p + s2];
                    y[p + s2] = y[p + s2] + c * xp;
                    let c = s0pp[p];
                    yp = yp + c * x[p + s2 + 1];
                    y[p + s2 + 1] = y[p + s2 + 1] + c * xp;
                    let c = spm0[p];
                    yp = yp + c * x[p + s3 - s2];
                    y[p + s3 - s2] = y[p + s3 - s2] + c * xp;
                    let c = sp0m[p];
                    yp = yp + c * x[p + s3 - 1];
                    y[p + s3 - 1] = y[p + s3 - 1] + c * xp;
                    let c = sp00[p];
                    yp = yp + c * x[p + s3];
                    y[p + s3] = y[p + s3] + c * xp;
                    let c = sp0p[p];
                    yp = yp + c * x[p + s3 + 1];
                    y[p + s3 + 1] = y[p + s3 + 1] + c * xp;
                    let c = spp0[p];
                    yp = yp + c * x[p + s3 + s2];
                    y[p + s3 + s2] = y[p + s3 + s2] + c * xp;
                    y[p] = yp;
                }
                {
                    let p = r;
                    let xp = x[p];
                    let mut yp = s000[p] * xp;
                    let c = s00p[p];
                    yp = yp + c * x[p + 1];
                    y[p + 1] = y[p + 1] + c * xp;
                    let c = s0p0[p];
                    yp = yp + c * x[p + s2];
                    y[p + s2] = y[p + s2] + c * xp;
                    let c = s0pp[p];
                    yp = yp + c * x[p + s2 + 1];
                    y[p + s2 + 1] = y[p + s2 + 1] + c * xp;
                    let c = spm0[p];
                    yp = yp + c * x[p + s3 - s2];
                    y[p + s3 - s2] = y[p + s3 - s2] + c * xp;
                    let c = sp00[p];
                    yp = yp + c * x[p + s3];
                    y[p + s3] = y[p + s3] + c * xp;
                    let c = sp0p[p];
                    yp = yp + c * x[p + s3 + 1];
                    y[p + s3 + 1] = y[p + s3 + 1] + c * xp;
                    let c = spp0[p];
                    yp = yp + c * x[p + s3 + s2];
                    y[p + s3 + s2] = y[p + s3 + s2] + c * xp;
                    y[p] = yp;
                }
            } else {
                for i1 in (0..n1).rev() {
                    apply_point(s, x, y, i3, i2, i1);
                }
            }
        }
    }
}

/// One sample of the scatter pass, testing every offset's bounds.
#[inline]
fn apply_point<T: Float>(
    s: &Spd19Coeffs<T>,
    x: &[T],
    y: &mut [T],
    i3: usize,
    i2: usize,
    i1: usize,
) {
    let Grid3 { n1, n2, n3 } = s.grid();
    let s2 = n1;
    let s3 = n1 * n2;
    let p = i1 + n1 * (i2 + n2 * i3);
    let xp = x[p];
    let mut yp = s.s000.as_slice()[p] * xp;
    if i1 + 1 < n1 {
        let c = s.s00p.as_slice()[p];
        yp = yp + c * x[p + 1];
        y[p + 1] = y[p + 1] + c * xp;
    }
    if i2 + 1 < n2 {
        if i1 > 0 {
            let c = s.s0pm.as_slice()[p];
            yp = yp + c * x[p + s2 - 1];
            y[p + s2 - 1] = y[p + s2 - 1] + c * xp;
        }
        let c = s.s0p0.as_slice()[p];
        yp = yp + c * x[p + s2];
        y[p + s2] = y[p + s2] + c * xp;
        if i1 + 1 < n1 {
            let c = s.s0pp.as_slice()[p];
            yp = yp + c * x[p + s2 + 1];
            y[p + s2 + 1] = y[p + s2 + 1] + c * xp;
        }
    }
    if i3 + 1 < n3 {
        if i2 > 0 {
            let c = s.spm0.as_slice()[p];
            yp = yp + c * x[p + s3 - s2];
            y[p + s3 - s2] = y[p + s3 - s2] + c * xp;
        }
        if i1 > 0 {
            let c = s.sp0m.as_slice()[p];
            yp = yp + c * x[p + s3 - 1];
            y[p + s3 - 1] = y[p + s3 - 1] + c * xp;
        }
        let c = s.sp00.as_slice()[p];
        yp = yp + c * x[p + s3];
        y[p + s3] = y[p + s3] + c * xp;
        if i1 + 1 < n1 {
            let c = s.sp0p.as_slice()[p];
            yp = yp + c * x[p + s3 + 1];
            y[p + s3 + 1] = y[p + s3 + 1] + c * xp;
        }
        if i2 + 1 < n2 {
            let c = s.spp0.as_slice()[p];
            yp = yp + c * x[p + s3 + s2];
            y[p + s3 + s2] = y[p + s3 + s2] + c * xp;
        }
    }
    y[p] = yp;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs(grid: Grid3) -> Spd19Coeffs<f64> {
        let off = |k: usize| {
            move |i3: usize, i2: usize, i1: usize| {
                -0.9 + 0.07 * (((i1 + 5 * i2 + 2 * i3 + k) % 8) as f64)
            }
        };
        let s000 = Field3::from_fn(grid, |i3, i2, i1| {
            18.0 + 0.3 * (((2 * i1 + i2 + i3) % 5) as f64)
        });
        Spd19Coeffs::new([
            s000,
            Field3::from_fn(grid, off(1)),
            Field3::from_fn(grid, off(2)),
            Field3::from_fn(grid, off(3)),
            Field3::from_fn(grid, off(4)),
            Field3::from_fn(grid, off(5)),
            Field3::from_fn(grid, off(6)),
            Field3::from_fn(grid, off(7)),
            Field3::from_fn(grid, off(8)),
            Field3::from_fn(grid, off(9)),
        ])
        .unwrap()
    }

    #[test]
    fn fast_and_general_paths_agree_bitwise() {
        let grid = Grid3::new(6, 4, 3);
        let s = coeffs(grid);
        let x = Field3::from_fn(grid, |i3, i2, i1| {
            (((5 * i1 + 3 * i2 + 7 * i3) % 11) as f64) / 11.0 - 0.5
        });
        let mut y_fast = Field3::zeros(grid);
        let mut y_slow = Field3::zeros(grid);
        apply_filter(&s, &x, &mut y_fast);
        for i3 in (0..grid.n3).rev() {
            for i2 in (0..grid.n2).rev() {
                for i1 in (0..grid.n1).rev() {
                    apply_point(&s, x.as_slice(), y_slow.as_mut_slice(), i3, i2, i1);
                }
            }
        }
        assert_eq!(y_fast.as_slice(), y_slow.as_slice());
    }

    #[test]
    fn single_sample_grid_scales_by_the_center_coefficient() {
        let grid = Grid3::new(1, 1, 1);
        let s = coeffs(grid);
        let x = Field3::filled(grid, 3.0);
        let mut y = Field3::zeros(grid);
        apply_filter(&s, &x, &mut y);
        assert_eq!(y[(0, 0, 0)], s.s000[(0, 0, 0)] * 3.0);
    }
}
