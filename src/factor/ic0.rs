//! In-place IC(0) attempt on the 19-point stencil footprint.
//!
//! One attempt copies the ten coefficient arrays, perturbs the diagonal by
//! (1+bias), and sweeps the grid in ascending lexicographic (i3, i2, i1)
//! order applying the Cholesky recurrence restricted to the stencil pattern:
//! the entry for offset d at sample p loses Σ d000[q]·L(p,q)·L(p+d,q) over
//! the earlier samples q whose connections to both p and p+d lie on the
//! footprint. Working out the pattern intersections leaves nine candidate
//! predecessor sites per sample and 28 product terms in total.
//!
//! The diagonal array doubles as scratch and result: ahead of the sweep
//! front it holds (biased) coefficients, at the front it holds the pivot,
//! and behind the front it holds the pivot's inverse. A non-positive pivot
//! aborts the attempt. A final pass scales the nine off-diagonal arrays by
//! the inverted diagonal, giving L its implicit unit diagonal.

use num_traits::Float;

use crate::field::Grid3;
use crate::stencil::Spd19Coeffs;

use super::FactorCoeffs;

struct Work<'a, T> {
    d000: &'a mut [T],
    l00p: &'a mut [T],
    l0pm: &'a mut [T],
    l0p0: &'a mut [T],
    l0pp: &'a mut [T],
    lpm0: &'a mut [T],
    lp0m: &'a mut [T],
    lp00: &'a mut [T],
    lp0p: &'a mut [T],
    lpp0: &'a mut [T],
}

/// One factorization attempt at the given bias. `None` means a non-positive
/// pivot was hit and the caller should retry with a larger bias.
pub(crate) fn attempt_ic0<T: Float>(s: &Spd19Coeffs<T>, bias: T) -> Option<FactorCoeffs<T>> {
    let grid = s.grid();
    let Grid3 { n1, n2, n3 } = grid;
    let s2 = n1;
    let s3 = n1 * n2;

    let mut d000 = s.s000.clone();
    let mut l00p = s.s00p.clone();
    let mut l0pm = s.s0pm.clone();
    let mut l0p0 = s.s0p0.clone();
    let mut l0pp = s.s0pp.clone();
    let mut lpm0 = s.spm0.clone();
    let mut lp0m = s.sp0m.clone();
    let mut lp00 = s.sp00.clone();
    let mut lp0p = s.sp0p.clone();
    let mut lpp0 = s.spp0.clone();
    if bias > T::zero() {
        d000.scale(T::one() + bias);
    }

    {
        let mut w = Work {
            d000: d000.as_mut_slice(),
            l00p: l00p.as_mut_slice(),
            l0pm: l0pm.as_mut_slice(),
            l0p0: l0p0.as_mut_slice(),
            l0pp: l0pp.as_mut_slice(),
            lpm0: lpm0.as_mut_slice(),
            lp0m: lp0m.as_mut_slice(),
            lp00: lp00.as_mut_slice(),
            lp0p: lp0p.as_mut_slice(),
            lpp0: lpp0.as_mut_slice(),
        };
        for i3 in 0..n3 {
            for i2 in 0..n2 {
                if n1 >= 2 && i2 >= 1 && i2 + 1 < n2 && i3 >= 1 {
                    // Every predecessor site is in range except at the two
                    // ends of the i1 run.
                    let Work {
                        d000: d,
                        l00p,
                        l0pm,
                        l0p0,
                        l0pp,
                        lpm0,
                        lp0m,
                        lp00,
                        lp0p,
                        lpp0,
                    } = &mut w;
                    let r = n1 * (i2 + n2 * i3);
                    {
                        let p = r;
                        let q2 = p - (s2 - 1);
                        let q3 = p - s2;
                        let q5 = p - (s3 - s2);
                        let q6 = p - (s3 - 1);
                        let q7 = p - s3;
                        let q9 = p - (s3 + s2);
                        d[p] = d[p]
                            - (d[q2] * l0pm[q2] * l0pm[q2]
                                + d[q3] * l0p0[q3] * l0p0[q3]
                                + d[q5] * lpm0[q5] * lpm0[q5]
                                + d[q6] * lp0m[q6] * lp0m[q6]
                                + d[q7] * lp00[q7] * lp00[q7]
                                + d[q9] * lpp0[q9] * lpp0[q9]);
                        l00p[p] = l00p[p]
                            - (d[q2] * l0p0[q2] * l0pm[q2]
                                + d[q3] * l0pp[q3] * l0p0[q3]
                                + d[q6] * lp00[q6] * lp0m[q6]
                                + d[q7] * lp0p[q7] * lp00[q7]);
                        l0pm[p] = l0pm[p] - d[q5] * lp0m[q5] * lpm0[q5];
                        l0p0[p] = l0p0[p]
                            - (d[q5] * lp00[q5] * lpm0[q5] + d[q7] * lpp0[q7] * lp00[q7]);
                        l0pp[p] = l0pp[p]
                            - (d[q6] * lpp0[q6] * lp0m[q6] + d[q5] * lp0p[q5] * lpm0[q5]);
                        lpm0[p] = lpm0[p]
                            - (d[q2] * lp0m[q2] * l0pm[q2] + d[q3] * lp00[q3] * l0p0[q3]);
                        lp00[p] = lp00[p] - d[q3] * lpp0[q3] * l0p0[q3];
                        lp0p[p] = lp0p[p] - d[q2] * lpp0[q2] * l0pm[q2];
                        if d[p] <= T::zero() {
                            return None;
                        }
                        d[p] = T::one() / d[p];
                    }
                    for i1 in 1..n1 - 1 {
                        let p = r + i1;
                        let q1 = p - 1;
                        let q2 = p - (s2 - 1);
                        let q3 = p - s2;
                        let q4 = p - (s2 + 1);
                        let q5 = p - (s3 - s2);
                        let q6 = p - (s3 - 1);
                        let q7 = p - s3;
                        let q8 = p - (s3 + 1);
                        let q9 = p - (s3 + s2);
                        d[p] = d[p]
                            - (d[q1] * l00p[q1] * l00p[q1]
                                + d[q2] * l0pm[q2] * l0pm[q2]
                                + d[q3] * l0p0[q3] * l0p0[q3]
                                + d[q4] * l0pp[q4] * l0pp[q4]
                                + d[q5] * lpm0[q5] * lpm0[q5]
                                + d[q6] * lp0m[q6] * lp0m[q6]
                                + d[q7] * lp00[q7] * lp00[q7]
                                + d[q8] * lp0p[q8] * lp0p[q8]
                                + d[q9] * lpp0[q9] * lpp0[q9]);
                        l00p[p] = l00p[p]
                            - (d[q2] * l0p0[q2] * l0pm[q2]
                                + d[q3] * l0pp[q3] * l0p0[q3]
                                + d[q6] * lp00[q6] * lp0m[q6]
                                + d[q7] * lp0p[q7] * lp00[q7]);
                        l0pm[p] = l0pm[p]
                            - (d[q1] * l0p0[q1] * l00p[q1]
                                + d[q8] * lpp0[q8] * lp0p[q8]
                                + d[q5] * lp0m[q5] * lpm0[q5]);
                        l0p0[p] = l0p0[p]
                            - (d[q1] * l0pp[q1] * l00p[q1]
                                + d[q5] * lp00[q5] * lpm0[q5]
                                + d[q7] * lpp0[q7] * lp00[q7]);
                        l0pp[p] = l0pp[p]
                            - (d[q6] * lpp0[q6] * lp0m[q6] + d[q5] * lp0p[q5] * lpm0[q5]);
                        lpm0[p] = lpm0[p]
                            - (d[q2] * lp0m[q2] * l0pm[q2]
                                + d[q3] * lp00[q3] * l0p0[q3]
                                + d[q4] * lp0p[q4] * l0pp[q4]);
                        lp0m[p] = lp0m[p]
                            - (d[q1] * lp00[q1] * l00p[q1] + d[q4] * lpp0[q4] * l0pp[q4]);
                        lp00[p] = lp00[p]
                            - (d[q1] * lp0p[q1] * l00p[q1] + d[q3] * lpp0[q3] * l0p0[q3]);
                        lp0p[p] = lp0p[p] - d[q2] * lpp0[q2] * l0pm[q2];
                        if d[p] <= T::zero() {
                            return None;
                        }
                        d[p] = T::one() / d[p];
                    }
                    {
                        let p = r + n1 - 1;
                        let q1 = p - 1;
                        let q3 = p - s2;
                        let q4 = p - (s2 + 1);
                        let q5 = p - (s3 - s2);
                        let q7 = p - s3;
                        let q8 = p - (s3 + 1);
                        let q9 = p - (s3 + s2);
                        d[p] = d[p]
                            - (d[q1] * l00p[q1] * l00p[q1]
                                + d[q3] * l0p0[q3] * l0p0[q3]
                                + d[q4] * l0pp[q4] * l0pp[q4]
                                + d[q5] * lpm0[q5] * lpm0[q5]
                                + d[q7] * lp00[q7] * lp00[q7]
                                + d[q8] * lp0p[q8] * lp0p[q8]
                                + d[q9] * lpp0[q9] * lpp0[q9]);
                        l00p[p] = l00p[p]
                            - (d[q3] * l0pp[q3] * l0p0[q3] + d[q7] * lp0p[q7] * lp00[q7]);
                        l0pm[p] = l0pm[p]
                            - (d[q1] * l0p0[q1] * l00p[q1]
                                + d[q8] * lpp0[q8] * lp0p[q8]
                                + d[q5] * lp0m[q5] * lpm0[q5]);
                        l0p0[p] = l0p0[p]
                            - (d[q1] * l0pp[q1] * l00p[q1]
                                + d[q5] * lp00[q5] * lpm0[q5]
                                + d[q7] * lpp0[q7] * lp00[q7]);
                        l0pp[p] = l0pp[p] - d[q5] * lp0p[q5] * lpm0[q5];
                        lpm0[p] = lpm0[p]
                            - (d[q3] * lp00[q3] * l0p0[q3] + d[q4] * lp0p[q4] * l0pp[q4]);
                        lp0m[p] = lp0m[p]
                            - (d[q1] * lp00[q1] * l00p[q1] + d[q4] * lpp0[q4] * l0pp[q4]);
                        lp00[p] = lp00[p]
                            - (d[q1] * lp0p[q1] * l00p[q1] + d[q3] * lpp0[q3] * l0p0[q3]);
                        if d[p] <= T::zero() {
                            return None;
                        }
                        d[p] = T::one() / d[p];
                    }
                } else {
                    for i1 in 0..n1 {
                        if !update_point(&mut w, n1, n2, i3, i2, i1) {
                            return None;
                        }
                    }
                }
            }
        }
    }

    // Fold the inverted diagonal into the off-diagonals so L carries a unit
    // diagonal implicitly and the solves avoid division.
    {
        let d = d000.as_slice();
        let arrays = [
            l00p.as_mut_slice(),
            l0pm.as_mut_slice(),
            l0p0.as_mut_slice(),
            l0pp.as_mut_slice(),
            lpm0.as_mut_slice(),
            lp0m.as_mut_slice(),
            lp00.as_mut_slice(),
            lp0p.as_mut_slice(),
            lpp0.as_mut_slice(),
        ];
        for a in arrays {
            for (v, &di) in a.iter_mut().zip(d) {
                *v = *v * di;
            }
        }
    }

    Some(FactorCoeffs { d000, l00p, l0pm, l0p0, l0pp, lpm0, lp0m, lp00, lp0p, lpp0 })
}

/// One sample of the elimination sweep, testing every predecessor's bounds.
/// Returns false on a non-positive pivot.
#[inline]
fn update_point<T: Float>(
    w: &mut Work<'_, T>,
    n1: usize,
    n2: usize,
    i3: usize,
    i2: usize,
    i1: usize,
) -> bool {
    let s2 = n1;
    let s3 = n1 * n2;
    let p = i1 + n1 * (i2 + n2 * i3);
    let Work { d000: d, l00p, l0pm, l0p0, l0pp, lpm0, lp0m, lp00, lp0p, lpp0 } = w;

    // Candidate predecessor sites, one per stored offset; a site contributes
    // only when its sample is inside the grid.
    let h1 = i1 > 0; // via 00p at p − 1
    let h2 = i2 > 0 && i1 + 1 < n1; // via 0pm at p − (s2−1)
    let h3 = i2 > 0; // via 0p0 at p − s2
    let h4 = i2 > 0 && i1 > 0; // via 0pp at p − (s2+1)
    let h5 = i3 > 0 && i2 + 1 < n2; // via pm0 at p − (s3−s2)
    let h6 = i3 > 0 && i1 + 1 < n1; // via p0m at p − (s3−1)
    let h7 = i3 > 0; // via p00 at p − s3
    let h8 = i3 > 0 && i1 > 0; // via p0p at p − (s3+1)
    let h9 = i3 > 0 && i2 > 0; // via pp0 at p − (s3+s2)

    let mut t = T::zero();
    if h1 {
        let q = p - 1;
        t = t + d[q] * l00p[q] * l00p[q];
    }
    if h2 {
        let q = p - (s2 - 1);
        t = t + d[q] * l0pm[q] * l0pm[q];
    }
    if h3 {
        let q = p - s2;
        t = t + d[q] * l0p0[q] * l0p0[q];
    }
    if h4 {
        let q = p - (s2 + 1);
        t = t + d[q] * l0pp[q] * l0pp[q];
    }
    if h5 {
        let q = p - (s3 - s2);
        t = t + d[q] * lpm0[q] * lpm0[q];
    }
    if h6 {
        let q = p - (s3 - 1);
        t = t + d[q] * lp0m[q] * lp0m[q];
    }
    if h7 {
        let q = p - s3;
        t = t + d[q] * lp00[q] * lp00[q];
    }
    if h8 {
        let q = p - (s3 + 1);
        t = t + d[q] * lp0p[q] * lp0p[q];
    }
    if h9 {
        let q = p - (s3 + s2);
        t = t + d[q] * lpp0[q] * lpp0[q];
    }
    d[p] = d[p] - t;

    let mut t = T::zero();
    if h2 {
        let q = p - (s2 - 1);
        t = t + d[q] * l0p0[q] * l0pm[q];
    }
    if h3 {
        let q = p - s2;
        t = t + d[q] * l0pp[q] * l0p0[q];
    }
    if h6 {
        let q = p - (s3 - 1);
        t = t + d[q] * lp00[q] * lp0m[q];
    }
    if h7 {
        let q = p - s3;
        t = t + d[q] * lp0p[q] * lp00[q];
    }
    l00p[p] = l00p[p] - t;

    let mut t = T::zero();
    if h1 {
        let q = p - 1;
        t = t + d[q] * l0p0[q] * l00p[q];
    }
    if h8 {
        let q = p - (s3 + 1);
        t = t + d[q] * lpp0[q] * lp0p[q];
    }
    if h5 {
        let q = p - (s3 - s2);
        t = t + d[q] * lp0m[q] * lpm0[q];
    }
    l0pm[p] = l0pm[p] - t;

    let mut t = T::zero();
    if h1 {
        let q = p - 1;
        t = t + d[q] * l0pp[q] * l00p[q];
    }
    if h5 {
        let q = p - (s3 - s2);
        t = t + d[q] * lp00[q] * lpm0[q];
    }
    if h7 {
        let q = p - s3;
        t = t + d[q] * lpp0[q] * lp00[q];
    }
    l0p0[p] = l0p0[p] - t;

    let mut t = T::zero();
    if h6 {
        let q = p - (s3 - 1);
        t = t + d[q] * lpp0[q] * lp0m[q];
    }
    if h5 {
        let q = p - (s3 - s2);
        t = t + d[q] * lp0p[q] * lpm0[q];
    }
    l0pp[p] = l0pp[p] - t;

    let mut t = T::zero();
    if h2 {
        let q = p - (s2 - 1);
        t = t + d[q] * lp0m[q] * l0pm[q];
    }
    if h3 {
        let q = p - s2;
        t = t + d[q] * lp00[q] * l0p0[q];
    }
    if h4 {
        let q = p - (s2 + 1);
        t = t + d[q] * lp0p[q] * l0pp[q];
    }
    lpm0[p] = lpm0[p] - t;

    let mut t = T::zero();
    if h1 {
        let q = p - 1;
        t = t + d[q] * lp00[q] * l00p[q];
    }
    if h4 {
        let q = p - (s2 + 1);
        t = t + d[q] * lpp0[q] * l0pp[q];
    }
    lp0m[p] = lp0m[p] - t;

    let mut t = T::zero();
    if h1 {
        let q = p - 1;
        t = t + d[q] * lp0p[q] * l00p[q];
    }
    if h3 {
        let q = p - s2;
        t = t + d[q] * lpp0[q] * l0p0[q];
    }
    lp00[p] = lp00[p] - t;

    if h2 {
        let q = p - (s2 - 1);
        lp0p[p] = lp0p[p] - d[q] * lpp0[q] * l0pm[q];
    }

    if d[p] <= T::zero() {
        return false;
    }
    d[p] = T::one() / d[p];
    true
}
