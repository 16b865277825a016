//! Operator-level properties of the SPD 19-point stencil filter: dense
//! correspondence, symmetry, and the mutual-inverse laws of the factored
//! operator and its solve.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spdfil::{Field3, Grid3, MatVec, Preconditioner, Spd19Coeffs, Spd19Filter};

fn random_field(grid: Grid3, rng: &mut ChaCha8Rng) -> Field3<f64> {
    Field3::from_fn(grid, |_, _, _| rng.gen_range(-1.0..1.0))
}

/// Diagonally dominant, hence SPD: nine stored off-diagonals in (−1, 0],
/// center large enough to dominate all eighteen neighbors.
fn random_spd_coeffs(grid: Grid3, rng: &mut ChaCha8Rng) -> Spd19Coeffs<f64> {
    let mut arrays = Vec::with_capacity(10);
    arrays.push(Field3::from_fn(grid, |_, _, _| 19.0 + rng.gen::<f64>()));
    for _ in 0..9 {
        arrays.push(Field3::from_fn(grid, |_, _, _| -rng.gen::<f64>()));
    }
    let arrays: [Field3<f64>; 10] = arrays.try_into().unwrap();
    Spd19Coeffs::new(arrays).unwrap()
}

#[test]
fn dense_projection_is_symmetric_and_matches_apply() {
    let grid = Grid3::new(4, 3, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let filter = Spd19Filter::new(random_spd_coeffs(grid, &mut rng));
    let a = filter.to_dense();
    let n = grid.len();
    for i in 0..n {
        for j in 0..n {
            assert_eq!(a[(i, j)], a[(j, i)], "asymmetry at ({i}, {j})");
        }
    }
    let x = random_field(grid, &mut rng);
    let mut y = Field3::zeros(grid);
    filter.apply(&x, &mut y).unwrap();
    let xs = x.as_slice();
    for i in 0..n {
        let mut expected = 0.0;
        for j in 0..n {
            expected += a[(i, j)] * xs[j];
        }
        assert!(
            (y.as_slice()[i] - expected).abs() < 1e-12,
            "row {i}: {} vs {expected}",
            y.as_slice()[i]
        );
    }
}

#[test]
fn apply_is_symmetric_in_the_inner_product() {
    let grid = Grid3::new(5, 4, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let filter = Spd19Filter::new(random_spd_coeffs(grid, &mut rng));
    let x = random_field(grid, &mut rng);
    let y = random_field(grid, &mut rng);
    let mut ax = Field3::zeros(grid);
    let mut ay = Field3::zeros(grid);
    filter.apply(&x, &mut ax).unwrap();
    filter.apply(&y, &mut ay).unwrap();
    let lhs = ax.dot(&y);
    let rhs = x.dot(&ay);
    assert!((lhs - rhs).abs() < 1e-12 * lhs.abs().max(1.0), "{lhs} vs {rhs}");
}

#[test]
fn factored_operator_and_inverse_are_mutual_inverses() {
    let grid = Grid3::new(5, 4, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let filter = Spd19Filter::new(random_spd_coeffs(grid, &mut rng));
    let x = random_field(grid, &mut rng);

    let mut z = Field3::zeros(grid);
    let mut w = Field3::zeros(grid);
    filter.apply_approximate(&x, &mut z).unwrap();
    filter.apply_approximate_inverse(&z, &mut w).unwrap();
    assert!(w.sub(&x).norm_inf() < 1e-10, "solve ∘ apply ≠ id");

    filter.apply_approximate_inverse(&x, &mut z).unwrap();
    filter.apply_approximate(&z, &mut w).unwrap();
    assert!(w.sub(&x).norm_inf() < 1e-10, "apply ∘ solve ≠ id");
}

#[test]
fn operations_do_not_mutate_their_inputs() {
    let grid = Grid3::new(4, 4, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let filter = Spd19Filter::new(random_spd_coeffs(grid, &mut rng));
    let coeffs_before: Vec<Vec<f64>> = filter
        .coeffs()
        .arrays()
        .iter()
        .map(|f| f.as_slice().to_vec())
        .collect();
    let x = random_field(grid, &mut rng);
    let x_before = x.clone();
    let mut out = Field3::zeros(grid);
    filter.apply(&x, &mut out).unwrap();
    filter.apply_approximate(&x, &mut out).unwrap();
    filter.apply_approximate_inverse(&x, &mut out).unwrap();
    assert_eq!(x, x_before);
    let coeffs_after: Vec<Vec<f64>> = filter
        .coeffs()
        .arrays()
        .iter()
        .map(|f| f.as_slice().to_vec())
        .collect();
    assert_eq!(coeffs_before, coeffs_after);
}

#[test]
fn trait_seams_delegate_to_the_inherent_operations() {
    let grid = Grid3::new(3, 3, 3);
    let mut rng = ChaCha8Rng::seed_from_u64(19);
    let filter = Spd19Filter::new(random_spd_coeffs(grid, &mut rng));
    let x = random_field(grid, &mut rng);

    let mut direct = Field3::zeros(grid);
    let mut via_trait = Field3::zeros(grid);
    filter.apply(&x, &mut direct).unwrap();
    filter.matvec(&x, &mut via_trait).unwrap();
    assert_eq!(direct, via_trait);

    filter.apply_approximate_inverse(&x, &mut direct).unwrap();
    <Spd19Filter<f64> as Preconditioner<Field3<f64>>>::apply(&filter, &x, &mut via_trait)
        .unwrap();
    assert_eq!(direct, via_trait);
}

#[test]
fn single_precision_filter_round_trips() {
    let grid = Grid3::new(4, 3, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let mut arrays = Vec::with_capacity(10);
    arrays.push(Field3::from_fn(grid, |_, _, _| 19.0f32 + rng.gen::<f32>()));
    for _ in 0..9 {
        arrays.push(Field3::from_fn(grid, |_, _, _| -rng.gen::<f32>()));
    }
    let arrays: [Field3<f32>; 10] = arrays.try_into().unwrap();
    let filter = Spd19Filter::new(Spd19Coeffs::new(arrays).unwrap());
    let x = Field3::from_fn(grid, |_, _, _| rng.gen_range(-1.0f32..1.0));
    let mut z = Field3::zeros(grid);
    let mut w = Field3::zeros(grid);
    filter.apply_approximate(&x, &mut z).unwrap();
    filter.apply_approximate_inverse(&z, &mut w).unwrap();
    assert!(w.sub(&x).norm_inf() < 1e-3);
}
