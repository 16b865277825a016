use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spdfil::{Field3, Grid3, Spd19Coeffs, Spd19Filter};

fn filter(grid: Grid3) -> Spd19Filter<f64> {
    let off = |k: usize| {
        move |i3: usize, i2: usize, i1: usize| {
            -1.0 + 0.04 * (((i1 + 2 * i2 + 3 * i3 + 5 * k) % 11) as f64)
        }
    };
    let s000 = Field3::from_fn(grid, |i3, i2, i1| 19.0 + ((i1 + i2 + i3) % 3) as f64);
    let coeffs = Spd19Coeffs::new([
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
    .unwrap();
    Spd19Filter::new(coeffs)
}

fn bench_stencil(c: &mut Criterion) {
    let grid = Grid3::new(48, 48, 48);
    let f = filter(grid);
    let x = Field3::from_fn(grid, |i3, i2, i1| ((i1 * 31 + i2 * 17 + i3 * 7) % 101) as f64);
    let mut y = Field3::zeros(grid);

    c.bench_function("apply 48^3", |ben| {
        ben.iter(|| f.apply(black_box(&x), black_box(&mut y)).unwrap())
    });

    // Factor once up front so the solve benchmark measures the solve alone.
    f.apply_approximate_inverse(&x, &mut y).unwrap();
    c.bench_function("approximate inverse 48^3", |ben| {
        ben.iter(|| {
            f.apply_approximate_inverse(black_box(&x), black_box(&mut y))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_stencil);
criterion_main!(benches);
