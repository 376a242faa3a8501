use criterion::{Criterion, black_box, criterion_group, criterion_main};

use alpine::structure::Structure::{General, SymmetricTridiagonal, UpperTriangular};
use alpine::{Matrix, PlusTimes, blas3, io};

fn bench_mxm_structures(c: &mut Criterion) {
    let n = 256;

    let mut dense_a = Matrix::<f64>::square(General, n).unwrap();
    let mut dense_b = Matrix::<f64>::square(General, n).unwrap();
    io::build_matrix(&mut dense_a, (0..n * n).map(|k| (k as f64).sin())).unwrap();
    io::build_matrix(&mut dense_b, (0..n * n).map(|k| (k as f64).cos())).unwrap();

    c.bench_function("mxm dense 256", |ben| {
        ben.iter(|| {
            let mut out = Matrix::<f64>::square(General, n).unwrap();
            blas3::mxm(&mut out, black_box(&dense_a), black_box(&dense_b), &PlusTimes::new())
                .unwrap();
            out
        })
    });

    let tri_stored = n * (n + 1) / 2;
    let mut upper = Matrix::<f64>::square(UpperTriangular, n).unwrap();
    io::build_matrix(&mut upper, (0..tri_stored).map(|k| (k as f64).sin())).unwrap();

    c.bench_function("mxm upper-triangular 256", |ben| {
        ben.iter(|| {
            let mut out = Matrix::<f64>::square(UpperTriangular, n).unwrap();
            blas3::mxm(&mut out, black_box(&upper), black_box(&upper), &PlusTimes::new()).unwrap();
            out
        })
    });

    let mut tridiag = Matrix::<f64>::square(SymmetricTridiagonal, n).unwrap();
    io::build_matrix(&mut tridiag, (0..2 * n - 1).map(|k| (k as f64).sin())).unwrap();

    c.bench_function("mxm symmetric-tridiagonal 256", |ben| {
        ben.iter(|| {
            let mut out = Matrix::<f64>::square(General, n).unwrap();
            blas3::mxm(&mut out, black_box(&tridiag), black_box(&tridiag), &PlusTimes::new())
                .unwrap();
            out
        })
    });
}

criterion_group!(benches, bench_mxm_structures);
criterion_main!(benches);
