//! Tests for the primitive dispatch layer: folds, element-wise maps,
//! dot products, rank-1 products, and the banded `mxm` kernel.
//!
//! Fixed cases check exact values; random cases compare the banded
//! kernel against a naive triple loop.

use approx::assert_abs_diff_eq;
use rand::Rng;

use alpine::algebra::identities::Zero;
use alpine::structure::Structure::*;
use alpine::{
    Add, Matrix, MatrixAccess, Max, Min, Monoid, PlusTimes, Scalar, Vector, VectorAccess, blas1,
    blas2, blas3, io,
};

/// Dot product of two small vectors over the arithmetic semiring.
#[test]
fn dot_product() {
    let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
    let y = Vector::from_slice(&[4.0, 5.0, 6.0]).unwrap();
    let mut d = Scalar::<f64>::new();
    blas1::dot_semiring(&mut d, &x, &y, &PlusTimes::new()).unwrap();
    assert!(d.initialized());
    assert_eq!(d.value(), 32.0);
}

/// Vector folds respect order and monoid identities, and start an
/// uninitialized accumulator from the identity.
#[test]
fn vector_folds() {
    let x = Vector::from_slice(&[3.0, -1.0, 7.0, 2.0]).unwrap();
    let mut acc = Scalar::new_with(0.0);
    blas1::foldl_scalar(&mut acc, &x, &Monoid::<Add, Zero>::new()).unwrap();
    assert_eq!(acc.value(), 11.0);

    let mut fresh = Scalar::<f64>::new();
    blas1::foldl_scalar(&mut fresh, &x, &Monoid::<Add, Zero>::new()).unwrap();
    assert!(fresh.initialized());
    assert_eq!(fresh.value(), 11.0);

    let mut max = Scalar::<f64>::new();
    blas1::foldl_scalar(&mut max, &x, &Monoid::<Max, alpine::algebra::identities::NegInfinity>::new())
        .unwrap();
    assert_eq!(max.value(), 7.0);
}

/// `norm2(3, 4) = 5`.
#[test]
fn norm2() {
    let x = Vector::from_slice(&[3.0, 4.0]).unwrap();
    let mut n = Scalar::<f64>::new();
    blas1::norm2(&mut n, &x, &PlusTimes::new()).unwrap();
    assert_abs_diff_eq!(n.value(), 5.0, epsilon = 1e-12);
}

/// Element-wise apply on vectors, with and without initialized inputs.
#[test]
fn vector_ewise() {
    let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
    let y = Vector::from_slice(&[10.0, 20.0, 30.0]).unwrap();
    let mut z = Vector::<f64>::new(3).unwrap();
    blas1::ewise_apply(&mut z, &x, &y, Add).unwrap();
    assert_eq!(z.at(1), 22.0);

    let fresh = Vector::<f64>::new(3).unwrap();
    let mut out = Vector::from_slice(&[0.0; 3]).unwrap();
    blas1::ewise_apply(&mut out, &x, &fresh, Add).unwrap();
    assert!(!out.initialized());
}

/// Rank-1 self outer product of a real vector is tagged symmetric and
/// holds the expected values on both triangles.
#[test]
fn outer_product_symmetry() {
    let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
    let p = blas2::outer_self(&x, alpine::Mul);
    assert_eq!(MatrixAccess::structure(&p), Symmetric);
    assert_eq!(p.at(0, 2), 3.0);
    assert_eq!(p.at(2, 0), 3.0);
    assert_eq!(p.at(1, 1), 4.0);
    assert_eq!(p.at(2, 2), 9.0);
}

/// The fixed 2x3 by 3x2 product from the small-case table.
#[test]
fn mxm_small_fixed() {
    let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let b = Matrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
    let mut c = Matrix::<f64>::new(General, 2, 2).unwrap();
    blas3::mxm(&mut c, &a, &b, &PlusTimes::new()).unwrap();
    assert_eq!(
        [c.at(0, 0), c.at(0, 1), c.at(1, 0), c.at(1, 1)],
        [58.0, 64.0, 139.0, 154.0]
    );
}

/// Banded `mxm` agrees with a naive triple loop on random matrices of
/// assorted structures.
#[test]
fn mxm_matches_naive() {
    let mut rng = rand::thread_rng();
    for &(sa, sb) in &[
        (General, General),
        (UpperTriangular, General),
        (General, LowerTriangular),
        (Symmetric, General),
        (SymmetricTridiagonal, Symmetric),
    ] {
        let n = 6;
        let mut a = Matrix::<f64>::square(sa, n).unwrap();
        let mut b = Matrix::<f64>::square(sb, n).unwrap();
        io::build_matrix(&mut a, (0..count_stored(sa, n)).map(|_| rng.r#gen::<f64>())).unwrap();
        io::build_matrix(&mut b, (0..count_stored(sb, n)).map(|_| rng.r#gen::<f64>())).unwrap();

        let mut c = Matrix::<f64>::new(General, n, n).unwrap();
        blas3::mxm(&mut c, &a, &b, &PlusTimes::new()).unwrap();
        for i in 0..n {
            for j in 0..n {
                let expected: f64 = (0..n).map(|k| a.at(i, k) * b.at(k, j)).sum();
                assert_abs_diff_eq!(c.at(i, j), expected, epsilon = 1e-10);
            }
        }
    }
}

fn count_stored(s: alpine::Structure, n: usize) -> usize {
    let clamp = s.mirrors();
    let mut count = 0;
    alpine::iterate::for_each_in_bands(s, n, n, clamp, |_, _| count += 1);
    count
}

/// Element-wise minimum of two symmetric matrices stays symmetric.
#[test]
fn symmetric_ewise_min() {
    let mut s = Matrix::<f64>::square(Symmetric, 3).unwrap();
    io::build_matrix(&mut s, [3.0, 1.0, 4.0, 2.0, 5.0, 9.0]).unwrap();
    let mut t = Matrix::<f64>::square(Symmetric, 3).unwrap();
    io::build_matrix(&mut t, [7.0, 0.0, 2.0, 8.0, 6.0, 1.0]).unwrap();
    let mut c = Matrix::<f64>::square(Symmetric, 3).unwrap();
    blas3::ewise_apply(&mut c, &s, &t, Min).unwrap();
    assert_eq!(c.at(0, 1), 0.0);
    assert_eq!(c.at(1, 0), 0.0);
    assert_eq!(c.at(2, 2), 1.0);
}

/// Folding an upper-triangular matrix into itself via a copy doubles
/// every stored element and leaves the strict lower triangle at zero.
#[test]
fn upper_triangular_fold() {
    let mut u = Matrix::<f64>::square(UpperTriangular, 3).unwrap();
    io::build_matrix(&mut u, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let copy = u.clone();
    blas3::foldl(&mut u, &copy, Add).unwrap();
    assert_eq!(u.at(0, 0), 2.0);
    assert_eq!(u.at(1, 2), 10.0);
    assert_eq!(u.at(2, 2), 12.0);
    assert_eq!(u.at(2, 0), 0.0);
}

/// `set` is idempotent and `set_value` then fold round-trips.
#[test]
fn set_and_fold_values() {
    let mut c = Matrix::<f64>::new(General, 2, 2).unwrap();
    blas3::set_value(&mut c, &Scalar::new_with(3.0)).unwrap();
    blas3::set_value(&mut c, &Scalar::new_with(3.0)).unwrap();
    assert_eq!(c.at(1, 0), 3.0);
    blas3::foldl_value(&mut c, &Scalar::new_with(1.5), Add).unwrap();
    assert_eq!(c.at(0, 1), 4.5);
}

/// Uninitialized inputs propagate: the output is marked uninitialized
/// and the call still succeeds.
#[test]
fn initialization_propagates_through_primitives() {
    let fresh = Matrix::<f64>::new(General, 2, 2).unwrap();
    let full = Matrix::from_rows(2, 2, &[1.0; 4]).unwrap();
    let mut c = Matrix::from_rows(2, 2, &[1.0; 4]).unwrap();
    blas3::ewise_apply(&mut c, &fresh, &full, Add).unwrap();
    assert!(!c.initialized());

    let mut d = Matrix::from_rows(2, 2, &[5.0; 4]).unwrap();
    blas3::mxm(&mut d, &fresh, &full, &PlusTimes::new()).unwrap();
    assert!(!d.initialized());
}
