//! Level-2 primitives: rank-1 outer products as functor-backed views.

use num_traits::Zero as NumZero;

use crate::algebra::{BinaryOp, Conjugate};
use crate::container::{FunctorMatrix, VectorAccess};
use crate::structure::Structure;

/// `outer(x, y)[i,j] = x[i] ⊗ conj(y[j])` as a `General` functor-backed
/// matrix; elements materialize on access, no storage is allocated.
pub fn outer<'a, T, Op>(
    x: &'a impl VectorAccess<T>,
    y: &'a impl VectorAccess<T>,
    op: Op,
) -> FunctorMatrix<'a, T>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T> + 'a,
{
    FunctorMatrix::with_init(
        Structure::General,
        x.len(),
        y.len(),
        move |i, j| {
            let mut v = T::zero();
            op.apply(&x.at(i), &y.at(j).conj(), &mut v);
            v
        },
        move || x.initialized() && y.initialized(),
    )
}

/// Self outer product `x ⊗ xᴴ`: structurally self-adjoint, so the view
/// is tagged `Symmetric` for real element types and `Hermitian` for
/// complex ones.
pub fn outer_self<'a, T, Op>(x: &'a impl VectorAccess<T>, op: Op) -> FunctorMatrix<'a, T>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T> + 'a,
{
    let structure = if T::COMPLEX { Structure::Hermitian } else { Structure::Symmetric };
    FunctorMatrix::with_init(
        structure,
        x.len(),
        x.len(),
        move |i, j| {
            let mut v = T::zero();
            op.apply(&x.at(i), &x.at(j).conj(), &mut v);
            v
        },
        move || x.initialized(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Mul;
    use crate::container::{MatrixAccess, Vector};

    #[test]
    fn outer_product_values() {
        let x = Vector::from_slice(&[1.0, 2.0]).unwrap();
        let y = Vector::from_slice(&[3.0, 4.0, 5.0]).unwrap();
        let a = outer(&x, &y, Mul);
        assert_eq!(a.dims(), (2, 3));
        assert_eq!(MatrixAccess::structure(&a), Structure::General);
        assert_eq!(a.at(0, 2), 5.0);
        assert_eq!(a.at(1, 1), 8.0);
    }

    #[test]
    fn self_outer_is_symmetric() {
        let x = Vector::from_slice(&[1.0, 2.0]).unwrap();
        let a = outer_self(&x, Mul);
        assert_eq!(MatrixAccess::structure(&a), Structure::Symmetric);
        assert_eq!(a.at(0, 1), 2.0);
        assert_eq!(a.at(1, 0), 2.0);
        assert_eq!(a.at(1, 1), 4.0);
    }

    #[test]
    fn complex_self_outer_is_hermitian() {
        use num_complex::Complex64;
        let x = Vector::from_slice(&[Complex64::new(0.0, 1.0), Complex64::new(2.0, 0.0)]).unwrap();
        let a = outer_self(&x, Mul);
        assert_eq!(MatrixAccess::structure(&a), Structure::Hermitian);
        // i * conj(2) = 2i; 2 * conj(i) = -2i
        assert_eq!(a.at(0, 1), Complex64::new(0.0, 2.0));
        assert_eq!(a.at(1, 0), Complex64::new(0.0, -2.0));
    }

    #[test]
    fn uninitialized_operand_is_visible() {
        let x = Vector::<f64>::new(2).unwrap();
        let a = outer_self(&x, Mul);
        assert!(!a.initialized());
    }
}
