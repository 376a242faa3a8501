//! Constant-matrix factories.

use num_traits::{One, Zero as NumZero};

use crate::container::{FunctorMatrix, Matrix, MatrixAccessMut};
use crate::error::{AlpError, AlpResult};
use crate::structure::Structure;

/// The `n x n` identity, lazily: no storage, diagonal reads one.
pub fn identity_matrix<T>(n: usize) -> FunctorMatrix<'static, T>
where
    T: Copy + NumZero + One,
{
    FunctorMatrix::new(Structure::Identity, n, n, |i, j| {
        if i == j { T::one() } else { T::zero() }
    })
}

/// An all-zero `rows x cols` matrix, lazily.
pub fn zero_matrix<T>(rows: usize, cols: usize) -> FunctorMatrix<'static, T>
where
    T: Copy + NumZero,
{
    FunctorMatrix::new(Structure::Zero, rows, cols, |_, _| T::zero())
}

/// The `n x n` Givens rotation acting on coordinates `i < j`: identity
/// everywhere except the 2x2 block `[[c, s], [-s, c]]` at rows and
/// columns `i, j`. Materialized, since a rotation is written into and
/// multiplied repeatedly.
pub fn givens<T>(n: usize, i: usize, j: usize, c: T, s: T) -> AlpResult<Matrix<T>>
where
    T: Copy + NumZero + One + core::ops::Neg<Output = T> + crate::algebra::Conjugate,
{
    if i >= j || j >= n {
        return Err(AlpError::mismatch(format!(
            "givens coordinates ({i}, {j}) need i < j < {n}"
        )));
    }
    let mut g = Matrix::square(Structure::Orthogonal, n)?;
    for k in 0..n {
        for l in 0..n {
            g.write_at(k, l, if k == l { T::one() } else { T::zero() });
        }
    }
    g.write_at(i, i, c);
    g.write_at(i, j, s);
    g.write_at(j, i, -s);
    g.write_at(j, j, c);
    g.set_initialized(n > 0);
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::PlusTimes;
    use crate::container::MatrixAccess;
    use crate::ops::blas3;

    #[test]
    fn identity_multiplies_to_itself() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let id = identity_matrix::<f64>(2);
        let mut c = Matrix::<f64>::new(Structure::General, 2, 2).unwrap();
        blas3::mxm(&mut c, &id, &a, &PlusTimes::new()).unwrap();
        assert_eq!(c.at(0, 1), 2.0);
        assert_eq!(c.at(1, 0), 3.0);
    }

    #[test]
    fn zero_matrix_reads_zero() {
        let z = zero_matrix::<f64>(3, 2);
        assert_eq!(z.at(1, 1), 0.0);
        assert_eq!(MatrixAccess::structure(&z), Structure::Zero);
    }

    #[test]
    fn givens_rotation_block() {
        let g = givens(3, 0, 2, 0.6, 0.8).unwrap();
        assert_eq!(g.at(0, 0), 0.6);
        assert_eq!(g.at(0, 2), 0.8);
        assert_eq!(g.at(2, 0), -0.8);
        assert_eq!(g.at(2, 2), 0.6);
        assert_eq!(g.at(1, 1), 1.0);
        assert!(matches!(givens(3, 2, 1, 0.0, 1.0), Err(AlpError::Mismatch(_))));
    }
}
