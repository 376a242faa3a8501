//! Ingestion, single-element updates, clearing, resizing, and the
//! free-function introspection surface.
//!
//! Builders consume values in stored-coordinate order, row-major over
//! the output's bands with mirror-structured containers restricted to
//! the upper triangle. That order is exactly the set of coordinates a
//! write can land on, so a successful build leaves the container fully
//! populated and initialized.

use num_traits::Zero as NumZero;

use crate::algebra::{BinaryOp, Conjugate};
use crate::container::{
    Matrix, MatrixAccess, MatrixAccessMut, Scalar, Vector, VectorAccess, VectorAccessMut,
};
use crate::error::{AlpError, AlpResult};
use crate::iterate::{band_nnz, for_each_in_bands};

/// Populates `a` from `values`, one value per stored coordinate in
/// row-major band order. The iterator must yield exactly the stored
/// count.
pub fn build_matrix<T, I>(a: &mut impl MatrixAccessMut<T>, values: I) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    I: IntoIterator<Item = T>,
{
    let (rows, cols) = a.dims();
    let clamp = a.structure().mirrors();
    let mut coords = Vec::new();
    for_each_in_bands(a.structure(), rows, cols, clamp, |i, j| coords.push((i, j)));
    let mut it = values.into_iter();
    let expected = coords.len();
    let mut taken = 0usize;
    for (i, j) in coords {
        match it.next() {
            Some(v) => {
                a.write_at(i, j, v);
                taken += 1;
            }
            None => {
                return Err(AlpError::mismatch(format!(
                    "build ran dry after {taken} of {expected} values"
                )));
            }
        }
    }
    if it.next().is_some() {
        return Err(AlpError::mismatch(format!("build expected exactly {expected} values")));
    }
    a.set_initialized(expected > 0);
    Ok(())
}

/// As [`build_matrix`]; stored coordinates are unique by construction,
/// so no duplicate resolution happens.
pub fn build_matrix_unique<T, I>(a: &mut impl MatrixAccessMut<T>, values: I) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    I: IntoIterator<Item = T>,
{
    build_matrix(a, values)
}

/// Populates `v` front to back; the iterator must yield exactly
/// `v.len()` values.
pub fn build_vector<T, I>(v: &mut impl VectorAccessMut<T>, values: I) -> AlpResult<()>
where
    T: Copy + NumZero,
    I: IntoIterator<Item = T>,
{
    let n = v.len();
    let mut it = values.into_iter();
    for i in 0..n {
        match it.next() {
            Some(x) => {
                v.write_at(i, x);
            }
            None => {
                return Err(AlpError::mismatch(format!("build ran dry after {i} of {n} values")));
            }
        }
    }
    if it.next().is_some() {
        return Err(AlpError::mismatch(format!("build expected exactly {n} values")));
    }
    v.set_initialized(n > 0);
    Ok(())
}

/// Populates `v` from `(index, value)` pairs. Untouched indices read
/// zero; a repeated index folds the incoming value into the previous
/// one with `dup`.
pub fn build_vector_pairs<T, I, Op>(
    v: &mut impl VectorAccessMut<T>,
    pairs: I,
    dup: Op,
) -> AlpResult<()>
where
    T: Copy + NumZero,
    I: IntoIterator<Item = (usize, T)>,
    Op: BinaryOp<T, T, T>,
{
    let n = v.len();
    let mut seen = vec![false; n];
    for i in 0..n {
        v.write_at(i, T::zero());
    }
    for (i, x) in pairs {
        if i >= n {
            return Err(AlpError::mismatch(format!("index {i} outside a length-{n} vector")));
        }
        if seen[i] {
            let prev = v.at(i);
            let mut merged = prev;
            dup.apply(&prev, &x, &mut merged);
            v.write_at(i, merged);
        } else {
            v.write_at(i, x);
            seen[i] = true;
        }
    }
    v.set_initialized(n > 0);
    Ok(())
}

/// Overwrites a single element of an initialized vector.
pub fn set_element_vector<T>(v: &mut impl VectorAccessMut<T>, value: T, i: usize) -> AlpResult<()>
where
    T: Copy + NumZero,
{
    if i >= v.len() {
        return Err(AlpError::mismatch(format!(
            "index {i} outside a length-{} vector",
            v.len()
        )));
    }
    if !v.initialized() {
        return Err(AlpError::illegal("setElement on an uninitialized container"));
    }
    v.write_at(i, value);
    Ok(())
}

/// Overwrites a single stored element of an initialized matrix. The
/// coordinate must be stored under the matrix's structure; the mirrored
/// half of a symmetric container is not writable.
pub fn set_element_matrix<T>(
    a: &mut impl MatrixAccessMut<T>,
    value: T,
    i: usize,
    j: usize,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
{
    let (rows, cols) = a.dims();
    if i >= rows || j >= cols {
        return Err(AlpError::mismatch(format!(
            "coordinate ({i}, {j}) outside a {rows}x{cols} matrix"
        )));
    }
    if !a.initialized() {
        return Err(AlpError::illegal("setElement on an uninitialized container"));
    }
    if !a.write_at(i, j, value) {
        return Err(AlpError::illegal("setElement on a non-stored coordinate"));
    }
    Ok(())
}

/// Drops the contents; the container reads as uninitialized afterwards.
pub fn clear_matrix<T>(a: &mut impl MatrixAccessMut<T>) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
{
    a.set_initialized(false);
    Ok(())
}

pub fn clear_vector<T>(v: &mut impl VectorAccessMut<T>) -> AlpResult<()>
where
    T: Copy + NumZero,
{
    v.set_initialized(false);
    Ok(())
}

pub fn clear_scalar<T>(s: &mut Scalar<T>) -> AlpResult<()> {
    s.clear();
    Ok(())
}

/// Only the no-op resize is representable on dense storage.
pub fn resize_matrix<T>(a: &mut Matrix<T>, rows: usize, cols: usize) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
{
    if (rows, cols) != a.dims() {
        return Err(AlpError::illegal("resize of a dense matrix"));
    }
    Ok(())
}

pub fn resize_vector<T>(v: &mut Vector<T>, n: usize) -> AlpResult<()>
where
    T: Copy + NumZero,
{
    if n != v.len() {
        return Err(AlpError::illegal("resize of a dense vector"));
    }
    Ok(())
}

pub fn nrows<T>(a: &impl MatrixAccess<T>) -> usize
where
    T: Copy + NumZero + Conjugate,
{
    a.nrows()
}

pub fn ncols<T>(a: &impl MatrixAccess<T>) -> usize
where
    T: Copy + NumZero + Conjugate,
{
    a.ncols()
}

pub fn dims<T>(a: &impl MatrixAccess<T>) -> (usize, usize)
where
    T: Copy + NumZero + Conjugate,
{
    a.dims()
}

pub fn size<T>(v: &impl VectorAccess<T>) -> usize
where
    T: Copy + NumZero,
{
    v.len()
}

/// Structurally non-zero count; zero while uninitialized.
pub fn nnz_matrix<T>(a: &impl MatrixAccess<T>) -> usize
where
    T: Copy + NumZero + Conjugate,
{
    if !a.initialized() {
        return 0;
    }
    band_nnz(a.structure(), a.nrows(), a.ncols())
}

pub fn nnz_vector<T>(v: &impl VectorAccess<T>) -> usize
where
    T: Copy + NumZero,
{
    if v.initialized() { v.len() } else { 0 }
}

pub fn capacity_matrix<T>(a: &Matrix<T>) -> usize {
    a.capacity()
}

pub fn capacity_vector<T>(v: &Vector<T>) -> usize {
    v.as_slice().len()
}

pub fn get_id_matrix<T>(a: &Matrix<T>) -> u64 {
    a.id()
}

pub fn get_id_vector<T>(v: &Vector<T>) -> u64 {
    v.id()
}
