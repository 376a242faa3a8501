//! Semantic containers: scalars, vectors, matrices, and their access
//! traits.
//!
//! A container binds an element type to a structure tag and a physical
//! layout through an [`Amf`](crate::storage::Amf). Owning containers hold
//! the buffer; functor-backed ones hold a generator closure and no
//! storage at all. Every container carries an `initialized` flag with
//! three effective states: zero-sized (trivially empty), allocated but
//! never written, and populated. Primitives consult the flag instead of
//! reading garbage: an uninitialized input makes the output
//! uninitialized and the call still succeeds.
//!
//! The access traits are the seam the whole dispatch layer is written
//! against: a primitive that takes `&impl MatrixAccess<T>` accepts an
//! owning matrix, any view of one, or a functor-backed matrix alike.

use std::sync::atomic::{AtomicU64, Ordering};

use num_traits::Zero as NumZero;

use crate::algebra::Conjugate;
use crate::storage::Amf;
use crate::structure::Structure;

pub mod functor;
pub mod matrix;
pub mod scalar;
pub mod vector;

pub use functor::{FunctorMatrix, FunctorVector};
pub use matrix::Matrix;
pub use scalar::Scalar;
pub use vector::Vector;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A fresh handle, stable for the lifetime of the container it is
/// assigned to. Never reused within a process.
pub(crate) fn next_container_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Read access to a two-dimensional container or view.
pub trait MatrixAccess<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn structure(&self) -> Structure;
    fn initialized(&self) -> bool;

    /// Semantic element read: mirrored (and conjugated) across the
    /// diagonal for the symmetric/hermitian families, the additive zero
    /// outside every band.
    fn at(&self, i: usize, j: usize) -> T;

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
}

/// Write access to a two-dimensional container or view.
pub trait MatrixAccessMut<T>: MatrixAccess<T> {
    fn set_initialized(&mut self, init: bool);

    /// Writes through the access path. Returns `false` when `(i,j)` has
    /// no stored slot; the value is dropped there, never mirrored.
    fn write_at(&mut self, i: usize, j: usize, v: T) -> bool;
}

/// Read access to a one-dimensional container or view.
pub trait VectorAccess<T> {
    fn len(&self) -> usize;
    fn initialized(&self) -> bool;
    fn at(&self, i: usize) -> T;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write access to a one-dimensional container or view.
pub trait VectorAccessMut<T>: VectorAccess<T> {
    fn set_initialized(&mut self, init: bool);
    fn write_at(&mut self, i: usize, v: T);
}

/// Shared semantic-read routing over raw storage.
///
/// Logical `(i,j)` is rewritten into container coordinates by the AMF,
/// checked against the *container's* band set (views keep the target's
/// structure and dims around exactly for this), then resolved to a slot.
/// The symmetric/hermitian families store the upper triangle only —
/// whether on a packed or a full layout — so a sub-diagonal coordinate
/// answers from the mirrored slot, conjugated for hermitian tags.
#[inline]
pub(crate) fn storage_read<T>(
    buf: &[T],
    amf: &Amf,
    src: Structure,
    src_rows: usize,
    src_cols: usize,
    i: usize,
    j: usize,
) -> T
where
    T: Copy + NumZero + Conjugate,
{
    let (r, c) = amf.container_coords(i, j);
    if !src.on_band(src_rows, src_cols, c as isize - r as isize) {
        return T::zero();
    }
    let smf = amf.smf();
    if src.mirrors() && c < r {
        return match smf.offset(c, r) {
            Some(off) if src.is_hermitian() => buf[off].conj(),
            Some(off) => buf[off],
            None => T::zero(),
        };
    }
    match smf.offset(r, c) {
        Some(off) => buf[off],
        None => T::zero(),
    }
}

/// Write counterpart of [`storage_read`]: only stored on-band slots
/// accept the value. Sub-diagonal coordinates of a mirror structure are
/// not stored; writes there drop and report `false`.
#[inline]
pub(crate) fn storage_write<T: Copy>(
    buf: &mut [T],
    amf: &Amf,
    src: Structure,
    src_rows: usize,
    src_cols: usize,
    i: usize,
    j: usize,
    v: T,
) -> bool {
    let (r, c) = amf.container_coords(i, j);
    if !src.on_band(src_rows, src_cols, c as isize - r as isize) {
        return false;
    }
    if src.mirrors() && c < r {
        return false;
    }
    match amf.smf().offset(r, c) {
        Some(off) => {
            buf[off] = v;
            true
        }
        None => false,
    }
}
