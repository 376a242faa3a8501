//! Owning dense matrices.

use num_traits::Zero as NumZero;

use crate::algebra::Conjugate;
use crate::error::{AlpError, AlpResult};
use crate::imf::Imf;
use crate::storage::{Amf, Smf};
use crate::structure::Structure;

use super::{next_container_id, storage_read, storage_write, MatrixAccess, MatrixAccessMut};

/// An owning two-dimensional container.
///
/// The buffer is sized by the SMF the layout factory picks for the
/// structure: packed triangles for the triangular/symmetric families,
/// full row-major otherwise. The AMF starts out with identity IMFs;
/// views compose fresh IMFs on top without copying anything.
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    structure: Structure,
    amf: Amf,
    buf: Vec<T>,
    initialized: bool,
    id: u64,
}

impl<T: Copy + NumZero> Matrix<T> {
    /// Allocates an uninitialized `rows x cols` matrix of the given
    /// structure. Structures implying squareness reject `rows != cols`.
    pub fn new(structure: Structure, rows: usize, cols: usize) -> AlpResult<Self> {
        if structure.requires_square() && rows != cols {
            return Err(AlpError::mismatch(format!(
                "{structure:?} requires square dimensions, got {rows}x{cols}"
            )));
        }
        let smf = Smf::for_structure(structure, rows, cols);
        let extent = smf.extent();
        let mut buf = Vec::new();
        buf.try_reserve_exact(extent).map_err(|_| AlpError::OutOfMemory(extent))?;
        buf.resize(extent, T::zero());
        Ok(Matrix {
            structure,
            amf: Amf::new(Imf::id(rows), Imf::id(cols), smf),
            buf,
            initialized: false,
            id: next_container_id(),
        })
    }

    /// Square shorthand.
    pub fn square(structure: Structure, n: usize) -> AlpResult<Self> {
        Matrix::new(structure, n, n)
    }

    /// As [`Matrix::new`]; the capacity hint is accepted and ignored.
    pub fn with_capacity(
        structure: Structure,
        rows: usize,
        cols: usize,
        _capacity: usize,
    ) -> AlpResult<Self> {
        Matrix::new(structure, rows, cols)
    }

    /// An initialized `General` matrix from a row-major value slice.
    pub fn from_rows(rows: usize, cols: usize, values: &[T]) -> AlpResult<Self> {
        if values.len() != rows * cols {
            return Err(AlpError::mismatch(format!(
                "{} values for a {rows}x{cols} matrix",
                values.len()
            )));
        }
        let mut m = Matrix::new(Structure::General, rows, cols)?;
        m.buf.copy_from_slice(values);
        m.initialized = !values.is_empty();
        Ok(m)
    }
}

impl<T> Matrix<T> {
    pub fn nrows(&self) -> usize {
        self.amf.rows()
    }

    pub fn ncols(&self) -> usize {
        self.amf.cols()
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    pub fn structure(&self) -> Structure {
        self.structure
    }

    pub fn amf(&self) -> &Amf {
        &self.amf
    }

    /// Stable handle, unique within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_initialized(&mut self, init: bool) {
        self.initialized = init;
    }

    /// Stored buffer length; what `capacity()` reports for dense
    /// containers.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn buf(&self) -> &[T] {
        &self.buf
    }

    pub(crate) fn buf_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }

    /// Split borrow of the buffer and the `initialized` flag, for the
    /// mutable view constructors.
    pub(crate) fn parts_mut(&mut self) -> (&mut [T], &mut bool) {
        (&mut self.buf, &mut self.initialized)
    }
}

impl<T: Copy + NumZero + Conjugate> MatrixAccess<T> for Matrix<T> {
    fn nrows(&self) -> usize {
        self.amf.rows()
    }

    fn ncols(&self) -> usize {
        self.amf.cols()
    }

    fn structure(&self) -> Structure {
        self.structure
    }

    fn initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        storage_read(&self.buf, &self.amf, self.structure, self.nrows(), self.ncols(), i, j)
    }
}

impl<T: Copy + NumZero + Conjugate> MatrixAccessMut<T> for Matrix<T> {
    fn set_initialized(&mut self, init: bool) {
        self.initialized = init;
    }

    #[inline]
    fn write_at(&mut self, i: usize, j: usize, v: T) -> bool {
        let (rows, cols) = (self.nrows(), self.ncols());
        storage_write(&mut self.buf, &self.amf, self.structure, rows, cols, i, j, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MatrixAccess;
    use Structure::*;

    #[test]
    fn general_allocates_full_extent() {
        let m = Matrix::<f64>::new(General, 3, 5).unwrap();
        assert_eq!(m.dims(), (3, 5));
        assert_eq!(m.capacity(), 15);
        assert!(!m.initialized());
    }

    #[test]
    fn packed_structures_allocate_triangles() {
        let u = Matrix::<f64>::square(UpperTriangular, 4).unwrap();
        assert_eq!(u.capacity(), 10);
        let s = Matrix::<f64>::square(Symmetric, 4).unwrap();
        assert_eq!(s.capacity(), 10);
    }

    #[test]
    fn square_structures_reject_rectangles() {
        assert!(matches!(
            Matrix::<f64>::new(Symmetric, 3, 4),
            Err(AlpError::Mismatch(_))
        ));
    }

    #[test]
    fn symmetric_reads_mirror() {
        let mut s = Matrix::<f64>::square(Symmetric, 3).unwrap();
        assert!(s.write_at(0, 2, 4.0));
        // the lower-triangle slot does not exist; writes there drop
        assert!(!s.write_at(2, 0, 9.0));
        s.set_initialized(true);
        assert_eq!(s.at(0, 2), 4.0);
        assert_eq!(s.at(2, 0), 4.0);
    }

    #[test]
    fn triangular_reads_zero_fill() {
        let mut u = Matrix::<f64>::square(UpperTriangular, 3).unwrap();
        assert!(u.write_at(0, 1, 2.0));
        u.set_initialized(true);
        assert_eq!(u.at(0, 1), 2.0);
        assert_eq!(u.at(1, 0), 0.0);
    }

    #[test]
    fn tridiagonal_off_band_reads_zero() {
        let mut t = Matrix::<f64>::square(SymmetricTridiagonal, 4).unwrap();
        // full layout: the slot exists, the band check hides it
        assert!(t.write_at(0, 1, 5.0));
        assert!(!t.write_at(0, 3, 7.0));
        t.set_initialized(true);
        assert_eq!(t.at(0, 1), 5.0);
        assert_eq!(t.at(1, 0), 5.0);
        assert_eq!(t.at(0, 3), 0.0);
    }

    #[test]
    fn hermitian_reads_conjugate() {
        use num_complex::Complex64;
        let mut h = Matrix::<Complex64>::square(Hermitian, 2).unwrap();
        assert!(h.write_at(0, 1, Complex64::new(1.0, 2.0)));
        h.set_initialized(true);
        assert_eq!(h.at(1, 0), Complex64::new(1.0, -2.0));
    }
}
