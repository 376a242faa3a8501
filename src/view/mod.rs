//! Non-owning views: transpose, blocks, gathers, structure casts,
//! diagonals, rows and columns.
//!
//! A view borrows the target's buffer and carries a fresh AMF composed
//! from the target's. Nothing is copied; stacking a view on a view
//! collapses to a single AMF through IMF composition, so an arbitrarily
//! deep stack still dereferences in constant work. Views additionally
//! remember the *container's* structure and dimensions, which the read
//! path needs to route mirror reads and band masking correctly no
//! matter what the view advertises.
//!
//! Structure claims are checked at construction: a gather keeps the
//! target's structure when the IMFs preserve it (a principal selection
//! of a symmetric matrix stays symmetric), decays to `General` when
//! every selected coordinate is readable, and is refused otherwise.

use std::ops::Range;

use num_traits::Zero as NumZero;

use crate::algebra::Conjugate;
use crate::container::{
    storage_read, storage_write, Matrix, MatrixAccess, MatrixAccessMut, VectorAccess,
};
use crate::error::{AlpError, AlpResult};
use crate::imf::Imf;
use crate::storage::Amf;
use crate::structure::{view_instantiable, Structure};

/// A read-only matrix view.
#[derive(Debug)]
pub struct MatrixView<'a, T> {
    buf: &'a [T],
    structure: Structure,
    amf: Amf,
    src: Structure,
    src_rows: usize,
    src_cols: usize,
    init: bool,
}

/// A mutable matrix view. Writes go through the composed AMF; marking
/// the view (un)initialized marks the target.
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    buf: &'a mut [T],
    init: &'a mut bool,
    structure: Structure,
    amf: Amf,
    src: Structure,
    src_rows: usize,
    src_cols: usize,
}

/// A read-only vector view: one column of some matrix access path.
#[derive(Debug)]
pub struct VectorView<'a, T> {
    mat: MatrixView<'a, T>,
}

/// The main diagonal of a matrix, viewed as a vector.
#[derive(Debug)]
pub struct DiagonalView<'a, T> {
    buf: &'a [T],
    amf: Amf,
    src: Structure,
    src_rows: usize,
    src_cols: usize,
    n: usize,
    init: bool,
}

// Cloning a view copies the borrow and the AMF, never the elements;
// manual impls keep `T` unbounded.
impl<'a, T> Clone for MatrixView<'a, T> {
    fn clone(&self) -> Self {
        MatrixView {
            buf: self.buf,
            structure: self.structure,
            amf: self.amf.clone(),
            src: self.src,
            src_rows: self.src_rows,
            src_cols: self.src_cols,
            init: self.init,
        }
    }
}

impl<'a, T> Clone for VectorView<'a, T> {
    fn clone(&self) -> Self {
        VectorView { mat: self.mat.clone() }
    }
}

impl<'a, T> Clone for DiagonalView<'a, T> {
    fn clone(&self) -> Self {
        DiagonalView {
            buf: self.buf,
            amf: self.amf.clone(),
            src: self.src,
            src_rows: self.src_rows,
            src_cols: self.src_cols,
            n: self.n,
            init: self.init,
        }
    }
}

/// Structure a view through `(imf_r, imf_c)` of a `parent`-structured
/// object may advertise: the parent's own tag when the IMFs preserve
/// it, `General` when every selected coordinate is at least readable.
fn structure_for_view(parent: Structure, imf_r: &Imf, imf_c: &Imf) -> AlpResult<Structure> {
    if view_instantiable(parent, parent, imf_r, imf_c) {
        Ok(parent)
    } else if view_instantiable(parent, Structure::General, imf_r, imf_c) {
        Ok(Structure::General)
    } else {
        Err(AlpError::illegal(format!(
            "selection of a {parent:?} matrix is not instantiable under any structure"
        )))
    }
}

fn range_imf(range: &Range<usize>, origin: usize) -> AlpResult<Imf> {
    if range.end > origin || range.start > range.end {
        return Err(AlpError::mismatch(format!(
            "range {range:?} outside [0, {origin})"
        )));
    }
    Ok(Imf::strided(range.len(), origin, range.start, 1))
}

fn select_imf(idxs: &[usize], origin: usize) -> AlpResult<Imf> {
    if let Some(&bad) = idxs.iter().find(|&&i| i >= origin) {
        return Err(AlpError::mismatch(format!("index {bad} outside [0, {origin})")));
    }
    Ok(Imf::select(origin, idxs.to_vec()))
}

/// The whole matrix as a view.
pub fn get_view<T>(m: &Matrix<T>) -> MatrixView<'_, T> {
    MatrixView {
        buf: m.buf(),
        structure: m.structure(),
        amf: m.amf().clone(),
        src: m.structure(),
        src_rows: m.nrows(),
        src_cols: m.ncols(),
        init: m.initialized(),
    }
}

/// Transposed view; involutive.
pub fn transpose<T>(m: &Matrix<T>) -> MatrixView<'_, T> {
    get_view(m).transpose()
}

/// The main diagonal as a vector view; on rectangles, the leading
/// square block's diagonal.
pub fn diagonal<T>(m: &Matrix<T>) -> DiagonalView<'_, T> {
    DiagonalView {
        buf: m.buf(),
        amf: m.amf().clone(),
        src: m.structure(),
        src_rows: m.nrows(),
        src_cols: m.ncols(),
        n: m.nrows().min(m.ncols()),
        init: m.initialized(),
    }
}

/// Contiguous block view over row and column ranges.
pub fn gather<'a, T>(
    m: &'a Matrix<T>,
    rows: Range<usize>,
    cols: Range<usize>,
) -> AlpResult<MatrixView<'a, T>> {
    get_view(m).gather(rows, cols)
}

/// Gather/permutation view over explicit index lists.
pub fn select<'a, T>(
    m: &'a Matrix<T>,
    rows: &[usize],
    cols: &[usize],
) -> AlpResult<MatrixView<'a, T>> {
    get_view(m).select(rows, cols)
}

/// Re-interpretation of the whole matrix under another structure tag.
pub fn view_as<T>(m: &Matrix<T>, target: Structure) -> AlpResult<MatrixView<'_, T>> {
    get_view(m).view_as(target)
}

/// Column `j` as a vector view.
pub fn col_view<T>(m: &Matrix<T>, j: usize) -> AlpResult<VectorView<'_, T>> {
    get_view(m).col(j)
}

/// Row `i` as a vector view.
pub fn row_view<T>(m: &Matrix<T>, i: usize) -> AlpResult<VectorView<'_, T>> {
    get_view(m).transpose().col(i)
}

/// Mutable transposed view.
pub fn transpose_mut<T>(m: &mut Matrix<T>) -> MatrixViewMut<'_, T> {
    let structure = m.structure().transposed();
    let src = m.structure();
    let (src_rows, src_cols) = (m.nrows(), m.ncols());
    let amf = m.amf().transpose();
    let (buf, init) = m.parts_mut();
    MatrixViewMut { buf, init, structure, amf, src, src_rows, src_cols }
}

/// Mutable block view over row and column ranges.
pub fn gather_mut<'a, T>(
    m: &'a mut Matrix<T>,
    rows: Range<usize>,
    cols: Range<usize>,
) -> AlpResult<MatrixViewMut<'a, T>> {
    let imf_r = range_imf(&rows, m.nrows())?;
    let imf_c = range_imf(&cols, m.ncols())?;
    let structure = structure_for_view(m.structure(), &imf_r, &imf_c)?;
    let src = m.structure();
    let (src_rows, src_cols) = (m.nrows(), m.ncols());
    let amf = m.amf().compose_view(&imf_r, &imf_c);
    let (buf, init) = m.parts_mut();
    Ok(MatrixViewMut { buf, init, structure, amf, src, src_rows, src_cols })
}

impl<'a, T> MatrixView<'a, T> {
    /// Transpose of this view.
    pub fn transpose(&self) -> MatrixView<'a, T> {
        MatrixView {
            buf: self.buf,
            structure: self.structure.transposed(),
            amf: self.amf.transpose(),
            src: self.src,
            src_rows: self.src_rows,
            src_cols: self.src_cols,
            init: self.init,
        }
    }

    /// Block of this view over row and column ranges.
    pub fn gather(&self, rows: Range<usize>, cols: Range<usize>) -> AlpResult<MatrixView<'a, T>> {
        let imf_r = range_imf(&rows, self.amf.rows())?;
        let imf_c = range_imf(&cols, self.amf.cols())?;
        self.derive(imf_r, imf_c)
    }

    /// Gather of this view over explicit index lists.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> AlpResult<MatrixView<'a, T>> {
        let imf_r = select_imf(rows, self.amf.rows())?;
        let imf_c = select_imf(cols, self.amf.cols())?;
        self.derive(imf_r, imf_c)
    }

    /// Re-interpretation under another structure tag, when the claim is
    /// instantiable.
    pub fn view_as(&self, target: Structure) -> AlpResult<MatrixView<'a, T>> {
        let id_r = Imf::id(self.amf.rows());
        let id_c = Imf::id(self.amf.cols());
        if !view_instantiable(self.structure, target, &id_r, &id_c) {
            return Err(AlpError::illegal(format!(
                "cannot view a {:?} matrix as {target:?}",
                self.structure
            )));
        }
        let mut v = self.clone();
        v.structure = target;
        Ok(v)
    }

    /// Column `j` as a vector view.
    pub fn col(&self, j: usize) -> AlpResult<VectorView<'a, T>> {
        let imf_r = Imf::id(self.amf.rows());
        let imf_c = select_imf(&[j], self.amf.cols())?;
        Ok(VectorView { mat: self.derive(imf_r, imf_c)? })
    }

    /// The main diagonal of this view.
    pub fn diagonal(&self) -> DiagonalView<'a, T> {
        DiagonalView {
            buf: self.buf,
            amf: self.amf.clone(),
            src: self.src,
            src_rows: self.src_rows,
            src_cols: self.src_cols,
            n: self.amf.rows().min(self.amf.cols()),
            init: self.init,
        }
    }

    fn derive(&self, imf_r: Imf, imf_c: Imf) -> AlpResult<MatrixView<'a, T>> {
        let structure = structure_for_view(self.structure, &imf_r, &imf_c)?;
        Ok(MatrixView {
            buf: self.buf,
            structure,
            amf: self.amf.compose_view(&imf_r, &imf_c),
            src: self.src,
            src_rows: self.src_rows,
            src_cols: self.src_cols,
            init: self.init,
        })
    }
}

impl<'a, T: Copy + NumZero + Conjugate> MatrixAccess<T> for MatrixView<'a, T> {
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
        self.init
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        storage_read(self.buf, &self.amf, self.src, self.src_rows, self.src_cols, i, j)
    }
}

impl<'a, T: Copy + NumZero + Conjugate> MatrixAccess<T> for MatrixViewMut<'a, T> {
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
        *self.init
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        storage_read(self.buf, &self.amf, self.src, self.src_rows, self.src_cols, i, j)
    }
}

impl<'a, T: Copy + NumZero + Conjugate> MatrixAccessMut<T> for MatrixViewMut<'a, T> {
    fn set_initialized(&mut self, init: bool) {
        *self.init = init;
    }

    #[inline]
    fn write_at(&mut self, i: usize, j: usize, v: T) -> bool {
        storage_write(self.buf, &self.amf, self.src, self.src_rows, self.src_cols, i, j, v)
    }
}

impl<'a, T: Copy + NumZero + Conjugate> VectorAccess<T> for VectorView<'a, T> {
    fn len(&self) -> usize {
        self.mat.nrows()
    }

    fn initialized(&self) -> bool {
        self.mat.initialized()
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        self.mat.at(i, 0)
    }
}

impl<'a, T: Copy + NumZero + Conjugate> VectorAccess<T> for DiagonalView<'a, T> {
    fn len(&self) -> usize {
        self.n
    }

    fn initialized(&self) -> bool {
        self.init
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        storage_read(self.buf, &self.amf, self.src, self.src_rows, self.src_cols, i, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Structure::*;

    fn sample(rows: usize, cols: usize) -> Matrix<f64> {
        let values: Vec<f64> = (0..rows * cols).map(|k| k as f64).collect();
        Matrix::from_rows(rows, cols, &values).unwrap()
    }

    #[test]
    fn identity_view_reads_target() {
        let m = sample(3, 4);
        let v = get_view(&m);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(v.at(i, j), m.at(i, j));
            }
        }
        assert!(v.initialized());
    }

    #[test]
    fn transpose_is_involutive() {
        let m = sample(2, 3);
        let tt = transpose(&m).transpose();
        assert_eq!(tt.dims(), (2, 3));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(tt.at(i, j), m.at(i, j));
            }
        }
        assert_eq!(transpose(&m).at(2, 1), m.at(1, 2));
    }

    #[test]
    fn gather_selects_block() {
        let m = sample(4, 4);
        let v = gather(&m, 1..3, 2..4).unwrap();
        assert_eq!(v.dims(), (2, 2));
        assert_eq!(v.at(0, 0), m.at(1, 2));
        assert_eq!(v.at(1, 1), m.at(2, 3));
        assert!(gather(&m, 1..5, 0..2).is_err());
    }

    #[test]
    fn gather_of_gather_composes() {
        let m = sample(6, 6);
        let outer_v = gather(&m, 1..5, 1..5).unwrap();
        let inner = outer_v.gather(1..3, 2..4).unwrap();
        assert_eq!(inner.at(0, 0), m.at(2, 3));
        assert_eq!(inner.at(1, 1), m.at(3, 4));
    }

    #[test]
    fn select_permutes() {
        let m = sample(3, 3);
        let v = select(&m, &[2, 0], &[1, 1]).unwrap();
        assert_eq!(v.at(0, 0), m.at(2, 1));
        assert_eq!(v.at(1, 1), m.at(0, 1));
        assert!(select(&m, &[3], &[0]).is_err());
    }

    #[test]
    fn principal_selection_of_symmetric_stays_symmetric() {
        let mut s = Matrix::<f64>::square(Symmetric, 4).unwrap();
        for i in 0..4 {
            for j in i..4 {
                s.write_at(i, j, (i * 10 + j) as f64);
            }
        }
        s.set_initialized(true);
        let v = select(&s, &[0, 2, 3], &[0, 2, 3]).unwrap();
        assert_eq!(MatrixAccess::structure(&v), Symmetric);
        assert_eq!(v.at(2, 1), v.at(1, 2));
        // a non-principal selection decays to General
        let g = select(&s, &[0, 1], &[2, 3]).unwrap();
        assert_eq!(MatrixAccess::structure(&g), General);
        assert_eq!(g.at(1, 0), s.at(1, 2));
    }

    #[test]
    fn triangular_block_outside_triangle_is_refused() {
        let mut u = Matrix::<f64>::square(UpperTriangular, 4).unwrap();
        u.set_initialized(true);
        assert!(gather(&u, 0..2, 2..4).is_ok());
        assert!(gather(&u, 2..4, 0..2).is_err());
    }

    #[test]
    fn view_as_follows_instantiability() {
        let m = sample(3, 3);
        let sym = view_as(&m, Symmetric).unwrap();
        assert_eq!(MatrixAccess::structure(&sym), Symmetric);
        assert!(view_as(&m, UpperTriangular).is_err());
        let rect = sample(2, 3);
        assert!(view_as(&rect, Square).is_err());
    }

    #[test]
    fn cloned_views_alias_the_same_storage() {
        let m = sample(2, 3);
        let v = get_view(&m);
        let w = v.clone();
        assert_eq!(w.dims(), v.dims());
        assert_eq!(w.at(1, 2), m.at(1, 2));
        // the cast path goes through clone as well
        let sq = sample(3, 3);
        let sym = get_view(&sq).view_as(Symmetric).unwrap();
        assert_eq!(MatrixAccess::structure(&sym), Symmetric);
        assert_eq!(diagonal(&sq).clone().at(1), sq.at(1, 1));
    }

    #[test]
    fn rows_cols_and_diagonal() {
        let m = sample(3, 4);
        let r = row_view(&m, 1).unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r.at(2), m.at(1, 2));
        let c = col_view(&m, 3).unwrap();
        assert_eq!(c.len(), 3);
        assert_eq!(c.at(2), m.at(2, 3));
        let d = diagonal(&m);
        assert_eq!(d.len(), 3);
        assert_eq!(d.at(2), m.at(2, 2));
    }

    #[test]
    fn mirror_reads_survive_transposed_views() {
        let mut s = Matrix::<f64>::square(Symmetric, 3).unwrap();
        s.write_at(0, 2, 7.0);
        s.write_at(1, 2, 3.0);
        s.set_initialized(true);
        let t = transpose(&s);
        assert_eq!(t.at(2, 0), 7.0);
        assert_eq!(t.at(0, 2), 7.0);
        assert_eq!(t.at(2, 1), 3.0);
    }

    #[test]
    fn mut_views_write_through() {
        let mut m = sample(3, 3);
        {
            let mut t = transpose_mut(&mut m);
            assert!(t.write_at(0, 2, 99.0));
        }
        assert_eq!(m.at(2, 0), 99.0);
        {
            let mut b = gather_mut(&mut m, 1..3, 1..3).unwrap();
            assert!(b.write_at(0, 0, -1.0));
            b.set_initialized(false);
        }
        assert_eq!(m.at(1, 1), -1.0);
        assert!(!m.initialized());
    }
}
