//! Functor-backed containers: elements materialize through a stored
//! generator closure on every access, no buffer is ever allocated.
//!
//! `outer`, `conjugate`, and the structural constants (`I`, `Zero`)
//! hand these out. They satisfy the same access traits as owning
//! containers, so everything downstream consumes them transparently.

use num_traits::Zero as NumZero;

use crate::imf::Imf;
use crate::structure::Structure;

use super::{MatrixAccess, VectorAccess};

/// A lazily generated matrix: `at(i,j)` calls the generator with the
/// IMF-rewritten coordinates. Whether the object currently counts as
/// initialized is itself answered lazily, through a second closure, so
/// a functor over not-yet-populated inputs reports their state live.
pub struct FunctorMatrix<'a, T> {
    structure: Structure,
    imf_r: Imf,
    imf_c: Imf,
    f: Box<dyn Fn(usize, usize) -> T + 'a>,
    init: Box<dyn Fn() -> bool + 'a>,
}

impl<'a, T> FunctorMatrix<'a, T> {
    pub fn new(
        structure: Structure,
        rows: usize,
        cols: usize,
        f: impl Fn(usize, usize) -> T + 'a,
    ) -> Self {
        FunctorMatrix::with_init(structure, rows, cols, f, || true)
    }

    pub fn with_init(
        structure: Structure,
        rows: usize,
        cols: usize,
        f: impl Fn(usize, usize) -> T + 'a,
        init: impl Fn() -> bool + 'a,
    ) -> Self {
        FunctorMatrix {
            structure,
            imf_r: Imf::id(rows),
            imf_c: Imf::id(cols),
            f: Box::new(f),
            init: Box::new(init),
        }
    }

    /// A further selection on top: fresh IMFs compose onto the stored
    /// ones, the generator is untouched.
    pub fn compose_imfs(mut self, imf_r: &Imf, imf_c: &Imf) -> Self {
        self.imf_r = Imf::compose(&self.imf_r, imf_r);
        self.imf_c = Imf::compose(&self.imf_c, imf_c);
        self
    }
}

impl<'a, T: Copy + NumZero> MatrixAccess<T> for FunctorMatrix<'a, T> {
    fn nrows(&self) -> usize {
        self.imf_r.n()
    }

    fn ncols(&self) -> usize {
        self.imf_c.n()
    }

    fn structure(&self) -> Structure {
        self.structure
    }

    fn initialized(&self) -> bool {
        (self.init)()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        let r = self.imf_r.map(i);
        let c = self.imf_c.map(j);
        if !self.structure.on_band(
            self.imf_r.codomain(),
            self.imf_c.codomain(),
            c as isize - r as isize,
        ) {
            return T::zero();
        }
        (self.f)(r, c)
    }
}

/// A lazily generated vector; `dot` builds one for the element-wise
/// products and `conjugate` for on-access conjugation.
pub struct FunctorVector<'a, T> {
    imf: Imf,
    f: Box<dyn Fn(usize) -> T + 'a>,
    init: Box<dyn Fn() -> bool + 'a>,
}

impl<'a, T> FunctorVector<'a, T> {
    pub fn new(n: usize, f: impl Fn(usize) -> T + 'a) -> Self {
        FunctorVector::with_init(n, f, || true)
    }

    pub fn with_init(
        n: usize,
        f: impl Fn(usize) -> T + 'a,
        init: impl Fn() -> bool + 'a,
    ) -> Self {
        FunctorVector { imf: Imf::id(n), f: Box::new(f), init: Box::new(init) }
    }
}

impl<'a, T: Copy> VectorAccess<T> for FunctorVector<'a, T> {
    fn len(&self) -> usize {
        self.imf.n()
    }

    fn initialized(&self) -> bool {
        (self.init)()
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        (self.f)(self.imf.map(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Structure::*;

    #[test]
    fn generator_answers_reads() {
        let m = FunctorMatrix::new(General, 2, 3, |i, j| (10 * i + j) as i64);
        assert_eq!(m.dims(), (2, 3));
        assert_eq!(m.at(1, 2), 12);
        assert!(m.initialized());
    }

    #[test]
    fn structure_masks_off_band_reads() {
        let ident = FunctorMatrix::new(Identity, 3, 3, |_, _| 1.0f64);
        assert_eq!(ident.at(1, 1), 1.0);
        assert_eq!(ident.at(0, 2), 0.0);
    }

    #[test]
    fn init_closure_is_consulted_live() {
        let populated = std::cell::Cell::new(false);
        let m = FunctorMatrix::with_init(General, 1, 1, |_, _| 0u8, || populated.get());
        assert!(!m.initialized());
        populated.set(true);
        assert!(m.initialized());
    }

    #[test]
    fn composed_imfs_rewrite_coordinates() {
        let m = FunctorMatrix::new(General, 4, 4, |i, j| (10 * i + j) as i32)
            .compose_imfs(&Imf::select(4, vec![3, 1]), &Imf::strided(2, 4, 1, 2));
        assert_eq!(m.dims(), (2, 2));
        assert_eq!(m.at(0, 0), 31);
        assert_eq!(m.at(1, 1), 13);
    }

    #[test]
    fn functor_vector_maps_through_imf() {
        let v = FunctorVector::new(5, |i| i * i);
        assert_eq!(v.len(), 5);
        assert_eq!(v.at(3), 9);
    }
}
