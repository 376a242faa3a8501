//! Storage and access mapping.
//!
//! An [`Smf`] turns container coordinates `(i,j)` into one linear buffer
//! offset under a concrete layout, and knows how big the buffer must be.
//! An [`Amf`] is the full access path of a (possibly viewed) object: two
//! [`Imf`]s rewrite logical coordinates into container coordinates, then
//! the SMF resolves the offset. The semantic read/write path first asks
//! [`Amf::container_coords`] so it can apply band masking and mirror
//! routing in container coordinates before resolving a slot.

use crate::imf::Imf;
use crate::structure::Structure;

/// Storage mapping function: a layout with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smf {
    /// Dense `rows x cols`, row-major.
    FullRowMajor { rows: usize, cols: usize },
    /// Row-wise packed upper triangle of an `n x n` matrix.
    PackedUpper { n: usize },
    /// Row-wise packed lower triangle of an `n x n` matrix.
    PackedLower { n: usize },
    /// Contiguous vector of length `n`; the column coordinate is ignored.
    Array { n: usize },
}

impl Smf {
    /// Default layout for a structure, per the container factory. Packed
    /// layouts are reserved for the structures whose stored triangle is
    /// exactly the upper or lower one; banded structures fall back to
    /// full storage.
    pub fn for_structure(structure: Structure, rows: usize, cols: usize) -> Smf {
        match structure {
            Structure::UpperTriangular
            | Structure::Symmetric
            | Structure::SymmetricPositiveDefinite => Smf::PackedUpper { n: rows },
            Structure::LowerTriangular => Smf::PackedLower { n: rows },
            _ => Smf::FullRowMajor { rows, cols },
        }
    }

    /// Required buffer length.
    pub fn extent(&self) -> usize {
        match *self {
            Smf::FullRowMajor { rows, cols } => rows * cols,
            Smf::PackedUpper { n } | Smf::PackedLower { n } => n * (n + 1) / 2,
            Smf::Array { n } => n,
        }
    }

    /// Linear offset of `(i,j)`, or `None` when the coordinate is
    /// structurally zero under this layout.
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> Option<usize> {
        match *self {
            Smf::FullRowMajor { rows, cols } => {
                debug_assert!(i < rows && j < cols);
                Some(i * cols + j)
            }
            Smf::PackedUpper { n } => {
                debug_assert!(i < n && j < n);
                // row i starts after i full-to-shrinking rows: i*n - i*(i-1)/2
                (j >= i).then(|| i * (2 * n - i + 1) / 2 + (j - i))
            }
            Smf::PackedLower { n } => {
                debug_assert!(i < n && j < n);
                (j <= i).then(|| i * (i + 1) / 2 + j)
            }
            Smf::Array { n } => {
                debug_assert!(i < n);
                let _ = j;
                Some(i)
            }
        }
    }

    /// Whether the layout stores only one triangle.
    pub fn is_packed(&self) -> bool {
        matches!(self, Smf::PackedUpper { .. } | Smf::PackedLower { .. })
    }
}

/// Access mapping function: `map(i,j) = smf.offset(imf_r(i), imf_c(j))`,
/// with the offset arguments swapped while a transpose is in effect.
///
/// Transposition cannot be folded into the IMFs alone because most
/// layouts are not symmetric in their two arguments, so the AMF carries
/// an explicit flag. Two transposes cancel structurally, which makes the
/// involution property hold by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amf {
    imf_r: Imf,
    imf_c: Imf,
    smf: Smf,
    transposed: bool,
}

impl Amf {
    pub fn new(imf_r: Imf, imf_c: Imf, smf: Smf) -> Self {
        Amf { imf_r, imf_c, smf, transposed: false }
    }

    /// Logical row count (the row-IMF's domain).
    pub fn rows(&self) -> usize {
        self.imf_r.n()
    }

    /// Logical column count (the column-IMF's domain).
    pub fn cols(&self) -> usize {
        self.imf_c.n()
    }

    pub fn smf(&self) -> Smf {
        self.smf
    }

    /// Buffer offset of logical `(i,j)`, or `None` if structurally zero.
    #[inline]
    pub fn map(&self, i: usize, j: usize) -> Option<usize> {
        let r = self.imf_r.map(i);
        let c = self.imf_c.map(j);
        if self.transposed { self.smf.offset(c, r) } else { self.smf.offset(r, c) }
    }

    /// Container coordinates `(row, col)` that logical `(i,j)` resolves
    /// to, after IMF rewriting and transposition.
    #[inline]
    pub fn container_coords(&self, i: usize, j: usize) -> (usize, usize) {
        let r = self.imf_r.map(i);
        let c = self.imf_c.map(j);
        if self.transposed { (c, r) } else { (r, c) }
    }

    /// The access path of the transposed object: IMFs swap roles and the
    /// SMF receives its arguments in the opposite order.
    pub fn transpose(&self) -> Amf {
        Amf {
            imf_r: self.imf_c.clone(),
            imf_c: self.imf_r.clone(),
            smf: self.smf,
            transposed: !self.transposed,
        }
    }

    /// Stacks a further view on top: the new logical coordinates run
    /// through `imf_r`/`imf_c` first, then through this AMF.
    pub fn compose_view(&self, imf_r: &Imf, imf_c: &Imf) -> Amf {
        Amf {
            imf_r: Imf::compose(&self.imf_r, imf_r),
            imf_c: Imf::compose(&self.imf_c, imf_c),
            smf: self.smf,
            transposed: self.transposed,
        }
    }
}
