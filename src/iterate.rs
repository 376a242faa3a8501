//! Banded iteration: enumerate the stored coordinates of a structure.
//!
//! Every matrix primitive walks its output (or operand) through this
//! engine. For a band `[lo, hi)` of diagonals on an `m x n` matrix, the
//! rows with at least one in-range column are `[max(0, 1-hi), min(m,
//! n-lo))`, and within row `i` the columns are `[max(0, i+lo), min(n,
//! i+hi))`. Symmetric and hermitian outputs additionally clamp columns
//! to the stored upper triangle; the mirrored half follows by
//! structure, never by iteration.

use crate::structure::{Band, Structure};

/// Half-open row range of `band` on an `rows x cols` matrix.
pub fn row_bounds(band: Band, rows: usize, cols: usize) -> (usize, usize) {
    let i_lo = (1 - band.hi).max(0).min(rows as isize) as usize;
    let i_hi = (cols as isize - band.lo).clamp(0, rows as isize) as usize;
    (i_lo, i_hi.max(i_lo))
}

/// Half-open column range of `band` at row `i` on `cols` columns.
#[inline]
pub fn col_bounds(band: Band, i: usize, cols: usize) -> (usize, usize) {
    let j_lo = (i as isize + band.lo).max(0).min(cols as isize) as usize;
    let j_hi = (i as isize + band.hi).clamp(0, cols as isize) as usize;
    (j_lo, j_hi.max(j_lo))
}

/// Visits every stored `(i, j)` of `structure` on `rows x cols`, band by
/// band, rows ascending, columns ascending within a row.
///
/// With `clamp_upper` the column range starts no earlier than the
/// diagonal; matrix primitives set it for mirror-structured outputs so
/// writes stay inside the stored triangle.
pub fn for_each_in_bands(
    structure: Structure,
    rows: usize,
    cols: usize,
    clamp_upper: bool,
    mut f: impl FnMut(usize, usize),
) {
    for band in structure.bands(rows, cols) {
        let (i_lo, i_hi) = row_bounds(band, rows, cols);
        for i in i_lo..i_hi {
            let (mut j_lo, j_hi) = col_bounds(band, i, cols);
            if clamp_upper {
                j_lo = j_lo.max(i);
            }
            for j in j_lo..j_hi {
                f(i, j);
            }
        }
    }
}

/// Number of structurally non-zero coordinates of `structure` on
/// `rows x cols`; what `nnz` reports for an initialized container.
pub fn band_nnz(structure: Structure, rows: usize, cols: usize) -> usize {
    let mut count = 0usize;
    for band in structure.bands(rows, cols) {
        let (i_lo, i_hi) = row_bounds(band, rows, cols);
        for i in i_lo..i_hi {
            let (j_lo, j_hi) = col_bounds(band, i, cols);
            count += j_hi - j_lo;
        }
    }
    count
}
