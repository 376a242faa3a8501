//! The primitive dispatch layer, organized by BLAS-like level.
//!
//! Every primitive follows the same contract: dimension checks first
//! (`Mismatch`), then initialization propagation — an uninitialized
//! input marks the output uninitialized and the call still returns
//! `Ok` — then structure-aware traversal through
//! [`crate::iterate::for_each_in_bands`]. Descriptors modulate dispatch
//! where they are observable: the transpose bits swap an operand's
//! access indices, `DENSE` turns a missing operand into `Illegal`
//! instead of silent propagation.
//!
//! Modules:
//! - [`blas0`]: scalar `apply` / `foldl` / `foldr`.
//! - [`blas1`]: vector set, folds, element-wise maps, `dot`, `norm2`,
//!   `conjugate`.
//! - [`blas2`]: rank-1 `outer` products as functor-backed matrices.
//! - [`blas3`]: matrix set, folds, element-wise maps, `eWiseLambda`,
//!   and the banded `mxm` kernel.
//! - [`io`]: `build*` ingestion, `clear`/`resize`, and the free-function
//!   introspection surface.
//! - [`constants`]: structural constants `I`, `Zero`, and Givens
//!   rotations.

use std::marker::PhantomData;

use crate::container::MatrixAccess;
use crate::descriptor::Descriptor;
use crate::error::{AlpError, AlpResult};
use crate::structure::Structure;

pub mod blas0;
pub mod blas1;
pub mod blas2;
pub mod blas3;
pub mod constants;
pub mod io;

/// Rejects descriptor bits this backend does not interpret: the mask
/// bits (no masked entry points exist) and `USE_INDEX` (no primitive
/// substitutes indices for values).
pub(crate) fn reject_unsupported_bits(desc: Descriptor) -> AlpResult<()> {
    if desc.intersects(Descriptor::INVERT_MASK | Descriptor::STRUCTURAL) {
        return Err(AlpError::Unsupported("mask descriptor bits without a mask operand"));
    }
    if desc.contains(Descriptor::USE_INDEX) {
        return Err(AlpError::Unsupported("index substitution is not implemented"));
    }
    Ok(())
}

/// Operand adapter for the transpose descriptor bits: swaps the access
/// indices and the structure tag, no data moves.
pub(crate) struct TransposedRef<'a, T, A: MatrixAccess<T>> {
    inner: &'a A,
    _elem: PhantomData<T>,
}

impl<'a, T, A: MatrixAccess<T>> TransposedRef<'a, T, A> {
    pub(crate) fn new(inner: &'a A) -> Self {
        TransposedRef { inner, _elem: PhantomData }
    }
}

impl<'a, T, A: MatrixAccess<T>> MatrixAccess<T> for TransposedRef<'a, T, A> {
    fn nrows(&self) -> usize {
        self.inner.ncols()
    }

    fn ncols(&self) -> usize {
        self.inner.nrows()
    }

    fn structure(&self) -> Structure {
        self.inner.structure().transposed()
    }

    fn initialized(&self) -> bool {
        self.inner.initialized()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        self.inner.at(j, i)
    }
}
