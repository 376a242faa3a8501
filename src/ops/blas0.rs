//! Level-0 primitives: operators applied to scalars.

use crate::algebra::BinaryOp;
use crate::container::Scalar;
use crate::error::AlpResult;

/// `out = a ⊕ b`. Uninitialized inputs propagate into the output flag.
pub fn apply<D1, D2, D3, Op>(
    out: &mut Scalar<D3>,
    a: &Scalar<D1>,
    b: &Scalar<D2>,
    op: Op,
) -> AlpResult<()>
where
    D1: Copy,
    D2: Copy,
    D3: Copy + Default,
    Op: BinaryOp<D1, D2, D3>,
{
    if !a.initialized() || !b.initialized() {
        out.set_initialized(false);
        return Ok(());
    }
    let mut v = D3::default();
    op.apply(&a.value(), &b.value(), &mut v);
    out.set(v);
    Ok(())
}

/// In-place left fold `x = x ⊕ y`.
pub fn foldl<D1, D2, Op>(x: &mut Scalar<D1>, y: &Scalar<D2>, op: Op) -> AlpResult<()>
where
    D1: Copy + Default,
    D2: Copy,
    Op: BinaryOp<D1, D2, D1>,
{
    if !x.initialized() || !y.initialized() {
        x.set_initialized(false);
        return Ok(());
    }
    let mut v = D1::default();
    op.apply(&x.value(), &y.value(), &mut v);
    x.set(v);
    Ok(())
}

/// In-place right fold `y = x ⊕ y`.
pub fn foldr<D1, D2, Op>(x: &Scalar<D1>, y: &mut Scalar<D2>, op: Op) -> AlpResult<()>
where
    D1: Copy,
    D2: Copy + Default,
    Op: BinaryOp<D1, D2, D2>,
{
    if !x.initialized() || !y.initialized() {
        y.set_initialized(false);
        return Ok(());
    }
    let mut v = D2::default();
    op.apply(&x.value(), &y.value(), &mut v);
    y.set(v);
    Ok(())
}

/// Fold `v` into a bare accumulator; the workhorse behind every
/// reduction loop in the higher levels.
#[inline]
pub(crate) fn fold_into<T, Op>(op: Op, acc: &mut T, v: &T)
where
    T: Copy,
    Op: BinaryOp<T, T, T>,
{
    let prev = *acc;
    op.apply(&prev, v, acc);
}
