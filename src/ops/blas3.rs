//! Level-3 primitives: matrix set, folds, element-wise maps,
//! `eWiseLambda`, lazy conjugation, and the banded `mxm` kernel.
//!
//! Iteration always follows the *output's* band set, clamped to the
//! stored upper triangle for mirror-structured outputs; the mirrored
//! half of a symmetric or hermitian operand is read through the
//! containers' semantic accessors, so no extra passes over the
//! non-stored triangle are needed.

use num_traits::Zero as NumZero;

use crate::algebra::{BinaryOp, Conjugate, IdentityValue, Monoid, Semiring};
use crate::container::{FunctorMatrix, MatrixAccess, MatrixAccessMut, Scalar};
use crate::descriptor::Descriptor;
use crate::error::{AlpError, AlpResult};
use crate::iterate::for_each_in_bands;

use super::TransposedRef;

fn dims_check<T>(c: &impl MatrixAccess<T>, a: &impl MatrixAccess<T>) -> AlpResult<()> {
    if c.dims() != a.dims() {
        return Err(AlpError::mismatch(format!(
            "matrix dimensions {:?} and {:?}",
            c.dims(),
            a.dims()
        )));
    }
    Ok(())
}

fn structure_check<T>(c: &impl MatrixAccess<T>, a: &impl MatrixAccess<T>) -> AlpResult<()> {
    if !a.structure().is_a(c.structure()) {
        return Err(AlpError::mismatch(format!(
            "a {:?} operand cannot populate a {:?} output",
            a.structure(),
            c.structure()
        )));
    }
    Ok(())
}

/// `C = A`, out-of-place. The operand's structure must imply the
/// output's.
pub fn set<T>(c: &mut impl MatrixAccessMut<T>, a: &impl MatrixAccess<T>) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
{
    dims_check(c, a)?;
    structure_check(c, a)?;
    if !a.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut pending = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| {
        pending.push((i, j, a.at(i, j)));
    });
    for (i, j, v) in pending {
        c.write_at(i, j, v);
    }
    c.set_initialized(rows * cols > 0);
    Ok(())
}

/// `C[i,j] = alpha` on every stored coordinate.
pub fn set_value<T>(c: &mut impl MatrixAccessMut<T>, alpha: &Scalar<T>) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
{
    if !alpha.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let (rows, cols) = c.dims();
    let v = alpha.value();
    fill_stored(c, v);
    c.set_initialized(rows * cols > 0);
    Ok(())
}

fn fill_stored<T>(c: &mut impl MatrixAccessMut<T>, v: T)
where
    T: Copy + NumZero + Conjugate,
{
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut coords = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| coords.push((i, j)));
    for (i, j) in coords {
        c.write_at(i, j, v);
    }
}

/// In-place `C[i,j] = C[i,j] ⊕ alpha` over the stored coordinates.
pub fn foldl_value<T, Op>(c: &mut impl MatrixAccessMut<T>, alpha: &Scalar<T>, op: Op) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    if !c.initialized() || !alpha.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let a = alpha.value();
    fold_stored(c, |prev, out, op_ref: &Op| op_ref.apply(&prev, &a, out), op);
    Ok(())
}

/// In-place `C[i,j] = alpha ⊕ C[i,j]` over the stored coordinates.
pub fn foldr_value<T, Op>(alpha: &Scalar<T>, c: &mut impl MatrixAccessMut<T>, op: Op) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    if !c.initialized() || !alpha.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let a = alpha.value();
    fold_stored(c, |prev, out, op_ref: &Op| op_ref.apply(&a, &prev, out), op);
    Ok(())
}

fn fold_stored<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    f: impl Fn(T, &mut T, &Op),
    op: Op,
) where
    T: Copy + NumZero + Conjugate,
{
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut coords = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| coords.push((i, j)));
    for (i, j) in coords {
        let prev = c.at(i, j);
        let mut v = prev;
        f(prev, &mut v, &op);
        c.write_at(i, j, v);
    }
}

/// In-place `C = C ⊕ A` element-wise over the output's stored
/// coordinates.
pub fn foldl<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    op: Op,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    dims_check(c, a)?;
    structure_check(c, a)?;
    if !c.initialized() || !a.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut coords = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| coords.push((i, j)));
    for (i, j) in coords {
        let prev = c.at(i, j);
        let mut v = prev;
        op.apply(&prev, &a.at(i, j), &mut v);
        c.write_at(i, j, v);
    }
    Ok(())
}

/// Out-of-place `C[i,j] = A[i,j] ⊕ B[i,j]` over the output's stored
/// coordinates.
pub fn ewise_apply<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    op: Op,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    ewise_apply_desc(c, a, b, op, Descriptor::NO_OPERATION)
}

/// As [`ewise_apply`], honoring the transpose and dense descriptor
/// bits.
pub fn ewise_apply_desc<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    op: Op,
    desc: Descriptor,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    super::reject_unsupported_bits(desc)?;
    let ta = desc.contains(Descriptor::TRANSPOSE_LEFT);
    let tb = desc.contains(Descriptor::TRANSPOSE_RIGHT);
    match (ta, tb) {
        (false, false) => ewise_apply_generic(c, a, b, op, desc),
        (true, false) => ewise_apply_generic(c, &TransposedRef::new(a), b, op, desc),
        (false, true) => ewise_apply_generic(c, a, &TransposedRef::new(b), op, desc),
        (true, true) => {
            ewise_apply_generic(c, &TransposedRef::new(a), &TransposedRef::new(b), op, desc)
        }
    }
}

fn ewise_apply_generic<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    op: Op,
    desc: Descriptor,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    dims_check(c, a)?;
    dims_check(c, b)?;
    structure_check(c, a)?;
    structure_check(c, b)?;
    if !a.initialized() || !b.initialized() {
        if desc.contains(Descriptor::DENSE) {
            return Err(AlpError::illegal("dense descriptor on an uninitialized operand"));
        }
        c.set_initialized(false);
        return Ok(());
    }
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut pending = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| {
        let mut v = T::zero();
        op.apply(&a.at(i, j), &b.at(i, j), &mut v);
        pending.push((i, j, v));
    });
    for (i, j, v) in pending {
        c.write_at(i, j, v);
    }
    c.set_initialized(rows * cols > 0);
    Ok(())
}

/// [`ewise_apply`] under a monoid's operator.
pub fn ewise_apply_monoid<T, Op, Id>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    monoid: &Monoid<Op, Id>,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
    Id: IdentityValue<T>,
{
    ewise_apply(c, a, b, monoid.operator())
}

/// Out-of-place `C[i,j] = alpha ⊕ B[i,j]`.
pub fn ewise_apply_left_value<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    alpha: &Scalar<T>,
    b: &impl MatrixAccess<T>,
    op: Op,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    dims_check(c, b)?;
    structure_check(c, b)?;
    if !alpha.initialized() || !b.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let a = alpha.value();
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut pending = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| {
        let mut v = T::zero();
        op.apply(&a, &b.at(i, j), &mut v);
        pending.push((i, j, v));
    });
    for (i, j, v) in pending {
        c.write_at(i, j, v);
    }
    c.set_initialized(rows * cols > 0);
    Ok(())
}

/// Out-of-place `C[i,j] = A[i,j] ⊕ alpha`.
pub fn ewise_apply_right_value<T, Op>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    alpha: &Scalar<T>,
    op: Op,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    Op: BinaryOp<T, T, T>,
{
    dims_check(c, a)?;
    structure_check(c, a)?;
    if !alpha.initialized() || !a.initialized() {
        c.set_initialized(false);
        return Ok(());
    }
    let al = alpha.value();
    let (rows, cols) = c.dims();
    let clamp = c.structure().mirrors();
    let mut pending = Vec::new();
    for_each_in_bands(c.structure(), rows, cols, clamp, |i, j| {
        let mut v = T::zero();
        op.apply(&a.at(i, j), &al, &mut v);
        pending.push((i, j, v));
    });
    for (i, j, v) in pending {
        c.write_at(i, j, v);
    }
    c.set_initialized(rows * cols > 0);
    Ok(())
}

/// Applies `f(i, j, &mut A[i,j])` to every stored coordinate of `A`.
pub fn ewise_lambda<T>(
    a: &mut impl MatrixAccessMut<T>,
    mut f: impl FnMut(usize, usize, &mut T),
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
{
    if !a.initialized() {
        return Ok(());
    }
    let (rows, cols) = a.dims();
    let clamp = a.structure().mirrors();
    let mut coords = Vec::new();
    for_each_in_bands(a.structure(), rows, cols, clamp, |i, j| coords.push((i, j)));
    for (i, j) in coords {
        let mut v = a.at(i, j);
        f(i, j, &mut v);
        a.write_at(i, j, v);
    }
    Ok(())
}

/// Lazily conjugated view of `A`; structure and initialization state
/// are preserved, no storage is allocated.
pub fn conjugate<'a, T>(a: &'a impl MatrixAccess<T>) -> FunctorMatrix<'a, T>
where
    T: Copy + NumZero + Conjugate,
{
    FunctorMatrix::with_init(
        a.structure(),
        a.nrows(),
        a.ncols(),
        move |i, j| a.at(i, j).conj(),
        move || a.initialized(),
    )
}

/// `C[i,j] ⊕= Σ_k A[i,k] ⊗ B[k,j]` over a semiring.
pub fn mxm<T, AddOp, MulOp, AddId, MulId>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    ring: &Semiring<AddOp, MulOp, AddId, MulId>,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    AddOp: BinaryOp<T, T, T>,
    MulOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
{
    mxm_desc(c, a, b, ring, Descriptor::NO_OPERATION)
}

/// As [`mxm`], honoring the transpose and dense descriptor bits.
pub fn mxm_desc<T, AddOp, MulOp, AddId, MulId>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    ring: &Semiring<AddOp, MulOp, AddId, MulId>,
    desc: Descriptor,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    AddOp: BinaryOp<T, T, T>,
    MulOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
{
    super::reject_unsupported_bits(desc)?;
    let monoid = ring.additive_monoid();
    let mul = ring.multiplicative_operator();
    let ta = desc.contains(Descriptor::TRANSPOSE_LEFT);
    let tb = desc.contains(Descriptor::TRANSPOSE_RIGHT);
    match (ta, tb) {
        (false, false) => mxm_band_generic(c, a, b, &monoid, mul, desc),
        (true, false) => mxm_band_generic(c, &TransposedRef::new(a), b, &monoid, mul, desc),
        (false, true) => mxm_band_generic(c, a, &TransposedRef::new(b), &monoid, mul, desc),
        (true, true) => mxm_band_generic(
            c,
            &TransposedRef::new(a),
            &TransposedRef::new(b),
            &monoid,
            mul,
            desc,
        ),
    }
}

/// Monoid-plus-operator form of [`mxm`].
pub fn mxm_monoid_op<T, AddOp, AddId, MulOp>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    add_monoid: &Monoid<AddOp, AddId>,
    mul_op: MulOp,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    AddOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
    MulOp: BinaryOp<T, T, T>,
{
    mxm_band_generic(c, a, b, add_monoid, mul_op, Descriptor::NO_OPERATION)
}

/// The banded multiply-accumulate driver.
///
/// For every pair of non-zero bands of `A` and `B`, row `i` contributes
/// to columns `j` with `j - i` inside the band sum, and the inner `k`
/// runs over the intersection of `A`'s band at row `i` with `B`'s band
/// at column `j`, ascending. A mirror-structured output clamps `j` to
/// its stored triangle; mirrored operand reads resolve through the
/// semantic accessors.
fn mxm_band_generic<T, AddOp, AddId, MulOp>(
    c: &mut impl MatrixAccessMut<T>,
    a: &impl MatrixAccess<T>,
    b: &impl MatrixAccess<T>,
    add_monoid: &Monoid<AddOp, AddId>,
    mul_op: MulOp,
    desc: Descriptor,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    AddOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
    MulOp: BinaryOp<T, T, T>,
{
    let (m, n) = c.dims();
    let k_dim = a.ncols();
    if a.nrows() != m || b.nrows() != k_dim || b.ncols() != n {
        return Err(AlpError::mismatch(format!(
            "mxm shapes {:?} = {:?} * {:?}",
            c.dims(),
            a.dims(),
            b.dims()
        )));
    }
    if !a.initialized() || !b.initialized() {
        if desc.contains(Descriptor::DENSE) {
            return Err(AlpError::illegal("dense descriptor on an uninitialized operand"));
        }
        c.set_initialized(false);
        return Ok(());
    }
    if !c.initialized() {
        fill_stored(c, add_monoid.identity::<T>());
        c.set_initialized(m * n > 0);
    }

    let add = add_monoid.operator();
    let clamp = c.structure().mirrors();
    for band_a in a.structure().bands(m, k_dim) {
        for band_b in b.structure().bands(k_dim, n) {
            for i in 0..m {
                let ii = i as isize;
                let j_lo = (ii + band_a.lo + band_b.lo)
                    .max(if clamp { ii } else { 0 })
                    .max(0)
                    .min(n as isize) as usize;
                let j_hi = (ii + band_a.hi + band_b.hi - 1).clamp(0, n as isize) as usize;
                for j in j_lo..j_hi {
                    let jj = j as isize;
                    let k_lo =
                        (ii + band_a.lo).max(jj - band_b.hi + 1).max(0).min(k_dim as isize) as usize;
                    let k_hi = (ii + band_a.hi).min(jj - band_b.lo + 1).clamp(0, k_dim as isize)
                        as usize;
                    if k_lo >= k_hi {
                        continue;
                    }
                    let mut acc = c.at(i, j);
                    for k in k_lo..k_hi {
                        let mut prod = T::zero();
                        mul_op.apply(&a.at(i, k), &b.at(k, j), &mut prod);
                        let prev = acc;
                        add.apply(&prev, &prod, &mut acc);
                    }
                    c.write_at(i, j, acc);
                }
            }
        }
    }
    Ok(())
}
