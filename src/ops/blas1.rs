//! Level-1 primitives: vector-valued set, folds, element-wise maps,
//! `dot`, `norm2`, and lazy conjugation.

use num_traits::{Float, Zero as NumZero};

use crate::algebra::{BinaryOp, Conjugate, IdentityValue, Monoid, Semiring};
use crate::container::{FunctorVector, Scalar, Vector, VectorAccess, VectorAccessMut};
use crate::error::{AlpError, AlpResult};

use super::blas0::fold_into;

fn length_check<T>(a: &impl VectorAccess<T>, b: &impl VectorAccess<T>) -> AlpResult<()> {
    if a.len() != b.len() {
        return Err(AlpError::mismatch(format!(
            "vector lengths {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// `y = x`, out-of-place.
pub fn set<T>(y: &mut Vector<T>, x: &impl VectorAccess<T>) -> AlpResult<()>
where
    T: Copy + NumZero,
{
    if y.len() != x.len() {
        return Err(AlpError::mismatch(format!("vector lengths {} and {}", y.len(), x.len())));
    }
    if !x.initialized() {
        y.set_initialized(false);
        return Ok(());
    }
    for i in 0..x.len() {
        let v = x.at(i);
        y.write_at(i, v);
    }
    y.set_initialized(!y.is_empty());
    Ok(())
}

/// `y[i] = alpha` for every `i`.
pub fn set_value<T>(y: &mut Vector<T>, alpha: &Scalar<T>) -> AlpResult<()>
where
    T: Copy + NumZero,
{
    if !alpha.initialized() {
        y.set_initialized(false);
        return Ok(());
    }
    let v = alpha.value();
    for i in 0..y.len() {
        y.write_at(i, v);
    }
    y.set_initialized(!y.is_empty());
    Ok(())
}

/// Reduction `acc = acc ⊕ x[0] ⊕ x[1] ⊕ …` under a monoid. An
/// uninitialized accumulator starts from the identity.
pub fn foldl_scalar<T, Op, Id>(
    acc: &mut Scalar<T>,
    x: &impl VectorAccess<T>,
    monoid: &Monoid<Op, Id>,
) -> AlpResult<()>
where
    T: Copy,
    Op: BinaryOp<T, T, T>,
    Id: IdentityValue<T>,
{
    if !x.initialized() {
        acc.set_initialized(false);
        return Ok(());
    }
    let mut a = if acc.initialized() { acc.value() } else { monoid.identity::<T>() };
    let op = monoid.operator();
    for i in 0..x.len() {
        fold_into(op, &mut a, &x.at(i));
    }
    acc.set(a);
    Ok(())
}

/// Right-fold dual of [`foldl_scalar`]: `acc = x[n-1] ⊕ … ⊕ x[0] ⊕ acc`.
pub fn foldr_scalar<T, Op, Id>(
    x: &impl VectorAccess<T>,
    acc: &mut Scalar<T>,
    monoid: &Monoid<Op, Id>,
) -> AlpResult<()>
where
    T: Copy + Default,
    Op: BinaryOp<T, T, T>,
    Id: IdentityValue<T>,
{
    if !x.initialized() {
        acc.set_initialized(false);
        return Ok(());
    }
    let mut a = if acc.initialized() { acc.value() } else { monoid.identity::<T>() };
    let op = monoid.operator();
    for i in (0..x.len()).rev() {
        let mut v = T::default();
        op.apply(&x.at(i), &a, &mut v);
        a = v;
    }
    acc.set(a);
    Ok(())
}

/// `x[i] = x[i] ⊕ alpha` in place.
pub fn foldl_value<T, Op>(x: &mut Vector<T>, alpha: &Scalar<T>, op: Op) -> AlpResult<()>
where
    T: Copy + NumZero,
    Op: BinaryOp<T, T, T>,
{
    if !x.initialized() || !alpha.initialized() {
        x.set_initialized(false);
        return Ok(());
    }
    let a = alpha.value();
    for v in x.as_mut_slice() {
        let prev = *v;
        op.apply(&prev, &a, v);
    }
    Ok(())
}

/// `x[i] = x[i] ⊕ y[i]` in place.
pub fn foldl<T, Op>(x: &mut Vector<T>, y: &impl VectorAccess<T>, op: Op) -> AlpResult<()>
where
    T: Copy + NumZero,
    Op: BinaryOp<T, T, T>,
{
    length_check(x, y)?;
    if !x.initialized() || !y.initialized() {
        x.set_initialized(false);
        return Ok(());
    }
    for i in 0..y.len() {
        let prev = x.at(i);
        let mut v = prev;
        op.apply(&prev, &y.at(i), &mut v);
        x.write_at(i, v);
    }
    Ok(())
}

/// `y[i] = x[i] ⊕ y[i]` in place.
pub fn foldr<T, Op>(x: &impl VectorAccess<T>, y: &mut Vector<T>, op: Op) -> AlpResult<()>
where
    T: Copy + NumZero,
    Op: BinaryOp<T, T, T>,
{
    length_check(y, x)?;
    if !x.initialized() || !y.initialized() {
        y.set_initialized(false);
        return Ok(());
    }
    for i in 0..x.len() {
        let prev = y.at(i);
        let mut v = prev;
        op.apply(&x.at(i), &prev, &mut v);
        y.write_at(i, v);
    }
    Ok(())
}

/// Out-of-place `z[i] = x[i] ⊕ y[i]`.
pub fn ewise_apply<T, Op>(
    z: &mut Vector<T>,
    x: &impl VectorAccess<T>,
    y: &impl VectorAccess<T>,
    op: Op,
) -> AlpResult<()>
where
    T: Copy + NumZero,
    Op: BinaryOp<T, T, T>,
{
    length_check(z, x)?;
    length_check(z, y)?;
    if !x.initialized() || !y.initialized() {
        z.set_initialized(false);
        return Ok(());
    }
    for i in 0..x.len() {
        let mut v = T::zero();
        op.apply(&x.at(i), &y.at(i), &mut v);
        z.write_at(i, v);
    }
    z.set_initialized(!z.is_empty());
    Ok(())
}

/// As [`ewise_apply`], under a monoid's operator. With one operand
/// uninitialized and the other dense the identity axiom would allow
/// passing the dense side through; this backend keeps the uniform
/// propagation rule and marks the output uninitialized.
pub fn ewise_apply_monoid<T, Op, Id>(
    z: &mut Vector<T>,
    x: &impl VectorAccess<T>,
    y: &impl VectorAccess<T>,
    monoid: &Monoid<Op, Id>,
) -> AlpResult<()>
where
    T: Copy + NumZero,
    Op: BinaryOp<T, T, T>,
    Id: IdentityValue<T>,
{
    ewise_apply(z, x, y, monoid.operator())
}

/// `z = x .* y` under the semiring's multiplicative operator.
pub fn ewise_mul<T, AddOp, MulOp, AddId, MulId>(
    z: &mut Vector<T>,
    x: &impl VectorAccess<T>,
    y: &impl VectorAccess<T>,
    ring: &Semiring<AddOp, MulOp, AddId, MulId>,
) -> AlpResult<()>
where
    T: Copy + NumZero,
    AddOp: BinaryOp<T, T, T>,
    MulOp: BinaryOp<T, T, T>,
{
    ewise_apply(z, x, y, ring.multiplicative_operator())
}

/// `z = x .+ y` under the semiring's additive operator.
pub fn ewise_add<T, AddOp, MulOp, AddId, MulId>(
    z: &mut Vector<T>,
    x: &impl VectorAccess<T>,
    y: &impl VectorAccess<T>,
    ring: &Semiring<AddOp, MulOp, AddId, MulId>,
) -> AlpResult<()>
where
    T: Copy + NumZero,
    AddOp: BinaryOp<T, T, T>,
    MulOp: BinaryOp<T, T, T>,
{
    ewise_apply(z, x, y, ring.additive_operator())
}

/// Applies `f(i, &mut x[i])` to every element.
pub fn ewise_lambda<T>(x: &mut Vector<T>, mut f: impl FnMut(usize, &mut T)) -> AlpResult<()>
where
    T: Copy,
{
    if !x.initialized() {
        return Ok(());
    }
    for (i, v) in x.as_mut_slice().iter_mut().enumerate() {
        f(i, v);
    }
    Ok(())
}

/// Applies `f(i, &mut x[i], y[i])` to every element of two equal-length
/// vectors.
pub fn ewise_lambda2<T>(
    x: &mut Vector<T>,
    y: &impl VectorAccess<T>,
    mut f: impl FnMut(usize, &mut T, T),
) -> AlpResult<()>
where
    T: Copy + NumZero,
{
    length_check(x, y)?;
    if !x.initialized() || !y.initialized() {
        return Ok(());
    }
    for i in 0..y.len() {
        let mut v = x.at(i);
        f(i, &mut v, y.at(i));
        x.write_at(i, v);
    }
    Ok(())
}

/// `out = out ⊕ Σ_i x[i] ⊗ conj(y[i])`: a transient functor vector
/// holds the products and the additive monoid folds it.
pub fn dot<T, AddOp, AddId, MulOp>(
    out: &mut Scalar<T>,
    x: &impl VectorAccess<T>,
    y: &impl VectorAccess<T>,
    add_monoid: &Monoid<AddOp, AddId>,
    mul_op: MulOp,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    AddOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
    MulOp: BinaryOp<T, T, T>,
{
    length_check(x, y)?;
    if !x.initialized() || !y.initialized() {
        out.set_initialized(false);
        return Ok(());
    }
    let products = FunctorVector::new(x.len(), |i| {
        let mut v = T::zero();
        mul_op.apply(&x.at(i), &y.at(i).conj(), &mut v);
        v
    });
    foldl_scalar(out, &products, add_monoid)
}

/// [`dot`] over a semiring, decomposed into its additive monoid and
/// multiplicative operator.
pub fn dot_semiring<T, AddOp, MulOp, AddId, MulId>(
    out: &mut Scalar<T>,
    x: &impl VectorAccess<T>,
    y: &impl VectorAccess<T>,
    ring: &Semiring<AddOp, MulOp, AddId, MulId>,
) -> AlpResult<()>
where
    T: Copy + NumZero + Conjugate,
    AddOp: BinaryOp<T, T, T>,
    MulOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
{
    dot(out, x, y, &ring.additive_monoid(), ring.multiplicative_operator())
}

/// Euclidean norm `sqrt(<x, x>)`; floating-point output only.
pub fn norm2<T, AddOp, MulOp, AddId, MulId>(
    out: &mut Scalar<T>,
    x: &impl VectorAccess<T>,
    ring: &Semiring<AddOp, MulOp, AddId, MulId>,
) -> AlpResult<()>
where
    T: Float + Conjugate + Default,
    AddOp: BinaryOp<T, T, T>,
    MulOp: BinaryOp<T, T, T>,
    AddId: IdentityValue<T>,
{
    let mut sq = Scalar::<T>::new();
    dot_semiring(&mut sq, x, x, ring)?;
    if !sq.initialized() {
        out.set_initialized(false);
        return Ok(());
    }
    out.set(sq.value().sqrt());
    Ok(())
}

/// Lazily conjugated view of `x`; the identity over real element types.
/// No storage is allocated.
pub fn conjugate<'a, T>(x: &'a impl VectorAccess<T>) -> FunctorVector<'a, T>
where
    T: Copy + Conjugate,
{
    FunctorVector::with_init(x.len(), move |i| x.at(i).conj(), move || x.initialized())
}
