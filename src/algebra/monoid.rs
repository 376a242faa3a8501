//! Monoids: an associative operator paired with its identity.

use std::marker::PhantomData;

use super::identities::IdentityValue;

/// An operator `Op` together with an identity supplier `Id`.
///
/// The pairing is purely type-level; a monoid value is as cheap to copy as
/// its operator. Reductions ask for the identity in whatever domain they
/// run over via [`Monoid::identity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Monoid<Op, Id> {
    op: Op,
    _id: PhantomData<Id>,
}

impl<Op: Copy + Default, Id> Monoid<Op, Id> {
    pub fn new() -> Self {
        Self { op: Op::default(), _id: PhantomData }
    }

    /// The underlying binary operator.
    #[inline]
    pub fn operator(&self) -> Op {
        self.op
    }

    /// The identity element, materialized in domain `T`.
    #[inline]
    pub fn identity<T>(&self) -> T
    where
        Id: IdentityValue<T>,
    {
        Id::value()
    }
}

#[cfg(test)]
mod tests {
    use super::super::identities::{Infinity, Zero};
    use super::super::ops::{Add, BinaryOp, Min};
    use super::*;

    #[test]
    fn monoid_exposes_operator_and_identity() {
        let plus = Monoid::<Add, Zero>::new();
        let mut acc: i32 = plus.identity();
        for v in [3, 4, 5] {
            let lhs = acc;
            plus.operator().apply(&lhs, &v, &mut acc);
        }
        assert_eq!(acc, 12);

        let min = Monoid::<Min, Infinity>::new();
        assert_eq!(min.identity::<u8>(), u8::MAX);
    }
}
