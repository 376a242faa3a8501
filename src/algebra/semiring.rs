//! Semirings: an additive monoid plus a multiplicative operator.

use std::marker::PhantomData;

use super::identities::{IdentityValue, NegInfinity, One, Zero};
use super::monoid::Monoid;
use super::ops::{Add, Max, Mul};

/// A semiring over operators `AddOp`/`MulOp` with identities `AddId`/`MulId`.
///
/// Multiply-accumulate primitives destructure this into its two halves:
/// the multiplicative operator combines element pairs and the additive
/// monoid accumulates the products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Semiring<AddOp, MulOp, AddId, MulId> {
    add: AddOp,
    mul: MulOp,
    _ids: PhantomData<(AddId, MulId)>,
}

impl<AddOp, MulOp, AddId, MulId> Semiring<AddOp, MulOp, AddId, MulId>
where
    AddOp: Copy + Default,
    MulOp: Copy + Default,
{
    pub fn new() -> Self {
        Self { add: AddOp::default(), mul: MulOp::default(), _ids: PhantomData }
    }

    #[inline]
    pub fn additive_operator(&self) -> AddOp {
        self.add
    }

    #[inline]
    pub fn multiplicative_operator(&self) -> MulOp {
        self.mul
    }

    #[inline]
    pub fn additive_monoid(&self) -> Monoid<AddOp, AddId> {
        Monoid::new()
    }

    #[inline]
    pub fn multiplicative_monoid(&self) -> Monoid<MulOp, MulId> {
        Monoid::new()
    }

    /// The additive identity in domain `T`.
    #[inline]
    pub fn zero<T>(&self) -> T
    where
        AddId: IdentityValue<T>,
    {
        AddId::value()
    }

    /// The multiplicative identity in domain `T`.
    #[inline]
    pub fn one<T>(&self) -> T
    where
        MulId: IdentityValue<T>,
    {
        MulId::value()
    }
}

/// The conventional arithmetic semiring `(+, ×, 0, 1)`.
pub type PlusTimes = Semiring<Add, Mul, Zero, One>;

/// The tropical semiring `(max, +, -∞, 0)`.
pub type MaxPlus = Semiring<Max, Add, NegInfinity, Zero>;

#[cfg(test)]
mod tests {
    use super::super::ops::BinaryOp;
    use super::*;

    #[test]
    fn plus_times_halves() {
        let ring = PlusTimes::new();
        assert_eq!(ring.zero::<f64>(), 0.0);
        assert_eq!(ring.one::<f64>(), 1.0);

        let mut prod = 0.0f64;
        ring.multiplicative_operator().apply(&3.0, &4.0, &mut prod);
        let mut acc = ring.additive_monoid().identity::<f64>();
        let lhs = acc;
        ring.additive_operator().apply(&lhs, &prod, &mut acc);
        assert_eq!(acc, 12.0);
    }

    #[test]
    fn max_plus_identities() {
        let trop = MaxPlus::new();
        assert_eq!(trop.zero::<i32>(), i32::MIN);
        assert_eq!(trop.one::<i32>(), 0);
    }
}
