//! Identity element suppliers.
//!
//! Monoids pair an operator with one of these; `value::<T>()` materializes
//! the identity in the domain the monoid is instantiated over.

use num_traits::{Bounded, One as NumOne, Zero as NumZero};

/// Produces the identity element of a monoid in domain `T`.
pub trait IdentityValue<T> {
    fn value() -> T;
}

/// Additive identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zero;

impl<T: NumZero> IdentityValue<T> for Zero {
    #[inline]
    fn value() -> T {
        T::zero()
    }
}

/// Multiplicative identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct One;

impl<T: NumOne> IdentityValue<T> for One {
    #[inline]
    fn value() -> T {
        T::one()
    }
}

/// Identity of `min`: the largest representable value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Infinity;

impl<T: Bounded> IdentityValue<T> for Infinity {
    #[inline]
    fn value() -> T {
        T::max_value()
    }
}

/// Identity of `max`: the smallest representable value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegInfinity;

impl<T: Bounded> IdentityValue<T> for NegInfinity {
    #[inline]
    fn value() -> T {
        T::min_value()
    }
}

/// Identity of logical `and`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalTrue;

impl IdentityValue<bool> for LogicalTrue {
    #[inline]
    fn value() -> bool {
        true
    }
}

/// Identity of logical `or`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalFalse;

impl IdentityValue<bool> for LogicalFalse {
    #[inline]
    fn value() -> bool {
        false
    }
}
