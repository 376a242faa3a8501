//! Operators, identities, monoids, and semirings.
//!
//! Modules:
//! - [`ops`]: the `BinaryOp` trait and the built-in zero-sized operators.
//! - [`identities`]: identity elements as zero-sized types.
//! - [`monoid`]: an associative operator coupled with an identity.
//! - [`semiring`]: an additive monoid, a multiplicative operator, and a
//!   multiplicative monoid, with the decomposition accessors level-1/3
//!   code relies on.

pub mod identities;
pub mod monoid;
pub mod ops;
pub mod semiring;

pub use identities::IdentityValue;
pub use monoid::Monoid;
pub use ops::{
    Add, AnyOr, BinaryOp, Conjugate, LeftAssign, LogicalAnd, LogicalOr, Max, Min, Mul,
    RightAssign, Subtract,
};
pub use semiring::{MaxPlus, PlusTimes, Semiring};
