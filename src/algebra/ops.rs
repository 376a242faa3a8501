//! Binary operators as zero-sized types.
//!
//! An operator relates three domains: `apply` reads a `D1` and a `D2` and
//! writes a `D3`. The in-place shapes (`foldl`, `foldr`) are derived from
//! `apply` by the level-0 helpers in [`crate::ops::blas0`], so operator
//! types only ever implement `apply`. All built-ins are `Copy` unit structs;
//! instances carry no state and cost nothing to pass around.

use num_complex::Complex;
use num_traits::Num;

/// A binary operator over domains `D1 × D2 → D3`.
pub trait BinaryOp<D1, D2, D3>: Copy + Default {
    /// Whether `(a ⊕ b) ⊕ c = a ⊕ (b ⊕ c)` holds on the nose.
    const ASSOCIATIVE: bool;
    /// Whether `a ⊕ b = b ⊕ a`.
    const COMMUTATIVE: bool;

    /// `*out = a ⊕ b`.
    fn apply(&self, a: &D1, b: &D2, out: &mut D3);
}

/// Element conjugation; the identity on real and integral types.
pub trait Conjugate: Copy {
    /// Whether the type carries an imaginary part. Decides whether a
    /// self-adjoint product is tagged `Symmetric` or `Hermitian`.
    const COMPLEX: bool;

    fn conj(self) -> Self;
}

macro_rules! real_conjugate {
    ($($t:ty),*) => {$(
        impl Conjugate for $t {
            const COMPLEX: bool = false;

            #[inline]
            fn conj(self) -> Self {
                self
            }
        }
    )*};
}

real_conjugate!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool);

impl<T: Clone + num_traits::Num + std::ops::Neg<Output = T> + Copy> Conjugate for Complex<T> {
    const COMPLEX: bool = true;

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }
}

macro_rules! arith_op {
    ($(#[$doc:meta])* $name:ident, $assoc:expr, $comm:expr, |$a:ident, $b:ident| $body:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<T: Num + Copy> BinaryOp<T, T, T> for $name {
            const ASSOCIATIVE: bool = $assoc;
            const COMMUTATIVE: bool = $comm;

            #[inline]
            fn apply(&self, $a: &T, $b: &T, out: &mut T) {
                *out = $body;
            }
        }
    };
}

arith_op!(
    /// `out = a + b`.
    Add, true, true, |a, b| *a + *b
);
arith_op!(
    /// `out = a * b`.
    Mul, true, true, |a, b| *a * *b
);
arith_op!(
    /// `out = a - b`.
    Subtract, false, false, |a, b| *a - *b
);

/// `out = min(a, b)`; on ties, the left operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl<T: PartialOrd + Copy + Default> BinaryOp<T, T, T> for Min {
    const ASSOCIATIVE: bool = true;
    const COMMUTATIVE: bool = true;

    #[inline]
    fn apply(&self, a: &T, b: &T, out: &mut T) {
        *out = if *b < *a { *b } else { *a };
    }
}

/// `out = max(a, b)`; on ties, the left operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

impl<T: PartialOrd + Copy + Default> BinaryOp<T, T, T> for Max {
    const ASSOCIATIVE: bool = true;
    const COMMUTATIVE: bool = true;

    #[inline]
    fn apply(&self, a: &T, b: &T, out: &mut T) {
        *out = if *b > *a { *b } else { *a };
    }
}

/// `out = a`, discarding the right operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeftAssign;

impl<T: Copy + Default> BinaryOp<T, T, T> for LeftAssign {
    const ASSOCIATIVE: bool = false;
    const COMMUTATIVE: bool = false;

    #[inline]
    fn apply(&self, a: &T, _b: &T, out: &mut T) {
        *out = *a;
    }
}

/// `out = b`, discarding the left operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RightAssign;

impl<T: Copy + Default> BinaryOp<T, T, T> for RightAssign {
    const ASSOCIATIVE: bool = false;
    const COMMUTATIVE: bool = false;

    #[inline]
    fn apply(&self, _a: &T, b: &T, out: &mut T) {
        *out = *b;
    }
}

/// Returns either operand; both are assumed equal wherever the result is
/// observed. Picks the left one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyOr;

impl<T: Copy + Default> BinaryOp<T, T, T> for AnyOr {
    const ASSOCIATIVE: bool = true;
    const COMMUTATIVE: bool = true;

    #[inline]
    fn apply(&self, a: &T, _b: &T, out: &mut T) {
        *out = *a;
    }
}

/// Boolean disjunction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalOr;

impl BinaryOp<bool, bool, bool> for LogicalOr {
    const ASSOCIATIVE: bool = true;
    const COMMUTATIVE: bool = true;

    #[inline]
    fn apply(&self, a: &bool, b: &bool, out: &mut bool) {
        *out = *a || *b;
    }
}

/// Boolean conjunction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalAnd;

impl BinaryOp<bool, bool, bool> for LogicalAnd {
    const ASSOCIATIVE: bool = true;
    const COMMUTATIVE: bool = true;

    #[inline]
    fn apply(&self, a: &bool, b: &bool, out: &mut bool) {
        *out = *a && *b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arith_ops_apply() {
        let mut out = 0i64;
        Add.apply(&3, &4, &mut out);
        assert_eq!(out, 7);
        Mul.apply(&3, &4, &mut out);
        assert_eq!(out, 12);
        Subtract.apply(&3, &4, &mut out);
        assert_eq!(out, -1);
    }

    #[test]
    fn order_ops_apply() {
        let mut out = 0.0f64;
        Min.apply(&2.5, &1.5, &mut out);
        assert_eq!(out, 1.5);
        Max.apply(&2.5, &1.5, &mut out);
        assert_eq!(out, 2.5);
    }

    #[test]
    fn assign_ops_pick_a_side() {
        let mut out = 0u32;
        LeftAssign.apply(&1, &2, &mut out);
        assert_eq!(out, 1);
        RightAssign.apply(&1, &2, &mut out);
        assert_eq!(out, 2);
    }

    #[test]
    fn complex_conjugation() {
        use num_complex::Complex64;
        let z = Complex64::new(1.0, 2.0);
        assert_eq!(Conjugate::conj(z), Complex64::new(1.0, -2.0));
        assert_eq!(Conjugate::conj(3.5f64), 3.5);
    }

    #[test]
    fn complex_ops_apply() {
        use num_complex::Complex64;
        let mut out = Complex64::new(0.0, 0.0);
        Mul.apply(&Complex64::new(0.0, 1.0), &Complex64::new(0.0, 1.0), &mut out);
        assert_eq!(out, Complex64::new(-1.0, 0.0));
    }
}
