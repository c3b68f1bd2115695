// Copyright 2025 Lars Brubaker
// License: MIT
//
// Overflow-safe 64/128-bit integer arithmetic.
//
// Two interchangeable implementations exist:
//   - native: u64/i64/u128/i128
//   - soft:   two-limb (lo/hi) structs built only from 32-bit operations
//
// Both implement `WideInt` with identical wrapping semantics for every input.
// The `soft-wideint` feature selects which one backs the `Int64`/`Int128`
// aliases that the fixed-point and geometry code use.

pub mod soft;

use std::fmt::Debug;

use crate::error::Error;

/// Quotient and remainder from a single division.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuoRem<T> {
    pub quo: T,
    pub rem: T,
}

/// Arithmetic every wide integer type provides.
///
/// All operations wrap on overflow. Shifts by `BITS` or more are defined:
/// logical shifts produce zero, the arithmetic right shift produces the sign
/// fill. Signed `divrem` truncates toward zero and the remainder takes the
/// sign of the dividend; `MIN / -1` wraps to `MIN` with remainder zero.
pub trait WideInt: Copy + Eq + Debug {
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn lsl(self, shift: u32) -> Self;
    fn rsl(self, shift: u32) -> Self;
    fn rsa(self, shift: u32) -> Self;
    /// Ordering under the type's own signedness.
    fn less_than(self, rhs: Self) -> bool;
    fn negate(self) -> Self;
    /// True when the top bit is set.
    fn is_negative(self) -> bool;
    fn divrem(self, den: Self) -> Result<QuoRem<Self>, Error>;

    /// Sign-extending (or truncating) conversion from a native value.
    fn from_i64(v: i64) -> Self;
    /// Truncating conversion to a native value.
    fn to_i64(self) -> i64;
}

macro_rules! native_wide_int {
    ($t:ty, $ut:ty) => {
        impl WideInt for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline]
            fn lsl(self, shift: u32) -> Self {
                self.checked_shl(shift).unwrap_or(0)
            }
            #[inline]
            fn rsl(self, shift: u32) -> Self {
                (self as $ut).checked_shr(shift).unwrap_or(0) as $t
            }
            #[inline]
            fn rsa(self, shift: u32) -> Self {
                let fill = if self.is_negative() { !0 } else { 0 };
                if shift >= Self::BITS {
                    return fill;
                }
                if shift == 0 {
                    return self;
                }
                let logical = (self as $ut) >> shift;
                (logical | ((fill as $ut) << (Self::BITS - shift))) as $t
            }
            #[inline]
            fn less_than(self, rhs: Self) -> bool {
                self < rhs
            }
            #[inline]
            fn negate(self) -> Self {
                self.wrapping_neg()
            }
            #[inline]
            fn is_negative(self) -> bool {
                (self as $ut) >> (Self::BITS - 1) != 0
            }
            fn divrem(self, den: Self) -> Result<QuoRem<Self>, Error> {
                if den == 0 {
                    return Err(Error::DivisionByZero);
                }
                Ok(QuoRem {
                    quo: self.wrapping_div(den),
                    rem: self.wrapping_rem(den),
                })
            }
            #[inline]
            fn from_i64(v: i64) -> Self {
                v as $t
            }
            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }
        }
    };
}

native_wide_int!(u64, u64);
native_wide_int!(i64, u64);
native_wide_int!(u128, u128);
native_wide_int!(i128, u128);

pub mod native {
    //! Native widening multiplies matching the `soft` module's signatures.

    #[inline]
    pub fn uint32x32_64_mul(a: u32, b: u32) -> u64 {
        a as u64 * b as u64
    }

    #[inline]
    pub fn int32x32_64_mul(a: i32, b: i32) -> i64 {
        a as i64 * b as i64
    }

    #[inline]
    pub fn uint64x64_128_mul(a: u64, b: u64) -> u128 {
        a as u128 * b as u128
    }

    #[inline]
    pub fn int64x64_128_mul(a: i64, b: i64) -> i128 {
        a as i128 * b as i128
    }

    pub type Int64 = i64;
    pub type Int128 = i128;
}

#[cfg(not(feature = "soft-wideint"))]
pub use native::{int32x32_64_mul, int64x64_128_mul, Int128, Int64};

#[cfg(feature = "soft-wideint")]
pub use soft::{int32x32_64_mul, int64x64_128_mul, Int128, Int64};

/// Sign of a wide value as -1, 0 or 1.
pub fn signum<T: WideInt>(v: T) -> i32 {
    if v == T::ZERO {
        0
    } else if v.is_negative() {
        -1
    } else {
        1
    }
}

/// Floor division: the quotient rounded toward negative infinity.
pub fn div_floor<T: WideInt>(num: T, den: T) -> Result<T, Error> {
    let qr = num.divrem(den)?;
    if qr.rem != T::ZERO && qr.rem.is_negative() != den.is_negative() {
        Ok(qr.quo.sub(T::ONE))
    } else {
        Ok(qr.quo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_shifts_past_width() {
        assert_eq!(1u64.lsl(64), 0);
        assert_eq!(u64::MAX.rsl(70), 0);
        assert_eq!((-5i64).rsa(64), -1);
        assert_eq!(5i64.rsa(100), 0);
        assert_eq!((-8i64).rsa(1), -4);
        assert_eq!((-8i64).rsl(60), 0xf);
        assert_eq!(i128::MIN.rsa(127), -1);
    }

    #[test]
    fn native_divrem_sign_follows_dividend() {
        let qr = (-7i64).divrem(2).unwrap();
        assert_eq!(qr, QuoRem { quo: -3, rem: -1 });
        let qr = 7i64.divrem(-2).unwrap();
        assert_eq!(qr, QuoRem { quo: -3, rem: 1 });
        let qr = i64::MIN.divrem(-1).unwrap();
        assert_eq!(qr, QuoRem { quo: i64::MIN, rem: 0 });
        assert_eq!(1u128.divrem(0), Err(Error::DivisionByZero));
    }

    #[test]
    fn unsigned_less_than_ignores_sign_bit() {
        assert!(1u64.less_than(u64::MAX));
        assert!((-1i64 as u64).is_negative());
        assert!((-1i64).less_than(1));
    }

    #[test]
    fn floor_division() {
        assert_eq!(div_floor(-7i64, 2), Ok(-4));
        assert_eq!(div_floor(7i64, 2), Ok(3));
        assert_eq!(div_floor(-8i64, 2), Ok(-4));
        assert_eq!(div_floor(7i64, -2), Ok(-4));
        assert_eq!(div_floor(-7i128, -2), Ok(3));
    }

    #[test]
    fn signum_of_wide_values() {
        assert_eq!(signum(0i128), 0);
        assert_eq!(signum(-3i128), -1);
        assert_eq!(signum(i64::MAX), 1);
    }

    #[test]
    fn from_i64_sign_extends() {
        assert_eq!(u128::from_i64(-1), u128::MAX);
        assert_eq!(i128::from_i64(-1), -1);
        assert_eq!(u64::from_i64(-2), u64::MAX - 1);
    }
}
