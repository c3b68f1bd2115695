// Copyright 2025 Lars Brubaker
// License: MIT
//
// 24.8 signed fixed-point numbers.
//
// Every geometric coordinate in the crate is a `Fixed`. Addition, subtraction
// and comparison are plain integer operations. Multiplication and division go
// through a double-width intermediate (`wideint::Int64`) so no intermediate
// product can overflow.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::Error;
use crate::wideint::{div_floor, int32x32_64_mul, Int64, WideInt};

/// Number of fractional bits. 256 sub-units per integer unit.
pub const FRAC_BITS: u32 = 8;
pub const FRAC_MASK: i32 = (1 << FRAC_BITS) - 1;

#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FRAC_BITS);
    pub const MIN: Fixed = Fixed(i32::MIN);
    pub const MAX: Fixed = Fixed(i32::MAX);

    #[inline]
    pub const fn from_raw(raw: i32) -> Fixed {
        Fixed(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_int(i: i32) -> Fixed {
        Fixed(i << FRAC_BITS)
    }

    /// Rounds to the nearest representable value; out-of-range and NaN
    /// inputs saturate (NaN maps to zero).
    #[inline]
    pub fn from_f64(d: f64) -> Fixed {
        Fixed((d * (1 << FRAC_BITS) as f64).round() as i32)
    }

    /// Converts a 26.6 value (the common font-outline format).
    #[inline]
    pub const fn from_26_6(i: i32) -> Fixed {
        Fixed(i << (FRAC_BITS - 6))
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1 << FRAC_BITS) as f64
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        self.0 & FRAC_MASK == 0
    }

    /// Integer part, rounding toward negative infinity.
    #[inline]
    pub const fn integer_part(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    #[inline]
    pub const fn integer_floor(self) -> i32 {
        self.integer_part()
    }

    #[inline]
    pub const fn integer_ceil(self) -> i32 {
        if self.is_integer() {
            self.integer_part()
        } else {
            self.integer_part() + 1
        }
    }

    #[inline]
    pub const fn fractional_part(self) -> Fixed {
        Fixed(self.0 & FRAC_MASK)
    }

    /// Product rounded toward negative infinity; wraps if the result leaves
    /// the 32-bit range.
    pub fn mul(self, rhs: Fixed) -> Fixed {
        let wide = int32x32_64_mul(self.0, rhs.0);
        Fixed(wide.rsa(FRAC_BITS).to_i64() as i32)
    }

    /// `self / rhs`, truncated toward zero.
    pub fn checked_div(self, rhs: Fixed) -> Result<Fixed, Error> {
        let num = Int64::from_i64(self.0 as i64).lsl(FRAC_BITS);
        let qr = num.divrem(Int64::from_i64(rhs.0 as i64))?;
        narrow(qr.quo)
    }

    /// `self * b / c` with a 64-bit intermediate, truncated toward zero.
    pub fn mul_div(self, b: Fixed, c: Fixed) -> Result<Fixed, Error> {
        let qr = int32x32_64_mul(self.0, b.0).divrem(Int64::from_i64(c.0 as i64))?;
        narrow(qr.quo)
    }

    /// `self * b / c` with a 64-bit intermediate, rounded toward negative
    /// infinity.
    pub fn mul_div_floor(self, b: Fixed, c: Fixed) -> Result<Fixed, Error> {
        let quo = div_floor(int32x32_64_mul(self.0, b.0), Int64::from_i64(c.0 as i64))?;
        narrow(quo)
    }
}

fn narrow(v: Int64) -> Result<Fixed, Error> {
    i32::try_from(v.to_i64()).map(Fixed).map_err(|_| Error::Overflow)
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl From<i32> for Fixed {
    fn from(i: i32) -> Fixed {
        Fixed::from_int(i)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}
