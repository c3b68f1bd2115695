// Copyright 2025 Lars Brubaker
// License: MIT
//
// Two-limb software wide integers.
//
// Uint64/Int64 are a (hi, lo) pair of u32 limbs and only ever use 32-bit
// operations. Uint128/Int128 are a (hi, lo) pair of Uint64 limbs and only use
// the Uint64 operations. Signed types share the unsigned limb layout and
// differ only in comparison, arithmetic shift and division.

use super::{QuoRem, WideInt};
use crate::error::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Uint64 {
    pub lo: u32,
    pub hi: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Int64(pub Uint64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Uint128 {
    pub lo: Uint64,
    pub hi: Uint64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Int128(pub Uint128);

impl Uint64 {
    pub const MAX: Uint64 = Uint64::new(u32::MAX, u32::MAX);

    #[inline]
    pub const fn new(hi: u32, lo: u32) -> Self {
        Uint64 { lo, hi }
    }

    #[inline]
    fn not(self) -> Self {
        Uint64::new(!self.hi, !self.lo)
    }

    #[inline]
    fn or(self, rhs: Self) -> Self {
        Uint64::new(self.hi | rhs.hi, self.lo | rhs.lo)
    }
}

impl Uint128 {
    pub const MAX: Uint128 = Uint128::new(Uint64::MAX, Uint64::MAX);

    #[inline]
    pub const fn new(hi: Uint64, lo: Uint64) -> Self {
        Uint128 { lo, hi }
    }

    #[inline]
    fn not(self) -> Self {
        Uint128::new(self.hi.not(), self.lo.not())
    }

    #[inline]
    fn or(self, rhs: Self) -> Self {
        Uint128::new(self.hi.or(rhs.hi), self.lo.or(rhs.lo))
    }
}

/// 32x32 -> 64 multiply from four 16x16 partial products.
pub fn uint32x32_64_mul(a: u32, b: u32) -> Uint64 {
    let (ah, al) = (a >> 16, a & 0xffff);
    let (bh, bl) = (b >> 16, b & 0xffff);

    let r0 = al * bl;
    let mut r1 = al * bh;
    let r2 = ah * bl;
    let mut r3 = ah * bh;

    r1 += r0 >> 16;
    r1 = r1.wrapping_add(r2);
    if r1 < r2 {
        r3 = r3.wrapping_add(0x10000);
    }

    Uint64::new(r3.wrapping_add(r1 >> 16), (r1 << 16) | (r0 & 0xffff))
}

pub fn int32x32_64_mul(a: i32, b: i32) -> Int64 {
    let mut s = uint32x32_64_mul(a as u32, b as u32);
    if a < 0 {
        s.hi = s.hi.wrapping_sub(b as u32);
    }
    if b < 0 {
        s.hi = s.hi.wrapping_sub(a as u32);
    }
    Int64(s)
}

/// 64x64 -> 128 multiply from four 32x32 partial products.
pub fn uint64x64_128_mul(a: Uint64, b: Uint64) -> Uint128 {
    let r0 = uint32x32_64_mul(a.lo, b.lo);
    let mut r1 = uint32x32_64_mul(a.lo, b.hi);
    let r2 = uint32x32_64_mul(a.hi, b.lo);
    let mut r3 = uint32x32_64_mul(a.hi, b.hi);

    r1 = r1.add(Uint64::new(0, r0.hi));
    r1 = r1.add(r2);
    if r1.less_than(r2) {
        r3 = r3.add(Uint64::new(1, 0));
    }

    Uint128::new(r3.add(Uint64::new(0, r1.hi)), Uint64::new(r1.lo, r0.lo))
}

pub fn int64x64_128_mul(a: Int64, b: Int64) -> Int128 {
    let mut s = uint64x64_128_mul(a.0, b.0);
    if a.is_negative() {
        s.hi = s.hi.sub(b.0);
    }
    if b.is_negative() {
        s.hi = s.hi.sub(a.0);
    }
    Int128(s)
}

/// Restoring long division over any unsigned wide type.
fn unsigned_divrem<T: WideInt>(mut num: T, mut den: T) -> Result<QuoRem<T>, Error> {
    if den == T::ZERO {
        return Err(Error::DivisionByZero);
    }

    let mut bit = T::ONE;
    // Normalise so den >= num without shifting its top bit out.
    while den.less_than(num) && !den.is_negative() {
        bit = bit.lsl(1);
        den = den.lsl(1);
    }

    let mut quo = T::ZERO;
    while bit != T::ZERO {
        if !num.less_than(den) {
            num = num.sub(den);
            quo = quo.add(bit);
        }
        bit = bit.rsl(1);
        den = den.rsl(1);
    }

    Ok(QuoRem { quo, rem: num })
}

impl WideInt for Uint64 {
    const BITS: u32 = 64;
    const ZERO: Self = Uint64::new(0, 0);
    const ONE: Self = Uint64::new(0, 1);

    fn add(self, rhs: Self) -> Self {
        let lo = self.lo.wrapping_add(rhs.lo);
        let carry = (lo < self.lo) as u32;
        Uint64::new(self.hi.wrapping_add(rhs.hi).wrapping_add(carry), lo)
    }

    fn sub(self, rhs: Self) -> Self {
        let lo = self.lo.wrapping_sub(rhs.lo);
        let borrow = (self.lo < rhs.lo) as u32;
        Uint64::new(self.hi.wrapping_sub(rhs.hi).wrapping_sub(borrow), lo)
    }

    fn mul(self, rhs: Self) -> Self {
        let mut s = uint32x32_64_mul(self.lo, rhs.lo);
        s.hi = s
            .hi
            .wrapping_add(self.lo.wrapping_mul(rhs.hi))
            .wrapping_add(self.hi.wrapping_mul(rhs.lo));
        s
    }

    fn lsl(self, shift: u32) -> Self {
        if shift >= 64 {
            Self::ZERO
        } else if shift >= 32 {
            Uint64::new(self.lo << (shift - 32), 0)
        } else if shift > 0 {
            Uint64::new((self.hi << shift) | (self.lo >> (32 - shift)), self.lo << shift)
        } else {
            self
        }
    }

    fn rsl(self, shift: u32) -> Self {
        if shift >= 64 {
            Self::ZERO
        } else if shift >= 32 {
            Uint64::new(0, self.hi >> (shift - 32))
        } else if shift > 0 {
            Uint64::new(self.hi >> shift, (self.lo >> shift) | (self.hi << (32 - shift)))
        } else {
            self
        }
    }

    fn rsa(self, shift: u32) -> Self {
        let fill = if self.is_negative() { u32::MAX } else { 0 };
        if shift >= 64 {
            Uint64::new(fill, fill)
        } else if shift >= 32 {
            Uint64::new(fill, ((self.hi as i32) >> (shift - 32)) as u32)
        } else if shift > 0 {
            Uint64::new(
                ((self.hi as i32) >> shift) as u32,
                (self.lo >> shift) | (self.hi << (32 - shift)),
            )
        } else {
            self
        }
    }

    fn less_than(self, rhs: Self) -> bool {
        self.hi < rhs.hi || (self.hi == rhs.hi && self.lo < rhs.lo)
    }

    fn negate(self) -> Self {
        self.not().add(Self::ONE)
    }

    fn is_negative(self) -> bool {
        self.hi >> 31 != 0
    }

    fn divrem(self, den: Self) -> Result<QuoRem<Self>, Error> {
        unsigned_divrem(self, den)
    }

    fn from_i64(v: i64) -> Self {
        let v = v as u64;
        Uint64::new((v >> 32) as u32, v as u32)
    }

    fn to_i64(self) -> i64 {
        (((self.hi as u64) << 32) | self.lo as u64) as i64
    }
}

impl WideInt for Uint128 {
    const BITS: u32 = 128;
    const ZERO: Self = Uint128::new(Uint64::ZERO, Uint64::ZERO);
    const ONE: Self = Uint128::new(Uint64::ZERO, Uint64::ONE);

    fn add(self, rhs: Self) -> Self {
        let lo = self.lo.add(rhs.lo);
        let mut hi = self.hi.add(rhs.hi);
        if lo.less_than(self.lo) {
            hi = hi.add(Uint64::ONE);
        }
        Uint128::new(hi, lo)
    }

    fn sub(self, rhs: Self) -> Self {
        let lo = self.lo.sub(rhs.lo);
        let mut hi = self.hi.sub(rhs.hi);
        if self.lo.less_than(rhs.lo) {
            hi = hi.sub(Uint64::ONE);
        }
        Uint128::new(hi, lo)
    }

    fn mul(self, rhs: Self) -> Self {
        let mut s = uint64x64_128_mul(self.lo, rhs.lo);
        s.hi = s.hi.add(self.lo.mul(rhs.hi)).add(self.hi.mul(rhs.lo));
        s
    }

    fn lsl(self, shift: u32) -> Self {
        if shift >= 128 {
            Self::ZERO
        } else if shift >= 64 {
            Uint128::new(self.lo.lsl(shift - 64), Uint64::ZERO)
        } else if shift > 0 {
            Uint128::new(
                self.hi.lsl(shift).or(self.lo.rsl(64 - shift)),
                self.lo.lsl(shift),
            )
        } else {
            self
        }
    }

    fn rsl(self, shift: u32) -> Self {
        if shift >= 128 {
            Self::ZERO
        } else if shift >= 64 {
            Uint128::new(Uint64::ZERO, self.hi.rsl(shift - 64))
        } else if shift > 0 {
            Uint128::new(
                self.hi.rsl(shift),
                self.lo.rsl(shift).or(self.hi.lsl(64 - shift)),
            )
        } else {
            self
        }
    }

    fn rsa(self, shift: u32) -> Self {
        let fill = if self.is_negative() { Uint64::MAX } else { Uint64::ZERO };
        if shift >= 128 {
            Uint128::new(fill, fill)
        } else if shift >= 64 {
            Uint128::new(fill, self.hi.rsa(shift - 64))
        } else if shift > 0 {
            Uint128::new(
                self.hi.rsa(shift),
                self.lo.rsl(shift).or(self.hi.lsl(64 - shift)),
            )
        } else {
            self
        }
    }

    fn less_than(self, rhs: Self) -> bool {
        self.hi.less_than(rhs.hi) || (self.hi == rhs.hi && self.lo.less_than(rhs.lo))
    }

    fn negate(self) -> Self {
        self.not().add(Self::ONE)
    }

    fn is_negative(self) -> bool {
        self.hi.is_negative()
    }

    fn divrem(self, den: Self) -> Result<QuoRem<Self>, Error> {
        unsigned_divrem(self, den)
    }

    fn from_i64(v: i64) -> Self {
        let hi = if v < 0 { Uint64::MAX } else { Uint64::ZERO };
        Uint128::new(hi, Uint64::from_i64(v))
    }

    fn to_i64(self) -> i64 {
        self.lo.to_i64()
    }
}

macro_rules! signed_soft_int {
    ($signed:ident, $unsigned:ident) => {
        impl WideInt for $signed {
            const BITS: u32 = $unsigned::BITS;
            const ZERO: Self = $signed($unsigned::ZERO);
            const ONE: Self = $signed($unsigned::ONE);

            #[inline]
            fn add(self, rhs: Self) -> Self {
                $signed(self.0.add(rhs.0))
            }
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                $signed(self.0.sub(rhs.0))
            }
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                $signed(self.0.mul(rhs.0))
            }
            #[inline]
            fn lsl(self, shift: u32) -> Self {
                $signed(self.0.lsl(shift))
            }
            #[inline]
            fn rsl(self, shift: u32) -> Self {
                $signed(self.0.rsl(shift))
            }
            #[inline]
            fn rsa(self, shift: u32) -> Self {
                $signed(self.0.rsa(shift))
            }

            fn less_than(self, rhs: Self) -> bool {
                match (self.is_negative(), rhs.is_negative()) {
                    (true, false) => true,
                    (false, true) => false,
                    _ => self.0.less_than(rhs.0),
                }
            }

            #[inline]
            fn negate(self) -> Self {
                $signed(self.0.negate())
            }
            #[inline]
            fn is_negative(self) -> bool {
                self.0.is_negative()
            }

            fn divrem(self, den: Self) -> Result<QuoRem<Self>, Error> {
                let num_neg = self.is_negative();
                let den_neg = den.is_negative();
                let num = if num_neg { self.0.negate() } else { self.0 };
                let den = if den_neg { den.0.negate() } else { den.0 };

                let uqr = unsigned_divrem(num, den)?;
                let rem = if num_neg { uqr.rem.negate() } else { uqr.rem };
                let quo = if num_neg != den_neg { uqr.quo.negate() } else { uqr.quo };
                Ok(QuoRem {
                    quo: $signed(quo),
                    rem: $signed(rem),
                })
            }

            #[inline]
            fn from_i64(v: i64) -> Self {
                $signed($unsigned::from_i64(v))
            }
            #[inline]
            fn to_i64(self) -> i64 {
                self.0.to_i64()
            }
        }
    };
}

signed_soft_int!(Int64, Uint64);
signed_soft_int!(Int128, Uint128);

impl From<u64> for Uint64 {
    fn from(v: u64) -> Self {
        Uint64::new((v >> 32) as u32, v as u32)
    }
}

impl From<Uint64> for u64 {
    fn from(v: Uint64) -> Self {
        ((v.hi as u64) << 32) | v.lo as u64
    }
}

impl From<i64> for Int64 {
    fn from(v: i64) -> Self {
        Int64(Uint64::from(v as u64))
    }
}

impl From<Int64> for i64 {
    fn from(v: Int64) -> Self {
        u64::from(v.0) as i64
    }
}

impl From<u128> for Uint128 {
    fn from(v: u128) -> Self {
        Uint128::new(Uint64::from((v >> 64) as u64), Uint64::from(v as u64))
    }
}

impl From<Uint128> for u128 {
    fn from(v: Uint128) -> Self {
        ((u64::from(v.hi) as u128) << 64) | u64::from(v.lo) as u128
    }
}

impl From<i128> for Int128 {
    fn from(v: i128) -> Self {
        Int128(Uint128::from(v as u128))
    }
}

impl From<Int128> for i128 {
    fn from(v: Int128) -> Self {
        u128::from(v.0) as i128
    }
}
