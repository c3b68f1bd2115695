// Copyright 2025 Lars Brubaker
// The two-limb software integers must agree bit for bit with native ones.

mod helpers;

use rand::rngs::SmallRng;
use rand::Rng;
use trapezoid_region::wideint::soft::{self, Int128, Int64, Uint128, Uint64};
use trapezoid_region::wideint::{self, native, WideInt};
use trapezoid_region::Error;

const SAMPLES: usize = 2000;

/// Random values biased toward the places carries and signs go wrong.
fn interesting_u128(rng: &mut SmallRng) -> u128 {
    match rng.gen_range(0..6) {
        0 => rng.gen::<u128>(),
        1 => rng.gen_range(0..16),
        2 => u128::MAX - rng.gen_range(0..16),
        3 => 1u128 << rng.gen_range(0..128u32),
        4 => (rng.gen::<u64>() as u128) << 32,
        _ => rng.gen::<u64>() as u128 | (u64::MAX as u128) << 64,
    }
}

macro_rules! check_equivalence {
    ($name:ident, $native:ty, $soft:ty) => {
        #[test]
        fn $name() {
            let mut rng = helpers::rng(<$native>::BITS as u64);
            for _ in 0..SAMPLES {
                let (a, b) = (interesting_u128(&mut rng) as $native, interesting_u128(&mut rng) as $native);
                let (sa, sb) = (<$soft>::from(a), <$soft>::from(b));
                let back = |v: $soft| <$native>::from(v);

                assert_eq!(back(sa.add(sb)), a.add(b), "{:#x} + {:#x}", a, b);
                assert_eq!(back(sa.sub(sb)), a.sub(b), "{:#x} - {:#x}", a, b);
                assert_eq!(back(sa.mul(sb)), a.mul(b), "{:#x} * {:#x}", a, b);
                assert_eq!(back(sa.negate()), a.negate(), "-{:#x}", a);
                assert_eq!(sa.less_than(sb), a.less_than(b), "{:#x} < {:#x}", a, b);
                assert_eq!(sa == sb, a == b);
                assert_eq!(sa.is_negative(), WideInt::is_negative(a));
                assert_eq!(sa.to_i64(), a.to_i64());

                let shift = rng.gen_range(0..<$native>::BITS + 4);
                assert_eq!(back(sa.lsl(shift)), a.lsl(shift), "{:#x} << {}", a, shift);
                assert_eq!(back(sa.rsl(shift)), a.rsl(shift), "{:#x} >>> {}", a, shift);
                assert_eq!(back(sa.rsa(shift)), a.rsa(shift), "{:#x} >> {}", a, shift);

                match (sa.divrem(sb), a.divrem(b)) {
                    (Ok(s), Ok(n)) => {
                        assert_eq!(back(s.quo), n.quo, "{:#x} / {:#x}", a, b);
                        assert_eq!(back(s.rem), n.rem, "{:#x} % {:#x}", a, b);
                    }
                    (Err(se), Err(ne)) => {
                        assert_eq!(se, Error::DivisionByZero);
                        assert_eq!(ne, Error::DivisionByZero);
                    }
                    (s, n) => panic!("{:#x} / {:#x}: soft {:?}, native {:?}", a, b, s.is_ok(), n.is_ok()),
                }
            }
        }
    };
}

check_equivalence!(uint64_matches_u64, u64, Uint64);
check_equivalence!(int64_matches_i64, i64, Int64);
check_equivalence!(uint128_matches_u128, u128, Uint128);
check_equivalence!(int128_matches_i128, i128, Int128);

#[test]
fn signed_division_edge_cases() {
    let cases: [(i64, i64); 6] = [(i64::MIN, -1), (i64::MIN, 1), (-7, 2), (7, -2), (-7, -2), (i64::MAX, i64::MIN)];
    for (a, b) in cases {
        let s = Int64::from(a).divrem(Int64::from(b)).unwrap();
        let n = a.divrem(b).unwrap();
        assert_eq!((i64::from(s.quo), i64::from(s.rem)), (n.quo, n.rem), "{} / {}", a, b);
    }
    let q = Int128::from(i128::MIN).divrem(Int128::from(-1i128)).unwrap();
    assert_eq!(i128::from(q.quo), i128::MIN);
    assert_eq!(i128::from(q.rem), 0);
    assert_eq!((-7i64).divrem(2).unwrap().rem, -1);
}

#[test]
fn widening_multiplies_agree() {
    let mut rng = helpers::rng(0x77);
    for _ in 0..SAMPLES {
        let (a, b) = (rng.gen::<u32>(), rng.gen::<u32>());
        assert_eq!(u64::from(soft::uint32x32_64_mul(a, b)), native::uint32x32_64_mul(a, b));
        let (a, b) = (a as i32, b as i32);
        assert_eq!(i64::from(soft::int32x32_64_mul(a, b)), native::int32x32_64_mul(a, b));

        let (a, b) = (interesting_u128(&mut rng) as u64, interesting_u128(&mut rng) as u64);
        assert_eq!(
            u128::from(soft::uint64x64_128_mul(Uint64::from(a), Uint64::from(b))),
            native::uint64x64_128_mul(a, b)
        );
        let (a, b) = (a as i64, b as i64);
        assert_eq!(
            i128::from(soft::int64x64_128_mul(Int64::from(a), Int64::from(b))),
            native::int64x64_128_mul(a, b)
        );
    }
    assert_eq!(native::int64x64_128_mul(i64::MIN, i64::MIN), 1i128 << 126);
}

#[test]
fn floor_division_and_sign() {
    assert_eq!(wideint::div_floor(-7i64, 2), Ok(-4));
    assert_eq!(wideint::div_floor(7i64, -2), Ok(-4));
    assert_eq!(wideint::div_floor(-8i64, 2), Ok(-4));
    assert_eq!(wideint::div_floor(7i64, 2), Ok(3));
    assert_eq!(wideint::div_floor(Int128::from(-7i128), Int128::from(2i128)).map(i128::from), Ok(-4));
    assert_eq!(wideint::div_floor(1i64, 0), Err(Error::DivisionByZero));

    assert_eq!(wideint::signum(Int64::from(-3i64)), -1);
    assert_eq!(wideint::signum(Int64::from(0i64)), 0);
    assert_eq!(wideint::signum(u64::MAX), -1);
    assert_eq!(wideint::signum(5i128), 1);
}
