// Copyright 2025 Lars Brubaker
// License: MIT
//
// Fixed-point geometric primitives: points, lines, boxes and slopes.
//
// Every predicate here is exact. Products of coordinate differences are formed
// in 128 bits through `wideint`, so no comparison depends on rounding.

use std::cmp::Ordering;

use crate::fixed::Fixed;
use crate::wideint::{div_floor, int64x64_128_mul, Int128, Int64, WideInt};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Fixed,
    pub y: Fixed,
}

impl Point {
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Point {
        Point { x, y }
    }

    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Point {
        Point { x: Fixed::from_int(x), y: Fixed::from_int(y) }
    }
}

/// A directed line through two points. By convention `p1` is the upper end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    #[inline]
    pub const fn new(p1: Point, p2: Point) -> Line {
        Line { p1, p2 }
    }

    /// A vertical line at `x` spanning `top..bottom`.
    #[inline]
    pub const fn vertical(x: Fixed, top: Fixed, bottom: Fixed) -> Line {
        Line { p1: Point { x, y: top }, p2: Point { x, y: bottom } }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.p1.x == self.p2.x
    }

    #[inline]
    pub fn slope(&self) -> Slope {
        Slope::between(self.p1, self.p2)
    }

    /// X coordinate where the line crosses scanline `y`.
    ///
    /// Endpoints are returned unchanged when `y` hits one exactly. Otherwise the
    /// intercept is interpolated with floor rounding and saturated to the
    /// representable range. A horizontal line returns `p1.x`.
    pub fn x_for_y(&self, y: Fixed) -> Fixed {
        if y == self.p1.y {
            return self.p1.x;
        }
        if y == self.p2.y {
            return self.p2.x;
        }
        let dy = self.p2.y.raw() as i64 - self.p1.y.raw() as i64;
        if dy == 0 {
            return self.p1.x;
        }
        let dx = self.p2.x.raw() as i64 - self.p1.x.raw() as i64;
        let t = y.raw() as i64 - self.p1.y.raw() as i64;
        let Ok(step) = div_floor(wide_mul(t, dx), Int128::from_i64(dy)) else {
            return self.p1.x;
        };
        let x = Int128::from_i64(self.p1.x.raw() as i64).add(step);
        let (lo, hi) = (Int128::from_i64(i32::MIN as i64), Int128::from_i64(i32::MAX as i64));
        if x.less_than(lo) {
            Fixed::MIN
        } else if hi.less_than(x) {
            Fixed::MAX
        } else {
            Fixed::from_raw(x.to_i64() as i32)
        }
    }
}

#[inline]
fn wide_mul(a: i64, b: i64) -> Int128 {
    int64x64_128_mul(Int64::from_i64(a), Int64::from_i64(b))
}

/// Axis-aligned box; `p1` is the min corner and `p2` the max corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FixedBox {
    pub p1: Point,
    pub p2: Point,
}

impl FixedBox {
    #[inline]
    pub const fn new(p1: Point, p2: Point) -> FixedBox {
        FixedBox { p1, p2 }
    }

    pub const fn from_ints(x1: i32, y1: i32, x2: i32, y2: i32) -> FixedBox {
        FixedBox { p1: Point::from_ints(x1, y1), p2: Point::from_ints(x2, y2) }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.p1.x >= self.p2.x || self.p1.y >= self.p2.y
    }

    /// Half-open containment: min edges are inside, max edges are not.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.p1.x && p.x < self.p2.x && p.y >= self.p1.y && p.y < self.p2.y
    }

    /// Overlap of two boxes, or `None` when they do not overlap.
    pub fn intersect(&self, other: &FixedBox) -> Option<FixedBox> {
        let b = FixedBox {
            p1: Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
            p2: Point::new(self.p2.x.min(other.p2.x), self.p2.y.min(other.p2.y)),
        };
        if b.is_empty() {
            None
        } else {
            Some(b)
        }
    }
}

/// Direction vector between two points, kept in 64 bits so differences of
/// extreme coordinates cannot overflow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slope {
    pub dx: i64,
    pub dy: i64,
}

impl Slope {
    #[inline]
    pub fn between(a: Point, b: Point) -> Slope {
        Slope {
            dx: b.x.raw() as i64 - a.x.raw() as i64,
            dy: b.y.raw() as i64 - a.y.raw() as i64,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Angular order of two slopes measured from +x toward +y.
    ///
    /// Only meaningful when the angle between them is below pi. Collinear
    /// slopes compare equal, except that a zero vector sorts after everything.
    pub fn compare(&self, other: &Slope) -> Ordering {
        let lhs = wide_mul(self.dy, other.dx);
        let rhs = wide_mul(other.dy, self.dx);
        if rhs.less_than(lhs) {
            return Ordering::Greater;
        }
        if lhs.less_than(rhs) {
            return Ordering::Less;
        }
        if self.is_zero() {
            return Ordering::Greater;
        }
        if other.is_zero() {
            return Ordering::Less;
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::from_ints(x, y)
    }

    #[test]
    fn slope_ordering() {
        let right = Slope::between(p(0, 0), p(10, 0));
        let down_right = Slope::between(p(0, 0), p(10, 10));
        let down = Slope::between(p(0, 0), p(0, 10));
        assert_eq!(right.compare(&down_right), Ordering::Less);
        assert_eq!(down.compare(&down_right), Ordering::Greater);
        assert_eq!(down_right.compare(&Slope::between(p(1, 1), p(4, 4))), Ordering::Equal);
    }

    #[test]
    fn zero_slope_sorts_last() {
        let zero = Slope::default();
        let any = Slope::between(p(0, 0), p(3, 1));
        assert_eq!(zero.compare(&any), Ordering::Greater);
        assert_eq!(any.compare(&zero), Ordering::Less);
    }

    #[test]
    fn slope_compare_extreme_coordinates() {
        let a = Slope::between(Point::new(Fixed::MIN, Fixed::MIN), Point::new(Fixed::MAX, Fixed::MAX));
        let b = Slope::between(Point::new(Fixed::MIN, Fixed::MIN), Point::new(Fixed::MAX, Fixed::from_raw(i32::MAX - 1)));
        assert_eq!(b.compare(&a), Ordering::Less);
    }

    #[test]
    fn x_for_y_endpoints_and_interpolation() {
        let line = Line::new(p(0, 0), p(10, 20));
        assert_eq!(line.x_for_y(Fixed::from_int(0)), Fixed::from_int(0));
        assert_eq!(line.x_for_y(Fixed::from_int(20)), Fixed::from_int(10));
        assert_eq!(line.x_for_y(Fixed::from_int(10)), Fixed::from_int(5));
        // Extrapolates beyond the endpoints.
        assert_eq!(line.x_for_y(Fixed::from_int(-20)), Fixed::from_int(-10));
    }

    #[test]
    fn x_for_y_rounds_down() {
        // x = 3 * 1 / 2 sub-units = 1.5 -> 1
        let line = Line::new(Point::new(Fixed::ZERO, Fixed::ZERO), Point::new(Fixed::from_raw(3), Fixed::from_raw(2)));
        assert_eq!(line.x_for_y(Fixed::from_raw(1)), Fixed::from_raw(1));
        let line = Line::new(Point::new(Fixed::ZERO, Fixed::ZERO), Point::new(Fixed::from_raw(-3), Fixed::from_raw(2)));
        assert_eq!(line.x_for_y(Fixed::from_raw(1)), Fixed::from_raw(-2));
    }

    #[test]
    fn x_for_y_horizontal_and_saturating() {
        let flat = Line::new(p(2, 5), p(9, 5));
        assert_eq!(flat.x_for_y(Fixed::from_int(7)), Fixed::from_int(2));
        let steep = Line::new(Point::new(Fixed::ZERO, Fixed::ZERO), Point::new(Fixed::MAX, Fixed::from_raw(1)));
        assert_eq!(steep.x_for_y(Fixed::from_int(100)), Fixed::MAX);
    }

    #[test]
    fn box_intersection() {
        let a = FixedBox::from_ints(0, 0, 10, 10);
        let b = FixedBox::from_ints(5, -5, 20, 5);
        assert_eq!(a.intersect(&b), Some(FixedBox::from_ints(5, 0, 10, 5)));
        assert_eq!(a.intersect(&FixedBox::from_ints(10, 0, 20, 10)), None);
        assert!(a.contains_point(p(0, 0)));
        assert!(!a.contains_point(p(10, 5)));
        assert!(FixedBox::default().is_empty());
    }
}
