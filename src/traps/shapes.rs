// Copyright 2025 Lars Brubaker
// Triangles and convex quadrilaterals split into trapezoids.
//
// The vertices are sorted top to bottom. The topmost and bottommost vertex
// cut the outline into a left chain and a right chain, both monotone in y.
// Each band between consecutive vertex scanlines becomes one trapezoid
// bounded by the chain segments spanning it.

use std::cmp::Ordering;

use super::Traps;
use crate::error::Error;
use crate::fixed::Fixed;
use crate::geom::{Line, Point, Slope};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    On,
}

impl Side {
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::On => Side::On,
        }
    }
}

/// Which side of the downward diagonal `top -> bottom` holds `p`.
fn side_of(top: Point, bottom: Point, p: Point) -> Side {
    if p == top || p == bottom {
        return Side::On;
    }
    match Slope::between(top, p).compare(&Slope::between(top, bottom)) {
        Ordering::Greater => Side::Left,
        Ordering::Less => Side::Right,
        Ordering::Equal => Side::On,
    }
}

fn sort_top_down(pts: &mut [Point]) {
    pts.sort_by(|a, b| a.y.cmp(&b.y).then(a.x.cmp(&b.x)));
}

/// The chain segment covering the band that ends at `bottom`.
fn segment(chain: &[Point], bottom: Fixed) -> Option<Line> {
    chain
        .windows(2)
        .find(|w| w[1].y >= bottom)
        .map(|w| Line::new(w[0], w[1]))
}

impl Traps {
    /// Add the triangle `t` as at most two trapezoids. Vertex order does not
    /// matter; a degenerate triangle adds nothing. Limits are not applied.
    pub fn tessellate_triangle(&mut self, t: [Point; 3]) -> Result<(), Error> {
        self.status.to_result()?;
        let mut t = t;
        sort_top_down(&mut t);
        let ys = [t[0].y, t[1].y, t[2].y];
        match side_of(t[0], t[2], t[1]) {
            Side::Left => self.fill_chains(&[t[0], t[1], t[2]], &[t[0], t[2]], &ys),
            Side::Right => self.fill_chains(&[t[0], t[2]], &[t[0], t[1], t[2]], &ys),
            Side::On => Ok(()),
        }
    }

    /// Add the convex quadrilateral `q` as at most three trapezoids, for
    /// instance a rotated rectangle. Vertex order does not matter; the result
    /// is unspecified for a concave input. Limits are not applied.
    pub fn tessellate_convex_quad(&mut self, q: [Point; 4]) -> Result<(), Error> {
        self.status.to_result()?;
        let mut q = q;
        sort_top_down(&mut q);
        let ys = [q[0].y, q[1].y, q[2].y, q[3].y];

        let a = side_of(q[0], q[3], q[1]);
        let b = side_of(q[0], q[3], q[2]);
        let (a, b) = match (a, b) {
            (Side::On, Side::On) => return Ok(()),
            (Side::On, b) => (b.opposite(), b),
            (a, Side::On) => (a, a.opposite()),
            sides => sides,
        };

        match (a, b) {
            (Side::Left, Side::Right) => self.fill_chains(&[q[0], q[1], q[3]], &[q[0], q[2], q[3]], &ys),
            (Side::Right, Side::Left) => self.fill_chains(&[q[0], q[2], q[3]], &[q[0], q[1], q[3]], &ys),
            (Side::Left, _) => self.fill_chains(&q, &[q[0], q[3]], &ys),
            _ => self.fill_chains(&[q[0], q[3]], &q, &ys),
        }
    }

    fn fill_chains(&mut self, left: &[Point], right: &[Point], ys: &[Fixed]) -> Result<(), Error> {
        for band in ys.windows(2) {
            let (top, bottom) = (band[0], band[1]);
            if top >= bottom {
                continue;
            }
            if let (Some(l), Some(r)) = (segment(left, bottom), segment(right, bottom)) {
                self.add_trapezoid(top, bottom, l, r)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::FixedBox;

    fn p(x: i32, y: i32) -> Point {
        Point::from_ints(x, y)
    }

    #[test]
    fn sides_of_the_diagonal() {
        let (top, bottom) = (p(0, 0), p(0, 8));
        assert_eq!(side_of(top, bottom, p(-3, 4)), Side::Left);
        assert_eq!(side_of(top, bottom, p(3, 4)), Side::Right);
        assert_eq!(side_of(top, bottom, p(0, 4)), Side::On);
        assert_eq!(side_of(top, bottom, top), Side::On);
        // Horizontal from the top vertex.
        assert_eq!(side_of(top, bottom, p(5, 0)), Side::Right);
        assert_eq!(side_of(top, bottom, p(-5, 0)), Side::Left);
    }

    #[test]
    fn chain_segment_spans_the_band() {
        let chain = [p(0, 0), p(4, 2), p(4, 6), p(0, 8)];
        assert_eq!(segment(&chain, Fixed::from_int(2)), Some(Line::new(p(0, 0), p(4, 2))));
        assert_eq!(segment(&chain, Fixed::from_int(6)), Some(Line::new(p(4, 2), p(4, 6))));
        assert_eq!(segment(&chain, Fixed::from_int(8)), Some(Line::new(p(4, 6), p(0, 8))));
        assert_eq!(segment(&chain, Fixed::from_int(9)), None);
    }

    #[test]
    fn horizontal_top_triangle_is_one_trapezoid() {
        let mut traps = Traps::new();
        traps.tessellate_triangle([p(8, 8), p(0, 0), p(8, 0)]).unwrap();
        assert_eq!(traps.len(), 1);
        let t = traps.as_slice()[0];
        assert_eq!(t.left, Line::new(p(0, 0), p(8, 8)));
        assert_eq!(t.right, Line::new(p(8, 0), p(8, 8)));
        assert_eq!(traps.extents(), FixedBox::from_ints(0, 0, 8, 8));
    }
}
