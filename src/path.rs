// Copyright 2025 Lars Brubaker
// License: MIT
//
// Fixed-point path recording and replay.
//
// `PathSink` is the visitor side: anything that accepts move/line/curve/close
// segments. `PathFixed` is a recorded path that is itself a sink and can replay
// its segments into another sink in a single pass.

use crate::error::Error;
use crate::geom::{FixedBox, Point};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath,
}

/// Receiver of path segments.
///
/// Any method may fail; a failure ends the traversal that produced it.
pub trait PathSink {
    fn move_to(&mut self, p: Point) -> Result<(), Error>;
    fn line_to(&mut self, p: Point) -> Result<(), Error>;
    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) -> Result<(), Error>;
    fn close_path(&mut self) -> Result<(), Error>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathFixed {
    ops: Vec<PathOp>,
    current: Option<Point>,
    last_move: Option<Point>,
}

impl PathFixed {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[inline]
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    fn push(&mut self, op: PathOp) -> Result<(), Error> {
        self.ops.try_reserve(1)?;
        self.ops.push(op);
        Ok(())
    }

    /// Replay every recorded segment into `sink`, stopping at the first error.
    pub fn interpret<S: PathSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) => sink.move_to(p)?,
                PathOp::LineTo(p) => sink.line_to(p)?,
                PathOp::CurveTo(p1, p2, p3) => sink.curve_to(p1, p2, p3)?,
                PathOp::ClosePath => sink.close_path()?,
            }
        }
        Ok(())
    }

    /// Bounding box of every point in the path, control points included.
    pub fn bounds(&self) -> Option<FixedBox> {
        let mut points = self.ops.iter().flat_map(|op| {
            let pts: [Option<Point>; 3] = match *op {
                PathOp::MoveTo(p) | PathOp::LineTo(p) => [Some(p), None, None],
                PathOp::CurveTo(a, b, c) => [Some(a), Some(b), Some(c)],
                PathOp::ClosePath => [None, None, None],
            };
            pts.into_iter().flatten()
        });
        let first = points.next()?;
        let mut b = FixedBox::new(first, first);
        for p in points {
            b.p1.x = b.p1.x.min(p.x);
            b.p1.y = b.p1.y.min(p.y);
            b.p2.x = b.p2.x.max(p.x);
            b.p2.y = b.p2.y.max(p.y);
        }
        Some(b)
    }

    /// The rectangle this path describes, if it is a single axis-aligned
    /// rectangle.
    pub fn is_box(&self) -> Option<FixedBox> {
        match self.boxes()?.as_slice() {
            [b] => Some(*b),
            _ => None,
        }
    }

    /// One box per subpath, if every non-empty subpath is an axis-aligned
    /// rectangle. Curves disqualify the path.
    pub fn boxes(&self) -> Option<Vec<FixedBox>> {
        let mut out = Vec::new();
        let mut corners: Vec<Point> = Vec::with_capacity(5);
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) => {
                    flush_subpath(&mut corners, &mut out)?;
                    corners.push(p);
                }
                PathOp::LineTo(p) => corners.push(p),
                PathOp::CurveTo(..) => return None,
                PathOp::ClosePath => {
                    let start = corners.first().copied();
                    flush_subpath(&mut corners, &mut out)?;
                    // A closed subpath leaves the pen at its start point.
                    corners.extend(start);
                }
            }
        }
        flush_subpath(&mut corners, &mut out)?;
        Some(out)
    }
}

fn flush_subpath(corners: &mut Vec<Point>, out: &mut Vec<FixedBox>) -> Option<()> {
    if corners.len() > 1 {
        out.push(rect_from_corners(corners)?);
    }
    corners.clear();
    Some(())
}

fn rect_from_corners(pts: &[Point]) -> Option<FixedBox> {
    let pts = match pts {
        [a, .., last] if pts.len() == 5 && a == last => &pts[..4],
        _ => pts,
    };
    let [a, b, c, d] = pts else {
        return None;
    };
    let horizontal_first = a.y == b.y && b.x == c.x && c.y == d.y && d.x == a.x;
    let vertical_first = a.x == b.x && b.y == c.y && c.x == d.x && d.y == a.y;
    if !horizontal_first && !vertical_first {
        return None;
    }
    Some(FixedBox::new(
        Point::new(a.x.min(c.x), a.y.min(c.y)),
        Point::new(a.x.max(c.x), a.y.max(c.y)),
    ))
}

impl PathSink for PathFixed {
    fn move_to(&mut self, p: Point) -> Result<(), Error> {
        // Consecutive moves collapse into the last one.
        if let Some(PathOp::MoveTo(last)) = self.ops.last_mut() {
            *last = p;
        } else {
            self.push(PathOp::MoveTo(p))?;
        }
        self.current = Some(p);
        self.last_move = Some(p);
        Ok(())
    }

    fn line_to(&mut self, p: Point) -> Result<(), Error> {
        if self.current.is_none() {
            return self.move_to(p);
        }
        self.push(PathOp::LineTo(p))?;
        self.current = Some(p);
        Ok(())
    }

    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) -> Result<(), Error> {
        if self.current.is_none() {
            self.move_to(p1)?;
        }
        self.push(PathOp::CurveTo(p1, p2, p3))?;
        self.current = Some(p3);
        Ok(())
    }

    fn close_path(&mut self) -> Result<(), Error> {
        if self.current.is_none() {
            return Ok(());
        }
        self.push(PathOp::ClosePath)?;
        self.current = self.last_move;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::from_ints(x, y)
    }

    fn rect_path(path: &mut PathFixed, x1: i32, y1: i32, x2: i32, y2: i32) {
        path.move_to(p(x1, y1)).unwrap();
        path.line_to(p(x2, y1)).unwrap();
        path.line_to(p(x2, y2)).unwrap();
        path.line_to(p(x1, y2)).unwrap();
        path.close_path().unwrap();
    }

    #[test]
    fn records_and_replays() {
        let mut a = PathFixed::new();
        rect_path(&mut a, 0, 0, 4, 3);
        let mut b = PathFixed::new();
        a.interpret(&mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ops().len(), 5);
        assert_eq!(a.current_point(), Some(p(0, 0)));
    }

    #[test]
    fn line_without_current_point_moves() {
        let mut path = PathFixed::new();
        path.line_to(p(3, 3)).unwrap();
        assert_eq!(path.ops(), &[PathOp::MoveTo(p(3, 3))]);
        path.move_to(p(1, 1)).unwrap();
        assert_eq!(path.ops(), &[PathOp::MoveTo(p(1, 1))]);
    }

    #[test]
    fn detects_boxes() {
        let mut path = PathFixed::new();
        rect_path(&mut path, 0, 0, 4, 3);
        assert_eq!(path.is_box(), Some(FixedBox::from_ints(0, 0, 4, 3)));

        rect_path(&mut path, 10, 10, 5, 20);
        assert_eq!(path.is_box(), None);
        assert_eq!(
            path.boxes(),
            Some(vec![FixedBox::from_ints(0, 0, 4, 3), FixedBox::from_ints(5, 10, 10, 20)])
        );
    }

    #[test]
    fn explicit_closing_point_and_vertical_first() {
        let mut path = PathFixed::new();
        path.move_to(p(0, 0)).unwrap();
        path.line_to(p(0, 2)).unwrap();
        path.line_to(p(2, 2)).unwrap();
        path.line_to(p(2, 0)).unwrap();
        path.line_to(p(0, 0)).unwrap();
        assert_eq!(path.is_box(), Some(FixedBox::from_ints(0, 0, 2, 2)));
    }

    #[test]
    fn non_rectangles_are_rejected() {
        let mut path = PathFixed::new();
        path.move_to(p(0, 0)).unwrap();
        path.line_to(p(4, 0)).unwrap();
        path.line_to(p(2, 3)).unwrap();
        path.close_path().unwrap();
        assert_eq!(path.boxes(), None);

        let mut curved = PathFixed::new();
        curved.move_to(p(0, 0)).unwrap();
        curved.curve_to(p(1, 0), p(2, 1), p(2, 2)).unwrap();
        assert_eq!(curved.boxes(), None);
        assert_eq!(curved.bounds(), Some(FixedBox::from_ints(0, 0, 2, 2)));
    }

    #[test]
    fn empty_path() {
        let path = PathFixed::new();
        assert_eq!(path.bounds(), None);
        assert_eq!(path.boxes(), Some(vec![]));
        assert_eq!(path.is_box(), None);
    }
}
