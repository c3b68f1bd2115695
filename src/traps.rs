// Copyright 2025 Lars Brubaker
// License: MIT
//
// Trapezoid sets.
//
// A `Traps` is the scan-conversion form of a filled shape: a list of
// horizontal slabs, each bounded by a top and bottom scanline and a left and
// right (possibly slanted) edge. Rectangles are tessellated with clipping,
// triangles and convex quads without. The set also supports affine offsets,
// point containment, extents, conversion back to an outline path, and a fast
// path that turns pixel-aligned rectangles into a `Region`.

mod rectangular;
mod shapes;

use smallvec::SmallVec;

use crate::error::{Error, Status};
use crate::fixed::Fixed;
use crate::geom::{FixedBox, Line, Point, Slope};
use crate::log::{debug, warn};
use crate::path::{PathFixed, PathSink};
use crate::region::{Rect, Region};

// ─────────────────────────────── Public types ──────────────────────────────────

/// Number of trapezoids stored inline before spilling to the heap.
pub const INLINE_TRAPS: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillRule {
    Winding,
    EvenOdd,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Trapezoid {
    pub top: Fixed,
    pub bottom: Fixed,
    pub left: Line,
    pub right: Line,
}

impl Trapezoid {
    /// The rectangle spanning `b`, with vertical edges.
    pub fn from_box(b: &FixedBox) -> Trapezoid {
        Trapezoid {
            top: b.p1.y,
            bottom: b.p2.y,
            left: Line::vertical(b.p1.x, b.p1.y, b.p2.y),
            right: Line::vertical(b.p2.x, b.p1.y, b.p2.y),
        }
    }

    /// Both edges vertical.
    #[inline]
    pub fn is_rectangular(&self) -> bool {
        self.left.is_vertical() && self.right.is_vertical()
    }

    /// Rectangular with every defining coordinate on the integer grid.
    pub fn is_pixel_aligned(&self) -> bool {
        self.is_rectangular()
            && self.top.is_integer()
            && self.bottom.is_integer()
            && self.left.p1.x.is_integer()
            && self.right.p1.x.is_integer()
    }

    /// Inclusive of the top and bottom scanlines. The point must not lie left
    /// of the left edge's direction nor right of the right edge's.
    pub fn contains(&self, pt: Point) -> bool {
        if self.top > pt.y || self.bottom < pt.y {
            return false;
        }
        let to_pt = Slope::between(self.left.p1, pt);
        if self.left.slope().compare(&to_pt).is_lt() {
            return false;
        }
        let to_pt = Slope::between(self.right.p1, pt);
        if to_pt.compare(&self.right.slope()).is_lt() {
            return false;
        }
        true
    }

    /// Move each edge endpoint onto the top or bottom scanline so the
    /// endpoints become the true corners.
    pub fn sanitized(&self) -> Trapezoid {
        let mut t = *self;
        for (line, src) in [(&mut t.left, self.left), (&mut t.right, self.right)] {
            if src.p1.y != self.top {
                line.p1 = Point::new(src.x_for_y(self.top), self.top);
            }
            if src.p2.y != self.bottom {
                line.p2 = Point::new(src.x_for_y(self.bottom), self.bottom);
            }
        }
        t
    }

    fn offset(&self, xoff: Fixed, yoff: Fixed) -> Trapezoid {
        let shift = |p: Point| Point::new(p.x + xoff, p.y + yoff);
        Trapezoid {
            top: self.top + yoff,
            bottom: self.bottom + yoff,
            left: Line::new(shift(self.left.p1), shift(self.left.p2)),
            right: Line::new(shift(self.right.p1), shift(self.right.p2)),
        }
    }

    fn offset_scaled(&self, xoff: Fixed, yoff: Fixed, xsc: Fixed, ysc: Fixed) -> Trapezoid {
        let x = |v: Fixed| (v + xoff) * xsc;
        let y = |v: Fixed| (v + yoff) * ysc;
        let map = |p: Point| Point::new(x(p.x), y(p.y));
        Trapezoid {
            top: y(self.top),
            bottom: y(self.bottom),
            left: Line::new(map(self.left.p1), map(self.left.p2)),
            right: Line::new(map(self.right.p1), map(self.right.p2)),
        }
    }
}

// ─────────────────────────────── Traps ─────────────────────────────────────────

/// A growable trapezoid list with an optional clip box, a sticky status and
/// the one-way `maybe_region` hint.
#[derive(Clone, Debug)]
pub struct Traps {
    traps: SmallVec<[Trapezoid; INLINE_TRAPS]>,
    limits: Option<FixedBox>,
    status: Status,
    maybe_region: bool,
    max_traps: Option<usize>,
}

impl Default for Traps {
    fn default() -> Self {
        Self::new()
    }
}

impl Traps {
    pub fn new() -> Self {
        Traps {
            traps: SmallVec::new(),
            limits: None,
            status: Status::Success,
            maybe_region: true,
            max_traps: None,
        }
    }

    /// A set holding the single rectangle `b`, or an empty set when `b` is
    /// empty or inverted.
    pub fn from_box(b: &FixedBox) -> Self {
        let mut traps = Traps::new();
        if !b.is_empty() {
            traps.traps.push(Trapezoid::from_box(b));
        }
        traps
    }

    /// Drop every trapezoid and reset the status and region hint. Storage
    /// capacity, limits and the trapezoid ceiling are kept.
    pub fn clear(&mut self) {
        self.traps.clear();
        self.status = Status::Success;
        self.maybe_region = true;
    }

    pub fn set_limits(&mut self, limits: FixedBox) {
        self.limits = Some(limits);
    }

    pub fn clear_limits(&mut self) {
        self.limits = None;
    }

    #[inline]
    pub fn limits(&self) -> Option<FixedBox> {
        self.limits
    }

    /// Cap the number of stored trapezoids. Growing past the cap fails the
    /// same way an allocation failure does.
    pub fn set_max_traps(&mut self, max: Option<usize>) {
        self.max_traps = max;
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// False once a scan has shown the set is not a pixel-aligned region.
    #[inline]
    pub fn maybe_region(&self) -> bool {
        self.maybe_region
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.traps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.traps.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Trapezoid] {
        &self.traps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trapezoid> {
        self.traps.iter()
    }

    fn fail(&mut self, err: Error) -> Error {
        if let Some(status) = err.sticky_status() {
            if self.status.is_ok() {
                warn!(?status, len = self.traps.len(), "trapezoid set entered failed state");
            }
            self.status = status;
        }
        err
    }

    /// Make room for at least one more trapezoid.
    fn grow(&mut self) -> Result<(), Error> {
        let len = self.traps.len();
        if self.max_traps.is_some_and(|max| len >= max) {
            return Err(Error::NoMemory);
        }
        let new_cap = 2 * self.traps.capacity().max(INLINE_TRAPS);
        self.traps.try_reserve_exact(new_cap - len)?;
        debug!(old = len, new = new_cap, "grew trapezoid storage");
        Ok(())
    }

    /// Append a trapezoid. An empty span (`top >= bottom`) is ignored. On
    /// growth failure the trapezoid is dropped and the set becomes failed.
    pub fn add_trapezoid(&mut self, top: Fixed, bottom: Fixed, left: Line, right: Line) -> Result<(), Error> {
        self.status.to_result()?;
        if top >= bottom {
            return Ok(());
        }
        let full = self.traps.len() == self.traps.capacity();
        let capped = self.max_traps.is_some_and(|max| self.traps.len() >= max);
        if full || capped {
            if let Err(e) = self.grow() {
                return Err(self.fail(e));
            }
        }
        self.traps.push(Trapezoid { top, bottom, left, right });
        Ok(())
    }

    /// Add the rectangle spanned by two corners, clipped against the limits.
    ///
    /// The clip only snaps an edge that lies wholly outside the limits onto
    /// the limit boundary and clamps top and bottom; partial edge crossings
    /// are left alone. Rectangles outside the limits or empty after clipping
    /// are dropped without error.
    pub fn tessellate_rectangle(&mut self, top_left: Point, bottom_right: Point) -> Result<(), Error> {
        self.status.to_result()?;

        let mut left = Line::vertical(top_left.x, top_left.y, bottom_right.y);
        let mut right = Line::vertical(bottom_right.x, top_left.y, bottom_right.y);
        let mut top = top_left.y;
        let mut bottom = bottom_right.y;

        if let Some(lim) = self.limits {
            if left.p1.x >= lim.p2.x && left.p2.x >= lim.p2.x {
                return Ok(());
            }
            if right.p1.x <= lim.p1.x && right.p2.x <= lim.p1.x {
                return Ok(());
            }
            if top > lim.p2.y || bottom < lim.p1.y {
                return Ok(());
            }

            top = top.max(lim.p1.y);
            bottom = bottom.min(lim.p2.y);

            if left.p1.x <= lim.p1.x && left.p2.x <= lim.p1.x {
                left = Line::vertical(lim.p1.x, lim.p1.y, lim.p2.y);
            }
            if right.p1.x >= lim.p2.x && right.p2.x >= lim.p2.x {
                right = Line::vertical(lim.p2.x, lim.p1.y, lim.p2.y);
            }
        }

        if top == bottom || left.p1.x == right.p1.x {
            return Ok(());
        }
        self.add_trapezoid(top, bottom, left, right)
    }

    /// Tessellate every box in turn, stopping at the first failure.
    pub fn tessellate_boxes(&mut self, boxes: &[FixedBox]) -> Result<(), Error> {
        for b in boxes {
            self.tessellate_rectangle(b.p1, b.p2)?;
        }
        Ok(())
    }

    /// Tessellate a path made only of axis-aligned rectangles. Any other
    /// path is `Unsupported` and adds nothing.
    pub fn tessellate_path_boxes(&mut self, path: &PathFixed) -> Result<(), Error> {
        self.status.to_result()?;
        let boxes = path.boxes().ok_or(Error::Unsupported)?;
        self.tessellate_boxes(&boxes)
    }

    /// Shift every coordinate by whole units.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        let (xoff, yoff) = (Fixed::from_int(dx), Fixed::from_int(dy));
        for t in self.traps.iter_mut() {
            *t = t.offset(xoff, yoff);
        }
    }

    /// Write `(src + offset) * scale` for every trapezoid of `src` into the
    /// matching slot of `dst`. A unit scale skips the multiply.
    pub fn scale_and_translate_into(
        dst: &mut [Trapezoid],
        src: &[Trapezoid],
        tx: f64,
        ty: f64,
        sx: f64,
        sy: f64,
    ) -> Result<(), Error> {
        if dst.len() != src.len() {
            return Err(Error::LengthMismatch {
                expected: src.len(),
                actual: dst.len(),
            });
        }
        let (xoff, yoff) = (Fixed::from_f64(tx), Fixed::from_f64(ty));
        if sx == 1.0 && sy == 1.0 {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s.offset(xoff, yoff);
            }
        } else {
            let (xsc, ysc) = (Fixed::from_f64(sx), Fixed::from_f64(sy));
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s.offset_scaled(xoff, yoff, xsc, ysc);
            }
        }
        Ok(())
    }

    /// Whether the point lies in any trapezoid.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let pt = Point::new(Fixed::from_f64(x), Fixed::from_f64(y));
        self.traps.iter().any(|t| t.contains(pt))
    }

    /// Bounding box of every trapezoid, taking slanted edges at their
    /// intercepts with the top and bottom scanlines. The zero box when empty.
    pub fn extents(&self) -> FixedBox {
        if self.traps.is_empty() {
            return FixedBox::default();
        }
        let mut ext = FixedBox::new(Point::new(Fixed::MAX, Fixed::MAX), Point::new(Fixed::MIN, Fixed::MIN));
        for t in &self.traps {
            ext.p1.y = ext.p1.y.min(t.top);
            ext.p2.y = ext.p2.y.max(t.bottom);

            // An endpoint can only widen the box if the edge's true x at that
            // scanline is further out, so only then compute the intercept.
            let edge_x = |line: &Line, p: Point, y: Fixed| if p.y == y { p.x } else { line.x_for_y(y) };
            if t.left.p1.x < ext.p1.x {
                ext.p1.x = ext.p1.x.min(edge_x(&t.left, t.left.p1, t.top));
            }
            if t.left.p2.x < ext.p1.x {
                ext.p1.x = ext.p1.x.min(edge_x(&t.left, t.left.p2, t.bottom));
            }
            if t.right.p1.x > ext.p2.x {
                ext.p2.x = ext.p2.x.max(edge_x(&t.right, t.right.p1, t.top));
            }
            if t.right.p2.x > ext.p2.x {
                ext.p2.x = ext.p2.x.max(edge_x(&t.right, t.right.p2, t.bottom));
            }
        }
        ext
    }

    /// Convert to a `Region` when every trapezoid is a pixel-aligned
    /// rectangle.
    ///
    /// Returns `Unsupported` otherwise, and the first such scan clears
    /// `maybe_region` for good: later calls return `Unsupported` at once
    /// until `clear`. Zero-width and inverted trapezoids are rejected the
    /// same way.
    pub fn extract_region(&mut self) -> Result<Region, Error> {
        self.status.to_result()?;
        if !self.maybe_region {
            return Err(Error::Unsupported);
        }

        let disqualified = self
            .traps
            .iter()
            .any(|t| !t.is_pixel_aligned() || t.right.p1.x <= t.left.p1.x);
        if disqualified {
            self.maybe_region = false;
            debug!(len = self.traps.len(), "trapezoids are not a pixel-aligned region");
            return Err(Error::Unsupported);
        }

        let mut rects: Vec<Rect> = Vec::new();
        rects.try_reserve_exact(self.traps.len())?;
        for t in self.traps.iter() {
            let x1 = t.left.p1.x.integer_part();
            let y1 = t.top.integer_part();
            let x2 = t.right.p1.x.integer_part();
            let y2 = t.bottom.integer_part();
            rects.push(Rect::new(x1, y1, x2 - x1, y2 - y1));
        }

        let region = Region::create_rectangles(&rects)?;
        debug!(rects = region.num_rectangles(), "extracted region from trapezoids");
        Ok(region)
    }

    /// Emit each trapezoid as a closed quadrilateral through its true
    /// corners.
    pub fn to_path<S: PathSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.status.to_result()?;
        for t in self.traps.iter().filter(|t| t.top != t.bottom) {
            let t = t.sanitized();
            sink.move_to(Point::new(t.left.p1.x, t.top))?;
            sink.line_to(Point::new(t.right.p1.x, t.top))?;
            sink.line_to(Point::new(t.right.p2.x, t.bottom))?;
            sink.line_to(Point::new(t.left.p2.x, t.bottom))?;
            sink.close_path()?;
        }
        Ok(())
    }
}
