// Copyright 2025 Lars Brubaker
// License: MIT
//
// Integer rectangle regions.
//
// A region is a list of non-overlapping boxes in y-x banded form: boxes are
// grouped into horizontal bands that share the same y1/y2, bands are sorted
// top to bottom, boxes within a band left to right, no two boxes in a band
// touch, and no two vertically adjacent bands have identical x spans (they
// would have been coalesced). Every mutator rebuilds this canonical form.
//
// Set operations walk both operands band by band, handing overlapping bands
// to a per-operation band routine and copying non-overlapping bands through
// when the operation keeps them.

use crate::error::{Error, Status};
use crate::geom::Point;
use crate::log::warn;
use crate::path::PathSink;

/// Integer rectangle. Empty when `width` or `height` is not positive.
///
/// Rectangles read back from a [`Region`] report a span wider than
/// `i32::MAX` as `i32::MAX`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect { x, y, width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }
}

/// Result of testing a rectangle against a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overlap {
    /// Completely inside.
    In,
    /// Completely outside.
    Out,
    /// Partly inside and partly outside.
    Part,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct RegionBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl RegionBox {
    #[inline]
    fn from_rect(r: &Rect) -> RegionBox {
        RegionBox {
            x1: r.x,
            y1: r.y,
            x2: r.x.saturating_add(r.width),
            y2: r.y.saturating_add(r.height),
        }
    }

    /// Width and height saturate at `i32::MAX`.
    #[inline]
    fn to_rect(self) -> Rect {
        Rect {
            x: self.x1,
            y: self.y1,
            width: self.x2.saturating_sub(self.x1),
            height: self.y2.saturating_sub(self.y1),
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    #[inline]
    fn overlaps(&self, other: &RegionBox) -> bool {
        self.x2 > other.x1 && self.x1 < other.x2 && self.y2 > other.y1 && self.y1 < other.y2
    }

    #[inline]
    fn subsumes(&self, other: &RegionBox) -> bool {
        self.x1 <= other.x1 && self.x2 >= other.x2 && self.y1 <= other.y1 && self.y2 >= other.y2
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SetOp {
    Union,
    Intersect,
    Subtract,
}

impl SetOp {
    /// Whether bands covered only by the first / second operand survive.
    fn keeps_non_overlapping(self) -> (bool, bool) {
        match self {
            SetOp::Union => (true, true),
            SetOp::Intersect => (false, false),
            SetOp::Subtract => (true, false),
        }
    }

    fn overlap_band(self, out: &mut Vec<RegionBox>, r1: &[RegionBox], r2: &[RegionBox], y1: i32, y2: i32) {
        match self {
            SetOp::Union => union_band(out, r1, r2, y1, y2),
            SetOp::Intersect => intersect_band(out, r1, r2, y1, y2),
            SetOp::Subtract => subtract_band(out, r1, r2, y1, y2),
        }
    }
}

fn union_band(out: &mut Vec<RegionBox>, r1: &[RegionBox], r2: &[RegionBox], y1: i32, y2: i32) {
    let (mut i, mut j) = (0, 0);
    let (mut x1, mut x2) = if r1[0].x1 < r2[0].x1 {
        i = 1;
        (r1[0].x1, r1[0].x2)
    } else {
        j = 1;
        (r2[0].x1, r2[0].x2)
    };
    loop {
        let r = if i < r1.len() && (j >= r2.len() || r1[i].x1 < r2[j].x1) {
            i += 1;
            r1[i - 1]
        } else if j < r2.len() {
            j += 1;
            r2[j - 1]
        } else {
            break;
        };
        if r.x1 <= x2 {
            x2 = x2.max(r.x2);
        } else {
            out.push(RegionBox { x1, y1, x2, y2 });
            x1 = r.x1;
            x2 = r.x2;
        }
    }
    out.push(RegionBox { x1, y1, x2, y2 });
}

fn intersect_band(out: &mut Vec<RegionBox>, r1: &[RegionBox], r2: &[RegionBox], y1: i32, y2: i32) {
    let (mut i, mut j) = (0, 0);
    while i < r1.len() && j < r2.len() {
        let x1 = r1[i].x1.max(r2[j].x1);
        let x2 = r1[i].x2.min(r2[j].x2);
        if x1 < x2 {
            out.push(RegionBox { x1, y1, x2, y2 });
        }
        // Advance whichever box ends first; the other may still overlap.
        if r1[i].x2 == x2 {
            i += 1;
        }
        if r2[j].x2 == x2 {
            j += 1;
        }
    }
}

fn subtract_band(out: &mut Vec<RegionBox>, r1: &[RegionBox], r2: &[RegionBox], y1: i32, y2: i32) {
    let (mut i, mut j) = (0, 0);
    let mut x1 = r1[0].x1;
    while i < r1.len() && j < r2.len() {
        let m = r1[i];
        let s = r2[j];
        if s.x2 <= x1 {
            j += 1;
            continue;
        }
        if s.x1 > x1 {
            if s.x1 >= m.x2 {
                // Minuend ends before the subtrahend starts.
                if m.x2 > x1 {
                    out.push(RegionBox { x1, y1, x2: m.x2, y2 });
                }
                i += 1;
                if i < r1.len() {
                    x1 = r1[i].x1;
                }
                continue;
            }
            out.push(RegionBox { x1, y1, x2: s.x1, y2 });
        }
        x1 = s.x2;
        if x1 >= m.x2 {
            i += 1;
            if i < r1.len() {
                x1 = r1[i].x1;
            }
        } else {
            j += 1;
        }
    }
    while i < r1.len() {
        out.push(RegionBox { x1, y1, x2: r1[i].x2, y2 });
        i += 1;
        if i < r1.len() {
            x1 = r1[i].x1;
        }
    }
}

/// One past the last box of the band starting at `start`.
fn band_end(boxes: &[RegionBox], start: usize) -> usize {
    let y1 = boxes[start].y1;
    let mut end = start + 1;
    while end < boxes.len() && boxes[end].y1 == y1 {
        end += 1;
    }
    end
}

/// Merge the band at `cur` into the band at `prev` when they abut and have
/// identical x spans. Returns the start of the band new boxes coalesce with.
fn coalesce(boxes: &mut Vec<RegionBox>, prev: usize, cur: usize) -> usize {
    let n = cur - prev;
    if n == 0 || n != boxes.len() - cur {
        return cur;
    }
    if boxes[prev].y2 != boxes[cur].y1 {
        return cur;
    }
    let same_spans = (0..n).all(|k| boxes[prev + k].x1 == boxes[cur + k].x1 && boxes[prev + k].x2 == boxes[cur + k].x2);
    if !same_spans {
        return cur;
    }
    let y2 = boxes[cur].y2;
    for b in &mut boxes[prev..cur] {
        b.y2 = y2;
    }
    boxes.truncate(cur);
    prev
}

fn append_band(out: &mut Vec<RegionBox>, band: &[RegionBox], y1: i32, y2: i32) -> Result<(), Error> {
    out.try_reserve(band.len())?;
    out.extend(band.iter().map(|b| RegionBox { x1: b.x1, y1, x2: b.x2, y2 }));
    Ok(())
}

fn copy_boxes(boxes: &[RegionBox]) -> Result<Vec<RegionBox>, Error> {
    let mut out = Vec::new();
    out.try_reserve_exact(boxes.len())?;
    out.extend_from_slice(boxes);
    Ok(out)
}

/// Band walk over two non-empty canonical box lists.
fn region_op(b1: &[RegionBox], b2: &[RegionBox], op: SetOp) -> Result<Vec<RegionBox>, Error> {
    let (keep1, keep2) = op.keeps_non_overlapping();
    let mut out: Vec<RegionBox> = Vec::new();
    out.try_reserve(2 * b1.len().max(b2.len()))?;

    let (mut r1, mut r2) = (0, 0);
    let mut ybot = b1[0].y1.min(b2[0].y1);
    let mut prev_band = 0;

    while r1 < b1.len() && r2 < b2.len() {
        let r1_end = band_end(b1, r1);
        let r2_end = band_end(b2, r2);
        let r1y1 = b1[r1].y1;
        let r2y1 = b2[r2].y1;

        // The part of a band above the other operand's next band.
        let ytop = if r1y1 < r2y1 {
            if keep1 {
                let top = r1y1.max(ybot);
                let bot = b1[r1].y2.min(r2y1);
                if top < bot {
                    let cur = out.len();
                    append_band(&mut out, &b1[r1..r1_end], top, bot)?;
                    prev_band = coalesce(&mut out, prev_band, cur);
                }
            }
            r2y1
        } else if r2y1 < r1y1 {
            if keep2 {
                let top = r2y1.max(ybot);
                let bot = b2[r2].y2.min(r1y1);
                if top < bot {
                    let cur = out.len();
                    append_band(&mut out, &b2[r2..r2_end], top, bot)?;
                    prev_band = coalesce(&mut out, prev_band, cur);
                }
            }
            r1y1
        } else {
            r1y1
        };

        ybot = b1[r1].y2.min(b2[r2].y2);
        if ybot > ytop {
            let cur = out.len();
            out.try_reserve((r1_end - r1) + (r2_end - r2))?;
            op.overlap_band(&mut out, &b1[r1..r1_end], &b2[r2..r2_end], ytop, ybot);
            prev_band = coalesce(&mut out, prev_band, cur);
        }

        if b1[r1].y2 == ybot {
            r1 = r1_end;
        }
        if b2[r2].y2 == ybot {
            r2 = r2_end;
        }
    }

    // Only the first leftover band can coalesce; the rest copy straight over.
    let rest = if r1 < b1.len() && keep1 {
        Some((b1, r1))
    } else if r2 < b2.len() && keep2 {
        Some((b2, r2))
    } else {
        None
    };
    if let Some((boxes, start)) = rest {
        let end = band_end(boxes, start);
        let cur = out.len();
        append_band(&mut out, &boxes[start..end], boxes[start].y1.max(ybot), boxes[start].y2)?;
        coalesce(&mut out, prev_band, cur);
        out.try_reserve(boxes.len() - end)?;
        out.extend_from_slice(&boxes[end..]);
    }
    Ok(out)
}

/// Apply `op`, short-cutting the cases where one side is empty or the
/// operands do not overlap.
fn combine(a: &[RegionBox], a_ext: &RegionBox, b: &[RegionBox], b_ext: &RegionBox, op: SetOp) -> Result<Vec<RegionBox>, Error> {
    match op {
        SetOp::Union => {
            if a.is_empty() || (b.len() == 1 && b_ext.subsumes(a_ext)) {
                return copy_boxes(b);
            }
            if b.is_empty() || (a.len() == 1 && a_ext.subsumes(b_ext)) {
                return copy_boxes(a);
            }
        }
        SetOp::Intersect => {
            if a.is_empty() || b.is_empty() || !a_ext.overlaps(b_ext) {
                return Ok(Vec::new());
            }
            if a.len() == 1 && b.len() == 1 {
                let r = RegionBox {
                    x1: a_ext.x1.max(b_ext.x1),
                    y1: a_ext.y1.max(b_ext.y1),
                    x2: a_ext.x2.min(b_ext.x2),
                    y2: a_ext.y2.min(b_ext.y2),
                };
                return copy_boxes(&[r]);
            }
        }
        SetOp::Subtract => {
            if a.is_empty() {
                return Ok(Vec::new());
            }
            if b.is_empty() || !a_ext.overlaps(b_ext) {
                return copy_boxes(a);
            }
        }
    }
    region_op(a, b, op)
}

/// Canonical union of arbitrary, possibly overlapping boxes.
fn union_boxes(boxes: &[RegionBox]) -> Result<Vec<RegionBox>, Error> {
    let mut parts: Vec<Vec<RegionBox>> = Vec::new();
    parts.try_reserve_exact(boxes.len())?;
    for b in boxes.iter().filter(|b| !b.is_empty()) {
        parts.push(copy_boxes(&[*b])?);
    }
    // Pairwise merge keeps each union between lists of similar size.
    while parts.len() > 1 {
        let mut merged = Vec::new();
        merged.try_reserve_exact((parts.len() + 1) / 2)?;
        let mut it = parts.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => {
                    let (ea, eb) = (extents_of(&a), extents_of(&b));
                    merged.push(combine(&a, &ea, &b, &eb, SetOp::Union)?);
                }
                None => merged.push(a),
            }
        }
        parts = merged;
    }
    Ok(parts.pop().unwrap_or_default())
}

fn extents_of(boxes: &[RegionBox]) -> RegionBox {
    let (Some(first), Some(last)) = (boxes.first(), boxes.last()) else {
        return RegionBox::default();
    };
    let mut ext = RegionBox { x1: first.x1, y1: first.y1, x2: last.x2, y2: last.y2 };
    for b in boxes {
        ext.x1 = ext.x1.min(b.x1);
        ext.x2 = ext.x2.max(b.x2);
    }
    ext
}

/// A canonical set of non-overlapping integer rectangles.
#[derive(Debug)]
pub struct Region {
    boxes: Vec<RegionBox>,
    extents: RegionBox,
    status: Status,
}

impl Region {
    /// An empty region.
    pub fn create() -> Region {
        Region {
            boxes: Vec::new(),
            extents: RegionBox::default(),
            status: Status::Success,
        }
    }

    /// A region covering `rect`, or an empty region if `rect` is empty.
    pub fn create_rect(rect: &Rect) -> Result<Region, Error> {
        let mut region = Region::create();
        let b = RegionBox::from_rect(rect);
        if !b.is_empty() {
            region.boxes = copy_boxes(&[b])?;
            region.extents = b;
        }
        Ok(region)
    }

    /// The union of `rects`. Empty rectangles are ignored; overlapping ones
    /// are merged.
    pub fn create_rectangles(rects: &[Rect]) -> Result<Region, Error> {
        let mut boxes = Vec::new();
        boxes.try_reserve_exact(rects.len())?;
        boxes.extend(rects.iter().map(RegionBox::from_rect));
        let mut region = Region::create();
        region.set_boxes(union_boxes(&boxes)?);
        Ok(region)
    }

    /// A region already in the failed state.
    pub fn nil() -> Region {
        Region {
            boxes: Vec::new(),
            extents: RegionBox::default(),
            status: Status::NoMemory,
        }
    }

    pub fn copy(&self) -> Result<Region, Error> {
        self.status.to_result()?;
        Ok(Region {
            boxes: copy_boxes(&self.boxes)?,
            extents: self.extents,
            status: Status::Success,
        })
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    fn set_boxes(&mut self, boxes: Vec<RegionBox>) {
        self.extents = extents_of(&boxes);
        self.boxes = boxes;
    }

    fn fail(&mut self, err: Error) -> Error {
        if let Some(status) = err.sticky_status() {
            if self.status.is_ok() {
                warn!(?status, "region entered failed state");
            }
            self.status = status;
            self.boxes = Vec::new();
            self.extents = RegionBox::default();
        }
        err
    }

    /// Checks both operands before a binary operation. A failed `other`
    /// poisons `self`.
    fn check_operands(&mut self, other: &Region) -> Result<(), Error> {
        self.status.to_result()?;
        if let Err(e) = other.status.to_result() {
            return Err(self.fail(e));
        }
        Ok(())
    }

    fn apply(&mut self, other_boxes: &[RegionBox], other_ext: &RegionBox, op: SetOp) -> Result<(), Error> {
        match combine(&self.boxes, &self.extents, other_boxes, other_ext, op) {
            Ok(boxes) => {
                self.set_boxes(boxes);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn apply_rect(&mut self, rect: &Rect, op: SetOp) -> Result<(), Error> {
        self.status.to_result()?;
        let b = RegionBox::from_rect(rect);
        if b.is_empty() {
            self.apply(&[], &RegionBox::default(), op)
        } else {
            self.apply(&[b], &b, op)
        }
    }

    pub fn union(&mut self, other: &Region) -> Result<(), Error> {
        self.check_operands(other)?;
        self.apply(&other.boxes, &other.extents, SetOp::Union)
    }

    pub fn intersect(&mut self, other: &Region) -> Result<(), Error> {
        self.check_operands(other)?;
        self.apply(&other.boxes, &other.extents, SetOp::Intersect)
    }

    pub fn subtract(&mut self, other: &Region) -> Result<(), Error> {
        self.check_operands(other)?;
        self.apply(&other.boxes, &other.extents, SetOp::Subtract)
    }

    /// Symmetric difference.
    pub fn xor(&mut self, other: &Region) -> Result<(), Error> {
        self.check_operands(other)?;
        let result = combine(&self.boxes, &self.extents, &other.boxes, &other.extents, SetOp::Subtract).and_then(|a_only| {
            let b_only = combine(&other.boxes, &other.extents, &self.boxes, &self.extents, SetOp::Subtract)?;
            combine(&a_only, &extents_of(&a_only), &b_only, &extents_of(&b_only), SetOp::Union)
        });
        match result {
            Ok(boxes) => {
                self.set_boxes(boxes);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn union_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        self.apply_rect(rect, SetOp::Union)
    }

    pub fn intersect_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        self.apply_rect(rect, SetOp::Intersect)
    }

    pub fn subtract_rect(&mut self, rect: &Rect) -> Result<(), Error> {
        self.apply_rect(rect, SetOp::Subtract)
    }

    /// Shift every rectangle. Coordinates saturate at the `i32` range and
    /// boxes pushed entirely past it are dropped. Boxes squeezed together at
    /// the limit are merged back into canonical form.
    pub fn translate(&mut self, dx: i32, dy: i32) -> Result<(), Error> {
        self.status.to_result()?;
        let mut clamped = false;
        let mut shift = |v: i32, d: i32| {
            v.checked_add(d).unwrap_or_else(|| {
                clamped = true;
                v.saturating_add(d)
            })
        };
        for b in &mut self.boxes {
            b.x1 = shift(b.x1, dx);
            b.x2 = shift(b.x2, dx);
            b.y1 = shift(b.y1, dy);
            b.y2 = shift(b.y2, dy);
        }
        if !clamped {
            self.extents = extents_of(&self.boxes);
            return Ok(());
        }
        match union_boxes(&self.boxes) {
            Ok(boxes) => {
                self.set_boxes(boxes);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Empties the region. A failed region stays failed.
    pub fn clear(&mut self) {
        if self.status.is_ok() {
            self.boxes.clear();
            self.extents = RegionBox::default();
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[inline]
    pub fn num_rectangles(&self) -> usize {
        self.boxes.len()
    }

    pub fn get_rectangle(&self, nth: usize) -> Option<Rect> {
        self.boxes.get(nth).map(|b| b.to_rect())
    }

    /// Rectangles in band order: top to bottom, then left to right.
    pub fn rectangles(&self) -> impl Iterator<Item = Rect> + '_ {
        self.boxes.iter().map(|b| b.to_rect())
    }

    /// Tight bounding rectangle; the zero rectangle when empty.
    #[inline]
    pub fn extents(&self) -> Rect {
        self.extents.to_rect()
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        let e = &self.extents;
        if self.boxes.is_empty() || x < e.x1 || x >= e.x2 || y < e.y1 || y >= e.y2 {
            return false;
        }
        for b in &self.boxes {
            if y >= b.y2 {
                continue;
            }
            if y < b.y1 || x < b.x1 {
                // Past the band containing y, or left of every later box in it.
                break;
            }
            if x >= b.x2 {
                continue;
            }
            return true;
        }
        false
    }

    pub fn contains_rectangle(&self, rect: &Rect) -> Overlap {
        let r = RegionBox::from_rect(rect);
        if self.boxes.is_empty() || r.is_empty() || !self.extents.overlaps(&r) {
            return Overlap::Out;
        }
        if self.boxes.len() == 1 {
            return if self.extents.subsumes(&r) { Overlap::In } else { Overlap::Part };
        }

        let mut part_in = false;
        let mut part_out = false;
        let (mut x, mut y) = (r.x1, r.y1);
        for b in &self.boxes {
            if b.y2 <= y {
                continue;
            }
            if b.y1 > y {
                // A horizontal strip of the rectangle is uncovered.
                part_out = true;
                if part_in || b.y1 >= r.y2 {
                    break;
                }
                y = b.y1;
            }
            if b.x2 <= x {
                continue;
            }
            if b.x1 > x {
                part_out = true;
                if part_in {
                    break;
                }
            }
            if b.x1 < r.x2 {
                part_in = true;
                if part_out {
                    break;
                }
            }
            if b.x2 >= r.x2 {
                y = b.y2;
                if y >= r.y2 {
                    break;
                }
                x = r.x1;
            } else {
                // Boxes in a band are maximal, so the rest of this band row
                // is uncovered.
                part_out = true;
                break;
            }
        }

        if !part_in {
            Overlap::Out
        } else if part_out || y < r.y2 {
            Overlap::Part
        } else {
            Overlap::In
        }
    }

    /// Same rectangles. Failed regions are equal to nothing.
    pub fn equal(&self, other: &Region) -> bool {
        self.status.is_ok() && other.status.is_ok() && self.boxes == other.boxes
    }

    /// Emit one closed rectangle outline per box.
    pub fn to_path<S: PathSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.status.to_result()?;
        for b in &self.boxes {
            sink.move_to(Point::from_ints(b.x1, b.y1))?;
            sink.line_to(Point::from_ints(b.x2, b.y1))?;
            sink.line_to(Point::from_ints(b.x2, b.y2))?;
            sink.line_to(Point::from_ints(b.x1, b.y2))?;
            sink.close_path()?;
        }
        Ok(())
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::create()
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Region) -> bool {
        self.equal(other)
    }
}
