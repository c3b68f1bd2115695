// Copyright 2025 Lars Brubaker
// Sweep that rewrites overlapping rectangular trapezoids into a disjoint set.
//
// Each rectangle contributes a left edge (+1) and a right edge (-1); a
// rectangle given right-to-left contributes them with opposite signs. The
// sweep visits every distinct top/bottom scanline in order, keeping the
// active edges sorted by x in a skip list and the rectangles still open in a
// second skip list keyed by bottom. Between two event scanlines the fill rule
// turns the active edges into covered x spans; a span that is unchanged from
// the previous band keeps its trapezoid open, anything else closes it.

use std::cmp::Ordering;

use super::{FillRule, Traps};
use crate::error::Error;
use crate::fixed::Fixed;
use crate::geom::Line;
use crate::log::debug;
use crate::skiplist::{NodeIdx, SkipList};

#[derive(Copy, Clone, Debug)]
struct Edge {
    x: Fixed,
    dir: i32,
    id: u32,
}

#[derive(Copy, Clone, Debug)]
struct Rectangle {
    left: Edge,
    right: Edge,
    top: Fixed,
    bottom: Fixed,
}

/// Open rectangle awaiting its bottom scanline.
#[derive(Copy, Clone, Debug)]
struct Stop {
    bottom: Fixed,
    rect: usize,
}

/// Span started at `top` that has not been emitted yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct OpenSpan {
    x1: Fixed,
    x2: Fixed,
    top: Fixed,
}

fn edge_order(a: &Edge, b: &Edge) -> Ordering {
    a.x.cmp(&b.x).then(a.id.cmp(&b.id))
}

fn stop_order(a: &Stop, b: &Stop) -> Ordering {
    a.bottom.cmp(&b.bottom).then(a.rect.cmp(&b.rect))
}

/// Covered spans for the current active edge set, touching spans merged.
fn covered_spans<F>(edges: &SkipList<Edge, F>, rule: FillRule, out: &mut Vec<(Fixed, Fixed)>) -> Result<(), Error>
where
    F: Fn(&Edge, &Edge) -> Ordering,
{
    out.clear();
    let inside = |w: i32| match rule {
        FillRule::Winding => w != 0,
        FillRule::EvenOdd => w & 1 != 0,
    };
    let mut winding = 0;
    let mut start = Fixed::ZERO;
    let mut iter = edges.iter().peekable();
    while let Some(e) = iter.next() {
        let was_inside = inside(winding);
        winding += e.dir;
        // Apply every edge at this x before testing the transition.
        while let Some(next) = iter.peek() {
            if next.x != e.x {
                break;
            }
            winding += next.dir;
            iter.next();
        }
        let now_inside = inside(winding);
        if !was_inside && now_inside {
            start = e.x;
        } else if was_inside && !now_inside {
            out.try_reserve(1)?;
            out.push((start, e.x));
        }
    }
    Ok(())
}

impl Traps {
    /// Replace a set of rectangular trapezoids by disjoint ones covering the
    /// same area under `rule`.
    ///
    /// Every trapezoid must have vertical edges; otherwise the set is left
    /// unchanged and `Unsupported` is returned. Limits do not apply to the
    /// output, and the `maybe_region` hint is carried over.
    pub fn tessellate_rectangular(&mut self, rule: FillRule) -> Result<(), Error> {
        self.status.to_result()?;
        if self.traps.len() <= 1 {
            return Ok(());
        }
        if !self.traps.iter().all(|t| t.is_rectangular()) {
            return Err(Error::Unsupported);
        }

        let mut rects: Vec<Rectangle> = Vec::new();
        rects.try_reserve_exact(self.traps.len())?;
        for (i, t) in self.traps.iter().enumerate() {
            let id = 2 * i as u32;
            let (lx, rx) = (t.left.p1.x, t.right.p1.x);
            let (left, right) = if lx < rx {
                (Edge { x: lx, dir: 1, id }, Edge { x: rx, dir: -1, id: id + 1 })
            } else {
                (Edge { x: rx, dir: -1, id }, Edge { x: lx, dir: 1, id: id + 1 })
            };
            rects.push(Rectangle { left, right, top: t.top, bottom: t.bottom });
        }
        rects.sort_by(|a, b| a.top.cmp(&b.top));

        let maybe_region = self.maybe_region;
        self.traps.clear();
        let result = self.sweep_rectangles(&rects, rule);
        self.maybe_region = maybe_region;
        match result {
            Ok(()) => {
                debug!(input = rects.len(), output = self.traps.len(), "rectangular sweep");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn sweep_rectangles(&mut self, rects: &[Rectangle], rule: FillRule) -> Result<(), Error> {
        let mut active = SkipList::new(edge_order);
        let mut stops = SkipList::new(stop_order);
        let mut handles: Vec<(NodeIdx, NodeIdx)> = Vec::new();
        handles.try_reserve_exact(rects.len())?;
        handles.resize(rects.len(), (0, 0));

        let mut open: Vec<OpenSpan> = Vec::new();
        let mut next_open: Vec<OpenSpan> = Vec::new();
        let mut spans: Vec<(Fixed, Fixed)> = Vec::new();
        let mut next_start = 0;

        loop {
            let start_y = rects.get(next_start).map(|r| r.top);
            let stop_y = stops.first().and_then(|h| stops.get(h)).map(|s: &Stop| s.bottom);
            let y = match (start_y, stop_y) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => break,
            };

            while let Some(stop) = stops.first().and_then(|h| stops.get(h)).copied() {
                if stop.bottom != y {
                    break;
                }
                stops.pop_first();
                let (l, r) = handles[stop.rect];
                active.delete_handle(l)?;
                active.delete_handle(r)?;
            }
            while let Some(rect) = rects.get(next_start) {
                if rect.top != y {
                    break;
                }
                if rect.top < rect.bottom {
                    let l = active.insert(rect.left)?;
                    let r = active.insert(rect.right)?;
                    handles[next_start] = (l, r);
                    stops.insert(Stop { bottom: rect.bottom, rect: next_start })?;
                }
                next_start += 1;
            }

            covered_spans(&active, rule, &mut spans)?;
            self.reconcile(&open, &spans, y, &mut next_open)?;
            std::mem::swap(&mut open, &mut next_open);
        }
        Ok(())
    }

    /// Carry spans that are unchanged at scanline `y` into `next`, start new
    /// ones, and emit a trapezoid for every open span that ends at `y`.
    fn reconcile(&mut self, open: &[OpenSpan], spans: &[(Fixed, Fixed)], y: Fixed, next: &mut Vec<OpenSpan>) -> Result<(), Error> {
        next.clear();
        next.try_reserve(spans.len())?;
        let mut i = 0;
        for &(x1, x2) in spans {
            while i < open.len() && (open[i].x1, open[i].x2) < (x1, x2) {
                self.emit(&open[i], y)?;
                i += 1;
            }
            if i < open.len() && open[i].x1 == x1 && open[i].x2 == x2 {
                next.push(open[i]);
                i += 1;
            } else {
                next.push(OpenSpan { x1, x2, top: y });
            }
        }
        for span in &open[i..] {
            self.emit(span, y)?;
        }
        Ok(())
    }

    fn emit(&mut self, span: &OpenSpan, bottom: Fixed) -> Result<(), Error> {
        self.add_trapezoid(
            span.top,
            bottom,
            Line::vertical(span.x1, span.top, bottom),
            Line::vertical(span.x2, span.top, bottom),
        )
    }
}
