// Copyright 2025 Lars Brubaker
// Shared test utilities for trapezoid-region tests.

#![allow(dead_code)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use trapezoid_region::{Point, Rect, Region, Traps};

/// Side of the square grid that `Bitmap` models.
pub const GRID: i32 = 32;

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// A random rectangle inside the grid, possibly empty.
pub fn random_rect(rng: &mut SmallRng) -> Rect {
    let x = rng.gen_range(0..GRID);
    let y = rng.gen_range(0..GRID);
    let w = rng.gen_range(0..=(GRID - x).min(12));
    let h = rng.gen_range(0..=(GRID - y).min(12));
    Rect::new(x, y, w, h)
}

pub fn random_rects(rng: &mut SmallRng, n: usize) -> Vec<Rect> {
    (0..n).map(|_| random_rect(rng)).collect()
}

/// Sum of the areas of every rectangle a region enumerates.
pub fn region_area(region: &Region) -> i64 {
    region.rectangles().map(|r| r.area()).sum()
}

/// Panics unless the region is in canonical banded form: rectangles are
/// non-empty, sorted by band then x, bands do not overlap, boxes within a band
/// neither overlap nor touch, and vertically adjacent bands differ.
pub fn assert_canonical(region: &Region) {
    let rects: Vec<Rect> = region.rectangles().collect();
    let mut bands: Vec<(i32, i32, Vec<(i32, i32)>)> = Vec::new();
    for r in &rects {
        assert!(!r.is_empty(), "empty rectangle {:?}", r);
        let (y1, y2) = (r.y, r.y + r.height);
        let same_band = matches!(bands.last(), Some((by1, by2, _)) if *by1 == y1 && *by2 == y2);
        if same_band {
            let spans = &mut bands.last_mut().unwrap().2;
            let last = spans.last().map(|s| s.1).unwrap_or(i32::MIN);
            assert!(r.x > last, "boxes in band {}..{} overlap or touch", y1, y2);
            spans.push((r.x, r.x + r.width));
        } else {
            if let Some(prev) = bands.last() {
                assert!(y1 >= prev.1, "band at {} starts inside the previous band", y1);
            }
            bands.push((y1, y2, vec![(r.x, r.x + r.width)]));
        }
    }
    for pair in bands.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(!(a.1 == b.0 && a.2 == b.2), "bands at {} and {} should coalesce", a.0, b.0);
    }
}

/// Brute-force pixel set over the grid, used as the reference for region
/// operations.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    bits: Vec<bool>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..GRID {
            let row: String = (0..GRID).map(|x| if self.get(x, y) { '#' } else { '.' }).collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl Bitmap {
    pub fn new() -> Self {
        Bitmap { bits: vec![false; (GRID * GRID) as usize] }
    }

    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut bm = Bitmap::new();
        for r in rects {
            bm.fill(r, true);
        }
        bm
    }

    pub fn from_region(region: &Region) -> Self {
        let rects: Vec<Rect> = region.rectangles().collect();
        Bitmap::from_rects(&rects)
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        (0..GRID).contains(&x) && (0..GRID).contains(&y) && self.bits[(y * GRID + x) as usize]
    }

    pub fn fill(&mut self, r: &Rect, on: bool) {
        for y in r.y.max(0)..(r.y + r.height).min(GRID) {
            for x in r.x.max(0)..(r.x + r.width).min(GRID) {
                self.bits[(y * GRID + x) as usize] = on;
            }
        }
    }

    pub fn zip(&self, other: &Bitmap, f: impl Fn(bool, bool) -> bool) -> Bitmap {
        Bitmap {
            bits: self.bits.iter().zip(&other.bits).map(|(&a, &b)| f(a, b)).collect(),
        }
    }

    pub fn count(&self) -> i64 {
        self.bits.iter().filter(|&&b| b).count() as i64
    }
}

/// Tessellate integer rectangles given as `(x, y, width, height)`.
pub fn traps_from_rects(rects: &[Rect]) -> Traps {
    let mut traps = Traps::new();
    for r in rects {
        traps
            .tessellate_rectangle(Point::from_ints(r.x, r.y), Point::from_ints(r.x + r.width, r.y + r.height))
            .unwrap();
    }
    traps
}
