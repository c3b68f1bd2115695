// trapezoid-region: fixed-point trapezoid sets and pixel-aligned regions
// Copyright 2025 Lars Brubaker
// License: MIT

mod log;

pub mod bucketalloc;
pub mod error;
pub mod fixed;
pub mod geom;
pub mod path;
pub mod region;
pub mod skiplist;
pub mod traps;
pub mod wideint;

pub use error::{Error, Status};
pub use fixed::Fixed;
pub use geom::{FixedBox, Line, Point, Slope};
pub use path::{PathFixed, PathOp, PathSink};
pub use region::{Overlap, Rect, Region};
pub use skiplist::SkipList;
pub use traps::{FillRule, Trapezoid, Traps};
