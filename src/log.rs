// Copyright 2025 Lars Brubaker
// License: MIT

//! Crate-internal `debug!`/`warn!`.
//!
//! Builds with the `tracing` feature forward to the `tracing` crate. Other
//! builds swallow the arguments. Nothing here is visible outside the crate.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! silent {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use silent as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use silent as warn;
