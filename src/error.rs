// Copyright 2025 Lars Brubaker
// License: MIT
//
// Status and error types shared by every container in the crate.
//
// `Status` is the sticky per-structure flag (first failure wins). `Error` is what
// individual operations report through `Result`.

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Success,
    NoMemory,
}

impl Status {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == Status::Success
    }

    /// Converts the status into the result an operation on a failed
    /// structure reports.
    #[inline]
    pub fn to_result(self) -> Result<(), Error> {
        match self {
            Status::Success => Ok(()),
            Status::NoMemory => Err(Error::NoMemory),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("out of memory")]
    NoMemory,

    /// Negative result: the input cannot be represented exactly by the
    /// requested fast path. Never stored as a sticky status.
    #[error("operation not supported for this input")]
    Unsupported,

    #[error("key not present in container")]
    NotFound,

    #[error("handle does not refer to a live element")]
    InvalidHandle,

    #[error("division by zero")]
    DivisionByZero,

    #[error("result does not fit in a 32-bit fixed-point value")]
    Overflow,

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl Error {
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported)
    }

    /// The sticky status this error leaves behind, if any.
    pub(crate) fn sticky_status(&self) -> Option<Status> {
        match self {
            Error::NoMemory => Some(Status::NoMemory),
            _ => None,
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::NoMemory
    }
}

impl From<smallvec::CollectionAllocErr> for Error {
    fn from(_: smallvec::CollectionAllocErr) -> Self {
        Error::NoMemory
    }
}
