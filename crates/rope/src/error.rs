use std::fmt;

use thiserror::Error;

/// The positional operation that rejected its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Element access (`get`, `get_mut`, ranged iteration)
    Get,
    /// Insertion of an element or a whole sequence
    Insert,
    /// Removal of one element or a range
    Erase,
    /// Non-consuming split (`split_off`)
    Split,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Get => "get",
            Operation::Insert => "insert",
            Operation::Erase => "erase",
            Operation::Split => "split",
        })
    }
}

/// Errors returned by positional rope operations
///
/// Every check happens before the structure is touched, so an
/// operation that fails leaves the sequence exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The position (or the exclusive end of a range) lies beyond the sequence.
    ///
    /// `pos` is `usize::MAX` when computing the end of a range overflowed.
    #[error("{op}: position {pos} is out of range for a sequence of length {len}")]
    OutOfRange {
        /// The rejected operation
        op: Operation,
        /// The offending position
        pos: usize,
        /// The length of the sequence at the time of the call
        len: usize,
    },
}

impl Error {
    pub(crate) fn out_of_range(op: Operation, pos: usize, len: usize) -> Self {
        Error::OutOfRange { op, pos, len }
    }
}

/// Result alias for rope operations
pub type Result<T> = std::result::Result<T, Error>;
