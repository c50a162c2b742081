//! This crate contains a rope implementation based on implicit treaps.
//!
//! To use it, build a [Rope] from a vector, an iterator or (with the
//! `text` feature) a string, and edit it by position.
#![doc = include_str!("../README.md")]

#![warn(missing_docs)]

/// The error type shared by all positional operations.
pub mod error;
/// In-order iterators over treap-backed sequences.
pub mod iter;
/// Per-structure priority generators.
pub mod priority;
/// The sequence facade.
pub mod rope;
/// The implicit treap engine.
pub mod treap;

/// Contains [Rope] conveniences for `char` text buffers.
#[cfg(feature = "text")]
pub mod string;

/// Size-augmented tree nodes.
mod node;

pub use crate::error::{Error, Operation, Result};
pub use crate::priority::Priorities;
pub use crate::rope::Rope;
pub use crate::treap::Treap;
