//! # snaptree
//!
//! An in-memory ordered collection built on a B-tree, with order-statistics
//! access, path hints for correlated operations, and O(1) copy-on-write
//! snapshots.
//!
//! ## Overview
//!
//! - **Ordered access**: get/set/delete, min/max, pop, ascending and
//!   descending traversal with early termination
//! - **Order statistics**: `get_at` / `delete_at` by rank in O(log N)
//! - **Path hints**: reuse the previous search path to speed up nearby keys
//! - **Snapshots**: `copy()` is O(1); nodes are cloned lazily on first write
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc` so snapshots can move
//!   between threads
//! - `serde`: serialize trees as ascending sequences
//! - `tracing`: emit structured logs through the `tracing` crate
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use snaptree::prelude::*;
//!
//! let mut tree = BTree::new();
//! for key in [5, 1, 4, 2, 3] {
//!     tree.set(key);
//! }
//!
//! let snapshot = tree.copy();
//! tree.delete(&3);
//!
//! assert_eq!(tree.len(), 4);
//! assert_eq!(snapshot.get_at(2), Some(&3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[macro_use]
mod tracing_helpers;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use snaptree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::btree::*;
}

pub mod btree;

pub use btree::{BTree, Comparator, NaturalOrder, PathHint, ValidationError};
