//! B-tree ordered collection with copy-on-write snapshots.
//!
//! This module provides [`BTree`], an ordered collection of items sorted by a
//! user-supplied [`Comparator`]:
//!
//! - O(log N) get, set, delete, min, max, pop
//! - O(log N) rank access through subtree counts (`get_at`, `delete_at`)
//! - O(1) `copy()`: the snapshot shares every node with its source
//! - Ascending and descending traversal that stops when the visitor says so
//!
//! # Structural Sharing
//!
//! Nodes are reference counted. `copy()` only bumps the root's count; the first
//! mutation that reaches a shared node clones that node (and only that node)
//! before writing to it. Handles obtained from `copy()` can therefore be
//! mutated independently, from different threads when the `arc` feature is on.
//!
//! # Examples
//!
//! ```rust
//! use snaptree::btree::BTree;
//!
//! let mut tree: BTree<i32> = (0..1000).collect();
//! let snapshot = tree.copy();
//!
//! for key in (0..1000).filter(|key| key % 2 == 0) {
//!     tree.delete(&key);
//! }
//!
//! assert_eq!(tree.len(), 500);
//! assert_eq!(snapshot.len(), 1000);
//! assert_eq!(tree.min(), Some(&1));
//! assert_eq!(snapshot.min(), Some(&0));
//! ```
//!
//! ## Custom ordering
//!
//! ```rust
//! use snaptree::btree::BTree;
//!
//! let mut tree = BTree::with_comparator(|a: &(u32, &'static str), b: &(u32, &'static str)| {
//!     a.0 < b.0
//! });
//! tree.set((2, "two"));
//! tree.set((1, "one"));
//!
//! // Equal keys replace, returning the previous item
//! assert_eq!(tree.set((2, "deux")), Some((2, "two")));
//! assert_eq!(tree.get(&(2, "")), Some(&(2, "deux")));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type used for tree nodes.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets snapshots be mutated from different threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparator;
mod cow;
mod hint;
mod insert;
mod iter;
mod node;
mod remove;
mod traverse;
mod tree;
mod validate;

pub use comparator::Comparator;
pub use comparator::NaturalOrder;
pub use hint::PATH_HINT_DEPTH;
pub use hint::PathHint;
pub use iter::Iter;
pub use tree::BTree;
pub use tree::DEFAULT_DEGREE;
pub use validate::ValidationError;

// =============================================================================
// Tests
// =============================================================================
