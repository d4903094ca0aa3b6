//! Copy-on-write ownership of shared nodes.
//!
//! A node is owned by a tree handle while its reference count is one. Once
//! [`BTree::copy`](super::BTree::copy) shares a root, every node below it is
//! reachable from more than one handle, and the first handle to write to a
//! node clones it here before touching it. The count check and the clone
//! are a single atomic step (`make_mut`), so snapshots of the same tree may
//! be written concurrently from different threads.

use std::sync::atomic::{AtomicU64, Ordering};

use super::ReferenceCounter;
use super::node::{Node, NodePointer};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Allocates a generation id no other handle has been given.
pub(crate) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Returns the node for writing, cloning it first if another handle shares it.
///
/// The clone is shallow: items are cloned, children only gain a reference.
#[inline]
pub(crate) fn make_mut<T: Clone, const DEGREE: usize>(
    node: &mut NodePointer<T, DEGREE>,
) -> &mut Node<T, DEGREE> {
    if ReferenceCounter::strong_count(node) > 1 {
        trace_log!(
            items = node.items.len(),
            count = node.count,
            "cloning shared node"
        );
    }
    ReferenceCounter::make_mut(node)
}

/// Takes the node out of its pointer, cloning it if it is still shared.
#[inline]
pub(crate) fn into_owned<T: Clone, const DEGREE: usize>(
    node: NodePointer<T, DEGREE>,
) -> Node<T, DEGREE> {
    ReferenceCounter::unwrap_or_clone(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_generations_are_unique() {
        let first = next_generation();
        let second = next_generation();
        assert_ne!(first, second);
    }

    #[rstest]
    fn test_make_mut_unique_node_is_written_in_place() {
        let mut pointer: NodePointer<i32, 2> = ReferenceCounter::new(Node::leaf(1));
        let before = ReferenceCounter::as_ptr(&pointer);
        make_mut(&mut pointer).items.push(2);
        assert_eq!(ReferenceCounter::as_ptr(&pointer), before);
        assert_eq!(pointer.items, vec![1, 2]);
    }

    #[rstest]
    fn test_make_mut_shared_node_is_cloned() {
        let mut pointer: NodePointer<i32, 2> = ReferenceCounter::new(Node::leaf(1));
        let snapshot = pointer.clone();
        make_mut(&mut pointer).items.push(2);
        assert!(!ReferenceCounter::ptr_eq(&pointer, &snapshot));
        assert_eq!(pointer.items, vec![1, 2]);
        assert_eq!(snapshot.items, vec![1]);
    }

    #[rstest]
    fn test_into_owned_shared_node_leaves_snapshot_intact() {
        let pointer: NodePointer<i32, 2> = ReferenceCounter::new(Node::leaf(7));
        let snapshot = pointer.clone();
        let mut owned = into_owned(pointer);
        owned.items.clear();
        assert_eq!(snapshot.items, vec![7]);
    }
}
