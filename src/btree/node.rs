//! Node layout and in-node search.

use super::ReferenceCounter;
use super::comparator::Comparator;
use super::hint::PathHint;

/// Shared pointer to a node.
pub(crate) type NodePointer<T, const DEGREE: usize> = ReferenceCounter<Node<T, DEGREE>>;

// =============================================================================
// Node Definition
// =============================================================================

/// A B-tree node.
///
/// A leaf has no children; an internal node has exactly `items.len() + 1`.
/// `count` is the number of items in the whole subtree rooted here.
#[derive(Clone)]
pub(crate) struct Node<T, const DEGREE: usize> {
    pub(crate) items: Vec<T>,
    pub(crate) children: Vec<NodePointer<T, DEGREE>>,
    pub(crate) count: usize,
}

impl<T, const DEGREE: usize> Node<T, DEGREE> {
    /// Maximum number of items a node holds between operations.
    pub(crate) const MAX_ITEMS: usize = {
        assert!(
            DEGREE >= 2 && DEGREE <= 128,
            "DEGREE must be within 2..=128"
        );
        DEGREE * 2 - 1
    };

    /// Minimum number of items in any node other than the root.
    pub(crate) const MIN_ITEMS: usize = Self::MAX_ITEMS / 2;

    /// Creates a leaf holding a single item.
    pub(crate) fn leaf(item: T) -> Self {
        let mut items = Vec::with_capacity(Self::MAX_ITEMS + 1);
        items.push(item);
        Self {
            items,
            children: Vec::new(),
            count: 1,
        }
    }

    /// Creates an internal node with one separator and two children.
    pub(crate) fn branch(
        left: NodePointer<T, DEGREE>,
        separator: T,
        right: NodePointer<T, DEGREE>,
    ) -> Self {
        let count = left.count + right.count + 1;
        let mut items = Vec::with_capacity(Self::MAX_ITEMS + 1);
        items.push(separator);
        let mut children = Vec::with_capacity(Self::MAX_ITEMS + 2);
        children.push(left);
        children.push(right);
        Self {
            items,
            children,
            count,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the node has more than `MAX_ITEMS` items.
    #[inline]
    pub(crate) fn is_overfull(&self) -> bool {
        self.items.len() > Self::MAX_ITEMS
    }

    /// Returns `true` if the node has fewer than `MIN_ITEMS` items.
    #[inline]
    pub(crate) fn is_underfull(&self) -> bool {
        self.items.len() < Self::MIN_ITEMS
    }

    /// Splits an overfull node in two.
    ///
    /// `self` keeps the first `DEGREE` items; the item at `DEGREE` is returned
    /// as the separator together with the new right sibling.
    pub(crate) fn split(&mut self) -> (T, Self) {
        let mut right_items = Vec::with_capacity(Self::MAX_ITEMS + 1);
        right_items.extend(self.items.drain(DEGREE + 1..));
        let right_children = if self.is_leaf() {
            Vec::new()
        } else {
            let mut children = Vec::with_capacity(Self::MAX_ITEMS + 2);
            children.extend(self.children.drain(DEGREE + 1..));
            children
        };
        // `drain` left exactly `DEGREE + 1` items; the last one is the separator.
        let separator = self.items.swap_remove(DEGREE);

        let right_count = right_items.len()
            + right_children
                .iter()
                .map(|child| child.count)
                .sum::<usize>();
        self.count -= right_count + 1;

        let right = Self {
            items: right_items,
            children: right_children,
            count: right_count,
        };
        (separator, right)
    }

    /// Maps a subtree rank onto this node.
    ///
    /// Returns `(index, true, 0)` when the rank is `items[index]` itself, and
    /// `(index, false, rank)` when it lies at `rank` inside `children[index]`.
    /// Only meaningful for internal nodes.
    pub(crate) fn rank_position(&self, rank: usize) -> Option<(usize, bool, usize)> {
        let mut rank = rank;
        for (index, child) in self.children.iter().enumerate() {
            if rank < child.count {
                return Some((index, false, rank));
            }
            if rank == child.count {
                return (index < self.items.len()).then_some((index, true, 0));
            }
            rank -= child.count + 1;
        }
        None
    }

    /// Returns the item with the given rank in this subtree.
    pub(crate) fn item_at(&self, rank: usize) -> Option<&T> {
        let mut node = self;
        let mut rank = rank;
        loop {
            if node.is_leaf() {
                return node.items.get(rank);
            }
            match node.rank_position(rank)? {
                (index, true, _) => return node.items.get(index),
                (index, false, child_rank) => {
                    node = &node.children[index];
                    rank = child_rank;
                }
            }
        }
    }

    /// The smallest item of this subtree.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child;
        }
        node.items.first()
    }

    /// The largest item of this subtree.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child;
        }
        node.items.last()
    }
}

// =============================================================================
// Search
// =============================================================================

impl<T, const DEGREE: usize> Node<T, DEGREE> {
    /// Finds the first slot whose item is not less than `key`.
    ///
    /// Returns `(index, true)` when `items[index]` equals `key`, otherwise
    /// `(index, false)` where `index` is the insertion point (and the child to
    /// descend into for internal nodes).
    #[inline]
    pub(crate) fn locate<C: Comparator<T>>(
        &self,
        key: &T,
        comparator: &C,
        hint: Option<&mut PathHint>,
        depth: usize,
    ) -> (usize, bool) {
        match hint {
            Some(hint) => self.search_hinted(key, comparator, hint, depth),
            None => self.lower_bound(key, comparator, 0, self.items.len()),
        }
    }

    /// Binary search restricted to `items[low..high]`.
    ///
    /// The caller guarantees every item before `low` is less than `key` and the
    /// item at `high`, if any, is not.
    fn lower_bound<C: Comparator<T>>(
        &self,
        key: &T,
        comparator: &C,
        mut low: usize,
        mut high: usize,
    ) -> (usize, bool) {
        while low < high {
            let middle = low + (high - low) / 2;
            if comparator.less(&self.items[middle], key) {
                low = middle + 1;
            } else {
                high = middle;
            }
        }
        let found = self
            .items
            .get(low)
            .is_some_and(|item| !comparator.less(key, item));
        (low, found)
    }

    /// Search that first probes the slot recorded in `hint`.
    fn search_hinted<C: Comparator<T>>(
        &self,
        key: &T,
        comparator: &C,
        hint: &mut PathHint,
        depth: usize,
    ) -> (usize, bool) {
        let length = self.items.len();
        let mut low = 0;
        let mut high = length;
        let mut resolved = None;

        if let Some(guess) = hint.index_at(depth) {
            let guess = guess.min(length);
            if guess == length {
                if length > 0 && comparator.less(&self.items[length - 1], key) {
                    resolved = Some((length, false));
                }
            } else if comparator.less(key, &self.items[guess]) {
                if guess == 0 || comparator.less(&self.items[guess - 1], key) {
                    resolved = Some((guess, false));
                } else {
                    high = guess;
                }
            } else if comparator.less(&self.items[guess], key) {
                low = guess + 1;
            } else {
                resolved = Some((guess, true));
            }
        }

        let (index, found) =
            resolved.unwrap_or_else(|| self.lower_bound(key, comparator, low, high));

        // A found leaf slot points past the match so ascending runs hit on the next probe.
        let recorded = if found && self.is_leaf() {
            index + 1
        } else {
            index
        };
        hint.record(depth, recorded);
        (index, found)
    }
}
