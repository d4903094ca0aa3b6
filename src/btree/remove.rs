//! Removal with borrowing and merging.

use std::mem;

use super::comparator::Comparator;
use super::cow;
use super::hint::PathHint;
use super::node::Node;
use super::tree::BTree;

/// Which item a removal targets.
pub(crate) enum Target<'a, T> {
    /// The item equal to the given key.
    Item(&'a T),
    /// The smallest item.
    Min,
    /// The largest item.
    Max,
    /// The item with the given 0-based rank.
    Rank(usize),
}

impl<T: Clone, const DEGREE: usize> Node<T, DEGREE> {
    /// Removes the targeted item from this subtree.
    ///
    /// Items are only ever taken out of leaves: a match in an internal node is
    /// swapped with its in-order predecessor, which is removed from its leaf.
    /// Underfull children are repaired before returning, so only `self` may be
    /// left underfull.
    pub(crate) fn remove<C: Comparator<T>>(
        &mut self,
        target: Target<'_, T>,
        comparator: &C,
        mut hint: Option<&mut PathHint>,
        depth: usize,
    ) -> Option<T> {
        if self.is_leaf() {
            let index = match target {
                Target::Item(key) => match self.locate(key, comparator, hint, depth) {
                    (index, true) => index,
                    (_, false) => return None,
                },
                Target::Min if !self.items.is_empty() => 0,
                Target::Min => return None,
                Target::Max => self.items.len().checked_sub(1)?,
                Target::Rank(rank) if rank < self.items.len() => rank,
                Target::Rank(_) => return None,
            };
            self.count -= 1;
            return Some(self.items.remove(index));
        }

        let (index, found, child_target) = match target {
            Target::Item(key) => {
                let (index, found) = self.locate(key, comparator, hint.as_deref_mut(), depth);
                (index, found, target)
            }
            Target::Min => (0, false, Target::Min),
            Target::Max => (self.items.len(), false, Target::Max),
            Target::Rank(rank) => {
                let (index, found, child_rank) = self.rank_position(rank)?;
                (index, found, Target::Rank(child_rank))
            }
        };

        let child = cow::make_mut(&mut self.children[index]);
        let removed = if found {
            let predecessor = child.remove(Target::Max, comparator, None, depth + 1)?;
            mem::replace(&mut self.items[index], predecessor)
        } else {
            child.remove(child_target, comparator, hint, depth + 1)?
        };

        self.count -= 1;
        if self.children[index].is_underfull() {
            self.rebalance(index);
        }
        Some(removed)
    }

    /// Repairs the underfull child at `index`.
    ///
    /// The child is paired with its right sibling, or its left sibling when it
    /// is the last child. The pair is merged when the result fits in one node;
    /// otherwise one item moves over from the fuller sibling.
    fn rebalance(&mut self, index: usize) {
        let index = index.min(self.items.len().saturating_sub(1));
        let left_length = self.children[index].items.len();
        let right_length = self.children[index + 1].items.len();

        if left_length + right_length < Self::MAX_ITEMS {
            self.merge_children(index);
        } else if left_length > right_length {
            self.rotate_right(index);
        } else {
            self.rotate_left(index);
        }
    }

    /// Folds `children[index + 1]` and the separator into `children[index]`.
    fn merge_children(&mut self, index: usize) {
        let separator = self.items.remove(index);
        let right = cow::into_owned(self.children.remove(index + 1));
        let left = cow::make_mut(&mut self.children[index]);
        left.items.push(separator);
        left.items.extend(right.items);
        left.children.extend(right.children);
        left.count += right.count + 1;
    }

    /// Moves the last item of `children[index]` up into the separator slot and
    /// the old separator down to the front of `children[index + 1]`.
    fn rotate_right(&mut self, index: usize) {
        let left = cow::make_mut(&mut self.children[index]);
        let Some(item) = left.items.pop() else {
            return;
        };
        let edge = left.children.pop();
        let moved = 1 + edge.as_ref().map_or(0, |child| child.count);
        left.count -= moved;

        let separator = mem::replace(&mut self.items[index], item);
        let right = cow::make_mut(&mut self.children[index + 1]);
        right.items.insert(0, separator);
        if let Some(edge) = edge {
            right.children.insert(0, edge);
        }
        right.count += moved;
    }

    /// Moves the first item of `children[index + 1]` up into the separator slot
    /// and the old separator down to the back of `children[index]`.
    fn rotate_left(&mut self, index: usize) {
        let right = cow::make_mut(&mut self.children[index + 1]);
        if right.items.is_empty() {
            return;
        }
        let item = right.items.remove(0);
        let edge = (!right.is_leaf()).then(|| right.children.remove(0));
        let moved = 1 + edge.as_ref().map_or(0, |child| child.count);
        right.count -= moved;

        let separator = mem::replace(&mut self.items[index], item);
        let left = cow::make_mut(&mut self.children[index]);
        left.items.push(separator);
        if let Some(edge) = edge {
            left.children.push(edge);
        }
        left.count += moved;
    }
}

impl<T: Clone, C: Comparator<T>, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Removes the item equal to `key`.
    ///
    /// Returns the removed item, or `None` (leaving the tree unchanged) if no
    /// equal item exists.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let mut tree = BTree::new();
    /// tree.set(7);
    /// assert_eq!(tree.delete(&7), Some(7));
    /// assert_eq!(tree.delete(&7), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, key: &T) -> Option<T> {
        self.remove_target(Target::Item(key), None)
    }

    /// Like [`delete`](Self::delete), guided by a [`PathHint`].
    pub fn delete_hint(&mut self, key: &T, hint: &mut PathHint) -> Option<T> {
        self.remove_target(Target::Item(key), Some(hint))
    }

    /// Removes and returns the smallest item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let mut tree: BTree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.pop_min(), Some(1));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn pop_min(&mut self) -> Option<T> {
        self.remove_target(Target::Min, None)
    }

    /// Removes and returns the largest item.
    pub fn pop_max(&mut self) -> Option<T> {
        self.remove_target(Target::Max, None)
    }

    /// Removes and returns the item with the given 0-based rank.
    ///
    /// Returns `None` when `index >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let mut tree: BTree<char> = "dacb".chars().collect();
    /// assert_eq!(tree.delete_at(1), Some('b'));
    /// assert_eq!(tree.delete_at(3), None);
    /// ```
    pub fn delete_at(&mut self, index: usize) -> Option<T> {
        if index >= self.length {
            return None;
        }
        self.remove_target(Target::Rank(index), None)
    }

    fn remove_target(&mut self, target: Target<'_, T>, hint: Option<&mut PathHint>) -> Option<T> {
        let root = self.root.as_mut()?;
        let node = cow::make_mut(root);
        let removed = node.remove(target, &self.comparator, hint, 0)?;
        self.length -= 1;
        if node.items.is_empty() {
            self.shrink_root();
        }
        Some(removed)
    }

    /// Replaces an empty root with its only child, or with nothing for a leaf.
    fn shrink_root(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let mut root = cow::into_owned(root);
        self.root = root.children.pop();
        self.height -= 1;
        debug_log!(
            generation = self.generation,
            height = self.height,
            length = self.length,
            "root collapsed"
        );
    }
}
