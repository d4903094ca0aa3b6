//! Borrowing iterator over a tree.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::node::Node;
use super::tree::BTree;

/// Frames on the path from the root to the current position.
///
/// Trees with the default degree stay within eight levels for any
/// addressable number of items, so the stack does not spill to the heap.
type Path<'a, T, const DEGREE: usize> = SmallVec<[(&'a Node<T, DEGREE>, usize); 8]>;

/// An iterator over the items of a [`BTree`] in ascending order.
///
/// Created by [`BTree::iter`]. Iterates from both ends and knows its exact
/// length.
pub struct Iter<'a, T, const DEGREE: usize> {
    /// Each frame holds the index of the next item to yield from the front.
    front: Path<'a, T, DEGREE>,
    /// Each frame holds one past the index of the next item to yield from the back.
    back: Path<'a, T, DEGREE>,
    remaining: usize,
}

impl<'a, T, const DEGREE: usize> Iter<'a, T, DEGREE> {
    pub(crate) fn new(root: Option<&'a Node<T, DEGREE>>, length: usize) -> Self {
        let mut iter = Self {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: length,
        };
        if let Some(root) = root {
            iter.push_leftmost(root);
            iter.push_rightmost(root);
        }
        iter
    }

    fn push_leftmost(&mut self, node: &'a Node<T, DEGREE>) {
        let mut node = node;
        loop {
            self.front.push((node, 0));
            match node.children.first() {
                Some(child) => node = child,
                None => return,
            }
        }
    }

    fn push_rightmost(&mut self, node: &'a Node<T, DEGREE>) {
        let mut node = node;
        loop {
            self.back.push((node, node.items.len()));
            match node.children.last() {
                Some(child) => node = child,
                None => return,
            }
        }
    }
}

impl<'a, T, const DEGREE: usize> Iterator for Iter<'a, T, DEGREE> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let (node, index) = self.front.last_mut()?;
            let node: &'a Node<T, DEGREE> = *node;
            if *index < node.items.len() {
                let item = &node.items[*index];
                *index += 1;
                if let Some(child) = node.children.get(*index) {
                    self.push_leftmost(child);
                }
                self.remaining -= 1;
                return Some(item);
            }
            self.front.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, const DEGREE: usize> DoubleEndedIterator for Iter<'a, T, DEGREE> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let (node, index) = self.back.last_mut()?;
            let node: &'a Node<T, DEGREE> = *node;
            if *index > 0 {
                *index -= 1;
                let item = &node.items[*index];
                if let Some(child) = node.children.get(*index) {
                    self.push_rightmost(child);
                }
                self.remaining -= 1;
                return Some(item);
            }
            self.back.pop();
        }
    }
}

impl<T, const DEGREE: usize> ExactSizeIterator for Iter<'_, T, DEGREE> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, const DEGREE: usize> FusedIterator for Iter<'_, T, DEGREE> {}

impl<T, C, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Returns an iterator over the items in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// assert_eq!(tree.iter().rev().next(), Some(&3));
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, DEGREE> {
        Iter::new(self.root.as_deref(), self.length)
    }
}

impl<'a, T, C, const DEGREE: usize> IntoIterator for &'a BTree<T, C, DEGREE> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, DEGREE>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
