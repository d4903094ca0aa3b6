//! Ordered traversal with early termination.
//!
//! Visitors return `true` to continue and `false` to stop; every node-level
//! helper returns `false` once a visitor has stopped so callers unwind without
//! touching further nodes.

use std::slice;

use super::comparator::Comparator;
use super::node::Node;
use super::tree::BTree;

impl<T, const DEGREE: usize> Node<T, DEGREE> {
    /// Visits the whole subtree in ascending order.
    pub(crate) fn scan<F: FnMut(&T) -> bool>(&self, visit: &mut F) -> bool {
        if self.is_leaf() {
            return self.items.iter().all(|item| visit(item));
        }
        for (item, child) in self.items.iter().zip(&self.children) {
            if !child.scan(visit) || !visit(item) {
                return false;
            }
        }
        self.children.last().is_none_or(|child| child.scan(visit))
    }

    /// Visits the whole subtree in descending order.
    pub(crate) fn reverse<F: FnMut(&T) -> bool>(&self, visit: &mut F) -> bool {
        if self.is_leaf() {
            return self.items.iter().rev().all(|item| visit(item));
        }
        if let Some(last) = self.children.last()
            && !last.reverse(visit)
        {
            return false;
        }
        for (item, child) in self.items.iter().zip(&self.children).rev() {
            if !visit(item) || !child.reverse(visit) {
                return false;
            }
        }
        true
    }

    /// Visits items not less than `pivot` in ascending order.
    pub(crate) fn ascend<C, F>(&self, pivot: &T, comparator: &C, depth: usize, visit: &mut F) -> bool
    where
        C: Comparator<T>,
        F: FnMut(&T) -> bool,
    {
        let (index, found) = self.locate(pivot, comparator, None, depth);
        if !found
            && let Some(child) = self.children.get(index)
            && !child.ascend(pivot, comparator, depth + 1, visit)
        {
            return false;
        }
        for position in index..self.items.len() {
            if !visit(&self.items[position]) {
                return false;
            }
            if let Some(child) = self.children.get(position + 1)
                && !child.scan(visit)
            {
                return false;
            }
        }
        true
    }

    /// Visits items not greater than `pivot` in descending order.
    pub(crate) fn descend<C, F>(&self, pivot: &T, comparator: &C, depth: usize, visit: &mut F) -> bool
    where
        C: Comparator<T>,
        F: FnMut(&T) -> bool,
    {
        let (index, found) = self.locate(pivot, comparator, None, depth);
        let end = if found {
            index + 1
        } else {
            if let Some(child) = self.children.get(index)
                && !child.descend(pivot, comparator, depth + 1, visit)
            {
                return false;
            }
            index
        };
        for position in (0..end).rev() {
            if !visit(&self.items[position]) {
                return false;
            }
            if let Some(child) = self.children.get(position)
                && !child.reverse(visit)
            {
                return false;
            }
        }
        true
    }

    /// Hands every item to `visit` in ascending order, a leaf's items at once
    /// and internal items one at a time.
    pub(crate) fn walk<F: FnMut(&[T])>(&self, visit: &mut F) {
        if self.is_leaf() {
            visit(&self.items);
            return;
        }
        for (item, child) in self.items.iter().zip(&self.children) {
            child.walk(visit);
            visit(slice::from_ref(item));
        }
        if let Some(last) = self.children.last() {
            last.walk(visit);
        }
    }
}

impl<T, C: Comparator<T>, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Visits items in ascending order until `visit` returns `false`.
    ///
    /// With a pivot, traversal starts at the first item not less than it;
    /// without one, at the smallest item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<i32> = (0..100).map(|key| key * 10).collect();
    ///
    /// let mut visited = Vec::new();
    /// tree.ascend(Some(&25), |item| {
    ///     visited.push(*item);
    ///     visited.len() < 3
    /// });
    /// assert_eq!(visited, vec![30, 40, 50]);
    /// ```
    pub fn ascend<F>(&self, pivot: Option<&T>, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let Some(root) = self.root.as_deref() else {
            return;
        };
        match pivot {
            Some(pivot) => root.ascend(pivot, &self.comparator, 0, &mut visit),
            None => root.scan(&mut visit),
        };
    }

    /// Visits items in descending order until `visit` returns `false`.
    ///
    /// With a pivot, traversal starts at the last item not greater than it;
    /// without one, at the largest item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<i32> = (0..100).map(|key| key * 10).collect();
    ///
    /// let mut visited = Vec::new();
    /// tree.descend(Some(&30), |item| {
    ///     visited.push(*item);
    ///     true
    /// });
    /// assert_eq!(visited, vec![30, 20, 10, 0]);
    /// ```
    pub fn descend<F>(&self, pivot: Option<&T>, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        let Some(root) = self.root.as_deref() else {
            return;
        };
        match pivot {
            Some(pivot) => root.descend(pivot, &self.comparator, 0, &mut visit),
            None => root.reverse(&mut visit),
        };
    }
}

impl<T, C, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Hands every item to `visit` in ascending order, in per-node batches.
    ///
    /// Concatenating the batches yields the same sequence as
    /// [`iter`](Self::iter).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<i32> = (0..1000).collect();
    /// let mut total = 0;
    /// tree.walk(|batch| total += batch.len());
    /// assert_eq!(total, tree.len());
    /// ```
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&[T]),
    {
        if let Some(root) = self.root.as_deref() {
            root.walk(&mut visit);
        }
    }
}
