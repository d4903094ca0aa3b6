//! Insertion with node splitting.

use std::mem;

use super::ReferenceCounter;
use super::comparator::Comparator;
use super::cow;
use super::hint::PathHint;
use super::node::Node;
use super::tree::BTree;

impl<T: Clone, const DEGREE: usize> Node<T, DEGREE> {
    /// Inserts `item` into this subtree, replacing an equal item.
    ///
    /// Returns the replaced item. A child that overflows is split here, so on
    /// return only `self` may be overfull; the caller splits it.
    pub(crate) fn insert<C: Comparator<T>>(
        &mut self,
        item: T,
        comparator: &C,
        mut hint: Option<&mut PathHint>,
        depth: usize,
    ) -> Option<T> {
        let (index, found) = self.locate(&item, comparator, hint.as_deref_mut(), depth);
        if found {
            return Some(mem::replace(&mut self.items[index], item));
        }
        if self.is_leaf() {
            self.items.insert(index, item);
            self.count += 1;
            return None;
        }

        let child = cow::make_mut(&mut self.children[index]);
        let previous = child.insert(item, comparator, hint, depth + 1);
        if previous.is_some() {
            return previous;
        }
        self.count += 1;
        if child.is_overfull() {
            let (separator, right) = child.split();
            self.items.insert(index, separator);
            self.children.insert(index + 1, ReferenceCounter::new(right));
        }
        None
    }

    /// Appends `item` to the rightmost leaf, updating counts along the spine.
    ///
    /// The caller has checked that `item` orders after every item and that
    /// the rightmost leaf has room.
    fn push_back(&mut self, item: T) {
        let mut node = self;
        loop {
            node.count += 1;
            if node.is_leaf() {
                node.items.push(item);
                return;
            }
            let last = node.children.len() - 1;
            node = cow::make_mut(&mut node.children[last]);
        }
    }
}

impl<T: Clone, C: Comparator<T>, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Inserts an item, replacing an equal one.
    ///
    /// Returns the replaced item, or `None` if no equal item was present.
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
    /// assert_eq!(tree.set("a"), None);
    /// assert_eq!(tree.set("a"), Some("a"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn set(&mut self, item: T) -> Option<T> {
        self.insert_item(item, None)
    }

    /// Like [`set`](Self::set), guided by a [`PathHint`].
    ///
    /// The hint is updated with the path taken.
    pub fn set_hint(&mut self, item: T, hint: &mut PathHint) -> Option<T> {
        self.insert_item(item, Some(hint))
    }

    /// Inserts an item expected to order after every item already present.
    ///
    /// When that holds and the rightmost leaf has room, the item is appended
    /// without searching. Otherwise this behaves exactly like
    /// [`set`](Self::set), including replacing an equal item. Loading sorted
    /// input is the intended use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let mut tree = BTree::new();
    /// for key in 0..1000 {
    ///     tree.load(key);
    /// }
    /// assert_eq!(tree.len(), 1000);
    /// assert_eq!(tree.max(), Some(&999));
    /// ```
    pub fn load(&mut self, item: T) -> Option<T> {
        if let Some(root) = self.root.as_mut()
            && Self::tail_has_room_for(root, &item, &self.comparator)
        {
            cow::make_mut(root).push_back(item);
            self.length += 1;
            return None;
        }
        self.set(item)
    }

    fn tail_has_room_for(root: &Node<T, DEGREE>, item: &T, comparator: &C) -> bool {
        let mut node = root;
        while let Some(child) = node.children.last() {
            node = child;
        }
        node.items.len() < Node::<T, DEGREE>::MAX_ITEMS
            && node.items.last().is_some_and(|last| comparator.less(last, item))
    }

    fn insert_item(&mut self, item: T, hint: Option<&mut PathHint>) -> Option<T> {
        let Some(root) = self.root.as_mut() else {
            self.root = Some(ReferenceCounter::new(Node::leaf(item)));
            self.length = 1;
            self.height = 1;
            return None;
        };

        let node = cow::make_mut(root);
        let previous = node.insert(item, &self.comparator, hint, 0);
        if previous.is_some() {
            return previous;
        }
        self.length += 1;
        if node.is_overfull() {
            let (separator, right) = node.split();
            self.grow_root(separator, right);
        }
        None
    }

    /// Puts a new root above the split halves of the old one.
    fn grow_root(&mut self, separator: T, right: Node<T, DEGREE>) {
        let Some(left) = self.root.take() else {
            return;
        };
        let root = Node::branch(left, separator, ReferenceCounter::new(right));
        self.root = Some(ReferenceCounter::new(root));
        self.height += 1;
        debug_log!(
            generation = self.generation,
            height = self.height,
            length = self.length,
            "root split"
        );
    }
}
