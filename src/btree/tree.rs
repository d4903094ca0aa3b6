//! The tree handle.

use std::fmt;

use super::comparator::{Comparator, NaturalOrder};
use super::cow;
use super::hint::PathHint;
use super::node::NodePointer;

/// Default node degree: nodes hold up to `2 * DEFAULT_DEGREE - 1` items.
pub const DEFAULT_DEGREE: usize = 128;

// =============================================================================
// BTree Definition
// =============================================================================

/// An ordered collection of items backed by a B-tree.
///
/// Items are kept sorted by the comparator `C`; two items that compare equal
/// occupy one slot, and inserting an equal item replaces it. Every node keeps
/// the item count of its subtree, which makes rank queries logarithmic.
///
/// [`copy`](Self::copy) returns an independent handle in O(1) by sharing the
/// root. Nodes are cloned lazily, the first time either handle writes to a
/// node the other can still see.
///
/// `DEGREE` sets the node size: nodes hold between `DEGREE - 1` and
/// `2 * DEGREE - 1` items. It must lie in `2..=128`.
///
/// # Time Complexity
///
/// | Operation                  | Complexity        |
/// |----------------------------|-------------------|
/// | `new` / `copy`             | O(1)              |
/// | `get` / `set` / `delete`   | O(log N)          |
/// | `get_at` / `delete_at`     | O(log N)          |
/// | `min` / `max` / `pop_*`    | O(log N)          |
/// | `ascend` / `descend`       | O(log N + k)      |
/// | `len` / `height`           | O(1)              |
///
/// # Examples
///
/// ```rust
/// use snaptree::btree::BTree;
///
/// let mut tree = BTree::new();
/// for key in [5, 1, 4, 2, 3] {
///     tree.set(key);
/// }
///
/// assert_eq!(tree.min(), Some(&1));
/// assert_eq!(tree.max(), Some(&5));
/// assert_eq!(tree.get_at(2), Some(&3));
///
/// let mut ascending = Vec::new();
/// tree.ascend(None, |item| {
///     ascending.push(*item);
///     true
/// });
/// assert_eq!(ascending, vec![1, 2, 3, 4, 5]);
/// ```
pub struct BTree<T, C = NaturalOrder, const DEGREE: usize = 128> {
    pub(super) root: Option<NodePointer<T, DEGREE>>,
    /// Number of items
    pub(super) length: usize,
    /// Depth of the leaves, 0 when empty
    pub(super) height: usize,
    pub(super) comparator: C,
    pub(super) generation: u64,
}

impl<T: Ord> BTree<T> {
    /// Creates an empty tree ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<u64> = BTree::new();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_comparator(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> BTree<T, C> {
    /// Creates an empty tree ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let mut tree = BTree::with_comparator(|a: &i32, b: &i32| b < a);
    /// tree.set(1);
    /// tree.set(2);
    /// assert_eq!(tree.min(), Some(&2));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_comparator(comparator)
    }
}

impl<T, C, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Creates an empty tree with an explicit node degree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::{BTree, NaturalOrder};
    ///
    /// let mut tree = BTree::<i32, NaturalOrder, 4>::from_comparator(NaturalOrder);
    /// tree.extend(0..100);
    /// assert!(tree.height() > 2);
    /// ```
    #[must_use]
    pub fn from_comparator(comparator: C) -> Self {
        Self {
            root: None,
            length: 0,
            height: 0,
            comparator,
            generation: cow::next_generation(),
        }
    }

    /// Returns the number of items.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the depth of the leaves, or 0 for an empty tree.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the copy-on-write generation of this handle.
    ///
    /// Every handle, including each one returned by [`copy`](Self::copy),
    /// has a distinct generation.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the comparator.
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes every item.
    ///
    /// Nodes still shared with other handles stay alive for them.
    pub fn clear(&mut self) {
        self.root = None;
        self.length = 0;
        self.height = 0;
    }

    /// Returns the smallest item.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.min(), Some(&1));
    /// assert_eq!(BTree::<i32>::new().min(), None);
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.root.as_deref()?.first()
    }

    /// Returns the largest item.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.root.as_deref()?.last()
    }

    /// Returns the item with the given 0-based rank.
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
    /// let tree: BTree<i32> = (0..100).map(|key| key * 2).collect();
    /// assert_eq!(tree.get_at(10), Some(&20));
    /// assert_eq!(tree.get_at(100), None);
    /// ```
    #[must_use]
    pub fn get_at(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }
        self.root.as_deref()?.item_at(index)
    }
}

impl<T, C: Comparator<T>, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Returns `true` if `a` orders before `b` under this tree's comparator.
    #[inline]
    pub fn less(&self, a: &T, b: &T) -> bool {
        self.comparator.less(a, b)
    }

    /// Returns the stored item equal to `key`.
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
    /// let tree: BTree<String> = ["apple", "pear"].iter().map(|s| s.to_string()).collect();
    /// assert_eq!(tree.get(&"pear".to_string()).map(String::as_str), Some("pear"));
    /// assert_eq!(tree.get(&"plum".to_string()), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &T) -> Option<&T> {
        self.lookup(key, None)
    }

    /// Like [`get`](Self::get), guided by a [`PathHint`].
    ///
    /// The hint is updated with the path taken.
    pub fn get_hint(&self, key: &T, hint: &mut PathHint) -> Option<&T> {
        self.lookup(key, Some(hint))
    }

    /// Returns `true` if an item equal to `key` is present.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    fn lookup(&self, key: &T, mut hint: Option<&mut PathHint>) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        let mut depth = 0;
        loop {
            let (index, found) = node.locate(key, &self.comparator, hint.as_deref_mut(), depth);
            if found {
                return node.items.get(index);
            }
            node = node.children.get(index)?;
            depth += 1;
        }
    }
}

impl<T, C: Clone, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Returns an independent handle on the same items in O(1).
    ///
    /// Both handles share every node until one of them writes to it; the
    /// writer then clones just the nodes on its path. Mutations through one
    /// handle are never visible through the other, and the two handles may
    /// be moved to different threads (with the `arc` feature).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let mut original: BTree<i32> = (0..1000).collect();
    /// let mut snapshot = original.copy();
    ///
    /// snapshot.delete(&0);
    /// original.set(1000);
    ///
    /// assert_eq!(original.len(), 1001);
    /// assert_eq!(snapshot.len(), 999);
    /// assert!(original.contains(&0));
    /// assert!(!snapshot.contains(&1000));
    /// ```
    #[must_use]
    pub fn copy(&self) -> Self {
        let generation = cow::next_generation();
        debug_log!(
            source = self.generation,
            generation,
            length = self.length,
            "tree copied"
        );
        Self {
            root: self.root.clone(),
            length: self.length,
            height: self.height,
            comparator: self.comparator.clone(),
            generation,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T, C: Clone, const DEGREE: usize> Clone for BTree<T, C, DEGREE> {
    /// Same as [`BTree::copy`].
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T, C: Default, const DEGREE: usize> Default for BTree<T, C, DEGREE> {
    fn default() -> Self {
        Self::from_comparator(C::default())
    }
}

impl<T: Clone, C: Comparator<T>, const DEGREE: usize> Extend<T> for BTree<T, C, DEGREE> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut hint = PathHint::new();
        for item in iter {
            self.set_hint(item, &mut hint);
        }
    }
}

impl<T: Ord + Clone, const DEGREE: usize> FromIterator<T> for BTree<T, NaturalOrder, DEGREE> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<T: PartialEq, C, const DEGREE: usize> PartialEq for BTree<T, C, DEGREE> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C, const DEGREE: usize> Eq for BTree<T, C, DEGREE> {}

impl<T: fmt::Debug, C, const DEGREE: usize> fmt::Debug for BTree<T, C, DEGREE> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(BTree<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(BTree<String, NaturalOrder, 2>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T, C, const DEGREE: usize> serde::Serialize for BTree<T, C, DEGREE>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct BTreeVisitor<T, C, const DEGREE: usize> {
    marker: std::marker::PhantomData<fn() -> BTree<T, C, DEGREE>>,
}

#[cfg(feature = "serde")]
impl<'de, T, C, const DEGREE: usize> serde::de::Visitor<'de> for BTreeVisitor<T, C, DEGREE>
where
    T: serde::Deserialize<'de> + Clone,
    C: Comparator<T> + Default,
{
    type Value = BTree<T, C, DEGREE>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = BTree::default();
        let mut hint = PathHint::new();
        while let Some(item) = access.next_element()? {
            tree.set_hint(item, &mut hint);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C, const DEGREE: usize> serde::Deserialize<'de> for BTree<T, C, DEGREE>
where
    T: serde::Deserialize<'de> + Clone,
    C: Comparator<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(BTreeVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_creates_empty() {
        let tree: BTree<i32> = BTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        assert_eq!(tree.get_at(0), None);
    }

    #[rstest]
    fn test_scenario_small_integers() {
        let mut tree = BTree::new();
        for key in [5, 1, 4, 2, 3] {
            tree.set(key);
        }
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&5));
        assert_eq!(tree.get_at(2), Some(&3));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_less_uses_comparator() {
        let tree: BTree<i32> = BTree::new();
        assert!(tree.less(&1, &2));
        assert!(!tree.less(&2, &1));
        assert!(!tree.less(&1, &1));

        let reversed = BTree::with_comparator(|a: &i32, b: &i32| b < a);
        assert!(reversed.less(&2, &1));
    }

    #[rstest]
    fn test_get_hint_matches_get() {
        let tree: BTree<i32, NaturalOrder, 3> = (0..2000).map(|key| key * 2).collect();
        let mut hint = PathHint::new();
        for key in (0..4000).map(|key| (key * 17) % 4001) {
            assert_eq!(tree.get_hint(&key, &mut hint), tree.get(&key));
        }
    }

    #[rstest]
    fn test_get_does_not_change_tree() {
        let tree: BTree<i32, NaturalOrder, 2> = (0..100).collect();
        let height = tree.height();
        for key in -10..110 {
            let _ = tree.get(&key);
        }
        assert_eq!(tree.len(), 100);
        assert_eq!(tree.height(), height);
        tree.validate().unwrap();
    }

    #[rstest]
    fn test_copy_shares_root_until_write() {
        let mut tree: BTree<i32, NaturalOrder, 2> = (0..100).collect();
        let snapshot = tree.copy();
        assert!(crate::btree::ReferenceCounter::ptr_eq(
            tree.root.as_ref().unwrap(),
            snapshot.root.as_ref().unwrap()
        ));
        assert_ne!(tree.generation(), snapshot.generation());

        tree.set(100);
        assert!(!crate::btree::ReferenceCounter::ptr_eq(
            tree.root.as_ref().unwrap(),
            snapshot.root.as_ref().unwrap()
        ));
        assert_eq!(snapshot.len(), 100);
        assert!(!snapshot.contains(&100));
    }

    #[rstest]
    fn test_copy_even_odd_scenario() {
        let tree: BTree<i32> = (0..1000).collect();
        let mut snapshot = tree.copy();
        for key in (0..1000).step_by(2) {
            assert_eq!(snapshot.delete(&key), Some(key));
        }
        assert_eq!(tree.len(), 1000);
        assert!((0..1000).all(|key| tree.contains(&key)));
        assert_eq!(snapshot.len(), 500);
        assert!(snapshot.iter().all(|key| key % 2 == 1));
        tree.validate().unwrap();
        snapshot.validate().unwrap();
    }

    #[rstest]
    fn test_clear() {
        let mut tree: BTree<i32> = (0..10).collect();
        let snapshot = tree.copy();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(snapshot.len(), 10);
        tree.validate().unwrap();
    }

    #[rstest]
    fn test_eq_ignores_insertion_order() {
        let forward: BTree<i32> = (0..50).collect();
        let backward: BTree<i32> = (0..50).rev().collect();
        assert_eq!(forward, backward);
        assert_ne!(forward, (0..49).collect::<BTree<i32>>());
    }

    #[rstest]
    fn test_debug_lists_items_in_order() {
        let tree: BTree<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
    }
}
