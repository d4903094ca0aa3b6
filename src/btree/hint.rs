//! Path hints: cached branch choices from a previous search.

use static_assertions::const_assert;

/// Number of tree levels a [`PathHint`] remembers.
pub const PATH_HINT_DEPTH: usize = 8;

// One bit per level in `PathHint::used`.
const_assert!(PATH_HINT_DEPTH <= u8::BITS as usize);

/// The search path taken by a previous operation, used to bias the next one.
///
/// A hint records, for each of the first [`PATH_HINT_DEPTH`] levels, the slot
/// index the last search landed on. Passing the same hint to a sequence of
/// operations on nearby keys lets each level be resolved with one or two
/// comparisons instead of a full binary search.
///
/// A hint is advisory. If it no longer matches the tree it is corrected in
/// place; results are identical to the unhinted operations.
///
/// # Examples
///
/// ```rust
/// use snaptree::btree::{BTree, PathHint};
///
/// let mut tree = BTree::new();
/// let mut hint = PathHint::new();
/// for key in 0..10_000 {
///     tree.set_hint(key, &mut hint);
/// }
/// for key in 0..10_000 {
///     assert_eq!(tree.get_hint(&key, &mut hint), Some(&key));
/// }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PathHint {
    /// Bit `depth` is set when `path[depth]` holds a recorded index.
    used: u8,
    path: [u8; PATH_HINT_DEPTH],
}

impl PathHint {
    /// Creates an empty hint.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            used: 0,
            path: [0; PATH_HINT_DEPTH],
        }
    }

    /// Forgets every recorded level.
    #[inline]
    pub const fn clear(&mut self) {
        self.used = 0;
    }

    /// Returns `true` if no level has been recorded.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// The recorded slot index at `depth`, if any.
    #[inline]
    pub(crate) fn index_at(&self, depth: usize) -> Option<usize> {
        (depth < PATH_HINT_DEPTH && self.used & (1 << depth) != 0)
            .then(|| usize::from(self.path[depth]))
    }

    /// Records `index` for `depth`.
    ///
    /// When the recorded index changes, deeper levels are forgotten since they
    /// were chosen below a different branch.
    pub(crate) fn record(&mut self, depth: usize, index: usize) {
        if depth >= PATH_HINT_DEPTH {
            return;
        }
        let index = u8::try_from(index).unwrap_or(u8::MAX);
        let bit = 1_u8 << depth;
        if self.used & bit == 0 || self.path[depth] != index {
            self.path[depth] = index;
            self.used = (self.used & (bit - 1)) | bit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_hint_is_empty() {
        let hint = PathHint::new();
        assert!(hint.is_empty());
        assert_eq!(hint.index_at(0), None);
        assert_eq!(hint, PathHint::default());
    }

    #[rstest]
    fn test_record_and_read_back() {
        let mut hint = PathHint::new();
        hint.record(0, 3);
        hint.record(1, 200);
        assert_eq!(hint.index_at(0), Some(3));
        assert_eq!(hint.index_at(1), Some(200));
        assert_eq!(hint.index_at(2), None);
    }

    #[rstest]
    fn test_changed_level_forgets_deeper_levels() {
        let mut hint = PathHint::new();
        hint.record(0, 1);
        hint.record(1, 2);
        hint.record(2, 3);

        hint.record(1, 5);

        assert_eq!(hint.index_at(0), Some(1));
        assert_eq!(hint.index_at(1), Some(5));
        assert_eq!(hint.index_at(2), None);
    }

    #[rstest]
    fn test_same_index_keeps_deeper_levels() {
        let mut hint = PathHint::new();
        hint.record(0, 1);
        hint.record(1, 2);
        hint.record(0, 1);
        assert_eq!(hint.index_at(1), Some(2));
    }

    #[rstest]
    fn test_levels_beyond_depth_are_ignored() {
        let mut hint = PathHint::new();
        hint.record(PATH_HINT_DEPTH, 4);
        assert!(hint.is_empty());
        assert_eq!(hint.index_at(PATH_HINT_DEPTH), None);
    }

    #[rstest]
    fn test_deepest_level() {
        let mut hint = PathHint::new();
        hint.record(PATH_HINT_DEPTH - 1, 7);
        assert_eq!(hint.index_at(PATH_HINT_DEPTH - 1), Some(7));
    }

    #[rstest]
    fn test_clear() {
        let mut hint = PathHint::new();
        hint.record(0, 1);
        hint.clear();
        assert!(hint.is_empty());
    }
}
