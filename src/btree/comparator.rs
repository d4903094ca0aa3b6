//! Ordering contract for tree items.

/// A strict weak ordering over items.
///
/// Two items `a` and `b` are considered equal when neither
/// `less(a, b)` nor `less(b, a)` holds. Every tree operation relies on this
/// ordering being consistent for the lifetime of the tree.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparator, as is [`NaturalOrder`].
///
/// # Examples
///
/// ```rust
/// use snaptree::btree::{Comparator, NaturalOrder};
///
/// assert!(NaturalOrder.less(&1, &2));
///
/// let by_length = |a: &&str, b: &&str| a.len() < b.len();
/// assert!(by_length.less(&"ab", &"abc"));
/// assert!(!by_length.less(&"ab", &"cd"));
/// ```
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Orders items by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
