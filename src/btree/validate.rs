//! Structural consistency checks.

use std::fmt;

use super::comparator::Comparator;
use super::node::Node;
use super::tree::BTree;

/// A structural property of a [`BTree`] that does not hold.
///
/// Returned by [`BTree::validate`]. A correct tree never produces one; the
/// checks exist for tests and for diagnosing misbehaving comparators.
///
/// # Examples
///
/// ```rust
/// use snaptree::btree::ValidationError;
///
/// let error = ValidationError::CountMismatch { stored: 3, actual: 4 };
/// assert_eq!(
///     format!("{error}"),
///     "subtree count mismatch: node stores 3, subtree holds 4"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A leaf sits at a different depth than the tree height.
    UnevenLeaves {
        /// The tree height.
        expected: usize,
        /// The depth of the offending leaf.
        found: usize,
    },
    /// A node holds too few or too many items.
    Occupancy {
        /// Depth of the node, 1 for the root.
        depth: usize,
        /// Items in the node.
        items: usize,
        /// Fewest items allowed at this depth.
        minimum: usize,
        /// Most items allowed.
        maximum: usize,
    },
    /// An internal node does not have one more child than items.
    ChildCount {
        /// Items in the node.
        items: usize,
        /// Children of the node.
        children: usize,
    },
    /// A node's stored subtree count disagrees with its subtree.
    CountMismatch {
        /// The count stored in the node.
        stored: usize,
        /// The number of items actually in the subtree.
        actual: usize,
    },
    /// The tree length disagrees with the number of items reachable.
    LengthMismatch {
        /// The length recorded by the tree handle.
        length: usize,
        /// Items reachable from the root.
        counted: usize,
    },
    /// An empty tree reports a non-zero height.
    HeightMismatch {
        /// The height recorded by the tree handle.
        height: usize,
    },
    /// Items are not strictly increasing under the comparator.
    OutOfOrder {
        /// Rank of the first item that does not follow its predecessor.
        position: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnevenLeaves { expected, found } => write!(
                formatter,
                "uneven leaves: expected every leaf at depth {expected}, found one at {found}"
            ),
            Self::Occupancy {
                depth,
                items,
                minimum,
                maximum,
            } => write!(
                formatter,
                "node at depth {depth} holds {items} items, outside {minimum}..={maximum}"
            ),
            Self::ChildCount { items, children } => write!(
                formatter,
                "internal node with {items} items has {children} children"
            ),
            Self::CountMismatch { stored, actual } => write!(
                formatter,
                "subtree count mismatch: node stores {stored}, subtree holds {actual}"
            ),
            Self::LengthMismatch { length, counted } => write!(
                formatter,
                "length mismatch: tree reports {length}, {counted} items reachable"
            ),
            Self::HeightMismatch { height } => {
                write!(formatter, "empty tree reports height {height}")
            }
            Self::OutOfOrder { position } => {
                write!(formatter, "item at rank {position} is out of order")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl<T, const DEGREE: usize> Node<T, DEGREE> {
    /// Checks this subtree and returns its true item count.
    fn validate(&self, depth: usize, height: usize) -> Result<usize, ValidationError> {
        let items = self.items.len();
        let minimum = if depth == 1 { 1 } else { Self::MIN_ITEMS };
        if items < minimum || items > Self::MAX_ITEMS {
            return Err(ValidationError::Occupancy {
                depth,
                items,
                minimum,
                maximum: Self::MAX_ITEMS,
            });
        }

        let actual = if self.is_leaf() {
            if depth != height {
                return Err(ValidationError::UnevenLeaves {
                    expected: height,
                    found: depth,
                });
            }
            items
        } else {
            if self.children.len() != items + 1 {
                return Err(ValidationError::ChildCount {
                    items,
                    children: self.children.len(),
                });
            }
            let mut actual = items;
            for child in &self.children {
                actual += child.validate(depth + 1, height)?;
            }
            actual
        };

        if self.count != actual {
            return Err(ValidationError::CountMismatch {
                stored: self.count,
                actual,
            });
        }
        Ok(actual)
    }
}

impl<T, C: Comparator<T>, const DEGREE: usize> BTree<T, C, DEGREE> {
    /// Checks every structural invariant of the tree.
    ///
    /// - all leaves sit at depth [`height`](Self::height)
    /// - every node other than the root holds between `DEGREE - 1` and
    ///   `2 * DEGREE - 1` items, the root at least one
    /// - every stored subtree count matches its subtree
    /// - items ascend strictly under the comparator
    /// - [`len`](Self::len) and [`walk`](Self::walk) agree on the item count
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snaptree::btree::BTree;
    ///
    /// let tree: BTree<i32> = (0..10_000).collect();
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(root) = self.root.as_deref() else {
            if self.length != 0 {
                return Err(ValidationError::LengthMismatch {
                    length: self.length,
                    counted: 0,
                });
            }
            if self.height != 0 {
                return Err(ValidationError::HeightMismatch {
                    height: self.height,
                });
            }
            return Ok(());
        };

        let counted = root.validate(1, self.height)?;
        if counted != self.length {
            return Err(ValidationError::LengthMismatch {
                length: self.length,
                counted,
            });
        }

        let mut items = self.iter();
        if let Some(mut previous) = items.next() {
            for (offset, item) in items.enumerate() {
                if !self.comparator.less(previous, item) {
                    return Err(ValidationError::OutOfOrder {
                        position: offset + 1,
                    });
                }
                previous = item;
            }
        }

        let mut walked = 0;
        self.walk(|batch| walked += batch.len());
        if walked != self.length {
            return Err(ValidationError::LengthMismatch {
                length: self.length,
                counted: walked,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::NaturalOrder;
    use crate::btree::ReferenceCounter;
    use rstest::rstest;

    type SmallTree = BTree<i32, NaturalOrder, 2>;

    #[rstest]
    fn test_empty_tree_is_valid() {
        assert_eq!(SmallTree::default().validate(), Ok(()));
    }

    #[rstest]
    fn test_detects_stale_count() {
        let mut tree: SmallTree = (0..20).collect();
        ReferenceCounter::make_mut(tree.root.as_mut().unwrap()).count += 1;
        assert!(matches!(
            tree.validate(),
            Err(ValidationError::CountMismatch { .. })
        ));
    }

    #[rstest]
    fn test_detects_wrong_length() {
        let mut tree: SmallTree = (0..20).collect();
        tree.length = 19;
        assert_eq!(
            tree.validate(),
            Err(ValidationError::LengthMismatch {
                length: 19,
                counted: 20
            })
        );
    }

    #[rstest]
    fn test_detects_uneven_leaves() {
        let mut tree: SmallTree = (0..20).collect();
        tree.height += 1;
        assert!(matches!(
            tree.validate(),
            Err(ValidationError::UnevenLeaves { .. })
        ));
    }

    #[rstest]
    fn test_detects_out_of_order_items() {
        let mut tree: SmallTree = (0..3).collect();
        ReferenceCounter::make_mut(tree.root.as_mut().unwrap()).items.swap(0, 2);
        assert_eq!(
            tree.validate(),
            Err(ValidationError::OutOfOrder { position: 1 })
        );
    }

    #[rstest]
    fn test_detects_height_on_empty_tree() {
        let mut tree = SmallTree::default();
        tree.height = 2;
        assert_eq!(
            tree.validate(),
            Err(ValidationError::HeightMismatch { height: 2 })
        );
    }

    #[rstest]
    fn test_display_occupancy() {
        let error = ValidationError::Occupancy {
            depth: 2,
            items: 0,
            minimum: 1,
            maximum: 3,
        };
        assert_eq!(
            format!("{error}"),
            "node at depth 2 holds 0 items, outside 1..=3"
        );
    }
}
