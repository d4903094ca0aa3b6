//! Property-based tests for BTree.
//!
//! Every law is checked against `std::collections::BTreeSet` as a model, on
//! trees with a small degree so that splits, merges and rotations happen on
//! short inputs.

use proptest::prelude::*;
use snaptree::btree::{BTree, NaturalOrder, PathHint};
use std::collections::BTreeSet;

type SmallTree = BTree<i16, NaturalOrder, 2>;
type MediumTree = BTree<i16, NaturalOrder, 4>;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Set(i16),
    Delete(i16),
    Load(i16),
    DeleteAt(usize),
    PopMin,
    PopMax,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (-200i16..200).prop_map(Operation::Set),
        3 => (-200i16..200).prop_map(Operation::Delete),
        1 => (-200i16..200).prop_map(Operation::Load),
        1 => (0usize..400).prop_map(Operation::DeleteAt),
        1 => Just(Operation::PopMin),
        1 => Just(Operation::PopMax),
    ]
}

fn key_vec(max_size: usize) -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(any::<i16>(), 0..max_size)
}

fn apply(tree: &mut SmallTree, model: &mut BTreeSet<i16>, operation: &Operation) {
    match *operation {
        Operation::Set(key) | Operation::Load(key) => {
            let previous = match operation {
                Operation::Load(_) => tree.load(key),
                _ => tree.set(key),
            };
            assert_eq!(previous.is_some(), !model.insert(key));
        }
        Operation::Delete(key) => {
            assert_eq!(tree.delete(&key), model.take(&key));
        }
        Operation::DeleteAt(index) => {
            let expected = model.iter().nth(index).copied();
            if let Some(key) = expected {
                model.remove(&key);
            }
            assert_eq!(tree.delete_at(index), expected);
        }
        Operation::PopMin => assert_eq!(tree.pop_min(), model.pop_first()),
        Operation::PopMax => assert_eq!(tree.pop_max(), model.pop_last()),
    }
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: any sequence of operations matches the model and keeps every
    /// structural invariant after each step.
    #[test]
    fn prop_operations_match_model(operations in prop::collection::vec(operation(), 0..300)) {
        let mut tree = SmallTree::default();
        let mut model = BTreeSet::new();
        for operation in &operations {
            apply(&mut tree, &mut model, operation);
            prop_assert_eq!(tree.validate(), Ok(()));
            prop_assert_eq!(tree.len(), model.len());
        }
        prop_assert!(tree.iter().eq(model.iter()));
        prop_assert_eq!(tree.min(), model.first());
        prop_assert_eq!(tree.max(), model.last());
    }

    /// Law: deleting every inserted key empties the tree down to height 0.
    #[test]
    fn prop_delete_all_returns_to_empty(keys in key_vec(200)) {
        let mut tree: MediumTree = keys.iter().copied().collect();
        for key in &keys {
            tree.delete(key);
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 0);
        prop_assert_eq!(tree.validate(), Ok(()));
    }

    /// Law: get_at(i) is the i-th item in ascending order.
    #[test]
    fn prop_get_at_is_rank(keys in key_vec(200)) {
        let tree: SmallTree = keys.iter().copied().collect();
        let model: BTreeSet<i16> = keys.into_iter().collect();
        for (rank, key) in model.iter().enumerate() {
            prop_assert_eq!(tree.get_at(rank), Some(key));
        }
        prop_assert_eq!(tree.get_at(model.len()), None);
    }

    /// Law: get never changes the tree.
    #[test]
    fn prop_get_is_pure(keys in key_vec(100), probes in key_vec(50)) {
        let tree: SmallTree = keys.into_iter().collect();
        let before: Vec<i16> = tree.iter().copied().collect();
        let height = tree.height();
        for probe in &probes {
            let _ = tree.get(probe);
        }
        prop_assert_eq!(tree.height(), height);
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
    }
}

// =============================================================================
// Hint Laws
// =============================================================================

proptest! {
    /// Law: a hint never changes results, whatever it has seen before.
    #[test]
    fn prop_hint_is_transparent(keys in key_vec(200), probes in key_vec(100)) {
        let mut hinted = SmallTree::default();
        let mut plain = SmallTree::default();
        let mut hint = PathHint::new();
        for key in &keys {
            prop_assert_eq!(hinted.set_hint(*key, &mut hint), plain.set(*key));
        }
        for probe in &probes {
            prop_assert_eq!(hinted.get_hint(probe, &mut hint), plain.get(probe));
        }
        for probe in &probes {
            prop_assert_eq!(hinted.delete_hint(probe, &mut hint), plain.delete(probe));
        }
        prop_assert_eq!(hinted.validate(), Ok(()));
        prop_assert_eq!(hinted, plain);
    }
}

// =============================================================================
// Traversal Laws
// =============================================================================

proptest! {
    /// Law: ascend visits exactly the items not less than the pivot.
    #[test]
    fn prop_ascend_is_range(keys in key_vec(200), pivot: i16) {
        let tree: SmallTree = keys.iter().copied().collect();
        let model: BTreeSet<i16> = keys.into_iter().collect();
        let mut visited = Vec::new();
        tree.ascend(Some(&pivot), |item| {
            visited.push(*item);
            true
        });
        prop_assert_eq!(visited, model.range(pivot..).copied().collect::<Vec<_>>());
    }

    /// Law: descend visits exactly the items not greater than the pivot.
    #[test]
    fn prop_descend_is_range(keys in key_vec(200), pivot: i16) {
        let tree: SmallTree = keys.iter().copied().collect();
        let model: BTreeSet<i16> = keys.into_iter().collect();
        let mut visited = Vec::new();
        tree.descend(Some(&pivot), |item| {
            visited.push(*item);
            true
        });
        prop_assert_eq!(visited, model.range(..=pivot).rev().copied().collect::<Vec<_>>());
    }

    /// Law: a visitor that stops after k items is called exactly k times.
    #[test]
    fn prop_early_stop_is_exact(keys in key_vec(200), limit in 1usize..50) {
        let tree: SmallTree = keys.into_iter().collect();
        let mut calls = 0;
        tree.descend(None, |_| {
            calls += 1;
            calls < limit
        });
        prop_assert_eq!(calls, limit.min(tree.len()));
    }
}

// =============================================================================
// Copy Laws
// =============================================================================

proptest! {
    /// Law: mutating a copy never changes the source, and vice versa.
    #[test]
    fn prop_copies_are_independent(
        keys in key_vec(200),
        source_operations in prop::collection::vec(operation(), 0..100),
        copy_operations in prop::collection::vec(operation(), 0..100)
    ) {
        let mut source: SmallTree = keys.iter().copied().collect();
        let mut source_model: BTreeSet<i16> = keys.into_iter().collect();
        let mut copy = source.copy();
        let mut copy_model = source_model.clone();

        for operation in &copy_operations {
            apply(&mut copy, &mut copy_model, operation);
        }
        prop_assert!(source.iter().eq(source_model.iter()));

        for operation in &source_operations {
            apply(&mut source, &mut source_model, operation);
        }
        prop_assert!(copy.iter().eq(copy_model.iter()));
        prop_assert!(source.iter().eq(source_model.iter()));
        prop_assert_eq!(source.validate(), Ok(()));
        prop_assert_eq!(copy.validate(), Ok(()));
    }
}
