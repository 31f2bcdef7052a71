//! Property and example tests for the AVL tree and the catalog built on it

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use coursecat::domain::{AvlTree, Catalog, Course, DomainError};
use coursecat::util::testing;

/// Upper bound on AVL height: ceil(1.44 * log2(n + 2)).
fn height_bound(n: usize) -> usize {
    (1.44 * ((n + 2) as f64).log2()).ceil() as usize
}

fn shuffled(n: u32, seed: u64) -> Vec<u32> {
    let mut keys: Vec<u32> = (0..n).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

fn course(id: &str) -> Course {
    Course::new(id, format!("Course {}", id), vec![])
}

fn keys(tree: &AvlTree<u32, u32>) -> Vec<u32> {
    tree.iter_inorder().map(|(k, _)| *k).collect()
}

// ============================================================
// Ordering and balance under random workloads
// ============================================================

#[rstest]
#[case(1, 0)]
#[case(100, 1)]
#[case(1000, 2)]
#[case(1000, 3)]
fn given_distinct_random_keys_when_inserting_then_inorder_ascending_and_balanced(
    #[case] n: u32,
    #[case] seed: u64,
) {
    testing::init_test_setup();
    let mut tree = AvlTree::new();
    for k in shuffled(n, seed) {
        assert!(tree.insert(k, k * 10));
        assert!(tree.is_balanced());
    }

    assert_eq!(tree.len(), n as usize);
    assert_eq!(keys(&tree), (0..n).collect::<Vec<_>>());
    assert!(tree.height() <= height_bound(n as usize));
}

#[test]
fn given_monotonic_keys_when_inserting_then_height_stays_logarithmic() {
    let mut tree = AvlTree::new();
    for k in 0..4096u32 {
        tree.insert(k, k);
    }
    // A perfectly balanced tree of 4095 nodes has height 12
    assert!(tree.height() <= 13, "height {}", tree.height());
    assert!(tree.is_balanced());
}

#[rstest]
#[case(7)]
#[case(11)]
fn given_random_deletes_when_removing_then_stays_balanced_until_empty(#[case] seed: u64) {
    let n = 500;
    let mut tree = AvlTree::new();
    for k in shuffled(n, seed) {
        tree.insert(k, k);
    }

    let order = shuffled(n, seed + 100);
    for (removed, k) in order.iter().enumerate() {
        assert_eq!(tree.remove(k), Some(*k));
        assert!(tree.is_balanced());
        let remaining = n as usize - removed - 1;
        assert_eq!(tree.len(), remaining);
        assert!(tree.height() <= height_bound(remaining));
        assert_eq!(tree.get(k), None);
    }

    assert!(tree.is_empty());
    assert_eq!(tree.iter_inorder().count(), 0);
    assert_eq!(tree.iter_preorder().count(), 0);
    assert_eq!(tree.iter_postorder().count(), 0);
}

#[test]
fn given_mixed_workload_when_interleaving_then_matches_sorted_model() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = AvlTree::new();
    let mut model = std::collections::BTreeMap::new();

    for _ in 0..2000 {
        let key: u32 = rng.gen_range(0..200);
        if rng.gen_bool(0.6) {
            let fresh = !model.contains_key(&key);
            model.entry(key).or_insert(key);
            assert_eq!(tree.insert(key, key), fresh);
        } else {
            assert_eq!(tree.remove(&key), model.remove(&key));
        }
        assert!(tree.is_balanced());
    }

    assert_eq!(keys(&tree), model.keys().copied().collect::<Vec<_>>());
}

// ============================================================
// Duplicate and missing keys
// ============================================================

#[test]
fn given_existing_key_when_inserting_then_rejected_and_tree_unchanged() {
    let mut tree = AvlTree::new();
    for k in [5u32, 3, 8] {
        tree.insert(k, k);
    }
    let before: Vec<_> = tree.iter_preorder().map(|(k, v)| (*k, *v)).collect();

    assert!(!tree.insert(3, 999));

    let after: Vec<_> = tree.iter_preorder().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(before, after);
    assert_eq!(tree.len(), 3);
}

#[test]
fn given_absent_key_when_removing_then_not_found_and_tree_unchanged() {
    let mut tree = AvlTree::new();
    for k in [5u32, 3, 8, 1] {
        tree.insert(k, k);
    }
    let before: Vec<_> = tree.iter_preorder().map(|(k, _)| *k).collect();

    assert_eq!(tree.remove(&4), None);

    let after: Vec<_> = tree.iter_preorder().map(|(k, _)| *k).collect();
    assert_eq!(before, after);
    assert_eq!(tree.len(), 4);
}

// ============================================================
// Catalog examples
// ============================================================

#[test]
fn given_increasing_ids_when_inserting_then_single_left_rotation_at_first() {
    testing::init_test_setup();
    let mut catalog = Catalog::with_diagnostics(true);
    for id in ["CSCI101", "CSCI201", "CSCI301"] {
        catalog.insert(course(id)).unwrap();
    }

    let preorder: Vec<_> = catalog.iter_preorder().map(|c| c.id.as_str()).collect();
    assert_eq!(preorder, vec!["CSCI201", "CSCI101", "CSCI301"]);
    assert_eq!(catalog.height(), 2);
}

#[test]
fn given_balanced_three_nodes_when_deleting_root_then_successor_becomes_root() {
    // Inserting a right-skewed chain rebalances to CSCI201 / CSCI101 CSCI301
    let mut catalog = Catalog::new();
    for id in ["CSCI101", "CSCI201", "CSCI301"] {
        catalog.insert(course(id)).unwrap();
    }

    let removed = catalog.remove("csci201").unwrap();
    assert_eq!(removed.id.as_str(), "CSCI201");

    let preorder: Vec<_> = catalog.iter_preorder().map(|c| c.id.as_str()).collect();
    assert_eq!(preorder, vec!["CSCI301", "CSCI101"]);
    assert!(catalog.is_balanced());
    assert_eq!(catalog.len(), 2);
}

#[test]
fn given_inserted_course_when_searching_then_equal_record_until_deleted() {
    let mut catalog = Catalog::new();
    let original = Course::new(
        "MATH201",
        "Discrete Mathematics",
        vec!["MATH101".into(), "CSCI100".into()],
    );
    catalog.insert(original.clone()).unwrap();

    assert_eq!(catalog.search("math201").unwrap(), &original);

    catalog.remove("MATH201").unwrap();
    assert!(matches!(
        catalog.search("MATH201"),
        Err(DomainError::NotFound(_))
    ));
}

#[test]
fn given_catalog_when_traversing_twice_then_same_sequence() {
    let mut catalog = Catalog::new();
    for id in ["CSCI400", "CSCI100", "CSCI300", "CSCI200", "MATH201"] {
        catalog.insert(course(id)).unwrap();
    }

    let first: Vec<_> = catalog.iter_postorder().map(|c| c.id.clone()).collect();
    let second: Vec<_> = catalog.iter_postorder().map(|c| c.id.clone()).collect();
    assert_eq!(first, second);
    assert_eq!(catalog.iter_levelorder().count(), 5);
}
