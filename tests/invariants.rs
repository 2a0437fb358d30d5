mod helpers;

use helium_index::storage::btree::BPlusTree;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Lower bound on the distinct keys a tree of this height must hold.
fn min_keys_for_height(order: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let min_keys = (order - 1) / 2;
    let min_children = min_keys + 1;
    2 * min_children.pow(height as u32 - 1) * min_keys
}

#[test]
fn shuffled_workload_keeps_every_invariant() {
    helpers::init_logging_for_tests();

    for order in 3..=8 {
        let mut rng = StdRng::seed_from_u64(order as u64);
        let mut tree = BPlusTree::new(order);

        let mut keys: Vec<i64> = (0..1500).collect();
        keys.shuffle(&mut rng);
        for (i, &k) in keys.iter().enumerate() {
            tree.insert(k, i as u32);
            if i % 97 == 0 {
                tree.check_invariants();
            }
        }
        tree.check_invariants();
        assert_eq!(tree.len(), 1500);
        assert!(min_keys_for_height(order, tree.get_height()) <= tree.len());

        keys.shuffle(&mut rng);
        let (gone, kept) = keys.split_at(1000);
        for (i, k) in gone.iter().enumerate() {
            assert!(tree.delete(k), "order {order}: {k} missing");
            if i % 97 == 0 {
                tree.check_invariants();
            }
        }
        tree.check_invariants();

        for k in gone {
            assert_eq!(tree.search(k), None);
        }
        for k in kept {
            assert!(tree.search(k).is_some());
        }

        let mut expected = kept.to_vec();
        expected.sort_unstable();
        assert_eq!(tree.get_all_keys(), expected);
    }
}

#[test]
fn interleaved_inserts_and_deletes() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree = BPlusTree::new(4);
    let mut model = std::collections::BTreeMap::<i64, Vec<u32>>::new();

    for step in 0..5000u32 {
        let key = rng.random_range(0..400i64);
        if rng.random_bool(0.6) {
            tree.insert(key, step);
            model.entry(key).or_default().push(step);
        } else {
            assert_eq!(tree.delete(&key), model.remove(&key).is_some());
        }
    }
    tree.check_invariants();

    let got: Vec<(i64, Vec<u32>)> = tree.iter().map(|(k, r)| (*k, r.to_vec())).collect();
    let want: Vec<(i64, Vec<u32>)> = model.into_iter().collect();
    assert_eq!(got, want);
}

#[test]
fn draining_returns_to_an_empty_leaf_root() {
    let mut tree = BPlusTree::new(3);
    for k in 0..200i64 {
        tree.insert(k, k as u32);
    }
    assert!(tree.get_height() > 1);

    for k in (0..200i64).rev() {
        assert!(tree.delete(&k));
    }
    tree.check_invariants();
    assert!(tree.is_empty());
    assert_eq!(tree.get_height(), 0);
    assert!(tree.get_all_keys().is_empty());

    // and it is usable again
    tree.insert(5, 0);
    assert_eq!(tree.search(&5), Some(&[0][..]));
}

#[test]
fn string_keys_order_lexicographically() {
    let mut tree = BPlusTree::new(5);
    let words = ["pear", "apple", "fig", "kiwi", "banana", "cherry", "date", "grape"];
    for (i, w) in words.iter().enumerate() {
        tree.insert(w.to_string(), i as u32);
    }
    tree.check_invariants();

    let keys = tree.get_all_keys();
    let mut sorted: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    sorted.sort();
    assert_eq!(keys, sorted);

    let hits = tree.range_query(&"banana".to_string(), true, &"fig".to_string(), false);
    assert_eq!(hits, vec![4, 5, 6]);
}

#[test]
fn duplicates_share_one_key() {
    let mut tree = BPlusTree::new(3);
    for rid in 0..50u32 {
        tree.insert(rid as i64 % 5, rid);
    }
    tree.check_invariants();

    assert_eq!(tree.len(), 5);
    let rows = tree.search(&3).unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r % 5 == 3));

    assert!(tree.delete(&3));
    assert_eq!(tree.search(&3), None);
    assert_eq!(tree.len(), 4);
}
