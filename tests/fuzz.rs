use std::collections::BTreeMap;

use rand_xoshiro::{
    Xoshiro128StarStar,
    rand_core::{RngCore, SeedableRng},
};
use rank_tree::RankTreeMap;

/// Long mixed workload against a `BTreeMap` model, with a full structural
/// invariant check at every step. Keys collide often so that the duplicate
/// path, the two-child removal path, and every fixup case get exercised.
#[test]
fn fuzz_against_btreemap() {
    const ITERS: usize = 100_000;
    const MAX_KEY: u64 = 256;

    let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    let mut map: RankTreeMap<u64, u64> = RankTreeMap::new();
    let mut model: BTreeMap<u64, u64> = BTreeMap::new();

    for i in 0..ITERS {
        let key = rng.next_u64() % MAX_KEY;
        match rng.next_u32() % 8 {
            // inserts are weighted so the tree actually grows
            0..=3 => {
                let value = rng.next_u64();
                assert_eq!(map.insert(key, value), model.insert(key, value));
            }
            4..=5 => {
                assert_eq!(map.remove(&key), model.remove(&key));
            }
            6 => {
                assert_eq!(map.get(&key), model.get(&key));
                assert_eq!(map.rank_of(&key).is_some(), model.contains_key(&key));
            }
            _ => {
                if !model.is_empty() {
                    let rank = (rng.next_u64() as usize) % model.len();
                    assert_eq!(map.get_by_rank(rank), model.iter().nth(rank));
                }
            }
        }

        assert_eq!(map.len(), model.len());
        if i % 64 == 0 {
            map._check_invariants().unwrap();
        }

        // every so often, cross-check the whole traversal and rank duality
        if i % 4096 == 0 {
            assert!(map.iter().eq(model.iter()));
            for (rank, (key, _)) in model.iter().enumerate() {
                assert_eq!(map.rank_of(key), Some(rank));
            }
        }
    }

    // drain through pop_first/pop_last from both ends
    let mut low = true;
    while !model.is_empty() {
        if low {
            assert_eq!(map.pop_first(), model.pop_first());
        } else {
            assert_eq!(map.pop_last(), model.pop_last());
        }
        low = !low;
        map._check_invariants().unwrap();
    }
    assert!(map.is_empty());
}

/// Alternates bulk loads with incremental edits, checking that a tree built
/// by `from_sorted` behaves identically to one built by insertion.
#[test]
fn fuzz_bulk_load_then_edit() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(7);

    for _ in 0..64 {
        let len = (rng.next_u32() as usize) % 2048;
        let items: Vec<(u64, u64)> = (0..len as u64).map(|k| (k * 2, k)).collect();
        let mut map = RankTreeMap::from_sorted(items.clone()).unwrap();
        map._check_invariants().unwrap();
        let mut model: BTreeMap<u64, u64> = items.into_iter().collect();

        for _ in 0..256 {
            let key = rng.next_u64() % (2 * len.max(1) as u64 + 2);
            if rng.next_u32() % 2 == 0 {
                let value = rng.next_u64();
                assert_eq!(map.insert(key, value), model.insert(key, value));
            } else {
                assert_eq!(map.remove(&key), model.remove(&key));
            }
            map._check_invariants().unwrap();
        }
        assert!(map.iter().eq(model.iter()));
    }
}
