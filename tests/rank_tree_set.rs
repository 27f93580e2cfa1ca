use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rank_tree::{Error, Rank, RankTreeSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    First,
    Last,
    PopFirst,
    PopLast,
    GetByRank(usize),
    RankOf(i64),
    Floor(i64),
    Ceiling(i64),
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
        2 => any::<usize>().prop_map(SetOp::GetByRank),
        2 => value_strategy().prop_map(SetOp::RankOf),
        1 => value_strategy().prop_map(SetOp::Floor),
        1 => value_strategy().prop_map(SetOp::Ceiling),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both RankTreeSet and BTreeSet
    /// and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rt_set: RankTreeSet<i64> = RankTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(rt_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rt_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rt_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(rt_set.first(), bt_set.first());
                }
                SetOp::Last => {
                    prop_assert_eq!(rt_set.last(), bt_set.last());
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(rt_set.pop_first(), bt_set.pop_first());
                }
                SetOp::PopLast => {
                    prop_assert_eq!(rt_set.pop_last(), bt_set.pop_last());
                }
                SetOp::GetByRank(r) => {
                    let rank = if bt_set.is_empty() { *r } else { r % (bt_set.len() + 1) };
                    prop_assert_eq!(rt_set.get_by_rank(rank), bt_set.iter().nth(rank), "get_by_rank({})", rank);
                }
                SetOp::RankOf(v) => {
                    let expected = if bt_set.contains(v) {
                        Some(bt_set.range(..v).count())
                    } else {
                        None
                    };
                    prop_assert_eq!(rt_set.rank_of(v), expected, "rank_of({})", v);
                }
                SetOp::Floor(v) => {
                    prop_assert_eq!(rt_set.floor(v), bt_set.range(..=v).next_back(), "floor({})", v);
                }
                SetOp::Ceiling(v) => {
                    prop_assert_eq!(rt_set.ceiling(v), bt_set.range(v..).next(), "ceiling({})", v);
                }
            }

            prop_assert_eq!(rt_set.len(), bt_set.len());
        }

        rt_set._check_invariants().unwrap();
        prop_assert!(rt_set.iter().eq(bt_set.iter()));
    }
}

// ─── Deterministic behavior ──────────────────────────────────────────────────

#[test]
fn ranks_track_sorted_position() {
    let mut set = RankTreeSet::new();
    for value in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
        assert!(set.insert(value));
    }
    set._check_invariants().unwrap();

    assert_eq!(set.len(), 9);
    assert_eq!(set.get_by_rank(0), Some(&1));
    assert_eq!(set.get_by_rank(4), Some(&5));
    assert_eq!(set.get_by_rank(8), Some(&9));
    assert_eq!(set.rank_of(&6), Some(5));
}

#[test]
fn removal_shifts_ranks() {
    let mut set: RankTreeSet<i32> = [5, 3, 8, 1, 4, 7, 9, 2, 6].into();

    assert!(set.remove(&5));
    set._check_invariants().unwrap();

    assert_eq!(set.len(), 8);
    assert_eq!(set.get_by_rank(4), Some(&6));
    assert_eq!(set.rank_of(&6), Some(4));
    assert_eq!(set.rank_of(&5), None);
}

#[test]
fn bounded_view_exposes_relative_ranks() {
    let mut set: RankTreeSet<i32> = [1, 3, 4, 6, 7, 8].into();
    let sub = set.sub(3, true, 8, false).unwrap();

    assert_eq!(sub.len(), 4);
    assert_eq!(sub.iter().copied().collect::<Vec<_>>(), [3, 4, 6, 7]);
    assert_eq!(sub.get_by_rank(0), Some(&3));
    assert_eq!(sub.get_by_rank(3), Some(&7));
    assert_eq!(sub.rank_of(&6), Some(2));
    assert_eq!(sub.rank_of(&8), None);
    assert_eq!(sub.first(), Some(&3));
    assert_eq!(sub.last(), Some(&7));
}

#[test]
fn cursor_fails_fast_after_external_removal() {
    let mut set: RankTreeSet<i32> = [1, 2, 3, 4, 5, 6].into();
    let mut cursor = set.cursor();
    assert_eq!(cursor.advance(&set), Ok(Some(&1)));
    assert_eq!(cursor.advance(&set), Ok(Some(&2)));

    assert!(set.remove(&6));
    assert_eq!(cursor.advance(&set), Err(Error::ConcurrentModification));
    assert_eq!(cursor.advance(&set), Err(Error::ConcurrentModification));
}

#[test]
fn bulk_load_is_balanced() {
    let set = RankTreeSet::from_sorted(1..=7).unwrap();
    set._check_invariants().unwrap();
    assert_eq!(set.len(), 7);
    assert_eq!(set.get_by_rank(3), Some(&4));
    assert_eq!(RankTreeSet::from_sorted([3, 1, 2]), Err(Error::Unsorted));
}

#[test]
fn duplicate_insert_keeps_stored_element() {
    #[derive(Debug)]
    struct Tagged(i32, &'static str);
    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for Tagged {}
    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    let mut set = RankTreeSet::new();
    assert!(set.insert(Tagged(1, "original")));
    assert!(!set.insert(Tagged(1, "impostor")));
    assert_eq!(set.len(), 1);
    assert_eq!(set.get(&Tagged(1, "anything")).unwrap().1, "original");
}

#[test]
fn take_returns_stored_element() {
    let mut set: RankTreeSet<i32> = [1, 2, 3].into();
    assert_eq!(set.take(&2), Some(2));
    assert_eq!(set.take(&2), None);
    assert_eq!(set.len(), 2);
}

#[test]
fn descending_view_reverses_ranks() {
    let mut set: RankTreeSet<i32> = [10, 20, 30].into();
    let desc = set.descending();
    assert_eq!(desc.get_by_rank(0), Some(&30));
    assert_eq!(desc.get_by_rank(2), Some(&10));
    assert_eq!(desc.rank_of(&30), Some(0));
    assert_eq!(desc.iter().copied().collect::<Vec<_>>(), [30, 20, 10]);
}

#[test]
fn view_narrowing_composes() {
    let mut set: RankTreeSet<i32> = (0..20).collect();
    let sub = set.sub(5, true, 15, true).unwrap();
    let narrowed = sub.sub(8, true, 12, false).unwrap();
    assert_eq!(narrowed.iter().copied().collect::<Vec<_>>(), [8, 9, 10, 11]);

    let desc = narrowed.descending();
    assert_eq!(desc.first(), Some(&11));

    let sub = set.sub(5, true, 15, true).unwrap();
    assert!(matches!(sub.sub(4, true, 10, true), Err(Error::OutOfRange)));

    // an excluded endpoint cannot be re-included by narrowing
    let sub = set.tail(5, false);
    assert!(matches!(sub.sub(5, true, 7, true), Err(Error::OutOfRange)));
    let sub = set.tail(5, false);
    assert!(!sub.sub(5, false, 7, true).unwrap().contains(&5));
}

#[test]
fn set_view_mutation_is_bound_checked() {
    let mut set: RankTreeSet<i32> = [1, 5, 9].into();
    let mut sub = set.sub(3, true, 8, false).unwrap();

    assert_eq!(sub.insert(4), Ok(true));
    assert_eq!(sub.insert(4), Ok(false));
    assert_eq!(sub.insert(9), Err(Error::OutOfRange));
    assert_eq!(sub.remove(&5), Ok(true));
    assert_eq!(sub.remove(&9), Err(Error::OutOfRange));

    drop(sub);
    assert!(set.iter().eq([1, 4, 9].iter()));
}

#[test]
fn rank_indexing() {
    let set: RankTreeSet<i32> = [30, 10, 20].into();
    assert_eq!(set[Rank(0)], 10);
    assert_eq!(set[Rank(1)], 20);
    assert_eq!(set[Rank(2)], 30);
}

#[test]
#[should_panic(expected = "no element found for rank")]
fn rank_indexing_out_of_bounds() {
    let set: RankTreeSet<i32> = [1].into();
    let _ = set[Rank(1)];
}

#[test]
fn iteration_round_trips() {
    let set: RankTreeSet<i32> = (0..50).rev().collect();
    assert!(set.iter().copied().eq(0..50));
    let owned: Vec<i32> = set.into_iter().collect();
    assert_eq!(owned, (0..50).collect::<Vec<_>>());
}
