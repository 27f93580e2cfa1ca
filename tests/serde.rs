use serde::{Serialize, de::DeserializeOwned};

use rank_tree::{RankTreeMap, RankTreeSet};

fn round_trip<T: Serialize + DeserializeOwned>(t: &T) -> T {
    postcard::from_bytes(&postcard::to_allocvec(t).unwrap()).unwrap()
}

#[test]
fn map_round_trip() {
    let map: RankTreeMap<i64, String> = (0..500).map(|k| (k * 7 % 500, format!("v{k}"))).collect();
    let back = round_trip(&map);
    back._check_invariants().unwrap();
    assert_eq!(map, back);
    assert_eq!(back.get_by_rank(0), map.get_by_rank(0));
}

#[test]
fn empty_map_round_trip() {
    let map: RankTreeMap<u8, u8> = RankTreeMap::new();
    let back = round_trip(&map);
    assert!(back.is_empty());
}

#[test]
fn set_round_trip() {
    let set: RankTreeSet<i64> = (0..500).map(|k| k * 3 % 701).collect();
    let back = round_trip(&set);
    back._check_invariants().unwrap();
    assert_eq!(set, back);
}

#[test]
fn map_serializes_in_ascending_key_order() {
    let map: RankTreeMap<u32, u32> = [(3, 30), (1, 10), (2, 20)].into();
    // postcard encodes a map exactly like a length-prefixed entry sequence
    let bytes = postcard::to_allocvec(&map).unwrap();
    let entries: Vec<(u32, u32)> = postcard::from_bytes(&bytes).unwrap();
    assert_eq!(entries, [(1, 10), (2, 20), (3, 30)]);
}

#[test]
fn map_rejects_out_of_order_stream() {
    let result: Result<RankTreeMap<u32, u32>, _> = ron::from_str("{3:30,1:10}");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("strictly ascending"), "{err}");
}

#[test]
fn map_rejects_duplicate_keys_in_stream() {
    let result: Result<RankTreeMap<u32, u32>, _> = ron::from_str("{1:10,1:20}");
    assert!(result.is_err());
}

#[test]
fn map_accepts_ordered_stream() {
    let map: RankTreeMap<u32, u32> = ron::from_str("{1:10,2:20,3:30}").unwrap();
    map._check_invariants().unwrap();
    assert_eq!(map.rank_of(&3), Some(2));
}

#[test]
fn set_rejects_out_of_order_stream() {
    let result: Result<RankTreeSet<u32>, _> = ron::from_str("[3,1,2]");
    assert!(result.is_err());
}

#[test]
fn set_accepts_ordered_stream() {
    let set: RankTreeSet<u32> = ron::from_str("[1,2,3]").unwrap();
    set._check_invariants().unwrap();
    assert_eq!(set.len(), 3);
}
