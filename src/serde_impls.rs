//! `Serialize`/`Deserialize` impls, gated behind the `serde_support`
//! feature.
//!
//! Maps serialize as maps and sets as sequences, both in ascending key
//! order. Deserialization verifies that the incoming stream is strictly
//! ascending and then reconstructs the tree with the O(n) bulk loader, so a
//! round trip never pays the O(n log n) insertion cost. A stream with
//! out-of-order or duplicate keys is a format error.

use core::fmt;
use core::marker::PhantomData;

use alloc::vec::Vec;

use serde::de::{Deserialize, Deserializer, Error as DeError, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::map::RankTreeMap;
use crate::raw::RawTree;
use crate::set::RankTreeSet;

impl<K: Serialize, V: Serialize> Serialize for RankTreeMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de, K, V> Deserialize<'de> for RankTreeMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

struct MapVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for MapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = RankTreeMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with strictly ascending keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut items: Vec<(K, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            if let Some((prev, _)) = items.last() {
                if *prev >= key {
                    return Err(A::Error::custom("map keys are not strictly ascending"));
                }
            }
            items.push((key, value));
        }
        Ok(RankTreeMap {
            raw: RawTree::build_sorted(items),
        })
    }
}

impl<T: Serialize> Serialize for RankTreeSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T> Deserialize<'de> for RankTreeSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SetVisitor(PhantomData))
    }
}

struct SetVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for SetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = RankTreeSet<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of strictly ascending elements")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut items: Vec<(T, ())> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element()? {
            if let Some((prev, ())) = items.last() {
                if *prev >= value {
                    return Err(A::Error::custom("sequence elements are not strictly ascending"));
                }
            }
            items.push((value, ()));
        }
        Ok(RankTreeSet {
            map: RankTreeMap {
                raw: RawTree::build_sorted(items),
            },
        })
    }
}
