use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Bound, Index, IndexMut};

use alloc::vec::Vec;

use crate::cursor::Cursor;
use crate::raw::{Handle, RawTree};
use crate::view::{SubMap, bound};
use crate::{Error, Rank};

/// An ordered map with O(log n) rank queries.
///
/// `RankTreeMap` stores its entries in key order, like `BTreeMap`, and
/// additionally answers positional questions in logarithmic time:
///
/// - [`get_by_rank`](RankTreeMap::get_by_rank) - the entry at a given sorted
///   position
/// - [`rank_of`](RankTreeMap::rank_of) - the sorted position of a key
/// - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the first value
///
/// Keys must implement [`Ord`]; a custom ordering is supplied by wrapping the
/// key in a newtype with the desired `Ord` impl. It is a logic error for a
/// key to change its ordering relative to other keys while it is in the map.
///
/// # Examples
///
/// ```
/// use rank_tree::{Rank, RankTreeMap};
///
/// let mut scores = RankTreeMap::new();
/// scores.insert("Alice", 100);
/// scores.insert("Bob", 85);
/// scores.insert("Carol", 92);
///
/// // Standard ordered-map operations work as expected
/// assert_eq!(scores.get(&"Bob"), Some(&85));
/// assert_eq!(scores.len(), 3);
///
/// // Order-statistic operations (O(log n))
/// let (name, score) = scores.get_by_rank(1).unwrap();
/// assert_eq!(*name, "Bob");
/// assert_eq!(*score, 85);
/// assert_eq!(scores.rank_of(&"Carol"), Some(2));
/// assert_eq!(scores[Rank(0)], 100);
/// ```
pub struct RankTreeMap<K, V> {
    pub(crate) raw: RawTree<K, V>,
}

impl<K, V> RankTreeMap<K, V> {
    /// Makes a new, empty `RankTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawTree::new() }
    }

    /// Makes a new, empty `RankTreeMap` with room for `capacity` entries
    /// before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.locate(key).map(|h| self.raw.key_value(h).1)
    }

    /// Returns the key-value pair corresponding to the supplied key. The
    /// returned key is the one stored in the map, which may be relevant for
    /// key types with ordering-irrelevant payload.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.locate(key).map(|h| self.raw.key_value(h))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        let h = self.raw.locate(key)?;
        Some(self.raw.entry_mut(h).1)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.locate(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key present, the value is updated in
    /// place and the old value is returned. The stored key is not replaced,
    /// and the update does not count as a structural modification, so live
    /// cursors stay valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        match self.raw.insert(key, value) {
            Ok(_) => None,
            Err((h, value)) => Some(self.raw.replace_value(h, value)),
        }
    }

    /// Removes a key from the map, returning the value at the key if it was
    /// previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was previously in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Returns the first key-value pair in the map. The key in this pair is
    /// the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(2, "a");
    /// map.insert(1, "b");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn first_key_value(&self) -> Option<(&K, &V)>
    where
        K: Ord,
    {
        self.raw.first().map(|h| self.raw.key_value(h))
    }

    /// Returns the last key-value pair in the map. The key in this pair is
    /// the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn last_key_value(&self) -> Option<(&K, &V)>
    where
        K: Ord,
    {
        self.raw.last().map(|h| self.raw.key_value(h))
    }

    /// Removes and returns the first entry in the map, or `None` if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// Draining entries in ascending order, while keeping a usable map each
    /// iteration.
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _value)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)>
    where
        K: Ord,
    {
        let h = self.raw.first()?;
        Some(self.raw.remove_at(h))
    }

    /// Removes and returns the last entry in the map, or `None` if the map
    /// is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<(K, V)>
    where
        K: Ord,
    {
        let h = self.raw.last()?;
        Some(self.raw.remove_at(h))
    }

    /// Returns the entry with the greatest key `<= key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let map = RankTreeMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.floor(&15), Some((&10, &"a")));
    /// assert_eq!(map.floor(&20), Some((&20, &"b")));
    /// assert_eq!(map.floor(&5), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.greatest_below(key, true).map(|h| self.raw.key_value(h))
    }

    /// Returns the entry with the least key `>= key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.least_above(key, true).map(|h| self.raw.key_value(h))
    }

    /// Returns the entry with the greatest key strictly `< key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.greatest_below(key, false).map(|h| self.raw.key_value(h))
    }

    /// Returns the entry with the least key strictly `> key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.least_above(key, false).map(|h| self.raw.key_value(h))
    }

    /// Returns the entry at the given 0-based rank in ascending key order,
    /// or `None` if `rank >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let map = RankTreeMap::from([(30, "c"), (10, "a"), (20, "b")]);
    /// assert_eq!(map.get_by_rank(0), Some((&10, &"a")));
    /// assert_eq!(map.get_by_rank(2), Some((&30, &"c")));
    /// assert_eq!(map.get_by_rank(3), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)>
    where
        K: Ord,
    {
        self.raw.select(rank).map(|h| self.raw.key_value(h))
    }

    /// Returns the entry at the given rank with a mutable value reference.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)>
    where
        K: Ord,
    {
        let h = self.raw.select(rank)?;
        Some(self.raw.entry_mut(h))
    }

    /// Returns the 0-based rank of `key` in ascending key order, or `None`
    /// if the key is not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let map = RankTreeMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(map.rank_of(&20), Some(1));
    /// assert_eq!(map.rank_of(&15), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.rank_of(key)
    }

    /// Builds a map from entries that are already in strictly ascending key
    /// order, in O(n) without any rebalancing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsorted`] if any adjacent pair of keys is out of
    /// order or equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Error, RankTreeMap};
    ///
    /// let map = RankTreeMap::from_sorted([(1, "a"), (2, "b"), (3, "c")]).unwrap();
    /// assert_eq!(map.get_by_rank(1), Some((&2, &"b")));
    ///
    /// assert_eq!(
    ///     RankTreeMap::from_sorted([(2, "b"), (1, "a")]),
    ///     Err(Error::Unsorted),
    /// );
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn from_sorted<I>(items: I) -> Result<Self, Error>
    where
        K: Ord,
        I: IntoIterator<Item = (K, V)>,
    {
        let items: Vec<(K, V)> = items.into_iter().collect();
        if items.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::Unsorted);
        }
        Ok(Self {
            raw: RawTree::build_sorted(items),
        })
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let map = RankTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let first = map.iter().next();
    /// assert_eq!(first, Some((&1, &"a")));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Creates an ascending fail-fast cursor positioned before the first
    /// entry.
    ///
    /// Unlike [`iter`](RankTreeMap::iter), a cursor holds no borrow of the
    /// map, so the map can be mutated between advances. Each
    /// [`advance`](Cursor::advance) re-validates that no structural
    /// modification happened since the cursor was created and reports
    /// [`Error::ConcurrentModification`] otherwise. Value-only updates
    /// (replacing the value of an existing key) do not invalidate cursors.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Error, RankTreeMap};
    ///
    /// let mut map = RankTreeMap::from([(1, "a"), (2, "b")]);
    /// let mut cursor = map.cursor();
    /// assert_eq!(cursor.advance(&map), Ok(Some((&1, &"a"))));
    ///
    /// map.remove(&2);
    /// assert_eq!(cursor.advance(&map), Err(Error::ConcurrentModification));
    /// // the cursor stays unusable
    /// assert_eq!(cursor.advance(&map), Err(Error::ConcurrentModification));
    /// ```
    #[must_use]
    pub fn cursor(&self) -> Cursor<K, V> {
        Cursor::new(self.raw.mod_count(), self.raw.first(), false)
    }

    /// Creates a descending fail-fast cursor positioned before the last
    /// entry. See [`cursor`](RankTreeMap::cursor).
    #[must_use]
    pub fn cursor_desc(&self) -> Cursor<K, V> {
        Cursor::new(self.raw.mod_count(), self.raw.last(), true)
    }

    /// Returns a live view of the entries with keys between `lower` and
    /// `upper`.
    ///
    /// The view aliases the map: mutations through the view are visible in
    /// the map and vice versa (the borrow checker serializes them). View
    /// mutations are bound-checked; see [`SubMap`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `lower > upper`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::from([(1, 1), (3, 3), (4, 4), (6, 6), (7, 7), (8, 8)]);
    /// let sub = map.sub(3, true, 8, false).unwrap();
    /// assert_eq!(sub.len(), 4);
    /// assert_eq!(sub.get_by_rank(0), Some((&3, &3)));
    /// ```
    pub fn sub(
        &mut self,
        lower: K,
        lower_inclusive: bool,
        upper: K,
        upper_inclusive: bool,
    ) -> Result<SubMap<'_, K, V>, Error>
    where
        K: Ord,
    {
        if lower > upper {
            return Err(Error::InvalidRange);
        }
        Ok(SubMap::new(
            &mut self.raw,
            bound(lower, lower_inclusive),
            bound(upper, upper_inclusive),
            false,
        ))
    }

    /// Returns a live view of the entries with keys below `upper`.
    pub fn head(&mut self, upper: K, inclusive: bool) -> SubMap<'_, K, V>
    where
        K: Ord,
    {
        SubMap::new(&mut self.raw, Bound::Unbounded, bound(upper, inclusive), false)
    }

    /// Returns a live view of the entries with keys above `lower`.
    pub fn tail(&mut self, lower: K, inclusive: bool) -> SubMap<'_, K, V>
    where
        K: Ord,
    {
        SubMap::new(&mut self.raw, bound(lower, inclusive), Bound::Unbounded, false)
    }

    /// Checks every structural invariant of the backing tree from scratch.
    /// Intended for tests and fuzzing, not part of the stable API.
    ///
    /// # Errors
    ///
    /// A short description of the first violated invariant.
    #[doc(hidden)]
    pub fn _check_invariants(&self) -> Result<(), &'static str>
    where
        K: Ord,
    {
        self.raw.check_invariants()
    }

    /// Returns a live view of the whole map in descending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let mut map = RankTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let desc = map.descending();
    /// assert_eq!(desc.get_by_rank(0), Some((&3, &"c")));
    /// ```
    pub fn descending(&mut self) -> SubMap<'_, K, V>
    where
        K: Ord,
    {
        SubMap::new(&mut self.raw, Bound::Unbounded, Bound::Unbounded, true)
    }
}

// ─── Iterators ───────────────────────────────────────────────────────────

/// An iterator over the entries of a `RankTreeMap`, sorted by key.
///
/// This `struct` is created by the [`iter`] method on [`RankTreeMap`].
///
/// # Examples
///
/// ```
/// use rank_tree::RankTreeMap;
///
/// let map = RankTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RankTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawTree<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.front?;
        self.remaining -= 1;
        self.front = if self.remaining == 0 { None } else { self.tree.successor(h) };
        Some(self.tree.key_value(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.back?;
        self.remaining -= 1;
        self.back = if self.remaining == 0 { None } else { self.tree.predecessor(h) };
        Some(self.tree.key_value(h))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a `RankTreeMap`, in sorted order.
///
/// This `struct` is created by the [`keys`] method on [`RankTreeMap`].
///
/// [`keys`]: RankTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `RankTreeMap`, in key order.
///
/// This `struct` is created by the [`values`] method on [`RankTreeMap`].
///
/// [`values`]: RankTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of a `RankTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RankTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for RankTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_in_order().into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RankTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

// ─── Std trait impls ─────────────────────────────────────────────────────

impl<K: Ord, V> FromIterator<(K, V)> for RankTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RankTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RankTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a `RankTreeMap<K, V>`.
    ///
    /// If any entries in the array have equal keys, all but the last entry
    /// with each key are dropped.
    ///
    /// ```
    /// use rank_tree::RankTreeMap;
    ///
    /// let map1 = RankTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: RankTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V> Default for RankTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for RankTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RankTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RankTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RankTreeMap<K, V> {}

impl<K: Hash, V: Hash> Hash for RankTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for entry in self.iter() {
            entry.hash(state);
        }
    }
}

impl<K, V, Q> Index<&Q> for RankTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> Index<Rank> for RankTreeMap<K, V> {
    type Output = V;

    /// Returns a reference to the value at the given rank.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Rank, RankTreeMap};
    ///
    /// let map = RankTreeMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map[Rank(0)], "a");
    /// assert_eq!(map[Rank(1)], "b");
    /// ```
    fn index(&self, rank: Rank) -> &V {
        self.get_by_rank(rank.0).expect("no entry found for rank").1
    }
}

impl<K: Ord, V> IndexMut<Rank> for RankTreeMap<K, V> {
    /// Returns a mutable reference to the value at the given rank.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= len`.
    fn index_mut(&mut self, rank: Rank) -> &mut V {
        self.get_by_rank_mut(rank.0).expect("no entry found for rank").1
    }
}
