use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Bound;

use crate::Error;
use crate::raw::{Handle, RawTree};

pub(crate) fn bound<K>(key: K, inclusive: bool) -> Bound<K> {
    if inclusive { Bound::Included(key) } else { Bound::Excluded(key) }
}

/// A live, bounded view of a [`RankTreeMap`](crate::RankTreeMap).
///
/// A `SubMap` is not a copy: it aliases the entries of the map it was
/// created from, restricted to a key interval and optionally reversed. The
/// borrow checker serializes access, so a mutation through either the view
/// or the map (once the view is dropped) is immediately visible through the
/// other.
///
/// Bounds always live in key space; the `descending` flag only reverses
/// iteration order and rank numbering. `len`, `get_by_rank`, and `rank_of`
/// are all view-relative and cost O(log n).
///
/// Queries with out-of-bounds keys answer `None`/`false`; mutations and
/// re-views with out-of-bounds keys fail with [`Error::OutOfRange`] and
/// leave the map untouched.
///
/// # Examples
///
/// ```
/// use rank_tree::RankTreeMap;
///
/// let mut map = RankTreeMap::from([(1, 1), (3, 3), (4, 4), (6, 6), (7, 7), (8, 8)]);
/// let mut sub = map.sub(3, true, 8, false).unwrap();
///
/// assert_eq!(sub.len(), 4);
/// assert_eq!(sub.iter().map(|(k, _)| *k).collect::<Vec<_>>(), [3, 4, 6, 7]);
///
/// // mutations through the view land in the map
/// sub.insert(5, 5).unwrap();
/// assert_eq!(sub.insert(9, 9), Err(rank_tree::Error::OutOfRange));
/// drop(sub);
/// assert_eq!(map.len(), 7);
/// ```
pub struct SubMap<'a, K, V> {
    tree: &'a mut RawTree<K, V>,
    lower: Bound<K>,
    upper: Bound<K>,
    descending: bool,
}

impl<'a, K: Ord, V> SubMap<'a, K, V> {
    pub(crate) fn new(
        tree: &'a mut RawTree<K, V>,
        lower: Bound<K>,
        upper: Bound<K>,
        descending: bool,
    ) -> Self {
        Self {
            tree,
            lower,
            upper,
            descending,
        }
    }

    // Entries of the backing tree strictly below the view.
    fn start_count(&self) -> usize {
        match &self.lower {
            Bound::Unbounded => 0,
            Bound::Included(k) => self.tree.count_below(k, false),
            Bound::Excluded(k) => self.tree.count_below(k, true),
        }
    }

    // Entries of the backing tree at or below the view's top.
    fn end_count(&self) -> usize {
        match &self.upper {
            Bound::Unbounded => self.tree.len(),
            Bound::Included(k) => self.tree.count_below(k, true),
            Bound::Excluded(k) => self.tree.count_below(k, false),
        }
    }

    fn in_bounds<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let above_lower = match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(l) => key >= l.borrow(),
            Bound::Excluded(l) => key > l.borrow(),
        };
        let below_upper = match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(u) => key <= u.borrow(),
            Bound::Excluded(u) => key < u.borrow(),
        };
        above_lower && below_upper
    }

    // A new inclusive endpoint must itself be in bounds; an exclusive one
    // may additionally sit on an excluded endpoint, since the key it names
    // stays invisible either way.
    fn covers(&self, key: &K, inclusive: bool) -> bool {
        if inclusive {
            return self.in_bounds(key);
        }
        let lo_ok = match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(l) | Bound::Excluded(l) => key >= l,
        };
        let hi_ok = match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(u) | Bound::Excluded(u) => key <= u,
        };
        lo_ok && hi_ok
    }

    fn lowest(&self) -> Option<Handle> {
        let h = match &self.lower {
            Bound::Unbounded => self.tree.first(),
            Bound::Included(l) => self.tree.least_above(l, true),
            Bound::Excluded(l) => self.tree.least_above(l, false),
        }?;
        if self.in_bounds(self.tree.key(h)) { Some(h) } else { None }
    }

    fn highest(&self) -> Option<Handle> {
        let h = match &self.upper {
            Bound::Unbounded => self.tree.last(),
            Bound::Included(u) => self.tree.greatest_below(u, true),
            Bound::Excluded(u) => self.tree.greatest_below(u, false),
        }?;
        if self.in_bounds(self.tree.key(h)) { Some(h) } else { None }
    }

    /// Number of entries visible through the view.
    ///
    /// # Complexity
    ///
    /// O(log n) - derived from subtree weights, not by walking the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_count().saturating_sub(self.start_count())
    }

    /// Returns `true` if no entries are visible through the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is within bounds and present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.in_bounds(key) && self.tree.locate(key).is_some()
    }

    /// Returns the value for `key`, or `None` if the key is absent or out
    /// of bounds.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if !self.in_bounds(key) {
            return None;
        }
        self.tree.locate(key).map(|h| self.tree.key_value(h).1)
    }

    /// Inserts a key-value pair through the view, with the same replacement
    /// semantics as [`RankTreeMap::insert`](crate::RankTreeMap::insert).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `key` lies outside the view bounds;
    /// the map is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if !self.in_bounds(&key) {
            return Err(Error::OutOfRange);
        }
        Ok(match self.tree.insert(key, value) {
            Ok(_) => None,
            Err((h, value)) => Some(self.tree.replace_value(h, value)),
        })
    }

    /// Removes `key` through the view, returning its value if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `key` lies outside the view bounds;
    /// the map is left untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if !self.in_bounds(key) {
            return Err(Error::OutOfRange);
        }
        Ok(self.tree.remove(key).map(|(_, v)| v))
    }

    /// First entry in view order: the least in-bounds key, or the greatest
    /// for a descending view.
    pub fn first(&self) -> Option<(&K, &V)> {
        let h = if self.descending { self.highest() } else { self.lowest() }?;
        Some(self.tree.key_value(h))
    }

    /// Last entry in view order.
    pub fn last(&self) -> Option<(&K, &V)> {
        let h = if self.descending { self.lowest() } else { self.highest() }?;
        Some(self.tree.key_value(h))
    }

    /// The entry at `rank` in view order, or `None` if `rank >= len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let len = self.len();
        if rank >= len {
            return None;
        }
        let offset = if self.descending { len - 1 - rank } else { rank };
        let h = self.tree.select(self.start_count() + offset)?;
        Some(self.tree.key_value(h))
    }

    /// The view-relative rank of `key`, or `None` if the key is absent or
    /// out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if !self.in_bounds(key) {
            return None;
        }
        let relative = self.tree.rank_of(key)? - self.start_count();
        Some(if self.descending { self.len() - 1 - relative } else { relative })
    }

    /// Iterates the in-bounds entries in view order.
    pub fn iter(&self) -> ViewIter<'_, K, V> {
        ViewIter {
            tree: &*self.tree,
            next: if self.descending { self.highest() } else { self.lowest() },
            remaining: self.len(),
            descending: self.descending,
        }
    }

    /// Narrows the view to `[lower, upper]` with the given inclusivities.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if `lower > upper`; [`Error::OutOfRange`] if
    /// either endpoint lies outside the current view.
    pub fn sub(
        self,
        lower: K,
        lower_inclusive: bool,
        upper: K,
        upper_inclusive: bool,
    ) -> Result<SubMap<'a, K, V>, Error> {
        if lower > upper {
            return Err(Error::InvalidRange);
        }
        if !self.covers(&lower, lower_inclusive) || !self.covers(&upper, upper_inclusive) {
            return Err(Error::OutOfRange);
        }
        Ok(SubMap {
            tree: self.tree,
            lower: bound(lower, lower_inclusive),
            upper: bound(upper, upper_inclusive),
            descending: self.descending,
        })
    }

    /// Narrows the view to the entries below `upper`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `upper` lies outside the current view.
    pub fn head(self, upper: K, inclusive: bool) -> Result<SubMap<'a, K, V>, Error> {
        if !self.covers(&upper, inclusive) {
            return Err(Error::OutOfRange);
        }
        Ok(SubMap {
            tree: self.tree,
            lower: self.lower,
            upper: bound(upper, inclusive),
            descending: self.descending,
        })
    }

    /// Narrows the view to the entries above `lower`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `lower` lies outside the current view.
    pub fn tail(self, lower: K, inclusive: bool) -> Result<SubMap<'a, K, V>, Error> {
        if !self.covers(&lower, inclusive) {
            return Err(Error::OutOfRange);
        }
        Ok(SubMap {
            tree: self.tree,
            lower: bound(lower, inclusive),
            upper: self.upper,
            descending: self.descending,
        })
    }

    /// Reverses the view order. Bounds are unchanged; ranks and iteration
    /// flip direction. Applying it twice restores the original order.
    #[must_use]
    pub fn descending(self) -> SubMap<'a, K, V> {
        SubMap {
            tree: self.tree,
            lower: self.lower,
            upper: self.upper,
            descending: !self.descending,
        }
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for SubMap<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An iterator over the entries of a [`SubMap`], in view order.
///
/// This `struct` is created by the [`iter`](SubMap::iter) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ViewIter<'a, K, V> {
    tree: &'a RawTree<K, V>,
    next: Option<Handle>,
    remaining: usize,
    descending: bool,
}

impl<'a, K, V> Iterator for ViewIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.next?;
        self.remaining -= 1;
        self.next = if self.remaining == 0 {
            None
        } else if self.descending {
            self.tree.predecessor(h)
        } else {
            self.tree.successor(h)
        };
        Some(self.tree.key_value(h))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ViewIter<'_, K, V> {}
impl<K, V> FusedIterator for ViewIter<'_, K, V> {}

/// A live, bounded view of a [`RankTreeSet`](crate::RankTreeSet). The set
/// analogue of [`SubMap`].
///
/// # Examples
///
/// ```
/// use rank_tree::RankTreeSet;
///
/// let mut set = RankTreeSet::from([1, 3, 4, 6, 7, 8]);
/// let sub = set.sub(3, true, 8, false).unwrap();
/// assert_eq!(sub.len(), 4);
/// assert_eq!(sub.iter().copied().collect::<Vec<_>>(), [3, 4, 6, 7]);
/// ```
pub struct SubSet<'a, T> {
    pub(crate) inner: SubMap<'a, T, ()>,
}

impl<'a, T: Ord> SubSet<'a, T> {
    /// Number of elements visible through the view. O(log n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no elements are visible through the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if `value` is within bounds and present.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.inner.contains_key(value)
    }

    /// Returns the stored element equal to `value`, if in bounds and
    /// present.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if !self.inner.in_bounds(value) {
            return None;
        }
        self.inner.tree.locate(value).map(|h| self.inner.tree.key_value(h).0)
    }

    /// Adds a value through the view. Returns whether the value was newly
    /// inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` lies outside the view
    /// bounds; the set is left untouched.
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        Ok(self.inner.insert(value, ())?.is_none())
    }

    /// Removes a value through the view. Returns whether the value was
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` lies outside the view
    /// bounds; the set is left untouched.
    pub fn remove<Q>(&mut self, value: &Q) -> Result<bool, Error>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Ok(self.inner.remove(value)?.is_some())
    }

    /// First element in view order.
    pub fn first(&self) -> Option<&T> {
        self.inner.first().map(|(k, ())| k)
    }

    /// Last element in view order.
    pub fn last(&self) -> Option<&T> {
        self.inner.last().map(|(k, ())| k)
    }

    /// The element at `rank` in view order. O(log n).
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.inner.get_by_rank(rank).map(|(k, ())| k)
    }

    /// The view-relative rank of `value`. O(log n).
    pub fn rank_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.inner.rank_of(value)
    }

    /// Iterates the in-bounds elements in view order.
    pub fn iter(&self) -> SetViewIter<'_, T> {
        SetViewIter { inner: self.inner.iter() }
    }

    /// Narrows the view to `[lower, upper]`. See [`SubMap::sub`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if `lower > upper`; [`Error::OutOfRange`] if
    /// either endpoint lies outside the current view.
    pub fn sub(
        self,
        lower: T,
        lower_inclusive: bool,
        upper: T,
        upper_inclusive: bool,
    ) -> Result<SubSet<'a, T>, Error> {
        Ok(SubSet {
            inner: self.inner.sub(lower, lower_inclusive, upper, upper_inclusive)?,
        })
    }

    /// Narrows the view to the elements below `upper`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `upper` lies outside the current view.
    pub fn head(self, upper: T, inclusive: bool) -> Result<SubSet<'a, T>, Error> {
        Ok(SubSet {
            inner: self.inner.head(upper, inclusive)?,
        })
    }

    /// Narrows the view to the elements above `lower`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `lower` lies outside the current view.
    pub fn tail(self, lower: T, inclusive: bool) -> Result<SubSet<'a, T>, Error> {
        Ok(SubSet {
            inner: self.inner.tail(lower, inclusive)?,
        })
    }

    /// Reverses the view order.
    #[must_use]
    pub fn descending(self) -> SubSet<'a, T> {
        SubSet {
            inner: self.inner.descending(),
        }
    }
}

impl<T: fmt::Debug + Ord> fmt::Debug for SubSet<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// An iterator over the elements of a [`SubSet`], in view order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SetViewIter<'a, T> {
    inner: ViewIter<'a, T, ()>,
}

impl<'a, T> Iterator for SetViewIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for SetViewIter<'_, T> {}
impl<T> FusedIterator for SetViewIter<'_, T> {}
