use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use crate::cursor::SetCursor;
use crate::map::{self, RankTreeMap};
use crate::view::SubSet;
use crate::{Error, Rank};

/// An ordered set with O(log n) rank queries.
///
/// `RankTreeSet` stores its elements in sorted order, like `BTreeSet`, and
/// additionally answers positional questions in logarithmic time:
///
/// - [`get_by_rank`](RankTreeSet::get_by_rank) - the element at a given
///   sorted position
/// - [`rank_of`](RankTreeSet::rank_of) - the sorted position of an element
/// - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the smallest element
///
/// # Examples
///
/// ```
/// use rank_tree::{Rank, RankTreeSet};
///
/// let mut set = RankTreeSet::new();
/// set.insert(30);
/// set.insert(10);
/// set.insert(20);
///
/// assert!(set.contains(&20));
/// assert_eq!(set.get_by_rank(1), Some(&20));
/// assert_eq!(set.rank_of(&30), Some(2));
/// assert_eq!(set[Rank(0)], 10);
/// ```
pub struct RankTreeSet<T> {
    pub(crate) map: RankTreeMap<T, ()>,
}

impl<T> RankTreeSet<T> {
    /// Makes a new, empty `RankTreeSet`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self { map: RankTreeMap::new() }
    }

    /// Makes a new, empty `RankTreeSet` with room for `capacity` elements
    /// before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RankTreeMap::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the set can hold without
    /// reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// The value may be any borrowed form of the set's element type, but
    /// the ordering on the borrowed form *must* match the ordering on the
    /// element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeSet;
    ///
    /// let set = RankTreeSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the stored element equal to the value, which
    /// may differ from `value` in ordering-irrelevant payload.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.get_key_value(value).map(|(k, ())| k)
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. If the set already
    /// contained an ordering-equal element, the set is not modified: the
    /// stored element is kept, the given one is dropped, and live cursors
    /// stay valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeSet;
    ///
    /// let mut set = RankTreeSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        self.map.insert(value, ()).is_none()
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the stored element equal to the value, if any.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }

    /// Returns the smallest element of the set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn first(&self) -> Option<&T>
    where
        T: Ord,
    {
        self.map.first_key_value().map(|(k, ())| k)
    }

    /// Returns the largest element of the set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn last(&self) -> Option<&T>
    where
        T: Ord,
    {
        self.map.last_key_value().map(|(k, ())| k)
    }

    /// Removes and returns the smallest element, or `None` if the set is
    /// empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T>
    where
        T: Ord,
    {
        self.map.pop_first().map(|(k, ())| k)
    }

    /// Removes and returns the largest element, or `None` if the set is
    /// empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T>
    where
        T: Ord,
    {
        self.map.pop_last().map(|(k, ())| k)
    }

    /// Returns the greatest element `<= value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeSet;
    ///
    /// let set = RankTreeSet::from([10, 20]);
    /// assert_eq!(set.floor(&15), Some(&10));
    /// assert_eq!(set.floor(&20), Some(&20));
    /// assert_eq!(set.floor(&5), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn floor<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.floor(value).map(|(k, ())| k)
    }

    /// Returns the least element `>= value`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn ceiling<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.ceiling(value).map(|(k, ())| k)
    }

    /// Returns the greatest element strictly `< value`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.lower(value).map(|(k, ())| k)
    }

    /// Returns the least element strictly `> value`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn higher<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.higher(value).map(|(k, ())| k)
    }

    /// Returns the element at the given 0-based rank in ascending order, or
    /// `None` if `rank >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeSet;
    ///
    /// let set = RankTreeSet::from([5, 3, 8, 1, 4, 7, 9, 2, 6]);
    /// assert_eq!(set.get_by_rank(0), Some(&1));
    /// assert_eq!(set.get_by_rank(4), Some(&5));
    /// assert_eq!(set.get_by_rank(8), Some(&9));
    /// assert_eq!(set.get_by_rank(9), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_by_rank(&self, rank: usize) -> Option<&T>
    where
        T: Ord,
    {
        self.map.get_by_rank(rank).map(|(k, ())| k)
    }

    /// Returns the 0-based rank of the value in ascending order, or `None`
    /// if the value is not in the set.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn rank_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.map.rank_of(value)
    }

    /// Builds a set from elements that are already in strictly ascending
    /// order, in O(n) without any rebalancing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsorted`] if any adjacent pair of elements is out
    /// of order or equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTreeSet;
    ///
    /// let set = RankTreeSet::from_sorted(1..=7).unwrap();
    /// assert_eq!(set.get_by_rank(3), Some(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn from_sorted<I>(items: I) -> Result<Self, Error>
    where
        T: Ord,
        I: IntoIterator<Item = T>,
    {
        Ok(Self {
            map: RankTreeMap::from_sorted(items.into_iter().map(|k| (k, ())))?,
        })
    }

    /// Gets an iterator over the elements of the set, in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// Creates an ascending fail-fast cursor positioned before the first
    /// element. See [`RankTreeMap::cursor`].
    #[must_use]
    pub fn cursor(&self) -> SetCursor<T> {
        SetCursor::new(self.map.cursor())
    }

    /// Creates a descending fail-fast cursor positioned before the last
    /// element.
    #[must_use]
    pub fn cursor_desc(&self) -> SetCursor<T> {
        SetCursor::new(self.map.cursor_desc())
    }

    /// Returns a live view of the elements between `lower` and `upper`. See
    /// [`SubSet`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `lower > upper`.
    pub fn sub(
        &mut self,
        lower: T,
        lower_inclusive: bool,
        upper: T,
        upper_inclusive: bool,
    ) -> Result<SubSet<'_, T>, Error>
    where
        T: Ord,
    {
        Ok(SubSet {
            inner: self.map.sub(lower, lower_inclusive, upper, upper_inclusive)?,
        })
    }

    /// Returns a live view of the elements below `upper`.
    pub fn head(&mut self, upper: T, inclusive: bool) -> SubSet<'_, T>
    where
        T: Ord,
    {
        SubSet {
            inner: self.map.head(upper, inclusive),
        }
    }

    /// Returns a live view of the elements above `lower`.
    pub fn tail(&mut self, lower: T, inclusive: bool) -> SubSet<'_, T>
    where
        T: Ord,
    {
        SubSet {
            inner: self.map.tail(lower, inclusive),
        }
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
        T: Ord,
    {
        self.map._check_invariants()
    }

    /// Returns a live view of the whole set in descending order.
    pub fn descending(&mut self) -> SubSet<'_, T>
    where
        T: Ord,
    {
        SubSet {
            inner: self.map.descending(),
        }
    }
}

// ─── Iterators ───────────────────────────────────────────────────────────

/// An iterator over the elements of a `RankTreeSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RankTreeSet`].
///
/// [`iter`]: RankTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: map::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the elements of a `RankTreeSet`, in ascending
/// order.
///
/// This `struct` is created by the [`into_iter`] method on [`RankTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    inner: map::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for RankTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RankTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ─── Std trait impls ─────────────────────────────────────────────────────

impl<T: Ord> FromIterator<T> for RankTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RankTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RankTreeSet<T> {
    /// Converts a `[T; N]` into a `RankTreeSet<T>`.
    ///
    /// ```
    /// use rank_tree::RankTreeSet;
    ///
    /// let set1 = RankTreeSet::from([1, 2, 3, 4]);
    /// let set2: RankTreeSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> Default for RankTreeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for RankTreeSet<T> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RankTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RankTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RankTreeSet<T> {}

impl<T: Hash> Hash for RankTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T: Ord> Index<Rank> for RankTreeSet<T> {
    type Output = T;

    /// Returns a reference to the element at the given rank.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Rank, RankTreeSet};
    ///
    /// let set = RankTreeSet::from([20, 10]);
    /// assert_eq!(set[Rank(0)], 10);
    /// assert_eq!(set[Rank(1)], 20);
    /// ```
    fn index(&self, rank: Rank) -> &T {
        self.get_by_rank(rank.0).expect("no element found for rank")
    }
}
