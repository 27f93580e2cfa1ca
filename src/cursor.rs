use core::marker::PhantomData;

use crate::Error;
use crate::map::RankTreeMap;
use crate::raw::Handle;
use crate::set::RankTreeSet;

/// A fail-fast cursor over a [`RankTreeMap`].
///
/// A cursor holds no borrow of the map, so the map can be mutated between
/// advances. In exchange, every [`advance`](Cursor::advance) re-validates
/// that the map has not been structurally modified (insert, remove, clear)
/// since the cursor was created; if it has, the cursor reports
/// [`Error::ConcurrentModification`] and stays in that state forever.
/// Value-only updates of existing keys do not count as structural
/// modifications.
///
/// A cursor must only be passed to the map it was created by; pairing it
/// with another map yields unspecified entries or a panic.
///
/// # Examples
///
/// ```
/// use rank_tree::{Error, RankTreeMap};
///
/// let mut map = RankTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut cursor = map.cursor();
/// assert_eq!(cursor.advance(&map), Ok(Some((&1, &"a"))));
///
/// // value-only updates are fine
/// map.insert(2, "B");
/// assert_eq!(cursor.advance(&map), Ok(Some((&2, &"B"))));
///
/// // structural changes are not
/// map.remove(&3);
/// assert_eq!(cursor.advance(&map), Err(Error::ConcurrentModification));
/// ```
#[derive(Debug)]
pub struct Cursor<K, V> {
    expected: u64,
    next: Option<Handle>,
    descending: bool,
    poisoned: bool,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Cursor<K, V> {
    pub(crate) fn new(expected: u64, next: Option<Handle>, descending: bool) -> Self {
        Self {
            expected,
            next,
            descending,
            poisoned: false,
            _marker: PhantomData,
        }
    }

    /// Steps the cursor and returns the entry it moved over, or `Ok(None)`
    /// once the traversal is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the map was structurally
    /// modified since the cursor was created, on this and every later call.
    pub fn advance<'a>(&mut self, map: &'a RankTreeMap<K, V>) -> Result<Option<(&'a K, &'a V)>, Error> {
        if self.poisoned || map.raw.mod_count() != self.expected {
            self.poisoned = true;
            return Err(Error::ConcurrentModification);
        }
        let Some(h) = self.next else {
            return Ok(None);
        };
        self.next = if self.descending {
            map.raw.predecessor(h)
        } else {
            map.raw.successor(h)
        };
        Ok(Some(map.raw.key_value(h)))
    }
}

/// A fail-fast cursor over a [`RankTreeSet`]. See [`Cursor`].
///
/// # Examples
///
/// ```
/// use rank_tree::{Error, RankTreeSet};
///
/// let mut set = RankTreeSet::from([1, 2, 3]);
/// let mut cursor = set.cursor();
/// assert_eq!(cursor.advance(&set), Ok(Some(&1)));
///
/// set.remove(&2);
/// assert_eq!(cursor.advance(&set), Err(Error::ConcurrentModification));
/// ```
#[derive(Debug)]
pub struct SetCursor<T> {
    inner: Cursor<T, ()>,
}

impl<T> SetCursor<T> {
    pub(crate) fn new(inner: Cursor<T, ()>) -> Self {
        Self { inner }
    }

    /// Steps the cursor and returns the element it moved over, or
    /// `Ok(None)` once the traversal is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the set was structurally
    /// modified since the cursor was created, on this and every later call.
    pub fn advance<'a>(&mut self, set: &'a RankTreeSet<T>) -> Result<Option<&'a T>, Error> {
        Ok(self.inner.advance(&set.map)?.map(|(k, ())| k))
    }
}
