//! Ordered map built on the red-black tree engine.
//!
//! This module provides [`TreeMap`], a mutable ordered map with unique keys.
//! It stores [`Pair`]s in an [`RbTree`] ordered by key, so every lookup and
//! positional operation of the engine is available with key/value
//! signatures.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Duplicate keys are rejected; the first value stays.
//! assert!(!map.insert(2, "deux").1);
//! assert_eq!(map[&2], "two");
//!
//! assert_eq!(format!("{map}"), "{1: one, 2: two, 3: three}");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;

use crate::pair::Pair;
use crate::tree::{
    self, Compare, First, InvariantViolation, Less, Node, Position, RbTree, SlabStorage,
};

type Entry<K, V> = Pair<K, V>;
type Storage<K, V> = SlabStorage<Node<Entry<K, V>>>;

// =============================================================================
// TreeMap Definition
// =============================================================================

/// An ordered map with unique keys.
///
/// Keys are ordered by the comparator `C` (ascending [`Ord`] by default).
/// Only values can be changed in place; keys are fixed once inserted.
///
/// Positions returned by [`find`](Self::find), [`insert`](Self::insert) and
/// the bound queries stay valid until the entry they name is removed.
///
/// # Time Complexity
///
/// | Operation                     | Complexity     |
/// |-------------------------------|----------------|
/// | `insert` / `remove` / `get`   | O(log N)       |
/// | `insert_hint` (good hint)     | O(1) amortized |
/// | `erase` (by position)         | O(1) amortized |
/// | `first` / `last`              | O(1)           |
/// | `len` / `is_empty` / `swap`   | O(1)           |
pub struct TreeMap<K, V, C = Less> {
    tree: RbTree<Entry<K, V>, First, C>,
}

static_assertions::assert_impl_all!(TreeMap<String, Vec<u8>>: Send, Sync, Clone, Default);

impl<K, V> TreeMap<K, V> {
    /// Creates an empty map ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let map: TreeMap<i32, String> = TreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Less)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Creates an empty map ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    /// use ordtree::tree::Greater;
    ///
    /// let mut map = TreeMap::with_comparator(Greater);
    /// map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
    /// let keys: Vec<&i32> = map.keys().collect();
    /// assert_eq!(keys, vec![&3, &2, &1]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::from_parts(First, compare, SlabStorage::new()),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map holds no entry.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the key comparator.
    #[inline]
    #[must_use]
    pub const fn key_comp(&self) -> &C {
        self.tree.key_comp()
    }

    /// Returns the underlying tree.
    #[inline]
    #[must_use]
    pub const fn as_tree(&self) -> &RbTree<Entry<K, V>, First, C> {
        &self.tree
    }

    /// Returns the position of the smallest key, or `END` when empty.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// Returns the past-the-end position.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        self.tree.end()
    }

    /// Exchanges the contents of two maps in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Returns the largest number of entries the map could hold.
    #[inline]
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Returns the entry with the smallest key.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(Pair::as_tuple)
    }

    /// Returns the entry with the largest key.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(Pair::as_tuple)
    }

    /// Returns the entry at `position`, or `None` for `END`.
    #[inline]
    #[must_use]
    pub fn entry_at(&self, position: Position) -> Option<(&K, &V)> {
        self.tree.get(position).map(Pair::as_tuple)
    }

    /// Returns the value at `position` mutably, or `None` for `END`.
    #[inline]
    pub fn value_at_mut(&mut self, position: Position) -> Option<&mut V> {
        self.tree.get_mut(position).map(Pair::value_mut)
    }

    /// Returns the position after `position`.
    #[inline]
    #[must_use]
    pub fn next_position(&self, position: Position) -> Position {
        self.tree.next_position(position)
    }

    /// Returns the position before `position`; the maximum for `END`.
    #[inline]
    #[must_use]
    pub fn prev_position(&self, position: Position) -> Position {
        self.tree.prev_position(position)
    }

    /// Removes the entry at `position` and returns it.
    #[inline]
    pub fn erase(&mut self, position: Position) -> Option<(K, V)> {
        self.tree.erase(position).map(Pair::into_parts)
    }

    /// Removes the entries in `[first, last)`; returns how many.
    #[inline]
    pub fn erase_range(&mut self, first: Position, last: Position) -> usize {
        self.tree.erase_range(first, last)
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns an iterator over the entries in key order.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Returns an iterator over the keys in order.
    #[inline]
    #[must_use]
    pub const fn keys(&self) -> Keys<'_, K, V, C> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    #[inline]
    #[must_use]
    pub const fn values(&self) -> Values<'_, K, V, C> {
        Values { inner: self.iter() }
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Compare<K>,
{
    /// Inserts `key` with `value` unless the key is already present.
    ///
    /// Returns the position of the entry with that key and whether the
    /// insertion happened. An existing value is left untouched.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert(Pair::new(key, value))
    }

    /// Inserts using `hint` as a guess of where the key belongs.
    ///
    /// Returns the position of the entry with that key.
    #[inline]
    pub fn insert_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        self.tree.insert_hint(hint, Pair::new(key, value))
    }

    /// Returns the value for `key`, inserting `V::default()` first when the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut counts: TreeMap<char, usize> = TreeMap::new();
    /// for letter in "hello".chars() {
    ///     *counts.entry_or_default(letter) += 1;
    /// }
    /// assert_eq!(counts[&'l'], 2);
    /// assert_eq!(counts.len(), 4);
    /// ```
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.tree
            .get_or_insert_with(key, |key| Pair::new(key, V::default()))
            .value_mut()
    }

    /// Returns the value for `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(self.tree.find(key)).map(Pair::value)
    }

    /// Returns the value for `key` mutably.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let position = self.tree.find(key);
        self.value_at_mut(position)
    }

    /// Returns the stored key and the value for `key`.
    #[inline]
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.entry_at(self.tree.find(key))
    }

    /// Returns `true` if `key` is present.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Returns the number of entries with `key` (0 or 1).
    #[inline]
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Removes `key` and returns its value.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` and returns the stored key and value.
    #[inline]
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let position = self.tree.find(key);
        self.erase(position)
    }

    /// Returns the position of `key`, or `END`.
    #[inline]
    #[must_use]
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// Returns the position of the first key not less than `key`.
    #[inline]
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Position {
        self.tree.lower_bound(key)
    }

    /// Returns the position of the first key greater than `key`.
    #[inline]
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Position {
        self.tree.upper_bound(key)
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    #[inline]
    #[must_use]
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        self.tree.equal_range(key)
    }

    /// Returns an iterator over the entries with keys in `[from, to)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let map: TreeMap<i32, char> = (0..10).zip('a'..).collect();
    /// let middle: Vec<(&i32, &char)> = map.range(&4, &7).collect();
    /// assert_eq!(middle, vec![(&4, &'e'), (&5, &'f'), (&6, &'g')]);
    /// ```
    #[inline]
    #[must_use]
    pub fn range(&self, from: &K, to: &K) -> Range<'_, K, V, C> {
        Range {
            inner: self.tree.range(from, to),
        }
    }

    /// Checks the red-black invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    #[inline]
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        self.tree.validate()
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// An iterator over the entries of a [`TreeMap`], in key order.
pub struct Iter<'a, K, V, C> {
    inner: tree::Iter<'a, Entry<K, V>, First, C, Storage<K, V>>,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pair::as_tuple)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Pair::as_tuple)
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

/// An iterator over the keys of a [`TreeMap`], in order.
pub struct Keys<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Keys<'_, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V, C> ExactSizeIterator for Keys<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

/// An iterator over the values of a [`TreeMap`], in key order.
pub struct Values<'a, K, V, C> {
    inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, C> DoubleEndedIterator for Values<'_, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V, C> ExactSizeIterator for Values<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

/// An iterator over a key span of a [`TreeMap`].
pub struct Range<'a, K, V, C> {
    inner: tree::Range<'a, Entry<K, V>, First, C, Storage<K, V>>,
}

impl<'a, K, V, C> Iterator for Range<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pair::as_tuple)
    }
}

impl<K, V, C> DoubleEndedIterator for Range<'_, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Pair::as_tuple)
    }
}

impl<K, V, C> FusedIterator for Range<'_, K, V, C> {}

/// An owning iterator over the entries of a [`TreeMap`], in key order.
pub struct IntoIter<K, V> {
    inner: tree::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Pair::into_parts)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Pair::into_parts)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Default> Default for TreeMap<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for TreeMap<K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    /// Inserts every entry; for a repeated key the first value wins.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter.into_iter().map(Pair::from));
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for TreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Index<&K> for TreeMap<K, V, C> {
    type Output = V;

    /// Returns the value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in TreeMap"),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for TreeMap<K, V, C> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for TreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for TreeMap<K, V, C> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C> Ord for TreeMap<K, V, C> {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K: Hash, V: Hash, C> Hash for TreeMap<K, V, C> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for TreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for TreeMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct TreeMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> TreeMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<K, V, C> TreeMapVisitor<K, V, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for TreeMapVisitor<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Compare<K> + Default,
{
    type Value = TreeMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = TreeMap::default();
        let mut hint = map.end();
        while let Some((key, value)) = access.next_entry()? {
            // Sorted input links every entry at the maximum in O(1).
            hint = map.insert_hint(hint, key, value);
            hint = map.next_position(hint);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for TreeMap<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Compare<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
