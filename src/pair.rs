//! Key/value pairs stored by [`TreeMap`](crate::map::TreeMap).
//!
//! A [`Pair`] keeps its key private: once a pair is inside a tree, only its
//! value can be changed, so the ordering of the tree can never be broken
//! through a stored element.

use std::fmt;

/// A key with an associated value; the key is immutable.
///
/// Pairs compare lexicographically: by key first, then by value.
///
/// # Examples
///
/// ```rust
/// use ordtree::pair::Pair;
///
/// let mut pair = Pair::new("answer", 41);
/// *pair.value_mut() += 1;
/// assert_eq!(pair.key(), &"answer");
/// assert_eq!(pair.value(), &42);
/// assert_eq!(format!("{pair}"), "(answer, 42)");
/// assert_eq!(pair.into_parts(), ("answer", 42));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    /// Creates a pair.
    #[inline]
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the value mutably.
    #[inline]
    pub const fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Returns both components as references.
    #[inline]
    #[must_use]
    pub const fn as_tuple(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Splits the pair into its key and value.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> From<Pair<K, V>> for (K, V) {
    #[inline]
    fn from(pair: Pair<K, V>) -> Self {
        pair.into_parts()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Pair<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.key, self.value)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for Pair<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&(&self.key, &self.value), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Pair<K, V>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <(K, V) as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::from)
    }
}
