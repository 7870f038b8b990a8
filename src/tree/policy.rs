//! Ordering policies for the red-black tree engine.
//!
//! A tree orders its elements through two policies:
//!
//! - a [`KeyOfValue`] that maps a stored element to its ordering key, and
//! - a [`Compare`] that is a strict weak order over those keys.
//!
//! Two keys `a` and `b` are *equivalent* when neither `less(a, b)` nor
//! `less(b, a)` holds. The engine stores at most one element per
//! equivalence class.

use std::cmp::Ordering;

use crate::pair::Pair;

// =============================================================================
// Key Extraction
// =============================================================================

/// Maps a stored element to the key it is ordered by.
pub trait KeyOfValue<E> {
    /// The key type.
    type Key: ?Sized;

    /// Returns the key of `element`.
    fn key<'a>(&self, element: &'a E) -> &'a Self::Key;
}

/// Orders elements by themselves (set semantics).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Identity;

impl<E> KeyOfValue<E> for Identity {
    type Key = E;

    #[inline]
    fn key<'a>(&self, element: &'a E) -> &'a E {
        element
    }
}

/// Orders [`Pair`]s by their first component (map semantics).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct First;

impl<K, V> KeyOfValue<Pair<K, V>> for First {
    type Key = K;

    #[inline]
    fn key<'a>(&self, element: &'a Pair<K, V>) -> &'a K {
        element.key()
    }
}

// =============================================================================
// Comparators
// =============================================================================

/// A strict weak order over keys.
///
/// Implementations must be irreflexive and transitive, and equivalence
/// (neither side less) must be transitive too. A comparator that breaks
/// these rules does not cause memory unsafety, but lookups and iteration
/// order become unspecified.
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `left` is ordered strictly before `right`.
    fn less(&self, left: &K, right: &K) -> bool;
}

/// Ascending order through [`Ord`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Less;

impl<K: Ord + ?Sized> Compare<K> for Less {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left.cmp(right) == Ordering::Less
    }
}

/// Descending order through [`Ord`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Greater;

impl<K: Ord + ?Sized> Compare<K> for Greater {
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        left.cmp(right) == Ordering::Greater
    }
}

/// A comparator built from a `less-than` closure.
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::{ByFn, RbTree};
///
/// let by_length = ByFn::new(|left: &&str, right: &&str| left.len() < right.len());
/// let mut tree = RbTree::with_comparator(by_length);
/// tree.insert("ccc");
/// tree.insert("a");
/// // "b" is equivalent to "a" under this order, so it is rejected.
/// assert!(!tree.insert("b").1);
///
/// let words: Vec<&&str> = tree.iter().collect();
/// assert_eq!(words, vec![&"a", &"ccc"]);
/// ```
#[derive(Clone, Copy, Default, Debug)]
pub struct ByFn<F> {
    less: F,
}

impl<F> ByFn<F> {
    /// Wraps a `less-than` closure.
    #[inline]
    pub const fn new(less: F) -> Self {
        Self { less }
    }
}

impl<K: ?Sized, F> Compare<K> for ByFn<F>
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, left: &K, right: &K) -> bool {
        (self.less)(left, right)
    }
}
