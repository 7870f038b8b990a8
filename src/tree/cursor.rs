//! Positions, cursors and iterators over an [`RbTree`].
//!
//! A [`Position`] is a plain `Copy` handle naming one element of a tree, or
//! the past-the-end header. It stays valid until the element it names is
//! erased (or the tree is cleared), whatever else happens to the tree.
//!
//! The borrowing types ([`Cursor`], [`ReverseCursor`], [`Iter`] and
//! [`Range`]) hold a shared reference to the tree, so the tree cannot be
//! modified while they are alive. Mutation goes through positions.

use std::fmt;
use std::iter::FusedIterator;

use super::engine::RbTree;
use super::node::{Node, NodeId};
use super::storage::NodeStorage;

// =============================================================================
// Position
// =============================================================================

/// A handle naming an element of a tree, or the past-the-end position.
///
/// Positions are only meaningful for the tree that produced them (or the
/// tree it was swapped into).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position(Option<NodeId>);

static_assertions::assert_impl_all!(Position: Copy, Send, Sync, std::hash::Hash);

impl Position {
    /// The past-the-end position (the header).
    pub const END: Self = Self(None);

    #[inline]
    pub(crate) const fn at(id: NodeId) -> Self {
        Self(Some(id))
    }

    #[inline]
    pub(crate) const fn from_link(link: Option<NodeId>) -> Self {
        Self(link)
    }

    /// Returns `true` for the past-the-end position.
    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }

    /// Returns the node handle, or `None` for the past-the-end position.
    #[inline]
    #[must_use]
    pub const fn node(self) -> Option<NodeId> {
        self.0
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A read-only bidirectional cursor.
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::RbTree;
///
/// let tree: RbTree<i32> = [10, 20, 5].into_iter().collect();
/// let mut cursor = tree.cursor(tree.begin());
/// assert_eq!(cursor.get(), Some(&5));
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&20));
/// cursor.move_next();
/// assert_eq!(cursor.position(), tree.end());
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&20));
/// ```
pub struct Cursor<'a, E, X, C, S> {
    tree: &'a RbTree<E, X, C, S>,
    position: Position,
}

impl<'a, E, X, C, S> Cursor<'a, E, X, C, S> {
    #[inline]
    pub(crate) const fn new(tree: &'a RbTree<E, X, C, S>, position: Position) -> Self {
        Self { tree, position }
    }

    /// Returns the position the cursor is at.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}

impl<'a, E, X, C, S> Cursor<'a, E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    /// Returns the element under the cursor, or `None` at the end.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&'a E> {
        self.tree.get(self.position)
    }

    /// Advances to the in-order successor.
    #[inline]
    pub fn move_next(&mut self) {
        self.position = self.tree.next_position(self.position);
    }

    /// Steps back to the in-order predecessor. From the end, this is the
    /// largest element.
    #[inline]
    pub fn move_prev(&mut self) {
        self.position = self.tree.prev_position(self.position);
    }
}

impl<E, X, C, S> Clone for Cursor<'_, E, X, C, S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, X, C, S> Copy for Cursor<'_, E, X, C, S> {}

impl<E, X, C, S> PartialEq for Cursor<'_, E, X, C, S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<E, X, C, S> Eq for Cursor<'_, E, X, C, S> {}

impl<E, X, C, S> fmt::Debug for Cursor<'_, E, X, C, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("position", &self.position)
            .finish()
    }
}

// =============================================================================
// ReverseCursor
// =============================================================================

/// A cursor walking the tree in descending order.
///
/// It wraps a base position and denotes the element just before it, so
/// [`rbegin`](RbTree::rbegin) (base `END`) denotes the largest element and
/// [`rend`](RbTree::rend) (base `begin()`) denotes nothing.
pub struct ReverseCursor<'a, E, X, C, S> {
    tree: &'a RbTree<E, X, C, S>,
    base: Position,
}

impl<'a, E, X, C, S> ReverseCursor<'a, E, X, C, S> {
    #[inline]
    pub(crate) const fn new(tree: &'a RbTree<E, X, C, S>, base: Position) -> Self {
        Self { tree, base }
    }

    /// Returns the forward position one past the denoted element.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> Position {
        self.base
    }
}

impl<'a, E, X, C, S> ReverseCursor<'a, E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    /// Returns the denoted element, or `None` at the reverse end.
    #[must_use]
    pub fn get(&self) -> Option<&'a E> {
        if self.base == self.tree.begin() {
            return None;
        }
        self.tree.get(self.tree.prev_position(self.base))
    }

    /// Moves to the next smaller element.
    #[inline]
    pub fn move_next(&mut self) {
        self.base = self.tree.prev_position(self.base);
    }

    /// Moves back to the next larger element.
    #[inline]
    pub fn move_prev(&mut self) {
        self.base = self.tree.next_position(self.base);
    }
}

impl<E, X, C, S> Clone for ReverseCursor<'_, E, X, C, S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, X, C, S> Copy for ReverseCursor<'_, E, X, C, S> {}

impl<E, X, C, S> PartialEq for ReverseCursor<'_, E, X, C, S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<E, X, C, S> Eq for ReverseCursor<'_, E, X, C, S> {}

impl<E, X, C, S> fmt::Debug for ReverseCursor<'_, E, X, C, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ReverseCursor")
            .field("base", &self.base)
            .finish()
    }
}

// =============================================================================
// Iter
// =============================================================================

/// An iterator over all elements of a tree, in order.
pub struct Iter<'a, E, X, C, S> {
    tree: &'a RbTree<E, X, C, S>,
    front: Position,
    back: Position,
    remaining: usize,
}

impl<'a, E, X, C, S> Iter<'a, E, X, C, S> {
    #[inline]
    pub(crate) const fn new(
        tree: &'a RbTree<E, X, C, S>,
        front: Position,
        back: Position,
        remaining: usize,
    ) -> Self {
        Self {
            tree,
            front,
            back,
            remaining,
        }
    }
}

impl<'a, E, X, C, S> Iterator for Iter<'a, E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let element = self.tree.get(self.front)?;
        self.front = self.tree.next_position(self.front);
        self.remaining -= 1;
        Some(element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E, X, C, S> DoubleEndedIterator for Iter<'_, E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.back = self.tree.prev_position(self.back);
        self.remaining -= 1;
        self.tree.get(self.back)
    }
}

impl<E, X, C, S> ExactSizeIterator for Iter<'_, E, X, C, S> where S: NodeStorage<Node<E>> {}

impl<E, X, C, S> FusedIterator for Iter<'_, E, X, C, S> where S: NodeStorage<Node<E>> {}

impl<E, X, C, S> Clone for Iter<'_, E, X, C, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Range
// =============================================================================

/// An iterator over a half-open span `[front, back)` of a tree.
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::RbTree;
///
/// let tree: RbTree<i32> = (0..10).collect();
/// let middle: Vec<i32> = tree.range(&3, &7).copied().collect();
/// assert_eq!(middle, vec![3, 4, 5, 6]);
///
/// let backwards: Vec<i32> = tree.range(&3, &7).rev().copied().collect();
/// assert_eq!(backwards, vec![6, 5, 4, 3]);
/// ```
pub struct Range<'a, E, X, C, S> {
    tree: &'a RbTree<E, X, C, S>,
    front: Position,
    back: Position,
}

impl<'a, E, X, C, S> Range<'a, E, X, C, S> {
    #[inline]
    pub(crate) const fn new(tree: &'a RbTree<E, X, C, S>, front: Position, back: Position) -> Self {
        Self { tree, front, back }
    }
}

impl<'a, E, X, C, S> Iterator for Range<'a, E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let element = self.tree.get(self.front)?;
        self.front = self.tree.next_position(self.front);
        Some(element)
    }
}

impl<E, X, C, S> DoubleEndedIterator for Range<'_, E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.tree.prev_position(self.back);
        self.tree.get(self.back)
    }
}

impl<E, X, C, S> FusedIterator for Range<'_, E, X, C, S> where S: NodeStorage<Node<E>> {}

impl<E, X, C, S> Clone for Range<'_, E, X, C, S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
        }
    }
}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over the elements of a tree, in order.
#[derive(Debug)]
pub struct IntoIter<E> {
    inner: std::vec::IntoIter<E>,
}

impl<E> IntoIter<E> {
    #[inline]
    pub(crate) fn new(elements: Vec<E>) -> Self {
        Self {
            inner: elements.into_iter(),
        }
    }
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<E> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> DoubleEndedIterator for IntoIter<E> {
    #[inline]
    fn next_back(&mut self) -> Option<E> {
        self.inner.next_back()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {}

impl<E> FusedIterator for IntoIter<E> {}
