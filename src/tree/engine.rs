//! The red-black tree engine.
//!
//! [`RbTree`] is an ordered associative container with unique keys. It is
//! generic over the stored element `E`, the key extraction policy `X`, the
//! comparator `C` and the node storage `S`.
//!
//! # Header
//!
//! The tree keeps a header (sentinel) that is not an element: it records
//! the root, and caches the minimum and maximum nodes. The header is also
//! the target of [`Position::END`], so that incrementing the maximum
//! yields `END` and decrementing `END` yields the maximum.
//!
//! # Invariants
//!
//! After every public operation returns:
//!
//! 1. The root, if present, hangs from the header (`parent == None`).
//! 2. No red node has a red child, and every path from a node down to an
//!    absent child crosses the same number of black nodes.
//! 3. The root, if present, is black.
//! 4. In-order traversal yields strictly increasing keys.
//! 5. `len()` equals the number of nodes.
//!
//! [`RbTree::validate`] checks all of them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::cursor::{Cursor, IntoIter, Iter, Position, Range, ReverseCursor};
use super::node::{Color, Node, NodeId, Side};
use super::policy::{Compare, Greater, Identity, KeyOfValue, Less};
use super::storage::{NodeStorage, SlabStorage};

// =============================================================================
// Header Definition
// =============================================================================

/// The sentinel: root link plus cached extremes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) struct Header {
    pub(super) root: Option<NodeId>,
    pub(super) leftmost: Option<NodeId>,
    pub(super) rightmost: Option<NodeId>,
}

impl Header {
    const EMPTY: Self = Self {
        root: None,
        leftmost: None,
        rightmost: None,
    };
}

/// Outcome of checking an insertion hint.
enum HintedSlot {
    /// The element belongs in the empty child slot `side` of the node.
    Vacant(NodeId, Side),
    /// The hint names an element with an equivalent key.
    Occupied,
    /// The hint is not adjacent to where the element belongs.
    Mismatch,
}

// =============================================================================
// RbTree Definition
// =============================================================================

/// An ordered container of unique keys backed by a red-black tree.
///
/// # Time Complexity
///
/// | Operation                         | Complexity          |
/// |-----------------------------------|---------------------|
/// | `insert`                          | O(log N)            |
/// | `insert_hint` (consistent hint)   | O(1) amortized      |
/// | `erase` (by position)             | O(1) amortized      |
/// | `erase_key`                       | O(log N)            |
/// | `find` / `lower_bound` / `upper_bound` | O(log N)       |
/// | `begin` / `first` / `last`        | O(1)                |
/// | `next_position` / `prev_position` | O(1) amortized      |
/// | `clear`                           | O(N)                |
/// | `swap`                            | O(1)                |
/// | `clone`                           | O(N)                |
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::RbTree;
///
/// let mut tree = RbTree::new();
/// tree.insert(20);
/// tree.insert(5);
/// tree.insert(10);
///
/// let elements: Vec<&i32> = tree.iter().collect();
/// assert_eq!(elements, vec![&5, &10, &20]);
///
/// let position = tree.lower_bound(&7);
/// assert_eq!(tree.get(position), Some(&10));
/// assert!(tree.validate().is_ok());
/// ```
pub struct RbTree<E, X = Identity, C = Less, S = SlabStorage<Node<E>>> {
    pub(super) header: Header,
    pub(super) length: usize,
    pub(super) extract: X,
    pub(super) compare: C,
    pub(super) storage: S,
    marker: PhantomData<fn() -> E>,
}

static_assertions::assert_impl_all!(RbTree<i32>: Send, Sync, Clone, Default, fmt::Debug);
static_assertions::assert_impl_all!(RbTree<String, Identity, Greater>: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(RbTree<std::rc::Rc<i32>>: Send, Sync);

impl<E> RbTree<E> {
    /// Creates an empty tree ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let tree: RbTree<i32> = RbTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::from_parts(Identity, Less, SlabStorage::new())
    }
}

impl<E, C> RbTree<E, Identity, C> {
    /// Creates an empty tree ordered by `compare`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        Self::from_parts(Identity, compare, SlabStorage::new())
    }
}

impl<E, S> RbTree<E, Identity, Less, S> {
    /// Creates an empty tree ordered by [`Ord`] whose nodes live in
    /// `storage`.
    #[inline]
    #[must_use]
    pub const fn with_storage(storage: S) -> Self {
        Self::from_parts(Identity, Less, storage)
    }
}

impl<E, X, C, S> RbTree<E, X, C, S> {
    /// Creates an empty tree from its policies and a node storage.
    ///
    /// The storage is expected to be empty; nodes already in it are
    /// ignored by the tree.
    #[inline]
    #[must_use]
    pub const fn from_parts(extract: X, compare: C, storage: S) -> Self {
        Self {
            header: Header::EMPTY,
            length: 0,
            extract,
            compare,
            storage,
            marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no element.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the comparator.
    #[inline]
    #[must_use]
    pub const fn key_comp(&self) -> &C {
        &self.compare
    }

    /// Returns the key extraction policy.
    #[inline]
    #[must_use]
    pub const fn key_extractor(&self) -> &X {
        &self.extract
    }

    /// Returns the node storage.
    #[inline]
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the position of the smallest element, or `END` when empty.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Position {
        Position::from_link(self.header.leftmost)
    }

    /// Returns the past-the-end position (the header).
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Exchanges the contents of two trees in O(1).
    ///
    /// Root, cached extremes, length, policies and storage move together,
    /// so positions obtained from `self` keep naming the same elements,
    /// which now live in `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

// =============================================================================
// Navigation and Structural Operations
// =============================================================================

impl<E, X, C, S> RbTree<E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    #[inline]
    pub(super) fn node(&self, id: NodeId) -> &Node<E> {
        self.storage.get(id)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<E> {
        self.storage.get_mut(id)
    }

    #[inline]
    fn is_red(&self, link: Option<NodeId>) -> bool {
        link.is_some_and(|id| self.node(id).color.is_red())
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    pub(super) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    pub(super) fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right;
        }
        id
    }

    /// Returns the largest number of elements the storage could hold.
    #[inline]
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.storage.max_size()
    }

    /// Returns the element at `position`, or `None` for `END`.
    ///
    /// # Panics
    ///
    /// May panic if the element at `position` has been erased.
    #[inline]
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&E> {
        position.node().map(|id| &self.node(id).element)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, position: Position) -> Option<&mut E> {
        position.node().map(|id| &mut self.node_mut(id).element)
    }

    /// Returns the smallest element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&E> {
        self.get(self.begin())
    }

    /// Returns the largest element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&E> {
        self.get(Position::from_link(self.header.rightmost))
    }

    /// Returns the in-order successor of `position`.
    ///
    /// The successor of the maximum is `END`. Incrementing `END` is a
    /// precondition violation; it is debug-asserted.
    #[must_use]
    pub fn next_position(&self, position: Position) -> Position {
        debug_assert!(!position.is_end(), "incrementing the end position");
        let Some(id) = position.node() else {
            return Position::END;
        };
        if let Some(right) = self.node(id).right {
            return Position::at(self.minimum(right));
        }
        let mut current = id;
        let mut parent = self.node(id).parent;
        while let Some(ancestor) = parent
            && self.node(ancestor).right == Some(current)
        {
            current = ancestor;
            parent = self.node(ancestor).parent;
        }
        Position::from_link(parent)
    }

    /// Returns the in-order predecessor of `position`.
    ///
    /// The predecessor of `END` is the maximum. Decrementing `begin()` is a
    /// precondition violation; it is debug-asserted.
    #[must_use]
    pub fn prev_position(&self, position: Position) -> Position {
        let Some(id) = position.node() else {
            return Position::from_link(self.header.rightmost);
        };
        debug_assert!(
            self.header.leftmost != Some(id),
            "decrementing the begin position"
        );
        if let Some(left) = self.node(id).left {
            return Position::at(self.maximum(left));
        }
        let mut current = id;
        let mut parent = self.node(id).parent;
        while let Some(ancestor) = parent
            && self.node(ancestor).left == Some(current)
        {
            current = ancestor;
            parent = self.node(ancestor).parent;
        }
        Position::from_link(parent)
    }

    /// Returns a read-only cursor at `position`.
    #[inline]
    #[must_use]
    pub const fn cursor(&self, position: Position) -> Cursor<'_, E, X, C, S> {
        Cursor::new(self, position)
    }

    /// Returns a reverse cursor at the largest element.
    #[inline]
    #[must_use]
    pub const fn rbegin(&self) -> ReverseCursor<'_, E, X, C, S> {
        ReverseCursor::new(self, self.end())
    }

    /// Returns the reverse past-the-end cursor.
    #[inline]
    #[must_use]
    pub const fn rend(&self) -> ReverseCursor<'_, E, X, C, S> {
        ReverseCursor::new(self, self.begin())
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// The iterator is double-ended; `iter().rev()` walks in descending
    /// order.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, E, X, C, S> {
        Iter::new(self, self.begin(), self.end(), self.length)
    }

    /// Returns an iterator over the half-open span `[first, last)`.
    ///
    /// `first` must not come after `last` in iteration order.
    #[inline]
    #[must_use]
    pub const fn span(&self, first: Position, last: Position) -> Range<'_, E, X, C, S> {
        Range::new(self, first, last)
    }

    /// Replaces `old` by `new` in the child slot of `parent` that holds it.
    /// A `parent` of `None` is the header.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.header.root = new,
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Returns the side of `parent` on which `child` hangs.
    fn side_of(&self, parent: NodeId, child: Option<NodeId>) -> Side {
        if self.node(parent).left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Rotates `pivot` down towards `side`; its child on the opposite side
    /// takes its place.
    fn rotate(&mut self, pivot: NodeId, side: Side) {
        let other = side.opposite();
        // The fixups only rotate around nodes that have the raised child.
        let Some(raised) = self.node(pivot).child(other) else {
            return;
        };
        let inner = self.node(raised).child(side);
        self.node_mut(pivot).set_child(other, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }
        let pivot_parent = self.node(pivot).parent;
        self.node_mut(raised).parent = pivot_parent;
        self.replace_child(pivot_parent, pivot, Some(raised));
        self.node_mut(raised).set_child(side, Some(pivot));
        self.node_mut(pivot).parent = Some(raised);
    }

    /// Allocates a red node and hangs it on `side` of `parent` (or at the
    /// root when `parent` is the header), then restores the invariants.
    fn link_node(&mut self, parent: Option<NodeId>, side: Side, element: E) -> NodeId {
        let id = self.storage.allocate(Node::new_red(element, parent));
        match parent {
            None => {
                self.header.root = Some(id);
                self.header.leftmost = Some(id);
                self.header.rightmost = Some(id);
            }
            Some(parent) => {
                self.node_mut(parent).set_child(side, Some(id));
                match side {
                    Side::Left if self.header.leftmost == Some(parent) => {
                        self.header.leftmost = Some(id);
                    }
                    Side::Right if self.header.rightmost == Some(parent) => {
                        self.header.rightmost = Some(id);
                    }
                    _ => {}
                }
            }
        }
        self.length += 1;
        self.insert_fixup(id);
        id
    }

    /// Links `element` as the immediate predecessor of `bound` (the maximum
    /// when `bound` is `END`). The caller guarantees the order.
    fn link_before(&mut self, bound: Position, element: E) -> NodeId {
        match bound.node() {
            None => match self.header.rightmost {
                Some(maximum) => self.link_node(Some(maximum), Side::Right, element),
                None => self.link_node(None, Side::Left, element),
            },
            Some(at) => match self.node(at).left {
                Some(left) => {
                    let before = self.maximum(left);
                    self.link_node(Some(before), Side::Right, element)
                }
                None => self.link_node(Some(at), Side::Left, element),
            },
        }
    }

    /// Repaints and rotates upwards from a freshly linked red node until
    /// no red node has a red parent.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.node(node).parent
            && self.node(parent).color.is_red()
            && let Some(grandparent) = self.node(parent).parent
        {
            let side = self.side_of(grandparent, Some(parent));
            let uncle = self.node(grandparent).child(side.opposite());
            if let Some(uncle) = uncle
                && self.node(uncle).color.is_red()
            {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
            } else {
                // Straighten the zig-zag so the red pair lies on `side`.
                let top = if self.node(parent).child(side.opposite()) == Some(node) {
                    self.rotate(parent, side);
                    node
                } else {
                    parent
                };
                self.set_color(top, Color::Black);
                self.set_color(grandparent, Color::Red);
                self.rotate(grandparent, side.opposite());
                break;
            }
        }
        if let Some(root) = self.header.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Removes the element at `position` and returns it.
    ///
    /// Returns `None` for `END`. Only positions naming the erased element
    /// are invalidated; every other position stays valid.
    ///
    /// When the node has two children, it trades places with its in-order
    /// successor (links and colors, never elements), so that the node
    /// physically unlinked is the one being erased.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let mut tree: RbTree<i32> = [5, 10, 20].into_iter().collect();
    /// let ten = tree.find(&10);
    /// let twenty = tree.find(&20);
    /// assert_eq!(tree.erase(tree.begin()), Some(5));
    /// // Other positions survive the erase.
    /// assert_eq!(tree.get(ten), Some(&10));
    /// assert_eq!(tree.get(twenty), Some(&20));
    /// assert_eq!(tree.begin(), ten);
    /// ```
    pub fn erase(&mut self, position: Position) -> Option<E> {
        let target = position.node()?;
        let target_left = self.node(target).left;
        let target_right = self.node(target).right;

        let (replacement, replacement_parent) = match (target_left, target_right) {
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                let replacement = self.node(successor).right;
                self.node_mut(left).parent = Some(successor);
                self.node_mut(successor).left = Some(left);
                let replacement_parent = if successor == right {
                    Some(successor)
                } else {
                    let successor_parent = self.node(successor).parent;
                    if let Some(replacement) = replacement {
                        self.node_mut(replacement).parent = successor_parent;
                    }
                    if let Some(successor_parent) = successor_parent {
                        self.node_mut(successor_parent).left = replacement;
                    }
                    self.node_mut(successor).right = Some(right);
                    self.node_mut(right).parent = Some(successor);
                    successor_parent
                };
                let target_parent = self.node(target).parent;
                self.replace_child(target_parent, target, Some(successor));
                self.node_mut(successor).parent = target_parent;
                let target_color = self.node(target).color;
                let successor_color = self.node(successor).color;
                self.set_color(successor, target_color);
                self.set_color(target, successor_color);
                (replacement, replacement_parent)
            }
            _ => {
                let replacement = target_left.or(target_right);
                let target_parent = self.node(target).parent;
                if let Some(replacement) = replacement {
                    self.node_mut(replacement).parent = target_parent;
                }
                self.replace_child(target_parent, target, replacement);
                if self.header.leftmost == Some(target) {
                    self.header.leftmost = match replacement {
                        Some(replacement) => Some(self.minimum(replacement)),
                        None => target_parent,
                    };
                }
                if self.header.rightmost == Some(target) {
                    self.header.rightmost = match replacement {
                        Some(replacement) => Some(self.maximum(replacement)),
                        None => target_parent,
                    };
                }
                (replacement, target_parent)
            }
        };

        // `target` now carries the color of the node physically unlinked.
        if !self.node(target).color.is_red() {
            self.erase_fixup(replacement, replacement_parent);
        }

        self.length -= 1;
        Some(self.storage.release(target).element)
    }

    /// Restores the black height after a black node was unlinked above
    /// `node` (which may be absent).
    fn erase_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.header.root && !self.is_red(node) {
            let Some(current_parent) = parent else {
                break;
            };
            let side = self.side_of(current_parent, node);
            let other = side.opposite();
            let Some(mut sibling) = self.node(current_parent).child(other) else {
                break;
            };
            if self.node(sibling).color.is_red() {
                self.set_color(sibling, Color::Black);
                self.set_color(current_parent, Color::Red);
                self.rotate(current_parent, side);
                let Some(next_sibling) = self.node(current_parent).child(other) else {
                    break;
                };
                sibling = next_sibling;
            }
            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(other);
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                node = Some(current_parent);
                parent = self.node(current_parent).parent;
            } else {
                if !self.is_red(far) {
                    if let Some(near) = near {
                        self.set_color(near, Color::Black);
                    }
                    self.set_color(sibling, Color::Red);
                    self.rotate(sibling, other);
                    let Some(next_sibling) = self.node(current_parent).child(other) else {
                        break;
                    };
                    sibling = next_sibling;
                }
                let parent_color = self.node(current_parent).color;
                self.set_color(sibling, parent_color);
                self.set_color(current_parent, Color::Black);
                if let Some(far) = self.node(sibling).child(other) {
                    self.set_color(far, Color::Black);
                }
                self.rotate(current_parent, side);
                break;
            }
        }
        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    /// Removes every element in `[first, last)` and returns how many were
    /// removed.
    ///
    /// A span covering the whole tree is handed to [`clear`](Self::clear).
    pub fn erase_range(&mut self, first: Position, last: Position) -> usize {
        if first == self.begin() && last.is_end() {
            let removed = self.length;
            self.clear();
            return removed;
        }
        let mut removed = 0;
        let mut current = first;
        while current != last && !current.is_end() {
            let next = self.next_position(current);
            self.erase(current);
            removed += 1;
            current = next;
        }
        removed
    }

    /// Removes every element.
    ///
    /// Nodes are released bottom-up: each right subtree is released
    /// recursively while the left spine is walked iteratively, so no
    /// explicit stack is needed.
    pub fn clear(&mut self) {
        if let Some(root) = self.header.root {
            log::debug!("tearing down red-black tree of {} nodes", self.length);
            self.release_subtree(root);
        }
        self.header = Header::EMPTY;
        self.length = 0;
    }

    fn release_subtree(&mut self, subtree: NodeId) {
        let mut current = Some(subtree);
        while let Some(id) = current {
            if let Some(right) = self.node(id).right {
                self.release_subtree(right);
            }
            current = self.node(id).left;
            self.storage.release(id);
        }
    }

    /// Moves every element out in ascending order, leaving the tree empty.
    fn drain_ordered(&mut self) -> Vec<E> {
        let mut ids = Vec::with_capacity(self.length);
        let mut position = self.begin();
        while let Some(id) = position.node() {
            ids.push(id);
            position = self.next_position(position);
        }
        let elements = ids
            .into_iter()
            .map(|id| self.storage.release(id).element)
            .collect();
        self.header = Header::EMPTY;
        self.length = 0;
        elements
    }

    /// Clones the subtree of `source` rooted at `subtree` into `self`,
    /// keeping its shape and colors, and returns the new subtree root.
    fn copy_subtree(&mut self, source: &Self, subtree: NodeId, parent: Option<NodeId>) -> NodeId
    where
        E: Clone,
    {
        let top = self.clone_node(source, subtree, parent);
        if let Some(right) = source.node(subtree).right {
            let copied = self.copy_subtree(source, right, Some(top));
            self.node_mut(top).right = Some(copied);
        }
        let mut copied_parent = top;
        let mut current = source.node(subtree).left;
        while let Some(original) = current {
            let copied = self.clone_node(source, original, Some(copied_parent));
            self.node_mut(copied_parent).left = Some(copied);
            if let Some(right) = source.node(original).right {
                let copied_right = self.copy_subtree(source, right, Some(copied));
                self.node_mut(copied).right = Some(copied_right);
            }
            copied_parent = copied;
            current = source.node(original).left;
        }
        top
    }

    fn clone_node(&mut self, source: &Self, original: NodeId, parent: Option<NodeId>) -> NodeId
    where
        E: Clone,
    {
        let node = source.node(original);
        let mut copy = Node::new_red(node.element.clone(), parent);
        copy.color = node.color;
        self.storage.allocate(copy)
    }

    /// Makes the (empty) `self` a structural copy of `source`.
    fn copy_from(&mut self, source: &Self)
    where
        E: Clone,
    {
        if let Some(root) = source.header.root {
            let root = self.copy_subtree(source, root, None);
            self.header = Header {
                root: Some(root),
                leftmost: Some(self.minimum(root)),
                rightmost: Some(self.maximum(root)),
            };
            self.length = source.length;
        }
    }
}

// =============================================================================
// Ordered Operations
// =============================================================================

impl<E, X, C, S> RbTree<E, X, C, S>
where
    X: KeyOfValue<E>,
    C: Compare<X::Key>,
    S: NodeStorage<Node<E>>,
{
    #[inline]
    fn key_of<'a>(&self, element: &'a E) -> &'a X::Key {
        self.extract.key(element)
    }

    #[inline]
    fn key_at(&self, id: NodeId) -> &X::Key {
        self.extract.key(&self.node(id).element)
    }

    #[inline]
    pub(super) fn less_elements(&self, left: &E, right: &E) -> bool {
        self.compare.less(self.key_of(left), self.key_of(right))
    }

    /// Inserts `element` unless an equivalent key is already present.
    ///
    /// Returns the position of the element with that key and whether the
    /// insertion happened. On a duplicate the tree is left untouched and
    /// `element` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let (position, inserted) = tree.insert(3);
    /// assert!(inserted);
    /// assert_eq!(tree.insert(3), (position, false));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, element: E) -> (Position, bool) {
        let mut parent = None;
        let mut go_left = true;
        let mut current = self.header.root;
        while let Some(id) = current {
            parent = Some(id);
            go_left = self
                .compare
                .less(self.key_of(&element), self.key_at(id));
            current = if go_left {
                self.node(id).left
            } else {
                self.node(id).right
            };
        }

        let side = if go_left { Side::Left } else { Side::Right };
        let mut candidate = Position::from_link(parent);
        if go_left {
            if candidate == self.begin() {
                return (Position::at(self.link_node(parent, side, element)), true);
            }
            candidate = self.prev_position(candidate);
        }
        match candidate.node() {
            Some(id) if self.compare.less(self.key_at(id), self.key_of(&element)) => {
                (Position::at(self.link_node(parent, side, element)), true)
            }
            _ => (candidate, false),
        }
    }

    /// Inserts `element` using `hint` as a guess of where it belongs.
    ///
    /// When `element` sorts immediately before the element at `hint` (or
    /// after the maximum for an `END` hint), it is linked next to the hint
    /// without a descent from the root. Otherwise the hint is ignored and
    /// a regular [`insert`](Self::insert) runs. Returns the position of the
    /// element with that key, inserted or pre-existing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let mut hint = tree.end();
    /// for value in 0..100 {
    ///     // Each value sorts right after the previous one.
    ///     hint = tree.insert_hint(hint, value);
    /// }
    /// assert_eq!(tree.get(hint), Some(&99));
    /// assert_eq!(tree.len(), 100);
    /// ```
    pub fn insert_hint(&mut self, hint: Position, element: E) -> Position {
        match self.hinted_slot(hint, &element) {
            HintedSlot::Vacant(parent, side) => {
                Position::at(self.link_node(Some(parent), side, element))
            }
            HintedSlot::Occupied => hint,
            HintedSlot::Mismatch => {
                log::trace!("insertion hint does not match the ordering; descending from the root");
                self.insert(element).0
            }
        }
    }

    /// Decides where `element` goes relative to `hint` without descending
    /// from the root.
    fn hinted_slot(&self, hint: Position, element: &E) -> HintedSlot {
        let key = self.key_of(element);
        let Some(at) = hint.node() else {
            return match self.header.rightmost {
                Some(maximum) if self.compare.less(self.key_at(maximum), key) => {
                    HintedSlot::Vacant(maximum, Side::Right)
                }
                _ => HintedSlot::Mismatch,
            };
        };

        if self.compare.less(key, self.key_at(at)) {
            if self.header.leftmost == Some(at) {
                return HintedSlot::Vacant(at, Side::Left);
            }
            match self.prev_position(hint).node() {
                Some(before) if self.compare.less(self.key_at(before), key) => {
                    if self.node(before).right.is_none() {
                        HintedSlot::Vacant(before, Side::Right)
                    } else {
                        HintedSlot::Vacant(at, Side::Left)
                    }
                }
                _ => HintedSlot::Mismatch,
            }
        } else if self.compare.less(self.key_at(at), key) {
            if self.header.rightmost == Some(at) {
                return HintedSlot::Vacant(at, Side::Right);
            }
            match self.next_position(hint).node() {
                Some(after) if self.compare.less(key, self.key_at(after)) => {
                    if self.node(at).right.is_none() {
                        HintedSlot::Vacant(at, Side::Right)
                    } else {
                        HintedSlot::Vacant(after, Side::Left)
                    }
                }
                _ => HintedSlot::Mismatch,
            }
        } else {
            HintedSlot::Occupied
        }
    }

    /// Returns the element equivalent to `key`, inserting `make(key)` first
    /// when there is none.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: X::Key, make: F) -> &mut E
    where
        X::Key: Sized,
        F: FnOnce(X::Key) -> E,
    {
        let bound = self.lower_bound(&key);
        let id = match bound.node() {
            Some(id) if !self.compare.less(&key, self.key_at(id)) => id,
            _ => self.link_before(bound, make(key)),
        };
        &mut self.node_mut(id).element
    }

    /// Returns the position of the first element whose key is not less
    /// than `key`, or `END`.
    #[must_use]
    pub fn lower_bound(&self, key: &X::Key) -> Position {
        let mut bound = None;
        let mut current = self.header.root;
        while let Some(id) = current {
            if self.compare.less(self.key_at(id), key) {
                current = self.node(id).right;
            } else {
                bound = Some(id);
                current = self.node(id).left;
            }
        }
        Position::from_link(bound)
    }

    /// Returns the position of the first element whose key is greater than
    /// `key`, or `END`.
    #[must_use]
    pub fn upper_bound(&self, key: &X::Key) -> Position {
        let mut bound = None;
        let mut current = self.header.root;
        while let Some(id) = current {
            if self.compare.less(key, self.key_at(id)) {
                bound = Some(id);
                current = self.node(id).left;
            } else {
                current = self.node(id).right;
            }
        }
        Position::from_link(bound)
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    ///
    /// The span holds the element equivalent to `key`, or is empty.
    #[must_use]
    pub fn equal_range(&self, key: &X::Key) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the position of the element equivalent to `key`, or `END`.
    #[must_use]
    pub fn find(&self, key: &X::Key) -> Position {
        let candidate = self.lower_bound(key);
        match candidate.node() {
            Some(id) if !self.compare.less(key, self.key_at(id)) => candidate,
            _ => Position::END,
        }
    }

    /// Returns `true` if an element equivalent to `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &X::Key) -> bool {
        !self.find(key).is_end()
    }

    /// Returns the number of elements equivalent to `key` (0 or 1).
    #[inline]
    #[must_use]
    pub fn count(&self, key: &X::Key) -> usize {
        usize::from(self.contains(key))
    }

    /// Removes the element equivalent to `key`. Returns 0 or 1.
    pub fn erase_key(&mut self, key: &X::Key) -> usize {
        let position = self.find(key);
        usize::from(self.erase(position).is_some())
    }

    /// Returns an iterator over the elements with keys in `[from, to)`.
    ///
    /// An inverted span (`to` before `from`) is empty.
    #[must_use]
    pub fn range(&self, from: &X::Key, to: &X::Key) -> Range<'_, E, X, C, S> {
        if self.compare.less(to, from) {
            return Range::new(self, Position::END, Position::END);
        }
        Range::new(self, self.lower_bound(from), self.lower_bound(to))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<E, X, C, S> Default for RbTree<E, X, C, S>
where
    X: Default,
    C: Default,
    S: Default,
{
    #[inline]
    fn default() -> Self {
        Self::from_parts(X::default(), C::default(), S::default())
    }
}

impl<E, X, C, S> Clone for RbTree<E, X, C, S>
where
    E: Clone,
    X: Clone,
    C: Clone,
    S: NodeStorage<Node<E>> + Default,
{
    /// Clones the node graph, preserving the exact shape and colors.
    fn clone(&self) -> Self {
        let mut tree = Self::from_parts(self.extract.clone(), self.compare.clone(), S::default());
        tree.copy_from(self);
        tree
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extract = source.extract.clone();
        self.compare = source.compare.clone();
        self.copy_from(source);
    }
}

impl<E, X, C, S> Extend<E> for RbTree<E, X, C, S>
where
    X: KeyOfValue<E>,
    C: Compare<X::Key>,
    S: NodeStorage<Node<E>>,
{
    /// Inserts every element; the first of several equivalent elements wins.
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<E, X, C, S> FromIterator<E> for RbTree<E, X, C, S>
where
    X: KeyOfValue<E> + Default,
    C: Compare<X::Key> + Default,
    S: NodeStorage<Node<E>> + Default,
{
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<E, X, C, S> IntoIterator for RbTree<E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter::new(self.drain_ordered())
    }
}

impl<'a, E, X, C, S> IntoIterator for &'a RbTree<E, X, C, S>
where
    S: NodeStorage<Node<E>>,
{
    type Item = &'a E;
    type IntoIter = Iter<'a, E, X, C, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E, X, C, S> PartialEq for RbTree<E, X, C, S>
where
    E: PartialEq,
    S: NodeStorage<Node<E>>,
{
    /// Trees are equal when they have the same length and pairwise equal
    /// elements in iteration order. Shapes may differ.
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<E, X, C, S> Eq for RbTree<E, X, C, S>
where
    E: Eq,
    S: NodeStorage<Node<E>>,
{
}

impl<E, X, C, S> PartialOrd for RbTree<E, X, C, S>
where
    E: PartialOrd,
    S: NodeStorage<Node<E>>,
{
    /// Lexicographic comparison of the iteration sequences.
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<E, X, C, S> Ord for RbTree<E, X, C, S>
where
    E: Ord,
    S: NodeStorage<Node<E>>,
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<E, X, C, S> Hash for RbTree<E, X, C, S>
where
    E: Hash,
    S: NodeStorage<Node<E>>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<E, X, C, S> fmt::Debug for RbTree<E, X, C, S>
where
    E: fmt::Debug,
    S: NodeStorage<Node<E>>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
