//! Node representation for the red-black tree engine.
//!
//! Nodes live in a [`NodeStorage`](super::NodeStorage) and refer to each
//! other through [`NodeId`] handles. A node never moves once allocated:
//! rebalancing only rewrites the `parent`, `left`, `right` and `color`
//! fields.
//!
//! The header (sentinel) is not a node. A `parent` of `None` means the
//! node is the root and its parent is the header.

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// A red node. Red nodes never have red children.
    Red,
    /// A black node. Every root-to-leaf path crosses the same number of these.
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Color::Red`].
    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }
}

// =============================================================================
// Handle Definition
// =============================================================================

/// A stable handle to a node inside a [`NodeStorage`](super::NodeStorage).
///
/// Handles are only meaningful for the storage that produced them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a handle from a raw storage index.
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw storage index of this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// Side Definition
// =============================================================================

/// Which child slot of a node is meant.
///
/// The insertion and deletion fixups are symmetric; they are written once
/// in terms of a `Side` and its opposite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A tree node holding one stored element.
///
/// The fields are private to the engine; storages only move nodes in and
/// out as opaque values.
#[derive(Debug)]
pub struct Node<E> {
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) element: E,
}

impl<E> Node<E> {
    /// Creates a detached red node.
    pub(crate) const fn new_red(element: E, parent: Option<NodeId>) -> Self {
        Self {
            color: Color::Red,
            parent,
            left: None,
            right: None,
            element,
        }
    }

    /// Returns the stored element.
    #[inline]
    #[must_use]
    pub const fn element(&self) -> &E {
        &self.element
    }

    /// Returns the color of this node.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_side_opposite_is_involution() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite().opposite(), Side::Right);
    }

    #[rstest]
    fn test_new_node_is_red_and_detached() {
        let node = Node::new_red(7, Some(NodeId::new(3)));
        assert!(node.color().is_red());
        assert_eq!(node.parent, Some(NodeId::new(3)));
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.child(Side::Right), None);
        assert_eq!(*node.element(), 7);
    }

    #[rstest]
    #[case(Side::Left)]
    #[case(Side::Right)]
    fn test_set_child_touches_one_side(#[case] side: Side) {
        let mut node = Node::new_red((), None);
        node.set_child(side, Some(NodeId::new(1)));
        assert_eq!(node.child(side), Some(NodeId::new(1)));
        assert_eq!(node.child(side.opposite()), None);
    }
}
