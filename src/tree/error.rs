//! Error type reported by [`RbTree::validate`](super::RbTree::validate).

use std::fmt;

use super::NodeId;

/// A broken red-black tree invariant.
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::InvariantViolation;
///
/// let error = InvariantViolation::BlackHeightMismatch { expected: 3, found: 2 };
/// assert_eq!(
///     format!("{error}"),
///     "black height mismatch: expected 3 black nodes, found 2"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root is red.
    RedRoot,
    /// The root has a parent other than the header.
    DetachedRoot,
    /// A child does not point back at its parent.
    BrokenParentLink {
        /// The child whose parent link is wrong.
        node: NodeId,
    },
    /// A red node has a red child.
    RedRedEdge {
        /// The red child.
        node: NodeId,
    },
    /// Two paths to an absent child cross different numbers of black nodes.
    BlackHeightMismatch {
        /// Black height of the first path walked.
        expected: usize,
        /// Black height of the offending path.
        found: usize,
    },
    /// In-order traversal is not strictly increasing.
    OutOfOrder {
        /// Index (in iteration order) of the first misplaced element.
        index: usize,
    },
    /// The recorded length differs from the number of reachable nodes.
    LengthMismatch {
        /// The length the tree records.
        recorded: usize,
        /// The number of nodes reached (at least).
        counted: usize,
    },
    /// The cached minimum or maximum is not the actual one.
    StaleBounds,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root node is red"),
            Self::DetachedRoot => write!(formatter, "root node does not hang from the header"),
            Self::BrokenParentLink { node } => {
                write!(formatter, "node {} has a wrong parent link", node.index())
            }
            Self::RedRedEdge { node } => {
                write!(formatter, "red node {} has a red parent", node.index())
            }
            Self::BlackHeightMismatch { expected, found } => write!(
                formatter,
                "black height mismatch: expected {expected} black nodes, found {found}"
            ),
            Self::OutOfOrder { index } => {
                write!(formatter, "element {index} is not greater than its predecessor")
            }
            Self::LengthMismatch { recorded, counted } => write!(
                formatter,
                "recorded length {recorded} but reached {counted} nodes"
            ),
            Self::StaleBounds => write!(formatter, "cached minimum or maximum is stale"),
        }
    }
}

impl std::error::Error for InvariantViolation {}
