//! Independent checker for the red-black invariants.

use smallvec::SmallVec;

use super::engine::RbTree;
use super::error::InvariantViolation;
use super::node::{Node, NodeId};
use super::policy::{Compare, KeyOfValue};
use super::storage::NodeStorage;

/// Depth of the inline part of the walk stack. A red-black tree of this
/// height holds far more nodes than fit in memory.
const INLINE_DEPTH: usize = 64;

impl<E, X, C, S> RbTree<E, X, C, S>
where
    X: KeyOfValue<E>,
    C: Compare<X::Key>,
    S: NodeStorage<Node<E>>,
{
    /// Checks every red-black invariant and returns the black height.
    ///
    /// The black height counts the black nodes on any path from the root
    /// down to an absent child, root included; it is 0 for an empty tree.
    ///
    /// The walk is iterative, so it also terminates on a corrupted tree
    /// with a cycle or a degenerate spine.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::tree::RbTree;
    ///
    /// let tree: RbTree<u32> = (0..1000).collect();
    /// let black_height = tree.validate().unwrap();
    /// assert!(black_height >= 5);
    /// ```
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.header.root else {
            if self.length != 0 {
                return Err(InvariantViolation::LengthMismatch {
                    recorded: self.length,
                    counted: 0,
                });
            }
            if self.header.leftmost.is_some() || self.header.rightmost.is_some() {
                return Err(InvariantViolation::StaleBounds);
            }
            return Ok(0);
        };

        if self.node(root).parent.is_some() {
            return Err(InvariantViolation::DetachedRoot);
        }
        if self.node(root).color.is_red() {
            return Err(InvariantViolation::RedRoot);
        }

        let black_height = self.check_structure(root)?;

        if self.header.leftmost != Some(self.minimum(root))
            || self.header.rightmost != Some(self.maximum(root))
        {
            return Err(InvariantViolation::StaleBounds);
        }

        let mut previous: Option<&E> = None;
        for (index, element) in self.iter().enumerate() {
            if let Some(previous) = previous
                && !self.less_elements(previous, element)
            {
                return Err(InvariantViolation::OutOfOrder { index });
            }
            previous = Some(element);
        }

        Ok(black_height)
    }

    /// Walks every node once; checks links, colors, black height and the
    /// node count.
    fn check_structure(&self, root: NodeId) -> Result<usize, InvariantViolation> {
        let mut stack: SmallVec<[(NodeId, usize); INLINE_DEPTH]> = SmallVec::new();
        stack.push((root, 0));
        let mut black_height = None;
        let mut counted = 0;

        while let Some((id, blacks_above)) = stack.pop() {
            counted += 1;
            if counted > self.length {
                return Err(InvariantViolation::LengthMismatch {
                    recorded: self.length,
                    counted,
                });
            }
            let node = self.node(id);
            let blacks = blacks_above + usize::from(!node.color.is_red());
            for child in [node.left, node.right] {
                match child {
                    None => match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(InvariantViolation::BlackHeightMismatch {
                                expected,
                                found: blacks,
                            });
                        }
                        Some(_) => {}
                    },
                    Some(child) => {
                        let child_node = self.node(child);
                        if child_node.parent != Some(id) {
                            return Err(InvariantViolation::BrokenParentLink { node: child });
                        }
                        if node.color.is_red() && child_node.color.is_red() {
                            return Err(InvariantViolation::RedRedEdge { node: child });
                        }
                        stack.push((child, blacks));
                    }
                }
            }
        }

        if counted != self.length {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                counted,
            });
        }
        Ok(black_height.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Color;
    use rstest::rstest;

    fn tree_of(size: i32) -> RbTree<i32> {
        (0..size).collect()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(3, 1)]
    fn test_black_height_of_small_trees(#[case] size: i32, #[case] expected: usize) {
        assert_eq!(tree_of(size).validate(), Ok(expected));
    }

    #[rstest]
    fn test_detects_red_root() {
        let mut tree = tree_of(3);
        let root = tree.header.root.unwrap();
        tree.storage.get_mut(root).color = Color::Red;
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_detects_red_red_edge() {
        // 1 is the black root, 0 and 2 are black, 3 hangs red under 2.
        let mut tree = tree_of(4);
        let two = tree.find(&2).node().unwrap();
        let three = tree.find(&3).node().unwrap();
        tree.storage.get_mut(two).color = Color::Red;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::RedRedEdge { node: three })
        );
    }

    #[rstest]
    fn test_detects_black_height_mismatch() {
        let mut tree = tree_of(3);
        let right = tree.find(&2).node().unwrap();
        tree.storage.get_mut(right).color = Color::Black;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BlackHeightMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[rstest]
    fn test_detects_broken_parent_link() {
        let mut tree = tree_of(3);
        let root = tree.header.root.unwrap();
        let left = tree.node(root).left.unwrap();
        let right = tree.node(root).right.unwrap();
        tree.storage.get_mut(left).parent = Some(right);
        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::BrokenParentLink { .. })
        ));
    }

    #[rstest]
    fn test_detects_out_of_order() {
        let mut tree = tree_of(3);
        let root = tree.header.root.unwrap();
        tree.storage.get_mut(root).element = 100;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::OutOfOrder { index: 2 })
        );
    }

    #[rstest]
    fn test_detects_length_mismatch() {
        let mut tree = tree_of(5);
        tree.length = 4;
        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::LengthMismatch { recorded: 4, .. })
        ));
    }

    #[rstest]
    fn test_detects_stale_bounds() {
        let mut tree = tree_of(5);
        tree.header.leftmost = tree.header.root;
        assert_eq!(tree.validate(), Err(InvariantViolation::StaleBounds));
    }

    #[rstest]
    fn test_detects_detached_root() {
        let mut tree = tree_of(3);
        let root = tree.header.root.unwrap();
        let left = tree.node(root).left;
        tree.storage.get_mut(root).parent = left;
        assert_eq!(tree.validate(), Err(InvariantViolation::DetachedRoot));
    }
}
