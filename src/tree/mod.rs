//! Ordered tree engine.
//!
//! This module provides [`RbTree`], a red-black tree storing unique keys in
//! sorted order, together with the pieces it is assembled from:
//!
//! - [`Node`], [`NodeId`] and [`Color`]: the node graph
//! - [`NodeStorage`] and [`SlabStorage`]: where nodes live
//! - [`KeyOfValue`] and [`Compare`]: how elements are ordered
//! - [`Position`], [`Cursor`], [`ReverseCursor`], [`Iter`], [`Range`] and
//!   [`IntoIter`]: traversal
//! - [`InvariantViolation`]: what [`RbTree::validate`] reports
//!
//! # Positions
//!
//! Operations that locate an element return a [`Position`], a `Copy`
//! handle that survives any mutation except the erasure of the element it
//! names. This is what makes hinted insertion and erase-while-iterating
//! possible without holding a borrow of the tree.
//!
//! ```rust
//! use ordtree::tree::RbTree;
//!
//! let mut tree: RbTree<i32> = (0..10).collect();
//! let mut position = tree.begin();
//! while !position.is_end() {
//!     let next = tree.next_position(position);
//!     if tree.get(position).is_some_and(|value| value % 2 == 0) {
//!         tree.erase(position);
//!     }
//!     position = next;
//! }
//! let odd: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(odd, vec![1, 3, 5, 7, 9]);
//! ```

mod cursor;
mod engine;
mod error;
mod node;
mod policy;
mod storage;
mod validate;

pub use cursor::{Cursor, IntoIter, Iter, Position, Range, ReverseCursor};
pub use engine::RbTree;
pub use error::InvariantViolation;
pub use node::{Color, Node, NodeId};
pub use policy::{ByFn, Compare, First, Greater, Identity, KeyOfValue, Less};
pub use storage::{NodeStorage, SlabStorage};
