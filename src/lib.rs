//! # ordtree
//!
//! An ordered associative container for Rust built on a red-black tree.
//!
//! ## Overview
//!
//! - **Tree engine** ([`tree::RbTree`]): unique keys in sorted order,
//!   logarithmic insert, erase and lookup, O(1) access to the extremes,
//!   hinted insertion, stable positions, and a pluggable node storage.
//! - **Map façade** ([`map::TreeMap`]): key/value entries over the engine,
//!   with immutable keys and mutable values.
//! - **Pairs** ([`pair::Pair`]): the key/value element stored by the map.
//!
//! Ordering is a strict weak order supplied by a [`tree::Compare`]
//! implementation; elements whose keys are equivalent are stored once.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`map::TreeMap`] and
//!   [`pair::Pair`]
//!
//! ## Example
//!
//! ```rust
//! use ordtree::prelude::*;
//!
//! let mut tree: RbTree<u32> = RbTree::new();
//! for key in [10, 20, 5] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![5, 10, 20]);
//!
//! let mut map = TreeMap::new();
//! *map.entry_or_default("apples") += 3;
//! *map.entry_or_default("pears") += 1;
//! assert_eq!(map.get(&"apples"), Some(&3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the containers and the ordering policies.
///
/// # Usage
///
/// ```rust
/// use ordtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::map::TreeMap;
    pub use crate::pair::Pair;
    pub use crate::tree::{
        ByFn, Compare, First, Greater, Identity, KeyOfValue, Less, NodeStorage, Position, RbTree,
        SlabStorage,
    };
}

pub mod map;
pub mod pair;
pub mod tree;
