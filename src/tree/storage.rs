//! Node storage for the red-black tree engine.
//!
//! The engine never allocates nodes itself. It asks a [`NodeStorage`] to
//! take ownership of a node and hand back a [`NodeId`], and gives the node
//! back through [`NodeStorage::release`] when the element is erased.
//!
//! [`SlabStorage`] is the default and is backed by [`slab::Slab`], which
//! keeps handles stable and reuses released slots.

use slab::Slab;

use super::NodeId;

/// Owner of the nodes of one tree.
///
/// Implementations must keep a handle valid, and the value behind it in
/// place, from [`allocate`](Self::allocate) until [`release`](Self::release)
/// is called with it. Handles may be reused after release.
///
/// # Panics
///
/// [`release`](Self::release), [`get`](Self::get) and
/// [`get_mut`](Self::get_mut) may panic when given a handle that is not
/// currently allocated. The engine only does so when the caller breaks a
/// position precondition (e.g. using a position after erasing it).
pub trait NodeStorage<T> {
    /// Takes ownership of `value` and returns its handle.
    fn allocate(&mut self, value: T) -> NodeId;

    /// Gives back the value behind `id`; the handle becomes vacant.
    fn release(&mut self, id: NodeId) -> T;

    /// Returns a shared reference to the value behind `id`.
    fn get(&self, id: NodeId) -> &T;

    /// Returns a mutable reference to the value behind `id`.
    fn get_mut(&mut self, id: NodeId) -> &mut T;

    /// Returns the largest number of values this storage could ever hold.
    fn max_size(&self) -> usize;
}

/// Slab-backed [`NodeStorage`].
///
/// # Examples
///
/// ```rust
/// use ordtree::tree::{NodeStorage, SlabStorage};
///
/// let mut storage = SlabStorage::new();
/// let id = storage.allocate("node");
/// assert_eq!(*storage.get(id), "node");
/// assert_eq!(storage.release(id), "node");
/// assert!(storage.is_empty());
/// ```
#[derive(Debug)]
pub struct SlabStorage<T> {
    slots: Slab<T>,
}

impl<T> SlabStorage<T> {
    /// Creates an empty storage.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Slab::new() }
    }

    /// Creates an empty storage with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Default for SlabStorage<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeStorage<T> for SlabStorage<T> {
    #[inline]
    fn allocate(&mut self, value: T) -> NodeId {
        NodeId::new(self.slots.insert(value))
    }

    #[inline]
    fn release(&mut self, id: NodeId) -> T {
        self.slots.remove(id.index())
    }

    #[inline]
    fn get(&self, id: NodeId) -> &T {
        &self.slots[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.index()]
    }

    fn max_size(&self) -> usize {
        isize::MAX.unsigned_abs() / std::mem::size_of::<T>().max(1)
    }
}
