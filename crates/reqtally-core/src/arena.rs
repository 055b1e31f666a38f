//! Fixed-capacity slab arena for counter nodes.
//!
//! The backing store is sized once from a byte budget and never grows. Slots
//! are handed out in order and never reclaimed: the counter index only ever
//! inserts, so there is no free list. Once the last slot is gone every
//! further `allocate` fails with [`TallyError::ArenaExhausted`] for the rest
//! of the process lifetime.
//!
//! The arena is not independently thread-safe. Callers serialize access
//! through the owning zone's guard.

use std::mem;

use crate::error::{Result, TallyError};

/// Stable handle to an arena slot. `u32` keeps node links compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef(u32);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Allocate-only slab over a pre-sized `Vec`.
#[derive(Debug)]
pub struct SlabArena<T> {
    slots: Vec<T>,
    capacity: usize,
}

impl<T> SlabArena<T> {
    /// Number of `T` slots a byte budget can hold.
    pub fn slots_for_bytes(bytes: usize) -> usize {
        bytes / mem::size_of::<T>()
    }

    /// Create an arena with room for exactly `capacity` slots.
    pub fn with_slot_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Hand out the next slot, or fail permanently once full.
    pub fn allocate(&mut self, value: T) -> Result<NodeRef> {
        if self.slots.len() >= self.capacity {
            return Err(TallyError::ArenaExhausted {
                slots: self.capacity,
            });
        }
        let idx = self.slots.len() as u32;
        self.slots.push(value);
        Ok(NodeRef(idx))
    }

    #[inline(always)]
    pub fn get(&self, r: NodeRef) -> &T {
        &self.slots[r.index()]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, r: NodeRef) -> &mut T {
        &mut self.slots[r.index()]
    }

    /// Slots currently in use.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total slot capacity fixed at creation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
