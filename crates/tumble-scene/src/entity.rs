//! Node handles and slot recycling.
//!
//! A [`NodeId`] packs a *generation* in the high 32 bits and a slot in the low
//! 32 bits. Detaching a node bumps its slot's generation, so every handle that
//! still points at the old occupant stops resolving.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// A generational handle to a node attached to a [`World`](crate::world::World).
///
/// Layout: `[generation: u32 | slot: u32]`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Build a handle from a slot and a generation.
    #[inline]
    pub fn new(slot: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | slot as u64)
    }

    /// Slot index (low 32 bits).
    #[inline]
    pub fn slot(self) -> u32 {
        self.0 as u32
    }

    /// Generation counter (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Packed `u64` form, used as a map key by the physics bridge.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from its packed form.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.slot(), self.generation())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// NodeAllocator
// ---------------------------------------------------------------------------

/// Hands out [`NodeId`]s and recycles freed slots.
///
/// Freed slots are reused oldest-first so a burst of spawn/remove churn does
/// not hammer the generation counter of one slot.
#[derive(Debug, Default)]
pub struct NodeAllocator {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: VecDeque<u32>,
    live_count: usize,
}

impl NodeAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a handle, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> NodeId {
        self.live_count += 1;
        match self.free.pop_front() {
            Some(slot) => {
                self.live[slot as usize] = true;
                NodeId::new(slot, self.generations[slot as usize])
            }
            None => {
                let slot = self.generations.len() as u32;
                self.generations.push(0);
                self.live.push(true);
                NodeId::new(slot, 0)
            }
        }
    }

    /// Release a handle. Returns `false` when the handle was already released
    /// or belongs to an older generation of the slot.
    pub fn release(&mut self, id: NodeId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let slot = id.slot() as usize;
        self.live[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push_back(id.slot());
        self.live_count -= 1;
        true
    }

    /// Whether `id` names the current occupant of its slot.
    pub fn is_live(&self, id: NodeId) -> bool {
        let slot = id.slot() as usize;
        slot < self.generations.len() && self.live[slot] && self.generations[slot] == id.generation()
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Number of slots ever created, live or free.
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handles_use_distinct_slots() {
        let mut alloc = NodeAllocator::new();
        let ids: Vec<NodeId> = (0..64).map(|_| alloc.allocate()).collect();
        let mut slots: Vec<u32> = ids.iter().map(|id| id.slot()).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), 64);
        assert_eq!(alloc.live_count(), 64);
    }

    #[test]
    fn recycled_slot_gets_next_generation() {
        let mut alloc = NodeAllocator::new();
        let first = alloc.allocate();
        assert!(alloc.release(first));
        let second = alloc.allocate();
        assert_eq!(second.slot(), first.slot());
        assert_eq!(second.generation(), first.generation() + 1);
        assert!(!alloc.is_live(first));
        assert!(alloc.is_live(second));
    }

    #[test]
    fn releasing_twice_is_rejected() {
        let mut alloc = NodeAllocator::new();
        let id = alloc.allocate();
        assert!(alloc.release(id));
        assert!(!alloc.release(id));
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn unknown_slot_is_not_live() {
        let alloc = NodeAllocator::new();
        assert!(!alloc.is_live(NodeId::new(7, 0)));
    }

    #[test]
    fn raw_form_preserves_parts() {
        let id = NodeId::new(42, 9);
        assert_eq!(NodeId::from_raw(id.to_raw()), id);
        assert_eq!(id.to_string(), "42v9");
    }
}
