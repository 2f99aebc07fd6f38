//! Generational Instance Storage
//!
//! Every instance a manager owns, idle or active, lives in one slot arena.
//! Callers never hold the instance itself; they hold an [`InstanceId`] that
//! pairs a slot index with the slot's generation at spawn time.
//!
//! # Design Principles
//!
//! - **Stable Addressing**: Slots never move, so an index stays meaningful
//!   for as long as the instance exists
//! - **Generation Check**: Every recycle and every destroy bumps the slot
//!   generation, so an id that outlived its activation matches nothing
//! - **Free List**: Destroyed slots are reused in O(1)
//!
//! # Example
//!
//! ```ignore
//! let mut slots = InstanceSlots::new();
//! let index = slots.insert(instance);       // idle
//! let id = slots.activate(index).unwrap();   // active, addressable
//! slots.get_mut(id).unwrap().set_position(pos);
//! slots.deactivate(id);                      // idle again, `id` is now stale
//! assert!(slots.get(id).is_none());
//! ```

use std::fmt;

// ============================================================================
// Instance Id
// ============================================================================

/// Handle to one activation of a pooled instance.
///
/// Valid from `spawn` until the matching `recycle`. After that it no longer
/// resolves, even if the same underlying instance is spawned again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId {
    index: u32,
    generation: u32,
}

impl InstanceId {
    /// Slot index
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation captured at spawn
    #[must_use]
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// ============================================================================
// Slot
// ============================================================================

#[derive(Debug)]
enum Slot<T> {
    /// Slot holds an instance
    Occupied {
        instance: T,
        generation: u32,
        active: bool,
    },
    /// Slot is empty and links to the next free slot (or `NONE`)
    Vacant { next: usize, generation: u32 },
}

impl<T> Slot<T> {
    const fn generation(&self) -> u32 {
        match self {
            Self::Occupied { generation, .. } | Self::Vacant { generation, .. } => *generation,
        }
    }
}

// ============================================================================
// Instance Slots
// ============================================================================

/// Slot arena holding every instance owned by a pool manager.
#[derive(Debug)]
pub struct InstanceSlots<T> {
    /// Storage for all slots
    slots: Vec<Slot<T>>,
    /// Head of the free list
    free_head: usize,
    /// Number of occupied slots
    live: usize,
    /// Number of occupied slots currently active
    active: usize,
}

impl<T> InstanceSlots<T> {
    /// Sentinel value indicating end of free list.
    const NONE: usize = usize::MAX;

    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: Self::NONE,
            live: 0,
            active: 0,
        }
    }

    /// Store a new idle instance and return its slot index.
    pub fn insert(&mut self, instance: T) -> usize {
        self.live += 1;

        if self.free_head != Self::NONE {
            let index = self.free_head;
            let (next, generation) = match self.slots[index] {
                Slot::Vacant { next, generation } => (next, generation),
                Slot::Occupied { .. } => (Self::NONE, 0),
            };
            self.free_head = next;
            self.slots[index] = Slot::Occupied {
                instance,
                generation,
                active: false,
            };
            index
        } else {
            let index = self.slots.len();
            self.slots.push(Slot::Occupied {
                instance,
                generation: 0,
                active: false,
            });
            index
        }
    }

    /// Mark the idle instance at `index` active and hand out its id.
    ///
    /// Returns `None` if the slot is empty or already active.
    pub fn activate(&mut self, index: usize) -> Option<InstanceId> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied {
                generation, active, ..
            }) if !*active => {
                *active = true;
                self.active += 1;
                Some(InstanceId {
                    index: index as u32,
                    generation: *generation,
                })
            }
            _ => None,
        }
    }

    /// Return the active instance behind `id` to the idle state.
    ///
    /// The slot generation advances, so `id` stops resolving. Returns the
    /// slot index, or `None` if `id` is stale.
    pub fn deactivate(&mut self, id: InstanceId) -> Option<usize> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied {
                generation, active, ..
            }) if *active && *generation == id.generation => {
                *active = false;
                *generation = generation.wrapping_add(1);
                self.active -= 1;
                Some(id.index())
            }
            _ => None,
        }
    }

    /// Take the instance out of slot `index`, vacating the slot.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        let generation = slot.generation().wrapping_add(1);
        let vacated = std::mem::replace(
            slot,
            Slot::Vacant {
                next: self.free_head,
                generation,
            },
        );
        self.free_head = index;
        self.live -= 1;

        match vacated {
            Slot::Occupied {
                instance, active, ..
            } => {
                if active {
                    self.active -= 1;
                }
                Some(instance)
            }
            Slot::Vacant { .. } => None,
        }
    }

    /// Resolve an active id
    #[must_use]
    #[inline]
    pub fn get(&self, id: InstanceId) -> Option<&T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied {
                instance,
                generation,
                active: true,
            }) if *generation == id.generation => Some(instance),
            _ => None,
        }
    }

    /// Resolve an active id mutably
    #[inline]
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied {
                instance,
                generation,
                active: true,
            }) if *generation == id.generation => Some(instance),
            _ => None,
        }
    }

    /// Access an occupied slot regardless of its state
    #[inline]
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied { instance, .. }) => Some(instance),
            _ => None,
        }
    }

    /// Check whether `id` currently resolves
    #[must_use]
    #[inline]
    pub fn is_active(&self, id: InstanceId) -> bool {
        self.get(id).is_some()
    }

    /// Check whether slot `index` holds an idle instance
    #[must_use]
    #[inline]
    pub fn is_idle(&self, index: usize) -> bool {
        matches!(
            self.slots.get(index),
            Some(Slot::Occupied { active: false, .. })
        )
    }

    /// Number of instances stored
    #[must_use]
    #[inline]
    pub const fn live_count(&self) -> usize {
        self.live
    }

    /// Number of active instances stored
    #[must_use]
    #[inline]
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Total slots, including vacant ones
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Remove every instance, active or idle.
    ///
    /// Vacated slots keep advancing generations so no earlier id resolves.
    pub fn drain(&mut self) -> Vec<T> {
        let mut drained = Vec::with_capacity(self.live);
        for index in 0..self.slots.len() {
            if let Some(instance) = self.remove(index) {
                drained.push(instance);
            }
        }
        drained
    }
}

impl<T> Default for InstanceSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idle() {
        let mut slots = InstanceSlots::new();
        let index = slots.insert("a");

        assert!(slots.is_idle(index));
        assert_eq!(slots.live_count(), 1);
        assert_eq!(slots.active_count(), 0);
    }

    #[test]
    fn test_activate_and_resolve() {
        let mut slots = InstanceSlots::new();
        let index = slots.insert(10_i32);
        let id = slots.activate(index).unwrap();

        assert_eq!(slots.get(id), Some(&10));
        assert!(slots.activate(index).is_none(), "Already active");
        assert_eq!(slots.active_count(), 1);
    }

    #[test]
    fn test_deactivate_stales_id() {
        let mut slots = InstanceSlots::new();
        let index = slots.insert(1_i32);
        let first = slots.activate(index).unwrap();

        assert_eq!(slots.deactivate(first), Some(index));
        assert!(slots.get(first).is_none());
        assert!(slots.deactivate(first).is_none(), "Double deactivate");

        let second = slots.activate(index).unwrap();
        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert!(slots.get(first).is_none(), "Old id must not see new activation");
        assert!(slots.get(second).is_some());
    }

    #[test]
    fn test_remove_reuses_slot_with_new_generation() {
        let mut slots = InstanceSlots::new();
        let index = slots.insert(1_i32);
        let old = slots.activate(index).unwrap();

        assert_eq!(slots.remove(index), Some(1));
        assert_eq!(slots.active_count(), 0);
        assert!(slots.remove(index).is_none());

        let reused = slots.insert(2_i32);
        assert_eq!(reused, index);
        let new = slots.activate(reused).unwrap();
        assert!(slots.get(old).is_none());
        assert_eq!(slots.get(new), Some(&2));
    }

    #[test]
    fn test_drain_empties_everything() {
        let mut slots = InstanceSlots::new();
        let a = slots.insert('a');
        slots.insert('b');
        let id = slots.activate(a).unwrap();

        let mut drained = slots.drain();
        drained.sort_unstable();
        assert_eq!(drained, vec!['a', 'b']);
        assert_eq!(slots.live_count(), 0);
        assert!(slots.get(id).is_none());
    }
}
