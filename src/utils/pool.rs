use super::handle::Handle;

#[cfg(feature = "mirin-serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle state of one pool slot.
///
/// Slots start in `Initial`, move to `Alloc` when an identity is reserved,
/// then to `Valid` or `Failed` once initialization runs. Destroying a slot
/// returns it to `Initial` and bumps its generation, so stale handles to
/// the previous occupant stop resolving. Allocation and initialization are
/// separate so payloads can be produced asynchronously; a handle in the
/// `Alloc` or `Failed` state is silently skipped by rendering operations
/// instead of being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mirin-serde", derive(Serialize, Deserialize))]
pub enum ResourceState {
    #[default]
    Initial,
    Alloc,
    Valid,
    Failed,
}

struct Slot<T> {
    state: ResourceState,
    generation: u16,
    payload: Option<T>,
}

/// Fixed-capacity generation-checked slot pool.
///
/// Slot index 0 is permanently dead so that the packed handle value 0 can
/// serve as the invalid sentinel. The free list makes allocation O(1);
/// exhaustion is a hard failure, the pool never grows.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u16>,
}

impl<T> Pool<T> {
    pub fn new(capacity: u16) -> Self {
        let mut slots = Vec::with_capacity(capacity as usize + 1);
        // slot 0 reserved, generation pinned to 0
        slots.push(Slot {
            state: ResourceState::Initial,
            generation: 0,
            payload: None,
        });
        for _ in 0..capacity {
            slots.push(Slot {
                state: ResourceState::Initial,
                generation: 1,
                payload: None,
            });
        }
        let free = (1..=capacity).rev().collect();
        Pool { slots, free }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn live_count(&self) -> usize {
        self.capacity() - self.free.len()
    }

    /// Reserve a slot and hand out a handle stamped with its current
    /// generation. The slot enters the `Alloc` state; the payload is
    /// populated later via [`Pool::initialize`]. Returns `None` when the
    /// pool is exhausted.
    pub fn allocate(&mut self) -> Option<Handle<T>> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.state = ResourceState::Alloc;
        Some(Handle::new(index, slot.generation))
    }

    /// Attach a payload to a previously allocated slot, moving it to
    /// `Valid`. Returns `false` (and does nothing) unless the handle names
    /// a slot in the `Alloc` state with a matching generation.
    pub fn initialize(&mut self, handle: Handle<T>, payload: T) -> bool {
        match self.alloc_slot(handle) {
            Some(slot) => {
                slot.state = ResourceState::Valid;
                slot.payload = Some(payload);
                true
            }
            None => false,
        }
    }

    /// Move an allocated slot to `Failed` without a payload. Same
    /// preconditions as [`Pool::initialize`]. The slot stays occupied and
    /// queryable until it is destroyed.
    pub fn fail(&mut self, handle: Handle<T>) -> bool {
        match self.alloc_slot(handle) {
            Some(slot) => {
                slot.state = ResourceState::Failed;
                true
            }
            None => false,
        }
    }

    /// The state of the slot the handle names, or `Initial` when the handle
    /// is stale, invalid, or out of range. A destroyed slot is
    /// indistinguishable from a never-allocated one.
    pub fn state(&self, handle: Handle<T>) -> ResourceState {
        match self.slot(handle) {
            Some(slot) => slot.state,
            None => ResourceState::Initial,
        }
    }

    /// Payload access, only for live `Valid` slots. `Alloc` and `Failed`
    /// slots resolve to `None` so callers skip them the same way they skip
    /// stale handles.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slot(handle)?;
        if slot.state == ResourceState::Valid {
            slot.payload.as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slot_mut(handle)?;
        if slot.state == ResourceState::Valid {
            slot.payload.as_mut()
        } else {
            None
        }
    }

    /// Release the slot the handle names, returning any payload it held so
    /// the caller can run backend teardown. The generation is bumped (never
    /// back to 0) and the index goes back on the free list. Destroying a
    /// stale, invalid, or already-`Initial` handle is a no-op returning
    /// `None`; so is destroying an `Alloc`/`Failed` slot, except the slot
    /// is still freed.
    pub fn destroy(&mut self, handle: Handle<T>) -> Option<T> {
        let index = handle.slot;
        let slot = self.slot_mut(handle)?;
        if slot.state == ResourceState::Initial {
            return None;
        }
        let payload = slot.payload.take();
        slot.state = ResourceState::Initial;
        slot.generation = next_generation(slot.generation);
        self.free.push(index);
        payload
    }

    /// Tear down every occupied slot, returning the payloads of the `Valid`
    /// ones. Used at shutdown.
    pub fn drain(&mut self) -> Vec<T> {
        let mut payloads = Vec::new();
        for index in 1..self.slots.len() {
            let slot = &mut self.slots[index];
            if slot.state == ResourceState::Initial {
                continue;
            }
            if let Some(payload) = slot.payload.take() {
                payloads.push(payload);
            }
            slot.state = ResourceState::Initial;
            slot.generation = next_generation(slot.generation);
            self.free.push(index as u16);
        }
        payloads
    }

    fn slot(&self, handle: Handle<T>) -> Option<&Slot<T>> {
        let index = handle.slot as usize;
        if index == 0 || index >= self.slots.len() {
            return None;
        }
        let slot = &self.slots[index];
        if slot.generation != handle.generation {
            return None;
        }
        Some(slot)
    }

    fn slot_mut(&mut self, handle: Handle<T>) -> Option<&mut Slot<T>> {
        let index = handle.slot as usize;
        if index == 0 || index >= self.slots.len() {
            return None;
        }
        let slot = &mut self.slots[index];
        if slot.generation != handle.generation {
            return None;
        }
        Some(slot)
    }

    fn alloc_slot(&mut self, handle: Handle<T>) -> Option<&mut Slot<T>> {
        let slot = self.slot_mut(handle)?;
        if slot.state == ResourceState::Alloc {
            Some(slot)
        } else {
            None
        }
    }
}

fn next_generation(generation: u16) -> u16 {
    // generation 0 stays reserved for the invalid handle, skip it on wrap
    match generation.wrapping_add(1) {
        0 => 1,
        g => g,
    }
}
