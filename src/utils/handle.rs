use std::hash::Hash;
use std::marker::PhantomData;

/// Typed identifier for one pooled resource.
///
/// A handle combines a pool slot index with the generation counter the slot
/// carried when the resource was allocated. Handles are plain values with no
/// ownership semantics; they can be copied freely, stored anywhere, and
/// outlive the resource they name. Every pool lookup re-checks the
/// generation, so a handle captured before a destroy never resolves against
/// the slot's next occupant.
///
/// Slot 0 / generation 0 is the reserved invalid sentinel, which is also
/// what [`Handle::default`] returns.
#[derive(Debug)]
pub struct Handle<T> {
    pub slot: u16,
    pub generation: u16,
    phantom: PhantomData<T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(slot: u16, generation: u16) -> Self {
        Self {
            slot,
            generation,
            phantom: PhantomData,
        }
    }

    /// The reserved invalid handle.
    pub fn invalid() -> Self {
        Self::new(0, 0)
    }

    /// True unless this is the reserved invalid sentinel. A `true` result
    /// says nothing about whether the handle still resolves; that is the
    /// pool's generation check.
    pub fn is_valid(&self) -> bool {
        self.pack() != 0
    }

    /// Pack into the 32-bit wire form: generation in the upper half, slot
    /// index in the lower half. The invalid handle packs to 0.
    pub fn pack(&self) -> u32 {
        (u32::from(self.generation) << 16) | u32::from(self.slot)
    }

    /// Rebuild a handle from its packed form. The result carries no more
    /// authority than any other handle value; lookups still validate it.
    pub fn unpack(bits: u32) -> Self {
        Self::new((bits & 0xFFFF) as u16, (bits >> 16) as u16)
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.slot.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::invalid()
    }
}
