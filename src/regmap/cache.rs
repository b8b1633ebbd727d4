use bitmaps::{Bitmap, Bits, BitsImpl};
use heapless::Vec;

use crate::regmap::RegmapError;

/// Storage for last-known register values.
///
/// A store only remembers values; whether a remembered value may be served
/// for a read is decided by the register map from the register's
/// classification.
pub trait CacheStore {
    /// Returns the remembered value of `reg` if it is marked valid.
    fn get(&self, reg: u16) -> Option<u32>;

    /// Remembers `val` for `reg` and marks it valid.
    ///
    /// Returns [`RegmapError::Alloc`] if the store has no room for a new register.
    fn put(&mut self, reg: u16, val: u32) -> Result<(), RegmapError>;

    /// Updates `reg` only if it already owns a slot. Never takes a new one.
    fn refresh(&mut self, reg: u16, val: u32);

    /// Marks the value of `reg` invalid.
    fn invalidate(&mut self, reg: u16);

    /// Marks every remembered value invalid.
    fn invalidate_all(&mut self);

    /// Forgets every register.
    fn clear(&mut self);
}

/// Cache store that remembers nothing. Every read goes to the transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _reg: u16) -> Option<u32> {
        None
    }

    fn put(&mut self, _reg: u16, _val: u32) -> Result<(), RegmapError> {
        Ok(())
    }

    fn refresh(&mut self, _reg: u16, _val: u32) {}

    fn invalidate(&mut self, _reg: u16) {}

    fn invalidate_all(&mut self) {}

    fn clear(&mut self) {}
}

#[derive(Clone, Copy)]
struct CacheSlot {
    reg: u16,
    val: u32,
}

/// Fixed-capacity cache of up to `N` registers.
///
/// Slots are assigned on first use and never move, so validity is tracked as
/// one bit per slot. `N` may be at most 1024.
pub struct SlotCache<const N: usize>
where
    BitsImpl<N>: Bits,
{
    slots: Vec<CacheSlot, N>,
    valid: Bitmap<N>,
}

impl<const N: usize> SlotCache<N>
where
    BitsImpl<N>: Bits,
{
    /// Creates an empty cache. No slot is owned yet.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            valid: Bitmap::new(),
        }
    }

    /// Number of registers holding a valid value.
    pub fn len(&self) -> usize {
        self.valid.len()
    }

    /// True when no register holds a valid value.
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }

    /// Maximum number of distinct registers the cache can hold.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Iterates over every valid `(reg, val)` pair in slot order.
    pub fn iter_valid<F>(&self, mut f: F)
    where
        F: FnMut(u16, u32),
    {
        let mut idx = self.valid.first_index();
        while let Some(slot) = idx {
            let entry = &self.slots[slot];
            f(entry.reg, entry.val);
            idx = self.valid.next_index(slot);
        }
    }

    fn slot_of(&self, reg: u16) -> Option<usize> {
        self.slots.iter().position(|s| s.reg == reg)
    }
}

impl<const N: usize> Default for SlotCache<N>
where
    BitsImpl<N>: Bits,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for SlotCache<N>
where
    BitsImpl<N>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotCache")
            .field("capacity", &N)
            .field("used", &self.slots.len())
            .field("valid", &self.valid.len())
            .finish()
    }
}

impl<const N: usize> CacheStore for SlotCache<N>
where
    BitsImpl<N>: Bits,
{
    fn get(&self, reg: u16) -> Option<u32> {
        let slot = self.slot_of(reg)?;
        if self.valid.get(slot) {
            Some(self.slots[slot].val)
        } else {
            None
        }
    }

    fn put(&mut self, reg: u16, val: u32) -> Result<(), RegmapError> {
        let slot = match self.slot_of(reg) {
            Some(slot) => {
                self.slots[slot].val = val;
                slot
            }
            None => {
                self.slots
                    .push(CacheSlot { reg, val })
                    .map_err(|_| RegmapError::Alloc)?;
                self.slots.len() - 1
            }
        };
        self.valid.set(slot, true);
        Ok(())
    }

    fn refresh(&mut self, reg: u16, val: u32) {
        if let Some(slot) = self.slot_of(reg) {
            self.slots[slot].val = val;
            self.valid.set(slot, true);
        }
    }

    fn invalidate(&mut self, reg: u16) {
        if let Some(slot) = self.slot_of(reg) {
            self.valid.set(slot, false);
        }
    }

    fn invalidate_all(&mut self) {
        self.valid = Bitmap::new();
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.valid = Bitmap::new();
    }
}
