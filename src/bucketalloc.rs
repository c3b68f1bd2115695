// Copyright 2025 Lars Brubaker
// License: MIT
//
// Slot arena with a free list.
//
// Nodes live in a `Vec` and are addressed by `u32` index. Freed slots are
// recycled before the vector grows, so indices stay small and stable for
// the lifetime of an element. Growth is fallible: allocation failure is
// reported as `Error::NoMemory` and leaves the arena unchanged.

use crate::error::Error;

pub struct BucketAlloc<T> {
    items: Vec<Option<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> BucketAlloc<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store `value`, returning its slot index.
    pub fn alloc(&mut self, value: T) -> Result<u32, Error> {
        if let Some(idx) = self.free_list.pop() {
            self.items[idx as usize] = Some(value);
            self.live += 1;
            return Ok(idx);
        }
        let idx = u32::try_from(self.items.len()).map_err(|_| Error::NoMemory)?;
        if idx == u32::MAX {
            // u32::MAX is reserved as the null index by callers.
            return Err(Error::NoMemory);
        }
        self.items.try_reserve(1)?;
        // The free list must be able to take this slot back without growing.
        self.free_list.try_reserve(self.items.len() + 1 - self.free_list.len())?;
        self.items.push(Some(value));
        self.live += 1;
        Ok(idx)
    }

    /// Release a slot, returning its value. `None` if the slot was not live.
    pub fn free(&mut self, idx: u32) -> Option<T> {
        let value = self.items.get_mut(idx as usize)?.take()?;
        self.free_list.push(idx);
        self.live -= 1;
        Some(value)
    }

    #[inline]
    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.items.get_mut(idx as usize)?.as_mut()
    }

    /// Number of live slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.free_list.clear();
        self.live = 0;
    }
}

impl<T> Default for BucketAlloc<T> {
    fn default() -> Self {
        Self::new()
    }
}
