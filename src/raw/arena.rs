use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes.
///
/// Released slots go on a free list and are handed out again before the slot vector grows, so a
/// tree that repeatedly splits and merges nodes keeps a stable footprint.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.slot()] = Some(element);
            return handle;
        }

        let Some(handle) = Handle::for_slot(self.slots.len()) else {
            panic!("`Arena::alloc()` - arena is full ({} slots)!", Handle::CAPACITY);
        };
        self.slots.push(Some(element));
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.slot()].as_ref().expect("`Arena::get()` - `handle` is not allocated!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.slot()].as_mut().expect("`Arena::get_mut()` - `handle` is not allocated!")
    }

    /// Releases the slot behind `handle`, returning its element.
    pub(crate) fn release(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.slot()].take().expect("`Arena::release()` - `handle` is not allocated!");
        self.free.push(handle);
        element
    }

    /// Drops every element and forgets all handles.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
