use super::handle::Handle;

/// Slot storage for tree nodes. Freed slots are recycled through a free list, so a
/// tree that churns through inserts and removals does not grow without bound.
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

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.slot()] = Some(element);
            h
        } else {
            let Some(handle) = Handle::for_slot(self.slots.len()) else {
                panic!("`Arena::alloc()` - arena is at maximum capacity ({})", Handle::CAPACITY);
            };
            self.slots.push(Some(element));
            handle
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.slot()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.slot()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Borrows two distinct slots mutably at once.
    pub(crate) fn pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (ia, ib) = (a.slot(), b.slot());
        assert_ne!(ia, ib, "`Arena::pair_mut()` - handles must differ!");
        let (low, high) = (ia.min(ib), ia.max(ib));
        let (head, tail) = self.slots.split_at_mut(high);
        let first = head[low].as_mut().expect("`Arena::pair_mut()` - `handle` is invalid!");
        let second = tail[0].as_mut().expect("`Arena::pair_mut()` - `handle` is invalid!");
        if ia < ib { (first, second) } else { (second, first) }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.slot()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
