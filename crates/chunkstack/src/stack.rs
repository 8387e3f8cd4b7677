//! LIFO bookkeeping over a [`ChunkPool`], shared by [`RawStack`] and [`Stack`].
//!
//! [`RawStack`]: crate::RawStack
//! [`Stack`]: crate::Stack

use tracing::{debug, trace};

use crate::chunk::ChunkPool;

/// Position of the top element within the active head chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Top {
    /// No live element; the active list is empty.
    Empty,
    /// The top element sits in slot `n` of the active head.
    At(usize),
}

/// A stack of fixed-stride slots stored in recycled chunks.
///
/// Every active chunk except the head is full, so the top element is
/// always in the head chunk and dropping below slot 0 means the head is
/// drained and the next active chunk is full.
pub(crate) struct SlotStack<U> {
    pool: ChunkPool<U>,
    top: Top,
    len: usize,
    label: &'static str,
}

impl<U: Copy> SlotStack<U> {
    /// Create an empty stack. `stride` and `capacity` must be non-zero;
    /// callers validate them.
    pub(crate) fn new(stride: usize, capacity: usize, fill: U, label: &'static str) -> Self {
        Self {
            pool: ChunkPool::new(stride, capacity, fill),
            top: Top::Empty,
            len: 0,
            label,
        }
    }

    /// Reserve the next slot and return it for the caller to fill.
    ///
    /// The slot holds whatever a previous element left behind.
    pub(crate) fn push_slot(&mut self) -> &mut [U] {
        let index = match self.top {
            Top::At(i) if i + 1 < self.pool.capacity() => i + 1,
            _ => {
                let recycled = self.pool.acquire();
                trace!(
                    label = self.label,
                    recycled,
                    chunks = self.pool.chunk_count(),
                    "acquired chunk"
                );
                0
            }
        };
        self.top = Top::At(index);
        self.len += 1;
        self.pool
            .head_slot_mut(index)
            .expect("acquire always leaves an active head")
    }

    /// The top slot, or `None` when empty.
    pub(crate) fn top_slot(&self) -> Option<&[U]> {
        match self.top {
            Top::At(i) => self.pool.head_slot(i),
            Top::Empty => None,
        }
    }

    /// Mutable access to the top slot, or `None` when empty.
    pub(crate) fn top_slot_mut(&mut self) -> Option<&mut [U]> {
        match self.top {
            Top::At(i) => self.pool.head_slot_mut(i),
            Top::Empty => None,
        }
    }

    /// Remove the top element. Returns `false` if the stack was empty.
    pub(crate) fn discard(&mut self) -> bool {
        self.top = match self.top {
            Top::Empty => return false,
            Top::At(0) => {
                self.pool.retire_head();
                trace!(
                    label = self.label,
                    free = self.pool.free_chunk_count(),
                    "retired drained chunk"
                );
                if self.pool.has_active() {
                    Top::At(self.pool.capacity() - 1)
                } else {
                    Top::Empty
                }
            }
            Top::At(i) => Top::At(i - 1),
        };
        self.len -= 1;
        true
    }

    /// Drop every element, keeping all chunks for reuse.
    pub(crate) fn clear(&mut self) {
        let moved = self.pool.retire_all();
        if moved > 0 {
            debug!(
                label = self.label,
                moved,
                free = self.pool.free_chunk_count(),
                "cleared stack"
            );
        }
        self.top = Top::Empty;
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub(crate) fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn chunk_count(&self) -> usize {
        self.pool.chunk_count()
    }

    pub(crate) fn active_chunk_count(&self) -> usize {
        self.pool.active_chunk_count()
    }

    pub(crate) fn free_chunk_count(&self) -> usize {
        self.pool.free_chunk_count()
    }

    pub(crate) fn memory_bytes(&self) -> usize {
        self.pool.memory_bytes()
    }

    #[cfg(test)]
    pub(crate) fn top(&self) -> Top {
        self.top
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &ChunkPool<U> {
        &self.pool
    }
}

impl<U> Drop for SlotStack<U> {
    fn drop(&mut self) {
        if self.pool.chunk_count() > 0 {
            debug!(
                label = self.label,
                len = self.len,
                chunks = self.pool.chunk_count(),
                bytes = self.pool.memory_bytes(),
                "releasing stack chunks"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(capacity: usize) -> SlotStack<u32> {
        SlotStack::new(1, capacity, 0, "test")
    }

    fn push(s: &mut SlotStack<u32>, v: u32) {
        s.push_slot()[0] = v;
    }

    fn pop(s: &mut SlotStack<u32>) -> u32 {
        let v = s.top_slot().unwrap()[0];
        assert!(s.discard());
        v
    }

    #[test]
    fn fresh_stack_is_empty_without_chunks() {
        let s = stack(4);
        assert_eq!(s.len(), 0);
        assert_eq!(s.top(), Top::Empty);
        assert_eq!(s.chunk_count(), 0);
        assert!(s.top_slot().is_none());
    }

    #[test]
    fn first_push_allocates_and_sets_slot_zero() {
        let mut s = stack(4);
        push(&mut s, 9);
        assert_eq!(s.top(), Top::At(0));
        assert_eq!(s.chunk_count(), 1);
        assert_eq!(s.top_slot().unwrap(), &[9]);
    }

    #[test]
    fn crossing_a_chunk_boundary_and_back() {
        let mut s = stack(4);
        for v in 1..=5 {
            push(&mut s, v);
        }
        assert_eq!(s.len(), 5);
        assert_eq!(s.active_chunk_count(), 2);
        assert_eq!(s.top(), Top::At(0));

        assert_eq!(pop(&mut s), 5);
        assert_eq!(s.len(), 4);
        assert_eq!(s.top(), Top::At(3));
        assert_eq!(s.active_chunk_count(), 1);
        assert_eq!(s.free_chunk_count(), 1);

        assert_eq!(pop(&mut s), 4);
        assert_eq!(pop(&mut s), 3);
        assert_eq!(pop(&mut s), 2);
        assert_eq!(s.len(), 1);
        s.pool().assert_consistent();
    }

    #[test]
    fn draining_last_chunk_returns_to_empty() {
        let mut s = stack(2);
        push(&mut s, 1);
        assert_eq!(pop(&mut s), 1);
        assert_eq!(s.top(), Top::Empty);
        assert_eq!(s.free_chunk_count(), 1);
        assert!(!s.discard());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn refill_reuses_free_chunk() {
        let mut s = stack(2);
        for v in 0..5 {
            push(&mut s, v);
        }
        while s.discard() {}
        assert_eq!(s.chunk_count(), 3);
        assert_eq!(s.free_chunk_count(), 3);
        for v in 0..5 {
            push(&mut s, v);
        }
        assert_eq!(s.chunk_count(), 3);
        s.pool().assert_consistent();
    }

    #[test]
    fn clear_moves_active_chunks_to_free() {
        let mut s = stack(2);
        for v in 0..5 {
            push(&mut s, v);
        }
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.top(), Top::Empty);
        assert_eq!(s.active_chunk_count(), 0);
        assert_eq!(s.free_chunk_count(), 3);
        s.pool().assert_consistent();

        push(&mut s, 42);
        assert_eq!(s.top_slot().unwrap(), &[42]);
        assert_eq!(s.chunk_count(), 3);
    }

    #[test]
    fn capacity_one_rolls_chunk_every_element() {
        let mut s = stack(1);
        for v in 0..3 {
            push(&mut s, v);
        }
        assert_eq!(s.active_chunk_count(), 3);
        assert_eq!(pop(&mut s), 2);
        assert_eq!(s.top(), Top::At(0));
        assert_eq!(pop(&mut s), 1);
        assert_eq!(pop(&mut s), 0);
        assert_eq!(s.top(), Top::Empty);
    }

    #[test]
    fn top_slot_mut_edits_in_place() {
        let mut s = stack(4);
        push(&mut s, 1);
        s.top_slot_mut().unwrap()[0] += 10;
        assert_eq!(pop(&mut s), 11);
        assert!(s.top_slot_mut().is_none());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn len_tracks_head_index(
                capacity in 1usize..6,
                pushes in proptest::collection::vec(any::<bool>(), 0..80),
            ) {
                let mut s = stack(capacity);
                for (i, is_push) in pushes.into_iter().enumerate() {
                    if is_push {
                        push(&mut s, i as u32);
                    } else {
                        s.discard();
                    }
                    match s.top() {
                        Top::Empty => {
                            prop_assert_eq!(s.len(), 0);
                            prop_assert_eq!(s.active_chunk_count(), 0);
                        }
                        Top::At(index) => prop_assert_eq!(
                            s.len(),
                            (s.active_chunk_count() - 1) * capacity + index + 1
                        ),
                    }
                }
            }
        }
    }
}
