//! Statically typed chunked stack.

use std::fmt;
use std::mem::MaybeUninit;

use crate::config::{check_chunk_shape, StackConfig};
use crate::error::StackError;
use crate::raw::read_slot;
use crate::stack::SlotStack;

/// A LIFO stack of `T` values stored in recycled chunks.
///
/// The typed counterpart of [`RawStack`](crate::RawStack): one slot per
/// value, no byte copies at the call site. `T: Copy` keeps `clear` O(1),
/// since removed values never need dropping.
///
/// ```
/// use chunkstack::Stack;
///
/// let mut stack: Stack<(u16, u16)> = Stack::with_chunk_capacity(2).unwrap();
/// stack.extend([(0, 0), (0, 1), (1, 1)]);
/// assert_eq!(stack.pop(), Some((1, 1)));
/// assert_eq!(stack.peek(), Some((0, 1)));
/// assert_eq!(stack.len(), 2);
/// ```
pub struct Stack<T: Copy> {
    inner: SlotStack<MaybeUninit<T>>,
}

impl<T: Copy> Stack<T> {
    /// Create an empty stack with [`StackConfig::DEFAULT_CHUNK_CAPACITY`]
    /// values per chunk.
    ///
    /// # Panics
    ///
    /// Panics if a default-sized chunk of `T` would exceed `isize::MAX`
    /// bytes. Use [`with_chunk_capacity`](Self::with_chunk_capacity) for
    /// very large `T`.
    pub fn new() -> Self {
        match Self::with_chunk_capacity(StackConfig::DEFAULT_CHUNK_CAPACITY) {
            Ok(stack) => stack,
            Err(e) => panic!("Stack::new: {e}"),
        }
    }

    /// Create an empty stack holding `chunk_capacity` values per chunk.
    pub fn with_chunk_capacity(chunk_capacity: usize) -> Result<Self, StackError> {
        check_chunk_shape(std::mem::size_of::<T>(), chunk_capacity)?;
        Ok(Self {
            inner: Self::slots(chunk_capacity),
        })
    }

    fn slots(chunk_capacity: usize) -> SlotStack<MaybeUninit<T>> {
        SlotStack::new(
            1,
            chunk_capacity,
            MaybeUninit::uninit(),
            std::any::type_name::<T>(),
        )
    }

    /// Push a value.
    pub fn push(&mut self, value: T) {
        self.inner.push_slot()[0] = MaybeUninit::new(value);
    }

    /// Remove and return the top value, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        let value = self.peek()?;
        self.inner.discard();
        Some(value)
    }

    /// Copy of the top value, or `None` if empty.
    #[allow(unsafe_code)]
    pub fn peek(&self) -> Option<T> {
        let slot = self.inner.top_slot()?;
        // SAFETY: the top slot was written by the `push` that created it.
        Some(unsafe { read_slot(&slot[0]) })
    }

    /// Remove the top value without reading it. Returns `false` if empty.
    pub fn discard(&mut self) -> bool {
        self.inner.discard()
    }

    /// Remove every value in O(1), keeping all chunks for reuse.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the stack holds no values.
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Values per chunk.
    pub fn chunk_capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Chunks allocated from the backing allocator over the stack's lifetime.
    pub fn chunk_count(&self) -> usize {
        self.inner.chunk_count()
    }

    /// Chunks currently holding live values.
    pub fn active_chunk_count(&self) -> usize {
        self.inner.active_chunk_count()
    }

    /// Drained chunks held for reuse.
    pub fn free_chunk_count(&self) -> usize {
        self.inner.free_chunk_count()
    }

    /// Bytes reserved across every chunk, live or free.
    pub fn memory_bytes(&self) -> usize {
        self.inner.memory_bytes()
    }
}

impl<T: Copy> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Copy> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("type", &std::any::type_name::<T>())
            .field("chunk_capacity", &self.chunk_capacity())
            .field("len", &self.len())
            .field("chunks", &self.chunk_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Frame {
        node: u32,
        depth: u8,
        weight: f64,
    }

    #[test]
    fn pop_returns_values_in_reverse_order() {
        let mut s = Stack::with_chunk_capacity(3).unwrap();
        s.extend(0u64..10);
        let drained: Vec<u64> = std::iter::from_fn(|| s.pop()).collect();
        assert_eq!(drained, (0..10).rev().collect::<Vec<_>>());
        assert!(s.is_empty());
        assert_eq!(s.pop(), None);
        assert_eq!(s.peek(), None);
    }

    #[test]
    fn padded_structs_round_trip() {
        let mut s = Stack::with_chunk_capacity(2).unwrap();
        let frames: Vec<Frame> = (0..5)
            .map(|i| Frame {
                node: i,
                depth: i as u8 * 3,
                weight: f64::from(i) * 0.5,
            })
            .collect();
        s.extend(frames.iter().copied());
        for expected in frames.iter().rev() {
            assert_eq!(s.pop().as_ref(), Some(expected));
        }
    }

    #[test]
    fn discard_reports_emptiness() {
        let mut s: Stack<i32> = Stack::with_chunk_capacity(1).unwrap();
        s.push(1);
        assert!(s.discard());
        assert!(!s.discard());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn zero_sized_values_are_counted() {
        let mut s: Stack<()> = Stack::with_chunk_capacity(4).unwrap();
        for _ in 0..9 {
            s.push(());
        }
        assert_eq!(s.len(), 9);
        assert_eq!(s.active_chunk_count(), 3);
        assert_eq!(s.memory_bytes(), 0);
        assert_eq!(s.pop(), Some(()));
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            Stack::<u8>::with_chunk_capacity(0).unwrap_err(),
            StackError::ZeroChunkCapacity
        );
    }

    #[test]
    fn oversized_chunk_rejected() {
        assert!(matches!(
            Stack::<[u8; 1024]>::with_chunk_capacity(usize::MAX / 512),
            Err(StackError::ChunkTooLarge { elem_size: 1024, .. })
        ));
    }

    #[test]
    fn clear_keeps_chunks_for_refill() {
        let mut s = Stack::with_chunk_capacity(4).unwrap();
        s.extend(0u32..16);
        assert_eq!(s.chunk_count(), 4);
        s.clear();
        assert!(s.is_empty());
        s.extend(0u32..12);
        assert_eq!(s.chunk_count(), 4);
        assert_eq!(s.free_chunk_count(), 1);
        assert_eq!(s.peek(), Some(11));
    }

    #[test]
    fn default_uses_default_capacity() {
        let s: Stack<u8> = Stack::default();
        assert_eq!(s.chunk_capacity(), StackConfig::DEFAULT_CHUNK_CAPACITY);
        assert!(format!("{s:?}").contains("u8"));
    }

    #[test]
    fn new_matches_explicit_default_capacity() {
        let a: Stack<[u64; 4]> = Stack::new();
        let b = Stack::<[u64; 4]>::with_chunk_capacity(StackConfig::DEFAULT_CHUNK_CAPACITY)
            .unwrap();
        assert_eq!(a.chunk_capacity(), b.chunk_capacity());
        assert_eq!(a.memory_bytes(), 0);
    }
}
