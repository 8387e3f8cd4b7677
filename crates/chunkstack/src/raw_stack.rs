//! Type-erased stack of fixed-size byte records.
//!
//! [`RawStack`] stores each element as an opaque region of exactly
//! `elem_size` bytes. It performs no interpretation and gives no alignment
//! guarantee for the regions it hands out; callers copy bytes in and out.

use std::fmt;

use crate::config::StackConfig;
use crate::error::StackError;
use crate::stack::SlotStack;

/// A LIFO stack of `elem_size`-byte records stored in recycled chunks.
///
/// Growing the stack never moves existing elements: when the current chunk
/// is full, a drained chunk is taken from the free list, or a new one is
/// allocated if none is waiting. Chunks are returned to the allocator only
/// when the stack is dropped.
///
/// # Panics
///
/// Reading or removing from an empty stack, and passing a buffer whose
/// length differs from [`elem_size`](Self::elem_size), are caller errors
/// and panic. Check [`is_empty`](Self::is_empty) before popping.
///
/// # Example
///
/// ```
/// use chunkstack::RawStack;
///
/// let mut stack = RawStack::new(4, 2).unwrap();
/// for v in [1u32, 2, 3] {
///     stack.push(&v.to_ne_bytes());
/// }
/// let mut out = [0u8; 4];
/// stack.pop(&mut out);
/// assert_eq!(u32::from_ne_bytes(out), 3);
/// assert_eq!(stack.len(), 2);
/// ```
pub struct RawStack {
    inner: SlotStack<u8>,
    elem_size: usize,
}

impl RawStack {
    /// Create a stack of `elem_size`-byte elements, `chunk_capacity` per chunk.
    pub fn new(elem_size: usize, chunk_capacity: usize) -> Result<Self, StackError> {
        Self::from_config(StackConfig::new(elem_size).with_chunk_capacity(chunk_capacity))
    }

    /// Create a stack using [`StackConfig::DEFAULT_CHUNK_CAPACITY`].
    pub fn with_default_capacity(elem_size: usize) -> Result<Self, StackError> {
        Self::from_config(StackConfig::new(elem_size))
    }

    /// Create a stack from a full config.
    pub fn from_config(config: StackConfig) -> Result<Self, StackError> {
        config.validate()?;
        Ok(Self {
            inner: SlotStack::new(config.elem_size, config.chunk_capacity, 0, config.label),
            elem_size: config.elem_size,
        })
    }

    /// Reserve space for a new top element and return it for writing.
    ///
    /// The region is exactly [`elem_size`](Self::elem_size) bytes and may
    /// hold bytes of a previously removed element.
    pub fn push_reserve(&mut self) -> &mut [u8] {
        self.inner.push_slot()
    }

    /// Push a copy of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != self.elem_size()`.
    pub fn push(&mut self, src: &[u8]) {
        self.check_len("push", src.len());
        self.inner.push_slot().copy_from_slice(src);
    }

    /// Copy the top element into `dst` and remove it.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty or `dst.len() != self.elem_size()`.
    pub fn pop(&mut self, dst: &mut [u8]) {
        self.check_len("pop", dst.len());
        match self.inner.top_slot() {
            Some(slot) => dst.copy_from_slice(slot),
            None => empty_stack("pop"),
        }
        self.inner.discard();
    }

    /// The top element.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn peek(&self) -> &[u8] {
        match self.inner.top_slot() {
            Some(slot) => slot,
            None => empty_stack("peek"),
        }
    }

    /// Mutable access to the top element.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn peek_mut(&mut self) -> &mut [u8] {
        match self.inner.top_slot_mut() {
            Some(slot) => slot,
            None => empty_stack("peek_mut"),
        }
    }

    /// Remove the top element without reading it.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn discard(&mut self) {
        if !self.inner.discard() {
            empty_stack("discard");
        }
    }

    /// Remove every element in O(1), keeping all chunks for reuse.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the stack holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Size of one element in bytes.
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Elements per chunk.
    pub fn chunk_capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Label attached to this stack's log events.
    pub fn label(&self) -> &'static str {
        self.inner.label()
    }

    /// Chunks allocated from the backing allocator over the stack's lifetime.
    pub fn chunk_count(&self) -> usize {
        self.inner.chunk_count()
    }

    /// Chunks currently holding live elements.
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

    fn check_len(&self, op: &str, len: usize) {
        assert_eq!(
            len, self.elem_size,
            "{op}: buffer is {len} bytes, elements are {} bytes",
            self.elem_size
        );
    }
}

impl fmt::Debug for RawStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStack")
            .field("label", &self.label())
            .field("elem_size", &self.elem_size)
            .field("chunk_capacity", &self.chunk_capacity())
            .field("len", &self.len())
            .field("chunks", &self.chunk_count())
            .finish()
    }
}

#[cold]
#[track_caller]
fn empty_stack(op: &str) -> ! {
    panic!("{op} on empty stack")
}
