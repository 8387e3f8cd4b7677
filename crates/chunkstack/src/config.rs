//! Stack configuration parameters.

use crate::error::StackError;

/// Configuration for a [`RawStack`](crate::RawStack).
///
/// Controls element size, chunk sizing, and the label attached to log
/// events. Validated at construction; all values are immutable after the
/// stack is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackConfig {
    /// Size of one element in bytes. Must be non-zero.
    pub elem_size: usize,

    /// Number of elements held by each chunk.
    ///
    /// Default: 65_536. Must be non-zero. Each chunk reserves
    /// `elem_size * chunk_capacity` bytes up front.
    pub chunk_capacity: usize,

    /// Short name attached to every log event emitted by the stack.
    pub label: &'static str,
}

impl StackConfig {
    /// Default number of elements per chunk.
    pub const DEFAULT_CHUNK_CAPACITY: usize = 1 << 16;

    /// Label used when none is given.
    pub const DEFAULT_LABEL: &'static str = "chunkstack";

    /// Create a config for elements of `elem_size` bytes.
    ///
    /// Uses default values for all other parameters.
    pub fn new(elem_size: usize) -> Self {
        Self {
            elem_size,
            chunk_capacity: Self::DEFAULT_CHUNK_CAPACITY,
            label: Self::DEFAULT_LABEL,
        }
    }

    /// Set the number of elements per chunk.
    pub fn with_chunk_capacity(mut self, chunk_capacity: usize) -> Self {
        self.chunk_capacity = chunk_capacity;
        self
    }

    /// Set the label used in log events.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Size of a single chunk's storage in bytes, or `None` on overflow.
    pub fn chunk_bytes(&self) -> Option<usize> {
        self.elem_size.checked_mul(self.chunk_capacity)
    }

    /// Check that the config describes a usable stack.
    pub fn validate(&self) -> Result<(), StackError> {
        if self.elem_size == 0 {
            return Err(StackError::ZeroElementSize);
        }
        check_chunk_shape(self.elem_size, self.chunk_capacity)
    }
}

/// Reject a zero chunk capacity, or a chunk whose byte size overflows or
/// exceeds `isize::MAX`. A zero `elem_size` passes; callers that need
/// non-zero elements check that themselves.
pub(crate) fn check_chunk_shape(
    elem_size: usize,
    chunk_capacity: usize,
) -> Result<(), StackError> {
    if chunk_capacity == 0 {
        return Err(StackError::ZeroChunkCapacity);
    }
    match elem_size.checked_mul(chunk_capacity) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
        _ => Err(StackError::ChunkTooLarge {
            elem_size,
            chunk_capacity,
        }),
    }
}
