//! Stack construction errors.

use std::error::Error;
use std::fmt;

/// Errors reported when a stack cannot be constructed from its parameters.
///
/// Operations on a live stack never return errors: misuse such as popping
/// an empty stack is a documented panic, and allocation failure aborts via
/// the global allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackError {
    /// Element size of zero bytes.
    ZeroElementSize,
    /// Chunk capacity of zero elements.
    ZeroChunkCapacity,
    /// A single chunk would exceed the largest allocation Rust permits.
    ChunkTooLarge {
        /// Requested element size in bytes.
        elem_size: usize,
        /// Requested elements per chunk.
        chunk_capacity: usize,
    },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroElementSize => write!(f, "element size must be non-zero"),
            Self::ZeroChunkCapacity => write!(f, "chunk capacity must be non-zero"),
            Self::ChunkTooLarge {
                elem_size,
                chunk_capacity,
            } => {
                write!(
                    f,
                    "chunk too large: {chunk_capacity} elements of {elem_size} bytes"
                )
            }
        }
    }
}

impl Error for StackError {}
