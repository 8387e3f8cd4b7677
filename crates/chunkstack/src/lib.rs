//! Chunked LIFO stack with recycled chunk storage.
//!
//! Built for work-lists with heavy push/pop churn and a depth that swings
//! widely over the stack's life. Elements live in fixed-capacity chunks, so
//! growth never copies existing elements, and drained chunks wait on a free
//! list instead of going back to the allocator.
//!
//! # Architecture
//!
//! ```text
//! RawStack (opaque elem_size-byte records)   Stack<T: Copy>
//! └── SlotStack<u8>                          └── SlotStack<MaybeUninit<T>>
//!     └── ChunkPool (Vec<Chunk> index arena)
//!         ├── active list: newest chunk first, top element in its head
//!         └── free list:   drained chunks waiting for reuse
//! ```
//!
//! # Ownership
//!
//! A stack has a single owner; there is no internal locking. Chunks move
//! between the two lists by index relinking and are freed only when the
//! stack is dropped.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod chunk;
pub mod config;
pub mod error;
mod raw;
pub mod raw_stack;
mod stack;
pub mod typed;

// Public re-exports for the primary API surface.
pub use config::StackConfig;
pub use error::StackError;
pub use raw_stack::RawStack;
pub use typed::Stack;
