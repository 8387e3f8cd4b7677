//! Fixed-capacity chunks and the index arena that recycles them.
//!
//! A [`ChunkPool`] owns every chunk a stack has ever allocated. Each chunk
//! sits on exactly one of two intrusive singly linked lists: the *active*
//! list (chunks holding live elements, newest first) or the *free* list
//! (drained chunks kept for reuse). Links are indices into the pool, so
//! moving a chunk between lists never touches its storage.

/// Index of a chunk within its [`ChunkPool`].
pub(crate) type ChunkId = usize;

/// A single contiguous block of `stride * capacity` storage units.
///
/// The storage length is fixed at allocation and never resized.
struct Chunk<U> {
    storage: Box<[U]>,
    /// Next chunk in whichever list currently holds this one.
    next: Option<ChunkId>,
}

/// Head, tail and length of one intrusive list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ChunkList {
    head: Option<ChunkId>,
    tail: Option<ChunkId>,
    len: usize,
}

impl ChunkList {
    fn push_front<U>(&mut self, chunks: &mut [Chunk<U>], id: ChunkId) {
        chunks[id].next = self.head;
        if self.tail.is_none() {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.len += 1;
    }

    fn pop_front<U>(&mut self, chunks: &mut [Chunk<U>]) -> Option<ChunkId> {
        let id = self.head?;
        self.head = chunks[id].next.take();
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(id)
    }

    /// Move every chunk of `other` onto the front of `self`, leaving `other` empty.
    fn splice_front<U>(&mut self, chunks: &mut [Chunk<U>], other: &mut ChunkList) {
        let (Some(head), Some(tail)) = (other.head, other.tail) else {
            return;
        };
        chunks[tail].next = self.head;
        if self.tail.is_none() {
            self.tail = Some(tail);
        }
        self.head = Some(head);
        self.len += other.len;
        *other = ChunkList::default();
    }
}

/// Index arena of chunks with active/free membership lists.
///
/// Chunks are allocated lazily by [`acquire`](Self::acquire) and released
/// to the allocator only when the pool is dropped.
pub(crate) struct ChunkPool<U> {
    chunks: Vec<Chunk<U>>,
    active: ChunkList,
    free: ChunkList,
    /// Storage units per slot.
    stride: usize,
    /// Slots per chunk.
    capacity: usize,
    /// Initial value for freshly allocated storage.
    fill: U,
}

impl<U: Copy> ChunkPool<U> {
    /// Create an empty pool. No chunk is allocated until the first `acquire`.
    pub(crate) fn new(stride: usize, capacity: usize, fill: U) -> Self {
        Self {
            chunks: Vec::new(),
            active: ChunkList::default(),
            free: ChunkList::default(),
            stride,
            capacity,
            fill,
        }
    }

    /// Make a chunk the new active head.
    ///
    /// Reuses the front of the free list when possible and only falls back
    /// to the allocator when it is empty. Returns `true` if the chunk was
    /// recycled.
    pub(crate) fn acquire(&mut self) -> bool {
        let (id, recycled) = match self.free.pop_front(&mut self.chunks) {
            Some(id) => (id, true),
            None => {
                let id = self.chunks.len();
                self.chunks.push(Chunk {
                    storage: vec![self.fill; self.stride * self.capacity].into_boxed_slice(),
                    next: None,
                });
                (id, false)
            }
        };
        self.active.push_front(&mut self.chunks, id);
        recycled
    }
}

impl<U> ChunkPool<U> {
    /// The slot at `index` within the active head, if there is one.
    pub(crate) fn head_slot(&self, index: usize) -> Option<&[U]> {
        let id = self.active.head?;
        let start = index * self.stride;
        Some(&self.chunks[id].storage[start..start + self.stride])
    }

    /// Mutable access to the slot at `index` within the active head.
    pub(crate) fn head_slot_mut(&mut self, index: usize) -> Option<&mut [U]> {
        let id = self.active.head?;
        let start = index * self.stride;
        Some(&mut self.chunks[id].storage[start..start + self.stride])
    }

    /// Whether any chunk is on the active list.
    pub(crate) fn has_active(&self) -> bool {
        self.active.head.is_some()
    }

    /// Slots per chunk.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total chunks ever allocated from the backing allocator.
    pub(crate) fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunks currently holding live elements.
    pub(crate) fn active_chunk_count(&self) -> usize {
        self.active.len
    }

    /// Chunks waiting on the free list.
    pub(crate) fn free_chunk_count(&self) -> usize {
        self.free.len
    }

    /// Bytes reserved across every chunk.
    pub(crate) fn memory_bytes(&self) -> usize {
        self.chunks.len() * self.stride * self.capacity * std::mem::size_of::<U>()
    }

    /// Move the active head onto the front of the free list.
    ///
    /// Returns `false` if there was no active chunk.
    pub(crate) fn retire_head(&mut self) -> bool {
        match self.active.pop_front(&mut self.chunks) {
            Some(id) => {
                self.free.push_front(&mut self.chunks, id);
                true
            }
            None => false,
        }
    }

    /// Splice the whole active list onto the front of the free list in O(1).
    ///
    /// Returns the number of chunks moved.
    pub(crate) fn retire_all(&mut self) -> usize {
        let moved = self.active.len;
        self.free.splice_front(&mut self.chunks, &mut self.active);
        moved
    }

    #[cfg(test)]
    fn walk(&self, list: &ChunkList) -> Vec<ChunkId> {
        let mut ids = Vec::new();
        let mut cursor = list.head;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.chunks[id].next;
        }
        ids
    }

    /// Chunk ids on the active list, head first.
    #[cfg(test)]
    pub(crate) fn active_ids(&self) -> Vec<ChunkId> {
        self.walk(&self.active)
    }

    /// Chunk ids on the free list, head first.
    #[cfg(test)]
    pub(crate) fn free_ids(&self) -> Vec<ChunkId> {
        self.walk(&self.free)
    }

    /// Check that every chunk is on exactly one list and the list
    /// bookkeeping matches the links.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let active = self.active_ids();
        let free = self.free_ids();
        assert_eq!(active.len(), self.active.len, "active length drifted");
        assert_eq!(free.len(), self.free.len, "free length drifted");
        assert_eq!(active.last().copied(), self.active.tail, "active tail drifted");
        assert_eq!(free.last().copied(), self.free.tail, "free tail drifted");

        let mut seen = vec![false; self.chunks.len()];
        for id in active.iter().chain(free.iter()) {
            assert!(!seen[*id], "chunk {id} reachable twice");
            seen[*id] = true;
        }
        assert!(seen.iter().all(|&s| s), "chunk lost from both lists");
    }
}
