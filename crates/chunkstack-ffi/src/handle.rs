//! Slot+generation table mapping opaque `u64` handles to owned stacks.
//!
//! Destroyed handles carry a stale generation and resolve to `None`, so a
//! C caller reusing a dead handle gets `InvalidHandle` instead of UB.

/// Upper 32 bits: slot index. Lower 32 bits: generation.
fn encode(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    /// `generation` is the one the next occupant will receive.
    Vacant { generation: u32, next_free: Option<u32> },
    /// Generation space exhausted; never handed out again.
    Retired,
}

/// Handle table with an intrusive free list threaded through vacant slots.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    /// Create an empty table. `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Store `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        self.live += 1;
        if let Some(slot) = self.free_head {
            let entry = &mut self.entries[slot as usize];
            let Entry::Vacant {
                generation,
                next_free,
            } = *entry
            else {
                unreachable!("free list points at a non-vacant slot");
            };
            self.free_head = next_free;
            *entry = Entry::Occupied { generation, value };
            return encode(slot, generation);
        }
        let slot = u32::try_from(self.entries.len()).expect("handle table exhausted u32 slots");
        self.entries.push(Entry::Occupied {
            generation: 0,
            value,
        });
        encode(slot, 0)
    }

    /// Shared access to the value behind `handle`, if it is live.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (slot, gen) = decode(handle);
        match self.entries.get(slot as usize)? {
            Entry::Occupied { generation, value } if *generation == gen => Some(value),
            _ => None,
        }
    }

    /// Mutable access to the value behind `handle`, if it is live.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (slot, gen) = decode(handle);
        match self.entries.get_mut(slot as usize)? {
            Entry::Occupied { generation, value } if *generation == gen => Some(value),
            _ => None,
        }
    }

    /// Remove and return the value behind `handle`.
    ///
    /// The slot's generation advances so the old handle goes stale. A slot
    /// whose generation would wrap is retired rather than recycled.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, gen) = decode(handle);
        let entry = self.entries.get_mut(slot as usize)?;
        if !matches!(entry, Entry::Occupied { generation, .. } if *generation == gen) {
            return None;
        }
        let replacement = match gen.checked_add(1) {
            Some(next) => {
                let vacant = Entry::Vacant {
                    generation: next,
                    next_free: self.free_head,
                };
                self.free_head = Some(slot);
                vacant
            }
            None => Entry::Retired,
        };
        self.live -= 1;
        match std::mem::replace(entry, replacement) {
            Entry::Occupied { value, .. } => Some(value),
            _ => unreachable!("checked occupied above"),
        }
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_round_trip() {
        let mut table = HandleTable::new();
        let h = table.insert("a");
        assert_eq!(table.get(h), Some(&"a"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_mut_modifies_value() {
        let mut table = HandleTable::new();
        let h = table.insert(vec![1u8]);
        table.get_mut(h).unwrap().push(2);
        assert_eq!(table.get(h), Some(&vec![1, 2]));
    }

    #[test]
    fn removed_handle_goes_stale() {
        let mut table = HandleTable::new();
        let h = table.insert(5u32);
        assert_eq!(table.remove(h), Some(5));
        assert_eq!(table.get(h), None);
        assert_eq!(table.get_mut(h), None);
        assert_eq!(table.remove(h), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn vacant_slot_reused_with_new_generation() {
        let mut table = HandleTable::new();
        let h1 = table.insert(1u32);
        table.remove(h1);
        let h2 = table.insert(2u32);
        assert_eq!(decode(h1).0, decode(h2).0);
        assert_eq!(decode(h2).1, decode(h1).1 + 1);
        assert_eq!(table.get(h1), None);
        assert_eq!(table.get(h2), Some(&2));
    }

    #[test]
    fn free_list_is_lifo() {
        let mut table = HandleTable::new();
        let a = table.insert(0u32);
        let b = table.insert(1u32);
        table.remove(a);
        table.remove(b);
        assert_eq!(decode(table.insert(2)).0, decode(b).0);
        assert_eq!(decode(table.insert(3)).0, decode(a).0);
    }

    #[test]
    fn unknown_slot_returns_none() {
        let table: HandleTable<u32> = HandleTable::new();
        assert_eq!(table.get(encode(42, 0)), None);
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut table = HandleTable::new();
        table.insert(0u32);
        table.entries[0] = Entry::Occupied {
            generation: u32::MAX,
            value: 7,
        };
        let h = encode(0, u32::MAX);
        assert_eq!(table.remove(h), Some(7));
        assert!(matches!(table.entries[0], Entry::Retired));

        // Neither the old handle nor a wrapped generation resolve.
        assert_eq!(table.get(h), None);
        assert_eq!(table.get(encode(0, 0)), None);

        let fresh = table.insert(8);
        assert_ne!(decode(fresh).0, 0, "retired slot must not be reused");
    }
}
