//! Container handle registry.
//!
//! A [`DaHandle`](crate::array::DaHandle) packs a slot index with the
//! slot's generation. Destroying a container bumps the generation, so a
//! handle kept past `da_destroy` resolves to nothing rather than to a
//! container created later in the same slot. Generations start at 1 and a
//! slot is retired instead of wrapping to 0, which keeps handle `0` free
//! to mean "no container".

/// Upper 32 bits slot, lower 32 bits generation.
fn pack(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Entry<T> {
    generation: u32,
    container: Option<T>,
}

/// Live containers keyed by generation-checked handles.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Register a container. The returned handle is never 0.
    pub fn insert(&mut self, container: T) -> u64 {
        self.live += 1;
        match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.container = Some(container);
                pack(slot, entry.generation)
            }
            None => {
                let slot = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 1,
                    container: Some(container),
                });
                pack(slot, 1)
            }
        }
    }

    fn entry_mut(&mut self, handle: u64) -> Option<&mut Entry<T>> {
        let (slot, generation) = unpack(handle);
        self.entries
            .get_mut(slot as usize)
            .filter(|e| e.generation == generation)
    }

    /// The container behind `handle`, if it is still live.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        self.entry_mut(handle)?.container.as_mut()
    }

    /// Unregister and return the container. A second call with the same
    /// handle finds nothing.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, _) = unpack(handle);
        let entry = self.entry_mut(handle)?;
        let container = entry.container.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.vacant.push(slot);
        }
        self.live -= 1;
        Some(container)
    }

    /// Number of registered containers.
    pub fn live_count(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DA_NULL_HANDLE as NULL_HANDLE;

    #[test]
    fn first_handle_is_not_null() {
        let mut table = HandleTable::new();
        let h = table.insert('a');
        assert_ne!(h, NULL_HANDLE);
        assert_eq!(unpack(h), (0, 1));
    }

    #[test]
    fn null_handle_never_resolves() {
        let mut table = HandleTable::new();
        table.insert(1u8);
        assert_eq!(table.get_mut(NULL_HANDLE), None);
        assert_eq!(table.remove(NULL_HANDLE), None);
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn remove_returns_value_once() {
        let mut table = HandleTable::new();
        let h = table.insert(String::from("x"));
        assert_eq!(table.remove(h).as_deref(), Some("x"));
        assert_eq!(table.remove(h), None);
        assert_eq!(table.get_mut(h), None);
    }

    #[test]
    fn reused_slot_gets_fresh_generation() {
        let mut table = HandleTable::new();
        let h1 = table.insert(1i32);
        table.remove(h1);
        let h2 = table.insert(2i32);

        let (slot1, gen1) = unpack(h1);
        let (slot2, gen2) = unpack(h2);
        assert_eq!(slot1, slot2);
        assert_eq!(gen2, gen1 + 1);
        assert_eq!(table.get_mut(h1), None);
        assert_eq!(table.get_mut(h2), Some(&mut 2));
    }

    #[test]
    fn wrapped_generation_retires_slot() {
        let mut table = HandleTable::new();
        let h = table.insert(1i32);
        table.remove(h);

        table.entries[0].generation = u32::MAX;
        let h_last = table.insert(2i32);
        assert_eq!(unpack(h_last), (0, u32::MAX));

        table.remove(h_last);
        assert_eq!(table.entries[0].generation, 0);
        assert!(!table.vacant.contains(&0));

        let h_new = table.insert(3i32);
        assert_ne!(unpack(h_new).0, 0, "retired slot must not be reused");
        assert_eq!(table.get_mut(pack(0, 0)), None);
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn live_count_tracks_inserts_and_removes() {
        let mut table = HandleTable::new();
        let a = table.insert(());
        let _b = table.insert(());
        assert_eq!(table.live_count(), 2);
        table.remove(a);
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn stale_and_null_removes_leave_live_count_alone() {
        let mut table = HandleTable::new();
        let a = table.insert(1u8);
        let b = table.insert(2u8);
        table.remove(a);
        table.remove(a);
        table.remove(NULL_HANDLE);
        table.remove(pack(7, 1));
        assert_eq!(table.live_count(), 1);

        let c = table.insert(3u8);
        assert_eq!(unpack(c).0, unpack(a).0);
        assert_eq!(table.live_count(), 2);
        table.remove(b);
        table.remove(c);
        assert_eq!(table.live_count(), 0);
    }
}
