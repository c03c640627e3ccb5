use std::sync::{Arc, Mutex};

use gitflix_types::ObjectId;

/// Fixed-capacity blob cache keyed by commit id.
///
/// Insertion uses a circular slot pointer: the slot under the pointer is
/// overwritten (releasing whatever blob it held) and the pointer advances
/// modulo the capacity, giving FIFO eviction over insertion order. Lookup is
/// a linear scan — capacities are small (reference: 32 slots).
///
/// The cache is shared between the decode path and the prefetcher; all
/// mutation happens under one short-lived mutex.
pub struct BlobCache {
    inner: Mutex<Slots>,
}

struct Slots {
    entries: Vec<Option<(ObjectId, Arc<Vec<u8>>)>>,
    write_pos: usize,
}

impl BlobCache {
    /// Create a cache with the given number of slots (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Slots {
                entries: vec![None; capacity],
                write_pos: 0,
            }),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .entries
            .iter()
            .filter(|e| e.is_some())
            .count()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up cached blob bytes without touching the store.
    pub fn get(&self, id: &ObjectId) -> Option<Arc<Vec<u8>>> {
        let inner = self.inner.lock().expect("cache lock poisoned");
        inner
            .entries
            .iter()
            .flatten()
            .find(|(cached, _)| cached == id)
            .map(|(_, bytes)| Arc::clone(bytes))
    }

    /// Check containment without cloning.
    pub fn contains(&self, id: &ObjectId) -> bool {
        let inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.iter().flatten().any(|(cached, _)| cached == id)
    }

    /// Insert blob bytes, overwriting the slot under the circular pointer.
    pub fn put(&self, id: ObjectId, bytes: Arc<Vec<u8>>) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let pos = inner.write_pos;
        inner.entries[pos] = Some((id, bytes));
        inner.write_pos = (pos + 1) % inner.entries.len();
    }
}

impl std::fmt::Debug for BlobCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobCache")
            .field("capacity", &self.capacity())
            .field("occupied", &self.len())
            .finish()
    }
}
