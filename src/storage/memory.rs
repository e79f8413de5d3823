//! In-memory storage backend for testing and embedding.

use crate::error::{Error, Result};
use crate::storage::traits::{Slot, SlotStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<HashMap<Slot, String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryBackend {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| Error::unavailable("memory store lock poisoned"))?;
        Ok(slots.get(&slot).cloned())
    }

    fn write(&self, slot: Slot, json: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| Error::unavailable("memory store lock poisoned"))?;
        slots.insert(slot, json.to_string());
        Ok(())
    }

    fn remove(&self, slot: Slot) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| Error::unavailable("memory store lock poisoned"))?;
        slots.remove(&slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::{load_slot, save_slot};

    #[test]
    fn read_missing_slot() {
        let store = MemoryBackend::new();
        assert!(store.read(Slot::Messages).unwrap().is_none());
    }

    #[test]
    fn write_and_read_slot() {
        let store = MemoryBackend::new();
        store.write(Slot::Settings, r#"{"theme":"dark"}"#).unwrap();

        let json = store.read(Slot::Settings).unwrap().unwrap();
        assert_eq!(json, r#"{"theme":"dark"}"#);
        assert!(store.read(Slot::Visitors).unwrap().is_none());
    }

    #[test]
    fn remove_slot() {
        let store = MemoryBackend::new();
        store.write(Slot::Visitors, "[]").unwrap();
        store.remove(Slot::Visitors).unwrap();
        assert!(store.read(Slot::Visitors).unwrap().is_none());
    }

    #[test]
    fn remove_missing_slot_succeeds() {
        let store = MemoryBackend::new();
        store.remove(Slot::Messages).unwrap();
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryBackend::new();
        save_slot(&store, Slot::Messages, &vec![1, 2, 3]).unwrap();

        let loaded: Option<Vec<u32>> = load_slot(&store, Slot::Messages).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn typed_load_rejects_wrong_shape() {
        let store = MemoryBackend::new();
        store.write(Slot::Messages, r#"{"not":"a list"}"#).unwrap();

        let result: Result<Option<Vec<u32>>> = load_slot(&store, Slot::Messages);
        assert!(matches!(result, Err(Error::Serde(_))));
    }

    #[test]
    fn concurrent_writes_to_distinct_slots() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryBackend::new());

        let handles: Vec<_> = Slot::ALL
            .into_iter()
            .map(|slot| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        store.write(slot, &i.to_string()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        for slot in Slot::ALL {
            assert_eq!(store.read(slot).unwrap().as_deref(), Some("49"));
        }
    }
}
