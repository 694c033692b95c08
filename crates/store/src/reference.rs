//! Reference backend
//!
//! Ground truth for every comparison. Kept as a direct map with no batching,
//! caching, or concurrency.

use std::collections::HashMap;

use kvdiff_core::{Key, Result, StoreSnapshot, Value};

use crate::adapter::{KvStore, StoreLauncher};

/// In-memory reference store
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    entries: HashMap<Key, Value>,
}

impl ReferenceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mapping, without releasing the store
    pub fn snapshot(&self) -> StoreSnapshot {
        self.entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Number of keys present
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for ReferenceStore {
    fn put(&mut self, key: Key, value: Value) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn get(&mut self, key: Key) -> Result<Option<Value>> {
        Ok(self.entries.get(&key).copied())
    }

    fn increment(&mut self, key: Key) -> Result<()> {
        let slot = self.entries.entry(key).or_insert(0);
        *slot = slot.wrapping_add(1);
        Ok(())
    }

    fn delete(&mut self, key: Key) -> Result<()> {
        self.entries.remove(&key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn compact(&mut self) -> Result<()> {
        Ok(())
    }

    fn finish(self) -> Result<StoreSnapshot> {
        Ok(self.snapshot())
    }
}

/// Launches fresh [`ReferenceStore`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceLauncher;

impl StoreLauncher for ReferenceLauncher {
    type Store = ReferenceStore;

    fn launch(&self) -> Result<ReferenceStore> {
        Ok(ReferenceStore::new())
    }

    fn describe(&self) -> String {
        "reference".to_string()
    }
}
