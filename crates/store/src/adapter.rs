//! Store capability interface
//!
//! Both backends implement [`KvStore`]. The driver is generic over it and
//! never knows which backend it is replaying against.

use kvdiff_core::{Key, Operation, Result, StoreSnapshot, Value};

/// Capability set shared by the reference and candidate backends
///
/// Every method returns `Result` because a candidate backend can fail at any
/// point (its process may die between two writes). The reference backend
/// never returns an error.
///
/// A store has an explicit lifecycle: it is created fresh by a
/// [`StoreLauncher`], mutated through the methods below, and released by
/// exactly one of [`KvStore::finish`] or [`KvStore::abort`].
pub trait KvStore {
    /// Upsert `key` to `value`
    fn put(&mut self, key: Key, value: Value) -> Result<()>;

    /// Read `key`; `None` if absent
    fn get(&mut self, key: Key) -> Result<Option<Value>>;

    /// Add one to `key`, wrapping at `u32::MAX`
    ///
    /// An absent key counts as 0, so the first increment stores 1.
    fn increment(&mut self, key: Key) -> Result<()>;

    /// Remove `key`; a no-op if absent
    fn delete(&mut self, key: Key) -> Result<()>;

    /// Remove every key
    fn clear(&mut self) -> Result<()>;

    /// Storage reorganization hint; must not change the logical mapping
    fn compact(&mut self) -> Result<()>;

    /// Dispatch one operation
    ///
    /// Returns `Some(result)` for `Lookup` and `None` for everything else.
    fn apply(&mut self, op: &Operation) -> Result<Option<Option<Value>>> {
        match *op {
            Operation::Put { key, value } => self.put(key, value).map(|_| None),
            Operation::Lookup { key } => self.get(key).map(Some),
            Operation::Increment { key } => self.increment(key).map(|_| None),
            Operation::Delete { key } => self.delete(key).map(|_| None),
            Operation::Clear => self.clear().map(|_| None),
            Operation::Compact => self.compact().map(|_| None),
        }
    }

    /// Release the store and return its final full mapping
    fn finish(self) -> Result<StoreSnapshot>
    where
        Self: Sized;

    /// Release the store without collecting a snapshot
    ///
    /// Called on every error path.
    fn abort(self)
    where
        Self: Sized,
    {
    }
}

/// Creates a fresh store per run
///
/// Selecting a launcher is how a run is configured to use one backend or the
/// other.
pub trait StoreLauncher {
    /// Store type produced
    type Store: KvStore;

    /// Create a fresh, empty store
    fn launch(&self) -> Result<Self::Store>;

    /// Short description for logs and reports
    fn describe(&self) -> String;
}
