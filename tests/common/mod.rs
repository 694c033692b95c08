//! Shared test utilities for the root integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use kvdiff::kvdiff_core::{Key, KeySet, Operation, Result, RunResult, StoreSnapshot, Value};
use kvdiff::kvdiff_driver::replay;
use kvdiff::kvdiff_store::{KvStore, ReferenceStore, StoreLauncher};

// ============================================================================
// Initialization
// ============================================================================

/// Route tracing output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Run `f` on a helper thread, returning `None` if it does not finish in time.
pub fn with_timeout<F, T>(timeout: Duration, f: F) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = f();
        let _ = tx.send(result);
    });
    rx.recv_timeout(timeout).ok()
}

// ============================================================================
// Replay helpers
// ============================================================================

/// Replay `ops` through a fresh reference store.
pub fn reference_run(ops: &[Operation]) -> RunResult {
    replay(ReferenceStore::new(), ops).expect("reference replay never fails")
}

/// Apply `ops` to `store`, discarding lookup results.
pub fn apply_all<S: KvStore>(store: &mut S, ops: &[Operation]) {
    for op in ops {
        store.apply(op).expect("apply");
    }
}

// ============================================================================
// Flawed in-memory candidates
// ============================================================================

/// One way an in-memory candidate can be wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flaw {
    /// Increment of an absent key stores 0
    IncrementFromZero,
    /// Delete does nothing
    IgnoreDelete,
    /// Compact drops the smallest key
    CompactDropsKey,
    /// Clear keeps key 0
    ClearKeepsZero,
}

/// Reference store with one deliberate flaw
pub struct FlawedStore {
    inner: ReferenceStore,
    flaw: Flaw,
}

impl KvStore for FlawedStore {
    fn put(&mut self, key: Key, value: Value) -> Result<()> {
        self.inner.put(key, value)
    }

    fn get(&mut self, key: Key) -> Result<Option<Value>> {
        self.inner.get(key)
    }

    fn increment(&mut self, key: Key) -> Result<()> {
        if self.flaw == Flaw::IncrementFromZero && self.inner.get(key)?.is_none() {
            return self.inner.put(key, 0);
        }
        self.inner.increment(key)
    }

    fn delete(&mut self, key: Key) -> Result<()> {
        if self.flaw == Flaw::IgnoreDelete {
            return Ok(());
        }
        self.inner.delete(key)
    }

    fn clear(&mut self) -> Result<()> {
        let kept = match self.flaw {
            Flaw::ClearKeepsZero => self.inner.get(0)?,
            _ => None,
        };
        self.inner.clear()?;
        if let Some(value) = kept {
            self.inner.put(0, value)?;
        }
        Ok(())
    }

    fn compact(&mut self) -> Result<()> {
        if self.flaw == Flaw::CompactDropsKey {
            if let Some((smallest, _)) = self.inner.snapshot().iter().next() {
                self.inner.delete(smallest)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<StoreSnapshot> {
        self.inner.finish()
    }
}

/// Launches [`FlawedStore`]s
pub struct FlawedLauncher(pub Flaw);

impl StoreLauncher for FlawedLauncher {
    type Store = FlawedStore;

    fn launch(&self) -> Result<FlawedStore> {
        Ok(FlawedStore {
            inner: ReferenceStore::new(),
            flaw: self.0,
        })
    }

    fn describe(&self) -> String {
        format!("flawed({:?})", self.0)
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Non-empty KeySets of up to 40 arbitrary keys.
pub fn keyset_strategy() -> impl Strategy<Value = KeySet> {
    proptest::collection::hash_set(any::<u32>(), 1..40)
        .prop_map(|keys| KeySet::new("prop", keys.into_iter().collect()).unwrap())
}

/// Any operation over keys `0..16`, with values near the wrap point included.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    let key = 0u32..16;
    let value = prop_oneof![any::<u32>(), (u32::MAX - 2)..=u32::MAX];
    prop_oneof![
        4 => (key.clone(), value).prop_map(|(key, value)| Operation::Put { key, value }),
        3 => key.clone().prop_map(|key| Operation::Lookup { key }),
        3 => key.clone().prop_map(|key| Operation::Increment { key }),
        2 => key.prop_map(|key| Operation::Delete { key }),
        1 => Just(Operation::Clear),
        1 => Just(Operation::Compact),
    ]
}

/// Sequences of up to 64 operations.
pub fn sequence_strategy() -> impl Strategy<Value = Vec<Operation>> {
    proptest::collection::vec(operation_strategy(), 0..64)
}
