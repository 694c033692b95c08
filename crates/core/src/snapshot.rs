//! End-of-run observations
//!
//! A [`StoreSnapshot`] is the full key→value mapping a backend reports when a
//! run ends. A [`RunResult`] pairs it with every lookup result, in issue order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HarnessError, Result};
use crate::types::{Key, Value};

/// Full key→value mapping observed at end of run
///
/// Backed by an ordered map, so equality ignores the order in which a
/// backend reported its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    entries: BTreeMap<Key, Value>,
}

impl StoreSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from reported entries
    ///
    /// # Errors
    /// Returns `ProtocolViolation` if a key is reported twice.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Key, Value)>,
    {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            if let Some(previous) = map.insert(key, value) {
                return Err(HarnessError::protocol(
                    "final dump",
                    format!("duplicate key {} ({} and {})", key, previous, value),
                ));
            }
        }
        Ok(StoreSnapshot { entries: map })
    }

    /// Value for `key`, if present
    pub fn get(&self, key: Key) -> Option<Value> {
        self.entries.get(&key).copied()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (Key, Value)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Compare this (expected) snapshot against `actual`
    ///
    /// Returns one mismatch per differing, missing, or unexpected key, in key
    /// order.
    pub fn diff(&self, actual: &StoreSnapshot) -> Vec<StateMismatch> {
        let mut mismatches = Vec::new();

        for (key, expected_value) in &self.entries {
            match actual.entries.get(key) {
                Some(actual_value) if actual_value == expected_value => {}
                Some(actual_value) => mismatches.push(StateMismatch {
                    entity: format!("key:{}", key),
                    expected: expected_value.to_string(),
                    actual: actual_value.to_string(),
                }),
                None => mismatches.push(StateMismatch {
                    entity: format!("key:{}", key),
                    expected: expected_value.to_string(),
                    actual: "not found".to_string(),
                }),
            }
        }

        for (key, actual_value) in &actual.entries {
            if !self.entries.contains_key(key) {
                mismatches.push(StateMismatch {
                    entity: format!("key:{}", key),
                    expected: "not present".to_string(),
                    actual: actual_value.to_string(),
                });
            }
        }

        mismatches.sort_by_key(|m| entity_key(&m.entity));
        mismatches
    }
}

fn entity_key(entity: &str) -> Option<Key> {
    entity.strip_prefix("key:")?.parse().ok()
}

impl FromIterator<(Key, Value)> for StoreSnapshot {
    /// Later entries win; use [`StoreSnapshot::from_entries`] for untrusted input.
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        StoreSnapshot {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for StoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Everything a backend observably produced for one replayed sequence
///
/// Two results are equal iff both the ordered lookup results and the final
/// snapshot are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Result of every lookup, in issue order
    pub lookups: Vec<Option<Value>>,
    /// Final mapping
    pub snapshot: StoreSnapshot,
}

impl RunResult {
    /// Create a run result
    pub fn new(lookups: Vec<Option<Value>>, snapshot: StoreSnapshot) -> Self {
        RunResult { lookups, snapshot }
    }
}

/// Single difference between an expected and an actual snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMismatch {
    /// Entity identifier (e.g., "key:42")
    pub entity: String,
    /// Expected value
    pub expected: String,
    /// Actual value
    pub actual: String,
}

impl fmt::Display for StateMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.entity, self.expected, self.actual
        )
    }
}
