//! Key universe types
//!
//! This module defines the foundational data types:
//! - Key: unsigned integer key
//! - Value: unsigned integer value
//! - KeySet: named, duplicate-free key universe for one scenario

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{HarnessError, Result};

/// Store key
///
/// The candidate contract parses keys as 32-bit unsigned decimals.
pub type Key = u32;

/// Store value
///
/// Absence is modeled as `Option<Value>::None`, never as a reserved value.
pub type Value = u32;

/// Fixed universe of keys for one test scenario
///
/// A KeySet is non-empty and duplicate-free. Its order is significant: the
/// workload generator picks keys by index, so two KeySets with the same keys
/// in a different order produce different workloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKeySet")]
pub struct KeySet {
    name: String,
    keys: Vec<Key>,
}

/// Unchecked wire form of a KeySet
#[derive(Deserialize)]
struct RawKeySet {
    name: String,
    keys: Vec<Key>,
}

impl TryFrom<RawKeySet> for KeySet {
    type Error = HarnessError;

    fn try_from(raw: RawKeySet) -> Result<Self> {
        KeySet::new(raw.name, raw.keys)
    }
}

impl KeySet {
    /// Create a named KeySet
    ///
    /// # Errors
    /// Returns `InvalidKeySet` if `keys` is empty or repeats a key.
    pub fn new(name: impl Into<String>, keys: Vec<Key>) -> Result<Self> {
        let name = name.into();
        if keys.is_empty() {
            return Err(HarnessError::InvalidKeySet {
                name,
                reason: "key set is empty".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(keys.len());
        for key in &keys {
            if !seen.insert(*key) {
                return Err(HarnessError::InvalidKeySet {
                    name,
                    reason: format!("duplicate key {}", key),
                });
            }
        }

        Ok(KeySet { name, keys })
    }

    /// Dense range `0..count`
    ///
    /// # Errors
    /// Returns `InvalidKeySet` if `count` is zero.
    pub fn dense(name: impl Into<String>, count: u32) -> Result<Self> {
        Self::new(name, (0..count).collect())
    }

    /// Scenario name used in reports
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys in generation order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys in the universe
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether `key` belongs to this universe
    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }
}

impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} keys)", self.name, self.keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyset_new() {
        let ks = KeySet::new("small", vec![3, 1, 2]).unwrap();
        assert_eq!(ks.name(), "small");
        assert_eq!(ks.keys(), &[3, 1, 2]);
        assert_eq!(ks.len(), 3);
        assert!(!ks.is_empty());
        assert!(ks.contains(1));
        assert!(!ks.contains(4));
    }

    #[test]
    fn test_keyset_rejects_empty() {
        let err = KeySet::new("empty", vec![]).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidKeySet { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_keyset_rejects_duplicates() {
        let err = KeySet::new("dups", vec![7, 8, 7]).unwrap_err();
        match err {
            HarnessError::InvalidKeySet { name, reason } => {
                assert_eq!(name, "dups");
                assert!(reason.contains('7'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_keyset_dense() {
        let ks = KeySet::dense("dense-4", 4).unwrap();
        assert_eq!(ks.keys(), &[0, 1, 2, 3]);
        assert!(KeySet::dense("none", 0).is_err());
    }

    #[test]
    fn test_keyset_display() {
        let ks = KeySet::dense("dense-10", 10).unwrap();
        assert_eq!(ks.to_string(), "dense-10 (10 keys)");
    }

    #[test]
    fn test_keyset_deserialize_is_validated() {
        let ks: KeySet = serde_json::from_str(r#"{"name":"x","keys":[5,1]}"#).unwrap();
        assert_eq!(ks, KeySet::new("x", vec![5, 1]).unwrap());

        let err = serde_json::from_str::<KeySet>(r#"{"name":"x","keys":[]}"#).unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(serde_json::from_str::<KeySet>(r#"{"name":"x","keys":[2,2]}"#).is_err());
    }
}
