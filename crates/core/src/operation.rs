//! Store operations
//!
//! An [`Operation`] is immutable once generated. A sequence of operations is
//! the unit replayed against a backend.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Key, Value};

/// One store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Upsert `key` to `value`
    Put {
        /// Key
        key: Key,
        /// Value
        value: Value,
    },
    /// Read `key`; the only operation that observes state
    Lookup {
        /// Key
        key: Key,
    },
    /// Add one to `key`, treating an absent key as 0
    Increment {
        /// Key
        key: Key,
    },
    /// Remove `key` if present
    Delete {
        /// Key
        key: Key,
    },
    /// Remove every key
    Clear,
    /// Storage reorganization hint; never changes the logical mapping
    Compact,
}

impl Operation {
    /// Key touched by this operation, if any
    pub fn key(&self) -> Option<Key> {
        match self {
            Operation::Put { key, .. }
            | Operation::Lookup { key }
            | Operation::Increment { key }
            | Operation::Delete { key } => Some(*key),
            Operation::Clear | Operation::Compact => None,
        }
    }

    /// Whether this operation produces a result
    pub fn is_lookup(&self) -> bool {
        matches!(self, Operation::Lookup { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Put { key, value } => write!(f, "put({}, {})", key, value),
            Operation::Lookup { key } => write!(f, "lookup({})", key),
            Operation::Increment { key } => write!(f, "increment({})", key),
            Operation::Delete { key } => write!(f, "delete({})", key),
            Operation::Clear => write!(f, "clear()"),
            Operation::Compact => write!(f, "compact()"),
        }
    }
}
