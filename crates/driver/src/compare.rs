//! RunResult comparison
//!
//! Equality of two [`RunResult`]s is strict: same lookup results in the same
//! order, and the same final mapping. When they differ, [`compare`] explains
//! how, in enough detail to reproduce the failure.

use serde::Serialize;
use std::fmt;

use kvdiff_core::{RunResult, StateMismatch, Value};

/// First disagreement in the ordered lookup results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupDivergence {
    /// Position among lookups (not among all operations)
    pub index: usize,
    /// Reference result at `index`
    pub expected: String,
    /// Candidate result at `index`
    pub actual: String,
}

impl fmt::Display for LookupDivergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lookup #{}: expected {}, got {}",
            self.index, self.expected, self.actual
        )
    }
}

/// How a candidate's RunResult differs from the reference's
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    /// First diverging lookup, if any
    pub lookup: Option<LookupDivergence>,
    /// Every differing key in the final snapshots
    pub snapshot: Vec<StateMismatch>,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(lookup) = &self.lookup {
            parts.push(lookup.to_string());
        }
        if !self.snapshot.is_empty() {
            let keys: Vec<String> = self.snapshot.iter().map(|m| m.to_string()).collect();
            parts.push(format!("final snapshot: {}", keys.join("; ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

fn render(slot: Option<&Option<Value>>) -> String {
    match slot {
        Some(Some(value)) => value.to_string(),
        Some(None) => "None".to_string(),
        None => "no lookup".to_string(),
    }
}

/// Compare the reference result (`expected`) with the candidate's (`actual`)
///
/// Returns `None` iff the two are equal.
pub fn compare(expected: &RunResult, actual: &RunResult) -> Option<Divergence> {
    let longest = expected.lookups.len().max(actual.lookups.len());
    let lookup = (0..longest)
        .find(|&i| expected.lookups.get(i) != actual.lookups.get(i))
        .map(|index| LookupDivergence {
            index,
            expected: render(expected.lookups.get(index)),
            actual: render(actual.lookups.get(index)),
        });

    let snapshot = expected.snapshot.diff(&actual.snapshot);

    if lookup.is_none() && snapshot.is_empty() {
        None
    } else {
        Some(Divergence { lookup, snapshot })
    }
}
