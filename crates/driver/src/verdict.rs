//! Per-run verdicts
//!
//! Every (KeySet, seed) run ends in exactly one [`Verdict`]. A mismatch is the
//! harness's actual finding; an error means the run could not be completed
//! and says nothing about whether the candidate agrees with the reference.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

use kvdiff_core::{HarnessError, Key, KeySet, Operation, Result};

use crate::compare::Divergence;

/// Everything needed to reproduce a mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    /// Workload seed
    pub seed: u64,
    /// KeySet name
    pub keyset: String,
    /// Seed the KeySet catalog was built from, if the KeySet came from one
    pub catalog_seed: Option<u64>,
    /// KeySet keys in generation order
    pub keys: Vec<Key>,
    /// Workload loop count
    pub loop_count: usize,
    /// What differed
    pub divergence: Divergence,
    /// Position of the first diverging lookup in the operation sequence
    pub operation_index: Option<usize>,
    /// The first diverging lookup itself
    pub operation: Option<Operation>,
}

impl MismatchReport {
    /// Build a report, locating the diverging lookup within `ops`
    pub fn new(
        seed: u64,
        keys: &KeySet,
        loop_count: usize,
        divergence: Divergence,
        ops: &[Operation],
    ) -> Self {
        let located = divergence.lookup.as_ref().and_then(|lookup| {
            ops.iter()
                .enumerate()
                .filter(|(_, op)| op.is_lookup())
                .nth(lookup.index)
                .map(|(i, op)| (i, *op))
        });

        MismatchReport {
            seed,
            keyset: keys.name().to_string(),
            catalog_seed: None,
            keys: keys.keys().to_vec(),
            loop_count,
            divergence,
            operation_index: located.map(|(i, _)| i),
            operation: located.map(|(_, op)| op),
        }
    }

    /// Record the catalog seed the KeySet was built from
    pub fn with_catalog_seed(mut self, catalog_seed: Option<u64>) -> Self {
        self.catalog_seed = catalog_seed;
        self
    }

    /// Rebuild the diverging KeySet from the recorded keys
    pub fn rebuild_keyset(&self) -> Result<KeySet> {
        KeySet::new(self.keyset.clone(), self.keys.clone())
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seed {} on {} (", self.seed, self.keyset)?;
        if let Some(catalog_seed) = self.catalog_seed {
            write!(f, "catalog seed {}, ", catalog_seed)?;
        }
        write!(f, "{} loops): {}", self.loop_count, self.divergence)?;
        if let (Some(index), Some(op)) = (self.operation_index, &self.operation) {
            write!(f, " [operation #{}: {}]", index, op)?;
        }
        Ok(())
    }
}

/// Outcome of one comparison run
#[derive(Debug)]
pub enum Verdict {
    /// Both backends produced identical RunResults
    Pass,
    /// Both backends completed but disagreed
    Mismatch(MismatchReport),
    /// The run could not be completed
    Error(HarnessError),
}

impl Verdict {
    /// Whether this is a pass
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Short label: "pass", "mismatch", or "error"
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Mismatch(_) => "mismatch",
            Verdict::Error(_) => "error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Mismatch(report) => write!(f, "mismatch: {}", report),
            Verdict::Error(e) => write!(f, "error: {}", e),
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Verdict::Pass => {
                let mut s = serializer.serialize_struct("Verdict", 1)?;
                s.serialize_field("status", self.label())?;
                s.end()
            }
            Verdict::Mismatch(report) => {
                let mut s = serializer.serialize_struct("Verdict", 2)?;
                s.serialize_field("status", self.label())?;
                s.serialize_field("mismatch", report)?;
                s.end()
            }
            Verdict::Error(e) => {
                let mut s = serializer.serialize_struct("Verdict", 3)?;
                s.serialize_field("status", self.label())?;
                s.serialize_field("kind", &e.kind())?;
                s.serialize_field("message", &e.to_string())?;
                s.end()
            }
        }
    }
}

/// Verdict of one (KeySet, seed) run plus context
#[derive(Debug, Serialize)]
pub struct KeySetOutcome {
    /// KeySet name
    pub keyset: String,
    /// Workload seed
    pub seed: u64,
    /// Operations generated for the run
    pub operations: usize,
    /// Wall time for both replays
    pub elapsed_ms: u64,
    /// The verdict
    pub verdict: Verdict,
}
