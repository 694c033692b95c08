//! Aggregated results of a driver run

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use kvdiff_core::HarnessError;

use crate::verdict::{KeySetOutcome, MismatchReport, Verdict};

/// Exit code when every comparison passed
pub const EXIT_PASS: i32 = 0;

/// Exit code when at least one comparison mismatched and none errored
pub const EXIT_MISMATCH: i32 = 1;

/// Exit code for infrastructure, usage, or configuration errors
pub const EXIT_ERROR: i32 = 2;

/// Per-KeySet tally across seeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySetSummary {
    /// KeySet name
    pub name: String,
    /// Seeds that passed
    pub passed: usize,
    /// Seeds that mismatched
    pub mismatched: usize,
    /// Seeds that errored
    pub errored: usize,
}

impl KeySetSummary {
    /// "error" if any seed errored, else "fail" if any mismatched, else "pass"
    pub fn status(&self) -> &'static str {
        if self.errored > 0 {
            "error"
        } else if self.mismatched > 0 {
            "fail"
        } else {
            "pass"
        }
    }
}

/// Every outcome of a driver run, in execution order
#[derive(Debug)]
pub struct Report {
    /// Description of the candidate backend
    pub candidate: String,
    /// Loop count used for every run
    pub loop_count: usize,
    /// Seed the KeySet catalog was built from, if any
    pub catalog_seed: Option<u64>,
    /// One outcome per (KeySet, seed)
    pub outcomes: Vec<KeySetOutcome>,
}

impl Report {
    /// Whether every comparison passed
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.verdict.is_pass())
    }

    /// Every mismatch found
    pub fn mismatches(&self) -> Vec<&MismatchReport> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.verdict {
                Verdict::Mismatch(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    /// Every infrastructure error, with the outcome it ended
    pub fn errors(&self) -> Vec<(&KeySetOutcome, &HarnessError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.verdict {
                Verdict::Error(e) => Some((o, e)),
                _ => None,
            })
            .collect()
    }

    /// Per-KeySet tallies, in first-seen order
    pub fn keysets(&self) -> Vec<KeySetSummary> {
        let mut summaries: Vec<KeySetSummary> = Vec::new();
        for outcome in &self.outcomes {
            let index = match summaries.iter().position(|s| s.name == outcome.keyset) {
                Some(index) => index,
                None => {
                    summaries.push(KeySetSummary {
                        name: outcome.keyset.clone(),
                        passed: 0,
                        mismatched: 0,
                        errored: 0,
                    });
                    summaries.len() - 1
                }
            };
            let summary = &mut summaries[index];
            match outcome.verdict {
                Verdict::Pass => summary.passed += 1,
                Verdict::Mismatch(_) => summary.mismatched += 1,
                Verdict::Error(_) => summary.errored += 1,
            }
        }
        summaries
    }

    /// Process exit code for this report
    ///
    /// Errors take precedence over mismatches.
    pub fn exit_code(&self) -> i32 {
        if !self.errors().is_empty() {
            EXIT_ERROR
        } else if !self.mismatches().is_empty() {
            EXIT_MISMATCH
        } else {
            EXIT_PASS
        }
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Report", 7)?;
        s.serialize_field("candidate", &self.candidate)?;
        s.serialize_field("loop_count", &self.loop_count)?;
        s.serialize_field("catalog_seed", &self.catalog_seed)?;
        s.serialize_field("passed", &self.passed())?;
        s.serialize_field("exit_code", &self.exit_code())?;
        s.serialize_field("keysets", &self.keysets())?;
        s.serialize_field("outcomes", &self.outcomes)?;
        s.end()
    }
}
