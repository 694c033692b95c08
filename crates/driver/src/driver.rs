//! Comparison driver
//!
//! Runs every (KeySet, seed) pair sequentially. Each pair gets a freshly
//! generated workload, a fresh reference store and a freshly launched
//! candidate, so runs never share state. An infrastructure failure ends only
//! the pair it happened in.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use kvdiff_core::{KeySet, Result};
use kvdiff_store::StoreLauncher;
use kvdiff_workload::{generate, OpCounts};

use crate::compare::compare;
use crate::config::DriverConfig;
use crate::replay::run_operations;
use crate::report::Report;
use crate::verdict::{KeySetOutcome, MismatchReport, Verdict};

/// Differential runner over one candidate launcher
pub struct Driver<L> {
    config: DriverConfig,
    launcher: L,
}

impl<L: StoreLauncher> Driver<L> {
    /// Create a driver
    ///
    /// # Errors
    /// Returns `Config` if `config` fails validation.
    pub fn new(config: DriverConfig, launcher: L) -> Result<Self> {
        config.validate()?;
        Ok(Driver { config, launcher })
    }

    /// Active configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Candidate launcher
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Compare both backends on one (KeySet, seed) pair
    pub fn run_keyset(&self, seed: u64, keys: &KeySet) -> KeySetOutcome {
        let start = Instant::now();
        let loop_count = self.config.loop_count;
        let ops = generate(seed, keys, loop_count);
        let counts = OpCounts::of(&ops);
        debug!(
            keyset = keys.name(),
            seed,
            puts = counts.puts,
            lookups = counts.lookups,
            increments = counts.increments,
            deletes = counts.deletes,
            clears = counts.clears,
            compacts = counts.compacts,
            "generated workload"
        );

        let verdict = match run_operations(&ops, &self.launcher) {
            Ok((expected, actual)) => match compare(&expected, &actual) {
                None => Verdict::Pass,
                Some(divergence) => Verdict::Mismatch(
                    MismatchReport::new(seed, keys, loop_count, divergence, &ops)
                        .with_catalog_seed(self.config.catalog_seed),
                ),
            },
            Err(e) => Verdict::Error(e),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &verdict {
            Verdict::Pass => info!(
                keyset = keys.name(),
                seed,
                operations = ops.len(),
                elapsed_ms,
                "pass"
            ),
            Verdict::Mismatch(report) => warn!(
                keyset = keys.name(),
                seed,
                "mismatch: {}",
                report.divergence
            ),
            Verdict::Error(e) => error!(
                keyset = keys.name(),
                seed,
                kind = ?e.kind(),
                "run failed: {}",
                e
            ),
        }

        KeySetOutcome {
            keyset: keys.name().to_string(),
            seed,
            operations: ops.len(),
            elapsed_ms,
            verdict,
        }
    }

    /// Run every KeySet against every seed
    ///
    /// Outcomes are ordered by KeySet, then seed.
    pub fn run_all(&self, seeds: &[u64], keysets: &[KeySet]) -> Report {
        info!(
            candidate = %self.launcher.describe(),
            keysets = keysets.len(),
            seeds = seeds.len(),
            loop_count = self.config.loop_count,
            "starting comparison"
        );

        let mut outcomes = Vec::with_capacity(seeds.len() * keysets.len());
        for keys in keysets {
            for &seed in seeds {
                outcomes.push(self.run_keyset(seed, keys));
            }
        }

        let report = Report {
            candidate: self.launcher.describe(),
            loop_count: self.config.loop_count,
            catalog_seed: self.config.catalog_seed,
            outcomes,
        };
        info!(
            runs = report.outcomes.len(),
            mismatches = report.mismatches().len(),
            errors = report.errors().len(),
            "comparison finished"
        );
        report
    }
}
