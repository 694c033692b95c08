//! Driver configuration

use kvdiff_core::ConfigError;
use kvdiff_workload::DEFAULT_LOOP_COUNT;

/// Comparison driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Workload loops per (KeySet, seed) run
    pub loop_count: usize,
    /// Seed the KeySet catalog was built from, stamped on every report
    pub catalog_seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            loop_count: DEFAULT_LOOP_COUNT,
            catalog_seed: None,
        }
    }
}

impl DriverConfig {
    /// Set the loop count
    pub fn with_loop_count(mut self, loop_count: usize) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Record the seed the KeySets under test were built from
    pub fn with_catalog_seed(mut self, seed: u64) -> Self {
        self.catalog_seed = Some(seed);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loop_count == 0 {
            return Err(ConfigError::invalid("loop_count", "must be greater than 0"));
        }
        Ok(())
    }
}
