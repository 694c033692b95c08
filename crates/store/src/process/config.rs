//! Candidate process configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use kvdiff_core::ConfigError;

/// Default bound on a single `lookup` response
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on collecting the final dump and reaping the child
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// How to launch and bound a candidate process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Candidate executable
    pub program: PathBuf,
    /// Extra arguments passed to the candidate
    pub args: Vec<String>,
    /// Maximum wait for one lookup response
    pub lookup_timeout: Duration,
    /// Maximum wait, after closing stdin, for the dump and process exit
    pub shutdown_timeout: Duration,
}

impl ProcessConfig {
    /// Config for `program` with default timeouts and no arguments
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessConfig {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Replace the candidate arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Append one candidate argument
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the lookup bound
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Set the shutdown bound
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.as_os_str().is_empty() {
            return Err(ConfigError::invalid("program", "candidate path is empty"));
        }
        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::invalid("lookup_timeout", "must be non-zero"));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(ConfigError::invalid("shutdown_timeout", "must be non-zero"));
        }
        Ok(())
    }
}
