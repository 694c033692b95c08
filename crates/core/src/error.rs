//! Error types for the harness
//!
//! Infrastructure failures are errors; a logical disagreement between the
//! reference and the candidate is not. Mismatches are reported as verdicts by
//! the driver, so nothing in this module represents one.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Infrastructure errors raised while driving a backend
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Candidate output does not match the pinned grammar
    #[error("protocol violation in {context}: {line:?}")]
    ProtocolViolation {
        /// What was being parsed (e.g. "lookup response", "final dump")
        context: String,
        /// The offending output
        line: String,
    },

    /// Candidate could not be started, exited early, or exited unsuccessfully
    #[error("candidate process failure: {reason}")]
    ProcessFailure {
        /// Human-readable cause, including exit status when known
        reason: String,
    },

    /// A bounded wait on the candidate expired
    #[error("timed out after {waited:?} waiting for {waiting_for}")]
    Timeout {
        /// How long the harness waited
        waited: Duration,
        /// What the harness was waiting for
        waiting_for: String,
    },

    /// KeySet construction rejected its input
    #[error("invalid key set {name}: {reason}")]
    InvalidKeySet {
        /// KeySet name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Harness configuration rejected before any process was started
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error not attributable to a specific protocol step
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field holds a value the harness cannot run with
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for an invalid field
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Coarse classification of a [`HarnessError`]
///
/// Used by reports so a user can tell "the candidate is broken" apart from
/// "the harness was misconfigured".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed candidate output
    ProtocolViolation,
    /// Candidate died, failed to start, or exited non-zero
    ProcessFailure,
    /// Candidate did not answer within the bound
    Timeout,
    /// Harness input was invalid
    Configuration,
}

impl HarnessError {
    /// Shorthand for a protocol violation
    pub fn protocol(context: impl Into<String>, line: impl Into<String>) -> Self {
        HarnessError::ProtocolViolation {
            context: context.into(),
            line: line.into(),
        }
    }

    /// Shorthand for a process failure
    pub fn process(reason: impl Into<String>) -> Self {
        HarnessError::ProcessFailure {
            reason: reason.into(),
        }
    }

    /// Shorthand for a timeout
    pub fn timeout(waited: Duration, waiting_for: impl Into<String>) -> Self {
        HarnessError::Timeout {
            waited,
            waiting_for: waiting_for.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::ProtocolViolation { .. } => ErrorKind::ProtocolViolation,
            HarnessError::ProcessFailure { .. } | HarnessError::Io(_) => {
                ErrorKind::ProcessFailure
            }
            HarnessError::Timeout { .. } => ErrorKind::Timeout,
            HarnessError::InvalidKeySet { .. } | HarnessError::Config(_) => {
                ErrorKind::Configuration
            }
        }
    }
}
