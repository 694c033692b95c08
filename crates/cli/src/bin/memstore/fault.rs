//! Fault injection for the fixture candidate
//!
//! Each [`FaultKind`] is one specific way a store can be wrong. A fault arms
//! once the store has processed `after` commands and stays armed until exit.

use std::fmt;
use std::str::FromStr;

/// Kind of fault to inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Behave correctly
    None,
    /// Increment of an absent key stores 0 instead of 1
    IncrementFromZero,
    /// Delete does nothing
    IgnoreDelete,
    /// Compact drops the smallest key
    CompactDropsKey,
    /// Lookup answers `???`
    GarbageLookup,
    /// Exit with status 101 mid-stream
    Crash,
    /// Abort the process
    Abort,
    /// Lookup never answers
    HangLookup,
    /// Final dump repeats its first entry
    DuplicateDump,
}

impl FaultKind {
    /// Get all fault kinds
    pub fn all() -> Vec<FaultKind> {
        vec![
            FaultKind::None,
            FaultKind::IncrementFromZero,
            FaultKind::IgnoreDelete,
            FaultKind::CompactDropsKey,
            FaultKind::GarbageLookup,
            FaultKind::Crash,
            FaultKind::Abort,
            FaultKind::HangLookup,
            FaultKind::DuplicateDump,
        ]
    }

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            FaultKind::None => "none",
            FaultKind::IncrementFromZero => "increment-from-zero",
            FaultKind::IgnoreDelete => "ignore-delete",
            FaultKind::CompactDropsKey => "compact-drops-key",
            FaultKind::GarbageLookup => "garbage-lookup",
            FaultKind::Crash => "crash",
            FaultKind::Abort => "abort",
            FaultKind::HangLookup => "hang-lookup",
            FaultKind::DuplicateDump => "duplicate-dump",
        }
    }

    /// Get description
    pub fn description(&self) -> &'static str {
        match self {
            FaultKind::None => "no fault",
            FaultKind::IncrementFromZero => "absent increment stores 0",
            FaultKind::IgnoreDelete => "delete is a no-op",
            FaultKind::CompactDropsKey => "compact drops the smallest key",
            FaultKind::GarbageLookup => "lookup prints ???",
            FaultKind::Crash => "exit with status 101",
            FaultKind::Abort => "abort the process",
            FaultKind::HangLookup => "lookup never answers",
            FaultKind::DuplicateDump => "dump repeats its first entry",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FaultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaultKind::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown fault kind: {}", s))
    }
}

/// Which fault to inject, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultConfig {
    /// Fault kind
    pub kind: FaultKind,
    /// Commands processed before the fault arms
    pub after: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        FaultConfig::none()
    }
}

impl FaultConfig {
    /// Correct behavior
    pub fn none() -> Self {
        FaultConfig {
            kind: FaultKind::None,
            after: 0,
        }
    }

    /// Inject `kind` from the first command on
    pub fn new(kind: FaultKind) -> Self {
        FaultConfig { kind, after: 0 }
    }

    /// Arm only after `after` commands have been processed
    pub fn with_after(mut self, after: u64) -> Self {
        self.after = after;
        self
    }

    /// Whether `kind` is armed once `processed` commands are done
    pub fn armed(&self, kind: FaultKind, processed: u64) -> bool {
        self.kind == kind && processed >= self.after
    }
}
