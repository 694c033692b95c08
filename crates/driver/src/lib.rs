//! Comparison driver for kvdiff
//!
//! Replays one generated workload against the reference backend and a
//! candidate backend, then compares their RunResults:
//!
//! - [`run`]: the single (seed, KeySet) comparison
//! - [`compare`]: explains how two RunResults differ
//! - [`Driver`]: runs a catalog of KeySets over many seeds into a [`Report`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod config;
pub mod driver;
pub mod replay;
pub mod report;
pub mod verdict;

pub use compare::{compare, Divergence, LookupDivergence};
pub use config::DriverConfig;
pub use driver::Driver;
pub use replay::{replay, run, run_operations};
pub use report::{KeySetSummary, Report, EXIT_ERROR, EXIT_MISMATCH, EXIT_PASS};
pub use verdict::{KeySetOutcome, MismatchReport, Verdict};
