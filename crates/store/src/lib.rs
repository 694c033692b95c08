//! Store adapters for kvdiff
//!
//! - [`KvStore`]: the capability set both backends implement
//! - [`StoreLauncher`]: creates a fresh backend per run
//! - [`ReferenceStore`]: in-memory ground truth
//! - [`ProcessStore`]: candidate driven over its stdin/stdout

#![warn(missing_docs)]

pub mod adapter;
pub mod process;
pub mod reference;

pub use adapter::{KvStore, StoreLauncher};
pub use process::{ProcessConfig, ProcessStore, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT};
pub use reference::{ReferenceLauncher, ReferenceStore};
