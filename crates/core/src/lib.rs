//! Core types for kvdiff
//!
//! This crate defines the types shared by every layer of the harness:
//! - Key / Value: 32-bit unsigned integers
//! - KeySet: named key universe for one scenario
//! - Operation: one store operation
//! - StoreSnapshot / RunResult: what a backend observably produced
//! - HarnessError: infrastructure failures (protocol, process, timeout)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod operation;
pub mod snapshot;
pub mod types;

pub use error::{ConfigError, ErrorKind, HarnessError, Result};
pub use operation::Operation;
pub use snapshot::{RunResult, StateMismatch, StoreSnapshot};
pub use types::{Key, KeySet, Value};
