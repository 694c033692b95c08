//! Harness Property Tests
//!
//! Laws every correct store satisfies, checked against the reference backend,
//! plus the comparison scenarios that must hold for the harness itself.
//!
//! ## Test Structure
//!
//! - **store_laws**: increment, delete, clear, and compact semantics
//! - **determinism**: same seed and KeySet, same RunResult
//! - **scenarios**: driver verdicts against correct and flawed candidates

#[path = "../common/mod.rs"]
mod common;

mod determinism;
mod scenarios;
mod store_laws;
