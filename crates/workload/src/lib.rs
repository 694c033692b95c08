//! Workload generation for kvdiff
//!
//! - [`generate`]: deterministic operation sequence for (seed, KeySet, loops)
//! - [`standard_catalog`]: the scenario KeySets a full run iterates over

#![warn(missing_docs)]

pub mod catalog;
pub mod generator;

pub use catalog::{random_keyset, standard_catalog, DEFAULT_LOOP_COUNT, KEYSET_SEED_OFFSET};
pub use generator::{generate, OpCounts, WORKLOAD_SEED_OFFSET};
