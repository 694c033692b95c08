//! Commonly used types, for `use kvdiff::prelude::*`

pub use kvdiff_core::{
    ErrorKind, HarnessError, Key, KeySet, Operation, RunResult, StoreSnapshot, Value,
};
pub use kvdiff_driver::{compare, run, Divergence, Driver, DriverConfig, Report, Verdict};
pub use kvdiff_store::{KvStore, ProcessConfig, ReferenceLauncher, ReferenceStore, StoreLauncher};
pub use kvdiff_workload::{generate, standard_catalog};
