//! kvdiff - differential testing for process-isolated key-value stores
//!
//! kvdiff replays seeded workloads against an in-memory reference store and a
//! candidate store running as a child process, then compares the ordered
//! lookup results and the final state of both.
//!
//! # Quick Start
//!
//! ```ignore
//! use kvdiff::prelude::*;
//!
//! let candidate = ProcessConfig::new("./my-store");
//! let driver = Driver::new(DriverConfig::default(), candidate)?;
//! let report = driver.run_all(&[1, 2, 3], &standard_catalog(1)?);
//! std::process::exit(report.exit_code());
//! ```
//!
//! # Architecture
//!
//! - [`kvdiff_core`]: keys, values, KeySets, operations, snapshots, errors
//! - [`kvdiff_wire`]: the candidate's line protocol
//! - [`kvdiff_workload`]: seed-reproducible operation sequences
//! - [`kvdiff_store`]: the reference and process backends behind one interface
//! - [`kvdiff_driver`]: replay, comparison, verdicts and reports

pub mod prelude;

pub use kvdiff_core;
pub use kvdiff_driver;
pub use kvdiff_store;
pub use kvdiff_wire;
pub use kvdiff_workload;
