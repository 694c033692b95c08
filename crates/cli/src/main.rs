//! kvdiff: differential tester for process-isolated key-value stores.
//!
//! `kvdiff <CANDIDATE> <SEED> [OPTIONS]` replays the standard key-set catalog
//! against the in-memory reference and the candidate executable, prints a
//! report, and exits with the report's status. The catalog is built from
//! `--catalog-seed` (default SEED), so a reported mismatch replays with
//! `kvdiff <CANDIDATE> <seed> --catalog-seed <catalog seed>`.
//!
//! Exit status:
//! - 0: every comparison passed
//! - 1: at least one mismatch
//! - 2: a harness error (timeout, crash, malformed output) or bad usage

mod commands;
mod format;
mod parse;

use std::process;

use tracing::Level;

use kvdiff_driver::{Driver, EXIT_ERROR};
use kvdiff_workload::standard_catalog;

use commands::build_cli;
use format::{format_error, format_report};
use parse::{matches_to_invocation, Invocation};

fn main() {
    let matches = build_cli().get_matches();

    let invocation = match matches_to_invocation(&matches) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    init_logging(invocation.verbosity);
    process::exit(run(&invocation));
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(invocation: &Invocation) -> i32 {
    let mode = invocation.output;

    let catalog = match standard_catalog(invocation.catalog_seed) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), mode));
            return EXIT_ERROR;
        }
    };
    let keysets = invocation.select(catalog);
    if keysets.is_empty() {
        let pattern = invocation.only.as_deref().unwrap_or_default();
        eprintln!(
            "{}",
            format_error(&format!("no key set matches '{}'", pattern), mode)
        );
        return EXIT_ERROR;
    }

    let driver = match Driver::new(invocation.driver.clone(), invocation.process.clone()) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), mode));
            return EXIT_ERROR;
        }
    };

    let report = driver.run_all(&invocation.seeds(), &keysets);
    println!("{}", format_report(&report, mode));
    report.exit_code()
}
