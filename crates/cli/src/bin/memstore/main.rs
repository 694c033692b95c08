//! kvdiff-memstore: in-memory candidate store for exercising kvdiff.
//!
//! Reads one command per line on stdin, answers lookups on stdout, and
//! writes the full mapping when stdin closes. `--fault` makes it misbehave
//! in one specific way so every verdict the harness can reach has a fixture.

mod fault;
mod store;

use std::io::{self, BufRead, Write};
use std::process;
use std::thread;

use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{value_parser, Arg, Command};
use tracing::{debug, warn};

use kvdiff_wire::parse_request;

use fault::{FaultConfig, FaultKind};
use store::{MemStore, Step};

/// Exit status for a command the fixture cannot parse
const EXIT_BAD_INPUT: i32 = 2;

fn build_cli() -> Command {
    let kinds: Vec<PossibleValue> = FaultKind::all()
        .into_iter()
        .map(|kind| PossibleValue::new(kind.name()).help(kind.description()))
        .collect();

    Command::new("kvdiff-memstore")
        .about("In-memory key-value store speaking the kvdiff line protocol")
        .arg(
            Arg::new("fault")
                .long("fault")
                .value_name("KIND")
                .help("Inject a fault")
                .default_value("none")
                .value_parser(PossibleValuesParser::new(kinds)),
        )
        .arg(
            Arg::new("fault-after")
                .long("fault-after")
                .value_name("N")
                .help("Arm the fault after N commands")
                .default_value("0")
                .value_parser(value_parser!(u64)),
        )
}

fn fault_from_args() -> Result<FaultConfig, String> {
    let matches = build_cli().get_matches();
    let kind: FaultKind = matches
        .get_one::<String>("fault")
        .map(String::as_str)
        .unwrap_or("none")
        .parse()?;
    let after = matches.get_one::<u64>("fault-after").copied().unwrap_or(0);
    Ok(FaultConfig::new(kind).with_after(after))
}

fn serve(fault: FaultConfig) -> io::Result<i32> {
    let mut store = MemStore::new(fault);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let request = match parse_request(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(line = %line, error = %e, "rejecting command");
                return Ok(EXIT_BAD_INPUT);
            }
        };

        match store.handle(request) {
            Step::Continue => {}
            Step::Reply(response) => {
                out.write_all(response.as_bytes())?;
                out.flush()?;
            }
            Step::Exit(code) => {
                debug!(code, "injected crash");
                out.flush()?;
                return Ok(code);
            }
            Step::Abort => process::abort(),
            Step::Hang => loop {
                thread::park();
            },
        }
    }

    out.write_all(store.dump().as_bytes())?;
    out.flush()?;
    Ok(0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .init();

    let fault = match fault_from_args() {
        Ok(fault) => fault,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(EXIT_BAD_INPUT);
        }
    };
    if fault.kind != FaultKind::None {
        debug!(fault = %fault.kind, after = fault.after, "fault configured");
    }

    match serve(fault) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    }
}
