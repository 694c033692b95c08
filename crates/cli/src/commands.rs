//! Clap command definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the `kvdiff` command.
pub fn build_cli() -> Command {
    Command::new("kvdiff")
        .about("Differential tester for process-isolated key-value stores")
        .long_about(
            "Replays seeded workloads against an in-memory reference store and a \
             candidate executable, then compares every lookup result and the final \
             state dump.\n\n\
             Exit status: 0 if every comparison passed, 1 if any mismatched, \
             2 on a harness error (timeout, crash, malformed output, bad usage).",
        )
        .arg(
            Arg::new("candidate")
                .help("Path to the candidate store executable")
                .required(true),
        )
        .arg(
            Arg::new("seed")
                .help("Workload seed")
                .required(true)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("seeds")
                .long("seeds")
                .value_name("N")
                .help("Run seeds SEED..SEED+N")
                .default_value("1")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("catalog-seed")
                .long("catalog-seed")
                .value_name("SEED")
                .help("Seed for the random key sets (defaults to SEED)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("loops")
                .long("loops")
                .value_name("N")
                .help("Workload loop count")
                .default_value("4")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("only")
                .long("only")
                .value_name("NAME")
                .help("Run only key sets whose name contains NAME"),
        )
        .arg(
            Arg::new("lookup-timeout-ms")
                .long("lookup-timeout-ms")
                .value_name("MS")
                .help("Bound on a single lookup response")
                .default_value("10000")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("shutdown-timeout-ms")
                .long("shutdown-timeout-ms")
                .value_name("MS")
                .help("Bound on collecting the final dump and reaping the candidate")
                .default_value("30000")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("arg")
                .long("arg")
                .value_name("ARG")
                .help("Extra argument passed to the candidate (repeatable)")
                .action(ArgAction::Append)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Raise log level (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}
