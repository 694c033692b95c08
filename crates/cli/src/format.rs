//! Report → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per key set, then every mismatch and error
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of the whole report

use kvdiff_driver::{Report, Verdict};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a finished report.
pub fn format_report(report: &Report, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Human => format_human(report),
    }
}

/// Format a usage or setup error.
pub fn format_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": message
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", message)),
        OutputMode::Human => format!("(error) {}", message),
    }
}

fn format_human(report: &Report) -> String {
    let mut lines = Vec::new();
    lines.push(match report.catalog_seed {
        Some(seed) => format!(
            "candidate: {} (catalog seed {}, {} loops)",
            report.candidate, seed, report.loop_count
        ),
        None => format!("candidate: {} ({} loops)", report.candidate, report.loop_count),
    });

    for summary in report.keysets() {
        let total = summary.passed + summary.mismatched + summary.errored;
        let mut line = format!(
            "{:<5} {:<12} {}/{} seeds passed",
            summary.status().to_uppercase(),
            summary.name,
            summary.passed,
            total
        );
        if summary.mismatched > 0 {
            line.push_str(&format!(", {} mismatched", summary.mismatched));
        }
        if summary.errored > 0 {
            line.push_str(&format!(", {} errored", summary.errored));
        }
        lines.push(line);
    }

    for outcome in &report.outcomes {
        match &outcome.verdict {
            Verdict::Pass => {}
            Verdict::Mismatch(mismatch) => lines.push(format!("mismatch: {}", mismatch)),
            Verdict::Error(e) => lines.push(format!(
                "error: seed {} on {}: {}",
                outcome.seed, outcome.keyset, e
            )),
        }
    }

    let mismatched = report.mismatches().len();
    let errored = report.errors().len();
    let result = if errored > 0 {
        "ERROR"
    } else if mismatched > 0 {
        "FAIL"
    } else {
        "PASS"
    };
    lines.push(format!(
        "result: {} ({} runs, {} passed, {} mismatched, {} errored)",
        result,
        report.outcomes.len(),
        report.outcomes.len() - mismatched - errored,
        mismatched,
        errored
    ));

    lines.join("\n")
}
