//! Process backend tests against scripted candidates
//!
//! Each test launches `sh -c <script>` as the candidate, so these cover the
//! protocol and lifecycle without depending on a real store implementation.

#![cfg(unix)]

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use kvdiff_core::{ErrorKind, HarnessError};
use kvdiff_store::{KvStore, ProcessConfig, ProcessStore, StoreLauncher};

// ============================================================================
// Test Helpers
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn script(body: &str) -> ProcessConfig {
    ProcessConfig::new("sh")
        .with_args(["-c", body])
        .with_lookup_timeout(Duration::from_secs(5))
        .with_shutdown_timeout(Duration::from_secs(5))
}

fn spawn(config: &ProcessConfig) -> ProcessStore {
    init_tracing();
    ProcessStore::spawn(config).unwrap()
}

/// Whether a process with this pid still exists (zombies included)
fn process_exists(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Answers every lookup with the looked-up key, dumps `{1: 7}` at EOF
const ECHO_KEY: &str = r#"
while IFS= read -r line; do
  case "$line" in
    lookup*) set -- $line; echo "$2" ;;
  esac
done
printf '{\n    1: 7,\n}\n'
"#;

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn lookup_reads_one_line_per_request_in_order() {
    let mut store = spawn(&script(ECHO_KEY));

    store.put(1, 7).unwrap();
    assert_eq!(store.get(5).unwrap(), Some(5));
    store.increment(1).unwrap();
    assert_eq!(store.get(9).unwrap(), Some(9));
    assert_eq!(store.get(0).unwrap(), Some(0));
    assert_eq!(store.commands_sent(), 5);

    let snapshot = store.finish().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(1), Some(7));
}

#[test]
fn missing_token_maps_to_none() {
    let mut store = spawn(&script(
        r#"while IFS= read -r line; do echo None; done; echo '{}'"#,
    ));
    assert_eq!(store.get(3).unwrap(), None);
    assert!(store.finish().unwrap().is_empty());
}

#[test]
fn commands_are_written_verbatim_and_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("commands.txt");
    let config = ProcessConfig::new("sh").with_args([
        "-c".to_string(),
        r#"cat > "$0"; echo '{}'"#.to_string(),
        record.display().to_string(),
    ]);

    let mut store = spawn(&config);
    store.put(1, 4294967295).unwrap();
    store.increment(3).unwrap();
    store.delete(4).unwrap();
    store.clear().unwrap();
    store.compact().unwrap();
    assert!(store.finish().unwrap().is_empty());

    let written = std::fs::read_to_string(&record).unwrap();
    assert_eq!(
        written,
        "insert 1 4294967295\nincrement 3\ndelete 4\nclear\ncompact\n"
    );
}

#[test]
fn garbage_lookup_is_protocol_violation() {
    let mut store = spawn(&script(
        r#"read -r line; echo '???'; cat > /dev/null; echo '{}'"#,
    ));

    let err = store.get(1).unwrap_err();
    match &err {
        HarnessError::ProtocolViolation { context, line } => {
            assert_eq!(context, "lookup response");
            assert_eq!(line, "???\n");
        }
        other => panic!("unexpected error: {other}"),
    }
    store.abort();
}

#[test]
fn malformed_dump_is_protocol_violation() {
    let store = spawn(&script("cat > /dev/null; echo oops"));
    let err = store.finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
}

#[test]
fn duplicate_dump_key_is_protocol_violation() {
    let store = spawn(&script(r#"cat > /dev/null; printf '{\n 1: 1,\n 1: 2,\n}\n'"#));
    let err = store.finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
    assert!(err.to_string().contains("duplicate key 1"));
}

// ============================================================================
// Process failures
// ============================================================================

#[test]
fn spawn_failure_is_process_failure() {
    init_tracing();
    let config = ProcessConfig::new("/nonexistent/kvdiff-candidate");
    let err = config.launch().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::ProcessFailure);
    assert!(err.to_string().contains("failed to spawn"));
}

#[test]
fn invalid_config_is_rejected_before_spawn() {
    let config = script("exit 0").with_lookup_timeout(Duration::ZERO);
    let err = ProcessStore::spawn(&config).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn early_exit_is_process_failure() {
    let mut store = spawn(&script("exit 3"));
    let err = store.put(1, 1).and_then(|_| store.get(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProcessFailure, "{err}");
    store.abort();
}

#[test]
fn nonzero_exit_after_dump_is_process_failure() {
    let store = spawn(&script("cat > /dev/null; echo '{}'; exit 4"));
    let err = store.finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProcessFailure);
    assert!(err.to_string().contains("4"), "{err}");
}

#[test]
fn missing_dump_is_process_failure() {
    let store = spawn(&script("cat > /dev/null"));
    let err = store.finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProcessFailure);
    assert!(err.to_string().contains("final dump"));
}

// ============================================================================
// Timeouts and resource release
// ============================================================================

#[test]
fn hung_lookup_times_out_and_abort_reaps() {
    let config = script("exec sleep 30").with_lookup_timeout(Duration::from_millis(200));
    let mut store = spawn(&config);
    let pid = store.id();

    let start = Instant::now();
    let err = store.get(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(start.elapsed() < Duration::from_secs(5));

    store.abort();
    assert!(!process_exists(pid), "candidate {pid} was not reaped");
}

#[test]
fn shutdown_is_bounded_and_reaps() {
    let config = script("cat > /dev/null; exec sleep 30")
        .with_shutdown_timeout(Duration::from_millis(300));
    let store = spawn(&config);
    let pid = store.id();

    let start = Instant::now();
    let err = store.finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(!process_exists(pid), "candidate {pid} was not reaped");
}

#[test]
fn drop_releases_a_running_candidate() {
    let store = spawn(&script("exec sleep 30"));
    let pid = store.id();
    drop(store);
    assert!(!process_exists(pid), "candidate {pid} was not reaped");
}

#[test]
fn finish_reaps_on_success() {
    let store = spawn(&script(ECHO_KEY));
    let pid = store.id();
    store.finish().unwrap();
    assert!(!process_exists(pid));
}

#[test]
fn launcher_describes_program_and_args() {
    let config = ProcessConfig::new("cand").with_args(["--fault", "none"]);
    assert_eq!(config.describe(), "cand --fault none");
    assert_eq!(ProcessConfig::new("cand").describe(), "cand");
}
