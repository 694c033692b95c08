//! Replaying operation sequences against backends

use tracing::{debug, warn};

use kvdiff_core::{KeySet, Operation, Result, RunResult};
use kvdiff_store::{KvStore, ReferenceStore, StoreLauncher};
use kvdiff_workload::generate;

/// Replay `ops` against `store` and release it
///
/// Lookup results are collected in issue order. On any error the store is
/// aborted before the error is returned, so a candidate process never
/// outlives a failed replay.
pub fn replay<S: KvStore>(mut store: S, ops: &[Operation]) -> Result<RunResult> {
    let mut lookups = Vec::new();

    for (index, op) in ops.iter().enumerate() {
        match store.apply(op) {
            Ok(Some(found)) => lookups.push(found),
            Ok(None) => {}
            Err(e) => {
                warn!(index, operation = %op, error = %e, "replay failed");
                store.abort();
                return Err(e);
            }
        }
    }

    let snapshot = store.finish()?;
    Ok(RunResult::new(lookups, snapshot))
}

/// Replay `ops` against a fresh reference store and a fresh launched store
///
/// Returns `(reference, candidate)`.
pub fn run_operations<L: StoreLauncher>(
    ops: &[Operation],
    launcher: &L,
) -> Result<(RunResult, RunResult)> {
    let expected = replay(ReferenceStore::new(), ops)?;
    let store = launcher.launch()?;
    let actual = replay(store, ops)?;
    debug!(
        operations = ops.len(),
        lookups = actual.lookups.len(),
        keys = actual.snapshot.len(),
        "replayed against {}",
        launcher.describe()
    );
    Ok((expected, actual))
}

/// Generate the workload for `(seed, keys, loop_count)` and replay it against
/// both backends
///
/// The sequence is generated once, so both backends see identical input.
pub fn run<L: StoreLauncher>(
    seed: u64,
    keys: &KeySet,
    loop_count: usize,
    launcher: &L,
) -> Result<(RunResult, RunResult)> {
    let ops = generate(seed, keys, loop_count);
    run_operations(&ops, launcher)
}
