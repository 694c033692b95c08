//! Driver verdicts against correct and flawed in-memory candidates

use std::time::Duration;

use kvdiff::kvdiff_core::{KeySet, RunResult, StoreSnapshot};
use kvdiff::kvdiff_driver::{compare, run, Driver, DriverConfig, Verdict};
use kvdiff::kvdiff_store::ReferenceLauncher;
use kvdiff::kvdiff_workload::standard_catalog;

use crate::common::{init_tracing, with_timeout, Flaw, FlawedLauncher};

#[test]
fn small_dense_single_loop_agrees() {
    init_tracing();
    let keys = KeySet::new("dense-4", vec![0, 1, 2, 3]).unwrap();
    let (expected, actual) = run(1, &keys, 1, &ReferenceLauncher).unwrap();
    assert_eq!(expected, actual);
    assert!(compare(&expected, &actual).is_none());
}

#[test]
fn single_differing_lookup_is_a_mismatch() {
    let snapshot: StoreSnapshot = [(0, 1)].into_iter().collect();
    let expected = RunResult::new(vec![Some(1), None], snapshot.clone());
    let actual = RunResult::new(vec![Some(1), Some(0)], snapshot);

    let divergence = compare(&expected, &actual).unwrap();
    assert_eq!(divergence.lookup.unwrap().index, 1);
    assert!(divergence.snapshot.is_empty());
}

#[test]
fn extra_key_in_snapshot_is_a_mismatch() {
    let expected = RunResult::new(vec![], [(0, 1)].into_iter().collect());
    let actual = RunResult::new(vec![], [(0, 1), (5, 5)].into_iter().collect());

    let divergence = compare(&expected, &actual).unwrap();
    assert!(divergence.lookup.is_none());
    assert_eq!(divergence.snapshot.len(), 1);
    assert_eq!(divergence.snapshot[0].entity, "key:5");
}

#[test]
fn random_200_over_eight_seeds_aggregates() {
    init_tracing();
    let report = with_timeout(Duration::from_secs(60), || {
        let catalog = standard_catalog(1).unwrap();
        let keys: Vec<KeySet> = catalog.into_iter().filter(|k| k.name() == "random-200").collect();
        let driver = Driver::new(DriverConfig::default(), ReferenceLauncher).unwrap();
        driver.run_all(&(1..=8).collect::<Vec<u64>>(), &keys)
    })
    .expect("scaling scenario did not finish");

    assert_eq!(report.outcomes.len(), 8);
    assert!(report.passed());
    assert_eq!(report.keysets().len(), 1);
    assert_eq!(report.keysets()[0].passed, 8);
}

#[test]
fn every_flaw_is_caught_somewhere_in_the_catalog() {
    init_tracing();
    let catalog = standard_catalog(1).unwrap();
    let seeds: Vec<u64> = (1..=4).collect();

    for flaw in [
        Flaw::IncrementFromZero,
        Flaw::IgnoreDelete,
        Flaw::CompactDropsKey,
        Flaw::ClearKeepsZero,
    ] {
        let driver = Driver::new(DriverConfig::default(), FlawedLauncher(flaw)).unwrap();
        let report = driver.run_all(&seeds, &catalog);

        assert_eq!(report.exit_code(), 1, "{flaw:?} went unnoticed");
        assert!(report.errors().is_empty());
        for outcome in &report.outcomes {
            if let Verdict::Mismatch(mismatch) = &outcome.verdict {
                assert_eq!(mismatch.seed, outcome.seed);
                assert_eq!(mismatch.keyset, outcome.keyset);
            }
        }
    }
}
