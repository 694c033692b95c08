//! Determinism of generate + reference replay

use proptest::prelude::*;

use kvdiff::kvdiff_workload::{generate, standard_catalog};

use crate::common::{keyset_strategy, reference_run};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reference_runs_are_reproducible(
        seed in any::<u64>(),
        keys in keyset_strategy(),
        loops in 1usize..5,
    ) {
        let first = reference_run(&generate(seed, &keys, loops));
        let second = reference_run(&generate(seed, &keys, loops));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn catalog_is_reproducible(seed in any::<u64>()) {
        prop_assert_eq!(standard_catalog(seed).unwrap(), standard_catalog(seed).unwrap());
    }
}

#[test]
fn different_seeds_usually_differ() {
    let keys = &standard_catalog(1).unwrap()[4];
    let distinct = (1u64..=8)
        .map(|seed| generate(seed, keys, 4))
        .collect::<std::collections::HashSet<_>>()
        .len();
    assert!(distinct > 1);
}
