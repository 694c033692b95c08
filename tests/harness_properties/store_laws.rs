//! Store laws, checked against the reference backend

use proptest::prelude::*;

use kvdiff::kvdiff_core::Operation;
use kvdiff::kvdiff_store::{KvStore, ReferenceStore};

use crate::common::{apply_all, reference_run, sequence_strategy};

proptest! {
    #[test]
    fn increment_of_absent_key_yields_one(key in any::<u32>()) {
        let mut store = ReferenceStore::new();
        store.increment(key).unwrap();
        prop_assert_eq!(store.get(key).unwrap(), Some(1));
    }

    #[test]
    fn delete_of_absent_key_changes_nothing(ops in sequence_strategy(), key in 16u32..=u32::MAX) {
        let mut store = ReferenceStore::new();
        apply_all(&mut store, &ops);
        let before = store.snapshot();
        prop_assert!(store.delete(key).is_ok());
        prop_assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn clear_empties_every_key(ops in sequence_strategy()) {
        let mut store = ReferenceStore::new();
        apply_all(&mut store, &ops);
        store.clear().unwrap();
        for key in 0u32..16 {
            prop_assert_eq!(store.get(key).unwrap(), None);
        }
        prop_assert!(store.snapshot().is_empty());
    }

    #[test]
    fn compact_is_transparent(
        ops in sequence_strategy(),
        positions in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let plain: Vec<Operation> =
            ops.iter().copied().filter(|op| *op != Operation::Compact).collect();
        let mut compacted = plain.clone();
        for position in positions {
            let at = position.index(compacted.len() + 1);
            compacted.insert(at, Operation::Compact);
        }
        prop_assert_eq!(reference_run(&plain), reference_run(&compacted));
    }
}

#[test]
fn increment_wraps_at_max() {
    let mut store = ReferenceStore::new();
    store.put(7, u32::MAX).unwrap();
    store.increment(7).unwrap();
    assert_eq!(store.get(7).unwrap(), Some(0));
}
