//! Seeded operation sequences
//!
//! Every loop emits, in order: a burst of puts, a burst of increments, a
//! burst of deletes, a burst of lookups, then possibly a clear and possibly a
//! compact. Burst lengths are drawn uniformly from `0..=|keys|`.
//!
//! The order of PRNG draws is part of the contract. Two replays of the same
//! (seed, KeySet, loop count) must see byte-identical sequences, so any change
//! here changes every recorded reproduction.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use kvdiff_core::{Key, KeySet, Operation};

/// Added to the user seed before seeding the workload PRNG
///
/// Keeps the workload stream decorrelated from other uses of the same seed
/// (e.g. random KeySet generation).
pub const WORKLOAD_SEED_OFFSET: u64 = 1;

/// Generate the operation sequence for one run
///
/// Pure: the same arguments always produce the same sequence.
pub fn generate(seed: u64, keys: &KeySet, loop_count: usize) -> Vec<Operation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(WORKLOAD_SEED_OFFSET));
    let universe = keys.keys();
    let mut ops = Vec::new();

    for _ in 0..loop_count {
        for _ in 0..burst_len(&mut rng, universe) {
            let key = pick(&mut rng, universe);
            let value = rng.gen::<u32>();
            ops.push(Operation::Put { key, value });
        }
        for _ in 0..burst_len(&mut rng, universe) {
            ops.push(Operation::Increment {
                key: pick(&mut rng, universe),
            });
        }
        for _ in 0..burst_len(&mut rng, universe) {
            ops.push(Operation::Delete {
                key: pick(&mut rng, universe),
            });
        }
        for _ in 0..burst_len(&mut rng, universe) {
            ops.push(Operation::Lookup {
                key: pick(&mut rng, universe),
            });
        }
        // 1 in 4
        if rng.gen_range(0..=3u32) == 0 {
            ops.push(Operation::Clear);
        }
        // 1 in 2
        if rng.gen_range(0..=1u32) == 0 {
            ops.push(Operation::Compact);
        }
    }

    ops
}

fn burst_len(rng: &mut ChaCha8Rng, universe: &[Key]) -> usize {
    rng.gen_range(0..=universe.len())
}

fn pick(rng: &mut ChaCha8Rng, universe: &[Key]) -> Key {
    universe[rng.gen_range(0..universe.len())]
}

/// Per-kind operation counts, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCounts {
    /// Put operations
    pub puts: usize,
    /// Lookup operations
    pub lookups: usize,
    /// Increment operations
    pub increments: usize,
    /// Delete operations
    pub deletes: usize,
    /// Clear operations
    pub clears: usize,
    /// Compact operations
    pub compacts: usize,
}

impl OpCounts {
    /// Count operations by kind
    pub fn of(ops: &[Operation]) -> Self {
        let mut counts = OpCounts::default();
        for op in ops {
            match op {
                Operation::Put { .. } => counts.puts += 1,
                Operation::Lookup { .. } => counts.lookups += 1,
                Operation::Increment { .. } => counts.increments += 1,
                Operation::Delete { .. } => counts.deletes += 1,
                Operation::Clear => counts.clears += 1,
                Operation::Compact => counts.compacts += 1,
            }
        }
        counts
    }

    /// Total operations
    pub fn total(&self) -> usize {
        self.puts + self.lookups + self.increments + self.deletes + self.clears + self.compacts
    }
}
