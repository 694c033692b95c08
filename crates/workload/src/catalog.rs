//! Standard KeySet catalog
//!
//! Scenarios range from a single key through small dense ranges to large
//! sparse random sets. Random sets are derived from the run seed so every
//! scenario is reproducible.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use kvdiff_core::{Key, KeySet, Result};

/// Added to the run seed before seeding random KeySet generation
pub const KEYSET_SEED_OFFSET: u64 = 0x5EED;

/// Default workload loop count
pub const DEFAULT_LOOP_COUNT: usize = 4;

/// Build the standard catalog for a run seed
///
/// Order: `single`, `dense-{4,10,32,100}`, `sparse-{5,11,33,101}` (key 0 plus
/// random non-zero keys), `random-200`.
pub fn standard_catalog(seed: u64) -> Result<Vec<KeySet>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(KEYSET_SEED_OFFSET));
    let mut catalog = vec![KeySet::new("single", vec![0])?];

    for n in [4, 10, 32, 100] {
        catalog.push(KeySet::dense(format!("dense-{}", n), n)?);
    }

    for n in [4, 10, 32, 100] {
        let mut keys = vec![0];
        keys.extend(unique_keys(&mut rng, n, 1));
        catalog.push(KeySet::new(format!("sparse-{}", n + 1), keys)?);
    }

    catalog.push(random_keyset("random-200", 200, &mut rng)?);
    Ok(catalog)
}

/// `count` unique keys drawn uniformly from the full `u32` range
pub fn random_keyset(name: impl Into<String>, count: usize, rng: &mut impl Rng) -> Result<KeySet> {
    KeySet::new(name, unique_keys(rng, count, 0))
}

fn unique_keys(rng: &mut impl Rng, count: usize, min: Key) -> Vec<Key> {
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key = rng.gen_range(min..=Key::MAX);
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys
}
