// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Benchmark fixtures.
//!
//! Deterministic lineage-shaped keys for the criterion benches: families of
//! repositories that share a common history and then diverge, like forks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data_structures::similarity_trie::Symbol;

fn nibbles(rng: &mut StdRng, len: usize) -> Vec<Symbol> {
    (0..len).map(|_| rng.gen_range(0..16)).collect()
}

/// `families * forks` root-first nibble keys, identical for the same `seed`.
///
/// Keys in one family share a `shared`-symbol history and then diverge for
/// `divergent` symbols.
pub fn fork_families(
    families: usize,
    forks: usize,
    shared: usize,
    divergent: usize,
    seed: u64,
) -> Vec<Vec<Symbol>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys = Vec::with_capacity(families * forks);
    for _ in 0..families {
        let trunk = nibbles(&mut rng, shared);
        for _ in 0..forks {
            let mut key = trunk.clone();
            key.extend(nibbles(&mut rng, divergent));
            keys.push(key);
        }
    }
    keys
}
