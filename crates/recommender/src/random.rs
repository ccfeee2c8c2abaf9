//! Injected randomness.
//!
//! Random fallback lists and the train/test split draw from a
//! [`RandomSource`] handed in by the caller. Production code uses a seeded
//! `StdRng`; tests can plug in anything that implements the two draws.

use data_loader::{Catalog, MovieId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn next_index(&mut self, len: usize) -> usize;

    /// In-place Fisher-Yates shuffle driven by `next_index`
    fn shuffle(&mut self, ids: &mut [MovieId]) {
        for i in (1..ids.len()).rev() {
            let j = self.next_index(i + 1);
            ids.swap(i, j);
        }
    }
}

impl RandomSource for StdRng {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn shuffle(&mut self, ids: &mut [MovieId]) {
        ids.shuffle(self);
    }
}

/// Seeded production generator
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seed for one point of a grid search, derived from the base seed
pub(crate) fn point_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(index as u64 + 1)
}

/// Up to `count` distinct random catalog ids for which `exclude` is false
pub fn random_movies(
    catalog: &Catalog,
    count: usize,
    exclude: impl Fn(MovieId) -> bool,
    rng: &mut dyn RandomSource,
) -> Vec<MovieId> {
    if count == 0 {
        return Vec::new();
    }
    let mut pool: Vec<MovieId> = catalog.ids().filter(|&id| !exclude(id)).collect();
    rng.shuffle(&mut pool);
    pool.truncate(count);
    pool
}

/// Top up `ids` to length `k` with random catalog ids it does not already
/// hold and `exclude` does not reject. Returns how many were added.
pub fn pad_with_random(
    ids: &mut Vec<MovieId>,
    k: usize,
    catalog: &Catalog,
    exclude: impl Fn(MovieId) -> bool,
    rng: &mut dyn RandomSource,
) -> usize {
    if ids.len() >= k {
        return 0;
    }
    let missing = k - ids.len();
    let fill = {
        let present = &*ids;
        random_movies(catalog, missing, |id| exclude(id) || present.contains(&id), rng)
    };
    let added = fill.len();
    ids.extend(fill);
    added
}
