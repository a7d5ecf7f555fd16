//! Seed resolution.

use crate::types::RANDOM_SEED;
use rand::Rng;

/// Largest seed drawn for a random request.
pub const MAX_RANDOM_SEED: i64 = 1_000_000;

/// Replace the random sentinel with a seed drawn uniformly from
/// `[0, MAX_RANDOM_SEED]`; any other value is used unchanged.
pub fn resolve_seed(seed: i64) -> i64 {
    resolve_seed_with(seed, &mut rand::rng())
}

/// Like [`resolve_seed`], drawing from the given generator.
pub fn resolve_seed_with<R: Rng + ?Sized>(seed: i64, rng: &mut R) -> i64 {
    if seed == RANDOM_SEED {
        rng.random_range(0..=MAX_RANDOM_SEED)
    } else {
        seed
    }
}
