use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Builds the random source behind every config-driven entry point.
///
/// A seed gives a reproducible stream for tests and demos. Without one the
/// generator is seeded from operating-system entropy.
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_entropy(),
    }
}
