use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Randomness helpers shared by outcome generation and reel filler.
// Everything takes `&mut R: Rng` so callers choose between thread-local
// entropy (server) and a seeded stream (tests, simulation).

pub type SpinRng = ChaCha8Rng;

pub fn seeded(seed: u64) -> SpinRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Fresh stream seeded from the thread-local generator.
pub fn from_entropy() -> SpinRng {
    ChaCha8Rng::from_rng(&mut rand::rng())
}

/// In-place Fisher-Yates: walk from the last index down to 1, swapping each
/// slot with a uniformly chosen slot at or below it.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// True with probability `p`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random_bool(p.clamp(0.0, 1.0))
}

pub fn filler_index<R: Rng + ?Sized>(rng: &mut R, catalog_len: usize) -> usize {
    rng.random_range(0..catalog_len)
}
