use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// A per-structure source of node priorities
///
/// Every treap owns one of these, so priorities drawn by one sequence
/// never depend on what another sequence does. A generator built with
/// [Priorities::new] is seeded from the thread-local RNG; use
/// [Priorities::with_seed] to pin the priority sequence, e.g. in tests.
#[derive(Debug)]
pub struct Priorities {
    rng: ChaCha8Rng,
    /// Number of forks taken so far; each fork reads its own stream
    forks: AtomicU64,
}

impl Priorities {
    /// Creates a generator seeded from the thread-local RNG
    pub fn new() -> Self {
        log::debug!("seeding treap priorities from the thread-local rng");
        Self::from_rng(&mut rand::rng())
    }

    /// Creates a deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        log::debug!("seeding treap priorities with fixed seed {seed}");
        Self::from_chacha(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a generator seeded from another random source
    pub fn from_rng<R: RngCore>(rng: &mut R) -> Self {
        Self::from_chacha(ChaCha8Rng::from_rng(rng))
    }

    fn from_chacha(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            forks: AtomicU64::new(0),
        }
    }

    /// Draws the priority for a new node
    pub fn draw(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Derives an independent generator for a structure copied off this one
    ///
    /// Only a shared reference is needed, so every fork bumps a counter
    /// and seeds the new generator from the ChaCha stream it selects.
    /// Successive forks never share a stream with each other or with the
    /// source, and the result stays reproducible under a fixed seed.
    pub(crate) fn fork(&self) -> Self {
        let stream = self.forks.fetch_add(1, Ordering::Relaxed) + 1;
        let mut rng = self.rng.clone();
        rng.set_stream(stream);
        Self::from_rng(&mut rng)
    }

    /// Seeds a new generator from this one, advancing it
    pub(crate) fn spawn(&mut self) -> Self {
        Self::from_rng(&mut self.rng)
    }
}

impl Clone for Priorities {
    /// Duplicates the generator state, so both draw the same priorities
    fn clone(&self) -> Self {
        Self {
            rng: self.rng.clone(),
            forks: AtomicU64::new(self.forks.load(Ordering::Relaxed)),
        }
    }
}

impl Default for Priorities {
    fn default() -> Self {
        Self::new()
    }
}
