//! Seeded random source for the simulation.
//!
//! Every stochastic decision in the core (currently: spawn jitter) draws from
//! the single `DeterministicRng` owned by the match context. ChaCha8 is
//! specified bit-for-bit, so a seed reproduces the same draw sequence on every
//! platform and process.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed: u64,
    gen: ChaCha8Rng,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, gen: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Rebuild the generator from `seed`, discarding all prior draws.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.gen = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[low, high)`. Degenerate ranges return `low`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if !(high > low) {
            return low;
        }
        self.gen.gen_range(low..high)
    }

    /// Uniform integer in `[low, high)`. Degenerate ranges return `low`.
    pub fn integer(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.gen.gen_range(low..high)
    }

    /// Gaussian sample. A non-positive or non-finite `std` yields `mean` without a draw.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        match Normal::new(mean, std) {
            Ok(dist) if std > 0.0 => dist.sample(&mut self.gen),
            _ => mean,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}
