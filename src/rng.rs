//! Seeded pseudo-random number generation.
//!
//! A single [`SeededRng`] instance is created from the configured seed and
//! threaded explicitly through parameter initialization, the corpus shuffle,
//! and sampling, so repeated runs in one process never interfere. Given a
//! fixed seed, the uniform stream, the Gaussian draws, the shuffle order, and
//! the weighted choices are all exactly reproducible.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::weighted::WeightedIndex;
use rand_distr::Distribution;

/// Deterministic random source for the whole pipeline.
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Creates a generator from a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        SeededRng {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Next uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.inner.random()
    }

    /// Gaussian draw via the Box–Muller transform on two uniform draws.
    ///
    /// Used for weight initialization (mean 0, small std).
    pub fn gauss(&mut self, mean: f64, std: f64) -> f64 {
        // ln(0) would be -inf; clamp the first draw away from zero.
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z0 * std
    }

    /// Shuffles a slice in place (deterministic for a fixed seed and input).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Draws an index in `0..weights.len()` with probability proportional to
    /// its weight. Returns `None` when the weights cannot form a distribution
    /// (empty, all zero, or containing invalid entries).
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        WeightedIndex::new(weights)
            .ok()
            .map(|dist| dist.sample(&mut self.inner))
    }
}
