//! Replayable random number stream consumed by model updates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// A mutable stream of draws shared by all particles of an ensemble.
///
/// The stream is deterministic for a given seed, and any point in it can be
/// saved with [`Random::checkpoint`] and replayed bit-for-bit with
/// [`Random::replay`].
#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

/// Saved position within a [`Random`] stream.
#[derive(Debug, Clone)]
pub struct RandomCheckpoint(StdRng);

impl Random {
    /// Create a stream from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a stream seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Save the current position in the stream.
    pub fn checkpoint(&self) -> RandomCheckpoint {
        RandomCheckpoint(self.rng.clone())
    }

    /// A new stream producing the same draws as the checkpointed one.
    pub fn replay(checkpoint: &RandomCheckpoint) -> Self {
        Self {
            rng: checkpoint.0.clone(),
        }
    }

    /// Uniform draw on [0, 1).
    pub fn random(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform draw on [min, max).
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.random()
    }

    /// Standard normal draw.
    pub fn random_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Normal draw with the given mean and standard deviation.
    ///
    /// Always consumes exactly one standard normal draw, including when
    /// `sd` is zero.
    pub fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        mean + sd * self.random_normal()
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::from_entropy()
    }
}
