//! Random number generation for the simulation
//!
//! Provides one shared source for:
//! - Role assignment at deployment
//! - Random-walk and dispersal targets
//! - Per-round shuffling of the execution order
//! - Base placement
//!
//! Seeded runs are fully reproducible; the shuffled order is the only source
//! of ordering effects between agents.

use fastrand::Rng;

/// Seedable simulation RNG
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: Rng,
}

impl SimRng {
    /// Create a reproducible RNG from a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Rng::with_seed(seed),
        }
    }

    /// Create an RNG seeded from entropy
    pub fn from_entropy() -> Self {
        Self { inner: Rng::new() }
    }

    /// Seeded when `seed` is set, entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform integer in `[low, high)`; returns `low` for an empty range
    pub fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.inner.i32(low..high)
    }

    /// Uniform index in `[0, len)`
    ///
    /// # Panics
    /// When `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.usize(..len)
    }

    /// Uniform choice from a slice
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.index(items.len()))
    }

    /// `true` with the given probability
    pub fn weighted_bool(&mut self, probability: f64) -> bool {
        self.inner.f64() < probability
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        self.inner.shuffle(items);
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
