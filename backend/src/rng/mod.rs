//! Deterministic random number generation
//!
//! All randomness in the simulation goes through a [`RandomSource`]. The
//! production source is the seeded [`RngManager`]; tests can inject scripted
//! sources to force a branch.

mod xorshift;

pub use xorshift::RngManager;

/// Source of uniform draws in `[0.0, 1.0)`.
///
/// Everything else (Bernoulli trials, weighted picks) is derived from
/// `next_f64` so any implementation yields the same decision logic.
pub trait RandomSource {
    /// Uniform draw in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;

    /// Bernoulli trial: true with probability `probability`
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform index in `[0, len)`. `len` must be positive.
    fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot pick from an empty set");
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Falls back to a uniform pick when the weights sum to zero (or are not
    /// finite). Returns `None` only for an empty slice.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Some(self.index(weights.len()));
        }

        let target = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if target <= cumulative {
                return Some(i);
            }
        }

        // Float rounding can leave target just above the final sum
        Some(weights.len() - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
