//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used for every stochastic decision in the garage
//! simulation: whether a booking happens this tick, which space is picked,
//! how long the stay lasts, and whether a parked car leaves early.
//!
//! # Determinism
//!
//! Same seed → same sequence → same simulated day. Tests rely on this to
//! replay a day exactly.

use super::RandomSource;
use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use garage_pricing_core::rng::{RandomSource, RngManager};
///
/// let mut rng = RngManager::new(12345);
/// let roll = rng.next_f64();
/// assert!((0.0..1.0).contains(&roll));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is replaced by 1 (xorshift cannot leave the all-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Current internal state, usable as a seed to resume the sequence
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

impl RandomSource for RngManager {
    fn next_f64(&mut self) -> f64 {
        // 53 high bits → [0.0, 1.0)
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }
}
