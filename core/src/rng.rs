//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through a DayRng seeded from the index of the
//! day being simulated.
//!
//! The generator is the classic linear congruential recurrence
//!   seed = (seed * 9301 + 49297) mod 233280
//! with output seed / 233280. Its statistical quality is weak; only
//! reproducibility matters here. Because the seed is the day index:
//!   - Recomputing an earlier day never shifts a later day's stream.
//!   - Two tracks simulating the same day number draw the same stream.

use crate::types::Day;
use rand::SeedableRng;

pub const LCG_MULTIPLIER: u64 = 9301;
pub const LCG_INCREMENT: u64 = 49297;
pub const LCG_MODULUS: u64 = 233_280;

/// A deterministic RNG for a single simulated day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRng {
    state: u64,
}

impl DayRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// The stream used to simulate `day`.
    pub fn for_day(day: Day) -> Self {
        Self::seed_from_u64(day)
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        // (s mod M) * A + C is congruent to s * A + C and cannot overflow.
        self.state = ((self.state % LCG_MODULUS) * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Roll an integer in the inclusive range [min, max].
    pub fn next_in_range(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(min <= max, "empty range {min}..={max}");
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as u64 + min
    }
}

impl SeedableRng for DayRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    /// Stores the seed verbatim. The default implementation scrambles it,
    /// which would break the day-index seeding contract.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
