//! Growth subsystem: active-player count for the next day.
//!
//! Execution: runs first in every step and consumes exactly one draw
//! from the day's RNG, whichever branch is taken.
//!
//! Two regimes, selected by the adoption rate:
//!   - 0.0  organic compounding growth with a momentum multiplier
//!   - > 0  adoption from a fixed addressable market, ±jitter

use crate::{config::SimConfig, rng::DayRng, types::Day};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthMode {
    Organic,
    Adoption,
}

impl GrowthMode {
    pub fn for_rate(adoption_rate: f64) -> Self {
        if adoption_rate == 0.0 {
            Self::Organic
        } else {
            Self::Adoption
        }
    }
}

/// Active players on `day` given the previous day's count.
/// `day` is the index of the day being simulated (prior day + 1).
pub fn next_active_players(
    prev_active: i64,
    day: Day,
    adoption_rate: f64,
    rng: &mut DayRng,
    config: &SimConfig,
) -> i64 {
    let next = match GrowthMode::for_rate(adoption_rate) {
        GrowthMode::Organic => {
            let grown = organic_growth(prev_active, day, rng, config);
            if config.clamp_organic_growth {
                grown.min(config.market_size)
            } else {
                grown
            }
        }
        GrowthMode::Adoption => adoption_growth(prev_active, adoption_rate, rng, config),
    };
    next.max(0)
}

/// Effective daily growth rate of the organic regime for a given draw.
pub fn organic_rate(day: Day, draw: f64, config: &SimConfig) -> f64 {
    let organic = &config.organic;
    let random_component = organic.random_min + draw * (organic.random_max - organic.random_min);
    let time_factor = ((day + 1) as f64).ln() / organic.time_factor_divisor;
    (organic.base_rate + random_component) * (1.0 + time_factor)
}

fn organic_growth(prev_active: i64, day: Day, rng: &mut DayRng, config: &SimConfig) -> i64 {
    let rate = organic_rate(day, rng.next_f64(), config);
    (prev_active as f64 * (1.0 + rate)).floor() as i64
}

fn adoption_growth(prev_active: i64, adoption_rate: f64, rng: &mut DayRng, config: &SimConfig) -> i64 {
    let base_adopted = (config.market_size as f64 * adoption_rate).floor();
    let spread = config.adoption_jitter;
    let jitter = (rng.next_f64() * base_adopted * 2.0 * spread).floor() - (base_adopted * spread).floor();
    let adopted = (base_adopted + jitter) as i64;
    config.market_size.min(prev_active.saturating_add(adopted))
}
