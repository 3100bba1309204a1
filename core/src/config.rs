use crate::{
    error::{SimError, SimResult},
    strategy::CashOutStrategy,
    types::{Day, Level},
};
use serde::{Deserialize, Serialize};

// ── Cash-out curve ─────────────────────────────────────────────────

/// Parameters of the per-strategy cash-out probability curve.
///
///   low:     max(low_start  - level / level_scale, low_floor)
///   average: average
///   high:    min(high_start + level / level_scale, high_cap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashOutCurve {
    pub low_start: f64,
    pub low_floor: f64,
    pub high_start: f64,
    pub high_cap: f64,
    pub level_scale: f64,
    pub average: f64,
}

impl Default for CashOutCurve {
    fn default() -> Self {
        Self {
            low_start: 0.9,
            low_floor: 0.1,
            high_start: 0.1,
            high_cap: 0.9,
            level_scale: 100.0,
            average: 0.5,
        }
    }
}

impl CashOutCurve {
    /// Probability that a provisional winner at `level` takes the money.
    pub fn probability(&self, level: Level, strategy: CashOutStrategy) -> f64 {
        let step = level as f64 / self.level_scale;
        match strategy {
            CashOutStrategy::Low     => (self.low_start - step).max(self.low_floor),
            CashOutStrategy::Average => self.average,
            CashOutStrategy::High    => (self.high_start + step).min(self.high_cap),
        }
    }
}

// ── Bills per player per day ───────────────────────────────────────

/// Inclusive range of bets a single player places in a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRange {
    pub min: u64,
    pub max: u64,
}

impl BillRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Number of distinct values in the range.
    pub fn span(&self) -> u64 {
        self.max - self.min + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillRanges {
    pub low: BillRange,
    pub average: BillRange,
    pub high: BillRange,
}

impl Default for BillRanges {
    fn default() -> Self {
        Self {
            low: BillRange::new(1, 4),
            average: BillRange::new(5, 7),
            high: BillRange::new(8, 12),
        }
    }
}

impl BillRanges {
    pub fn for_strategy(&self, strategy: CashOutStrategy) -> BillRange {
        match strategy {
            CashOutStrategy::Low     => self.low,
            CashOutStrategy::Average => self.average,
            CashOutStrategy::High    => self.high,
        }
    }
}

// ── Organic growth ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicGrowthConfig {
    /// Fixed daily growth rate.
    pub base_rate: f64,
    /// Bounds of the random daily component, drawn uniformly.
    pub random_min: f64,
    pub random_max: f64,
    /// Momentum multiplier is 1 + ln(day + 1) / time_factor_divisor.
    pub time_factor_divisor: f64,
}

impl Default for OrganicGrowthConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.01,
            random_min: 0.005,
            random_max: 0.01,
            time_factor_divisor: 10.0,
        }
    }
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// The step becomes a no-op once state.day reaches this.
    pub horizon_days: Day,
    pub initial_players: i64,
    /// Addressable market; upper bound on active players.
    pub market_size: i64,
    /// Ascending ladder. The last rung is the jackpot level.
    pub levels: Vec<Level>,
    /// Flat fee the platform collects per game.
    pub platform_fee: f64,
    pub outreach_pot_per_game: f64,
    pub player_share: f64,
    pub government_share: f64,
    pub charity_share: f64,
    pub cash_out: CashOutCurve,
    pub bills: BillRanges,
    pub organic: OrganicGrowthConfig,
    /// Relative spread applied to adoption-driven growth (0.1 = ±10%).
    pub adoption_jitter: f64,
    /// Populations above this are sampled in aggregate, not per player.
    pub per_player_sampling_limit: u64,
    pub clamp_organic_growth: bool,
    /// Adoption rate the adjusted comparison track starts with.
    pub default_adoption_rate: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            initial_players: 1_000,
            market_size: 1_000_000,
            levels: vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512],
            platform_fee: 0.20,
            outreach_pot_per_game: 0.01,
            player_share: 0.40,
            government_share: 0.40,
            charity_share: 0.20,
            cash_out: CashOutCurve::default(),
            bills: BillRanges::default(),
            organic: OrganicGrowthConfig::default(),
            adoption_jitter: 0.10,
            per_player_sampling_limit: 100_000,
            clamp_organic_growth: true,
            default_adoption_rate: 0.001,
        }
    }
}

const SHARE_TOLERANCE: f64 = 1e-9;

/// Highest ladder level a config may name.
pub const MAX_LEVEL: Level = u32::MAX as Level;

/// Highest bill count a single player may place in a day.
pub const MAX_BILLS_PER_PLAYER: u64 = u32::MAX as u64;

impl SimConfig {
    /// Load from a JSON file. Keys absent from the file keep their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        log::info!("Loaded simulation config from {path}");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The top rung of the ladder.
    pub fn jackpot_level(&self) -> Option<Level> {
        self.levels.last().copied()
    }

    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        if self.horizon_days == 0 {
            return invalid("horizon_days must be > 0".into());
        }
        if self.market_size <= 0 {
            return invalid(format!("market_size must be > 0, got {}", self.market_size));
        }
        if self.initial_players < 0 {
            return invalid(format!("initial_players must be >= 0, got {}", self.initial_players));
        }
        if self.levels.is_empty() {
            return invalid("level ladder is empty".into());
        }
        if self.levels[0] == 0 || self.levels.windows(2).any(|w| w[0] >= w[1]) {
            return invalid(format!("levels must be positive and strictly ascending: {:?}", self.levels));
        }
        if let Some(top) = self.levels.last().filter(|top| **top > MAX_LEVEL) {
            return invalid(format!("level {top} exceeds the maximum of {MAX_LEVEL}"));
        }
        for (name, value) in [
            ("platform_fee", self.platform_fee),
            ("outreach_pot_per_game", self.outreach_pot_per_game),
            ("player_share", self.player_share),
            ("government_share", self.government_share),
            ("charity_share", self.charity_share),
            ("adoption_jitter", self.adoption_jitter),
            ("default_adoption_rate", self.default_adoption_rate),
            ("organic.base_rate", self.organic.base_rate),
            ("organic.random_min", self.organic.random_min),
            ("organic.random_max", self.organic.random_max),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        let share_sum = self.player_share + self.government_share + self.charity_share;
        if (share_sum - 1.0).abs() > SHARE_TOLERANCE {
            return invalid(format!("revenue shares must sum to 1.0, got {share_sum}"));
        }
        if !(self.organic.random_max >= self.organic.random_min) {
            return invalid("organic.random_max must be >= organic.random_min".into());
        }
        if !(self.organic.time_factor_divisor > 0.0) {
            return invalid("organic.time_factor_divisor must be > 0".into());
        }
        if !(self.cash_out.level_scale > 0.0) {
            return invalid("cash_out.level_scale must be > 0".into());
        }
        for strategy in CashOutStrategy::ALL {
            let range = self.bills.for_strategy(strategy);
            if range.min > range.max {
                return invalid(format!(
                    "bill range for {strategy} is inverted: {}..={}",
                    range.min, range.max
                ));
            }
            if range.max > MAX_BILLS_PER_PLAYER {
                return invalid(format!(
                    "bill range for {strategy} allows {} bills, maximum is {MAX_BILLS_PER_PLAYER}",
                    range.max
                ));
            }
            for level in &self.levels {
                let p = self.cash_out.probability(*level, strategy);
                if !(0.0..=1.0).contains(&p) {
                    return invalid(format!(
                        "cash-out probability {p} for {strategy} at level {level} is outside [0, 1]"
                    ));
                }
            }
        }
        Ok(())
    }
}
