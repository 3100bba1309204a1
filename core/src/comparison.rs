//! Two-track comparison driver.
//!
//! A baseline track grows organically (adoption rate pinned to 0) while
//! an adjusted track runs with its own strategy and adoption rate. The
//! tracks never share state; each tick advances both by one day.

use crate::{
    engine::{validate_adoption_rate, SimEngine, StepParams},
    error::{SimError, SimResult},
    state::SimulationState,
    strategy::CashOutStrategy,
    types::Day,
};
use serde::{Deserialize, Serialize};

pub struct ComparisonRun {
    engine: SimEngine,
    baseline: SimulationState,
    adjusted: SimulationState,
    baseline_strategy: CashOutStrategy,
    adjusted_strategy: CashOutStrategy,
    adjusted_adoption_rate: f64,
}

impl ComparisonRun {
    pub fn new(engine: SimEngine) -> Self {
        let baseline = engine.initial_state();
        let adjusted = engine.initial_state();
        let adjusted_adoption_rate = engine.config().default_adoption_rate;
        Self {
            engine,
            baseline,
            adjusted,
            baseline_strategy: CashOutStrategy::default(),
            adjusted_strategy: CashOutStrategy::default(),
            adjusted_adoption_rate,
        }
    }

    pub fn engine(&self) -> &SimEngine { &self.engine }
    pub fn baseline(&self) -> &SimulationState { &self.baseline }
    pub fn adjusted(&self) -> &SimulationState { &self.adjusted }
    pub fn baseline_strategy(&self) -> CashOutStrategy { self.baseline_strategy }
    pub fn adjusted_strategy(&self) -> CashOutStrategy { self.adjusted_strategy }
    pub fn adjusted_adoption_rate(&self) -> f64 { self.adjusted_adoption_rate }

    pub fn baseline_params(&self) -> StepParams {
        StepParams::organic(self.baseline_strategy)
    }

    pub fn adjusted_params(&self) -> StepParams {
        StepParams::new(self.adjusted_strategy, self.adjusted_adoption_rate)
    }

    /// Both tracks have reached the horizon.
    pub fn is_complete(&self) -> bool {
        self.engine.is_complete(&self.baseline) && self.engine.is_complete(&self.adjusted)
    }

    /// Advance both tracks one day. Neither track changes if either fails.
    pub fn step(&mut self) -> SimResult<()> {
        let baseline = self.engine.simulate_day(&self.baseline, &self.baseline_params())?;
        let adjusted = self.engine.simulate_day(&self.adjusted, &self.adjusted_params())?;
        self.baseline = baseline;
        self.adjusted = adjusted;
        Ok(())
    }

    /// Run up to `days` ticks. Returns how many actually advanced a track.
    pub fn run_days(&mut self, days: u64) -> SimResult<u64> {
        let mut advanced = 0;
        for _ in 0..days {
            if self.is_complete() {
                break;
            }
            self.step()?;
            advanced += 1;
        }
        Ok(advanced)
    }

    /// Back to day 0 with default strategies and adoption rate.
    pub fn reset(&mut self) {
        self.baseline = self.engine.initial_state();
        self.adjusted = self.engine.initial_state();
        self.baseline_strategy = CashOutStrategy::default();
        self.adjusted_strategy = CashOutStrategy::default();
        self.adjusted_adoption_rate = self.engine.config().default_adoption_rate;
        log::info!("comparison run reset");
    }

    /// Set the baseline population on both tracks.
    pub fn update_total_players(&mut self, players: i64) -> SimResult<()> {
        if players < 0 {
            return Err(SimError::InvalidArgument(format!(
                "total players must be >= 0, got {players}"
            )));
        }
        self.baseline = self.baseline.clone().with_total_players(players);
        self.adjusted = self.adjusted.clone().with_total_players(players);
        Ok(())
    }

    pub fn set_baseline_strategy(&mut self, strategy: CashOutStrategy) {
        self.baseline_strategy = strategy;
    }

    pub fn set_adjusted_strategy(&mut self, strategy: CashOutStrategy) {
        self.adjusted_strategy = strategy;
    }

    pub fn set_adjusted_adoption_rate(&mut self, rate: f64) -> SimResult<()> {
        validate_adoption_rate(rate)?;
        self.adjusted_adoption_rate = rate;
        Ok(())
    }

    pub fn summary(&self) -> ComparisonSummary {
        let baseline = TrackSummary::from_state(&self.baseline);
        let adjusted = TrackSummary::from_state(&self.adjusted);
        ComparisonSummary {
            day: self.baseline.day.max(self.adjusted.day),
            delta: adjusted.difference(&baseline),
            baseline,
            adjusted,
        }
    }
}

/// Headline totals of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub day: Day,
    pub active_players: i64,
    pub total_games_played: i64,
    pub total_jackpot_winners: i64,
    pub total_charity: f64,
    pub total_platform_earnings: f64,
    pub total_government_earnings: f64,
    pub total_player_winnings: f64,
    pub total_outreach_pot: f64,
}

impl TrackSummary {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            day: state.day,
            active_players: state.active_players,
            total_games_played: state.total_games_played as i64,
            total_jackpot_winners: state.total_jackpot_winners as i64,
            total_charity: state.total_charity,
            total_platform_earnings: state.total_platform_earnings,
            total_government_earnings: state.total_government_earnings,
            total_player_winnings: state.total_player_winnings,
            total_outreach_pot: state.total_outreach_pot,
        }
    }

    /// `self - other`, field by field. `day` is kept from `self`.
    pub fn difference(&self, other: &TrackSummary) -> TrackSummary {
        TrackSummary {
            day: self.day,
            active_players: self.active_players - other.active_players,
            total_games_played: self.total_games_played - other.total_games_played,
            total_jackpot_winners: self.total_jackpot_winners - other.total_jackpot_winners,
            total_charity: self.total_charity - other.total_charity,
            total_platform_earnings: self.total_platform_earnings - other.total_platform_earnings,
            total_government_earnings: self.total_government_earnings - other.total_government_earnings,
            total_player_winnings: self.total_player_winnings - other.total_player_winnings,
            total_outreach_pot: self.total_outreach_pot - other.total_outreach_pot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub day: Day,
    pub baseline: TrackSummary,
    pub adjusted: TrackSummary,
    /// adjusted - baseline
    pub delta: TrackSummary,
}
