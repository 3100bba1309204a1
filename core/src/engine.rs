//! The simulation engine: one day of the ladder economy per call.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Validate params and the incoming snapshot
//!   2. Horizon check (no-op once reached)
//!   3. Seed the day's RNG from the new day index
//!   4. Growth subsystem (skipped when the day opens with 0 players)
//!   5. Payout subsystem
//!   6. Append the daily record, fold running totals
//!   7. Rollup subsystem
//!
//! RULES:
//!   - The input state is read-only. Every step returns a new state.
//!   - All randomness flows through the day's DayRng.
//!   - There is no loop over days here; drivers own pacing.

use crate::{
    config::SimConfig,
    error::{SimError, SimResult},
    growth_subsystem::{self, GrowthMode},
    payout_subsystem,
    rng::DayRng,
    rollup_subsystem,
    state::{DailyRecord, SimulationState},
    strategy::CashOutStrategy,
};
use serde::{Deserialize, Serialize};

/// Behavioural parameters for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    pub cash_out_strategy: CashOutStrategy,
    /// 0.0 selects organic growth, > 0.0 adoption-driven growth.
    pub adoption_rate: f64,
}

impl StepParams {
    pub fn new(cash_out_strategy: CashOutStrategy, adoption_rate: f64) -> Self {
        Self { cash_out_strategy, adoption_rate }
    }

    pub fn organic(cash_out_strategy: CashOutStrategy) -> Self {
        Self::new(cash_out_strategy, 0.0)
    }

    /// Build from a textual strategy name, validating both fields.
    pub fn parse(strategy: &str, adoption_rate: f64) -> SimResult<Self> {
        let params = Self::new(strategy.parse()?, adoption_rate);
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_adoption_rate(self.adoption_rate)
    }

    pub fn growth_mode(&self) -> GrowthMode {
        GrowthMode::for_rate(self.adoption_rate)
    }
}

pub fn validate_adoption_rate(rate: f64) -> SimResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "adoption rate must be a finite number >= 0, got {rate}"
        )));
    }
    Ok(())
}

pub struct SimEngine {
    config: SimConfig,
}

impl SimEngine {
    /// Build an engine around a validated config.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The day-0 snapshot for this engine's config.
    pub fn initial_state(&self) -> SimulationState {
        SimulationState::initial(&self.config)
    }

    pub fn is_complete(&self, state: &SimulationState) -> bool {
        state.is_complete(self.config.horizon_days)
    }

    /// Advance one day. Returns an identical copy once the horizon is reached.
    pub fn simulate_day(
        &self,
        state: &SimulationState,
        params: &StepParams,
    ) -> SimResult<SimulationState> {
        step(state, params, &self.config)
    }

    /// Fast-forward up to `days` steps, stopping at the horizon.
    pub fn run_days(
        &self,
        state: &SimulationState,
        params: &StepParams,
        days: u64,
    ) -> SimResult<SimulationState> {
        let mut current = state.clone();
        for _ in 0..days {
            if self.is_complete(&current) {
                break;
            }
            current = self.simulate_day(&current, params)?;
        }
        Ok(current)
    }
}

impl Default for SimEngine {
    fn default() -> Self {
        Self { config: SimConfig::default() }
    }
}

/// Stand-alone step for callers that hold a config but no engine.
pub fn simulate_day(
    state: &SimulationState,
    params: &StepParams,
    config: &SimConfig,
) -> SimResult<SimulationState> {
    config.validate()?;
    step(state, params, config)
}

fn step(
    state: &SimulationState,
    params: &StepParams,
    config: &SimConfig,
) -> SimResult<SimulationState> {
    params.validate()?;
    state.validate()?;

    if state.is_complete(config.horizon_days) {
        log::debug!(
            "day={} horizon {} reached; step is a no-op",
            state.day,
            config.horizon_days
        );
        return Ok(state.clone());
    }

    let day = state.day + 1;
    let mut rng = DayRng::for_day(day);

    // A day that opens with nobody playing records an empty day in either mode.
    let active_players = if state.active_players == 0 {
        log::debug!("day={day} no active players; recording an empty day");
        0
    } else {
        growth_subsystem::next_active_players(
            state.active_players,
            day,
            params.adoption_rate,
            &mut rng,
            config,
        )
    };

    let payout = payout_subsystem::resolve_day(
        active_players,
        params.cash_out_strategy,
        &mut rng,
        config,
    );

    log::debug!(
        "day={day} mode={:?} strategy={} active={active_players} bills={} games={} charity={:.2} platform={:.2} jackpot={}",
        params.growth_mode(),
        params.cash_out_strategy,
        payout.initial_games,
        payout.games_played,
        payout.charity_contributions,
        payout.platform_earnings,
        payout.jackpot_winners,
    );

    let record = DailyRecord {
        day,
        active_players,
        total_players: state.total_players,
        games_played: payout.games_played,
        charity_contributions: payout.charity_contributions,
        platform_earnings: payout.platform_earnings,
        government_earnings: payout.government_earnings,
        outreach_pot: payout.outreach_pot,
        player_winnings: payout.player_winnings,
        jackpot_winners: payout.jackpot_winners,
        total_wagered: payout.total_wagered,
        games_by_level: payout.games_by_level,
    };

    let mut history = Vec::with_capacity(state.history.len() + 1);
    history.extend_from_slice(&state.history);
    history.push(record);
    let weekly_rollups = rollup_subsystem::weekly_rollups(&history);

    Ok(SimulationState {
        day,
        active_players,
        total_players: state.total_players,
        total_charity: state.total_charity + payout.charity_contributions,
        total_platform_earnings: state.total_platform_earnings + payout.platform_earnings,
        total_government_earnings: state.total_government_earnings + payout.government_earnings,
        total_outreach_pot: state.total_outreach_pot + payout.outreach_pot,
        total_player_winnings: state.total_player_winnings + payout.player_winnings,
        total_games_played: state.total_games_played + payout.games_played,
        total_jackpot_winners: state.total_jackpot_winners + payout.jackpot_winners,
        history,
        weekly_rollups,
        current_level_breakdown: payout.levels,
    })
}
