//! Simulation state: the snapshot a driver carries from day to day.
//!
//! RULE: The engine never mutates a SimulationState it is handed.
//! Each step clones what it needs and returns a new snapshot.

use crate::{
    config::SimConfig,
    error::{SimError, SimResult},
    types::{Day, Level},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one ladder rung on the most recent day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelOutcome {
    pub level: Level,
    pub games_at_level: u64,
    pub cash_out_probability: f64,
    pub cash_out_players: u64,
    pub losing_players: u64,
    pub platform_earnings: f64,
    pub charity_contribution: f64,
    pub government_earnings: f64,
    pub player_winnings: f64,
    pub outreach_pot: f64,
    pub jackpot_winners: u64,
}

impl LevelOutcome {
    /// Pool distributed at this level across players, government and charity.
    pub fn distributed(&self) -> f64 {
        self.player_winnings + self.government_earnings + self.charity_contribution
    }
}

/// One completed day. Immutable once appended to history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub day: Day,
    pub active_players: i64,
    pub total_players: i64,
    pub games_played: u64,
    pub charity_contributions: f64,
    pub platform_earnings: f64,
    pub government_earnings: f64,
    pub outreach_pot: f64,
    pub player_winnings: f64,
    pub jackpot_winners: u64,
    /// Σ games × level over the ladder.
    pub total_wagered: f64,
    /// Every ladder level, including rungs the funnel never reached (0).
    pub games_by_level: BTreeMap<Level, u64>,
}

/// Seven-day rollup derived from history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    /// 1-based.
    pub week: u64,
    pub total_charity: f64,
    pub total_platform_earnings: f64,
    pub total_jackpot_winners: u64,
    pub total_games_played: u64,
    /// Percent change in active players from the first to the last day.
    pub active_players_growth: f64,
    pub average_daily_games: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub day: Day,
    pub active_players: i64,
    pub total_players: i64,

    // Running totals
    pub total_charity: f64,
    pub total_platform_earnings: f64,
    pub total_government_earnings: f64,
    pub total_outreach_pot: f64,
    /// Player share only; government and charity shares are tracked apart.
    pub total_player_winnings: f64,
    pub total_games_played: u64,
    pub total_jackpot_winners: u64,

    pub history: Vec<DailyRecord>,
    pub weekly_rollups: Vec<WeeklyStats>,
    pub current_level_breakdown: Vec<LevelOutcome>,
}

impl SimulationState {
    /// A day-0 state with `players` both total and active.
    pub fn new(players: i64) -> Self {
        Self {
            day: 0,
            active_players: players,
            total_players: players,
            total_charity: 0.0,
            total_platform_earnings: 0.0,
            total_government_earnings: 0.0,
            total_outreach_pot: 0.0,
            total_player_winnings: 0.0,
            total_games_played: 0,
            total_jackpot_winners: 0,
            history: Vec::new(),
            weekly_rollups: Vec::new(),
            current_level_breakdown: Vec::new(),
        }
    }

    pub fn initial(config: &SimConfig) -> Self {
        Self::new(config.initial_players)
    }

    /// Replace the baseline population. Active players follow it.
    pub fn with_total_players(mut self, players: i64) -> Self {
        self.total_players = players;
        self.active_players = players;
        self
    }

    pub fn is_complete(&self, horizon: Day) -> bool {
        self.day >= horizon
    }

    pub fn latest_record(&self) -> Option<&DailyRecord> {
        self.history.last()
    }

    /// Reject snapshots the engine must not simulate from.
    pub fn validate(&self) -> SimResult<()> {
        if self.active_players < 0 {
            return Err(SimError::InvalidState(format!(
                "active_players must be >= 0, got {}",
                self.active_players
            )));
        }
        if self.total_players < 0 {
            return Err(SimError::InvalidState(format!(
                "total_players must be >= 0, got {}",
                self.total_players
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::initial(&SimConfig::default())
    }
}
