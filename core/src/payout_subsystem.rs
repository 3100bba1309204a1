//! Payout subsystem: bet volume and the level funnel.
//!
//! Execution: runs after growth, on the day's new active-player count.
//!
//! FUNNEL (order matters; each rung only sees the previous rung's survivors):
//!   1. Every active player places a strategy-dependent number of bills.
//!      Their sum enters the bottom rung.
//!   2. At each rung half the entrants win provisionally. A strategy- and
//!      level-dependent fraction of those winners cash out; the rest advance.
//!   3. The top rung is the jackpot: every winner cashes out, nobody advances.
//!   4. The walk stops as soon as a rung has no entrants.
//!
//! Money:
//!   pool      = cash-outs × level × 2, split player / government / charity
//!   platform  = games × platform fee (win or lose)
//!   outreach  = games × outreach levy

use crate::{
    config::{BillRange, SimConfig},
    rng::DayRng,
    state::LevelOutcome,
    strategy::CashOutStrategy,
    types::Level,
};
use std::collections::BTreeMap;

/// Everything the funnel produced for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPayout {
    pub initial_games: u64,
    pub levels: Vec<LevelOutcome>,
    pub games_by_level: BTreeMap<Level, u64>,
    pub games_played: u64,
    pub charity_contributions: f64,
    pub platform_earnings: f64,
    pub government_earnings: f64,
    pub outreach_pot: f64,
    pub player_winnings: f64,
    pub jackpot_winners: u64,
    pub total_wagered: f64,
}

impl DayPayout {
    fn empty(initial_games: u64, config: &SimConfig) -> Self {
        Self {
            initial_games,
            levels: Vec::new(),
            games_by_level: config.levels.iter().map(|level| (*level, 0)).collect(),
            games_played: 0,
            charity_contributions: 0.0,
            platform_earnings: 0.0,
            government_earnings: 0.0,
            outreach_pot: 0.0,
            player_winnings: 0.0,
            jackpot_winners: 0,
            total_wagered: 0.0,
        }
    }

    fn absorb(&mut self, outcome: LevelOutcome) {
        self.games_by_level.insert(outcome.level, outcome.games_at_level);
        self.games_played += outcome.games_at_level;
        self.total_wagered += outcome.games_at_level as f64 * outcome.level as f64;
        self.charity_contributions += outcome.charity_contribution;
        self.platform_earnings += outcome.platform_earnings;
        self.government_earnings += outcome.government_earnings;
        self.outreach_pot += outcome.outreach_pot;
        self.player_winnings += outcome.player_winnings;
        self.jackpot_winners += outcome.jackpot_winners;
        self.levels.push(outcome);
    }
}

/// Sample the day's bet volume and walk it through the ladder.
pub fn resolve_day(
    active_players: i64,
    strategy: CashOutStrategy,
    rng: &mut DayRng,
    config: &SimConfig,
) -> DayPayout {
    let players = active_players.max(0) as u64;
    let range = config.bills.for_strategy(strategy);
    let initial_games = sample_initial_games(players, range, rng, config.per_player_sampling_limit);
    run_funnel(initial_games, strategy, config)
}

/// Total bills placed by `players` players in one day.
///
/// Up to `per_player_limit` players each bill count is drawn individually.
/// Larger populations draw the sum from its normal approximation, which
/// keeps the mean and variance of the exact sum of uniform integers.
pub fn sample_initial_games(
    players: u64,
    range: BillRange,
    rng: &mut DayRng,
    per_player_limit: u64,
) -> u64 {
    if players == 0 {
        return 0;
    }
    if players <= per_player_limit {
        return (0..players).map(|_| rng.next_in_range(range.min, range.max)).sum();
    }

    log::debug!(
        "sampling bills in aggregate for {players} players (limit {per_player_limit})"
    );
    let n = players as f64;
    let k = range.span() as f64;
    let mean = n * (range.min + range.max) as f64 / 2.0;
    let std_dev = (n * (k * k - 1.0) / 12.0).sqrt();

    // Box–Muller; 1 - u keeps the log argument in (0, 1].
    let u1 = 1.0 - rng.next_f64();
    let u2 = rng.next_f64();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();

    let lo = n * range.min as f64;
    let hi = n * range.max as f64;
    (mean + z * std_dev).round().clamp(lo, hi) as u64
}

/// Walk `initial_games` up the ladder. Deterministic; draws no randomness.
pub fn run_funnel(initial_games: u64, strategy: CashOutStrategy, config: &SimConfig) -> DayPayout {
    let mut payout = DayPayout::empty(initial_games, config);
    let last_rung = config.levels.len().saturating_sub(1);
    let mut entrants = initial_games;

    for (rung, &level) in config.levels.iter().enumerate() {
        if entrants == 0 {
            break;
        }
        let outcome = resolve_level(level, entrants, rung == last_rung, strategy, config);
        entrants = outcome_survivors(&outcome);
        log::trace!(
            "level={level} games={} cash_out={} lost={} advancing={entrants}",
            outcome.games_at_level,
            outcome.cash_out_players,
            outcome.losing_players,
        );
        payout.absorb(outcome);
    }
    payout
}

/// Players who won at a rung without cashing out.
fn outcome_survivors(outcome: &LevelOutcome) -> u64 {
    outcome.games_at_level - outcome.losing_players - outcome.cash_out_players
}

fn resolve_level(
    level: Level,
    games: u64,
    is_jackpot: bool,
    strategy: CashOutStrategy,
    config: &SimConfig,
) -> LevelOutcome {
    let winners = games / 2;
    let losing_players = games - winners;
    let (cash_out_probability, cash_out_players) = if is_jackpot {
        (1.0, winners)
    } else {
        let p = config.cash_out.probability(level, strategy);
        let cashed = ((winners as f64 * p).floor() as u64).min(winners);
        (p, cashed)
    };

    let pool = cash_out_players as f64 * level as f64 * 2.0;
    let games_f = games as f64;

    LevelOutcome {
        level,
        games_at_level: games,
        cash_out_probability,
        cash_out_players,
        losing_players,
        platform_earnings: games_f * config.platform_fee,
        charity_contribution: pool * config.charity_share,
        government_earnings: pool * config.government_share,
        player_winnings: pool * config.player_share,
        outreach_pot: games_f * config.outreach_pot_per_game,
        jackpot_winners: if is_jackpot { cash_out_players } else { 0 },
    }
}
