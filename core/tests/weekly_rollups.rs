//! Weekly rollup tests: synthetic histories with known values.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::BTreeMap;
use zing_core::{
    engine::{SimEngine, StepParams},
    rollup_subsystem::{weekly_rollups, DAYS_PER_WEEK},
    state::DailyRecord,
    strategy::CashOutStrategy,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn record(day: u64, active_players: i64, games_played: u64) -> DailyRecord {
    DailyRecord {
        day,
        active_players,
        total_players: 1_000,
        games_played,
        charity_contributions: games_played as f64 * 0.5,
        platform_earnings: games_played as f64 * 0.2,
        government_earnings: 0.0,
        outreach_pot: games_played as f64 * 0.01,
        player_winnings: 0.0,
        jackpot_winners: day % 3,
        total_wagered: games_played as f64,
        games_by_level: BTreeMap::new(),
    }
}

fn synthetic_history(days: u64) -> Vec<DailyRecord> {
    (1..=days).map(|d| record(d, 1_000 + 10 * d as i64, d * 10)).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn fourteen_days_make_two_weeks() {
    let history = synthetic_history(14);
    let weeks = weekly_rollups(&history);

    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week, 1);
    assert_eq!(weeks[1].week, 2);

    let first_week_games: u64 = history[0..7].iter().map(|d| d.games_played).sum();
    assert_eq!(weeks[0].total_games_played, first_week_games);
    assert_eq!(weeks[0].total_games_played, 280);
    assert_eq!(weeks[1].total_games_played, 770);

    assert!((weeks[0].total_charity - 140.0).abs() < 1e-9);
    assert!((weeks[0].total_platform_earnings - 56.0).abs() < 1e-9);
    assert_eq!(weeks[0].total_jackpot_winners, (1..=7).map(|d| d % 3).sum::<u64>());
    assert!((weeks[0].average_daily_games - 40.0).abs() < 1e-9);
}

#[test]
fn growth_is_first_to_last_day_percent() {
    let history = synthetic_history(7);
    let weeks = weekly_rollups(&history);
    // 1010 -> 1070
    let expected = (1_070.0 - 1_010.0) / 1_010.0 * 100.0;
    assert!((weeks[0].active_players_growth - expected).abs() < 1e-9);
}

#[test]
fn partial_last_week_uses_its_own_length() {
    let history = synthetic_history(10);
    let weeks = weekly_rollups(&history);

    assert_eq!(weeks.len(), 2);
    // days 8, 9, 10
    assert_eq!(weeks[1].total_games_played, 270);
    assert!((weeks[1].average_daily_games - 90.0).abs() < 1e-9);
}

#[test]
fn zero_starting_players_yields_zero_growth() {
    let history = vec![record(1, 0, 0), record(2, 50, 10), record(3, 80, 20)];
    let weeks = weekly_rollups(&history);
    assert_eq!(weeks[0].active_players_growth, 0.0);
}

#[test]
fn empty_history_has_no_weeks() {
    assert!(weekly_rollups(&[]).is_empty());
}

#[test]
fn random_histories_roll_up_consistently() {
    let mut rng = Pcg64Mcg::seed_from_u64(0xC0FF_EE00_D15C_0001);

    for _ in 0..200 {
        let days = rng.gen_range(0..60u64);
        let history: Vec<DailyRecord> = (1..=days)
            .map(|d| record(d, rng.gen_range(0..5_000), rng.gen_range(0..100_000)))
            .collect();

        let weeks = weekly_rollups(&history);
        let expected_weeks = (days as usize).div_ceil(DAYS_PER_WEEK);
        assert_eq!(weeks.len(), expected_weeks, "{days} days");

        for (i, week) in weeks.iter().enumerate() {
            let start = i * DAYS_PER_WEEK;
            let end = (start + DAYS_PER_WEEK).min(history.len());
            let games: u64 = history[start..end].iter().map(|d| d.games_played).sum();
            assert_eq!(week.week, i as u64 + 1);
            assert_eq!(week.total_games_played, games, "week {} of {days} days", i + 1);
        }

        let rolled: u64 = weeks.iter().map(|w| w.total_games_played).sum();
        let daily: u64 = history.iter().map(|d| d.games_played).sum();
        assert_eq!(rolled, daily);
    }
}

#[test]
fn engine_keeps_rollups_in_step_with_history() {
    let engine = SimEngine::default();
    let params = StepParams::organic(CashOutStrategy::Average);
    let mut state = engine.initial_state();

    for _ in 0..30 {
        state = engine.simulate_day(&state, &params).unwrap();
        assert_eq!(state.weekly_rollups, weekly_rollups(&state.history));
    }
    assert_eq!(state.weekly_rollups.len(), 5, "30 days is four full weeks and a partial");
}
