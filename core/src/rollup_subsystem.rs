//! Rollup subsystem: weekly statistics derived from history.
//!
//! This subsystem is REACTIVE. It never reads the RNG and never sees
//! anything but the history slice it is given. Rollups are recomputed
//! from scratch after every step; history is bounded by the horizon.

use crate::state::{DailyRecord, WeeklyStats};

pub const DAYS_PER_WEEK: usize = 7;

/// Non-overlapping 7-day windows from history[0]. The last may be partial.
pub fn weekly_rollups(history: &[DailyRecord]) -> Vec<WeeklyStats> {
    history
        .chunks(DAYS_PER_WEEK)
        .enumerate()
        .map(|(i, window)| summarize_week(i as u64 + 1, window))
        .collect()
}

/// Summarise one window of consecutive daily records.
pub fn summarize_week(week: u64, window: &[DailyRecord]) -> WeeklyStats {
    let total_games_played: u64 = window.iter().map(|d| d.games_played).sum();
    let average_daily_games = if window.is_empty() {
        0.0
    } else {
        total_games_played as f64 / window.len() as f64
    };

    WeeklyStats {
        week,
        total_charity: window.iter().map(|d| d.charity_contributions).sum(),
        total_platform_earnings: window.iter().map(|d| d.platform_earnings).sum(),
        total_jackpot_winners: window.iter().map(|d| d.jackpot_winners).sum(),
        total_games_played,
        active_players_growth: active_players_growth(window),
        average_daily_games,
    }
}

/// Percent growth first → last day. 0.0 when the window starts empty.
fn active_players_growth(window: &[DailyRecord]) -> f64 {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) if first.active_players != 0 => {
            (last.active_players - first.active_players) as f64 / first.active_players as f64 * 100.0
        }
        _ => 0.0,
    }
}
