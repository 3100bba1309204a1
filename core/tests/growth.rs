//! Growth model tests.

use zing_core::{
    engine::{SimEngine, StepParams},
    growth_subsystem::{next_active_players, organic_rate, GrowthMode},
    rng::DayRng,
    state::SimulationState,
    strategy::CashOutStrategy,
    SimConfig,
};

#[test]
fn zero_rate_selects_organic_growth() {
    assert_eq!(GrowthMode::for_rate(0.0), GrowthMode::Organic);
    assert_eq!(GrowthMode::for_rate(0.0001), GrowthMode::Adoption);
}

#[test]
fn organic_rate_grows_with_day() {
    let config = SimConfig::default();
    let early = organic_rate(1, 0.5, &config);
    let late = organic_rate(30, 0.5, &config);
    assert!(late > early, "momentum multiplier should rise: {early} vs {late}");
}

#[test]
fn organic_rate_stays_within_configured_band() {
    let config = SimConfig::default();
    for day in 1..=30 {
        let multiplier = 1.0 + ((day + 1) as f64).ln() / 10.0;
        let lo = (0.01 + 0.005) * multiplier;
        let hi = (0.01 + 0.01) * multiplier;
        for draw in [0.0, 0.25, 0.5, 0.999] {
            let rate = organic_rate(day, draw, &config);
            assert!(
                rate >= lo - 1e-12 && rate <= hi + 1e-12,
                "day {day} draw {draw}: rate {rate} outside [{lo}, {hi}]"
            );
        }
    }
}

#[test]
fn organic_growth_never_shrinks_the_population() {
    let engine = SimEngine::default();
    let params = StepParams::organic(CashOutStrategy::Average);
    let mut state = engine.initial_state();
    for _ in 0..30 {
        let next = engine.simulate_day(&state, &params).unwrap();
        assert!(
            next.active_players >= state.active_players,
            "day {}: {} -> {}",
            next.day,
            state.active_players,
            next.active_players
        );
        state = next;
    }
}

#[test]
fn adoption_adds_about_rate_times_market() {
    let config = SimConfig::default();
    for day in 1..=30 {
        let mut rng = DayRng::for_day(day);
        let next = next_active_players(1_000, day, 0.001, &mut rng, &config);
        // base 1000 adopted, jitter in [-100, 100)
        assert!(
            (1_900..2_100).contains(&next),
            "day {day}: adoption produced {next}"
        );
    }
}

#[test]
fn adoption_is_clamped_to_market_size() {
    let config = SimConfig::default();
    let mut rng = DayRng::for_day(4);
    let next = next_active_players(999_999, 4, 0.5, &mut rng, &config);
    assert_eq!(next, config.market_size);
}

#[test]
fn organic_clamp_follows_config() {
    let clamped = SimConfig::default();
    let unclamped = SimConfig {
        clamp_organic_growth: false,
        ..SimConfig::default()
    };

    let near_market = 999_990;
    let a = next_active_players(near_market, 5, 0.0, &mut DayRng::for_day(5), &clamped);
    let b = next_active_players(near_market, 5, 0.0, &mut DayRng::for_day(5), &unclamped);

    assert_eq!(a, clamped.market_size);
    assert!(b > unclamped.market_size, "unclamped growth stopped at {b}");
}

#[test]
fn zero_players_stay_at_zero_in_every_mode() {
    let engine = SimEngine::default();
    let start = SimulationState::new(0);
    for rate in [0.0, 0.001] {
        let next = engine
            .simulate_day(&start, &StepParams::new(CashOutStrategy::Average, rate))
            .unwrap();
        assert_eq!(next.day, 1);
        assert_eq!(next.active_players, 0, "rate {rate} grew an empty population");
        assert_eq!(next.history[0].games_played, 0, "rate {rate} played games with no players");
        assert_eq!(next.total_games_played, 0);
    }
}

#[test]
fn adoption_grows_a_nonempty_population() {
    let engine = SimEngine::default();
    let start = SimulationState::new(1);
    let next = engine
        .simulate_day(&start, &StepParams::new(CashOutStrategy::Low, 0.001))
        .unwrap();
    assert!(next.active_players > 1);
    assert!(next.total_games_played > 0);
}

#[test]
fn growth_consumes_one_draw_in_each_mode() {
    let config = SimConfig::default();
    for rate in [0.0, 0.001] {
        let mut used = DayRng::for_day(12);
        let _ = next_active_players(5_000, 12, rate, &mut used, &config);

        let mut reference = DayRng::for_day(12);
        let _ = reference.next_f64();

        assert_eq!(used, reference, "rate {rate} consumed an unexpected number of draws");
    }
}
