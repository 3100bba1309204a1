//! Config loading and validation tests.

use zing_core::{
    config::{BillRange, MAX_BILLS_PER_PLAYER, MAX_LEVEL},
    engine::{SimEngine, StepParams},
    error::SimError,
    strategy::CashOutStrategy,
    SimConfig,
};

fn shipped_config_path() -> String {
    format!("{}/../data/sim_config.json", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_config_matches_defaults() {
    let loaded = SimConfig::load(&shipped_config_path()).expect("load data/sim_config.json");
    assert_eq!(loaded, SimConfig::default());
}

#[test]
fn missing_file_reports_path() {
    let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "got: {err}");
}

#[test]
fn partial_json_keeps_defaults() {
    let config = SimConfig::from_json_str(r#"{ "horizon_days": 7, "platform_fee": 0.10 }"#).unwrap();
    assert_eq!(config.horizon_days, 7);
    assert_eq!(config.platform_fee, 0.10);
    assert_eq!(config.levels, SimConfig::default().levels);
    assert_eq!(config.bills.for_strategy(CashOutStrategy::High), BillRange::new(8, 12));
}

#[test]
fn nested_sections_override_individually() {
    let config = SimConfig::from_json_str(r#"{ "cash_out": { "average": 0.3 } }"#).unwrap();
    assert_eq!(config.cash_out.probability(64, CashOutStrategy::Average), 0.3);
    assert_eq!(config.cash_out.low_floor, 0.1);
}

#[test]
fn default_config_round_trips() {
    let json = serde_json::to_string(&SimConfig::default()).unwrap();
    let back = SimConfig::from_json_str(&json).unwrap();
    assert_eq!(back.levels, SimConfig::default().levels);
    assert_eq!(back.horizon_days, 30);
    assert_eq!(back.market_size, 1_000_000);
}

#[test]
fn rejects_non_ascending_ladder() {
    let err = SimConfig::from_json_str(r#"{ "levels": [1, 4, 2] }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");

    let err = SimConfig::from_json_str(r#"{ "levels": [] }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn rejects_shares_not_summing_to_one() {
    let err = SimConfig::from_json_str(r#"{ "player_share": 0.5 }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn rejects_inverted_bill_range() {
    let err = SimConfig::from_json_str(r#"{ "bills": { "low": { "min": 4, "max": 1 } } }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn rejects_probabilities_outside_unit_interval() {
    let err = SimConfig::from_json_str(r#"{ "cash_out": { "average": 1.5 } }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = SimConfig::from_json_str("{ horizon_days: }").unwrap_err();
    assert!(matches!(err, SimError::Serialization(_)), "got {err:?}");
}

#[test]
fn rejects_zero_horizon_and_market() {
    let err = SimConfig::from_json_str(r#"{ "horizon_days": 0 }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");

    let err = SimConfig::from_json_str(r#"{ "market_size": 0 }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn rejects_levels_above_the_ladder_maximum() {
    let err = SimConfig::from_json_str(r#"{ "levels": [1, 4611686018427387904] }"#).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}

#[test]
fn highest_allowed_level_simulates_without_overflow() {
    let config = SimConfig {
        levels: vec![1, 2, MAX_LEVEL],
        ..SimConfig::default()
    };
    let engine = SimEngine::new(config).expect("ladder at the maximum level is valid");
    let params = StepParams::organic(CashOutStrategy::High);

    let state = engine.run_days(&engine.initial_state(), &params, 3).unwrap();

    assert_eq!(state.day, 3);
    assert!(state.total_jackpot_winners > 0, "jackpot rung was never reached");
    assert!(state.total_player_winnings.is_finite());
    assert!(state.history.iter().all(|r| r.total_wagered.is_finite()));
}

#[test]
fn rejects_bill_ranges_above_the_maximum() {
    let json = format!(
        r#"{{ "bills": {{ "high": {{ "min": 0, "max": {} }} }} }}"#,
        u64::MAX
    );
    let err = SimConfig::from_json_str(&json).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");

    let at_limit = format!(
        r#"{{ "bills": {{ "high": {{ "min": 8, "max": {MAX_BILLS_PER_PLAYER} }} }} }}"#
    );
    assert!(SimConfig::from_json_str(&at_limit).is_ok());
}

#[test]
fn rejects_non_finite_organic_random_max() {
    let mut config = SimConfig::default();
    config.organic.random_max = f64::INFINITY;
    let err = config.validate().unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)), "got {err:?}");
}
