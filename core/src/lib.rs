//! Day-by-day simulation of a pooled-wagering ladder game.
//!
//! The engine is a pure function of (previous state, params, config):
//! see [`engine::SimEngine::simulate_day`].

pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod growth_subsystem;
pub mod payout_subsystem;
pub mod rng;
pub mod rollup_subsystem;
pub mod state;
pub mod strategy;
pub mod types;

pub use config::SimConfig;
pub use engine::{simulate_day, SimEngine, StepParams};
pub use error::{SimError, SimResult};
pub use state::{DailyRecord, LevelOutcome, SimulationState, WeeklyStats};
pub use strategy::CashOutStrategy;
