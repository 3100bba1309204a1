//! Shared primitive types used across the entire simulation.

/// A simulated day. Day 0 is the state before the first step.
pub type Day = u64;

/// A ladder rung, expressed as the stake per side of a game at that rung.
pub type Level = u64;

/// The canonical run identifier used by drivers.
pub type RunId = String;
