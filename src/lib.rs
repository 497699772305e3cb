//! Sovgorod - deterministic settlement-simulation core
//!
//! Tick-based simulation of a Soviet-era settlement: planned economy,
//! compulsory deliveries, minigames, workers, and political standing.
//! The engine owns a single seeded RNG; the same seed and the same
//! command sequence always produce the same trajectory.

pub mod core;
pub mod economy;
pub mod engine;
pub mod minigame;
pub mod save;
pub mod settlement;
pub mod workers;
