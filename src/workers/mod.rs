//! Workers - the people of the settlement
//!
//! Discrete worker entities with counter ids, plus the settlement's
//! personnel file. Population elsewhere in the simulation is a mirror of
//! the roster count.

pub mod dossier;
pub mod roster;

pub use dossier::{Dossier, DossierCheck, ThreatLevel};
pub use roster::{
    DepartureCause, DepartureStats, Worker, WorkerEvent, WorkerRoster, WorkerTickContext,
};
