pub mod chronology;
pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use chronology::{Chronology, DayPhase, Season, Weather};
pub use rng::SimRng;
