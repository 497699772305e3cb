//! Scoring - the settlement's record, era by era
//!
//! Points are captured when an era closes and once more at game over.
//! The tally is the sum of era scores.

use serde::{Deserialize, Serialize};

use crate::core::types::Era;
use crate::settlement::tier::SettlementTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraScore {
    pub era: Era,
    pub points: i64,
}

/// Points for the current standing, used at each era boundary
pub fn era_points(
    population: u32,
    tier: SettlementTier,
    plans_completed: u32,
    black_marks: u32,
    trudodni: i64,
) -> i64 {
    population as i64 * 10
        + tier.rank() * 100
        + plans_completed as i64 * 50
        + trudodni / 100
        - black_marks as i64 * 20
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    by_era: Vec<EraScore>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the score for an era as it closes. An era is only scored
    /// once; later attempts are ignored.
    pub fn close_era(&mut self, era: Era, points: i64) {
        if self.by_era.iter().any(|score| score.era == era) {
            return;
        }
        tracing::info!(era = era.name(), points, "era closed");
        self.by_era.push(EraScore { era, points });
    }

    pub fn by_era(&self) -> &[EraScore] {
        &self.by_era
    }

    pub fn total(&self) -> i64 {
        self.by_era.iter().map(|score| score.points).sum()
    }
}
