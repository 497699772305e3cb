//! Outbound events - the engine's one-way channel to the host
//!
//! The engine never calls back into presentation code; it queues events
//! and the host drains them after each tick (or command). Event order
//! within a tick is part of the deterministic contract.

use crate::core::chronology::{DayPhase, Season, Weather};
use crate::core::types::{BuildingKind, Era, Severity};
use crate::economy::resources::ResourceKind;
use crate::minigame::catalog::MinigameId;
use crate::settlement::scoring::EraScore;
use crate::settlement::tier::SettlementTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameOverReason {
    PopulationWiped,
    QuotaFailures,
    ChairmanArrested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AchievementId {
    TownshipRaised,
    CityRaised,
    PlanFulfilled,
    TenThousandTrudodni,
    SurvivedWar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Toast {
        message: String,
        severity: Severity,
    },
    Advisor {
        message: String,
    },
    Headline {
        text: String,
    },
    DayPhaseChanged(DayPhase),
    SeasonChanged(Season),
    WeatherChanged(Weather),
    EraChanged(Era),
    TierChanged(SettlementTier),
    BuildingCollapsed(BuildingKind),
    NewPlanIssued {
        resource: ResourceKind,
        target: i64,
        deadline_year: i32,
    },
    MinigamePresented {
        id: MinigameId,
    },
    AchievementUnlocked(AchievementId),
    GameOver(GameOverReason),
    FinalTally {
        score: i64,
        by_era: Vec<EraScore>,
    },
}
