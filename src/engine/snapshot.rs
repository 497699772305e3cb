//! Snapshot - the read surface rebuilt at the end of every tick

use serde::{Deserialize, Serialize};

use crate::core::chronology::{DayPhase, Season, SimDate, Weather};
use crate::core::types::{Era, Tick};
use crate::economy::resources::ResourceStore;
use crate::engine::events::GameOverReason;
use crate::minigame::catalog::MinigameId;
use crate::settlement::politics::PoliticalClimate;
use crate::settlement::tier::SettlementTier;
use crate::workers::dossier::ThreatLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: Tick,
    pub date: SimDate,
    pub season: Season,
    pub weather: Weather,
    pub day_phase: DayPhase,
    pub era: Era,
    pub resources: ResourceStore,
    pub tier: SettlementTier,
    pub threat: ThreatLevel,
    pub climate: PoliticalClimate,
    pub average_morale: i32,
    pub quota_target: i64,
    pub quota_progress: i64,
    pub quota_deadline_year: i32,
    pub score: i64,
    pub active_minigame: Option<MinigameId>,
    pub game_over: Option<GameOverReason>,
}
