//! Save files - full engine state as versioned JSON
//!
//! A save captures every piece of persistent state, including the RNG
//! stream position, so a restored game continues the exact trajectory
//! the unsaved run would have taken. Transient per-tick scratch and the
//! undrained event queue are deliberately not saved; a restore begins at
//! a tick boundary.

use std::collections::VecDeque;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::chronology::Chronology;
use crate::core::error::{Result, SimError};
use crate::core::rng::SimRng;
use crate::core::types::Tick;
use crate::economy::procurement::Procurement;
use crate::economy::resources::ResourceStore;
use crate::economy::Economy;
use crate::engine::events::{AchievementId, GameOverReason};
use crate::engine::snapshot::Snapshot;
use crate::engine::{SimulationEngine, TickScratch};
use crate::minigame::catalog::{MinigameCatalog, MinigameId};
use crate::minigame::router::{ActiveMinigame, MinigameRouter};
use crate::settlement::politics::PoliticalClimate;
use crate::settlement::quota::Quota;
use crate::settlement::scoring::Scoreboard;
use crate::settlement::tier::SettlementTier;
use crate::settlement::BuildingRegistry;
use crate::workers::dossier::Dossier;
use crate::workers::roster::WorkerRoster;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub config: SimulationConfig,
    pub rng: SimRng,
    pub chronology: Chronology,
    pub store: ResourceStore,
    pub economy: Economy,
    pub procurement: Procurement,
    pub quota: Quota,
    pub roster: WorkerRoster,
    pub dossier: Dossier,
    pub buildings: BuildingRegistry,
    pub tier: SettlementTier,
    pub climate: PoliticalClimate,
    pub scoreboard: Scoreboard,
    #[serde(default)]
    pub achievements: Vec<AchievementId>,
    pub game_over: Option<GameOverReason>,
    pub active_minigame: Option<ActiveMinigame>,
    #[serde(default)]
    pub minigame_cooldowns: AHashMap<MinigameId, Tick>,
}

impl SaveGame {
    pub fn capture(engine: &SimulationEngine) -> Self {
        Self {
            version: SAVE_VERSION,
            config: engine.config.clone(),
            rng: engine.rng.clone(),
            chronology: engine.chronology.clone(),
            store: engine.store.clone(),
            economy: engine.economy.clone(),
            procurement: engine.procurement.clone(),
            quota: engine.quota.clone(),
            roster: engine.roster.clone(),
            dossier: engine.dossier.clone(),
            buildings: engine.buildings.clone(),
            tier: engine.tier,
            climate: engine.climate,
            scoreboard: engine.scoreboard.clone(),
            achievements: engine.achievements.clone(),
            game_over: engine.game_over,
            active_minigame: engine.router.active().cloned(),
            minigame_cooldowns: engine.router.cooldowns().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and version-check a save blob
    pub fn from_json(text: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct VersionProbe {
            version: u32,
        }
        let probe: VersionProbe = serde_json::from_str(text)?;
        if probe.version != SAVE_VERSION {
            return Err(SimError::UnsupportedSaveVersion(probe.version));
        }
        Ok(serde_json::from_str(text)?)
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "save written");
        Ok(())
    }

    pub fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl SimulationEngine {
    /// Capture the current persistent state
    pub fn to_save(&self) -> SaveGame {
        SaveGame::capture(self)
    }

    /// Rebuild an engine from a save. Catalogs are code, not state, so
    /// the current definitions always apply.
    pub fn from_save(save: SaveGame) -> Result<Self> {
        save.config.validate()?;
        let cooldown_window = save.config.minigame_cooldown;
        let mut engine = Self {
            rng: save.rng,
            chronology: save.chronology,
            store: save.store,
            economy: save.economy,
            procurement: save.procurement,
            quota: save.quota,
            roster: save.roster,
            dossier: save.dossier,
            buildings: save.buildings,
            tier: save.tier,
            climate: save.climate,
            scoreboard: save.scoreboard,
            router: MinigameRouter::restore(
                save.active_minigame,
                save.minigame_cooldowns,
                cooldown_window,
            ),
            achievements: save.achievements,
            game_over: save.game_over,
            snapshot: Snapshot {
                tick: 0,
                date: crate::core::chronology::SimDate {
                    year: 0,
                    month: 1,
                    day: 1,
                    hour: 0,
                },
                season: crate::core::chronology::Season::Winter,
                weather: crate::core::chronology::Weather::Frost,
                day_phase: crate::core::chronology::DayPhase::Night,
                era: crate::core::types::Era::Revolution,
                resources: ResourceStore::new(),
                tier: save.tier,
                threat: crate::workers::dossier::ThreatLevel::Clear,
                climate: save.climate,
                average_morale: 0,
                quota_target: 0,
                quota_progress: 0,
                quota_deadline_year: 0,
                score: 0,
                active_minigame: None,
                game_over: save.game_over,
            },
            catalog: MinigameCatalog::with_defaults(),
            chains: crate::economy::chains::ChainCatalog::with_defaults(),
            events: VecDeque::new(),
            scratch: TickScratch::default(),
            last_phase_trace: Vec::new(),
            config: save.config,
        };
        engine.sync_snapshot();
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BuildingKind;

    fn engine_at(seed: u64, ticks: u64) -> SimulationEngine {
        let mut engine =
            SimulationEngine::new(seed, SimulationConfig::default()).expect("default config");
        for _ in 0..ticks {
            engine.tick();
        }
        engine
    }

    #[test]
    fn test_round_trip_preserves_snapshot() {
        let mut engine = engine_at(17, 200);
        engine.drain_events();
        let blob = engine.to_save().to_json().expect("serialize save");
        let restored =
            SimulationEngine::from_save(SaveGame::from_json(&blob).expect("parse save"))
                .expect("restore save");
        assert_eq!(engine.snapshot(), restored.snapshot());
    }

    #[test]
    fn test_restored_engine_continues_same_trajectory() {
        let mut original = engine_at(23, 300);
        let blob = original.to_save().to_json().expect("serialize save");
        let mut restored =
            SimulationEngine::from_save(SaveGame::from_json(&blob).expect("parse save"))
                .expect("restore save");
        original.drain_events();
        restored.drain_events();
        for _ in 0..300 {
            original.tick();
            restored.tick();
            assert_eq!(
                original.snapshot(),
                restored.snapshot(),
                "restored run diverged"
            );
            assert_eq!(original.drain_events(), restored.drain_events());
        }
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let engine = engine_at(1, 10);
        let blob = engine.to_save().to_json().expect("serialize save");
        let mut value: serde_json::Value = serde_json::from_str(&blob).expect("parse json");
        value["version"] = serde_json::json!(99);
        let tampered = value.to_string();
        match SaveGame::from_json(&tampered) {
            Err(SimError::UnsupportedSaveVersion(99)) => {}
            other => panic!("expected version rejection, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_active_minigame_survives_restore() {
        let mut engine = engine_at(5, 50);
        engine.place_building(BuildingKind::Mine);
        let id = engine
            .check_building_tap_minigame(BuildingKind::Mine)
            .expect("mine tap presents the expedition");
        let save = engine.to_save();
        let restored = SimulationEngine::from_save(save).expect("restore save");
        assert_eq!(restored.router().active().map(|a| a.id), Some(id));
    }

    #[test]
    fn test_game_over_survives_restore() {
        let mut engine = engine_at(1, 10);
        engine.end_game(GameOverReason::QuotaFailures);
        let restored = SimulationEngine::from_save(engine.to_save()).expect("restore save");
        assert_eq!(restored.game_over(), Some(GameOverReason::QuotaFailures));
        assert_eq!(
            restored.snapshot().game_over,
            Some(GameOverReason::QuotaFailures)
        );
    }
}
