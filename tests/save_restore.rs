//! Save/restore integration: a restored game is indistinguishable from
//! one that never stopped.

use sovgorod::core::config::SimulationConfig;
use sovgorod::core::types::BuildingKind;
use sovgorod::engine::SimulationEngine;
use sovgorod::minigame::catalog::ChoiceId;
use sovgorod::save::SaveGame;

fn played_engine(seed: u64) -> SimulationEngine {
    let mut engine =
        SimulationEngine::new(seed, SimulationConfig::default()).expect("default config");
    for tick in 1..=800 {
        match tick {
            50 => {
                engine.place_building(BuildingKind::Mine);
            }
            60 => {
                engine.check_building_tap_minigame(BuildingKind::Mine);
            }
            61 => {
                engine.resolve_minigame_choice(ChoiceId(1));
            }
            62 => {
                engine.clear_resolved_minigame();
            }
            _ => {}
        }
        engine.tick();
    }
    engine.drain_events();
    engine
}

#[test]
fn test_two_restores_from_one_save_stay_in_lockstep() {
    let engine = played_engine(31);
    let blob = engine.to_save().to_json().expect("serialize save");

    let mut first =
        SimulationEngine::from_save(SaveGame::from_json(&blob).expect("parse save"))
            .expect("restore save");
    let mut second =
        SimulationEngine::from_save(SaveGame::from_json(&blob).expect("parse save"))
            .expect("restore save");

    for tick in 1..=1500 {
        if tick == 200 {
            first.place_building(BuildingKind::Bakery);
            second.place_building(BuildingKind::Bakery);
        }
        first.tick();
        second.tick();
        assert_eq!(
            first.drain_events(),
            second.drain_events(),
            "restored twins diverged at tick {}",
            tick
        );
    }
    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn test_restore_continues_the_unsaved_trajectory() {
    let mut live = played_engine(47);
    let blob = live.to_save().to_json().expect("serialize save");
    let mut restored =
        SimulationEngine::from_save(SaveGame::from_json(&blob).expect("parse save"))
            .expect("restore save");

    for tick in 1..=1000 {
        live.tick();
        restored.tick();
        assert_eq!(
            live.snapshot(),
            restored.snapshot(),
            "restore diverged from the live run at tick {}",
            tick
        );
        assert_eq!(live.drain_events(), restored.drain_events());
    }
}

#[test]
fn test_save_file_round_trip() {
    let engine = played_engine(5);
    let path = std::env::temp_dir().join("sovgorod_save_roundtrip.json");
    engine.to_save().write_file(&path).expect("write save");
    let loaded = SaveGame::read_file(&path).expect("read save");
    let restored = SimulationEngine::from_save(loaded).expect("restore save");
    assert_eq!(engine.snapshot(), restored.snapshot());
    std::fs::remove_file(&path).ok();
}
