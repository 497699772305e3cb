//! The settlement's personnel file
//!
//! Black marks accumulate from failures and scandals; commendations
//! offset them. Threat level is derived from the net record. Marks decay
//! slowly with time, and at the highest threat level a daily arrest draw
//! can end the game.

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatLevel {
    Clear,
    Watched,
    Investigated,
    ArrestImminent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DossierCheck {
    Quiet,
    MarkDecayed,
    ArrestTriggered,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dossier {
    pub black_marks: u32,
    pub commendations: u32,
    last_decay_tick: Tick,
}

impl Dossier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_marks(&mut self, count: u32) {
        self.black_marks += count;
        tracing::debug!(total = self.black_marks, "black marks added");
    }

    pub fn add_commendation(&mut self) {
        self.commendations += 1;
    }

    /// Blat effect: quietly remove one mark. Returns false when the file
    /// is already clean.
    pub fn hush_mark(&mut self) -> bool {
        if self.black_marks == 0 {
            return false;
        }
        self.black_marks -= 1;
        true
    }

    fn net_marks(&self) -> u32 {
        self.black_marks.saturating_sub(self.commendations)
    }

    pub fn threat_level(&self) -> ThreatLevel {
        match self.net_marks() {
            0..=2 => ThreatLevel::Clear,
            3..=5 => ThreatLevel::Watched,
            6..=8 => ThreatLevel::Investigated,
            _ => ThreatLevel::ArrestImminent,
        }
    }

    /// Daily check: decay one mark per interval, and while the threat is
    /// at its maximum, roll for arrest.
    pub fn tick(
        &mut self,
        tick: Tick,
        decay_interval: Tick,
        arrest_probability: f64,
        rng: &mut SimRng,
    ) -> DossierCheck {
        let mut result = DossierCheck::Quiet;
        if self.black_marks > 0 && tick.saturating_sub(self.last_decay_tick) >= decay_interval {
            self.black_marks -= 1;
            self.last_decay_tick = tick;
            result = DossierCheck::MarkDecayed;
        }
        if self.threat_level() == ThreatLevel::ArrestImminent && rng.chance(arrest_probability) {
            return DossierCheck::ArrestTriggered;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_escalation() {
        let mut dossier = Dossier::new();
        assert_eq!(dossier.threat_level(), ThreatLevel::Clear);
        dossier.add_marks(3);
        assert_eq!(dossier.threat_level(), ThreatLevel::Watched);
        dossier.add_marks(3);
        assert_eq!(dossier.threat_level(), ThreatLevel::Investigated);
        dossier.add_marks(3);
        assert_eq!(dossier.threat_level(), ThreatLevel::ArrestImminent);
    }

    #[test]
    fn test_commendations_offset_marks() {
        let mut dossier = Dossier::new();
        dossier.add_marks(4);
        dossier.add_commendation();
        dossier.add_commendation();
        assert_eq!(dossier.threat_level(), ThreatLevel::Clear);
    }

    #[test]
    fn test_hush_mark() {
        let mut dossier = Dossier::new();
        assert!(!dossier.hush_mark());
        dossier.add_marks(1);
        assert!(dossier.hush_mark());
        assert_eq!(dossier.black_marks, 0);
    }

    #[test]
    fn test_marks_decay_on_interval() {
        let mut dossier = Dossier::new();
        dossier.add_marks(2);
        let mut rng = SimRng::seed_from_u64(1);
        assert_eq!(dossier.tick(50, 100, 0.0, &mut rng), DossierCheck::Quiet);
        assert_eq!(dossier.tick(100, 100, 0.0, &mut rng), DossierCheck::MarkDecayed);
        assert_eq!(dossier.black_marks, 1);
        // Interval restarts from the decay tick
        assert_eq!(dossier.tick(150, 100, 0.0, &mut rng), DossierCheck::Quiet);
        assert_eq!(dossier.tick(200, 100, 0.0, &mut rng), DossierCheck::MarkDecayed);
    }

    #[test]
    fn test_arrest_only_at_maximum_threat() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut watched = Dossier::new();
        watched.add_marks(5);
        for day in 0..1000 {
            assert_ne!(
                watched.tick(day, u64::MAX, 1.0, &mut rng),
                DossierCheck::ArrestTriggered,
                "below maximum threat there is no arrest draw"
            );
        }

        let mut imminent = Dossier::new();
        imminent.add_marks(10);
        assert_eq!(
            imminent.tick(0, u64::MAX, 1.0, &mut rng),
            DossierCheck::ArrestTriggered
        );
    }
}
