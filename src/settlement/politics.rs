//! Political climate - what the player can see of the watchers
//!
//! Informants and agitators are presentation-level counts derived from
//! the dossier threat and blat exposure. They carry no hidden state of
//! their own.

use serde::{Deserialize, Serialize};

use crate::workers::dossier::ThreatLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliticalClimate {
    pub visible_informants: u32,
    pub agitators: u32,
}

/// Recompute the climate from current standing
pub fn evaluate(
    threat: ThreatLevel,
    blat_balance: i64,
    blat_safe_threshold: i64,
    population: u32,
) -> PoliticalClimate {
    let mut informants = match threat {
        ThreatLevel::Clear => 0,
        ThreatLevel::Watched => 1,
        ThreatLevel::Investigated => 2,
        ThreatLevel::ArrestImminent => 4,
    };
    if blat_balance > blat_safe_threshold {
        informants += ((blat_balance - blat_safe_threshold) / 20) as u32 + 1;
    }
    // One agitator per forty residents keeps the lectures staffed
    let agitators = population / 40 + 1;
    PoliticalClimate {
        visible_informants: informants,
        agitators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_modest_means_no_informants() {
        let climate = evaluate(ThreatLevel::Clear, 10, 20, 30);
        assert_eq!(climate.visible_informants, 0);
        assert_eq!(climate.agitators, 1);
    }

    #[test]
    fn test_threat_brings_informants() {
        assert_eq!(evaluate(ThreatLevel::Watched, 0, 20, 0).visible_informants, 1);
        assert_eq!(
            evaluate(ThreatLevel::ArrestImminent, 0, 20, 0).visible_informants,
            4
        );
    }

    #[test]
    fn test_blat_exposure_adds_informants() {
        let quiet = evaluate(ThreatLevel::Clear, 20, 20, 50);
        let exposed = evaluate(ThreatLevel::Clear, 61, 20, 50);
        assert_eq!(quiet.visible_informants, 0);
        assert_eq!(exposed.visible_informants, 3);
    }
}
