//! Settlement tier - official recognition of growth
//!
//! Evaluated from population and building composition. Upper tiers
//! require civic infrastructure, and the regional center requires a
//! party committee.

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingKind, BuildingRole};
use crate::settlement::BuildingRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettlementTier {
    Outpost = 1,
    Village = 2,
    Township = 3,
    City = 4,
    RegionalCenter = 5,
}

impl SettlementTier {
    pub fn name(&self) -> &'static str {
        match self {
            SettlementTier::Outpost => "outpost",
            SettlementTier::Village => "village",
            SettlementTier::Township => "township",
            SettlementTier::City => "city",
            SettlementTier::RegionalCenter => "regional center",
        }
    }

    /// Returns true if this tier outranks the other
    pub fn outranks(&self, other: &SettlementTier) -> bool {
        (*self as u8) > (*other as u8)
    }

    pub fn rank(&self) -> i64 {
        *self as i64
    }
}

/// Highest tier the settlement currently qualifies for
pub fn evaluate(population: u32, registry: &BuildingRegistry) -> SettlementTier {
    let civic = registry.count_role(BuildingRole::Civic);
    let industrial = registry.count_role(BuildingRole::Industrial);
    let housed = registry.present(BuildingKind::Housing);

    if population >= 100 && civic >= 5 && registry.present(BuildingKind::PartyCommittee) {
        SettlementTier::RegionalCenter
    } else if population >= 60 && civic >= 3 && industrial >= 3 {
        SettlementTier::City
    } else if population >= 30 && civic >= 1 {
        SettlementTier::Township
    } else if population >= 15 && housed {
        SettlementTier::Village
    } else {
        SettlementTier::Outpost
    }
}
