//! Settlement composition and standing
//!
//! The building registry tracks what has been placed; tier, political
//! climate, scoring, and the plan quota read it together with the
//! roster and dossier.

pub mod politics;
pub mod quota;
pub mod scoring;
pub mod tier;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingKind, BuildingRole};

pub use politics::PoliticalClimate;
pub use quota::{Quota, QuotaReview};
pub use scoring::{EraScore, Scoreboard};
pub use tier::SettlementTier;

/// Workers a single building of this kind can employ
pub fn worker_capacity(kind: BuildingKind) -> u32 {
    match kind {
        BuildingKind::Kolkhoz => 6,
        BuildingKind::Mine => 4,
        BuildingKind::Sawmill => 3,
        BuildingKind::SteelMill => 4,
        BuildingKind::PowerStation => 2,
        BuildingKind::Distillery => 2,
        BuildingKind::Bakery => 2,
        _ => 0,
    }
}

/// Residents a housing block shelters
pub const HOUSING_CAPACITY: u32 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingRegistry {
    counts: AHashMap<BuildingKind, u32>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, kind: BuildingKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn remove(&mut self, kind: BuildingKind) -> bool {
        match self.counts.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, kind: BuildingKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn present(&self, kind: BuildingKind) -> bool {
        self.count(kind) > 0
    }

    pub fn present_kinds(&self) -> AHashSet<BuildingKind> {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn count_role(&self, role: BuildingRole) -> u32 {
        self.counts
            .iter()
            .filter(|(kind, _)| kind.role() == role)
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Work slots in a fixed priority order (food first, then industry)
    pub fn worker_slots(&self) -> Vec<(BuildingKind, u32)> {
        const PRIORITY: [BuildingKind; 7] = [
            BuildingKind::Kolkhoz,
            BuildingKind::Bakery,
            BuildingKind::PowerStation,
            BuildingKind::Sawmill,
            BuildingKind::Mine,
            BuildingKind::SteelMill,
            BuildingKind::Distillery,
        ];
        PRIORITY
            .iter()
            .filter(|kind| self.present(**kind))
            .map(|kind| (*kind, self.count(*kind) * worker_capacity(*kind)))
            .collect()
    }

    pub fn housing_capacity(&self) -> u32 {
        self.count(BuildingKind::Housing) * HOUSING_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_remove() {
        let mut registry = BuildingRegistry::new();
        registry.place(BuildingKind::Mine);
        registry.place(BuildingKind::Mine);
        assert_eq!(registry.count(BuildingKind::Mine), 2);
        assert!(registry.remove(BuildingKind::Mine));
        assert_eq!(registry.count(BuildingKind::Mine), 1);
        assert!(!registry.remove(BuildingKind::School));
    }

    #[test]
    fn test_role_counts() {
        let mut registry = BuildingRegistry::new();
        registry.place(BuildingKind::School);
        registry.place(BuildingKind::Clinic);
        registry.place(BuildingKind::Mine);
        assert_eq!(registry.count_role(BuildingRole::Civic), 2);
        assert_eq!(registry.count_role(BuildingRole::Industrial), 1);
    }

    #[test]
    fn test_worker_slots_order_and_capacity() {
        let mut registry = BuildingRegistry::new();
        registry.place(BuildingKind::Mine);
        registry.place(BuildingKind::Kolkhoz);
        registry.place(BuildingKind::Kolkhoz);
        let slots = registry.worker_slots();
        assert_eq!(slots[0], (BuildingKind::Kolkhoz, 12), "food comes first");
        assert_eq!(slots[1], (BuildingKind::Mine, 4));
    }

    #[test]
    fn test_housing_capacity() {
        let mut registry = BuildingRegistry::new();
        assert_eq!(registry.housing_capacity(), 0);
        registry.place(BuildingKind::Housing);
        registry.place(BuildingKind::Housing);
        assert_eq!(registry.housing_capacity(), 20);
    }
}
