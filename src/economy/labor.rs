//! Trudodni - labor-day accounting
//!
//! Each building kind credits labor-days per assigned worker per calendar
//! day. Unlisted kinds fall back to a role rate, then to the global
//! default, so a new building kind never silently earns nothing.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingKind, BuildingRole};

/// Labor-days per worker per day when neither the kind nor its role has
/// a specific rate
pub const DEFAULT_LABOR_RATE: i64 = 1;

/// Per-kind trudodni rate with role fallback
pub fn labor_rate(kind: BuildingKind) -> i64 {
    match kind {
        BuildingKind::Mine | BuildingKind::SteelMill => 2,
        BuildingKind::Kolkhoz | BuildingKind::Sawmill => 1,
        other => match other.role() {
            BuildingRole::Industrial => 2,
            BuildingRole::Agricultural => 1,
            BuildingRole::Civic => 1,
            BuildingRole::Residential => 0,
        },
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaborBook {
    total: i64,
    by_building: AHashMap<BuildingKind, i64>,
}

impl LaborBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a day of labor for `workers` assigned to `kind`.
    /// Returns the trudodni credited.
    pub fn record_labor(&mut self, kind: BuildingKind, workers: u32) -> i64 {
        let credited = labor_rate(kind) * workers as i64;
        if credited > 0 {
            self.total += credited;
            *self.by_building.entry(kind).or_insert(0) += credited;
        }
        credited
    }

    /// Extra credit outside the rate table (hero-worker doubling)
    pub fn credit_bonus(&mut self, kind: BuildingKind, amount: i64) {
        if amount > 0 {
            self.total += amount;
            *self.by_building.entry(kind).or_insert(0) += amount;
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn for_building(&self, kind: BuildingKind) -> i64 {
        self.by_building.get(&kind).copied().unwrap_or(0)
    }
}
