//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub u32);

impl WorkerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Historical era, derived from the calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Era {
    Revolution = 1,
    FirstPlans = 2,
    War = 3,
    Reconstruction = 4,
    Thaw = 5,
    Stagnation = 6,
}

impl Era {
    pub fn from_year(year: i32) -> Self {
        match year {
            i32::MIN..=1928 => Era::Revolution,
            1929..=1940 => Era::FirstPlans,
            1941..=1945 => Era::War,
            1946..=1952 => Era::Reconstruction,
            1953..=1964 => Era::Thaw,
            _ => Era::Stagnation,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Era::Revolution => "Revolution",
            Era::FirstPlans => "First Five-Year Plans",
            Era::War => "Great Patriotic War",
            Era::Reconstruction => "Reconstruction",
            Era::Thaw => "Thaw",
            Era::Stagnation => "Stagnation",
        }
    }

    /// Returns true if this era comes after the other
    pub fn is_later_than(&self, other: &Era) -> bool {
        (*self as u8) > (*other as u8)
    }
}

/// Broad functional role of a building kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingRole {
    Agricultural,
    Industrial,
    Residential,
    Civic,
}

/// Every placeable building in the settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Kolkhoz,
    Mine,
    Sawmill,
    SteelMill,
    PowerStation,
    Distillery,
    Bakery,
    Housing,
    PartyCommittee,
    Clinic,
    School,
    Warehouse,
}

impl BuildingKind {
    pub fn role(&self) -> BuildingRole {
        match self {
            BuildingKind::Kolkhoz => BuildingRole::Agricultural,
            BuildingKind::Mine
            | BuildingKind::Sawmill
            | BuildingKind::SteelMill
            | BuildingKind::PowerStation
            | BuildingKind::Distillery
            | BuildingKind::Bakery => BuildingRole::Industrial,
            BuildingKind::Housing => BuildingRole::Residential,
            BuildingKind::PartyCommittee
            | BuildingKind::Clinic
            | BuildingKind::School
            | BuildingKind::Warehouse => BuildingRole::Civic,
        }
    }

    /// Industrial consumers that stall when the power balance is negative
    pub fn needs_power(&self) -> bool {
        matches!(self, BuildingKind::SteelMill | BuildingKind::Distillery)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::Kolkhoz => "kolkhoz",
            BuildingKind::Mine => "mine",
            BuildingKind::Sawmill => "sawmill",
            BuildingKind::SteelMill => "steel mill",
            BuildingKind::PowerStation => "power station",
            BuildingKind::Distillery => "distillery",
            BuildingKind::Bakery => "bakery",
            BuildingKind::Housing => "housing block",
            BuildingKind::PartyCommittee => "party committee",
            BuildingKind::Clinic => "clinic",
            BuildingKind::School => "school",
            BuildingKind::Warehouse => "warehouse",
        }
    }
}

/// Severity attached to user-facing notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_id_equality() {
        let a = WorkerId(1);
        let b = WorkerId(1);
        let c = WorkerId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_era_from_year_boundaries() {
        assert_eq!(Era::from_year(1917), Era::Revolution);
        assert_eq!(Era::from_year(1928), Era::Revolution);
        assert_eq!(Era::from_year(1929), Era::FirstPlans);
        assert_eq!(Era::from_year(1941), Era::War);
        assert_eq!(Era::from_year(1945), Era::War);
        assert_eq!(Era::from_year(1946), Era::Reconstruction);
        assert_eq!(Era::from_year(1953), Era::Thaw);
        assert_eq!(Era::from_year(1965), Era::Stagnation);
        assert_eq!(Era::from_year(1991), Era::Stagnation);
    }

    #[test]
    fn test_era_ordering() {
        assert!(Era::War.is_later_than(&Era::FirstPlans));
        assert!(Era::Stagnation.is_later_than(&Era::Thaw));
        assert!(!Era::Revolution.is_later_than(&Era::Revolution));
        assert!(!Era::Thaw.is_later_than(&Era::Stagnation));
    }

    #[test]
    fn test_building_roles() {
        assert_eq!(BuildingKind::Kolkhoz.role(), BuildingRole::Agricultural);
        assert_eq!(BuildingKind::SteelMill.role(), BuildingRole::Industrial);
        assert_eq!(BuildingKind::Housing.role(), BuildingRole::Residential);
        assert_eq!(BuildingKind::School.role(), BuildingRole::Civic);
    }

    #[test]
    fn test_power_consumers() {
        assert!(BuildingKind::SteelMill.needs_power());
        assert!(BuildingKind::Distillery.needs_power());
        assert!(!BuildingKind::Kolkhoz.needs_power());
        assert!(!BuildingKind::PowerStation.needs_power());
    }
}
