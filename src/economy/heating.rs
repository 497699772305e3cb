//! Heating - seasonal survival infrastructure
//!
//! Tier state machine: stoves serve a small settlement, district heating
//! arrives with growth, and an unrepaired district system degrades.
//! Degraded heating persists until an explicit repair. A winter day
//! without fuel puts part of the population at risk; the engine converts
//! risk into attrition.

use serde::{Deserialize, Serialize};

use crate::core::chronology::Chronology;
use crate::core::types::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatingTier {
    Stoves,
    District,
    Degraded,
}

impl HeatingTier {
    /// Fraction of the population kept safe through a fuelless cold snap
    pub fn efficiency(&self) -> f64 {
        match self {
            HeatingTier::Stoves => 0.6,
            HeatingTier::District => 0.9,
            HeatingTier::Degraded => 0.4,
        }
    }
}

/// Timber demand for one day; zero outside the heating season
pub fn daily_fuel_need(population: u32, month: u32) -> i64 {
    if Chronology::is_heating_season(month) {
        (population as i64) / 10 + 1
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingReport {
    pub tier: HeatingTier,
    /// Timber to burn this day; the engine debits the store
    pub fuel_needed: i64,
    /// Population left exposed when fuel was short
    pub population_at_risk: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatingSystem {
    pub tier: HeatingTier,
    /// Wear ticks accumulated since the last repair (district tier only)
    pub ticks_since_repair: Tick,
}

impl HeatingSystem {
    pub fn new() -> Self {
        Self {
            tier: HeatingTier::Stoves,
            ticks_since_repair: 0,
        }
    }

    /// Daily heating pass. Upgrades stoves once the settlement is large
    /// enough, wears district heating toward degradation, and reports
    /// fuel demand plus exposure for the day.
    pub fn process_heating(
        &mut self,
        population: u32,
        month: u32,
        has_fuel: bool,
        district_population: u32,
        disrepair_ticks: Tick,
        ticks_per_day: Tick,
    ) -> HeatingReport {
        if self.tier == HeatingTier::Stoves && population >= district_population {
            self.tier = HeatingTier::District;
            self.ticks_since_repair = 0;
        }
        if self.tier == HeatingTier::District {
            self.ticks_since_repair += ticks_per_day;
            if self.ticks_since_repair > disrepair_ticks {
                self.tier = HeatingTier::Degraded;
                tracing::debug!("district heating degraded");
            }
        }

        let heating_season = Chronology::is_heating_season(month);
        let fuel_needed = daily_fuel_need(population, month);
        let population_at_risk = if heating_season && !has_fuel {
            (population as f64 * (1.0 - self.tier.efficiency())) as u32
        } else {
            0
        };

        HeatingReport {
            tier: self.tier,
            fuel_needed,
            population_at_risk,
        }
    }

    /// Explicit repair; only meaningful once degraded
    pub fn repair(&mut self) {
        if self.tier == HeatingTier::Degraded {
            self.tier = HeatingTier::District;
        }
        self.ticks_since_repair = 0;
    }
}

impl Default for HeatingSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTRICT_POP: u32 = 40;
    const DISREPAIR: Tick = 1000;
    const TPD: Tick = 24;

    fn process(system: &mut HeatingSystem, pop: u32, month: u32, fuel: bool) -> HeatingReport {
        system.process_heating(pop, month, fuel, DISTRICT_POP, DISREPAIR, TPD)
    }

    #[test]
    fn test_stoves_upgrade_on_population() {
        let mut system = HeatingSystem::new();
        assert_eq!(process(&mut system, 39, 6, true).tier, HeatingTier::Stoves);
        assert_eq!(process(&mut system, 40, 6, true).tier, HeatingTier::District);
    }

    #[test]
    fn test_district_degrades_after_disrepair() {
        let mut system = HeatingSystem::new();
        process(&mut system, 50, 6, true);
        assert_eq!(system.tier, HeatingTier::District);
        // 1000 wear ticks at 24/day: degraded within 42 days
        for _ in 0..42 {
            process(&mut system, 50, 6, true);
        }
        assert_eq!(system.tier, HeatingTier::Degraded);
    }

    #[test]
    fn test_degraded_persists_until_repair() {
        let mut system = HeatingSystem::new();
        system.tier = HeatingTier::Degraded;
        for _ in 0..10 {
            process(&mut system, 50, 6, true);
        }
        assert_eq!(system.tier, HeatingTier::Degraded);
        system.repair();
        assert_eq!(system.tier, HeatingTier::District);
        assert_eq!(system.ticks_since_repair, 0);
    }

    #[test]
    fn test_winter_without_fuel_exposes_population() {
        let mut system = HeatingSystem::new();
        let report = process(&mut system, 30, 1, false);
        // Stoves efficiency 0.6: 40% of 30 exposed
        assert_eq!(report.population_at_risk, 12);
        assert!(report.fuel_needed > 0);
    }

    #[test]
    fn test_summer_needs_no_fuel() {
        let mut system = HeatingSystem::new();
        let report = process(&mut system, 30, 7, false);
        assert_eq!(report.fuel_needed, 0);
        assert_eq!(report.population_at_risk, 0);
    }
}
