//! Simulation configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. The config is passed into the
//! engine explicitly; there is no global access.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation systems
///
/// These values have been tuned to produce good pacing over a multi-decade
/// playthrough. Changing them will affect gameplay feel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === CHRONOLOGY ===
    /// Ticks per calendar day
    ///
    /// At 24, one tick is one hour. Day-granular systems (labor, rations,
    /// heating, worker morale) run on day boundaries.
    pub ticks_per_day: u64,

    /// Days per calendar month (fixed-length months keep the date math exact)
    pub days_per_month: u32,

    /// Calendar year at tick zero
    pub start_year: i32,

    // === STARTING STATE ===
    /// Workers present at tick zero
    pub starting_workers: u32,

    /// Rubles in the settlement account at tick zero
    pub starting_money: i64,

    /// Food units in the stockpile at tick zero
    pub starting_food: i64,

    /// Timber units at tick zero (first winter's fuel)
    pub starting_timber: i64,

    /// Free-stockpile ceiling for food before daily spoilage applies
    pub storage_capacity: i64,

    // === GAME OVER ===
    /// Ticks before a zero population becomes fatal
    ///
    /// The grace period lets the opening ticks run before the first
    /// workers are settled without instantly losing.
    pub grace_period_ticks: u64,

    /// Consecutive missed plan deadlines before Moscow recalls the chairman
    pub quota_failure_limit: u32,

    // === PLAN / QUOTA ===
    /// First plan's delivery target (food units)
    pub initial_quota_target: i64,

    /// Plan length in calendar years
    pub plan_years: i32,

    /// Percent growth applied to the target when a plan is fulfilled
    pub quota_growth_percent: i64,

    // === FONDY (centralized allocations) ===
    /// Ticks between scheduled fondy deliveries
    pub fondy_interval: u64,

    /// Probability a due delivery actually arrives
    ///
    /// The shortfall draw on success still scales the bundle 70-100%,
    /// so even reliable deliveries come up short.
    pub fondy_reliability: f64,

    // === BLAT (connections) ===
    /// Connections balance below which informants take no interest
    pub blat_safe_threshold: i64,

    /// Balance above which an independent arrest draw also applies
    pub blat_arrest_threshold: i64,

    /// Spend amount above which detection probability starts accruing
    pub blat_detection_threshold: i64,

    // === HEATING ===
    /// Population at which stove heating is replaced by district heating
    pub district_heating_population: u32,

    /// Ticks of accumulated district-heating wear before it degrades
    pub heating_disrepair_ticks: u64,

    // === PERSONNEL FILE ===
    /// Ticks between automatic black-mark decay steps
    pub mark_decay_interval: u64,

    /// Per-day arrest probability while the threat level is at its maximum
    pub arrest_probability: f64,

    // === EVENTS ===
    /// Per-day probability of a Stakhanovite hero-worker event
    pub hero_worker_chance: f64,

    /// Per-day probability of a narrative event (fire, inspection, festival)
    pub narrative_event_chance: f64,

    /// Ticks a resolved minigame id stays on cooldown
    pub minigame_cooldown: u64,

    // === SPOILAGE ===
    /// Percent of food above storage capacity lost per day
    pub spoilage_percent: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 24,
            days_per_month: 30,
            start_year: 1917,

            starting_workers: 12,
            starting_money: 500,
            starting_food: 200,
            starting_timber: 80,
            storage_capacity: 400,

            grace_period_ticks: 48,
            quota_failure_limit: 3,

            initial_quota_target: 300,
            plan_years: 5,
            quota_growth_percent: 20,

            fondy_interval: 720, // one month of hours
            fondy_reliability: 0.8,

            blat_safe_threshold: 20,
            blat_arrest_threshold: 60,
            blat_detection_threshold: 10,

            district_heating_population: 40,
            heating_disrepair_ticks: 43_200, // five years of daily wear at 24 ticks/day

            mark_decay_interval: 8_640, // one year
            arrest_probability: 0.02,

            hero_worker_chance: 0.02,
            narrative_event_chance: 0.08,
            minigame_cooldown: 720,

            spoilage_percent: 5,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML override; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_day == 0 || self.days_per_month == 0 {
            return Err(SimError::InvalidConfig(
                "ticks_per_day and days_per_month must be positive".into(),
            ));
        }

        if !(self.fondy_reliability > 0.0 && self.fondy_reliability <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "fondy_reliability ({}) must be in (0, 1]",
                self.fondy_reliability
            )));
        }

        // Informant thresholds must be ordered or risk checks misfire
        if self.blat_arrest_threshold <= self.blat_safe_threshold {
            return Err(SimError::InvalidConfig(format!(
                "blat_arrest_threshold ({}) must exceed blat_safe_threshold ({})",
                self.blat_arrest_threshold, self.blat_safe_threshold
            )));
        }

        if !(0..=100).contains(&self.spoilage_percent) {
            return Err(SimError::InvalidConfig(format!(
                "spoilage_percent ({}) must be within 0-100",
                self.spoilage_percent
            )));
        }

        if self.quota_failure_limit == 0 {
            return Err(SimError::InvalidConfig(
                "quota_failure_limit must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok(), "default config must validate");
    }

    #[test]
    fn test_bad_reliability_rejected() {
        let mut config = SimulationConfig::default();
        config.fondy_reliability = 1.5;
        assert!(config.validate().is_err());
        config.fondy_reliability = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unordered_blat_thresholds_rejected() {
        let mut config = SimulationConfig::default();
        config.blat_arrest_threshold = config.blat_safe_threshold;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = SimulationConfig::from_toml_str("starting_money = 1000\n")
            .expect("partial override should parse");
        assert_eq!(config.starting_money, 1000);
        assert_eq!(config.ticks_per_day, SimulationConfig::default().ticks_per_day);
    }
}
