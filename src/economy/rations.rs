//! Rationing - per-era, per-tier consumption tables
//!
//! Consumption is applied daily by the engine after deliveries. When the
//! book is inactive the population eats at the free-market rate for the
//! era; activating it trades morale for stockpile.

use serde::{Deserialize, Serialize};

use crate::core::types::Era;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RationTier {
    Normal,
    Austerity,
    Siege,
}

/// Daily food and vodka draw for the settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyDraw {
    pub food: i64,
    pub vodka: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RationBook {
    pub active: bool,
    pub tier: RationTier,
}

impl RationBook {
    pub fn new() -> Self {
        Self {
            active: false,
            tier: RationTier::Normal,
        }
    }

    /// Food units per capita per day
    fn food_per_capita(&self, era: Era) -> i64 {
        if !self.active {
            // Free consumption; leaner in the early years regardless
            return match era {
                Era::Revolution => 2,
                _ => 3,
            };
        }
        match self.tier {
            RationTier::Normal => 2,
            RationTier::Austerity => 1,
            RationTier::Siege => 1,
        }
    }

    /// Vodka is issued per four workers; austerity and siege cut it
    fn vodka_divisor(&self) -> Option<u32> {
        if !self.active {
            return Some(4);
        }
        match self.tier {
            RationTier::Normal => Some(4),
            RationTier::Austerity => Some(8),
            RationTier::Siege => None,
        }
    }

    pub fn daily_consumption(&self, population: u32, era: Era) -> DailyDraw {
        let food = self.food_per_capita(era) * population as i64;
        let vodka = match self.vodka_divisor() {
            Some(divisor) => (population / divisor) as i64,
            None => 0,
        };
        DailyDraw { food, vodka }
    }

    /// Era transitions reset the book to the period's default policy
    pub fn apply_era_default(&mut self, era: Era) {
        match era {
            Era::Revolution | Era::War => {
                self.active = true;
                self.tier = RationTier::Siege;
            }
            Era::FirstPlans | Era::Reconstruction => {
                self.active = true;
                self.tier = RationTier::Austerity;
            }
            Era::Thaw | Era::Stagnation => {
                self.active = false;
                self.tier = RationTier::Normal;
            }
        }
    }
}

impl Default for RationBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_book_uses_era_rate() {
        let book = RationBook::new();
        let draw = book.daily_consumption(10, Era::Revolution);
        assert_eq!(draw.food, 20);
        let draw = book.daily_consumption(10, Era::Thaw);
        assert_eq!(draw.food, 30);
    }

    #[test]
    fn test_tiers_reduce_consumption() {
        let mut book = RationBook::new();
        book.active = true;
        book.tier = RationTier::Normal;
        assert_eq!(book.daily_consumption(10, Era::War).food, 20);
        book.tier = RationTier::Austerity;
        assert_eq!(book.daily_consumption(10, Era::War).food, 10);
        book.tier = RationTier::Siege;
        let draw = book.daily_consumption(10, Era::War);
        assert_eq!(draw.food, 10);
        assert_eq!(draw.vodka, 0, "no vodka under siege rations");
    }

    #[test]
    fn test_vodka_issue() {
        let book = RationBook::new();
        assert_eq!(book.daily_consumption(9, Era::Thaw).vodka, 2);
        let mut austerity = RationBook::new();
        austerity.active = true;
        austerity.tier = RationTier::Austerity;
        assert_eq!(austerity.daily_consumption(9, Era::War).vodka, 1);
    }

    #[test]
    fn test_era_defaults() {
        let mut book = RationBook::new();
        book.apply_era_default(Era::War);
        assert!(book.active);
        assert_eq!(book.tier, RationTier::Siege);
        book.apply_era_default(Era::Thaw);
        assert!(!book.active);
    }
}
