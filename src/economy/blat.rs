//! Blat - the informal economy of connections
//!
//! Connections are earned slowly and spent on favors. Large spends risk
//! being noticed; a large standing balance attracts informants. The risk
//! check takes an optional RNG so a caller without one gets an explicit
//! `Unchecked` result instead of a silently skipped draw.

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;

/// Detection probability gained per connection above the threshold
const DETECTION_PER_POINT: f64 = 0.02;
const DETECTION_CAP: f64 = 0.9;

/// Investigation probability gained per connection above the safe threshold
const INVESTIGATION_PER_POINT: f64 = 0.005;

/// Arrest probability per check while above the arrest threshold
const ARREST_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlatPurpose {
    ReduceQuota,
    ImproveDeliveries,
    ConsumerGoods,
    HushMark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpendOutcome {
    /// Balance too low; nothing changed
    Insufficient,
    Spent { purpose: BlatPurpose, noticed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InformantRisk {
    /// No RNG was supplied; the check did not run
    Unchecked,
    Clear,
    Investigation,
    Arrest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionsLedger {
    pub balance: i64,
    pub lifetime_earned: i64,
    pub lifetime_spent: i64,
}

impl ConnectionsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn earn(&mut self, amount: i64) {
        if amount > 0 {
            self.balance += amount;
            self.lifetime_earned += amount;
        }
    }

    /// Debit the ledger for a favor. Always consumes exactly one
    /// detection draw on success so the stream length does not depend
    /// on the amount spent.
    pub fn spend(
        &mut self,
        amount: i64,
        purpose: BlatPurpose,
        rng: &mut SimRng,
        detection_threshold: i64,
    ) -> SpendOutcome {
        if amount <= 0 || self.balance < amount {
            return SpendOutcome::Insufficient;
        }
        self.balance -= amount;
        self.lifetime_spent += amount;

        let over = (amount - detection_threshold).max(0);
        let probability = (over as f64 * DETECTION_PER_POINT).min(DETECTION_CAP);
        let noticed = rng.chance(probability);
        tracing::debug!(amount, ?purpose, noticed, "connections spent");
        SpendOutcome::Spent { purpose, noticed }
    }

    /// Periodic informant check against the standing balance.
    /// Investigation probability grows with the excess above the safe
    /// threshold; above the arrest threshold an independent arrest draw
    /// also applies.
    pub fn check_informant_risk(
        &self,
        rng: Option<&mut SimRng>,
        safe_threshold: i64,
        arrest_threshold: i64,
    ) -> InformantRisk {
        let Some(rng) = rng else {
            return InformantRisk::Unchecked;
        };
        if self.balance <= safe_threshold {
            return InformantRisk::Clear;
        }
        let excess = self.balance - safe_threshold;
        let investigated = rng.chance((excess as f64 * INVESTIGATION_PER_POINT).min(1.0));
        if self.balance > arrest_threshold && rng.chance(ARREST_PROBABILITY) {
            return InformantRisk::Arrest;
        }
        if investigated {
            InformantRisk::Investigation
        } else {
            InformantRisk::Clear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_spend_changes_nothing() {
        let mut ledger = ConnectionsLedger::new();
        ledger.earn(5);
        let mut rng = SimRng::seed_from_u64(1);
        let outcome = ledger.spend(10, BlatPurpose::ConsumerGoods, &mut rng, 10);
        assert_eq!(outcome, SpendOutcome::Insufficient);
        assert_eq!(ledger.balance, 5);
        assert_eq!(ledger.lifetime_spent, 0);
    }

    #[test]
    fn test_small_spend_never_noticed() {
        let mut rng = SimRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut ledger = ConnectionsLedger::new();
            ledger.earn(50);
            match ledger.spend(10, BlatPurpose::HushMark, &mut rng, 10) {
                SpendOutcome::Spent { noticed, .. } => {
                    assert!(!noticed, "spend at the threshold has zero detection probability");
                }
                other => panic!("expected spend, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_spend_debits_ledger() {
        let mut ledger = ConnectionsLedger::new();
        ledger.earn(30);
        let mut rng = SimRng::seed_from_u64(1);
        ledger.spend(12, BlatPurpose::ReduceQuota, &mut rng, 10);
        assert_eq!(ledger.balance, 18);
        assert_eq!(ledger.lifetime_spent, 12);
        assert_eq!(ledger.lifetime_earned, 30);
    }

    #[test]
    fn test_risk_without_rng_is_unchecked() {
        let mut ledger = ConnectionsLedger::new();
        ledger.earn(100);
        assert_eq!(
            ledger.check_informant_risk(None, 20, 60),
            InformantRisk::Unchecked
        );
    }

    #[test]
    fn test_risk_below_safe_threshold_is_clear() {
        let mut ledger = ConnectionsLedger::new();
        ledger.earn(20);
        let mut rng = SimRng::seed_from_u64(1);
        assert_eq!(
            ledger.check_informant_risk(Some(&mut rng), 20, 60),
            InformantRisk::Clear
        );
        // Below the threshold no draw is consumed
        let mut fresh = SimRng::seed_from_u64(1);
        assert_eq!(rng.uniform(), fresh.uniform());
    }

    #[test]
    fn test_large_balance_eventually_investigated() {
        let mut ledger = ConnectionsLedger::new();
        ledger.earn(55); // over safe, under arrest threshold
        let mut rng = SimRng::seed_from_u64(9);
        let mut saw_investigation = false;
        for _ in 0..200 {
            match ledger.check_informant_risk(Some(&mut rng), 20, 60) {
                InformantRisk::Investigation => saw_investigation = true,
                InformantRisk::Arrest => panic!("arrest draw must not apply below the threshold"),
                _ => {}
            }
        }
        assert!(saw_investigation, "17.5% per check over 200 checks");
    }

    #[test]
    fn test_arrest_only_above_second_threshold() {
        let mut ledger = ConnectionsLedger::new();
        ledger.earn(200);
        let mut rng = SimRng::seed_from_u64(9);
        let mut saw_arrest = false;
        for _ in 0..500 {
            if ledger.check_informant_risk(Some(&mut rng), 20, 60) == InformantRisk::Arrest {
                saw_arrest = true;
            }
        }
        assert!(saw_arrest, "5% per check over 500 checks");
    }
}
