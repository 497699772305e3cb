//! Planned-economy subsystems
//!
//! Pure calculation modules plus the stateful `Economy` aggregator that the
//! engine ticks once per simulation tick. Subsystem ordering inside
//! `Economy::tick` is fixed; reordering it changes the RNG stream and
//! breaks replay.

pub mod blat;
pub mod chains;
pub mod fondy;
pub mod heating;
pub mod labor;
pub mod procurement;
pub mod rations;
pub mod reforms;
pub mod resources;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::rng::SimRng;
use crate::core::types::Tick;
use crate::economy::blat::{BlatPurpose, ConnectionsLedger, InformantRisk, SpendOutcome};
use crate::economy::fondy::{DeliveryOutcome, FondySchedule};
use crate::economy::heating::HeatingSystem;
use crate::economy::labor::LaborBook;
use crate::economy::rations::RationBook;
use crate::economy::reforms::ReformSchedule;
use crate::economy::resources::ResourceKind;

/// Effect a successful connections spend had outside the ledger.
/// Quota and dossier effects are applied by the engine, which owns those
/// subsystems; delivery and consumer-goods effects are applied here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlatEffect {
    QuotaReduction(i64),
    DeliveriesImproved,
    ConsumerGoodsBought,
    MarkToHush,
    None,
}

/// Outcome of `Economy::spend_connections`
#[derive(Debug, Clone, PartialEq)]
pub struct BlatSpend {
    pub outcome: SpendOutcome,
    pub effect: BlatEffect,
}

/// Per-tick economy report consumed by the engine
#[derive(Debug, Clone)]
pub struct EconomyReport {
    pub delivery: DeliveryOutcome,
    pub informant_risk: InformantRisk,
}

/// Stateful aggregator over the planned-economy subsystems
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Economy {
    pub labor: LaborBook,
    pub fondy: FondySchedule,
    pub blat: ConnectionsLedger,
    pub rations: RationBook,
    pub heating: HeatingSystem,
    pub reforms: ReformSchedule,
    /// Consumer-goods satisfaction in [0, 1]; decays daily, fed by blat
    /// purchases and fondy deliveries, read by worker morale
    pub consumer_goods: f64,
}

impl Economy {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            labor: LaborBook::new(),
            fondy: FondySchedule::new(
                config.fondy_interval,
                config.fondy_reliability,
                vec![
                    (ResourceKind::Food, 40),
                    (ResourceKind::Timber, 20),
                    (ResourceKind::Steel, 10),
                ],
                config.fondy_interval,
            ),
            blat: ConnectionsLedger::new(),
            rations: RationBook::new(),
            heating: HeatingSystem::new(),
            reforms: ReformSchedule::with_defaults(),
            consumer_goods: 0.3,
        }
    }

    /// One economy tick: fondy delivery check, then the informant risk
    /// check. Both draw from the shared stream in this order.
    pub fn tick(&mut self, tick: Tick, rng: &mut SimRng, config: &SimulationConfig) -> EconomyReport {
        let delivery = self.fondy.process_delivery(tick, rng);
        if matches!(delivery, DeliveryOutcome::Delivered { .. }) {
            // A full shipment includes some consumer goods on the side
            self.consumer_goods = (self.consumer_goods + 0.05).min(1.0);
        }
        let informant_risk = self.blat.check_informant_risk(
            Some(rng),
            config.blat_safe_threshold,
            config.blat_arrest_threshold,
        );
        EconomyReport {
            delivery,
            informant_risk,
        }
    }

    /// Daily consumer-goods satisfaction decay
    pub fn decay_consumer_goods(&mut self) {
        self.consumer_goods = (self.consumer_goods - 0.01).max(0.0);
    }

    /// Spend connections for a purpose. Ledger-internal effects apply
    /// immediately; quota and dossier effects are returned for the engine.
    pub fn spend_connections(
        &mut self,
        amount: i64,
        purpose: BlatPurpose,
        rng: &mut SimRng,
        config: &SimulationConfig,
    ) -> BlatSpend {
        let outcome =
            self.blat
                .spend(amount, purpose, rng, config.blat_detection_threshold);
        let effect = match outcome {
            SpendOutcome::Insufficient => BlatEffect::None,
            SpendOutcome::Spent { purpose, .. } => match purpose {
                BlatPurpose::ReduceQuota => BlatEffect::QuotaReduction(amount * 2),
                BlatPurpose::ImproveDeliveries => {
                    self.fondy.improve_reliability(0.05);
                    BlatEffect::DeliveriesImproved
                }
                BlatPurpose::ConsumerGoods => {
                    self.consumer_goods = (self.consumer_goods + 0.1).min(1.0);
                    BlatEffect::ConsumerGoodsBought
                }
                BlatPurpose::HushMark => BlatEffect::MarkToHush,
            },
        };
        BlatSpend { outcome, effect }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_routing_applies_internal_effects() {
        let config = SimulationConfig::default();
        let mut economy = Economy::new(&config);
        let mut rng = SimRng::seed_from_u64(3);
        economy.blat.earn(50);

        let before = economy.fondy.reliability;
        let spend =
            economy.spend_connections(5, BlatPurpose::ImproveDeliveries, &mut rng, &config);
        assert_eq!(spend.effect, BlatEffect::DeliveriesImproved);
        assert!(economy.fondy.reliability > before);

        let goods_before = economy.consumer_goods;
        let spend = economy.spend_connections(5, BlatPurpose::ConsumerGoods, &mut rng, &config);
        assert_eq!(spend.effect, BlatEffect::ConsumerGoodsBought);
        assert!(economy.consumer_goods > goods_before);
    }

    #[test]
    fn test_spend_routing_defers_external_effects() {
        let config = SimulationConfig::default();
        let mut economy = Economy::new(&config);
        let mut rng = SimRng::seed_from_u64(3);
        economy.blat.earn(50);

        let spend = economy.spend_connections(10, BlatPurpose::ReduceQuota, &mut rng, &config);
        assert_eq!(spend.effect, BlatEffect::QuotaReduction(20));

        let spend = economy.spend_connections(10, BlatPurpose::HushMark, &mut rng, &config);
        assert_eq!(spend.effect, BlatEffect::MarkToHush);
    }

    #[test]
    fn test_insufficient_spend_has_no_effect() {
        let config = SimulationConfig::default();
        let mut economy = Economy::new(&config);
        let mut rng = SimRng::seed_from_u64(3);

        let spend = economy.spend_connections(10, BlatPurpose::ConsumerGoods, &mut rng, &config);
        assert_eq!(spend.outcome, SpendOutcome::Insufficient);
        assert_eq!(spend.effect, BlatEffect::None);
    }
}
