//! Resource store - the settlement-level ledger
//!
//! All quantities are integers so trajectories stay bit-exact across
//! platforms. Population is a derived mirror of the worker roster; only
//! the engine writes it, after the worker phase.

use serde::{Deserialize, Serialize};

/// Resources that move through deliveries, quotas, and production chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Money,
    Food,
    Vodka,
    Power,
    Steel,
    Timber,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Money => "rubles",
            ResourceKind::Food => "food",
            ResourceKind::Vodka => "vodka",
            ResourceKind::Power => "power",
            ResourceKind::Steel => "steel",
            ResourceKind::Timber => "timber",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceStore {
    pub money: i64,
    pub food: i64,
    pub vodka: i64,
    /// Generation capacity this tick, recomputed by the engine
    pub power: i64,
    /// Demand this tick, recomputed by the engine
    pub power_used: i64,
    pub steel: i64,
    pub timber: i64,
    /// Lifetime labor-day credit, mirrored from the labor book
    pub trudodni: i64,
    /// Mirrored from the connections ledger
    pub connections: i64,
    pub storage_capacity: i64,
    population: u32,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Money => self.money,
            ResourceKind::Food => self.food,
            ResourceKind::Vodka => self.vodka,
            ResourceKind::Power => self.power,
            ResourceKind::Steel => self.steel,
            ResourceKind::Timber => self.timber,
        }
    }

    /// Signed adjustment; balances may go negative mid-tick and are
    /// clamped at snapshot time
    pub fn add(&mut self, kind: ResourceKind, amount: i64) {
        let slot = match kind {
            ResourceKind::Money => &mut self.money,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Vodka => &mut self.vodka,
            ResourceKind::Power => &mut self.power,
            ResourceKind::Steel => &mut self.steel,
            ResourceKind::Timber => &mut self.timber,
        };
        *slot += amount;
    }

    /// Debit only if the full amount is covered
    pub fn spend(&mut self, kind: ResourceKind, amount: i64) -> bool {
        if self.get(kind) < amount {
            return false;
        }
        self.add(kind, -amount);
        true
    }

    pub fn has_bundle(&self, requirements: &[(ResourceKind, i64)]) -> bool {
        requirements
            .iter()
            .all(|(kind, amount)| self.get(*kind) >= *amount)
    }

    /// Consume a whole bundle or nothing
    pub fn consume_bundle(&mut self, requirements: &[(ResourceKind, i64)]) -> bool {
        if !self.has_bundle(requirements) {
            return false;
        }
        for (kind, amount) in requirements {
            self.add(*kind, -amount);
        }
        true
    }

    pub fn add_bundle(&mut self, bundle: &[(ResourceKind, i64)]) {
        for (kind, amount) in bundle {
            self.add(*kind, *amount);
        }
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    /// Engine-only: mirror the worker roster count
    pub fn set_population(&mut self, count: u32) {
        self.population = count;
    }

    /// End-of-tick invariant: no balance stays negative
    pub fn clamp_non_negative(&mut self) {
        for slot in [
            &mut self.money,
            &mut self.food,
            &mut self.vodka,
            &mut self.power,
            &mut self.power_used,
            &mut self.steel,
            &mut self.timber,
            &mut self.trudodni,
            &mut self.connections,
        ] {
            if *slot < 0 {
                *slot = 0;
            }
        }
    }
}
