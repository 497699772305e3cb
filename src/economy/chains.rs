//! Production chains - multi-step transformation recipes
//!
//! A chain runs only when every step's building is present and every
//! step's inputs are covered in order. Validation runs against a scratch
//! balance before any mutation; there is no mid-chain failure path.
//! Seasonal modifiers scale step outputs, and both validation and
//! application see the scaled amounts.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::BuildingKind;
use crate::economy::resources::{ResourceKind, ResourceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    Lumber,
    Steel,
    Vodka,
    Bread,
}

impl ChainId {
    pub fn name(&self) -> &'static str {
        match self {
            ChainId::Lumber => "sawmill lumber",
            ChainId::Steel => "steel smelting",
            ChainId::Vodka => "vodka distilling",
            ChainId::Bread => "bread baking",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChainStep {
    pub building: BuildingKind,
    pub inputs: Vec<(ResourceKind, i64)>,
    pub outputs: Vec<(ResourceKind, i64)>,
}

#[derive(Debug, Clone)]
pub struct ProductionChain {
    pub id: ChainId,
    pub steps: Vec<ChainStep>,
}

impl ProductionChain {
    /// True when any step's building stalls without power
    pub fn needs_power(&self) -> bool {
        self.steps.iter().any(|step| step.building.needs_power())
    }
}

/// Immutable chain definitions
#[derive(Debug, Clone)]
pub struct ChainCatalog {
    chains: Vec<ProductionChain>,
}

impl ChainCatalog {
    pub fn with_defaults() -> Self {
        Self {
            chains: vec![
                ProductionChain {
                    id: ChainId::Lumber,
                    steps: vec![ChainStep {
                        building: BuildingKind::Sawmill,
                        inputs: vec![],
                        outputs: vec![(ResourceKind::Timber, 2)],
                    }],
                },
                ProductionChain {
                    id: ChainId::Steel,
                    steps: vec![
                        ChainStep {
                            building: BuildingKind::Mine,
                            inputs: vec![],
                            outputs: vec![(ResourceKind::Steel, 1)],
                        },
                        ChainStep {
                            building: BuildingKind::SteelMill,
                            inputs: vec![(ResourceKind::Steel, 1), (ResourceKind::Timber, 1)],
                            outputs: vec![(ResourceKind::Steel, 3)],
                        },
                    ],
                },
                ProductionChain {
                    id: ChainId::Vodka,
                    steps: vec![
                        ChainStep {
                            building: BuildingKind::Kolkhoz,
                            inputs: vec![],
                            outputs: vec![(ResourceKind::Food, 2)],
                        },
                        ChainStep {
                            building: BuildingKind::Distillery,
                            inputs: vec![(ResourceKind::Food, 3)],
                            outputs: vec![(ResourceKind::Vodka, 1)],
                        },
                    ],
                },
                ProductionChain {
                    id: ChainId::Bread,
                    steps: vec![
                        ChainStep {
                            building: BuildingKind::Kolkhoz,
                            inputs: vec![],
                            outputs: vec![(ResourceKind::Food, 1)],
                        },
                        ChainStep {
                            building: BuildingKind::Bakery,
                            inputs: vec![(ResourceKind::Food, 1)],
                            outputs: vec![(ResourceKind::Food, 3)],
                        },
                    ],
                },
            ],
        }
    }

    pub fn get(&self, id: ChainId) -> Option<&ProductionChain> {
        self.chains.iter().find(|chain| chain.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductionChain> {
        self.chains.iter()
    }
}

/// One completed chain this tick
#[derive(Debug, Clone, PartialEq)]
pub struct ChainResult {
    pub id: ChainId,
    /// Total step outputs after the seasonal modifier
    pub produced: Vec<(ResourceKind, i64)>,
}

fn scaled_outputs(step: &ChainStep, modifier: f64) -> Vec<(ResourceKind, i64)> {
    step.outputs
        .iter()
        .map(|(kind, amount)| (*kind, ((*amount as f64) * modifier).max(0.0) as i64))
        .collect()
}

/// Run every runnable chain once against the store.
///
/// Per chain: every step's building must be present, and simulating all
/// steps in order against a scratch copy must leave no input uncovered.
/// Only then are the steps applied to the real store.
pub fn tick_production_chains(
    catalog: &ChainCatalog,
    present: &AHashSet<BuildingKind>,
    store: &mut ResourceStore,
    output_modifier: f64,
    power_deficit: bool,
) -> Vec<ChainResult> {
    let mut results = Vec::new();

    for chain in catalog.iter() {
        if power_deficit && chain.needs_power() {
            continue;
        }
        if !chain.steps.iter().all(|step| present.contains(&step.building)) {
            continue;
        }

        // Validate all steps against a scratch balance
        let mut scratch = store.clone();
        let mut valid = true;
        for step in &chain.steps {
            if !scratch.consume_bundle(&step.inputs) {
                valid = false;
                break;
            }
            scratch.add_bundle(&scaled_outputs(step, output_modifier));
        }
        if !valid {
            continue;
        }

        // Apply all steps in order
        let mut produced: Vec<(ResourceKind, i64)> = Vec::new();
        for step in &chain.steps {
            store.consume_bundle(&step.inputs);
            let outputs = scaled_outputs(step, output_modifier);
            store.add_bundle(&outputs);
            for (kind, amount) in outputs {
                match produced.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, total)) => *total += amount,
                    None => produced.push((kind, amount)),
                }
            }
        }
        tracing::debug!(chain = chain.id.name(), ?produced, "chain completed");
        results.push(ChainResult {
            id: chain.id,
            produced,
        });
    }

    results
}
