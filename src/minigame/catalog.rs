//! Minigame definitions
//!
//! Every scenario is data: a trigger, two or three choices with success
//! probabilities, and an auto-resolve outcome. Auto-resolve must be
//! worse in expectation than the best engaged choice for every
//! definition; the expected-value helpers below are what the tests
//! check that property with.

use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::{BuildingKind, Severity};

/// Exchange rates used only for expected-value comparison
const EV_PER_FOOD: f64 = 2.0;
const EV_PER_VODKA: f64 = 3.0;
const EV_PER_WORKER: f64 = 50.0;
const EV_PER_MARK: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinigameId {
    MiningExpedition,
    GrainRequisition,
    BlackMarketDeal,
    DrunkForeman,
    PartyInspection,
}

/// Typed tags for event-driven triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTag {
    Famine,
    Fire,
    InspectorVisit,
    HarvestFestival,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerKind {
    BuildingTap(BuildingKind),
    Event(EventTag),
    Periodic {
        min_population: u32,
        tick_modulus: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceId(pub u8);

/// Outcome template; amounts are inclusive draw ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeSpec {
    pub money: (i64, i64),
    pub food: (i64, i64),
    pub vodka: (i64, i64),
    pub population: (i64, i64),
    pub black_marks: u32,
    pub severity: Severity,
    pub announcement: &'static str,
}

impl OutcomeSpec {
    pub const NONE: OutcomeSpec = OutcomeSpec {
        money: (0, 0),
        food: (0, 0),
        vodka: (0, 0),
        population: (0, 0),
        black_marks: 0,
        severity: Severity::Info,
        announcement: "",
    };

    fn midpoint(range: (i64, i64)) -> f64 {
        (range.0 + range.1) as f64 / 2.0
    }

    pub fn expected_value(&self) -> f64 {
        Self::midpoint(self.money)
            + Self::midpoint(self.food) * EV_PER_FOOD
            + Self::midpoint(self.vodka) * EV_PER_VODKA
            + Self::midpoint(self.population) * EV_PER_WORKER
            - self.black_marks as f64 * EV_PER_MARK
    }

    /// Draw concrete amounts. The announcement's `{casualties}` token is
    /// replaced with the population loss.
    pub fn realize(&self, rng: &mut SimRng) -> RealizedOutcome {
        let money = rng.int_range(self.money.0, self.money.1);
        let food = rng.int_range(self.food.0, self.food.1);
        let vodka = rng.int_range(self.vodka.0, self.vodka.1);
        let population = rng.int_range(self.population.0, self.population.1);
        let message = if self.announcement.contains("{casualties}") {
            self.announcement
                .replace("{casualties}", &population.unsigned_abs().to_string())
        } else {
            self.announcement.to_string()
        };
        RealizedOutcome {
            money,
            food,
            vodka,
            population,
            black_marks: self.black_marks,
            severity: self.severity,
            message,
        }
    }
}

/// Fixed outcomes apply as written; tiered outcomes spend one roll to
/// select a tier by upper bound, then draw that tier's amounts
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Fixed(OutcomeSpec),
    Tiered(Vec<(f64, OutcomeSpec)>),
}

impl Outcome {
    pub fn expected_value(&self) -> f64 {
        match self {
            Outcome::Fixed(spec) => spec.expected_value(),
            Outcome::Tiered(tiers) => {
                let mut ev = 0.0;
                let mut lower = 0.0;
                for (upper, spec) in tiers {
                    ev += (upper - lower) * spec.expected_value();
                    lower = *upper;
                }
                ev
            }
        }
    }

    pub fn realize(&self, rng: &mut SimRng) -> RealizedOutcome {
        match self {
            Outcome::Fixed(spec) => spec.realize(rng),
            Outcome::Tiered(tiers) => {
                let roll = rng.uniform();
                let spec = tiers
                    .iter()
                    .find(|(upper, _)| roll < *upper)
                    .map(|(_, spec)| spec)
                    .unwrap_or(&tiers[tiers.len() - 1].1);
                spec.realize(rng)
            }
        }
    }
}

/// Amounts actually drawn for an outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedOutcome {
    pub money: i64,
    pub food: i64,
    pub vodka: i64,
    pub population: i64,
    pub black_marks: u32,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: ChoiceId,
    pub label: &'static str,
    pub success_probability: f64,
    pub success: OutcomeSpec,
    pub failure: OutcomeSpec,
}

impl Choice {
    pub fn expected_value(&self) -> f64 {
        self.success_probability * self.success.expected_value()
            + (1.0 - self.success_probability) * self.failure.expected_value()
    }
}

#[derive(Debug, Clone)]
pub struct MinigameDef {
    pub id: MinigameId,
    pub title: &'static str,
    pub trigger: TriggerKind,
    pub choices: Vec<Choice>,
    pub auto_resolve: Outcome,
    /// Ticks an unanswered minigame waits before auto-resolving; None
    /// waits forever
    pub tick_limit: Option<u64>,
}

pub struct MinigameCatalog {
    defs: Vec<MinigameDef>,
}

impl MinigameCatalog {
    pub fn with_defaults() -> Self {
        Self {
            defs: vec![
                MinigameDef {
                    id: MinigameId::MiningExpedition,
                    title: "Expedition to the old shafts",
                    trigger: TriggerKind::BuildingTap(BuildingKind::Mine),
                    choices: vec![
                        Choice {
                            id: ChoiceId(1),
                            label: "Send the experienced brigade",
                            success_probability: 0.75,
                            success: OutcomeSpec {
                                money: (30, 50),
                                announcement: "The brigade returns with salvaged equipment.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                money: (0, 5),
                                announcement: "The shafts were flooded. Little recovered.",
                                ..OutcomeSpec::NONE
                            },
                        },
                        Choice {
                            id: ChoiceId(2),
                            label: "Send volunteers with bonus pay",
                            success_probability: 0.55,
                            success: OutcomeSpec {
                                money: (40, 70),
                                announcement: "The volunteers strike a rich seam.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                money: (-10, -5),
                                population: (-1, 0),
                                severity: Severity::Warning,
                                announcement: "The volunteers got lost; the search cost us.",
                                ..OutcomeSpec::NONE
                            },
                        },
                    ],
                    auto_resolve: Outcome::Tiered(vec![
                        (
                            0.6,
                            OutcomeSpec {
                                money: (25, 45),
                                announcement: "The expedition returned with a modest haul.",
                                ..OutcomeSpec::NONE
                            },
                        ),
                        (
                            0.85,
                            OutcomeSpec {
                                money: (5, 15),
                                announcement: "The expedition found little of value.",
                                ..OutcomeSpec::NONE
                            },
                        ),
                        (
                            1.0,
                            OutcomeSpec {
                                population: (-3, -1),
                                black_marks: 1,
                                severity: Severity::Critical,
                                announcement:
                                    "Cave-in at the expedition site. {casualties} comrades lost.",
                                ..OutcomeSpec::NONE
                            },
                        ),
                    ]),
                    tick_limit: Some(48),
                },
                MinigameDef {
                    id: MinigameId::GrainRequisition,
                    title: "Requisition detachment at the gates",
                    trigger: TriggerKind::Event(EventTag::Famine),
                    choices: vec![
                        Choice {
                            id: ChoiceId(1),
                            label: "Hand over the ledger as written",
                            success_probability: 0.7,
                            success: OutcomeSpec {
                                food: (-30, -20),
                                announcement: "The detachment takes its share and moves on.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                food: (-50, -40),
                                severity: Severity::Warning,
                                announcement: "They dug deeper than the ledger showed.",
                                ..OutcomeSpec::NONE
                            },
                        },
                        Choice {
                            id: ChoiceId(2),
                            label: "Hide part of the harvest",
                            success_probability: 0.5,
                            success: OutcomeSpec {
                                food: (-10, -5),
                                announcement: "The hidden pits went unnoticed.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                food: (-40, -30),
                                black_marks: 2,
                                severity: Severity::Critical,
                                announcement: "The hidden grain was found. Questions follow.",
                                ..OutcomeSpec::NONE
                            },
                        },
                    ],
                    auto_resolve: Outcome::Fixed(OutcomeSpec {
                        food: (-45, -35),
                        black_marks: 1,
                        severity: Severity::Warning,
                        announcement: "Unattended, the detachment took what it pleased.",
                        ..OutcomeSpec::NONE
                    }),
                    tick_limit: Some(24),
                },
                MinigameDef {
                    id: MinigameId::BlackMarketDeal,
                    title: "A quiet offer behind the depot",
                    trigger: TriggerKind::Periodic {
                        min_population: 15,
                        tick_modulus: 360,
                    },
                    choices: vec![
                        Choice {
                            id: ChoiceId(1),
                            label: "Trade vodka for cash",
                            success_probability: 0.65,
                            success: OutcomeSpec {
                                money: (20, 40),
                                vodka: (-3, -2),
                                announcement: "The deal goes smoothly.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                vodka: (-3, -2),
                                black_marks: 1,
                                severity: Severity::Warning,
                                announcement: "The buyer was an informant.",
                                ..OutcomeSpec::NONE
                            },
                        },
                        Choice {
                            id: ChoiceId(2),
                            label: "Report the speculator",
                            success_probability: 0.9,
                            success: OutcomeSpec {
                                announcement: "The speculator is taken away. Noted favorably.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                money: (-10, -5),
                                announcement: "He vanished before the militia arrived.",
                                ..OutcomeSpec::NONE
                            },
                        },
                    ],
                    auto_resolve: Outcome::Fixed(OutcomeSpec {
                        money: (-5, 0),
                        announcement: "The offer expires unanswered.",
                        ..OutcomeSpec::NONE
                    }),
                    tick_limit: Some(24),
                },
                MinigameDef {
                    id: MinigameId::DrunkForeman,
                    title: "The foreman is drunk again",
                    trigger: TriggerKind::BuildingTap(BuildingKind::Distillery),
                    choices: vec![
                        Choice {
                            id: ChoiceId(1),
                            label: "Dock his pay and post a notice",
                            success_probability: 0.6,
                            success: OutcomeSpec {
                                money: (5, 10),
                                announcement: "Order restored on the line.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                vodka: (-2, -1),
                                announcement: "He drinks through the notice.",
                                ..OutcomeSpec::NONE
                            },
                        },
                        Choice {
                            id: ChoiceId(2),
                            label: "Look the other way",
                            success_probability: 0.8,
                            success: OutcomeSpec {
                                announcement: "Nothing comes of it, this time.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                vodka: (-4, -2),
                                severity: Severity::Warning,
                                announcement: "A vat is ruined during the night shift.",
                                ..OutcomeSpec::NONE
                            },
                        },
                    ],
                    auto_resolve: Outcome::Fixed(OutcomeSpec {
                        vodka: (-4, -2),
                        severity: Severity::Warning,
                        announcement: "Left alone, he empties the sampling cask.",
                        ..OutcomeSpec::NONE
                    }),
                    tick_limit: Some(12),
                },
                MinigameDef {
                    id: MinigameId::PartyInspection,
                    title: "An inspector from the raikom",
                    trigger: TriggerKind::Event(EventTag::InspectorVisit),
                    choices: vec![
                        Choice {
                            id: ChoiceId(1),
                            label: "Open every book",
                            success_probability: 0.7,
                            success: OutcomeSpec {
                                announcement: "The inspector leaves satisfied.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                black_marks: 1,
                                severity: Severity::Warning,
                                announcement: "Irregularities are noted in the report.",
                                ..OutcomeSpec::NONE
                            },
                        },
                        Choice {
                            id: ChoiceId(2),
                            label: "Arrange a banquet first",
                            success_probability: 0.55,
                            success: OutcomeSpec {
                                money: (-20, -10),
                                announcement: "A warm report follows a warm evening.",
                                ..OutcomeSpec::NONE
                            },
                            failure: OutcomeSpec {
                                money: (-20, -10),
                                black_marks: 2,
                                severity: Severity::Critical,
                                announcement: "The banquet itself becomes the finding.",
                                ..OutcomeSpec::NONE
                            },
                        },
                    ],
                    auto_resolve: Outcome::Fixed(OutcomeSpec {
                        black_marks: 1,
                        money: (-10, -5),
                        severity: Severity::Warning,
                        announcement: "Ignored, the inspector files a cold report.",
                        ..OutcomeSpec::NONE
                    }),
                    tick_limit: Some(24),
                },
            ],
        }
    }

    pub fn get(&self, id: MinigameId) -> Option<&MinigameDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MinigameDef> {
        self.defs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_def_has_two_or_three_choices() {
        let catalog = MinigameCatalog::with_defaults();
        for def in catalog.iter() {
            assert!(
                (2..=3).contains(&def.choices.len()),
                "{:?} has {} choices",
                def.id,
                def.choices.len()
            );
        }
    }

    #[test]
    fn test_choice_ids_unique_within_def() {
        let catalog = MinigameCatalog::with_defaults();
        for def in catalog.iter() {
            for (i, a) in def.choices.iter().enumerate() {
                for b in def.choices.iter().skip(i + 1) {
                    assert_ne!(a.id, b.id, "duplicate choice id in {:?}", def.id);
                }
            }
        }
    }

    #[test]
    fn test_tiered_ev_weights_tiers() {
        let outcome = Outcome::Tiered(vec![
            (
                0.5,
                OutcomeSpec {
                    money: (10, 10),
                    ..OutcomeSpec::NONE
                },
            ),
            (
                1.0,
                OutcomeSpec {
                    money: (20, 20),
                    ..OutcomeSpec::NONE
                },
            ),
        ]);
        assert!((outcome.expected_value() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_realize_respects_ranges() {
        let spec = OutcomeSpec {
            money: (5, 9),
            population: (-2, -1),
            ..OutcomeSpec::NONE
        };
        let mut rng = SimRng::seed_from_u64(3);
        for _ in 0..100 {
            let out = spec.realize(&mut rng);
            assert!((5..=9).contains(&out.money));
            assert!((-2..=-1).contains(&out.population));
        }
    }

    #[test]
    fn test_casualty_substitution() {
        let spec = OutcomeSpec {
            population: (-2, -2),
            announcement: "{casualties} comrades lost.",
            ..OutcomeSpec::NONE
        };
        let mut rng = SimRng::seed_from_u64(3);
        let out = spec.realize(&mut rng);
        assert_eq!(out.message, "2 comrades lost.");
    }
}
