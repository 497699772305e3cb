//! Currency reforms - scheduled monetary shocks
//!
//! Reforms apply at most once each, in year order, the first year-end on
//! or after their scheduled year. Standard reforms redenominate the whole
//! balance; confiscatory reforms take a fraction of the balance above a
//! threshold only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReformKind {
    /// Divide the balance by `rate`; a positive balance floors at 1
    Standard { rate: i64 },
    /// Take `take_percent`% of the balance above `threshold`
    Confiscatory { threshold: i64, take_percent: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyReform {
    pub year: i32,
    pub name: String,
    pub kind: ReformKind,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReformApplied {
    pub name: String,
    pub year: i32,
    pub old_money: i64,
    pub new_money: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReformSchedule {
    /// Sorted by year; earliest unapplied reform goes first
    reforms: Vec<CurrencyReform>,
}

impl ReformSchedule {
    pub fn with_defaults() -> Self {
        Self {
            reforms: vec![
                CurrencyReform {
                    year: 1924,
                    name: "Chervonets consolidation".into(),
                    kind: ReformKind::Standard { rate: 50_000 },
                    applied: false,
                },
                CurrencyReform {
                    year: 1947,
                    name: "Postwar confiscation".into(),
                    kind: ReformKind::Confiscatory {
                        threshold: 3_000,
                        take_percent: 66,
                    },
                    applied: false,
                },
                CurrencyReform {
                    year: 1961,
                    name: "Khrushchev redenomination".into(),
                    kind: ReformKind::Standard { rate: 10 },
                    applied: false,
                },
            ],
        }
    }

    /// Apply at most one reform: the earliest unapplied entry whose year
    /// has arrived. Returns None when nothing is due.
    pub fn check_currency_reform(&mut self, year: i32, money: i64) -> Option<ReformApplied> {
        let reform = self
            .reforms
            .iter_mut()
            .find(|reform| !reform.applied && reform.year <= year)?;
        reform.applied = true;

        let new_money = match reform.kind {
            ReformKind::Standard { rate } => {
                if money <= 0 {
                    money
                } else {
                    (money / rate).max(1)
                }
            }
            ReformKind::Confiscatory {
                threshold,
                take_percent,
            } => {
                if money <= threshold {
                    money
                } else {
                    let above = money - threshold;
                    threshold + above * (100 - take_percent) / 100
                }
            }
        };
        tracing::info!(name = %reform.name, year, old = money, new = new_money, "currency reform applied");
        Some(ReformApplied {
            name: reform.name.clone(),
            year: reform.year,
            old_money: money,
            new_money,
        })
    }

    pub fn reforms(&self) -> &[CurrencyReform] {
        &self.reforms
    }
}
