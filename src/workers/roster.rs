//! Worker roster - discrete people with morale, skill, and assignments
//!
//! The roster is the authoritative population count. Daily ticks drift
//! morale from living conditions, then roll defections, industrial
//! accidents, and growth. Iteration is always in roster order so the
//! draw sequence is reproducible.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::{BuildingKind, BuildingRole, WorkerId};

/// Morale floor below which a worker considers leaving
const DEFECTION_MORALE: i32 = 20;
const DEFECTION_CHANCE: f64 = 0.1;
/// Per-worker daily accident probability on industrial assignments
const ACCIDENT_CHANCE: f64 = 0.005;
/// Daily chance of a new arrival while fed and housed
const GROWTH_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartureCause {
    Death,
    Arrest,
    Defection,
    Migration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureStats {
    pub deaths: u32,
    pub arrests: u32,
    pub defections: u32,
    pub migrations: u32,
}

impl DepartureStats {
    fn record(&mut self, cause: DepartureCause) {
        match cause {
            DepartureCause::Death => self.deaths += 1,
            DepartureCause::Arrest => self.arrests += 1,
            DepartureCause::Defection => self.defections += 1,
            DepartureCause::Migration => self.migrations += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    /// 0-100
    pub morale: i32,
    /// 1-5
    pub skill: u8,
    pub assignment: Option<BuildingKind>,
}

/// Living conditions feeding the daily morale drift
#[derive(Debug, Clone, Copy)]
pub struct WorkerTickContext {
    pub fed: bool,
    pub heated: bool,
    pub vodka_issued: bool,
    pub consumer_goods: f64,
    pub housing_space: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Arrived(WorkerId),
    Departed { id: WorkerId, cause: DepartureCause },
    Accident { id: WorkerId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRoster {
    workers: Vec<Worker>,
    next_id: u32,
    pub stats: DepartureStats,
}

impl WorkerRoster {
    pub fn new(initial: u32, rng: &mut SimRng) -> Self {
        let mut roster = Self {
            workers: Vec::new(),
            next_id: 0,
            stats: DepartureStats::default(),
        };
        for _ in 0..initial {
            roster.spawn(rng);
        }
        roster
    }

    pub fn spawn(&mut self, rng: &mut SimRng) -> WorkerId {
        let id = WorkerId::new(self.next_id);
        self.next_id += 1;
        self.workers.push(Worker {
            id,
            morale: 60,
            skill: rng.int_range(1, 5) as u8,
            assignment: None,
        });
        id
    }

    pub fn remove(&mut self, id: WorkerId, cause: DepartureCause) -> bool {
        let Some(index) = self.workers.iter().position(|w| w.id == id) else {
            return false;
        };
        self.workers.remove(index);
        self.stats.record(cause);
        true
    }

    /// Remove up to `count` workers from the end of the roster
    pub fn remove_last(&mut self, count: u32, cause: DepartureCause) -> Vec<WorkerId> {
        let mut removed = Vec::new();
        for _ in 0..count {
            let Some(worker) = self.workers.pop() else {
                break;
            };
            self.stats.record(cause);
            removed.push(worker.id);
        }
        removed
    }

    pub fn count(&self) -> u32 {
        self.workers.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn average_morale(&self) -> i32 {
        if self.workers.is_empty() {
            return 0;
        }
        let total: i64 = self.workers.iter().map(|w| w.morale as i64).sum();
        (total / self.workers.len() as i64) as i32
    }

    pub fn boost_morale(&mut self, amount: i32) {
        for worker in &mut self.workers {
            worker.morale = (worker.morale + amount).clamp(0, 100);
        }
    }

    /// Fill work slots in the given order; slots are (kind, open positions).
    /// Workers keep a valid existing assignment, surplus workers go idle.
    pub fn assign_workers(&mut self, slots: &[(BuildingKind, u32)]) {
        let mut open: Vec<(BuildingKind, u32)> = slots.to_vec();
        // First pass: keep assignments that still have a slot
        for worker in &mut self.workers {
            if let Some(kind) = worker.assignment {
                match open.iter_mut().find(|(k, n)| *k == kind && *n > 0) {
                    Some((_, n)) => *n -= 1,
                    None => worker.assignment = None,
                }
            }
        }
        // Second pass: fill remaining slots in slot order
        for worker in &mut self.workers {
            if worker.assignment.is_some() {
                continue;
            }
            if let Some((kind, n)) = open.iter_mut().find(|(_, n)| *n > 0) {
                worker.assignment = Some(*kind);
                *n -= 1;
            }
        }
    }

    pub fn assigned_counts(&self) -> AHashMap<BuildingKind, u32> {
        let mut counts = AHashMap::new();
        for worker in &self.workers {
            if let Some(kind) = worker.assignment {
                *counts.entry(kind).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Daily roster update: morale drift, then defections, accidents,
    /// and growth. Returns events in roster order.
    pub fn tick_daily(&mut self, ctx: WorkerTickContext, rng: &mut SimRng) -> Vec<WorkerEvent> {
        let mut events = Vec::new();

        let mut drift = 0;
        drift += if ctx.fed { 2 } else { -8 };
        drift += if ctx.heated { 0 } else { -5 };
        drift += if ctx.vodka_issued { 1 } else { -1 };
        if ctx.consumer_goods >= 0.5 {
            drift += 1;
        }
        for worker in &mut self.workers {
            worker.morale = (worker.morale + drift).clamp(0, 100);
        }

        let mut departures: Vec<(WorkerId, DepartureCause)> = Vec::new();
        for worker in &self.workers {
            if worker.morale < DEFECTION_MORALE && rng.chance(DEFECTION_CHANCE) {
                departures.push((worker.id, DepartureCause::Defection));
                continue;
            }
            let industrial = worker
                .assignment
                .map(|kind| kind.role() == BuildingRole::Industrial)
                .unwrap_or(false);
            if industrial && rng.chance(ACCIDENT_CHANCE) {
                events.push(WorkerEvent::Accident { id: worker.id });
                departures.push((worker.id, DepartureCause::Death));
            }
        }
        for (id, cause) in departures {
            if self.remove(id, cause) {
                events.push(WorkerEvent::Departed { id, cause });
            }
        }

        if ctx.fed && ctx.housing_space && rng.chance(GROWTH_CHANCE) {
            let id = self.spawn(rng);
            events.push(WorkerEvent::Arrived(id));
        }

        events
    }
}
