//! Simulation engine - the per-tick orchestrator
//!
//! `tick` executes a fixed phase list. The order is the replay contract:
//! every stochastic subsystem draws from the one engine RNG, so moving a
//! phase changes every trajectory after it. Inbound commands mutate
//! state between ticks; outbound events queue until the host drains
//! them.

pub mod events;
pub mod snapshot;

use std::collections::VecDeque;

use crate::core::config::SimulationConfig;
use crate::core::chronology::{ChronoEvent, Chronology, Weather};
use crate::core::error::Result;
use crate::core::rng::SimRng;
use crate::core::types::{BuildingKind, Era, Severity, Tick};
use crate::economy::blat::{BlatPurpose, InformantRisk, SpendOutcome};
use crate::economy::chains::ChainCatalog;
use crate::economy::fondy::DeliveryOutcome;
use crate::economy::heating;
use crate::economy::procurement::Procurement;
use crate::economy::resources::{ResourceKind, ResourceStore};
use crate::economy::{BlatEffect, Economy};
use crate::engine::events::{AchievementId, GameOverReason, OutboundEvent};
use crate::engine::snapshot::Snapshot;
use crate::minigame::catalog::{ChoiceId, EventTag, MinigameCatalog, MinigameId, RealizedOutcome};
use crate::minigame::router::{MinigameRouter, ResolveResult, TriggerQuery};
use crate::settlement::quota::{Quota, QuotaReview};
use crate::settlement::scoring::{era_points, Scoreboard};
use crate::settlement::tier::{self, SettlementTier};
use crate::settlement::{politics, BuildingRegistry};
use crate::workers::dossier::{Dossier, DossierCheck};
use crate::workers::roster::{DepartureCause, WorkerEvent, WorkerRoster, WorkerTickContext};

/// Tick phases, executed in `PHASE_ORDER`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AdvanceTime,
    Modifiers,
    Production,
    CompulsoryDeliveries,
    Storage,
    EconomyTick,
    Rations,
    PopulationChecks,
    Workers,
    Settlement,
    Minigames,
    NarrativeEvents,
    Personnel,
    SyncSnapshot,
    GameOverCheck,
}

/// The replay contract. Tests assert the executed trace matches.
pub const PHASE_ORDER: [Phase; 15] = [
    Phase::AdvanceTime,
    Phase::Modifiers,
    Phase::Production,
    Phase::CompulsoryDeliveries,
    Phase::Storage,
    Phase::EconomyTick,
    Phase::Rations,
    Phase::PopulationChecks,
    Phase::Workers,
    Phase::Settlement,
    Phase::Minigames,
    Phase::NarrativeEvents,
    Phase::Personnel,
    Phase::SyncSnapshot,
    Phase::GameOverCheck,
];

/// Rubles to place a building
pub fn building_cost(kind: BuildingKind) -> i64 {
    match kind {
        BuildingKind::Kolkhoz => 50,
        BuildingKind::Mine => 80,
        BuildingKind::Sawmill => 60,
        BuildingKind::SteelMill => 150,
        BuildingKind::PowerStation => 120,
        BuildingKind::Distillery => 100,
        BuildingKind::Bakery => 70,
        BuildingKind::Housing => 40,
        BuildingKind::PartyCommittee => 90,
        BuildingKind::Clinic => 80,
        BuildingKind::School => 60,
        BuildingKind::Warehouse => 50,
    }
}

/// Extra food storage per warehouse
const WAREHOUSE_CAPACITY: i64 = 200;
/// Power units one station generates, and one powered building draws
const POWER_PER_STATION: i64 = 10;
const POWER_PER_CONSUMER: i64 = 4;
/// Daily disease chance while unfed
const DISEASE_CHANCE: f64 = 0.15;
/// Daily chance exposure turns fatal
const EXPOSURE_CHANCE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub skipped: bool,
}

/// Per-tick scratch state; never saved
#[derive(Debug, Clone, Default)]
pub(crate) struct TickScratch {
    new_day: bool,
    new_year: Option<i32>,
    season_modifier: f64,
    power_deficit: bool,
    produced: Vec<(ResourceKind, i64)>,
    fed_today: bool,
    vodka_today: bool,
    heat_risk: u32,
}

pub struct SimulationEngine {
    pub(crate) config: SimulationConfig,
    pub(crate) rng: SimRng,
    pub(crate) chronology: Chronology,
    pub(crate) store: ResourceStore,
    pub(crate) economy: Economy,
    pub(crate) procurement: Procurement,
    pub(crate) quota: Quota,
    pub(crate) roster: WorkerRoster,
    pub(crate) dossier: Dossier,
    pub(crate) buildings: BuildingRegistry,
    pub(crate) tier: SettlementTier,
    pub(crate) climate: politics::PoliticalClimate,
    pub(crate) scoreboard: Scoreboard,
    pub(crate) router: MinigameRouter,
    pub(crate) achievements: Vec<AchievementId>,
    pub(crate) game_over: Option<GameOverReason>,
    pub(crate) snapshot: Snapshot,
    pub(crate) catalog: MinigameCatalog,
    pub(crate) chains: ChainCatalog,
    pub(crate) events: VecDeque<OutboundEvent>,
    pub(crate) scratch: TickScratch,
    pub(crate) last_phase_trace: Vec<Phase>,
}

impl SimulationEngine {
    pub fn new(seed: u64, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = SimRng::seed_from_u64(seed);
        let chronology =
            Chronology::new(config.ticks_per_day, config.days_per_month, config.start_year);

        let mut store = ResourceStore::new();
        store.money = config.starting_money;
        store.food = config.starting_food;
        store.timber = config.starting_timber;
        store.storage_capacity = config.storage_capacity;

        let mut buildings = BuildingRegistry::new();
        buildings.place(BuildingKind::Kolkhoz);
        buildings.place(BuildingKind::Sawmill);
        buildings.place(BuildingKind::Housing);

        let roster = WorkerRoster::new(config.starting_workers, &mut rng);
        store.set_population(roster.count());

        let mut economy = Economy::new(&config);
        economy.rations.apply_era_default(Era::from_year(config.start_year));

        let quota = Quota::new(
            ResourceKind::Food,
            config.initial_quota_target,
            config.start_year + config.plan_years,
        );

        let mut events = VecDeque::new();
        events.push_back(OutboundEvent::NewPlanIssued {
            resource: quota.resource,
            target: quota.target,
            deadline_year: quota.deadline_year,
        });

        let router = MinigameRouter::new(config.minigame_cooldown);
        let tier = tier::evaluate(roster.count(), &buildings);
        let mut engine = Self {
            rng,
            chronology,
            store,
            economy,
            procurement: Procurement::new(),
            quota,
            roster,
            dossier: Dossier::new(),
            buildings,
            tier,
            climate: politics::PoliticalClimate::default(),
            scoreboard: Scoreboard::new(),
            router,
            achievements: Vec::new(),
            game_over: None,
            snapshot: Snapshot {
                tick: 0,
                date: chronology_placeholder(),
                season: crate::core::chronology::Season::Winter,
                weather: Weather::Frost,
                day_phase: crate::core::chronology::DayPhase::Night,
                era: Era::from_year(config.start_year),
                resources: ResourceStore::new(),
                tier,
                threat: crate::workers::dossier::ThreatLevel::Clear,
                climate: politics::PoliticalClimate::default(),
                average_morale: 0,
                quota_target: 0,
                quota_progress: 0,
                quota_deadline_year: 0,
                score: 0,
                active_minigame: None,
                game_over: None,
            },
            catalog: MinigameCatalog::with_defaults(),
            chains: ChainCatalog::with_defaults(),
            events,
            scratch: TickScratch::default(),
            last_phase_trace: Vec::new(),
            config,
        };
        engine.sync_snapshot();
        Ok(engine)
    }

    /// Run one simulation tick through the fixed phase list. A finished
    /// game skips the tick and logs it.
    pub fn tick(&mut self) -> TickReport {
        if self.game_over.is_some() {
            tracing::debug!(tick = self.chronology.current_tick(), "tick skipped: game over");
            return TickReport {
                tick: self.chronology.current_tick(),
                skipped: true,
            };
        }
        self.scratch = TickScratch::default();
        self.last_phase_trace.clear();
        for phase in PHASE_ORDER {
            self.run_phase(phase);
            self.last_phase_trace.push(phase);
        }
        TickReport {
            tick: self.chronology.current_tick(),
            skipped: false,
        }
    }

    fn run_phase(&mut self, phase: Phase) {
        match phase {
            Phase::AdvanceTime => self.phase_advance_time(),
            Phase::Modifiers => self.phase_modifiers(),
            Phase::Production => self.phase_production(),
            Phase::CompulsoryDeliveries => self.phase_compulsory_deliveries(),
            Phase::Storage => self.phase_storage(),
            Phase::EconomyTick => self.phase_economy(),
            Phase::Rations => self.phase_rations(),
            Phase::PopulationChecks => self.phase_population_checks(),
            Phase::Workers => self.phase_workers(),
            Phase::Settlement => self.phase_settlement(),
            Phase::Minigames => self.phase_minigames(),
            Phase::NarrativeEvents => self.phase_narrative_events(),
            Phase::Personnel => self.phase_personnel(),
            Phase::SyncSnapshot => self.sync_snapshot(),
            Phase::GameOverCheck => self.phase_game_over_check(),
        }
    }

    fn phase_advance_time(&mut self) {
        let era_before = self.chronology.era();
        for event in self.chronology.advance(&mut self.rng) {
            match event {
                ChronoEvent::DayPhaseChanged(phase) => {
                    self.events.push_back(OutboundEvent::DayPhaseChanged(phase));
                }
                ChronoEvent::NewDay => self.scratch.new_day = true,
                ChronoEvent::WeatherChanged(weather) => {
                    self.events.push_back(OutboundEvent::WeatherChanged(weather));
                }
                ChronoEvent::NewMonth => {}
                ChronoEvent::SeasonChanged(season) => {
                    self.events.push_back(OutboundEvent::SeasonChanged(season));
                }
                ChronoEvent::NewYear(year) => self.scratch.new_year = Some(year),
                ChronoEvent::EraChanged(era) => {
                    self.scoreboard.close_era(era_before, self.current_points());
                    if era_before == Era::War {
                        self.unlock(AchievementId::SurvivedWar);
                    }
                    self.economy.rations.apply_era_default(era);
                    self.events.push_back(OutboundEvent::EraChanged(era));
                    self.events.push_back(OutboundEvent::Headline {
                        text: format!("A new era begins: {}.", era.name()),
                    });
                }
            }
        }
    }

    fn phase_modifiers(&mut self) {
        let mut modifier = self.chronology.season().production_modifier();
        match self.chronology.weather() {
            Weather::Frost => modifier *= 0.8,
            Weather::Heatwave => modifier *= 0.9,
            _ => {}
        }
        self.scratch.season_modifier = modifier;

        self.store.power =
            self.buildings.count(BuildingKind::PowerStation) as i64 * POWER_PER_STATION;
        let demand: i64 = [BuildingKind::SteelMill, BuildingKind::Distillery]
            .iter()
            .map(|kind| self.buildings.count(*kind) as i64 * POWER_PER_CONSUMER)
            .sum();
        self.store.power_used = demand;
        self.scratch.power_deficit = demand > self.store.power;
    }

    fn phase_production(&mut self) {
        if self.scratch.new_day {
            self.roster.assign_workers(&self.buildings.worker_slots());
            let assigned = self.roster.assigned_counts();
            let mut total_credited = 0;
            let mut best: Option<(BuildingKind, i64)> = None;
            // Slot order keeps the iteration deterministic
            for (kind, _) in self.buildings.worker_slots() {
                let workers = assigned.get(&kind).copied().unwrap_or(0);
                let credited = self.economy.labor.record_labor(kind, workers);
                total_credited += credited;
                if credited > best.map(|(_, c)| c).unwrap_or(0) {
                    best = Some((kind, credited));
                }
            }
            if total_credited > 0 && self.rng.chance(self.config.hero_worker_chance) {
                if let Some((kind, _)) = best {
                    self.economy.labor.credit_bonus(kind, total_credited);
                    self.dossier.add_commendation();
                    self.events.push_back(OutboundEvent::Headline {
                        text: format!(
                            "A record shift at the {}! The norm was doubled.",
                            kind.name()
                        ),
                    });
                }
            }
            if self.economy.labor.total() >= 10_000 {
                self.unlock(AchievementId::TenThousandTrudodni);
            }
        }

        let present = self.buildings.present_kinds();
        let results = crate::economy::chains::tick_production_chains(
            &self.chains,
            &present,
            &mut self.store,
            self.scratch.season_modifier,
            self.scratch.power_deficit,
        );
        for result in results {
            for (kind, amount) in result.produced {
                match self.scratch.produced.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, total)) => *total += amount,
                    None => self.scratch.produced.push((kind, amount)),
                }
            }
        }
    }

    fn phase_compulsory_deliveries(&mut self) {
        let produced = std::mem::take(&mut self.scratch.produced);
        let extracted =
            self.procurement
                .extract(&produced, self.chronology.era(), &mut self.store);
        for (kind, amount) in extracted {
            self.quota.record_progress(kind, amount);
        }
    }

    fn phase_storage(&mut self) {
        if !self.scratch.new_day {
            return;
        }
        let excess = self.store.food - self.store.storage_capacity;
        if excess <= 0 {
            return;
        }
        let spoiled = excess * self.config.spoilage_percent / 100;
        if spoiled > 0 {
            self.store.food -= spoiled;
            self.events.push_back(OutboundEvent::Toast {
                message: format!("{} food spoiled in the open; the warehouses are full.", spoiled),
                severity: Severity::Warning,
            });
        }
    }

    fn phase_economy(&mut self) {
        let tick = self.chronology.current_tick();
        let report = self.economy.tick(tick, &mut self.rng, &self.config);
        match report.delivery {
            DeliveryOutcome::NotDue => {}
            DeliveryOutcome::Failed { reason } => {
                self.events.push_back(OutboundEvent::Advisor { message: reason });
            }
            DeliveryOutcome::Delivered { bundle, reason } => {
                self.store.add_bundle(&bundle);
                self.events.push_back(OutboundEvent::Advisor { message: reason });
            }
        }
        match report.informant_risk {
            InformantRisk::Unchecked | InformantRisk::Clear => {}
            InformantRisk::Investigation => {
                self.dossier.add_marks(1);
                self.events.push_back(OutboundEvent::Toast {
                    message: "Someone has been asking the neighbors about your arrangements."
                        .into(),
                    severity: Severity::Warning,
                });
            }
            InformantRisk::Arrest => {
                self.events.push_back(OutboundEvent::Toast {
                    message: "Your connections were a thread; someone pulled it.".into(),
                    severity: Severity::Critical,
                });
                self.end_game(GameOverReason::ChairmanArrested);
            }
        }

        if let Some(year) = self.scratch.new_year {
            if let Some(applied) = self
                .economy
                .reforms
                .check_currency_reform(year, self.store.money)
            {
                self.store.money = applied.new_money;
                self.events.push_back(OutboundEvent::Headline {
                    text: format!(
                        "{}: savings of {} rubles are now {}.",
                        applied.name, applied.old_money, applied.new_money
                    ),
                });
            }
        }

        if self.scratch.new_day {
            let population = self.roster.count();
            let month = self.chronology.date().month;
            let needed = heating::daily_fuel_need(population, month);
            let has_fuel = self.store.timber >= needed;
            let report = self.economy.heating.process_heating(
                population,
                month,
                has_fuel,
                self.config.district_heating_population,
                self.config.heating_disrepair_ticks,
                self.config.ticks_per_day,
            );
            let burned = report.fuel_needed.min(self.store.timber).max(0);
            self.store.add(ResourceKind::Timber, -burned);
            self.scratch.heat_risk = report.population_at_risk;
            if report.population_at_risk > 0 {
                self.events.push_back(OutboundEvent::Toast {
                    message: format!(
                        "No fuel for the stoves; {} residents face the frost.",
                        report.population_at_risk
                    ),
                    severity: Severity::Critical,
                });
            }

            if self.buildings.present(BuildingKind::PartyCommittee) {
                self.economy.blat.earn(1);
            }
            self.economy.decay_consumer_goods();
        }
    }

    fn phase_rations(&mut self) {
        if !self.scratch.new_day {
            return;
        }
        let draw = self
            .economy
            .rations
            .daily_consumption(self.roster.count(), self.chronology.era());
        if self.store.spend(ResourceKind::Food, draw.food) {
            self.scratch.fed_today = true;
        } else {
            // The pantry empties and the day still ends hungry
            self.store.food = 0;
            self.scratch.fed_today = false;
            self.events.push_back(OutboundEvent::Toast {
                message: "The bread ran out before the queue did.".into(),
                severity: Severity::Warning,
            });
        }
        self.scratch.vodka_today = self.store.spend(ResourceKind::Vodka, draw.vodka);
    }

    fn phase_population_checks(&mut self) {
        if !self.scratch.new_day {
            return;
        }
        let population = self.roster.count();
        if population == 0 {
            return;
        }
        if !self.scratch.fed_today && self.rng.chance(DISEASE_CHANCE) {
            let ceiling = (population / 20).max(1) as i64;
            let deaths = self.rng.int_range(1, ceiling) as u32;
            self.roster.remove_last(deaths, DepartureCause::Death);
            self.events.push_back(OutboundEvent::Toast {
                message: format!("Typhus in the barracks: {} dead.", deaths),
                severity: Severity::Critical,
            });
        }
        if self.scratch.heat_risk > 0 && self.rng.chance(EXPOSURE_CHANCE) {
            let ceiling = (self.scratch.heat_risk / 5).max(1) as i64;
            let deaths = self.rng.int_range(1, ceiling) as u32;
            self.roster.remove_last(deaths, DepartureCause::Death);
            self.events.push_back(OutboundEvent::Toast {
                message: format!("The cold took {} this night.", deaths),
                severity: Severity::Critical,
            });
        }
    }

    fn phase_workers(&mut self) {
        if !self.scratch.new_day {
            return;
        }
        let ctx = WorkerTickContext {
            fed: self.scratch.fed_today,
            heated: self.scratch.heat_risk == 0,
            vodka_issued: self.scratch.vodka_today,
            consumer_goods: self.economy.consumer_goods,
            housing_space: self.buildings.housing_capacity() > self.roster.count(),
        };
        for event in self.roster.tick_daily(ctx, &mut self.rng) {
            match event {
                WorkerEvent::Arrived(_) => {
                    self.events.push_back(OutboundEvent::Toast {
                        message: "A new family has settled in the barracks.".into(),
                        severity: Severity::Info,
                    });
                }
                WorkerEvent::Accident { .. } => {
                    self.events.push_back(OutboundEvent::Toast {
                        message: "An accident on the industrial line.".into(),
                        severity: Severity::Warning,
                    });
                }
                WorkerEvent::Departed { cause, .. } => {
                    let (message, severity) = match cause {
                        DepartureCause::Death => {
                            ("A worker was lost on the job.".into(), Severity::Warning)
                        }
                        DepartureCause::Defection => {
                            // Desertion reflects on the chairman
                            self.dossier.add_marks(1);
                            (
                                "A worker slipped away in the night.".to_string(),
                                Severity::Warning,
                            )
                        }
                        DepartureCause::Arrest => {
                            ("A worker was taken for questioning.".into(), Severity::Warning)
                        }
                        DepartureCause::Migration => {
                            ("A worker was reassigned elsewhere.".into(), Severity::Info)
                        }
                    };
                    self.events.push_back(OutboundEvent::Toast { message, severity });
                }
            }
        }
        self.store.set_population(self.roster.count());
    }

    fn phase_settlement(&mut self) {
        let population = self.roster.count();
        let evaluated = tier::evaluate(population, &self.buildings);
        if evaluated != self.tier {
            let promoted = evaluated.outranks(&self.tier);
            self.tier = evaluated;
            self.events.push_back(OutboundEvent::TierChanged(evaluated));
            if promoted {
                match evaluated {
                    SettlementTier::Township => self.unlock(AchievementId::TownshipRaised),
                    SettlementTier::City => self.unlock(AchievementId::CityRaised),
                    _ => {}
                }
            }
        }
        self.climate = politics::evaluate(
            self.dossier.threat_level(),
            self.economy.blat.balance,
            self.config.blat_safe_threshold,
            population,
        );

        if let Some(year) = self.scratch.new_year {
            match self.quota.review_year_end(
                year,
                self.config.quota_growth_percent,
                self.config.plan_years,
            ) {
                Some(QuotaReview::Met { new_target, new_deadline_year }) => {
                    self.unlock(AchievementId::PlanFulfilled);
                    self.events.push_back(OutboundEvent::Toast {
                        message: "The plan is fulfilled. Moscow sends its regards.".into(),
                        severity: Severity::Info,
                    });
                    self.events.push_back(OutboundEvent::NewPlanIssued {
                        resource: self.quota.resource,
                        target: new_target,
                        deadline_year: new_deadline_year,
                    });
                }
                Some(QuotaReview::Missed { consecutive_failures }) => {
                    self.events.push_back(OutboundEvent::Toast {
                        message: format!(
                            "The plan was not met. That is failure number {}.",
                            consecutive_failures
                        ),
                        severity: Severity::Critical,
                    });
                    if consecutive_failures >= self.config.quota_failure_limit {
                        self.end_game(GameOverReason::QuotaFailures);
                    }
                }
                None => {}
            }
        }
    }

    fn phase_minigames(&mut self) {
        let now = self.chronology.current_tick();
        if let Some(outcome) = self.router.tick(now, &self.catalog, &mut self.rng) {
            self.apply_outcome(outcome);
        }
        let query = TriggerQuery::Periodic {
            tick: now,
            population: self.roster.count(),
        };
        if let Some(def) = self.router.check_trigger(&self.catalog, query, now) {
            let id = def.id;
            self.router.start(id, now);
            self.events.push_back(OutboundEvent::MinigamePresented { id });
        }
    }

    fn phase_narrative_events(&mut self) {
        if !self.scratch.new_day || !self.rng.chance(self.config.narrative_event_chance) {
            return;
        }
        match self.rng.pick(&[0.3, 0.3, 0.2, 0.2]) {
            0 => {
                let lost = self.rng.int_range(5, 20);
                self.store.add(ResourceKind::Timber, -lost);
                if self.rng.chance(0.3) {
                    // The fire spreads to a workshop
                    const TINDER: [BuildingKind; 4] = [
                        BuildingKind::Sawmill,
                        BuildingKind::Distillery,
                        BuildingKind::Bakery,
                        BuildingKind::Mine,
                    ];
                    if let Some(kind) = TINDER.iter().find(|k| self.buildings.present(**k)) {
                        self.buildings.remove(*kind);
                        self.events.push_back(OutboundEvent::BuildingCollapsed(*kind));
                        self.events.push_back(OutboundEvent::Toast {
                            message: format!("Fire! The {} burned to the ground.", kind.name()),
                            severity: Severity::Critical,
                        });
                        return;
                    }
                }
                self.events.push_back(OutboundEvent::Toast {
                    message: format!("A fire in the timber yard; {} timber lost.", lost),
                    severity: Severity::Warning,
                });
            }
            1 => {
                self.events.push_back(OutboundEvent::Headline {
                    text: "An inspector from the raikom has been seen at the station.".into(),
                });
                self.trigger_event_minigame(EventTag::InspectorVisit);
            }
            2 => {
                self.events.push_back(OutboundEvent::Headline {
                    text: "Rumors of requisition detachments in the district.".into(),
                });
                self.trigger_event_minigame(EventTag::Famine);
            }
            _ => {
                self.roster.boost_morale(5);
                self.events.push_back(OutboundEvent::Headline {
                    text: "A harvest festival lifts the settlement's spirits.".into(),
                });
            }
        }
    }

    fn phase_personnel(&mut self) {
        if !self.scratch.new_day {
            return;
        }
        let check = self.dossier.tick(
            self.chronology.current_tick(),
            self.config.mark_decay_interval,
            self.config.arrest_probability,
            &mut self.rng,
        );
        match check {
            DossierCheck::Quiet | DossierCheck::MarkDecayed => {}
            DossierCheck::ArrestTriggered => {
                self.events.push_back(OutboundEvent::Toast {
                    message: "A car waits outside the chairman's office.".into(),
                    severity: Severity::Critical,
                });
                self.end_game(GameOverReason::ChairmanArrested);
            }
        }
    }

    pub(crate) fn sync_snapshot(&mut self) {
        self.store.trudodni = self.economy.labor.total();
        self.store.connections = self.economy.blat.balance;
        self.store.clamp_non_negative();
        self.snapshot = Snapshot {
            tick: self.chronology.current_tick(),
            date: self.chronology.date(),
            season: self.chronology.season(),
            weather: self.chronology.weather(),
            day_phase: self.chronology.day_phase(),
            era: self.chronology.era(),
            resources: self.store.clone(),
            tier: self.tier,
            threat: self.dossier.threat_level(),
            climate: self.climate,
            average_morale: self.roster.average_morale(),
            quota_target: self.quota.target,
            quota_progress: self.quota.progress,
            quota_deadline_year: self.quota.deadline_year,
            score: self.scoreboard.total() + self.current_points(),
            active_minigame: self.router.active().map(|active| active.id),
            game_over: self.game_over,
        };
    }

    fn phase_game_over_check(&mut self) {
        if self.roster.is_empty()
            && self.chronology.current_tick() > self.config.grace_period_ticks
        {
            self.end_game(GameOverReason::PopulationWiped);
        }
    }

    fn current_points(&self) -> i64 {
        era_points(
            self.roster.count(),
            self.tier,
            self.quota.plans_completed,
            self.dossier.black_marks,
            self.economy.labor.total(),
        )
    }

    /// Terminal transition; the first reason sticks and later calls are
    /// no-ops.
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.game_over.is_some() {
            return;
        }
        tracing::info!(?reason, tick = self.chronology.current_tick(), "game over");
        self.game_over = Some(reason);
        self.scoreboard.close_era(self.chronology.era(), self.current_points());
        self.events.push_back(OutboundEvent::GameOver(reason));
        self.events.push_back(OutboundEvent::FinalTally {
            score: self.scoreboard.total(),
            by_era: self.scoreboard.by_era().to_vec(),
        });
        self.snapshot.game_over = self.game_over;
        self.snapshot.score = self.scoreboard.total();
    }

    fn unlock(&mut self, id: AchievementId) {
        if self.achievements.contains(&id) {
            return;
        }
        self.achievements.push(id);
        self.events.push_back(OutboundEvent::AchievementUnlocked(id));
    }

    fn apply_outcome(&mut self, outcome: RealizedOutcome) {
        self.store.add(ResourceKind::Money, outcome.money);
        self.store.add(ResourceKind::Food, outcome.food);
        self.store.add(ResourceKind::Vodka, outcome.vodka);
        if outcome.population < 0 {
            self.roster
                .remove_last(outcome.population.unsigned_abs() as u32, DepartureCause::Death);
        } else {
            for _ in 0..outcome.population {
                self.roster.spawn(&mut self.rng);
            }
        }
        self.store.set_population(self.roster.count());
        if outcome.black_marks > 0 {
            self.dossier.add_marks(outcome.black_marks);
        }
        if !outcome.message.is_empty() {
            self.events.push_back(OutboundEvent::Toast {
                message: outcome.message,
                severity: outcome.severity,
            });
        }
    }

    // === Inbound commands ===

    /// Resolve the active minigame with a player choice. Outcomes apply
    /// immediately; sentinel results pass through unchanged.
    pub fn resolve_minigame_choice(&mut self, choice_id: ChoiceId) -> ResolveResult {
        let now = self.chronology.current_tick();
        let result = self
            .router
            .resolve_choice(choice_id, &self.catalog, &mut self.rng, now);
        if let ResolveResult::Resolved(outcome) = &result {
            self.apply_outcome(outcome.clone());
        }
        result
    }

    /// Host signal that the resolution was shown; frees the router
    pub fn clear_resolved_minigame(&mut self) -> bool {
        self.router.clear_resolved()
    }

    /// A tap on a building may present a minigame
    pub fn check_building_tap_minigame(&mut self, kind: BuildingKind) -> Option<MinigameId> {
        let now = self.chronology.current_tick();
        let id = self
            .router
            .check_trigger(&self.catalog, TriggerQuery::BuildingTap(kind), now)?
            .id;
        self.router.start(id, now);
        self.events.push_back(OutboundEvent::MinigamePresented { id });
        Some(id)
    }

    /// A narrative event tag may present a minigame
    pub fn check_event_minigame(&mut self, tag: EventTag) -> Option<MinigameId> {
        self.trigger_event_minigame(tag)
    }

    fn trigger_event_minigame(&mut self, tag: EventTag) -> Option<MinigameId> {
        let now = self.chronology.current_tick();
        let id = self
            .router
            .check_trigger(&self.catalog, TriggerQuery::Event(tag), now)?
            .id;
        self.router.start(id, now);
        self.events.push_back(OutboundEvent::MinigamePresented { id });
        Some(id)
    }

    /// Place a building if the treasury covers it
    pub fn place_building(&mut self, kind: BuildingKind) -> bool {
        let cost = building_cost(kind);
        if !self.store.spend(ResourceKind::Money, cost) {
            self.events.push_back(OutboundEvent::Toast {
                message: format!("No funds for a {} ({} rubles).", kind.name(), cost),
                severity: Severity::Warning,
            });
            return false;
        }
        self.buildings.place(kind);
        if kind == BuildingKind::Warehouse {
            self.store.storage_capacity += WAREHOUSE_CAPACITY;
        }
        self.events.push_back(OutboundEvent::Toast {
            message: format!("A {} has been raised.", kind.name()),
            severity: Severity::Info,
        });
        true
    }

    /// Spend connections; ledger effects and their fallout apply here
    pub fn spend_connections(&mut self, amount: i64, purpose: BlatPurpose) -> SpendOutcome {
        let spend = self
            .economy
            .spend_connections(amount, purpose, &mut self.rng, &self.config);
        match spend.effect {
            BlatEffect::QuotaReduction(reduction) => self.quota.reduce_target(reduction),
            BlatEffect::MarkToHush => {
                self.dossier.hush_mark();
            }
            _ => {}
        }
        if let SpendOutcome::Spent { noticed: true, .. } = spend.outcome {
            self.dossier.add_marks(1);
            self.events.push_back(OutboundEvent::Toast {
                message: "Your generosity did not go unnoticed.".into(),
                severity: Severity::Warning,
            });
        }
        spend.outcome
    }

    /// Repair degraded district heating
    pub fn repair_heating(&mut self) -> bool {
        let bill = [(ResourceKind::Steel, 10), (ResourceKind::Money, 20)];
        if !self.store.consume_bundle(&bill) {
            return false;
        }
        self.economy.heating.repair();
        self.events.push_back(OutboundEvent::Toast {
            message: "The heating mains are patched and holding.".into(),
            severity: Severity::Info,
        });
        true
    }

    /// Drain queued outbound events in emission order
    pub fn drain_events(&mut self) -> Vec<OutboundEvent> {
        self.events.drain(..).collect()
    }

    // === Read surface ===

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn chronology(&self) -> &Chronology {
        &self.chronology
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn quota(&self) -> &Quota {
        &self.quota
    }

    pub fn dossier(&self) -> &Dossier {
        &self.dossier
    }

    pub fn roster(&self) -> &WorkerRoster {
        &self.roster
    }

    pub fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    pub fn router(&self) -> &MinigameRouter {
        &self.router
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn achievements(&self) -> &[AchievementId] {
        &self.achievements
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn last_phase_trace(&self) -> &[Phase] {
        &self.last_phase_trace
    }
}

fn chronology_placeholder() -> crate::core::chronology::SimDate {
    crate::core::chronology::SimDate {
        year: 1917,
        month: 1,
        day: 1,
        hour: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> SimulationEngine {
        SimulationEngine::new(seed, SimulationConfig::default()).expect("default config")
    }

    #[test]
    fn test_new_engine_has_starting_state() {
        let engine = engine(1);
        assert_eq!(engine.roster().count(), 12);
        assert_eq!(engine.store().money, 500);
        assert!(engine.buildings().present(BuildingKind::Kolkhoz));
        assert!(engine.game_over().is_none());
    }

    #[test]
    fn test_first_events_include_plan() {
        let mut engine = engine(1);
        let events = engine.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, OutboundEvent::NewPlanIssued { .. })),
            "a plan is issued at start"
        );
    }

    #[test]
    fn test_tick_executes_full_phase_order() {
        let mut engine = engine(1);
        let report = engine.tick();
        assert!(!report.skipped);
        assert_eq!(engine.last_phase_trace(), &PHASE_ORDER);
    }

    #[test]
    fn test_finished_game_skips_ticks() {
        let mut engine = engine(1);
        engine.tick();
        engine.end_game(GameOverReason::QuotaFailures);
        let tick_before = engine.chronology().current_tick();
        let report = engine.tick();
        assert!(report.skipped);
        assert_eq!(engine.chronology().current_tick(), tick_before);
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut engine = engine(1);
        engine.end_game(GameOverReason::QuotaFailures);
        engine.end_game(GameOverReason::ChairmanArrested);
        assert_eq!(engine.game_over(), Some(GameOverReason::QuotaFailures));
        let game_overs = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, OutboundEvent::GameOver(_)))
            .count();
        assert_eq!(game_overs, 1, "only the first reason emits");
    }

    #[test]
    fn test_place_building_charges_money() {
        let mut engine = engine(1);
        let money = engine.store().money;
        assert!(engine.place_building(BuildingKind::Housing));
        assert_eq!(engine.store().money, money - building_cost(BuildingKind::Housing));

        let mut broke = engine;
        broke.store.money = 0;
        assert!(!broke.place_building(BuildingKind::SteelMill));
        assert_eq!(broke.buildings().count(BuildingKind::SteelMill), 0);
    }

    #[test]
    fn test_warehouse_extends_storage() {
        let mut engine = engine(1);
        let capacity = engine.store().storage_capacity;
        engine.place_building(BuildingKind::Warehouse);
        assert_eq!(engine.store().storage_capacity, capacity + WAREHOUSE_CAPACITY);
    }

    #[test]
    fn test_building_tap_starts_minigame_and_blocks_second() {
        let mut engine = engine(1);
        engine.place_building(BuildingKind::Mine);
        let id = engine.check_building_tap_minigame(BuildingKind::Mine);
        assert_eq!(id, Some(MinigameId::MiningExpedition));
        assert!(
            engine.check_building_tap_minigame(BuildingKind::Mine).is_none(),
            "one minigame at a time"
        );
    }

    #[test]
    fn test_resolve_applies_outcome_to_state() {
        let mut engine = engine(1);
        engine.place_building(BuildingKind::Mine);
        engine.check_building_tap_minigame(BuildingKind::Mine);
        let money_before = engine.store().money;
        let population_before = engine.roster().count();
        match engine.resolve_minigame_choice(ChoiceId(1)) {
            ResolveResult::Resolved(outcome) => {
                assert_eq!(engine.store().money, money_before + outcome.money);
                let expected = (population_before as i64 + outcome.population) as u32;
                assert_eq!(engine.roster().count(), expected);
            }
            other => panic!("expected resolution, got {:?}", other),
        }
        assert!(engine.clear_resolved_minigame());
    }

    #[test]
    fn test_population_wipe_ends_game_after_grace() {
        let mut engine = engine(1);
        // Run past the grace period, then wipe the roster
        for _ in 0..=engine.config().grace_period_ticks {
            engine.tick();
        }
        let count = engine.roster.count();
        engine.roster.remove_last(count, DepartureCause::Migration);
        engine.tick();
        assert_eq!(engine.game_over(), Some(GameOverReason::PopulationWiped));
    }

    #[test]
    fn test_snapshot_tracks_tick() {
        let mut engine = engine(1);
        engine.tick();
        engine.tick();
        assert_eq!(engine.snapshot().tick, 2);
        assert_eq!(engine.snapshot().resources, *engine.store());
    }

    #[test]
    fn test_spend_connections_effects() {
        let mut engine = engine(1);
        engine.economy.blat.earn(30);
        let target = engine.quota().target;
        let outcome = engine.spend_connections(5, BlatPurpose::ReduceQuota);
        assert!(matches!(outcome, SpendOutcome::Spent { .. }));
        assert_eq!(engine.quota().target, target - 10);

        engine.dossier.add_marks(2);
        engine.spend_connections(5, BlatPurpose::HushMark);
        assert_eq!(engine.dossier().black_marks, 1);
    }
}
