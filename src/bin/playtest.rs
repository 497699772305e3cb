//! Headless playtest driver
//!
//! Runs the simulation for a fixed number of ticks, tallying events and
//! printing a summary. Useful for pacing checks and determinism spot
//! tests across seeds.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sovgorod::core::config::SimulationConfig;
use sovgorod::engine::events::OutboundEvent;
use sovgorod::engine::SimulationEngine;

#[derive(Parser)]
#[command(about = "Run a headless simulation and print a summary")]
struct Args {
    /// World seed
    #[arg(long, default_value_t = 1917)]
    seed: u64,

    /// Ticks to simulate (default: ten years of hours)
    #[arg(long, default_value_t = 86_400)]
    ticks: u64,

    /// Optional TOML config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final state as a save file
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Default)]
struct Tally {
    toasts: u64,
    headlines: u64,
    advisories: u64,
    minigames: u64,
    tier_changes: u64,
    era_changes: u64,
    plans_issued: u64,
    achievements: u64,
}

impl Tally {
    fn record(&mut self, event: &OutboundEvent) {
        match event {
            OutboundEvent::Toast { .. } => self.toasts += 1,
            OutboundEvent::Headline { .. } => self.headlines += 1,
            OutboundEvent::Advisor { .. } => self.advisories += 1,
            OutboundEvent::MinigamePresented { .. } => self.minigames += 1,
            OutboundEvent::TierChanged(_) => self.tier_changes += 1,
            OutboundEvent::EraChanged(_) => self.era_changes += 1,
            OutboundEvent::NewPlanIssued { .. } => self.plans_issued += 1,
            OutboundEvent::AchievementUnlocked(_) => self.achievements += 1,
            _ => {}
        }
    }
}

fn main() -> sovgorod::core::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            SimulationConfig::from_toml_str(&text)?
        }
        None => SimulationConfig::default(),
    };

    let mut engine = SimulationEngine::new(args.seed, config)?;
    let mut tally = Tally::default();
    let mut ran = 0;
    for _ in 0..args.ticks {
        let report = engine.tick();
        for event in engine.drain_events() {
            tally.record(&event);
        }
        if report.skipped {
            break;
        }
        ran += 1;
    }

    let snapshot = engine.snapshot();
    println!("seed {} ran {} ticks", args.seed, ran);
    println!(
        "date {}-{:02}-{:02}, era {}, weather {:?}",
        snapshot.date.year,
        snapshot.date.month,
        snapshot.date.day,
        snapshot.era.name(),
        snapshot.weather
    );
    println!(
        "population {} (morale {}), tier {}",
        snapshot.resources.population(),
        snapshot.average_morale,
        snapshot.tier.name()
    );
    println!(
        "money {} food {} vodka {} steel {} timber {}",
        snapshot.resources.money,
        snapshot.resources.food,
        snapshot.resources.vodka,
        snapshot.resources.steel,
        snapshot.resources.timber
    );
    println!(
        "plan: {}/{} by {}, threat {:?}, score {}",
        snapshot.quota_progress,
        snapshot.quota_target,
        snapshot.quota_deadline_year,
        snapshot.threat,
        snapshot.score
    );
    println!(
        "events: {} toasts, {} headlines, {} advisories, {} minigames, {} tier changes, {} era changes, {} plans, {} achievements",
        tally.toasts,
        tally.headlines,
        tally.advisories,
        tally.minigames,
        tally.tier_changes,
        tally.era_changes,
        tally.plans_issued,
        tally.achievements
    );
    if let Some(reason) = engine.game_over() {
        println!("game over: {:?}", reason);
    }

    if let Some(path) = &args.save {
        engine.to_save().write_file(path)?;
        println!("saved to {}", path.display());
    }
    Ok(())
}
