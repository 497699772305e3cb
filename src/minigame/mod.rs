//! Minigames - interrupt scenarios with choices and auto-resolution
//!
//! Definitions are immutable data in the catalog; the router owns the
//! one-at-a-time state machine and per-id cooldowns.

pub mod catalog;
pub mod router;

pub use catalog::{
    Choice, ChoiceId, EventTag, MinigameCatalog, MinigameDef, MinigameId, Outcome, OutcomeSpec,
    RealizedOutcome, TriggerKind,
};
pub use router::{ActiveMinigame, MinigameRouter, ResolveResult, TriggerQuery};
