//! Minigame router - the one-at-a-time state machine
//!
//! Lifecycle: idle -> active -> resolved -> idle. Only one minigame may
//! be active; triggers are refused while one is, and a resolved id goes
//! on cooldown. Precondition violations return sentinel results rather
//! than errors.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::rng::SimRng;
use crate::core::types::Tick;
use crate::minigame::catalog::{
    ChoiceId, EventTag, MinigameCatalog, MinigameDef, MinigameId, RealizedOutcome, TriggerKind,
};
use crate::core::types::BuildingKind;

/// What the engine asks the router to match a trigger against
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerQuery {
    BuildingTap(BuildingKind),
    Event(EventTag),
    Periodic { tick: Tick, population: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveMinigame {
    pub id: MinigameId,
    pub started_tick: Tick,
    pub resolved: bool,
    pub chosen: Option<ChoiceId>,
    pub outcome: Option<RealizedOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult {
    /// Nothing active; no-op
    NoActiveMinigame,
    /// Already resolved; waiting on `clear_resolved`
    AlreadyResolved,
    /// Choice id not in the active definition
    UnknownChoice,
    Resolved(RealizedOutcome),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinigameRouter {
    active: Option<ActiveMinigame>,
    /// id -> last tick of its cooldown window; triggers match only
    /// strictly after this tick
    cooldowns: AHashMap<MinigameId, Tick>,
    cooldown_window: Tick,
}

impl MinigameRouter {
    pub fn new(cooldown_window: Tick) -> Self {
        Self {
            active: None,
            cooldowns: AHashMap::new(),
            cooldown_window,
        }
    }

    pub fn active(&self) -> Option<&ActiveMinigame> {
        self.active.as_ref()
    }

    pub fn cooldowns(&self) -> &AHashMap<MinigameId, Tick> {
        &self.cooldowns
    }

    fn on_cooldown(&self, id: MinigameId, now: Tick) -> bool {
        self.cooldowns
            .get(&id)
            .map(|&until| now <= until)
            .unwrap_or(false)
    }

    /// Find a definition matching the query. Refuses while a minigame is
    /// active and skips ids still on cooldown.
    pub fn check_trigger<'a>(
        &self,
        catalog: &'a MinigameCatalog,
        query: TriggerQuery,
        now: Tick,
    ) -> Option<&'a MinigameDef> {
        if self.active.is_some() {
            return None;
        }
        catalog.iter().find(|def| {
            if self.on_cooldown(def.id, now) {
                return false;
            }
            match (&def.trigger, &query) {
                (TriggerKind::BuildingTap(kind), TriggerQuery::BuildingTap(tapped)) => {
                    kind == tapped
                }
                (TriggerKind::Event(tag), TriggerQuery::Event(seen)) => tag == seen,
                (
                    TriggerKind::Periodic {
                        min_population,
                        tick_modulus,
                    },
                    TriggerQuery::Periodic { tick, population },
                ) => {
                    *tick > 0 && tick % tick_modulus == 0 && population >= min_population
                }
                _ => false,
            }
        })
    }

    /// Activate a definition. Caller must have matched it through
    /// `check_trigger`; an already-active router ignores the call.
    pub fn start(&mut self, id: MinigameId, now: Tick) {
        if self.active.is_some() {
            return;
        }
        tracing::debug!(?id, now, "minigame presented");
        self.active = Some(ActiveMinigame {
            id,
            started_tick: now,
            resolved: false,
            chosen: None,
            outcome: None,
        });
    }

    /// Resolve the active minigame through a player choice: one success
    /// draw, then outcome realization.
    pub fn resolve_choice(
        &mut self,
        choice_id: ChoiceId,
        catalog: &MinigameCatalog,
        rng: &mut SimRng,
        now: Tick,
    ) -> ResolveResult {
        let Some(active) = self.active.as_mut() else {
            return ResolveResult::NoActiveMinigame;
        };
        if active.resolved {
            return ResolveResult::AlreadyResolved;
        }
        let Some(def) = catalog.get(active.id) else {
            return ResolveResult::NoActiveMinigame;
        };
        let Some(choice) = def.choices.iter().find(|c| c.id == choice_id) else {
            return ResolveResult::UnknownChoice;
        };

        let succeeded = rng.chance(choice.success_probability);
        let spec = if succeeded { &choice.success } else { &choice.failure };
        let outcome = spec.realize(rng);
        tracing::debug!(id = ?active.id, ?choice_id, succeeded, "minigame resolved by choice");

        active.resolved = true;
        active.chosen = Some(choice_id);
        active.outcome = Some(outcome.clone());
        self.cooldowns.insert(def.id, now + self.cooldown_window);
        ResolveResult::Resolved(outcome)
    }

    /// Resolve the active minigame without a choice. No success draw is
    /// made; the definition's auto-resolve outcome applies (tiered
    /// outcomes still draw their tier and amounts).
    pub fn auto_resolve(
        &mut self,
        catalog: &MinigameCatalog,
        rng: &mut SimRng,
        now: Tick,
    ) -> ResolveResult {
        let Some(active) = self.active.as_mut() else {
            return ResolveResult::NoActiveMinigame;
        };
        if active.resolved {
            return ResolveResult::AlreadyResolved;
        }
        let Some(def) = catalog.get(active.id) else {
            return ResolveResult::NoActiveMinigame;
        };

        let outcome = def.auto_resolve.realize(rng);
        tracing::debug!(id = ?active.id, "minigame auto-resolved");
        active.resolved = true;
        active.outcome = Some(outcome.clone());
        self.cooldowns.insert(def.id, now + self.cooldown_window);
        ResolveResult::Resolved(outcome)
    }

    /// Per-tick check: an unanswered minigame past its tick limit
    /// auto-resolves.
    pub fn tick(
        &mut self,
        now: Tick,
        catalog: &MinigameCatalog,
        rng: &mut SimRng,
    ) -> Option<RealizedOutcome> {
        let expired = match self.active.as_ref() {
            Some(active) if !active.resolved => match catalog.get(active.id).and_then(|d| d.tick_limit) {
                Some(limit) => now.saturating_sub(active.started_tick) >= limit,
                None => false,
            },
            _ => false,
        };
        if !expired {
            return None;
        }
        match self.auto_resolve(catalog, rng, now) {
            ResolveResult::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Clear a resolved minigame so triggers can match again. Returns
    /// false if nothing resolved was waiting.
    pub fn clear_resolved(&mut self) -> bool {
        match self.active.as_ref() {
            Some(active) if active.resolved => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Save-file restore
    pub fn restore(active: Option<ActiveMinigame>, cooldowns: AHashMap<MinigameId, Tick>, cooldown_window: Tick) -> Self {
        Self {
            active,
            cooldowns,
            cooldown_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (MinigameCatalog, MinigameRouter, SimRng) {
        (
            MinigameCatalog::with_defaults(),
            MinigameRouter::new(100),
            SimRng::seed_from_u64(5),
        )
    }

    #[test]
    fn test_building_tap_matches_exactly() {
        let (catalog, router, _) = setup();
        let def = router
            .check_trigger(&catalog, TriggerQuery::BuildingTap(BuildingKind::Mine), 10)
            .expect("mine tap should match the expedition");
        assert_eq!(def.id, MinigameId::MiningExpedition);

        assert!(router
            .check_trigger(&catalog, TriggerQuery::BuildingTap(BuildingKind::Kolkhoz), 10)
            .is_none());
    }

    #[test]
    fn test_periodic_trigger_requires_population_and_modulus() {
        let (catalog, router, _) = setup();
        let query = TriggerQuery::Periodic {
            tick: 360,
            population: 20,
        };
        assert!(router.check_trigger(&catalog, query, 360).is_some());

        let off_modulus = TriggerQuery::Periodic {
            tick: 361,
            population: 20,
        };
        assert!(router.check_trigger(&catalog, off_modulus, 361).is_none());

        let too_small = TriggerQuery::Periodic {
            tick: 360,
            population: 5,
        };
        assert!(router.check_trigger(&catalog, too_small, 360).is_none());
    }

    #[test]
    fn test_active_minigame_blocks_triggers() {
        let (catalog, mut router, _) = setup();
        router.start(MinigameId::MiningExpedition, 10);
        assert!(router
            .check_trigger(&catalog, TriggerQuery::Event(EventTag::Famine), 10)
            .is_none());
    }

    #[test]
    fn test_resolve_without_active_is_sentinel() {
        let (catalog, mut router, mut rng) = setup();
        assert_eq!(
            router.resolve_choice(ChoiceId(1), &catalog, &mut rng, 10),
            ResolveResult::NoActiveMinigame
        );
        assert_eq!(
            router.auto_resolve(&catalog, &mut rng, 10),
            ResolveResult::NoActiveMinigame
        );
    }

    #[test]
    fn test_unknown_choice_is_sentinel() {
        let (catalog, mut router, mut rng) = setup();
        router.start(MinigameId::MiningExpedition, 10);
        assert_eq!(
            router.resolve_choice(ChoiceId(9), &catalog, &mut rng, 10),
            ResolveResult::UnknownChoice
        );
        assert!(!router.active().unwrap().resolved);
    }

    #[test]
    fn test_double_resolve_is_sentinel() {
        let (catalog, mut router, mut rng) = setup();
        router.start(MinigameId::MiningExpedition, 10);
        let first = router.resolve_choice(ChoiceId(1), &catalog, &mut rng, 10);
        assert!(matches!(first, ResolveResult::Resolved(_)));
        assert_eq!(
            router.resolve_choice(ChoiceId(1), &catalog, &mut rng, 11),
            ResolveResult::AlreadyResolved
        );
    }

    #[test]
    fn test_cooldown_blocks_until_strictly_after() {
        let (catalog, mut router, mut rng) = setup();
        router.start(MinigameId::MiningExpedition, 10);
        router.resolve_choice(ChoiceId(1), &catalog, &mut rng, 10);
        assert!(router.clear_resolved());

        let query = TriggerQuery::BuildingTap(BuildingKind::Mine);
        // Cooldown ends at tick 110; 110 itself is still blocked
        assert!(router.check_trigger(&catalog, query, 110).is_none());
        assert!(router.check_trigger(&catalog, query, 111).is_some());
    }

    #[test]
    fn test_cooldowns_are_per_id() {
        let (catalog, mut router, mut rng) = setup();
        router.start(MinigameId::MiningExpedition, 10);
        router.resolve_choice(ChoiceId(1), &catalog, &mut rng, 10);
        router.clear_resolved();

        // A different definition is unaffected by the expedition cooldown
        assert!(router
            .check_trigger(&catalog, TriggerQuery::Event(EventTag::Famine), 20)
            .is_some());
    }

    #[test]
    fn test_tick_limit_auto_resolves() {
        let (catalog, mut router, mut rng) = setup();
        router.start(MinigameId::DrunkForeman, 100);
        // Limit is 12 ticks
        assert!(router.tick(111, &catalog, &mut rng).is_none());
        let outcome = router.tick(112, &catalog, &mut rng);
        assert!(outcome.is_some(), "limit elapsed must auto-resolve");
        assert!(router.active().unwrap().resolved);
    }

    #[test]
    fn test_clear_requires_resolved() {
        let (catalog, mut router, mut rng) = setup();
        assert!(!router.clear_resolved());
        router.start(MinigameId::MiningExpedition, 10);
        assert!(!router.clear_resolved(), "unresolved must not clear");
        router.auto_resolve(&catalog, &mut rng, 20);
        assert!(router.clear_resolved());
        assert!(router.active().is_none());
    }
}
