//! Compulsory deliveries - the state's share of production
//!
//! Each era sets an extraction doctrine: a percent of the resources
//! newly produced in a tick is taken before they reach the free
//! stockpile. Extracted amounts credit the active plan quota when the
//! resource matches.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Era;
use crate::economy::resources::{ResourceKind, ResourceStore};

/// Doctrine extraction percent for a resource under an era
pub fn extraction_percent(era: Era, kind: ResourceKind) -> i64 {
    match kind {
        ResourceKind::Food => match era {
            Era::Revolution => 40, // prodrazverstka
            Era::FirstPlans => 30,
            Era::War => 60,
            Era::Reconstruction => 35,
            Era::Thaw => 20,
            Era::Stagnation => 15,
        },
        ResourceKind::Steel | ResourceKind::Timber => match era {
            Era::Revolution => 20,
            Era::FirstPlans => 35,
            Era::War => 50,
            Era::Reconstruction => 40,
            Era::Thaw => 25,
            Era::Stagnation => 20,
        },
        // Money, vodka and power are not subject to deliveries
        _ => 0,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Procurement {
    pub lifetime_extracted: AHashMap<ResourceKind, i64>,
}

impl Procurement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the doctrine share of this tick's production delta from
    /// the store. Returns what was taken.
    pub fn extract(
        &mut self,
        produced: &[(ResourceKind, i64)],
        era: Era,
        store: &mut ResourceStore,
    ) -> Vec<(ResourceKind, i64)> {
        let mut extracted = Vec::new();
        for (kind, amount) in produced {
            let percent = extraction_percent(era, *kind);
            let take = amount * percent / 100;
            if take <= 0 {
                continue;
            }
            store.add(*kind, -take);
            *self.lifetime_extracted.entry(*kind).or_insert(0) += take;
            extracted.push((*kind, take));
        }
        extracted
    }
}
