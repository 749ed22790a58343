use dashmap::DashMap;
use std::sync::Arc;

use crate::portfolio::holdings::ReconciliationResult;

#[derive(Debug, Default)]
struct CacheSlot {
    generation: u64,
    result: Option<Arc<ReconciliationResult>>,
}

/// Per-user reconciliation results.
///
/// Every invalidation bumps the user's generation. A result computed from a
/// ledger read taken under an older generation is never stored, so an append
/// that lands during a reconciliation cannot be hidden by it.
///
/// Slots are never removed, since dropping one would reset its generation.
/// Memory therefore grows with the number of distinct users seen, one small
/// slot each once their result is dropped.
#[derive(Debug, Default)]
pub struct HoldingsCache {
    slots: DashMap<String, CacheSlot>,
}

impl HoldingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<Arc<ReconciliationResult>> {
        self.slots.get(user_id).and_then(|slot| slot.result.clone())
    }

    /// Generation to pass to `insert_if_current`. Read it before reading the ledger.
    pub fn generation(&self, user_id: &str) -> u64 {
        self.slots.entry(user_id.to_string()).or_default().generation
    }

    /// Stores `result` unless the user was invalidated since `generation` was read.
    pub fn insert_if_current(
        &self,
        user_id: &str,
        generation: u64,
        result: Arc<ReconciliationResult>,
    ) -> bool {
        let mut slot = self.slots.entry(user_id.to_string()).or_default();
        if slot.generation != generation {
            return false;
        }
        slot.result = Some(result);
        true
    }

    /// Drops exactly this user's cached result. The slot and its generation stay.
    pub fn invalidate(&self, user_id: &str) {
        if let Some(mut slot) = self.slots.get_mut(user_id) {
            slot.generation += 1;
            slot.result = None;
        }
    }

    /// Drops every cached result, keeping one slot per user.
    pub fn clear(&self) {
        self.slots.iter_mut().for_each(|mut slot| {
            slot.generation += 1;
            slot.result = None;
        });
    }

    /// Number of users with a cached result.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.result.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
