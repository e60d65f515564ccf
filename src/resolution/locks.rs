//! # Per-Name Locks
//!
//! Serializes resolve-then-mutate sequences that target the same name
//! inside this process. Two requests for one name can no longer interleave
//! their resolve and mutate steps here, but writers in other processes still
//! can: the store offers no condition tied to a query result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held for the duration of one resolve-then-mutate sequence
#[derive(Debug)]
pub struct NameGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Lock table keyed by normalized name
///
/// Entries are weak; a slot disappears once no task holds or awaits it.
#[derive(Debug, Default)]
pub struct NameLocks {
    slots: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock key for a name: trimmed and lowercased
    pub fn normalize(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Wait for exclusive access to `name`
    pub async fn acquire(&self, name: &str) -> NameGuard {
        let slot = self.slot(Self::normalize(name));
        NameGuard {
            _guard: slot.lock_owned().await,
        }
    }

    /// Number of names currently locked or awaited
    pub fn active(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|w| w.strong_count() > 0).count()
    }

    fn slot(&self, key: String) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, w| w.strong_count() > 0);

        if let Some(slot) = slots.get(&key).and_then(Weak::upgrade) {
            return slot;
        }

        let slot = Arc::new(AsyncMutex::new(()));
        slots.insert(key, Arc::downgrade(&slot));
        slot
    }
}
