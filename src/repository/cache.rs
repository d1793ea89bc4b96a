//! Process-local result cache keyed by session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::entry::DirectoryEntry;
use crate::domain::types::SessionKey;
use crate::repository::ResultCache;

struct CachedResults {
    entries: Arc<[DirectoryEntry]>,
    touched: Instant,
}

/// Sliding-expiry cache; an entry lives for `ttl` after it was last read or
/// written.
pub struct InMemoryResultCache {
    ttl: Duration,
    slots: Mutex<HashMap<SessionKey, CachedResults>>,
}

impl InMemoryResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live sessions currently holding results.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots()
            .values()
            .filter(|slot| !self.is_expired(slot, now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<SessionKey, CachedResults>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, slot: &CachedResults, now: Instant) -> bool {
        now.duration_since(slot.touched) >= self.ttl
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, session: &SessionKey) -> Option<Arc<[DirectoryEntry]>> {
        let now = Instant::now();
        let mut slots = self.slots();

        let expired = match slots.get_mut(session) {
            Some(slot) if !self.is_expired(slot, now) => {
                slot.touched = now;
                return Some(slot.entries.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            slots.remove(session);
            log::debug!("Dropped expired results for session {session}");
        }
        None
    }

    fn put(&self, session: SessionKey, entries: Arc<[DirectoryEntry]>) {
        let now = Instant::now();
        let mut slots = self.slots();

        let before = slots.len();
        slots.retain(|_, slot| !self.is_expired(slot, now));
        let purged = before - slots.len();
        if purged > 0 {
            log::debug!("Purged {purged} expired result sets");
        }

        slots.insert(
            session,
            CachedResults {
                entries,
                touched: now,
            },
        );
    }
}
