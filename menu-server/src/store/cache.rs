//! Timestamped in-memory cache
//!
//! Each [`RecordStore`](super::RecordStore) owns its caches; nothing here is
//! process-global, so several stores (tests) never see each other's data.

use parking_lot::RwLock;
use std::time::{Duration, Instant};

/// A value plus the instant it was loaded
///
/// `fetched_at == None` marks the value as invalidated: it is no longer served
/// as fresh but is still kept as the last known good copy.
#[derive(Debug, Clone)]
pub struct CachedValue<T> {
    pub value: T,
    pub fetched_at: Option<Instant>,
}

impl<T> CachedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Some(Instant::now()),
        }
    }

    /// Whether the value was loaded less than `ttl` ago
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }
}

/// TTL cache holding at most one value
#[derive(Debug)]
pub struct TtlCache<T> {
    slot: RwLock<Option<CachedValue<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value if it is still within its TTL
    pub fn fresh(&self) -> Option<T> {
        self.slot
            .read()
            .as_ref()
            .filter(|cached| cached.is_fresh(self.ttl))
            .map(|cached| cached.value.clone())
    }

    /// The last stored value, fresh or not
    pub fn last_good(&self) -> Option<T> {
        self.slot.read().as_ref().map(|cached| cached.value.clone())
    }

    pub fn store(&self, value: T) {
        *self.slot.write() = Some(CachedValue::new(value));
    }

    /// Stop serving the value as fresh; it remains available via [`last_good`](Self::last_good)
    pub fn invalidate(&self) {
        if let Some(cached) = self.slot.write().as_mut() {
            cached.fetched_at = None;
        }
    }
}
