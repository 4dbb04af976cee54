//! Time-bounded in-memory cache of JSON responses keyed by URL.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;

#[derive(Debug)]
struct CacheEntry {
    body: Value,
    stored_at: Instant,
}

/// JSON bodies keyed by exact request URL, expiring after a fixed TTL.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create an empty cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached body for `url` if it has not expired.
    ///
    /// Expired entries are dropped on access.
    pub fn get(&self, url: &str) -> Option<Value> {
        let mut entries = self.lock();
        let entry = entries.get(url)?;
        if entry.stored_at.elapsed() < self.ttl {
            return Some(entry.body.clone());
        }
        entries.remove(url);
        None
    }

    /// Store `body` for `url`, replacing any previous entry.
    ///
    /// Expired entries for other URLs are swept first.
    pub fn insert(&self, url: &str, body: Value) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            url.to_owned(),
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Evict the entry for `url`. Returns whether one was present.
    pub fn remove(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned map is still structurally valid; keep serving it.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
