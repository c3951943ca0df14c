//! Response Cache
//!
//! Bounded TTL cache of successful dependency responses, keyed by
//! (subject, service, tool). Passed to the engines as an optional capability.
//!
//! # Single Writer Per Key
//! Each key owns a slot holding a `tokio::sync::OnceCell`. The first request
//! for a key runs the fetch; concurrent requests for the same key wait on the
//! cell instead of issuing their own call. A failed or cancelled fetch leaves
//! the cell empty, so the next waiter performs its own fetch. Only successful
//! transport responses are stored.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::debug;

use super::transport::TransportError;

/// Cache key: subject (identifier or protein set) + service + tool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub subject: String,
    pub service: String,
    pub tool: String,
}

impl CacheKey {
    /// Subjects are compared case-insensitively
    pub fn new(subject: &str, service: &str, tool: &str) -> Self {
        Self {
            subject: subject.trim().to_uppercase(),
            service: service.to_string(),
            tool: tool.to_string(),
        }
    }
}

struct CachedResponse {
    value: Value,
    stored_at: Instant,
}

#[derive(Default)]
struct Slot {
    cell: OnceCell<CachedResponse>,
}

impl Slot {
    fn expired(&self, ttl: Duration) -> bool {
        self.cell
            .get()
            .is_some_and(|cached| cached.stored_at.elapsed() >= ttl)
    }
}

/// Cache counters for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Single-writer-per-key response cache
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    slots: Mutex<HashMap<CacheKey, Arc<Slot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached response for `key`, or run `fetch` to populate it.
    ///
    /// At most one `fetch` per key is in flight at any time.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<Value, TransportError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, TransportError>>,
    {
        let Some(slot) = self.slot_for(&key).await else {
            // Every slot is held by an in-flight fetch
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(service = %key.service, subject = %key.subject, "Response cache full, fetching uncached");
            return fetch().await;
        };

        let mut fetched = false;
        let result = slot
            .cell
            .get_or_try_init(|| {
                fetched = true;
                async move {
                    let value = fetch().await?;
                    Ok::<_, TransportError>(CachedResponse {
                        value,
                        stored_at: Instant::now(),
                    })
                }
            })
            .await;

        if fetched {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }

        match result {
            Ok(cached) => {
                debug!(
                    service = %key.service,
                    tool = %key.tool,
                    subject = %key.subject,
                    hit = !fetched,
                    "Response cache lookup"
                );
                Ok(cached.value.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the cached response for a key
    pub async fn invalidate(&self, key: &CacheKey) {
        self.slots.lock().await.remove(key);
    }

    /// Drop every cached response
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self
            .slots
            .lock()
            .await
            .values()
            .filter(|slot| slot.cell.initialized())
            .count();
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Slot for a key, replacing an expired one and evicting when full.
    ///
    /// `None` when the cache is full of in-flight fetches; the caller then
    /// fetches without caching so the map never grows past `capacity`.
    async fn slot_for(&self, key: &CacheKey) -> Option<Arc<Slot>> {
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get(key) {
            if !slot.expired(self.ttl) {
                return Some(Arc::clone(slot));
            }
            debug!(service = %key.service, subject = %key.subject, "Cached response expired");
            slots.remove(key);
        }

        if slots.len() >= self.capacity {
            self.evict(&mut slots);
            if slots.len() >= self.capacity {
                return None;
            }
        }

        let slot = Arc::new(Slot::default());
        slots.insert(key.clone(), Arc::clone(&slot));
        Some(slot)
    }

    /// Remove expired and idle slots; if still full, the oldest stored entry.
    /// Slots with a fetch in flight are never evicted.
    fn evict(&self, slots: &mut HashMap<CacheKey, Arc<Slot>>) {
        let ttl = self.ttl;
        // Empty slots nobody else holds belong to failed fetches
        slots.retain(|_, slot| {
            !slot.expired(ttl) && (slot.cell.initialized() || Arc::strong_count(slot) > 1)
        });

        if slots.len() < self.capacity {
            return;
        }

        let oldest = slots
            .iter()
            .filter_map(|(key, slot)| slot.cell.get().map(|cached| (key, cached.stored_at)))
            .min_by_key(|(_, stored_at)| *stored_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            slots.remove(&key);
        }
    }
}
