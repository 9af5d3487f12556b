//! In-process TTL cache backed by DashMap.
//!
//! Payloads are stored as opaque JSON values. An entry is valid while
//! `now - inserted_at < ttl`; expired entries stay in the map until the same
//! key is written again or the entry is invalidated. There is no size bound.

use crate::key::CacheKey;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use insights_core::{Clock, InsightsResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

struct CacheEntry {
    payload: serde_json::Value,
    inserted_at: DateTime<Utc>,
    ttl_ms: i64,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        (now - self.inserted_at).num_milliseconds() < self.ttl_ms
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryStats {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub ttl: i64,
    /// Length of the serialized payload in bytes.
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub entries: Vec<CacheEntryStats>,
}

/// Key/TTL cache with an injected clock.
pub struct TtlCache {
    store: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: DashMap::new(),
            clock,
        }
    }

    /// Get a payload, returns None if expired or missing.
    pub fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let now = self.clock.now();
        match self.store.get(key.as_str()) {
            Some(entry) if entry.is_fresh(now) => {
                metrics::counter!("cache.hit").increment(1);
                debug!(key = %key, "Cache hit");
                Some(entry.payload.clone())
            }
            Some(_) => {
                metrics::counter!("cache.expired").increment(1);
                debug!(key = %key, "Cache entry expired");
                None
            }
            None => {
                metrics::counter!("cache.miss").increment(1);
                None
            }
        }
    }

    /// Typed variant of [`TtlCache::get`].
    pub fn get_as<T: DeserializeOwned>(&self, key: &CacheKey) -> InsightsResult<Option<T>> {
        match self.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a payload, stamped with the current time.
    pub fn set(&self, key: &CacheKey, payload: serde_json::Value, ttl_minutes: u64) {
        let ttl_ms = i64::try_from(ttl_minutes.saturating_mul(60_000)).unwrap_or(i64::MAX);
        self.store.insert(
            key.as_str().to_string(),
            CacheEntry {
                payload,
                inserted_at: self.clock.now(),
                ttl_ms,
            },
        );
    }

    pub fn set_value<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl_minutes: u64,
    ) -> InsightsResult<()> {
        self.set(key, serde_json::to_value(value)?, ttl_minutes);
        Ok(())
    }

    /// Remove every key containing `pattern`, or everything when `pattern` is
    /// None. Returns how many entries were removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let before = self.store.len();
        match pattern {
            Some(p) => self.store.retain(|key, _| !key.contains(p)),
            None => self.store.clear(),
        }
        let removed = before - self.store.len();
        metrics::counter!("cache.invalidated").increment(removed as u64);
        debug!(pattern = ?pattern, removed = removed, "Cache invalidated");
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let mut entries: Vec<CacheEntryStats> = self
            .store
            .iter()
            .map(|e| CacheEntryStats {
                key: e.key().clone(),
                timestamp: e.value().inserted_at,
                ttl: e.value().ttl_ms,
                size: e.value().payload.to_string().len(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        CacheStats {
            total_entries: entries.len(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
