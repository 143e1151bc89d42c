//! TTL-bounded cache for raw feed responses.
//!
//! Absorbs repeated near-term fetches of the same endpoint. Keyed by request
//! identity; entries expire after a fixed TTL and may be evicted earlier
//! when the entry bound is hit, so callers must treat a miss as always safe,
//! never as a correctness signal.

use std::future::Future;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use campusfeed_core::CampusResult;

struct CacheEntry {
    bytes: Vec<u8>,
    stored_at: Instant,
}

/// Concurrent response cache with per-entry TTL and a fixed entry bound.
pub struct FetchCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl FetchCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        FetchCache {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Cached bytes for `key`, or the result of `fetch`.
    ///
    /// A hit within the TTL never invokes `fetch`. On a miss the fetched
    /// bytes are cached only on success; errors propagate uncached. Two
    /// concurrent misses on the same key may both fetch; the last writer
    /// wins, which is harmless for immutable feed responses.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> CampusResult<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CampusResult<Vec<u8>>>,
    {
        if let Some(bytes) = self.get(key) {
            debug!(key, "cache hit");
            return Ok(bytes);
        }
        let bytes = fetch().await?;
        self.insert(key, bytes.clone());
        Ok(bytes)
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            // guard must be released before removing the key
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some(entry.bytes.clone())
    }

    fn insert(&self, key: &str, bytes: Vec<u8>) {
        if self.entries.len() >= self.max_entries {
            self.entries
                .retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        }
        while self.entries.len() >= self.max_entries {
            let Some(victim) = self.entries.iter().next().map(|e| e.key().clone()) else {
                break;
            };
            self.entries.remove(&victim);
        }
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                bytes,
                stored_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
