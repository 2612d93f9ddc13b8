//! Fingerprint-keyed review cache.
//!
//! Caches parsed reviews to skip redundant LLM calls when the same
//! code+language+focus combination is reviewed again within the TTL.

pub mod store;

use std::path::PathBuf;

use indexmap::IndexSet;
use sha2::{Digest, Sha256};

use crate::models::ParsedReview;

/// Compute a deterministic fingerprint for a review request.
///
/// Focus areas are sorted before joining so their order never affects the
/// key; code content is hashed verbatim. Stable across process restarts.
pub fn fingerprint(code: &str, language: &str, focus_areas: &IndexSet<String>) -> String {
    let mut sorted: Vec<&str> = focus_areas.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let payload = format!("{language}::{}::{code}", sorted.join(","));

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// The cache engine for review results.
pub struct CacheEngine {
    enabled: bool,
    ttl_secs: u64,
    store: store::FileStore,
}

impl CacheEngine {
    /// Create a new cache engine using the default cache directory.
    pub fn new(enabled: bool, ttl_secs: u64) -> Self {
        Self {
            enabled,
            ttl_secs,
            store: store::FileStore::new(),
        }
    }

    /// Create a cache engine with a specific cache directory (useful for testing).
    pub fn new_with_dir(enabled: bool, ttl_secs: u64, cache_dir: PathBuf) -> Self {
        Self {
            enabled,
            ttl_secs,
            store: store::FileStore::new_with_dir(cache_dir),
        }
    }

    /// Look up a cached review.
    pub fn get(&self, key: &str) -> Option<ParsedReview> {
        if !self.enabled {
            return None;
        }
        self.store.get(key)
    }

    /// Store a review in the cache.
    pub fn put(&self, key: &str, review: &ParsedReview) {
        if !self.enabled {
            return;
        }
        self.store.put(key, review, self.ttl_secs);
    }

    /// Remove all cached entries.
    pub fn clear(&self) -> Result<store::CacheStats, std::io::Error> {
        self.store.clear()
    }

    /// Compute statistics about the cache.
    pub fn stats(&self) -> Result<store::CacheStats, std::io::Error> {
        self.store.stats()
    }

    /// Return the cache directory path.
    pub fn path(&self) -> Option<&PathBuf> {
        self.store.path()
    }
}
