//! In-memory cache for fetched note bodies
//!
//! Entries are normalized (case-folded) full note texts keyed by note id.
//! Once populated, an entry lives for the rest of the process; staleness
//! against the backing store is an accepted tradeoff.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Shared content cache
///
/// Cloning is cheap and shares the underlying store, so concurrent lookup
/// tasks all observe the same entries. Writes are idempotent: the same key
/// always receives the same normalized value, so a duplicate fetch after a
/// concurrent miss leaves the cache consistent.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl ContentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached content for a note id
    pub fn get(&self, id: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(id).cloned())
    }

    /// Check whether a note id is cached
    pub fn contains(&self, id: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(id))
            .unwrap_or(false)
    }

    /// Store normalized content for a note id
    pub fn store(&self, id: &str, content: String) {
        if let Ok(mut entries) = self.entries.write() {
            debug!("Caching content for note {} ({} bytes)", id, content.len());
            entries.insert(id.to_string(), content);
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
