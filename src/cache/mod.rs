//! Session-scoped explanation cache
//!
//! Entries live for the lifetime of the process and are never evicted.

use std::collections::HashMap;

/// Prefix shared by all explanation cache keys
pub const CACHE_KEY_PREFIX: &str = "explanation";

/// Cache key for the explanation of the section at `index`
pub fn cache_key(index: usize) -> String {
    format!("{}-{}", CACHE_KEY_PREFIX, index)
}

/// Key-value storage for finished explanations
pub trait SessionCache {
    /// Look up a stored value
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value; a second write to the same key replaces the first
    fn set(&mut self, key: &str, value: String);
}

/// In-memory cache backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        if self.entries.insert(key.to_string(), value).is_some() {
            tracing::debug!("Overwrote cache entry {}", key);
        }
    }
}
