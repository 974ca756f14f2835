// ── Response cache ──
//
// Canonical query key -> previously fetched page. Unbounded, no expiry;
// every mutation wipes it whole.

use std::sync::Arc;

use dashmap::DashMap;

use crate::model::Product;

/// One cached list response.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub products: Vec<Product>,
    pub total: u64,
}

/// Concurrent map from canonical query key to [`CachedPage`].
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, Arc<CachedPage>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<CachedPage>> {
        self.entries.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Store `page` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, page: CachedPage) {
        self.entries.insert(key.into(), Arc::new(page));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
