//! Socket factory cache keyed by TLS context identity
//!
//! Deriving a `TlsConnector` is cheap compared to building a context, but many
//! requests share one context, so connectors are reused per context. Entries
//! keep their context alive, which keeps the pointer key unique while cached.
//! Two threads racing on a new context may both build a connector; the first
//! insert wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustls::ClientConfig;
use tokio_rustls::TlsConnector;
use tracing::debug;

const DEFAULT_MAX_ENTRIES: usize = 64;

struct CacheEntry {
    _context: Arc<ClientConfig>,
    factory: Arc<TlsConnector>,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocketFactoryCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct SocketFactoryCache {
    entries: DashMap<usize, CacheEntry>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for SocketFactoryCache {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl std::fmt::Debug for SocketFactoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketFactoryCache")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

impl SocketFactoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Socket factory for `context`, built on first use
    pub fn socket_factory(&self, context: &Arc<ClientConfig>) -> Arc<TlsConnector> {
        let key = Arc::as_ptr(context) as usize;

        if let Some(factory) = self.entries.get(&key).map(|e| Arc::clone(&e.factory)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Socket factory cache hit for context {:#x}", key);
            return factory;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        if self.entries.len() >= self.max_entries {
            self.evict_entries();
        }

        let factory = Arc::new(TlsConnector::from(Arc::clone(context)));
        let entry = self.entries.entry(key).or_insert_with(|| CacheEntry {
            _context: Arc::clone(context),
            factory,
        });
        debug!("Cached socket factory for context {:#x}", key);
        Arc::clone(&entry.factory)
    }

    /// Evict old entries when the cache is full
    fn evict_entries(&self) {
        let to_remove: Vec<usize> = self
            .entries
            .iter()
            .take((self.max_entries / 10).max(1))
            .map(|entry| *entry.key())
            .collect();

        for key in to_remove {
            self.entries.remove(&key);
        }

        debug!(
            "Evicted socket factories, cache size: {}",
            self.entries.len()
        );
    }

    pub fn stats(&self) -> SocketFactoryCacheStats {
        SocketFactoryCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
