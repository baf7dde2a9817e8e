use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Debug, Default)]
struct Counters {
    active_views: AtomicU64,
    source_reads: AtomicU64,
    cached_bytes: AtomicU64,
}

/// Runtime metrics for a `Factory`.
///
/// A lightweight, read-only view exposing how many views are registered, how
/// often the source was consulted and how many bytes have been cached. Obtain a
/// `Stats` handle via `Factory::stats()`. Values use relaxed atomics and are
/// intended for diagnostics.
#[cfg_attr(docsrs, doc(cfg(feature = "stats")))]
#[derive(Debug, Clone, Default)]
pub struct Stats {
    counters: Arc<Counters>,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn view_registered(&self) {
        self.counters.active_views.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn view_removed(&self) {
        self.counters.active_views.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn source_read(&self, cached: usize) {
        self.counters.source_reads.fetch_add(1, Ordering::Relaxed);
        self.counters
            .cached_bytes
            .fetch_add(cached as u64, Ordering::Relaxed);
    }

    /// Returns the number of views currently registered with the factory.
    pub fn active_views(&self) -> u64 {
        self.counters.active_views.load(Ordering::Relaxed)
    }

    /// Returns how many times the wrapped source's `read` was invoked.
    pub fn source_reads(&self) -> u64 {
        self.counters.source_reads.load(Ordering::Relaxed)
    }

    /// Returns the total number of bytes appended to the shared cache.
    pub fn cached_bytes(&self) -> u64 {
        self.counters.cached_bytes.load(Ordering::Relaxed)
    }
}
