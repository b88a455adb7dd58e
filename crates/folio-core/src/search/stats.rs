//! Search statistics
//!
//! Lock-free counters updated by the orchestrator on every request.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters for search activity
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Requests answered by the full hybrid pipeline
    hybrid_searches: AtomicU64,
    /// Requests answered by the browse listing (empty query or no embeddings)
    browse_listings: AtomicU64,
    /// Requests where at least one retrieval stage failed and the pipeline degraded
    degraded_searches: AtomicU64,
    /// Rerank stages that errored and were skipped
    rerank_failures: AtomicU64,
    /// Sum of total request latency in milliseconds
    total_latency_ms: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchStatsSnapshot {
    pub hybrid_searches: u64,
    pub browse_listings: u64,
    pub degraded_searches: u64,
    pub rerank_failures: u64,
    pub total_searches: u64,
    pub avg_latency_ms: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hybrid(&self, latency_ms: u64) {
        self.hybrid_searches.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    pub fn record_browse(&self, latency_ms: u64) {
        self.browse_listings.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    pub fn record_degraded(&self) {
        self.degraded_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rerank_failure(&self) {
        self.rerank_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SearchStatsSnapshot {
        let hybrid = self.hybrid_searches.load(Ordering::Relaxed);
        let browse = self.browse_listings.load(Ordering::Relaxed);
        let total = hybrid + browse;
        let latency = self.total_latency_ms.load(Ordering::Relaxed);
        SearchStatsSnapshot {
            hybrid_searches: hybrid,
            browse_listings: browse,
            degraded_searches: self.degraded_searches.load(Ordering::Relaxed),
            rerank_failures: self.rerank_failures.load(Ordering::Relaxed),
            total_searches: total,
            avg_latency_ms: if total > 0 { latency / total } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_averages_latency() {
        let stats = SearchStats::new();
        stats.record_hybrid(10);
        stats.record_hybrid(30);
        stats.record_browse(20);
        let snap = stats.snapshot();
        assert_eq!(snap.total_searches, 3);
        assert_eq!(snap.avg_latency_ms, 20);
    }

    #[test]
    fn test_empty_stats_have_zero_average() {
        let snap = SearchStats::new().snapshot();
        assert_eq!(snap.total_searches, 0);
        assert_eq!(snap.avg_latency_ms, 0);
    }

    #[test]
    fn test_degradation_counters_independent() {
        let stats = SearchStats::new();
        stats.record_hybrid(5);
        stats.record_degraded();
        stats.record_rerank_failure();
        let snap = stats.snapshot();
        assert_eq!(snap.hybrid_searches, 1);
        assert_eq!(snap.degraded_searches, 1);
        assert_eq!(snap.rerank_failures, 1);
    }
}
