use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Running counters for the reconciliation engine. Shared between all of its tasks.
#[derive(Debug, Default)]
pub struct SyncStats {
    discovery_cycles: AtomicU64,
    failed_cycles: AtomicU64,
    orders_enqueued: AtomicU64,
    results_persisted: AtomicU64,
    rate_limited: AtomicU64,
    no_content: AtomicU64,
    query_failures: AtomicU64,
    persist_failures: AtomicU64,
    pauses_issued: AtomicU64,
}

/// A point-in-time copy of [`SyncStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatsSnapshot {
    pub discovery_cycles: u64,
    pub failed_cycles: u64,
    pub orders_enqueued: u64,
    pub results_persisted: u64,
    pub rate_limited: u64,
    pub no_content: u64,
    pub query_failures: u64,
    pub persist_failures: u64,
    pub pauses_issued: u64,
}

fn incr(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl SyncStats {
    pub(crate) fn record_cycle(&self) {
        incr(&self.discovery_cycles);
    }

    pub(crate) fn record_failed_cycle(&self) {
        incr(&self.failed_cycles);
    }

    pub(crate) fn record_enqueued(&self) {
        incr(&self.orders_enqueued);
    }

    pub(crate) fn record_persisted(&self) {
        incr(&self.results_persisted);
    }

    pub(crate) fn record_rate_limited(&self) {
        incr(&self.rate_limited);
    }

    pub(crate) fn record_no_content(&self) {
        incr(&self.no_content);
    }

    pub(crate) fn record_query_failure(&self) {
        incr(&self.query_failures);
    }

    pub(crate) fn record_persist_failure(&self) {
        incr(&self.persist_failures);
    }

    pub(crate) fn record_pause(&self) {
        incr(&self.pauses_issued);
    }

    pub fn snapshot(&self) -> SyncStatsSnapshot {
        SyncStatsSnapshot {
            discovery_cycles: self.discovery_cycles.load(Ordering::Relaxed),
            failed_cycles: self.failed_cycles.load(Ordering::Relaxed),
            orders_enqueued: self.orders_enqueued.load(Ordering::Relaxed),
            results_persisted: self.results_persisted.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            no_content: self.no_content.load(Ordering::Relaxed),
            query_failures: self.query_failures.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            pauses_issued: self.pauses_issued.load(Ordering::Relaxed),
        }
    }
}
