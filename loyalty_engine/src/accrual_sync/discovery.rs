use std::{sync::Arc, time::Duration};

use log::*;
use thiserror::Error;
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::stats::SyncStats;
use crate::{
    db_types::OrderId,
    traits::{AccrualOrderStore, OrderStoreError},
};

#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    #[error("Could not list unsettled orders. {0}")]
    Store(#[from] OrderStoreError),
    #[error("The work queue has been closed")]
    QueueClosed,
}

/// Periodically lists the unsettled orders and feeds their ids to the workers.
pub(crate) struct Discovery<S> {
    store: S,
    queue: mpsc::Sender<OrderId>,
    interval: Duration,
    stats: Arc<SyncStats>,
    shutdown: CancellationToken,
}

impl<S: AccrualOrderStore> Discovery<S> {
    pub fn new(
        store: S,
        queue: mpsc::Sender<OrderId>,
        interval: Duration,
        stats: Arc<SyncStats>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { store, queue, interval, stats, shutdown }
    }

    /// Runs discovery cycles until shutdown. The first cycle starts immediately.
    ///
    /// A cycle that is held up by a full queue pushes the following ticks back rather than having them fire in a
    /// burst once the queue drains.
    pub async fn run(self) {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🔄️ Order discovery started. Looking for unsettled orders every {:?}", self.interval);
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = timer.tick() => {},
            }
            let cycle = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                result = self.run_cycle() => result,
            };
            match cycle {
                Ok(0) => debug!("🔄️ No unsettled orders found"),
                Ok(n) => debug!("🔄️ {n} unsettled orders queued for an accrual check"),
                Err(DiscoveryError::QueueClosed) => {
                    warn!("🔄️ The work queue has closed. No workers are left to hand orders to.");
                    break;
                },
                Err(e) => error!("🔄️ Discovery cycle skipped. {e}"),
            }
        }
        info!("🔄️ Order discovery has shut down");
    }

    /// Lists the unsettled orders and enqueues every id, waiting for space in the queue as needed.
    /// Returns the number of ids enqueued.
    pub async fn run_cycle(&self) -> Result<usize, DiscoveryError> {
        self.stats.record_cycle();
        let ids = self.store.fetch_unsettled_order_ids().await.map_err(|e| {
            self.stats.record_failed_cycle();
            e
        })?;
        let count = ids.len();
        for id in ids {
            trace!("🔄️ Queueing order {id}");
            self.queue.send(id).await.map_err(|_| DiscoveryError::QueueClosed)?;
            self.stats.record_enqueued();
        }
        Ok(count)
    }
}
