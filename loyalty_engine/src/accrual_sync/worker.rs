use std::{sync::Arc, time::Duration};

use log::*;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::stats::SyncStats;
use crate::{
    db_types::OrderId,
    events::{ErrorEvent, EventProducer, PauseSignal, SyncError, WorkerId},
    traits::{AccrualOrderStore, AccrualQuery},
};

/// The receiving end of the work queue, shared by every worker in the pool. Whoever holds the lock is the next in line
/// for an order id.
pub(crate) type WorkQueue = Arc<Mutex<mpsc::Receiver<OrderId>>>;

enum Next {
    Pause,
    Order(OrderId),
}

pub(crate) struct Worker<C, S> {
    id: WorkerId,
    client: C,
    store: S,
    queue: WorkQueue,
    pause: mpsc::Receiver<PauseSignal>,
    errors: EventProducer<ErrorEvent>,
    cooldown: Duration,
    stats: Arc<SyncStats>,
    shutdown: CancellationToken,
}

impl<C, S> Worker<C, S>
where
    C: AccrualQuery,
    S: AccrualOrderStore,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: WorkerId,
        client: C,
        store: S,
        queue: WorkQueue,
        pause: mpsc::Receiver<PauseSignal>,
        errors: EventProducer<ErrorEvent>,
        cooldown: Duration,
        stats: Arc<SyncStats>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { id, client, store, queue, pause, errors, cooldown, stats, shutdown }
    }

    /// Processes orders until shutdown, or until the work queue closes.
    ///
    /// A pending pause signal always wins over the next order in the queue.
    pub async fn run(mut self) {
        debug!("🔄️ [{}] Accrual worker started", self.id);
        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(_) = self.pause.recv() => Next::Pause,
                order = next_order(&self.queue) => match order {
                    Some(order_id) => Next::Order(order_id),
                    None => {
                        debug!("🔄️ [{}] The work queue has closed", self.id);
                        break;
                    },
                },
            };
            match next {
                Next::Pause => {
                    if !self.cool_down().await {
                        break;
                    }
                },
                Next::Order(order_id) => self.process_order(order_id).await,
            }
        }
        debug!("🔄️ [{}] Accrual worker has shut down", self.id);
    }

    /// Sleeps for the cooldown period, then throws away any pause signals that arrived in the meantime.
    /// Returns `false` if shutdown was requested during the pause.
    async fn cool_down(&mut self) -> bool {
        info!("🔄️ [{}] Pausing accrual queries for {:?}", self.id, self.cooldown);
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return false,
            _ = tokio::time::sleep(self.cooldown) => {},
        }
        let mut dropped = 0;
        while self.pause.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            trace!("🔄️ [{}] Dropped {dropped} pause signals that arrived during the cooldown", self.id);
        }
        info!("🔄️ [{}] Resuming accrual queries", self.id);
        true
    }

    /// Queries the accrual service for one order and stores the verdict. Any failure is handed to the supervisor, and
    /// the order is left as it was, to be picked up again by a later discovery cycle.
    pub async fn process_order(&self, order_id: OrderId) {
        trace!("🔄️ [{}] Checking accrual for order {order_id}", self.id);
        let result = match self.client.query_accrual(&order_id).await {
            Ok(result) => result,
            Err(e) => return self.report(order_id, e.into()).await,
        };
        match self.store.persist_accrual_result(&result).await {
            Ok(()) => {
                self.stats.record_persisted();
                debug!("🔄️ [{}] Saved accrual result: {result}", self.id);
            },
            Err(e) => self.report(order_id, e.into()).await,
        }
    }

    async fn report(&self, order_id: OrderId, error: SyncError) {
        if self.shutdown.is_cancelled() {
            trace!("🔄️ [{}] Shutting down. Not reporting '{error}' for order {order_id}", self.id);
            return;
        }
        self.errors.publish_event(ErrorEvent::new(self.id, order_id, error)).await;
    }
}

async fn next_order(queue: &WorkQueue) -> Option<OrderId> {
    queue.lock().await.recv().await
}
