use std::sync::Arc;

use log::*;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::{
    config::AccrualSyncConfig,
    discovery::Discovery,
    stats::{SyncStats, SyncStatsSnapshot},
    supervisor::Supervisor,
    worker::Worker,
};
use crate::{
    events::{ErrorEvent, EventProducer, WorkerId},
    traits::{AccrualOrderStore, AccrualQuery},
};

/// The accrual reconciliation engine, configured but not yet running.
pub struct AccrualSyncEngine<C, S> {
    config: AccrualSyncConfig,
    client: C,
    store: S,
}

impl<C, S> AccrualSyncEngine<C, S>
where
    C: AccrualQuery,
    S: AccrualOrderStore,
{
    pub fn new(config: AccrualSyncConfig, client: C, store: S) -> Self {
        Self { config, client, store }
    }

    pub fn config(&self) -> &AccrualSyncConfig {
        &self.config
    }

    /// Spawns the worker pool, the supervisor and the discovery loop onto the current tokio runtime.
    pub fn start(self) -> AccrualSyncHandle {
        self.start_with_shutdown(CancellationToken::new())
    }

    /// Like [`start`](Self::start), but stops when `shutdown` is cancelled, so the engine can share a shutdown token
    /// with the rest of the application.
    pub fn start_with_shutdown(self, shutdown: CancellationToken) -> AccrualSyncHandle {
        let config = self.config.normalized();
        let stats = Arc::new(SyncStats::default());
        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity);
        let queue = Arc::new(Mutex::new(queue_rx));
        let (errors, error_rx) = EventProducer::<ErrorEvent>::channel(config.error_buffer_size);
        let mut tasks = Vec::with_capacity(config.worker_count + 2);
        let mut pause_senders = Vec::with_capacity(config.worker_count);

        for i in 0..config.worker_count {
            let id = WorkerId(i + 1);
            let (pause_tx, pause_rx) = mpsc::channel(1);
            pause_senders.push((id, pause_tx));
            let worker = Worker::new(
                id,
                self.client.clone(),
                self.store.clone(),
                Arc::clone(&queue),
                pause_rx,
                errors.clone(),
                config.pause_cooldown,
                Arc::clone(&stats),
                shutdown.clone(),
            );
            tasks.push(tokio::spawn(worker.run()));
        }
        // The workers hold the only producers. Once they are all gone, the supervisor sees the stream end.
        drop(errors);

        let supervisor = Supervisor::new(error_rx, pause_senders, Arc::clone(&stats), shutdown.clone());
        tasks.push(tokio::spawn(supervisor.run()));

        let discovery =
            Discovery::new(self.store, queue_tx, config.discovery_interval, Arc::clone(&stats), shutdown.clone());
        tasks.push(tokio::spawn(discovery.run()));

        info!(
            "🔄️ Accrual sync engine started with {} workers. Discovery every {:?}, rate limit cooldown {:?}",
            config.worker_count, config.discovery_interval, config.pause_cooldown
        );
        AccrualSyncHandle { shutdown, tasks, stats }
    }
}

/// A running accrual sync engine.
///
/// Dropping the handle leaves the engine running in the background. Call [`shutdown`](Self::shutdown) to stop it.
pub struct AccrualSyncHandle {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    stats: Arc<SyncStats>,
}

impl AccrualSyncHandle {
    pub fn stats(&self) -> SyncStatsSnapshot {
        self.stats.snapshot()
    }

    /// A shared reference to the live counters, for readers that outlive a borrow of the handle.
    pub fn stats_reader(&self) -> Arc<SyncStats> {
        Arc::clone(&self.stats)
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }

    /// Signals every task to stop at its next suspension point, and waits until they all have.
    pub async fn shutdown(self) {
        info!("🔄️ Shutting down the accrual sync engine");
        self.shutdown.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                error!("🔄️ An accrual sync task did not shut down cleanly. {e}");
            }
        }
        info!("🔄️ Accrual sync engine has shut down");
    }
}
