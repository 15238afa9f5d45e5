use std::sync::Arc;

use log::*;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::stats::SyncStats;
use crate::events::{ErrorEvent, PauseSignal, SyncError, WorkerId};

/// Reads the error stream from the worker pool, one event at a time.
///
/// Every event is logged and counted. A rate limit reported by any worker pauses the whole pool.
pub(crate) struct Supervisor {
    events: mpsc::Receiver<ErrorEvent>,
    pause_senders: Vec<(WorkerId, mpsc::Sender<PauseSignal>)>,
    stats: Arc<SyncStats>,
    shutdown: CancellationToken,
}

impl Supervisor {
    pub fn new(
        events: mpsc::Receiver<ErrorEvent>,
        pause_senders: Vec<(WorkerId, mpsc::Sender<PauseSignal>)>,
        stats: Arc<SyncStats>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { events, pause_senders, stats, shutdown }
    }

    /// Handles events until shutdown, or until every worker has gone away. On shutdown, events that are already
    /// buffered are still logged, but no more pauses are issued.
    pub async fn run(mut self) {
        debug!("🔄️ Accrual supervisor started, watching {} workers", self.pause_senders.len());
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    self.events.close();
                    while let Some(event) = self.events.recv().await {
                        self.record(&event);
                    }
                    break;
                },
                event = self.events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }
        debug!("🔄️ Accrual supervisor has shut down");
    }

    pub fn handle_event(&self, event: ErrorEvent) {
        self.record(&event);
        if event.is_rate_limited() {
            self.pause_all_workers();
        }
    }

    fn record(&self, event: &ErrorEvent) {
        match &event.error {
            SyncError::NoContent => {
                self.stats.record_no_content();
                debug!("🔄️ {event}");
            },
            SyncError::RateLimited { retry_after } => {
                self.stats.record_rate_limited();
                match retry_after {
                    Some(delay) => warn!("🔄️ {event}. The service asked us to wait {delay:?}"),
                    None => warn!("🔄️ {event}"),
                }
            },
            SyncError::QueryFailed(_) => {
                self.stats.record_query_failure();
                error!("🔄️ {event}");
            },
            SyncError::PersistFailed(_) => {
                self.stats.record_persist_failure();
                error!("🔄️ {event}");
            },
        }
    }

    /// Offers a pause signal to every worker without waiting. A worker that already has a pause pending is skipped.
    fn pause_all_workers(&self) {
        let mut paused = 0;
        for (id, sender) in &self.pause_senders {
            match sender.try_send(PauseSignal) {
                Ok(()) => paused += 1,
                Err(TrySendError::Full(_)) => trace!("🔄️ [{id}] already has a pause pending"),
                Err(TrySendError::Closed(_)) => warn!("🔄️ [{id}] has stopped. It cannot be paused."),
            }
        }
        if paused > 0 {
            self.stats.record_pause();
            info!("🔄️ Rate limited by the accrual service. Paused {paused} of {} workers", self.pause_senders.len());
        }
    }
}
