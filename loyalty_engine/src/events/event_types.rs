use std::{fmt::Display, time::Duration};

use thiserror::Error;

use crate::{
    db_types::OrderId,
    traits::{AccrualQueryError, OrderStoreError},
};

/// Tells a worker to stop fetching work for the configured cooldown. Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Everything that can go wrong while a worker handles a single order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Accrual service is rate limiting requests (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },
    #[error("Accrual service has no information for the order yet")]
    NoContent,
    #[error("Accrual query failed. {0}")]
    QueryFailed(String),
    #[error("Could not persist the accrual result. {0}")]
    PersistFailed(String),
}

impl From<AccrualQueryError> for SyncError {
    fn from(e: AccrualQueryError) -> Self {
        match e {
            AccrualQueryError::RateLimited { retry_after } => Self::RateLimited { retry_after },
            AccrualQueryError::NoContent => Self::NoContent,
            AccrualQueryError::Failed(msg) => Self::QueryFailed(msg),
        }
    }
}

impl From<OrderStoreError> for SyncError {
    fn from(e: OrderStoreError) -> Self {
        Self::PersistFailed(e.to_string())
    }
}

/// Reported by a worker to the supervisor whenever processing an order fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub worker: WorkerId,
    pub order_id: OrderId,
    pub error: SyncError,
}

impl ErrorEvent {
    pub fn new(worker: WorkerId, order_id: OrderId, error: SyncError) -> Self {
        Self { worker, order_id, error }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.error, SyncError::RateLimited { .. })
    }
}

impl Display for ErrorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] order {}: {}", self.worker, self.order_id, self.error)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rate_limit_detection() {
        let ev = ErrorEvent::new(WorkerId(1), "2".into(), SyncError::RateLimited { retry_after: None });
        assert!(ev.is_rate_limited());
        let ev = ErrorEvent::new(WorkerId(1), "2".into(), SyncError::NoContent);
        assert!(!ev.is_rate_limited());
        assert_eq!(ev.to_string(), "[worker-1] order #2: Accrual service has no information for the order yet");
    }

    #[test]
    fn errors_convert_into_sync_errors() {
        assert_eq!(SyncError::from(AccrualQueryError::NoContent), SyncError::NoContent);
        let e = SyncError::from(OrderStoreError::OrderNotFound("7".into()));
        assert_eq!(e, SyncError::PersistFailed("Order #7 does not exist".into()));
    }
}
