use std::future::Future;

use thiserror::Error;

use crate::db_types::{AccrualResult, OrderId};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("{0} is not a valid order number")]
    InvalidOrderNumber(OrderId),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

/// The storage operations the accrual reconciliation engine depends on.
///
/// Implementations are shared between many concurrent tasks, so they must be cheap to clone (e.g. a handle to a
/// connection pool), and any locking is the implementation's own business.
pub trait AccrualOrderStore: Clone + Send + Sync + 'static {
    /// Returns the id of every order whose status is not terminal (neither `INVALID` nor `PROCESSED`).
    /// The order of the results is unspecified.
    fn fetch_unsettled_order_ids(&self) -> impl Future<Output = Result<Vec<OrderId>, OrderStoreError>> + Send;

    /// Overwrites the status and accrual of the order identified by `result.order_id` in a single atomic statement.
    /// The write is unconditional: last write wins.
    fn persist_accrual_result(
        &self,
        result: &AccrualResult,
    ) -> impl Future<Output = Result<(), OrderStoreError>> + Send;
}
