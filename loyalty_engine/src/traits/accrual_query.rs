use std::{future::Future, time::Duration};

use accrual_tools::{AccrualApi, AccrualApiError};
use log::*;
use thiserror::Error;

use crate::db_types::{AccrualResult, OrderId};

/// The three outcomes of an accrual query that the engine treats differently, besides success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccrualQueryError {
    #[error("The accrual service is rate limiting requests")]
    RateLimited { retry_after: Option<Duration> },
    #[error("The accrual service has no information for this order yet")]
    NoContent,
    #[error("Accrual query failed. {0}")]
    Failed(String),
}

impl From<AccrualApiError> for AccrualQueryError {
    fn from(e: AccrualApiError) -> Self {
        match e {
            AccrualApiError::TooManyRequests { retry_after } => Self::RateLimited { retry_after },
            AccrualApiError::NoContent => Self::NoContent,
            e => Self::Failed(e.to_string()),
        }
    }
}

/// A single synchronous read against the accrual service: "what is the current status of order X?"
///
/// Queries are idempotent, so callers may repeat them freely.
pub trait AccrualQuery: Clone + Send + Sync + 'static {
    fn query_accrual(&self, order_id: &OrderId)
        -> impl Future<Output = Result<AccrualResult, AccrualQueryError>> + Send;
}

impl AccrualQuery for AccrualApi {
    async fn query_accrual(&self, order_id: &OrderId) -> Result<AccrualResult, AccrualQueryError> {
        let response = self.get_order_info(order_id.as_str()).await?;
        if response.order != order_id.as_str() {
            warn!(
                "📡️ Accrual service answered a query for order {order_id} with data for order #{}. The response is \
                 applied to {order_id}.",
                response.order
            );
        }
        Ok(AccrualResult::new(order_id.clone(), response.status, response.accrual))
    }
}
