use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccrualApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The accrual service is rate limiting requests (retry after {retry_after:?})")]
    TooManyRequests { retry_after: Option<Duration> },
    #[error("The accrual service has no information for this order yet")]
    NoContent,
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
