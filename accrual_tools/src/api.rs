use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, RETRY_AFTER},
    Client,
    StatusCode,
};

use crate::{config::AccrualApiConfig, AccrualApiError, AccrualResponse};

#[derive(Clone)]
pub struct AccrualApi {
    config: AccrualApiConfig,
    client: Arc<Client>,
}

impl AccrualApi {
    pub fn new(config: AccrualApiConfig) -> Result<Self, AccrualApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AccrualApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &AccrualApiConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.endpoint)
    }

    /// Asks the accrual service for the current calculation state of `order_number`.
    ///
    /// * `200 OK` yields the decoded [`AccrualResponse`].
    /// * `204 No Content` means the service does not know the order yet, and yields [`AccrualApiError::NoContent`].
    /// * `429 Too Many Requests` yields [`AccrualApiError::TooManyRequests`], with the `Retry-After` delay if the
    ///   service sent one.
    /// * Anything else is a [`AccrualApiError::QueryError`] carrying the status and body.
    pub async fn get_order_info(&self, order_number: &str) -> Result<AccrualResponse, AccrualApiError> {
        let url = self.url(&format!("/api/orders/{order_number}"));
        trace!("📡️ Sending accrual query: {url}");
        let response =
            self.client.get(url).send().await.map_err(|e| AccrualApiError::RestResponseError(e.to_string()))?;
        match response.status() {
            StatusCode::NO_CONTENT => {
                trace!("📡️ No accrual information for order {order_number} yet");
                Err(AccrualApiError::NoContent)
            },
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = parse_retry_after(response.headers());
                debug!("📡️ Accrual service rate limit hit. Retry after: {retry_after:?}");
                Err(AccrualApiError::TooManyRequests { retry_after })
            },
            status if status.is_success() => {
                let info = response
                    .json::<AccrualResponse>()
                    .await
                    .map_err(|e| AccrualApiError::JsonError(e.to_string()))?;
                trace!("📡️ Accrual query for order {order_number} returned {}", info.status);
                Ok(info)
            },
            status => {
                let status = status.as_u16();
                let message =
                    response.text().await.map_err(|e| AccrualApiError::RestResponseError(e.to_string()))?;
                Err(AccrualApiError::QueryError { status, message })
            },
        }
    }
}

/// Only the delay-seconds form of `Retry-After` is understood. HTTP dates are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("60"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(60)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn urls_are_built_from_the_endpoint() {
        let api = AccrualApi::new(AccrualApiConfig::new("localhost:8080/")).unwrap();
        assert_eq!(api.url("/api/orders/1"), "http://localhost:8080/api/orders/1");
    }
}
