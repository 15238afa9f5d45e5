use std::time::Duration;

pub const DEFAULT_ACCRUAL_ENDPOINT: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AccrualApiConfig {
    /// Base URL of the accrual service, e.g. `http://localhost:8080`. Never ends with a slash.
    pub endpoint: String,
    /// Upper bound for a single request, including connecting and reading the body.
    pub request_timeout: Duration,
}

impl Default for AccrualApiConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ACCRUAL_ENDPOINT.to_string(), request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

impl AccrualApiConfig {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: normalize_endpoint(endpoint), ..Default::default() }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Accepts bare `host:port` addresses as well as full URLs. A missing scheme becomes `http://` and trailing slashes
/// are removed, so that paths can be appended directly.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}
