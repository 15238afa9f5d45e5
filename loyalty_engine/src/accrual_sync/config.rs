use std::time::Duration;

pub const DEFAULT_WORKER_COUNT: usize = 5;
pub const DEFAULT_DISCOVERY_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_PAUSE_COOLDOWN: Duration = Duration::from_secs(60);
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
pub const DEFAULT_ERROR_BUFFER_SIZE: usize = 16;

/// Tuning for the accrual reconciliation engine. Fixed once the engine has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualSyncConfig {
    /// Number of concurrent workers querying the accrual service.
    pub worker_count: usize,
    /// Time between two discovery cycles.
    pub discovery_interval: Duration,
    /// How long every worker stops querying after the accrual service rate limits any of them.
    pub pause_cooldown: Duration,
    /// Capacity of the work queue between discovery and the workers.
    pub queue_capacity: usize,
    /// Capacity of the error channel between the workers and the supervisor.
    pub error_buffer_size: usize,
}

impl Default for AccrualSyncConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            discovery_interval: DEFAULT_DISCOVERY_INTERVAL,
            pause_cooldown: DEFAULT_PAUSE_COOLDOWN,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            error_buffer_size: DEFAULT_ERROR_BUFFER_SIZE,
        }
    }
}

impl AccrualSyncConfig {
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_discovery_interval(mut self, interval: Duration) -> Self {
        self.discovery_interval = interval;
        self
    }

    pub fn with_pause_cooldown(mut self, cooldown: Duration) -> Self {
        self.pause_cooldown = cooldown;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_error_buffer_size(mut self, size: usize) -> Self {
        self.error_buffer_size = size;
        self
    }

    /// Channels need a capacity of at least one, the pool needs at least one worker, and the discovery timer cannot
    /// have a zero period. Values that break these rules are raised to the smallest legal value.
    pub(crate) fn normalized(mut self) -> Self {
        self.worker_count = self.worker_count.max(1);
        self.queue_capacity = self.queue_capacity.max(1);
        self.error_buffer_size = self.error_buffer_size.max(1);
        if self.discovery_interval.is_zero() {
            self.discovery_interval = Duration::from_millis(1);
        }
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = AccrualSyncConfig::default();
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.discovery_interval, Duration::from_secs(5));
        assert_eq!(config.pause_cooldown, Duration::from_secs(60));
        assert_eq!(config.queue_capacity, 10);
    }

    #[test]
    fn degenerate_values_are_raised() {
        let config = AccrualSyncConfig::default()
            .with_worker_count(0)
            .with_queue_capacity(0)
            .with_error_buffer_size(0)
            .with_discovery_interval(Duration::ZERO)
            .normalized();
        assert_eq!(config.worker_count, 1);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.error_buffer_size, 1);
        assert_eq!(config.discovery_interval, Duration::from_millis(1));
    }
}
