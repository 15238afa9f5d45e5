//! Server configuration.
//!
//! The addresses and the database URL come from [`Arguments`], which clap fills from the command line or from the
//! environment. Engine tuning is read from `LPS_*` environment variables only:
//!
//! | Variable                      | Default | Meaning                                                   |
//! |-------------------------------|---------|-----------------------------------------------------------|
//! | `LPS_ACCRUAL_WORKERS`         | 5       | Number of concurrent accrual workers (at least 1)         |
//! | `LPS_DISCOVERY_INTERVAL_SECS` | 5       | Seconds between two scans for unsettled orders            |
//! | `LPS_PAUSE_COOLDOWN_SECS`     | 60      | Seconds every worker waits after a rate limit             |
//! | `LPS_WORK_QUEUE_SIZE`         | 10      | Capacity of the queue between discovery and the workers   |
//! | `LPS_ACCRUAL_TIMEOUT_SECS`    | 10      | Timeout for a single request to the accrual service       |
//! | `LPS_RUN_MIGRATIONS`          | true    | Apply database migrations at start-up                     |
//!
//! Values that cannot be parsed are replaced by their default, with a warning.
use std::{env, fmt::Display, str::FromStr, time::Duration};

use accrual_tools::AccrualApiConfig;
use log::*;
use loyalty_common::{helpers::parse_boolean_flag, Secret};
use loyalty_engine::AccrualSyncConfig;

use crate::cli::Arguments;

const DEFAULT_RUN_ADDRESS: &str = "localhost:8081";
const DEFAULT_ACCRUAL_ADDRESS: &str = "http://localhost:8080";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/loyalty.db";
const DEFAULT_ACCRUAL_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// The address the operations HTTP server binds to.
    pub run_address: String,
    pub database_url: Secret<String>,
    /// Apply the embedded database migrations at start-up.
    pub run_migrations: bool,
    pub accrual_api: AccrualApiConfig,
    pub accrual_sync: AccrualSyncConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            run_address: DEFAULT_RUN_ADDRESS.to_string(),
            database_url: Secret::new(DEFAULT_DATABASE_URL.to_string()),
            run_migrations: true,
            accrual_api: AccrualApiConfig::new(DEFAULT_ACCRUAL_ADDRESS),
            accrual_sync: AccrualSyncConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_args_and_env(args: Arguments) -> Self {
        Self::from_sources(args, |name| env::var(name).ok())
    }

    /// Builds the configuration from parsed arguments and a variable lookup. `lookup` is only consulted for the
    /// `LPS_*` variables; everything else has already been resolved by clap.
    pub fn from_sources<F>(args: Arguments, lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let run_address = args.run_address.unwrap_or_else(|| {
            info!("🪛️ RUN_ADDRESS is not set. Using the default, {DEFAULT_RUN_ADDRESS}.");
            DEFAULT_RUN_ADDRESS.to_string()
        });
        let accrual_address = args.accrual_address.unwrap_or_else(|| {
            warn!("🪛️ ACCRUAL_SYSTEM_ADDRESS is not set. Using the default, {DEFAULT_ACCRUAL_ADDRESS}.");
            DEFAULT_ACCRUAL_ADDRESS.to_string()
        });
        let database_url = args.database_uri.unwrap_or_else(|| {
            warn!("🪛️ DATABASE_URI is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let timeout = parse_or_default(&lookup, "LPS_ACCRUAL_TIMEOUT_SECS", DEFAULT_ACCRUAL_TIMEOUT_SECS);
        let accrual_api = AccrualApiConfig::new(&accrual_address).with_request_timeout(Duration::from_secs(timeout));
        let run_migrations = parse_boolean_flag(lookup("LPS_RUN_MIGRATIONS"), true);
        let accrual_sync = sync_config(&lookup);
        Self { run_address, database_url: Secret::new(database_url), run_migrations, accrual_api, accrual_sync }
    }
}

fn sync_config<F>(lookup: &F) -> AccrualSyncConfig
where F: Fn(&str) -> Option<String> {
    let defaults = AccrualSyncConfig::default();
    let mut worker_count = parse_or_default(lookup, "LPS_ACCRUAL_WORKERS", defaults.worker_count);
    if worker_count == 0 {
        warn!("🪛️ LPS_ACCRUAL_WORKERS must be at least 1. Using a single worker.");
        worker_count = 1;
    }
    let interval = parse_or_default(lookup, "LPS_DISCOVERY_INTERVAL_SECS", defaults.discovery_interval.as_secs());
    let cooldown = parse_or_default(lookup, "LPS_PAUSE_COOLDOWN_SECS", defaults.pause_cooldown.as_secs());
    let queue_capacity = parse_or_default(lookup, "LPS_WORK_QUEUE_SIZE", defaults.queue_capacity);
    defaults
        .with_worker_count(worker_count)
        .with_discovery_interval(Duration::from_secs(interval))
        .with_pause_cooldown(Duration::from_secs(cooldown))
        .with_queue_capacity(queue_capacity)
}

fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(name) {
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        None => default,
    }
}
