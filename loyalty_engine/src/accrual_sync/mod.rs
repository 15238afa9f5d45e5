//! # Accrual reconciliation
//!
//! Keeps the order store in step with the external accrual service. Three kinds of task cooperate, and they share
//! nothing but channels:
//!
//! * **Discovery** polls the store for orders that have not reached a terminal status and pushes their ids onto a
//!   bounded work queue. When the queue is full, discovery waits.
//! * **Workers** (a fixed pool) pull ids off the shared queue, ask the accrual service for a verdict, and write the
//!   verdict back to the store. Failures are reported to the supervisor as [`ErrorEvent`]s.
//! * The **supervisor** reads the error stream. When any worker is rate limited, it signals every worker to pause
//!   for a cooldown period, so that the whole pool backs off together.
//!
//! Nothing is retried locally. An order that could not be resolved simply stays unsettled, and discovery hands it
//! out again on a later cycle.
//!
//! [`ErrorEvent`]: crate::events::ErrorEvent
mod config;
mod discovery;
mod engine;
mod stats;
mod supervisor;
mod worker;

pub use config::AccrualSyncConfig;
pub use discovery::DiscoveryError;
pub use engine::{AccrualSyncEngine, AccrualSyncHandle};
pub use stats::{SyncStats, SyncStatsSnapshot};
