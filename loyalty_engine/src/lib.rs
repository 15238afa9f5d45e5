//! Loyalty Engine
//!
//! The storage layer and the accrual reconciliation engine of the loyalty points backend.
//!
//! The library is divided into these sections:
//! 1. Database types ([`mod@db_types`]) and the storage contracts in [`mod@traits`]. The SQLite backend
//!    ([`SqliteDatabase`]) implements them. You should never need to access the database directly.
//! 2. The accrual reconciliation engine ([`mod@accrual_sync`]). It keeps the status and accrual of every uploaded order
//!    in step with the external accrual service, using a pool of workers that back off together when the service
//!    rate limits them.
//! 3. Messages passed between the engine's tasks ([`mod@events`]).
pub mod accrual_sync;
pub mod db_types;
pub mod events;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use accrual_sync::{AccrualSyncConfig, AccrualSyncEngine, AccrualSyncHandle, SyncStatsSnapshot};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    AccrualOrderStore,
    AccrualQuery,
    AccrualQueryError,
    InsertOrderResult,
    OrderManagement,
    OrderStoreError,
};
