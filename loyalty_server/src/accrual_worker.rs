use accrual_tools::AccrualApi;
use log::*;
use loyalty_engine::{AccrualSyncEngine, AccrualSyncHandle, SqliteDatabase};

use crate::{config::ServerConfig, errors::ServerError};

/// Starts the accrual sync engine in the background. It runs until [`AccrualSyncHandle::shutdown`] is called.
pub fn start_accrual_sync(config: &ServerConfig, db: SqliteDatabase) -> Result<AccrualSyncHandle, ServerError> {
    let api = AccrualApi::new(config.accrual_api.clone())
        .map_err(|e| ServerError::InitializeError(format!("Could not create the accrual service client. {e}")))?;
    info!(
        "🖥️ Syncing accruals with {} ({} workers, timeout {:?})",
        config.accrual_api.endpoint, config.accrual_sync.worker_count, config.accrual_api.request_timeout
    );
    let engine = AccrualSyncEngine::new(config.accrual_sync.clone(), api, db);
    Ok(engine.start())
}
