use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use loyalty_engine::{accrual_sync::SyncStats, SqliteDatabase};

use crate::{
    accrual_worker::start_accrual_sync,
    config::ServerConfig,
    errors::ServerError,
    routes::{health, sync_stats},
};

/// Opens the database, starts the accrual sync engine and serves the operations API until the process is asked to
/// stop. The engine is shut down after the HTTP server has stopped.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = open_database(&config).await?;
    let engine = start_accrual_sync(&config, db.clone())?;
    let result = match create_server_instance(&config, engine.stats_reader()) {
        Ok(srv) => srv.await.map_err(|e| ServerError::Unspecified(e.to_string())),
        Err(e) => Err(e),
    };
    engine.shutdown().await;
    db.close().await;
    result
}

pub async fn open_database(config: &ServerConfig) -> Result<SqliteDatabase, ServerError> {
    let url = config.database_url.reveal();
    SqliteDatabase::create_if_missing(url).await.map_err(|e| ServerError::DatabaseError(e.to_string()))?;
    let db = SqliteDatabase::new_with_url(url, 25).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::DatabaseError(e.to_string()))?;
    } else {
        warn!("🖥️ Database migrations are disabled. Make sure the schema is up to date.");
    }
    Ok(db)
}

pub fn create_server_instance(config: &ServerConfig, stats: Arc<SyncStats>) -> Result<Server, ServerError> {
    let stats = web::Data::from(stats);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("loyalty::access_log"))
            .app_data(stats.clone())
            .service(health)
            .service(sync_stats)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind(config.run_address.as_str())?
    .run();
    info!("🖥️ Operations API listening on {}", config.run_address);
    Ok(srv)
}
