//! Request handler definitions
//!
//! Define each route and it handler here. Keep this module neat and tidy 🙏
//!
//! Handlers must never block the worker thread. Anything slower than a memory read belongs in an async function.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use loyalty_engine::accrual_sync::SyncStats;

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("🖥️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Sync stats  ------------------------------------------------
/// Counters from the accrual sync engine since the server started.
#[get("/sync/stats")]
pub async fn sync_stats(stats: web::Data<SyncStats>) -> impl Responder {
    trace!("🖥️ Received sync stats request");
    HttpResponse::Ok().json(stats.snapshot())
}
