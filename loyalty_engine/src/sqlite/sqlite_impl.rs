//! `SqliteDatabase` is the SQLite implementation of the order store.
//!
//! It implements [`AccrualOrderStore`] for the reconciliation engine and [`OrderManagement`] for everything else.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{new_pool, orders};
use crate::{
    db_types::{AccrualResult, NewOrder, Order, OrderId},
    traits::{AccrualOrderStore, InsertOrderResult, OrderManagement, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl AccrualOrderStore for SqliteDatabase {
    async fn fetch_unsettled_order_ids(&self) -> Result<Vec<OrderId>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let ids = orders::fetch_unsettled_order_ids(&mut conn).await?;
        Ok(ids)
    }

    async fn persist_accrual_result(&self, result: &AccrualResult) -> Result<(), OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let rows = orders::update_accrual(result, &mut conn).await?;
        if rows == 0 {
            return Err(OrderStoreError::OrderNotFound(result.order_id.clone()));
        }
        debug!("🗃️ Order {} updated to {}", result.order_id, result.order_status());
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderStoreError> {
        if !order.order_id.is_valid() {
            return Err(OrderStoreError::InvalidOrderNumber(order.order_id));
        }
        let mut tx = self.pool.begin().await?;
        let (order, inserted) = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        if inserted {
            Ok(InsertOrderResult::Inserted(order))
        } else {
            trace!("🗃️ Order {} already exists", order.order_id);
            Ok(InsertOrderResult::AlreadyExists(order))
        }
    }

    async fn order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_customer(customer_id, &mut conn).await?;
        Ok(orders)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Creates an empty database at `url` unless one already exists. Returns `true` if a new database was created.
    pub async fn create_if_missing(url: &str) -> Result<bool, sqlx::Error> {
        if Sqlite::database_exists(url).await? {
            return Ok(false);
        }
        Sqlite::create_database(url).await?;
        info!("🗃️ Created a new database");
        Ok(true)
    }

    /// Brings the schema up to date with the migrations embedded in this crate.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Database connection pool closed");
    }
}
