use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{AccrualResult, NewOrder, Order, OrderId, OrderStatusType};

/// Inserts the order into the database, returning `false` in the second parameter if the order already exists.
pub async fn idempotent_insert(order: NewOrder, conn: &mut SqliteConnection) -> Result<(Order, bool), sqlx::Error> {
    let inserted = match fetch_order_by_order_id(&order.order_id, conn).await? {
        Some(order) => (order, false),
        None => {
            let order = insert_order(order, conn).await?;
            debug!("🗃️ Order {} inserted with id {}", order.order_id, order.id);
            (order, true)
        },
    };
    Ok(inserted)
}

/// Inserts a new order with status `NEW`. This is not atomic with respect to [`fetch_order_by_order_id`]. Embed both
/// calls in a transaction if you need that, and pass `&mut *tx` as the connection argument.
async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, customer_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.customer_id)
    .bind(OrderStatusType::New.to_string())
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_orders_for_customer(customer_id: &str, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(customer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Returns the order ids of every order that has not yet reached a terminal status.
pub async fn fetch_unsettled_order_ids(conn: &mut SqliteConnection) -> Result<Vec<OrderId>, sqlx::Error> {
    let ids: Vec<(String,)> = sqlx::query_as(
        r#"
            SELECT order_id FROM orders
            WHERE status NOT IN ('INVALID', 'PROCESSED')
            ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;
    trace!("🗃️ {} orders are awaiting an accrual result", ids.len());
    Ok(ids.into_iter().map(|(id,)| OrderId(id)).collect())
}

/// Writes the status and accrual from `result` into the order in one statement. The previous values are overwritten
/// unconditionally. Returns the number of rows updated, which is zero if the order does not exist.
pub async fn update_accrual(result: &AccrualResult, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        r#"
            UPDATE orders
            SET status = $1, accrual = $2, updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3
        "#,
    )
    .bind(result.order_status().to_string())
    .bind(result.accrual.map(|a| a.value()))
    .bind(result.order_id.as_str())
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows)
}
