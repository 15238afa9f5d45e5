use crate::{
    db_types::{NewOrder, Order, OrderId},
    traits::{InsertOrderResult, OrderStoreError},
};

/// The `OrderManagement` trait defines the behaviour for registering and querying orders in the database backend.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a newly uploaded order number with status `NEW`. This call is idempotent: if the order number is
    /// already registered, the existing record is returned as [`InsertOrderResult::AlreadyExists`].
    ///
    /// Order numbers that fail the Luhn check are rejected with [`OrderStoreError::InvalidOrderNumber`].
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderStoreError>;

    async fn order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// All orders uploaded by the given customer, oldest first.
    async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderStoreError>;
}
