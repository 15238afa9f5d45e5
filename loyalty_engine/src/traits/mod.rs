//! # Storage and collaborator contracts
//!
//! The accrual engine never talks to a database or to the accrual service directly. It is written against the
//! traits in this module, so that backends (and test doubles) can be swapped freely.
//!
//! * [`AccrualOrderStore`] is the narrow interface the reconciliation engine needs: list the orders that still await
//!   a verdict, and persist a verdict for one order.
//! * [`OrderManagement`] covers the rest of the order life cycle that the storage backend exposes: registering
//!   uploaded order numbers and looking orders up.
//! * [`AccrualQuery`] is the single read operation against the external accrual service.
mod accrual_query;
mod order_management;
mod order_store;

mod data_objects;

pub use accrual_query::{AccrualQuery, AccrualQueryError};
pub use data_objects::InsertOrderResult;
pub use order_management::OrderManagement;
pub use order_store::{AccrualOrderStore, OrderStoreError};
