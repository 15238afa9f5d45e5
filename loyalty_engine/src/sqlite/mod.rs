//! SQLite storage backend for orders.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
