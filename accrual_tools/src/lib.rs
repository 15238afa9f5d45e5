//! Client tooling for the external accrual service.
//!
//! The accrual service calculates the loyalty reward for a purchase order. This crate exposes a single read
//! operation against it, `GET /api/orders/{number}`, and maps the service's status codes onto
//! [`AccrualApiError`] variants so that callers can tell "rate limited" and "no data yet" apart from real failures.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::AccrualApi;
pub use config::{normalize_endpoint, AccrualApiConfig};
pub use data_objects::{AccrualResponse, AccrualStatus};
pub use error::AccrualApiError;
