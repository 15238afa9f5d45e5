//! Value types and small helpers shared by every crate in the loyalty points workspace.
mod points;

pub mod helpers;
mod secret;

pub use points::{Points, PointsConversionError};
pub use secret::Secret;
