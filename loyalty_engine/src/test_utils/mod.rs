//! Helpers for tests: in-memory fakes of the engine's collaborators, and SQLite test database setup.
pub mod fakes;
#[cfg(feature = "sqlite")]
pub mod prepare_env;
