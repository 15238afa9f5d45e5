//! # Loyalty server
//! The server process of the loyalty points backend. It is responsible for:
//! * Opening (and if needed, creating and migrating) the order database.
//! * Running the accrual sync engine, which keeps every uploaded order in step with the external accrual service.
//! * Serving a small operations API.
//!
//! ## Configuration
//! The server is configured via command line arguments, with environment variables as fallbacks. See
//! [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/sync/stats`: Counters from the accrual sync engine, as JSON.
pub mod accrual_worker;
pub mod cli;
pub mod config;
pub mod errors;
pub mod routes;
pub mod server;
