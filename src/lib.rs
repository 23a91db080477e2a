//! Vitals: a web service skeleton with liveness and readiness probes.
//!
//! `GET /health` reports that the process is alive; `GET /health/db` performs a
//! round trip to MySQL and reports whether the database is reachable. The
//! [`client`] module polls a running instance.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
