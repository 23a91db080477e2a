//! HTTP server module.
//!
//! Plain HTTP only; TLS is expected to terminate at the load balancer in front
//! of the service. The server shuts down gracefully on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{listen_addr, start_server, ServerError};
