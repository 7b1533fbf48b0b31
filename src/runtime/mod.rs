//! Application runtime
//!
//! This module contains the application lifecycle:
//! - HTTP server startup
//! - Graceful shutdown handling

pub mod server;
pub mod shutdown;

pub use server::run_server;
