//! HTTP API layer
//!
//! Handler services and route builders for the public HTTP surface.

pub mod services;
