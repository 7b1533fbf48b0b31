//! Snaplink - A URL shortener service with click analytics
//!
//! This library provides the core functionality for the Snaplink service:
//! issuing short slugs, redirecting visitors, and aggregating click
//! statistics.
//!
//! # Architecture
//! - `storage`: SeaORM storage backend and data access
//! - `cache`: Read-through link cache
//! - `analytics`: Click buffering and statistics aggregation
//! - `api`: HTTP services and routes
//! - `services`: Business logic shared by the handlers
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle
//! - `system`: Logging and system utilities

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
