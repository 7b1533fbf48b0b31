//! Service layer for business logic
//!
//! This module provides unified business logic shared by the HTTP
//! handlers: link creation/resolution and analytics aggregation.

mod analytics_service;
mod link_service;

pub use analytics_service::*;
pub use link_service::*;
