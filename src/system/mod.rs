//! System-level modules
//!
//! This module contains system-level functionality:
//! - Logging initialization

pub mod logging;
