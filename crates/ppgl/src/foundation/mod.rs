//! Foundation module - Core utilities shared by the facades
//!
//! - Logging utilities

pub mod logging;
