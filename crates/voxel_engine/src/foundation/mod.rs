//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Logging utilities
//! - Handle storage and frame timing

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
