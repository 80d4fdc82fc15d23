//! ttcardgen Common Utilities
//!
//! Shared infrastructure for all ttcardgen crates:
//! - Error types and result aliases
//! - INI-style key/value documents
//! - User settings (search paths for templates, images and fonts)
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod ini;
pub mod logging;

pub use config::*;
pub use error::*;
