//! Application configuration and constants.
//!
//! This module provides:
//! - Policy constants (score threshold, cache ages, cooldowns, timeouts)
//! - Logging option types shared with the CLI
//! - Resolver settings and the library `Config`

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Config, ConfigValidationError, LogFormat, LogLevel, ModalProbe, ResolverSettings,
};
