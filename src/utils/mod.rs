//! Utility functions.
//!
//! This module provides:
//! - CSS selector parsing utilities
//! - Regex compilation for static patterns

mod pattern;
mod selector;

pub use pattern::compile_regex_unsafe;
pub use selector::parse_selector_with_fallback;
