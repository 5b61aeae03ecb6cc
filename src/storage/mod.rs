//! Persistence helpers shared by the contact-page cache and the submission history.
//!
//! This module provides:
//! - Whole-file JSON load/save with forgiving reads and atomic writes
//! - Store key normalization

mod json;

pub(crate) use json::{load_records, write_records};

/// Normalizes a store key (dealer id or slug).
///
/// Keys are compared case-insensitively and ignoring surrounding whitespace, so
/// `" Acme-Motors "` and `"acme-motors"` address the same record.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_trims_and_lowercases() {
        assert_eq!(normalize_key("  Acme-Motors\t"), "acme-motors");
        assert_eq!(normalize_key("acme-motors"), "acme-motors");
    }

    #[test]
    fn test_normalize_key_keeps_inner_characters() {
        assert_eq!(normalize_key("Bob's Autos_2"), "bob's autos_2");
    }
}
