//! Regex compilation for static patterns.

use regex::Regex;

/// Compiles a pattern that is a compile-time constant.
///
/// # Panics
///
/// Panics if the pattern does not compile (a programming error).
pub fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pattern_compiles() {
        assert!(compile_regex_unsafe(r"(?i)^contact", "test").is_match("Contact Us"));
    }

    #[test]
    #[should_panic(expected = "programming error")]
    fn test_invalid_pattern_panics() {
        compile_regex_unsafe("(unclosed", "test");
    }
}
