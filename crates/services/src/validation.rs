//! # Input Validation
//!
//! The required-text rule every service shares: trim, reject empty,
//! reject anything over the configured ceiling. Values are stored
//! trimmed, so what validation accepted is exactly what persists.

use domains::error::{PlatformError, Result};

/// Validates a required text field against its length ceiling (in
/// characters, not bytes) and returns the trimmed value to store.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlatformError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(PlatformError::Validation(format!(
            "{field} exceeds {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_returns_the_stored_form() {
        assert_eq!(require_text("title", "  hello  ", 10).unwrap(), "hello");
    }

    #[test]
    fn empty_after_trim_is_required() {
        let err = require_text("title", "   ", 10).unwrap_err();
        assert_eq!(
            err,
            PlatformError::Validation("title is required".into())
        );
    }

    #[test]
    fn ceiling_counts_characters_not_bytes() {
        // Four characters, twelve bytes.
        assert!(require_text("name", "日本語字", 4).is_ok());
        let err = require_text("name", "日本語字", 3).unwrap_err();
        assert!(matches!(err, PlatformError::Validation(_)));
    }

    #[test]
    fn exact_limit_passes() {
        assert!(require_text("note", "abcde", 5).is_ok());
        assert!(require_text("note", "abcdef", 5).is_err());
    }
}
