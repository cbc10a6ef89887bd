//! Request validation helpers.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Accepted email shape: something, `@`, something, `.`, something.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").ok());

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Builds a validation error whose message is returned to the client as is.
pub fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Returns the trimmed value, or `None` if it is absent or blank.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL_PATTERN.is_some());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email(" Jane@X.com "));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("jane.x.com"));
        assert!(!is_valid_email("jane doe@x.com"));
    }

    #[test]
    fn blank_values_are_absent() {
        assert_eq!(present(Some("  ")), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some(" Jane ")), Some("Jane"));
    }
}
