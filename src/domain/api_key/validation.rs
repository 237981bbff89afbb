//! API key name validation

use thiserror::Error;

/// Errors that can occur while validating a key name
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyNameValidationError {
    #[error("Name is required")]
    Empty,

    #[error("Name must be at most {0} characters")]
    TooLong(usize),
}

pub const MAX_KEY_NAME_LENGTH: usize = 50;

/// Validate a key name and return it trimmed
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 50 characters after trimming
pub fn validate_key_name(name: &str) -> Result<&str, KeyNameValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(KeyNameValidationError::Empty);
    }

    if trimmed.chars().count() > MAX_KEY_NAME_LENGTH {
        return Err(KeyNameValidationError::TooLong(MAX_KEY_NAME_LENGTH));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(validate_key_name("default"), Ok("default"));
        assert_eq!(validate_key_name("new-api-key"), Ok("new-api-key"));
        assert_eq!(validate_key_name("  cli  "), Ok("cli"));
        assert_eq!(validate_key_name("my key 2"), Ok("my key 2"));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_key_name(""), Err(KeyNameValidationError::Empty));
        assert_eq!(validate_key_name("   "), Err(KeyNameValidationError::Empty));
        assert_eq!(validate_key_name("\t\n"), Err(KeyNameValidationError::Empty));
    }

    #[test]
    fn test_too_long_name() {
        let long_name = "a".repeat(51);
        assert_eq!(
            validate_key_name(&long_name),
            Err(KeyNameValidationError::TooLong(50))
        );
    }

    #[test]
    fn test_max_length_counts_chars() {
        assert!(validate_key_name(&"a".repeat(50)).is_ok());
        assert!(validate_key_name(&"é".repeat(50)).is_ok());
    }
}
