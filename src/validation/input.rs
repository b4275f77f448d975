//! Identifier validation for mapping documents.
//!
//! Table and column names must be plain identifiers before they are quoted
//! into generated statements.

use thiserror::Error;

/// Maximum length for table and column names
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} '{value}' contains invalid characters: {reason}")]
    InvalidCharacters {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Input has invalid format
    #[error("{field} '{value}' {reason}")]
    InvalidFormat {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a table or column name.
///
/// # Rules
///
/// - Must not be empty
/// - Must not exceed 255 characters
/// - Must start with a letter or underscore
/// - May contain letters, digits, underscores, and hyphens
///
/// # Examples
///
/// ```
/// use listing_normalizer::validation::input::validate_identifier;
///
/// assert!(validate_identifier("table name", "car_feature").is_ok());
/// assert!(validate_identifier("column name", "").is_err());
/// assert!(validate_identifier("column name", "1st").is_err());
/// ```
pub fn validate_identifier(field: &'static str, name: &str) -> ValidationResult<()> {
    let Some(first_char) = name.chars().next() else {
        return Err(ValidationError::Empty(field));
    };

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_IDENTIFIER_LENGTH,
            actual: name.len(),
        });
    }

    if !first_char.is_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidFormat {
            field,
            value: name.to_string(),
            reason: "must start with a letter or underscore",
        });
    }

    if let Some(c) = name
        .chars()
        .find(|c| !c.is_alphanumeric() && *c != '_' && *c != '-')
    {
        return Err(ValidationError::InvalidCharacters {
            field,
            value: name.to_string(),
            reason: format!("invalid character: '{}'", c),
        });
    }

    Ok(())
}

/// Validate a source name.
///
/// Source names are embedded as string literals, so any non-blank text is
/// accepted.
pub fn validate_source_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("source name"));
    }
    Ok(())
}
