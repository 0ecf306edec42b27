//! Schema error types
//!
//! Raised while reflecting a record type into its field table, and by the
//! scalar conversion table when a stored text cannot become a field value.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors produced while reflecting a record type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The type has no zero-value construction path.
    #[error("Type '{0}' cannot be constructed without arguments")]
    UnconstructibleType(String),

    /// Two fields in one field table share a name.
    #[error("Type '{type_name}' declares field '{field}' more than once")]
    DuplicateField { type_name: String, field: String },

    /// A type or field name cannot be used as an XML element name.
    #[error("'{0}' is not a valid element name")]
    InvalidName(String),
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnconstructibleType(_) => "XMLDB_UNCONSTRUCTIBLE_TYPE",
            SchemaError::DuplicateField { .. } => "XMLDB_DUPLICATE_FIELD",
            SchemaError::InvalidName(_) => "XMLDB_INVALID_NAME",
        }
    }
}

/// A stored text that could not be converted to a field's declared type.
///
/// The field name is attached by the document mapper, which knows which
/// leaf the text came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{raw}' to {expected}: {reason}")]
pub struct ConversionError {
    /// Name of the target scalar type
    pub expected: &'static str,
    /// The raw text that failed to convert
    pub raw: String,
    /// Parser message
    pub reason: String,
}

impl ConversionError {
    pub fn new(expected: &'static str, raw: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            expected,
            raw: raw.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaError::UnconstructibleType("Person".into()).code(),
            "XMLDB_UNCONSTRUCTIBLE_TYPE"
        );
        assert_eq!(SchemaError::InvalidName("1abc".into()).code(), "XMLDB_INVALID_NAME");
    }

    #[test]
    fn test_conversion_error_display() {
        let err = ConversionError::new("int", "abc", "invalid digit found in string");
        let display = err.to_string();
        assert!(display.contains("abc"));
        assert!(display.contains("int"));
    }
}
