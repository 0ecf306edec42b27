//! Document error types
//!
//! Two families:
//! - `DocumentError`: the XML text could not be read or written
//! - `MappingError`: a record could not be mapped to or from an element

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for XML codec operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for record mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// XML codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The underlying XML reader or writer failed
    #[error("XML error at byte {position}: {message}")]
    Xml { position: usize, message: String },

    /// Well-formed tokens that do not form a single-rooted document
    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl DocumentError {
    pub(crate) fn xml(position: usize, message: impl ToString) -> Self {
        DocumentError::Xml {
            position,
            message: message.to_string(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        DocumentError::Malformed(message.into())
    }
}

/// Record mapping errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A leaf's text cannot convert to the field's declared type
    #[error("Field '{type_name}.{field}': cannot convert '{raw}' to {expected}: {reason}")]
    FieldConversion {
        type_name: String,
        field: String,
        raw: String,
        expected: &'static str,
        reason: String,
    },

    /// A record element lacks the leaf for a field
    #[error("Element '{type_name}' has no leaf for field '{field}'")]
    MissingFieldNode { type_name: String, field: String },

    /// Element name does not match the record type
    #[error("Expected element '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    /// The record type has no zero value to decode into
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
