//! Store error types
//!
//! Error codes:
//! - XMLDB_STORE_NOT_FOUND (FATAL) - load of a missing file
//! - XMLDB_UNCONSTRUCTIBLE_TYPE (FATAL) - record type has no zero value
//! - XMLDB_MALFORMED_DOCUMENT (FATAL) - file is not valid XML
//! - XMLDB_SERIALIZE_FAILED - in-memory document could not be written out
//! - XMLDB_NOT_FOUND - no record with the identifier
//! - XMLDB_DUPLICATE_ID - insert of an identifier already present
//! - XMLDB_FIELD_CONVERSION - stored text does not fit its field
//! - XMLDB_MISSING_FIELD_NODE - record element lacks a field leaf
//! - XMLDB_IO_ERROR - file system failure

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::{DocumentError, MappingError};
use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Load requested for a path that is not an existing file
    #[error("Store file not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    /// No record with this identifier
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Insert of an identifier that is already present
    #[error("Record already exists: {0}")]
    DuplicateId(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Commit could not serialize the in-memory document
    #[error("Cannot serialize document for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// Configuration text could not be parsed
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::StoreNotFound(_) => "XMLDB_STORE_NOT_FOUND",
            StoreError::NotFound(_) => "XMLDB_NOT_FOUND",
            StoreError::DuplicateId(_) => "XMLDB_DUPLICATE_ID",
            StoreError::Io { .. } => "XMLDB_IO_ERROR",
            StoreError::Schema(e) => e.code(),
            StoreError::Document(_) => "XMLDB_MALFORMED_DOCUMENT",
            StoreError::Serialize { .. } => "XMLDB_SERIALIZE_FAILED",
            StoreError::Mapping(MappingError::FieldConversion { .. }) => "XMLDB_FIELD_CONVERSION",
            StoreError::Mapping(MappingError::MissingFieldNode { .. }) => {
                "XMLDB_MISSING_FIELD_NODE"
            }
            StoreError::Mapping(MappingError::TypeMismatch { .. }) => "XMLDB_TYPE_MISMATCH",
            StoreError::Mapping(MappingError::Schema(e)) => e.code(),
            StoreError::Config(_) => "XMLDB_INVALID_CONFIG",
        }
    }

    /// Whether the error prevents a store from being opened at all.
    ///
    /// Fatal errors only come out of `create`/`load`. `Document` is the
    /// parse failure of a file being loaded; failures during `commit` are
    /// reported as `Io` or `Serialize` and leave the store usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::StoreNotFound(_)
                | StoreError::Schema(_)
                | StoreError::Document(_)
                | StoreError::Mapping(MappingError::Schema(_))
        )
    }

    /// Whether the error is a missing identifier
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            StoreError::StoreNotFound(PathBuf::from("/x")).code(),
            "XMLDB_STORE_NOT_FOUND"
        );
        assert_eq!(StoreError::NotFound("a".into()).code(), "XMLDB_NOT_FOUND");
        assert_eq!(
            StoreError::from(SchemaError::UnconstructibleType("T".into())).code(),
            "XMLDB_UNCONSTRUCTIBLE_TYPE"
        );
        assert_eq!(
            StoreError::from(MappingError::MissingFieldNode {
                type_name: "T".into(),
                field: "f".into(),
            })
            .code(),
            "XMLDB_MISSING_FIELD_NODE"
        );
    }

    #[test]
    fn test_fatality() {
        assert!(StoreError::StoreNotFound(PathBuf::from("/x")).is_fatal());
        assert!(StoreError::from(SchemaError::UnconstructibleType("T".into())).is_fatal());
        assert!(!StoreError::NotFound("a".into()).is_fatal());
        assert!(!StoreError::DuplicateId("a".into()).is_fatal());
    }

    #[test]
    fn test_commit_failures_are_not_fatal() {
        let parse = StoreError::from(DocumentError::Malformed("no root".into()));
        assert!(parse.is_fatal());

        let serialize = StoreError::Serialize {
            path: PathBuf::from("/data/people.xml"),
            source: DocumentError::Malformed("bad element".into()),
        };
        assert!(!serialize.is_fatal());
        assert_eq!(serialize.code(), "XMLDB_SERIALIZE_FAILED");
        assert!(serialize.to_string().contains("/data/people.xml"));

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(!StoreError::io("/data/people.xml", denied).is_fatal());
    }

    #[test]
    fn test_display_includes_path() {
        let err = StoreError::StoreNotFound(PathBuf::from("/data/people.xml"));
        assert!(err.to_string().contains("/data/people.xml"));
    }
}
