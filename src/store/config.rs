//! Store configuration
//!
//! Controls how identifier collisions are handled and how the document is
//! laid out on disk. Defaults reject duplicate identifiers and write an
//! indented document with an XML declaration.

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use crate::document::WriteOptions;

/// What `insert` does with an identifier that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateId`
    #[default]
    Reject,
    /// Append anyway; lookups keep returning the first record in document order
    Allow,
}

/// Configuration for a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Identifier collision policy for inserts.
    pub duplicate_ids: DuplicatePolicy,
    /// Spaces per nesting level when writing, `None` for compact output.
    pub indent: Option<usize>,
    /// Whether to write an XML declaration.
    pub xml_declaration: bool,
    /// Create missing parent directories on commit.
    pub create_dirs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            duplicate_ids: DuplicatePolicy::Reject,
            indent: Some(2),
            xml_declaration: true,
            create_dirs: true,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn with_duplicate_ids(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_ids = policy;
        self
    }

    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Write the whole document on one line.
    pub fn compact(mut self) -> Self {
        self.indent = None;
        self
    }

    pub fn without_declaration(mut self) -> Self {
        self.xml_declaration = false;
        self
    }

    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    pub(crate) fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.indent,
            declaration: self.xml_declaration,
        }
    }
}
