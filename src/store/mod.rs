//! Record store subsystem for xmldb
//!
//! A store keeps one XML document in memory and persists it to one file.
//!
//! # Design Principles
//!
//! - Whole-document load and commit; no partial writes
//! - Mutations are invisible on disk until `commit`
//! - Identifier lookups go through an index, first match in document order
//! - Missing identifiers are errors, never silent no-ops
//! - A store that failed to open does not exist

mod config;
mod errors;
mod index;
mod persist;
mod query;
#[allow(clippy::module_inception)]
mod store;

pub use config::{DuplicatePolicy, StoreConfig};
pub use errors::{StoreError, StoreResult};
pub use query::Query;
pub use store::{RecordStore, ScanEntry};
