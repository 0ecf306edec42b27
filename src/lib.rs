//! xmldb - A typed, file-backed XML record store
//!
//! Records of a caller-defined type are mapped field by field to XML
//! elements, indexed by a caller-supplied identifier, and persisted as one
//! document per store.
//!
//! ```no_run
//! use xmldb::{record, RecordStore};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: u32,
//!     }
//! }
//!
//! # fn main() -> xmldb::StoreResult<()> {
//! let mut store = RecordStore::<Person>::create("people.xml")?;
//! store.insert("p1", &Person { name: "Ann".into(), age: 41 })?;
//! store.commit()?;
//!
//! let ann = store.read("p1")?;
//! assert_eq!(ann.age, 41);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod schema;
pub mod store;

pub use document::{DocumentMapper, Element};
pub use schema::{FieldCodec, Record, Schema};
pub use store::{DuplicatePolicy, Query, RecordStore, StoreConfig, StoreError, StoreResult};
