//! Schema reflection subsystem for xmldb
//!
//! Produces the ordered field table of a record type. The same table drives
//! encoding, decoding and in-place updates, so all three always agree on
//! field names and order.
//!
//! # Design Principles
//!
//! - Field tables are static (`Record::FIELDS`), never discovered at runtime
//! - Conversions go through a closed table keyed by the field's static type
//! - Failed conversions are typed errors, never silent coercion
//! - Zero-value construction is checked once, when a store opens

mod codec;
mod errors;
mod record;
mod types;

pub use codec::FieldCodec;
pub use errors::{ConversionError, SchemaError, SchemaResult};
pub use record::Record;
pub use types::{collection_name, is_valid_element_name, FieldDef, FieldType, Schema};
