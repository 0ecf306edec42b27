//! Document subsystem for xmldb
//!
//! Holds the element tree that a store keeps in memory, the XML codec that
//! moves it to and from text, and the mapper that turns records into
//! elements and back.

mod errors;
mod mapper;
mod node;
pub mod xml;

pub use errors::{DocumentError, DocumentResult, MappingError, MappingResult};
pub use mapper::{DocumentMapper, ID_ATTRIBUTE};
pub use node::Element;
pub use xml::WriteOptions;
