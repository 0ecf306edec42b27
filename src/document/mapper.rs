//! Record <-> element mapping
//!
//! A record element is named after the record type, carries the identifier
//! in an `ID` attribute and has one leaf per reflected field, in field table
//! order. Absent values are written as empty leaves.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use super::errors::{MappingError, MappingResult};
use super::node::Element;
use crate::schema::{Record, Schema, SchemaError, SchemaResult};

/// Attribute holding a record's identifier
pub const ID_ATTRIBUTE: &str = "ID";

/// Maps records of type `T` to and from document elements.
pub struct DocumentMapper<T: Record> {
    schema: Schema,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> DocumentMapper<T> {
    /// Reflects `T` and builds a mapper for it.
    ///
    /// # Errors
    ///
    /// Any `SchemaError` from reflection, including `UnconstructibleType`.
    pub fn new() -> SchemaResult<Self> {
        Ok(Self {
            schema: Schema::of::<T>()?,
            _record: PhantomData,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Identifier of a record element, if it has one
    pub fn identifier(element: &Element) -> Option<&str> {
        element.attribute(ID_ATTRIBUTE)
    }

    /// Builds the element for `record` under `id`.
    pub fn encode(&self, record: &T, id: &str) -> Element {
        let mut element = Element::new(self.schema.type_name).with_attribute(ID_ATTRIBUTE, id);
        for field in &self.schema.fields {
            let text = record.field_text(field.name).unwrap_or_default();
            element.push_child(Element::leaf(field.name, text));
        }
        element
    }

    /// Builds a record from an element.
    ///
    /// An element of another type yields the zero value. Fields without a
    /// matching leaf keep their zero value.
    ///
    /// # Errors
    ///
    /// `FieldConversion` if a leaf's text does not parse as its field's type.
    pub fn decode(&self, element: &Element) -> MappingResult<T> {
        if element.name() != self.schema.type_name {
            debug!(
                expected = self.schema.type_name,
                found = element.name(),
                "element name does not match record type, returning zero value"
            );
            return self.zero();
        }
        self.decode_fields(element)
    }

    /// Like [`decode`](Self::decode), but an element of another type is a
    /// `TypeMismatch` error.
    pub fn decode_strict(&self, element: &Element) -> MappingResult<T> {
        if element.name() != self.schema.type_name {
            return Err(MappingError::TypeMismatch {
                expected: self.schema.type_name.to_string(),
                found: element.name().to_string(),
            });
        }
        self.decode_fields(element)
    }

    fn decode_fields(&self, element: &Element) -> MappingResult<T> {
        let mut record = self.zero()?;
        for field in &self.schema.fields {
            let Some(leaf) = element.child(field.name) else {
                debug!(
                    record_type = self.schema.type_name,
                    field = field.name,
                    "record element has no leaf for field, keeping zero value"
                );
                continue;
            };
            record
                .set_field_text(field.name, leaf.text())
                .map_err(|e| MappingError::FieldConversion {
                    type_name: self.schema.type_name.to_string(),
                    field: field.name.to_string(),
                    raw: e.raw,
                    expected: e.expected,
                    reason: e.reason,
                })?;
        }
        Ok(record)
    }

    /// Overwrites the leaves of `element` with the present values of `record`.
    ///
    /// Absent values leave their leaf untouched. The element is only modified
    /// once every present value is known to have a leaf.
    ///
    /// # Errors
    ///
    /// `MissingFieldNode` if a present value has no leaf to write into.
    pub fn update_in_place(&self, element: &mut Element, record: &T) -> MappingResult<()> {
        let mut updates = Vec::with_capacity(self.schema.fields.len());
        for field in &self.schema.fields {
            if let Some(text) = record.field_text(field.name) {
                if element.child(field.name).is_none() {
                    return Err(MappingError::MissingFieldNode {
                        type_name: self.schema.type_name.to_string(),
                        field: field.name.to_string(),
                    });
                }
                updates.push((field.name, text));
            }
        }

        for (name, text) in updates {
            if let Some(leaf) = element.child_mut(name) {
                leaf.set_text(text);
            }
        }
        Ok(())
    }

    fn zero(&self) -> MappingResult<T> {
        T::zero().ok_or_else(|| {
            MappingError::Schema(SchemaError::UnconstructibleType(
                self.schema.type_name.to_string(),
            ))
        })
    }
}

impl<T: Record> fmt::Debug for DocumentMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentMapper")
            .field("schema", &self.schema)
            .finish()
    }
}
