//! Schema type definitions
//!
//! Supported scalar kinds:
//! - string: UTF-8 string
//! - bool: Boolean
//! - char: single Unicode scalar
//! - int / uint: signed and unsigned integers of any width
//! - float: 32 or 64-bit floating point
//! - date / time / datetime: naive calendar values
//! - timestamp: RFC 3339 instant with offset
//! - uuid: RFC 4122 identifier

use std::collections::HashSet;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use super::record::Record;

/// Scalar kind of a reflected field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Bool,
    Char,
    Int,
    UInt,
    Float,
    Date,
    Time,
    DateTime,
    Timestamp,
    Uuid,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Char => "char",
            FieldType::Int => "int",
            FieldType::UInt => "uint",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Timestamp => "timestamp",
            FieldType::Uuid => "uuid",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One entry of a record type's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, also the leaf element name
    pub name: &'static str,
    /// Declared scalar kind
    pub field_type: FieldType,
    /// Whether the field may be absent (`Option<_>`)
    pub optional: bool,
}

impl FieldDef {
    /// Create a field definition. Usable in const field tables.
    pub const fn new(name: &'static str, field_type: FieldType, optional: bool) -> Self {
        Self {
            name,
            field_type,
            optional,
        }
    }
}

/// Reflected schema of a record type.
///
/// Built once per store and shared by encode, decode and update so that all
/// three agree on the same ordered field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Element name of one record
    pub type_name: &'static str,
    /// Element name of the document root (pluralized type name)
    pub collection_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Reflects `T` into a schema.
    ///
    /// # Errors
    ///
    /// - `UnconstructibleType` if `T` has no zero value
    /// - `InvalidName` if the type or a field name is not a valid element name
    /// - `DuplicateField` if a field name appears twice
    pub fn of<T: Record>() -> SchemaResult<Self> {
        if T::zero().is_none() {
            return Err(SchemaError::UnconstructibleType(T::TYPE_NAME.to_string()));
        }

        if !is_valid_element_name(T::TYPE_NAME) {
            return Err(SchemaError::InvalidName(T::TYPE_NAME.to_string()));
        }

        let mut seen = HashSet::with_capacity(T::FIELDS.len());
        for field in T::FIELDS {
            if !is_valid_element_name(field.name) {
                return Err(SchemaError::InvalidName(field.name.to_string()));
            }
            if !seen.insert(field.name) {
                return Err(SchemaError::DuplicateField {
                    type_name: T::TYPE_NAME.to_string(),
                    field: field.name.to_string(),
                });
            }
        }

        Ok(Self {
            type_name: T::TYPE_NAME,
            collection_name: collection_name(T::TYPE_NAME),
            fields: T::FIELDS.to_vec(),
        })
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// Root element name for a record type.
pub fn collection_name(type_name: &str) -> String {
    format!("{}s", type_name)
}

/// Checks the subset of the XML `Name` production we emit: a letter or `_`
/// followed by letters, digits, `_`, `-` or `.`. Colons are rejected since
/// namespaces are not supported.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConversionError;

    #[derive(Debug, Default)]
    struct Sample {
        name: String,
        age: i64,
    }

    crate::impl_record!(Sample { name: String, age: i64 });

    struct NoZero;

    impl Record for NoZero {
        const TYPE_NAME: &'static str = "NoZero";
        const FIELDS: &'static [FieldDef] = &[];

        fn field_text(&self, _field: &str) -> Option<String> {
            None
        }

        fn set_field_text(&mut self, _field: &str, _text: &str) -> Result<bool, ConversionError> {
            Ok(false)
        }
    }

    struct Twice;

    impl Record for Twice {
        const TYPE_NAME: &'static str = "Twice";
        const FIELDS: &'static [FieldDef] = &[
            FieldDef::new("a", FieldType::Int, false),
            FieldDef::new("a", FieldType::String, false),
        ];

        fn zero() -> Option<Self> {
            Some(Twice)
        }

        fn field_text(&self, _field: &str) -> Option<String> {
            None
        }

        fn set_field_text(&mut self, _field: &str, _text: &str) -> Result<bool, ConversionError> {
            Ok(false)
        }
    }

    #[test]
    fn test_schema_of_sample() {
        let schema = Schema::of::<Sample>().unwrap();
        assert_eq!(schema.type_name, "Sample");
        assert_eq!(schema.collection_name, "Samples");
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(schema.field("age").unwrap().field_type, FieldType::Int);
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_schema_is_stable() {
        let a = Schema::of::<Sample>().unwrap();
        let b = Schema::of::<Sample>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unconstructible_type() {
        let result = Schema::of::<NoZero>();
        assert_eq!(result, Err(SchemaError::UnconstructibleType("NoZero".into())));
    }

    #[test]
    fn test_duplicate_field() {
        let result = Schema::of::<Twice>();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn test_element_names() {
        assert!(is_valid_element_name("Person"));
        assert!(is_valid_element_name("_private"));
        assert!(is_valid_element_name("first-name.v2"));
        assert!(!is_valid_element_name(""));
        assert!(!is_valid_element_name("1st"));
        assert!(!is_valid_element_name("a b"));
        assert!(!is_valid_element_name("ns:tag"));
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::String.type_name(), "string");
        assert_eq!(FieldType::UInt.type_name(), "uint");
        assert_eq!(FieldType::Timestamp.to_string(), "timestamp");
    }
}
