//! Record trait and registration macros
//!
//! A record type exposes a static field table plus by-name accessors that go
//! through the scalar conversion table. Implement it by hand, or let
//! [`impl_record!`](crate::impl_record) / [`record!`](crate::record) generate
//! it from the struct's fields.

use super::errors::ConversionError;
use super::types::FieldDef;

/// A type whose instances can be stored as records.
pub trait Record: Sized {
    /// Element name of one record
    const TYPE_NAME: &'static str;

    /// Mapped fields in declaration order
    const FIELDS: &'static [FieldDef];

    /// Zero value used as the starting point for decoding.
    ///
    /// `None` marks the type as unconstructible; stores refuse to open for it.
    fn zero() -> Option<Self> {
        None
    }

    /// Canonical text of `field`, or `None` when the value is absent or the
    /// field is unknown.
    fn field_text(&self, field: &str) -> Option<String>;

    /// Parses `text` into `field` and assigns it.
    ///
    /// Returns `Ok(false)` when the type has no field by that name.
    fn set_field_text(&mut self, field: &str, text: &str) -> Result<bool, ConversionError>;
}

/// Implements [`Record`] for an existing struct.
///
/// The struct must implement `Default`, which provides the zero value. Only
/// the listed fields are mapped, in the listed order.
///
/// ```
/// #[derive(Debug, Default)]
/// struct Book {
///     title: String,
///     pages: u32,
/// }
///
/// xmldb::impl_record!(Book { title: String, pages: u32 });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($name:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::schema::Record for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            const FIELDS: &'static [$crate::schema::FieldDef] = &[
                $(
                    $crate::schema::FieldDef::new(
                        stringify!($field),
                        <$fty as $crate::schema::FieldCodec>::FIELD_TYPE,
                        <$fty as $crate::schema::FieldCodec>::OPTIONAL,
                    ),
                )*
            ];

            fn zero() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(<$name as ::std::default::Default>::default())
            }

            #[allow(unused_variables)]
            fn field_text(&self, field: &str) -> ::std::option::Option<::std::string::String> {
                match field {
                    $(stringify!($field) => $crate::schema::FieldCodec::encode(&self.$field),)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field_text(
                &mut self,
                field: &str,
                text: &str,
            ) -> ::std::result::Result<bool, $crate::schema::ConversionError> {
                match field {
                    $(
                        stringify!($field) => {
                            self.$field = <$fty as $crate::schema::FieldCodec>::decode(text)?;
                            ::std::result::Result::Ok(true)
                        }
                    )*
                    _ => ::std::result::Result::Ok(false),
                }
            }
        }
    };
}

/// Defines a struct and implements [`Record`] for it in one go.
///
/// Every field is mapped. The struct must derive or implement `Default`.
///
/// ```
/// xmldb::record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Person {
///         pub name: String,
///         pub age: i64,
///         pub email: Option<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field : $fty,
            )*
        }

        $crate::impl_record!($name { $($field : $fty),* });
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    crate::record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Gadget {
            label: String,
            weight: f64,
            serial: Option<u32>,
        }
    }

    #[test]
    fn test_generated_field_table() {
        assert_eq!(Gadget::TYPE_NAME, "Gadget");
        let names: Vec<_> = Gadget::FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["label", "weight", "serial"]);
        assert_eq!(Gadget::FIELDS[1].field_type, FieldType::Float);
        assert!(!Gadget::FIELDS[0].optional);
        assert!(Gadget::FIELDS[2].optional);
    }

    #[test]
    fn test_generated_accessors() {
        let mut gadget = Gadget::zero().unwrap();
        assert!(gadget.set_field_text("label", "widget").unwrap());
        assert!(gadget.set_field_text("weight", "1.25").unwrap());
        assert!(!gadget.set_field_text("colour", "red").unwrap());

        assert_eq!(gadget.field_text("label").as_deref(), Some("widget"));
        assert_eq!(gadget.field_text("weight").as_deref(), Some("1.25"));
        assert_eq!(gadget.field_text("serial"), None);
        assert_eq!(gadget.field_text("colour"), None);
    }

    #[test]
    fn test_set_field_reports_conversion_failure() {
        let mut gadget = Gadget::default();
        let err = gadget.set_field_text("weight", "heavy").unwrap_err();
        assert_eq!(err.expected, "float");
        assert_eq!(err.raw, "heavy");
    }
}
