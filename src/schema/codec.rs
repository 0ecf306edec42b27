//! Scalar conversion table
//!
//! Every field type maps to exactly one text form. Encoding never fails;
//! decoding returns a typed [`ConversionError`] instead of coercing.
//! All formats round-trip losslessly:
//! - floats use Rust's shortest round-trip formatting
//! - naive date/time values use ISO 8601 with full sub-second precision
//! - timestamps use RFC 3339 with full sub-second precision, with a signed
//!   widened year outside 0..=9999

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone,
    Utc,
};
use uuid::Uuid;

use super::errors::ConversionError;
use super::types::FieldType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const EXTENDED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Conversion between a field value and its leaf text.
pub trait FieldCodec: Sized {
    /// Scalar kind reported in the field table
    const FIELD_TYPE: FieldType;

    /// Whether the value may be absent
    const OPTIONAL: bool = false;

    /// Canonical text form, `None` for an absent value.
    fn encode(&self) -> Option<String>;

    /// Parses a leaf's text.
    fn decode(text: &str) -> Result<Self, ConversionError>;
}

impl FieldCodec for String {
    const FIELD_TYPE: FieldType = FieldType::String;

    fn encode(&self) -> Option<String> {
        Some(self.clone())
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }
}

impl FieldCodec for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn encode(&self) -> Option<String> {
        Some(self.to_string())
    }

    /// Accepts any letter case so that `True`/`FALSE` written by other
    /// tools still load.
    fn decode(text: &str) -> Result<Self, ConversionError> {
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConversionError::new(
                FieldType::Bool.type_name(),
                text,
                "expected 'true' or 'false'",
            ))
        }
    }
}

impl FieldCodec for char {
    const FIELD_TYPE: FieldType = FieldType::Char;

    fn encode(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        text.parse::<char>()
            .map_err(|e| ConversionError::new(FieldType::Char.type_name(), text, e))
    }
}

macro_rules! from_str_codec {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FieldCodec for $ty {
                const FIELD_TYPE: FieldType = $kind;

                fn encode(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn decode(text: &str) -> Result<Self, ConversionError> {
                    text.parse::<$ty>()
                        .map_err(|e| ConversionError::new($kind.type_name(), text, e))
                }
            }
        )+
    };
}

from_str_codec!(FieldType::Int => i8, i16, i32, i64, i128, isize);
from_str_codec!(FieldType::UInt => u8, u16, u32, u64, u128, usize);
from_str_codec!(FieldType::Float => f32, f64);
from_str_codec!(FieldType::Uuid => Uuid);

impl FieldCodec for NaiveDate {
    const FIELD_TYPE: FieldType = FieldType::Date;

    fn encode(&self) -> Option<String> {
        Some(self.format(DATE_FORMAT).to_string())
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|e| ConversionError::new(FieldType::Date.type_name(), text, e))
    }
}

impl FieldCodec for NaiveTime {
    const FIELD_TYPE: FieldType = FieldType::Time;

    fn encode(&self) -> Option<String> {
        Some(self.format(TIME_FORMAT).to_string())
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        NaiveTime::parse_from_str(text, TIME_FORMAT)
            .map_err(|e| ConversionError::new(FieldType::Time.type_name(), text, e))
    }
}

impl FieldCodec for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::DateTime;

    fn encode(&self) -> Option<String> {
        Some(self.format(DATETIME_FORMAT).to_string())
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map_err(|e| ConversionError::new(FieldType::DateTime.type_name(), text, e))
    }
}

impl FieldCodec for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::Timestamp;

    fn encode(&self) -> Option<String> {
        Some(format_timestamp(self, true))
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        parse_timestamp(text).map(|dt| dt.with_timezone(&Utc))
    }
}

impl FieldCodec for DateTime<FixedOffset> {
    const FIELD_TYPE: FieldType = FieldType::Timestamp;

    fn encode(&self) -> Option<String> {
        Some(format_timestamp(self, false))
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        parse_timestamp(text)
    }
}

/// RFC 3339 only covers years 0..=9999; other years use the same layout
/// with a signed, widened year.
fn format_timestamp<Tz>(value: &DateTime<Tz>, use_z: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if (0..=9999).contains(&value.year()) {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, use_z)
    } else {
        value.format(EXTENDED_TIMESTAMP_FORMAT).to_string()
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|e| DateTime::parse_from_str(text, EXTENDED_TIMESTAMP_FORMAT).map_err(|_| e))
        .map_err(|e| ConversionError::new(FieldType::Timestamp.type_name(), text, e))
}

/// Absent values encode as `None` and are written as an empty leaf; an
/// empty leaf decodes back to `None`.
impl<T: FieldCodec> FieldCodec for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const OPTIONAL: bool = true;

    fn encode(&self) -> Option<String> {
        self.as_ref().and_then(T::encode)
    }

    fn decode(text: &str) -> Result<Self, ConversionError> {
        if text.is_empty() {
            Ok(None)
        } else {
            T::decode(text).map(Some)
        }
    }
}
