//! Datetime fields.
//!
//! A datetime field requires a strptime-style format at construction and
//! parses text through it; date-only formats resolve to midnight. An
//! already-parsed datetime value passes unchanged.

use crate::error::FieldError;
use crate::field::{Field, FieldType};
use crate::value::{Value, ValueKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_EXPECTED: &[ValueKind] = &[ValueKind::Datetime];

/// Type logic of [`DatetimeField`].
#[derive(Debug, Clone)]
pub struct DatetimeType {
    format: String,
}

impl DatetimeType {
    fn parse(&self, s: &str) -> Result<NaiveDateTime, FieldError> {
        NaiveDateTime::parse_from_str(s, &self.format)
            .or_else(|_| {
                NaiveDate::parse_from_str(s, &self.format).map(|d| d.and_time(NaiveTime::MIN))
            })
            .map_err(|_| {
                FieldError::new(
                    "datetime",
                    format!(
                        "could not convert \"{s}\" to datetime by format {}",
                        self.format
                    ),
                )
            })
    }
}

impl FieldType for DatetimeType {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn expected(&self) -> &[ValueKind] {
        DATETIME_EXPECTED
    }

    fn convert(&self, value: Value) -> Result<Value, FieldError> {
        self.validate_type(value, false)
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        match &value {
            Value::Datetime(_) => Ok(value),
            Value::Str(s) => self.parse(s).map(Value::Datetime),
            other => Err(FieldError::new(
                "type",
                format!("value \"{other}\" is not a datetime or datetime string"),
            )),
        }
    }
}

/// A field parsing text into a datetime through a fixed format.
pub type DatetimeField = Field<DatetimeType>;

impl Field<DatetimeType> {
    /// Panics if the format string is empty.
    pub fn new(format: impl Into<String>) -> Self {
        let format = format.into();
        assert!(
            !format.is_empty(),
            "DatetimeField requires a format string"
        );
        Field::with_type(DatetimeType { format })
    }
}
