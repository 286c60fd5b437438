//! UUID-string fields.
//!
//! The value must parse as a UUID; the original string is returned on
//! success, not a UUID object, so downstream code keeps the caller's
//! formatting.

use crate::error::FieldError;
use crate::field::{Field, FieldType};
use crate::value::{Value, ValueKind};
use uuid::Uuid;

const UUID_EXPECTED: &[ValueKind] = &[ValueKind::Str];

/// Type logic of [`UuidStrField`].
#[derive(Debug, Clone, Default)]
pub struct UuidStrType;

impl FieldType for UuidStrType {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn expected(&self) -> &[ValueKind] {
        UUID_EXPECTED
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        match &value {
            Value::Str(s) => match Uuid::parse_str(s) {
                Ok(_) => Ok(value),
                Err(e) => Err(FieldError::new(
                    "uuid",
                    format!("invalid uuid string: {e}"),
                )),
            },
            other => Err(FieldError::new(
                "type",
                format!("value \"{other}\" is not a string"),
            )),
        }
    }
}

/// A field validating that text parses as a UUID, returned as the original
/// string.
pub type UuidStrField = Field<UuidStrType>;

impl Field<UuidStrType> {
    pub fn new() -> Self {
        Field::with_type(UuidStrType)
    }
}

impl Default for Field<UuidStrType> {
    fn default() -> Self {
        Self::new()
    }
}
