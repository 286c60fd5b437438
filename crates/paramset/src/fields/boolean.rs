//! Boolean fields.
//!
//! Conversion maps a fixed literal set (`"True"/"true"/"1"` and
//! `"False"/"false"/"0"`); any other text is a conversion error. Without
//! conversion the value must already be a boolean.

use crate::error::FieldError;
use crate::field::{Field, FieldType};
use crate::value::{Value, ValueKind};

const BOOL_EXPECTED: &[ValueKind] = &[ValueKind::Bool];

/// Type logic of [`BooleanField`].
#[derive(Debug, Clone, Default)]
pub struct BoolType;

impl FieldType for BoolType {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn expected(&self) -> &[ValueKind] {
        BOOL_EXPECTED
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        match value {
            Value::Bool(_) => Ok(value),
            other => Err(FieldError::new(
                "type",
                format!("value \"{other}\" is not a boolean"),
            )),
        }
    }
}

/// A boolean field with a fixed text-literal conversion set.
pub type BooleanField = Field<BoolType>;

impl Field<BoolType> {
    pub fn new() -> Self {
        Field::with_type(BoolType)
    }
}

impl Default for Field<BoolType> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_set_converts() {
        let field = BooleanField::new();
        for s in ["True", "true", "1"] {
            assert_eq!(
                field.validate_with(&Value::from(s), true).unwrap(),
                Value::Bool(true),
                "{s}"
            );
        }
        for s in ["False", "false", "0"] {
            assert_eq!(
                field.validate_with(&Value::from(s), true).unwrap(),
                Value::Bool(false),
                "{s}"
            );
        }
    }

    #[test]
    fn unknown_literal_is_a_conversion_error() {
        let field = BooleanField::new();
        let err = field.validate_with(&Value::from("wtf"), true).unwrap_err();
        assert_eq!(err.code, "type");
    }

    #[test]
    fn bool_passes_unchanged_with_or_without_convert() {
        let field = BooleanField::new();
        assert_eq!(field.validate(&Value::Bool(true)).unwrap(), Value::Bool(true));
        assert_eq!(
            field.validate_with(&Value::Bool(true), true).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn text_without_convert_fails_type_check() {
        let field = BooleanField::new();
        assert_eq!(field.validate(&Value::from("true")).unwrap_err().code, "type");
    }
}
