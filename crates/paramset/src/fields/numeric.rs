//! Integer and float fields.
//!
//! Both attempt a numeric parse during type validation (so `"1"` passes an
//! integer field even without the convert flag) and then apply inclusive
//! min/max bounds. Bound mismatches are configuration errors and panic at
//! construction.

use crate::coerce;
use crate::error::FieldError;
use crate::field::{Field, FieldType};
use crate::value::{Value, ValueKind};

const INT_EXPECTED: &[ValueKind] = &[ValueKind::Int];
const FLOAT_EXPECTED: &[ValueKind] = &[ValueKind::Float];

/// Type logic of [`IntegerField`].
#[derive(Debug, Clone, Default)]
pub struct IntType {
    min: Option<i64>,
    max: Option<i64>,
}

impl FieldType for IntType {
    fn name(&self) -> &'static str {
        "int"
    }

    fn expected(&self) -> &[ValueKind] {
        INT_EXPECTED
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        let parsed = coerce::coerce(&value, ValueKind::Int).map_err(|reason| {
            FieldError::new(
                "type",
                format!("could not convert value \"{value}\" into int type ({reason})"),
            )
        })?;
        let Value::Int(n) = parsed else {
            return Err(FieldError::new("type", "value is not an integer"));
        };

        if let Some(min) = self.min {
            if n < min {
                return Err(FieldError::new(
                    "range",
                    format!("value is too small, min {min}"),
                )
                .param("min", min)
                .param("actual", n));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(FieldError::new(
                    "range",
                    format!("value is too big, max {max}"),
                )
                .param("max", max)
                .param("actual", n));
            }
        }

        Ok(Value::Int(n))
    }
}

/// An integer field with optional inclusive bounds.
pub type IntegerField = Field<IntType>;

impl Field<IntType> {
    pub fn new() -> Self {
        Field::with_type(IntType::default())
    }

    /// Panics if a previously set max is smaller.
    pub fn min(mut self, min: i64) -> Self {
        let ty = self.ty_mut();
        if let Some(max) = ty.max {
            assert!(min <= max, "integer bounds must satisfy min <= max");
        }
        ty.min = Some(min);
        self
    }

    /// Panics if a previously set min is larger.
    pub fn max(mut self, max: i64) -> Self {
        let ty = self.ty_mut();
        if let Some(min) = ty.min {
            assert!(min <= max, "integer bounds must satisfy min <= max");
        }
        ty.max = Some(max);
        self
    }
}

impl Default for Field<IntType> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type logic of [`FloatField`].
#[derive(Debug, Clone, Default)]
pub struct FloatType {
    min: Option<f64>,
    max: Option<f64>,
}

impl FieldType for FloatType {
    fn name(&self) -> &'static str {
        "float"
    }

    fn expected(&self) -> &[ValueKind] {
        FLOAT_EXPECTED
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        let parsed = coerce::coerce(&value, ValueKind::Float).map_err(|reason| {
            FieldError::new(
                "type",
                format!("could not convert value \"{value}\" into float type ({reason})"),
            )
        })?;
        let Value::Float(n) = parsed else {
            return Err(FieldError::new("type", "value is not a number"));
        };

        if let Some(min) = self.min {
            if n < min {
                return Err(FieldError::new(
                    "range",
                    format!("value is too small, min {min}"),
                )
                .param("min", min)
                .param("actual", n));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(FieldError::new(
                    "range",
                    format!("value is too big, max {max}"),
                )
                .param("max", max)
                .param("actual", n));
            }
        }

        Ok(Value::Float(n))
    }
}

/// A float field with optional inclusive bounds.
pub type FloatField = Field<FloatType>;

impl Field<FloatType> {
    pub fn new() -> Self {
        Field::with_type(FloatType::default())
    }

    /// Panics on a non-finite bound or if a previously set max is smaller.
    pub fn min(mut self, min: f64) -> Self {
        assert!(min.is_finite(), "float bounds must be finite");
        let ty = self.ty_mut();
        if let Some(max) = ty.max {
            assert!(min <= max, "float bounds must satisfy min <= max");
        }
        ty.min = Some(min);
        self
    }

    /// Panics on a non-finite bound or if a previously set min is larger.
    pub fn max(mut self, max: f64) -> Self {
        assert!(max.is_finite(), "float bounds must be finite");
        let ty = self.ty_mut();
        if let Some(min) = ty.min {
            assert!(min <= max, "float bounds must satisfy min <= max");
        }
        ty.max = Some(max);
        self
    }
}

impl Default for Field<FloatType> {
    fn default() -> Self {
        Self::new()
    }
}
