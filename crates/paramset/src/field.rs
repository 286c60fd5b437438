//! Field declarations and the per-value validation pipeline.
//!
//! A [`Field`] is a single named validation/coercion rule: common
//! configuration (nullability, choices, required-ness, default) wrapped
//! around a concrete [`FieldType`] that owns the type-specific logic.
//! Fields are configuration: immutable after construction and safely
//! shared across concurrent binds.
//!
//! ## Example
//!
//! ```rust,ignore
//! use paramset::prelude::*;
//!
//! let age = IntegerField::new().min(10).max(30)
//!     .describe("age should be a 10~30 int");
//!
//! assert!(age.validate(&Value::from(20)).is_ok());
//! assert!(age.validate(&Value::from(31)).is_err());
//! ```

use crate::coerce;
use crate::error::FieldError;
use crate::value::{Value, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Type-specific validation and conversion logic of a field.
///
/// Implementations are the leaves of the field hierarchy: string, regex,
/// numeric, list, boolean, datetime, UUID. The common pipeline in
/// [`Field::validate_with`] drives them in a fixed order.
pub trait FieldType: fmt::Debug + Send + Sync {
    /// Type name used in diagnostics (e.g. "string", "int").
    fn name(&self) -> &'static str;

    /// Ordered candidate value kinds this field's value must match or
    /// convert to. Empty means any.
    fn expected(&self) -> &[ValueKind] {
        &[]
    }

    /// Attempt conversion through the candidate kinds; first success wins.
    fn convert(&self, value: Value) -> Result<Value, FieldError> {
        coerce::convert_candidates(value, self.expected())
    }

    /// Type-specific validation, run after any requested conversion.
    ///
    /// The convert flag is forwarded only so recursive types (lists) can
    /// pass it down to their item fields.
    fn validate_type(&self, value: Value, convert: bool) -> Result<Value, FieldError>;

    /// Whether `choices` constrains each element rather than the whole
    /// value. List fields return true.
    fn element_choices(&self) -> bool {
        false
    }
}

/// Erased field type, shared immutably between spawned copies and schemas.
pub type DynFieldType = Arc<dyn FieldType>;

impl FieldType for DynFieldType {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn expected(&self) -> &[ValueKind] {
        (**self).expected()
    }

    fn convert(&self, value: Value) -> Result<Value, FieldError> {
        (**self).convert(value)
    }

    fn validate_type(&self, value: Value, convert: bool) -> Result<Value, FieldError> {
        (**self).validate_type(value, convert)
    }

    fn element_choices(&self) -> bool {
        (**self).element_choices()
    }
}

/// A single named validation/coercion rule.
///
/// Generic over its concrete [`FieldType`] while being configured, erased
/// to `Field` (the default type parameter) when registered into a schema.
/// Builder methods consume and return the field; nothing is mutable once a
/// schema owns it.
#[derive(Debug, Clone)]
pub struct Field<T = DynFieldType> {
    ty: T,
    description: Option<String>,
    null: bool,
    null_values: Vec<Value>,
    choices: Option<Vec<Value>>,
    key: Option<String>,
    name: Option<String>,
    required: bool,
    default: Option<Value>,
    force_convert: bool,
}

impl<T: FieldType> Field<T> {
    pub(crate) fn with_type(ty: T) -> Self {
        Self {
            ty,
            description: None,
            null: true,
            null_values: vec![
                Value::Null,
                Value::Str(String::new()),
                Value::Bytes(Vec::new()),
            ],
            choices: None,
            key: None,
            name: None,
            required: false,
            default: None,
            force_convert: false,
        }
    }

    pub(crate) fn ty_mut(&mut self) -> &mut T {
        &mut self.ty
    }

    /// Set the field-level message, replacing generated check messages on
    /// any failure of this field.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether a null-set value is accepted (and short-circuits remaining
    /// checks). Defaults to true.
    pub fn null(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    /// Replace the null-value set. Defaults to `[null, "", b""]`.
    pub fn null_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the (converted) value to a set of allowed values.
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Override the lookup key in raw input. Defaults to the declared name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Absence of the key in raw input becomes an error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value surfaced by [`ParamSet::get`](crate::ParamSet::get) when the
    /// key is absent from validated data. Never written into the data map.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Always attempt conversion, regardless of the per-bind convert flag.
    pub fn force_convert(mut self) -> Self {
        self.force_convert = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn allows_null(&self) -> bool {
        self.null
    }

    pub(crate) fn key_ref(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub(crate) fn name_ref(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn default_ref(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Bind the declared name; the lookup key defaults to it.
    pub(crate) fn assign(&mut self, name: &str) {
        self.name = Some(name.to_string());
        if self.key.is_none() {
            self.key = Some(name.to_string());
        }
    }

    /// Validate a raw value without conversion (beyond `force_convert`).
    pub fn validate(&self, value: &Value) -> Result<Value, FieldError> {
        self.validate_with(value, false)
    }

    /// Validate a raw value, optionally converting it first.
    ///
    /// Pipeline order: null-set short-circuit, conversion (when requested
    /// or forced), type validation, choices membership. The first failing
    /// step wins; a null-set value never reaches the later steps.
    pub fn validate_with(&self, value: &Value, convert: bool) -> Result<Value, FieldError> {
        if self.null_values.iter().any(|nv| nv == value) {
            return if self.null {
                Ok(Value::Null)
            } else {
                Err(self.decorate(FieldError::new("null", "empty value is not allowed")))
            };
        }

        let converting = convert || self.force_convert;
        let mut value = value.clone();
        if converting {
            value = self.ty.convert(value).map_err(|e| self.decorate(e))?;
        }
        value = self
            .ty
            .validate_type(value, converting)
            .map_err(|e| self.decorate(e))?;

        if let Some(choices) = self.choices.as_deref().filter(|c| !c.is_empty()) {
            self.check_choices(&value, choices)?;
        }

        Ok(value)
    }

    fn check_choices(&self, value: &Value, choices: &[Value]) -> Result<(), FieldError> {
        if self.ty.element_choices() {
            let items = match value {
                Value::List(items) => items.as_slice(),
                other => std::slice::from_ref(other),
            };
            let bad: Vec<String> = items
                .iter()
                .filter(|item| !choices.contains(item))
                .map(|item| format!("\"{item}\""))
                .collect();
            if !bad.is_empty() {
                return Err(self.decorate(FieldError::new(
                    "choices",
                    format!("values [{}] are not allowed", bad.join(", ")),
                )));
            }
        } else if !choices.contains(value) {
            let allowed = choices
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(self.decorate(FieldError::new(
                "choices",
                format!("value \"{value}\" is not one of [{allowed}]"),
            )));
        }
        Ok(())
    }

    /// The error recorded when a required key is absent from raw input.
    pub(crate) fn required_error(&self, key: &str) -> FieldError {
        self.decorate(FieldError::new("required", format!("{key} is required")))
    }

    fn decorate(&self, error: FieldError) -> FieldError {
        match &self.description {
            Some(description) => error.with_message(description.clone()),
            None => error,
        }
    }

    /// Shallow copy for deriving a specialized field from a shared
    /// prototype (e.g. marking one instance required).
    ///
    /// The copy's `key` and `name` are cleared so spawning into a new
    /// schema cannot collide with the template's registration.
    pub fn spawn(&self) -> Self
    where
        T: Clone,
    {
        let mut spawned = self.clone();
        spawned.key = None;
        spawned.name = None;
        spawned
    }

    /// Erase the concrete type for schema registration.
    pub fn erase(self) -> Field
    where
        T: Sized + 'static,
    {
        Field {
            ty: Arc::new(self.ty) as DynFieldType,
            description: self.description,
            null: self.null,
            null_values: self.null_values,
            choices: self.choices,
            key: self.key,
            name: self.name,
            required: self.required,
            default: self.default,
            force_convert: self.force_convert,
        }
    }
}

/// Conversion into an erased [`Field`], implemented by every typed field.
pub trait IntoField {
    fn into_field(self) -> Field;
}

impl<T: FieldType + 'static> IntoField for Field<T> {
    fn into_field(self) -> Field {
        self.erase()
    }
}

/// Type logic of the generic field: an optional candidate-kind check and
/// nothing else.
#[derive(Debug, Clone, Default)]
pub struct AnyType {
    kinds: Vec<ValueKind>,
}

impl FieldType for AnyType {
    fn name(&self) -> &'static str {
        "any"
    }

    fn expected(&self) -> &[ValueKind] {
        &self.kinds
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        if self.kinds.is_empty() || self.kinds.contains(&value.kind()) {
            Ok(value)
        } else {
            let expected = self
                .kinds
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Err(FieldError::new(
                "type",
                format!(
                    "value of type {} does not match expected [{expected}]",
                    value.kind()
                ),
            ))
        }
    }
}

/// A field with no type-specific checks unless `value_type` is set.
pub type AnyField = Field<AnyType>;

impl Field<AnyType> {
    pub fn new() -> Self {
        Field::with_type(AnyType::default())
    }

    /// Candidate value kinds this field must match or convert to.
    pub fn value_type(mut self, kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        self.ty.kinds = kinds.into_iter().collect();
        self
    }
}

impl Default for Field<AnyType> {
    fn default() -> Self {
        Self::new()
    }
}
