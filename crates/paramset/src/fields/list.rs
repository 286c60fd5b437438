//! List fields.
//!
//! A list field accepts a sequence (a bare scalar is wrapped as a singleton,
//! the repeated-form-field convention). With an item field configured, every
//! element runs independently through the item field's full pipeline and all
//! element failures aggregate into a single field-level error naming the
//! offending elements. `choices` on a list field constrains each element,
//! not the whole list.

use crate::error::FieldError;
use crate::field::{Field, FieldType, IntoField};
use crate::value::{Value, ValueKind};

const LIST_EXPECTED: &[ValueKind] = &[ValueKind::List];

/// Type logic of [`ListField`].
#[derive(Debug, Clone, Default)]
pub struct ListType {
    item: Option<Box<Field>>,
}

impl FieldType for ListType {
    fn name(&self) -> &'static str {
        "list"
    }

    fn expected(&self) -> &[ValueKind] {
        LIST_EXPECTED
    }

    fn validate_type(&self, value: Value, convert: bool) -> Result<Value, FieldError> {
        let items = match value {
            Value::List(items) => items,
            scalar => vec![scalar],
        };

        let Some(item_field) = &self.item else {
            return Ok(Value::List(items));
        };

        let mut validated = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match item_field.validate_with(item, convert) {
                Ok(v) => validated.push(v),
                Err(e) => failures.push(format!("#{index} \"{item}\": {}", e.message)),
            }
        }
        if !failures.is_empty() {
            return Err(FieldError::new(
                "item",
                format!("invalid items: {}", failures.join("; ")),
            ));
        }
        Ok(Value::List(validated))
    }

    fn element_choices(&self) -> bool {
        true
    }
}

/// A sequence field, optionally validating every element through an item
/// field.
pub type ListField = Field<ListType>;

impl Field<ListType> {
    pub fn new() -> Self {
        Field::with_type(ListType::default())
    }

    /// Validate each element through the given field.
    pub fn item(mut self, item: impl IntoField) -> Self {
        self.ty_mut().item = Some(Box::new(item.into_field()));
        self
    }
}

impl Default for Field<ListType> {
    fn default() -> Self {
        Self::new()
    }
}
