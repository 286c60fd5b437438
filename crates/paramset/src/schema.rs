//! Schema declaration and the bind/validate operations.
//!
//! A [`Schema`] is a named, ordered collection of fields plus explicitly
//! registered cross-validation hooks, built once with [`SchemaBuilder`] and
//! then shared immutably, so concurrent binds against one schema are safe.
//!
//! Binding applies every declared field to one raw mapping, collecting all
//! errors instead of failing fast, then runs per-field hooks and
//! whole-object hooks in two passes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use paramset::prelude::*;
//!
//! let user = Schema::builder("UserParams")
//!     .field("id", UuidStrField::new().required())
//!     .field("name", WordField::new().length((1, 8)).required())
//!     .field("email", EmailField::new().required())
//!     .field("age", IntegerField::new().min(10).max(30))
//!     .build();
//!
//! let params = user.validate(serde_json::json!({
//!     "id": "216edfae-19c0-11e3-9e93-10604b8a89ab",
//!     "name": "asuka",
//!     "email": "asuka@nerv.com",
//! }))?;
//! assert_eq!(params.get_str("name"), Some("asuka"));
//! ```

use crate::error::{FieldError, InvalidParams, ParamError};
use crate::field::{Field, IntoField};
use crate::paramset::ParamSet;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type FieldHookFn = dyn Fn(Value) -> Result<Value, FieldError> + Send + Sync;
type ObjectHookFn = dyn Fn(&ParamSet) -> Result<(), FieldError> + Send + Sync;

#[derive(Clone)]
struct FieldHook {
    field: String,
    run: Arc<FieldHookFn>,
}

#[derive(Clone)]
struct ObjectHook {
    label: String,
    run: Arc<ObjectHookFn>,
}

struct SchemaInner {
    name: String,
    fields: Vec<Field>,
    field_hooks: Vec<FieldHook>,
    object_hooks: Vec<ObjectHook>,
    deny_unknown: bool,
}

/// Options of one bind/validate call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Forward the conversion flag to every field.
    pub convert: bool,
}

impl BindOptions {
    /// Shorthand for `BindOptions { convert: true }`.
    pub fn converting() -> Self {
        Self { convert: true }
    }
}

/// A declared parameter schema: ordered fields plus cross-validation hooks.
///
/// Cheap to clone (the declaration is shared behind an `Arc`) and read-only
/// after [`SchemaBuilder::build`].
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    /// Start declaring a schema. The name appears in `Display` output and
    /// tracing events.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            field_hooks: Vec::new(),
            object_hooks: Vec::new(),
            deny_unknown: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Declared lookup keys, in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.inner.fields.iter().filter_map(Field::key_ref).collect()
    }

    pub(crate) fn fields(&self) -> &[Field] {
        &self.inner.fields
    }

    pub(crate) fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.inner.fields.iter().find(|f| f.name_ref() == Some(name))
    }

    /// Bind raw input, collecting errors into the returned instance.
    pub fn bind(&self, raw: impl Into<Value>) -> ParamSet {
        self.bind_with(raw, BindOptions::default())
    }

    /// Bind raw input with explicit options.
    ///
    /// Runs to completion even after the first error: per-field checks in
    /// declaration order, unknown-key checks when enabled, then per-field
    /// hooks followed by whole-object hooks. Error order matches discovery
    /// order.
    pub fn bind_with(&self, raw: impl Into<Value>, options: BindOptions) -> ParamSet {
        let raw = raw.into();
        let mut params = ParamSet::empty(self.clone());

        let raw_map = match raw {
            Value::Map(map) => map,
            other => {
                params.errors.push(ParamError::object(FieldError::new(
                    "type",
                    format!("parameters must be a mapping, got {}", other.kind()),
                )));
                debug!(schema = %self.inner.name, "bind rejected non-mapping input");
                return params;
            }
        };
        params.raw = raw_map;

        for field in &self.inner.fields {
            let Some(key) = field.key_ref() else { continue };
            match params.raw.get(key) {
                Some(value) => match field.validate_with(value, options.convert) {
                    Ok(v) => {
                        params.data.insert(key.to_string(), v);
                    }
                    Err(e) => {
                        trace!(schema = %self.inner.name, key, code = %e.code, "field failed");
                        params.errors.push(ParamError::keyed(key, e));
                    }
                },
                None if field.is_required() => {
                    params
                        .errors
                        .push(ParamError::keyed(key, field.required_error(key)));
                }
                None => {}
            }
        }

        if self.inner.deny_unknown {
            for key in params.raw.keys() {
                if !self.inner.fields.iter().any(|f| f.key_ref() == Some(key.as_str())) {
                    params.errors.push(ParamError::keyed(
                        key,
                        FieldError::new(
                            "unknown_key",
                            format!("additional key \"{key}\" is not allowed"),
                        ),
                    ));
                }
            }
        }

        for hook in &self.inner.field_hooks {
            let Some(field) = self.field_by_name(&hook.field) else {
                continue;
            };
            let Some(key) = field.key_ref() else { continue };
            let Some(current) = params.data.get(key).cloned() else {
                continue;
            };
            match (hook.run)(current) {
                Ok(value) => {
                    assert!(
                        field.allows_null() || !value.is_null(),
                        "hook for field \"{}\" returned null on a non-null field; \
                         did you forget to return the value?",
                        hook.field
                    );
                    params.data.insert(key.to_string(), value);
                }
                Err(e) => {
                    trace!(schema = %self.inner.name, key, hook = %hook.field, "field hook failed");
                    params.errors.push(ParamError::keyed(key, e));
                }
            }
        }

        for hook in &self.inner.object_hooks {
            if let Err(e) = (hook.run)(&params) {
                trace!(schema = %self.inner.name, hook = %hook.label, "object hook failed");
                params.errors.push(ParamError::object(e));
            }
        }

        debug!(
            schema = %self.inner.name,
            fields = self.inner.fields.len(),
            errors = params.errors.len(),
            "bind finished"
        );
        params
    }

    /// Bind and fail with the aggregate error when anything was invalid.
    pub fn validate(&self, raw: impl Into<Value>) -> Result<ParamSet, InvalidParams> {
        self.validate_with(raw, BindOptions::default())
    }

    /// Bind with explicit options and fail with the aggregate error when
    /// anything was invalid.
    pub fn validate_with(
        &self,
        raw: impl Into<Value>,
        options: BindOptions,
    ) -> Result<ParamSet, InvalidParams> {
        let params = self.bind_with(raw, options);
        if params.errors.is_empty() {
            Ok(params)
        } else {
            Err(InvalidParams::new(params.into_errors()))
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.inner.name)
            .field(
                "fields",
                &self
                    .inner
                    .fields
                    .iter()
                    .filter_map(Field::name_ref)
                    .collect::<Vec<_>>(),
            )
            .field(
                "field_hooks",
                &self
                    .inner
                    .field_hooks
                    .iter()
                    .map(|h| h.field.as_str())
                    .collect::<Vec<_>>(),
            )
            .field(
                "object_hooks",
                &self
                    .inner
                    .object_hooks
                    .iter()
                    .map(|h| h.label.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("deny_unknown", &self.inner.deny_unknown)
            .finish()
    }
}

/// Builder collecting named field declarations and hooks into a [`Schema`].
///
/// Registration replaces attribute introspection: fields are collected into
/// an ordered map at declaration time, and [`extend`](SchemaBuilder::extend)
/// merges a parent schema's declarations before the child's, same-name
/// child entries overriding in place.
///
/// Malformed declarations (duplicate keys, hooks naming unknown fields)
/// panic: configuration is a programmer error, never an input error.
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
    field_hooks: Vec<FieldHook>,
    object_hooks: Vec<ObjectHook>,
    deny_unknown: bool,
}

impl SchemaBuilder {
    /// Register a field under a declared name.
    ///
    /// The field's lookup key defaults to the name. Re-registering a name
    /// overrides the earlier declaration in place (the inheritance
    /// override rule); two different names sharing a key panic.
    pub fn field(mut self, name: impl Into<String>, field: impl IntoField) -> Self {
        let name = name.into();
        let mut field = field.into_field();
        field.assign(&name);

        let key_conflict = self.fields.iter().any(|f| {
            f.name_ref() != Some(name.as_str()) && f.key_ref() == field.key_ref()
        });
        assert!(
            !key_conflict,
            "field \"{name}\" reuses the lookup key {:?} of another field",
            field.key_ref()
        );

        if let Some(existing) = self
            .fields
            .iter_mut()
            .find(|f| f.name_ref() == Some(name.as_str()))
        {
            *existing = field;
        } else {
            self.fields.push(field);
        }
        self
    }

    /// Merge a parent schema's fields and hooks in front of this builder's
    /// declarations. Same-name entries declared on the child override the
    /// parent's; nothing inherited is silently dropped.
    pub fn extend(mut self, parent: &Schema) -> Self {
        let own_fields = std::mem::take(&mut self.fields);
        self.fields = parent.inner.fields.clone();
        for field in own_fields {
            if let Some(name) = field.name_ref().map(str::to_string) {
                if let Some(existing) = self
                    .fields
                    .iter_mut()
                    .find(|f| f.name_ref() == Some(name.as_str()))
                {
                    *existing = field;
                    continue;
                }
            }
            self.fields.push(field);
        }

        let own_field_hooks = std::mem::take(&mut self.field_hooks);
        self.field_hooks = parent.inner.field_hooks.clone();
        for hook in own_field_hooks {
            if let Some(existing) = self
                .field_hooks
                .iter_mut()
                .find(|h| h.field == hook.field)
            {
                *existing = hook;
            } else {
                self.field_hooks.push(hook);
            }
        }

        let own_object_hooks = std::mem::take(&mut self.object_hooks);
        self.object_hooks = parent.inner.object_hooks.clone();
        for hook in own_object_hooks {
            if let Some(existing) = self
                .object_hooks
                .iter_mut()
                .find(|h| h.label == hook.label)
            {
                *existing = hook;
            } else {
                self.object_hooks.push(hook);
            }
        }

        self.deny_unknown |= parent.inner.deny_unknown;
        self
    }

    /// Register a per-field hook, run after base validation when the
    /// field's key survived into the data map. The returned value
    /// overwrites the stored one. Re-registering the same field name
    /// overrides the earlier hook.
    pub fn check<F>(mut self, field: impl Into<String>, hook: F) -> Self
    where
        F: Fn(Value) -> Result<Value, FieldError> + Send + Sync + 'static,
    {
        let field = field.into();
        let hook = FieldHook {
            field,
            run: Arc::new(hook),
        };
        if let Some(existing) = self
            .field_hooks
            .iter_mut()
            .find(|h| h.field == hook.field)
        {
            *existing = hook;
        } else {
            self.field_hooks.push(hook);
        }
        self
    }

    /// Register a whole-object hook, run after all per-field hooks with
    /// the instance under construction. A failure becomes an error entry
    /// with no key. Re-registering the same label overrides.
    pub fn check_object<F>(mut self, label: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&ParamSet) -> Result<(), FieldError> + Send + Sync + 'static,
    {
        let label = label.into();
        let hook = ObjectHook {
            label,
            run: Arc::new(hook),
        };
        if let Some(existing) = self
            .object_hooks
            .iter_mut()
            .find(|h| h.label == hook.label)
        {
            *existing = hook;
        } else {
            self.object_hooks.push(hook);
        }
        self
    }

    /// Flag every raw-input key that matches no declared field key as an
    /// error.
    pub fn deny_unknown_keys(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// Finalize the declaration.
    ///
    /// Panics if a per-field hook names a field that was never registered.
    pub fn build(self) -> Schema {
        for hook in &self.field_hooks {
            assert!(
                self.fields
                    .iter()
                    .any(|f| f.name_ref() == Some(hook.field.as_str())),
                "hook registered for unknown field \"{}\"",
                hook.field
            );
        }
        Schema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                fields: self.fields,
                field_hooks: self.field_hooks,
                object_hooks: self.object_hooks,
                deny_unknown: self.deny_unknown,
            }),
        }
    }
}

/// Declare an ad-hoc schema from `(name, field)` pairs, the counterpart of
/// declaring one inline at a call site.
pub fn define_params<I, N, F>(name: impl Into<String>, fields: I) -> Schema
where
    I: IntoIterator<Item = (N, F)>,
    N: Into<String>,
    F: IntoField,
{
    let mut builder = Schema::builder(name);
    for (field_name, field) in fields {
        builder = builder.field(field_name, field);
    }
    builder.build()
}
