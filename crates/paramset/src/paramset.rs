//! The validated parameter instance.
//!
//! A [`ParamSet`] is produced by [`Schema::bind`](crate::Schema::bind) and
//! is terminal: the raw copy, the validated data map and the error list are
//! private, and the public surface is read-only, so a validated instance
//! cannot be written to. Values are read back by declared name (not lookup
//! key), falling back to the field's default.

use crate::error::ParamError;
use crate::schema::Schema;
use crate::value::Value;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;

/// One raw mapping, validated against a [`Schema`].
pub struct ParamSet {
    pub(crate) schema: Schema,
    pub(crate) raw: BTreeMap<String, Value>,
    pub(crate) data: BTreeMap<String, Value>,
    pub(crate) errors: Vec<ParamError>,
}

impl ParamSet {
    pub(crate) fn empty(schema: Schema) -> Self {
        Self {
            schema,
            raw: BTreeMap::new(),
            data: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collected errors, in discovery order: per-field first, then
    /// cross-field.
    pub fn errors(&self) -> &[ParamError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParamError> {
        self.errors
    }

    /// Validated value by declared name, falling back to the field's
    /// default when the key is absent from the data map.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let field = self.schema.field_by_name(name)?;
        let key = field.key_ref()?;
        self.data.get(key).or_else(|| field.default_ref())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_int()
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_float()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name)?.as_list()
    }

    pub fn get_datetime(&self, name: &str) -> Option<&NaiveDateTime> {
        self.get(name)?.as_datetime()
    }

    /// Whether the named field's key made it into validated data. Ignores
    /// defaults.
    pub fn has(&self, name: &str) -> bool {
        self.schema
            .field_by_name(name)
            .and_then(|f| f.key_ref())
            .is_some_and(|key| self.data.contains_key(key))
    }

    /// Raw-value lookup by key, distinct from the validated data.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Raw-value lookup by key with a fallback default.
    pub fn raw_or<'a>(&'a self, key: &str, fallback: &'a Value) -> &'a Value {
        self.raw.get(key).unwrap_or(fallback)
    }

    /// The defensive copy of the caller's mapping.
    pub fn raw_data(&self) -> &BTreeMap<String, Value> {
        &self.raw
    }

    /// The validated data map, keyed by lookup key.
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Export `{key: value}` for every declared field with a non-null
    /// value; `include_none` additionally emits `Null` for the rest, so
    /// the result represents both data and schema.
    pub fn to_map(&self, include_none: bool) -> BTreeMap<String, Value> {
        let mut out = BTreeMap::new();
        for field in self.schema.fields() {
            let (Some(name), Some(key)) = (field.name_ref(), field.key_ref()) else {
                continue;
            };
            match self.get(name) {
                Some(value) if !value.is_null() => {
                    out.insert(key.to_string(), value.clone());
                }
                _ if include_none => {
                    out.insert(key.to_string(), Value::Null);
                }
                _ => {}
            }
        }
        out
    }

    /// [`to_map`](ParamSet::to_map) rendered as a JSON object.
    pub fn to_json(&self, include_none: bool) -> serde_json::Value {
        serde_json::Value::Object(
            self.to_map(include_none)
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Export `{name: value}` for the named fields whose value (including
    /// defaults) is non-null, the keyword-argument form.
    pub fn pick(&self, names: &[&str]) -> BTreeMap<String, Value> {
        let mut out = BTreeMap::new();
        for name in names {
            if let Some(value) = self.get(name) {
                if !value.is_null() {
                    out.insert((*name).to_string(), value.clone());
                }
            }
        }
        out
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self
            .data
            .iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect::<Vec<_>>()
            .join(",");
        let errors = self
            .errors
            .iter()
            .map(ParamError::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "<{}: {data}; errors=[{errors}]>",
            self.schema.name()
        )
    }
}

impl fmt::Debug for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSet")
            .field("schema", &self.schema.name())
            .field("data", &self.data)
            .field("errors", &self.errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::AnyField;
    use crate::fields::numeric::IntegerField;
    use crate::fields::text::WordField;

    fn schema() -> Schema {
        Schema::builder("Sample")
            .field("name", WordField::new())
            .field("age", IntegerField::new().default_value(18))
            .field("note", AnyField::new().key("note_key"))
            .build()
    }

    #[test]
    fn get_reads_by_name_and_falls_back_to_default() {
        let params = schema().bind(serde_json::json!({"name": "rei"}));
        assert!(params.is_valid());
        assert_eq!(params.get_str("name"), Some("rei"));
        // Absent key surfaces the default at read time only
        assert_eq!(params.get_int("age"), Some(18));
        assert!(!params.has("age"));
        assert!(params.data().get("age").is_none());
    }

    #[test]
    fn get_uses_declared_name_not_key() {
        let params = schema().bind(serde_json::json!({"note_key": "hi"}));
        assert_eq!(params.get_str("note"), Some("hi"));
        assert!(params.get("note_key").is_none());
        assert!(params.has("note"));
    }

    #[test]
    fn raw_lookup_is_distinct_from_data() {
        let params = schema().bind(serde_json::json!({"name": "rei", "stray": 1}));
        assert_eq!(params.raw("stray"), Some(&Value::Int(1)));
        assert!(params.get("stray").is_none());
        let fallback = Value::from("none");
        assert_eq!(params.raw_or("missing", &fallback), &fallback);
    }

    #[test]
    fn to_map_skips_nulls_unless_asked() {
        let params = schema().bind(serde_json::json!({"name": "rei"}));
        let out = params.to_map(false);
        assert_eq!(out.len(), 2);
        assert_eq!(out["name"], Value::from("rei"));
        assert_eq!(out["age"], Value::Int(18));

        let full = params.to_map(true);
        assert_eq!(full.len(), 3);
        assert_eq!(full["note_key"], Value::Null);
    }

    #[test]
    fn to_json_exports_object() {
        let params = schema().bind(serde_json::json!({"name": "rei", "age": 14}));
        assert_eq!(
            params.to_json(false),
            serde_json::json!({"name": "rei", "age": 14})
        );
    }

    #[test]
    fn pick_keys_by_name_and_skips_missing() {
        let params = schema().bind(serde_json::json!({"name": "rei"}));
        let picked = params.pick(&["name", "note"]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked["name"], Value::from("rei"));
    }

    #[test]
    fn display_includes_name_and_errors() {
        let params = schema().bind(serde_json::json!({"name": "no spaces allowed"}));
        let shown = params.to_string();
        assert!(shown.starts_with("<Sample:"));
        assert!(shown.contains("errors=["));
        assert!(shown.contains("name:"));
    }
}
