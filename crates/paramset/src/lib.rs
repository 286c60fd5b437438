//! # ParamSet
//!
//! Declarative validation and coercion for key/value parameters.
//!
//! Callers describe the expected shape of incoming data (form fields, JSON
//! bodies, query strings) as a schema of named, typed field declarations.
//! Binding raw input against the schema yields either a structured, typed
//! result or a deterministic list of field-level errors. Every error is
//! collected, nothing fails fast.
//!
//! ## Features
//!
//! - Field types for strings, patterns (word/email/URL), integers, floats,
//!   lists (with recursive item validation), booleans, datetimes and UUID
//!   strings
//! - Nullability with a configurable null-value set, defaults, choices,
//!   required-ness and opt-in conversion per field
//! - Cross-field validation through explicitly registered per-field and
//!   whole-object hooks
//! - Schema inheritance: a child schema extends a parent, overriding
//!   same-name fields without dropping the rest
//! - An aggregate error carrying the full ordered error list, with a JSON
//!   body export for transport adapters
//!
//! ## Example
//!
//! ```rust,ignore
//! use paramset::prelude::*;
//!
//! let user = Schema::builder("UserParams")
//!     .field("id", UuidStrField::new().required())
//!     .field(
//!         "name",
//!         WordField::new()
//!             .length((1, 8))
//!             .required()
//!             .describe("name should be a 1~8 length word"),
//!     )
//!     .field("email", EmailField::new().required())
//!     .field("age", IntegerField::new().min(10).max(30))
//!     .check_object("name_with_email", |params| {
//!         match (params.get_str("name"), params.get_str("email")) {
//!             (Some(name), Some(email)) if !email.contains(name) => Err(
//!                 FieldError::new("object", "name must appear in email"),
//!             ),
//!             _ => Ok(()),
//!         }
//!     })
//!     .build();
//!
//! let params = user.validate_with(
//!     serde_json::json!({
//!         "id": "216edfae-19c0-11e3-9e93-10604b8a89ab",
//!         "name": "asuka",
//!         "email": "asuka@nerv.com",
//!         "age": "14",
//!     }),
//!     BindOptions::converting(),
//! )?;
//!
//! assert_eq!(params.get_str("name"), Some("asuka"));
//! assert_eq!(params.get_int("age"), Some(14));
//! ```
//!
//! ## Error format
//!
//! [`InvalidParams::to_json`] renders the adapter-facing body:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "invalid_params",
//!     "message": "Invalid params",
//!     "fields": [
//!       {"key": "age", "code": "range", "message": "value is too big, max 30"}
//!     ]
//!   }
//! }
//! ```

mod coerce;
mod error;
mod field;
pub mod fields;
mod paramset;
mod schema;
mod value;

#[cfg(test)]
mod tests;

pub use error::{FieldError, InvalidParams, ParamError};
pub use field::{AnyField, AnyType, DynFieldType, Field, FieldType, IntoField};
pub use fields::{
    BooleanField, DatetimeField, EmailField, FloatField, IntegerField, Length, ListField,
    RegexField, StringField, UrlField, UuidStrField, WordField,
};
pub use paramset::ParamSet;
pub use schema::{define_params, BindOptions, Schema, SchemaBuilder};
pub use value::{Value, ValueKind};

/// Everything needed to declare and bind a schema.
pub mod prelude {
    pub use crate::error::{FieldError, InvalidParams, ParamError};
    pub use crate::field::{AnyField, Field, FieldType, IntoField};
    pub use crate::fields::{
        BooleanField, DatetimeField, EmailField, FloatField, IntegerField, Length, ListField,
        RegexField, StringField, UrlField, UuidStrField, WordField,
    };
    pub use crate::paramset::ParamSet;
    pub use crate::schema::{define_params, BindOptions, Schema, SchemaBuilder};
    pub use crate::value::{Value, ValueKind};
}
