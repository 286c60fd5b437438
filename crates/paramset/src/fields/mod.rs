//! Concrete field types.
//!
//! The hierarchy mirrors the checks they perform: [`StringField`] is the
//! textual base; [`RegexField`] builds on it, and [`WordField`],
//! [`EmailField`] and [`UrlField`] are regex fields with fixed patterns.
//! [`IntegerField`] and [`FloatField`] share the numeric shape.
//! [`ListField`] recurses through an item field. [`BooleanField`],
//! [`DatetimeField`] and [`UuidStrField`] stand alone.

pub mod boolean;
pub mod datetime;
pub mod list;
pub mod numeric;
pub mod text;
pub mod uuid;

pub use self::boolean::{BoolType, BooleanField};
pub use self::datetime::{DatetimeField, DatetimeType};
pub use self::list::{ListField, ListType};
pub use self::numeric::{FloatField, FloatType, IntType, IntegerField};
pub use self::text::{
    EmailField, Length, RegexField, RegexType, StrType, StringField, UrlField, WordField,
};
pub use self::uuid::{UuidStrField, UuidStrType};
