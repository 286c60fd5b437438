//! String and pattern fields.
//!
//! [`StringField`] is the textual base: type check, UTF-8 decoding of byte
//! strings on conversion, and character-counted length bounds.
//! [`RegexField`] builds on it with an unanchored pattern search, and
//! [`WordField`]/[`EmailField`]/[`UrlField`] are regex fields preconfigured
//! with fixed patterns.

use crate::error::FieldError;
use crate::field::{Field, FieldType};
use crate::value::{Value, ValueKind};
use regex::Regex;
use std::sync::OnceLock;

// Pre-compiled fixed patterns
static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD_REGEX.get_or_init(|| Regex::new(r"^[\w]*$").unwrap())
}

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC-822-ish: dot-atom or quoted local part, domain labels,
        // 2-6 letter TLD
        Regex::new(
            r#"(?i)(^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*|^"([\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?$"#,
        )
        .unwrap()
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        // scheme://host[:port][/path] with domain-label, localhost or
        // literal IPv4 hosts
        Regex::new(
            r"(?i)^(?:http|ftp)s?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
        )
        .unwrap()
    })
}

/// Length constraint on the final (decoded) string, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Exact(usize),
    /// Inclusive range
    Range(usize, usize),
}

impl Length {
    /// Panics unless `n > 0`.
    pub fn exact(n: usize) -> Self {
        assert!(n > 0, "exact length must be positive");
        Length::Exact(n)
    }

    /// Panics unless `0 < min < max`.
    pub fn range(min: usize, max: usize) -> Self {
        assert!(min > 0, "length range min must be positive");
        assert!(min < max, "length range must satisfy min < max");
        Length::Range(min, max)
    }

    fn check(&self, s: &str) -> Result<(), FieldError> {
        let len = s.chars().count();
        match *self {
            Length::Exact(n) if len != n => Err(FieldError::new(
                "length",
                format!("length of value must be {n}"),
            )
            .param("expected", n)
            .param("actual", len)),
            Length::Range(min, max) if len < min || len > max => Err(FieldError::new(
                "length",
                format!("length of value must be in range ({min}, {max})"),
            )
            .param("min", min)
            .param("max", max)
            .param("actual", len)),
            _ => Ok(()),
        }
    }
}

impl From<usize> for Length {
    fn from(n: usize) -> Self {
        Length::exact(n)
    }
}

impl From<(usize, usize)> for Length {
    fn from((min, max): (usize, usize)) -> Self {
        Length::range(min, max)
    }
}

const STR_EXPECTED: &[ValueKind] = &[ValueKind::Str];

/// Type logic of [`StringField`].
#[derive(Debug, Clone, Default)]
pub struct StrType {
    length: Option<Length>,
}

impl StrType {
    fn set_length(&mut self, length: Length) {
        self.length = Some(length);
    }
}

impl FieldType for StrType {
    fn name(&self) -> &'static str {
        "string"
    }

    fn expected(&self) -> &[ValueKind] {
        STR_EXPECTED
    }

    fn convert(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Str(_) => Ok(value),
            Value::Bytes(b) => String::from_utf8(b).map(Value::Str).map_err(|e| {
                FieldError::new("type", format!("bytes are not valid UTF-8: {e}"))
            }),
            other => Err(FieldError::new(
                "type",
                format!("could not convert {} into string type", other.kind()),
            )),
        }
    }

    fn validate_type(&self, value: Value, _convert: bool) -> Result<Value, FieldError> {
        match &value {
            Value::Str(s) => {
                if let Some(length) = &self.length {
                    length.check(s)?;
                }
                Ok(value)
            }
            other => Err(FieldError::new(
                "type",
                format!("value \"{other}\" is not a string"),
            )),
        }
    }
}

/// A text field with optional length bounds.
pub type StringField = Field<StrType>;

impl Field<StrType> {
    pub fn new() -> Self {
        Field::with_type(StrType::default())
    }

    /// Exact length (`3`) or inclusive range (`(1, 8)`).
    ///
    /// Panics on non-positive bounds or an inverted range.
    pub fn length(mut self, length: impl Into<Length>) -> Self {
        self.ty_mut().set_length(length.into());
        self
    }
}

impl Default for Field<StrType> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type logic of [`RegexField`] and the fixed-pattern fields built on it:
/// string validation first, then an unanchored search.
#[derive(Debug, Clone)]
pub struct RegexType {
    base: StrType,
    regex: Regex,
    code: &'static str,
    mismatch: Option<&'static str>,
}

impl FieldType for RegexType {
    fn name(&self) -> &'static str {
        self.code
    }

    fn expected(&self) -> &[ValueKind] {
        STR_EXPECTED
    }

    fn convert(&self, value: Value) -> Result<Value, FieldError> {
        self.base.convert(value)
    }

    fn validate_type(&self, value: Value, convert: bool) -> Result<Value, FieldError> {
        let value = self.base.validate_type(value, convert)?;
        let Value::Str(s) = &value else {
            return Err(FieldError::new("type", "value is not a string"));
        };
        if self.regex.is_match(s) {
            Ok(value)
        } else {
            let message = match self.mismatch {
                Some(text) => text.to_string(),
                None => format!(
                    "regex pattern ({}) does not match value \"{s}\"",
                    self.regex.as_str()
                ),
            };
            Err(FieldError::new(self.code, message))
        }
    }
}

/// A string field whose value must match a regex pattern.
pub type RegexField = Field<RegexType>;

impl Field<RegexType> {
    /// Panics if the pattern does not compile.
    pub fn new(pattern: &str) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid regex pattern {pattern:?}: {e}"));
        Field::with_type(RegexType {
            base: StrType::default(),
            regex,
            code: "regex",
            mismatch: None,
        })
    }

    fn fixed(regex: &Regex, code: &'static str, mismatch: &'static str) -> Self {
        Field::with_type(RegexType {
            base: StrType::default(),
            regex: regex.clone(),
            code,
            mismatch: Some(mismatch),
        })
    }

    /// Exact length (`3`) or inclusive range (`(1, 8)`), applied before the
    /// pattern search.
    pub fn length(mut self, length: impl Into<Length>) -> Self {
        self.ty_mut().base.set_length(length.into());
        self
    }
}

/// Word characters only (`^[\w]*$`): alphanumerics and underscore, no
/// whitespace or punctuation.
pub struct WordField;

impl WordField {
    pub fn new() -> RegexField {
        RegexField::fixed(
            word_regex(),
            "word",
            "value must contain only word characters",
        )
    }
}

/// Case-insensitive RFC-822-ish email shape with a 2-6 letter TLD.
pub struct EmailField;

impl EmailField {
    pub fn new() -> RegexField {
        RegexField::fixed(email_regex(), "email", "value is not a valid email address")
    }
}

/// `http`/`https`/`ftp`/`ftps` URL with a domain-label, `localhost` or
/// literal IPv4 host, optional port and path.
pub struct UrlField;

impl UrlField {
    pub fn new() -> RegexField {
        RegexField::fixed(url_regex(), "url", "value is not a valid URL")
    }
}
