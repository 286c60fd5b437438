//! Conversion ladder for candidate value types.
//!
//! A field may declare an ordered list of candidate kinds its value must
//! convert to. Conversion tries each candidate in order and the first
//! success wins; when none succeed the failure messages of every attempt
//! are concatenated into one diagnostic.

use crate::error::FieldError;
use crate::value::{Value, ValueKind};

/// Map the fixed boolean literal set. Any other text is a conversion error.
pub(crate) fn bool_from_literal(s: &str) -> Option<bool> {
    match s {
        "True" | "true" | "1" => Some(true),
        "False" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Convert one value to one target kind.
pub(crate) fn coerce(value: &Value, kind: ValueKind) -> Result<Value, String> {
    match kind {
        ValueKind::Null => match value {
            Value::Null => Ok(Value::Null),
            other => Err(format!("{} is not null", other.kind())),
        },
        ValueKind::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Str(s) => bool_from_literal(s)
                .map(Value::Bool)
                .ok_or_else(|| format!("\"{s}\" is not a boolean literal")),
            other => Err(format!("cannot convert {} to bool", other.kind())),
        },
        ValueKind::Int => match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            // Fractional input truncates toward zero, like a plain int() cast
            Value::Float(f) if f.is_finite() => Ok(Value::Int(*f as i64)),
            Value::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("\"{s}\" is not an integer")),
            other => Err(format!("cannot convert {} to int", other.kind())),
        },
        ValueKind::Float => match value {
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("\"{s}\" is not a number")),
            other => Err(format!("cannot convert {} to float", other.kind())),
        },
        ValueKind::Str => match value {
            Value::Str(s) => Ok(Value::Str(s.clone())),
            Value::Bytes(b) => String::from_utf8(b.clone())
                .map(Value::Str)
                .map_err(|e| format!("bytes are not valid UTF-8: {e}")),
            Value::Int(i) => Ok(Value::Str(i.to_string())),
            Value::Float(f) => Ok(Value::Str(f.to_string())),
            Value::Bool(b) => Ok(Value::Str(b.to_string())),
            other => Err(format!("cannot convert {} to string", other.kind())),
        },
        ValueKind::Bytes => match value {
            Value::Bytes(b) => Ok(Value::Bytes(b.clone())),
            Value::Str(s) => Ok(Value::Bytes(s.clone().into_bytes())),
            other => Err(format!("cannot convert {} to bytes", other.kind())),
        },
        ValueKind::List => match value {
            Value::List(items) => Ok(Value::List(items.clone())),
            other => Ok(Value::List(vec![other.clone()])),
        },
        ValueKind::Map => match value {
            Value::Map(m) => Ok(Value::Map(m.clone())),
            other => Err(format!("cannot convert {} to map", other.kind())),
        },
        ValueKind::Datetime => match value {
            Value::Datetime(dt) => Ok(Value::Datetime(*dt)),
            // Text needs a format; that parsing lives in the datetime field
            other => Err(format!("cannot convert {} to datetime", other.kind())),
        },
    }
}

/// Try each candidate kind in order; first success wins.
///
/// An empty candidate list passes the value through unchanged.
pub(crate) fn convert_candidates(
    value: Value,
    kinds: &[ValueKind],
) -> Result<Value, FieldError> {
    if kinds.is_empty() {
        return Ok(value);
    }

    let mut attempts = Vec::with_capacity(kinds.len());
    for kind in kinds {
        match coerce(&value, *kind) {
            Ok(converted) => return Ok(converted),
            Err(msg) => attempts.push(format!("{kind}: {msg}")),
        }
    }

    let kinds_list = kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(FieldError::new(
        "type",
        format!(
            "could not convert value \"{value}\" into any of [{kinds_list}]: {}",
            attempts.join("; ")
        ),
    ))
}
