//! Total predicates over document values and keys.
//!
//! `null` is a scalar: it is never a container and it is falsy.

use serde_json::Value;
use std::num::FpCategory;

/// `true` for JSON objects.
#[inline]
pub const fn is_mapping(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// `true` for JSON arrays.
#[inline]
pub const fn is_sequence(value: &Value) -> bool {
    matches!(value, Value::Array(_))
}

/// `true` for objects and arrays.
#[inline]
pub const fn is_container(value: &Value) -> bool {
    is_mapping(value) || is_sequence(value)
}

/// `true` when `key` starts with the operator `prefix`.
///
/// The bare prefix (`"$"`, MongoDB's positional operator) counts; the empty
/// string does not.
#[inline]
pub fn is_operator_token(prefix: char, key: &str) -> bool {
    key.starts_with(prefix)
}

/// `true` for an object or array with no entries.
pub fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(obj) => obj.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        _ => false,
    }
}

/// `true` for `null`, `false`, numeric zero and the empty string.
///
/// Containers are never falsy, even when empty. JSON cannot carry NaN, so
/// no number other than zero is falsy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n
            .as_f64()
            .is_some_and(|f| matches!(f.classify(), FpCategory::Zero | FpCategory::Nan)),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
