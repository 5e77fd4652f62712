//! Normalizing user-supplied values to the type a schema leaf implies.

use crate::schema::{ArgumentSpec, ValueKind, tolerates_kind_drift};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Number, Value};
use tracing::debug;

/// Canonical textual form of datetime arguments.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Coerce `value` for `argument` to the shape of `spec`'s default.
///
/// - strings spelling booleans or numbers become native when the default is
///   boolean or numeric; numbers take the default's kind when that loses
///   nothing, so `"2.0"` fits an integer default and `"1.5"` does not
/// - numbers and booleans become strings when the default is a string
/// - datetime strings are rewritten in [`DATETIME_FORMAT`]
/// - anything outside the option list, or of an irreconcilable kind, falls
///   back to the default; interval arguments accept any scalar
///
/// Coercing an already coerced value returns it unchanged.
pub fn coerce(argument: &str, value: Value, spec: &ArgumentSpec) -> Value {
    let expected = spec.value_kind();
    let value = convert(value, expected, &spec.value);

    let value = match spec.matching_option(&value) {
        Some(option) => option.clone(),
        None if spec.option.is_some() => {
            debug!(argument, %value, "Value is not an option, using default");
            return spec.value.clone();
        }
        None => value,
    };

    let found = ValueKind::of(&value);
    let compatible = found == expected
        || expected == ValueKind::Null
        || (tolerates_kind_drift(argument) && is_scalar(found));
    if compatible {
        value
    } else {
        debug!(argument, %value, %found, %expected, "Value has the wrong type, using default");
        spec.value.clone()
    }
}

fn convert(value: Value, expected: ValueKind, default: &Value) -> Value {
    match (value, expected) {
        (Value::String(text), ValueKind::Bool) => match text.as_str() {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            _ => Value::String(text),
        },
        (Value::String(text), ValueKind::Integer) => {
            parse_integer(&text).map_or(Value::String(text), Value::from)
        }
        (Value::String(text), ValueKind::Float) => {
            parse_float(&text).map_or(Value::String(text), Value::Number)
        }
        (Value::Number(number), ValueKind::Integer) => match number_to_integer(&number) {
            Some(integer) => Value::from(integer),
            None => Value::Number(number),
        },
        (Value::Number(number), ValueKind::Float) if !number.is_f64() => {
            number.as_f64().and_then(Number::from_f64).map_or(Value::Number(number), Value::Number)
        }
        (Value::String(text), ValueKind::String) if is_datetime(default) => {
            normalize_datetime(&text).map_or(Value::String(text), Value::String)
        }
        (Value::Number(number), ValueKind::String) => Value::String(number.to_string()),
        (Value::Bool(flag), ValueKind::String) => Value::String(flag.to_string()),
        (value, _) => value,
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| number_to_integer(&parse_float(text)?))
}

fn parse_float(text: &str) -> Option<Number> {
    text.trim().parse::<f64>().ok().and_then(Number::from_f64)
}

/// `number` as an integer, if it has no fractional part.
fn number_to_integer(number: &Number) -> Option<i64> {
    if let Some(integer) = number.as_i64() {
        return Some(integer);
    }
    let float = number.as_f64()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

fn is_datetime(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).is_ok())
}

/// Accepts the canonical format, ISO-8601 with `T`, and RFC 3339 with offset.
fn normalize_datetime(text: &str) -> Option<String> {
    let text = text.trim();
    let parsed = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_local()))?;
    Some(parsed.format(DATETIME_FORMAT).to_string())
}

fn is_scalar(kind: ValueKind) -> bool {
    !matches!(kind, ValueKind::Array | ValueKind::Object)
}
