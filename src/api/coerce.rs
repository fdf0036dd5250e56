//! Coercions applied while deserializing upstream payloads.
//!
//! The FreeFeed API is loosely typed: counters and timestamps arrive as
//! strings, booleans are encoded as `"1"`/`"0"` sentinels, and collections
//! may be `null` instead of empty. Everything is normalized here so the
//! formatters only ever see plain Rust values.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// `"1"` sentinel flag.
///
/// Used for `isPrivate`, `isProtected`, `isRestricted` (users) and
/// `commentsDisabled` (posts). Only the exact string `"1"` is true; `"0"`,
/// missing, `null` and any other value are false.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(Value::String(s)) if s == "1"))
}

/// Loose truthiness, as the API uses for `isGone` and `hasOwnLike`.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

/// Integer that may be sent as a JSON number or a numeric string.
///
/// Missing, `null` and unparseable values become `0`.
pub fn number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_value)
        .map_or(0, |n| number_to_i64(&n)))
}

/// Like [`number`], but keeps "absent or unparseable" distinguishable from zero.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => number_value(&v).map(|n| number_to_i64(&n)),
    })
}

/// Treat an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numeric coercion of an arbitrary JSON value.
///
/// Numbers pass through, numeric strings are parsed (integers stay
/// integers), blank strings and `null` are zero, booleans are `0`/`1`.
/// Anything else yields `None`.
#[must_use]
pub fn number_value(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::Null => Some(Number::from(0)),
        Value::Bool(b) => Some(Number::from(i64::from(*b))),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(Number::from(0));
            }
            s.parse::<i64>()
                .map(Number::from)
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64))
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_i64(n: &Number) -> i64 {
    n.as_i64()
        .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
        .or_else(|| n.as_f64().map(|f| f as i64))
        .unwrap_or(0)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
