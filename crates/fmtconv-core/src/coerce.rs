//! Scalar coercion: turning a raw text token into a typed [`Value`] leaf.
//!
//! Shared by the CSV reader, the XML mapper and the YAML parser. The policy is
//! checked in a fixed order and never fails; anything unrecognized is a string.

use crate::value::Value;

/// Coerce a text token into a typed value.
///
/// Order: quoted string → null → bool → inline JSON collection → integer →
/// float → verbatim string. The token is trimmed first.
///
/// ```
/// use fmtconv_core::{coerce, Value};
///
/// assert_eq!(coerce("42"), Value::Number(42.0));
/// assert_eq!(coerce("'42'"), Value::String("42".into()));
/// assert_eq!(coerce(""), Value::Null);
/// assert_eq!(coerce("[1, 2]"), Value::List(vec![Value::Number(1.0), Value::Number(2.0)]));
/// ```
pub fn coerce(text: &str) -> Value {
    let s = text.trim();

    if let Some(inner) = strip_matching_quotes(s) {
        return Value::String(inner.to_string());
    }

    if s.is_empty() || s == "null" {
        return Value::Null;
    }

    if s == "true" {
        return Value::Bool(true);
    }
    if s == "false" {
        return Value::Bool(false);
    }

    if looks_like_collection(s) {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(s) {
            return Value::from(json);
        }
    }

    if let Ok(n) = s.parse::<i64>() {
        return Value::Number(n as f64);
    }

    // `inf` and `NaN` parse as f64 but have no place in JSON; keep them as text.
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return Value::Number(f);
        }
    }

    Value::String(s.to_string())
}

/// Return the interior of `s` if it is wrapped in a matching pair of single
/// or double quotes. The interior is returned as-is; no escapes are processed.
pub(crate) fn strip_matching_quotes(s: &str) -> Option<&str> {
    if s.len() < 2 {
        return None;
    }
    let first = s.as_bytes()[0];
    let last = s.as_bytes()[s.len() - 1];
    if (first == b'"' || first == b'\'') && first == last {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

/// `[...]` or `{...}`: worth handing to the JSON decoder.
pub(crate) fn looks_like_collection(s: &str) -> bool {
    (s.starts_with('[') && s.ends_with(']')) || (s.starts_with('{') && s.ends_with('}'))
}
