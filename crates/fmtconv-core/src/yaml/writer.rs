//! YAML writer: block style, sorted keys, two spaces per level.

use crate::error::{ConvertError, Result};
use crate::value::{format_number, Value};
use std::io::Write;

/// Write `value` as YAML followed by a newline.
///
/// The root must be a `Map` or a `List`; a bare scalar is
/// [`ConvertError::UnsupportedShape`] because it cannot be read back.
pub fn write_yaml<W: Write>(value: &Value, mut out: W) -> Result<()> {
    let text = to_yaml_string(value)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// Render `value` as a YAML string.
///
/// ```
/// use fmtconv_core::{coerce, to_yaml_string};
///
/// let value = coerce(r#"{"name": "Alice", "tags": ["a", "b"]}"#);
/// assert_eq!(to_yaml_string(&value).unwrap(), "name: \"Alice\"\ntags:\n  - \"a\"\n  - \"b\"\n");
/// ```
pub fn to_yaml_string(value: &Value) -> Result<String> {
    if !value.is_container() {
        return Err(ConvertError::UnsupportedShape(format!(
            "a bare {} cannot be a YAML document",
            value.kind_name()
        )));
    }
    let mut out = String::new();
    write_block(value, 0, &mut out);
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Emit a non-empty container's entries at `depth`, one per line, without a
/// trailing newline.
fn write_block(value: &Value, depth: usize, out: &mut String) {
    let indent = make_indent(depth);
    match value {
        Value::Map(map) => {
            for (i, (key, child)) in map.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push_str(&encode_key(key));
                out.push(':');
                write_child(child, depth, out);
            }
        }
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push('-');
                write_child(item, depth, out);
            }
        }
        _ => {}
    }
}

/// After `key:` or `-`: nested containers go on the following lines one level
/// deeper, everything else stays inline.
fn write_child(child: &Value, depth: usize, out: &mut String) {
    if is_non_empty_container(child) {
        out.push('\n');
        write_block(child, depth + 1, out);
    } else {
        out.push(' ');
        out.push_str(&encode_scalar(child));
    }
}

fn is_non_empty_container(value: &Value) -> bool {
    match value {
        Value::Map(map) => !map.is_empty(),
        Value::List(items) => !items.is_empty(),
        _ => false,
    }
}

/// Inline form of a scalar or an empty container.
///
/// Strings are wrapped in double quotes with nothing escaped; the reader
/// strips exactly the outer pair, so the interior comes back unchanged. A
/// string holding a line break would split the line, so it is written as a
/// JSON string literal instead.
fn encode_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) if s.contains(['\n', '\r']) => {
            serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.escape_default()))
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::List(_) => "[]".to_string(),
        Value::Map(_) => "{}".to_string(),
    }
}

/// Keys are written bare unless they would be misread as a comment, a list
/// item, a key/value split, or lose surrounding whitespace.
///
/// Quoted keys use double quotes, or single quotes when the key holds a double
/// quote and no single quote, since the reader ends the key at the first
/// matching quote.
fn encode_key(key: &str) -> String {
    let needs_quotes = key.is_empty()
        || key != key.trim()
        || key.contains(':')
        || key.starts_with('#')
        || key.starts_with('-')
        || key.starts_with('"')
        || key.starts_with('\'');
    if !needs_quotes {
        return key.to_string();
    }
    let quote = if key.contains('"') && !key.contains('\'') {
        '\''
    } else {
        '"'
    };
    format!("{quote}{key}{quote}")
}

fn make_indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce;

    #[test]
    fn list_of_maps_nests_under_bare_dashes() {
        let value = coerce(r#"[{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]"#);
        assert_eq!(
            to_yaml_string(&value).unwrap(),
            "-\n  id: 1\n  name: \"Alice\"\n-\n  id: 2\n  name: \"Bob\"\n"
        );
    }

    #[test]
    fn null_and_empty_containers_stay_inline() {
        let value = coerce(r#"{"a": null, "b": [], "c": {}}"#);
        assert_eq!(to_yaml_string(&value).unwrap(), "a: null\nb: []\nc: {}\n");
    }

    #[test]
    fn keys_with_colons_are_quoted_and_read_back() {
        let value = coerce(r#"{"a:b": 1, "say \"hi\": x": 2}"#);
        let text = to_yaml_string(&value).unwrap();
        assert_eq!(text, "\"a:b\": 1\n'say \"hi\": x': 2\n");
        assert_eq!(crate::yaml::parse_yaml(text.as_bytes()).unwrap(), value);
    }

    #[test]
    fn bare_scalar_is_rejected() {
        assert!(to_yaml_string(&Value::Number(1.0)).is_err());
    }

    #[test]
    fn empty_map_is_an_empty_document() {
        assert_eq!(to_yaml_string(&coerce("{}")).unwrap(), "");
    }
}
