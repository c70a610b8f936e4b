//! CSV adapter: delimited rows in, delimited rows out.
//!
//! Reading turns every data row into a `Map` keyed by the header row, with each
//! cell run through [`coerce`]. Writing accepts a `List` of maps (or a single
//! non-empty map) and produces a rectangular table whose header is the sorted
//! union of all row keys. Nested values are flattened into one cell, which is
//! reported back to the caller as a lossy [`Outcome`].

use crate::coerce::coerce;
use crate::convert::Outcome;
use crate::error::{ConvertError, Result};
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

/// Separator placed between leaf renderings when a nested value is flattened
/// into a single cell.
pub const FLATTEN_SEPARATOR: &str = " | ";

/// Validate a delimiter and narrow it to the byte the CSV reader/writer wants.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    match u8::try_from(delimiter) {
        Ok(b) if b.is_ascii() && !matches!(b, b'"' | b'\n' | b'\r') => Ok(b),
        _ => Err(ConvertError::InvalidDelimiter(delimiter)),
    }
}

/// Read delimited text into a `List` of row maps.
///
/// Row 0 is the header. A data row whose field count differs from the header
/// is an error; rows are never padded or truncated.
pub fn read_csv<R: Read>(input: R, delimiter: char) -> Result<Value> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(ConvertError::UnsupportedShape(
            "empty CSV input: no header row".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(ConvertError::ColumnMismatch {
                row: i + 1,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let row: BTreeMap<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), coerce(cell)))
            .collect();
        rows.push(Value::Map(row));
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "read CSV table");
    Ok(Value::List(rows))
}

/// Render a `List` of maps, or a single non-empty map, as delimited text.
///
/// An empty list writes nothing. Any other shape is
/// [`ConvertError::UnsupportedShape`].
pub fn write_csv<W: Write>(value: &Value, out: W, delimiter: char) -> Result<Outcome> {
    let delimiter = delimiter_byte(delimiter)?;
    let rows = collect_rows(value)?;
    if rows.is_empty() {
        return Ok(Outcome::Exact);
    }

    let headers = header_union(&rows);
    if headers.is_empty() {
        return Err(ConvertError::UnsupportedShape(
            "rows have no fields to use as columns".to_string(),
        ));
    }

    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    writer.write_record(&headers)?;

    let mut flattened_cells = 0;
    for row in &rows {
        let record: Vec<String> = headers
            .iter()
            .map(|header| match row.get(*header) {
                None | Some(Value::Null) => String::new(),
                Some(nested) if nested.is_container() => {
                    flattened_cells += 1;
                    flatten(nested)
                }
                Some(scalar) => scalar.render_scalar(),
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    if flattened_cells > 0 {
        tracing::debug!(flattened_cells, "nested values flattened into CSV cells");
        Ok(Outcome::Lossy { flattened_cells })
    } else {
        Ok(Outcome::Exact)
    }
}

/// The sorted union of keys across all rows.
pub fn header_union<'a>(rows: &[&'a BTreeMap<String, Value>]) -> Vec<&'a str> {
    let keys: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    keys.into_iter().collect()
}

/// Join every leaf scalar under `value` with [`FLATTEN_SEPARATOR`], visiting
/// map entries in key order.
pub fn flatten(value: &Value) -> String {
    match value {
        Value::List(items) => items
            .iter()
            .map(flatten)
            .collect::<Vec<_>>()
            .join(FLATTEN_SEPARATOR),
        Value::Map(map) => map
            .values()
            .map(flatten)
            .collect::<Vec<_>>()
            .join(FLATTEN_SEPARATOR),
        scalar => scalar.render_scalar(),
    }
}

fn collect_rows(value: &Value) -> Result<Vec<&BTreeMap<String, Value>>> {
    match value {
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_map().ok_or_else(|| {
                    ConvertError::UnsupportedShape(format!(
                        "list item {} is a {}, expected a map to use as a CSV row",
                        i,
                        item.kind_name()
                    ))
                })
            })
            .collect(),
        Value::Map(map) if map.is_empty() => Err(ConvertError::UnsupportedShape(
            "empty map has no columns".to_string(),
        )),
        Value::Map(map) => Ok(vec![map]),
        other => Err(ConvertError::UnsupportedShape(format!(
            "a bare {} cannot be written as CSV rows",
            other.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_must_be_plain_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('"').is_err());
        assert!(delimiter_byte('\n').is_err());
        assert!(delimiter_byte('é').is_err());
    }

    #[test]
    fn flatten_visits_map_keys_in_order() {
        let value = crate::coerce(r#"{"z": 1, "a": [true, null, "x"]}"#);
        assert_eq!(flatten(&value), "true |  | x | 1");
    }
}
