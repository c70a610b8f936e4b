use fmtconv_core::tabular::{delimiter_byte, header_union, FLATTEN_SEPARATOR};
use fmtconv_core::*;

fn read(text: &str) -> Value {
    read_csv(text.as_bytes(), ',').unwrap()
}

fn write(value: &Value) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = write_csv(value, &mut out, ',').unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn rows_are_maps_keyed_by_header() {
    let value = read("id,name\n1,Alice\n2,Bob\n");
    let rows = value.as_list().unwrap();
    assert_eq!(rows.len(), 2);
    let first = rows[0].as_map().unwrap();
    assert_eq!(first["id"], Value::Number(1.0));
    assert_eq!(first["name"], Value::String("Alice".into()));
}

#[test]
fn header_only_is_an_empty_list() {
    assert_eq!(read("a,b\n"), Value::List(vec![]));
}

#[test]
fn empty_input_is_rejected() {
    let err = read_csv("".as_bytes(), ',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyOrUnsupportedShape);
}

#[test]
fn quoted_cells_keep_delimiters_and_newlines() {
    let value = read("note\n\"a, b\"\n\"line1\nline2\"\n");
    let rows = value.as_list().unwrap();
    assert_eq!(rows[0].as_map().unwrap()["note"], Value::String("a, b".into()));
    assert_eq!(
        rows[1].as_map().unwrap()["note"],
        Value::String("line1\nline2".into())
    );
}

#[test]
fn cells_holding_json_become_containers() {
    let value = read("tags\n\"[1,2]\"\n");
    let rows = value.as_list().unwrap();
    assert_eq!(
        rows[0].as_map().unwrap()["tags"],
        Value::List(vec![Value::Number(1.0), Value::Number(2.0)])
    );
}

#[test]
fn tab_delimited() {
    let value = read_csv("a\tb\n1\t2\n".as_bytes(), '\t').unwrap();
    assert_eq!(value.as_list().unwrap()[0].as_map().unwrap()["b"], Value::Number(2.0));
}

#[test]
fn long_row_is_a_mismatch() {
    let err = read_csv("a\n1\n2,3\n".as_bytes(), ',').unwrap_err();
    assert!(matches!(
        err,
        ConvertError::ColumnMismatch {
            row: 2,
            expected: 1,
            found: 2
        }
    ));
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn header_is_sorted_union_and_missing_cells_are_empty() {
    let value = coerce(r#"[{"b": 1}, {"a": 2, "c": 3}]"#);
    let (outcome, text) = write(&value);
    assert_eq!(outcome, Outcome::Exact);
    assert_eq!(text, "a,b,c\n,1,\n2,,3\n");
}

#[test]
fn nested_cells_are_flattened_and_counted() {
    let value = coerce(r#"[{"k": {"x": [1, 2], "y": "z"}, "n": 1}, {"k": [], "n": 2}]"#);
    let (outcome, text) = write(&value);
    assert_eq!(outcome, Outcome::Lossy { flattened_cells: 2 });
    assert_eq!(text, format!("k,n\n1{sep}2{sep}z,1\n,2\n", sep = FLATTEN_SEPARATOR));
}

#[test]
fn non_map_item_is_unsupported() {
    let mut out = Vec::new();
    let err = write_csv(&coerce(r#"[{"a": 1}, 2]"#), &mut out, ',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyOrUnsupportedShape);
    assert!(err.to_string().contains("list item 1"));
}

#[test]
fn empty_map_is_unsupported() {
    let mut out = Vec::new();
    assert!(write_csv(&coerce("{}"), &mut out, ',').is_err());
}

#[test]
fn header_union_helper() {
    let a = coerce(r#"{"z": 1, "m": 2}"#);
    let b = coerce(r#"{"a": 1, "m": 2}"#);
    let rows = vec![a.as_map().unwrap(), b.as_map().unwrap()];
    assert_eq!(header_union(&rows), ["a", "m", "z"]);
}

#[test]
fn delimiter_validation() {
    assert_eq!(delimiter_byte('|').unwrap(), b'|');
    assert!(matches!(
        delimiter_byte('\r'),
        Err(ConvertError::InvalidDelimiter('\r'))
    ));
}
