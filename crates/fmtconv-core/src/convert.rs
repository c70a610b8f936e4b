//! Conversion entry points: one function per (source, destination) pair,
//! plus a [`convert`] dispatcher over [`Format`].
//!
//! Every entry point reads the whole source into a [`Value`] (or an
//! [`XmlElement`] tree), maps it if the destination model differs, and renders
//! the destination into a buffer. The output stream is only written once
//! rendering has succeeded, so a failed conversion writes nothing.

use crate::error::{ConvertError, Result};
use crate::mapper::{check_tag_name, value_to_document, xml_to_value};
use crate::tabular::{read_csv, write_csv};
use crate::value::Value;
use crate::xml::{parse_xml, write_xml, XmlElement};
use crate::yaml::{parse_yaml, write_yaml};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufReader, Read, Write};
use std::str::FromStr;

/// Element name used for each row when CSV data is written as XML.
pub const CSV_ROW_TAG: &str = "row";

/// Result of a conversion that did not fail.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every value in the source is represented in the output.
    Exact,
    /// The output was written, but nested values were flattened into
    /// `flattened_cells` CSV cells and their structure is gone.
    Lossy { flattened_cells: usize },
}

impl Outcome {
    pub fn is_lossy(&self) -> bool {
        matches!(self, Outcome::Lossy { .. })
    }
}

/// The four supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Csv,
    Xml,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Csv, Format::Xml, Format::Yaml];

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            "xml" => Ok(Format::Xml),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(ConvertError::UnknownFormat(s.to_string())),
        }
    }
}

/// Per-call settings. Only the options relevant to the chosen formats are
/// consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// CSV field delimiter, used for both reading and writing.
    pub delimiter: char,
    /// Name of the document element when writing XML.
    pub root_tag: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter: ',',
            root_tag: "root".to_string(),
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_root_tag(mut self, root_tag: impl Into<String>) -> Self {
        self.root_tag = root_tag.into();
        self
    }
}

/// Convert `input` in format `from` to `output` in format `to`.
///
/// Same-format conversions still go through the model, so they normalize the
/// document (sorted keys, canonical numbers, re-indented XML).
pub fn convert<R: Read, W: Write>(
    from: Format,
    to: Format,
    input: R,
    output: W,
    options: &Options,
) -> Result<Outcome> {
    tracing::debug!(%from, %to, "converting");
    let delimiter = options.delimiter;
    let root_tag = options.root_tag.as_str();
    match (from, to) {
        (Format::Json, Format::Json) => {
            let value = read_json(input)?;
            emit(output, render_json(&value)?)
        }
        (Format::Json, Format::Csv) => json_to_csv(input, output, delimiter),
        (Format::Json, Format::Xml) => json_to_xml(input, output, root_tag),
        (Format::Json, Format::Yaml) => json_to_yaml(input, output),
        (Format::Csv, Format::Json) => csv_to_json(input, output, delimiter),
        (Format::Csv, Format::Csv) => {
            let value = read_csv(input, delimiter)?;
            render_csv(output, &value, delimiter)
        }
        (Format::Csv, Format::Xml) => csv_to_xml(input, output, delimiter, root_tag),
        (Format::Csv, Format::Yaml) => csv_to_yaml(input, output, delimiter),
        (Format::Xml, Format::Json) => xml_to_json(input, output),
        (Format::Xml, Format::Csv) => xml_to_csv(input, output, delimiter),
        (Format::Xml, Format::Xml) => {
            let root = parse_xml(BufReader::new(input))?;
            emit(output, render_xml(&root)?)
        }
        (Format::Xml, Format::Yaml) => xml_to_yaml(input, output),
        (Format::Yaml, Format::Json) => yaml_to_json(input, output),
        (Format::Yaml, Format::Csv) => yaml_to_csv(input, output, delimiter),
        (Format::Yaml, Format::Xml) => yaml_to_xml(input, output, root_tag),
        (Format::Yaml, Format::Yaml) => {
            let value = parse_yaml(input)?;
            emit(output, render_yaml(&value)?)
        }
    }
}

pub fn json_to_csv<R: Read, W: Write>(input: R, output: W, delimiter: char) -> Result<Outcome> {
    let value = read_json(input)?;
    render_csv(output, &value, delimiter)
}

pub fn json_to_xml<R: Read, W: Write>(input: R, output: W, root_tag: &str) -> Result<Outcome> {
    check_tag_name(root_tag)?;
    let value = read_json(input)?;
    let root = value_to_document(&value, root_tag, root_tag)?;
    emit(output, render_xml(&root)?)
}

pub fn json_to_yaml<R: Read, W: Write>(input: R, output: W) -> Result<Outcome> {
    let value = read_json(input)?;
    emit(output, render_yaml(&value)?)
}

pub fn csv_to_json<R: Read, W: Write>(input: R, output: W, delimiter: char) -> Result<Outcome> {
    let value = read_csv(input, delimiter)?;
    emit(output, render_json(&value)?)
}

/// Rows are written as `<row>` elements under `root_tag`.
pub fn csv_to_xml<R: Read, W: Write>(
    input: R,
    output: W,
    delimiter: char,
    root_tag: &str,
) -> Result<Outcome> {
    check_tag_name(root_tag)?;
    let value = read_csv(input, delimiter)?;
    let root = value_to_document(&value, root_tag, CSV_ROW_TAG)?;
    emit(output, render_xml(&root)?)
}

pub fn csv_to_yaml<R: Read, W: Write>(input: R, output: W, delimiter: char) -> Result<Outcome> {
    let value = read_csv(input, delimiter)?;
    emit(output, render_yaml(&value)?)
}

/// The result is a single-entry map keyed by the root tag.
pub fn xml_to_json<R: Read, W: Write>(input: R, output: W) -> Result<Outcome> {
    let value = read_xml_document(input)?;
    emit(output, render_json(&value)?)
}

/// Rows come from the root element's mapped value: a list supplies one row
/// per item, anything else is a single row.
pub fn xml_to_csv<R: Read, W: Write>(input: R, output: W, delimiter: char) -> Result<Outcome> {
    let root = parse_xml(BufReader::new(input))?;
    let rows = match xml_to_value(&root) {
        list @ Value::List(_) => list,
        single => Value::List(vec![single]),
    };
    render_csv(output, &rows, delimiter)
}

/// The result is a single-entry map keyed by the root tag.
pub fn xml_to_yaml<R: Read, W: Write>(input: R, output: W) -> Result<Outcome> {
    let value = read_xml_document(input)?;
    emit(output, render_yaml(&value)?)
}

pub fn yaml_to_json<R: Read, W: Write>(input: R, output: W) -> Result<Outcome> {
    let value = parse_yaml(input)?;
    emit(output, render_json(&value)?)
}

pub fn yaml_to_csv<R: Read, W: Write>(input: R, output: W, delimiter: char) -> Result<Outcome> {
    let value = parse_yaml(input)?;
    render_csv(output, &value, delimiter)
}

pub fn yaml_to_xml<R: Read, W: Write>(input: R, output: W, root_tag: &str) -> Result<Outcome> {
    check_tag_name(root_tag)?;
    let value = parse_yaml(input)?;
    let root = value_to_document(&value, root_tag, root_tag)?;
    emit(output, render_xml(&root)?)
}

fn read_json<R: Read>(input: R) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_reader(input)?;
    Ok(Value::from(json))
}

/// Parse XML and wrap the mapped root as `{root_tag: value}`.
fn read_xml_document<R: Read>(input: R) -> Result<Value> {
    let root = parse_xml(BufReader::new(input))?;
    let value = xml_to_value(&root);
    Ok(Value::Map(BTreeMap::from([(root.tag, value)])))
}

/// Pretty-printed JSON with two-space indentation and a trailing newline.
fn render_json(value: &Value) -> Result<Vec<u8>> {
    let mut buf = serde_json::to_vec_pretty(value)?;
    buf.push(b'\n');
    Ok(buf)
}

fn render_xml(root: &XmlElement) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_xml(root, &mut buf)?;
    Ok(buf)
}

fn render_yaml(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_yaml(value, &mut buf)?;
    Ok(buf)
}

fn render_csv<W: Write>(output: W, value: &Value, delimiter: char) -> Result<Outcome> {
    let mut buf = Vec::new();
    let outcome = write_csv(value, &mut buf, delimiter)?;
    emit(output, buf)?;
    Ok(outcome)
}

fn emit<W: Write>(mut output: W, bytes: Vec<u8>) -> Result<Outcome> {
    output.write_all(&bytes)?;
    output.flush()?;
    Ok(Outcome::Exact)
}
