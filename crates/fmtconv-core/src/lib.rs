//! # fmtconv-core
//!
//! Converts structured data between **JSON**, **CSV**, **XML** and **YAML** by
//! routing every conversion through one format-neutral [`Value`] tree.
//!
//! The formats disagree about shape: CSV is a flat table, XML is an ordered
//! list of repeatable tags, JSON and YAML are nested maps and lists. The
//! modules here hold the mappings that reconcile them, plus a hand-written
//! YAML reader and writer.
//!
//! ## Quick start
//!
//! ```rust
//! use fmtconv_core::{json_to_csv, Outcome};
//!
//! let json = r#"[{"id":1,"name":"Alice","active":true},{"id":2,"name":"Bob","active":false}]"#;
//! let mut csv = Vec::new();
//! let outcome = json_to_csv(json.as_bytes(), &mut csv, ',').unwrap();
//! assert_eq!(outcome, Outcome::Exact);
//! assert_eq!(String::from_utf8(csv).unwrap(), "active,id,name\ntrue,1,Alice\nfalse,2,Bob\n");
//! ```
//!
//! ## Modules
//!
//! - [`value`]: the `Value` model and its JSON bridge
//! - [`coerce`]: raw text → typed scalar
//! - [`tabular`]: CSV reading and writing (header union, flattening)
//! - [`xml`]: order-preserving element tree, reader and writer
//! - [`mapper`]: Value ⇄ XML element heuristics
//! - [`yaml`]: indentation-based YAML reader and writer
//! - [`convert`]: the conversion entry points and the `Format` dispatcher
//! - [`error`]: error types

pub mod coerce;
pub mod convert;
pub mod error;
pub mod mapper;
pub mod tabular;
pub mod value;
pub mod xml;
pub mod yaml;

pub use coerce::coerce;
pub use convert::{
    convert, csv_to_json, csv_to_xml, csv_to_yaml, json_to_csv, json_to_xml, json_to_yaml,
    xml_to_csv, xml_to_json, xml_to_yaml, yaml_to_csv, yaml_to_json, yaml_to_xml, Format,
    Options, Outcome,
};
pub use error::{ConvertError, ErrorKind};
pub use mapper::{
    check_tag_name, element_shape, group_children, value_to_document, value_to_xml, xml_to_value,
    ElementShape,
};
pub use tabular::{flatten, read_csv, write_csv};
pub use value::Value;
pub use xml::{parse_xml, write_xml, XmlElement};
pub use yaml::{parse_yaml, to_yaml_string, write_yaml};
