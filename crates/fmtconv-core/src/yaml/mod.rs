//! A small YAML dialect: block maps and block lists, one scalar per line.
//!
//! Both directions are hand-written. The parser tracks indentation with a
//! stack and peeks one line ahead to decide whether an elided container is a
//! list or a map; the writer renders keys in sorted order with two spaces per
//! level and never emits flow style for non-empty collections.
//!
//! Anchors, tags, block scalars and multi-document streams are not supported.

mod parser;
mod writer;

pub use parser::parse_yaml;
pub use writer::{to_yaml_string, write_yaml};
