//! Error types for conversion operations.

use thiserror::Error;

/// Errors that can occur while reading, mapping, or writing a document.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV reader or writer failed (bad quoting, invalid UTF-8, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV data row had a different number of fields than the header.
    /// `row` is 1-based over data rows (the header is row 0).
    #[error("CSV row {row} has {found} fields, header has {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The XML token stream was malformed.
    #[error("XML syntax error at byte {position}: {message}")]
    XmlSyntax { position: u64, message: String },

    /// A closing tag did not match the innermost open element.
    #[error("mismatched XML tags: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },

    /// A closing tag appeared with no element open.
    #[error("unexpected XML end tag </{tag}>")]
    UnexpectedEndTag { tag: String },

    /// Input ended while elements were still open.
    #[error("unbalanced XML: <{open}> is never closed")]
    UnbalancedXml { open: String },

    /// The XML input held no element at all.
    #[error("empty XML document: no root element found")]
    EmptyDocument,

    /// A second top-level element followed the root.
    #[error("invalid XML: second root element <{tag}>")]
    MultipleRoots { tag: String },

    /// A YAML line was indented under a container of the wrong kind.
    #[error("invalid YAML indentation at line {line}: {message}")]
    Indentation { line: usize, message: String },

    /// A YAML line matched neither a list item nor a `key:` pair.
    #[error("invalid YAML syntax at line {line}: {content}")]
    InvalidYamlSyntax { line: usize, content: String },

    /// The value cannot be expressed in the destination format.
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// The delimiter is not a single-byte, non-quote, non-newline character.
    #[error("invalid delimiter {0:?}: must be a single ASCII character other than a quote or newline")]
    InvalidDelimiter(char),

    /// The requested root tag is not a usable XML element name.
    #[error("invalid XML tag name {0:?}")]
    InvalidTagName(String),

    /// The format name is not one of json, csv, xml, yaml.
    #[error("unknown format {0:?}: expected one of json, csv, xml, yaml")]
    UnknownFormat(String),

    /// XML writer failure.
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    /// Reading the input or writing the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`ConvertError`], for callers that only need
/// to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source text failed structural parsing.
    MalformedInput,
    /// XML tags were mismatched or left open.
    UnbalancedStructure,
    /// The value has a shape the destination cannot express.
    EmptyOrUnsupportedShape,
    /// A caller-supplied option was invalid.
    InvalidArgument,
    /// The underlying stream failed.
    Io,
}

impl ConvertError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Json(e) if e.is_io() => ErrorKind::Io,
            ConvertError::Csv(e) if e.is_io_error() => ErrorKind::Io,
            ConvertError::Json(_)
            | ConvertError::Csv(_)
            | ConvertError::ColumnMismatch { .. }
            | ConvertError::XmlSyntax { .. }
            | ConvertError::MultipleRoots { .. }
            | ConvertError::Indentation { .. }
            | ConvertError::InvalidYamlSyntax { .. } => ErrorKind::MalformedInput,
            ConvertError::MismatchedTag { .. }
            | ConvertError::UnexpectedEndTag { .. }
            | ConvertError::UnbalancedXml { .. } => ErrorKind::UnbalancedStructure,
            ConvertError::EmptyDocument | ConvertError::UnsupportedShape(_) => {
                ErrorKind::EmptyOrUnsupportedShape
            }
            ConvertError::InvalidDelimiter(_)
            | ConvertError::InvalidTagName(_)
            | ConvertError::UnknownFormat(_) => ErrorKind::InvalidArgument,
            ConvertError::XmlWrite(_) | ConvertError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Convenience alias used throughout fmtconv-core.
pub type Result<T> = std::result::Result<T, ConvertError>;
