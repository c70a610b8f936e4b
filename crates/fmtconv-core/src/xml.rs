//! Order-preserving XML element tree, with a streaming reader and an
//! indenting writer.
//!
//! The tree is the intermediate form for anything still "XML-shaped": sibling
//! order is kept exactly as in the document. Attributes, comments, processing
//! instructions and DOCTYPE declarations are not part of the model and are
//! skipped on read.

use crate::error::{ConvertError, Result};
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};

/// One element: a tag, its child elements in document order, and its
/// character data.
///
/// An element with children is a branch and its `text` is ignored; an
/// element without children is a leaf whose `text` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub tag: String,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    /// An element with no children and no text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A leaf carrying `text`.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
            text: text.into(),
        }
    }

    /// A branch holding `children`.
    pub fn branch(tag: impl Into<String>, children: Vec<XmlElement>) -> Self {
        Self {
            tag: tag.into(),
            children,
            text: String::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Parse an XML document into its root element.
///
/// Open elements are kept on a stack. Non-blank character data (trimmed)
/// becomes the innermost open element's text; a closing tag pops the stack and
/// attaches the element to its parent, or makes it the root when the stack
/// empties.
pub fn parse_xml<R: BufRead>(input: R) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(input);
    {
        let config = reader.config_mut();
        config.trim_text(true);
        config.expand_empty_elements = true;
        // Tag matching is checked here so the error can name both tags.
        config.check_end_names = false;
    }

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() && root.is_some() {
                    return Err(ConvertError::MultipleRoots { tag });
                }
                stack.push(XmlElement::new(tag));
            }
            Ok(Event::End(e)) => {
                let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let element = stack
                    .pop()
                    .ok_or_else(|| ConvertError::UnexpectedEndTag { tag: found.clone() })?;
                if element.tag != found {
                    return Err(ConvertError::MismatchedTag {
                        expected: element.tag,
                        found,
                    });
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| ConvertError::XmlSyntax {
                    position: reader.buffer_position() as u64,
                    message: format!("invalid text content: {}", err),
                })?;
                set_text(&mut stack, &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                set_text(&mut stack, &text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(quick_xml::Error::IllFormed(IllFormedError::UnmatchedEndTag(tag))) => {
                return Err(ConvertError::UnexpectedEndTag { tag });
            }
            Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(open))) => {
                return Err(ConvertError::UnbalancedXml { open });
            }
            Err(e) => {
                return Err(ConvertError::XmlSyntax {
                    position: reader.error_position() as u64,
                    message: e.to_string(),
                });
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(ConvertError::UnbalancedXml { open: open.tag });
    }
    let root = root.ok_or(ConvertError::EmptyDocument)?;
    tracing::debug!(root = %root.tag, children = root.children.len(), "parsed XML document");
    Ok(root)
}

fn set_text(stack: &mut [XmlElement], text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.text = trimmed.to_string();
    }
}

/// Write `root` as an XML document: a UTF-8 declaration line, then the tree
/// indented two spaces per level, then a trailing newline.
///
/// Leaves without text are written self-closing.
pub fn write_xml<W: Write>(root: &XmlElement, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let tag = element.tag.as_str();
    if element.is_leaf() && element.text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if element.is_leaf() {
        writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    } else {
        for child in &element.children {
            write_element(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
