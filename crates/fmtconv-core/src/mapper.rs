//! Reconciles XML's ordered, repeatable tags with the Value model's maps and
//! lists.
//!
//! Value → XML is straightforward: map keys become child tags and lists become
//! repeated siblings. XML → Value has to guess, and the guess is a decision
//! table over the element's children grouped by tag (see [`ElementShape`]).
//! The two directions are deliberately not inverses: a list nested under a
//! single repeated tag comes back without its wrapper.

use crate::coerce::coerce;
use crate::error::{ConvertError, Result};
use crate::value::Value;
use crate::xml::XmlElement;
use std::collections::BTreeMap;

/// Children of one element that share a tag, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup<'a> {
    pub tag: &'a str,
    pub members: Vec<&'a XmlElement>,
}

/// Group an element's children by tag, keeping the order in which each
/// distinct tag first appears.
pub fn group_children(element: &XmlElement) -> Vec<TagGroup<'_>> {
    let mut groups: Vec<TagGroup<'_>> = Vec::new();
    for child in &element.children {
        match groups.iter_mut().find(|g| g.tag == child.tag) {
            Some(group) => group.members.push(child),
            None => groups.push(TagGroup {
                tag: &child.tag,
                members: vec![child],
            }),
        }
    }
    groups
}

/// What an element becomes when mapped to a [`Value`].
///
/// | distinct child tags | children with that tag | shape      |
/// |---------------------|------------------------|------------|
/// | 0                   | -                      | `Scalar`   |
/// | 1                   | more than 1            | `List`     |
/// | 1                   | exactly 1              | `Map`      |
/// | 2 or more           | any                    | `Map`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    /// Leaf: the text is coerced to a scalar.
    Scalar,
    /// One tag repeated: a list of the children, tag name discarded.
    List,
    /// Mixed or single children: a map from tag to value (or list of values).
    Map,
}

/// Apply the decision table to a set of tag groups.
pub fn element_shape(groups: &[TagGroup<'_>]) -> ElementShape {
    match groups {
        [] => ElementShape::Scalar,
        [only] if only.members.len() > 1 => ElementShape::List,
        _ => ElementShape::Map,
    }
}

/// Map an XML element to a [`Value`] (the element's own tag is not included).
///
/// ```
/// use fmtconv_core::{parse_xml, xml_to_value, Value};
///
/// let root = parse_xml("<items><item>1</item><item>2</item></items>".as_bytes()).unwrap();
/// assert_eq!(xml_to_value(&root), Value::List(vec![Value::Number(1.0), Value::Number(2.0)]));
/// ```
pub fn xml_to_value(element: &XmlElement) -> Value {
    let groups = group_children(element);
    match element_shape(&groups) {
        ElementShape::Scalar => coerce(&element.text),
        ElementShape::List => {
            Value::List(groups[0].members.iter().map(|c| xml_to_value(c)).collect())
        }
        ElementShape::Map => {
            let map: BTreeMap<String, Value> = groups
                .iter()
                .map(|group| {
                    let value = match group.members.as_slice() {
                        [single] => xml_to_value(single),
                        many => Value::List(many.iter().map(|c| xml_to_value(c)).collect()),
                    };
                    (group.tag.to_string(), value)
                })
                .collect();
            Value::Map(map)
        }
    }
}

/// Map a [`Value`] to the elements it produces under `tag`.
///
/// A map yields one element whose children come from each entry (a list entry
/// yields one child per item, all named after the key). A list yields one
/// element per item, all named `tag`, with no wrapping element. A scalar
/// yields a leaf with its plain-text rendering.
///
/// Every element name, `tag` and each map key below it, must pass
/// [`check_tag_name`]; otherwise the result is
/// [`ConvertError::InvalidTagName`].
pub fn value_to_xml(value: &Value, tag: &str) -> Result<Vec<XmlElement>> {
    check_tag_name(tag)?;
    match value {
        Value::List(items) => {
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                elements.extend(value_to_xml(item, tag)?);
            }
            Ok(elements)
        }
        Value::Map(map) => Ok(vec![XmlElement::branch(tag, map_children(map)?)]),
        scalar => Ok(vec![XmlElement::leaf(tag, scalar.render_scalar())]),
    }
}

/// Build a single-rooted document for `value`.
///
/// Maps and scalars become the root element named `root_tag`. A list cannot
/// be a document on its own, so it is wrapped in a `root_tag` element whose
/// children are the list items, each named `item_tag`.
pub fn value_to_document(value: &Value, root_tag: &str, item_tag: &str) -> Result<XmlElement> {
    check_tag_name(root_tag)?;
    match value {
        Value::List(_) => Ok(XmlElement::branch(root_tag, value_to_xml(value, item_tag)?)),
        Value::Map(map) => Ok(XmlElement::branch(root_tag, map_children(map)?)),
        scalar => Ok(XmlElement::leaf(root_tag, scalar.render_scalar())),
    }
}

fn map_children(map: &BTreeMap<String, Value>) -> Result<Vec<XmlElement>> {
    let mut children = Vec::new();
    for (key, child) in map {
        children.extend(value_to_xml(child, key)?);
    }
    Ok(children)
}

/// Accept names that start with a letter or underscore and continue with
/// letters, digits, `-`, `_` or `.`.
pub fn check_tag_name(tag: &str) -> Result<()> {
    let mut chars = tag.chars();
    let valid = match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConvertError::InvalidTagName(tag.to_string()))
    }
}
