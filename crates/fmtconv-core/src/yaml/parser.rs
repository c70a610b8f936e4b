//! Indentation-stack YAML reader.
//!
//! # Key design decisions
//!
//! - **Arena of containers**: a container's kind is sometimes only known after
//!   it has been linked into its parent (see lookahead below), so containers
//!   live in an arena and are referenced by index while parsing. A single
//!   `freeze` pass at the end turns the arena into a plain [`Value`] tree.
//! - **Sentinel frame**: the stack starts with the root container at indent
//!   `-1`, which is never popped.
//! - **One-line lookahead**: `key:` or a bare `-` with nothing after it opens a
//!   list if the next significant line is a list item, otherwise a map.

use crate::coerce::{coerce, looks_like_collection, strip_matching_quotes};
use crate::error::{ConvertError, Result};
use crate::value::Value;
use std::collections::BTreeMap;
use std::io::Read;

type NodeId = usize;

/// A value slot inside a container under construction.
#[derive(Debug)]
enum Slot {
    Scalar(Value),
    Node(NodeId),
}

#[derive(Debug)]
enum Node {
    List(Vec<Slot>),
    Map(BTreeMap<String, Slot>),
}

impl Node {
    fn empty(is_list: bool) -> Self {
        if is_list {
            Node::List(Vec::new())
        } else {
            Node::Map(BTreeMap::new())
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    indent: isize,
    node: NodeId,
}

/// A non-blank, non-comment line: its 1-based number, leading-space count and
/// content with surrounding whitespace removed.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

/// Parse YAML text into a [`Value`].
///
/// The root is a `List` if the first significant line is a list item and a
/// `Map` otherwise (including for empty input).
pub fn parse_yaml<R: Read>(mut input: R) -> Result<Value> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    parse_str(&text)
}

pub(crate) fn parse_str(text: &str) -> Result<Value> {
    let lines = significant_lines(text);
    let mut parser = Parser::new(lines.first().is_some_and(|l| is_item(l.content)));
    for (pos, line) in lines.iter().enumerate() {
        let next = lines.get(pos + 1);
        parser.line(line, next)?;
    }
    let value = parser.finish();
    tracing::debug!(lines = lines.len(), kind = value.kind_name(), "parsed YAML document");
    Ok(value)
}

fn significant_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let content = raw.trim_start_matches(' ');
            let indent = raw.len() - content.len();
            let content = content.trim();
            if content.is_empty() || content.starts_with('#') {
                None
            } else {
                Some(Line {
                    number: i + 1,
                    indent,
                    content,
                })
            }
        })
        .collect()
}

/// `- item` or a bare `-`.
fn is_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

/// Text after the item marker.
fn item_rest(content: &str) -> &str {
    content[1..].trim()
}

/// Does the next significant line open a list?
fn opens_list(next: Option<&Line<'_>>) -> bool {
    next.is_some_and(|l| is_item(l.content))
}

fn split_key_value(content: &str) -> Option<(String, &str)> {
    if starts_with_quote(content) {
        if let Some(pair) = split_quoted_key(content) {
            return Some(pair);
        }
    }
    let (key, value) = content.split_once(':')?;
    let key = key.trim();
    let key = strip_matching_quotes(key).unwrap_or(key);
    Some((key.to_string(), value.trim()))
}

/// `"key": value` or `'key': value`. The key ends at the first matching
/// quote, so it may itself contain `:`.
fn split_quoted_key(content: &str) -> Option<(String, &str)> {
    let quote = content.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let close = content[1..].find(quote)? + 1;
    let value = content[close + 1..].trim_start().strip_prefix(':')?;
    Some((content[1..close].to_string(), value.trim()))
}

fn starts_with_quote(content: &str) -> bool {
    content.starts_with(['"', '\''])
}

/// The `key: value` pair held by a list-item remainder, if any.
///
/// A remainder that opens with a quote is a pair only when the quoted span is
/// followed by `:`; otherwise it is one quoted scalar, whatever it contains.
/// Bracketed literals are always scalars.
fn list_item_pair(rest: &str) -> Option<(String, &str)> {
    if starts_with_quote(rest) {
        split_quoted_key(rest)
    } else if looks_like_collection(rest) {
        None
    } else {
        split_key_value(rest)
    }
}

struct Parser {
    nodes: Vec<Node>,
    stack: Vec<Frame>,
}

impl Parser {
    fn new(root_is_list: bool) -> Self {
        Self {
            nodes: vec![Node::empty(root_is_list)],
            stack: vec![Frame { indent: -1, node: 0 }],
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn top(&self) -> NodeId {
        // The sentinel is never popped.
        self.stack[self.stack.len() - 1].node
    }

    fn push_frame(&mut self, indent: usize, offset: usize, node: NodeId) {
        self.stack.push(Frame {
            indent: (indent + offset) as isize,
            node,
        });
    }

    fn line(&mut self, line: &Line<'_>, next: Option<&Line<'_>>) -> Result<()> {
        let indent = line.indent as isize;
        while self.stack.len() > 1 && indent <= self.stack[self.stack.len() - 1].indent {
            self.stack.pop();
        }

        if is_item(line.content) {
            self.list_item(line, next)
        } else if line.content.contains(':') {
            self.map_entry(line, next)
        } else {
            Err(ConvertError::InvalidYamlSyntax {
                line: line.number,
                content: line.content.to_string(),
            })
        }
    }

    fn list_item(&mut self, line: &Line<'_>, next: Option<&Line<'_>>) -> Result<()> {
        let parent = self.top();
        if !matches!(self.nodes[parent], Node::List(_)) {
            return Err(ConvertError::Indentation {
                line: line.number,
                message: "list item where a map entry was expected".to_string(),
            });
        }

        let rest = item_rest(line.content);
        let slot = if rest.is_empty() {
            let child = self.alloc(Node::empty(opens_list(next)));
            self.push_frame(line.indent, 0, child);
            Slot::Node(child)
        } else if is_item(rest) {
            let seed = coerce(item_rest(rest));
            let child = self.alloc(Node::List(vec![Slot::Scalar(seed)]));
            self.push_frame(line.indent, 1, child);
            Slot::Node(child)
        } else if let Some((key, value)) = list_item_pair(rest) {
            let mut entry = BTreeMap::new();
            let nested = if value.is_empty() {
                let grandchild = self.alloc(Node::empty(opens_list(next)));
                entry.insert(key, Slot::Node(grandchild));
                Some(grandchild)
            } else {
                entry.insert(key, Slot::Scalar(coerce(value)));
                None
            };
            let child = self.alloc(Node::Map(entry));
            self.push_frame(line.indent, 1, child);
            if let Some(grandchild) = nested {
                // The key sits two columns right of the dash.
                self.push_frame(line.indent, 2, grandchild);
            }
            Slot::Node(child)
        } else {
            Slot::Scalar(coerce(rest))
        };

        if let Node::List(items) = &mut self.nodes[parent] {
            items.push(slot);
        }
        Ok(())
    }

    fn map_entry(&mut self, line: &Line<'_>, next: Option<&Line<'_>>) -> Result<()> {
        let parent = self.top();
        if !matches!(self.nodes[parent], Node::Map(_)) {
            return Err(ConvertError::Indentation {
                line: line.number,
                message: "key/value pair where a list item was expected".to_string(),
            });
        }

        let Some((key, value)) = split_key_value(line.content) else {
            return Err(ConvertError::InvalidYamlSyntax {
                line: line.number,
                content: line.content.to_string(),
            });
        };

        let slot = if value.is_empty() {
            let child = self.alloc(Node::empty(opens_list(next)));
            self.push_frame(line.indent, 0, child);
            Slot::Node(child)
        } else {
            Slot::Scalar(coerce(value))
        };

        if let Node::Map(map) = &mut self.nodes[parent] {
            map.insert(key, slot);
        }
        Ok(())
    }

    fn finish(mut self) -> Value {
        self.freeze(0)
    }

    /// Replace container handles with plain values. Each node has exactly one
    /// parent, so it can be moved out of the arena.
    fn freeze(&mut self, id: NodeId) -> Value {
        match std::mem::replace(&mut self.nodes[id], Node::List(Vec::new())) {
            Node::List(items) => Value::List(
                items
                    .into_iter()
                    .map(|slot| self.freeze_slot(slot))
                    .collect(),
            ),
            Node::Map(map) => Value::Map(
                map.into_iter()
                    .map(|(key, slot)| (key, self.freeze_slot(slot)))
                    .collect(),
            ),
        }
    }

    fn freeze_slot(&mut self, slot: Slot) -> Value {
        match slot {
            Slot::Scalar(value) => value,
            Slot::Node(id) => self.freeze(id),
        }
    }
}
