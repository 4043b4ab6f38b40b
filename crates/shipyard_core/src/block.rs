//! Generic indented-block parser.
//!
//! Converts a region of nested lines into an [`AttributeMap`]. Nesting is
//! tracked with an explicit stack of open frames, so arbitrarily deep input
//! cannot exhaust the call stack.

use crate::description::DescriptionBuffer;
use crate::source::SourceFile;
use crate::token::{extract, strip_quotes, Token};
use crate::value::{AttributeMap, Value};

/// Key under which a sprite's nested block is stored.
pub const SPRITE_DATA: &str = "spriteData";

/// How a line at the current depth is treated.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    /// `sprite <path>`, with `data` set when an indented block follows.
    Sprite { path: String, data: bool },
    /// A key with a value (flags carry `true`).
    Field(String, Value),
    /// A key that opens a nested block.
    Block(String),
    /// Anything else.
    Text(String),
}

/// Classify the line at `index`.
pub(crate) fn classify(source: &SourceFile, index: usize) -> Line {
    let opens_block = source.opens_block(index);
    match extract(source.line(index), opens_block) {
        Some(Token::Pair(key, value)) if key == "sprite" => match value.to_text() {
            Some(path) => Line::Sprite {
                path,
                data: opens_block,
            },
            None => Line::Field(key, value),
        },
        Some(Token::Pair(key, value)) => Line::Field(key, value),
        Some(Token::Flag(key)) => Line::Field(key, Value::Bool(true)),
        Some(Token::Block(key)) => Line::Block(key),
        None if opens_block => Line::Block(strip_quotes(source.text(index))),
        None => Line::Text(source.text(index).to_string()),
    }
}

/// An open nesting level.
#[derive(Debug)]
struct Frame {
    indent: usize,
    key: Option<String>,
    map: AttributeMap,
    description: DescriptionBuffer,
}

impl Frame {
    fn new(indent: usize, key: Option<String>) -> Self {
        Self {
            indent,
            key,
            map: AttributeMap::new(),
            description: DescriptionBuffer::new(),
        }
    }

    fn finish(self) -> (Option<String>, AttributeMap) {
        let Self {
            key,
            mut map,
            description,
            ..
        } = self;
        if let Some(text) = description.finish() {
            map.push("description", Value::String(text));
        }
        (key, map)
    }
}

/// Pop the top frame into its parent. Returns the finished map once the root closes.
fn close(stack: &mut Vec<Frame>) -> Option<AttributeMap> {
    let (key, map) = stack.pop()?.finish();
    match (stack.last_mut(), key) {
        (Some(parent), Some(key)) => {
            parent.map.push(key, Value::Map(map));
            None
        }
        _ => Some(map),
    }
}

/// Parse the nested block whose first line is at or after `start`.
///
/// The depth of the first non-blank line becomes the block's base depth.
/// Parsing stops at the first non-blank line shallower than that; its index
/// is returned alongside the map. Lines that cannot be read as keys are
/// collected and stored under `description`.
#[must_use]
pub fn parse_block(source: &SourceFile, start: usize) -> (AttributeMap, usize) {
    let Some(first) = source.next_content(start) else {
        return (AttributeMap::new(), source.len());
    };
    let mut stack = vec![Frame::new(source.depth(first), None)];
    let mut index = first;

    while index < source.len() {
        if source.is_blank(index) {
            index += 1;
            continue;
        }
        let depth = source.depth(index);

        while stack.last().is_some_and(|frame| depth < frame.indent) {
            if let Some(map) = close(&mut stack) {
                return (map, index);
            }
        }
        let Some(frame) = stack.last_mut() else {
            break;
        };
        if depth > frame.indent {
            index += 1;
            continue;
        }

        match classify(source, index) {
            Line::Sprite { path, data } => {
                frame.map.push("sprite", Value::String(path));
                if data {
                    let indent = nested_indent(source, index);
                    stack.push(Frame::new(indent, Some(SPRITE_DATA.to_string())));
                }
            }
            Line::Field(key, value) => frame.map.push(key, value),
            Line::Block(key) => {
                let indent = nested_indent(source, index);
                stack.push(Frame::new(indent, Some(key)));
            }
            Line::Text(text) => frame.description.push(&text),
        }
        index += 1;
    }

    loop {
        if let Some(map) = close(&mut stack) {
            return (map, index);
        }
        if stack.is_empty() {
            return (AttributeMap::new(), index);
        }
    }
}

fn nested_indent(source: &SourceFile, index: usize) -> usize {
    source
        .next_content(index + 1)
        .map_or(source.depth(index) + 1, |next| source.depth(next))
}

/// Receives the generic lines of a record body.
pub(crate) trait FieldSink {
    /// Store a key and value.
    fn field(&mut self, key: String, value: Value);

    /// Store an unrecognised line.
    fn text(&mut self, text: &str);
}

/// Handle one record-body line with the generic rules.
///
/// Nested blocks are parsed with [`parse_block`]. Returns the index of the
/// next line to examine.
pub(crate) fn absorb(source: &SourceFile, index: usize, sink: &mut impl FieldSink) -> usize {
    match classify(source, index) {
        Line::Sprite { path, data } => {
            sink.field("sprite".to_string(), Value::String(path));
            if data {
                let (map, next) = parse_block(source, index + 1);
                sink.field(SPRITE_DATA.to_string(), Value::Map(map));
                return next;
            }
            index + 1
        }
        Line::Field(key, value) => {
            sink.field(key, value);
            index + 1
        }
        Line::Block(key) => {
            let (map, next) = parse_block(source, index + 1);
            sink.field(key, Value::Map(map));
            next
        }
        Line::Text(text) => {
            sink.text(&text);
            index + 1
        }
    }
}
