//! Thin helpers over `roxmltree` shared by the scene and vehicle passes

use i3dmap_error::{I3dMapError, Result};
use roxmltree::{Document, Node, ParsingOptions};
use std::borrow::Cow;
use std::ops::Range;

/// Parse a document, mapping syntax errors to `Document/Malformed`
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|err| {
        let pos = err.pos();
        I3dMapError::malformed_document_at(err.to_string(), pos.row)
    })
}

/// 1-based line of a byte offset
pub fn line_at(doc: &Document<'_>, pos: usize) -> u32 {
    doc.text_pos_at(pos).row
}

/// First element child of `node` with the given local name
pub fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

/// Quote character surrounding an attribute value, given the value's byte range
pub fn quote_before(text: &str, value_start: usize) -> char {
    match text.as_bytes().get(value_start.wrapping_sub(1)) {
        Some(b'\'') => '\'',
        _ => '"',
    }
}

/// Escape a value for placement between `quote` characters
pub fn escape_attribute(value: &str, quote: char) -> Cow<'_, str> {
    let needs_escape = value
        .chars()
        .any(|c| matches!(c, '&' | '<') || c == quote);
    if !needs_escape {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' if quote == '"' => escaped.push_str("&quot;"),
            '\'' if quote == '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Line ending used by the document
pub fn newline_of(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Byte offset of the start of the line containing `pos`
pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Whitespace between the start of the line and `pos`, if nothing else precedes it
pub fn line_indent(text: &str, pos: usize) -> Option<&str> {
    let prefix = &text[line_start(text, pos)..pos];
    prefix
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then_some(prefix)
}

/// Indentation step used for one nesting level below `parent`.
///
/// Taken from the first element child that starts on its own line; falls back
/// to four spaces.
pub fn indent_unit(text: &str, parent: Node<'_, '_>) -> String {
    let parent_indent = line_indent(text, parent.range().start).unwrap_or("");
    parent
        .children()
        .filter(|child| child.is_element())
        .find_map(|child| {
            let indent = line_indent(text, child.range().start)?;
            indent
                .strip_prefix(parent_indent)
                .filter(|unit| !unit.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "    ".to_string())
}

/// Range covering an element plus its own line, when it sits alone on one.
///
/// Removing this range leaves no blank line behind. Elements sharing a line
/// with other content only lose their own bytes.
pub fn removal_range(text: &str, element: Range<usize>) -> Range<usize> {
    let Some(indent) = line_indent(text, element.start) else {
        return element;
    };
    let rest = &text[element.end..];
    let trailing = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after = &rest[trailing..];
    let newline = if after.starts_with("\r\n") {
        2
    } else if after.starts_with('\n') {
        1
    } else {
        return element;
    };
    (element.start - indent.len())..(element.end + trailing + newline)
}
