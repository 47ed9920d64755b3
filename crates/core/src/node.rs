//! Adapts a parsed YAML node's location into a [`crate::span::Op`] ready for [`crate::splice`].
//!
//! The collaborator YAML parser is expected to report a scalar's `(line, column)` start (1-based,
//! rune-indexed) and its quoting style; this module resolves that into a byte range in the
//! original source, reads the original scalar text, and hands it to [`crate::requote`] to produce
//! the replacement.

use crate::EditError;
use crate::requote::requote;
use crate::rune::RuneIndex;
use crate::span::{Op, Span};

/// The block-indent step used when computing a block scalar's nested content column from its
/// key's column.
const BLOCK_INDENT_STEP: usize = 2;

/// The quoting style a parsed scalar node reports for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStyle {
    Plain,
    Single,
    Double,
    /// Block literal (`|`).
    Literal,
    /// Block folded (`>`).
    Folded,
    /// A scalar inside a flow collection (`[a, b]` / `{k: v}`); unsupported (§4.F edge case).
    Flow,
}

/// The subset of a parsed YAML scalar node this crate needs. Implemented by the caller's parser
/// integration; this crate only consumes it.
pub trait YamlNode {
    /// 1-based line number of the scalar's first character.
    fn line(&self) -> usize;
    /// 1-based, rune-indexed column of the scalar's first character.
    fn column(&self) -> usize;
    /// How the scalar is currently quoted in the source.
    fn style(&self) -> NodeStyle;
}

/// Converts `node`'s location in `source` plus a new value into an [`Op`], using [`requote`] to
/// decide the replacement text.
pub fn node_to_op(node: &impl YamlNode, source: &str, new_value: &str) -> Result<Op, EditError> {
    if node.style() == NodeStyle::Flow {
        return Err(EditError::UnsupportedScalarStyle);
    }

    let index = RuneIndex::new(source);
    let start_byte = index
        .line_col_to_byte(node.line(), node.column())
        .ok_or(EditError::InvalidNodeLocation {
            line: node.line(),
            column: node.column(),
        })?;

    let end_byte = match node.style() {
        NodeStyle::Plain => scan_plain_end(source, start_byte),
        NodeStyle::Single => scan_single_quoted_end(source, start_byte)?,
        NodeStyle::Double => scan_double_quoted_end(source, start_byte)?,
        NodeStyle::Literal | NodeStyle::Folded => scan_block_end(source, start_byte),
        NodeStyle::Flow => unreachable!("checked above"),
    };

    let original_text = &source[start_byte..end_byte];
    let content_indent = (node.column() - 1) + BLOCK_INDENT_STEP;
    let replacement = requote(new_value, original_text, content_indent);

    let start_rune = index.byte_to_rune(start_byte);
    let end_rune = index.byte_to_rune(end_byte);
    let span = Span::new(start_rune, end_rune)?;
    Ok(span.with(replacement))
}

/// A plain scalar ends at end-of-line, a `" #"` comment marker, or end-of-source, whichever
/// comes first; trailing whitespace is not part of the value.
fn scan_plain_end(source: &str, start_byte: usize) -> usize {
    let rest = &source[start_byte..];
    let line_end = rest.find('\n').map(|i| start_byte + i).unwrap_or(source.len());
    let line = &source[start_byte..line_end];

    let content_end = match line.find(" #") {
        Some(i) => start_byte + i,
        None => line_end,
    };

    let trimmed = source[start_byte..content_end].trim_end_matches(' ');
    start_byte + trimmed.len()
}

/// Scans a single-quoted scalar; `''` is an escaped literal quote, not a terminator.
fn scan_single_quoted_end(source: &str, start_byte: usize) -> Result<usize, EditError> {
    let bytes = source.as_bytes();
    let mut i = start_byte + 1; // skip opening quote
    loop {
        match bytes.get(i) {
            None => return Err(EditError::UnterminatedScalar { start_byte }),
            Some(b'\'') => {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                return Ok(i + 1);
            }
            Some(_) => i += 1,
        }
    }
}

/// Scans a double-quoted scalar; `\"` and `\\` are escapes.
fn scan_double_quoted_end(source: &str, start_byte: usize) -> Result<usize, EditError> {
    let bytes = source.as_bytes();
    let mut i = start_byte + 1; // skip opening quote
    loop {
        match bytes.get(i) {
            None => return Err(EditError::UnterminatedScalar { start_byte }),
            Some(b'\\') => i += 2,
            Some(b'"') => return Ok(i + 1),
            Some(_) => i += 1,
        }
    }
}

/// Scans a block scalar (literal or folded): the header line, then every line that is blank or
/// indented at least as far as the first non-blank content line.
fn scan_block_end(source: &str, start_byte: usize) -> usize {
    let header_end = source[start_byte..]
        .find('\n')
        .map(|i| start_byte + i)
        .unwrap_or(source.len());

    if header_end >= source.len() {
        return source.len();
    }

    let mut body_start = header_end + 1;
    let body_start_initial = body_start;
    let block_indent = match first_content_indent(source, body_start) {
        Some(indent) => indent,
        None => return body_start.min(source.len()),
    };

    let mut end = body_start;
    loop {
        if body_start >= source.len() {
            end = source.len();
            break;
        }
        let line_end = source[body_start..]
            .find('\n')
            .map(|i| body_start + i + 1)
            .unwrap_or(source.len());
        let line = &source[body_start..line_end];
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if trimmed.trim().is_empty() {
            end = line_end;
            body_start = line_end;
            continue;
        }

        let indent = trimmed.len() - trimmed.trim_start_matches(' ').len();
        if indent < block_indent {
            break;
        }
        end = line_end;
        body_start = line_end;
    }

    // Leave the last included line's own trailing newline outside the span: it belongs to the
    // document's line structure, not to the block's content, and must survive untouched so the
    // line after the block (or EOF) stays correctly separated.
    if end > body_start_initial && source.as_bytes().get(end - 1) == Some(&b'\n') {
        end -= 1;
    }

    end
}

fn first_content_indent(source: &str, mut pos: usize) -> Option<usize> {
    while pos < source.len() {
        let line_end = source[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(source.len());
        let line = &source[pos..line_end];
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if !trimmed.trim().is_empty() {
            return Some(trimmed.len() - trimmed.trim_start_matches(' ').len());
        }
        pos = line_end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeNode {
        line: usize,
        column: usize,
        style: NodeStyle,
    }

    impl YamlNode for FakeNode {
        fn line(&self) -> usize {
            self.line
        }
        fn column(&self) -> usize {
            self.column
        }
        fn style(&self) -> NodeStyle {
            self.style
        }
    }

    #[test]
    fn plain_scalar_end_of_line() {
        let source = "name: myns\nother: x\n";
        let node = FakeNode {
            line: 1,
            column: 7,
            style: NodeStyle::Plain,
        };
        let op = node_to_op(&node, source, "otherns").unwrap();
        assert_eq!(op.replacement, "otherns");
    }

    #[test]
    fn double_quoted_scalar_preserves_style() {
        let source = "name: \"foo\"\n";
        let node = FakeNode {
            line: 1,
            column: 7,
            style: NodeStyle::Double,
        };
        let op = node_to_op(&node, source, "bar").unwrap();
        assert_eq!(op.replacement, "\"bar\"");
    }

    #[test]
    fn flow_style_is_rejected() {
        let source = "a: [1, 2]\n";
        let node = FakeNode {
            line: 1,
            column: 5,
            style: NodeStyle::Flow,
        };
        assert!(matches!(
            node_to_op(&node, source, "x"),
            Err(EditError::UnsupportedScalarStyle)
        ));
    }

    #[test]
    fn block_literal_reindents_to_original_indent() {
        let source = "data:\n  foo: |\n    bar: x\n";
        let node = FakeNode {
            line: 2,
            column: 8,
            style: NodeStyle::Literal,
        };
        let op = node_to_op(&node, source, "x: y\nbar: y\n").unwrap();
        assert_eq!(op.replacement, "|\n    x: y\n    bar: y");
    }

    #[test]
    fn plain_scalar_stops_before_trailing_comment() {
        let source = "key: value # a comment\n";
        let node = FakeNode {
            line: 1,
            column: 6,
            style: NodeStyle::Plain,
        };
        let op = node_to_op(&node, source, "other").unwrap();
        assert_eq!(op.replacement, "other");
    }
}
