//! Style-preserving re-quoting: keep a scalar's original quoting family when doing so doesn't
//! change how it parses.
//!
//! Grounded in how `yamlpatch`'s `Style::from_feature` classifies an existing YAML scalar by its
//! first non-whitespace byte, and in its `apply_value_replacement` special-case of re-indenting a
//! replaced block-literal body to the block's *own* indent rather than the call site's nominal
//! indent.

use crate::scalar::{escape_double_quoted, escape_single_quoted, format_scalar, is_plain_safe};

/// The quoting family an existing scalar was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OriginalStyle {
    Plain,
    Single,
    Double,
    /// Block literal (`|`) or folded (`>`); this crate does not distinguish between the two when
    /// re-quoting (see DESIGN.md).
    Block { content_indent: usize },
}

fn classify(original_text: &str) -> OriginalStyle {
    let trimmed = original_text.trim_start();
    match trimmed.chars().next() {
        Some('"') => OriginalStyle::Double,
        Some('\'') => OriginalStyle::Single,
        Some('|') | Some('>') => OriginalStyle::Block {
            content_indent: block_content_indent(original_text),
        },
        _ => OriginalStyle::Plain,
    }
}

/// Finds the indentation column of a block scalar's first content line.
///
/// `original_text` is expected to start with the block header (`|`, `|-`, `|+`, `>`, `>-`, `>+`,
/// possibly with an explicit indentation indicator digit) followed by a newline and the indented
/// body. The header's own leading whitespace (if `original_text` begins mid-line) is not part of
/// the content indent; only the body lines' indentation counts.
fn block_content_indent(original_text: &str) -> usize {
    for line in original_text.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        return line.len() - line.trim_start_matches(' ').len();
    }
    0
}

/// Chooses a replacement for a scalar whose original text was `original_text`, preserving its
/// quoting style unless doing so would change the parsed tag or the value no longer fits that
/// style (e.g. it gained a newline, or the original's block indent must be reused for a new
/// multi-line value).
///
/// `indent` is the target content column a *newly* block-formatted value's lines would begin at;
/// it is only used when the original scalar was not itself a block scalar.
pub fn requote(new_value: &str, original_text: &str, indent: usize) -> String {
    let style = classify(original_text);

    if new_value.contains('\n') {
        return match style {
            OriginalStyle::Block { content_indent } => format_scalar(new_value, content_indent),
            _ => format_scalar(new_value, indent),
        };
    }

    if !is_plain_safe(new_value) {
        // The value now requires quoting regardless of the original style; see §4.E step 4.
        return format_scalar(new_value, indent);
    }

    // `is_plain_safe` above already ruled out control characters and newlines, so a single-quoted
    // original can always keep its style here.
    match style {
        OriginalStyle::Double => escape_double_quoted(new_value),
        OriginalStyle::Single => escape_single_quoted(new_value),
        OriginalStyle::Plain | OriginalStyle::Block { .. } => format_scalar(new_value, indent),
    }
}
