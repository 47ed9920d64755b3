//! Choosing a YAML scalar representation for a bare value.
//!
//! [`format_scalar`] picks the least intrusive style that round-trips `value` faithfully: plain
//! when safe, double-quoted when plain would retag, and a block literal when the value spans
//! multiple lines. The retagging check follows the YAML 1.2 Core Schema for numbers and null,
//! plus the legacy `yes`/`no` boolean spellings (see [`resolves_to_non_string_tag`]).

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of spaces a nested block level indents by.
const BLOCK_INDENT_STEP: usize = 2;

/// Characters that change a plain scalar's meaning if they lead it.
const LEADING_INDICATORS: &[char] = &[
    '@', '`', '%', '&', '*', '!', '|', '>', '\'', '"', '#', ',', '[', ']', '{', '}',
];

static INT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(0|[1-9][0-9]*)$|^0x[0-9a-fA-F]+$|^0o[0-7]+$").expect("valid regex")
});

static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$|^[-+]?\.(inf|Inf|INF)$|^\.(nan|NaN|NAN)$")
        .expect("valid regex")
});

const NULL_WORDS: &[&str] = &["null", "Null", "NULL", "~"];
const BOOL_WORDS: &[&str] = &[
    "true", "True", "TRUE", "false", "False", "FALSE", "yes", "Yes", "YES", "no", "No", "NO",
];

/// Whether `value`, written unquoted, would resolve to a tag other than `!!str`.
///
/// This implementation follows the YAML 1.2 Core Schema for integers, floats, and null, and
/// additionally treats the YAML 1.1 boolean spellings `yes`/`no` as reserved (in every casing)
/// since they are a common source of accidental retagging. `on`/`off` are deliberately left as
/// plain strings, matching the Core Schema exactly for that pair (see DESIGN.md).
pub fn resolves_to_non_string_tag(value: &str) -> bool {
    if value.is_empty() {
        return true; // an empty plain scalar resolves to `!!null`, not `!!str`.
    }
    if NULL_WORDS.contains(&value) || BOOL_WORDS.contains(&value) {
        return true;
    }
    INT_RE.is_match(value) || FLOAT_RE.is_match(value)
}

/// Whether `value` is safe to emit as a plain (unquoted) scalar.
pub(crate) fn is_plain_safe(value: &str) -> bool {
    if value.is_empty() || value.contains('\n') {
        return false;
    }
    if let Some(first) = value.chars().next() {
        if LEADING_INDICATORS.contains(&first) {
            return false;
        }
    }
    if value.contains(" #") || value.ends_with(' ') || value.starts_with(' ') {
        return false;
    }
    if value.contains(": ") || value.ends_with(':') {
        return false;
    }
    if value.chars().any(|c| (c as u32) < 0x20) {
        return false;
    }
    !resolves_to_non_string_tag(value)
}

/// Escapes `value` for a YAML double-quoted scalar.
pub(crate) fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escapes `value` for a YAML single-quoted scalar: the only escape single-quoted style supports
/// is doubling an embedded `'`.
pub(crate) fn escape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push_str("''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// How many content lines `value` ends with no content on (i.e. trailing blank lines), used to
/// pick a block scalar's chomping indicator.
fn trailing_newline_count(value: &str) -> usize {
    value.len() - value.trim_end_matches('\n').len()
}

/// Emits `value` as a block literal (`|`) scalar, re-indented by `content_indent` spaces.
fn format_block_literal(value: &str, content_indent: usize) -> String {
    let chomp = match trailing_newline_count(value) {
        0 => "-",
        1 => "",
        _ => "+",
    };
    let body = value.trim_end_matches('\n');
    let pad = " ".repeat(content_indent);

    let mut out = format!("|{chomp}");
    for line in body.split('\n') {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    if chomp == "+" {
        // `keep` preserves every trailing newline as a blank content line.
        for _ in 0..trailing_newline_count(value) - 1 {
            out.push('\n');
        }
    }
    out
}

/// Chooses a YAML representation of `value` at the given indent column.
///
/// `indent` is the exact column (0-based) a multi-line result's content lines should begin at.
/// Callers computing this from a node's key column add this crate's fixed
/// [`BLOCK_INDENT_STEP`] themselves; `format_scalar` does not add it again.
pub fn format_scalar(value: &str, indent: usize) -> String {
    // A value made up of nothing but newlines has no content line for a block literal to carry;
    // chomping would drop every one of them. Fall back to double-quoting, which can represent
    // them with `\n` escapes.
    if value.contains('\n') && !value.trim_end_matches('\n').is_empty() {
        return format_block_literal(value, indent);
    }
    if is_plain_safe(value) {
        return value.to_string();
    }
    escape_double_quoted(value)
}

/// Like [`format_scalar`], but prefers single-quoting over double-quoting when quoting is
/// required and `value` has no newline. Falls back to [`format_scalar`] otherwise (single-quoted
/// scalars cannot represent embedded control characters or span certain structures safely).
pub fn try_single_quoted(value: &str, indent: usize) -> Option<String> {
    if value.contains('\n') {
        return None;
    }
    if is_plain_safe(value) {
        return Some(value.to_string());
    }
    if value.chars().any(|c| (c as u32) < 0x20) {
        // Single-quoted scalars cannot express control characters; the default (double-quoted)
        // style must be used instead.
        return None;
    }
    let _ = indent;
    Some(escape_single_quoted(value))
}
