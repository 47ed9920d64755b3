//! In-place YAML scalar editing with comment, blank-line, and quoting-style preservation.
//!
//! This crate provides the streaming core behind a YAML in-place editor: given a parsed node's
//! location and a new value, it computes the minimal span of the original source to replace and
//! emits a replacement that keeps the source's quoting style wherever doing so would not change
//! how the edited scalar parses.
//!
//! Entry points:
//!
//! - [`splice`] drives the multi-span streaming substitution described in [`splice::Transformer`].
//! - [`scalar`] chooses a YAML representation for a bare value.
//! - [`requote`] chooses a replacement that preserves the original scalar's quoting style.
//! - [`node`] adapts a parsed YAML node location into a [`span::Op`] ready for [`splice`].
//!
//! Internals:
//!
//! - [`span`] holds the `Span`/`Op`/`OpSet` value types.
//! - [`rune`] provides rune and line/column indexing over the original source.
//! - [`peek`] reads back the original text a set of spans currently covers.

pub mod node;
pub mod peek;
pub mod requote;
pub mod rune;
pub mod scalar;
pub mod span;
pub mod splice;

pub use span::{Op, OpSet, Span};
pub use splice::{Status, Transformer, splice as apply};

/// Errors that can occur while building, driving, or adapting an edit.
#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("overlapping spans: [{a_start},{a_end}) overlaps [{b_start},{b_end})")]
    OverlappingSpans {
        a_start: usize,
        a_end: usize,
        b_start: usize,
        b_end: usize,
    },

    #[error("inverted span: end {end} is before start {start}")]
    InvertedSpan { start: usize, end: usize },

    #[error("span end {end} exceeds source length of {source_runes} runes")]
    SpanOutOfRange { end: usize, source_runes: usize },

    #[error("invalid utf-8 at byte offset {byte_offset}")]
    InvalidUtf8 { byte_offset: usize },

    #[error("scalar style unsupported for in-place editing (flow collections are out of scope)")]
    UnsupportedScalarStyle,

    #[error("could not format scalar for value starting with {value_preview:?}")]
    CannotFormatScalar { value_preview: String },

    #[error("node location ({line}, {column}) does not resolve to a byte offset in the source")]
    InvalidNodeLocation { line: usize, column: usize },

    #[error("quoted scalar starting at byte {start_byte} has no closing quote")]
    UnterminatedScalar { start_byte: usize },
}
