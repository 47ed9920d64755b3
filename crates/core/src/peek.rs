//! Reading back the original text a set of spans currently covers, before committing to any
//! replacement.

use crate::EditError;
use crate::rune::RuneIndex;
use crate::span::Span;

/// Returns, for each span in `spans` (in the given, *not necessarily sorted*, order), the
/// substring of `source` it covers.
///
/// Spans must not overlap (touching is fine); this is checked the same way [`crate::splice`]
/// checks its `OpSet`.
pub fn peek(source: &str, spans: &[Span]) -> Result<Vec<String>, EditError> {
    let mut sorted: Vec<(usize, Span)> = spans.iter().copied().enumerate().collect();
    sorted.sort_by_key(|(_, s)| s.start);

    for pair in sorted.windows(2) {
        let (_, a) = pair[0];
        let (_, b) = pair[1];
        if a.start < b.end && b.start < a.end {
            return Err(EditError::OverlappingSpans {
                a_start: a.start,
                a_end: a.end,
                b_start: b.start,
                b_end: b.end,
            });
        }
    }

    let index = RuneIndex::new(source);
    let mut out: Vec<String> = vec![String::new(); spans.len()];
    for (original_idx, span) in sorted {
        let start_byte = index.rune_to_byte(span.start);
        let end_byte = index.rune_to_byte(span.end);
        out[original_idx] = source[start_byte..end_byte].to_string();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_substrings_in_input_order() {
        let source = "abcdef";
        let spans = vec![Span::new(3, 6).unwrap(), Span::new(0, 2).unwrap()];
        let out = peek(source, &spans).unwrap();
        assert_eq!(out, vec!["def".to_string(), "ab".to_string()]);
    }

    #[test]
    fn handles_multibyte_runes() {
        let source = "あいうえお";
        let spans = vec![Span::new(1, 3).unwrap()];
        let out = peek(source, &spans).unwrap();
        assert_eq!(out, vec!["いう".to_string()]);
    }

    #[test]
    fn rejects_overlapping_spans() {
        let source = "abcdef";
        let spans = vec![Span::new(0, 3).unwrap(), Span::new(2, 4).unwrap()];
        assert!(matches!(
            peek(source, &spans),
            Err(EditError::OverlappingSpans { .. })
        ));
    }

    #[test]
    fn touching_spans_are_allowed() {
        let source = "abcdef";
        let spans = vec![Span::new(0, 3).unwrap(), Span::new(3, 6).unwrap()];
        let out = peek(source, &spans).unwrap();
        assert_eq!(out, vec!["abc".to_string(), "def".to_string()]);
    }
}
