//! Streaming, rune-indexed multi-span substitution.
//!
//! [`Transformer`] replays a source byte stream to an output byte stream, replacing the runes
//! covered by each [`Op`] in an [`OpSet`] with that op's replacement text. It follows the same
//! incremental shape as a streaming text codec: callers drive it with `transform(dst, src,
//! at_eof)` and it reports why it stopped (`short_src`, `short_dst`, or `done`) so it can be
//! composed with chunked I/O without buffering the whole document in memory.

use crate::EditError;
use crate::span::{Op, OpSet};

/// Why a [`Transformer::transform`] call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The source buffer was exhausted before a decision could be completed. Supply more bytes.
    ShortSrc,
    /// The destination buffer ran out of room for the next atomic write. Supply more capacity.
    ShortDst,
    /// `at_eof` was set and every op has been resolved; no further calls are needed.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Copying source runes through to the destination unchanged.
    Copy,
    /// Emitting the current op's replacement; `byte_idx` indexes into its bytes.
    Replacing { byte_idx: usize },
    /// Discarding source runes until the rune cursor reaches the current op's `end`.
    Consuming,
}

/// One rune decoded from the source, or a reason decoding could not proceed.
enum Decoded {
    Char(char),
    NeedMoreSrc,
    Eof,
}

/// A decoded copy-mode rune whose UTF-8 bytes didn't all fit in the last `dst` buffer.
#[derive(Debug, Clone, Copy)]
struct PendingCopy {
    buf: [u8; 4],
    len: usize,
    written: usize,
}

/// Drives a single streaming substitution pass over a source byte stream.
pub struct Transformer {
    ops: OpSet,
    op_idx: usize,
    mode: Mode,
    /// Rune offset of the next byte to be decoded from the source.
    rune_cursor: usize,
    /// Absolute byte offset of the next byte to be decoded, for error reporting.
    byte_cursor: usize,
    /// A multi-byte UTF-8 sequence split across two `transform` calls.
    pending_utf8: Vec<u8>,
    pending_utf8_start: usize,
    /// A copy-mode rune already decoded from the source whose bytes are still being flushed to
    /// `dst` across short-destination calls.
    pending_copy: Option<PendingCopy>,
    done: bool,
}

impl Transformer {
    pub fn new(ops: Vec<Op>) -> Result<Self, EditError> {
        let ops = OpSet::new(ops)?;
        Ok(Self {
            ops,
            op_idx: 0,
            mode: Mode::Copy,
            rune_cursor: 0,
            byte_cursor: 0,
            pending_utf8: Vec::new(),
            pending_utf8_start: 0,
            pending_copy: None,
            done: false,
        })
    }

    /// Rewinds the transformer to its initial state so it can be re-driven over a fresh copy of
    /// the same source with the same `OpSet`.
    pub fn reset(&mut self) {
        self.op_idx = 0;
        self.mode = Mode::Copy;
        self.rune_cursor = 0;
        self.byte_cursor = 0;
        self.pending_utf8.clear();
        self.pending_utf8_start = 0;
        self.pending_copy = None;
        self.done = false;
    }

    fn current_op(&self) -> Option<&Op> {
        self.ops.get(self.op_idx)
    }

    /// Advances the transform, writing to `dst` and consuming from `src`.
    ///
    /// Returns `(n_dst_written, n_src_consumed, status)`.
    pub fn transform(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        at_eof: bool,
    ) -> Result<(usize, usize, Status), EditError> {
        if self.done {
            return Ok((0, 0, Status::Done));
        }

        let mut dst_pos = 0usize;
        let mut src_pos = 0usize;

        loop {
            match self.mode {
                Mode::Replacing { byte_idx } => {
                    let bytes = self
                        .current_op()
                        .expect("Replacing mode implies a current op")
                        .replacement
                        .as_bytes();
                    if byte_idx < bytes.len() {
                        if dst_pos >= dst.len() {
                            return Ok((dst_pos, src_pos, Status::ShortDst));
                        }
                        dst[dst_pos] = bytes[byte_idx];
                        dst_pos += 1;
                        self.mode = Mode::Replacing {
                            byte_idx: byte_idx + 1,
                        };
                        continue;
                    }
                    let is_insertion = self
                        .current_op()
                        .expect("Replacing mode implies a current op")
                        .span
                        .is_insertion();
                    self.op_idx += 1;
                    self.mode = if is_insertion {
                        Mode::Copy
                    } else {
                        Mode::Consuming
                    };
                    continue;
                }

                Mode::Consuming => {
                    let end = self
                        .current_op()
                        .expect("Consuming mode implies a current op")
                        .span
                        .end;
                    if self.rune_cursor >= end {
                        self.op_idx += 1;
                        self.mode = Mode::Copy;
                        continue;
                    }
                    match self.decode(src, &mut src_pos, at_eof)? {
                        Decoded::Char(_) => {
                            self.rune_cursor += 1;
                        }
                        Decoded::NeedMoreSrc => return Ok((dst_pos, src_pos, Status::ShortSrc)),
                        Decoded::Eof => {
                            return Err(EditError::SpanOutOfRange {
                                end,
                                source_runes: self.rune_cursor,
                            });
                        }
                    }
                }

                Mode::Copy => {
                    if let Some(pending) = &mut self.pending_copy {
                        let remaining = pending.len - pending.written;
                        let writable = remaining.min(dst.len() - dst_pos);
                        dst[dst_pos..dst_pos + writable].copy_from_slice(
                            &pending.buf[pending.written..pending.written + writable],
                        );
                        dst_pos += writable;
                        pending.written += writable;
                        if pending.written < pending.len {
                            return Ok((dst_pos, src_pos, Status::ShortDst));
                        }
                        self.pending_copy = None;
                        continue;
                    }

                    let starts_here = self
                        .current_op()
                        .is_some_and(|op| op.span.start == self.rune_cursor);
                    if starts_here {
                        self.mode = Mode::Replacing { byte_idx: 0 };
                        continue;
                    }

                    match self.decode(src, &mut src_pos, at_eof)? {
                        Decoded::Char(ch) => {
                            self.rune_cursor += 1;
                            let mut buf = [0u8; 4];
                            let len = ch.encode_utf8(&mut buf).len();
                            let writable = len.min(dst.len() - dst_pos);
                            dst[dst_pos..dst_pos + writable].copy_from_slice(&buf[..writable]);
                            dst_pos += writable;
                            if writable < len {
                                // `dst` ran out mid-rune; buffer the rest so it is emitted, not
                                // re-decoded, on the next call.
                                self.pending_copy = Some(PendingCopy {
                                    buf,
                                    len,
                                    written: writable,
                                });
                                return Ok((dst_pos, src_pos, Status::ShortDst));
                            }
                        }
                        Decoded::NeedMoreSrc => return Ok((dst_pos, src_pos, Status::ShortSrc)),
                        Decoded::Eof => {
                            if let Some(op) = self.current_op() {
                                return Err(EditError::SpanOutOfRange {
                                    end: op.span.end,
                                    source_runes: self.rune_cursor,
                                });
                            }
                            self.done = true;
                            return Ok((dst_pos, src_pos, Status::Done));
                        }
                    }
                }
            }
        }
    }

    /// Decodes the next rune from `pending_utf8` (if any) followed by `src[*src_pos..]`,
    /// advancing `*src_pos` and `self.byte_cursor` by exactly the bytes consumed for a completed
    /// character. Returns `Decoded::NeedMoreSrc` without consuming anything further when the
    /// source runs dry mid-character (or is simply empty) and `at_eof` is `false`.
    fn decode(
        &mut self,
        src: &[u8],
        src_pos: &mut usize,
        at_eof: bool,
    ) -> Result<Decoded, EditError> {
        if !self.pending_utf8.is_empty() {
            let char_len = utf8_char_len(self.pending_utf8[0]).ok_or(EditError::InvalidUtf8 {
                byte_offset: self.pending_utf8_start,
            })?;
            while self.pending_utf8.len() < char_len {
                if *src_pos >= src.len() {
                    if at_eof {
                        return Err(EditError::InvalidUtf8 {
                            byte_offset: self.pending_utf8_start,
                        });
                    }
                    return Ok(Decoded::NeedMoreSrc);
                }
                self.pending_utf8.push(src[*src_pos]);
                *src_pos += 1;
            }
            let s = std::str::from_utf8(&self.pending_utf8).map_err(|_| EditError::InvalidUtf8 {
                byte_offset: self.pending_utf8_start,
            })?;
            let ch = s.chars().next().expect("non-empty valid utf-8");
            self.pending_utf8.clear();
            self.byte_cursor += char_len;
            return Ok(Decoded::Char(ch));
        }

        if *src_pos >= src.len() {
            return Ok(if at_eof { Decoded::Eof } else { Decoded::NeedMoreSrc });
        }

        let lead = src[*src_pos];
        let char_len = utf8_char_len(lead).ok_or(EditError::InvalidUtf8 {
            byte_offset: self.byte_cursor,
        })?;
        let available = src.len() - *src_pos;

        if available < char_len {
            self.pending_utf8_start = self.byte_cursor;
            self.pending_utf8.extend_from_slice(&src[*src_pos..]);
            *src_pos = src.len();
            if at_eof {
                return Err(EditError::InvalidUtf8 {
                    byte_offset: self.pending_utf8_start,
                });
            }
            return Ok(Decoded::NeedMoreSrc);
        }

        let s = std::str::from_utf8(&src[*src_pos..*src_pos + char_len]).map_err(|_| {
            EditError::InvalidUtf8 {
                byte_offset: self.byte_cursor,
            }
        })?;
        let ch = s.chars().next().expect("char_len bytes decode to one char");
        *src_pos += char_len;
        self.byte_cursor += char_len;
        Ok(Decoded::Char(ch))
    }
}

fn utf8_char_len(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// One-shot convenience wrapper: transforms an entire in-memory `&str` in a single pass.
pub fn splice(ops: Vec<Op>, source: &str) -> Result<String, EditError> {
    let mut transformer = Transformer::new(ops)?;
    let mut out = Vec::with_capacity(source.len());
    let mut buf = [0u8; 4096];
    let src = source.as_bytes();
    let mut src_pos = 0usize;

    loop {
        let (n_dst, n_src, status) = transformer.transform(&mut buf, &src[src_pos..], true)?;
        out.extend_from_slice(&buf[..n_dst]);
        src_pos += n_src;
        match status {
            Status::Done => break,
            Status::ShortDst => continue,
            Status::ShortSrc => {
                unreachable!("splice() always presents the full source with at_eof=true")
            }
        }
    }

    Ok(String::from_utf8(out).expect("transformer only emits valid utf-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn run(source: &str, ops: Vec<Op>) -> String {
        splice(ops, source).unwrap()
    }

    #[test]
    fn identity_with_no_ops() {
        assert_eq!(run("hello\nworld\n", vec![]), "hello\nworld\n");
    }

    #[test]
    fn single_replacement() {
        let ops = vec![Span::new(1, 2).unwrap().with("XYZ")];
        assert_eq!(run("abcd", ops), "aXYZcd");
    }

    #[test]
    fn replacement_respects_rune_not_byte_offsets() {
        let ops = vec![Span::new(1, 2).unwrap().with("B")];
        assert_eq!(run("ábcd", ops), "áBcd");
    }

    #[test]
    fn multiple_non_adjacent_replacements() {
        let ops = vec![
            Span::new(1, 2).unwrap().with("B"),
            Span::new(3, 4).unwrap().with("D"),
        ];
        assert_eq!(run("abcd", ops), "aBcD");
    }

    #[test]
    fn zero_width_insertion() {
        let ops = vec![Span::at(2).with("X")];
        assert_eq!(run("abcd", ops), "abXcd");
    }

    #[test]
    fn deletion_via_empty_replacement() {
        let ops = vec![Span::new(2, 3).unwrap().with("")];
        assert_eq!(run("abcd", ops), "abd");
    }

    #[test]
    fn adjacent_spans_touch_without_gap() {
        let ops = vec![
            Span::new(0, 2).unwrap().with("AA"),
            Span::new(2, 4).unwrap().with("BB"),
        ];
        assert_eq!(run("abcd", ops), "AABB");
    }

    #[test]
    fn same_position_insertions_preserve_input_order() {
        let ops = vec![Span::at(1).with("X"), Span::at(1).with("Y")];
        assert_eq!(run("ab", ops), "aXYb");
    }

    #[test]
    fn span_out_of_range_errors() {
        let ops = vec![Span::new(2, 100).unwrap().with("Z")];
        let err = splice(ops, "abcd").unwrap_err();
        assert!(matches!(err, EditError::SpanOutOfRange { .. }));
    }

    #[test]
    fn invalid_utf8_errors() {
        let mut transformer = Transformer::new(vec![]).unwrap();
        let mut dst = [0u8; 16];
        let bad = [0xFFu8, 0x41];
        let err = transformer.transform(&mut dst, &bad, true).unwrap_err();
        assert!(matches!(err, EditError::InvalidUtf8 { .. }));
    }

    #[test]
    fn single_byte_destination_still_makes_progress_on_ascii() {
        let mut transformer = Transformer::new(vec![]).unwrap();
        let mut out = Vec::new();
        let src = b"abcd";
        let mut dst = [0u8; 1];
        loop {
            let (n_dst, n_src, status) = transformer
                .transform(&mut dst, &src[out.len()..], true)
                .unwrap();
            out.extend_from_slice(&dst[..n_dst]);
            assert_eq!(n_src, n_dst, "a 1-byte destination consumes exactly what it writes");
            if status == Status::Done {
                break;
            }
        }
        assert_eq!(String::from_utf8(out).unwrap(), "abcd");
    }

    #[test]
    fn short_destination_flushes_a_multibyte_rune_across_calls() {
        // "á" is 2 bytes in UTF-8; a 1-byte destination must split its copy across two calls
        // instead of stalling.
        let mut transformer = Transformer::new(vec![]).unwrap();
        let src = "á".as_bytes();
        let mut out = Vec::new();
        let mut dst = [0u8; 1];
        let mut src_pos = 0usize;
        loop {
            let (n_dst, n_src, status) =
                transformer.transform(&mut dst, &src[src_pos..], true).unwrap();
            out.extend_from_slice(&dst[..n_dst]);
            src_pos += n_src;
            if status == Status::Done {
                break;
            }
        }
        assert_eq!(String::from_utf8(out).unwrap(), "á");
    }

    #[test]
    fn chunked_source_matches_single_shot() {
        let source = "name: foo\nother: bar\n";
        let ops = vec![Span::new(6, 9).unwrap().with("renamed")];
        let whole = run(source, ops.clone());

        let mut transformer = Transformer::new(ops).unwrap();
        let mut out = Vec::new();
        let mut dst = [0u8; 4]; // minimum viable size, to also force short_dst cycles
        let bytes = source.as_bytes();
        let mut pos = 0usize;
        loop {
            let chunk_end = (pos + 5).min(bytes.len());
            let at_eof = chunk_end == bytes.len();
            let (n_dst, n_src, status) = transformer
                .transform(&mut dst, &bytes[pos..chunk_end], at_eof)
                .unwrap();
            out.extend_from_slice(&dst[..n_dst]);
            pos += n_src;
            if status == Status::Done {
                break;
            }
        }
        assert_eq!(String::from_utf8(out).unwrap(), whole);
    }

    #[test]
    fn reset_allows_replaying_the_same_transform() {
        let ops = vec![Span::new(1, 2).unwrap().with("X")];
        let mut transformer = Transformer::new(ops).unwrap();
        let mut dst = [0u8; 16];
        let (n1, _, status1) = transformer.transform(&mut dst, b"abcd", true).unwrap();
        let first = String::from_utf8(dst[..n1].to_vec()).unwrap();
        assert_eq!(status1, Status::Done);

        transformer.reset();
        let mut dst2 = [0u8; 16];
        let (n2, _, status2) = transformer.transform(&mut dst2, b"abcd", true).unwrap();
        let second = String::from_utf8(dst2[..n2].to_vec()).unwrap();
        assert_eq!(status2, Status::Done);
        assert_eq!(first, second);
    }
}
