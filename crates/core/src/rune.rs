//! Rune (Unicode scalar value) indexing utilities.
//!
//! This module provides a fast mapping between:
//!
//! - absolute **byte offsets** into a UTF-8 `&str`, and
//! - absolute **rune offsets** (Unicode scalar value counts) into the same string, and
//! - `(line, column)` positions where `column` is measured in runes.
//!
//! The splice transformer (see [`crate::splice`]) is specified over rune positions because
//! that is what YAML parsers report scalar locations in. This index exists so the node-to-span
//! adapter and [`crate::peek`] don't re-scan the source from byte 0 for every lookup: like
//! `Utf16Index`'s column checkpoints, it stores sparse checkpoints (every N chars) and does a
//! binary search plus a short local scan to resolve a conversion.

use std::cmp::Ordering;

/// A precomputed rune index for an entire string.
#[derive(Debug, Clone)]
pub struct RuneIndex<'a> {
    s: &'a str,
    line_starts: Vec<usize>,
    lines: Vec<RuneLineIndex>,
    global: GlobalIndex,
}

impl<'a> RuneIndex<'a> {
    /// Build an index for `s`.
    pub fn new(s: &'a str) -> Self {
        let line_starts = compute_line_starts(s);

        let mut lines: Vec<RuneLineIndex> = Vec::with_capacity(line_starts.len());
        for (i, &start) in line_starts.iter().enumerate() {
            let mut end = match line_starts.get(i + 1).copied() {
                Some(next) => next.saturating_sub(1),
                None => s.len(),
            };
            if end > start && s.as_bytes().get(end - 1) == Some(&b'\r') {
                end = end.saturating_sub(1);
            }
            lines.push(RuneLineIndex::new(s, start, end));
        }

        Self {
            s,
            line_starts,
            lines,
            global: GlobalIndex::new(s),
        }
    }

    /// Convert an absolute byte offset into an absolute rune offset.
    ///
    /// A byte offset that lies inside a multi-byte UTF-8 sequence clamps to the start of that
    /// Unicode scalar value.
    pub fn byte_to_rune(&self, byte: usize) -> usize {
        self.global.byte_to_rune(self.s, byte)
    }

    /// Convert an absolute rune offset into an absolute byte offset.
    ///
    /// A rune offset beyond the end of the string clamps to the string's byte length.
    pub fn rune_to_byte(&self, rune: usize) -> usize {
        self.global.rune_to_byte(self.s, rune)
    }

    /// Convert a 1-based `(line, column)` pair (column in runes) into an absolute byte offset.
    ///
    /// Returns `None` for an out-of-range line. `column` beyond the line length clamps to the
    /// line end, matching how `Utf16Index::line_utf16_col_to_byte` clamps out-of-range columns.
    pub fn line_col_to_byte(&self, line: usize, column: usize) -> Option<usize> {
        if line == 0 || column == 0 {
            return None;
        }
        let li = self.lines.get(line - 1)?;
        Some(li.rune_col_to_byte(self.s, column - 1))
    }

    /// Total number of runes in the string.
    pub fn rune_len(&self) -> usize {
        self.global.total_runes
    }
}

fn compute_line_starts(s: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, b) in s.as_bytes().iter().copied().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Byte<->rune conversion over the whole string, independent of line boundaries.
#[derive(Debug, Clone)]
struct GlobalIndex {
    checkpoints: Vec<Checkpoint>,
    total_runes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    byte: usize,
    rune: usize,
}

impl GlobalIndex {
    const CHECKPOINT_STRIDE_CHARS: usize = 64;

    fn new(s: &str) -> Self {
        let mut checkpoints = vec![Checkpoint { byte: 0, rune: 0 }];
        let mut rune = 0usize;
        let mut char_count = 0usize;
        for (byte, ch) in s.char_indices() {
            rune += 1;
            char_count += 1;
            if char_count.is_multiple_of(Self::CHECKPOINT_STRIDE_CHARS) {
                checkpoints.push(Checkpoint {
                    byte: byte + ch.len_utf8(),
                    rune,
                });
            }
        }
        if checkpoints.last().map(|c| c.byte).unwrap_or(0) != s.len() {
            checkpoints.push(Checkpoint {
                byte: s.len(),
                rune,
            });
        }

        Self {
            checkpoints,
            total_runes: rune,
        }
    }

    fn byte_to_rune(&self, s: &str, byte: usize) -> usize {
        let clamped = byte.min(s.len());
        let idx = match self.checkpoints.binary_search_by(|c| c.byte.cmp(&clamped)) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let cp = self.checkpoints[idx];
        let mut cur_byte = cp.byte;
        let mut cur_rune = cp.rune;

        while cur_byte < clamped {
            let ch = s[cur_byte..].chars().next().unwrap();
            let next_byte = cur_byte + ch.len_utf8();
            if next_byte <= clamped {
                cur_rune += 1;
                cur_byte = next_byte;
            } else {
                break;
            }
        }
        cur_rune
    }

    fn rune_to_byte(&self, s: &str, rune: usize) -> usize {
        if rune >= self.total_runes {
            return s.len();
        }
        let idx = match self
            .checkpoints
            .binary_search_by(|c| c.rune.cmp(&rune))
        {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let cp = self.checkpoints[idx];
        let mut cur_byte = cp.byte;
        let mut cur_rune = cp.rune;

        while cur_rune < rune && cur_byte < s.len() {
            let ch = s[cur_byte..].chars().next().unwrap();
            cur_rune += 1;
            cur_byte += ch.len_utf8();
        }
        cur_byte
    }
}

/// Per-line rune column index, mirroring `Utf16LineIndex` but counting Unicode scalar values
/// (one per `char`) rather than UTF-16 code units.
#[derive(Debug, Clone)]
struct RuneLineIndex {
    start: usize,
    end: usize,
    checkpoints: Vec<Checkpoint>,
}

impl RuneLineIndex {
    const CHECKPOINT_STRIDE_CHARS: usize = 64;

    fn new(s: &str, start: usize, end: usize) -> Self {
        let mut checkpoints = vec![Checkpoint {
            byte: start,
            rune: 0,
        }];

        let mut rune = 0usize;
        let mut char_count = 0usize;
        let line = &s[start..end];
        for (rel, ch) in line.char_indices() {
            rune += 1;
            char_count += 1;
            if char_count.is_multiple_of(Self::CHECKPOINT_STRIDE_CHARS) {
                checkpoints.push(Checkpoint {
                    byte: start + rel + ch.len_utf8(),
                    rune,
                });
            }
        }
        if checkpoints.last().map(|c| c.byte).unwrap_or(start) != end {
            checkpoints.push(Checkpoint { byte: end, rune });
        }

        Self {
            start,
            end,
            checkpoints,
        }
    }

    fn rune_len(&self) -> usize {
        self.checkpoints.last().map(|c| c.rune).unwrap_or(0)
    }

    fn rune_col_to_byte(&self, s: &str, rune_col: usize) -> usize {
        if rune_col == 0 {
            return self.start;
        }
        if rune_col >= self.rune_len() {
            return self.end;
        }

        let idx = match self
            .checkpoints
            .binary_search_by(|c| c.rune.cmp(&rune_col))
        {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let cp = self.checkpoints[idx];
        let mut cur_byte = cp.byte;
        let mut cur_rune = cp.rune;

        while cur_rune < rune_col && cur_byte < self.end {
            let ch = s[cur_byte..].chars().next().unwrap();
            cur_rune += 1;
            cur_byte += ch.len_utf8();
        }
        cur_byte
    }
}
