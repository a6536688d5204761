//! Rope storage for document characters, using the ropey crate.
//!
//! Paragraphs are rope lines: a line's content excludes its terminator, and
//! a text ending in a line break has a trailing empty paragraph.

use crate::unicode::line_break_len;
use ropey::{Rope, RopeSlice};
use std::ops::Range;

/// Wrapper around `ropey::Rope` with paragraph-oriented helpers.
#[derive(Clone, Debug, Default)]
pub struct RopeWrapper {
    rope: Rope,
}

impl RopeWrapper {
    /// Create an empty rope.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a rope from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Get the number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of paragraphs (always at least one).
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the paragraph containing `char_idx` (clamped to the text).
    ///
    /// A terminator belongs to the paragraph it ends.
    #[must_use]
    pub fn paragraph_at(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.len_chars()))
    }

    /// Char offset of the start of a paragraph (text length past the end).
    #[must_use]
    pub fn paragraph_start(&self, idx: usize) -> usize {
        if idx >= self.paragraph_count() {
            self.len_chars()
        } else {
            self.rope.line_to_char(idx)
        }
    }

    /// Char range of a paragraph's content, excluding its terminator.
    #[must_use]
    pub fn paragraph_range(&self, idx: usize) -> Range<usize> {
        let full = self.paragraph_range_with_break(idx);
        let line = self.rope.slice(full.clone());
        let break_len = terminator_len(line);
        full.start..full.end - break_len
    }

    /// Char range of a paragraph including its terminator.
    #[must_use]
    pub fn paragraph_range_with_break(&self, idx: usize) -> Range<usize> {
        if idx >= self.paragraph_count() {
            let len = self.len_chars();
            return len..len;
        }
        let start = self.rope.line_to_char(idx);
        start..start + self.rope.line(idx).len_chars()
    }

    /// Paragraph content as an owned string.
    #[must_use]
    pub fn paragraph_text(&self, idx: usize) -> String {
        self.rope.slice(self.paragraph_range(idx)).to_string()
    }

    /// Get a slice of the rope; out-of-range requests yield an empty slice.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> RopeSlice<'_> {
        self.rope
            .get_slice(range)
            .unwrap_or_else(|| self.rope.slice(..0))
    }

    /// Character at `char_idx`.
    #[must_use]
    pub fn char_at(&self, char_idx: usize) -> Option<char> {
        self.rope.get_char(char_idx)
    }

    /// Insert text at a character position. Callers validate the position.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        if char_idx <= self.len_chars() {
            self.rope.insert(char_idx, text);
        }
    }

    /// Remove a range of characters. Callers validate the range.
    pub fn remove(&mut self, range: Range<usize>) {
        if range.start <= range.end && range.end <= self.len_chars() {
            self.rope.remove(range);
        }
    }

    /// Convert to string.
    #[must_use]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

fn terminator_len(line: RopeSlice<'_>) -> usize {
    let n = line.len_chars();
    let tail_start = n.saturating_sub(2);
    let tail: String = line.slice(tail_start..n).chars().collect();
    line_break_len(&tail)
}

impl From<&str> for RopeWrapper {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rope_basic() {
        let rope = RopeWrapper::from_str("Hello, world!");
        assert_eq!(rope.len_chars(), 13);
        assert_eq!(rope.paragraph_count(), 1);
        assert_eq!(rope.paragraph_range(0), 0..13);
    }

    #[test]
    fn test_paragraphs() {
        let rope = RopeWrapper::from_str("one\r\ntwo\nthree\n");
        assert_eq!(rope.paragraph_count(), 4);
        assert_eq!(rope.paragraph_range(0), 0..3);
        assert_eq!(rope.paragraph_range_with_break(0), 0..5);
        assert_eq!(rope.paragraph_range(1), 5..8);
        assert_eq!(rope.paragraph_text(2), "three");
        assert_eq!(rope.paragraph_range(3), 15..15);
        assert_eq!(rope.paragraph_range(9), 15..15);
    }

    #[test]
    fn test_paragraph_at_terminator() {
        let rope = RopeWrapper::from_str("ab\ncd");
        assert_eq!(rope.paragraph_at(2), 0);
        assert_eq!(rope.paragraph_at(3), 1);
        assert_eq!(rope.paragraph_at(99), 1);
        assert_eq!(rope.paragraph_start(1), 3);
        assert_eq!(rope.paragraph_start(2), 5);
    }

    #[test]
    fn test_empty_rope_has_one_paragraph() {
        let rope = RopeWrapper::new();
        assert!(rope.is_empty());
        assert_eq!(rope.paragraph_count(), 1);
        assert_eq!(rope.paragraph_range(0), 0..0);
    }

    #[test]
    fn test_insert_remove() {
        let mut rope = RopeWrapper::from_str("Hello!");
        rope.insert(5, ", world");
        assert_eq!(rope.to_string(), "Hello, world!");
        rope.remove(5..12);
        assert_eq!(rope.to_string(), "Hello!");
        // Invalid requests are ignored.
        rope.remove(4..99);
        rope.insert(99, "x");
        assert_eq!(rope.to_string(), "Hello!");
    }
}
