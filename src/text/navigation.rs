//! Caret movement over clusters, words, visual lines and paragraphs.

use crate::text::cursor::CursorMove;
use crate::text::document::TextDocument;
use crate::text::layout::word_break;
use crate::unicode::{next_cluster_boundary, prev_cluster_boundary};

impl TextDocument {
    /// Move the caret and return its new offset. Moves past either end of
    /// the text clamp.
    pub fn move_cursor(&mut self, movement: CursorMove) -> usize {
        let from = self.cursor.position().min(self.len_chars());
        match movement {
            CursorMove::LineUp | CursorMove::LineDown => {
                let (target, x) = self.vertical_target(from, movement == CursorMove::LineDown);
                self.cursor.move_vertically(target, x);
            }
            _ => {
                let target = self.move_target(from, movement);
                self.cursor.move_to(target);
            }
        }
        self.cursor.position()
    }

    fn move_target(&self, from: usize, movement: CursorMove) -> usize {
        let text = self.tagged();
        match movement {
            CursorMove::CharLeft => self.char_left(from),
            CursorMove::CharRight => self.char_right(from),
            CursorMove::WordLeft => self.word_left(from),
            CursorMove::WordRight => self.word_right(from),
            CursorMove::LineStart => {
                let frame = self.frame();
                frame.line_start_offset(frame.line_of_offset(from))
            }
            CursorMove::LineEnd => {
                let frame = self.frame();
                frame.line_end_offset(frame.line_of_offset(from))
            }
            CursorMove::ParagraphStart => text.paragraph_range(text.paragraph_at(from)).start,
            CursorMove::ParagraphEnd => text.paragraph_range(text.paragraph_at(from)).end,
            CursorMove::DocumentStart => 0,
            CursorMove::DocumentEnd | CursorMove::LineUp | CursorMove::LineDown => {
                self.len_chars()
            }
        }
    }

    /// Target of a vertical move plus the x to remember. Moving up from the
    /// first line goes to the start of the text, down from the last line to
    /// its end.
    fn vertical_target(&self, from: usize, down: bool) -> (usize, f32) {
        let frame = self.frame();
        let v = frame.line_of_offset(from);
        let x = self
            .cursor
            .preferred_x()
            .unwrap_or_else(|| frame.x_of_offset(v, from));
        let target = if down {
            if v + 1 >= frame.line_count() {
                self.len_chars()
            } else {
                frame.offset_at_x(v + 1, x)
            }
        } else if v == 0 {
            0
        } else {
            frame.offset_at_x(v - 1, x)
        };
        (target, x)
    }

    /// Previous cluster boundary; from a paragraph start, the end of the
    /// previous paragraph's content.
    pub(super) fn char_left(&self, from: usize) -> usize {
        if from == 0 {
            return 0;
        }
        let text = self.tagged();
        let p = text.paragraph_at(from);
        let range = text.paragraph_range(p);
        if from <= range.start {
            return if p == 0 {
                0
            } else {
                text.paragraph_range(p - 1).end
            };
        }
        if from > range.end {
            return range.end;
        }
        let content = text.rope().slice(range.clone()).to_string();
        range.start + prev_cluster_boundary(&content, from - range.start)
    }

    /// Next cluster boundary; from a paragraph's content end, the start of
    /// the next paragraph.
    pub(super) fn char_right(&self, from: usize) -> usize {
        let len = self.len_chars();
        if from >= len {
            return len;
        }
        let text = self.tagged();
        let p = text.paragraph_at(from);
        let range = text.paragraph_range(p);
        if from >= range.end {
            return if p + 1 < text.paragraph_count() {
                text.paragraph_range(p + 1).start
            } else {
                len
            };
        }
        let content = text.rope().slice(range.clone()).to_string();
        range.start + next_cluster_boundary(&content, from - range.start)
    }

    /// Start of the word at or before `from`, skipping whitespace.
    pub(super) fn word_left(&self, from: usize) -> usize {
        let text = self.tagged();
        let p = text.paragraph_at(from);
        let range = text.paragraph_range(p);
        if from <= range.start || from > range.end {
            return self.char_left(from);
        }
        let frame = self.frame();
        let Some(layout) = frame.layout(p) else {
            return range.start;
        };
        let para = &layout.glyphs;
        let Some(glyph) = para.glyph_at_char(from - range.start - 1) else {
            return range.start;
        };
        let (mut start, _) = word_break(&para.glyphs, 0, glyph);
        if para.glyphs[glyph].kind.is_whitespace() && start > 0 {
            start = word_break(&para.glyphs, 0, start - 1).0;
        }
        range.start + para.glyphs[start].chars.start
    }

    /// Start of the next word; from a paragraph end, the next paragraph.
    pub(super) fn word_right(&self, from: usize) -> usize {
        let text = self.tagged();
        let p = text.paragraph_at(from);
        let range = text.paragraph_range(p);
        if from >= range.end {
            return self.char_right(from);
        }
        let frame = self.frame();
        let Some(layout) = frame.layout(p) else {
            return range.end;
        };
        let para = &layout.glyphs;
        let Some(glyph) = para.glyph_at_char(from - range.start) else {
            return range.end;
        };
        let (_, mut end) = word_break(&para.glyphs, 0, glyph);
        if !para.glyphs[glyph].kind.is_whitespace()
            && para.glyphs.get(end).is_some_and(|g| g.kind.is_whitespace())
        {
            end = word_break(&para.glyphs, 0, end).1;
        }
        range.start + para.glyphs.get(end).map_or(para.char_len, |g| g.chars.start)
    }
}
