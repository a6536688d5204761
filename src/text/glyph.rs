//! Glyph records and the per-paragraph glyph buffer.
//!
//! The glyph buffer is derived state: one slot per paragraph, `None` while
//! stale. Mutations of the tagged text invalidate exactly the slots named by
//! the returned [`ParagraphSpan`]; slots are re-derived lazily on the next
//! read.

use crate::text::layout::{LineBox, WrapMode};
use crate::text::registry::StyleId;
use crate::text::tagged::ParagraphSpan;
use crate::unicode::CharClass;
use std::ops::Range;

/// Classification of a glyph for wrapping and word movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    Word,
    Punctuation,
    Whitespace,
    /// A tab; whitespace with a tab-stop advance.
    Tab,
}

impl GlyphKind {
    /// Break class used by word-break scanning.
    #[must_use]
    pub fn class(self) -> CharClass {
        match self {
            Self::Word => CharClass::Word,
            Self::Punctuation => CharClass::Punctuation,
            Self::Whitespace | Self::Tab => CharClass::Whitespace,
        }
    }

    #[must_use]
    pub fn is_whitespace(self) -> bool {
        matches!(self, Self::Whitespace | Self::Tab)
    }

    pub(crate) fn of_cluster(text: &str) -> Self {
        if text == "\t" {
            return Self::Tab;
        }
        match CharClass::of_str(text) {
            CharClass::Word => Self::Word,
            CharClass::Punctuation => Self::Punctuation,
            CharClass::Whitespace => Self::Whitespace,
        }
    }
}

/// A shaped glyph positioned along its paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    /// Font-specific glyph id.
    pub id: u32,
    /// Source characters, relative to the paragraph start. Empty for the
    /// trailing glyphs of a multi-glyph cluster.
    pub chars: Range<usize>,
    /// Pen x relative to the paragraph start, before wrapping.
    pub x: f32,
    pub advance: f32,
    pub kind: GlyphKind,
    /// Registered style of the source characters (`None` = default style).
    pub style: Option<StyleId>,
    /// Line height of the glyph's font.
    pub line_height: f32,
    /// Ascent of the glyph's font.
    pub ascent: f32,
}

impl Glyph {
    /// Right edge of the glyph along the paragraph.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.advance
    }

    /// Whether this glyph continues the cluster of the previous glyph.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Shaped glyphs of one paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphGlyphs {
    pub glyphs: Vec<Glyph>,
    /// Content length in chars (terminator excluded).
    pub char_len: usize,
    /// Line height used when the paragraph (or a line) has no glyphs.
    pub default_line_height: f32,
    pub default_ascent: f32,
}

impl ParagraphGlyphs {
    /// Index of the glyph whose cluster contains paragraph-relative char
    /// `rel`, if any.
    #[must_use]
    pub fn glyph_at_char(&self, rel: usize) -> Option<usize> {
        self.glyphs
            .iter()
            .position(|g| g.chars.start <= rel && rel < g.chars.end)
    }

    /// Total advance of the paragraph.
    #[must_use]
    pub fn advance_width(&self) -> f32 {
        self.glyphs.last().map_or(0.0, Glyph::right)
    }
}

/// Wrap parameters a paragraph's lines were broken for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapKey {
    pub mode: WrapMode,
    pub width: Option<f32>,
}

/// Glyphs plus broken lines of one paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphLayout {
    pub glyphs: ParagraphGlyphs,
    pub lines: Vec<LineBox>,
    pub wrap: WrapKey,
}

impl ParagraphLayout {
    /// Sum of line heights.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.lines.iter().map(|line| line.height).sum()
    }

    /// Widest visible line.
    #[must_use]
    pub fn max_width(&self) -> f32 {
        self.lines.iter().map(|line| line.width).fold(0.0, f32::max)
    }

    /// Index of the line holding paragraph-relative char `rel`; a soft-wrap
    /// boundary belongs to the following line.
    #[must_use]
    pub fn line_for_char(&self, rel: usize) -> usize {
        self.lines
            .iter()
            .rposition(|line| line.chars.start <= rel)
            .unwrap_or(0)
    }
}

/// One slot per paragraph; `None` marks a paragraph awaiting re-derivation.
#[derive(Clone, Debug, Default)]
pub struct GlyphBuffer {
    slots: Vec<Option<ParagraphLayout>>,
}

impl GlyphBuffer {
    /// Buffer with `paragraphs` stale slots.
    #[must_use]
    pub fn with_paragraphs(paragraphs: usize) -> Self {
        Self {
            slots: vec![None; paragraphs],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Replace the slots named by `span` with stale ones.
    pub fn invalidate(&mut self, span: ParagraphSpan) {
        if span.is_empty() {
            return;
        }
        let first = span.first.min(self.slots.len());
        let end = (span.first + span.removed).min(self.slots.len());
        self.slots
            .splice(first..end, std::iter::repeat_n(None, span.inserted));
    }

    /// Mark every slot stale and resize to `paragraphs`.
    pub fn invalidate_all(&mut self, paragraphs: usize) {
        self.slots.clear();
        self.slots.resize(paragraphs, None);
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&ParagraphLayout> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut ParagraphLayout> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    pub fn store(&mut self, idx: usize, layout: ParagraphLayout) {
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(layout);
    }

    /// Indices of stale slots.
    pub fn stale(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(idx, _)| idx)
    }

    /// Laid-out paragraphs in order. Stale slots are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ParagraphLayout)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|layout| (idx, layout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_layout(char_len: usize) -> ParagraphLayout {
        ParagraphLayout {
            glyphs: ParagraphGlyphs {
                char_len,
                ..ParagraphGlyphs::default()
            },
            lines: Vec::new(),
            wrap: WrapKey {
                mode: WrapMode::None,
                width: None,
            },
        }
    }

    #[test]
    fn test_glyph_kind_of_cluster() {
        assert_eq!(GlyphKind::of_cluster("\t"), GlyphKind::Tab);
        assert_eq!(GlyphKind::of_cluster(" "), GlyphKind::Whitespace);
        assert_eq!(GlyphKind::of_cluster("a"), GlyphKind::Word);
        assert_eq!(GlyphKind::of_cluster(","), GlyphKind::Punctuation);
        assert!(GlyphKind::Tab.is_whitespace());
        assert_eq!(GlyphKind::Tab.class(), CharClass::Whitespace);
    }

    #[test]
    fn test_invalidate_span_splices_slots() {
        let mut buffer = GlyphBuffer::with_paragraphs(3);
        for idx in 0..3 {
            buffer.store(idx, dummy_layout(idx));
        }
        buffer.invalidate(ParagraphSpan {
            first: 1,
            removed: 1,
            inserted: 2,
        });

        assert_eq!(buffer.len(), 4);
        assert!(buffer.get(0).is_some());
        assert!(buffer.get(1).is_none());
        assert!(buffer.get(2).is_none());
        // The old third paragraph shifted down one slot.
        assert_eq!(buffer.get(3).map(|l| l.glyphs.char_len), Some(2));
        assert_eq!(buffer.stale().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_invalidate_join() {
        let mut buffer = GlyphBuffer::with_paragraphs(3);
        for idx in 0..3 {
            buffer.store(idx, dummy_layout(idx));
        }
        buffer.invalidate(ParagraphSpan {
            first: 0,
            removed: 2,
            inserted: 1,
        });
        assert_eq!(buffer.len(), 2);
        assert!(buffer.get(0).is_none());
        assert_eq!(buffer.get(1).map(|l| l.glyphs.char_len), Some(2));
    }

    #[test]
    fn test_invalidate_all() {
        let mut buffer = GlyphBuffer::with_paragraphs(2);
        buffer.store(0, dummy_layout(0));
        buffer.invalidate_all(5);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.stale().count(), 5);
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn test_line_for_char_prefers_following_line() {
        let mut layout = dummy_layout(10);
        layout.lines = vec![LineBox::empty(0, 0.0, 0.0), LineBox::empty(0, 0.0, 0.0)];
        layout.lines[0].chars = 0..5;
        layout.lines[1].chars = 5..10;
        assert_eq!(layout.line_for_char(4), 0);
        assert_eq!(layout.line_for_char(5), 1);
        assert_eq!(layout.line_for_char(10), 1);
    }
}
