//! Read-only view of a laid-out document.
//!
//! [`LineIndex`] flattens the per-paragraph line boxes into visual lines with
//! their vertical positions. A [`Frame`] borrows the buffer and that index
//! and answers the offset <-> point questions shared by hit-testing, caret
//! placement, vertical movement and painting.

use crate::text::glyph::{Glyph, GlyphBuffer, ParagraphLayout};
use crate::text::layout::{Alignment, LineBox, LinePlacement, WrapMode};
use crate::text::tagged::TaggedText;
use std::cell::Ref;
use std::ops::Range;

/// A line in document order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VisualLine {
    pub paragraph: usize,
    /// Index within the paragraph's lines.
    pub line: usize,
    pub top: f32,
}

/// Visual-line table of a laid-out buffer. Rebuilt only after the layout
/// changed.
#[derive(Clone, Debug, Default)]
pub(crate) struct LineIndex {
    lines: Vec<VisualLine>,
    paragraph_starts: Vec<usize>,
    first_lines: Vec<usize>,
    height: f32,
    widest: f32,
}

impl LineIndex {
    /// `buffer` must be fully laid out.
    pub fn build(buffer: &GlyphBuffer, text: &TaggedText) -> Self {
        let count = buffer.len();
        let mut index = Self {
            lines: Vec::new(),
            paragraph_starts: Vec::with_capacity(count),
            first_lines: Vec::with_capacity(count),
            height: 0.0,
            widest: 0.0,
        };
        for paragraph in 0..count {
            index.paragraph_starts.push(text.paragraph_range(paragraph).start);
            index.first_lines.push(index.lines.len());
            let Some(layout) = buffer.get(paragraph) else {
                continue;
            };
            for (line, lb) in layout.lines.iter().enumerate() {
                index.lines.push(VisualLine {
                    paragraph,
                    line,
                    top: index.height,
                });
                index.height += lb.height;
                index.widest = index.widest.max(lb.width);
            }
        }
        index
    }
}

pub(crate) struct Frame<'a> {
    buffer: Ref<'a, GlyphBuffer>,
    index: Ref<'a, LineIndex>,
    reference: f32,
    alignment: Alignment,
}

impl<'a> Frame<'a> {
    /// `index` must have been built from `buffer`.
    pub fn new(
        buffer: Ref<'a, GlyphBuffer>,
        index: Ref<'a, LineIndex>,
        alignment: Alignment,
        wrap_mode: WrapMode,
        wrap_width: Option<f32>,
    ) -> Self {
        let reference = match (wrap_mode, wrap_width) {
            (WrapMode::None, _) | (_, None) => index.widest,
            (_, Some(width)) => width,
        };
        Self {
            buffer,
            index,
            reference,
            alignment,
        }
    }

    pub fn line_count(&self) -> usize {
        self.index.lines.len()
    }

    pub fn height(&self) -> f32 {
        self.index.height
    }

    pub fn widest(&self) -> f32 {
        self.index.widest
    }

    pub fn visual(&self, v: usize) -> Option<VisualLine> {
        self.index.lines.get(v).copied()
    }

    pub fn paragraph_start(&self, paragraph: usize) -> usize {
        self.index.paragraph_starts.get(paragraph).copied().unwrap_or(0)
    }

    pub fn layout(&self, paragraph: usize) -> Option<&ParagraphLayout> {
        self.buffer.get(paragraph)
    }

    pub fn line(&self, v: usize) -> Option<(&ParagraphLayout, &LineBox)> {
        let visual = self.index.lines.get(v)?;
        let layout = self.buffer.get(visual.paragraph)?;
        Some((layout, layout.lines.get(visual.line)?))
    }

    pub fn placement(&self, v: usize) -> LinePlacement {
        self.line(v).map_or_else(LinePlacement::default, |(_, line)| {
            line.placement(self.alignment, self.reference)
        })
    }

    /// Visual line holding the caret at `offset`.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let paragraph = self
            .index
            .paragraph_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let Some(layout) = self.buffer.get(paragraph) else {
            return 0;
        };
        let rel = self.relative(paragraph, offset, layout);
        self.index.first_lines.get(paragraph).copied().unwrap_or(0) + layout.line_for_char(rel)
    }

    /// Line-relative x of the caret at `offset` on visual line `v`.
    pub fn x_of_offset(&self, v: usize, offset: usize) -> f32 {
        let Some((layout, line)) = self.line(v) else {
            return 0.0;
        };
        let paragraph = self.index.lines[v].paragraph;
        let rel = self.relative(paragraph, offset, layout);
        let glyphs = &layout.glyphs.glyphs;
        let placement = self.placement(v);
        line.glyphs
            .clone()
            .find(|&idx| !glyphs[idx].is_continuation() && glyphs[idx].chars.end > rel)
            .map_or_else(
                || placement.end_x(line),
                |idx| placement.glyph_x(line, glyphs, idx),
            )
    }

    /// Offset nearest to `x` on visual line `v`: the left half of a glyph
    /// maps to its start, anything past the last glyph to the line end.
    pub fn offset_at_x(&self, v: usize, x: f32) -> usize {
        let Some((layout, line)) = self.line(v) else {
            return 0;
        };
        let start = self.paragraph_start(self.index.lines[v].paragraph);
        let glyphs = &layout.glyphs.glyphs;
        let placement = self.placement(v);

        let xs = placement.positions(line, glyphs);
        let x_of = |idx: usize| xs[idx - line.glyphs.start];

        let mut boundaries = cluster_starts(glyphs, line.glyphs.clone()).peekable();
        while let Some(idx) = boundaries.next() {
            let left = x_of(idx);
            let right = boundaries.peek().map_or_else(|| x_of(line.glyphs.end), |&next| x_of(next));
            if x < (left + right) / 2.0 {
                return start + glyphs[idx].chars.start;
            }
        }
        self.line_end_offset(v)
    }

    /// Offset of the first character of visual line `v`.
    pub fn line_start_offset(&self, v: usize) -> usize {
        let Some((_, line)) = self.line(v) else {
            return 0;
        };
        self.paragraph_start(self.index.lines[v].paragraph) + line.chars.start
    }

    /// Caret offset at the end of visual line `v`. A soft-wrapped line
    /// ending in whitespace stops before that space so the caret stays on
    /// the line.
    pub fn line_end_offset(&self, v: usize) -> usize {
        let Some((layout, line)) = self.line(v) else {
            return 0;
        };
        let start = self.paragraph_start(self.index.lines[v].paragraph);
        if line.ends_paragraph {
            return start + layout.glyphs.char_len;
        }
        let glyphs = &layout.glyphs.glyphs;
        match cluster_starts(glyphs, line.glyphs.clone()).last().map(|idx| &glyphs[idx]) {
            Some(last) if last.kind.is_whitespace() => start + last.chars.start,
            _ => start + line.chars.end,
        }
    }

    /// Visual line at vertical position `y`, clamped to the first and last
    /// lines.
    pub fn line_at_y(&self, y: f32) -> usize {
        self.index
            .lines
            .iter()
            .rposition(|line| line.top <= y)
            .unwrap_or(0)
    }

    fn relative(&self, paragraph: usize, offset: usize, layout: &ParagraphLayout) -> usize {
        offset
            .saturating_sub(self.paragraph_start(paragraph))
            .min(layout.glyphs.char_len)
    }
}

/// Indices of the first glyph of each cluster in `line_glyphs`.
fn cluster_starts(glyphs: &[Glyph], line_glyphs: Range<usize>) -> impl Iterator<Item = usize> + '_ {
    line_glyphs.filter(move |&idx| !glyphs[idx].is_continuation())
}
