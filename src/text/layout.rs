//! Paragraph shaping, word-break scanning and line breaking.
//!
//! A paragraph is shaped one style run at a time through [`FontMetrics`],
//! producing [`Glyph`]s with pen positions measured from the paragraph
//! start. [`break_lines`] then splits the glyph sequence into [`LineBox`]es
//! against the available width.

use crate::font::{Font, FontMetrics};
use crate::geometry::Size;
use crate::style::Style;
use crate::text::glyph::{Glyph, GlyphKind, ParagraphGlyphs, WrapKey};
use crate::text::registry::StyleRegistry;
use crate::text::tagged::Tag;
use std::ops::Range;

/// Slack allowed when comparing accumulated advances against a width.
const WIDTH_EPSILON: f32 = 1e-3;

/// Text wrapping mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// No wrapping - one line per paragraph.
    None,
    /// Wrap at the overflowing glyph.
    Char,
    /// Wrap at word boundaries, mid-word only when a word does not fit.
    #[default]
    Word,
}

/// Horizontal alignment of lines against the reference width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
    /// Stretch interior whitespace to fill the line; a paragraph's last line
    /// stays left-aligned.
    Justify,
}

/// One visual line of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBox {
    /// Glyph indices into the paragraph's glyph list.
    pub glyphs: Range<usize>,
    /// Paragraph-relative chars covered by the line, trailing whitespace
    /// included.
    pub chars: Range<usize>,
    /// Pen x of the first glyph along the paragraph.
    pub origin: f32,
    /// Visible width; trailing whitespace excluded.
    pub width: f32,
    /// Full advance, trailing whitespace included.
    pub advance: f32,
    pub height: f32,
    pub ascent: f32,
    /// Whitespace glyphs before the last visible glyph.
    pub interior_spaces: usize,
    /// Whether the line ends at the paragraph end rather than a soft wrap.
    pub ends_paragraph: bool,
}

impl LineBox {
    /// Glyph-less line at paragraph-relative char `at`.
    #[must_use]
    pub fn empty(at: usize, height: f32, ascent: f32) -> Self {
        Self {
            glyphs: 0..0,
            chars: at..at,
            origin: 0.0,
            width: 0.0,
            advance: 0.0,
            height,
            ascent,
            interior_spaces: 0,
            ends_paragraph: true,
        }
    }

    /// Horizontal placement of this line for `alignment` against
    /// `reference` width.
    #[must_use]
    pub fn placement(&self, alignment: Alignment, reference: f32) -> LinePlacement {
        let free = (reference - self.width).max(0.0);
        match alignment {
            Alignment::Left => LinePlacement::default(),
            Alignment::Right => LinePlacement {
                offset: free,
                space_stretch: 0.0,
            },
            Alignment::Center => LinePlacement {
                offset: free / 2.0,
                space_stretch: 0.0,
            },
            Alignment::Justify => {
                if self.ends_paragraph || self.interior_spaces == 0 {
                    LinePlacement::default()
                } else {
                    LinePlacement {
                        offset: 0.0,
                        space_stretch: free / self.interior_spaces as f32,
                    }
                }
            }
        }
    }
}

/// Alignment result for one line: a leading offset plus extra advance per
/// interior whitespace glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinePlacement {
    pub offset: f32,
    pub space_stretch: f32,
}

impl LinePlacement {
    /// Line-relative x of glyph `idx` of `line`.
    #[must_use]
    pub fn glyph_x(&self, line: &LineBox, glyphs: &[Glyph], idx: usize) -> f32 {
        let Some(glyph) = glyphs.get(idx) else {
            return self.end_x(line);
        };
        let stretched = glyphs[line.glyphs.start..idx]
            .iter()
            .filter(|g| g.kind.is_whitespace())
            .count()
            .min(line.interior_spaces);
        self.offset + (glyph.x - line.origin) + self.space_stretch * stretched as f32
    }

    /// Line-relative x of every glyph of `line` in one pass, followed by
    /// [`end_x`](Self::end_x).
    #[must_use]
    pub fn positions(&self, line: &LineBox, glyphs: &[Glyph]) -> Vec<f32> {
        let mut out = Vec::with_capacity(line.glyphs.len() + 1);
        let mut stretched = 0usize;
        for glyph in &glyphs[line.glyphs.clone()] {
            out.push(
                self.offset
                    + (glyph.x - line.origin)
                    + self.space_stretch * stretched.min(line.interior_spaces) as f32,
            );
            if glyph.kind.is_whitespace() {
                stretched += 1;
            }
        }
        out.push(self.end_x(line));
        out
    }

    /// Line-relative pen x after the last glyph of `line`.
    #[must_use]
    pub fn end_x(&self, line: &LineBox) -> f32 {
        self.offset + line.advance + self.space_stretch * line.interior_spaces as f32
    }
}

/// Everything shaping needs besides the text.
pub struct ShapeContext<'a> {
    pub metrics: &'a dyn FontMetrics,
    pub styles: &'a StyleRegistry,
    pub default_style: &'a Style,
    pub tab_width: u8,
}

impl ShapeContext<'_> {
    /// Style of a run resolved over the default style.
    fn resolve(&self, tag: Option<Tag>) -> Style {
        match tag.and_then(Tag::style).and_then(|id| self.styles.get(id)) {
            Some(style) => self.default_style.merge(style),
            None => self.default_style.clone(),
        }
    }
}

/// Shape one paragraph.
///
/// `text` is the paragraph content without its terminator and `runs` its
/// tag runs with paragraph-relative char ranges. Each run is shaped in one
/// [`FontMetrics::shape`] call with the run's resolved font.
#[must_use]
pub fn shape_paragraph(
    ctx: &ShapeContext<'_>,
    text: &str,
    runs: &[(Range<usize>, Option<Tag>)],
) -> ParagraphGlyphs {
    let byte_offsets: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = byte_offsets.len() - 1;
    let char_of_byte = |byte: usize| byte_offsets.partition_point(|&b| b < byte);

    let default_font = ctx.default_style.font_or_default();
    let mut out = ParagraphGlyphs {
        glyphs: Vec::with_capacity(char_len),
        char_len,
        default_line_height: ctx.metrics.line_height(&default_font),
        default_ascent: ctx.metrics.ascent(&default_font),
    };

    let mut pen = 0.0f32;
    for (range, tag) in runs {
        let start = range.start.min(char_len);
        let end = range.end.min(char_len);
        if start >= end {
            continue;
        }
        let run_bytes = byte_offsets[start]..byte_offsets[end];
        let run_text = &text[run_bytes.clone()];

        let font = ctx.resolve(*tag).font_or_default();
        let line_height = ctx.metrics.line_height(&font);
        let ascent = ctx.metrics.ascent(&font);
        let tab_advance = ctx.metrics.space_advance(&font) * f32::from(ctx.tab_width);
        let style = tag.and_then(Tag::style);

        let shaped = ctx.metrics.shape(&font, run_text);
        let mut prev_cluster = None;
        for (k, sg) in shaped.iter().enumerate() {
            let cluster_end = shaped[k + 1..]
                .iter()
                .map(|g| g.cluster)
                .find(|&c| c > sg.cluster)
                .unwrap_or(run_text.len())
                .min(run_text.len());
            let cluster_text = run_text.get(sg.cluster..cluster_end).unwrap_or_default();
            let first_char = char_of_byte(run_bytes.start + sg.cluster);
            let last_char = char_of_byte(run_bytes.start + cluster_end);

            let chars = if prev_cluster == Some(sg.cluster) {
                last_char..last_char
            } else {
                first_char..last_char
            };
            prev_cluster = Some(sg.cluster);

            let kind = GlyphKind::of_cluster(cluster_text);
            let advance = if kind == GlyphKind::Tab && !chars.is_empty() {
                tab_advance
            } else {
                sg.advance
            };
            out.glyphs.push(Glyph {
                id: sg.glyph_id,
                chars,
                x: pen,
                advance,
                kind,
                style,
                line_height,
                ascent,
            });
            pen += advance;
        }
    }
    out
}

/// Maximal run of same-class glyphs containing glyph `from`, not starting
/// before glyph `begin`. Returns glyph indices `(start, end)`.
#[must_use]
pub fn word_break(glyphs: &[Glyph], begin: usize, from: usize) -> (usize, usize) {
    let Some(glyph) = glyphs.get(from) else {
        let end = from.min(glyphs.len());
        return (end, end);
    };
    let class = glyph.kind.class();
    let begin = begin.min(from);

    let mut start = from;
    while start > begin && glyphs[start - 1].kind.class() == class {
        start -= 1;
    }
    let mut end = from + 1;
    while end < glyphs.len() && glyphs[end].kind.class() == class {
        end += 1;
    }
    (start, end)
}

/// Break a shaped paragraph into lines.
#[must_use]
pub fn break_lines(paragraph: &ParagraphGlyphs, wrap: WrapKey) -> Vec<LineBox> {
    let glyphs = &paragraph.glyphs;
    if glyphs.is_empty() {
        return vec![LineBox::empty(
            0,
            paragraph.default_line_height,
            paragraph.default_ascent,
        )];
    }

    let limit = match (wrap.mode, wrap.width) {
        (WrapMode::None, _) | (_, None) => None,
        (_, Some(width)) => Some(width.max(0.0)),
    };

    let mut lines = Vec::new();
    let mut begin = 0;
    while begin < glyphs.len() {
        let end = limit.map_or(glyphs.len(), |width| {
            find_line_end(glyphs, begin, width, wrap.mode)
        });
        lines.push(make_line(paragraph, begin, end));
        begin = end;
    }
    lines
}

/// Measure glyphs set in `font`.
#[must_use]
pub fn extents<'a>(
    metrics: &dyn FontMetrics,
    font: &Font,
    glyphs: impl IntoIterator<Item = &'a Glyph>,
) -> Size {
    Size::new(
        glyphs.into_iter().map(|g| g.advance).sum(),
        metrics.line_height(font),
    )
}

fn find_line_end(glyphs: &[Glyph], begin: usize, width: f32, mode: WrapMode) -> usize {
    let origin = glyphs[begin].x;
    for (i, glyph) in glyphs.iter().enumerate().skip(begin + 1) {
        if glyph.kind.is_whitespace() || glyph.is_continuation() {
            continue;
        }
        if glyph.right() - origin > width + WIDTH_EPSILON {
            let at = match mode {
                WrapMode::Word => word_boundary_before(glyphs, begin, i).unwrap_or(i),
                _ => i,
            };
            return snap_to_cluster(glyphs, begin, at);
        }
    }
    glyphs.len()
}

/// Latest word boundary in `(begin, at]`: a non-whitespace glyph following
/// whitespace or punctuation.
fn word_boundary_before(glyphs: &[Glyph], begin: usize, at: usize) -> Option<usize> {
    let mut k = at;
    loop {
        let (start, _) = word_break(glyphs, begin, k);
        if start <= begin {
            return None;
        }
        let before = glyphs[start - 1].kind;
        if !glyphs[start].kind.is_whitespace() && before != GlyphKind::Word {
            return Some(start);
        }
        k = start - 1;
    }
}

/// Never split the glyphs of one cluster across lines.
fn snap_to_cluster(glyphs: &[Glyph], begin: usize, at: usize) -> usize {
    let mut k = at;
    while k > begin && glyphs.get(k).is_some_and(Glyph::is_continuation) {
        k -= 1;
    }
    if k > begin {
        return k;
    }
    let mut k = at.max(begin + 1);
    while glyphs.get(k).is_some_and(Glyph::is_continuation) {
        k += 1;
    }
    k
}

fn make_line(paragraph: &ParagraphGlyphs, begin: usize, end: usize) -> LineBox {
    let glyphs = &paragraph.glyphs[begin..end];
    let ends_paragraph = end >= paragraph.glyphs.len();
    let chars_start = if begin == 0 { 0 } else { glyphs[0].chars.start };
    let chars_end = if ends_paragraph {
        paragraph.char_len
    } else {
        paragraph.glyphs[end].chars.start
    };

    let origin = glyphs[0].x;
    let advance = glyphs.last().map_or(0.0, |g| g.right() - origin);
    let last_visible = glyphs.iter().rposition(|g| !g.kind.is_whitespace());
    let width = last_visible.map_or(0.0, |idx| glyphs[idx].right() - origin);
    let interior_spaces = last_visible.map_or(0, |idx| {
        glyphs[..idx].iter().filter(|g| g.kind.is_whitespace()).count()
    });
    let height = glyphs.iter().map(|g| g.line_height).fold(0.0, f32::max);
    let ascent = glyphs.iter().map(|g| g.ascent).fold(0.0, f32::max);

    LineBox {
        glyphs: begin..end,
        chars: chars_start..chars_end,
        origin,
        width,
        advance,
        height,
        ascent,
        interior_spaces,
        ends_paragraph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonospaceMetrics;

    fn shape_with(styles: &StyleRegistry, text: &str, runs: &[(Range<usize>, Option<Tag>)]) -> ParagraphGlyphs {
        let metrics = MonospaceMetrics::new();
        let ctx = ShapeContext {
            metrics: &metrics,
            styles,
            default_style: &Style::NONE,
            tab_width: 4,
        };
        shape_paragraph(&ctx, text, runs)
    }

    fn shape(text: &str) -> ParagraphGlyphs {
        let len = text.chars().count();
        shape_with(&StyleRegistry::new(), text, &[(0..len, None)])
    }

    fn wrap(mode: WrapMode, width: f32) -> WrapKey {
        WrapKey {
            mode,
            width: Some(width),
        }
    }

    fn line_chars(lines: &[LineBox]) -> Vec<Range<usize>> {
        lines.iter().map(|line| line.chars.clone()).collect()
    }

    #[test]
    fn test_shape_positions() {
        let para = shape("hello world");
        assert_eq!(para.glyphs.len(), 11);
        assert_eq!(para.char_len, 11);
        assert!((para.glyphs[6].x - 48.0).abs() < f32::EPSILON);
        assert_eq!(para.glyphs[5].kind, GlyphKind::Whitespace);
        assert_eq!(para.glyphs[6].chars, 6..7);
        assert!((para.advance_width() - 88.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shape_tab_advance() {
        let para = shape("a\tb");
        assert_eq!(para.glyphs[1].kind, GlyphKind::Tab);
        assert!((para.glyphs[1].advance - 32.0).abs() < f32::EPSILON);
        assert!((para.glyphs[2].x - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shape_clusters_map_to_char_ranges() {
        let para = shape("e\u{0301}x");
        assert_eq!(para.glyphs.len(), 2);
        assert_eq!(para.glyphs[0].chars, 0..2);
        assert_eq!(para.glyphs[1].chars, 2..3);
        assert_eq!(para.glyph_at_char(1), Some(0));
    }

    #[test]
    fn test_shape_style_run_uses_its_font() {
        let mut styles = StyleRegistry::new();
        let big = styles
            .add(Style::font_only(Font::new("monospace", 32.0)))
            .unwrap();
        let para = shape_with(
            &styles,
            "abcd",
            &[(0..2, None), (2..4, Some(Tag::Style(big)))],
        );
        assert!((para.glyphs[1].advance - 8.0).abs() < f32::EPSILON);
        assert!((para.glyphs[2].advance - 16.0).abs() < f32::EPSILON);
        assert!((para.glyphs[3].x - 32.0).abs() < f32::EPSILON);
        assert_eq!(para.glyphs[2].style, Some(big));
        assert!((para.glyphs[2].line_height - 40.0).abs() < f32::EPSILON);

        let lines = break_lines(&para, WrapKey { mode: WrapMode::None, width: None });
        assert!((lines[0].height - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_word_break() {
        let para = shape("hello world");
        assert_eq!(word_break(&para.glyphs, 0, 3), (0, 5));
        assert_eq!(word_break(&para.glyphs, 0, 5), (5, 6));
        assert_eq!(word_break(&para.glyphs, 2, 3), (2, 5));
        assert_eq!(word_break(&para.glyphs, 0, 8), (6, 11));
        assert_eq!(word_break(&para.glyphs, 0, 11), (11, 11));
    }

    #[test]
    fn test_word_wrap_breaks_after_space() {
        let para = shape("hello world");
        let lines = break_lines(&para, wrap(WrapMode::Word, 64.0));
        assert_eq!(line_chars(&lines), vec![0..6, 6..11]);
        assert!((lines[0].width - 40.0).abs() < f32::EPSILON);
        assert!((lines[0].advance - 48.0).abs() < f32::EPSILON);
        assert!(!lines[0].ends_paragraph);
        assert!(lines[1].ends_paragraph);
    }

    #[test]
    fn test_char_wrap_breaks_at_overflow() {
        let para = shape("hello world");
        let lines = break_lines(&para, wrap(WrapMode::Char, 64.0));
        assert_eq!(line_chars(&lines), vec![0..8, 8..11]);
    }

    #[test]
    fn test_no_wrap_is_one_line() {
        let para = shape("hello world");
        let lines = break_lines(&para, wrap(WrapMode::None, 16.0));
        assert_eq!(line_chars(&lines), vec![0..11]);
        let lines = break_lines(&para, WrapKey { mode: WrapMode::Word, width: None });
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_long_word_breaks_mid_word() {
        let para = shape("abcdefghij");
        let lines = break_lines(&para, wrap(WrapMode::Word, 32.0));
        assert_eq!(line_chars(&lines), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn test_break_after_punctuation() {
        let para = shape("foo-bar");
        let lines = break_lines(&para, wrap(WrapMode::Word, 40.0));
        assert_eq!(line_chars(&lines), vec![0..4, 4..7]);
    }

    #[test]
    fn test_whitespace_hangs() {
        let para = shape("ab   cd");
        let lines = break_lines(&para, wrap(WrapMode::Word, 24.0));
        assert_eq!(line_chars(&lines), vec![0..5, 5..7]);
        assert!((lines[0].width - 16.0).abs() < f32::EPSILON);
        assert_eq!(lines[0].interior_spaces, 0);
    }

    #[test]
    fn test_first_glyph_always_accepted() {
        let para = shape("ab");
        let lines = break_lines(&para, wrap(WrapMode::Char, 4.0));
        assert_eq!(line_chars(&lines), vec![0..1, 1..2]);
    }

    #[test]
    fn test_empty_paragraph_has_one_line() {
        let para = shape("");
        let lines = break_lines(&para, wrap(WrapMode::Word, 100.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].chars, 0..0);
        assert!((lines[0].height - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_alignment_placement() {
        let para = shape("a b c");
        let mut lines = break_lines(&para, WrapKey { mode: WrapMode::None, width: None });
        let line = &mut lines[0];
        assert!((line.width - 40.0).abs() < f32::EPSILON);
        assert_eq!(line.interior_spaces, 2);

        assert_eq!(line.placement(Alignment::Left, 80.0), LinePlacement::default());
        assert!((line.placement(Alignment::Right, 80.0).offset - 40.0).abs() < f32::EPSILON);
        assert!((line.placement(Alignment::Center, 80.0).offset - 20.0).abs() < f32::EPSILON);
        // A paragraph's last line is not stretched.
        assert_eq!(line.placement(Alignment::Justify, 80.0), LinePlacement::default());

        line.ends_paragraph = false;
        let justified = line.placement(Alignment::Justify, 80.0);
        assert!((justified.space_stretch - 20.0).abs() < f32::EPSILON);
        // "c" sits after two stretched spaces.
        assert!((justified.glyph_x(line, &para.glyphs, 4) - 72.0).abs() < f32::EPSILON);
        assert!((justified.end_x(line) - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_positions_match_glyph_x() {
        let para = shape("a b  c ");
        let mut lines = break_lines(&para, WrapKey { mode: WrapMode::None, width: None });
        let line = &mut lines[0];
        line.ends_paragraph = false;
        let justified = line.placement(Alignment::Justify, 96.0);
        assert_eq!(line.interior_spaces, 3);

        let xs = justified.positions(line, &para.glyphs);
        assert_eq!(xs.len(), line.glyphs.len() + 1);
        for (k, idx) in line.glyphs.clone().enumerate() {
            assert_eq!(xs[k], justified.glyph_x(line, &para.glyphs, idx));
        }
        assert_eq!(xs[line.glyphs.len()], justified.end_x(line));
        // The space before "c" is stretched; the hanging one is not.
        assert_eq!(xs[5] - xs[4], 8.0 + justified.space_stretch);
        assert_eq!(xs[7] - xs[6], 8.0);
    }

    #[test]
    fn test_extents() {
        let para = shape("abc");
        let metrics = MonospaceMetrics::new();
        let size = extents(&metrics, &Font::default(), &para.glyphs);
        assert!((size.width - 24.0).abs() < f32::EPSILON);
        assert!((size.height - 20.0).abs() < f32::EPSILON);
    }
}
