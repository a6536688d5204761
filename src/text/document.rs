//! The text-edit core: tagged text, lazily derived layout and a caret.
//!
//! [`TextDocument`] owns the [`TaggedText`] and a [`GlyphBuffer`] derived
//! from it. Every mutation invalidates exactly the paragraphs it touched;
//! layout queries take `&self` and re-derive stale paragraphs on demand, so
//! several edits between two reads cost one layout pass.
//!
//! # Examples
//!
//! ```
//! use neotext::{MonospaceMetrics, Point, Rgba, Style, TextDocument};
//!
//! let mut doc = TextDocument::new(MonospaceMetrics::new());
//! doc.insert_text("hello world").unwrap();
//! doc.apply_style(0..5, Some(&Style::text(Rgba::RED))).unwrap();
//!
//! assert_eq!(doc.word_break(0, 3).unwrap(), (0, 5));
//! let caret = doc.position(6).unwrap();
//! assert_eq!(doc.hit_test(caret), 6);
//! assert_eq!(doc.hit_test(Point::new(-10.0, -10.0)), 0);
//! ```

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::font::{Font, FontMetrics};
use crate::geometry::{Point, Size};
use crate::log::{LogLevel, emit_log_with};
use crate::style::Style;
use crate::text::cursor::Cursor;
use crate::text::frame::{Frame, LineIndex};
use crate::text::glyph::{Glyph, GlyphBuffer, ParagraphLayout, WrapKey};
use crate::text::layout::{self, Alignment, LineBox, ShapeContext, WrapMode, break_lines, shape_paragraph};
use crate::text::options::DocumentOptions;
use crate::text::registry::StyleRegistry;
use crate::text::tagged::{ParagraphSpan, TaggedText};
use std::cell::{Cell, Ref, RefCell};
use std::ops::Range;
use std::time::Instant;

/// A styled, editable, laid-out text document with a caret.
pub struct TextDocument {
    metrics: Box<dyn FontMetrics>,
    text: TaggedText,
    glyphs: RefCell<GlyphBuffer>,
    layout_current: Cell<bool>,
    lines: RefCell<LineIndex>,
    lines_current: Cell<bool>,
    options: DocumentOptions,
    pub(crate) cursor: Cursor,
}

impl std::fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextDocument")
            .field("len_chars", &self.text.len_chars())
            .field("paragraphs", &self.text.paragraph_count())
            .field("cursor", &self.cursor.position())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TextDocument {
    /// Empty document with default options.
    #[must_use]
    pub fn new(metrics: impl FontMetrics + 'static) -> Self {
        Self::with_options(metrics, DocumentOptions::default())
    }

    #[must_use]
    pub fn with_options(metrics: impl FontMetrics + 'static, options: DocumentOptions) -> Self {
        let text = TaggedText::new();
        let paragraphs = text.paragraph_count();
        Self {
            metrics: Box::new(metrics),
            glyphs: RefCell::new(GlyphBuffer::with_paragraphs(paragraphs)),
            layout_current: Cell::new(false),
            lines: RefCell::new(LineIndex::default()),
            lines_current: Cell::new(false),
            cursor: Cursor::new(options.blink_interval),
            text,
            options,
        }
    }

    // ----- text -----

    /// Whole text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.text()
    }

    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text of a char range.
    pub fn slice(&self, range: Range<usize>) -> Result<String> {
        self.text.slice(range)
    }

    /// Replace the whole text with untagged `text`. The caret moves to the
    /// end.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.replace_all(text, None)
    }

    /// Replace the whole text with `text` tagged `style`.
    pub fn set_styled_text(&mut self, text: &str, style: &Style) -> Result<()> {
        self.replace_all(text, Some(style))
    }

    /// Insert at the caret, inheriting the preceding character's style.
    /// Returns the new caret position, just past the insertion.
    pub fn insert_text(&mut self, text: &str) -> Result<usize> {
        let at = self.cursor.position();
        let span = self.text.insert(at, text)?;
        self.after_insert(span, at, text)
    }

    /// Insert at the caret tagged with `style`.
    pub fn insert_styled_text(&mut self, text: &str, style: &Style) -> Result<usize> {
        let at = self.cursor.position();
        let span = self.text.insert_styled(at, text, style)?;
        self.after_insert(span, at, text)
    }

    /// Insert at `pos`; `None` inherits the preceding character's style.
    /// A caret at or after `pos` shifts with the text.
    pub fn insert_at(&mut self, pos: usize, text: &str, style: Option<&Style>) -> Result<()> {
        let span = match style {
            Some(style) => self.text.insert_styled(pos, text, style)?,
            None => self.text.insert(pos, text)?,
        };
        self.invalidate(span);
        self.cursor.on_insert(pos, text.chars().count());
        Ok(())
    }

    /// Remove a char range.
    pub fn erase(&mut self, range: Range<usize>) -> Result<()> {
        let span = self.text.erase(range.clone())?;
        self.invalidate(span);
        self.cursor.on_erase(range);
        Ok(())
    }

    /// Restyle a char range; `None` resets it to the default style.
    pub fn apply_style(&mut self, range: Range<usize>, style: Option<&Style>) -> Result<()> {
        let span = self.text.set_style(range, style)?;
        self.invalidate(span);
        Ok(())
    }

    fn replace_all(&mut self, text: &str, style: Option<&Style>) -> Result<()> {
        self.text.replace(text, style)?;
        self.invalidate_all("text replaced");
        self.cursor.move_to(self.text.len_chars());
        Ok(())
    }

    fn after_insert(&mut self, span: ParagraphSpan, at: usize, text: &str) -> Result<usize> {
        self.invalidate(span);
        let end = at + text.chars().count();
        self.cursor.move_to(end);
        Ok(end)
    }

    // ----- settings -----

    #[must_use]
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.options.alignment
    }

    /// Alignment is applied at query time; no re-layout.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.options.alignment = alignment;
    }

    #[must_use]
    pub fn default_style(&self) -> &Style {
        &self.options.default_style
    }

    /// Replace the default style and re-derive every paragraph.
    pub fn set_default_style(&mut self, style: Style) {
        if self.options.default_style == style {
            return;
        }
        self.options.default_style = style;
        self.invalidate_all("default style changed");
    }

    /// Solid text colour of untagged characters.
    #[must_use]
    pub fn default_text_color(&self) -> Rgba {
        self.options
            .default_style
            .text_color_or(self.options.fallback_text_color)
    }

    #[must_use]
    pub fn wrap_mode(&self) -> WrapMode {
        self.options.wrap_mode
    }

    /// Change the wrap mode; paragraphs keep their glyphs and only re-break.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.options.wrap_mode = mode;
        self.layout_current.set(false);
    }

    #[must_use]
    pub fn wrap_width(&self) -> Option<f32> {
        self.options.wrap_width
    }

    /// Change the available width; `None` disables wrapping.
    pub fn set_wrap_width(&mut self, width: Option<f32>) {
        self.options.wrap_width = width;
        self.layout_current.set(false);
    }

    #[must_use]
    pub fn tab_width(&self) -> u8 {
        self.options.tab_width
    }

    /// Tab advance in space widths, at least one.
    pub fn set_tab_width(&mut self, width: u8) {
        let width = width.max(1);
        if self.options.tab_width != width {
            self.options.tab_width = width;
            self.invalidate_all("tab width changed");
        }
    }

    // ----- introspection -----

    #[must_use]
    pub fn styles(&self) -> &StyleRegistry {
        self.text.styles()
    }

    #[must_use]
    pub fn tagged(&self) -> &TaggedText {
        &self.text
    }

    /// Style of the character at `offset`, resolved over the default style.
    pub fn style_at(&self, offset: usize) -> Result<Style> {
        Ok(match self.text.style_at(offset)? {
            Some(style) => self.options.default_style.merge(style),
            None => self.options.default_style.clone(),
        })
    }

    #[must_use]
    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }

    #[must_use]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor.position()
    }

    /// Place the caret.
    pub fn set_cursor_position(&mut self, pos: usize) -> Result<()> {
        let len = self.text.len_chars();
        if pos > len {
            return Err(Error::OutOfRange { position: pos, len });
        }
        self.cursor.move_to(pos);
        Ok(())
    }

    // ----- focus & animation -----

    /// Start blinking the caret.
    pub fn focus_gained(&mut self, now: Instant) {
        self.cursor.blink_mut().focus_gained(now);
    }

    /// Hide the caret and stop blinking.
    pub fn focus_lost(&mut self) {
        self.cursor.blink_mut().focus_lost();
    }

    /// Advance the blink timer; `true` when the caret needs repainting.
    pub fn animate(&mut self, now: Instant) -> bool {
        self.cursor.blink_mut().tick(now)
    }

    // ----- layout -----

    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.text.paragraph_count()
    }

    /// Re-derive the glyphs and lines of the paragraph containing `offset`.
    /// Returns the paragraph index.
    pub fn refresh_paragraph(&mut self, offset: usize) -> Result<usize> {
        self.check_offset(offset)?;
        self.ensure_layout();
        let idx = self.text.paragraph_at(offset);
        let layout = self.derive_paragraph(idx, self.wrap_key());
        self.glyphs.get_mut().store(idx, layout);
        self.lines_current.set(false);
        emit_log_with(LogLevel::Debug, || format!("refreshed paragraph {idx}"));
        Ok(idx)
    }

    /// Glyphs of paragraph `idx`.
    #[must_use]
    pub fn paragraph_glyphs(&self, idx: usize) -> Option<Ref<'_, [Glyph]>> {
        Ref::filter_map(self.layout(), |buffer| {
            buffer.get(idx).map(|layout| layout.glyphs.glyphs.as_slice())
        })
        .ok()
    }

    /// Line boxes of paragraph `idx`.
    #[must_use]
    pub fn paragraph_lines(&self, idx: usize) -> Option<Ref<'_, [LineBox]>> {
        Ref::filter_map(self.layout(), |buffer| {
            buffer.get(idx).map(|layout| layout.lines.as_slice())
        })
        .ok()
    }

    /// Number of visual lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.frame().line_count()
    }

    /// Advance of the glyphs whose clusters start inside `range`, with the
    /// line height of `font`.
    pub fn extents(&self, font: &Font, range: Range<usize>) -> Result<Size> {
        self.check_range(&range)?;
        let buffer = self.layout();
        let first = self.text.paragraph_at(range.start);
        let last = self.text.paragraph_at(range.end);

        let mut selected = Vec::new();
        for idx in first..=last {
            let Some(layout) = buffer.get(idx) else {
                continue;
            };
            let start = self.text.paragraph_range(idx).start;
            let mut cluster_start = 0;
            for glyph in &layout.glyphs.glyphs {
                if !glyph.is_continuation() {
                    cluster_start = start + glyph.chars.start;
                }
                if range.contains(&cluster_start) {
                    selected.push(glyph);
                }
            }
        }
        Ok(layout::extents(self.metrics.as_ref(), font, selected))
    }

    /// Maximal same-class run (word, punctuation or whitespace) containing
    /// the character at `from`, starting no earlier than `begin`. An offset
    /// with no glyph (a paragraph end) yields the empty run `(from, from)`.
    pub fn word_break(&self, begin: usize, from: usize) -> Result<(usize, usize)> {
        self.check_offset(begin)?;
        self.check_offset(from)?;
        let buffer = self.layout();
        let idx = self.text.paragraph_at(from);
        let start = self.text.paragraph_range(idx).start;
        let Some(layout) = buffer.get(idx) else {
            return Ok((from, from));
        };
        let para = &layout.glyphs;
        let Some(glyph) = para.glyph_at_char(from - start) else {
            return Ok((from, from));
        };
        let begin_glyph = if begin <= start {
            0
        } else {
            para.glyph_at_char(begin - start).unwrap_or(para.glyphs.len())
        };

        let (s, e) = layout::word_break(&para.glyphs, begin_glyph, glyph);
        let run_start = start + para.glyphs[s].chars.start;
        let run_end = start + para.glyphs.get(e).map_or(para.char_len, |g| g.chars.start);
        Ok((run_start.max(begin.min(from)), run_end))
    }

    /// Size needed to show every line: widest visible line by total height.
    ///
    /// `available` re-breaks against its width without touching the cached
    /// lines; `None` uses the document's wrap width.
    #[must_use]
    pub fn minimum_size(&self, available: Option<Size>) -> Size {
        let Some(available) = available else {
            let frame = self.frame();
            return Size::new(frame.widest(), frame.height());
        };
        let key = WrapKey {
            mode: self.options.wrap_mode,
            width: Some(available.width),
        };
        let buffer = self.layout();
        let mut size = Size::default();
        for (_, layout) in buffer.iter() {
            let rebroken;
            let lines = if layout.wrap == key {
                &layout.lines
            } else {
                rebroken = break_lines(&layout.glyphs, key);
                &rebroken
            };
            for line in lines {
                size.width = size.width.max(line.width);
                size.height += line.height;
            }
        }
        size
    }

    /// Top-left of the caret at `offset`, alignment included. A soft-wrap
    /// boundary maps to the start of the following line.
    pub fn position(&self, offset: usize) -> Result<Point> {
        self.check_offset(offset)?;
        let frame = self.frame();
        let v = frame.line_of_offset(offset);
        let top = frame.visual(v).map_or(0.0, |line| line.top);
        Ok(Point::new(frame.x_of_offset(v, offset), top))
    }

    /// Character offset nearest to `point`. Points above or below the text
    /// clamp to the first or last line.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> usize {
        let frame = self.frame();
        let v = frame.line_at_y(point.y);
        frame.offset_at_x(v, point.x)
    }

    // ----- internals -----

    pub(crate) fn frame(&self) -> Frame<'_> {
        self.ensure_layout();
        if !self.lines_current.get() {
            let index = LineIndex::build(&self.glyphs.borrow(), &self.text);
            *self.lines.borrow_mut() = index;
            self.lines_current.set(true);
        }
        Frame::new(
            self.glyphs.borrow(),
            self.lines.borrow(),
            self.options.alignment,
            self.options.wrap_mode,
            self.options.wrap_width,
        )
    }

    /// The glyph buffer with every paragraph laid out.
    fn layout(&self) -> Ref<'_, GlyphBuffer> {
        self.ensure_layout();
        self.glyphs.borrow()
    }

    fn ensure_layout(&self) {
        if self.layout_current.get() {
            return;
        }
        let key = self.wrap_key();
        let count = self.text.paragraph_count();
        let mut buffer = self.glyphs.borrow_mut();
        if buffer.len() != count {
            emit_log_with(LogLevel::Warn, || {
                format!(
                    "glyph buffer holds {} paragraphs, text has {count}; rebuilding",
                    buffer.len()
                )
            });
            buffer.invalidate_all(count);
        }

        let mut derived = 0usize;
        let mut rebroken = 0usize;
        for idx in 0..count {
            if buffer.get(idx).is_none() {
                buffer.store(idx, self.derive_paragraph(idx, key));
                derived += 1;
            } else if let Some(layout) = buffer.get_mut(idx) {
                if layout.wrap != key {
                    layout.lines = break_lines(&layout.glyphs, key);
                    layout.wrap = key;
                    rebroken += 1;
                }
            }
        }
        if derived + rebroken > 0 {
            self.lines_current.set(false);
            emit_log_with(LogLevel::Debug, || {
                format!("layout: {derived} paragraphs shaped, {rebroken} re-broken")
            });
        }
        self.layout_current.set(true);
    }

    fn derive_paragraph(&self, idx: usize, key: WrapKey) -> ParagraphLayout {
        let range = self.text.paragraph_range(idx);
        let content = self.text.rope().slice(range.clone()).to_string();
        let runs: Vec<_> = self
            .text
            .runs_in(range.clone())
            .unwrap_or_else(|_| vec![(range.clone(), None)])
            .into_iter()
            .map(|(run, tag)| (run.start - range.start..run.end - range.start, tag))
            .collect();

        let ctx = ShapeContext {
            metrics: self.metrics.as_ref(),
            styles: self.text.styles(),
            default_style: &self.options.default_style,
            tab_width: self.options.tab_width,
        };
        let glyphs = shape_paragraph(&ctx, &content, &runs);
        let lines = break_lines(&glyphs, key);
        ParagraphLayout {
            glyphs,
            lines,
            wrap: key,
        }
    }

    fn wrap_key(&self) -> WrapKey {
        WrapKey {
            mode: self.options.wrap_mode,
            width: self.options.wrap_width,
        }
    }

    fn invalidate(&mut self, span: ParagraphSpan) {
        if span.is_empty() {
            return;
        }
        self.glyphs.get_mut().invalidate(span);
        self.layout_current.set(false);
    }

    fn invalidate_all(&mut self, reason: &str) {
        let count = self.text.paragraph_count();
        self.glyphs.get_mut().invalidate_all(count);
        self.layout_current.set(false);
        emit_log_with(LogLevel::Debug, || {
            format!("{reason}: invalidated {count} paragraphs")
        });
    }

    pub(crate) fn check_offset(&self, offset: usize) -> Result<()> {
        let len = self.text.len_chars();
        if offset > len {
            return Err(Error::OutOfRange {
                position: offset,
                len,
            });
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        self.check_offset(range.end)?;
        if range.start > range.end {
            return Err(Error::OutOfRange {
                position: range.start,
                len: self.text.len_chars(),
            });
        }
        Ok(())
    }
}
