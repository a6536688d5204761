//! Painting a laid-out document onto a drawing surface.
//!
//! The document emits, line by line and style run by style run, an optional
//! background rectangle and then the run's glyphs at the line baseline. The
//! caret rectangle comes last, when visible. [`DisplayList`] records the
//! calls for hosts that replay them later (and for tests).

use crate::color::{ColorFill, Rgba};
use crate::font::Font;
use crate::geometry::{Point, Rect};
use crate::style::Style;
use crate::text::document::TextDocument;
use crate::text::registry::StyleId;

/// A glyph to draw, positioned relative to the run origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    pub id: u32,
    /// Offset from the run origin along the baseline.
    pub x: f32,
}

/// Rendering backend the document paints onto.
pub trait DrawSurface {
    /// Fill a rectangle (style backgrounds).
    fn fill_rect(&mut self, rect: Rect, fill: &ColorFill);

    /// Draw glyphs of one style run; `origin` is the run start on the
    /// baseline.
    fn draw_glyphs(&mut self, origin: Point, glyphs: &[PositionedGlyph], font: &Font, fill: &ColorFill);

    /// Draw the caret.
    fn draw_caret(&mut self, rect: Rect, color: Rgba);
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        fill: ColorFill,
    },
    Glyphs {
        origin: Point,
        glyphs: Vec<PositionedGlyph>,
        font: Font,
        fill: ColorFill,
    },
    Caret {
        rect: Rect,
        color: Rgba,
    },
}

/// A [`DrawSurface`] that records every call.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl DrawSurface for DisplayList {
    fn fill_rect(&mut self, rect: Rect, fill: &ColorFill) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            fill: fill.clone(),
        });
    }

    fn draw_glyphs(&mut self, origin: Point, glyphs: &[PositionedGlyph], font: &Font, fill: &ColorFill) {
        self.commands.push(DrawCommand::Glyphs {
            origin,
            glyphs: glyphs.to_vec(),
            font: font.clone(),
            fill: fill.clone(),
        });
    }

    fn draw_caret(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Caret { rect, color });
    }
}

impl TextDocument {
    /// Paint every line, then the caret if it is in its visible phase.
    pub fn paint(&self, surface: &mut dyn DrawSurface) {
        let frame = self.frame();
        let fallback = ColorFill::Solid(self.options().fallback_text_color);

        for v in 0..frame.line_count() {
            let (Some(visual), Some((layout, line))) = (frame.visual(v), frame.line(v)) else {
                continue;
            };
            let placement = frame.placement(v);
            let glyphs = &layout.glyphs.glyphs;
            let baseline = visual.top + line.ascent;

            let xs = placement.positions(line, glyphs);
            let x_of = |k: usize| xs[k - line.glyphs.start];

            let mut idx = line.glyphs.start;
            while idx < line.glyphs.end {
                let style_id = glyphs[idx].style;
                let end = (idx + 1..line.glyphs.end)
                    .find(|&k| glyphs[k].style != style_id)
                    .unwrap_or(line.glyphs.end);
                let style = self.resolved_style(style_id);

                let run_x = x_of(idx);
                if let Some(background) = style.background() {
                    surface.fill_rect(
                        Rect::new(run_x, visual.top, x_of(end) - run_x, line.height),
                        background,
                    );
                }

                let positioned: Vec<PositionedGlyph> = (idx..end)
                    .filter(|&k| !glyphs[k].kind.is_whitespace())
                    .map(|k| PositionedGlyph {
                        id: glyphs[k].id,
                        x: x_of(k) - run_x,
                    })
                    .collect();
                if !positioned.is_empty() {
                    surface.draw_glyphs(
                        Point::new(run_x, baseline),
                        &positioned,
                        &style.font_or_default(),
                        style.text_color().unwrap_or(&fallback),
                    );
                }
                idx = end;
            }
        }

        if self.cursor().is_visible() {
            let offset = self.cursor_position().min(self.len_chars());
            let v = frame.line_of_offset(offset);
            if let (Some(visual), Some((_, line))) = (frame.visual(v), frame.line(v)) {
                surface.draw_caret(
                    Rect::new(
                        frame.x_of_offset(v, offset),
                        visual.top,
                        self.options().caret_width,
                        line.height,
                    ),
                    self.default_text_color(),
                );
            }
        }
    }

    fn resolved_style(&self, id: Option<StyleId>) -> Style {
        match id.and_then(|id| self.styles().get(id)) {
            Some(style) => self.default_style().merge(style),
            None => self.default_style().clone(),
        }
    }
}
