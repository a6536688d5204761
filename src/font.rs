//! Font descriptors and the shaping service the layout engine consumes.
//!
//! The engine never rasterizes or loads fonts. It asks a [`FontMetrics`]
//! implementation to shape runs of text into glyph ids and advances, and to
//! report vertical metrics. [`MonospaceMetrics`] is a complete fixed-width
//! implementation driven by Unicode column widths, suitable for tests and
//! for terminal-like hosts.

use crate::unicode::{CharClass, WidthMethod, clusters, display_width_with_method};
use bitflags::bitflags;
use std::cmp::Ordering;

bitflags! {
    /// Font style flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FontStyle: u8 {
        const BOLD          = 0x01;
        const ITALIC        = 0x02;
        const UNDERLINE     = 0x04;
        const STRIKETHROUGH = 0x08;
    }
}

/// A font request: family, point size and style.
///
/// Fonts are totally ordered by family, then size (`f32::total_cmp`), then
/// style bits.
#[derive(Clone, Debug)]
pub struct Font {
    family: String,
    size: f32,
    style: FontStyle,
}

impl Font {
    /// Default point size used by [`Font::default`].
    pub const DEFAULT_SIZE: f32 = 16.0;

    #[must_use]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            style: FontStyle::empty(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        let style = self.style | FontStyle::BOLD;
        self.with_style(style)
    }

    #[must_use]
    pub fn italic(self) -> Self {
        let style = self.style | FontStyle::ITALIC;
        self.with_style(style)
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub fn style(&self) -> FontStyle {
        self.style
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("monospace", Self::DEFAULT_SIZE)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Font {}

impl PartialOrd for Font {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Font {
    fn cmp(&self, other: &Self) -> Ordering {
        self.family
            .cmp(&other.family)
            .then_with(|| self.size.total_cmp(&other.size))
            .then_with(|| self.style.cmp(&other.style))
    }
}

/// One glyph produced by shaping a run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Font-specific glyph identifier.
    pub glyph_id: u32,
    /// Byte offset, in the shaped run, of the first byte of the cluster this
    /// glyph belongs to. Clusters are non-decreasing across a run.
    pub cluster: usize,
    /// Horizontal advance in pixels.
    pub advance: f32,
}

/// Font metrics and shaping service.
///
/// Implementations must be deterministic: shaping the same run with the same
/// font yields the same glyphs.
pub trait FontMetrics {
    /// Shape `text` (never containing paragraph breaks) with `font`.
    fn shape(&self, font: &Font, text: &str) -> Vec<ShapedGlyph>;

    /// Distance between consecutive baselines.
    fn line_height(&self, font: &Font) -> f32;

    /// Distance from the top of a line to its baseline.
    fn ascent(&self, font: &Font) -> f32;

    /// Advance of a space, used to size tab stops.
    fn space_advance(&self, font: &Font) -> f32 {
        self.shape(font, " ").first().map_or(0.0, |g| g.advance)
    }
}

/// Fixed-width metrics: every column is `size * column_ratio` wide.
///
/// Shapes one glyph per extended grapheme cluster; the glyph id is the
/// cluster's first code point and the advance is its column width (wide CJK
/// takes two columns, combining marks and controls none).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
    column_ratio: f32,
    line_height_ratio: f32,
    ascent_ratio: f32,
    width_method: WidthMethod,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            column_ratio: 0.5,
            line_height_ratio: 1.25,
            ascent_ratio: 1.0,
            width_method: WidthMethod::WcWidth,
        }
    }
}

impl MonospaceMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Column width as a fraction of the point size.
    #[must_use]
    pub fn with_column_ratio(mut self, ratio: f32) -> Self {
        self.column_ratio = ratio;
        self
    }

    /// Line height as a fraction of the point size.
    #[must_use]
    pub fn with_line_height_ratio(mut self, ratio: f32) -> Self {
        self.line_height_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_width_method(mut self, method: WidthMethod) -> Self {
        self.width_method = method;
        self
    }

    /// Width of one column for `font`.
    #[must_use]
    pub fn column_width(&self, font: &Font) -> f32 {
        font.size() * self.column_ratio
    }
}

impl FontMetrics for MonospaceMetrics {
    fn shape(&self, font: &Font, text: &str) -> Vec<ShapedGlyph> {
        let column = self.column_width(font);
        clusters(text)
            .map(|cluster| {
                let columns = match CharClass::of_str(cluster.text) {
                    CharClass::Whitespace if cluster.text != "\t" => 1,
                    _ => display_width_with_method(cluster.text, self.width_method),
                };
                ShapedGlyph {
                    glyph_id: cluster.text.chars().next().map_or(0, u32::from),
                    cluster: cluster.byte_offset,
                    advance: columns as f32 * column,
                }
            })
            .collect()
    }

    fn line_height(&self, font: &Font) -> f32 {
        font.size() * self.line_height_ratio
    }

    fn ascent(&self, font: &Font) -> f32 {
        font.size() * self.ascent_ratio
    }
}
