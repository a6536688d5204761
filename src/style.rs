//! Text styles: font plus text and background fills.
//!
//! - [`Style`]: immutable value object stored in the
//!   [`StyleRegistry`](crate::text::StyleRegistry)
//! - [`StyleBuilder`]: fluent builder for constructing styles
//!
//! # Examples
//!
//! ```
//! use neotext::{Font, Gradient, Rgba, Style};
//!
//! let heading = Style::builder()
//!     .font(Font::new("serif", 24.0).bold())
//!     .text_color(Rgba::WHITE)
//!     .background(Gradient::new(Rgba::BLUE, Rgba::BLACK))
//!     .build();
//!
//! // Unset fields fall back to the document default when merged.
//! let body = Style::text(Rgba::BLACK).merge(&heading);
//! assert_eq!(body.font(), heading.font());
//! ```

use crate::color::{ColorFill, Rgba};
use crate::font::Font;

/// A text style.
///
/// `None` fields inherit: a missing font or text fill comes from the
/// document's default style, a missing background is transparent.
///
/// Styles are totally ordered over (font, text fill, background fill) with
/// `None` before `Some`, so equal styles deduplicate in ordered containers.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Style {
    font: Option<Font>,
    text_color: Option<ColorFill>,
    background: Option<ColorFill>,
}

impl Style {
    /// Style with no font or fills; inherits everything.
    pub const NONE: Self = Self {
        font: None,
        text_color: None,
        background: None,
    };

    #[must_use]
    pub fn new(
        font: Option<Font>,
        text_color: Option<ColorFill>,
        background: Option<ColorFill>,
    ) -> Self {
        Self {
            font,
            text_color,
            background,
        }
    }

    /// Create a new style builder.
    #[must_use]
    pub fn builder() -> StyleBuilder {
        StyleBuilder::default()
    }

    /// Create a style with only a font.
    #[must_use]
    pub fn font_only(font: Font) -> Self {
        Self {
            font: Some(font),
            ..Self::NONE
        }
    }

    /// Create a style with only a text fill.
    #[must_use]
    pub fn text(fill: impl Into<ColorFill>) -> Self {
        Self {
            text_color: Some(fill.into()),
            ..Self::NONE
        }
    }

    /// Create a style with only a background fill.
    #[must_use]
    pub fn background_only(fill: impl Into<ColorFill>) -> Self {
        Self {
            background: Some(fill.into()),
            ..Self::NONE
        }
    }

    #[must_use]
    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    #[must_use]
    pub fn text_color(&self) -> Option<&ColorFill> {
        self.text_color.as_ref()
    }

    #[must_use]
    pub fn background(&self) -> Option<&ColorFill> {
        self.background.as_ref()
    }

    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, fill: impl Into<ColorFill>) -> Self {
        self.text_color = Some(fill.into());
        self
    }

    #[must_use]
    pub fn with_background(mut self, fill: impl Into<ColorFill>) -> Self {
        self.background = Some(fill.into());
        self
    }

    /// Check if this style sets nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.font.is_none() && self.text_color.is_none() && self.background.is_none()
    }

    /// Merge two styles, with `other` taking precedence for set values.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            font: other.font.clone().or_else(|| self.font.clone()),
            text_color: other.text_color.clone().or_else(|| self.text_color.clone()),
            background: other.background.clone().or_else(|| self.background.clone()),
        }
    }

    /// Font to lay out with: this style's font or the built-in default.
    #[must_use]
    pub fn font_or_default(&self) -> Font {
        self.font.clone().unwrap_or_default()
    }

    /// Solid text colour, falling back to `fallback` when unset.
    #[must_use]
    pub fn text_color_or(&self, fallback: Rgba) -> Rgba {
        self.text_color.as_ref().map_or(fallback, ColorFill::primary)
    }
}

/// Builder for creating styles fluently.
#[derive(Clone, Debug, Default)]
pub struct StyleBuilder {
    style: Style,
}

impl StyleBuilder {
    /// Set the font.
    #[must_use]
    pub fn font(mut self, font: Font) -> Self {
        self.style.font = Some(font);
        self
    }

    /// Set the text fill.
    #[must_use]
    pub fn text_color(mut self, fill: impl Into<ColorFill>) -> Self {
        self.style.text_color = Some(fill.into());
        self
    }

    /// Set the background fill.
    #[must_use]
    pub fn background(mut self, fill: impl Into<ColorFill>) -> Self {
        self.style.background = Some(fill.into());
        self
    }

    /// Build the final style.
    #[must_use]
    pub fn build(self) -> Style {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Gradient;
    use std::collections::BTreeSet;

    #[test]
    fn test_style_builder() {
        let style = Style::builder()
            .font(Font::new("mono", 12.0))
            .text_color(Rgba::RED)
            .background(Rgba::BLACK)
            .build();

        assert_eq!(style.font(), Some(&Font::new("mono", 12.0)));
        assert_eq!(style.text_color(), Some(&ColorFill::Solid(Rgba::RED)));
        assert_eq!(style.background(), Some(&ColorFill::Solid(Rgba::BLACK)));
        assert!(!style.is_empty());
        assert!(Style::NONE.is_empty());
    }

    #[test]
    fn test_style_merge() {
        let base = Style::font_only(Font::new("mono", 12.0)).with_text_color(Rgba::RED);
        let overlay = Style::background_only(Rgba::BLUE).with_text_color(Rgba::GREEN);

        let merged = base.merge(&overlay);

        assert_eq!(merged.font(), base.font());
        assert_eq!(merged.text_color(), Some(&ColorFill::Solid(Rgba::GREEN)));
        assert_eq!(merged.background(), Some(&ColorFill::Solid(Rgba::BLUE)));
    }

    #[test]
    fn test_equal_styles_deduplicate_in_ordered_set() {
        let mut set = BTreeSet::new();
        set.insert(Style::text(Rgba::RED));
        set.insert(Style::text(Rgba::RED));
        set.insert(Style::text(Gradient::new(Rgba::RED, Rgba::BLUE)));
        set.insert(Style::text(Gradient::new(Rgba::RED, Rgba::BLUE)));
        set.insert(Style::NONE);
        assert_eq!(set.len(), 3);
        // `None` fields order first.
        assert_eq!(set.iter().next(), Some(&Style::NONE));
    }

    #[test]
    fn test_text_color_fallback() {
        assert_eq!(Style::NONE.text_color_or(Rgba::WHITE), Rgba::WHITE);
        let gradient = Style::text(Gradient::new(Rgba::GREEN, Rgba::BLUE));
        assert_eq!(gradient.text_color_or(Rgba::WHITE), Rgba::GREEN);
    }
}
