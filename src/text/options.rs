//! Document configuration.

use crate::color::Rgba;
use crate::style::Style;
use crate::text::cursor::CursorBlink;
use crate::text::layout::{Alignment, WrapMode};
use std::time::Duration;

/// Options for [`TextDocument`](crate::text::TextDocument).
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentOptions {
    /// Style every character starts from; tags override its fields.
    pub default_style: Style,
    /// Text colour when neither a tag nor the default style sets one.
    pub fallback_text_color: Rgba,
    pub alignment: Alignment,
    pub wrap_mode: WrapMode,
    /// Available line width in pixels; `None` disables wrapping.
    pub wrap_width: Option<f32>,
    /// Tab advance in space widths.
    pub tab_width: u8,
    /// Caret rectangle width in pixels.
    pub caret_width: f32,
    pub blink_interval: Duration,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            default_style: Style::NONE,
            fallback_text_color: Rgba::BLACK,
            alignment: Alignment::Left,
            wrap_mode: WrapMode::Word,
            wrap_width: None,
            tab_width: 4,
            caret_width: 1.0,
            blink_interval: CursorBlink::DEFAULT_INTERVAL,
        }
    }
}

impl DocumentOptions {
    #[must_use]
    pub fn with_default_style(mut self, style: Style) -> Self {
        self.default_style = style;
        self
    }

    #[must_use]
    pub fn with_fallback_text_color(mut self, color: Rgba) -> Self {
        self.fallback_text_color = color;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_mode = mode;
        self
    }

    #[must_use]
    pub fn with_wrap_width(mut self, width: f32) -> Self {
        self.wrap_width = Some(width);
        self
    }

    /// Tab width in spaces; clamped to at least one.
    #[must_use]
    pub fn with_tab_width(mut self, width: u8) -> Self {
        self.tab_width = width.max(1);
        self
    }

    #[must_use]
    pub fn with_caret_width(mut self, width: f32) -> Self {
        self.caret_width = width;
        self
    }

    #[must_use]
    pub fn with_blink_interval(mut self, interval: Duration) -> Self {
        self.blink_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.wrap_mode, WrapMode::Word);
        assert_eq!(options.wrap_width, None);
        assert_eq!(options.tab_width, 4);
        assert_eq!(options.fallback_text_color, Rgba::BLACK);
    }

    #[test]
    fn test_builder() {
        let options = DocumentOptions::default()
            .with_alignment(Alignment::Center)
            .with_wrap_width(120.0)
            .with_tab_width(0);
        assert_eq!(options.alignment, Alignment::Center);
        assert_eq!(options.wrap_width, Some(120.0));
        assert_eq!(options.tab_width, 1);
    }
}
