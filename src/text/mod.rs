//! The document model: styled text, glyph layout and the caret.
//!
//! Storage is rope-backed [`TaggedText`]: every character carries an
//! optional tag naming a style interned in the [`StyleRegistry`]. Layout is
//! derived per paragraph into a [`GlyphBuffer`] and only the paragraphs an
//! edit touched are shaped again.
//!
//! Key types:
//!
//! - [`TextDocument`]: editing, layout queries, input handling and painting
//! - [`TaggedText`]: characters plus their style tags
//! - [`StyleRegistry`]: reference-counted style interning
//! - [`GlyphBuffer`]: per-paragraph glyphs and line boxes
//! - [`Cursor`]: caret position, preferred column and blink state
//!
//! # Examples
//!
//! ```
//! use neotext::{DocumentOptions, MonospaceMetrics, TextDocument};
//!
//! let mut doc = TextDocument::with_options(
//!     MonospaceMetrics::new(),
//!     DocumentOptions::default().with_wrap_width(64.0),
//! );
//! doc.set_text("hello world").unwrap();
//!
//! // Eight 8px columns fit per line, so the second word wraps.
//! assert_eq!(doc.paragraph_count(), 1);
//! assert_eq!(doc.line_count(), 2);
//! ```

mod cursor;
mod document;
mod frame;
mod glyph;
mod keys;
mod layout;
mod navigation;
mod options;
mod paint;
mod registry;
mod rope;
mod tagged;

pub use cursor::{Cursor, CursorBlink, CursorMove, CursorPhase};
pub use document::TextDocument;
pub use glyph::{Glyph, GlyphBuffer, GlyphKind, ParagraphGlyphs, ParagraphLayout, WrapKey};
pub use layout::{
    Alignment, LineBox, LinePlacement, ShapeContext, WrapMode, break_lines, extents,
    shape_paragraph, word_break,
};
pub use options::DocumentOptions;
pub use paint::{DisplayList, DrawCommand, DrawSurface, PositionedGlyph};
pub use registry::{StyleId, StyleRegistry};
pub use rope::RopeWrapper;
pub use tagged::{ParagraphSpan, Tag, TagRun, TaggedText};
