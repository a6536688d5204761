//! `neotext` - styled rich-text document core
//!
//! A rope-backed text document whose characters carry interned styles,
//! with paragraph-scoped glyph layout, word and character wrapping,
//! alignment, hit-testing, caret movement and a paint pass onto any
//! [`DrawSurface`].

// Crate-level lint configuration
#![allow(dead_code)] // Public API functions not yet used internally
#![allow(clippy::cast_possible_truncation)] // Intentional coordinate casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for layout math
#![allow(clippy::module_name_repetitions)] // Allow text::TextDocument etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::float_cmp)] // Layout tests compare exact pixel positions
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear
#![allow(clippy::unused_self)] // Input handlers keep a uniform &mut self shape

pub mod color;
pub mod error;
pub mod font;
pub mod geometry;
pub mod input;
pub mod log;
pub mod style;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use color::{ColorFill, Gradient, GradientDirection, GradientStop, Rgba};
pub use error::{Error, Result};
pub use font::{Font, FontMetrics, FontStyle, MonospaceMetrics, ShapedGlyph};
pub use geometry::{Point, Rect, Size};
pub use log::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use style::{Style, StyleBuilder};

// Re-export input types
pub use input::{Event, KeyCode, KeyEvent, KeyModifiers};

// Re-export the document model
pub use text::{
    Alignment, CursorMove, DisplayList, DocumentOptions, DrawCommand, DrawSurface,
    PositionedGlyph, StyleId, StyleRegistry, Tag, TaggedText, TextDocument, WrapMode,
};
pub use unicode::WidthMethod;
