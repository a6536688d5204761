//! Keyboard and text input events.
//!
//! Hosts translate their native events into [`Event`]s and hand them to
//! [`TextDocument::handle_event`](crate::text::TextDocument::handle_event), or
//! call the per-kind entry points directly.

mod event;
mod keyboard;

pub use event::Event;
pub use keyboard::{KeyCode, KeyEvent, KeyModifiers};
