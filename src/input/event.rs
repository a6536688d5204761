//! Input events delivered to a document.

use crate::input::keyboard::KeyEvent;

/// An input event from the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Key pressed.
    Key(KeyEvent),
    /// Key released.
    KeyRelease(KeyEvent),
    /// Committed text (typing, IME commit, paste).
    Text(String),
    /// The document gained keyboard focus.
    FocusGained,
    /// The document lost keyboard focus.
    FocusLost,
}

impl Event {
    /// Check if this is a key press.
    #[must_use]
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Get the pressed key if this is a key press.
    #[must_use]
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(e) => Some(e),
            _ => None,
        }
    }

    /// Get the committed text if this is a text event.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Event {
    fn from(e: KeyEvent) -> Self {
        Self::Key(e)
    }
}

impl From<&str> for Event {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}
