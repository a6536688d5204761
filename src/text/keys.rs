//! Keyboard and text input.
//!
//! Input handlers never return errors: a failed edit is logged at
//! [`LogLevel::Warn`] and reported as unhandled.

use crate::error::Result;
use crate::input::{Event, KeyCode, KeyEvent};
use crate::log::{LogLevel, emit_log_with};
use crate::text::cursor::CursorMove;
use crate::text::document::TextDocument;
use std::time::Instant;

impl TextDocument {
    /// Handle a key press. Returns `true` when the document consumed it.
    ///
    /// Arrows move by cluster and line (Ctrl: by word), Home/End go to the
    /// visual line ends (Ctrl: the document ends). Backspace and Delete
    /// remove one cluster or one paragraph break (Ctrl: one word). Enter
    /// and Tab insert `\n` and `\t`.
    pub fn key_pressed(&mut self, key: KeyEvent) -> bool {
        match self.apply_key(key) {
            Ok(handled) => handled,
            Err(err) => {
                emit_log_with(LogLevel::Warn, || format!("key {:?} failed: {err}", key.code));
                false
            }
        }
    }

    /// Handle a key release. Releases never edit; keys the document acts on
    /// are reported as consumed.
    pub fn key_released(&mut self, key: KeyEvent) -> bool {
        key.code.is_editing()
            || matches!(
                key.code,
                KeyCode::Left
                    | KeyCode::Right
                    | KeyCode::Up
                    | KeyCode::Down
                    | KeyCode::Home
                    | KeyCode::End
            )
    }

    /// Insert committed text at the caret.
    pub fn text_input(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.insert_text(text) {
            Ok(_) => true,
            Err(err) => {
                emit_log_with(LogLevel::Warn, || format!("text input failed: {err}"));
                false
            }
        }
    }

    /// Dispatch an input event. `now` starts the blink cycle on focus.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> bool {
        match event {
            Event::Key(key) => self.key_pressed(*key),
            Event::KeyRelease(key) => self.key_released(*key),
            Event::Text(text) => self.text_input(text),
            Event::FocusGained => {
                self.focus_gained(now);
                true
            }
            Event::FocusLost => {
                self.focus_lost();
                true
            }
        }
    }

    fn apply_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.ctrl();
        let movement = match key.code {
            KeyCode::Left if ctrl => Some(CursorMove::WordLeft),
            KeyCode::Left => Some(CursorMove::CharLeft),
            KeyCode::Right if ctrl => Some(CursorMove::WordRight),
            KeyCode::Right => Some(CursorMove::CharRight),
            KeyCode::Up => Some(CursorMove::LineUp),
            KeyCode::Down => Some(CursorMove::LineDown),
            KeyCode::Home if ctrl => Some(CursorMove::DocumentStart),
            KeyCode::Home => Some(CursorMove::LineStart),
            KeyCode::End if ctrl => Some(CursorMove::DocumentEnd),
            KeyCode::End => Some(CursorMove::LineEnd),
            _ => None,
        };
        if let Some(movement) = movement {
            self.move_cursor(movement);
            return Ok(true);
        }

        let pos = self.cursor_position();
        match key.code {
            KeyCode::Backspace => {
                let start = if ctrl {
                    self.word_left(pos)
                } else {
                    self.char_left(pos)
                };
                self.erase(start..pos)?;
            }
            KeyCode::Delete => {
                let end = if ctrl {
                    self.word_right(pos)
                } else {
                    self.char_right(pos)
                };
                self.erase(pos..end)?;
            }
            KeyCode::Enter => {
                self.insert_text("\n")?;
            }
            KeyCode::Tab => {
                self.insert_text("\t")?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
