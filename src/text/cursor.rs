//! Caret position, vertical-movement memory and blink state.

use std::ops::Range;
use std::time::{Duration, Instant};

/// Caret movement granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorMove {
    /// Previous grapheme cluster; a paragraph break is one step.
    CharLeft,
    /// Next grapheme cluster; a paragraph break is one step.
    CharRight,
    /// Start of the current or previous word.
    WordLeft,
    /// Start of the next word.
    WordRight,
    /// Visual line above, keeping the preferred x.
    LineUp,
    /// Visual line below, keeping the preferred x.
    LineDown,
    /// Start of the visual line.
    LineStart,
    /// End of the visual line.
    LineEnd,
    ParagraphStart,
    ParagraphEnd,
    DocumentStart,
    DocumentEnd,
}

impl CursorMove {
    /// Whether the move is vertical and keeps the preferred x.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::LineUp | Self::LineDown)
    }
}

/// Blink phase of the caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorPhase {
    Visible,
    #[default]
    Hidden,
}

/// Host-driven blink timer.
///
/// The caret blinks only while focused. Every caret move or edit restarts
/// the cycle in [`CursorPhase::Visible`].
#[derive(Clone, Debug)]
pub struct CursorBlink {
    interval: Duration,
    phase: CursorPhase,
    focused: bool,
    last_toggle: Option<Instant>,
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl CursorBlink {
    /// Default time between phase toggles.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            phase: CursorPhase::Hidden,
            focused: false,
            last_toggle: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    #[must_use]
    pub fn phase(&self) -> CursorPhase {
        self.phase
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == CursorPhase::Visible
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Start blinking, visible first.
    pub fn focus_gained(&mut self, now: Instant) {
        self.focused = true;
        self.phase = CursorPhase::Visible;
        self.last_toggle = Some(now);
    }

    /// Stop blinking and hide the caret.
    pub fn focus_lost(&mut self) {
        self.focused = false;
        self.phase = CursorPhase::Hidden;
        self.last_toggle = None;
    }

    /// Show the caret and restart the interval from the next tick.
    pub fn restart(&mut self) {
        if self.focused {
            self.phase = CursorPhase::Visible;
            self.last_toggle = None;
        }
    }

    /// Advance the timer. Returns `true` when the phase changed and the
    /// caret needs repainting.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.focused || self.interval.is_zero() {
            return false;
        }
        let Some(last) = self.last_toggle else {
            self.last_toggle = Some(now);
            return false;
        };
        if now.saturating_duration_since(last) < self.interval {
            return false;
        }
        self.phase = match self.phase {
            CursorPhase::Visible => CursorPhase::Hidden,
            CursorPhase::Hidden => CursorPhase::Visible,
        };
        self.last_toggle = Some(now);
        true
    }
}

/// Caret offset plus the x remembered across vertical moves.
#[derive(Clone, Debug, Default)]
pub struct Cursor {
    position: usize,
    preferred_x: Option<f32>,
    blink: CursorBlink,
}

impl Cursor {
    #[must_use]
    pub fn new(blink_interval: Duration) -> Self {
        Self {
            position: 0,
            preferred_x: None,
            blink: CursorBlink::new(blink_interval),
        }
    }

    /// Character offset in `[0, len]`.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn preferred_x(&self) -> Option<f32> {
        self.preferred_x
    }

    #[must_use]
    pub fn blink(&self) -> &CursorBlink {
        &self.blink
    }

    pub fn blink_mut(&mut self) -> &mut CursorBlink {
        &mut self.blink
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.blink.is_visible()
    }

    /// Move to `position`, forgetting the preferred x.
    pub fn move_to(&mut self, position: usize) {
        self.position = position;
        self.preferred_x = None;
        self.blink.restart();
    }

    /// Move vertically to `position`, remembering `x` for the next vertical
    /// move.
    pub fn move_vertically(&mut self, position: usize, x: f32) {
        self.position = position;
        self.preferred_x = Some(x);
        self.blink.restart();
    }

    /// Shift for `count` chars inserted at `at`.
    pub fn on_insert(&mut self, at: usize, count: usize) {
        if count > 0 && at <= self.position {
            self.position = self.position.saturating_add(count);
        }
        self.after_edit();
    }

    /// Shift or collapse for an erased range.
    pub fn on_erase(&mut self, range: Range<usize>) {
        if self.position >= range.end {
            self.position -= range.len();
        } else if self.position > range.start {
            self.position = range.start;
        }
        self.after_edit();
    }

    /// Keep the offset within a text of `len` chars.
    pub fn clamp(&mut self, len: usize) {
        if self.position > len {
            self.position = len;
            self.preferred_x = None;
        }
    }

    fn after_edit(&mut self) {
        self.preferred_x = None;
        self.blink.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn test_blink_requires_focus() {
        let mut blink = CursorBlink::new(INTERVAL);
        let t0 = Instant::now();
        assert!(!blink.is_visible());
        assert!(!blink.tick(t0 + INTERVAL * 3));
        assert_eq!(blink.phase(), CursorPhase::Hidden);
    }

    #[test]
    fn test_blink_toggles_per_interval() {
        let mut blink = CursorBlink::new(INTERVAL);
        let t0 = Instant::now();
        blink.focus_gained(t0);
        assert!(blink.is_visible());

        assert!(!blink.tick(t0 + Duration::from_millis(100)));
        assert!(blink.tick(t0 + INTERVAL));
        assert_eq!(blink.phase(), CursorPhase::Hidden);
        assert!(!blink.tick(t0 + INTERVAL + Duration::from_millis(10)));
        assert!(blink.tick(t0 + INTERVAL * 2));
        assert!(blink.is_visible());
    }

    #[test]
    fn test_focus_lost_hides() {
        let mut blink = CursorBlink::new(INTERVAL);
        let t0 = Instant::now();
        blink.focus_gained(t0);
        blink.focus_lost();
        assert!(!blink.is_visible());
        assert!(!blink.is_focused());
        assert!(!blink.tick(t0 + INTERVAL * 2));
    }

    #[test]
    fn test_restart_shows_caret() {
        let mut blink = CursorBlink::new(INTERVAL);
        let t0 = Instant::now();
        blink.focus_gained(t0);
        assert!(blink.tick(t0 + INTERVAL));
        assert!(!blink.is_visible());

        blink.restart();
        assert!(blink.is_visible());
        // The next tick only rearms the interval.
        assert!(!blink.tick(t0 + INTERVAL * 5));
        assert!(blink.is_visible());
    }

    #[test]
    fn test_restart_without_focus_stays_hidden() {
        let mut blink = CursorBlink::new(INTERVAL);
        blink.restart();
        assert!(!blink.is_visible());
    }

    #[test]
    fn test_cursor_shifts_on_edits() {
        let mut cursor = Cursor::new(INTERVAL);
        cursor.move_to(5);

        cursor.on_insert(2, 3);
        assert_eq!(cursor.position(), 8);
        cursor.on_insert(9, 3);
        assert_eq!(cursor.position(), 8);

        cursor.on_erase(0..2);
        assert_eq!(cursor.position(), 6);
        cursor.on_erase(4..10);
        assert_eq!(cursor.position(), 4);
        cursor.on_erase(4..6);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_vertical_moves_remember_x() {
        let mut cursor = Cursor::default();
        cursor.move_vertically(3, 24.0);
        assert_eq!(cursor.preferred_x(), Some(24.0));
        cursor.move_to(1);
        assert_eq!(cursor.preferred_x(), None);
    }

    #[test]
    fn test_clamp() {
        let mut cursor = Cursor::default();
        cursor.move_to(10);
        cursor.clamp(4);
        assert_eq!(cursor.position(), 4);
        cursor.clamp(8);
        assert_eq!(cursor.position(), 4);
    }
}
