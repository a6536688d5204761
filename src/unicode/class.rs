//! Character classes for word-break scanning.

/// Break class of a character.
///
/// Word-granularity movement and word wrapping both operate on maximal runs
/// of a single class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Letters, digits and underscore.
    Word,
    /// Anything printable that is neither a word character nor whitespace.
    Punctuation,
    /// Whitespace, including tabs.
    Whitespace,
}

impl CharClass {
    /// Classify a character.
    #[must_use]
    pub fn of(c: char) -> Self {
        if c.is_alphanumeric() || c == '_' {
            Self::Word
        } else if c.is_whitespace() {
            Self::Whitespace
        } else {
            Self::Punctuation
        }
    }

    /// Classify a cluster by its first character; empty clusters are
    /// punctuation.
    #[must_use]
    pub fn of_str(s: &str) -> Self {
        s.chars().next().map_or(Self::Punctuation, Self::of)
    }

    #[must_use]
    pub fn is_whitespace(self) -> bool {
        self == Self::Whitespace
    }
}

/// Whether `c` terminates a paragraph.
///
/// Matches the line breaks the rope recognises: LF, VT, FF, CR, NEL, LS and
/// PS.
#[must_use]
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Number of trailing characters of `line` that form its terminator
/// (0, 1, or 2 for CRLF).
#[must_use]
pub fn line_break_len(line: &str) -> usize {
    if line.ends_with("\r\n") {
        2
    } else if line.chars().next_back().is_some_and(is_line_break) {
        1
    } else {
        0
    }
}
