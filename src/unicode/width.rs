//! Column width calculation for fixed-width measurement.

use unicode_width::UnicodeWidthStr;

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Column width of a string using a specific method.
///
/// Control characters count as zero columns.
#[must_use]
pub fn display_width_with_method(s: &str, method: WidthMethod) -> usize {
    if s.chars().all(char::is_control) {
        return 0;
    }
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}
