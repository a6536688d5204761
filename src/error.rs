//! Error types for neotext.

use std::fmt;

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for document, registry and layout operations.
///
/// Every fallible operation validates its arguments before touching any
/// state, so an `Err` always leaves the document exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A character offset or range lies outside `[0, len]`.
    OutOfRange { position: usize, len: usize },
    /// A style registry invariant would be violated (unknown id, or more
    /// references released than were taken).
    UnsupportedStyleOperation(String),
    /// Growing the buffer or a reference count failed.
    ResourceExhausted { requested: usize },
}

impl Error {
    pub(crate) fn style_op(message: impl Into<String>) -> Self {
        Self::UnsupportedStyleOperation(message.into())
    }

    /// Whether this is an [`Error::OutOfRange`].
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { position, len } => {
                write!(f, "position {position} out of range for text of length {len}")
            }
            Self::UnsupportedStyleOperation(msg) => {
                write!(f, "unsupported style operation: {msg}")
            }
            Self::ResourceExhausted { requested } => {
                write!(f, "resource exhausted while growing by {requested}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::ResourceExhausted { requested: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::OutOfRange {
            position: 12,
            len: 5,
        };
        assert!(err.to_string().contains("position 12"));
        assert!(err.to_string().contains("length 5"));

        let err = Error::style_op("release of unknown style");
        assert!(err.to_string().contains("unsupported style operation"));

        let err = Error::ResourceExhausted { requested: 64 };
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_out_of_range_predicate() {
        assert!(
            Error::OutOfRange {
                position: 1,
                len: 0
            }
            .is_out_of_range()
        );
        assert!(!Error::style_op("x").is_out_of_range());
    }

    #[test]
    fn test_try_reserve_conversion() {
        let mut v: Vec<u64> = Vec::new();
        let err: Error = v.try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(err, Error::ResourceExhausted { .. }));
    }
}
