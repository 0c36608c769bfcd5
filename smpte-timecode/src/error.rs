//! Error types for rate and timecode parsing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for timecode operations.
pub type Result<T> = std::result::Result<T, TimecodeError>;

/// Errors that can occur while reading rates and timecodes from text.
///
/// Arithmetic never fails: results that would be negative clip to zero and
/// degenerate rates fall back to a one nanosecond frame duration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimecodeError {
    /// Text is neither a rate index, a decimal rate nor a `num/den` fraction.
    #[error("timecode: parsing rate \"{text}\": invalid syntax")]
    RateSyntax {
        /// The rejected rate text.
        text: String,
    },

    /// Text has a non-numeric segment or more than four segments.
    #[error("timecode: parsing timecode \"{text}\": invalid syntax")]
    TimecodeSyntax {
        /// The rejected timecode text, without any `@rate` suffix.
        text: String,
    },
}

impl TimecodeError {
    /// Create a rate syntax error.
    pub fn rate_syntax(text: impl Into<String>) -> Self {
        Self::RateSyntax { text: text.into() }
    }

    /// Create a timecode syntax error.
    pub fn timecode_syntax(text: impl Into<String>) -> Self {
        Self::TimecodeSyntax { text: text.into() }
    }

    /// The original text that failed to parse.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::RateSyntax { text } | Self::TimecodeSyntax { text } => text,
        }
    }
}
