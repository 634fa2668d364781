//! Error types for policies, age computation and item collection.

use std::path::PathBuf;

use thiserror::Error;

/// A retention policy could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// No rules were given at all.
    #[error("Rules must not be empty")]
    Empty,

    /// A rule names a category that does not exist.
    #[error("Invalid time category: '{label}'")]
    UnknownUnit { label: String },

    /// A rule has a negative keep count.
    #[error("'{label}' count must be a non-negative integer, got {count}")]
    NegativeCount { label: String, count: i64 },

    /// Every keep count is zero.
    #[error("At least one count > 0 is required")]
    AllZero,
}

/// A rules string such as `days10,weeks2` could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesParseError {
    /// Two separators without a rule in between, or an empty string.
    #[error("Token is empty")]
    EmptyToken,

    /// A token is not of the form `<category><count>`.
    #[error("Invalid token <{token}>")]
    InvalidToken { token: String },

    /// The rules parsed but do not form a valid policy.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// The age of an entry could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AgeError {
    /// The entry is younger than the reference instant.
    #[error("Time {timestamp} is not earlier than reference {reference}")]
    FutureTimestamp { timestamp: f64, reference: f64 },

    /// NaN or infinite input.
    #[error("Timestamps must be finite numbers (got {timestamp} and reference {reference})")]
    NotFinite { timestamp: f64, reference: f64 },
}

/// Errors that can occur while turning user input into items.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Cannot access '{path}'")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the item list itself failed.
    #[error("Error reading items: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    /// Neither a regular file, a directory nor a symbolic link.
    #[error("Unsupported file type: '{path}'")]
    UnsupportedType { path: PathBuf },

    /// A time string did not match the format.
    #[error("Error while parsing time from '{input}' with format '{format}': {source}")]
    TimeParse {
        input: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The parsed local time does not exist or is ambiguous (DST transitions).
    #[error("Local time '{input}' is ambiguous or does not exist")]
    AmbiguousLocalTime { input: String },

    /// The time regex did not match an item.
    #[error("Regex '{pattern}' did not match '{input}'")]
    RegexNoMatch { pattern: String, input: String },

    /// The time regex is not usable.
    #[error("Invalid time regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// An item read from a stream is not valid UTF-8.
    #[error("Item #{index} is not valid UTF-8")]
    InvalidUtf8 { index: usize },

    /// An item whose time is parsed from text is not valid UTF-8. `input`
    /// holds the lossy form.
    #[error("Cannot parse time from non-UTF-8 item '{input}'")]
    NonUtf8Text { input: String },
}

impl CollectError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_error_io() {
        let err = CollectError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, CollectError::PermissionDenied { .. }));

        let err = CollectError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "Cannot access '/test/path'");
    }

    #[test]
    fn test_rules_error_wraps_policy_error() {
        let err: RulesParseError = PolicyError::AllZero.into();
        assert_eq!(err, RulesParseError::Policy(PolicyError::AllZero));
        assert_eq!(err.to_string(), "At least one count > 0 is required");
    }
}
