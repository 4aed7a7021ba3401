//! Error types for tracetrim.
//!
//! The trace engine itself is total and never fails; these errors cover the
//! boundaries around it: configuration, custom pattern compilation, clipboard
//! access and file/stdin I/O. Every variant maps to a CLI exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for tracetrim operations.
#[derive(Error, Debug)]
pub enum TraceTrimError {
    /// A custom detection pattern could not be compiled.
    #[error("Custom pattern at index {index} is not a valid regex: {pattern}")]
    InvalidPattern {
        /// Position of the pattern in the configured list.
        index: usize,
        /// The offending pattern text.
        pattern: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A custom detection pattern was empty.
    #[error("Custom pattern at index {index} cannot be empty")]
    EmptyPattern {
        /// Position of the pattern in the configured list.
        index: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Clipboard could not be opened, read or written.
    #[error("Clipboard error: {context}")]
    ClipboardError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying platform clipboard error, if available.
        #[source]
        source: Option<arboard::Error>,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Input is not valid UTF-8 text or contains binary data.
    #[error("Input is not valid text: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Input exceeds the configured size limit.
    #[error("Content too large ({size} bytes, limit {limit} bytes)")]
    ContentTooLarge {
        /// Actual content size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// No stack trace was found where one was required.
    #[error("No stack trace detected in input")]
    NoStackTrace,

    /// Input was empty where content was required.
    #[error("No input content provided")]
    EmptyInput,

    /// Unsupported operation or platform feature.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl TraceTrimError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new clipboard error wrapping the platform error.
    #[must_use]
    pub fn clipboard(context: impl Into<String>, source: arboard::Error) -> Self {
        Self::ClipboardError {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NoStackTrace | Self::EmptyInput => exit_codes::EXIT_NO_TRACE,
            Self::FileNotFound { .. } => exit_codes::EXIT_FILE_NOT_FOUND,
            Self::ClipboardError { .. } => exit_codes::EXIT_CLIPBOARD_ERROR,
            Self::ConfigError { .. }
            | Self::InvalidConfig { .. }
            | Self::InvalidPattern { .. }
            | Self::EmptyPattern { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::InvalidInput { .. } | Self::ContentTooLarge { .. } => exit_codes::EXIT_DATA_ERROR,
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Check if the clipboard monitor can keep polling after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ClipboardError { .. } | Self::InvalidInput { .. } | Self::ContentTooLarge { .. }
        )
    }
}

/// Result type alias for tracetrim operations.
pub type Result<T> = std::result::Result<T, TraceTrimError>;

impl From<std::io::Error> for TraceTrimError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for TraceTrimError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// No stack trace found (or empty input) in strict/check mode.
    pub const EXIT_NO_TRACE: i32 = 2;
    /// Specified file not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Clipboard unavailable or failed.
    pub const EXIT_CLIPBOARD_ERROR: i32 = 4;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(TraceTrimError::NoStackTrace.exit_code(), 2);

        let not_found = TraceTrimError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        assert_eq!(TraceTrimError::EmptyPattern { index: 0 }.exit_code(), 5);

        let too_large = TraceTrimError::ContentTooLarge { size: 10, limit: 5 };
        assert_eq!(too_large.exit_code(), 65);
    }

    #[test]
    fn test_is_recoverable() {
        let clipboard = TraceTrimError::ClipboardError {
            context: "read".to_string(),
            source: None,
        };
        assert!(clipboard.is_recoverable());
        assert!(!TraceTrimError::config("bad").is_recoverable());
    }

    #[test]
    fn test_invalid_pattern_message() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = TraceTrimError::InvalidPattern {
            index: 1,
            pattern: "(".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "Custom pattern at index 1 is not a valid regex: ("
        );
    }
}
