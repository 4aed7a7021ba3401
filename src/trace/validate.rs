//! Input gate run before any pattern matching.
//!
//! Bounds the work done by every later stage: total size is capped, and so
//! is the length of each individual line.

use thiserror::Error;

use crate::error::TraceTrimError;

/// Default maximum content size (50 MiB).
pub const DEFAULT_MAX_CONTENT_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum length of a single line in bytes.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 10_000;

/// Why content was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Bytes are not valid UTF-8.
    #[error("content is not valid UTF-8")]
    InvalidEncoding,
    /// Content contains a NUL byte.
    #[error("content contains a null byte")]
    NullByte,
    /// Content is larger than the size limit.
    #[error("content is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Content size in bytes.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A line is longer than the line limit.
    #[error("line {line} is {length} bytes, limit is {limit}")]
    LineTooLong {
        /// One-based line number.
        line: usize,
        /// Line length in bytes.
        length: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl From<Rejection> for TraceTrimError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::TooLarge { size, limit } => Self::ContentTooLarge { size, limit },
            other => Self::InvalidInput {
                reason: other.to_string(),
            },
        }
    }
}

/// Size limits applied to incoming content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    /// Maximum total size in bytes.
    pub max_content_size: usize,
    /// Maximum single line length in bytes.
    pub max_line_length: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ContentLimits {
    /// Check `content`, reporting the first rule it breaks.
    pub fn check(&self, content: &str) -> Result<(), Rejection> {
        if content.len() > self.max_content_size {
            return Err(Rejection::TooLarge {
                size: content.len(),
                limit: self.max_content_size,
            });
        }

        if content.as_bytes().contains(&0) {
            return Err(Rejection::NullByte);
        }

        if let Some((index, line)) = content
            .split('\n')
            .enumerate()
            .find(|(_, line)| line.len() > self.max_line_length)
        {
            return Err(Rejection::LineTooLong {
                line: index + 1,
                length: line.len(),
                limit: self.max_line_length,
            });
        }

        Ok(())
    }

    /// Decode and check raw bytes, returning the text on success.
    pub fn check_bytes<'a>(&self, bytes: &'a [u8]) -> Result<&'a str, Rejection> {
        // Size first so oversized buffers are never scanned for UTF-8.
        if bytes.len() > self.max_content_size {
            return Err(Rejection::TooLarge {
                size: bytes.len(),
                limit: self.max_content_size,
            });
        }
        let text = std::str::from_utf8(bytes).map_err(|_| Rejection::InvalidEncoding)?;
        self.check(text)?;
        Ok(text)
    }

    /// Pure predicate form of [`check`](Self::check).
    #[must_use]
    pub fn is_valid(&self, content: &str) -> bool {
        self.check(content).is_ok()
    }

    /// Pure predicate form of [`check_bytes`](Self::check_bytes).
    #[must_use]
    pub fn is_valid_bytes(&self, bytes: &[u8]) -> bool {
        self.check_bytes(bytes).is_ok()
    }
}
