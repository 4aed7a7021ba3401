//! Data model for stack trace cleaning results.
//!
//! Everything here is created and dropped within a single call into the
//! engine; nothing is persisted across calls. The types serialize with
//! `serde` so script mode can emit them as JSON.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Structured summary pulled from a recognized stack trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// The first non-empty line of the trace, trimmed.
    pub message: String,
    /// Every non-empty line of the original trace, unmodified and in order.
    pub stack_lines: Vec<String>,
    /// First `file:line` location that is not framework-internal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// First React component seen calling a lifecycle method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

/// Cleaned content plus the exact number of frames dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOutcome {
    /// The cleaned text (or the input, untouched).
    pub content: String,
    /// Number of duplicate frame lines removed.
    pub removed_count: usize,
}

impl CleanOutcome {
    /// An outcome that hands the input back unchanged.
    #[must_use]
    pub fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            removed_count: 0,
        }
    }
}

/// Full result of analyzing one block of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanResult {
    /// Content as it was received.
    pub original: String,
    /// Content after duplicate frames were collapsed.
    pub cleaned: String,
    /// Number of duplicate frame lines removed.
    pub removed_count: usize,
    /// `original.len() - cleaned.len()`; negative when the summary line
    /// outweighs the frames it replaced.
    pub bytes_saved: i64,
    /// Newline count of `original`, plus one.
    pub lines_before: usize,
    /// Newline count of `cleaned`, plus one.
    pub lines_after: usize,
    /// Extracted summary, present only for recognized stack traces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
}

impl CleanResult {
    /// Compose a result from the original text, the cleaning outcome and
    /// the extracted info. Statistics come from the strings themselves.
    #[must_use]
    pub fn assemble(original: &str, outcome: CleanOutcome, error_info: Option<ErrorInfo>) -> Self {
        let cleaned = outcome.content;
        Self {
            bytes_saved: original.len() as i64 - cleaned.len() as i64,
            lines_before: count_lines(original),
            lines_after: count_lines(&cleaned),
            original: original.to_string(),
            cleaned,
            removed_count: outcome.removed_count,
            error_info,
        }
    }

    /// Whether cleaning changed anything.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.cleaned != self.original
    }

    /// Bytes saved as a percentage of the original size.
    #[must_use]
    pub fn percent_saved(&self) -> f64 {
        if self.original.is_empty() {
            return 0.0;
        }
        self.bytes_saved as f64 / self.original.len() as f64 * 100.0
    }
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Clipboard data captured at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardContent {
    /// The captured text.
    pub content: String,
    /// When the change was observed.
    pub timestamp: DateTime<Local>,
    /// MIME-style content format.
    pub format: &'static str,
}

impl ClipboardContent {
    /// Capture text observed right now.
    #[must_use]
    pub fn now(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timestamp: Local::now(),
            format: "text/plain",
        }
    }
}

/// Flavor of a recognized stack trace, used for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackTraceKind {
    /// A trace that involves React code.
    React,
    /// Any other JavaScript trace.
    JavaScript,
}

impl StackTraceKind {
    /// Classify a trace from its extracted info and raw content.
    #[must_use]
    pub fn detect(error_info: Option<&ErrorInfo>, content: &str) -> Self {
        let Some(info) = error_info else {
            return Self::JavaScript;
        };

        if info.component.is_some() {
            return Self::React;
        }

        if let Some(source) = &info.source {
            let source = source.to_lowercase();
            if ["react", "jsx", "tsx"].iter().any(|needle| source.contains(needle)) {
                return Self::React;
            }
        }

        let content = content.to_lowercase();
        if ["react", "component", "jsx", "tsx"]
            .iter()
            .any(|needle| content.contains(needle))
        {
            return Self::React;
        }

        Self::JavaScript
    }
}

impl fmt::Display for StackTraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::React => write!(f, "React"),
            Self::JavaScript => write!(f, "JavaScript"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_counts_from_strings() {
        let original = "a\nb\nc\nb";
        let outcome = CleanOutcome {
            content: "a\nb".to_string(),
            removed_count: 2,
        };
        let result = CleanResult::assemble(original, outcome, None);

        assert_eq!(result.bytes_saved, 4);
        assert_eq!(result.lines_before, 4);
        assert_eq!(result.lines_after, 2);
        assert!(result.is_changed());
    }

    #[test]
    fn test_bytes_saved_can_be_negative() {
        let outcome = CleanOutcome {
            content: "// a much longer replacement".to_string(),
            removed_count: 1,
        };
        let result = CleanResult::assemble("x\nx", outcome, None);
        assert!(result.bytes_saved < 0);
    }

    #[test]
    fn test_percent_saved_empty_original() {
        let result = CleanResult::assemble("", CleanOutcome::unchanged(""), None);
        assert!(result.percent_saved().abs() < f64::EPSILON);
        assert!(!result.is_changed());
    }

    #[test]
    fn test_kind_without_info_is_javascript() {
        assert_eq!(StackTraceKind::detect(None, "react"), StackTraceKind::JavaScript);
    }

    #[test]
    fn test_kind_from_component() {
        let info = ErrorInfo {
            component: Some("App".to_string()),
            ..ErrorInfo::default()
        };
        assert_eq!(StackTraceKind::detect(Some(&info), ""), StackTraceKind::React);
    }

    #[test]
    fn test_kind_from_source_or_content() {
        let info = ErrorInfo {
            source: Some("src/App.tsx:12".to_string()),
            ..ErrorInfo::default()
        };
        assert_eq!(StackTraceKind::detect(Some(&info), ""), StackTraceKind::React);

        let plain = ErrorInfo {
            source: Some("server.js:4".to_string()),
            ..ErrorInfo::default()
        };
        assert_eq!(
            StackTraceKind::detect(Some(&plain), "TypeError: x is undefined"),
            StackTraceKind::JavaScript
        );
        assert_eq!(
            StackTraceKind::detect(Some(&plain), "at ReactDOM.render"),
            StackTraceKind::React
        );
    }

    #[test]
    fn test_error_info_json_skips_missing_fields() {
        let info = ErrorInfo {
            message: "Error".to_string(),
            stack_lines: vec!["Error".to_string()],
            source: None,
            component: None,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("source"));
        assert!(!json.contains("component"));
    }
}
