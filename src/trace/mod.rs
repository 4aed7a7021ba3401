//! Stack trace recognition and frame deduplication.
//!
//! The engine is a handful of pure functions over text:
//!
//! - validation bounds input size and line length
//! - classification counts stack-like lines until a threshold is hit
//! - deduplication drops frames whose signature was already seen
//! - extraction summarizes message, user source location and component
//!
//! Every entry point is total: invalid or non-trace input yields `false`,
//! `None` or the input unchanged, never an error.
//!
//! # Example
//!
//! ```rust
//! use tracetrim::trace;
//!
//! let input = "Error: boom\n    at a (a.js:1:1)\n    at a (a.js:1:1)";
//! let result = trace::analyze(input);
//!
//! assert_eq!(result.removed_count, 1);
//! assert!(result.cleaned.starts_with("// Removed 1 repetitive stack frame(s)"));
//! ```
//!
//! For non-default settings build a [`TraceAnalyzer`]:
//!
//! ```rust
//! use tracetrim::trace::{DetectionOptions, TraceAnalyzer};
//!
//! let options = DetectionOptions {
//!     min_detection_lines: 1,
//!     custom_patterns: vec![r"^\s+at .+ \(native\)$".to_string()],
//!     ..DetectionOptions::default()
//! };
//! let analyzer = TraceAnalyzer::with_options(options)?;
//! assert!(analyzer.is_stack_trace("Uncaught RangeError: too deep"));
//! # Ok::<(), tracetrim::TraceTrimError>(())
//! ```

mod classify;
mod dedup;
mod extract;
mod patterns;
mod signature;
mod validate;

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use classify::{DEFAULT_MIN_CONTENT_LENGTH, DEFAULT_MIN_DETECTION_LINES};
pub use dedup::summary_line;
pub use patterns::{
    builtin_patterns, Detector, DetectorKind, InternalFrames, PatternSet,
    DEFAULT_INTERNAL_FUNCTIONS, DEFAULT_INTERNAL_MARKERS,
};
pub use signature::{FrameSignature, FrameStyle, ParsedFrame};
pub use validate::{ContentLimits, Rejection, DEFAULT_MAX_CONTENT_SIZE, DEFAULT_MAX_LINE_LENGTH};

use crate::error::Result;
use crate::model::{CleanOutcome, CleanResult, ErrorInfo};

/// Tunable detection settings.
///
/// This is also the `[parser]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOptions {
    /// Stack-like lines needed before content counts as a trace.
    #[serde(default = "default_min_detection_lines")]
    pub min_detection_lines: usize,
    /// Content shorter than this (in bytes) is never a trace.
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,
    /// Content larger than this (in bytes) is rejected outright.
    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,
    /// Content with any line longer than this (in bytes) is rejected.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Extra detector regexes, tried after the built-in ones.
    #[serde(default)]
    pub custom_patterns: Vec<String>,
    /// Framework-internal function names (case-insensitive substrings).
    #[serde(default = "default_internal_functions")]
    pub internal_functions: Vec<String>,
    /// Substrings marking a file as framework-internal.
    #[serde(default = "default_internal_markers")]
    pub internal_markers: Vec<String>,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            min_detection_lines: DEFAULT_MIN_DETECTION_LINES,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            custom_patterns: Vec::new(),
            internal_functions: default_internal_functions(),
            internal_markers: default_internal_markers(),
        }
    }
}

impl DetectionOptions {
    /// Size limits used by the validator.
    #[must_use]
    pub fn limits(&self) -> ContentLimits {
        ContentLimits {
            max_content_size: self.max_content_size,
            max_line_length: self.max_line_length,
        }
    }

    fn uses_builtin_patterns(&self) -> bool {
        self.custom_patterns.is_empty()
            && self.internal_functions == default_internal_functions()
            && self.internal_markers == default_internal_markers()
    }
}

// Default value functions for serde
fn default_min_detection_lines() -> usize {
    DEFAULT_MIN_DETECTION_LINES
}

fn default_min_content_length() -> usize {
    DEFAULT_MIN_CONTENT_LENGTH
}

fn default_max_content_size() -> usize {
    DEFAULT_MAX_CONTENT_SIZE
}

fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

fn default_internal_functions() -> Vec<String> {
    DEFAULT_INTERNAL_FUNCTIONS.iter().map(|s| (*s).to_string()).collect()
}

fn default_internal_markers() -> Vec<String> {
    DEFAULT_INTERNAL_MARKERS.iter().map(|s| (*s).to_string()).collect()
}

/// Stack trace analyzer bound to one set of options and compiled patterns.
///
/// Cheap to clone and safe to share between threads; all methods take
/// `&self` and keep no state between calls.
#[derive(Debug, Clone)]
pub struct TraceAnalyzer {
    options: DetectionOptions,
    patterns: Arc<PatternSet>,
}

impl Default for TraceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceAnalyzer {
    /// Analyzer with default options and the built-in pattern table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: DetectionOptions::default(),
            patterns: builtin_patterns(),
        }
    }

    /// Analyzer with custom options. Fails if a custom pattern is empty or
    /// does not compile.
    pub fn with_options(options: DetectionOptions) -> Result<Self> {
        let patterns = if options.uses_builtin_patterns() {
            builtin_patterns()
        } else {
            let internal = InternalFrames::new(
                options.internal_functions.iter(),
                options.internal_markers.iter().cloned(),
            );
            Arc::new(PatternSet::new(&options.custom_patterns, internal)?)
        };
        debug!(
            detectors = patterns.detectors().len(),
            min_detection_lines = options.min_detection_lines,
            "Built trace analyzer"
        );
        Ok(Self { options, patterns })
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Compiled pattern table in use.
    #[must_use]
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Whether `content` passes the size, NUL byte and line length checks.
    #[must_use]
    pub fn is_valid(&self, content: &str) -> bool {
        self.options.limits().is_valid(content)
    }

    /// Byte-level validation, additionally requiring valid UTF-8.
    #[must_use]
    pub fn is_valid_bytes(&self, bytes: &[u8]) -> bool {
        self.options.limits().is_valid_bytes(bytes)
    }

    /// Whether `content` is a JavaScript/React stack trace.
    #[must_use]
    pub fn is_stack_trace(&self, content: &str) -> bool {
        self.is_valid(content)
            && classify::looks_like_stack_trace(
                &self.patterns,
                content,
                self.options.min_detection_lines,
                self.options.min_content_length,
            )
    }

    /// Collapse duplicate frames. Non-trace content comes back unchanged.
    #[must_use]
    pub fn clean(&self, content: &str) -> CleanOutcome {
        if !self.is_stack_trace(content) {
            return CleanOutcome::unchanged(content);
        }
        dedup::collapse_frames(&self.patterns, content)
    }

    /// Summarize a stack trace; `None` for anything else.
    #[must_use]
    pub fn extract_info(&self, content: &str) -> Option<ErrorInfo> {
        if !self.is_stack_trace(content) {
            return None;
        }
        Some(extract::extract_error_info(&self.patterns, content))
    }

    /// Parse one line as a frame.
    #[must_use]
    pub fn parse_frame<'a>(&self, line: &'a str) -> Option<ParsedFrame<'a>> {
        signature::parse_frame(&self.patterns, line.trim())
    }

    /// Deduplication key for one line.
    #[must_use]
    pub fn signature_of(&self, line: &str) -> FrameSignature {
        signature::signature_of(&self.patterns, line)
    }

    /// Clean, extract and compute statistics in one pass over the
    /// classification.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(bytes = content.len()))]
    pub fn analyze(&self, content: &str) -> CleanResult {
        if !self.is_stack_trace(content) {
            debug!("Content is not a stack trace");
            return CleanResult::assemble(content, CleanOutcome::unchanged(content), None);
        }

        let outcome = dedup::collapse_frames(&self.patterns, content);
        let info = extract::extract_error_info(&self.patterns, content);
        let result = CleanResult::assemble(content, outcome, Some(info));
        debug!(
            removed = result.removed_count,
            bytes_saved = result.bytes_saved,
            lines_before = result.lines_before,
            lines_after = result.lines_after,
            "Analyzed stack trace"
        );
        result
    }
}

static DEFAULT_ANALYZER: Lazy<TraceAnalyzer> = Lazy::new(TraceAnalyzer::new);

/// [`TraceAnalyzer::is_valid`] with default options.
#[must_use]
pub fn is_valid(content: &str) -> bool {
    DEFAULT_ANALYZER.is_valid(content)
}

/// [`TraceAnalyzer::is_stack_trace`] with default options.
#[must_use]
pub fn is_stack_trace(content: &str) -> bool {
    DEFAULT_ANALYZER.is_stack_trace(content)
}

/// [`TraceAnalyzer::clean`] with default options.
#[must_use]
pub fn clean(content: &str) -> CleanOutcome {
    DEFAULT_ANALYZER.clean(content)
}

/// [`TraceAnalyzer::extract_info`] with default options.
#[must_use]
pub fn extract_info(content: &str) -> Option<ErrorInfo> {
    DEFAULT_ANALYZER.extract_info(content)
}

/// [`TraceAnalyzer::analyze`] with default options.
#[must_use]
pub fn analyze(content: &str) -> CleanResult {
    DEFAULT_ANALYZER.analyze(content)
}
