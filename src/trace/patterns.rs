//! Compiled pattern tables shared by the classifier, signature engine and
//! extractor.
//!
//! The built-in table is compiled once on first use and shared through an
//! `Arc`. Analyzers configured with custom patterns or a different
//! framework-internal allowlist get their own table, built from clones of
//! the built-in regexes (cloning a `Regex` shares its compiled program).

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TraceTrimError};

/// Framework-internal functions whose frames repeat at different line
/// numbers inside the same library file.
pub const DEFAULT_INTERNAL_FUNCTIONS: &[&str] = &[
    "recursivelyTraverseAndDoubleInvokeEffectsInDEV",
    "recursivelyTraversePassiveMountEffects",
    "commitPassiveMountOnFiber",
    "recursivelyTraverseReconnectPassiveEffects",
    "recursivelyTraverseDisconnectPassiveEffects",
    "recursivelyTraversePassiveUnmountEffects",
    "commitPassiveUnmountOnFiber",
    "ReactErrorUtils.invokeGuardedCallback",
    "ReactCompositeComponent._renderValidatedComponent",
    "react_stack_bottom_frame",
];

/// Substrings identifying framework-internal files.
pub const DEFAULT_INTERNAL_MARKERS: &[&str] = &["react-dom", "ReactErrorUtils"];

static BUILTIN: Lazy<Arc<PatternSet>> = Lazy::new(|| Arc::new(PatternSet::compile_builtin()));

/// Shared handle to the built-in pattern table.
#[must_use]
pub fn builtin_patterns() -> Arc<PatternSet> {
    Arc::clone(&BUILTIN)
}

/// Which line-level detector recognized a line as stack-trace-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// `at fn (file:line:col)`.
    CallFrame,
    /// `name.js:line:col` anywhere in the line.
    SourceLocation,
    /// `Error: msg` followed by an `at` line.
    ErrorAnchor,
    /// Literal React internal file or function names.
    InternalMarker,
    /// `Uncaught`, `TypeError:` and friends.
    ErrorKeyword,
    /// Console format `fn @ file:line`.
    ArrowFrame,
    /// `name.js:line` without a column.
    SourceLine,
    /// User-supplied pattern, by index in the configured list.
    Custom(usize),
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallFrame => write!(f, "call-frame"),
            Self::SourceLocation => write!(f, "source-location"),
            Self::ErrorAnchor => write!(f, "error-anchor"),
            Self::InternalMarker => write!(f, "internal-marker"),
            Self::ErrorKeyword => write!(f, "error-keyword"),
            Self::ArrowFrame => write!(f, "arrow-frame"),
            Self::SourceLine => write!(f, "source-line"),
            Self::Custom(index) => write!(f, "custom[{index}]"),
        }
    }
}

/// A single classification regex tagged with its kind.
#[derive(Debug, Clone)]
pub struct Detector {
    kind: DetectorKind,
    regex: Regex,
}

impl Detector {
    /// Detector kind.
    #[must_use]
    pub const fn kind(&self) -> DetectorKind {
        self.kind
    }

    /// Whether the detector fires on `line`.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Allowlist of framework-internal functions, conditioned on file markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalFrames {
    /// Lowercased function names, matched as substrings.
    functions: Vec<String>,
    /// File name markers, matched case-sensitively as substrings.
    markers: Vec<String>,
}

impl InternalFrames {
    /// Build an allowlist from function names and file markers.
    pub fn new<F, M>(functions: F, markers: M) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            functions: functions
                .into_iter()
                .map(|f| f.as_ref().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
            markers: markers
                .into_iter()
                .map(Into::into)
                .filter(|m: &String| !m.is_empty())
                .collect(),
        }
    }

    /// Whether `file` belongs to a framework-internal library.
    #[must_use]
    pub fn is_internal_file(&self, file: &str) -> bool {
        self.markers.iter().any(|marker| file.contains(marker.as_str()))
    }

    /// Whether `function` in `file` is a framework-internal call site whose
    /// line number should not distinguish frames.
    #[must_use]
    pub fn is_internal(&self, function: &str, file: &str) -> bool {
        if !self.is_internal_file(file) {
            return false;
        }
        let function = function.to_lowercase();
        self.functions
            .iter()
            .any(|internal| function.contains(internal.as_str()))
    }
}

impl Default for InternalFrames {
    fn default() -> Self {
        Self::new(
            DEFAULT_INTERNAL_FUNCTIONS.iter().copied(),
            DEFAULT_INTERNAL_MARKERS.iter().copied(),
        )
    }
}

/// Immutable set of compiled patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    detectors: Vec<Detector>,
    /// `fn (file:line:col)`; captures function, file, line, column.
    pub(crate) call_frame: Regex,
    /// `fn @ file:line[:col]`; captures function, file, line.
    pub(crate) arrow_frame: Regex,
    /// `(file:line:col)`; captures file, line.
    pub(crate) paren_location: Regex,
    /// `@ file:line[:col]`; captures file, line.
    pub(crate) arrow_location: Regex,
    /// Bare `path/file.js:line:col`; captures file, line.
    pub(crate) bare_location: Regex,
    /// `Component.render(`; captures the component name.
    pub(crate) component: Regex,
    internal: InternalFrames,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern {pattern:?} is invalid: {e}"))
}

impl PatternSet {
    fn compile_builtin() -> Self {
        let detector = |kind, pattern: &str| Detector {
            kind,
            regex: compile(pattern),
        };

        let detectors = vec![
            detector(DetectorKind::CallFrame, r"\bat\s+[\w<>.()\s]+\s*\([^)]+\)"),
            detector(
                DetectorKind::SourceLocation,
                r"\b\w+\.(js|ts|jsx|tsx|mjs|cjs):\d+:\d+\b",
            ),
            detector(DetectorKind::ErrorAnchor, r"(?m)^Error:\s+.*\n\s+at\s+"),
            detector(DetectorKind::InternalMarker, r"\breact-dom\.development\.js"),
            detector(
                DetectorKind::InternalMarker,
                r"\bReactErrorUtils\.invokeGuardedCallback",
            ),
            detector(DetectorKind::ErrorKeyword, r"\bUncaught\s+"),
            detector(DetectorKind::ErrorKeyword, r"\bReferenceError:"),
            detector(DetectorKind::ErrorKeyword, r"\bTypeError:"),
            detector(DetectorKind::ErrorKeyword, r"\bSyntaxError:"),
            detector(DetectorKind::ErrorKeyword, r"\bEvalError:"),
            detector(DetectorKind::ArrowFrame, r"\b\w+\s+@\s+.+?:\d+\b"),
            detector(
                DetectorKind::SourceLine,
                r"\b\w+\.(js|ts|jsx|tsx|mjs|cjs):\d+\b",
            ),
        ];

        Self {
            detectors,
            call_frame: compile(r"(.+?)\s*\(([^:()]+):(\d+):(\d+)\)"),
            arrow_frame: compile(r"^(.+?)\s*@\s*(\S+?):(\d+)(?::\d+)?(?:\s|$)"),
            paren_location: compile(r"\(([^:()]+):(\d+):(\d+)\)"),
            arrow_location: compile(r"@\s*(\S+?):(\d+)(?::\d+)?(?:\s|$)"),
            bare_location: compile(r"([^\s()@]+\.(?:js|ts|jsx|tsx|mjs|cjs)):(\d+):(\d+)"),
            component: compile(
                r"(\w+)\.(render|componentDidMount|componentDidUpdate|componentWillUnmount)\s*\(",
            ),
            internal: InternalFrames::default(),
        }
    }

    /// Build a table from the built-in patterns plus `custom_patterns`,
    /// using `internal` as the framework-internal allowlist.
    ///
    /// Every custom pattern must be non-empty and compile.
    pub fn new(custom_patterns: &[String], internal: InternalFrames) -> Result<Self> {
        let mut set = (**BUILTIN).clone();
        set.internal = internal;

        for (index, pattern) in custom_patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                return Err(TraceTrimError::EmptyPattern { index });
            }
            let regex = Regex::new(pattern).map_err(|source| TraceTrimError::InvalidPattern {
                index,
                pattern: pattern.clone(),
                source,
            })?;
            set.detectors.push(Detector {
                kind: DetectorKind::Custom(index),
                regex,
            });
        }

        Ok(set)
    }

    /// Detectors in the order they are tried.
    #[must_use]
    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    /// First detector that fires on `line`.
    #[must_use]
    pub fn detect(&self, line: &str) -> Option<DetectorKind> {
        self.detectors
            .iter()
            .find(|detector| detector.is_match(line))
            .map(Detector::kind)
    }

    /// Framework-internal allowlist.
    #[must_use]
    pub fn internal(&self) -> &InternalFrames {
        &self.internal
    }
}
