//! Frame parsing and the canonical deduplication key derived from it.

use std::fmt;

use super::patterns::PatternSet;

/// Which of the two recognized frame shapes a line has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    /// `at fn (file:line:col)`.
    Call,
    /// `fn @ file:line`.
    Arrow,
}

/// A stack frame line broken into its parts. Borrows from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFrame<'a> {
    /// Function name, with any leading `at ` removed for call-style frames.
    pub function: &'a str,
    /// File name or URL as written.
    pub file: &'a str,
    /// Line number as written.
    pub line: &'a str,
    /// Column, present only for call-style frames.
    pub column: Option<&'a str>,
    /// Shape the line matched.
    pub style: FrameStyle,
}

/// Opaque equality key for a frame.
///
/// Two frames are duplicates exactly when their signatures are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameSignature(String);

impl FrameSignature {
    /// The key as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a trimmed line as a frame, trying the call shape before the arrow
/// shape. Returns `None` for lines that are not frames.
pub(crate) fn parse_frame<'a>(patterns: &PatternSet, line: &'a str) -> Option<ParsedFrame<'a>> {
    if let Some(caps) = patterns.call_frame.captures(line) {
        let function = caps.get(1)?.as_str().trim();
        return Some(ParsedFrame {
            function: function.strip_prefix("at ").unwrap_or(function),
            file: caps.get(2)?.as_str(),
            line: caps.get(3)?.as_str(),
            column: caps.get(4).map(|m| m.as_str()),
            style: FrameStyle::Call,
        });
    }

    let caps = patterns.arrow_frame.captures(line)?;
    Some(ParsedFrame {
        function: caps.get(1)?.as_str().trim(),
        file: caps.get(2)?.as_str(),
        line: caps.get(3)?.as_str(),
        column: None,
        style: FrameStyle::Arrow,
    })
}

/// Signature for a parsed frame. Framework-internal frames drop the line
/// number so the same internal function collapses across call sites.
pub(crate) fn signature_for(patterns: &PatternSet, frame: &ParsedFrame<'_>) -> FrameSignature {
    if patterns.internal().is_internal(frame.function, frame.file) {
        FrameSignature(format!("{}|{}", frame.function, frame.file))
    } else {
        FrameSignature(format!("{}|{}|{}", frame.function, frame.file, frame.line))
    }
}

/// Signature for any line. Lines that are not frames key on their own text,
/// so they can only ever equal an identical line.
pub(crate) fn signature_of(patterns: &PatternSet, line: &str) -> FrameSignature {
    let trimmed = line.trim();
    match parse_frame(patterns, trimmed) {
        Some(frame) => signature_for(patterns, &frame),
        None => FrameSignature(trimmed.to_string()),
    }
}
