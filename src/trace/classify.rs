//! Line-counting classifier deciding whether text is a stack trace.

use tracing::trace;

use super::patterns::PatternSet;

/// Default number of stack-like lines needed for a positive result.
pub const DEFAULT_MIN_DETECTION_LINES: usize = 2;

/// Default minimum content length in bytes.
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 20;

/// Count stack-like lines top to bottom and stop as soon as `threshold` is
/// reached. Content shorter than `min_length` is never scanned.
///
/// The caller is responsible for validating `content` first.
pub(crate) fn looks_like_stack_trace(
    patterns: &PatternSet,
    content: &str,
    threshold: usize,
    min_length: usize,
) -> bool {
    if content.len() < min_length {
        return false;
    }

    let threshold = threshold.max(1);
    let mut matched = 0;

    for (index, line) in content.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }

        if let Some(kind) = patterns.detect(line) {
            matched += 1;
            trace!(line = index + 1, detector = %kind, matched, "Stack-like line");
            if matched >= threshold {
                return true;
            }
        }
    }

    false
}
