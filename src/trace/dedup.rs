//! Duplicate frame removal.

use std::collections::HashSet;

use tracing::debug;

use super::patterns::PatternSet;
use super::signature::{parse_frame, signature_for, FrameSignature};
use crate::model::CleanOutcome;

/// Header prepended to cleaned output when frames were removed.
#[must_use]
pub fn summary_line(removed: usize) -> String {
    format!("// Removed {removed} repetitive stack frame(s)")
}

/// Drop every frame line whose signature was already seen, keeping the
/// first occurrence. Blank lines and non-frame lines always survive in
/// their original form.
///
/// The caller must already know `content` is a stack trace.
pub(crate) fn collapse_frames(patterns: &PatternSet, content: &str) -> CleanOutcome {
    let mut seen: HashSet<FrameSignature> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();
    let mut removed = 0usize;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            kept.push(line);
            continue;
        }

        let Some(frame) = parse_frame(patterns, trimmed) else {
            kept.push(line);
            continue;
        };

        if seen.insert(signature_for(patterns, &frame)) {
            kept.push(line);
        } else {
            removed += 1;
        }
    }

    if removed == 0 {
        return CleanOutcome::unchanged(content);
    }

    debug!(removed, unique = seen.len(), "Collapsed duplicate frames");

    let header = summary_line(removed);
    let mut cleaned = String::with_capacity(content.len() + header.len() + 1);
    cleaned.push_str(&header);
    cleaned.push('\n');
    for (index, line) in kept.iter().enumerate() {
        if index > 0 {
            cleaned.push('\n');
        }
        cleaned.push_str(line);
    }

    CleanOutcome {
        content: cleaned,
        removed_count: removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::patterns::builtin_patterns;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(3), "// Removed 3 repetitive stack frame(s)");
    }

    #[test]
    fn test_keeps_first_occurrence_and_blank_lines() {
        let content = "Error: boom\n\n    at a (a.js:1:1)\n    at b (b.js:2:2)\n    at a (a.js:1:1)\n";
        let outcome = collapse_frames(&builtin_patterns(), content);
        assert_eq!(outcome.removed_count, 1);
        assert_eq!(
            outcome.content,
            "// Removed 1 repetitive stack frame(s)\nError: boom\n\n    at a (a.js:1:1)\n    at b (b.js:2:2)\n"
        );
    }

    #[test]
    fn test_same_function_different_user_lines_kept() {
        let content = "Error: boom\n    at a (a.js:1:1)\n    at a (a.js:9:1)";
        let outcome = collapse_frames(&builtin_patterns(), content);
        assert_eq!(outcome.removed_count, 0);
        assert_eq!(outcome.content, content);
    }

    #[test]
    fn test_repeated_message_lines_are_not_removed() {
        let content = "Warning: x\nWarning: x\n    at a (a.js:1:1)\n    at a (a.js:1:1)";
        let outcome = collapse_frames(&builtin_patterns(), content);
        assert_eq!(outcome.removed_count, 1);
        assert!(outcome.content.contains("Warning: x\nWarning: x\n"));
    }

    #[test]
    fn test_crlf_separators_survive() {
        let content = "Error: boom\r\n    at a (a.js:1:1)\r\n    at a (a.js:1:1)\r\n    at b (b.js:2:2)";
        let outcome = collapse_frames(&builtin_patterns(), content);
        assert_eq!(outcome.removed_count, 1);
        assert_eq!(
            outcome.content,
            "// Removed 1 repetitive stack frame(s)\nError: boom\r\n    at a (a.js:1:1)\r\n    at b (b.js:2:2)"
        );
    }
}
