//! Structured summary of a recognized stack trace.

use regex::Captures;

use super::patterns::PatternSet;
use crate::model::ErrorInfo;

/// Build the summary for `content`. The caller must already know it is a
/// stack trace.
pub(crate) fn extract_error_info(patterns: &PatternSet, content: &str) -> ErrorInfo {
    let mut info = ErrorInfo::default();
    let mut message = None;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if message.is_none() {
            message = Some(trimmed.to_string());
        }

        if info.source.is_none() {
            info.source = user_source(patterns, trimmed);
        }

        if info.component.is_none() {
            info.component = patterns
                .component
                .captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
        }

        info.stack_lines.push(line.to_string());
    }

    info.message = message.unwrap_or_default();
    info
}

/// `file:line` for the first location on this line, unless that location is
/// inside a framework-internal file.
fn user_source(patterns: &PatternSet, line: &str) -> Option<String> {
    let caps = patterns
        .arrow_location
        .captures(line)
        .or_else(|| patterns.paren_location.captures(line))
        .or_else(|| patterns.bare_location.captures(line))?;

    let (file, line_number) = location(&caps)?;
    if patterns.internal().is_internal_file(file) {
        return None;
    }
    Some(format!("{file}:{line_number}"))
}

fn location<'a>(caps: &Captures<'a>) -> Option<(&'a str, &'a str)> {
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str()))
}
