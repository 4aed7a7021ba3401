//! User-facing notification text for cleaning results.

use crate::model::{ClipboardContent, CleanResult, StackTraceKind};

/// `"s"` unless `count` is exactly one.
#[must_use]
pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// `[HH:MM:SS] ` prefix for a captured change, or nothing when disabled.
#[must_use]
pub fn timestamp_prefix(content: &ClipboardContent, show: bool) -> String {
    if show {
        format!("[{}] ", content.timestamp.format("%H:%M:%S"))
    } else {
        String::new()
    }
}

/// Stack trace kind for a result.
#[must_use]
pub fn kind_of(result: &CleanResult) -> StackTraceKind {
    StackTraceKind::detect(result.error_info.as_ref(), &result.original)
}

/// Statistic fragments such as `Removed 2 repetitive frames` and
/// `saved 120 bytes, 35.0%`. Empty when nothing was saved.
#[must_use]
pub fn stats_parts(result: &CleanResult) -> Vec<String> {
    let mut parts = Vec::new();

    if result.removed_count > 0 {
        parts.push(format!(
            "Removed {} repetitive frame{}",
            result.removed_count,
            plural(result.removed_count)
        ));
    }

    if result.bytes_saved > 0 {
        parts.push(format!(
            "saved {} bytes, {:.1}%",
            result.bytes_saved,
            result.percent_saved()
        ));
    }

    parts
}

/// Success line shown after the clipboard was rewritten.
#[must_use]
pub fn success_message(result: &CleanResult) -> String {
    format!("✅ {} stack trace cleaned and clipboard updated", kind_of(result))
}

/// Multi-line statistics block used by `clean --format stats`.
#[must_use]
pub fn stats_block(result: &CleanResult) -> String {
    let mut out = String::new();
    let mut row = |label: &str, value: &dyn std::fmt::Display| {
        out.push_str(&format!("{:<16}{}\n", format!("{label}:"), value));
    };

    let detected = result.error_info.is_some();
    row("Stack trace", &if detected { "yes" } else { "no" });
    if detected {
        row("Kind", &kind_of(result));
    }
    row("Frames removed", &result.removed_count);
    row("Bytes saved", &result.bytes_saved);
    row(
        "Lines",
        &format!("{} -> {}", result.lines_before, result.lines_after),
    );

    if let Some(info) = &result.error_info {
        row("Message", &info.message);
        if let Some(source) = &info.source {
            row("Source", source);
        }
        if let Some(component) = &info.component {
            row("Component", component);
        }
    }

    out
}
