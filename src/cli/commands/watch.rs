//! Watch command implementation.
//!
//! Polls the clipboard and rewrites copied stack traces in place.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::WatchArgs;
use crate::clipboard::{ClipboardBackend, ClipboardMonitor, SystemClipboard};
use crate::config::Config;
use crate::error::Result;
use crate::model::{ClipboardContent, CleanResult};
use crate::report::{self, timestamp_prefix};
use crate::trace::TraceAnalyzer;

/// What happened to one clipboard change.
#[derive(Debug)]
pub(crate) enum Handled {
    /// Larger than `clipboard.max_content_size`.
    TooLarge,
    /// Not a stack trace.
    NotATrace,
    /// A stack trace with nothing to remove.
    Unchanged,
    /// Cleaned and written back.
    Cleaned(CleanResult),
}

/// Process one clipboard change and print notifications to `out`.
pub(crate) fn handle_change<B: ClipboardBackend, W: Write>(
    monitor: &mut ClipboardMonitor<B>,
    analyzer: &TraceAnalyzer,
    config: &Config,
    content: &ClipboardContent,
    out: &mut W,
) -> Result<Handled> {
    let output = &config.output;
    let timestamp = timestamp_prefix(content, output.show_timestamp);
    let size = content.content.len();

    if size > config.clipboard.max_content_size {
        debug!(size, "Content too large, skipping");
        if output.verbose {
            writeln!(out, "{timestamp}Content too large ({size} bytes), skipping")?;
        }
        return Ok(Handled::TooLarge);
    }

    let result = analyzer.analyze(&content.content);
    if result.error_info.is_none() {
        if output.verbose {
            writeln!(out, "{timestamp}Skipping non-stack-trace content")?;
        }
        return Ok(Handled::NotATrace);
    }

    if !result.is_changed() {
        if output.verbose {
            writeln!(out, "{timestamp}No changes needed - content is already clean")?;
        }
        return Ok(Handled::Unchanged);
    }

    monitor.set_content(&result.cleaned)?;
    info!(
        removed = result.removed_count,
        bytes_saved = result.bytes_saved,
        "Clipboard updated"
    );

    if output.verbose {
        writeln!(
            out,
            "{timestamp}🔍 Detected {} stack trace, cleaning...",
            report::kind_of(&result)
        )?;
    }

    let stats = report::stats_parts(&result);
    if !output.quiet {
        writeln!(out, "{timestamp}{}", report::success_message(&result))?;
        if !stats.is_empty() {
            writeln!(out, "{timestamp}   • {}", stats.join(", "))?;
        }
    }
    if output.verbose && stats.is_empty() {
        writeln!(out, "{timestamp}   • No changes needed")?;
    }

    Ok(Handled::Cleaned(result))
}

fn log_handled(handled: &Handled) {
    match handled {
        Handled::Cleaned(result) => debug!(
            lines_before = result.lines_before,
            lines_after = result.lines_after,
            percent_saved = result.percent_saved(),
            "Clipboard change cleaned"
        ),
        other => debug!(?other, "Clipboard change left alone"),
    }
}

/// Run the watch command.
pub fn run(config: &Config, args: &WatchArgs) -> Result<ExitCode> {
    let analyzer = TraceAnalyzer::with_options(config.parser.clone())?;
    let interval = args
        .interval
        .map_or_else(|| config.polling_interval(), Duration::from_millis);

    let backend = SystemClipboard::new().map_err(|e| {
        eprintln!("Clipboard monitoring is unavailable. This may be due to:");
        eprintln!("  - Insufficient permissions to access the clipboard");
        eprintln!("  - No display server (X11/Wayland) in this session");
        eprintln!("  - Missing system clipboard libraries");
        e
    })?;
    let mut monitor = ClipboardMonitor::new(backend, interval);
    let stdout = io::stdout();

    if args.once {
        let text = monitor.current_content()?;
        if text.is_empty() {
            if config.output.verbose {
                println!("Clipboard is empty");
            }
        } else {
            let content = ClipboardContent::now(text);
            let handled =
                handle_change(&mut monitor, &analyzer, config, &content, &mut stdout.lock())?;
            log_handled(&handled);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !config.output.quiet {
        println!("tracetrim v{}", crate::VERSION);
        if config.output.verbose {
            println!("Polling interval: {}ms", interval.as_millis());
        }
        println!("Monitoring clipboard for JavaScript/React stack traces...");
        println!("Press Ctrl+C to exit");
    }

    monitor.run(|monitor, content| {
        match handle_change(monitor, &analyzer, config, &content, &mut stdout.lock()) {
            Ok(handled) => log_handled(&handled),
            Err(e) => {
                let timestamp = timestamp_prefix(&content, config.output.show_timestamp);
                eprintln!("{timestamp}Error: {e}");
                eprintln!("{timestamp}The cleaned content could not be written back to clipboard");
            }
        }
    })?;

    Ok(ExitCode::SUCCESS)
}
