//! Check command implementation.

use std::process::ExitCode;

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::model::{ErrorInfo, StackTraceKind};
use crate::trace::TraceAnalyzer;

use super::read_input;

/// Summary of input that was recognized as a stack trace.
pub(crate) fn detect(analyzer: &TraceAnalyzer, input: &[u8]) -> Option<(StackTraceKind, ErrorInfo)> {
    let text = std::str::from_utf8(input).ok()?;
    let info = analyzer.extract_info(text)?;
    Some((StackTraceKind::detect(Some(&info), text), info))
}

/// Run the check command.
pub fn run(config: &Config, args: &CheckArgs) -> Result<ExitCode> {
    let analyzer = TraceAnalyzer::with_options(config.parser.clone())?;
    let input = read_input(args.file.as_deref())?;

    match detect(&analyzer, &input) {
        Some((kind, info)) => {
            if !config.output.quiet {
                println!("{kind} stack trace detected");
            }
            if config.output.verbose {
                println!("  Message:   {}", info.message);
                if let Some(source) = &info.source {
                    println!("  Source:    {source}");
                }
                if let Some(component) = &info.component {
                    println!("  Component: {component}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            if !config.output.quiet {
                println!("No stack trace detected");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
