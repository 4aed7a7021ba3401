//! Clean command implementation.
//!
//! Script mode: reads a file or stdin, writes the cleaned trace to stdout.
//! Anything that is not a stack trace passes through verbatim unless
//! `--strict` is given.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing::debug;

use crate::cli::CleanArgs;
use crate::config::{Config, ScriptFormat};
use crate::error::{Result, TraceTrimError};
use crate::model::{CleanOutcome, CleanResult};
use crate::report;
use crate::trace::TraceAnalyzer;
use crate::util::atomic_write;

use super::read_input;

/// Why input was not analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Skipped {
    /// Nothing but whitespace.
    Empty,
    /// Larger than the configured limit.
    TooLarge { size: usize, limit: usize },
    /// Not valid UTF-8.
    NotText,
}

impl From<Skipped> for TraceTrimError {
    fn from(skipped: Skipped) -> Self {
        match skipped {
            Skipped::Empty => Self::EmptyInput,
            Skipped::TooLarge { size, limit } => Self::ContentTooLarge { size, limit },
            Skipped::NotText => Self::InvalidInput {
                reason: "input is not valid UTF-8".to_string(),
            },
        }
    }
}

/// Analyze raw input, or say why it was skipped.
pub(crate) fn evaluate(
    analyzer: &TraceAnalyzer,
    max_size: usize,
    input: &[u8],
) -> std::result::Result<CleanResult, Skipped> {
    if input.len() > max_size {
        return Err(Skipped::TooLarge {
            size: input.len(),
            limit: max_size,
        });
    }
    let text = std::str::from_utf8(input).map_err(|_| Skipped::NotText)?;
    if text.trim().is_empty() {
        return Err(Skipped::Empty);
    }
    Ok(analyzer.analyze(text))
}

/// Unanalyzed result for skipped input, so every format still has output.
pub(crate) fn passthrough(input: &[u8]) -> CleanResult {
    let text = String::from_utf8_lossy(input);
    CleanResult::assemble(&text, CleanOutcome::unchanged(&text), None)
}

/// Render a result in the requested format.
pub(crate) fn render(result: &CleanResult, format: ScriptFormat) -> Result<String> {
    Ok(match format {
        ScriptFormat::Cleaned => result.cleaned.clone(),
        ScriptFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        ScriptFormat::Stats => report::stats_block(result),
    })
}

/// Run the clean command.
pub fn run(config: &Config, args: &CleanArgs) -> Result<ExitCode> {
    let analyzer = TraceAnalyzer::with_options(config.parser.clone())?;
    let input = read_input(args.file.as_deref())?;
    let format = args
        .format
        .map_or(config.script.output_format, ScriptFormat::from);
    let strict = args.strict || config.script.exit_code_on_error;
    let verbose = config.output.verbose;

    let result = match evaluate(&analyzer, config.clipboard.max_content_size, &input) {
        Ok(result) => result,
        Err(skipped) => {
            debug!(?skipped, "Input skipped");
            if verbose {
                match &skipped {
                    Skipped::Empty => eprintln!("No input content provided"),
                    Skipped::TooLarge { size, .. } => {
                        eprintln!("Content too large ({size} bytes), skipping");
                    }
                    Skipped::NotText => eprintln!("Input is not valid UTF-8, skipping"),
                }
            }
            if strict {
                return Err(skipped.into());
            }
            if !args.in_place {
                let mut out = io::stdout().lock();
                match format {
                    ScriptFormat::Cleaned => out.write_all(&input)?,
                    _ => out.write_all(render(&passthrough(&input), format)?.as_bytes())?,
                }
                out.flush()?;
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    if result.error_info.is_none() {
        if strict {
            return Err(TraceTrimError::NoStackTrace);
        }
        if verbose {
            eprintln!("No stack trace detected in input, passing through verbatim");
        }
    }

    if args.in_place {
        if let Some(path) = &args.file {
            if result.is_changed() {
                atomic_write(path, result.cleaned.as_bytes())?;
                if !config.output.quiet {
                    eprintln!(
                        "Cleaned {}: {}",
                        path.display(),
                        report::stats_parts(&result).join(", ")
                    );
                }
            } else if verbose {
                eprintln!("No changes needed - {} is already clean", path.display());
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let rendered = render(&result, format)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}
