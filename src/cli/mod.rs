//! Command-line interface for tracetrim.
//!
//! Commands:
//! - `watch`: clean stack traces as they are copied to the clipboard
//! - `clean`: script mode, clean a file or stdin to stdout
//! - `check`: report whether input is a stack trace
//! - `config`: inspect or initialize configuration
//! - `completions`: generate shell completions
//!
//! Without a subcommand tracetrim picks `clean` on stdin when it runs in a
//! pipeline or CI job, and `watch` otherwise.

mod commands;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::config::{Config, ScriptFormat};
use crate::error::{Result, TraceTrimError};

/// Collapse repeated frames in JavaScript and React stack traces.
#[derive(Debug, Parser)]
#[command(name = "tracetrim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run (default: auto-detect `clean` or `watch`).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom configuration file.
    #[arg(short = 'c', long, global = true, env = "TRACETRIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short = 'v', long, global = true, env = "TRACETRIM_VERBOSE")]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true, env = "TRACETRIM_QUIET")]
    pub quiet: bool,

    /// Do not prefix notifications with a timestamp.
    #[arg(long, global = true, env = "TRACETRIM_NO_TIMESTAMP")]
    pub no_timestamp: bool,

    /// Stack-like lines needed before content counts as a trace.
    #[arg(long, global = true, env = "TRACETRIM_MIN_STACK_LINES")]
    pub min_stack_lines: Option<usize>,

    /// Content shorter than this many bytes is never a trace.
    #[arg(long, global = true, env = "TRACETRIM_MIN_TRACE_LENGTH")]
    pub min_trace_length: Option<usize>,

    /// Extra detection regex (repeatable).
    #[arg(long = "custom-pattern", global = true, value_name = "REGEX")]
    pub custom_patterns: Vec<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "TRACETRIM_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "TRACETRIM_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Apply flag and environment overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.verbose {
            config.output.verbose = true;
        }
        if self.quiet {
            config.output.quiet = true;
        }
        if self.no_timestamp {
            config.output.show_timestamp = false;
        }
        if let Some(lines) = self.min_stack_lines {
            config.parser.min_detection_lines = lines;
        }
        if let Some(length) = self.min_trace_length {
            config.parser.min_content_length = length;
        }
        config
            .parser
            .custom_patterns
            .extend(self.custom_patterns.iter().cloned());
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Watch the clipboard and clean stack traces as they are copied.
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Clean a stack trace from a file or stdin and write it to stdout.
    Clean(CleanArgs),

    /// Exit 0 if the input is a stack trace, 1 otherwise.
    Check(CheckArgs),

    /// View and initialize configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the watch command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct WatchArgs {
    /// Process the current clipboard contents once and exit.
    #[arg(long)]
    pub once: bool,

    /// Polling interval in milliseconds (overrides configuration).
    #[arg(short = 'i', long)]
    pub interval: Option<u64>,
}

/// Arguments for the clean command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CleanArgs {
    /// Input file (default: stdin).
    pub file: Option<PathBuf>,

    /// Output format (overrides configuration).
    #[arg(short = 'f', long)]
    pub format: Option<CleanFormatArg>,

    /// Rewrite FILE with the cleaned content instead of printing it.
    #[arg(short = 'i', long, requires = "file", conflicts_with = "format")]
    pub in_place: bool,

    /// Fail when the input is empty, too large or not a stack trace.
    #[arg(long)]
    pub strict: bool,
}

/// Output format argument for `clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CleanFormatArg {
    /// Cleaned text only.
    Cleaned,
    /// Full result as JSON.
    Json,
    /// Statistics summary.
    Stats,
}

impl From<CleanFormatArg> for ScriptFormat {
    fn from(arg: CleanFormatArg) -> Self {
        match arg {
            CleanFormatArg::Cleaned => Self::Cleaned,
            CleanFormatArg::Json => Self::Json,
            CleanFormatArg::Stats => Self::Stats,
        }
    }
}

/// Arguments for the check command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Input file (default: stdin).
    pub file: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Config action.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show {
        /// Print as JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },
    /// Show configuration file locations.
    Path,
    /// Write a configuration file with default values.
    Init {
        /// Write `.tracetrim.toml` in the current directory instead.
        #[arg(long)]
        project: bool,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Check the configuration for errors.
    Validate,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "tracetrim", &mut io::stdout());
}

/// Load configuration for this invocation.
///
/// An explicit `--config` file must exist; otherwise the global file is
/// merged with `.tracetrim.toml` in the working directory. Flags are applied
/// last and the result is validated.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| TraceTrimError::io("Failed to determine current directory", e))?;
            Config::load_for_project(&cwd)?
        }
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Whether tracetrim is running in a pipeline, redirect or CI job.
#[must_use]
pub fn is_non_interactive() -> bool {
    !io::stdin().is_terminal()
        || !io::stdout().is_terminal()
        || ci_environment(|key| std::env::var_os(key).is_some_and(|v| !v.is_empty()))
}

fn ci_environment(is_set: impl Fn(&str) -> bool) -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI"]
        .into_iter()
        .any(is_set)
}

/// Initialize logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Run the CLI application.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(&cli);

    // These must work even when the configuration file is broken.
    match &cli.command {
        Some(Commands::Config(args)) => {
            commands::config::run(&cli, args)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Completions(args)) => {
            generate_completions(args.shell);
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let config = load_config(&cli)?;

    match &cli.command {
        Some(Commands::Watch(args)) => commands::watch::run(&config, args),
        Some(Commands::Clean(args)) => commands::clean::run(&config, args),
        Some(Commands::Check(args)) => commands::check::run(&config, args),
        Some(Commands::Config(_) | Commands::Completions(_)) => Ok(ExitCode::SUCCESS),
        None => {
            if config.auto_detect_script_mode && is_non_interactive() {
                info!("Auto-detected non-interactive environment, switching to script mode");
                if config.output.verbose {
                    eprintln!("Auto-detected non-interactive environment, switching to script mode");
                }
                commands::clean::run(&config, &CleanArgs::default())
            } else {
                commands::watch::run(&config, &WatchArgs::default())
            }
        }
    }
}
