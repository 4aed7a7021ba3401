//! Config command implementation.
//!
//! Inspect, initialize and validate tracetrim configuration.

use std::path::{Path, PathBuf};

use crate::cli::{load_config, Cli, ConfigAction, ConfigArgs};
use crate::config::{default_config_path, Config, PROJECT_CONFIG_FILENAME};
use crate::error::{Result, TraceTrimError};

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show { json } => show_config(cli, *json),
        ConfigAction::Path => show_config_path(cli),
        ConfigAction::Init { project, force } => init_config(*project, *force),
        ConfigAction::Validate => validate_config(cli),
    }
}

/// Show the effective configuration.
fn show_config(cli: &Cli, json: bool) -> Result<()> {
    let config = load_config(cli)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        let toml = toml::to_string_pretty(&config).map_err(|e| TraceTrimError::ConfigError {
            message: format!("Failed to serialize config: {e}"),
        })?;
        print!("{toml}");
    }

    Ok(())
}

/// Show where configuration is read from.
fn show_config_path(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        println!("{} (--config)", describe(path));
        return Ok(());
    }

    println!("{}", describe(&default_config_path()?));
    println!("{}", describe(&project_config_path()?));
    Ok(())
}

/// Write a configuration file with default values.
fn init_config(project: bool, force: bool) -> Result<()> {
    let path = if project {
        project_config_path()?
    } else {
        default_config_path()?
    };

    if path.exists() && !force {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'tracetrim config init --force' to overwrite it.");
        return Ok(());
    }

    Config::default().save_to(&path)?;
    println!("Created configuration file at: {}", path.display());

    Ok(())
}

/// Load and validate the configuration.
fn validate_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    if !cli.quiet {
        println!("Configuration is valid");
        if cli.verbose {
            println!(
                "  {} custom pattern(s), polling every {}ms",
                config.parser.custom_patterns.len(),
                config.clipboard.polling_interval_ms
            );
        }
    }
    Ok(())
}

fn project_config_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| TraceTrimError::io("Failed to determine current directory", e))?;
    Ok(cwd.join(PROJECT_CONFIG_FILENAME))
}

fn describe(path: &Path) -> String {
    let state = if path.exists() { "found" } else { "not found" };
    format!("{} [{state}]", path.display())
}
