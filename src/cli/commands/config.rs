//! Config command implementation.
//!
//! Shows the effective configuration, its path, or writes a default file.

use std::path::PathBuf;

use crate::cli::{Cli, ConfigAction, ConfigArgs, OutputFormat};
use crate::config::{default_config_path, Config};
use crate::error::{BoardError, Result};

/// Run the config command.
pub fn run(cli: &Cli, config: &Config, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, config),
        ConfigAction::Path => show_config_path(cli),
        ConfigAction::Init { force } => init_config(cli, *force),
    }
}

/// Path the config is read from: `--config`, or the default location.
fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Show the effective configuration, flag overrides included.
fn show_config(cli: &Cli, config: &Config) -> Result<()> {
    match cli.effective_output() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        _ => {
            let toml = toml::to_string_pretty(config).map_err(|e| BoardError::InvalidConfig {
                message: format!("Failed to serialize config: {e}"),
            })?;
            print!("{toml}");
        }
    }
    Ok(())
}

/// Show the config file path.
fn show_config_path(cli: &Cli) -> Result<()> {
    let path = config_path(cli)?;
    match cli.effective_output() {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": path.display().to_string(),
                "exists": path.exists(),
            });
            println!("{json}");
        }
        _ => println!("{}", path.display()),
    }
    Ok(())
}

/// Write a default configuration file.
fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli)?;
    if path.exists() && !force {
        return Err(BoardError::ConfigError {
            message: format!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            ),
        });
    }

    Config::default().save_to(&path)?;
    println!("Created configuration file: {}", path.display());
    Ok(())
}
