//! Command-line interface for mandala-board.
//!
//! Provides the interactive board plus scriptable access to the same data:
//! - `tui`: interactive board
//! - `grids`: list grids
//! - `show`: print one grid, or the overview
//! - `search`: search entries
//! - `ingest`: submit a transcript
//! - `log`: print a segment's change log

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::model::{EntryStatus, GridId};
use crate::store::ViewMode;

/// Terminal client for the Mandala strategy board.
#[derive(Debug, Parser)]
#[command(name = "mandala")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL including the `/api` prefix.
    #[arg(long, global = true, env = "MANDALA_API_URL")]
    pub api_url: Option<String>,

    /// Skip the backend entirely and use the built-in grids.
    #[arg(long, global = true, env = "MANDALA_OFFLINE")]
    pub offline: bool,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "MANDALA_OUTPUT")]
    pub output: OutputFormat,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "MANDALA_JSON")]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "MANDALA_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "MANDALA_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Log output file (default: stderr).
    #[arg(long, global = true, env = "MANDALA_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "MANDALA_CONFIG")]
    pub config: Option<PathBuf>,
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
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Apply flag and environment overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url.clone_from(url);
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Launch the interactive board.
    #[command(alias = "ui")]
    Tui(TuiArgs),

    /// List grids.
    #[command(alias = "ls")]
    Grids(GridsArgs),

    /// Print one grid as a board with its detail.
    Show(ShowArgs),

    /// Search entries across grids.
    #[command(alias = "s", alias = "find")]
    Search(SearchArgs),

    /// Submit a transcript for classification.
    Ingest(IngestArgs),

    /// Print a segment's change log.
    Log(LogArgs),

    /// View and initialize configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the tui command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TuiArgs {
    /// Grid to open instead of the root.
    #[arg(short, long)]
    pub grid: Option<GridId>,

    /// Initial view.
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    /// Theme (dark, light, high-contrast).
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Use ASCII markers instead of Unicode.
    #[arg(long)]
    pub ascii: bool,
}

/// Board view selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    /// One grid's 3×3 board.
    Single,
    /// The 9×9 overview.
    Overview,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Single => ViewMode::Single,
            ViewArg::Overview => ViewMode::Overview,
        }
    }
}

/// Arguments for the grids command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GridsArgs {
    /// Only grids with entries awaiting review.
    #[arg(long)]
    pub needs_review: bool,
}

/// Arguments for the show command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Grid to print.
    #[arg(default_value_t = crate::model::ROOT_GRID_ID)]
    pub grid_id: GridId,

    /// Print the 9×9 overview instead.
    #[arg(long)]
    pub overview: bool,
}

/// Arguments for the search command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SearchArgs {
    /// Keyword matched against snippets and sources (case-insensitive).
    #[arg(default_value = "")]
    pub keyword: String,

    /// Only entries of this grid.
    #[arg(short, long)]
    pub grid: Option<GridId>,

    /// Only entries with this status.
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,
}

/// Entry status selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Freshly classified.
    NewEntry,
    /// Awaiting review.
    NeedsReview,
}

impl From<StatusArg> for EntryStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::NewEntry => EntryStatus::NewEntry,
            StatusArg::NeedsReview => EntryStatus::NeedsReview,
        }
    }
}

/// Arguments for the ingest command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct IngestArgs {
    /// Transcript file (reads stdin when omitted or `-`).
    pub file: Option<PathBuf>,

    /// Source label for the segments.
    #[arg(short, long)]
    pub source: Option<String>,

    /// Split and print the segments without submitting.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the log command.
#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Segment id.
    pub segment_id: String,
}

/// Arguments for the config command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Config action.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Print the configuration file path.
    Path,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
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

/// Generate shell completions.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "mandala", &mut io::stdout());
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Tab-separated values.
    Tsv,
    /// Identifiers only, one per line.
    Compact,
}

/// Initialize logging based on CLI options.
fn init_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    // The TUI owns the terminal, so a log file keeps output off the screen
    let (writer, ansi) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| BoardError::io(format!("Failed to open log file: {}", path.display()), e))?;
            (BoxMakeWriter::new(std::sync::Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(writer);
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
                .with_ansi(ansi)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_ansi(ansi).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
    Ok(())
}

/// Load the configuration named by `--config`, or the default one.
fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
            Config::default()
        }),
        None => Config::load().unwrap_or_default(),
    };
    cli.apply_overrides(&mut config);
    config
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = load_config(&cli);

    match &cli.command {
        Commands::Tui(args) => commands::tui::run(&cli, &config, args),
        Commands::Grids(args) => commands::grids::run(&cli, &config, args),
        Commands::Show(args) => commands::show::run(&cli, &config, args),
        Commands::Search(args) => commands::search::run(&cli, &config, args),
        Commands::Ingest(args) => commands::ingest::run(&cli, &config, args),
        Commands::Log(args) => commands::log::run(&cli, &config, args),
        Commands::Config(args) => commands::config::run(&cli, &config, args),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_format_variants() {
        assert_eq!(LogFormat::default(), LogFormat::Text);
        assert_eq!(LogLevel::default().to_filter_string(), "warn");
        assert_eq!(LogLevel::Trace.to_filter_string(), "trace");
    }

    #[test]
    fn test_effective_output_and_overrides() {
        let cli = Cli::parse_from([
            "mandala",
            "--json",
            "--api-url",
            "http://board.test/api",
            "search",
            "coach",
            "--status",
            "needs-review",
        ]);
        assert_eq!(cli.effective_output(), OutputFormat::Json);

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.base_url, "http://board.test/api");

        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.keyword, "coach");
                assert_eq!(args.status.map(EntryStatus::from), Some(EntryStatus::NeedsReview));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_show_defaults_to_root() {
        let cli = Cli::parse_from(["mandala", "show"]);
        match cli.command {
            Commands::Show(args) => {
                assert_eq!(args.grid_id, 5);
                assert!(!args.overview);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_tui_view_arg() {
        let cli = Cli::parse_from(["mandala", "ui", "--view", "overview", "--grid", "3"]);
        match cli.command {
            Commands::Tui(args) => {
                assert_eq!(args.view.map(ViewMode::from), Some(ViewMode::Overview));
                assert_eq!(args.grid, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
