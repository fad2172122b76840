//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic. Commands share one board session: a
//! current-thread tokio runtime, the API client, and a store loaded the
//! same way the TUI loads it (API first, built-in grids on failure).

pub mod config;
pub mod grids;
pub mod ingest;
pub mod log;
pub mod search;
pub mod show;
pub mod tui;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::api::{connect, BoardApi};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::flows::{load_grids, GridSource};
use crate::store::BoardStore;

/// Build the runtime that drives API calls.
pub fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BoardError::io("Failed to start async runtime", e))
}

/// Connect to the API named by the config, or the offline stand-in.
pub fn connect_api(cli: &Cli, config: &Config) -> Result<Box<dyn BoardApi>> {
    debug!(base_url = %config.api.base_url, offline = cli.offline, "connecting");
    connect(&config.api, cli.offline)
}

/// A loaded board for one-shot commands.
pub struct Session {
    /// Runtime driving API calls.
    pub runtime: Runtime,
    /// API client.
    pub api: Box<dyn BoardApi>,
    /// Store holding the loaded grids.
    pub store: BoardStore,
    /// Where the grids came from.
    pub source: GridSource,
}

impl Session {
    /// Connect and load grids.
    pub fn open(cli: &Cli, config: &Config) -> Result<Self> {
        let runtime = build_runtime()?;
        let api = connect_api(cli, config)?;
        let mut store = BoardStore::new();
        let source = runtime.block_on(load_grids(api.as_ref(), &mut store))?;
        Ok(Self {
            runtime,
            api,
            store,
            source,
        })
    }
}

/// Escape tabs and newlines for TSV cells.
pub fn tsv_cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
