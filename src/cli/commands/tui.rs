//! TUI launcher command.
//!
//! Launches the interactive board.

use crate::cli::{Cli, TuiArgs};
use crate::config::Config;
use crate::error::Result;
use crate::tui::{self, TuiOptions};

use super::{build_runtime, connect_api};

/// Run the TUI command.
pub fn run(cli: &Cli, config: &Config, args: &TuiArgs) -> Result<()> {
    let options = TuiOptions {
        start_grid: args.grid,
        view: args.view.map(Into::into),
        theme: args.theme.clone(),
        ascii: args.ascii,
    };
    tui::run(connect_api(cli, config)?, build_runtime()?, config, options)
}
