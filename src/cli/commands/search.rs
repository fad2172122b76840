//! Search command implementation.
//!
//! Searches entries across all grids by keyword, grid and status.

use std::io::{self, Write};

use crate::cli::{Cli, OutputFormat, SearchArgs};
use crate::config::Config;
use crate::error::Result;
use crate::flows::{apply_search, SearchFilter};
use crate::render;

use super::{tsv_cell, Session};

/// Run the search command.
pub fn run(cli: &Cli, config: &Config, args: &SearchArgs) -> Result<()> {
    let mut session = Session::open(cli, config)?;
    let filter = SearchFilter {
        keyword: args.keyword.clone(),
        grid_id: args.grid,
        status: args.status.map(Into::into),
    };
    apply_search(&mut session.store, &filter);

    let hits = &session.store.state().search_results;
    let mut out = io::stdout().lock();
    match cli.effective_output() {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(hits)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "grid_id\tsegment_id\tstatus\tsource\tconfidence\tsnippet")?;
            for hit in hits {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    hit.grid_id,
                    hit.entry.segment_id,
                    hit.entry.status,
                    tsv_cell(&hit.entry.source),
                    hit.entry.confidence,
                    tsv_cell(&hit.entry.snippet)
                )?;
            }
        }
        OutputFormat::Compact => {
            for hit in hits {
                writeln!(out, "{}", hit.entry.segment_id)?;
            }
        }
        OutputFormat::Text => {
            let view = render::results_view(session.store.state());
            writeln!(out, "{}", view.count_label)?;
            for item in &view.items {
                writeln!(out)?;
                writeln!(out, "  {}  [{}]", item.heading, item.segment_id)?;
                writeln!(out, "    {}", item.snippet)?;
            }
        }
    }

    Ok(())
}
