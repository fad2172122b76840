//! Grids command implementation.
//!
//! Lists the loaded grids with their entry and review counts.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::{Cli, GridsArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::flows::GridSource;
use crate::model::{Grid, GridId};

use super::{tsv_cell, Session};

/// One row of the grid listing.
#[derive(Debug, Serialize)]
struct GridInfo<'a> {
    grid_id: GridId,
    title: &'a str,
    persona: &'a str,
    entries: usize,
    needs_review: usize,
    updated_at: &'a str,
}

impl<'a> From<&'a Grid> for GridInfo<'a> {
    fn from(grid: &'a Grid) -> Self {
        Self {
            grid_id: grid.grid_id,
            title: &grid.title,
            persona: &grid.persona,
            entries: grid.entries.len(),
            needs_review: grid.needs_review_count,
            updated_at: &grid.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct GridListing<'a> {
    #[serde(flatten)]
    source: GridSource,
    grids: Vec<GridInfo<'a>>,
}

/// Run the grids command.
pub fn run(cli: &Cli, config: &Config, args: &GridsArgs) -> Result<()> {
    let session = Session::open(cli, config)?;
    let grids: Vec<GridInfo> = session
        .store
        .state()
        .grids
        .iter()
        .filter(|g| !args.needs_review || g.needs_review_count > 0)
        .map(GridInfo::from)
        .collect();

    let mut out = io::stdout().lock();
    match cli.effective_output() {
        OutputFormat::Json => {
            let listing = GridListing {
                source: session.source,
                grids,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "grid_id\ttitle\tpersona\tentries\tneeds_review\tupdated_at")?;
            for g in &grids {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    g.grid_id,
                    tsv_cell(g.title),
                    tsv_cell(g.persona),
                    g.entries,
                    g.needs_review,
                    g.updated_at
                )?;
            }
        }
        OutputFormat::Compact => {
            for g in &grids {
                writeln!(out, "{}", g.grid_id)?;
            }
        }
        OutputFormat::Text => {
            if grids.is_empty() {
                writeln!(out, "No grids found.")?;
                return Ok(());
            }

            writeln!(out, "Grids ({} from {}):", grids.len(), session.source)?;
            writeln!(out)?;
            for g in &grids {
                writeln!(out, "  #{:<3} {}", g.grid_id, g.title)?;
                let mut counts = format!("{} entries", g.entries);
                if g.needs_review > 0 {
                    counts.push_str(&format!(", {} needs review", g.needs_review));
                }
                if !g.updated_at.is_empty() {
                    counts.push_str(&format!(", updated {}", g.updated_at));
                }
                writeln!(out, "       {} · {counts}", g.persona)?;
            }
        }
    }

    Ok(())
}
