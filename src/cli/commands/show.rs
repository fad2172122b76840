//! Show command implementation.
//!
//! Prints one grid as a 3×3 board followed by its detail, or the 9×9
//! overview of the root grid.

use std::io::{self, Write};

use crate::cli::{Cli, OutputFormat, ShowArgs};
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::flows::refresh_grid;
use crate::render::{self, BoardView, CardKind, DetailView, EntryLine, OverviewView};
use crate::store::actions::jump_to_grid;

use super::{tsv_cell, Session};

/// Run the show command.
pub fn run(cli: &Cli, config: &Config, args: &ShowArgs) -> Result<()> {
    let mut session = Session::open(cli, config)?;
    let mut out = io::stdout().lock();

    if args.overview {
        let overview = render::overview_view(session.store.state()).ok_or_else(|| {
            BoardError::GridNotFound {
                grid_id: crate::model::ROOT_GRID_ID,
            }
        })?;
        return print_overview(cli, &overview, &mut out);
    }

    // Use the grid's own record when the API is up.
    if !session.source.is_fallback() {
        session.runtime.block_on(refresh_grid(
            session.api.as_ref(),
            &mut session.store,
            args.grid_id,
        ));
    }

    if session.store.get_grid(args.grid_id).is_none() {
        return Err(BoardError::GridNotFound {
            grid_id: args.grid_id,
        });
    }
    jump_to_grid(&mut session.store, args.grid_id);

    let state = session.store.state();
    let (Some(board), Some(detail)) = (render::board_view(state), render::detail_view(state)) else {
        return Err(BoardError::GridNotFound {
            grid_id: args.grid_id,
        });
    };

    match cli.effective_output() {
        OutputFormat::Json => {
            let json = serde_json::json!({ "board": board, "detail": detail });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "slot\tkind\tlabel\ttitle\ttarget\tfresh\tneeds_review")?;
            for card in &board.cards {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    card.slot,
                    kind_name(card.kind),
                    card.label,
                    tsv_cell(&card.title),
                    card.target_grid_id.map_or_else(String::new, |id| id.to_string()),
                    card.fresh,
                    card.needs_review
                )?;
            }
        }
        OutputFormat::Compact => {
            for id in detail.segment_ids() {
                writeln!(out, "{id}")?;
            }
        }
        OutputFormat::Text => {
            print_board(&board, &mut out)?;
            writeln!(out)?;
            print_detail(&detail, &mut out)?;
        }
    }

    Ok(())
}

const fn kind_name(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Center => "center",
        CardKind::Item => "item",
        CardKind::Empty => "empty",
    }
}

fn print_board<W: Write>(board: &BoardView, out: &mut W) -> Result<()> {
    writeln!(out, "#{} {}", board.grid_id, board.title)?;
    writeln!(out, "{}", board.breadcrumb)?;
    writeln!(out)?;

    for card in &board.cards {
        if card.kind == CardKind::Empty {
            writeln!(out, "  [{}] -", card.slot)?;
            continue;
        }
        let mut flags = String::new();
        if card.fresh {
            flags.push_str(" [fresh]");
        }
        if card.needs_review > 0 {
            flags.push_str(&format!(" [review {}]", card.needs_review));
        }
        writeln!(out, "  [{}] {:<4} {}{flags}", card.slot, card.label, card.title)?;
        if !card.detail.is_empty() {
            writeln!(out, "           {}", card.detail)?;
        }
        if !card.note.is_empty() {
            writeln!(out, "           ({})", card.note)?;
        }
    }
    Ok(())
}

fn print_entries<W: Write>(entries: &[EntryLine], out: &mut W) -> Result<()> {
    for entry in entries {
        let fresh = if entry.fresh { "* " } else { "" };
        writeln!(out, "  - {fresh}{}", entry.snippet)?;
        writeln!(out, "    {} · {}", entry.segment_id, entry.meta)?;
    }
    Ok(())
}

fn print_detail<W: Write>(detail: &DetailView, out: &mut W) -> Result<()> {
    match detail.review_badge() {
        Some(badge) => writeln!(out, "{} ({badge})", detail.persona)?,
        None => writeln!(out, "{}", detail.persona)?,
    }
    for point in &detail.summary {
        writeln!(out, "  • {point}")?;
    }

    writeln!(out)?;
    writeln!(out, "Entries ({}):", detail.entries.len())?;
    print_entries(&detail.entries, out)?;

    writeln!(out)?;
    writeln!(out, "Needs review:")?;
    if detail.needs_review.is_empty() {
        writeln!(out, "  {}", render::detail::NO_REVIEW_PLACEHOLDER)?;
    } else {
        print_entries(&detail.needs_review, out)?;
    }

    if let Some(mandala) = &detail.mandala {
        writeln!(out)?;
        writeln!(out, "Mandala: {}", mandala.center_title)?;
        if !mandala.center.is_empty() {
            writeln!(out, "  {}", mandala.center)?;
        }
        for item in &mandala.items {
            writeln!(out, "  - {}: {}", item.title, item.detail)?;
        }
    }
    Ok(())
}

fn print_overview<W: Write>(cli: &Cli, overview: &OverviewView, out: &mut W) -> Result<()> {
    match cli.effective_output() {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(overview)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "slot\tgrid_id\theader\tfresh\thas_review")?;
            for cell in &overview.cells {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    cell.slot,
                    cell.grid_id.map_or_else(String::new, |id| id.to_string()),
                    tsv_cell(&cell.header),
                    cell.fresh,
                    cell.has_review
                )?;
            }
        }
        OutputFormat::Compact => {
            for id in overview.cells.iter().filter_map(|c| c.grid_id) {
                writeln!(out, "{id}")?;
            }
        }
        OutputFormat::Text => {
            for cell in &overview.cells {
                if cell.grid_id.is_none() {
                    writeln!(out, "[{}] -", cell.slot)?;
                    continue;
                }
                let mut flags = String::new();
                if cell.fresh {
                    flags.push_str(" [fresh]");
                }
                if cell.has_review {
                    flags.push_str(" [review]");
                }
                writeln!(out, "[{}] {}{flags}", cell.slot, cell.header)?;
                if !cell.content.is_empty() {
                    writeln!(out, "    {}", cell.content)?;
                }
                for row in cell.minis.chunks(3) {
                    let texts: Vec<&str> = row.iter().map(|m| m.text.as_str()).collect();
                    writeln!(out, "    {}", texts.join(" | "))?;
                }
            }
        }
    }
    Ok(())
}
