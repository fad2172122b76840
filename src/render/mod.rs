//! View models for the board.
//!
//! Each builder is a pure function from store state to a plain struct the
//! TUI draws with ratatui and the CLI prints as text or JSON. Nothing here
//! touches the terminal.

pub mod board;
pub mod detail;
pub mod ingest;
pub mod search;

pub use board::{
    board_view, breadcrumb, overview_view, BoardCard, BoardView, CardKind, MiniCell, OverviewCell,
    OverviewView,
};
pub use detail::{detail_view, detail_view_for, entry_meta, log_lines, DetailView, EntryLine, LogLine};
pub use ingest::{ingest_rows, IngestRow};
pub use search::{results_view, ResultLine, ResultsView};
