//! mandala-board: terminal client for the Mandala strategy board.
//!
//! The board organizes strategic notes into nine thematic grids laid out
//! as a 3×3 mandala. The root grid's eight surrounding items each lead to a
//! sub-grid; transcripts are split into segments, posted to a backend for
//! classification, and the classified entries appear in their grids.
//!
//! # Features
//!
//! - **Drill-down navigation** with a back-stack and breadcrumb
//! - **Overview** of the root grid and its eight sub-grids at once
//! - **Transcript ingestion** with fresh-entry highlighting
//! - **Entry search** by keyword, grid and status
//! - **Offline fallback**: a built-in dataset replaces an unreachable API
//! - **Dual interface**: interactive TUI and scriptable CLI
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mandala_board::api::OfflineApi;
//! use mandala_board::flows::{apply_search, load_grids, SearchFilter};
//! use mandala_board::store::{actions, BoardStore};
//!
//! # async fn demo() -> mandala_board::Result<()> {
//! let api = OfflineApi;
//! let mut store = BoardStore::new();
//! let source = load_grids(&api, &mut store).await?;
//! println!("loaded {source}");
//!
//! actions::drill_down(&mut store, 2);
//! println!("{}", store.get_stack_path());
//!
//! let hits = apply_search(&mut store, &SearchFilter::keyword("meeting"));
//! println!("{hits} hits");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`model`]: grids, entries, mandalas, segments and the built-in dataset
//! - [`store`]: the single board state with navigation actions
//! - [`api`]: HTTP client for the board backend
//! - [`flows`]: grid loading, transcript submission, search, segment logs
//! - [`render`]: pure view models shared by the TUI and CLI
//! - [`tui`]: interactive terminal interface
//! - [`cli`]: command-line interface
//! - [`config`]: configuration management
//! - [`error`]: error types and exit codes

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod flows;
pub mod model;
pub mod render;
pub mod store;
pub mod tui;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{BoardError, Result};
pub use model::{Grid, GridId, ROOT_GRID_ID};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::api::{connect, ApiClient, BoardApi, OfflineApi};
    pub use crate::error::{BoardError, Result};
    pub use crate::flows::{load_grids, submit_transcript, SearchFilter, SubmissionRequest};
    pub use crate::model::{Entry, EntryStatus, Grid, GridId, ROOT_GRID_ID};
    pub use crate::store::{BoardState, BoardStore, ViewMode};
}
