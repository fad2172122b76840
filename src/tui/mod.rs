//! Terminal user interface for the board.
//!
//! Three panels share the screen:
//! - Left: the current grid as a 3×3 board, or the 9×9 overview
//! - Right top: detail of the current grid (entries, needs-review, mandala)
//! - Right bottom: search keyword, filters and results
//!
//! The transcript editor, segment log, help and toasts are drawn as
//! overlays. Built with ratatui on the crossterm backend.

mod app;
mod components;
mod events;
mod state;
mod theme;

pub use app::{run, TuiOptions};
pub use state::{AppState, Focus};
pub use theme::{available_themes, Theme};
