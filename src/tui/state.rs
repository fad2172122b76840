//! TUI application state.
//!
//! [`AppState`] wraps the board store with everything that only exists in
//! the terminal: slot selection, focus, the search form, the ingest editor,
//! the log modal and toasts. API calls run to completion on the owned tokio
//! runtime, so store mutations never interleave. A submission is queued by
//! the key handler and run by the event loop after the in-flight status has
//! been drawn.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::api::BoardApi;
use crate::config::{BoardConfig, Config};
use crate::error::Result;
use crate::flows::{
    apply_search, get_segment_log, load_grids, submit_transcript, GridSource, SearchFilter,
    SegmentStatus, SubmissionRequest,
};
use crate::model::{EntryStatus, GridId, IngestResult, CENTER_SLOT};
use crate::render::{self, LogLine};
use crate::store::actions::{can_go_back, drill_down, handle_back, jump_to_grid};
use crate::store::{BoardStore, ViewMode};

use super::theme::Theme;

/// Panel receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The 3×3 board or the overview.
    #[default]
    Board,
    /// The detail panel's entry list.
    Detail,
    /// The search results list.
    Search,
}

impl Focus {
    /// The next panel in Tab order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Board => Self::Detail,
            Self::Detail => Self::Search,
            Self::Search => Self::Board,
        }
    }

    /// Status bar label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Board => "BOARD",
            Self::Detail => "DETAIL",
            Self::Search => "SEARCH",
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message and severity.
    pub status: SegmentStatus,
    /// When it disappears.
    pub expires_at: Instant,
}

/// Search keyword and filters.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    /// Keyword being typed.
    pub keyword: String,
    /// Grid filter.
    pub grid_id: Option<GridId>,
    /// Status filter.
    pub status: Option<EntryStatus>,
    /// Keyword input has the keyboard.
    pub editing: bool,
    /// Highlighted result.
    pub selected: usize,
}

impl SearchForm {
    /// Filter for the current form values.
    pub fn filter(&self) -> SearchFilter {
        SearchFilter {
            keyword: self.keyword.clone(),
            grid_id: self.grid_id,
            status: self.status.clone(),
        }
    }

    /// One-line summary of the active filters.
    pub fn summary(&self) -> String {
        let grid = self
            .grid_id
            .map_or_else(|| "all grids".to_string(), |id| format!("grid #{id}"));
        let status = self
            .status
            .as_ref()
            .map_or("any status", EntryStatus::as_str);
        format!("{grid} · {status}")
    }
}

/// Which ingest field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestField {
    /// Transcript body.
    #[default]
    Text,
    /// Source label.
    Source,
}

/// Transcript editor overlay.
#[derive(Debug, Clone, Default)]
pub struct IngestEditor {
    /// Overlay is visible.
    pub open: bool,
    /// Transcript being typed.
    pub text: String,
    /// Source label.
    pub source: String,
    /// Field with the keyboard.
    pub field: IngestField,
    /// Results of the last successful submission.
    pub results: Vec<IngestResult>,
}

impl IngestEditor {
    fn field_mut(&mut self) -> &mut String {
        match self.field {
            IngestField::Text => &mut self.text,
            IngestField::Source => &mut self.source,
        }
    }
}

/// Segment history overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogModal {
    /// Segment shown.
    pub segment_id: String,
    /// Formatted history.
    pub lines: Vec<LogLine>,
}

/// Application state.
pub struct AppState {
    /// Board store.
    pub store: BoardStore,
    api: Box<dyn BoardApi>,
    runtime: Runtime,
    pending_submission: Option<SubmissionRequest>,
    /// Board timings and defaults.
    pub board_config: BoardConfig,
    /// Focused panel.
    pub focus: Focus,
    /// Selected slot (1..=9) on the board or overview.
    pub selected_slot: u8,
    /// Selected entry in the detail panel.
    pub detail_selected: usize,
    /// Search form.
    pub search: SearchForm,
    /// Ingest editor.
    pub ingest: IngestEditor,
    /// Open log modal.
    pub log: Option<LogModal>,
    /// Visible toasts, oldest first.
    pub toasts: Vec<Toast>,
    /// Inline status of the last submission.
    pub segment_status: Option<SegmentStatus>,
    /// Where the grids came from.
    pub grid_source: Option<GridSource>,
    /// Show help overlay.
    pub show_help: bool,
    /// Current theme.
    pub theme: Theme,
    /// Use Unicode markers.
    pub unicode: bool,
    /// Set when the loop should exit.
    pub should_quit: bool,
}

impl AppState {
    /// Create app state around an API and the runtime that drives it.
    pub fn new(api: Box<dyn BoardApi>, runtime: Runtime, config: &Config, theme: Theme) -> Self {
        Self {
            store: BoardStore::new(),
            api,
            runtime,
            pending_submission: None,
            board_config: config.board.clone(),
            focus: Focus::Board,
            selected_slot: CENTER_SLOT,
            detail_selected: 0,
            search: SearchForm::default(),
            ingest: IngestEditor {
                source: config.board.default_source.clone(),
                ..IngestEditor::default()
            },
            log: None,
            toasts: Vec::new(),
            segment_status: None,
            grid_source: None,
            show_help: false,
            theme,
            unicode: config.theme.unicode,
            should_quit: false,
        }
    }

    /// Load grids (API or built-in) and refresh the search results.
    pub fn load(&mut self) -> Result<GridSource> {
        let source = self
            .runtime
            .block_on(load_grids(self.api.as_ref(), &mut self.store))?;
        self.grid_source = Some(source);
        self.run_search();
        Ok(source)
    }

    /// Reload grids and announce where they came from.
    pub fn reload(&mut self, now: Instant) -> Result<()> {
        let source = self.load()?;
        self.push_toast(SegmentStatus::info(format!("Loaded {source}")), now);
        Ok(())
    }

    /// Drop expired fresh markers and toasts.
    pub fn tick(&mut self, now: Instant) {
        if self.store.expire_fresh(now) {
            debug!("fresh markers cleared");
        }
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    /// Show a toast for the configured duration.
    pub fn push_toast(&mut self, status: SegmentStatus, now: Instant) {
        self.toasts.push(Toast {
            status,
            expires_at: now + self.board_config.toast_duration(),
        });
    }

    /// Move the slot selection by whole cells, clamped to the 3×3 layout.
    pub fn move_selection(&mut self, dx: i8, dy: i8) {
        let index = self.selected_slot.saturating_sub(1);
        let (row, col) = (index / 3, index % 3);
        let clamp = |value: u8, delta: i8| value.saturating_add_signed(delta).min(2);
        self.selected_slot = clamp(row, dy) * 3 + clamp(col, dx) + 1;
    }

    /// Move the highlighted line of the focused list.
    pub fn move_list(&mut self, delta: isize) {
        let len = match self.focus {
            Focus::Detail => self.detail_segment_ids().len(),
            Focus::Search => self.store.state().search_results.len(),
            Focus::Board => return,
        };
        let selected = if self.focus == Focus::Detail {
            &mut self.detail_selected
        } else {
            &mut self.search.selected
        };
        if len == 0 {
            *selected = 0;
        } else {
            *selected = selected.saturating_add_signed(delta).min(len - 1);
        }
    }

    /// Cycle panel focus.
    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Act on the focused selection: drill in, jump, or open a log.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Board => self.activate_slot(),
            Focus::Detail => {
                let segment_id = self.detail_segment_ids().get(self.detail_selected).cloned();
                if let Some(segment_id) = segment_id {
                    self.open_log(&segment_id);
                }
            }
            Focus::Search => self.open_search_result(self.search.selected),
        }
    }

    fn activate_slot(&mut self) {
        match self.store.state().view_mode {
            ViewMode::Single => {
                let target = render::board_view(self.store.state())
                    .and_then(|view| view.card(self.selected_slot).and_then(|c| c.target_grid_id));
                if let Some(target) = target {
                    drill_down(&mut self.store, target);
                    self.after_navigation();
                }
            }
            ViewMode::Overview => {
                let target = render::overview_view(self.store.state())
                    .and_then(|view| view.cell(self.selected_slot).and_then(|c| c.grid_id));
                if let Some(target) = target {
                    jump_to_grid(&mut self.store, target);
                    self.store.set_view_mode(ViewMode::Single);
                    self.after_navigation();
                }
            }
        }
    }

    /// Back navigation. Leaves the overview first.
    pub fn back(&mut self) {
        if self.store.state().view_mode == ViewMode::Overview {
            self.store.set_view_mode(ViewMode::Single);
        } else if can_go_back(self.store.state()) {
            handle_back(&mut self.store);
            self.after_navigation();
        }
    }

    /// Jump straight to a grid.
    pub fn jump_to(&mut self, grid_id: GridId) {
        jump_to_grid(&mut self.store, grid_id);
        self.after_navigation();
    }

    /// Switch between the 3×3 board and the overview.
    pub fn toggle_view(&mut self) {
        self.store.toggle_view_mode();
        self.selected_slot = CENTER_SLOT;
    }

    fn after_navigation(&mut self) {
        self.selected_slot = CENTER_SLOT;
        self.detail_selected = 0;
    }

    /// Segment ids of the current grid's detail panel, in display order.
    pub fn detail_segment_ids(&self) -> Vec<String> {
        render::detail_view(self.store.state())
            .map(|view| view.segment_ids().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    /// Re-run the search with the current form values.
    pub fn run_search(&mut self) {
        let count = apply_search(&mut self.store, &self.search.filter());
        self.search.selected = self.search.selected.min(count.saturating_sub(1));
    }

    /// Start typing a keyword.
    pub fn start_search(&mut self) {
        self.search.editing = true;
        self.focus = Focus::Search;
    }

    /// Append to the keyword.
    pub fn search_input(&mut self, c: char) {
        self.search.keyword.push(c);
        self.run_search();
    }

    /// Delete the last keyword character.
    pub fn search_backspace(&mut self) {
        self.search.keyword.pop();
        self.run_search();
    }

    /// Stop typing, keeping the results.
    pub fn finish_search(&mut self) {
        self.search.editing = false;
    }

    /// Cycle the grid filter through "all" and every loaded grid.
    pub fn cycle_grid_filter(&mut self) {
        let ids: Vec<GridId> = self.store.state().grids.iter().map(|g| g.grid_id).collect();
        self.search.grid_id = match self.search.grid_id {
            None => ids.first().copied(),
            Some(current) => ids
                .iter()
                .position(|id| *id == current)
                .and_then(|i| ids.get(i + 1).copied()),
        };
        self.run_search();
    }

    /// Cycle the status filter: any, new entry, needs review.
    pub fn cycle_status_filter(&mut self) {
        self.search.status = match self.search.status {
            None => Some(EntryStatus::NewEntry),
            Some(EntryStatus::NewEntry) => Some(EntryStatus::NeedsReview),
            Some(_) => None,
        };
        self.run_search();
    }

    /// Jump to the grid of a search result and highlight its entry.
    pub fn open_search_result(&mut self, index: usize) {
        let Some(hit) = self.store.state().search_results.get(index) else {
            return;
        };
        let (grid_id, segment_id) = (hit.grid_id, hit.entry.segment_id.clone());

        self.store.set_view_mode(ViewMode::Single);
        self.jump_to(grid_id);
        if let Some(position) = self.detail_segment_ids().iter().position(|id| *id == segment_id) {
            self.detail_selected = position;
        }
        self.focus = Focus::Detail;
    }

    /// Fetch and show a segment's history.
    pub fn open_log(&mut self, segment_id: &str) {
        let history = self
            .runtime
            .block_on(get_segment_log(self.api.as_ref(), segment_id));
        self.log = Some(LogModal {
            segment_id: segment_id.to_string(),
            lines: render::log_lines(&history),
        });
    }

    /// Close the log modal.
    pub fn close_log(&mut self) {
        self.log = None;
    }

    /// Show the ingest editor.
    pub fn open_ingest(&mut self) {
        self.ingest.open = true;
        self.ingest.field = IngestField::Text;
    }

    /// Hide the ingest editor, keeping its contents.
    pub fn close_ingest(&mut self) {
        self.ingest.open = false;
    }

    /// Type into the active ingest field.
    pub fn ingest_input(&mut self, c: char) {
        self.ingest.field_mut().push(c);
    }

    /// Newline in the transcript (ignored in the source field).
    pub fn ingest_newline(&mut self) {
        if self.ingest.field == IngestField::Text {
            self.ingest.text.push('\n');
        }
    }

    /// Delete the last character of the active ingest field.
    pub fn ingest_backspace(&mut self) {
        self.ingest.field_mut().pop();
    }

    /// Switch between transcript and source.
    pub fn ingest_switch_field(&mut self) {
        self.ingest.field = match self.ingest.field {
            IngestField::Text => IngestField::Source,
            IngestField::Source => IngestField::Text,
        };
    }

    /// Validate the transcript and queue it for submission.
    ///
    /// Input errors are shown at once. A valid transcript sets the
    /// in-flight status; [`run_pending_submission`](Self::run_pending_submission)
    /// then posts it. Ignored while a submission is already queued.
    pub fn begin_submit(&mut self) {
        if self.pending_submission.is_some() {
            return;
        }
        let request = SubmissionRequest::new(self.ingest.text.clone(), self.ingest.source.clone());
        match request.prepare(Utc::now()) {
            Ok(_) => {
                self.segment_status = Some(SegmentStatus::classifying());
                self.pending_submission = Some(request);
            }
            Err(e) => self.segment_status = Some(SegmentStatus::from_error(&e)),
        }
    }

    /// Whether a queued submission is waiting to run.
    pub fn submission_pending(&self) -> bool {
        self.pending_submission.is_some()
    }

    /// Post the queued transcript, blocking until the backend answers.
    ///
    /// Success clears the transcript, stores the results and raises toasts;
    /// any failure is shown as the inline status.
    pub fn run_pending_submission(&mut self) {
        let Some(request) = self.pending_submission.take() else {
            return;
        };
        let window: Duration = self.board_config.fresh_window();

        let outcome = self.runtime.block_on(submit_transcript(
            self.api.as_ref(),
            &mut self.store,
            &request,
            window,
        ));

        match outcome {
            Ok(outcome) => {
                self.segment_status = Some(outcome.status_message());
                for toast in outcome.toast_messages() {
                    self.push_toast(toast, outcome.completed_at);
                }
                self.grid_source = Some(outcome.grid_source);
                self.ingest.results = outcome.results;
                self.ingest.text.clear();
                self.run_search();
            }
            Err(e) => {
                self.segment_status = Some(SegmentStatus::from_error(&e));
            }
        }
    }

    /// Toggle help.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle through available themes.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }
}
