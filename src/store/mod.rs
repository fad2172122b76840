//! Navigation and view state store.
//!
//! [`BoardStore`] is the single source of truth for which grid is shown, the
//! back-navigation stack, the view mode, search results and the set of
//! freshly submitted segments. Mutations are synchronous; every notifying
//! mutation calls each subscribed listener with the new [`BoardState`].
//! Rendering is not wired to notifications: callers re-render explicitly.
//!
//! Stack operations do not notify on their own; they are always followed by
//! a [`BoardStore::set_current_grid_id`] that does.

pub mod actions;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::BoardError;
use crate::model::{Grid, GridId, SearchHit, ROOT_GRID_ID};

/// Separator between breadcrumb levels.
pub const BREADCRUMB_SEPARATOR: &str = " › ";

/// Default time a submitted segment stays marked as fresh.
pub const DEFAULT_FRESH_WINDOW: Duration = Duration::from_millis(8000);

/// How the board is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One grid's 3×3 layout plus its detail panel.
    #[default]
    Single,
    /// The 9×9 overview of the root and its sub-grids.
    Overview,
}

impl ViewMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Overview,
            Self::Overview => Self::Single,
        }
    }

    /// Wire/CLI name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Overview => "overview",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "overview" => Ok(Self::Overview),
            other => Err(BoardError::InvalidArgument {
                name: "view".to_string(),
                reason: format!("unknown view mode '{other}' (expected single or overview)"),
            }),
        }
    }
}

/// Snapshot of everything the board displays.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    /// All loaded grids.
    pub grids: Vec<Grid>,
    /// Grid currently displayed.
    pub current_grid_id: GridId,
    /// Trail of previously displayed grids, most recent last.
    pub mandala_stack: Vec<GridId>,
    /// Latest search results.
    pub search_results: Vec<SearchHit>,
    /// Display mode.
    pub view_mode: ViewMode,
    /// Segments submitted within the fresh window.
    pub recent_segment_ids: HashSet<String>,
    /// When the fresh markers expire, if a clear is pending.
    pub fresh_deadline: Option<Instant>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            grids: Vec::new(),
            current_grid_id: ROOT_GRID_ID,
            mandala_stack: Vec::new(),
            search_results: Vec::new(),
            view_mode: ViewMode::Single,
            recent_segment_ids: HashSet::new(),
            fresh_deadline: None,
        }
    }
}

impl BoardState {
    /// Look up a grid by id.
    pub fn grid(&self, grid_id: GridId) -> Option<&Grid> {
        self.grids.iter().find(|g| g.grid_id == grid_id)
    }

    /// The grid currently displayed, if loaded.
    pub fn current_grid(&self) -> Option<&Grid> {
        self.grid(self.current_grid_id)
    }

    /// Whether the segment was submitted within the fresh window.
    pub fn is_fresh(&self, segment_id: &str) -> bool {
        self.recent_segment_ids.contains(segment_id)
    }

    /// Whether any of the grid's entries is fresh.
    pub fn grid_has_fresh_entries(&self, grid: &Grid) -> bool {
        grid.entries.iter().any(|e| self.is_fresh(&e.segment_id))
    }

    /// Breadcrumb of `stack + [current]`, each id resolved to its title.
    pub fn stack_path(&self) -> String {
        self.mandala_stack
            .iter()
            .chain(std::iter::once(&self.current_grid_id))
            .map(|id| match self.grid(*id) {
                Some(grid) if !grid.title.is_empty() => grid.title.clone(),
                _ => format!("#{id}"),
            })
            .collect::<Vec<_>>()
            .join(BREADCRUMB_SEPARATOR)
    }
}

/// Whether the grid has entries awaiting review.
pub fn grid_has_needs_review(grid: &Grid) -> bool {
    !grid.needs_review.is_empty()
}

/// Handle returned by [`BoardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&BoardState)>;

/// Owner of the board state and its listeners.
#[derive(Default)]
pub struct BoardStore {
    state: BoardState,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl BoardStore {
    /// Create an empty store positioned at the root grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with grids.
    pub fn with_grids(grids: Vec<Grid>) -> Self {
        Self {
            state: BoardState {
                grids,
                ..BoardState::default()
            },
            ..Self::default()
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Register a listener called after every notifying mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&BoardState) + 'static) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        let state = &self.state;
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }

    /// Replace the whole grid collection. Fields must already be normalized.
    pub fn set_grids(&mut self, grids: Vec<Grid>) {
        self.state.grids = grids;
        self.notify();
    }

    /// Look up a grid by id; `None` for unknown ids.
    pub fn get_grid(&self, grid_id: GridId) -> Option<&Grid> {
        self.state.grid(grid_id)
    }

    /// Set the displayed grid. The id is not validated; an unknown id makes
    /// the board render its empty state.
    pub fn set_current_grid_id(&mut self, grid_id: GridId) {
        trace!(grid_id, "current grid changed");
        self.state.current_grid_id = grid_id;
        self.notify();
    }

    /// Push a grid onto the back-navigation stack.
    pub fn push_to_stack(&mut self, grid_id: GridId) {
        self.state.mandala_stack.push(grid_id);
    }

    /// Pop the most recent grid off the stack.
    pub fn pop_from_stack(&mut self) -> Option<GridId> {
        self.state.mandala_stack.pop()
    }

    /// Discard all back history.
    pub fn reset_stack(&mut self) {
        self.state.mandala_stack.clear();
    }

    /// Breadcrumb of the stack plus the current grid.
    pub fn get_stack_path(&self) -> String {
        self.state.stack_path()
    }

    /// Switch the view mode.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
        self.notify();
    }

    /// Flip between single and overview mode.
    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.state.view_mode.toggled());
    }

    /// Replace the search results.
    pub fn set_search_results(&mut self, results: Vec<SearchHit>) {
        self.state.search_results = results;
        self.notify();
    }

    /// Mark segments as fresh, keeping any already marked.
    pub fn add_recent_segments<I, S>(&mut self, segment_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .recent_segment_ids
            .extend(segment_ids.into_iter().map(Into::into));
        self.notify();
    }

    /// Drop every fresh marker.
    pub fn clear_recent_segments(&mut self) {
        self.state.recent_segment_ids.clear();
        self.notify();
    }

    /// Schedule the fresh markers to clear `window` after `now`, replacing
    /// any pending clear.
    pub fn schedule_fresh_clear(&mut self, now: Instant, window: Duration) {
        self.state.fresh_deadline = Some(now + window);
    }

    /// Pending clear deadline, if any.
    pub fn fresh_deadline(&self) -> Option<Instant> {
        self.state.fresh_deadline
    }

    /// Clear the fresh markers if the pending deadline has passed.
    ///
    /// Returns true when a clear happened.
    pub fn expire_fresh(&mut self, now: Instant) -> bool {
        match self.state.fresh_deadline {
            Some(deadline) if now >= deadline => {
                self.state.fresh_deadline = None;
                self.clear_recent_segments();
                true
            }
            _ => false,
        }
    }

    /// Whether any of the grid's entries is fresh.
    pub fn grid_has_fresh_entries(&self, grid: &Grid) -> bool {
        self.state.grid_has_fresh_entries(grid)
    }

    /// Whether the grid has entries awaiting review.
    pub fn grid_has_needs_review(&self, grid: &Grid) -> bool {
        grid_has_needs_review(grid)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::model::{Entry, EntryStatus, RawGrid};
    use pretty_assertions::assert_eq;

    fn grid(id: GridId, title: &str, segments: &[&str]) -> Grid {
        let mut grid = Grid::from(RawGrid {
            grid_id: id,
            title: title.to_string(),
            ..RawGrid::default()
        });
        grid.entries = segments
            .iter()
            .map(|s| Entry {
                segment_id: (*s).to_string(),
                snippet: String::new(),
                source: String::new(),
                status: EntryStatus::NewEntry,
                confidence: 0.9,
                related_grids: Vec::new(),
                created_at: None,
            })
            .collect();
        grid
    }

    #[test]
    fn test_initial_state() {
        let store = BoardStore::new();
        assert_eq!(store.state().current_grid_id, ROOT_GRID_ID);
        assert!(store.state().mandala_stack.is_empty());
        assert_eq!(store.state().view_mode, ViewMode::Single);
    }

    #[test]
    fn test_get_grid_round_trip() {
        let mut store = BoardStore::new();
        store.set_grids(vec![grid(1, "One", &[]), grid(5, "Root", &[])]);
        assert_eq!(store.get_grid(5).unwrap().title, "Root");
        assert!(store.get_grid(42).is_none());
    }

    #[test]
    fn test_stack_push_pop() {
        let mut store = BoardStore::new();
        assert_eq!(store.pop_from_stack(), None);
        store.push_to_stack(5);
        store.push_to_stack(2);
        assert_eq!(store.pop_from_stack(), Some(2));
        store.reset_stack();
        assert_eq!(store.pop_from_stack(), None);
    }

    #[test]
    fn test_stack_path_resolves_titles() {
        let mut store = BoardStore::with_grids(vec![grid(5, "Root", &[]), grid(2, "Coaches", &[])]);
        store.push_to_stack(5);
        store.push_to_stack(2);
        store.set_current_grid_id(77);
        assert_eq!(store.get_stack_path(), "Root › Coaches › #77");
    }

    #[test]
    fn test_set_current_grid_does_not_validate() {
        let mut store = BoardStore::new();
        store.set_current_grid_id(404);
        assert_eq!(store.state().current_grid_id, 404);
        assert!(store.state().current_grid().is_none());
    }

    #[test]
    fn test_recent_segments_union_and_clear() {
        let mut store = BoardStore::new();
        store.add_recent_segments(["a", "b"]);
        store.add_recent_segments(vec!["c".to_string()]);
        assert_eq!(store.state().recent_segment_ids.len(), 3);
        store.clear_recent_segments();
        assert!(store.state().recent_segment_ids.is_empty());
    }

    #[test]
    fn test_fresh_and_review_predicates() {
        let mut store = BoardStore::new();
        let mut g = grid(3, "Brand", &["seg-1"]);
        assert!(!store.grid_has_fresh_entries(&g));
        store.add_recent_segments(["seg-1"]);
        assert!(store.grid_has_fresh_entries(&g));

        assert!(!store.grid_has_needs_review(&g));
        g.needs_review.push(g.entries[0].clone());
        assert!(store.grid_has_needs_review(&g));
    }

    #[test]
    fn test_fresh_timer_resets_instead_of_stacking() {
        let mut store = BoardStore::new();
        let t0 = Instant::now();
        store.add_recent_segments(["a"]);
        store.schedule_fresh_clear(t0, DEFAULT_FRESH_WINDOW);

        // A second submission at t0+5s pushes the deadline to t0+13s.
        let t5 = t0 + Duration::from_secs(5);
        store.add_recent_segments(["b"]);
        store.schedule_fresh_clear(t5, DEFAULT_FRESH_WINDOW);
        assert_eq!(store.fresh_deadline(), Some(t5 + DEFAULT_FRESH_WINDOW));

        assert!(!store.expire_fresh(t0 + DEFAULT_FRESH_WINDOW));
        assert_eq!(store.state().recent_segment_ids.len(), 2);

        assert!(store.expire_fresh(t5 + DEFAULT_FRESH_WINDOW));
        assert!(store.state().recent_segment_ids.is_empty());
        assert_eq!(store.fresh_deadline(), None);
        assert!(!store.expire_fresh(t5 + DEFAULT_FRESH_WINDOW * 2));
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let mut store = BoardStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = store.subscribe(move |state| sink.borrow_mut().push(state.current_grid_id));

        store.set_current_grid_id(2);
        store.push_to_stack(2); // stack ops are silent
        store.set_view_mode(ViewMode::Overview);
        assert_eq!(*seen.borrow(), vec![2, 2]);

        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.set_current_grid_id(3);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_view_mode_parse_and_toggle() {
        assert_eq!("Overview".parse::<ViewMode>().unwrap(), ViewMode::Overview);
        assert!("grid".parse::<ViewMode>().is_err());

        let mut store = BoardStore::new();
        store.toggle_view_mode();
        assert_eq!(store.state().view_mode, ViewMode::Overview);
        store.toggle_view_mode();
        assert_eq!(store.state().view_mode, ViewMode::Single);
    }
}
