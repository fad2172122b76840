//! Detail panel and segment log lines.

use serde::Serialize;

use crate::model::{Entry, EntryStatus, Grid, GridId, SegmentLogEntry};
use crate::store::BoardState;

/// Line shown in an empty needs-review section.
pub const NO_REVIEW_PLACEHOLDER: &str = "No segments awaiting review";

/// Heading shown when there is no grid to detail.
pub const NO_DATA_TITLE: &str = "No data";

/// Hint shown under [`NO_DATA_TITLE`].
pub const NO_DATA_HINT: &str = "Check whether the API returned any content.";

/// One entry in the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryLine {
    /// Segment the entry belongs to; selecting it opens the log.
    pub segment_id: String,
    /// Excerpt.
    pub snippet: String,
    /// `source · status · conf X · related a,b`.
    pub meta: String,
    /// Submitted within the fresh window.
    pub fresh: bool,
    /// Status is `needs_review`.
    pub needs_review: bool,
}

/// Title and description of a mandala item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MandalaLine {
    /// Item title.
    pub title: String,
    /// Item detail.
    pub detail: String,
}

/// Expanded mandala shown under the entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MandalaSection {
    /// Centre title.
    pub center_title: String,
    /// Centre statement.
    pub center: String,
    /// Surrounding items.
    pub items: Vec<MandalaLine>,
}

/// Everything the detail panel shows for a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    /// Grid id.
    pub grid_id: GridId,
    /// Title.
    pub title: String,
    /// Persona line.
    pub persona: String,
    /// Number of entries awaiting review.
    pub review_count: usize,
    /// Summary bullets.
    pub summary: Vec<String>,
    /// Regular entries.
    pub entries: Vec<EntryLine>,
    /// Entries awaiting review.
    pub needs_review: Vec<EntryLine>,
    /// Only present when the grid has mandala items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandala: Option<MandalaSection>,
}

impl DetailView {
    /// Badge next to the persona, e.g. `needs review 2`.
    pub fn review_badge(&self) -> Option<String> {
        (self.review_count > 0).then(|| format!("needs review {}", self.review_count))
    }

    /// Segment ids in display order (entries, then needs-review).
    pub fn segment_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .chain(&self.needs_review)
            .map(|line| line.segment_id.as_str())
    }
}

/// Meta line of an entry.
pub fn entry_meta(entry: &Entry) -> String {
    let mut meta = format!(
        "{} · {} · conf {}",
        entry.source, entry.status, entry.confidence
    );
    if !entry.related_grids.is_empty() {
        let related: Vec<String> = entry.related_grids.iter().map(ToString::to_string).collect();
        meta.push_str(&format!(" · related {}", related.join(",")));
    }
    meta
}

fn entry_line(state: &BoardState, entry: &Entry) -> EntryLine {
    EntryLine {
        segment_id: entry.segment_id.clone(),
        snippet: entry.snippet.clone(),
        meta: entry_meta(entry),
        fresh: state.is_fresh(&entry.segment_id),
        needs_review: entry.status == EntryStatus::NeedsReview,
    }
}

/// Detail of the current grid; `None` when it is not loaded.
pub fn detail_view(state: &BoardState) -> Option<DetailView> {
    state.current_grid().map(|grid| detail_view_for(state, grid))
}

/// Detail of a specific grid.
pub fn detail_view_for(state: &BoardState, grid: &Grid) -> DetailView {
    let mandala = grid
        .mandala
        .as_ref()
        .filter(|m| !m.items.is_empty())
        .map(|m| MandalaSection {
            center_title: grid.center_title().to_string(),
            center: m.center.clone(),
            items: m
                .items
                .iter()
                .map(|item| MandalaLine {
                    title: item.title.clone(),
                    detail: item.detail.clone(),
                })
                .collect(),
        });

    DetailView {
        grid_id: grid.grid_id,
        title: grid.title.clone(),
        persona: grid.persona.clone(),
        review_count: grid.needs_review.len(),
        summary: grid.summary.clone(),
        entries: grid.entries.iter().map(|e| entry_line(state, e)).collect(),
        needs_review: grid.needs_review.iter().map(|e| entry_line(state, e)).collect(),
        mandala,
    }
}

/// One step of a segment's history, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// Action name.
    pub action: String,
    /// `similarity X`.
    pub similarity: String,
    /// Comment, possibly empty.
    pub comment: String,
}

/// Format a segment history.
pub fn log_lines(history: &[SegmentLogEntry]) -> Vec<LogLine> {
    history
        .iter()
        .map(|entry| LogLine {
            action: entry.action.clone(),
            similarity: format!("similarity {}", entry.similarity),
            comment: entry.comment.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::default_history;
    use crate::model::fallback_grids;
    use crate::store::BoardStore;
    use pretty_assertions::assert_eq;

    fn entry(status: EntryStatus, related: Vec<GridId>) -> Entry {
        Entry {
            segment_id: "s1".to_string(),
            snippet: "snippet".to_string(),
            source: "meeting".to_string(),
            status,
            confidence: 0.9,
            related_grids: related,
            created_at: None,
        }
    }

    #[test]
    fn test_entry_meta() {
        assert_eq!(
            entry_meta(&entry(EntryStatus::NewEntry, vec![])),
            "meeting · new_entry · conf 0.9"
        );
        assert_eq!(
            entry_meta(&entry(EntryStatus::Other("merged".into()), vec![3, 6])),
            "meeting · merged · conf 0.9 · related 3,6"
        );
    }

    #[test]
    fn test_detail_of_grid_with_reviews() {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        store.set_current_grid_id(8);
        store.add_recent_segments(["seg-pay"]);

        let view = detail_view(store.state()).unwrap();
        assert_eq!(view.grid_id, 8);
        assert_eq!(view.review_count, 2);
        assert_eq!(view.review_badge().as_deref(), Some("needs review 2"));
        assert!(view.entries[0].fresh);
        assert!(view.needs_review.iter().all(|line| line.needs_review));
        assert_eq!(
            view.segment_ids().collect::<Vec<_>>(),
            vec!["seg-pay", "seg-pay2", "seg-pay3"]
        );
    }

    #[test]
    fn test_detail_without_reviews_or_grid() {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        store.set_current_grid_id(4);
        let view = detail_view(store.state()).unwrap();
        assert!(view.entries.is_empty());
        assert!(view.needs_review.is_empty());
        assert_eq!(view.review_badge(), None);

        store.set_current_grid_id(99);
        assert!(detail_view(store.state()).is_none());
    }

    #[test]
    fn test_log_lines() {
        let lines = log_lines(&default_history());
        assert_eq!(lines[0].similarity, "similarity 0.4");
        assert_eq!(lines[1].action, "merged");
    }
}
