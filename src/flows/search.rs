//! Entry search across all grids.

use tracing::debug;

use crate::model::{EntryStatus, Grid, GridId, SearchHit};
use crate::store::BoardStore;

/// Search criteria. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive substring of snippet or source.
    pub keyword: String,
    /// Restrict to one grid.
    pub grid_id: Option<GridId>,
    /// Restrict to one status.
    pub status: Option<EntryStatus>,
}

impl SearchFilter {
    /// Filter with only a keyword.
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Whether the filter matches every entry.
    pub fn is_empty(&self) -> bool {
        self.keyword.trim().is_empty() && self.grid_id.is_none() && self.status.is_none()
    }
}

/// Entries of every grid matching the filter, in grid then entry order.
///
/// Only regular entries are searched; needs-review items are not.
pub fn filter_entries(grids: &[Grid], filter: &SearchFilter) -> Vec<SearchHit> {
    let keyword = filter.keyword.trim().to_lowercase();

    grids
        .iter()
        .filter(|grid| filter.grid_id.map_or(true, |id| grid.grid_id == id))
        .flat_map(|grid| {
            grid.entries.iter().map(move |entry| SearchHit {
                grid_id: grid.grid_id,
                grid_title: grid.title.clone(),
                entry: entry.clone(),
            })
        })
        .filter(|hit| filter.status.as_ref().map_or(true, |s| &hit.entry.status == s))
        .filter(|hit| {
            keyword.is_empty()
                || hit.entry.snippet.to_lowercase().contains(&keyword)
                || hit.entry.source.to_lowercase().contains(&keyword)
        })
        .collect()
}

/// Run the search over the store's grids and store the results.
pub fn apply_search(store: &mut BoardStore, filter: &SearchFilter) -> usize {
    let hits = filter_entries(&store.state().grids, filter);
    let count = hits.len();
    debug!(count, keyword = %filter.keyword, "search");
    store.set_search_results(hits);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fallback_grids;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.entry.segment_id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_every_entry() {
        let grids = fallback_grids().unwrap();
        let total: usize = grids.iter().map(|g| g.entries.len()).sum();
        let hits = filter_entries(&grids, &SearchFilter::default());
        assert_eq!(hits.len(), total);
        assert!(SearchFilter::default().is_empty());
    }

    #[rstest]
    #[case(SearchFilter { grid_id: Some(4), ..SearchFilter::default() }, 0)]
    #[case(SearchFilter { grid_id: Some(404), ..SearchFilter::default() }, 0)]
    fn test_grid_filter_without_entries(#[case] filter: SearchFilter, #[case] expected: usize) {
        let grids = fallback_grids().unwrap();
        assert_eq!(filter_entries(&grids, &filter).len(), expected);
    }

    #[test]
    fn test_grid_filter_tags_hits() {
        let grids = fallback_grids().unwrap();
        let filter = SearchFilter {
            grid_id: Some(1),
            ..SearchFilter::default()
        };
        let hits = filter_entries(&grids, &filter);
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.grid_id == 1));
        assert_eq!(hits[0].grid_title, grids[0].title);
    }

    #[test]
    fn test_keyword_is_case_insensitive_and_matches_source() {
        let grids = fallback_grids().unwrap();
        let hits = filter_entries(&grids, &SearchFilter::keyword("COACH-SYNC"));
        assert_eq!(ids(&hits), vec!["seg-co1"]);
        assert_eq!(hits[0].grid_id, 2);
    }

    #[test]
    fn test_status_filter_skips_needs_review_items() {
        let grids = fallback_grids().unwrap();
        let review = SearchFilter {
            status: Some(EntryStatus::NeedsReview),
            ..SearchFilter::default()
        };
        // seg-co2, seg-pay2 and friends live only in needs-review lists.
        assert!(filter_entries(&grids, &review).is_empty());

        let fresh = SearchFilter {
            status: Some(EntryStatus::NewEntry),
            ..SearchFilter::default()
        };
        let hits = filter_entries(&grids, &fresh);
        assert_eq!(
            ids(&hits),
            vec!["seg-aw1", "seg-co1", "seg-agr", "seg-sys1", "seg-mkt1", "seg-pay", "seg-data1"]
        );
    }

    #[test]
    fn test_keyword_combined_with_grid() {
        let grids = fallback_grids().unwrap();
        let filter = SearchFilter {
            keyword: "  MEETING ".to_string(),
            grid_id: Some(8),
            status: None,
        };
        assert_eq!(ids(&filter_entries(&grids, &filter)), vec!["seg-pay"]);
    }

    #[test]
    fn test_apply_search_stores_results() {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        let count = apply_search(&mut store, &SearchFilter::keyword("no-such-text-anywhere"));
        assert_eq!(count, 0);
        assert!(store.state().search_results.is_empty());

        let count = apply_search(&mut store, &SearchFilter::default());
        assert_eq!(count, store.state().search_results.len());
        assert!(count > 0);
    }
}
