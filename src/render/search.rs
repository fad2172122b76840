//! Search results list.

use serde::Serialize;

use crate::model::GridId;
use crate::store::BoardState;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLine {
    /// Grid to jump to when selected.
    pub grid_id: GridId,
    /// Segment of the hit.
    pub segment_id: String,
    /// `#id title`.
    pub heading: String,
    /// Entry excerpt.
    pub snippet: String,
}

/// The search panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    /// `N results`.
    pub count_label: String,
    /// Hits in store order.
    pub items: Vec<ResultLine>,
}

/// Build the results panel from the stored search results.
pub fn results_view(state: &BoardState) -> ResultsView {
    let count = state.search_results.len();
    ResultsView {
        count_label: format!("{count} {}", if count == 1 { "result" } else { "results" }),
        items: state
            .search_results
            .iter()
            .map(|hit| ResultLine {
                grid_id: hit.grid_id,
                segment_id: hit.entry.segment_id.clone(),
                heading: format!("#{} {}", hit.grid_id, hit.grid_title),
                snippet: hit.entry.snippet.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{apply_search, SearchFilter};
    use crate::model::fallback_grids;
    use crate::store::BoardStore;

    #[test]
    fn test_results_view() {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        assert_eq!(results_view(store.state()).count_label, "0 results");

        apply_search(&mut store, &SearchFilter::keyword("coach-sync"));
        let view = results_view(store.state());
        assert_eq!(view.count_label, "1 result");
        let title = &store.get_grid(2).unwrap().title;
        assert_eq!(view.items[0].heading, format!("#2 {title}"));
        assert_eq!(view.items[0].segment_id, "seg-co1");
    }
}
