//! Property tests for board navigation and search.

use mandala_board::flows::{filter_entries, SearchFilter};
use mandala_board::model::fallback::fallback_grids;
use mandala_board::model::{EntryStatus, GridId, ROOT_GRID_ID};
use mandala_board::store::actions::{can_go_back, drill_down, handle_back, jump_to_grid};
use mandala_board::store::{BoardStore, ViewMode};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Drill(GridId),
    Back,
    Jump(GridId),
    Toggle,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..=9).prop_map(Op::Drill),
        Just(Op::Back),
        (1u32..=9).prop_map(Op::Jump),
        Just(Op::Toggle),
    ]
}

/// Reference model: current grid plus a plain vector stack.
#[derive(Debug)]
struct Model {
    current: GridId,
    stack: Vec<GridId>,
}

impl Model {
    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Drill(target) => {
                self.stack.push(self.current);
                self.current = target;
            }
            Op::Back => self.current = self.stack.pop().unwrap_or(ROOT_GRID_ID),
            Op::Jump(target) => {
                self.stack = if target == ROOT_GRID_ID { vec![] } else { vec![ROOT_GRID_ID] };
                self.current = target;
            }
            Op::Toggle => {}
        }
    }
}

fn apply(store: &mut BoardStore, op: &Op) {
    match *op {
        Op::Drill(target) => drill_down(store, target),
        Op::Back => handle_back(store),
        Op::Jump(target) => jump_to_grid(store, target),
        Op::Toggle => store.toggle_view_mode(),
    }
}

proptest! {
    #[test]
    fn navigation_matches_stack_model(ops in prop::collection::vec(op(), 0..40)) {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        let mut model = Model { current: ROOT_GRID_ID, stack: Vec::new() };

        for op in &ops {
            apply(&mut store, op);
            model.apply(op);

            prop_assert_eq!(store.state().current_grid_id, model.current);
            prop_assert_eq!(&store.state().mandala_stack, &model.stack);
        }
    }

    #[test]
    fn jump_keeps_at_most_root_history(
        ops in prop::collection::vec(op(), 0..20),
        target in 1u32..=9,
    ) {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        for op in &ops {
            apply(&mut store, op);
        }

        jump_to_grid(&mut store, target);
        let stack = &store.state().mandala_stack;
        if target == ROOT_GRID_ID {
            prop_assert!(stack.is_empty());
        } else {
            prop_assert_eq!(stack, &vec![ROOT_GRID_ID]);
        }

        // One back always lands on the root after a jump.
        handle_back(&mut store);
        prop_assert_eq!(store.state().current_grid_id, ROOT_GRID_ID);
        prop_assert!(store.state().mandala_stack.is_empty());
    }

    #[test]
    fn back_is_disabled_only_at_bare_root_or_in_overview(
        ops in prop::collection::vec(op(), 0..30),
    ) {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        for op in &ops {
            apply(&mut store, op);
        }

        let state = store.state();
        let at_bare_root = state.current_grid_id == ROOT_GRID_ID && state.mandala_stack.is_empty();
        let expected = state.view_mode == ViewMode::Single && !at_bare_root;
        prop_assert_eq!(can_go_back(state), expected);
    }

    #[test]
    fn search_hits_contain_keyword(keyword in "[a-zA-Z0-9 -]{0,6}") {
        let grids = fallback_grids().unwrap();
        let needle = keyword.trim().to_lowercase();
        let hits = filter_entries(&grids, &SearchFilter::keyword(keyword.clone()));

        for hit in &hits {
            prop_assert!(
                needle.is_empty()
                    || hit.entry.snippet.to_lowercase().contains(&needle)
                    || hit.entry.source.to_lowercase().contains(&needle)
            );
        }
        if needle.is_empty() {
            let total: usize = grids.iter().map(|g| g.entries.len()).sum();
            prop_assert_eq!(hits.len(), total);
        }
    }

    #[test]
    fn search_filters_narrow_results(
        keyword in "[a-z]{0,3}",
        grid_id in prop::option::of(1u32..=9),
        review in any::<bool>(),
    ) {
        let grids = fallback_grids().unwrap();
        let status = review.then_some(EntryStatus::NeedsReview);
        let unfiltered = filter_entries(&grids, &SearchFilter::keyword(keyword.clone()));
        let filtered = filter_entries(
            &grids,
            &SearchFilter { keyword, grid_id, status: status.clone() },
        );

        prop_assert!(filtered.len() <= unfiltered.len());
        for hit in &filtered {
            prop_assert!(grid_id.map_or(true, |id| hit.grid_id == id));
            prop_assert!(status.as_ref().map_or(true, |s| &hit.entry.status == s));
        }
    }
}
