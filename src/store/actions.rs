//! Navigation actions over the store.
//!
//! The navigation state is "at grid G with back-stack S":
//! - drill down to T pushes G and shows T;
//! - back pops the stack, or returns to the root when it is empty;
//! - jumping to J keeps at most one level of history: `[]` when J is the
//!   root, otherwise `[root]`. Deeper history is discarded.

use tracing::debug;

use crate::model::{GridId, ROOT_GRID_ID};

use super::{BoardState, BoardStore, ViewMode};

/// Navigate from the current grid into `target`.
pub fn drill_down(store: &mut BoardStore, target: GridId) {
    let from = store.state().current_grid_id;
    store.push_to_stack(from);
    store.set_current_grid_id(target);
    debug!(from, to = target, depth = store.state().mandala_stack.len(), "drill down");
}

/// Return to the previous grid, or to the root when there is no history.
pub fn handle_back(store: &mut BoardStore) {
    let target = store.pop_from_stack().unwrap_or(ROOT_GRID_ID);
    store.set_current_grid_id(target);
    debug!(to = target, depth = store.state().mandala_stack.len(), "back");
}

/// Jump straight to a grid, e.g. from search or the overview.
pub fn jump_to_grid(store: &mut BoardStore, grid_id: GridId) {
    store.reset_stack();
    if grid_id != ROOT_GRID_ID {
        store.push_to_stack(ROOT_GRID_ID);
    }
    store.set_current_grid_id(grid_id);
    debug!(to = grid_id, "jump");
}

/// Whether a back action would change anything visible.
///
/// Disabled at the root with no history, and in overview mode.
pub fn can_go_back(state: &BoardState) -> bool {
    state.view_mode == ViewMode::Single
        && !(state.current_grid_id == ROOT_GRID_ID && state.mandala_stack.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_drill_down_then_back_to_root() {
        let mut store = BoardStore::new();
        drill_down(&mut store, 2);
        drill_down(&mut store, 6);
        assert_eq!(store.state().mandala_stack, vec![5, 2]);
        assert_eq!(store.state().current_grid_id, 6);

        handle_back(&mut store);
        assert_eq!(store.state().mandala_stack, vec![5]);
        assert_eq!(store.state().current_grid_id, 2);

        handle_back(&mut store);
        assert!(store.state().mandala_stack.is_empty());
        assert_eq!(store.state().current_grid_id, 5);
    }

    #[test]
    fn test_back_on_empty_stack_goes_to_root() {
        let mut store = BoardStore::new();
        store.set_current_grid_id(8);
        handle_back(&mut store);
        assert_eq!(store.state().current_grid_id, ROOT_GRID_ID);
        assert!(store.state().mandala_stack.is_empty());
    }

    #[rstest]
    #[case(5, vec![])]
    #[case(1, vec![5])]
    #[case(9, vec![5])]
    #[case(123, vec![5])]
    fn test_jump_discards_history(#[case] target: GridId, #[case] expected: Vec<GridId>) {
        let mut store = BoardStore::new();
        drill_down(&mut store, 1);
        drill_down(&mut store, 3);
        drill_down(&mut store, 8);

        jump_to_grid(&mut store, target);
        assert_eq!(store.state().mandala_stack, expected);
        assert_eq!(store.state().current_grid_id, target);
    }

    #[test]
    fn test_can_go_back() {
        let mut store = BoardStore::new();
        assert!(!can_go_back(store.state()));

        drill_down(&mut store, 4);
        assert!(can_go_back(store.state()));

        store.set_view_mode(ViewMode::Overview);
        assert!(!can_go_back(store.state()));
    }
}
