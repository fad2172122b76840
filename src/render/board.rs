//! 3×3 board and 9×9 overview.

use serde::Serialize;

use crate::model::{Grid, GridId, Mandala, CENTER_SLOT, ROOT_GRID_ID, SLOT_COUNT};
use crate::store::actions::can_go_back;
use crate::store::{BoardState, BoardStore};
use crate::util::truncate_with_ellipsis;

/// Note shown on cards that drill into another grid.
pub const DRILL_NOTE: &str = "drill in";

/// Characters of a sub-grid item title shown in the overview.
pub const MINI_TITLE_CHARS: usize = 15;

/// Message shown when the current grid is not loaded.
pub const EMPTY_BOARD_MESSAGE: &str = "No grids loaded yet. Check the API or the built-in data.";

/// Message shown when the overview cannot find the root mandala.
pub const OVERVIEW_UNAVAILABLE: &str = "Cannot load the central theme";

/// What a board slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// The grid's own centre.
    Center,
    /// One of the surrounding items.
    Item,
    /// No item for this slot.
    Empty,
}

/// One slot of the 3×3 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardCard {
    /// 1-based slot, row-major.
    pub slot: u8,
    /// Slot content kind.
    pub kind: CardKind,
    /// `#id` for the centre and navigable items, `•` otherwise.
    pub label: String,
    /// Title line.
    pub title: String,
    /// Body text.
    pub detail: String,
    /// Persona on the centre, [`DRILL_NOTE`] on navigable items.
    pub note: String,
    /// Grid a selection drills into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_grid_id: Option<GridId>,
    /// Fresh entries in this grid (centre) or the target grid (items).
    pub fresh: bool,
    /// Needs-review count of the target grid.
    pub needs_review: usize,
}

impl BoardCard {
    fn empty(slot: u8) -> Self {
        Self {
            slot,
            kind: CardKind::Empty,
            label: String::new(),
            title: String::new(),
            detail: String::new(),
            note: String::new(),
            target_grid_id: None,
            fresh: false,
            needs_review: 0,
        }
    }

    /// Whether selecting the card navigates somewhere.
    pub const fn is_navigable(&self) -> bool {
        self.target_grid_id.is_some()
    }
}

/// The current grid as nine cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Grid shown.
    pub grid_id: GridId,
    /// Its title.
    pub title: String,
    /// Navigation trail.
    pub breadcrumb: String,
    /// Whether back navigation is available.
    pub can_go_back: bool,
    /// Slots 1..=9 in order.
    pub cards: Vec<BoardCard>,
}

impl BoardView {
    /// Card in a 1-based slot.
    pub fn card(&self, slot: u8) -> Option<&BoardCard> {
        slot.checked_sub(1).and_then(|i| self.cards.get(usize::from(i)))
    }
}

/// Build the 3×3 view of the current grid; `None` when it is not loaded.
pub fn board_view(state: &BoardState) -> Option<BoardView> {
    let grid = state.current_grid()?;
    let mandala = grid.mandala_or_default();

    let cards = (1..=SLOT_COUNT)
        .map(|slot| {
            if slot == CENTER_SLOT {
                center_card(state, grid, &mandala)
            } else {
                item_card(state, slot, &mandala)
            }
        })
        .collect();

    Some(BoardView {
        grid_id: grid.grid_id,
        title: grid.title.clone(),
        breadcrumb: state.stack_path(),
        can_go_back: can_go_back(state),
        cards,
    })
}

fn center_card(state: &BoardState, grid: &Grid, mandala: &Mandala) -> BoardCard {
    let title = if mandala.center_title.is_empty() {
        grid.title.clone()
    } else {
        mandala.center_title.clone()
    };
    BoardCard {
        slot: CENTER_SLOT,
        kind: CardKind::Center,
        label: format!("#{}", grid.grid_id),
        title,
        detail: mandala.center.clone(),
        note: grid.persona.clone(),
        target_grid_id: None,
        fresh: state.grid_has_fresh_entries(grid),
        needs_review: 0,
    }
}

fn item_card(state: &BoardState, slot: u8, mandala: &Mandala) -> BoardCard {
    let Some(item) = mandala.item_at_slot(slot) else {
        return BoardCard::empty(slot);
    };

    let target = item.target_grid_id.and_then(|id| state.grid(id));
    BoardCard {
        slot,
        kind: CardKind::Item,
        label: item
            .target_grid_id
            .map_or_else(|| "•".to_string(), |id| format!("#{id}")),
        title: item.title.clone(),
        detail: item.detail.clone(),
        note: if item.target_grid_id.is_some() {
            DRILL_NOTE.to_string()
        } else {
            String::new()
        },
        target_grid_id: item.target_grid_id,
        fresh: target.is_some_and(|g| state.grid_has_fresh_entries(g)),
        needs_review: target.map_or(0, |g| g.needs_review.len()),
    }
}

/// One slot of a sub-grid inside an overview cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiniCell {
    /// 1-based slot.
    pub slot: u8,
    /// Item title truncated to [`MINI_TITLE_CHARS`], or the centre title.
    pub text: String,
    /// Whether this is the sub-grid's centre.
    pub is_center: bool,
}

/// One of the nine big cells of the overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewCell {
    /// 1-based slot in the root layout.
    pub slot: u8,
    /// Grid a selection jumps to; `None` for empty cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<GridId>,
    /// `#id title` header.
    pub header: String,
    /// Root centre statement (centre cell only).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// The sub-grid's 3×3 (outer cells only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub minis: Vec<MiniCell>,
    /// Sub-grid has fresh entries.
    pub fresh: bool,
    /// Sub-grid has entries awaiting review.
    pub has_review: bool,
}

impl OverviewCell {
    fn empty(slot: u8) -> Self {
        Self {
            slot,
            grid_id: None,
            header: String::new(),
            content: String::new(),
            minis: Vec::new(),
            fresh: false,
            has_review: false,
        }
    }
}

/// The root grid and its eight sub-grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewView {
    /// Slots 1..=9 in order.
    pub cells: Vec<OverviewCell>,
}

impl OverviewView {
    /// Cell in a 1-based slot.
    pub fn cell(&self, slot: u8) -> Option<&OverviewCell> {
        slot.checked_sub(1).and_then(|i| self.cells.get(usize::from(i)))
    }
}

/// Build the 9×9 overview; `None` when the root grid or its mandala is missing.
pub fn overview_view(state: &BoardState) -> Option<OverviewView> {
    let root = state.grid(ROOT_GRID_ID)?;
    let mandala = root.mandala.as_ref()?;

    let cells = (1..=SLOT_COUNT)
        .map(|slot| {
            if slot == CENTER_SLOT {
                return OverviewCell {
                    slot,
                    grid_id: Some(ROOT_GRID_ID),
                    header: format!("#{} {}", root.grid_id, mandala.center_title),
                    content: mandala.center.clone(),
                    minis: Vec::new(),
                    fresh: false,
                    has_review: false,
                };
            }
            let sub_grid = mandala
                .item_at_slot(slot)
                .and_then(|item| item.target_grid_id)
                .and_then(|id| state.grid(id));
            match sub_grid {
                Some(grid) => OverviewCell {
                    slot,
                    grid_id: Some(grid.grid_id),
                    header: format!("#{} {}", grid.grid_id, grid.title),
                    content: String::new(),
                    minis: mini_cells(grid),
                    fresh: state.grid_has_fresh_entries(grid),
                    has_review: !grid.needs_review.is_empty(),
                },
                None => OverviewCell::empty(slot),
            }
        })
        .collect();

    Some(OverviewView { cells })
}

fn mini_cells(grid: &Grid) -> Vec<MiniCell> {
    let mandala = grid.mandala_or_default();
    (1..=SLOT_COUNT)
        .map(|slot| {
            if slot == CENTER_SLOT {
                MiniCell {
                    slot,
                    text: grid.center_title().to_string(),
                    is_center: true,
                }
            } else {
                MiniCell {
                    slot,
                    text: mandala
                        .item_at_slot(slot)
                        .map(|item| truncate_with_ellipsis(&item.title, MINI_TITLE_CHARS))
                        .unwrap_or_default(),
                    is_center: false,
                }
            }
        })
        .collect()
}

/// Navigation trail of the store, e.g. `Root › Coaches › #77`.
pub fn breadcrumb(store: &BoardStore) -> String {
    store.get_stack_path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fallback_grids;
    use crate::store::actions::drill_down;
    use crate::store::ViewMode;
    use pretty_assertions::assert_eq;

    fn store() -> BoardStore {
        BoardStore::with_grids(fallback_grids().unwrap())
    }

    #[test]
    fn test_root_board_cards() {
        let store = store();
        let view = board_view(store.state()).unwrap();
        assert_eq!(view.cards.len(), 9);
        assert!(!view.can_go_back);

        let center = view.card(5).unwrap();
        assert_eq!(center.kind, CardKind::Center);
        assert_eq!(center.label, "#5");
        assert!(!center.is_navigable());

        for slot in [1, 2, 3, 4, 6, 7, 8, 9] {
            let card = view.card(slot).unwrap();
            assert_eq!(card.kind, CardKind::Item);
            assert_eq!(card.target_grid_id, Some(GridId::from(slot)));
            assert_eq!(card.label, format!("#{slot}"));
            assert_eq!(card.note, DRILL_NOTE);
        }
        // Grid 8 has two items awaiting review.
        assert_eq!(view.card(8).unwrap().needs_review, 2);
        assert_eq!(view.card(1).unwrap().needs_review, 0);
    }

    #[test]
    fn test_fresh_flags_follow_target_grid() {
        let mut store = store();
        store.add_recent_segments(["seg-co1"]);
        let view = board_view(store.state()).unwrap();
        assert!(view.card(2).unwrap().fresh);
        assert!(!view.card(1).unwrap().fresh);
        assert!(!view.card(5).unwrap().fresh);

        drill_down(&mut store, 2);
        let view = board_view(store.state()).unwrap();
        assert!(view.card(5).unwrap().fresh);
        assert!(view.can_go_back);
    }

    #[test]
    fn test_unknown_grid_has_no_board() {
        let mut store = store();
        store.set_current_grid_id(404);
        assert!(board_view(store.state()).is_none());
        assert!(board_view(BoardStore::new().state()).is_none());
    }

    #[test]
    fn test_grid_without_mandala_uses_summary() {
        let mut store = store();
        let mut grids = store.state().grids.clone();
        grids[0].mandala = None;
        let grid_id = grids[0].grid_id;
        let first_summary = grids[0].summary.first().cloned().unwrap_or_default();
        store.set_grids(grids);
        store.set_current_grid_id(grid_id);

        let view = board_view(store.state()).unwrap();
        assert_eq!(view.card(5).unwrap().detail, first_summary);
        assert!(view
            .cards
            .iter()
            .filter(|c| c.slot != 5)
            .all(|c| c.kind == CardKind::Empty));
    }

    #[test]
    fn test_overview_cells() {
        let mut store = store();
        store.set_view_mode(ViewMode::Overview);
        store.add_recent_segments(["seg-pay"]);
        let view = overview_view(store.state()).unwrap();

        let center = view.cell(5).unwrap();
        assert_eq!(center.grid_id, Some(5));
        assert!(center.header.starts_with("#5 "));
        assert!(center.minis.is_empty());

        let ops = view.cell(8).unwrap();
        assert_eq!(ops.grid_id, Some(8));
        assert!(ops.fresh);
        assert!(ops.has_review);
        assert_eq!(ops.minis.len(), 9);
        assert!(ops.minis[4].is_center);
        for mini in ops.minis.iter().filter(|m| !m.is_center) {
            assert!(mini.text.chars().count() <= MINI_TITLE_CHARS + 1);
        }
    }

    #[test]
    fn test_overview_requires_root_mandala() {
        let mut store = store();
        let mut grids = store.state().grids.clone();
        for grid in &mut grids {
            if grid.grid_id == ROOT_GRID_ID {
                grid.mandala = None;
            }
        }
        store.set_grids(grids);
        assert!(overview_view(store.state()).is_none());
        assert!(overview_view(BoardStore::new().state()).is_none());
    }

    #[test]
    fn test_breadcrumb() {
        let mut store = store();
        drill_down(&mut store, 3);
        let root_title = store.get_grid(5).unwrap().title.clone();
        let brand_title = store.get_grid(3).unwrap().title.clone();
        assert_eq!(breadcrumb(&store), format!("{root_title} › {brand_title}"));
    }
}
