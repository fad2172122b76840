//! Built-in dataset used when the API cannot be reached.

use crate::error::{BoardError, Result};

use super::grid::{normalize_grids, Grid};
use super::segment::GridsResponse;

/// The embedded nine-grid dataset (camelCase field names).
const FALLBACK_JSON: &str = include_str!("../../assets/fallback_grids.json");

/// Parse the built-in dataset.
pub fn fallback_grids() -> Result<Vec<Grid>> {
    let response: GridsResponse =
        serde_json::from_str(FALLBACK_JSON).map_err(|e| BoardError::SerializationError {
            context: "Failed to parse built-in grid dataset".to_string(),
            source: e,
        })?;
    Ok(normalize_grids(response.grids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{item_slot, ROOT_GRID_ID};

    #[test]
    fn test_fallback_has_nine_grids() {
        let grids = fallback_grids().unwrap();
        let ids: Vec<u32> = grids.iter().map(|g| g.grid_id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_root_links_every_other_grid() {
        let grids = fallback_grids().unwrap();
        let root = grids.iter().find(|g| g.grid_id == ROOT_GRID_ID).unwrap();
        let mandala = root.mandala.as_ref().unwrap();
        assert_eq!(mandala.items.len(), 8);

        // Slot n of the root drills into grid n.
        for (index, item) in mandala.items.iter().enumerate() {
            let slot = item_slot(index).unwrap();
            assert_eq!(item.target_grid_id, Some(u32::from(slot)));
        }
    }

    #[test]
    fn test_needs_review_counts_match_lists() {
        for grid in fallback_grids().unwrap() {
            assert_eq!(grid.needs_review_count, grid.needs_review.len(), "grid {}", grid.grid_id);
        }
    }
}
