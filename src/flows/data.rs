//! Grid loading with fallback to the built-in dataset.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::BoardApi;
use crate::error::Result;
use crate::model::{fallback_grids, normalize_grids, Grid, GridId};
use crate::store::BoardStore;

/// Where the loaded grids came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "count", rename_all = "lowercase")]
pub enum GridSource {
    /// The API returned this many grids.
    Api(usize),
    /// The built-in dataset was used.
    Fallback,
}

impl GridSource {
    /// Whether the built-in dataset is in use.
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Display for GridSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(count) => write!(f, "API ({count} grids)"),
            Self::Fallback => f.write_str("built-in data"),
        }
    }
}

/// Fetch grids and replace the store's collection.
///
/// An empty list or any API failure substitutes the built-in dataset; the
/// only error left is a corrupt embedded dataset.
pub async fn load_grids(api: &dyn BoardApi, store: &mut BoardStore) -> Result<GridSource> {
    match api.fetch_grids().await {
        Ok(response) if !response.grids.is_empty() => {
            let grids = normalize_grids(response.grids);
            let count = grids.len();
            info!(count, "loaded grids from API");
            store.set_grids(grids);
            Ok(GridSource::Api(count))
        }
        Ok(_) => {
            warn!("API returned no grids, using built-in data");
            store.set_grids(fallback_grids()?);
            Ok(GridSource::Fallback)
        }
        Err(e) => {
            warn!(error = %e, "failed to load grids from API, using built-in data");
            store.set_grids(fallback_grids()?);
            Ok(GridSource::Fallback)
        }
    }
}

/// Re-fetch one grid and swap it into the store.
///
/// A grid the list did not carry is appended. Returns false, leaving the
/// store as it was, when the fetch fails.
pub async fn refresh_grid(api: &dyn BoardApi, store: &mut BoardStore, grid_id: GridId) -> bool {
    let grid = match api.fetch_grid(grid_id).await {
        Ok(raw) => Grid::from(raw),
        Err(e) => {
            warn!(grid_id, error = %e, "failed to refresh grid, keeping loaded copy");
            return false;
        }
    };

    let mut grids = store.state().grids.clone();
    match grids.iter_mut().find(|g| g.grid_id == grid_id) {
        Some(slot) => *slot = grid,
        None => grids.push(grid),
    }
    store.set_grids(grids);
    info!(grid_id, "refreshed grid");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OfflineApi;

    #[tokio::test]
    async fn test_offline_load_uses_fallback() {
        let mut store = BoardStore::new();
        let source = load_grids(&OfflineApi, &mut store).await.unwrap();
        assert_eq!(source, GridSource::Fallback);
        assert_eq!(store.state().grids.len(), 9);
        assert!(store.get_grid(5).is_some());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_loaded_grid() {
        let mut store = BoardStore::with_grids(fallback_grids().unwrap());
        let before = store.get_grid(2).cloned();
        assert!(!refresh_grid(&OfflineApi, &mut store, 2).await);
        assert_eq!(store.get_grid(2).cloned(), before);
    }

    #[test]
    fn test_grid_source_display() {
        assert_eq!(GridSource::Api(3).to_string(), "API (3 grids)");
        assert!(GridSource::Fallback.is_fallback());
        assert_eq!(
            serde_json::to_value(GridSource::Api(2)).unwrap(),
            serde_json::json!({"source": "api", "count": 2})
        );
    }
}
