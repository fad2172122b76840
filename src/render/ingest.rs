//! Ingest results table.

use serde::Serialize;

use crate::model::IngestResult;
use crate::util::truncate_chars;

/// Characters of a snippet shown per row.
pub const SNIPPET_CHARS: usize = 60;

/// Column headers, in row order.
pub const INGEST_HEADERS: [&str; 7] = ["#", "Snippet", "Grid", "Status", "Notes", "Classifier", "Error"];

/// One row of the ingest table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestRow {
    /// 1-based position.
    pub index: usize,
    /// Snippet cut to [`SNIPPET_CHARS`].
    pub snippet: String,
    /// `#id`, or `-` when unassigned.
    pub grid: String,
    /// Classifier status.
    pub status: String,
    /// Summary notes.
    pub notes: String,
    /// Classifier name.
    pub classifier: String,
    /// Classifier error.
    pub error: String,
}

impl IngestRow {
    /// Cells in [`INGEST_HEADERS`] order.
    pub fn cells(&self) -> [String; 7] {
        [
            self.index.to_string(),
            self.snippet.clone(),
            self.grid.clone(),
            self.status.clone(),
            self.notes.clone(),
            self.classifier.clone(),
            self.error.clone(),
        ]
    }
}

/// Rows for the ingest results table. Empty input hides the table.
pub fn ingest_rows(results: &[IngestResult]) -> Vec<IngestRow> {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| IngestRow {
            index: i + 1,
            snippet: truncate_chars(&result.snippet, SNIPPET_CHARS).to_string(),
            grid: result
                .grid_id
                .map_or_else(|| "-".to_string(), |id| format!("#{id}")),
            status: result.status.clone(),
            notes: result.summary_notes.clone().unwrap_or_default(),
            classifier: result.classifier.clone().unwrap_or_default(),
            error: result.error.clone().unwrap_or_default(),
        })
        .collect()
}
