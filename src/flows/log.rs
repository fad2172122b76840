//! Segment change-log lookup.

use tracing::warn;

use crate::api::BoardApi;
use crate::model::SegmentLogEntry;

/// History shown when the API cannot provide one.
pub fn default_history() -> Vec<SegmentLogEntry> {
    vec![
        SegmentLogEntry::new("inserted", 0.4, "new segment written"),
        SegmentLogEntry::new("merged", 0.9, "similar to existing summary"),
    ]
}

/// Fetch a segment's history, falling back to [`default_history`] on failure.
pub async fn get_segment_log(api: &dyn BoardApi, segment_id: &str) -> Vec<SegmentLogEntry> {
    match api.fetch_segment_log(segment_id).await {
        Ok(response) => response.history,
        Err(e) => {
            warn!(segment_id, error = %e, "segment log unavailable, showing default history");
            default_history()
        }
    }
}
