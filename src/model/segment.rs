//! Transcript segments, ingest results, change logs and API envelopes.

use serde::{Deserialize, Serialize};

use super::grid::{GridId, RawGrid};
use super::nullable;

/// A transcript block submitted for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Free-form origin label.
    pub source: String,
    /// Segment text.
    pub text: String,
    /// Client-assigned identity (`manual-<millis>-<index>`).
    pub segment_id: String,
    /// RFC 3339 submission time.
    pub timestamp: String,
}

/// Per-segment outcome reported by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestResult {
    /// Segment the result belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    /// Excerpt of the segment.
    #[serde(default, deserialize_with = "nullable")]
    pub snippet: String,
    /// Grid the segment was filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<GridId>,
    /// Outcome status (`new_entry`, `merged`, `needs_review`, ...).
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    /// Notes the integrator added to the grid summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_notes: Option<String>,
    /// Classifier that produced the assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Classifier error, when it fell back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One step in a segment's change history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLogEntry {
    /// What happened (`inserted`, `merged`, ...).
    pub action: String,
    /// Similarity score against existing content.
    #[serde(default)]
    pub similarity: f64,
    /// Free-text comment.
    #[serde(default, deserialize_with = "nullable")]
    pub comment: String,
    /// Grid the action applied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_id: Option<GridId>,
    /// Server-side time of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl SegmentLogEntry {
    /// Build a log entry without grid or time information.
    pub fn new(action: impl Into<String>, similarity: f64, comment: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            similarity,
            comment: comment.into(),
            grid_id: None,
            created_at: None,
        }
    }
}

/// `GET /api/grids` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridsResponse {
    /// Raw grid payloads.
    #[serde(default, deserialize_with = "nullable")]
    pub grids: Vec<RawGrid>,
}

/// `GET /api/segments/{id}/log` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentLogResponse {
    /// Echo of the requested segment.
    #[serde(default)]
    pub segment_id: Option<String>,
    /// History, oldest first.
    #[serde(default, deserialize_with = "nullable")]
    pub history: Vec<SegmentLogEntry>,
}

/// `POST /api/segments` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentsRequest<'a> {
    /// Segments to classify.
    pub segments: &'a [Segment],
}

/// `POST /api/segments` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestResponse {
    /// One result per submitted segment.
    #[serde(default, deserialize_with = "nullable")]
    pub results: Vec<IngestResult>,
}

/// JSON error body returned by the API on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_result_tolerates_partial_payload() {
        let json = r#"{"results": [{"segment_id": "manual-1-0", "snippet": "hello",
                        "grid_assignments": [], "classifier": "keyword",
                        "grid_id": 3, "status": "new_entry", "summary_notes": "added"},
                       {"snippet": null}]}"#;
        let response: IngestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].grid_id, Some(3));
        assert_eq!(response.results[0].classifier.as_deref(), Some("keyword"));
        assert_eq!(response.results[1], IngestResult::default());
    }

    #[test]
    fn test_segments_request_shape() {
        let segments = vec![Segment {
            source: "manual".to_string(),
            text: "text".to_string(),
            segment_id: "manual-1-0".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        }];
        let body = serde_json::to_value(SegmentsRequest { segments: &segments }).unwrap();
        assert_eq!(body["segments"][0]["segment_id"], "manual-1-0");
        assert_eq!(body["segments"][0]["source"], "manual");
    }
}
