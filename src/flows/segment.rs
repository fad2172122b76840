//! Transcript submission.
//!
//! A transcript is split into blank-line separated blocks, each becoming a
//! [`Segment`] with a client-assigned id. Validation happens before any
//! request: blank text and text with no blocks are rejected. After a
//! successful post the new segments are marked fresh for the configured
//! window and the grids are reloaded.

use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{error, info};

use crate::api::BoardApi;
use crate::error::{BoardError, Result};
use crate::model::{IngestResult, Segment};
use crate::store::BoardStore;
use crate::util::truncate_with_ellipsis;

use super::data::{load_grids, GridSource};

/// Source label used when the submitter leaves it blank.
pub const DEFAULT_SOURCE: &str = "manual";

/// Characters of the first line shown in the preview toast.
const PREVIEW_CHARS: usize = 40;

static BLOCK_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n+").expect("block separator pattern is valid"));

/// Split raw transcript text into trimmed, non-empty blocks.
///
/// Blocks are separated by one or more blank (or whitespace-only) lines.
pub fn split_segments(raw: &str) -> Vec<String> {
    BLOCK_SEPARATOR
        .split(raw)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Build outgoing segments for `blocks`, all stamped with `submitted_at`.
///
/// Ids are `manual-<unix millis>-<index>`, unique within the batch.
pub fn build_segments(blocks: &[String], source: &str, submitted_at: DateTime<Utc>) -> Vec<Segment> {
    let millis = submitted_at.timestamp_millis();
    let timestamp = submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    blocks
        .iter()
        .enumerate()
        .map(|(index, text)| Segment {
            source: source.to_string(),
            text: text.clone(),
            segment_id: format!("manual-{millis}-{index}"),
            timestamp: timestamp.clone(),
        })
        .collect()
}

/// What the user typed into the ingest form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Raw transcript.
    pub text: String,
    /// Origin label; blank means [`DEFAULT_SOURCE`].
    pub source: String,
}

impl SubmissionRequest {
    /// Create a request.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }

    /// Trimmed source, or the default when blank.
    pub fn effective_source(&self) -> &str {
        match self.source.trim() {
            "" => DEFAULT_SOURCE,
            source => source,
        }
    }

    /// Validate and split the request into segments.
    pub fn prepare(&self, submitted_at: DateTime<Utc>) -> Result<Vec<Segment>> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(BoardError::EmptyTranscript);
        }
        let blocks = split_segments(text);
        if blocks.is_empty() {
            return Err(BoardError::UnparseableTranscript);
        }
        Ok(build_segments(&blocks, self.effective_source(), submitted_at))
    }
}

/// Severity of an inline status or toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Neutral progress message.
    Info,
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// A message with a severity, shown next to the ingest form or as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentStatus {
    /// Severity.
    pub kind: StatusKind,
    /// Text shown to the user.
    pub message: String,
}

impl SegmentStatus {
    /// Informational message.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    /// Success message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    /// Error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    /// Shown while a submission is in flight.
    pub fn classifying() -> Self {
        Self::info("Classifying...")
    }

    /// Status for a failed submission.
    ///
    /// Input errors keep their own message; anything else is reported as a
    /// generic failure.
    pub fn from_error(err: &BoardError) -> Self {
        if err.is_input_error() {
            Self::error(err.to_string())
        } else {
            Self::error("Submission failed, please try again later")
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    /// Segments that were posted.
    pub segments: Vec<Segment>,
    /// Per-segment classifier results.
    pub results: Vec<IngestResult>,
    /// Where the reloaded grids came from.
    pub grid_source: GridSource,
    /// When the post succeeded; the fresh window starts here.
    #[serde(skip)]
    pub completed_at: Instant,
}

impl SubmitOutcome {
    /// Inline status after success.
    pub fn status_message(&self) -> SegmentStatus {
        SegmentStatus::success(format!("Done, uploaded {} segments", self.segments.len()))
    }

    /// Toasts announcing the submission: a count, then a preview of the
    /// first segment's first line when there is one.
    pub fn toast_messages(&self) -> Vec<SegmentStatus> {
        let mut toasts = vec![SegmentStatus::success(format!(
            "Added {} insights",
            self.segments.len()
        ))];

        let preview = self
            .segments
            .first()
            .and_then(|segment| segment.text.lines().next())
            .unwrap_or_default();
        if !preview.is_empty() {
            toasts.push(SegmentStatus::info(format!(
                "First segment: {}",
                truncate_with_ellipsis(preview, PREVIEW_CHARS)
            )));
        }
        toasts
    }
}

/// Validate, post and integrate a transcript.
///
/// Input errors return before any request. On success the segment ids are
/// added to the fresh set, the fresh clear is rescheduled to `fresh_window`
/// after the post completed and the grids are reloaded. A failed post leaves
/// the store untouched.
pub async fn submit_transcript(
    api: &dyn BoardApi,
    store: &mut BoardStore,
    request: &SubmissionRequest,
    fresh_window: Duration,
) -> Result<SubmitOutcome> {
    let segments = request.prepare(Utc::now())?;

    let response = match api.post_segments(&segments).await {
        Ok(response) => response,
        Err(e) => {
            error!(count = segments.len(), error = %e, "segment submission failed");
            return Err(e);
        }
    };
    let completed_at = Instant::now();
    info!(
        count = segments.len(),
        results = response.results.len(),
        "segments submitted"
    );

    store.add_recent_segments(segments.iter().map(|s| s.segment_id.clone()));
    store.schedule_fresh_clear(completed_at, fresh_window);
    let grid_source = load_grids(api, store).await?;

    Ok(SubmitOutcome {
        segments,
        results: response.results,
        grid_source,
        completed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OfflineApi;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    #[rstest]
    #[case("one", vec!["one"])]
    #[case("a\n\nb", vec!["a", "b"])]
    #[case("  a  \n \t \n\n\n  b\nc  ", vec!["a", "b\nc"])]
    #[case("a\nb", vec!["a\nb"])]
    #[case("\n\n \n\n", vec![])]
    fn test_split_segments(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_segments(raw), expected);
    }

    #[test]
    fn test_build_segments_ids_and_timestamps() {
        let blocks = vec!["first".to_string(), "second".to_string()];
        let segments = build_segments(&blocks, "standup", at(1_700_000_000_123));

        assert_eq!(segments[0].segment_id, "manual-1700000000123-0");
        assert_eq!(segments[1].segment_id, "manual-1700000000123-1");
        assert_eq!(segments[0].timestamp, "2023-11-14T22:13:20.123Z");
        assert_eq!(segments[1].source, "standup");
        assert_eq!(segments[1].text, "second");
    }

    #[test]
    fn test_prepare_validation() {
        let blank = SubmissionRequest::new("  \n\t ", "x");
        assert!(matches!(blank.prepare(at(0)), Err(BoardError::EmptyTranscript)));

        let request = SubmissionRequest::new("alpha\n\nbeta", "   ");
        let segments = request.prepare(at(0)).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_toast_messages() {
        let long_line = "x".repeat(50);
        let outcome = SubmitOutcome {
            segments: build_segments(
                &[format!("{long_line}\nsecond line"), "b".to_string()],
                "manual",
                at(0),
            ),
            results: Vec::new(),
            grid_source: GridSource::Fallback,
            completed_at: Instant::now(),
        };

        assert_eq!(outcome.status_message().message, "Done, uploaded 2 segments");
        let toasts = outcome.toast_messages();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0], SegmentStatus::success("Added 2 insights"));
        assert_eq!(toasts[1].kind, StatusKind::Info);
        assert_eq!(toasts[1].message, format!("First segment: {}…", "x".repeat(40)));
    }

    #[test]
    fn test_status_from_error() {
        let status = SegmentStatus::from_error(&BoardError::EmptyTranscript);
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.message, BoardError::EmptyTranscript.to_string());

        let status = SegmentStatus::from_error(&BoardError::Offline);
        assert_eq!(status.message, "Submission failed, please try again later");
    }

    #[tokio::test]
    async fn test_failed_post_leaves_store_untouched() {
        let mut store = BoardStore::new();
        let request = SubmissionRequest::new("a\n\nb", "");
        let result = submit_transcript(
            &OfflineApi,
            &mut store,
            &request,
            Duration::from_secs(8),
        )
        .await;

        assert!(matches!(result, Err(BoardError::Offline)));
        assert!(store.state().recent_segment_ids.is_empty());
        assert_eq!(store.fresh_deadline(), None);
    }
}
