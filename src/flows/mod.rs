//! Operations that combine the API with the store.
//!
//! Each flow owns one user-level action: loading grids, submitting a
//! transcript, searching entries, fetching a segment's history. Network
//! failures are absorbed here with fallback data where the board can keep
//! going; input errors are returned before any request is made.

pub mod data;
pub mod log;
pub mod search;
pub mod segment;

pub use data::{load_grids, refresh_grid, GridSource};
pub use log::{default_history, get_segment_log};
pub use search::{apply_search, filter_entries, SearchFilter};
pub use segment::{
    build_segments, split_segments, submit_transcript, SegmentStatus, StatusKind,
    SubmissionRequest, SubmitOutcome,
};
