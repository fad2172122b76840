//! Grid, mandala and entry types.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::nullable;

/// Identifier of a grid, unique across the collection.
pub type GridId = u32;

/// The central grid every navigation falls back to.
pub const ROOT_GRID_ID: GridId = 5;

/// Number of slots in a mandala layout.
pub const SLOT_COUNT: u8 = 9;

/// The slot holding the grid's own centre.
pub const CENTER_SLOT: u8 = 5;

/// Maximum number of surrounding items in a mandala.
pub const MAX_MANDALA_ITEMS: usize = 8;

/// Map a 1-based slot (row-major, 3×3) to its mandala item index.
///
/// Slots 1–4 map to items 0–3 and slots 6–9 to items 4–7. The centre slot
/// and anything outside 1..=9 have no item.
pub const fn slot_item_index(slot: u8) -> Option<usize> {
    match slot {
        1..=4 => Some(slot as usize - 1),
        6..=9 => Some(slot as usize - 2),
        _ => None,
    }
}

/// Inverse of [`slot_item_index`].
pub const fn item_slot(index: usize) -> Option<u8> {
    match index {
        0..=3 => Some(index as u8 + 1),
        4..=7 => Some(index as u8 + 2),
        _ => None,
    }
}

/// Classification status of an entry.
///
/// The wire form is the raw status string; anything other than the two
/// statuses the board reacts to is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryStatus {
    /// Freshly classified into a grid.
    NewEntry,
    /// Low-confidence classification awaiting human confirmation.
    NeedsReview,
    /// Any other status reported by the classifier.
    Other(String),
}

impl EntryStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NewEntry => "new_entry",
            Self::NeedsReview => "needs_review",
            Self::Other(s) => s,
        }
    }

    /// Whether the status string is missing.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Other(s) if s.is_empty())
    }
}

impl Default for EntryStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for EntryStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "new_entry" => Self::NewEntry,
            "needs_review" => Self::NeedsReview,
            _ => Self::Other(s),
        }
    }
}

impl From<EntryStatus> for String {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for EntryStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified transcript segment attached to a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Segment identity.
    #[serde(default, deserialize_with = "nullable")]
    pub segment_id: String,
    /// Short excerpt of the segment text.
    #[serde(default, deserialize_with = "nullable")]
    pub snippet: String,
    /// Where the segment came from (meeting name, "manual", ...).
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
    /// Classification status.
    #[serde(default, deserialize_with = "nullable")]
    pub status: EntryStatus,
    /// Classifier confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "nullable")]
    pub confidence: f64,
    /// Other grids this segment relates to.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub related_grids: Vec<GridId>,
    /// Server-side creation time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// One of the eight items surrounding a mandala centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandalaItem {
    /// Item title.
    #[serde(default)]
    pub title: String,
    /// One-line description.
    #[serde(default)]
    pub detail: String,
    /// Grid this item drills into, if navigable.
    #[serde(default, alias = "target_grid_id", skip_serializing_if = "Option::is_none")]
    pub target_grid_id: Option<GridId>,
}

/// The 3×3 breakdown of a grid: a centre theme plus up to 8 items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandala {
    /// Title shown in the centre slot.
    #[serde(default, alias = "center_title")]
    pub center_title: String,
    /// Centre statement.
    #[serde(default)]
    pub center: String,
    /// Surrounding items in slot order (minus the centre).
    #[serde(default, deserialize_with = "nullable")]
    pub items: Vec<MandalaItem>,
}

impl Mandala {
    /// Item shown in the given slot.
    pub fn item_at_slot(&self, slot: u8) -> Option<&MandalaItem> {
        slot_item_index(slot).and_then(|index| self.items.get(index))
    }
}

/// Grid payload as delivered by the API or the built-in dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGrid {
    /// Grid identity.
    #[serde(alias = "gridId")]
    pub grid_id: GridId,
    /// Title.
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    /// Audience or owner of the grid.
    #[serde(default)]
    pub persona: Option<String>,
    /// Summary bullets.
    #[serde(default, deserialize_with = "nullable")]
    pub summary: Vec<String>,
    /// Classified entries.
    #[serde(default, deserialize_with = "nullable")]
    pub entries: Vec<Entry>,
    /// Entries awaiting review.
    #[serde(default, alias = "needsReview")]
    pub needs_review: Option<Vec<Entry>>,
    /// Last update marker.
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,
    /// Mandala layout.
    #[serde(default)]
    pub mandala: Option<Mandala>,
    /// Grids related through entries.
    #[serde(default, deserialize_with = "nullable")]
    pub related_grids: Vec<GridId>,
    /// Precomputed "has new entry" flag of the built-in dataset.
    #[serde(default, rename = "hasNewEntry")]
    pub has_new_entry: Option<bool>,
    /// Precomputed review count of the built-in dataset.
    #[serde(default, rename = "needsReviewCount")]
    pub needs_review_count: Option<usize>,
}

/// A thematic grid with its notes and mandala layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    /// Grid identity.
    pub grid_id: GridId,
    /// Title.
    pub title: String,
    /// Audience or owner of the grid.
    pub persona: String,
    /// Summary bullets.
    pub summary: Vec<String>,
    /// Classified entries.
    pub entries: Vec<Entry>,
    /// Entries awaiting review.
    pub needs_review: Vec<Entry>,
    /// Last update marker (free text).
    pub updated_at: String,
    /// Mandala layout, if defined.
    pub mandala: Option<Mandala>,
    /// Grids related through entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_grids: Vec<GridId>,
    /// Whether the payload flagged new entries.
    pub has_new_entry: bool,
    /// Number of entries awaiting review.
    pub needs_review_count: usize,
}

impl From<RawGrid> for Grid {
    fn from(raw: RawGrid) -> Self {
        let needs_review_count = match &raw.needs_review {
            Some(list) => list.len(),
            None => raw.needs_review_count.unwrap_or(0),
        };
        let needs_review = raw
            .needs_review
            .unwrap_or_default()
            .into_iter()
            .map(|mut entry| {
                if entry.status.is_unset() {
                    entry.status = EntryStatus::NeedsReview;
                }
                entry
            })
            .collect();

        Self {
            grid_id: raw.grid_id,
            title: raw.title,
            persona: raw.persona.unwrap_or_default(),
            summary: raw.summary,
            entries: raw.entries,
            needs_review,
            updated_at: raw.updated_at.unwrap_or_default(),
            mandala: raw.mandala,
            related_grids: raw.related_grids,
            has_new_entry: raw.has_new_entry.unwrap_or(false),
            needs_review_count,
        }
    }
}

impl Grid {
    /// The grid's mandala, or a centre-only layout built from its title and
    /// first summary line.
    pub fn mandala_or_default(&self) -> Cow<'_, Mandala> {
        match &self.mandala {
            Some(mandala) => Cow::Borrowed(mandala),
            None => Cow::Owned(Mandala {
                center_title: self.title.clone(),
                center: self.summary.first().cloned().unwrap_or_default(),
                items: Vec::new(),
            }),
        }
    }

    /// Title shown in the centre slot.
    pub fn center_title(&self) -> &str {
        match &self.mandala {
            Some(m) if !m.center_title.is_empty() => &m.center_title,
            _ => &self.title,
        }
    }

    /// Find an entry (regular or needs-review) by segment id.
    pub fn find_entry(&self, segment_id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .chain(&self.needs_review)
            .find(|e| e.segment_id == segment_id)
    }
}

/// An entry found by search, tagged with the grid it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Owning grid.
    pub grid_id: GridId,
    /// Owning grid's title.
    pub grid_title: String,
    /// The matching entry.
    #[serde(flatten)]
    pub entry: Entry,
}

/// Normalize a list of raw payloads.
pub fn normalize_grids(raw: Vec<RawGrid>) -> Vec<Grid> {
    raw.into_iter().map(Grid::from).collect()
}
