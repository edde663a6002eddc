//! Search filter types shared by the search engine and its callers.

use serde::{Deserialize, Serialize};

use crate::models::Note;
use crate::temporal::TimeRange;

/// Filters applied on top of keyword matching. All present filters must hold.
///
/// # Example
///
/// ```
/// use quill_core::{SearchFilters, TimeRange};
///
/// let filters = SearchFilters::new()
///     .with_tag("学习")
///     .with_time_range(TimeRange::SevenDays);
/// assert!(!filters.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Exact tag the note must carry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Creation-time window ending now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.time_range = Some(range);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.time_range.is_none()
    }

    /// Whether `note` passes every filter, judged at time `now`.
    ///
    /// An empty tag string is treated as "no tag filter", the way list pages
    /// send it when "all" is selected.
    pub fn matches(&self, note: &Note, now: i64) -> bool {
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            if note.tag != tag {
                return false;
            }
        }
        if let Some(range) = self.time_range {
            if !range.contains(note.create_time, now) {
                return false;
            }
        }
        true
    }
}
