//! Keyword search with tag and time-range filters.
//!
//! Matching is a case-insensitive substring test against the title, the
//! content and each keyword. Results keep collection order (newest first);
//! nothing is re-ranked.

use std::time::Instant;

use quill_core::defaults::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};
use quill_core::{Note, SearchFilters};
use quill_store::NoteRepository;
use regex::RegexBuilder;
use serde::Serialize;
use tracing::debug;

/// A search result with highlighted copies of its title and content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub note: Note,
    pub highlighted_title: String,
    pub highlighted_content: String,
}

/// Whether `note` contains `keyword` in its title, content or keywords.
///
/// A blank keyword matches every note.
pub fn matches_keyword(note: &Note, keyword: &str) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(&needle)
        || note.content.to_lowercase().contains(&needle)
        || note
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(&needle))
}

/// Apply keyword and filters to a collection, judged at time `now`.
pub fn filter_notes(notes: &[Note], keyword: &str, filters: &SearchFilters, now: i64) -> Vec<Note> {
    notes
        .iter()
        .filter(|n| matches_keyword(n, keyword) && filters.matches(n, now))
        .cloned()
        .collect()
}

/// Wrap every case-insensitive occurrence of `keyword` in highlight markup.
///
/// The keyword is matched literally; regex metacharacters in it carry no
/// meaning. A blank keyword returns the text unchanged.
pub fn highlight(text: &str, keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return text.to_string();
    }

    let pattern = match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(_) => return text.to_string(),
    };

    pattern
        .replace_all(text, |caps: &regex::Captures| {
            format!("{}{}{}", HIGHLIGHT_OPEN, &caps[0], HIGHLIGHT_CLOSE)
        })
        .into_owned()
}

/// Search over one user's notes.
pub struct SearchEngine<'a> {
    repo: &'a NoteRepository,
}

impl<'a> SearchEngine<'a> {
    pub fn new(repo: &'a NoteRepository) -> Self {
        Self { repo }
    }

    /// Notes matching `keyword` and every filter, in collection order.
    pub fn search_notes(&self, keyword: &str, filters: &SearchFilters) -> Vec<Note> {
        self.search_notes_at(keyword, filters, self.repo.now_ms())
    }

    /// [`Self::search_notes`] with time-range filters judged at `now`.
    pub fn search_notes_at(&self, keyword: &str, filters: &SearchFilters, now: i64) -> Vec<Note> {
        let start = Instant::now();
        let notes = self.repo.get_all();
        let results = filter_notes(&notes, keyword, filters, now);

        debug!(
            subsystem = "search",
            op = "search_notes",
            query = keyword,
            tag = filters.tag.as_deref().unwrap_or(""),
            time_range = ?filters.time_range,
            note_count = notes.len(),
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        results
    }

    /// Search, highlight each hit and remember the keyword in the user's
    /// search history.
    pub fn search_with_highlights(&self, keyword: &str, filters: &SearchFilters) -> Vec<SearchHit> {
        let notes = self.search_notes(keyword, filters);
        self.repo.record_search(keyword);

        notes
            .into_iter()
            .map(|note| SearchHit {
                highlighted_title: highlight(&note.title, keyword),
                highlighted_content: highlight(&note.content, keyword),
                note,
            })
            .collect()
    }
}
