//! # quill-search
//!
//! Local search and related-note ranking for quill.
//!
//! This crate provides:
//! - Keyword search with tag and time-range filters
//! - Keyword highlighting for result lists
//! - Related notes ranked by tag, keyword, title, content and time signals
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quill_core::{Note, SearchFilters};
//! use quill_search::{RelevanceEngine, SearchEngine};
//! use quill_store::{MemoryStore, NoteRepository, UserScope};
//!
//! let repo = NoteRepository::new(Arc::new(MemoryStore::new()), UserScope::anonymous());
//! let a = repo.save(Note::new("复习计划", "").with_tag("学习")).unwrap();
//! repo.save(Note::new("考试安排", "").with_tag("学习")).unwrap();
//!
//! let hits = SearchEngine::new(&repo).search_notes("复习", &SearchFilters::new());
//! assert_eq!(hits.len(), 1);
//!
//! let related = RelevanceEngine::new(&repo).get_related_notes(a.id_str(), None);
//! assert_eq!(related[0].title, "考试安排");
//! ```

pub mod relevance;
pub mod search;

pub use relevance::{rank_related, score, RelatedNote, RelevanceEngine, RelevanceScore};
pub use search::{filter_notes, highlight, matches_keyword, SearchEngine, SearchHit};
