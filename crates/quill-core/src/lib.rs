//! # quill-core
//!
//! Core types, traits, and text analysis for quill, a per-user note store.
//!
//! This crate provides the data model, the storage and clock seams other
//! quill crates plug into, and the rule-based analysis capture flows use to
//! enrich notes.

pub mod analysis;
pub mod capture;
pub mod defaults;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod search;
pub mod temporal;
pub mod tokenizer;
pub mod traits;

// Re-export commonly used types at crate root
pub use analysis::{default_categories, Category, RuleBasedAnalyzer, TextAnalyzer};
pub use capture::{
    quick_todo_note, template_note, LifeForm, ShoppingItem, StudyForm, TemplateForm, WorkForm,
};
pub use error::{Error, Result};
pub use export::{export_note_as_text, export_notes};
pub use models::*;
pub use search::SearchFilters;
pub use temporal::{format_time, format_time_ago, local_day_start, TimeRange};
pub use traits::*;
