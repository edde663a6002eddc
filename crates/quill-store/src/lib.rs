//! # quill-store
//!
//! Local persistence for quill.
//!
//! This crate provides:
//! - In-memory and JSON-file [`KeyValueStore`](quill_core::KeyValueStore) backends
//! - Per-user key namespacing ([`UserScope`])
//! - The [`NoteRepository`]: notes, tags, recent views, search history
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quill_core::Note;
//! use quill_store::{MemoryStore, NoteRepository, UserScope};
//!
//! let repo = NoteRepository::new(Arc::new(MemoryStore::new()), UserScope::user("u1"));
//! let saved = repo.save(Note::new("周会", "讨论项目进度")).unwrap();
//! assert_eq!(repo.get_by_id(saved.id_str()).unwrap().title, "周会");
//! ```
pub mod kv;
pub mod notes;
pub mod scope;

pub use kv::{JsonFileStore, MemoryStore};
pub use notes::{generate_note_id, validate_lock_password, NoteRepository};
pub use scope::UserScope;
