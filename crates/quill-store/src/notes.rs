//! Note repository.
//!
//! Every collection (notes, tags, recent views, search history) lives under
//! one key in the user's scope and is rewritten whole on each mutation.
//! Storage failures stop here: they are logged and surface as `None`,
//! `false` or the unchanged collection, never as an error.

use std::sync::Arc;

use quill_core::defaults::{
    DEFAULT_TAGS, LOCK_PASSWORD_MAX_LEN, LOCK_PASSWORD_MIN_LEN, NOTES_KEY, NOTE_ID_PREFIX,
    RECENT_VIEWS_KEY, RECENT_VIEWS_LIMIT, SEARCH_HISTORY_KEY, SEARCH_HISTORY_LIMIT, TAGS_KEY,
};
use quill_core::{
    local_day_start, Clock, Error, KeyValueStore, Note, NoteStats, Result, SystemClock,
};
use quill_crypto::{constant_time_eq, is_phc_hash, LockHasher};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::scope::UserScope;

/// Generate a fresh note id: `note_` followed by a UUIDv7 in simple form.
///
/// UUIDv7 is time-ordered, so ids sort roughly by creation.
pub fn generate_note_id() -> String {
    format!("{}{}", NOTE_ID_PREFIX, Uuid::now_v7().simple())
}

/// Check a lock password against the allowed length in characters.
pub fn validate_lock_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(LOCK_PASSWORD_MIN_LEN..=LOCK_PASSWORD_MAX_LEN).contains(&len) {
        return Err(Error::InvalidInput(format!(
            "Lock password must be {}-{} characters, got {}",
            LOCK_PASSWORD_MIN_LEN, LOCK_PASSWORD_MAX_LEN, len
        )));
    }
    Ok(())
}

/// Whether a write may change a note's lock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockFields {
    /// Keep stored lock state; accept only hashed locks on new notes.
    Guard,
    /// Write the lock fields as given.
    Replace,
}

/// Notes, tags, recent views and search history for one user scope.
pub struct NoteRepository {
    store: Arc<dyn KeyValueStore>,
    scope: UserScope,
    clock: Arc<dyn Clock>,
    hasher: LockHasher,
}

impl NoteRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, scope: UserScope) -> Self {
        Self {
            store,
            scope,
            clock: Arc::new(SystemClock),
            hasher: LockHasher::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_hasher(mut self, hasher: LockHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn scope(&self) -> &UserScope {
        &self.scope
    }

    /// Current time according to the repository's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // =========================================================================
    // Collection plumbing
    // =========================================================================

    fn read_list<T: DeserializeOwned>(&self, base: &str) -> Result<Option<Vec<T>>> {
        match self.store.get(&self.scope.key(base))? {
            None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    fn write_list<T: Serialize>(&self, base: &str, items: &[T]) -> Result<()> {
        let value = serde_json::to_value(items)?;
        self.store.set(&self.scope.key(base), value)
    }

    /// Read a list, treating absence and failures as empty.
    fn read_list_or_empty<T: DeserializeOwned>(&self, base: &str, op: &str) -> Vec<T> {
        match self.read_list(base) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                warn!(
                    subsystem = "store",
                    component = "note_repository",
                    op,
                    user_id = %self.scope,
                    key = base,
                    error = %e,
                    "Failed to read collection, using empty"
                );
                Vec::new()
            }
        }
    }

    fn log_write_failure(&self, op: &str, base: &str, e: &Error) {
        warn!(
            subsystem = "store",
            component = "note_repository",
            op,
            user_id = %self.scope,
            key = base,
            error = %e,
            "Failed to persist collection"
        );
    }

    // =========================================================================
    // Notes
    // =========================================================================

    /// Insert or update a note.
    ///
    /// A note without an id gets a fresh one. `createTime` is set on first
    /// save (a preset non-zero value is kept) and never changes after;
    /// `updateTime` is refreshed on every save. Returns `None` when the
    /// collection could not be read or written.
    ///
    /// Lock state changes only through [`lock`](Self::lock) and
    /// [`remove_lock`](Self::remove_lock): an update keeps the stored
    /// `isLocked` and `password`, and a new note may arrive locked only
    /// with an Argon2id hash (otherwise it is refused with `None`).
    pub fn save(&self, note: Note) -> Option<Note> {
        self.persist(note, "save", LockFields::Guard)
    }

    fn persist(&self, note: Note, op: &str, lock_fields: LockFields) -> Option<Note> {
        let mut notes: Vec<Note> = match self.read_list(NOTES_KEY) {
            Ok(notes) => notes.unwrap_or_default(),
            Err(e) => {
                warn!(
                    subsystem = "store",
                    component = "note_repository",
                    op,
                    user_id = %self.scope,
                    error = %e,
                    "Refusing to save over unreadable collection"
                );
                return None;
            }
        };

        let now = self.clock.now_ms();
        let mut note = note;
        if note.id.as_deref().map_or(true, str::is_empty) {
            note.id = Some(generate_note_id());
        }

        let existing = notes.iter().position(|n| n.id == note.id);
        match (lock_fields, existing) {
            (LockFields::Replace, _) => {}
            (LockFields::Guard, Some(idx)) => {
                note.is_locked = notes[idx].is_locked;
                note.password = notes[idx].password.clone();
            }
            (LockFields::Guard, None) => {
                if !note.is_locked {
                    note.password = None;
                } else if !note.password.as_deref().map_or(false, is_phc_hash) {
                    warn!(
                        subsystem = "store",
                        component = "note_repository",
                        op,
                        note_id = note.id_str(),
                        "Refusing to save a locked note without a password hash"
                    );
                    return None;
                }
            }
        }

        if let Some(idx) = existing {
            note.create_time = notes[idx].create_time;
        } else if note.create_time == 0 {
            note.create_time = now;
        }
        note.update_time = now.max(note.create_time);

        match existing {
            Some(idx) => notes[idx] = note.clone(),
            None => notes.insert(0, note.clone()),
        }

        if let Err(e) = self.write_list(NOTES_KEY, &notes) {
            self.log_write_failure(op, NOTES_KEY, &e);
            return None;
        }

        debug!(
            subsystem = "store",
            op,
            note_id = note.id_str(),
            updated = existing.is_some(),
            note_count = notes.len(),
            "Note saved"
        );
        Some(note)
    }

    /// All notes, newest first. Empty when nothing is stored or the data
    /// cannot be read.
    pub fn get_all(&self) -> Vec<Note> {
        self.read_list_or_empty(NOTES_KEY, "get_all")
    }

    pub fn get_by_id(&self, id: &str) -> Option<Note> {
        self.get_all().into_iter().find(|n| n.has_id(id))
    }

    /// Permanently remove a note and drop it from recent views.
    ///
    /// Returns `false` when no such note exists or the write fails.
    pub fn delete(&self, id: &str) -> bool {
        let mut notes: Vec<Note> = match self.read_list(NOTES_KEY) {
            Ok(notes) => notes.unwrap_or_default(),
            Err(e) => {
                warn!(subsystem = "store", component = "note_repository", op = "delete", note_id = id, error = %e, "Failed to read notes");
                return false;
            }
        };

        let before = notes.len();
        notes.retain(|n| !n.has_id(id));
        if notes.len() == before {
            debug!(subsystem = "store", op = "delete", note_id = id, "No such note");
            return false;
        }

        if let Err(e) = self.write_list(NOTES_KEY, &notes) {
            self.log_write_failure("delete", NOTES_KEY, &e);
            return false;
        }

        self.remove_from_recent_views(id);
        info!(subsystem = "store", op = "delete", note_id = id, "Note deleted");
        true
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Lock a note behind a password of 4-8 characters.
    ///
    /// The password is stored as an Argon2id hash. Invalid passwords are
    /// rejected before anything is read; a missing note or a failed write
    /// is `Ok(false)`.
    pub fn lock(&self, id: &str, password: &str) -> Result<bool> {
        validate_lock_password(password)?;

        let Some(mut note) = self.get_by_id(id) else {
            debug!(subsystem = "store", op = "lock", note_id = id, "No such note");
            return Ok(false);
        };

        let hash = match self.hasher.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(subsystem = "store", op = "lock", note_id = id, error = %e, "Failed to hash lock password");
                return Ok(false);
            }
        };

        note.is_locked = true;
        note.password = Some(hash);
        let locked = self.persist(note, "lock", LockFields::Replace).is_some();
        if locked {
            info!(subsystem = "store", op = "lock", note_id = id, "Note locked");
        }
        Ok(locked)
    }

    /// Whether `password` opens a locked note. Never changes the note.
    pub fn unlock(&self, id: &str, password: &str) -> bool {
        let Some(note) = self.get_by_id(id) else {
            return false;
        };
        if !note.is_locked {
            return false;
        }
        match note.password.as_deref() {
            Some(stored) if !stored.is_empty() => self.password_matches(id, password, stored),
            _ => false,
        }
    }

    fn password_matches(&self, id: &str, password: &str, stored: &str) -> bool {
        if is_phc_hash(stored) {
            return self.hasher.verify(password, stored).unwrap_or_else(|e| {
                warn!(subsystem = "store", op = "unlock", note_id = id, error = %e, "Failed to verify lock password");
                false
            });
        }

        warn!(
            subsystem = "store",
            op = "unlock",
            note_id = id,
            "Note carries a plaintext lock password; re-lock to hash it"
        );
        constant_time_eq(password.as_bytes(), stored.as_bytes())
    }

    /// Verify the password, then clear the lock.
    pub fn remove_lock(&self, id: &str, password: &str) -> bool {
        if !self.unlock(id, password) {
            return false;
        }
        let Some(mut note) = self.get_by_id(id) else {
            return false;
        };
        note.is_locked = false;
        note.password = None;
        let removed = self
            .persist(note, "remove_lock", LockFields::Replace)
            .is_some();
        if removed {
            info!(subsystem = "store", op = "remove_lock", note_id = id, "Lock removed");
        }
        removed
    }

    // =========================================================================
    // Recent views
    // =========================================================================

    /// Move (or insert) a note id to the front of recent views, keeping at
    /// most ten entries.
    pub fn add_to_recent_views(&self, id: &str) -> bool {
        let mut ids: Vec<String> = self.read_list_or_empty(RECENT_VIEWS_KEY, "add_to_recent_views");
        ids.retain(|existing| existing != id);
        ids.insert(0, id.to_string());
        ids.truncate(RECENT_VIEWS_LIMIT);

        match self.write_list(RECENT_VIEWS_KEY, &ids) {
            Ok(()) => true,
            Err(e) => {
                self.log_write_failure("add_to_recent_views", RECENT_VIEWS_KEY, &e);
                false
            }
        }
    }

    /// Recently viewed note ids, most recent first.
    pub fn get_recent_view_ids(&self) -> Vec<String> {
        self.read_list_or_empty(RECENT_VIEWS_KEY, "get_recent_views")
    }

    /// Recently viewed notes, most recent first. Ids of deleted notes are
    /// skipped.
    pub fn get_recent_views(&self) -> Vec<Note> {
        let ids = self.get_recent_view_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        let notes = self.get_all();
        ids.iter()
            .filter_map(|id| notes.iter().find(|n| n.has_id(id)).cloned())
            .collect()
    }

    fn remove_from_recent_views(&self, id: &str) {
        let mut ids = self.get_recent_view_ids();
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() != before {
            if let Err(e) = self.write_list(RECENT_VIEWS_KEY, &ids) {
                self.log_write_failure("delete", RECENT_VIEWS_KEY, &e);
            }
        }
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// The tag registry in insertion order; the default seed when none is
    /// stored.
    pub fn get_all_tags(&self) -> Vec<String> {
        match self.read_list::<String>(TAGS_KEY) {
            Ok(Some(tags)) => tags,
            Ok(None) => default_tags(),
            Err(e) => {
                warn!(subsystem = "store", op = "get_all_tags", user_id = %self.scope, error = %e, "Failed to read tags, using defaults");
                default_tags()
            }
        }
    }

    /// Append a tag to the registry.
    ///
    /// The tag is trimmed first. Blank tags are `InvalidInput` and tags
    /// already present are `DuplicateTag`; neither changes the registry. A
    /// failed write is logged and the unchanged registry returned.
    pub fn add_tag(&self, tag: &str) -> Result<Vec<String>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(Error::InvalidInput("Tag cannot be empty".to_string()));
        }

        let mut tags = self.get_all_tags();
        if tags.iter().any(|t| t == tag) {
            return Err(Error::DuplicateTag(tag.to_string()));
        }

        tags.push(tag.to_string());
        if let Err(e) = self.write_list(TAGS_KEY, &tags) {
            self.log_write_failure("add_tag", TAGS_KEY, &e);
            tags.pop();
        }
        Ok(tags)
    }

    /// Remove a tag from the registry. Notes carrying the tag keep it.
    pub fn delete_tag(&self, tag: &str) -> bool {
        let mut tags = self.get_all_tags();
        let before = tags.len();
        tags.retain(|t| t != tag);
        if tags.len() == before {
            return false;
        }

        match self.write_list(TAGS_KEY, &tags) {
            Ok(()) => true,
            Err(e) => {
                self.log_write_failure("delete_tag", TAGS_KEY, &e);
                false
            }
        }
    }

    // =========================================================================
    // Search history
    // =========================================================================

    /// Remember a search keyword, most recent first, ten at most.
    /// Blank keywords are ignored.
    pub fn record_search(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }

        let mut history: Vec<String> =
            self.read_list_or_empty(SEARCH_HISTORY_KEY, "record_search");
        history.retain(|k| k != keyword);
        history.insert(0, keyword.to_string());
        history.truncate(SEARCH_HISTORY_LIMIT);

        match self.write_list(SEARCH_HISTORY_KEY, &history) {
            Ok(()) => true,
            Err(e) => {
                self.log_write_failure("record_search", SEARCH_HISTORY_KEY, &e);
                false
            }
        }
    }

    pub fn get_search_history(&self) -> Vec<String> {
        self.read_list_or_empty(SEARCH_HISTORY_KEY, "get_search_history")
    }

    pub fn clear_search_history(&self) -> bool {
        self.remove_keys("clear_search_history", &[SEARCH_HISTORY_KEY])
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    fn remove_keys(&self, op: &str, bases: &[&str]) -> bool {
        let mut ok = true;
        for base in bases {
            if let Err(e) = self.store.remove(&self.scope.key(base)) {
                warn!(subsystem = "store", op, user_id = %self.scope, key = *base, error = %e, "Failed to remove collection");
                ok = false;
            }
        }
        ok
    }

    /// Drop search history and recent views. Notes and tags are kept.
    pub fn clear_cache(&self) -> bool {
        self.remove_keys("clear_cache", &[SEARCH_HISTORY_KEY, RECENT_VIEWS_KEY])
    }

    /// Drop every collection in this scope. Other users' data is untouched.
    pub fn clear_all_data(&self) -> bool {
        let ok = self.remove_keys(
            "clear_all_data",
            &[NOTES_KEY, TAGS_KEY, RECENT_VIEWS_KEY, SEARCH_HISTORY_KEY],
        );
        if ok {
            info!(subsystem = "store", op = "clear_all_data", user_id = %self.scope, "Cleared all data");
        }
        ok
    }

    /// Note and tag counters; "today" starts at local midnight.
    pub fn stats(&self) -> NoteStats {
        let notes = self.get_all();
        let day_start = local_day_start(self.clock.now_ms());
        NoteStats {
            total_notes: notes.len(),
            today_notes: notes.iter().filter(|n| n.create_time >= day_start).count(),
            total_tags: self.get_all_tags().len(),
        }
    }
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}
