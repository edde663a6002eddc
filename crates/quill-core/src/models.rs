//! Core data models for quill.
//!
//! These types are shared across all quill crates. Field names serialize in
//! camelCase so collections written by earlier clients decode unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Capture flow a note came from.
///
/// Unknown values are kept verbatim in [`NoteType::Other`] so a collection
/// holding types this build does not know still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoteType {
    Voice,
    Photo,
    Handwrite,
    #[default]
    Document,
    Summary,
    Template,
    Todo,
    Meeting,
    Mistake,
    Drawing,
    QuickVoice,
    Other(String),
}

impl NoteType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Voice => "voice",
            Self::Photo => "photo",
            Self::Handwrite => "handwrite",
            Self::Document => "document",
            Self::Summary => "summary",
            Self::Template => "template",
            Self::Todo => "todo",
            Self::Meeting => "meeting",
            Self::Mistake => "mistake",
            Self::Drawing => "drawing",
            Self::QuickVoice => "quick-voice",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NoteType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "voice" => Self::Voice,
            "photo" => Self::Photo,
            "handwrite" => Self::Handwrite,
            "document" => Self::Document,
            "summary" => Self::Summary,
            "template" => Self::Template,
            "todo" => Self::Todo,
            "meeting" => Self::Meeting,
            "mistake" => Self::Mistake,
            "drawing" => Self::Drawing,
            "quick-voice" => Self::QuickVoice,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for NoteType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<NoteType> for String {
    fn from(t: NoteType) -> Self {
        match t {
            NoteType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-captured note.
///
/// `id`, `create_time` and `update_time` are owned by the repository: a note
/// without an id has never been saved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Category label.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: NoteType,
    /// Epoch milliseconds; fixed at first save.
    #[serde(default)]
    pub create_time: i64,
    /// Epoch milliseconds; refreshed on every save.
    #[serde(default)]
    pub update_time: i64,
    #[serde(default)]
    pub is_locked: bool,
    /// Argon2id PHC string of the lock password; present iff locked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    // Type-specific payloads, never interpreted by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistake_data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_data: Option<JsonValue>,

    /// Any other field found in storage, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Note {
    /// Create an unsaved note.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_todos<I, S>(mut self, todos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.todos = todos.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kind(mut self, kind: NoteType) -> Self {
        self.kind = kind;
        self
    }

    /// Preset the creation time (imports, tests). Saved notes keep it.
    pub fn with_create_time(mut self, create_time: i64) -> Self {
        self.create_time = create_time;
        self
    }

    /// The id as a string slice, empty for unsaved notes.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Whether the lock flag and the stored password agree.
    pub fn lock_state_consistent(&self) -> bool {
        let has_password = self.password.as_deref().is_some_and(|p| !p.is_empty());
        self.is_locked == has_password
    }
}

// =============================================================================
// ANALYSIS & STATS
// =============================================================================

/// Output of a [`crate::analysis::TextAnalyzer`] pass over captured text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub keywords: Vec<String>,
    pub title: String,
    pub tag: String,
    pub todos: Vec<String>,
}

impl TextAnalysis {
    /// Copy analysis results into a note, keeping fields the user already set.
    pub fn apply_to(&self, note: &mut Note) {
        if note.title.trim().is_empty() {
            note.title = self.title.clone();
        }
        if note.tag.is_empty() {
            note.tag = self.tag.clone();
        }
        if note.keywords.is_empty() {
            note.keywords = self.keywords.clone();
        }
        if note.todos.is_empty() {
            note.todos = self.todos.clone();
        }
    }
}

/// Dashboard counters for one user scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStats {
    pub total_notes: usize,
    pub today_notes: usize,
    pub total_tags: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_note_type_wire_names() {
        assert_eq!(
            serde_json::to_value(NoteType::QuickVoice).unwrap(),
            json!("quick-voice")
        );
        assert_eq!(
            serde_json::to_value(NoteType::Handwrite).unwrap(),
            json!("handwrite")
        );
        let t: NoteType = serde_json::from_value(json!("meeting")).unwrap();
        assert_eq!(t, NoteType::Meeting);
    }

    #[test]
    fn test_note_type_unknown_is_preserved() {
        let t: NoteType = serde_json::from_value(json!("whiteboard")).unwrap();
        assert_eq!(t, NoteType::Other("whiteboard".to_string()));
        assert_eq!(serde_json::to_value(&t).unwrap(), json!("whiteboard"));
    }

    #[test]
    fn test_note_decodes_stored_shape() {
        let stored = json!({
            "id": "note_1700000000000_abc123xyz",
            "title": "周会纪要",
            "content": "讨论项目进度",
            "tag": "工作",
            "keywords": ["项目", "进度"],
            "type": "meeting",
            "createTime": 1_700_000_000_000i64,
            "updateTime": 1_700_000_100_000i64,
            "isLocked": false,
            "meetingData": {"attendees": ["A", "B"]},
            "timeAgo": "3天前"
        });

        let note: Note = serde_json::from_value(stored).unwrap();
        assert_eq!(note.id_str(), "note_1700000000000_abc123xyz");
        assert_eq!(note.kind, NoteType::Meeting);
        assert_eq!(note.create_time, 1_700_000_000_000);
        assert!(note.meeting_data.is_some());
        assert_eq!(note.extra.get("timeAgo"), Some(&json!("3天前")));
        assert!(note.todos.is_empty());
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let note = Note::new("t", "c").with_create_time(5);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["createTime"], json!(5));
        assert_eq!(value["isLocked"], json!(false));
        assert_eq!(value["type"], json!("document"));
        assert!(value.get("id").is_none());
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_lock_state_consistent() {
        let mut note = Note::new("t", "c");
        assert!(note.lock_state_consistent());

        note.is_locked = true;
        assert!(!note.lock_state_consistent());

        note.password = Some(String::new());
        assert!(!note.lock_state_consistent());

        note.password = Some("$argon2id$...".to_string());
        assert!(note.lock_state_consistent());
    }

    #[test]
    fn test_analysis_apply_keeps_user_fields() {
        let analysis = TextAnalysis {
            keywords: vec!["复习".into()],
            title: "自动标题".into(),
            tag: "学习".into(),
            todos: vec!["交作业".into()],
        };
        let mut note = Note::new("我的标题", "正文");
        analysis.apply_to(&mut note);

        assert_eq!(note.title, "我的标题");
        assert_eq!(note.tag, "学习");
        assert_eq!(note.keywords, vec!["复习".to_string()]);
        assert_eq!(note.todos, vec!["交作业".to_string()]);
    }
}
