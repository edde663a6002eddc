//! Structured logging field name constants for quill.
//!
//! All crates use these constants for consistent structured logging fields,
//! so whatever subscriber the host application installs can filter and
//! aggregate on the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Data could not be persisted or read back |
//! | WARN  | Recoverable issue, fallback applied (local summary, empty list) |
//! | INFO  | Note lifecycle events (saved, deleted, locked) |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (candidate scores, filter decisions) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "store", "search", "relevance", "analysis", "inference", "crypto"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "note_repository", "json_file_store", "baidu_ocr", "summarizer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "save", "delete", "search_notes", "related_notes", "transcribe"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note id being operated on.
pub const NOTE_ID: &str = "note_id";

/// User scope the operation runs under ("default" when anonymous).
pub const USER_ID: &str = "user_id";

/// Storage key touched.
pub const STORE_KEY: &str = "key";

/// Search keyword.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or recommendation.
pub const RESULT_COUNT: &str = "result_count";

/// Number of notes in a collection.
pub const NOTE_COUNT: &str = "note_count";

/// Byte length of a payload sent to a remote service.
pub const PAYLOAD_LEN: &str = "payload_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Whether a local fallback replaced a remote result.
pub const FALLBACK: &str = "fallback";
