//! Centralized default constants for quill.
//!
//! Every crate references these instead of defining its own magic numbers.
//! Organized by domain area.

// =============================================================================
// STORAGE KEYS
// =============================================================================

/// Base key of the note collection.
pub const NOTES_KEY: &str = "notes";

/// Base key of the tag registry.
pub const TAGS_KEY: &str = "tags";

/// Base key of the recently viewed note ids.
pub const RECENT_VIEWS_KEY: &str = "recentViews";

/// Base key of the search keyword history.
pub const SEARCH_HISTORY_KEY: &str = "searchHistory";

/// Tags seeded into a registry that has never been written.
pub const DEFAULT_TAGS: [&str; 4] = ["学习", "工作", "生活", "灵感"];

/// Prefix of generated note ids.
pub const NOTE_ID_PREFIX: &str = "note_";

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum number of recently viewed ids kept.
pub const RECENT_VIEWS_LIMIT: usize = 10;

/// Maximum number of search keywords kept.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

/// Default number of related notes returned.
pub const RELATED_NOTES_LIMIT: usize = 5;

/// Lock password length bounds (characters, inclusive).
pub const LOCK_PASSWORD_MIN_LEN: usize = 4;
pub const LOCK_PASSWORD_MAX_LEN: usize = 8;

/// Largest document accepted for enhancement (10 MB).
pub const DOCUMENT_MAX_BYTES: u64 = 10 * 1024 * 1024;

// =============================================================================
// TIME
// =============================================================================

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;
/// "Month" as used by relative time display.
pub const MONTH_MS: i64 = 30 * DAY_MS;

// =============================================================================
// RELEVANCE SCORING
// =============================================================================

/// Points for an identical tag.
pub const SCORE_TAG_MATCH: u32 = 10;

/// Points per shared keyword.
pub const SCORE_KEYWORD: u32 = 5;

/// Points per shared title token.
pub const SCORE_TITLE_TOKEN: u32 = 3;

/// Points per shared content keyword.
pub const SCORE_CONTENT_KEYWORD: u32 = 2;

/// Points when notes were created less than a day apart.
pub const SCORE_SAME_DAY: u32 = 3;

/// Points when notes were created less than a week apart.
pub const SCORE_SAME_WEEK: u32 = 1;

/// Minimum token length (characters) kept by the relevance tokenizer.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Minimum occurrences for a content token to count as a keyword.
pub const CONTENT_KEYWORD_MIN_FREQ: usize = 2;

/// Maximum content keywords considered per note.
pub const CONTENT_KEYWORD_LIMIT: usize = 10;

// =============================================================================
// TEXT ANALYSIS
// =============================================================================

/// Number of keywords returned by the rule-based extractor.
pub const KEYWORD_LIMIT: usize = 5;

/// Title length (characters) before truncation.
pub const TITLE_MAX_CHARS: usize = 20;

/// Category used when no trigger word matches.
pub const DEFAULT_CATEGORY: &str = "生活";

/// Tag given to enhanced documents without a category.
pub const DEFAULT_DOCUMENT_CATEGORY: &str = "学习";

// =============================================================================
// SEARCH
// =============================================================================

/// Markup wrapped around highlighted keyword occurrences.
pub const HIGHLIGHT_OPEN: &str = "<span class=\"highlight\">";
pub const HIGHLIGHT_CLOSE: &str = "</span>";

// =============================================================================
// REMOTE SERVICES
// =============================================================================

/// Default base URL of the Baidu AI open platform (OCR + OAuth token).
pub const BAIDU_AIP_URL: &str = "https://aip.baidubce.com";

/// Default base URL of the Baidu speech recognition endpoint.
pub const BAIDU_SPEECH_URL: &str = "https://vop.baidu.com";

/// Client id reported to the speech service.
pub const SPEECH_CUID: &str = "quill";

/// Audio sample rate sent to the speech service.
pub const SPEECH_SAMPLE_RATE: u32 = 16000;

/// Default request timeout for recognition services, in seconds.
pub const SERVICE_TIMEOUT_SECS: u64 = 30;

/// Default request timeout for summary / document services, in seconds.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 60;

/// Seconds before token expiry at which a cached access token is refreshed.
pub const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;

// Environment variable names.
pub const ENV_OCR_API_KEY: &str = "QUILL_OCR_API_KEY";
pub const ENV_OCR_SECRET_KEY: &str = "QUILL_OCR_SECRET_KEY";
pub const ENV_OCR_BASE_URL: &str = "QUILL_OCR_BASE_URL";
pub const ENV_SPEECH_API_KEY: &str = "QUILL_SPEECH_API_KEY";
pub const ENV_SPEECH_SECRET_KEY: &str = "QUILL_SPEECH_SECRET_KEY";
pub const ENV_SPEECH_BASE_URL: &str = "QUILL_SPEECH_BASE_URL";
pub const ENV_SPEECH_TOKEN_URL: &str = "QUILL_SPEECH_TOKEN_URL";
pub const ENV_SUMMARY_URL: &str = "QUILL_SUMMARY_URL";
pub const ENV_DOCUMENT_URL: &str = "QUILL_DOCUMENT_URL";
pub const ENV_SERVICE_API_KEY: &str = "QUILL_SERVICE_API_KEY";
pub const ENV_SERVICE_TIMEOUT_SECS: &str = "QUILL_SERVICE_TIMEOUT_SECS";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_constants_consistent() {
        assert_eq!(DAY_MS, 86_400_000);
        assert_eq!(WEEK_MS, 7 * DAY_MS);
        assert_eq!(MONTH_MS, 30 * DAY_MS);
    }

    #[test]
    fn test_password_bounds_ordered() {
        assert!(LOCK_PASSWORD_MIN_LEN <= LOCK_PASSWORD_MAX_LEN);
    }

    #[test]
    fn test_default_category_is_a_default_tag() {
        assert!(DEFAULT_TAGS.contains(&DEFAULT_CATEGORY));
        assert!(DEFAULT_TAGS.contains(&DEFAULT_DOCUMENT_CATEGORY));
    }
}
