//! Related-note ranking.
//!
//! Every other note is scored against the target with additive signals:
//!
//! | Signal | Condition | Points |
//! |--------|-----------|--------|
//! | Tag | equal, non-empty tag | 10 |
//! | Keywords | each distinct shared keyword | 5 |
//! | Title tokens | each distinct shared title token | 3 |
//! | Content keywords | each shared repeated content token | 2 |
//! | Temporal | created < 1 day apart / < 7 days apart | 3 / 1 |
//!
//! Notes scoring zero are dropped; the rest are stably sorted by score, so
//! ties keep collection order (newest first).

use std::time::Instant;

use quill_core::defaults::{
    DAY_MS, RELATED_NOTES_LIMIT, SCORE_CONTENT_KEYWORD, SCORE_KEYWORD, SCORE_SAME_DAY,
    SCORE_SAME_WEEK, SCORE_TAG_MATCH, SCORE_TITLE_TOKEN, WEEK_MS,
};
use quill_core::tokenizer::{content_keywords, overlap_count, unique_tokens};
use quill_core::Note;
use quill_store::NoteRepository;
use serde::Serialize;
use tracing::{debug, trace};

/// Per-signal breakdown of a relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceScore {
    pub tag: u32,
    pub keywords: u32,
    pub title_tokens: u32,
    pub content_keywords: u32,
    pub temporal: u32,
}

impl RelevanceScore {
    pub fn total(&self) -> u32 {
        self.tag + self.keywords + self.title_tokens + self.content_keywords + self.temporal
    }
}

/// A candidate with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedNote {
    pub note: Note,
    pub score: RelevanceScore,
}

fn temporal_points(a: i64, b: i64) -> u32 {
    let gap = a.abs_diff(b);
    if gap < DAY_MS as u64 {
        SCORE_SAME_DAY
    } else if gap < WEEK_MS as u64 {
        SCORE_SAME_WEEK
    } else {
        0
    }
}

/// Score `candidate` against `target`. Symmetric.
pub fn score(target: &Note, candidate: &Note) -> RelevanceScore {
    let tag = if !target.tag.is_empty() && target.tag == candidate.tag {
        SCORE_TAG_MATCH
    } else {
        0
    };

    let keywords = overlap_count(&target.keywords, &candidate.keywords) as u32 * SCORE_KEYWORD;

    let title_tokens = overlap_count(
        &unique_tokens(&target.title),
        &unique_tokens(&candidate.title),
    ) as u32
        * SCORE_TITLE_TOKEN;

    let content = overlap_count(
        &content_keywords(&target.content),
        &content_keywords(&candidate.content),
    ) as u32
        * SCORE_CONTENT_KEYWORD;

    RelevanceScore {
        tag,
        keywords,
        title_tokens,
        content_keywords: content,
        temporal: temporal_points(target.create_time, candidate.create_time),
    }
}

/// Rank `candidates` against `target`, best first, at most `limit` results.
///
/// Candidates sharing the target's id are skipped.
pub fn rank_related(target: &Note, candidates: &[Note], limit: usize) -> Vec<RelatedNote> {
    let mut scored: Vec<RelatedNote> = candidates
        .iter()
        .filter(|c| target.id.is_none() || c.id != target.id)
        .filter_map(|c| {
            let s = score(target, c);
            trace!(note_id = c.id_str(), score = s.total(), "Candidate scored");
            (s.total() > 0).then(|| RelatedNote {
                note: c.clone(),
                score: s,
            })
        })
        .collect();

    // sort_by is stable: equal scores keep collection order.
    scored.sort_by(|a, b| b.score.total().cmp(&a.score.total()));
    scored.truncate(limit);
    scored
}

/// Related notes for one user's collection.
pub struct RelevanceEngine<'a> {
    repo: &'a NoteRepository,
}

impl<'a> RelevanceEngine<'a> {
    pub fn new(repo: &'a NoteRepository) -> Self {
        Self { repo }
    }

    /// Scored related notes for `note_id`. `limit` defaults to 5.
    ///
    /// An unknown id yields an empty list.
    pub fn get_related_scored(&self, note_id: &str, limit: Option<usize>) -> Vec<RelatedNote> {
        let start = Instant::now();
        let notes = self.repo.get_all();
        let Some(target) = notes.iter().find(|n| n.has_id(note_id)) else {
            debug!(subsystem = "relevance", op = "related_notes", note_id, "Target note not found");
            return Vec::new();
        };

        let related = rank_related(target, &notes, limit.unwrap_or(RELATED_NOTES_LIMIT));
        debug!(
            subsystem = "relevance",
            op = "related_notes",
            note_id,
            note_count = notes.len(),
            result_count = related.len(),
            top_score = related.first().map(|r| r.score.total()).unwrap_or(0),
            duration_ms = start.elapsed().as_millis() as u64,
            "Related notes ranked"
        );
        related
    }

    /// Related notes for `note_id`, best first. `limit` defaults to 5.
    pub fn get_related_notes(&self, note_id: &str, limit: Option<usize>) -> Vec<Note> {
        self.get_related_scored(note_id, limit)
            .into_iter()
            .map(|r| r.note)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::defaults::HOUR_MS;

    const T: i64 = 1_700_000_000_000;

    fn note(id: &str) -> Note {
        let mut n = Note::new("", "");
        n.id = Some(id.to_string());
        n.create_time = T;
        n
    }

    #[test]
    fn test_score_reference_scenario() {
        let a = note("a").with_tag("学习").with_keywords(["复习", "考试"]);
        let b = note("b")
            .with_tag("学习")
            .with_keywords(["复习"])
            .with_create_time(T + HOUR_MS);

        let s = score(&a, &b);
        assert_eq!(s.tag, 10);
        assert_eq!(s.keywords, 5);
        assert_eq!(s.temporal, 3);
        assert_eq!(s.total(), 18);
    }

    #[test]
    fn test_score_is_symmetric() {
        let a = note("a")
            .with_tag("工作")
            .with_keywords(["项目", "客户", "项目"])
            .with_create_time(T - 3 * DAY_MS);
        let mut b = note("b").with_tag("工作").with_keywords(["项目"]);
        b.title = "项目 周报".into();
        assert_eq!(score(&a, &b), score(&b, &a));
    }

    #[test]
    fn test_empty_tags_do_not_match() {
        let s = score(&note("a"), &note("b"));
        assert_eq!(s.tag, 0);
        assert_eq!(s.temporal, 3);
    }

    #[test]
    fn test_title_tokens_and_content_keywords() {
        let mut a = note("a").with_create_time(0);
        a.title = "期末 复习 计划".into();
        a.content = "高数 高数 线代 线代 英语".into();
        let mut b = note("b").with_create_time(30 * DAY_MS);
        b.title = "复习 计划 安排".into();
        b.content = "高数 高数 英语 英语".into();

        let s = score(&a, &b);
        assert_eq!(s.title_tokens, 6);
        // only 高数 repeats in both
        assert_eq!(s.content_keywords, 2);
        assert_eq!(s.temporal, 0);
    }

    #[test]
    fn test_temporal_thresholds() {
        assert_eq!(temporal_points(T, T + DAY_MS - 1), 3);
        assert_eq!(temporal_points(T, T + DAY_MS), 1);
        assert_eq!(temporal_points(T + WEEK_MS - 1, T), 1);
        assert_eq!(temporal_points(T, T + WEEK_MS), 0);
    }

    #[test]
    fn test_identical_notes_lower_bound() {
        let a = note("a").with_tag("学习").with_keywords(["复习", "考试", "作业"]);
        let b = note("b").with_tag("学习").with_keywords(["复习", "考试", "作业"]);
        assert!(score(&a, &b).total() >= 10 + 5 * 3);
    }

    #[test]
    fn test_rank_related_excludes_target_and_zero_scores() {
        let target = note("t").with_tag("学习");
        let far = |id: &str| note(id).with_create_time(T - 30 * DAY_MS);
        let candidates = vec![
            target.clone(),
            far("unrelated").with_tag("生活"),
            far("same_tag").with_tag("学习"),
        ];
        let related = rank_related(&target, &candidates, 5);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].note.id_str(), "same_tag");
    }

    #[test]
    fn test_rank_related_stable_ties_and_limit() {
        let target = note("t").with_tag("学习");
        let candidates: Vec<Note> = (0..8)
            .map(|i| note(&format!("n{}", i)).with_tag("学习"))
            .collect();
        let related = rank_related(&target, &candidates, 5);
        let ids: Vec<_> = related.iter().map(|r| r.note.id_str()).collect();
        assert_eq!(ids, vec!["n0", "n1", "n2", "n3", "n4"]);
    }

    #[test]
    fn test_rank_related_orders_by_total() {
        let target = note("t").with_tag("学习").with_keywords(["复习"]);
        let candidates = vec![
            note("weak").with_create_time(T + 2 * DAY_MS),
            note("strong").with_tag("学习").with_keywords(["复习"]),
            note("middle").with_tag("学习"),
        ];
        let related = rank_related(&target, &candidates, 5);
        let ids: Vec<_> = related.iter().map(|r| r.note.id_str()).collect();
        assert_eq!(ids, vec!["strong", "middle", "weak"]);
    }
}
