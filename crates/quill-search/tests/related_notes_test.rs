/// Related-note ranking and search over a live repository.
use std::sync::Arc;

use quill_core::defaults::{DAY_MS, HOUR_MS};
use quill_core::{ManualClock, Note, SearchFilters, TimeRange};
use quill_search::{RelevanceEngine, SearchEngine};
use quill_store::{MemoryStore, NoteRepository, UserScope};

const T: i64 = 1_700_000_000_000;

fn setup() -> (NoteRepository, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T));
    let repo = NoteRepository::new(Arc::new(MemoryStore::new()), UserScope::user("u1"))
        .with_clock(clock.clone());
    (repo, clock)
}

#[test]
fn test_reference_pair_scores_eighteen() {
    let (repo, _) = setup();
    let a = repo
        .save(Note::new("", "").with_tag("学习").with_keywords(["复习", "考试"]))
        .unwrap();
    repo.save(
        Note::new("", "")
            .with_tag("学习")
            .with_keywords(["复习"])
            .with_create_time(T + HOUR_MS),
    )
    .unwrap();

    let related = RelevanceEngine::new(&repo).get_related_scored(a.id_str(), None);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].score.total(), 18);
}

#[test]
fn test_related_never_contains_target() {
    let (repo, _) = setup();
    let ids: Vec<String> = (0..6)
        .map(|i| {
            repo.save(Note::new(format!("复习 第{}章", i), "").with_tag("学习"))
                .unwrap()
                .id
                .unwrap()
        })
        .collect();

    let engine = RelevanceEngine::new(&repo);
    for id in &ids {
        let related = engine.get_related_notes(id, None);
        assert!(related.iter().all(|n| n.id_str() != id));
        assert_eq!(related.len(), 5);
    }
    assert_eq!(engine.get_related_notes(&ids[0], Some(2)).len(), 2);
}

#[test]
fn test_related_unknown_target_is_empty() {
    let (repo, _) = setup();
    repo.save(Note::new("a", "").with_tag("学习")).unwrap();
    assert!(RelevanceEngine::new(&repo)
        .get_related_notes("note_missing", None)
        .is_empty());
}

#[test]
fn test_deleted_note_drops_out_of_related() {
    let (repo, _) = setup();
    let a = repo.save(Note::new("a", "").with_tag("工作")).unwrap();
    let b = repo.save(Note::new("b", "").with_tag("工作")).unwrap();

    let engine = RelevanceEngine::new(&repo);
    assert_eq!(engine.get_related_notes(a.id_str(), None).len(), 1);

    assert!(repo.delete(b.id_str()));
    assert!(engine.get_related_notes(a.id_str(), None).is_empty());
}

#[test]
fn test_related_is_deterministic() {
    let (repo, clock) = setup();
    for i in 0..10 {
        clock.advance(DAY_MS / 2);
        repo.save(
            Note::new(format!("笔记 {}", i % 3), "")
                .with_tag(if i % 2 == 0 { "学习" } else { "工作" })
                .with_keywords([format!("k{}", i % 4)]),
        )
        .unwrap();
    }
    let target = repo.get_all()[4].id.clone().unwrap();
    let engine = RelevanceEngine::new(&repo);
    assert_eq!(
        engine.get_related_notes(&target, None),
        engine.get_related_notes(&target, None)
    );
}

#[test]
fn test_search_filters_against_repository_clock() {
    let (repo, clock) = setup();
    repo.save(Note::new("旧的复习笔记", "").with_tag("学习")).unwrap();
    clock.advance(40 * DAY_MS);
    repo.save(Note::new("新的复习笔记", "").with_tag("学习")).unwrap();
    repo.save(Note::new("复习客户资料", "").with_tag("工作")).unwrap();

    let engine = SearchEngine::new(&repo);
    let all = engine.search_notes("复习", &SearchFilters::new());
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "复习客户资料");

    let recent_study = engine.search_notes(
        "复习",
        &SearchFilters::new()
            .with_tag("学习")
            .with_time_range(TimeRange::ThirtyDays),
    );
    assert_eq!(recent_study.len(), 1);
    assert_eq!(recent_study[0].title, "新的复习笔记");

    let ninety = engine.search_notes(
        "",
        &SearchFilters::new().with_time_range(TimeRange::NinetyDays),
    );
    assert_eq!(ninety.len(), 3);
}

#[test]
fn test_time_range_excluding_every_note_is_empty() {
    let (repo, clock) = setup();
    repo.save(Note::new("复习计划", "").with_tag("学习")).unwrap();
    repo.save(Note::new("项目周报", "").with_tag("工作")).unwrap();
    clock.advance(8 * DAY_MS);

    let engine = SearchEngine::new(&repo);
    let filters = SearchFilters::new().with_time_range(TimeRange::SevenDays);
    assert!(engine.search_notes("", &filters).is_empty());
    assert!(engine.search_notes("复习", &filters).is_empty());
    assert_eq!(repo.get_all().len(), 2);
}
