/// Repository invariants that must hold across any sequence of operations:
/// saving is idempotent, timestamps stay ordered, the lock flag tracks the
/// stored hash, and user scopes never see each other's data.
use std::sync::Arc;

use quill_core::{KeyValueStore, ManualClock, Note};
use quill_crypto::{KdfParams, LockHasher};
use quill_store::{JsonFileStore, MemoryStore, NoteRepository, UserScope};

const T0: i64 = 1_700_000_000_000;

fn repo_on(store: Arc<dyn KeyValueStore>, user: &str, clock: Arc<ManualClock>) -> NoteRepository {
    NoteRepository::new(store, UserScope::user(user))
        .with_clock(clock)
        .with_hasher(LockHasher::new(KdfParams::low_memory()))
}

#[test]
fn test_save_twice_is_idempotent_except_update_time() {
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(Arc::new(MemoryStore::new()), "u1", clock.clone());

    let first = repo.save(Note::new("标题", "内容").with_tag("学习")).unwrap();
    clock.advance(60_000);
    let second = repo.save(first.clone()).unwrap();

    assert_eq!(repo.get_all().len(), 1);
    assert_eq!(second.id, first.id);
    assert_eq!(second.create_time, first.create_time);
    assert_eq!(second.update_time, T0 + 60_000);

    let mut a = first.clone();
    let mut b = second.clone();
    a.update_time = 0;
    b.update_time = 0;
    assert_eq!(a, b);
}

#[test]
fn test_create_time_never_exceeds_update_time() {
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(Arc::new(MemoryStore::new()), "u1", clock.clone());

    let mut note = repo.save(Note::new("n", "")).unwrap();
    for step in [1_000, 0, 5, 86_400_000] {
        clock.advance(step);
        note.content.push('x');
        note = repo.save(note).unwrap();
    }
    repo.save(Note::new("future", "").with_create_time(T0 + 10 * 86_400_000))
        .unwrap();

    for n in repo.get_all() {
        assert!(n.create_time <= n.update_time, "{} violates ordering", n.title);
    }
}

#[test]
fn test_ids_unique_across_many_saves() {
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(Arc::new(MemoryStore::new()), "u1", clock);
    for i in 0..50 {
        repo.save(Note::new(format!("n{}", i), "")).unwrap();
    }
    let mut ids: Vec<String> = repo.get_all().iter().map(|n| n.id_str().to_string()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn test_lock_flag_tracks_password_through_lifecycle() {
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(Arc::new(MemoryStore::new()), "u1", clock);
    let id = repo.save(Note::new("私密", "日记")).unwrap().id.unwrap();

    let check = |repo: &NoteRepository| {
        for n in repo.get_all() {
            assert!(n.lock_state_consistent());
        }
    };

    check(&repo);
    repo.lock(&id, "abcd").unwrap();
    check(&repo);
    assert!(!repo.unlock(&id, "abce"));
    check(&repo);
    repo.remove_lock(&id, "abcd");
    check(&repo);
}

#[test]
fn test_lock_never_stores_plaintext() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(store.clone(), "u1", clock);
    let id = repo.save(Note::new("t", "")).unwrap().id.unwrap();

    repo.lock(&id, "p4ss").unwrap();
    let raw = store.get("notes_u1").unwrap().unwrap().to_string();
    assert!(!raw.contains("\"p4ss\""));
    assert!(raw.contains("$argon2id$"));
}

#[test]
fn test_user_scopes_are_isolated() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let alice = repo_on(store.clone(), "alice", clock.clone());
    let bob = repo_on(store.clone(), "bob", clock.clone());
    let shared = NoteRepository::new(store.clone(), UserScope::anonymous());

    let a = alice.save(Note::new("alice note", "")).unwrap();
    alice.add_tag("私人").unwrap();
    alice.record_search("alice");

    assert!(bob.get_all().is_empty());
    assert!(bob.get_by_id(a.id_str()).is_none());
    assert!(!bob.get_all_tags().contains(&"私人".to_string()));
    assert!(bob.get_search_history().is_empty());
    assert!(shared.get_all().is_empty());

    assert!(store.get("notes_alice").unwrap().is_some());
    assert!(store.get("notes").unwrap().is_none());
}

#[test]
fn test_quota_failure_returns_none_and_keeps_collection() {
    let store = Arc::new(MemoryStore::new().with_quota_bytes(600));
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(store, "u1", clock);

    let kept = repo.save(Note::new("small", "ok")).unwrap();
    let huge = Note::new("big", "字".repeat(1_000));
    assert!(repo.save(huge).is_none());

    let all = repo.get_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, kept.id);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(T0));

    let id = {
        let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
        let repo = repo_on(store, "用户一", clock.clone());
        let note = repo.save(Note::new("持久化", "写入磁盘")).unwrap();
        repo.add_tag("磁盘").unwrap();
        repo.add_to_recent_views(note.id_str());
        note.id.unwrap()
    };

    let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let repo = repo_on(store, "用户一", clock);
    let note = repo.get_by_id(&id).unwrap();
    assert_eq!(note.content, "写入磁盘");
    assert!(repo.get_all_tags().contains(&"磁盘".to_string()));
    assert_eq!(repo.get_recent_views().len(), 1);
}

#[test]
fn test_unknown_fields_survive_save() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(store.clone(), "u1", clock);

    store
        .set(
            "notes_u1",
            serde_json::json!([{
                "id": "note_legacy",
                "title": "旧笔记",
                "content": "",
                "type": "whiteboard",
                "createTime": T0 - 1,
                "updateTime": T0 - 1,
                "color": "#ffcc00"
            }]),
        )
        .unwrap();

    let mut note = repo.get_by_id("note_legacy").unwrap();
    note.title = "改过的旧笔记".into();
    repo.save(note).unwrap();

    let raw = store.get("notes_u1").unwrap().unwrap();
    assert_eq!(raw[0]["color"], "#ffcc00");
    assert_eq!(raw[0]["type"], "whiteboard");
    assert_eq!(raw[0]["title"], "改过的旧笔记");
}

#[test]
fn test_save_cannot_lock_or_unlock_through_note_fields() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(store.clone(), "u1", clock);

    // Locked flag without a password.
    let mut bare = Note::new("t", "c");
    bare.is_locked = true;
    assert!(repo.save(bare).is_none());

    // Locked with a plaintext password.
    let mut plain = Note::new("t", "c");
    plain.is_locked = true;
    plain.password = Some("1234".into());
    assert!(repo.save(plain).is_none());
    assert!(repo.get_all().is_empty());

    // Password without the flag is dropped.
    let mut stray = Note::new("t", "c");
    stray.password = Some("1234".into());
    let saved = repo.save(stray).unwrap();
    assert!(saved.password.is_none());

    // Editing a locked note cannot unlock it or swap its hash.
    let id = saved.id.clone().unwrap();
    repo.lock(&id, "2468").unwrap();
    let mut edited = repo.get_by_id(&id).unwrap();
    let hash = edited.password.clone();
    edited.content = "改过".into();
    edited.is_locked = false;
    edited.password = Some("0000".into());
    let after = repo.save(edited).unwrap();
    assert!(after.is_locked);
    assert_eq!(after.password, hash);
    assert_eq!(after.content, "改过");
    assert!(repo.unlock(&id, "2468"));

    for n in repo.get_all() {
        assert!(n.lock_state_consistent());
    }
    let raw = store.get("notes_u1").unwrap().unwrap().to_string();
    assert!(!raw.contains("\"1234\"") && !raw.contains("\"0000\""));
}

#[test]
fn test_new_note_with_hashed_lock_is_accepted() {
    let clock = Arc::new(ManualClock::new(T0));
    let repo = repo_on(Arc::new(MemoryStore::new()), "u1", clock);
    let hash = LockHasher::new(KdfParams::low_memory()).hash("abcd").unwrap();

    let mut note = Note::new("导入", "");
    note.is_locked = true;
    note.password = Some(hash);
    let saved = repo.save(note).unwrap();
    assert!(repo.unlock(saved.id_str(), "abcd"));
}
