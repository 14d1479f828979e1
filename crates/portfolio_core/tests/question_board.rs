use portfolio_core::{
    KeyValueStore, MemoryStore, NewQuestion, NewReply, PortError, QuestionBoard, QuestionPatch,
    SortKey,
};
use std::sync::Arc;

fn empty_board() -> QuestionBoard {
    QuestionBoard::empty(Arc::new(MemoryStore::new()))
}

fn ask(board: &mut QuestionBoard, title: &str) -> u64 {
    board
        .create(NewQuestion {
            title: title.to_string(),
            author: "Asker".to_string(),
            ..Default::default()
        })
        .unwrap()
        .id
}

fn reply(board: &mut QuestionBoard, id: u64, author: &str) {
    board
        .add_reply(
            id,
            NewReply {
                text: "answer".to_string(),
                author: author.to_string(),
            },
        )
        .unwrap();
}

#[test]
fn create_then_reply_scenario() {
    let mut board = empty_board();
    assert!(board.list(SortKey::Newest).is_empty());

    let created = board
        .create(NewQuestion {
            title: "T".to_string(),
            author: "A".to_string(),
            ..Default::default()
        })
        .unwrap();

    let listed = board.list(SortKey::Newest);
    assert_eq!(listed.len(), 1);
    assert!(listed[0].id > 0);
    assert!(listed[0].replies.is_empty());

    board
        .add_reply(
            created.id,
            NewReply {
                text: "R".to_string(),
                author: "B".to_string(),
            },
        )
        .unwrap();

    let first = board.list(SortKey::Newest)[0];
    assert_eq!(first.replies.len(), 1);
    assert_eq!(first.replies[0].author, "B");
}

#[test]
fn create_round_trips_through_storage() {
    let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut board = QuestionBoard::empty(backend.clone());
    let previous = ask(&mut board, "first");

    let created = board
        .create(NewQuestion {
            title: "  How do I test?  ".to_string(),
            description: "With cargo".to_string(),
            author: "Dev".to_string(),
            email: Some("dev@example.com".to_string()),
        })
        .unwrap();
    assert!(created.id > previous);

    let mut reopened = QuestionBoard::empty(backend);
    let loaded = reopened.load();
    assert_eq!(loaded[0], created);
    assert_eq!(loaded[0].title, "How do I test?");
    assert_eq!(loaded[0].email.as_deref(), Some("dev@example.com"));
}

#[test]
fn create_requires_title_and_author() {
    let mut board = empty_board();
    let err = board
        .create(NewQuestion {
            title: " ".to_string(),
            author: "A".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, PortError::Validation(ref m) if m.contains("title")));

    let err = board
        .create(NewQuestion {
            title: "T".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, PortError::Validation(ref m) if m.contains("author")));
    assert!(board.list(SortKey::Newest).is_empty());
}

#[test]
fn overlong_title_is_rejected() {
    let mut board = empty_board();
    let result = board.create(NewQuestion {
        title: "x".repeat(201),
        author: "A".to_string(),
        ..Default::default()
    });
    assert!(matches!(result, Err(PortError::Validation(_))));
}

#[test]
fn new_questions_come_first() {
    let mut board = empty_board();
    let older = ask(&mut board, "older");
    let newer = ask(&mut board, "newer");
    let ids: Vec<u64> = board.list(SortKey::Newest).iter().map(|q| q.id).collect();
    assert_eq!(ids, [newer, older]);
}

#[test]
fn replies_stay_oldest_first() {
    let mut board = empty_board();
    let id = ask(&mut board, "q");
    reply(&mut board, id, "first");
    reply(&mut board, id, "second");

    let question = board.get(id).unwrap();
    assert_eq!(question.replies[0].author, "first");
    assert_eq!(question.replies[1].author, "second");
    assert!(question.replies[0].id < question.replies[1].id);
    assert!(question.replies[0].id > id);
}

#[test]
fn reply_requires_text_and_author() {
    let mut board = empty_board();
    let id = ask(&mut board, "q");
    let result = board.add_reply(
        id,
        NewReply {
            text: String::new(),
            author: "B".to_string(),
        },
    );
    assert!(matches!(result, Err(PortError::Validation(ref m)) if m.contains("text")));
    assert!(board.get(id).unwrap().replies.is_empty());
}

#[test]
fn removing_a_question_removes_its_replies() {
    let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut board = QuestionBoard::empty(backend.clone());
    let id = ask(&mut board, "doomed");
    reply(&mut board, id, "B");

    let removed = board.remove(id).unwrap();
    assert_eq!(removed.replies.len(), 1);
    assert!(board.list(SortKey::Newest).is_empty());

    let result = board.add_reply(
        id,
        NewReply {
            text: "late".to_string(),
            author: "C".to_string(),
        },
    );
    assert!(matches!(result, Err(PortError::NotFound(_))));

    let stored = backend.get("questions").unwrap().unwrap();
    assert!(!stored.contains("doomed"));
}

#[test]
fn popular_and_unanswered_views() {
    let mut board = empty_board();
    // created oldest first, so the list order is d, c, b, a
    let a = ask(&mut board, "a");
    let b = ask(&mut board, "b");
    let c = ask(&mut board, "c");
    let d = ask(&mut board, "d");
    // reply counts in list order: d=0, c=3, b=0, a=1
    for author in ["x", "y", "z"] {
        reply(&mut board, c, author);
    }
    reply(&mut board, a, "x");

    let popular: Vec<u64> = board.list(SortKey::Popular).iter().map(|q| q.id).collect();
    assert_eq!(popular, [c, a, d, b]);

    let unanswered: Vec<u64> = board
        .list(SortKey::Unanswered)
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(unanswered, [d, b]);

    let unknown: Vec<u64> = board
        .list(SortKey::parse("trending"))
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(unknown, [d, c, b, a]);
}

#[test]
fn update_replaces_only_named_fields() {
    let mut board = empty_board();
    let created = board
        .create(NewQuestion {
            title: "Old".to_string(),
            description: "keep me".to_string(),
            author: "A".to_string(),
            email: Some("a@example.com".to_string()),
        })
        .unwrap();

    let updated = board
        .update(
            created.id,
            QuestionPatch {
                title: Some("New".to_string()),
                email: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.title, "New");
    assert_eq!(updated.description, "keep me");
    assert_eq!(updated.email, None);
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn update_missing_question_is_not_found() {
    let mut board = empty_board();
    let result = board.update(42, QuestionPatch::default());
    assert!(matches!(result, Err(PortError::NotFound(_))));
}

#[test]
fn missing_question_wins_over_invalid_patch() {
    let mut board = empty_board();
    let result = board.update(
        42,
        QuestionPatch {
            title: Some("   ".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(PortError::NotFound(_))));
}

#[test]
fn board_with_maximal_stored_id_refuses_new_ids() {
    let raw = format!(
        r#"[{{"id":{},"title":"T","author":"A","timestamp":"2026-01-02T03:04:05Z","replies":[]}}]"#,
        u64::MAX
    );
    let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entry("questions", &raw));
    let mut board = QuestionBoard::empty(backend);

    let created = board.create(NewQuestion {
        title: "Next".to_string(),
        author: "B".to_string(),
        ..Default::default()
    });
    assert!(matches!(created, Err(PortError::Unexpected(_))));

    let replied = board.add_reply(
        u64::MAX,
        NewReply {
            text: "hi".to_string(),
            author: "C".to_string(),
        },
    );
    assert!(matches!(replied, Err(PortError::Unexpected(_))));
    assert!(board.get(u64::MAX).unwrap().replies.is_empty());
}

#[test]
fn demo_seed_and_stats() {
    let mut board = QuestionBoard::open(Arc::new(MemoryStore::new()));
    let stats = board.stats();
    assert_eq!(stats.total_questions, 3);
    assert_eq!(stats.total_answers, 3);
    assert_eq!(stats.unique_authors, 6);

    // ids keep climbing past the seeded reply ids
    let id = ask(&mut board, "fresh");
    assert!(id > 103);
    assert_eq!(board.stats().unique_authors, 7);
}
