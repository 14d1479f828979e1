//! Tests for the on-disk key/value store and the collections built on it.

use api_lib::adapters::FileStore;
use portfolio_core::{
    KeyValueStore, NewQuestion, NewReply, PortError, QuestionBoard,
};
use std::sync::Arc;

#[test]
fn values_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    assert_eq!(store.get("questions").unwrap(), None);
    store.set("questions", "[]").unwrap();
    assert_eq!(store.get("questions").unwrap().as_deref(), Some("[]"));
    assert!(dir.path().join("questions.json").exists());

    store.remove("questions").unwrap();
    assert_eq!(store.get("questions").unwrap(), None);
    // Removing an absent key is fine.
    store.remove("questions").unwrap();
}

#[test]
fn open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("portfolio");
    let store = FileStore::open(&nested).unwrap();
    assert_eq!(store.dir(), nested.as_path());
    assert!(nested.is_dir());
}

#[test]
fn keys_cannot_escape_the_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    for key in ["", "../secrets", "a/b", "with space"] {
        assert!(
            matches!(store.set(key, "x"), Err(PortError::Validation(_))),
            "key {:?} was accepted",
            key
        );
    }
}

#[test]
fn non_utf8_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("meetings.json"), [0xff, 0xfe, 0x00]).unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert!(matches!(store.get("meetings"), Err(PortError::Corrupt(_))));
}

#[test]
fn board_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let mut board = QuestionBoard::empty(store.clone());
    let question = board
        .create(NewQuestion {
            title: "Favourite crate?".to_string(),
            author: "Ana".to_string(),
            ..Default::default()
        })
        .unwrap();
    board
        .add_reply(
            question.id,
            NewReply {
                text: "serde".to_string(),
                author: "Ben".to_string(),
            },
        )
        .unwrap();

    let reopened = QuestionBoard::empty(store);
    let stored = reopened.get(question.id).unwrap();
    assert_eq!(stored.title, "Favourite crate?");
    assert_eq!(stored.replies.len(), 1);
    assert_eq!(stored.replies[0].text, "serde");
}

#[test]
fn garbage_on_disk_falls_back_to_seed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("questions.json"), "{ not json").unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    let board = QuestionBoard::open(store);
    assert_eq!(board.stats().total_questions, 3);
}
