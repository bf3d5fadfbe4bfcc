//! Tests for the SQLite frame projection store.

use matchframe::{FrameProjection, FrameRepository, FrameStatus, FrameStore};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, FrameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = FrameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, repo)
}

fn waiting_projection(id: &str) -> FrameProjection {
    FrameProjection::new(
        id.to_string(),
        vec!["p1".to_string()],
        FrameStatus::WaitingForPlayers,
        None,
        None,
    )
}

#[test]
fn test_upsert_inserts_new_projection() {
    let (_db, repo) = setup_test_db();
    repo.upsert_frame(&waiting_projection("frame-1"))
        .expect("Upsert failed");

    let stored = repo
        .get_frame("frame-1")
        .expect("Query failed")
        .expect("Frame not stored");
    assert_eq!(stored.id(), "frame-1");
    assert_eq!(
        stored.parse_status().expect("Status parse failed"),
        FrameStatus::WaitingForPlayers
    );
    assert_eq!(
        stored.parse_players().expect("Players parse failed"),
        vec!["p1".to_string()]
    );
    assert!(stored.board().is_none());
    assert!(stored.turn().is_none());
}

#[test]
fn test_upsert_replaces_existing_row() {
    let (_db, repo) = setup_test_db();
    repo.upsert_frame(&waiting_projection("frame-1"))
        .expect("First upsert failed");

    let started = FrameProjection::new(
        "frame-1".to_string(),
        vec!["{\"id\":\"p1\"}".to_string(), "{\"id\":\"p2\"}".to_string()],
        FrameStatus::InProgress,
        Some("{\"moves\":0}".to_string()),
        Some(0),
    );
    repo.upsert_frame(&started).expect("Second upsert failed");

    let stored = repo
        .get_frame("frame-1")
        .expect("Query failed")
        .expect("Frame not stored");
    assert_eq!(
        stored.parse_status().expect("Status parse failed"),
        FrameStatus::InProgress
    );
    assert_eq!(stored.parse_players().expect("Players parse failed").len(), 2);
    assert_eq!(stored.board().as_deref(), Some("{\"moves\":0}"));
    assert_eq!(*stored.turn(), Some(0));
}

#[test]
fn test_get_frame_not_found() {
    let (_db, repo) = setup_test_db();
    let found = repo.get_frame("no-such-frame").expect("Query failed");
    assert!(found.is_none());
}

#[test]
fn test_store_trait_upserts() {
    let (_db, repo) = setup_test_db();
    let store: &dyn FrameStore = &repo;
    store
        .upsert(&waiting_projection("frame-2"))
        .expect("Upsert failed");

    assert!(
        repo.get_frame("frame-2")
            .expect("Query failed")
            .is_some()
    );
}
