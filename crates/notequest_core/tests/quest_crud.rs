use notequest_core::db::migrations::latest_version;
use notequest_core::db::{open_db, open_db_in_memory};
use notequest_core::{
    BoundingBox, LatLon, NoteQuest, QuestListQuery, QuestRepository, QuestStatus,
    QuestValidationError, RepoError, SqliteQuestRepository,
};
use rusqlite::Connection;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let created = repo.create_quest(5, LatLon::new(51.5, -0.1)).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.note_id, 5);
    assert_eq!(created.status, QuestStatus::New);
    assert!(created.comment.is_empty());

    let loaded = repo.get_quest(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.marker_location, LatLon::new(51.5, -0.1));
}

#[test]
fn answer_then_update_persists_comment_and_status() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let mut quest = repo.create_quest(5, LatLon::new(51.5, -0.1)).unwrap();
    quest.answer("needs a bench");
    repo.update_quest(&quest).unwrap();

    let loaded = repo.get_quest(quest.id).unwrap().unwrap();
    assert_eq!(loaded.status, QuestStatus::Answered);
    assert_eq!(loaded.comment, "needs a bench");
}

#[test]
fn update_not_found_returns_quest_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let ghost = NoteQuest {
        id: 4242,
        note_id: 7,
        comment: String::new(),
        status: QuestStatus::New,
        marker_location: LatLon::new(0.0, 0.0),
    };

    let err = repo.update_quest(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::QuestNotFound(4242)));
}

#[test]
fn delete_removes_quest_and_second_delete_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let quest = repo.create_quest(5, LatLon::new(51.5, -0.1)).unwrap();
    repo.delete_quest(quest.id).unwrap();
    assert!(repo.get_quest(quest.id).unwrap().is_none());

    let err = repo.delete_quest(quest.id).unwrap_err();
    assert!(matches!(err, RepoError::QuestNotFound(id) if id == quest.id));
}

#[test]
fn hidden_quest_survives_database_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notequest.db");

    let conn_first = open_db(&path).unwrap();
    let repo_first = SqliteQuestRepository::try_new(&conn_first).unwrap();
    let mut quest = repo_first.create_quest(5, LatLon::new(51.5, -0.1)).unwrap();
    quest.answer("needs a bench");
    quest.status = QuestStatus::Hidden;
    repo_first.update_quest(&quest).unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    let repo_second = SqliteQuestRepository::try_new(&conn_second).unwrap();
    let loaded = repo_second.get_quest(quest.id).unwrap().unwrap();
    assert_eq!(loaded.status, QuestStatus::Hidden);
    assert_eq!(loaded.comment, "needs a bench");
}

#[test]
fn list_filters_by_status() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    repo.create_quest(1, LatLon::new(51.5, -0.1)).unwrap();

    let mut answered = repo.create_quest(2, LatLon::new(51.6, -0.2)).unwrap();
    answered.answer("overgrown path");
    repo.update_quest(&answered).unwrap();

    let mut hidden = repo.create_quest(3, LatLon::new(51.7, -0.3)).unwrap();
    hidden.status = QuestStatus::Hidden;
    repo.update_quest(&hidden).unwrap();

    let query = QuestListQuery {
        status: Some(QuestStatus::Answered),
        ..QuestListQuery::default()
    };
    let result = repo.list_quests(&query).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, answered.id);
    assert_eq!(result[0].comment, "overgrown path");
}

#[test]
fn list_filters_by_bounding_box() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let london = repo.create_quest(1, LatLon::new(51.5, -0.1)).unwrap();
    let paris = repo.create_quest(2, LatLon::new(48.86, 2.35)).unwrap();
    repo.create_quest(3, LatLon::new(-33.87, 151.21)).unwrap();

    let query = QuestListQuery {
        bounds: Some(BoundingBox::new(
            LatLon::new(40.0, -10.0),
            LatLon::new(60.0, 10.0),
        )),
        ..QuestListQuery::default()
    };
    let result = repo.list_quests(&query).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, london.id);
    assert_eq!(result[1].id, paris.id);
}

#[test]
fn list_matches_both_sides_of_antimeridian_box() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let east = repo.create_quest(1, LatLon::new(0.0, 179.5)).unwrap();
    let west = repo.create_quest(2, LatLon::new(0.0, -179.5)).unwrap();
    repo.create_quest(3, LatLon::new(0.0, 0.0)).unwrap();

    let query = QuestListQuery {
        bounds: Some(BoundingBox::new(
            LatLon::new(-10.0, 170.0),
            LatLon::new(10.0, -170.0),
        )),
        ..QuestListQuery::default()
    };
    let result = repo.list_quests(&query).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, east.id);
    assert_eq!(result[1].id, west.id);
}

#[test]
fn answered_quest_without_comment_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    let mut quest = repo.create_quest(5, LatLon::new(51.5, -0.1)).unwrap();
    quest.status = QuestStatus::Answered;

    let err = repo.update_quest(&quest).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(QuestValidationError::MissingComment(id)) if id == quest.id
    ));
}

#[test]
fn duplicate_note_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestRepository::try_new(&conn).unwrap();

    repo.create_quest(5, LatLon::new(51.5, -0.1)).unwrap();
    let err = repo.create_quest(5, LatLon::new(52.0, 0.0)).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteQuestRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteQuestRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("note_quests"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE note_quests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            note_id INTEGER NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'new',
            comment TEXT NOT NULL DEFAULT '',
            marker_lat REAL NOT NULL,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteQuestRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "note_quests",
            column: "marker_lon"
        })
    ));
}
