//! Core reconciliation logic for note quests.
//! This crate is the single source of truth for upload and store invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::geo::{BoundingBox, LatLon};
pub use model::note::{Note, NoteComment, NoteCommentAction, NoteId, NoteStatus};
pub use model::quest::{NoteQuest, QuestId, QuestStatus, QuestValidationError};
pub use remote::note_api::{NoteApi, NoteApiError, NoteApiResult};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::quest_repo::{QuestListQuery, QuestRepository, SqliteQuestRepository};
pub use repo::{RepoError, RepoResult};
pub use service::quest_upload::{QuestUploadService, UploadError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
