//! Note quest upload service.
//!
//! # Responsibility
//! - Push answered quests to the remote note service, one comment each.
//! - Reconcile local quest and snapshot state with each remote outcome.
//!
//! # Invariants
//! - Local stores change only after the remote call for that quest returned.
//! - A conflict purges both the quest and its cached note snapshot.
//! - Any other remote failure aborts the batch; already-reconciled quests
//!   stay committed.
//! - Every run logs exactly one summary line, cancelled runs included.
//!
//! # See also
//! - docs/architecture/upload.md

use crate::model::note::Note;
use crate::model::quest::{NoteQuest, QuestStatus};
use crate::remote::note_api::{NoteApi, NoteApiError};
use crate::repo::note_repo::NoteRepository;
use crate::repo::quest_repo::{QuestListQuery, QuestRepository};
use crate::repo::RepoError;
use log::{info, trace};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

/// Errors from quest upload runs.
#[derive(Debug)]
pub enum UploadError {
    /// Remote call failed for a reason other than a conflict.
    Api(NoteApiError),
    /// Local store operation failed.
    Repo(RepoError),
}

impl Display for UploadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UploadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for UploadError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Upload orchestration over the remote api and the local stores.
pub struct QuestUploadService<A: NoteApi, Q: QuestRepository, N: NoteRepository> {
    api: A,
    quests: Q,
    notes: N,
}

impl<A: NoteApi, Q: QuestRepository, N: NoteRepository> QuestUploadService<A, Q, N> {
    /// Creates a service using the provided collaborators.
    pub fn new(api: A, quests: Q, notes: N) -> Self {
        Self { api, quests, notes }
    }

    /// Uploads all answered quests, one remote comment per quest.
    ///
    /// `cancel` is checked before each quest. A cancelled run keeps every
    /// quest reconciled so far and still logs the summary line.
    ///
    /// # Errors
    /// - `UploadError::Api` for any non-conflict remote failure; the batch
    ///   stops at the failing quest.
    /// - `UploadError::Repo` when a local store write fails.
    pub fn upload(&self, cancel: &AtomicBool) -> Result<(), UploadError> {
        let answered = self.quests.list_quests(&QuestListQuery {
            bounds: None,
            status: Some(QuestStatus::Answered),
        })?;

        let mut created: u32 = 0;
        let mut obsolete: u32 = 0;

        for quest in &answered {
            if cancel.load(Ordering::Relaxed) {
                break;
            }

            match self.upload_quest(quest)? {
                Some(_) => created += 1,
                None => obsolete += 1,
            }
        }

        info!("{}", upload_summary(created, obsolete));
        Ok(())
    }

    /// Pushes one quest's comment and reconciles local state.
    ///
    /// Returns the fresh note on success and `None` when the comment was
    /// dropped because of a remote conflict.
    fn upload_quest(&self, quest: &NoteQuest) -> Result<Option<Note>, UploadError> {
        match self.api.comment(quest.note_id, quest.comment.as_str()) {
            Ok(fresh) => {
                // The quest is kept as hidden rather than deleted: while the
                // note stays unsolved it must keep blocking new quests at
                // this position.
                let mut uploaded = quest.clone();
                uploaded.status = QuestStatus::Hidden;
                self.quests.update_quest(&uploaded)?;
                self.notes.put_note(&fresh)?;
                Ok(Some(fresh))
            }
            Err(NoteApiError::Conflict { .. }) => {
                // Someone else closed the note, so this comment has no
                // target anymore.
                self.quests.delete_quest(quest.id)?;
                self.notes.delete_note(quest.note_id)?;

                trace!(
                    "Dropped the comment {} because the note has already been closed",
                    quest_log_string(quest)
                );

                Ok(None)
            }
            Err(err) => Err(UploadError::Api(err)),
        }
    }
}

fn upload_summary(created: u32, obsolete: u32) -> String {
    let mut summary = format!("Successfully commented on {created} notes");
    if obsolete > 0 {
        summary.push_str(&format!(
            " but dropped {obsolete} comments because the notes have already been closed"
        ));
    }
    summary
}

fn quest_log_string(quest: &NoteQuest) -> String {
    format!(
        "\"{}\" at {}, {}",
        quest.comment, quest.marker_location.latitude, quest.marker_location.longitude
    )
}
