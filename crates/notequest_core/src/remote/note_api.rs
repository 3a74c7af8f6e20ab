//! Comment-upload contract against the remote note service.
//!
//! # Responsibility
//! - Define the seam between upload orchestration and the note backend.
//! - Distinguish conflict outcomes from every other remote failure.
//!
//! # Invariants
//! - `Conflict` means the note can no longer take this comment and the local
//!   record for it is stale. All other failures are `Remote`.
//!
//! # See also
//! - docs/architecture/upload.md

use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NoteApiResult<T> = Result<T, NoteApiError>;

/// Errors from remote note comment calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteApiError {
    /// The note was closed or resolved remotely since the quest was created.
    Conflict { note_id: NoteId },
    /// Any non-conflict failure: transport, auth, server-side rejection.
    Remote(String),
}

impl Display for NoteApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict { note_id } => {
                write!(f, "note {note_id} is no longer open for comments")
            }
            Self::Remote(message) => write!(f, "remote note service failure: {message}"),
        }
    }
}

impl Error for NoteApiError {}

/// Client interface for appending comments to remote notes.
pub trait NoteApi {
    /// Appends `text` as a comment on the given note.
    ///
    /// Blocks until the remote call finishes and returns the fresh note
    /// state as reported by the service, including the new comment.
    ///
    /// # Errors
    /// - `NoteApiError::Conflict` when the note was already closed or
    ///   resolved by someone else.
    /// - `NoteApiError::Remote` for every other failure.
    fn comment(&self, note_id: NoteId, text: &str) -> NoteApiResult<Note>;
}
