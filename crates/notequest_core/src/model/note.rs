//! Remote note snapshot model.
//!
//! # Responsibility
//! - Mirror the remote note record cached by the Note Store.
//!
//! # Invariants
//! - `id` is the remote-assigned note identity and is never minted locally.
//! - Snapshots are replaced wholesale; fields are never patched in place.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::geo::LatLon;
use serde::{Deserialize, Serialize};

/// Remote-assigned numeric note identity.
pub type NoteId = i64;

/// Remote lifecycle state of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    /// Issue is open and accepting contributions.
    Open,
    /// Issue was resolved upstream.
    Closed,
    /// Issue was moderated away upstream.
    Hidden,
}

/// Remote action recorded by one note comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteCommentAction {
    Opened,
    Commented,
    Closed,
    Reopened,
}

/// One entry of a note's remote discussion thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteComment {
    /// Comment creation time in epoch milliseconds.
    pub created_at: i64,
    pub action: NoteCommentAction,
    pub text: String,
    /// Remote author display name; `None` for anonymous contributions.
    pub author: Option<String>,
}

/// Cached snapshot of remote note state.
///
/// Everything besides `id` is opaque to the upload core: a successful
/// upload stores the fresh snapshot returned by the remote service and
/// discards whatever was cached before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub position: LatLon,
    pub status: NoteStatus,
    /// Note creation time in epoch milliseconds.
    pub created_at: i64,
    /// Set once the note was closed upstream.
    pub closed_at: Option<i64>,
    /// Discussion thread, oldest first.
    pub comments: Vec<NoteComment>,
}

impl Note {
    /// Returns whether the remote issue is still open.
    pub fn is_open(&self) -> bool {
        self.status == NoteStatus::Open
    }
}
