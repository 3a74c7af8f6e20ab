//! Note quest domain model.
//!
//! # Responsibility
//! - Define the locally-tracked contribution record tied to one remote note.
//! - Provide the answer lifecycle helper used by quest-answering code.
//!
//! # Invariants
//! - `note_id` references remote note identity; the quest does not own it.
//! - An `Answered` quest carries a non-empty comment.
//! - `Hidden` is terminal for the upload core; deletion is the only other
//!   exit from `Answered`.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::geo::LatLon;
use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned local quest identity.
pub type QuestId = i64;

/// Local lifecycle state of a note quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Visible and awaiting a user answer.
    New,
    /// Answer recorded locally, pending upload.
    Answered,
    /// Uploaded (or dismissed) while the note stays unresolved upstream;
    /// kept so the location keeps blocking new quest generation.
    Hidden,
    /// Note was resolved; the quest is no longer actionable.
    Closed,
}

/// Validation failures for quest records.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestValidationError {
    /// `Answered` status requires a non-empty comment.
    MissingComment(QuestId),
    /// Marker coordinate lies outside legal ranges.
    InvalidMarkerLocation { latitude: f64, longitude: f64 },
}

impl Display for QuestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingComment(id) => {
                write!(f, "quest {id} is answered but carries no comment")
            }
            Self::InvalidMarkerLocation {
                latitude,
                longitude,
            } => write!(
                f,
                "marker location {latitude}, {longitude} is out of range"
            ),
        }
    }
}

impl Error for QuestValidationError {}

/// Locally-tracked contribution tied to one remote note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteQuest {
    /// Store-assigned identity, unique within the Quest Store.
    pub id: QuestId,
    /// Remote note this contribution targets (reference, not ownership).
    pub note_id: NoteId,
    /// Free-text answer to upload; empty until answered.
    pub comment: String,
    pub status: QuestStatus,
    /// Position used for diagnostics and spatial filtering only.
    pub marker_location: LatLon,
}

impl NoteQuest {
    /// Records the user's answer and marks the quest pending upload.
    pub fn answer(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
        self.status = QuestStatus::Answered;
    }

    /// Checks cross-field invariants prior to persistence.
    ///
    /// # Invariants
    /// - `Answered` quests must carry a non-empty comment.
    /// - `marker_location` must be a legal coordinate.
    pub fn validate(&self) -> Result<(), QuestValidationError> {
        if self.status == QuestStatus::Answered && self.comment.trim().is_empty() {
            return Err(QuestValidationError::MissingComment(self.id));
        }
        if !self.marker_location.is_valid() {
            return Err(QuestValidationError::InvalidMarkerLocation {
                latitude: self.marker_location.latitude,
                longitude: self.marker_location.longitude,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteQuest, QuestStatus, QuestValidationError};
    use crate::model::geo::LatLon;

    fn quest_at(latitude: f64, longitude: f64) -> NoteQuest {
        NoteQuest {
            id: 1,
            note_id: 10,
            comment: String::new(),
            status: QuestStatus::New,
            marker_location: LatLon::new(latitude, longitude),
        }
    }

    #[test]
    fn answer_records_comment_and_moves_to_answered() {
        let mut quest = quest_at(51.5, -0.1);

        quest.answer("still there");

        assert_eq!(quest.status, QuestStatus::Answered);
        assert_eq!(quest.comment, "still there");
        assert!(quest.validate().is_ok());
    }

    #[test]
    fn answered_quest_without_comment_fails_validation() {
        let mut quest = quest_at(51.5, -0.1);
        quest.status = QuestStatus::Answered;
        quest.comment = "   ".to_string();

        let err = quest.validate().unwrap_err();
        assert_eq!(err, QuestValidationError::MissingComment(1));
    }

    #[test]
    fn out_of_range_marker_fails_validation() {
        let quest = quest_at(95.0, 0.0);

        let err = quest.validate().unwrap_err();
        assert!(matches!(
            err,
            QuestValidationError::InvalidMarkerLocation { .. }
        ));
    }
}
