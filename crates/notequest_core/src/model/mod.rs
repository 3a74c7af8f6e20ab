//! Domain model for notes, note quests and their geography.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one quest record per note and one cached snapshot per note.
//!
//! # Invariants
//! - Quests are identified by a store-assigned `QuestId`; notes keep the
//!   remote service's `NoteId`.
//! - An answered quest always carries a non-empty comment.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod geo;
pub mod note;
pub mod quest;
