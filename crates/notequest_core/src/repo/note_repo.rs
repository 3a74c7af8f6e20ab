//! Note snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist locally cached snapshots of remote notes in the `notes` table.
//! - Own the JSON encoding of the per-note comment thread.
//!
//! # Invariants
//! - Snapshots keep the remote service's note id as primary key.
//! - `put_note` replaces the whole snapshot, comments included.
//! - The `comments` column always holds a valid JSON array.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::geo::LatLon;
use crate::model::note::{Note, NoteComment, NoteId, NoteStatus};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    lat,
    lon,
    status,
    created_at,
    closed_at,
    comments
FROM notes";

const NOTE_COLUMNS: &[&str] = &[
    "id",
    "lat",
    "lon",
    "status",
    "created_at",
    "closed_at",
    "comments",
];

/// Repository interface for cached note snapshots.
pub trait NoteRepository {
    /// Inserts or wholesale-replaces the snapshot for one note.
    fn put_note(&self, note: &Note) -> RepoResult<()>;
    /// Gets one snapshot by note id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Removes one snapshot permanently.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note snapshot repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "notes", NOTE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn put_note(&self, note: &Note) -> RepoResult<()> {
        let comments = encode_comments(&note.comments)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO notes (
                id,
                lat,
                lon,
                status,
                created_at,
                closed_at,
                comments
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                note.id,
                note.position.latitude,
                note.position.longitude,
                note_status_to_db(note.status),
                note.created_at,
                note.closed_at,
                comments.as_str(),
            ],
        )?;

        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let status_text: String = row.get("status")?;
    let status = parse_note_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid note status `{status_text}` in notes.status"))
    })?;

    let comments_text: String = row.get("comments")?;
    let comments = decode_comments(&comments_text)?;

    Ok(Note {
        id: row.get("id")?,
        position: LatLon {
            latitude: row.get("lat")?,
            longitude: row.get("lon")?,
        },
        status,
        created_at: row.get("created_at")?,
        closed_at: row.get("closed_at")?,
        comments,
    })
}

fn encode_comments(comments: &[NoteComment]) -> RepoResult<String> {
    serde_json::to_string(comments)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode note comments: {err}")))
}

fn decode_comments(value: &str) -> RepoResult<Vec<NoteComment>> {
    serde_json::from_str(value)
        .map_err(|err| RepoError::InvalidData(format!("invalid note comments payload: {err}")))
}

fn note_status_to_db(status: NoteStatus) -> &'static str {
    match status {
        NoteStatus::Open => "open",
        NoteStatus::Closed => "closed",
        NoteStatus::Hidden => "hidden",
    }
}

fn parse_note_status(value: &str) -> Option<NoteStatus> {
    match value {
        "open" => Some(NoteStatus::Open),
        "closed" => Some(NoteStatus::Closed),
        "hidden" => Some(NoteStatus::Hidden),
        _ => None,
    }
}
