//! Note quest repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `note_quests` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `NoteQuest::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - At most one quest row exists per remote note (`note_id` is unique).
//! - Listing is deterministic: `id ASC`.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::model::geo::{BoundingBox, LatLon};
use crate::model::note::NoteId;
use crate::model::quest::{NoteQuest, QuestId, QuestStatus};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const QUEST_SELECT_SQL: &str = "SELECT
    id,
    note_id,
    status,
    comment,
    marker_lat,
    marker_lon
FROM note_quests";

const QUEST_COLUMNS: &[&str] = &[
    "id",
    "note_id",
    "status",
    "comment",
    "marker_lat",
    "marker_lon",
    "created_at",
    "updated_at",
];

/// Query options for listing quests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestListQuery {
    /// Optional geographic filter on the quest marker.
    pub bounds: Option<BoundingBox>,
    /// Optional exact status filter.
    pub status: Option<QuestStatus>,
}

/// Repository interface for note quest operations.
pub trait QuestRepository {
    /// Creates one quest for a remote note and returns the stored record.
    fn create_quest(&self, note_id: NoteId, marker_location: LatLon) -> RepoResult<NoteQuest>;
    /// Gets one quest by id.
    fn get_quest(&self, id: QuestId) -> RepoResult<Option<NoteQuest>>;
    /// Lists quests matching the query, ordered by id.
    fn list_quests(&self, query: &QuestListQuery) -> RepoResult<Vec<NoteQuest>>;
    /// Replaces all mutable fields of an existing quest.
    fn update_quest(&self, quest: &NoteQuest) -> RepoResult<()>;
    /// Removes one quest permanently.
    fn delete_quest(&self, id: QuestId) -> RepoResult<()>;
}

/// SQLite-backed quest repository.
pub struct SqliteQuestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "note_quests", QUEST_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl QuestRepository for SqliteQuestRepository<'_> {
    fn create_quest(&self, note_id: NoteId, marker_location: LatLon) -> RepoResult<NoteQuest> {
        let candidate = NoteQuest {
            id: 0,
            note_id,
            comment: String::new(),
            status: QuestStatus::New,
            marker_location,
        };
        candidate.validate()?;

        self.conn.execute(
            "INSERT INTO note_quests (
                note_id,
                status,
                comment,
                marker_lat,
                marker_lon
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note_id,
                quest_status_to_db(candidate.status),
                candidate.comment.as_str(),
                marker_location.latitude,
                marker_location.longitude,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_quest(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created quest {id} not found in read-back"))
        })
    }

    fn get_quest(&self, id: QuestId) -> RepoResult<Option<NoteQuest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUEST_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_quest_row(row)?));
        }

        Ok(None)
    }

    fn list_quests(&self, query: &QuestListQuery) -> RepoResult<Vec<NoteQuest>> {
        let mut sql = format!("{QUEST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(quest_status_to_db(status).to_string()));
        }

        if let Some(bounds) = query.bounds {
            sql.push_str(" AND marker_lat BETWEEN ? AND ?");
            bind_values.push(Value::Real(bounds.min.latitude));
            bind_values.push(Value::Real(bounds.max.latitude));

            // A box crossing the antimeridian covers two disjoint longitude
            // ranges, so the filter flips from BETWEEN to OR.
            if bounds.crosses_antimeridian() {
                sql.push_str(" AND (marker_lon >= ? OR marker_lon <= ?)");
            } else {
                sql.push_str(" AND marker_lon BETWEEN ? AND ?");
            }
            bind_values.push(Value::Real(bounds.min.longitude));
            bind_values.push(Value::Real(bounds.max.longitude));
        }

        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut quests = Vec::new();

        while let Some(row) = rows.next()? {
            quests.push(parse_quest_row(row)?);
        }

        Ok(quests)
    }

    fn update_quest(&self, quest: &NoteQuest) -> RepoResult<()> {
        quest.validate()?;

        let changed = self.conn.execute(
            "UPDATE note_quests
             SET
                note_id = ?1,
                status = ?2,
                comment = ?3,
                marker_lat = ?4,
                marker_lon = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                quest.note_id,
                quest_status_to_db(quest.status),
                quest.comment.as_str(),
                quest.marker_location.latitude,
                quest.marker_location.longitude,
                quest.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::QuestNotFound(quest.id));
        }

        Ok(())
    }

    fn delete_quest(&self, id: QuestId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM note_quests WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::QuestNotFound(id));
        }

        Ok(())
    }
}

fn parse_quest_row(row: &Row<'_>) -> RepoResult<NoteQuest> {
    let status_text: String = row.get("status")?;
    let status = parse_quest_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid quest status `{status_text}` in note_quests.status"
        ))
    })?;

    let quest = NoteQuest {
        id: row.get("id")?,
        note_id: row.get("note_id")?,
        comment: row.get("comment")?,
        status,
        marker_location: LatLon {
            latitude: row.get("marker_lat")?,
            longitude: row.get("marker_lon")?,
        },
    };
    quest.validate()?;
    Ok(quest)
}

fn quest_status_to_db(status: QuestStatus) -> &'static str {
    match status {
        QuestStatus::New => "new",
        QuestStatus::Answered => "answered",
        QuestStatus::Hidden => "hidden",
        QuestStatus::Closed => "closed",
    }
}

fn parse_quest_status(value: &str) -> Option<QuestStatus> {
    match value {
        "new" => Some(QuestStatus::New),
        "answered" => Some(QuestStatus::Answered),
        "hidden" => Some(QuestStatus::Hidden),
        "closed" => Some(QuestStatus::Closed),
        _ => None,
    }
}
