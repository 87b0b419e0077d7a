//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, predicate fetch and count APIs over the `notes` table.
//! - Own the shared repository error type and row-decoding helpers.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Fetch order is `day ASC`, untimed before timed, `time ASC`, `name ASC`,
//!   `uuid ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::category::{CategoryId, CategoryValidationError};
use crate::model::note::{Note, NoteId, NoteValidationError};
use chrono::{NaiveDate, NaiveTime, Timelike};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DAY_FORMAT: &str = "%Y-%m-%d";

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    day,
    time_secs,
    duration_minutes,
    category_uuid
FROM notes";

const NOTE_ORDER_SQL: &str =
    " ORDER BY day ASC, (time_secs IS NOT NULL) ASC, time_secs ASC, name ASC, uuid ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by note, category and settings persistence.
#[derive(Debug)]
pub enum RepoError {
    NoteValidation(NoteValidationError),
    CategoryValidation(CategoryValidationError),
    Db(DbError),
    /// No row with this id exists.
    NotFound(Uuid),
    /// Connection schema is not at the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted into a domain record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteValidation(err) => write!(f, "{err}"),
            Self::CategoryValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "planner repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoteValidation(err) => Some(err),
            Self::CategoryValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::NoteValidation(value)
    }
}

impl From<CategoryValidationError> for RepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::CategoryValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Predicate for note fetches and counts.
///
/// All set fields are combined with AND. The day range is half-open:
/// `from_day <= day < until_day`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub category_id: Option<CategoryId>,
    pub from_day: Option<NaiveDate>,
    pub until_day: Option<NaiveDate>,
    /// Ignored by counts.
    pub limit: Option<u32>,
}

impl NoteQuery {
    /// Notes whose day equals `day`.
    pub fn on_day(day: NaiveDate) -> Self {
        Self {
            from_day: Some(day),
            until_day: day.succ_opt(),
            ..Self::default()
        }
    }

    /// Notes whose day lies in `[start, end)`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            from_day: Some(start),
            until_day: Some(end),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn limited_to(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Repository interface for note persistence.
pub trait NoteRepository {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces every field of an existing note.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Fetches matching notes in the repository's fixed order.
    fn list_notes(&self, query: &NoteQuery) -> RepoResult<Vec<Note>>;
    /// Counts matching notes without loading them.
    fn count_notes(&self, query: &NoteQuery) -> RepoResult<u32>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (
                uuid,
                name,
                description,
                day,
                time_secs,
                duration_minutes,
                category_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                note.id.to_string(),
                note.name.as_str(),
                note.description.as_deref(),
                day_to_db(note.day),
                note.time.map(time_to_db),
                note.duration_minutes,
                note.category_id.map(|id| id.to_string()),
            ],
        )?;

        Ok(note.id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                name = ?1,
                description = ?2,
                day = ?3,
                time_secs = ?4,
                duration_minutes = ?5,
                category_uuid = ?6
             WHERE uuid = ?7;",
            params![
                note.name.as_str(),
                note.description.as_deref(),
                day_to_db(note.day),
                note.time.map(time_to_db),
                note.duration_minutes,
                note.category_id.map(|id| id.to_string()),
                note.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes(&self, query: &NoteQuery) -> RepoResult<Vec<Note>> {
        let (filter, mut bind_values) = build_filter(query);
        let mut sql = format!("{NOTE_SELECT_SQL}{filter}{NOTE_ORDER_SQL}");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();

        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn count_notes(&self, query: &NoteQuery) -> RepoResult<u32> {
        let (filter, bind_values) = build_filter(query);
        let count: u32 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM notes{filter};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn build_filter(query: &NoteQuery) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(category_id) = query.category_id {
        sql.push_str(" AND category_uuid = ?");
        bind_values.push(Value::Text(category_id.to_string()));
    }
    if let Some(from_day) = query.from_day {
        sql.push_str(" AND day >= ?");
        bind_values.push(Value::Text(day_to_db(from_day)));
    }
    if let Some(until_day) = query.until_day {
        sql.push_str(" AND day < ?");
        bind_values.push(Value::Text(day_to_db(until_day)));
    }

    (sql, bind_values)
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id = parse_uuid(&row.get::<_, String>("uuid")?, "notes.uuid")?;
    let day = parse_day(&row.get::<_, String>("day")?)?;

    let time = match row.get::<_, Option<i64>>("time_secs")? {
        Some(secs) => Some(time_from_db(secs)?),
        None => None,
    };

    let duration_minutes = match row.get::<_, i64>("duration_minutes")? {
        value if value > 0 && value <= i64::from(u32::MAX) => value as u32,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid duration `{other}` in notes.duration_minutes"
            )));
        }
    };

    let category_id = match row.get::<_, Option<String>>("category_uuid")? {
        Some(value) => Some(parse_uuid(&value, "notes.category_uuid")?),
        None => None,
    };

    let note = Note {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        day,
        time,
        duration_minutes,
        category_id,
    };
    note.validate()?;
    Ok(note)
}

/// Fails unless `conn` is migrated to exactly the version this build writes.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 =
        conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn day_to_db(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

fn parse_day(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid day `{value}` in notes.day")))
}

fn time_to_db(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

fn time_from_db(secs: i64) -> RepoResult<NaiveTime> {
    u32::try_from(secs)
        .ok()
        .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid time `{secs}` in notes.time_secs"))
        })
}
