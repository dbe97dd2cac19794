//! PostgreSQL note repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use notekeep_core::{
    contains_pattern, Error, NewNote, Note, NoteFilter, NoteId, NotePatch, NoteRepository, Result,
};

const NOTE_COLUMNS: &str = "id, title, content, created_at";

// `$1` is NULL for an unfiltered query, otherwise an escaped ILIKE pattern.
const FILTER_CLAUSE: &str =
    r"($1::text IS NULL OR title ILIKE $1 ESCAPE '\' OR content ILIKE $1 ESCAPE '\')";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn filter_param(filter: &NoteFilter) -> Option<String> {
    filter.query().map(contains_pattern)
}

/// Postgres has no unsigned integers; values past `i64::MAX` saturate.
fn to_bigint(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn map_row_to_note(row: &PgRow) -> Result<Note> {
    let id: Uuid = row.try_get("id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Note {
        id: NoteId::from(id),
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at,
    })
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    #[instrument(skip(self), fields(subsystem = "db", component = "notes", op = "count"))]
    async fn count(&self, filter: &NoteFilter) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM note WHERE {}", FILTER_CLAUSE);
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(filter_param(filter))
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(total.max(0) as u64)
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "notes", op = "list"))]
    async fn list(&self, filter: &NoteFilter, skip: u64, limit: u64) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {} FROM note WHERE {} ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3",
            NOTE_COLUMNS, FILTER_CLAUSE
        );
        let rows = sqlx::query(&sql)
            .bind(filter_param(filter))
            .bind(to_bigint(skip))
            .bind(to_bigint(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let notes = rows.iter().map(map_row_to_note).collect::<Result<Vec<_>>>()?;
        debug!(result_count = notes.len(), "Listed notes");
        Ok(notes)
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "notes", op = "fetch", note_id = %id))]
    async fn fetch(&self, id: NoteId) -> Result<Note> {
        let sql = format!("SELECT {} FROM note WHERE id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NotFound(id))?;
        map_row_to_note(&row)
    }

    #[instrument(skip(self, note), fields(subsystem = "db", component = "notes", op = "insert"))]
    async fn insert(&self, note: NewNote) -> Result<Note> {
        let id = NoteId::new();
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO note (id, title, content, created_at) VALUES ($1, $2, $3, $4) RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(note.title())
            .bind(note.content())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(note_id = %id, "Inserted note");
        map_row_to_note(&row)
    }

    #[instrument(skip(self, patch), fields(subsystem = "db", component = "notes", op = "update", note_id = %id))]
    async fn update(&self, id: NoteId, patch: NotePatch) -> Result<Note> {
        let sql = format!(
            "UPDATE note SET title = COALESCE($2, title), content = COALESCE($3, content) \
             WHERE id = $1 RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(patch.title())
            .bind(patch.content())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NotFound(id))?;
        map_row_to_note(&row)
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "notes", op = "delete", note_id = %id))]
    async fn delete(&self, id: NoteId) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_param() {
        assert_eq!(filter_param(&NoteFilter::All), None);
        assert_eq!(
            filter_param(&NoteFilter::contains("50%_off")),
            Some("%50\\%\\_off%".to_string())
        );
    }

    #[test]
    fn test_to_bigint_saturates() {
        assert_eq!(to_bigint(0), 0);
        assert_eq!(to_bigint(42), 42);
        assert_eq!(to_bigint(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_filter_clause_escapes_with_backslash() {
        assert!(FILTER_CLAUSE.contains(r"ESCAPE '\'"));
        assert!(FILTER_CLAUSE.starts_with("($1::text IS NULL"));
    }
}
