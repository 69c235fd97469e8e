//! PostgreSQL-backed `NoteRepository` implementation using Diesel ORM.
//!
//! Listing is ordered newest first with the identifier as tie-breaker.
//! Updates run in a transaction that locks the row, so the monotonic
//! `updated_at` rule is computed against the value actually stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::warn;

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{
    Author, Note, NoteChanges, NoteDraft, NoteId, NoteTitle, next_updated_at,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AuthorColumn, NewNoteRow, NoteChangesetRow, NoteRow};
use super::pool::{DbPool, PoolError};
use super::schema::notes;

/// Diesel-backed implementation of the [`NoteRepository`] port.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NoteRepositoryError {
    map_basic_pool_error(error, NoteRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NoteRepositoryError {
    map_basic_diesel_error(
        error,
        NoteRepositoryError::query,
        NoteRepositoryError::connection,
    )
}

/// Convert a database row into a domain note.
///
/// Rows that slipped past the title constraint are reported as query errors
/// rather than handed to callers in an invalid state.
fn row_to_note(row: NoteRow) -> Result<Note, NoteRepositoryError> {
    let title = NoteTitle::new(&row.title).map_err(|err| {
        warn!(note_id = row.id, error = %err, "stored note title failed validation");
        NoteRepositoryError::query(format!("stored note {} has invalid title: {err}", row.id))
    })?;
    Ok(Note {
        id: NoteId::new(row.id),
        author: row.author.0,
        title,
        body: row.body,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn list(&self, author: Option<Author>) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = notes::table
            .select(NoteRow::as_select())
            .order_by((notes::created_at.desc(), notes::id.desc()))
            .into_boxed();
        if let Some(author) = author {
            query = query.filter(notes::author.eq(AuthorColumn(author)));
        }

        let rows: Vec<NoteRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_note).collect()
    }

    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<NoteRow> = notes::table
            .find(id.get())
            .select(NoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_note).transpose()
    }

    async fn insert(
        &self,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewNoteRow {
            author: AuthorColumn(draft.author),
            title: draft.title.as_ref(),
            body: draft.body.as_deref(),
            created_at: now,
            updated_at: now,
        };

        let row: NoteRow = diesel::insert_into(notes::table)
            .values(&new_row)
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_note(row)
    }

    async fn update(
        &self,
        id: NoteId,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let title: Option<&str> = changes.title.as_ref().map(AsRef::as_ref);
        let body = changes.body.as_update().map(|body| body.map(String::as_str));

        let row: Option<NoteRow> = conn
            .transaction(|conn| {
                async move {
                    let previous: Option<DateTime<Utc>> = notes::table
                        .find(id.get())
                        .select(notes::updated_at)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(previous) = previous else {
                        return Ok(None);
                    };

                    let changeset = NoteChangesetRow {
                        title,
                        body,
                        updated_at: next_updated_at(previous, now),
                    };
                    diesel::update(notes::table.find(id.get()))
                        .set(&changeset)
                        .returning(NoteRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_note).transpose()
    }

    async fn delete(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(notes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
