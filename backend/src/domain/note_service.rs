//! Note domain service.
//!
//! Implements the [`NotesCommand`] and [`NotesQuery`] driving ports on top of
//! a [`NoteRepository`]. The service reads the clock once per mutation,
//! truncated to the microsecond precision the database stores, and hands the
//! instant to the repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;

use crate::domain::ports::{NoteRepository, NoteRepositoryError, NotesCommand, NotesQuery};
use crate::domain::{Author, Error, Note, NoteChanges, NoteDraft, NoteId, NoteList};

const NOTE_NOT_FOUND: &str = "note not found";

/// Note service implementing the driving ports.
#[derive(Clone)]
pub struct NoteService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> NoteService<R> {
    /// Create a service over `repository` using `clock` for timestamps.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }
}

fn map_repository_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note repository unavailable: {message}"))
        }
        NoteRepositoryError::Query { message } => {
            Error::internal(format!("note repository error: {message}"))
        }
    }
}

fn not_found(id: NoteId) -> Error {
    Error::not_found(NOTE_NOT_FOUND).with_details(serde_json::json!({ "id": id.get() }))
}

#[async_trait]
impl<R> NotesCommand for NoteService<R>
where
    R: NoteRepository,
{
    async fn create_note(&self, draft: NoteDraft) -> Result<Note, Error> {
        let note = self
            .repository
            .insert(&draft, self.now())
            .await
            .map_err(map_repository_error)?;
        tracing::debug!(note_id = %note.id, author = %note.author, "note created");
        Ok(note)
    }

    async fn update_note(&self, id: NoteId, changes: NoteChanges) -> Result<Note, Error> {
        let note = self
            .repository
            .update(id, &changes, self.now())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(note_id = %id, "note updated");
        Ok(note)
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), Error> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found(id));
        }
        tracing::debug!(note_id = %id, "note deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> NotesQuery for NoteService<R>
where
    R: NoteRepository,
{
    async fn list_notes(&self, author: Option<Author>) -> Result<NoteList, Error> {
        self.repository
            .list(author)
            .await
            .map(NoteList::from)
            .map_err(map_repository_error)
    }

    async fn get_note(&self, id: NoteId) -> Result<Note, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}
