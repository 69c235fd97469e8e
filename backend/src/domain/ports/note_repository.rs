//! Driven port for note persistence.
//!
//! Adapters receive already-validated domain values and the mutation
//! timestamp chosen by the caller, so storage never consults a clock of its
//! own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Author, Note, NoteChanges, NoteDraft, NoteId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "note repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "note repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Return notes newest first, optionally restricted to one author.
    ///
    /// Ties on `created_at` are broken by descending identifier.
    async fn list(&self, author: Option<Author>) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Fetch a note by identifier.
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError>;

    /// Persist a new note with both timestamps set to `now`.
    async fn insert(
        &self,
        draft: &NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Note, NoteRepositoryError>;

    /// Apply `changes` atomically and refresh `updated_at`.
    ///
    /// Returns `None` when no note has the identifier.
    async fn update(
        &self,
        id: NoteId,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, NoteRepositoryError>;

    /// Remove a note. Returns `false` when nothing was deleted.
    async fn delete(&self, id: NoteId) -> Result<bool, NoteRepositoryError>;
}
